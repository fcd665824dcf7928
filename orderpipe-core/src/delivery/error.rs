//! Structured delivery errors.

use thiserror::Error;

/// Errors produced while delivering a single order.
///
/// [`Transport`](Self::Transport) and [`NonSuccessStatus`](Self::NonSuccessStatus)
/// are retryable. [`Output`](Self::Output) means the sink itself is broken and
/// aborts the run.
#[derive(Debug, Error)]
pub enum DeliveryError {
    #[error("transport failure: {0}")]
    Transport(String),

    #[error("received non-2XX response: {status}")]
    NonSuccessStatus { status: u16 },

    #[error("failed to write to output: {0}")]
    Output(#[source] std::io::Error),

    #[error("order {order_id} failed after {attempts} attempt(s): {last}")]
    Exhausted {
        order_id: String,
        attempts: u32,
        last: Box<DeliveryError>,
    },
}

impl DeliveryError {
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Transport(_) | Self::NonSuccessStatus { .. })
    }

    /// Errors that must stop the whole run rather than just this order.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::Output(_))
    }
}

impl From<reqwest::Error> for DeliveryError {
    fn from(e: reqwest::Error) -> Self {
        Self::Transport(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classification() {
        let transport = DeliveryError::Transport("connection refused".into());
        let status = DeliveryError::NonSuccessStatus { status: 503 };
        let output = DeliveryError::Output(std::io::Error::new(
            std::io::ErrorKind::Other,
            "disk full",
        ));
        let exhausted = DeliveryError::Exhausted {
            order_id: "1".into(),
            attempts: 4,
            last: Box::new(DeliveryError::NonSuccessStatus { status: 500 }),
        };

        assert!(transport.is_retryable() && !transport.is_fatal());
        assert!(status.is_retryable() && !status.is_fatal());
        assert!(!output.is_retryable() && output.is_fatal());
        assert!(!exhausted.is_retryable() && !exhausted.is_fatal());
    }

    #[test]
    fn exhausted_message_names_order_and_cause() {
        let err = DeliveryError::Exhausted {
            order_id: "12346".into(),
            attempts: 4,
            last: Box::new(DeliveryError::NonSuccessStatus { status: 500 }),
        };
        assert_eq!(
            err.to_string(),
            "order 12346 failed after 4 attempt(s): received non-2XX response: 500"
        );
    }
}
