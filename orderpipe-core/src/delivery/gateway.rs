//! Order gateway trait and the HTTP implementation.
//!
//! The gateway performs exactly one request per call and classifies the
//! outcome. Retrying is the engine's job, so a gateway never loops or sleeps.

use super::error::DeliveryError;
use crate::domain::Order;
use std::time::Duration;
use tracing::debug;

/// One request/response cycle for a single order.
///
/// Returns the raw response body on a 2xx status.
pub trait OrderGateway {
    fn fetch(&self, order: &Order) -> Result<Vec<u8>, DeliveryError>;
}

impl<G: OrderGateway + ?Sized> OrderGateway for &G {
    fn fetch(&self, order: &Order) -> Result<Vec<u8>, DeliveryError> {
        (**self).fetch(order)
    }
}

/// Join a base endpoint and an order id into the request target.
pub fn order_url(base_url: &str, order_id: &str) -> String {
    format!("{}/{}", base_url.trim_end_matches('/'), order_id)
}

/// Blocking HTTP GET against `{base_url}/{order_id}`.
#[derive(Debug, Clone)]
pub struct HttpGateway {
    client: reqwest::blocking::Client,
    base_url: String,
}

impl HttpGateway {
    /// Build the client once for the whole run.
    ///
    /// With `insecure` set, certificate validation is skipped entirely.
    pub fn new(
        base_url: impl Into<String>,
        timeout: Duration,
        insecure: bool,
    ) -> Result<Self, reqwest::Error> {
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .danger_accept_invalid_certs(insecure)
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.into(),
        })
    }
}

impl OrderGateway for HttpGateway {
    fn fetch(&self, order: &Order) -> Result<Vec<u8>, DeliveryError> {
        let url = order_url(&self.base_url, &order.id);
        debug!("GET {url}");

        let resp = self.client.get(&url).send()?;
        let status = resp.status();

        if !status.is_success() {
            return Err(DeliveryError::NonSuccessStatus {
                status: status.as_u16(),
            });
        }

        let body = resp.bytes()?;
        Ok(body.to_vec())
    }
}
