//! Delivery engine: inline first pass with linear backoff, plus queue replay.
//!
//! The first pass starts every order at attempt 0 and escalates the delay on
//! each retry (`1u, 2u, …, budget·u`). Orders that still fail are queued by
//! the caller. Replay gives each queued order up to `budget` more tries, and
//! every try restarts the delivery at attempt 0, so each one runs its own
//! full backoff ladder. The replay counter only decides when to give up.

use super::error::DeliveryError;
use super::gateway::OrderGateway;
use super::queue::RetryQueue;
use super::retry::{RetryPolicy, Sleeper, ThreadSleeper};
use crate::domain::Order;
use std::io::Write;
use tracing::{debug, error, info, warn};

/// Attempt index every replay try starts from.
const REPLAY_START_ATTEMPT: u32 = 0;

/// Outcome of replaying the retry queue.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReplayReport {
    /// Ids delivered during replay.
    pub recovered: Vec<String>,
    /// Ids that failed every replay attempt.
    pub exhausted: Vec<String>,
}

/// Delivers orders through a gateway and appends successful bodies to a sink.
pub struct DeliveryEngine<G, W, S = ThreadSleeper> {
    gateway: G,
    sink: W,
    policy: RetryPolicy,
    sleeper: S,
}

impl<G: OrderGateway, W: Write> DeliveryEngine<G, W, ThreadSleeper> {
    pub fn new(gateway: G, sink: W, policy: RetryPolicy) -> Self {
        Self::with_sleeper(gateway, sink, policy, ThreadSleeper)
    }
}

impl<G: OrderGateway, W: Write, S: Sleeper> DeliveryEngine<G, W, S> {
    pub fn with_sleeper(gateway: G, sink: W, policy: RetryPolicy, sleeper: S) -> Self {
        Self {
            gateway,
            sink,
            policy,
            sleeper,
        }
    }

    /// Give the sink back, e.g. to flush it or inspect what was written.
    pub fn into_sink(self) -> W {
        self.sink
    }

    /// Deliver one order, retrying retryable failures from `start_attempt`
    /// until the budget is spent.
    ///
    /// On success the response body is appended to the sink followed by `\n`.
    /// A persistently failing order comes back as [`DeliveryError::Exhausted`];
    /// a sink failure comes back as [`DeliveryError::Output`] without retry.
    pub fn deliver(&mut self, order: &Order, start_attempt: u32) -> Result<(), DeliveryError> {
        let budget = self.policy.budget;
        let mut attempt = start_attempt;
        let mut requests = 0u32;

        loop {
            requests += 1;
            let err = match self.gateway.fetch(order) {
                Ok(body) => {
                    self.write_line(&body)?;
                    info!("successfully processed order {}", order.id);
                    return Ok(());
                }
                Err(err) if err.is_retryable() => err,
                Err(err) => return Err(err),
            };

            if !self.policy.can_retry(attempt) {
                return Err(DeliveryError::Exhausted {
                    order_id: order.id.clone(),
                    attempts: requests,
                    last: Box::new(err),
                });
            }

            debug!("current retry count: {attempt}, max retries: {budget}");
            warn!(
                "request failed for order {} (retry {}/{}): {}",
                order.id,
                attempt + 1,
                budget,
                err
            );
            self.sleeper.sleep(self.policy.delay_for(attempt));
            attempt += 1;
        }
    }

    /// Replay the retry queue once, in order.
    ///
    /// Each queued order gets up to `budget` replay attempts. Exhausted orders
    /// are logged and reported; only a fatal sink error stops the replay.
    pub fn replay(&mut self, queue: RetryQueue) -> Result<ReplayReport, DeliveryError> {
        let mut report = ReplayReport::default();
        if queue.is_empty() {
            return Ok(report);
        }

        let budget = self.policy.budget;
        info!("processing retry queue with {} orders", queue.len());

        for order in queue {
            let mut replay_attempts = 0u32;
            let mut delivered = false;

            while replay_attempts < budget {
                info!(
                    "retry attempt {}/{} for order {}",
                    replay_attempts + 1,
                    budget,
                    order.id
                );
                match self.deliver(&order, REPLAY_START_ATTEMPT) {
                    Ok(()) => {
                        delivered = true;
                        break;
                    }
                    Err(e) if e.is_fatal() => return Err(e),
                    Err(e) => {
                        warn!("retry failed for order {}: {e}", order.id);
                        replay_attempts += 1;
                    }
                }
            }

            if delivered {
                report.recovered.push(order.id);
            } else {
                error!("exceeded maximum retries for order {}", order.id);
                report.exhausted.push(order.id);
            }
        }

        Ok(report)
    }

    fn write_line(&mut self, body: &[u8]) -> Result<(), DeliveryError> {
        self.sink
            .write_all(body)
            .and_then(|()| self.sink.write_all(b"\n"))
            .map_err(DeliveryError::Output)
    }
}
