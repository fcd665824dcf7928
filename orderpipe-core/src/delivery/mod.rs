//! Order delivery: gateway, retry policy, engine, retry queue

pub mod engine;
pub mod error;
pub mod gateway;
pub mod queue;
pub mod retry;

pub use engine::{DeliveryEngine, ReplayReport};
pub use error::DeliveryError;
pub use gateway::{order_url, HttpGateway, OrderGateway};
pub use queue::RetryQueue;
pub use retry::{RetryPolicy, Sleeper, ThreadSleeper};
