//! Orderpipe Core — order feed filtering, HTTP delivery, retry queue.
//!
//! This crate contains everything except argument parsing:
//! - Order domain type decoded from JSON lines
//! - Streaming reader that skips malformed lines and applies the symbol/side filter
//! - Delivery engine with bounded linear backoff and a one-shot retry queue replay
//! - Run orchestration over an input file and an output file
//! - TOML-backed run configuration

pub mod config;
pub mod delivery;
pub mod domain;
pub mod feed;
pub mod processor;

pub use config::{ConfigError, ProcessorConfig};
pub use delivery::{
    DeliveryEngine, DeliveryError, HttpGateway, OrderGateway, ReplayReport, RetryPolicy,
    RetryQueue, Sleeper, ThreadSleeper,
};
pub use domain::Order;
pub use feed::{FeedError, OrderFilter, OrderReader, ReadStats};
pub use processor::{run, run_streams, run_with, RunError, RunSummary};
