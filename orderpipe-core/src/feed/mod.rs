//! Input feed: line decoding and filtering

pub mod filter;
pub mod reader;

pub use filter::OrderFilter;
pub use reader::{FeedError, OrderReader, ReadStats};
