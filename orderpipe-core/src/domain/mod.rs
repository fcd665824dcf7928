//! Domain types for the order feed

pub mod order;

pub use order::Order;

/// Symbol type alias
pub type Symbol = String;
