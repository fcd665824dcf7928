//! Symbol/side predicate applied to every decoded order.

use crate::domain::{Order, Symbol};

/// Keeps only orders whose symbol and side both match exactly.
///
/// Comparison is case-sensitive: `"sell"` and `"SELL"` are different sides.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderFilter {
    symbol: Symbol,
    side: String,
}

impl OrderFilter {
    pub fn new(symbol: impl Into<Symbol>, side: impl Into<String>) -> Self {
        Self {
            symbol: symbol.into(),
            side: side.into(),
        }
    }

    pub fn matches(&self, order: &Order) -> bool {
        order.symbol == self.symbol && order.side == self.side
    }
}
