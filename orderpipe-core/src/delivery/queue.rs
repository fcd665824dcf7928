//! Retry queue of orders that failed the first pass.

use crate::domain::Order;

/// Append-only list of first-pass failures, consumed once by replay.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RetryQueue {
    orders: Vec<Order>,
}

impl RetryQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, order: Order) {
        self.orders.push(order);
    }

    pub fn len(&self) -> usize {
        self.orders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.orders.is_empty()
    }
}

impl IntoIterator for RetryQueue {
    type Item = Order;
    type IntoIter = std::vec::IntoIter<Order>;

    fn into_iter(self) -> Self::IntoIter {
        self.orders.into_iter()
    }
}
