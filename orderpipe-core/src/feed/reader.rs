//! Streaming order reader.
//!
//! Reads the transaction log one line at a time, decodes each line as an
//! [`Order`], and yields only the orders accepted by the [`OrderFilter`].
//! Bad content is recovered locally (blank lines silently, malformed lines
//! with a warning). A failure of the underlying stream is returned once as
//! [`FeedError::Io`] and ends the iteration.

use super::filter::OrderFilter;
use crate::domain::Order;
use std::io::BufRead;
use thiserror::Error;
use tracing::{debug, warn};

/// Fatal errors while reading the feed.
#[derive(Debug, Error)]
pub enum FeedError {
    #[error("error reading input at line {line}: {source}")]
    Io {
        line: usize,
        #[source]
        source: std::io::Error,
    },
}

/// Per-line counters accumulated while the reader is consumed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReadStats {
    pub lines: usize,
    pub blank: usize,
    pub malformed: usize,
    pub filtered_out: usize,
    pub matched: usize,
}

/// Lazy, single-pass iterator over the orders in a feed that pass the filter.
pub struct OrderReader<R> {
    source: R,
    filter: OrderFilter,
    buf: Vec<u8>,
    stats: ReadStats,
    done: bool,
}

impl<R: BufRead> OrderReader<R> {
    pub fn new(source: R, filter: OrderFilter) -> Self {
        Self {
            source,
            filter,
            buf: Vec::new(),
            stats: ReadStats::default(),
            done: false,
        }
    }

    pub fn stats(&self) -> ReadStats {
        self.stats
    }

    /// Read the next raw line into `buf`, without its line terminator.
    /// Returns `Ok(false)` at end of input.
    fn next_line(&mut self) -> std::io::Result<bool> {
        self.buf.clear();
        if self.source.read_until(b'\n', &mut self.buf)? == 0 {
            return Ok(false);
        }
        if self.buf.last() == Some(&b'\n') {
            self.buf.pop();
            if self.buf.last() == Some(&b'\r') {
                self.buf.pop();
            }
        }
        self.stats.lines += 1;
        Ok(true)
    }
}

impl<R: BufRead> Iterator for OrderReader<R> {
    type Item = Result<Order, FeedError>;

    fn next(&mut self) -> Option<Self::Item> {
        while !self.done {
            match self.next_line() {
                Ok(true) => {}
                Ok(false) => {
                    self.done = true;
                    break;
                }
                Err(source) => {
                    self.done = true;
                    return Some(Err(FeedError::Io {
                        line: self.stats.lines + 1,
                        source,
                    }));
                }
            }

            let line_no = self.stats.lines;

            if is_blank(&self.buf) {
                self.stats.blank += 1;
                continue;
            }

            let order = match Order::from_json_slice(&self.buf) {
                Ok(order) => order,
                Err(e) => {
                    self.stats.malformed += 1;
                    warn!("line {line_no} is not a valid order record: {e}");
                    continue;
                }
            };

            if !self.filter.matches(&order) {
                self.stats.filtered_out += 1;
                debug!(
                    "line {line_no}: skipping order {} ({} {})",
                    order.id, order.symbol, order.side
                );
                continue;
            }

            self.stats.matched += 1;
            return Some(Ok(order));
        }
        None
    }
}

impl<R: BufRead> std::iter::FusedIterator for OrderReader<R> {}

/// Empty or Unicode whitespace only. Invalid UTF-8 is never blank.
fn is_blank(line: &[u8]) -> bool {
    std::str::from_utf8(line).is_ok_and(|text| text.trim().is_empty())
}
