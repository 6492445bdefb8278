//! Ready-made consumers of reader events.
//!
//! [`NgramCollector`] keeps every entry in memory, which is convenient for small
//! models and tests. [`OrderStats`] keeps only per-order totals and is what the
//! CLI uses to summarise large files.

use crate::callback::{ArpaLmReaderCallback, ProbBackoffPair};
use tracing::{info, warn};

// Upper bound on entries reserved up front from a header count.
const MAX_RESERVED_ENTRIES: usize = 1 << 20;

/// An owned copy of one n-gram entry.
#[derive(Debug, Clone, PartialEq)]
pub struct NgramEntry {
    pub words: Vec<u32>,
    pub prob_backoff: ProbBackoffPair,
}

/// Builds a simple in-memory model: one entry list per order.
#[derive(Debug, Default)]
pub struct NgramCollector {
    declared: Vec<u64>,
    orders: Vec<Vec<NgramEntry>>,
    finished: bool,
}

impl NgramCollector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Counts announced by the file header.
    pub fn declared_counts(&self) -> &[u64] {
        &self.declared
    }

    /// Entries read for `order` (1-based), in file order.
    pub fn entries(&self, order: usize) -> &[NgramEntry] {
        order
            .checked_sub(1)
            .and_then(|i| self.orders.get(i))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Number of orders that received a start event.
    pub fn num_orders(&self) -> usize {
        self.orders.len()
    }

    /// True once the reader has called `cleanup`.
    pub fn is_finished(&self) -> bool {
        self.finished
    }
}

impl ArpaLmReaderCallback for NgramCollector {
    fn init_with_lengths(&mut self, counts: &[u64]) {
        self.declared = counts.to_vec();
        self.orders.clear();
        self.finished = false;
    }

    fn handle_ngram_order_started(&mut self, order: usize) {
        let capacity = self
            .declared
            .get(order - 1)
            .map_or(0, |&c| usize::try_from(c).unwrap_or(usize::MAX))
            .min(MAX_RESERVED_ENTRIES);
        if self.orders.len() < order {
            self.orders.resize_with(order, Vec::new);
        }
        self.orders[order - 1].reserve(capacity);
    }

    fn call(&mut self, ngram: &[u32], value: ProbBackoffPair, _line: &str) {
        self.orders[ngram.len() - 1].push(NgramEntry {
            words: ngram.to_vec(),
            prob_backoff: value,
        });
    }

    fn handle_ngram_order_finished(&mut self, _order: usize) {}

    fn cleanup(&mut self) {
        self.finished = true;
    }
}

/// Totals for one order.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OrderSummary {
    pub order: usize,
    /// Count from the header, if the header declared one for this order.
    pub declared: Option<u64>,
    pub read: u64,
    pub min_prob: f32,
    pub max_prob: f32,
}

/// Counts entries per order without retaining them.
#[derive(Debug, Default)]
pub struct OrderStats {
    declared: Vec<u64>,
    orders: Vec<OrderSummary>,
}

impl OrderStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn orders(&self) -> &[OrderSummary] {
        &self.orders
    }

    /// Total number of entries read across all orders.
    pub fn total_read(&self) -> u64 {
        self.orders.iter().map(|o| o.read).sum()
    }
}

impl ArpaLmReaderCallback for OrderStats {
    fn init_with_lengths(&mut self, counts: &[u64]) {
        self.declared = counts.to_vec();
        self.orders.clear();
    }

    fn handle_ngram_order_started(&mut self, order: usize) {
        self.orders.push(OrderSummary {
            order,
            declared: self.declared.get(order - 1).copied(),
            read: 0,
            min_prob: f32::INFINITY,
            max_prob: f32::NEG_INFINITY,
        });
    }

    fn call(&mut self, _ngram: &[u32], value: ProbBackoffPair, _line: &str) {
        if let Some(current) = self.orders.last_mut() {
            current.read += 1;
            current.min_prob = current.min_prob.min(value.prob);
            current.max_prob = current.max_prob.max(value.prob);
        }
    }

    fn handle_ngram_order_finished(&mut self, order: usize) {
        let Some(summary) = self.orders.last() else {
            return;
        };
        match summary.declared {
            Some(declared) if declared != summary.read => {
                warn!(order, declared, read = summary.read, "Declared n-gram count differs from entries read");
            }
            _ => info!(order, read = summary.read, "Order complete"),
        }
    }

    fn cleanup(&mut self) {}
}
