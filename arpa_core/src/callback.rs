//! The event interface the reader drives while walking a model file.

/// Log-probability and backoff weight of a single n-gram.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ProbBackoffPair {
    /// log10 probability, always `<= 0.0`.
    pub prob: f32,
    /// log10 backoff weight; `0.0` when the line had none.
    pub backoff: f32,
}

impl ProbBackoffPair {
    pub fn new(prob: f32, backoff: f32) -> Self {
        Self { prob, backoff }
    }
}

/// Receives the parse as a strictly ordered sequence of events.
///
/// For a successful parse the calls arrive as:
///
/// 1. [`init_with_lengths`](Self::init_with_lengths) once, with the declared counts;
/// 2. for each order `n` starting at 1:
///    [`handle_ngram_order_started`](Self::handle_ngram_order_started),
///    zero or more [`call`](Self::call)s, then
///    [`handle_ngram_order_finished`](Self::handle_ngram_order_finished);
/// 3. [`cleanup`](Self::cleanup) once, last.
///
/// Order `n` always finishes before order `n + 1` starts. On error the sequence
/// simply stops; `cleanup` is not called.
pub trait ArpaLmReaderCallback {
    /// Declared entry counts per order, truncated to the configured maximum order.
    fn init_with_lengths(&mut self, counts: &[u64]);

    fn handle_ngram_order_started(&mut self, order: usize);

    /// One n-gram entry.
    ///
    /// `ngram` borrows the reader's scratch buffer and is only valid for the
    /// duration of this call; copy it to keep it. `line` is the raw input line.
    fn call(&mut self, ngram: &[u32], value: ProbBackoffPair, line: &str);

    fn handle_ngram_order_finished(&mut self, order: usize);

    fn cleanup(&mut self);
}
