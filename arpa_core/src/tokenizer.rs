// arpa_core/src/tokenizer.rs
// Splits n-gram data lines into probability, word ids and backoff.

use crate::callback::ProbBackoffPair;
use crate::error::{ArpaError, EntryErrorKind, Result};
use crate::indexer::WordIndexer;

/// Parses data lines of an order block, reusing its token buffer across lines.
#[derive(Debug, Default)]
pub struct EntryTokenizer {
    // Byte ranges of the current line's tokens.
    spans: Vec<(usize, usize)>,
}

impl EntryTokenizer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses one data line of an order-`n` block, where `n == ngram.len()`.
    ///
    /// Accepted shapes are `<prob> w1 .. wn` and `<prob> w1 .. wn <backoff>`,
    /// split on ASCII whitespace only. Words are resolved through `indexer` into
    /// `ngram` in order. Nothing is resolved when the line is rejected.
    pub fn parse_entry<W: WordIndexer + ?Sized>(
        &mut self,
        line: &str,
        line_number: u64,
        ngram: &mut [u32],
        indexer: &mut W,
    ) -> Result<ProbBackoffPair> {
        let order = ngram.len();
        let bad_line = |kind| ArpaError::Entry {
            line_number,
            line: line.to_string(),
            kind,
        };

        let base = line.as_ptr() as usize;
        self.spans.clear();
        self.spans.extend(line.split_ascii_whitespace().map(|token| {
            let start = token.as_ptr() as usize - base;
            (start, start + token.len())
        }));
        let spans = &self.spans;
        let token = move |i: usize| {
            let (start, end) = spans[i];
            &line[start..end]
        };

        let has_backoff = match spans.len() {
            n if n == order + 1 => false,
            n if n == order + 2 => true,
            found => {
                return Err(bad_line(EntryErrorKind::TokenCount {
                    order,
                    expected: order + 1,
                    found,
                }))
            }
        };

        let prob_str = token(0);
        let prob: f32 = prob_str
            .parse()
            .map_err(|_| bad_line(EntryErrorKind::BadProbability(prob_str.to_string())))?;
        // NaN fails this comparison too.
        if !(prob <= 0.0) {
            return Err(bad_line(EntryErrorKind::InvalidProbability(prob)));
        }

        let backoff = if has_backoff {
            let backoff_str = token(order + 1);
            backoff_str
                .parse()
                .map_err(|_| bad_line(EntryErrorKind::BadBackoff(backoff_str.to_string())))?
        } else {
            0.0
        };

        for (i, slot) in ngram.iter_mut().enumerate() {
            *slot = indexer.get_or_add_index(token(i + 1));
        }

        Ok(ProbBackoffPair::new(prob, backoff))
    }
}
