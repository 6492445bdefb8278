//! Reads the `\data\` header of an ARPA file up to the unigram section.

use crate::error::{ArpaError, Result};
use crate::io_handler::LineSource;
use std::io::BufRead;
use tracing::debug;

const NGRAM_COUNT_PREFIX: &str = "ngram ";
const UNIGRAM_SECTION_MARKER: &str = "\\1-grams:";

/// Consumes header lines and returns the declared count of each order.
///
/// Stops right after the line containing `\1-grams:`. Only the first
/// `max_order` counts are kept, but every count line must still parse.
pub fn read_header<R: BufRead>(lines: &mut LineSource<R>, max_order: usize) -> Result<Vec<u64>> {
    let mut counts = Vec::new();

    while let Some(line) = lines.next_line()? {
        if line.text.starts_with(NGRAM_COUNT_PREFIX) {
            let count = parse_count(line.text).map_err(|reason| ArpaError::Header {
                line_number: line.number,
                line: line.text.to_string(),
                reason,
            })?;
            if counts.len() < max_order {
                counts.push(count);
            } else {
                debug!(line_number = line.number, "Ignoring count beyond maximum order");
            }
        }
        if line.text.contains(UNIGRAM_SECTION_MARKER) {
            return Ok(counts);
        }
    }

    Err(ArpaError::MissingUnigramSection {
        lines_read: lines.lines_read(),
    })
}

fn parse_count(text: &str) -> std::result::Result<u64, String> {
    let (_, count) = text
        .split_once('=')
        .ok_or_else(|| "missing '='".to_string())?;
    let count = count.trim_ascii();
    count
        .parse::<u64>()
        .map_err(|e| format!("invalid count {count:?}: {e}"))
}
