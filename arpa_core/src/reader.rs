//! The streaming ARPA reader.
//!
//! A parse is a single forward pass: the header is scanned for declared counts,
//! then each `\n-grams:` block is walked line by line, and every data line is
//! turned into one [`ArpaLmReaderCallback::call`]. Nothing is retained between
//! lines except the reusable word-id buffer and a small parser state.

use crate::callback::ArpaLmReaderCallback;
use crate::error::{ArpaError, Result};
use crate::header;
use crate::indexer::{self, WordIndexer};
use crate::io_handler::{self, InputSource, LineSource};
use crate::tokenizer::EntryTokenizer;
use crate::ReaderConfig;
use std::io::BufRead;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::{debug, info, info_span, instrument, warn};

/// How often (in lines) progress is logged while reading n-grams.
pub const PROGRESS_INTERVAL: u64 = 100_000;

const END_MARKER: &str = "\\end";

/// Mutable per-parse bookkeeping, reset at the start of every parse.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct ParserState {
    current_ngram_length: usize,
    current_ngram_count: u64,
    line_number: u64,
}

impl ParserState {
    fn new() -> Self {
        Self {
            current_ngram_length: 1,
            current_ngram_count: 0,
            line_number: 0,
        }
    }
}

/// Reads an ARPA model and reports it to an [`ArpaLmReaderCallback`].
///
/// The reader borrows the word indexer mutably for its whole lifetime; word
/// ids handed to the callback come from it, and the reserved `<s>`, `</s>` and
/// `<unk>` symbols are registered in it once a parse succeeds.
pub struct ArpaLmReader<'a, W: WordIndexer + ?Sized> {
    source: InputSource,
    use_mmap: bool,
    word_indexer: &'a mut W,
    max_order: usize,
    cancel: Option<Arc<AtomicBool>>,
    state: ParserState,
    tokenizer: EntryTokenizer,
}

impl<'a, W: WordIndexer + ?Sized> ArpaLmReader<'a, W> {
    /// Creates a reader for `source` keeping orders up to `max_order`.
    ///
    /// # Errors
    ///
    /// Returns [`ArpaError::InvalidConfig`] if `max_order` is 0.
    pub fn new(
        source: impl Into<InputSource>,
        word_indexer: &'a mut W,
        max_order: usize,
    ) -> Result<Self> {
        if max_order == 0 {
            return Err(ArpaError::InvalidConfig(
                "maximum n-gram order must be at least 1".to_string(),
            ));
        }
        Ok(Self {
            source: source.into(),
            use_mmap: false,
            word_indexer,
            max_order,
            cancel: None,
            state: ParserState::new(),
            tokenizer: EntryTokenizer::new(),
        })
    }

    /// Creates a reader from a validated [`ReaderConfig`].
    pub fn from_config(config: &ReaderConfig, word_indexer: &'a mut W) -> Result<Self> {
        let reader = Self::new(config.input.clone(), word_indexer, config.max_order)?;
        Ok(reader.with_mmap(config.use_mmap))
    }

    /// Memory-maps plain (uncompressed) input files instead of buffering them.
    pub fn with_mmap(mut self, use_mmap: bool) -> Self {
        self.use_mmap = use_mmap;
        self
    }

    /// Installs a flag that aborts the parse with [`ArpaError::Cancelled`]
    /// once it is set. It is polled before each n-gram line.
    pub fn with_cancellation(mut self, flag: Arc<AtomicBool>) -> Self {
        self.cancel = Some(flag);
        self
    }

    /// Order of the block currently (or last) being read.
    pub fn current_order(&self) -> usize {
        self.state.current_ngram_length
    }

    /// Number of the last line consumed.
    pub fn line_number(&self) -> u64 {
        self.state.line_number
    }

    pub fn word_indexer(&self) -> &W {
        &*self.word_indexer
    }

    /// Opens the configured source and parses it.
    ///
    /// The input is closed before this returns, on success and on error.
    #[instrument(skip_all, fields(input = %self.source, max_order = self.max_order))]
    pub fn parse<C: ArpaLmReaderCallback + ?Sized>(&mut self, callback: &mut C) -> Result<()> {
        let input = io_handler::open_input(&self.source, self.use_mmap)?;
        self.parse_reader(input, callback)
    }

    /// Parses an already opened input.
    pub fn parse_reader<R: BufRead, C: ArpaLmReaderCallback + ?Sized>(
        &mut self,
        input: R,
        callback: &mut C,
    ) -> Result<()> {
        self.state = ParserState::new();
        info!("Parsing ARPA language model file");

        let mut lines = LineSource::new(input);
        let counts = header::read_header(&mut lines, self.max_order)?;
        self.state.line_number = lines.lines_read();
        debug!(?counts, "Header read");
        callback.init_with_lengths(&counts);

        self.parse_ngrams(&mut lines, callback)?;
        drop(lines);

        callback.cleanup();
        indexer::register_reserved_symbols(&mut *self.word_indexer);
        info!(
            lines = self.state.line_number,
            vocabulary = self.word_indexer.len(),
            "Finished parsing ARPA language model file"
        );
        Ok(())
    }

    fn parse_ngrams<R: BufRead, C: ArpaLmReaderCallback + ?Sized>(
        &mut self,
        lines: &mut LineSource<R>,
        callback: &mut C,
    ) -> Result<()> {
        let mut span = info_span!("read_ngrams", order = self.state.current_ngram_length).entered();
        callback.handle_ngram_order_started(self.state.current_ngram_length);
        let mut ngram = vec![0u32; self.state.current_ngram_length];

        loop {
            let Some(line) = lines.next_line()? else {
                warn!(
                    line_number = self.state.line_number,
                    "Input ended without an \\end\\ marker"
                );
                break;
            };
            self.state.line_number = line.number;
            self.check_cancelled()?;
            if line.number % PROGRESS_INTERVAL == 0 {
                debug!(lines_read = line.number, "Reading n-grams");
            }

            let text = line.text;
            if text.trim_ascii().is_empty() {
                continue;
            }
            if !text.starts_with('\\') {
                let value = self.tokenizer.parse_entry(
                    text,
                    line.number,
                    &mut ngram,
                    &mut *self.word_indexer,
                )?;
                callback.call(&ngram, value, text);
                self.state.current_ngram_count += 1;
                continue;
            }
            if text.starts_with(END_MARKER) {
                break;
            }

            self.finish_order(callback);
            drop(span);
            let order = self.state.current_ngram_length + 1;
            if section_order(text) != Some(order) {
                warn!(line_number = line.number, expected = order, section = text, "Unexpected section header");
            }
            if order > self.max_order {
                debug!(max_order = self.max_order, "Maximum order reached, ignoring remaining input");
                return Ok(());
            }

            self.state.current_ngram_length = order;
            ngram.resize(order, 0);
            self.state.current_ngram_count = 0;
            callback.handle_ngram_order_started(order);
            span = info_span!("read_ngrams", order).entered();
        }

        self.finish_order(callback);
        drop(span);
        Ok(())
    }

    fn finish_order<C: ArpaLmReaderCallback + ?Sized>(&self, callback: &mut C) {
        info!(
            order = self.state.current_ngram_length,
            count = self.state.current_ngram_count,
            "n-grams read"
        );
        callback.handle_ngram_order_finished(self.state.current_ngram_length);
    }

    fn check_cancelled(&self) -> Result<()> {
        match &self.cancel {
            Some(flag) if flag.load(Ordering::Relaxed) => Err(ArpaError::Cancelled {
                line_number: self.state.line_number,
            }),
            _ => Ok(()),
        }
    }
}

/// Order named by a `\<n>-grams:` section header.
fn section_order(text: &str) -> Option<usize> {
    text.trim_ascii_end()
        .strip_prefix('\\')?
        .strip_suffix("-grams:")?
        .parse()
        .ok()
}
