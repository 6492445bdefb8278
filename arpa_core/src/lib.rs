//! # ARPA Language Model Reader Core Library (arpa_core)
//!
//! The `arpa_core` crate reads n-gram backoff language models in the ARPA text
//! format and streams them, entry by entry, to a model builder of the caller's
//! choosing. It never holds the parsed model itself, so files far larger than
//! memory can be loaded into compact representations.
//!
//! ## Core Concepts
//!
//! - **Configuration (`ReaderConfig`):** The input location, the highest n-gram
//!   order to keep, and whether plain files are memory-mapped.
//! - **Reader (`reader::ArpaLmReader`):** A single forward pass over the file. The
//!   header's declared counts are read first, then every `\n-grams:` block is
//!   walked and each line becomes one event.
//! - **Callback (`callback::ArpaLmReaderCallback`):** The trait receiving those
//!   events: declared counts, order started, one call per n-gram, order finished,
//!   cleanup.
//! - **Word Indexer (`indexer::WordIndexer`):** Maps words to dense `u32` ids. The
//!   reserved `<s>`, `</s>` and `<unk>` symbols are always present after a
//!   successful parse.
//! - **I/O Handling (`io_handler`):** Opens files (plain, memory-mapped or `.gz`)
//!   and stdin, and hands them out line by line.
//!
//! ## Example Usage
//!
//! ```no_run
//! use arpa_core::collector::NgramCollector;
//! use arpa_core::{load_arpa, ReaderConfig, WordIndexer};
//! use std::path::PathBuf;
//!
//! let config = ReaderConfig::new_from_cli(Some(PathBuf::from("lm.arpa")), Some(3), false).unwrap();
//! let mut model = NgramCollector::new();
//! match load_arpa(&config, &mut model) {
//!     Ok(vocab) => println!("{} words, {} bigrams", vocab.len(), model.entries(2).len()),
//!     Err(e) => eprintln!("Error: {}", e),
//! }
//! ```

use std::path::PathBuf;
use tracing::{info, instrument};

// --- Module declarations ---
/// The event trait driven by the reader and the probability/backoff value type.
pub mod callback;
/// In-memory and statistics-only consumers of reader events.
pub mod collector;
/// Error and result types.
pub mod error;
/// Scans the header for declared n-gram counts.
pub mod header;
/// Word to id vocabulary trait, the default implementation and reserved symbols.
pub mod indexer;
/// Opens input sources and reads them line by line.
pub mod io_handler;
/// The order-block state machine and parse entry points.
pub mod reader;
/// Splits data lines into log-probability, word ids and backoff.
pub mod tokenizer;

pub use callback::{ArpaLmReaderCallback, ProbBackoffPair};
pub use error::{ArpaError, EntryErrorKind, Result};
pub use indexer::{StringWordIndexer, WordIndexer};
pub use reader::ArpaLmReader;

// --- Public API ---

/// Orders kept when no maximum is configured: all of them.
pub const DEFAULT_MAX_ORDER: usize = usize::MAX;

/// Settings for one reader.
#[derive(Debug, Clone, PartialEq)]
pub struct ReaderConfig {
    /// Path to the model file. If `None`, stdin is read.
    pub input: Option<PathBuf>,
    /// Highest n-gram order reported to the callback.
    pub max_order: usize,
    /// Memory-map plain files instead of reading them through a buffer.
    pub use_mmap: bool,
}

impl Default for ReaderConfig {
    fn default() -> Self {
        Self {
            input: None,
            max_order: DEFAULT_MAX_ORDER,
            use_mmap: false,
        }
    }
}

impl ReaderConfig {
    /// Creates a `ReaderConfig` from command-line arguments.
    ///
    /// # Errors
    ///
    /// Returns [`ArpaError::InvalidConfig`] for a maximum order of 0.
    pub fn new_from_cli(
        input: Option<PathBuf>,
        max_order: Option<usize>,
        use_mmap: bool,
    ) -> Result<Self> {
        let max_order = max_order.unwrap_or(DEFAULT_MAX_ORDER);
        if max_order == 0 {
            return Err(ArpaError::InvalidConfig(
                "--max-order must be at least 1".to_string(),
            ));
        }
        Ok(ReaderConfig {
            input,
            max_order,
            use_mmap,
        })
    }
}

/// Reads the model described by `config` into `callback` with a fresh vocabulary.
///
/// Returns the vocabulary built while reading, reserved symbols included.
#[instrument(skip_all, fields(input = ?config.input, max_order = config.max_order))]
pub fn load_arpa<C: ArpaLmReaderCallback + ?Sized>(
    config: &ReaderConfig,
    callback: &mut C,
) -> Result<StringWordIndexer> {
    let mut vocabulary = StringWordIndexer::new();
    ArpaLmReader::from_config(config, &mut vocabulary)?.parse(callback)?;
    info!(words = vocabulary.len(), "Model loaded");
    Ok(vocabulary)
}
