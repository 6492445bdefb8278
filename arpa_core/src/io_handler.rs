// arpa_core/src/io_handler.rs
// Opens model inputs (files, gzip files, stdin) and hands them out line by line.

use flate2::read::MultiGzDecoder;
use memmap2::Mmap;
use std::fmt;
use std::fs::File;
use std::io::{self, BufRead, BufReader, Cursor};
use std::path::{Path, PathBuf};
use tracing::debug;

pub type InputReader = Box<dyn BufRead>;

/// Where the model text comes from.
#[derive(Debug, Clone, PartialEq)]
pub enum InputSource {
    Stdin,
    File(PathBuf),
}

impl From<Option<PathBuf>> for InputSource {
    fn from(path: Option<PathBuf>) -> Self {
        match path {
            Some(path) => InputSource::File(path),
            None => InputSource::Stdin,
        }
    }
}

impl fmt::Display for InputSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InputSource::Stdin => f.write_str("<stdin>"),
            InputSource::File(path) => write!(f, "{}", path.display()),
        }
    }
}

fn is_gzip(path: &Path) -> bool {
    path.extension().is_some_and(|ext| ext.eq_ignore_ascii_case("gz"))
}

/// Opens `source` for sequential reading.
///
/// Files ending in `.gz` are decompressed on the fly. Other files are either
/// buffered or, with `use_mmap`, memory-mapped. Stdin is always buffered.
pub fn open_input(source: &InputSource, use_mmap: bool) -> io::Result<InputReader> {
    match source {
        InputSource::Stdin => Ok(Box::new(BufReader::new(io::stdin()))),
        InputSource::File(path) => {
            let file = File::open(path)?;
            if is_gzip(path) {
                debug!(path = %path.display(), "Opening gzip-compressed input");
                Ok(Box::new(BufReader::new(MultiGzDecoder::new(file))))
            } else if use_mmap {
                debug!(path = %path.display(), "Memory-mapping input");
                // The mapping is read-only and dropped with the reader.
                let mmap = unsafe { Mmap::map(&file)? };
                Ok(Box::new(Cursor::new(mmap)))
            } else {
                Ok(Box::new(BufReader::new(file)))
            }
        }
    }
}

/// A line handed out by [`LineSource`], with its 1-based line number.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Line<'a> {
    pub number: u64,
    pub text: &'a str,
}

/// Reads lines one at a time into a single reused buffer.
///
/// Bytes that are not valid UTF-8 are replaced with U+FFFD, so a stray
/// Latin-1 word still yields a line with a line number.
pub struct LineSource<R> {
    reader: R,
    raw: Vec<u8>,
    buf: String,
    lines_read: u64,
}

impl<R: BufRead> LineSource<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            raw: Vec::new(),
            buf: String::new(),
            lines_read: 0,
        }
    }

    /// Returns the next line without its terminator, or `None` at end of input.
    pub fn next_line(&mut self) -> io::Result<Option<Line<'_>>> {
        self.raw.clear();
        if self.reader.read_until(b'\n', &mut self.raw)? == 0 {
            return Ok(None);
        }
        self.lines_read += 1;

        let mut bytes = self.raw.as_slice();
        if let Some(rest) = bytes.strip_suffix(b"\n") {
            bytes = rest.strip_suffix(b"\r").unwrap_or(rest);
        }
        self.buf.clear();
        match std::str::from_utf8(bytes) {
            Ok(text) => self.buf.push_str(text),
            Err(_) => {
                debug!(line_number = self.lines_read, "Replacing invalid UTF-8 in line");
                self.buf.push_str(&String::from_utf8_lossy(bytes));
            }
        }
        Ok(Some(Line {
            number: self.lines_read,
            text: &self.buf,
        }))
    }

    /// Number of lines handed out so far.
    pub fn lines_read(&self) -> u64 {
        self.lines_read
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use flate2::write::GzEncoder;
    use flate2::Compression;
    use std::io::Write;
    use tempfile::{Builder, NamedTempFile};

    fn collect<R: BufRead>(mut lines: LineSource<R>) -> io::Result<Vec<(u64, String)>> {
        let mut out = Vec::new();
        while let Some(line) = lines.next_line()? {
            out.push((line.number, line.text.to_string()));
        }
        Ok(out)
    }

    #[test]
    fn test_line_source_strips_terminators() -> io::Result<()> {
        let lines = LineSource::new(Cursor::new("a\r\nb\n\nc"));
        assert_eq!(
            collect(lines)?,
            vec![
                (1, "a".to_string()),
                (2, "b".to_string()),
                (3, String::new()),
                (4, "c".to_string()),
            ]
        );
        Ok(())
    }

    #[test]
    fn test_line_source_replaces_invalid_utf8() -> io::Result<()> {
        let input: &[u8] = b"-1.0 caf\xE9\r\n-2.0 b\n";
        let lines = LineSource::new(Cursor::new(input));
        assert_eq!(
            collect(lines)?,
            vec![
                (1, "-1.0 caf\u{FFFD}".to_string()),
                (2, "-2.0 b".to_string()),
            ]
        );
        Ok(())
    }

    #[test]
    fn test_line_source_counts_lines() -> io::Result<()> {
        let mut lines = LineSource::new(Cursor::new("x\ny\n"));
        assert_eq!(lines.lines_read(), 0);
        lines.next_line()?;
        lines.next_line()?;
        assert!(lines.next_line()?.is_none());
        assert_eq!(lines.lines_read(), 2);
        Ok(())
    }

    #[test]
    fn test_open_plain_and_mmap() -> io::Result<()> {
        let mut file = NamedTempFile::new()?;
        writeln!(file, "first")?;
        writeln!(file, "second")?;
        file.flush()?;
        let source = InputSource::File(file.path().to_path_buf());

        for use_mmap in [false, true] {
            let lines = LineSource::new(open_input(&source, use_mmap)?);
            let texts: Vec<String> = collect(lines)?.into_iter().map(|(_, t)| t).collect();
            assert_eq!(texts, vec!["first", "second"]);
        }
        Ok(())
    }

    #[test]
    fn test_open_gzip() -> io::Result<()> {
        let file = Builder::new().suffix(".arpa.gz").tempfile()?;
        let mut encoder = GzEncoder::new(file.reopen()?, Compression::default());
        encoder.write_all(b"\\data\\\nngram 1=1\n")?;
        encoder.finish()?;

        let source = InputSource::File(file.path().to_path_buf());
        let lines = LineSource::new(open_input(&source, true)?);
        let texts: Vec<String> = collect(lines)?.into_iter().map(|(_, t)| t).collect();
        assert_eq!(texts, vec!["\\data\\", "ngram 1=1"]);
        Ok(())
    }

    #[test]
    fn test_open_missing_file() {
        let source = InputSource::File(PathBuf::from("this_file_should_not_exist.arpa"));
        match open_input(&source, false) {
            Err(e) => assert_eq!(e.kind(), io::ErrorKind::NotFound),
            Ok(_) => panic!("opening a missing file should fail"),
        }
    }

    #[test]
    fn test_source_from_optional_path() {
        assert_eq!(InputSource::from(None), InputSource::Stdin);
        assert_eq!(
            InputSource::from(Some(PathBuf::from("lm.arpa"))).to_string(),
            "lm.arpa"
        );
    }
}
