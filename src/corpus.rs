//! Corpus store: owns the text file behind every query.
//!
//! A snapshot is the file's lines in file order, trailing terminators
//! stripped, no sorting and no deduplication. Two freshness policies:
//!
//! - *Reread*: every `snapshot()` call re-reads the file, so queries
//!   always see the current contents at O(file size) per query.
//! - *Cached*: the first `snapshot()` call reads the file once and every
//!   later call shares that snapshot for the process lifetime. Stale data
//!   is tolerated in exchange for never touching disk again; there is no
//!   invalidation path.
//!
//! The store is a plain owned value injected into the connection handler,
//! not process-global state.

use std::path::{Path, PathBuf};
use std::sync::{Arc, OnceLock};
use std::{fs, io};

use thiserror::Error;

/// Failure to produce a corpus snapshot.
///
/// The display texts double as the client-visible `Error:` causes, so
/// they stay stable.
#[derive(Debug, Error)]
pub enum CorpusError {
    #[error("File not found.")]
    NotFound,

    #[error("Permission denied. You do not have permission to access the file.")]
    PermissionDenied,

    #[error("{0}")]
    Io(io::Error),

    #[error("File is not valid UTF-8.")]
    Decode(#[from] std::string::FromUtf8Error),
}

impl From<io::Error> for CorpusError {
    fn from(err: io::Error) -> Self {
        match err.kind() {
            io::ErrorKind::NotFound => CorpusError::NotFound,
            io::ErrorKind::PermissionDenied => CorpusError::PermissionDenied,
            _ => CorpusError::Io(err),
        }
    }
}

/// Owns the corpus file path and the freshness policy.
pub struct CorpusStore {
    path: PathBuf,
    reread_on_query: bool,
    // Populated once in cached mode, then read-only. Concurrent first
    // loads race benignly; the first writer wins and the losers drop
    // their equivalent copy.
    cache: OnceLock<Arc<Vec<String>>>,
}

impl CorpusStore {
    /// Create a store for `path`. No IO happens until the first snapshot.
    pub fn new(path: impl Into<PathBuf>, reread_on_query: bool) -> Self {
        Self {
            path: path.into(),
            reread_on_query,
            cache: OnceLock::new(),
        }
    }

    /// The corpus file path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Get the current snapshot under the configured freshness policy.
    pub fn snapshot(&self) -> Result<Arc<Vec<String>>, CorpusError> {
        if self.reread_on_query {
            return Ok(Arc::new(read_lines(&self.path)?));
        }

        if let Some(lines) = self.cache.get() {
            return Ok(Arc::clone(lines));
        }

        let lines = Arc::new(read_lines(&self.path)?);
        Ok(Arc::clone(self.cache.get_or_init(|| lines)))
    }
}

/// Read and split the corpus file into terminator-stripped lines.
fn read_lines(path: &Path) -> Result<Vec<String>, CorpusError> {
    let bytes = fs::read(path)?;
    let text = String::from_utf8(bytes)?;
    Ok(split_lines(&text))
}

/// Split on `\n`, stripping the terminator and a preceding `\r`.
///
/// memchr-driven rather than `str::lines()` so multi-hundred-thousand
/// line corpora split in one linear pass over the raw bytes.
fn split_lines(text: &str) -> Vec<String> {
    let bytes = text.as_bytes();
    let mut lines = Vec::new();
    let mut start = 0;

    for nl in memchr::memchr_iter(b'\n', bytes) {
        let mut end = nl;
        if end > start && bytes[end - 1] == b'\r' {
            end -= 1;
        }
        lines.push(text[start..end].to_string());
        start = nl + 1;
    }

    // Trailing line without a terminator
    if start < bytes.len() {
        lines.push(text[start..].to_string());
    }

    lines
}
