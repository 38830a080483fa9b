//! Per-connection query handling.
//!
//! One connection carries exactly one query: a single bounded read, one
//! verdict line back, then the connection closes. Queries longer than
//! the read buffer are truncated at the transport and matched as the
//! truncated text; that is the wire contract, not something to paper
//! over with multi-segment reads.

use std::io::{Read, Write};
use std::time::Instant;

use tracing::{debug, warn};

use crate::config::Config;
use crate::corpus::CorpusStore;
use crate::search::{MatchMode, Strategy};

/// Size of the single per-connection read.
pub const READ_BUFFER_SIZE: usize = 1024;

/// Verdict for a query that equals a corpus line (or hits a substring
/// backend).
pub const RESPONSE_EXISTS: &str = "STRING EXISTS\n";

/// Verdict for a query with no hit.
pub const RESPONSE_NOT_FOUND: &str = "STRING NOT FOUND\n";

/// Everything a connection thread needs to answer one query.
///
/// Shared read-only across all connection threads; the corpus store's
/// internal cache is the only shared mutable state in the process.
pub struct HandlerContext {
    pub store: CorpusStore,
    pub strategy: Strategy,
    pub mode: MatchMode,
}

impl HandlerContext {
    /// Build the handler context from a resolved configuration.
    pub fn from_config(config: &Config) -> Self {
        Self {
            store: CorpusStore::new(&config.corpus_path, config.reread_on_query),
            strategy: config.strategy,
            mode: config.match_mode,
        }
    }

    /// Answer a decoded query with one of the three response lines.
    ///
    /// Corpus failures are converted to an `Error:` line here; nothing
    /// from the store may escape to kill the connection thread.
    pub fn answer(&self, query: &str) -> String {
        match self.store.snapshot() {
            Ok(lines) => {
                if self.strategy.is_match(&lines, query, self.mode) {
                    RESPONSE_EXISTS.to_string()
                } else {
                    RESPONSE_NOT_FOUND.to_string()
                }
            }
            Err(err) => {
                warn!(
                    error = %err,
                    path = %self.store.path().display(),
                    "corpus unavailable"
                );
                format!("Error: {err}\n")
            }
        }
    }
}

/// Run one connection end-to-end: read, match, respond.
///
/// Transport errors bubble up for the dispatch layer to log; the stream
/// is closed by drop either way.
pub fn handle_connection<S: Read + Write>(
    stream: &mut S,
    peer: &str,
    ctx: &HandlerContext,
) -> std::io::Result<()> {
    let mut buf = [0u8; READ_BUFFER_SIZE];
    let n = stream.read(&mut buf)?;
    let query = decode_query(&buf[..n]);

    let start = Instant::now();
    let response = ctx.answer(&query);
    stream.write_all(response.as_bytes())?;
    stream.flush()?;

    debug!(
        query = %query,
        peer = %peer,
        elapsed_ms = start.elapsed().as_secs_f64() * 1000.0,
        "served query"
    );
    Ok(())
}

/// Decode raw query bytes: lossy UTF-8, then strip NUL padding and line
/// terminators from both ends, however they interleave.
pub fn decode_query(raw: &[u8]) -> String {
    String::from_utf8_lossy(raw)
        .trim_matches(['\0', '\r', '\n'])
        .to_string()
}
