//! Matching strategies for exact-line queries.
//!
//! Every strategy answers the same question over an immutable corpus
//! snapshot: does the query string exist in the corpus? The strategies
//! fall into two families:
//!
//! - **Whole-line**: `linear`, `sorted`, `aho-corasick`, `regex` compare
//!   the query against complete lines and report a hit only on exact
//!   equality.
//! - **Substring scan**: `kmp`, `boyer-moore`, `rabin-karp` report a hit
//!   when the query occurs *anywhere inside* a line. This looser contract
//!   is the historical behavior of these backends; setting
//!   `whole_line_only` in the config restricts them to full-line
//!   equality, unifying all seven strategies.
//!
//! The strategy is resolved once at startup; unknown names are rejected
//! before the listener binds, never at query time.

mod automaton;
mod boyer_moore;
mod kmp;
mod linear;
mod pattern;
mod rabin_karp;
mod sorted;

use std::fmt;
use std::str::FromStr;

/// How the substring-scan backends interpret a hit.
///
/// Whole-line strategies ignore this; they always require equality.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MatchMode {
    /// A query occurring anywhere inside a line counts as found.
    #[default]
    Substring,
    /// A hit must span the entire line (exact equality everywhere).
    WholeLine,
}

/// A named matching strategy, fixed for the process lifetime.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    /// Ordered scan with per-line equality.
    Linear,
    /// Insertion-point search over a sorted view.
    Sorted,
    /// Aho-Corasick automaton keyed by corpus lines.
    AhoCorasick,
    /// Anchored regex built from the escaped query.
    Regex,
    /// Knuth-Morris-Pratt substring scan.
    Kmp,
    /// Boyer-Moore substring scan.
    BoyerMoore,
    /// Rabin-Karp rolling-hash substring scan.
    RabinKarp,
}

/// Error for a strategy identifier that is not in the registry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownStrategy(pub String);

impl fmt::Display for UnknownStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown search algorithm {:?}", self.0)
    }
}

impl std::error::Error for UnknownStrategy {}

impl FromStr for Strategy {
    type Err = UnknownStrategy;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.replace('_', "-").as_str() {
            "linear" => Ok(Strategy::Linear),
            "sorted" => Ok(Strategy::Sorted),
            "aho-corasick" => Ok(Strategy::AhoCorasick),
            "regex" => Ok(Strategy::Regex),
            "kmp" => Ok(Strategy::Kmp),
            "boyer-moore" => Ok(Strategy::BoyerMoore),
            "rabin-karp" => Ok(Strategy::RabinKarp),
            _ => Err(UnknownStrategy(s.to_string())),
        }
    }
}

impl Strategy {
    /// All strategies in the registry.
    pub const ALL: [Strategy; 7] = [
        Strategy::Linear,
        Strategy::Sorted,
        Strategy::AhoCorasick,
        Strategy::Regex,
        Strategy::Kmp,
        Strategy::BoyerMoore,
        Strategy::RabinKarp,
    ];

    /// The configuration identifier for this strategy.
    pub fn name(&self) -> &'static str {
        match self {
            Strategy::Linear => "linear",
            Strategy::Sorted => "sorted",
            Strategy::AhoCorasick => "aho-corasick",
            Strategy::Regex => "regex",
            Strategy::Kmp => "kmp",
            Strategy::BoyerMoore => "boyer-moore",
            Strategy::RabinKarp => "rabin-karp",
        }
    }

    /// Whether this strategy honors `MatchMode::Substring`.
    pub fn is_substring_backend(&self) -> bool {
        matches!(
            self,
            Strategy::Kmp | Strategy::BoyerMoore | Strategy::RabinKarp
        )
    }

    /// Test `query` against a corpus snapshot.
    ///
    /// Pure: the snapshot is never mutated and the call is safe to issue
    /// concurrently from any number of connection threads.
    pub fn is_match(&self, lines: &[String], query: &str, mode: MatchMode) -> bool {
        match self {
            Strategy::Linear => linear::is_match(lines, query),
            Strategy::Sorted => sorted::is_match(lines, query),
            Strategy::AhoCorasick => automaton::is_match(lines, query),
            Strategy::Regex => pattern::is_match(lines, query),
            Strategy::Kmp => scan_lines(lines, query, mode, kmp::contains),
            Strategy::BoyerMoore => scan_lines(lines, query, mode, boyer_moore::contains),
            Strategy::RabinKarp => scan_lines(lines, query, mode, rabin_karp::contains),
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Run a substring scanner over every line, applying the configured mode.
///
/// In whole-line mode a hit must cover the full line, so only lines of
/// exactly the query's length can qualify; the scanner then degenerates
/// to an equality check.
fn scan_lines(
    lines: &[String],
    query: &str,
    mode: MatchMode,
    contains: fn(&[u8], &[u8]) -> bool,
) -> bool {
    let needle = query.as_bytes();
    match mode {
        MatchMode::Substring => lines.iter().any(|line| contains(line.as_bytes(), needle)),
        MatchMode::WholeLine => lines
            .iter()
            .filter(|line| line.len() == query.len())
            .any(|line| contains(line.as_bytes(), needle)),
    }
}
