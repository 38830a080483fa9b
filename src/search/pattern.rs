//! Anchored pattern test: full-string regex match per line.
//!
//! Compiles `^<escaped query>$` once per query and tests every corpus
//! line. Equivalent to the linear scan, routed through the regex engine.

use regex::Regex;
use tracing::warn;

/// Check whether `query` equals any line in the corpus via an anchored
/// regex built from the escaped query.
pub fn is_match(lines: &[String], query: &str) -> bool {
    let anchored = format!("^{}$", regex::escape(query));
    let re = match Regex::new(&anchored) {
        Ok(re) => re,
        Err(err) => {
            // Only reachable when the escaped query blows the compiled
            // size limit; report no match rather than crash.
            warn!(error = %err, "anchored pattern failed to compile");
            return false;
        }
    };

    lines.iter().any(|line| re.is_match(line))
}
