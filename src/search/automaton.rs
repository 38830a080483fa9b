//! Multi-pattern automaton lookup.
//!
//! Builds an Aho-Corasick automaton with the corpus lines as needles and
//! scans the query as the haystack. A hit counts only when the matched
//! needle spans the entire query, which reduces the multi-pattern search
//! to exact line equality.

use aho_corasick::AhoCorasick;
use tracing::warn;

/// Check whether any corpus line equals `query` using an Aho-Corasick
/// automaton built over the corpus.
pub fn is_match(lines: &[String], query: &str) -> bool {
    // An empty query has no haystack to scan; answer empty-line
    // membership directly and keep empty needles out of the automaton.
    if query.is_empty() {
        return lines.iter().any(|line| line.is_empty());
    }

    let needles: Vec<&str> = lines
        .iter()
        .map(String::as_str)
        .filter(|line| !line.is_empty())
        .collect();
    if needles.is_empty() {
        return false;
    }

    let automaton = match AhoCorasick::new(&needles) {
        Ok(automaton) => automaton,
        Err(err) => {
            // Builder limits exceeded; report no match rather than crash
            // the connection.
            warn!(error = %err, "aho-corasick automaton build failed");
            return false;
        }
    };

    automaton
        .find_overlapping_iter(query)
        .any(|hit| hit.start() == 0 && hit.end() == query.len())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn corpus(lines: &[&str]) -> Vec<String> {
        lines.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_exact_line_found() {
        let lines = corpus(&["connecting", "now"]);
        assert!(is_match(&lines, "connecting"));
        assert!(is_match(&lines, "now"));
    }

    #[test]
    fn test_absent_line_not_found() {
        let lines = corpus(&["connecting", "now"]);
        assert!(!is_match(&lines, "later"));
    }

    #[test]
    fn test_corpus_line_inside_longer_query_is_not_exact() {
        // "now" occurs inside the query but does not span it
        let lines = corpus(&["now"]);
        assert!(!is_match(&lines, "nowhere"));
        assert!(!is_match(&lines, "snow"));
    }

    #[test]
    fn test_query_substring_of_line_not_found() {
        let lines = corpus(&["hello"]);
        assert!(!is_match(&lines, "ell"));
    }

    #[test]
    fn test_empty_query() {
        assert!(!is_match(&corpus(&["a"]), ""));
        assert!(is_match(&corpus(&["a", ""]), ""));
    }

    #[test]
    fn test_empty_corpus() {
        assert!(!is_match(&[], "anything"));
        assert!(!is_match(&[], ""));
    }

    #[test]
    fn test_overlapping_needles() {
        // A shorter needle that prefixes a longer one must not shadow it
        let lines = corpus(&["he", "hello"]);
        assert!(is_match(&lines, "hello"));
        assert!(is_match(&lines, "he"));
        assert!(!is_match(&lines, "hell"));
    }
}
