//! Sorted lookup: insertion-point search over an ordered view of the corpus.
//!
//! The corpus store hands out lines in file order and makes no ordering
//! guarantee, so this strategy sorts a borrowed view before bisecting.
//! That costs O(n log n) per call; the verdict stays correct on
//! arbitrary files, which beats a fast lookup that is only right on
//! pre-sorted ones.

/// Check whether `query` equals any line in the corpus via binary search.
pub fn is_match(lines: &[String], query: &str) -> bool {
    let mut view: Vec<&str> = lines.iter().map(String::as_str).collect();
    view.sort_unstable();

    let idx = view.partition_point(|&line| line < query);
    idx < view.len() && view[idx] == query
}

#[cfg(test)]
mod tests {
    use super::*;

    fn corpus(lines: &[&str]) -> Vec<String> {
        lines.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_found_in_unsorted_corpus() {
        // File order is deliberately not ascending
        let lines = corpus(&["zebra", "apple", "mango", "banana"]);
        assert!(is_match(&lines, "apple"));
        assert!(is_match(&lines, "zebra"));
        assert!(is_match(&lines, "mango"));
    }

    #[test]
    fn test_not_found() {
        let lines = corpus(&["zebra", "apple", "mango"]);
        assert!(!is_match(&lines, "cherry"));
        assert!(!is_match(&lines, "app"));
    }

    #[test]
    fn test_first_and_last_after_sort() {
        let lines = corpus(&["m", "z", "a"]);
        assert!(is_match(&lines, "a"));
        assert!(is_match(&lines, "z"));
    }

    #[test]
    fn test_empty_corpus() {
        assert!(!is_match(&[], "anything"));
    }

    #[test]
    fn test_empty_query() {
        assert!(!is_match(&corpus(&["a"]), ""));
        assert!(is_match(&corpus(&["a", ""]), ""));
    }

    #[test]
    fn test_duplicates() {
        let lines = corpus(&["dup", "dup", "other"]);
        assert!(is_match(&lines, "dup"));
    }
}
