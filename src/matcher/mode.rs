//! Offset-window scan shared by both matching strategies.

use std::fmt;
use std::sync::Arc;

use super::index::WordIndex;

/// How candidate addresses are matched.
///
/// Chosen once at session start and consumed uniformly by every worker.
#[derive(Clone)]
pub enum SearchMode {
    /// Match any word from the indexed dictionary.
    Dictionary(Arc<WordIndex>),
    /// Match one fixed word (stored upper-cased).
    Literal(String),
}

impl SearchMode {
    pub fn literal(word: impl Into<String>) -> Self {
        SearchMode::Literal(word.into().to_uppercase())
    }

    /// Scans an upper-cased address over start offsets `min..=max` and
    /// returns the matched words in offset order.
    ///
    /// Windows running past the end of the address are skipped, never an
    /// error; an empty window (`min > max`) matches nothing. Literal mode
    /// stops at the first matching offset.
    pub fn scan(&self, upper_address: &str, min_start: usize, max_start: usize) -> Vec<String> {
        let addr = upper_address.as_bytes();
        let mut matches = Vec::new();

        match self {
            SearchMode::Dictionary(index) => {
                let prefix_len = index.word_length();
                for pos in min_start..=max_start {
                    let Some(window) = addr.get(pos..pos + prefix_len) else {
                        continue;
                    };
                    let Ok(window) = std::str::from_utf8(window) else {
                        continue;
                    };
                    for word in index.candidates(window) {
                        // The index only guarantees the prefix; confirm the
                        // full word fits and matches at this offset.
                        if addr.get(pos..pos + word.len()) == Some(word.as_bytes()) {
                            matches.push(word.clone());
                        }
                    }
                }
            }
            SearchMode::Literal(word) => {
                for pos in min_start..=max_start {
                    if addr.get(pos..pos + word.len()) == Some(word.as_bytes()) {
                        matches.push(word.clone());
                        break;
                    }
                }
            }
        }

        matches
    }
}

impl fmt::Display for SearchMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SearchMode::Dictionary(index) => write!(f, "{} dictionary words", index.len()),
            SearchMode::Literal(word) => write!(f, "literal word {:?}", word),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn dictionary(lines: &str, word_length: usize) -> SearchMode {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(lines.as_bytes()).unwrap();
        SearchMode::Dictionary(Arc::new(
            WordIndex::build(file.path(), word_length).unwrap(),
        ))
    }

    #[test]
    fn test_literal_match_in_window() {
        let mode = SearchMode::literal("abcd");
        assert_eq!(mode.scan("4ABCDXYZ", 1, 2), ["ABCD".to_string()]);
    }

    #[test]
    fn test_literal_matches_at_most_once() {
        // "AAAA" matches at offsets 1 and 2; only the first is reported.
        let mode = SearchMode::literal("AAAA");
        assert_eq!(mode.scan("4AAAAAXYZ", 1, 2).len(), 1);
    }

    #[test]
    fn test_window_clamped_at_address_end() {
        let mode = SearchMode::literal("XYZ");
        assert_eq!(mode.scan("4ABCDXYZ", 5, 5), ["XYZ".to_string()]);
        assert!(mode.scan("4ABCDXYZ", 6, 20).is_empty());
    }

    #[test]
    fn test_inverted_window_matches_nothing() {
        let mode = SearchMode::literal("ABCD");
        assert!(mode.scan("4ABCDXYZ", 3, 1).is_empty());
    }

    #[test]
    fn test_dictionary_confirms_full_word() {
        let mode = dictionary("MONKEY\nMONKEYS\n", 6);
        // Prefix MONKEY is present but only the shorter word fits the tail.
        assert_eq!(mode.scan("4MONKEYQQ", 1, 2), ["MONKEY".to_string()]);
        assert_eq!(
            mode.scan("4MONKEYSQ", 1, 1),
            ["MONKEY".to_string(), "MONKEYS".to_string()]
        );
    }

    #[test]
    fn test_dictionary_scans_every_offset() {
        let mode = dictionary("MONERO\n", 6);
        assert_eq!(mode.scan("9XMONERO123", 1, 2), ["MONERO".to_string()]);
        assert!(mode.scan("9XMONERO123", 3, 4).is_empty());
    }
}
