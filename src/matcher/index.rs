//! Dictionary index keyed by fixed-length word prefixes.

use std::collections::HashMap;
use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::{Path, PathBuf};

/// Maps an upper-cased prefix of exactly the configured length to every
/// dictionary word sharing it, in file order.
///
/// Built once per search; read-only afterwards and shared across workers.
#[derive(Debug, Clone, Default)]
pub struct WordIndex {
    entries: HashMap<String, Vec<String>>,
    word_length: usize,
}

#[derive(Debug, thiserror::Error)]
pub enum IndexError {
    #[error("unable to open word list {path:?}: {source}")]
    SourceUnreadable { path: PathBuf, source: io::Error },
}

impl WordIndex {
    /// Builds the index from a word file, one candidate per line.
    ///
    /// Lines are trimmed of trailing whitespace and upper-cased. Words
    /// containing an apostrophe, slash, or ampersand are dropped, as are
    /// words shorter than `word_length`.
    pub fn build(path: impl AsRef<Path>, word_length: usize) -> Result<Self, IndexError> {
        let path = path.as_ref();
        let unreadable = |source| IndexError::SourceUnreadable {
            path: path.to_path_buf(),
            source,
        };
        let file = File::open(path).map_err(unreadable)?;

        let mut entries: HashMap<String, Vec<String>> = HashMap::new();
        for line in BufReader::new(file).lines() {
            let line = line.map_err(unreadable)?;
            let word = line.trim_end().to_uppercase();
            if word.is_empty()
                || word.chars().count() < word_length
                || word.contains(['\'', '/', '&'])
            {
                continue;
            }
            let key: String = word.chars().take(word_length).collect();
            entries.entry(key).or_default().push(word);
        }

        Ok(Self {
            entries,
            word_length,
        })
    }

    /// Dictionary words sharing the given upper-cased prefix; empty if none.
    pub fn candidates(&self, prefix: &str) -> &[String] {
        self.entries.get(prefix).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Length of the indexed prefix.
    pub fn word_length(&self) -> usize {
        self.word_length
    }

    /// Number of indexed words.
    pub fn len(&self) -> usize {
        self.entries.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn build_index(lines: &str, word_length: usize) -> WordIndex {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(lines.as_bytes()).unwrap();
        WordIndex::build(file.path(), word_length).unwrap()
    }

    #[test]
    fn test_index_keys_by_prefix() {
        let index = build_index("MONERO\nMONKEY\n", 6);
        assert_eq!(index.candidates("MONERO"), ["MONERO".to_string()]);
        assert_eq!(index.candidates("MONKEY"), ["MONKEY".to_string()]);
        assert_eq!(index.len(), 2);
    }

    #[test]
    fn test_words_sharing_a_prefix_keep_file_order() {
        let index = build_index("MONKEY\nMONKEYS\n", 6);
        assert_eq!(
            index.candidates("MONKEY"),
            ["MONKEY".to_string(), "MONKEYS".to_string()]
        );
    }

    #[test]
    fn test_filters_punctuation_and_short_words() {
        let index = build_index("DON'T\nA/B\nAT&T\nCAT\nMONERO\n", 4);
        assert_eq!(index.len(), 1);
        assert_eq!(index.candidates("MONE"), ["MONERO".to_string()]);
    }

    #[test]
    fn test_upper_cases_and_trims() {
        let index = build_index("tiger  \n\n", 5);
        assert_eq!(index.candidates("TIGER"), ["TIGER".to_string()]);
    }

    #[test]
    fn test_missing_file() {
        let err = WordIndex::build("/nonexistent/words.txt", 6).unwrap_err();
        assert!(matches!(err, IndexError::SourceUnreadable { .. }));
    }

    #[test]
    fn test_unknown_prefix_is_empty() {
        let index = build_index("MONERO\n", 6);
        assert!(index.candidates("ZEBRAS").is_empty());
    }
}
