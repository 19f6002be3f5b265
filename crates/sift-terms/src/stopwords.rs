//! Stopword removal stage.
//!
//! Uses the English list from the `stop-words` crate (Stopwords ISO). Matching
//! is case-insensitive for ASCII characters.

use std::collections::HashSet;

use stop_words::LANGUAGE;
use tracing::trace;

use crate::stage::TermStage;

/// Discards stopwords.
#[derive(Debug, Clone)]
pub struct Stopwords {
    /// Lower-cased stopwords.
    words: HashSet<String>,
}

impl Default for Stopwords {
    fn default() -> Self {
        Self::english()
    }
}

impl Stopwords {
    /// Creates a stage with the English stopword list.
    pub fn english() -> Self {
        Self::from_words(stop_words::get(LANGUAGE::English))
    }

    /// Creates a stage from an explicit word list.
    pub fn from_words<S: AsRef<str>>(words: &[S]) -> Self {
        Self {
            words: words
                .iter()
                .map(|w| w.as_ref().to_ascii_lowercase())
                .collect(),
        }
    }

    /// Checks if a term is a stopword.
    pub fn contains(&self, term: &str) -> bool {
        self.words.contains(&term.to_ascii_lowercase())
    }

    /// Returns the number of stopwords.
    pub fn len(&self) -> usize {
        self.words.len()
    }

    /// Returns true if no stopwords are configured.
    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}

impl TermStage for Stopwords {
    fn process(&self, term: &str) -> Option<String> {
        if self.contains(term) {
            trace!(term, "discarding stopword");
            return None;
        }
        Some(term.to_string())
    }

    fn name(&self) -> &'static str {
        "stopwords"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn english_list_is_loaded() {
        let stopwords = Stopwords::english();
        assert!(!stopwords.is_empty());
        assert!(stopwords.contains("the"));
        assert!(stopwords.contains("and"));
    }

    #[test]
    fn case_insensitive() {
        let stopwords = Stopwords::english();
        assert!(stopwords.contains("The"));
        assert!(stopwords.contains("AND"));
    }

    #[test]
    fn content_words_pass() {
        let stopwords = Stopwords::english();
        assert_eq!(stopwords.process("zebra").as_deref(), Some("zebra"));
        assert_eq!(stopwords.process("the"), None);
    }

    #[test]
    fn custom_list() {
        let stopwords = Stopwords::from_words(&["Foo", "bar"]);
        assert_eq!(stopwords.len(), 2);
        assert!(stopwords.contains("foo"));
        assert!(!stopwords.contains("the"));
    }
}
