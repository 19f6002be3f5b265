//! The "S" stemmer.
//!
//! A deliberately weak stemmer that only conflates plural forms. Tokens of
//! more than three characters are lower-cased and have one ending recoded,
//! checked in this order:
//!
//! | ending | removed |
//! |--------|---------|
//! | `ies`  | 3 chars |
//! | `y`    | 1 char  |
//! | `es`   | 2 chars |
//! | `s`    | 1 char  |
//!
//! Shorter tokens are only lower-cased.

use crate::stage::TermStage;

/// Tokens with at most this many characters are never stemmed.
const MIN_STEM_LENGTH: usize = 3;

/// Ordered ending rules: the first matching suffix is removed.
const ENDINGS: [&str; 4] = ["ies", "y", "es", "s"];

/// Stage implementing the "S" stemming algorithm.
#[derive(Debug, Clone, Copy, Default)]
pub struct SStemmer;

impl SStemmer {
    /// Stems a single word.
    pub fn stem(word: &str) -> String {
        let lower = word.to_lowercase();
        if word.chars().count() > MIN_STEM_LENGTH {
            recode_ending(&lower).to_string()
        } else {
            lower
        }
    }
}

/// Strips the first matching ending from `word`.
fn recode_ending(word: &str) -> &str {
    ENDINGS
        .iter()
        .find_map(|ending| word.strip_suffix(ending))
        .unwrap_or(word)
}

impl TermStage for SStemmer {
    fn process(&self, term: &str) -> Option<String> {
        Some(Self::stem(term))
    }

    fn name(&self) -> &'static str {
        "sstemmer"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_ies() {
        assert_eq!(SStemmer::stem("queries"), "quer");
        assert_eq!(SStemmer::stem("ponies"), "pon");
    }

    #[test]
    fn strips_y_before_es() {
        assert_eq!(SStemmer::stem("query"), "quer");
        assert_eq!(SStemmer::stem("boxes"), "box");
    }

    #[test]
    fn strips_single_s() {
        assert_eq!(SStemmer::stem("zebras"), "zebra");
        // only one trailing s is removed
        assert_eq!(SStemmer::stem("glass"), "glas");
    }

    #[test]
    fn leaves_other_endings() {
        assert_eq!(SStemmer::stem("crossing"), "crossing");
        assert_eq!(SStemmer::stem("term1"), "term1");
    }

    #[test]
    fn short_tokens_only_lowercased() {
        assert_eq!(SStemmer::stem("BUS"), "bus");
        assert_eq!(SStemmer::stem("yes"), "yes");
        assert_eq!(SStemmer::stem("by"), "by");
    }

    #[test]
    fn long_tokens_lowercased_before_stripping() {
        assert_eq!(SStemmer::stem("CITIES"), "cit");
        assert_eq!(SStemmer::stem("Zebras"), "zebra");
    }

    #[test]
    fn four_characters_is_long_enough() {
        assert_eq!(SStemmer::stem("cats"), "cat");
        assert_eq!(SStemmer::stem("toys"), "toy");
    }

    #[test]
    fn length_counts_characters() {
        // three characters, four bytes
        assert_eq!(SStemmer::stem("éss"), "éss");
    }

    #[test]
    fn stage_never_discards() {
        assert_eq!(SStemmer.process("").as_deref(), Some(""));
    }
}
