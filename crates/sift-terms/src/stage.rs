//! The stage trait and the simple built-in stages.

use tracing::trace;

/// Default maximum token length in bytes for [`RemoveLong`].
pub const DEFAULT_MAX_TERM_LENGTH: usize = 40;

/// A single step of a term pipeline.
///
/// Stages must not mutate shared state while processing: a pipeline is
/// assembled once and then shared between threads.
pub trait TermStage: Send + Sync {
    /// Processes one token. Returns `None` to discard it.
    fn process(&self, term: &str) -> Option<String>;

    /// Short name of the stage, as used in configuration.
    fn name(&self) -> &'static str;
}

/// Lower-cases every token.
#[derive(Debug, Clone, Copy, Default)]
pub struct LowerCase;

impl TermStage for LowerCase {
    fn process(&self, term: &str) -> Option<String> {
        Some(term.to_lowercase())
    }

    fn name(&self) -> &'static str {
        "lowercase"
    }
}

/// Discards tokens longer than a byte limit.
#[derive(Debug, Clone, Copy)]
pub struct RemoveLong {
    /// Maximum accepted token length in bytes.
    limit: usize,
}

impl RemoveLong {
    /// Creates a filter accepting tokens of at most `limit` bytes.
    pub fn limit(limit: usize) -> Self {
        Self { limit }
    }
}

impl Default for RemoveLong {
    fn default() -> Self {
        Self::limit(DEFAULT_MAX_TERM_LENGTH)
    }
}

impl TermStage for RemoveLong {
    fn process(&self, term: &str) -> Option<String> {
        if term.len() > self.limit {
            trace!(term, limit = self.limit, "discarding long term");
            return None;
        }
        Some(term.to_string())
    }

    fn name(&self) -> &'static str {
        "remove-long"
    }
}
