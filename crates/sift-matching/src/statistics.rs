//! Corpus statistics attached to a match-term.

/// Lexicon statistics for one term, supplied by the index after compilation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct EntryStatistics {
    /// Identifier of the term in the lexicon.
    pub term_id: u32,
    /// Number of documents containing the term.
    pub document_frequency: u64,
    /// Total number of occurrences in the collection.
    pub frequency: u64,
}

impl EntryStatistics {
    /// Creates a statistics record.
    pub fn new(term_id: u32, document_frequency: u64, frequency: u64) -> Self {
        Self {
            term_id,
            document_frequency,
            frequency,
        }
    }
}
