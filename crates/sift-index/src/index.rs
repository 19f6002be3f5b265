//! The in-memory index and its lexicon.

use std::collections::BTreeMap;

use sift_matching::{EntryStatistics, MatchingQueryTerms, Operator};
use tracing::debug;

use crate::indexer::IndexerKind;

/// Occurrences of one term in one document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Posting {
    /// Internal document id, in indexing order.
    pub doc_id: u32,
    /// Occurrences in the document.
    pub frequency: u32,
    /// Token positions, recorded only by block indexers.
    pub positions: Vec<u32>,
}

/// Term to postings, ordered by term.
pub(crate) type Postings = BTreeMap<String, Vec<Posting>>;

/// Corpus-wide counts.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CollectionStatistics {
    /// Number of documents, including empty ones.
    pub documents: usize,
    /// Number of indexed tokens.
    pub tokens: u64,
    /// Number of distinct terms.
    pub unique_terms: usize,
    /// Number of (term, document) postings.
    pub pointers: u64,
}

impl CollectionStatistics {
    /// Returns the mean number of tokens per document.
    pub fn average_document_length(&self) -> f64 {
        if self.documents == 0 {
            0.0
        } else {
            self.tokens as f64 / self.documents as f64
        }
    }
}

/// Per-document metadata.
#[derive(Debug, Clone, PartialEq, Eq)]
struct DocumentEntry {
    /// External identifier.
    docno: String,
    /// Number of indexed tokens.
    length: u64,
}

/// A built index.
#[derive(Debug, Clone)]
pub struct Index {
    /// Indexer variant that built the index.
    kind: IndexerKind,
    /// Documents in id order.
    documents: Vec<DocumentEntry>,
    /// Term statistics, keyed by term.
    lexicon: BTreeMap<String, EntryStatistics>,
    /// Inverted lists, keyed by term.
    postings: Postings,
    /// Corpus-wide counts.
    statistics: CollectionStatistics,
}

impl Index {
    /// Assembles an index from documents `(docno, length)` and postings.
    ///
    /// Term ids are assigned in term order.
    pub(crate) fn from_parts(
        kind: IndexerKind,
        documents: Vec<(String, u64)>,
        postings: Postings,
    ) -> Self {
        let mut lexicon = BTreeMap::new();
        let mut pointers = 0;
        for (term_id, (term, list)) in (0_u32..).zip(&postings) {
            let frequency = list.iter().map(|p| u64::from(p.frequency)).sum();
            let document_frequency = list.len() as u64;
            pointers += document_frequency;
            lexicon.insert(
                term.clone(),
                EntryStatistics::new(term_id, document_frequency, frequency),
            );
        }

        let documents: Vec<DocumentEntry> = documents
            .into_iter()
            .map(|(docno, length)| DocumentEntry { docno, length })
            .collect();
        let statistics = CollectionStatistics {
            documents: documents.len(),
            tokens: documents.iter().map(|d| d.length).sum(),
            unique_terms: lexicon.len(),
            pointers,
        };

        Self {
            kind,
            documents,
            lexicon,
            postings,
            statistics,
        }
    }

    /// Returns the indexer variant that built this index.
    pub fn kind(&self) -> IndexerKind {
        self.kind
    }

    /// Returns the corpus-wide counts.
    pub fn collection_statistics(&self) -> &CollectionStatistics {
        &self.statistics
    }

    /// Returns the number of documents, including empty ones.
    pub fn document_count(&self) -> usize {
        self.documents.len()
    }

    /// Returns the external identifier of a document.
    pub fn docno(&self, doc_id: u32) -> Option<&str> {
        self.document(doc_id).map(|d| d.docno.as_str())
    }

    /// Returns the number of indexed tokens in a document.
    pub fn document_length(&self, doc_id: u32) -> Option<u64> {
        self.document(doc_id).map(|d| d.length)
    }

    /// Looks up a document by id.
    fn document(&self, doc_id: u32) -> Option<&DocumentEntry> {
        usize::try_from(doc_id)
            .ok()
            .and_then(|i| self.documents.get(i))
    }

    /// Returns the lexicon statistics of a term.
    pub fn lexicon_entry(&self, term: &str) -> Option<&EntryStatistics> {
        self.lexicon.get(term)
    }

    /// Returns the postings of a term, in document order.
    pub fn postings(&self, term: &str) -> Option<&[Posting]> {
        self.postings.get(term).map(Vec::as_slice)
    }

    /// Iterates over the lexicon in term order.
    pub fn terms(&self) -> impl Iterator<Item = (&str, &EntryStatistics)> {
        self.lexicon.iter().map(|(term, entry)| (term.as_str(), entry))
    }

    /// Returns true if postings carry token positions.
    pub fn has_positions(&self) -> bool {
        self.kind.records_positions()
    }

    /// Attaches lexicon statistics to the unqualified single-term operators
    /// of `terms`.
    ///
    /// Terms missing from the lexicon and compound or field-qualified
    /// operators are left untouched. Returns the number of terms updated.
    pub fn attach_statistics(&self, terms: &mut MatchingQueryTerms) -> usize {
        let found: Vec<(String, EntryStatistics)> = terms
            .iter()
            .filter_map(|t| match &t.operator {
                Operator::SingleTerm { term, field: None } => self
                    .lexicon_entry(term)
                    .map(|entry| (term.clone(), *entry)),
                _ => None,
            })
            .collect();

        let attached = found.len();
        for (term, entry) in found {
            terms.set_statistics(&term, entry);
        }
        debug!(attached, total = terms.len(), "attached lexicon statistics");
        attached
    }
}
