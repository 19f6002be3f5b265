//! Indexer variants.
//!
//! Every variant validates the whole batch before indexing anything, so a bad
//! document identifier never yields a partial index.
//!
//! | Variant | Positions | Construction |
//! |---------|-----------|--------------|
//! | `Basic` | no | one in-memory pass |
//! | `Block` | yes | one in-memory pass |
//! | `BasicSinglePass` | no | runs of `flush_every` documents, merged |
//! | `BlockSinglePass` | yes | runs of `flush_every` documents, merged |

use std::{collections::BTreeMap, fmt, str::FromStr, sync::Arc};

use sift_config::{Config, DEFAULT_FLUSH_EVERY, DEFAULT_MAX_DOCNO_LENGTH};
use sift_terms::{TermPipeline, build_pipeline_with_limit};
use tracing::{debug, trace, warn};

use crate::{
    Document, IndexError,
    index::{Index, Posting, Postings},
};

/// The indexing strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IndexerKind {
    /// Frequencies only, built in one pass.
    Basic,
    /// Frequencies and positions, built in one pass.
    Block,
    /// Frequencies only, built from merged runs.
    BasicSinglePass,
    /// Frequencies and positions, built from merged runs.
    BlockSinglePass,
}

impl IndexerKind {
    /// Every variant.
    pub const ALL: [Self; 4] = [
        Self::Basic,
        Self::Block,
        Self::BasicSinglePass,
        Self::BlockSinglePass,
    ];

    /// Returns true if postings record token positions.
    pub fn records_positions(self) -> bool {
        matches!(self, Self::Block | Self::BlockSinglePass)
    }

    /// Returns true if the index is built from flushed runs.
    pub fn is_single_pass(self) -> bool {
        matches!(self, Self::BasicSinglePass | Self::BlockSinglePass)
    }

    /// Returns the variant name.
    pub fn name(self) -> &'static str {
        match self {
            Self::Basic => "basic",
            Self::Block => "block",
            Self::BasicSinglePass => "basic-single-pass",
            Self::BlockSinglePass => "block-single-pass",
        }
    }
}

impl fmt::Display for IndexerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for IndexerKind {
    type Err = IndexError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "basic" => Ok(Self::Basic),
            "block" => Ok(Self::Block),
            "basic-single-pass" | "basic-sp" => Ok(Self::BasicSinglePass),
            "block-single-pass" | "block-sp" => Ok(Self::BlockSinglePass),
            other => Err(IndexError::UnknownIndexer(other.to_string())),
        }
    }
}

/// Builds in-memory indexes from document batches.
#[derive(Debug, Clone)]
pub struct Indexer {
    /// Indexing strategy.
    kind: IndexerKind,
    /// Normalization applied to every token.
    pipeline: Arc<TermPipeline>,
    /// Maximum document identifier length in bytes.
    max_docno_length: usize,
    /// Documents per run for single-pass variants.
    flush_every: usize,
}

impl Indexer {
    /// Creates an indexer with default limits.
    pub fn new(kind: IndexerKind, pipeline: Arc<TermPipeline>) -> Self {
        Self {
            kind,
            pipeline,
            max_docno_length: DEFAULT_MAX_DOCNO_LENGTH,
            flush_every: DEFAULT_FLUSH_EVERY,
        }
    }

    /// Creates an indexer from configuration.
    pub fn from_config(kind: IndexerKind, config: &Config) -> Result<Self, IndexError> {
        let pipeline =
            build_pipeline_with_limit(&config.pipeline.stages, config.pipeline.max_term_length)?;
        Ok(Self::new(kind, Arc::new(pipeline))
            .max_docno_length(config.indexing.max_docno_length)
            .flush_every(config.indexing.flush_every))
    }

    /// Sets the maximum document identifier length in bytes.
    pub fn max_docno_length(mut self, max: usize) -> Self {
        self.max_docno_length = max;
        self
    }

    /// Sets the number of documents per single-pass run.
    pub fn flush_every(mut self, documents: usize) -> Self {
        self.flush_every = documents;
        self
    }

    /// Returns the indexing strategy.
    pub fn kind(&self) -> IndexerKind {
        self.kind
    }

    /// Indexes a batch of documents.
    ///
    /// Empty documents are counted but contribute no postings. Fails without
    /// indexing anything if a document identifier is too long.
    pub fn index(&self, documents: &[Document]) -> Result<Index, IndexError> {
        self.validate(documents)?;

        let mut lengths = Vec::with_capacity(documents.len());
        let postings = if self.kind.is_single_pass() {
            let mut runs = Vec::new();
            for (run, chunk) in documents.chunks(self.flush_every).enumerate() {
                let offset = lengths.len();
                let postings = self.invert(chunk, offset, &mut lengths);
                trace!(run, documents = chunk.len(), terms = postings.len(), "flushed run");
                runs.push(postings);
            }
            merge_runs(runs)
        } else {
            self.invert(documents, 0, &mut lengths)
        };

        let documents: Vec<(String, u64)> = documents
            .iter()
            .map(|d| d.docno.clone())
            .zip(lengths)
            .collect();
        let index = Index::from_parts(self.kind, documents, postings);
        debug!(
            indexer = %self.kind,
            documents = index.document_count(),
            terms = index.collection_statistics().unique_terms,
            "indexed batch"
        );
        Ok(index)
    }

    /// Checks settings and every document identifier.
    fn validate(&self, documents: &[Document]) -> Result<(), IndexError> {
        if self.kind.is_single_pass() && self.flush_every == 0 {
            return Err(IndexError::InvalidSetting {
                key: "flush_every".into(),
                message: "must be at least 1".into(),
            });
        }
        for document in documents {
            let length = document.docno.len();
            if length > self.max_docno_length {
                warn!(
                    docno = %document.docno,
                    length,
                    max = self.max_docno_length,
                    "document identifier too long"
                );
                return Err(IndexError::DocnoTooLong {
                    docno: document.docno.clone(),
                    length,
                    max: self.max_docno_length,
                });
            }
        }
        Ok(())
    }

    /// Builds postings for `documents`, numbering them from `offset`.
    ///
    /// Pushes the indexed length of every document onto `lengths`.
    fn invert(&self, documents: &[Document], offset: usize, lengths: &mut Vec<u64>) -> Postings {
        let mut postings = Postings::new();
        for (doc_id, document) in (0_u32..).skip(offset).zip(documents) {
            let mut in_document: BTreeMap<String, Posting> = BTreeMap::new();
            let mut position = 0_u32;
            for token in document.text.split_whitespace() {
                let Some(term) = self.pipeline.process(token) else {
                    continue;
                };
                if term.is_empty() {
                    continue;
                }
                let posting = in_document.entry(term).or_insert_with(|| Posting {
                    doc_id,
                    frequency: 0,
                    positions: Vec::new(),
                });
                posting.frequency += 1;
                if self.kind.records_positions() {
                    posting.positions.push(position);
                }
                position += 1;
            }
            lengths.push(u64::from(position));
            for (term, posting) in in_document {
                postings.entry(term).or_default().push(posting);
            }
        }
        postings
    }
}

/// Concatenates runs in order; document ids grow across runs.
fn merge_runs(runs: Vec<Postings>) -> Postings {
    let mut merged = Postings::new();
    for run in runs {
        for (term, list) in run {
            merged.entry(term).or_default().extend(list);
        }
    }
    merged
}

#[cfg(test)]
mod tests {
    use super::*;

    fn indexer(kind: IndexerKind) -> Indexer {
        Indexer::new(kind, Arc::new(TermPipeline::default()))
    }

    fn corpus() -> Vec<Document> {
        Document::batch(
            &["d1", "d2", "d3", "d4", "d5"],
            &[
                "zebra crossing",
                "zebras crossing zebra",
                "",
                "stripes",
                "zebra stripes",
            ],
        )
        .unwrap()
    }

    #[test]
    fn kind_names_round_trip() {
        for kind in IndexerKind::ALL {
            assert_eq!(kind.name().parse::<IndexerKind>().unwrap(), kind);
        }
        assert_eq!("block-sp".parse::<IndexerKind>().unwrap(), IndexerKind::BlockSinglePass);
        assert!(matches!(
            "spimi".parse::<IndexerKind>(),
            Err(IndexError::UnknownIndexer(_))
        ));
    }

    #[test]
    fn postings_and_lengths() {
        let index = indexer(IndexerKind::Basic).index(&corpus()).unwrap();
        let zebra = index.postings("zebra").unwrap();
        assert_eq!(zebra.len(), 3);
        assert_eq!((zebra[1].doc_id, zebra[1].frequency), (1, 2));
        assert!(zebra[1].positions.is_empty());
        assert_eq!(index.document_length(1), Some(3));
        assert_eq!(index.document_length(2), Some(0));
        assert_eq!(index.collection_statistics().tokens, 8);
    }

    #[test]
    fn block_records_positions() {
        let index = indexer(IndexerKind::Block).index(&corpus()).unwrap();
        assert!(index.has_positions());
        let zebra = index.postings("zebra").unwrap();
        assert_eq!(zebra[1].positions, vec![0, 2]);
        assert_eq!(index.postings("crossing").unwrap()[1].positions, vec![1]);
    }

    #[test]
    fn single_pass_matches_in_memory() {
        let documents = corpus();
        let basic = indexer(IndexerKind::Basic).index(&documents).unwrap();
        let block = indexer(IndexerKind::Block).index(&documents).unwrap();
        for flush in [1, 2, 5, 100] {
            let sp = indexer(IndexerKind::BasicSinglePass)
                .flush_every(flush)
                .index(&documents)
                .unwrap();
            assert_eq!(sp.collection_statistics(), basic.collection_statistics());
            assert_eq!(sp.postings("zebra"), basic.postings("zebra"));
            assert_eq!(sp.docno(4), Some("d5"));

            let block_sp = indexer(IndexerKind::BlockSinglePass)
                .flush_every(flush)
                .index(&documents)
                .unwrap();
            assert_eq!(block_sp.postings("zebra"), block.postings("zebra"));
        }
    }

    #[test]
    fn single_pass_rejects_zero_flush() {
        let err = indexer(IndexerKind::BasicSinglePass)
            .flush_every(0)
            .index(&corpus())
            .unwrap_err();
        assert!(matches!(err, IndexError::InvalidSetting { .. }));
        assert!(indexer(IndexerKind::Basic).flush_every(0).index(&corpus()).is_ok());
    }

    #[test]
    fn docno_limit_is_inclusive() {
        let exact = Document::batch(&["a".repeat(20)], &["zebra"]).unwrap();
        assert!(indexer(IndexerKind::Basic).index(&exact).is_ok());

        let err = indexer(IndexerKind::Basic)
            .max_docno_length(4)
            .index(&Document::batch(&["d1", "doc-2"], &["a", "b"]).unwrap())
            .unwrap_err();
        assert_eq!(
            err,
            IndexError::DocnoTooLong {
                docno: "doc-2".into(),
                length: 5,
                max: 4,
            }
        );
    }

    #[test]
    fn from_config_applies_settings() {
        let config = Config::from_toml(
            r#"
[pipeline]
stages = ["lowercase"]

[indexing]
max_docno_length = 3
"#,
        )
        .unwrap();
        let indexer = Indexer::from_config(IndexerKind::Block, &config).unwrap();
        assert_eq!(indexer.kind(), IndexerKind::Block);

        let index = indexer.index(&[Document::new("d1", "Zebras")]).unwrap();
        assert!(index.lexicon_entry("zebras").is_some());
        assert!(indexer.index(&[Document::new("d100", "x")]).is_err());
    }
}
