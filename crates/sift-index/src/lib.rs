//! In-memory indexing for sift.
//!
//! This crate builds small inverted indexes from document batches and serves
//! their lexicon statistics to compiled queries:
//!
//! - [`Indexer`] - builds an [`Index`] with one of four [`IndexerKind`]
//!   strategies, enforcing the document identifier length limit
//! - [`Index`] - documents, lexicon and postings, plus
//!   [`Index::attach_statistics`] for [`MatchingQueryTerms`](sift_matching::MatchingQueryTerms)
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//!
//! use sift_index::{Document, Indexer, IndexerKind};
//! use sift_terms::TermPipeline;
//!
//! let indexer = Indexer::new(IndexerKind::Basic, Arc::new(TermPipeline::default()));
//! let index = indexer
//!     .index(&[Document::new("doc1", "zebra crossing"), Document::new("doc2", "")])
//!     .unwrap();
//! assert_eq!(index.document_count(), 2);
//! ```

#![warn(missing_docs)]

mod document;
mod error;
mod index;
mod indexer;

pub use document::Document;
pub use error::IndexError;
pub use index::{CollectionStatistics, Index, Posting};
pub use indexer::{Indexer, IndexerKind};
