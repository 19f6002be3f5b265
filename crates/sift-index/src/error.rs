//! Error types for the sift-index crate.

use sift_terms::PipelineError;
use thiserror::Error;

/// Errors that can occur when building an index.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IndexError {
    /// A document identifier exceeds the configured maximum length.
    #[error("document identifier {docno:?} is {length} bytes long, maximum is {max}")]
    DocnoTooLong {
        /// The offending identifier.
        docno: String,
        /// Its length in bytes.
        length: usize,
        /// The configured maximum.
        max: usize,
    },

    /// Parallel identifier and text lists have different lengths.
    #[error("{docnos} document identifiers but {texts} texts")]
    BatchLengthMismatch {
        /// Number of identifiers.
        docnos: usize,
        /// Number of texts.
        texts: usize,
    },

    /// An indexing setting has an unusable value.
    #[error("invalid indexing setting {key}: {message}")]
    InvalidSetting {
        /// Setting name.
        key: String,
        /// Description of the problem.
        message: String,
    },

    /// An indexer name was not recognized.
    #[error("unknown indexer: {0}")]
    UnknownIndexer(String),

    /// The term pipeline could not be built.
    #[error(transparent)]
    Pipeline(#[from] PipelineError),
}
