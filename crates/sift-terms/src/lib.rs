//! Term normalization pipeline for sift.
//!
//! Query terms pass through an ordered chain of stages before they are
//! compiled into match-terms. Each stage either rewrites a token or discards
//! it; a discarded token stops the chain.
//!
//! Shipped stages:
//! - [`SStemmer`] - the "S" stemmer (lower-cases and strips plural endings)
//! - [`LowerCase`] - lower-cases tokens
//! - [`Stopwords`] - discards English stopwords
//! - [`RemoveLong`] - discards over-long tokens
//!
//! # Example
//!
//! ```
//! use sift_terms::{TermPipeline, build_pipeline};
//!
//! let pipeline = TermPipeline::default();
//! assert_eq!(pipeline.process("Crossings").as_deref(), Some("crossing"));
//!
//! let pipeline = build_pipeline(&["stopwords", "sstemmer"]).unwrap();
//! assert_eq!(pipeline.process("the"), None);
//! ```

#![warn(missing_docs)]

mod error;
mod pipeline;
mod sstemmer;
mod stage;
mod stopwords;

pub use error::PipelineError;
pub use pipeline::{TermPipeline, build_pipeline, build_pipeline_with_limit, parse_stage};
pub use sstemmer::SStemmer;
pub use stage::{DEFAULT_MAX_TERM_LENGTH, LowerCase, RemoveLong, TermStage};
pub use stopwords::Stopwords;
