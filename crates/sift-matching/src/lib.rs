//! Compiled match-terms for sift.
//!
//! A compiled query is an ordered, deduplicated collection of term operators,
//! each carrying its own configuration:
//!
//! - [`Operator`] - the identity of a match-term (single term, synonym, phrase,
//!   window), optionally qualified by a field
//! - [`QueryTermProperties`] - weight, required flag, tags, weighting models
//!   and corpus statistics of one operator
//! - [`MatchingQueryTerms`] - the insertion-ordered collection, merging
//!   repeated operators by summing weights
//!
//! # Example
//!
//! ```
//! use sift_matching::{MatchingQueryTerms, Operator, TermPropertiesBuilder};
//!
//! let mut terms = MatchingQueryTerms::new();
//! terms.add(TermPropertiesBuilder::of(Operator::term("zebra")).build());
//! terms.add(TermPropertiesBuilder::of(Operator::term("zebra")).weight(0.5).build());
//! assert_eq!(terms.len(), 1);
//! assert_eq!(terms.term_weight("zebra"), Some(1.5));
//! ```

#![warn(missing_docs)]

mod operator;
mod properties;
mod statistics;
mod terms;

pub use operator::Operator;
pub use properties::{MatchingTerm, QueryTermProperties, TermPropertiesBuilder, WeightingModelRef};
pub use statistics::EntryStatistics;
pub use terms::MatchingQueryTerms;
