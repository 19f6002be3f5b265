//! Query parsing, AST and match-term compilation for sift.
//!
//! The query language is a chain of clauses, implicitly combined:
//!
//! - **Terms**: `zebra` - a single search term
//! - **Weights**: `zebra^0.5` - scale a clause's importance
//! - **Requirements**: `+zebra` must match, `-zebra` must not
//! - **Fields**: `title:zebra` - match within one field
//! - **Synonyms**: `{car automobile}` - several terms matched as one
//! - **Phrases**: `"zebra crossing"`, or `"zebra crossing"~8` within a window
//!
//! A parsed [`Query`] is normalized with a
//! [`TermPipeline`](sift_terms::TermPipeline) and compiled into
//! [`MatchingQueryTerms`](sift_matching::MatchingQueryTerms).
//! [`QueryProcessor`] runs the whole sequence.
//!
//! # Example
//!
//! ```
//! use sift_matching::MatchingQueryTerms;
//! use sift_query::parse;
//!
//! let query = parse("zebra^0.5 +crossing {car automobile}").unwrap();
//! let mut terms = MatchingQueryTerms::new();
//! query.compile(&mut terms);
//! assert_eq!(terms.keys(), vec!["zebra", "crossing", "#syn(car automobile)"]);
//! ```

#![warn(missing_docs)]

mod ast;
mod compile;
mod error;
mod lexer;
mod parser;
mod processor;

pub use ast::{Clause, ClauseKind, DEFAULT_WEIGHT, Query};
pub use compile::CompileOptions;
pub use error::{LexError, ParseError, QueryError, QueryErrorKind};
pub use lexer::{Token, tokenize};
pub use parser::parse;
pub use processor::{ProcessedQuery, QueryProcessor};
