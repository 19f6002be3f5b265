//! Error types for query parsing and processing.
//!
//! This module provides error types for lexing, parsing, and processing query
//! strings.

use std::{error, fmt, ops::Range};

use thiserror::Error;

/// Lexer error with position information.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LexError {
    /// Error message.
    pub message: String,
    /// Byte position in input where error occurred.
    pub position: usize,
    /// Byte position just past the offending text.
    pub end: usize,
    /// The original input string.
    pub input: String,
}

impl LexError {
    /// Creates a new lexer error covering `span` of `input`.
    pub fn new(message: impl Into<String>, span: Range<usize>, input: &str) -> Self {
        Self {
            message: message.into(),
            position: span.start,
            end: span.end,
            input: input.to_string(),
        }
    }

    /// Formats the error with a position indicator showing where the error occurred.
    pub fn format_with_context(&self) -> String {
        let mut result = String::new();
        result.push_str(&format!("query syntax error: {}\n", self.message));
        result.push_str(&format!("  {}\n", self.input));
        result.push_str(&format!("  {}^", " ".repeat(self.position)));
        result
    }
}

impl fmt::Display for LexError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format_with_context())
    }
}

impl error::Error for LexError {}

/// Parse error with position information.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct ParseError {
    /// Error message.
    pub message: String,
    /// Byte position in the input where the error occurred (if applicable).
    pub position: Option<usize>,
    /// The offending fragment of the input.
    pub fragment: Option<String>,
}

impl ParseError {
    /// Creates a new parse error.
    pub fn new(
        message: impl Into<String>,
        position: Option<usize>,
        fragment: Option<String>,
    ) -> Self {
        Self {
            message: message.into(),
            position,
            fragment,
        }
    }
}

impl From<LexError> for ParseError {
    fn from(err: LexError) -> Self {
        let fragment = err.input.get(err.position..err.end).map(str::to_string);
        Self {
            message: err.message,
            position: Some(err.position),
            fragment,
        }
    }
}

/// A unified error type for query processing.
///
/// This type provides detailed error messages with context, including
/// the original query string and position indicators where applicable.
#[derive(Debug, Clone)]
pub struct QueryError {
    /// The kind of error that occurred.
    pub kind: QueryErrorKind,
    /// The original query string (if available).
    pub query: Option<String>,
}

/// The specific kind of query error.
#[derive(Debug, Clone)]
pub enum QueryErrorKind {
    /// Lexer error (tokenization failed).
    Lex {
        /// Error message.
        message: String,
        /// Byte position in input.
        position: usize,
        /// Byte position just past the offending text.
        end: usize,
    },
    /// Parser error (invalid syntax).
    Parse {
        /// Error message.
        message: String,
        /// Byte position in input (if available).
        position: Option<usize>,
        /// The offending fragment of the input.
        fragment: Option<String>,
    },
    /// Every term was removed by the normalization pipeline.
    Empty,
}

impl QueryError {
    /// Creates a lex error covering `span` of `query`.
    pub fn lex(message: impl Into<String>, span: Range<usize>, query: impl Into<String>) -> Self {
        Self {
            kind: QueryErrorKind::Lex {
                message: message.into(),
                position: span.start,
                end: span.end,
            },
            query: Some(query.into()),
        }
    }

    /// Creates a parse error.
    pub fn parse(
        message: impl Into<String>,
        position: Option<usize>,
        query: Option<String>,
    ) -> Self {
        Self {
            kind: QueryErrorKind::Parse {
                message: message.into(),
                position,
                fragment: None,
            },
            query,
        }
    }

    /// Creates an error for a query that normalized to nothing.
    pub fn empty(query: impl Into<String>) -> Self {
        Self {
            kind: QueryErrorKind::Empty,
            query: Some(query.into()),
        }
    }

    /// Sets the query string for this error.
    pub fn with_query(mut self, query: impl Into<String>) -> Self {
        self.query = Some(query.into());
        self
    }

    /// Returns the error message without context.
    pub fn message(&self) -> &str {
        match &self.kind {
            QueryErrorKind::Lex { message, .. } => message,
            QueryErrorKind::Parse { message, .. } => message,
            QueryErrorKind::Empty => "query has no terms after normalization",
        }
    }

    /// Returns the byte position of the error, if known.
    pub fn position(&self) -> Option<usize> {
        match &self.kind {
            QueryErrorKind::Lex { position, .. } => Some(*position),
            QueryErrorKind::Parse { position, .. } => *position,
            QueryErrorKind::Empty => None,
        }
    }

    /// Returns the offending fragment of the input, if known.
    pub fn fragment(&self) -> Option<&str> {
        match &self.kind {
            QueryErrorKind::Parse { fragment, .. } => fragment.as_deref(),
            QueryErrorKind::Lex { position, end, .. } => {
                self.query.as_deref().and_then(|q| q.get(*position..*end))
            }
            QueryErrorKind::Empty => None,
        }
    }

    /// Returns a suggestion for common errors.
    pub fn suggestion(&self) -> Option<&'static str> {
        match &self.kind {
            QueryErrorKind::Lex { message, .. } if message.contains("unclosed quote") => {
                Some("Add a closing quote (\") to complete the phrase")
            }
            QueryErrorKind::Lex { message, .. }
                if message.contains("'^'") || message.contains("weight") =>
            {
                Some("A weight needs a number, e.g., 'zebra^0.5'")
            }
            QueryErrorKind::Parse { message, .. } if message.contains("closing brace") => {
                Some("Add a closing brace } to complete the synonym group")
            }
            QueryErrorKind::Empty => {
                Some("All terms were removed by the term pipeline (stopwords?)")
            }
            _ => None,
        }
    }
}

impl fmt::Display for QueryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let prefix = match &self.kind {
            QueryErrorKind::Lex { .. } | QueryErrorKind::Parse { .. } => "query syntax error",
            QueryErrorKind::Empty => "query error",
        };

        writeln!(f, "{}: {}", prefix, self.message())?;

        // If we have a query and position, show it with a pointer
        if let Some(query) = &self.query {
            writeln!(f, "  {}", query)?;
            if let Some(pos) = self.position() {
                let clamped = pos.min(query.len());
                writeln!(f, "  {}^", " ".repeat(clamped))?;
            }
        }

        if let Some(suggestion) = self.suggestion() {
            write!(f, "hint: {}", suggestion)?;
        }

        Ok(())
    }
}

impl error::Error for QueryError {}

impl From<LexError> for QueryError {
    fn from(err: LexError) -> Self {
        Self {
            kind: QueryErrorKind::Lex {
                message: err.message,
                position: err.position,
                end: err.end,
            },
            query: Some(err.input),
        }
    }
}

impl From<ParseError> for QueryError {
    fn from(err: ParseError) -> Self {
        Self {
            kind: QueryErrorKind::Parse {
                message: err.message,
                position: err.position,
                fragment: err.fragment,
            },
            query: None,
        }
    }
}
