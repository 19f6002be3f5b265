//! Term operators and their canonical text.
//!
//! The canonical text of an operator is its identity: two operators with the
//! same text are merged in a [`MatchingQueryTerms`](crate::MatchingQueryTerms).

use std::fmt;

/// A match-term operator.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Operator {
    /// A single term: `term`.
    SingleTerm {
        /// The term text.
        term: String,
        /// Optional field qualifier.
        field: Option<String>,
    },

    /// Any of several terms, matched as one: `#syn(a b)`.
    Synonym {
        /// Member terms in query order.
        terms: Vec<String>,
        /// Optional field qualifier.
        field: Option<String>,
    },

    /// Terms appearing consecutively: `#1(a b)`.
    Phrase {
        /// Phrase terms in order.
        terms: Vec<String>,
        /// Optional field qualifier.
        field: Option<String>,
    },

    /// Terms appearing within an unordered window: `#uw8(a b)`.
    UnorderedWindow {
        /// Terms in query order.
        terms: Vec<String>,
        /// Window size in tokens.
        size: u32,
        /// Optional field qualifier.
        field: Option<String>,
    },
}

impl Operator {
    /// Creates an unqualified single-term operator.
    pub fn term(term: impl Into<String>) -> Self {
        Self::SingleTerm {
            term: term.into(),
            field: None,
        }
    }

    /// Creates a field-qualified single-term operator.
    pub fn field_term(term: impl Into<String>, field: impl Into<String>) -> Self {
        Self::SingleTerm {
            term: term.into(),
            field: Some(field.into()),
        }
    }

    /// Creates an unqualified synonym operator.
    pub fn synonym<S: Into<String>>(terms: impl IntoIterator<Item = S>) -> Self {
        Self::Synonym {
            terms: terms.into_iter().map(Into::into).collect(),
            field: None,
        }
    }

    /// Creates an unqualified exact-phrase operator.
    pub fn phrase<S: Into<String>>(terms: impl IntoIterator<Item = S>) -> Self {
        Self::Phrase {
            terms: terms.into_iter().map(Into::into).collect(),
            field: None,
        }
    }

    /// Returns the field qualifier, if any.
    pub fn field(&self) -> Option<&str> {
        match self {
            Self::SingleTerm { field, .. }
            | Self::Synonym { field, .. }
            | Self::Phrase { field, .. }
            | Self::UnorderedWindow { field, .. } => field.as_deref(),
        }
    }

    /// Returns a copy of this operator qualified by `field`.
    pub fn in_field(mut self, name: impl Into<String>) -> Self {
        let name = Some(name.into());
        match &mut self {
            Self::SingleTerm { field, .. }
            | Self::Synonym { field, .. }
            | Self::Phrase { field, .. }
            | Self::UnorderedWindow { field, .. } => *field = name,
        }
        self
    }

    /// Returns the terms this operator matches on.
    pub fn terms(&self) -> Vec<&str> {
        match self {
            Self::SingleTerm { term, .. } => vec![term.as_str()],
            Self::Synonym { terms, .. }
            | Self::Phrase { terms, .. }
            | Self::UnorderedWindow { terms, .. } => terms.iter().map(String::as_str).collect(),
        }
    }

    /// Returns the canonical text, which is the operator's identity.
    pub fn canonical(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(field) = self.field() {
            write!(f, "{field}:")?;
        }
        match self {
            Self::SingleTerm { term, .. } => write!(f, "{term}"),
            Self::Synonym { terms, .. } => write!(f, "#syn({})", terms.join(" ")),
            Self::Phrase { terms, .. } => write!(f, "#1({})", terms.join(" ")),
            Self::UnorderedWindow { terms, size, .. } => {
                write!(f, "#uw{size}({})", terms.join(" "))
            }
        }
    }
}
