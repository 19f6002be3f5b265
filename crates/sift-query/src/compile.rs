//! Query compiler.
//!
//! Walks a [`Query`](crate::Query) chain and adds one match-term operator per
//! leaf clause to a [`MatchingQueryTerms`] collection.
//!
//! # Compilation Rules
//!
//! | Clause | Operator |
//! |--------|----------|
//! | `Term` | `SingleTerm` |
//! | `Synonym` | `Synonym` (one operator for the whole group) |
//! | `Phrase` | `Phrase`, or `UnorderedWindow` when a window is set |
//! | `Required` | inner clause, with its flag unless overridden |
//! | `Field` | inner clause, qualified by the field name |

use sift_matching::{MatchingQueryTerms, Operator, TermPropertiesBuilder};
use tracing::trace;

use crate::ast::Clause;

/// Overrides applied while compiling a query.
#[derive(Debug, Clone, PartialEq)]
pub struct CompileOptions {
    /// Field qualifier for every operator. A field clause replaces it.
    pub field: Option<String>,
    /// Required flag for every operator, overriding the clauses' own flags.
    pub required: Option<bool>,
    /// Multiplier applied to every clause weight.
    pub weight: Option<f64>,
    /// Lower-case token text before building operators.
    pub lowercase: bool,
}

impl Default for CompileOptions {
    fn default() -> Self {
        Self {
            field: None,
            required: None,
            weight: None,
            lowercase: true,
        }
    }
}

impl CompileOptions {
    /// Sets the field qualifier.
    pub fn field(mut self, field: impl Into<String>) -> Self {
        self.field = Some(field.into());
        self
    }

    /// Sets the required override.
    pub fn required(mut self, required: bool) -> Self {
        self.required = Some(required);
        self
    }

    /// Sets the weight multiplier.
    pub fn weight(mut self, weight: f64) -> Self {
        self.weight = Some(weight);
        self
    }

    /// Sets whether token text is lower-cased.
    pub fn lowercase(mut self, lowercase: bool) -> Self {
        self.lowercase = lowercase;
        self
    }

    /// Prepares token text for an operator.
    fn token(&self, text: &str) -> String {
        if self.lowercase {
            text.to_lowercase()
        } else {
            text.to_string()
        }
    }

    /// Prepares a list of tokens, dropping empty ones.
    fn tokens(&self, terms: &[String]) -> Vec<String> {
        terms
            .iter()
            .filter(|t| !t.is_empty())
            .map(|t| self.token(t))
            .collect()
    }
}

/// Compiles one chain clause into `terms`.
pub(crate) fn compile_clause(
    clause: &Clause,
    terms: &mut MatchingQueryTerms,
    options: &CompileOptions,
) {
    let operator = match clause {
        Clause::Required { required, inner } => {
            let nested = CompileOptions {
                required: options.required.or(Some(*required)),
                ..options.clone()
            };
            return compile_clause(inner, terms, &nested);
        }
        Clause::Field { name, inner } => {
            let nested = CompileOptions {
                field: Some(name.clone()),
                ..options.clone()
            };
            return compile_clause(inner, terms, &nested);
        }
        Clause::Term { text, .. } => {
            if text.is_empty() {
                None
            } else {
                Some(Operator::term(options.token(text)))
            }
        }
        Clause::Synonym { terms: members, .. } => {
            let members = options.tokens(members);
            (!members.is_empty()).then(|| Operator::synonym(members))
        }
        Clause::Phrase {
            terms: members,
            window,
            ..
        } => {
            let members = options.tokens(members);
            (!members.is_empty()).then(|| match window {
                Some(size) => Operator::UnorderedWindow {
                    terms: members,
                    size: *size,
                    field: None,
                },
                None => Operator::phrase(members),
            })
        }
    };

    let Some(mut operator) = operator else {
        trace!(clause = %clause, "skipped clause without tokens");
        return;
    };
    if let Some(field) = &options.field {
        operator = operator.in_field(field.as_str());
    }

    let weight = clause.weight() * options.weight.unwrap_or(1.0);
    trace!(operator = %operator, weight, "compiled clause");
    terms.add(
        TermPropertiesBuilder::of(operator)
            .weight(weight)
            .required(options.required)
            .build(),
    );
}
