//! Query abstract syntax tree.
//!
//! A parsed query is a chain of clauses forming an implicit conjunction. Each
//! clause is one of a closed set of kinds; synonym and phrase clauses own
//! their member terms, which are not part of the chain.

use std::{
    collections::{BTreeMap, BTreeSet},
    fmt,
};

use sift_matching::MatchingQueryTerms;
use sift_terms::TermPipeline;
use tracing::debug;

use crate::compile::{CompileOptions, compile_clause};

/// Weight of a clause without an explicit `^w`.
pub const DEFAULT_WEIGHT: f64 = 1.0;

/// The kind of a clause, without its contents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ClauseKind {
    /// A single term.
    Term,
    /// A required or prohibited clause.
    Required,
    /// A field-qualified clause.
    Field,
    /// A synonym group.
    Synonym,
    /// A phrase.
    Phrase,
}

/// One clause of a query chain.
#[derive(Debug, Clone, PartialEq)]
pub enum Clause {
    /// A single search term.
    Term {
        /// The term text.
        text: String,
        /// Weight multiplier.
        weight: f64,
    },

    /// A clause that must (`+`) or must not (`-`) match.
    Required {
        /// True for `+`, false for `-`.
        required: bool,
        /// The wrapped clause.
        inner: Box<Self>,
    },

    /// A clause restricted to one field.
    Field {
        /// Field name.
        name: String,
        /// The wrapped term, synonym or phrase.
        inner: Box<Self>,
    },

    /// Terms treated as one operator: `{a b}`.
    Synonym {
        /// Member terms in query order.
        terms: Vec<String>,
        /// Weight multiplier.
        weight: f64,
    },

    /// Terms matched as a positional unit: `"a b"` or `"a b"~N`.
    Phrase {
        /// Phrase terms in order.
        terms: Vec<String>,
        /// Proximity window; `None` for an exact phrase.
        window: Option<u32>,
        /// Weight multiplier.
        weight: f64,
    },
}

impl Clause {
    /// Creates a term clause with the default weight.
    pub fn term(text: impl Into<String>) -> Self {
        Self::Term {
            text: text.into(),
            weight: DEFAULT_WEIGHT,
        }
    }

    /// Creates a synonym clause with the default weight.
    pub fn synonym<S: Into<String>>(terms: impl IntoIterator<Item = S>) -> Self {
        Self::Synonym {
            terms: terms.into_iter().map(Into::into).collect(),
            weight: DEFAULT_WEIGHT,
        }
    }

    /// Creates an exact phrase clause with the default weight.
    pub fn phrase<S: Into<String>>(terms: impl IntoIterator<Item = S>) -> Self {
        Self::Phrase {
            terms: terms.into_iter().map(Into::into).collect(),
            window: None,
            weight: DEFAULT_WEIGHT,
        }
    }

    /// Wraps `inner` in a requirement (`+` when `required`, `-` otherwise).
    pub fn required(inner: Self, required: bool) -> Self {
        Self::Required {
            required,
            inner: Box::new(inner),
        }
    }

    /// Wraps `inner` in a field qualifier.
    pub fn field(name: impl Into<String>, inner: Self) -> Self {
        Self::Field {
            name: name.into(),
            inner: Box::new(inner),
        }
    }

    /// Returns the kind of this clause.
    pub fn kind(&self) -> ClauseKind {
        match self {
            Self::Term { .. } => ClauseKind::Term,
            Self::Required { .. } => ClauseKind::Required,
            Self::Field { .. } => ClauseKind::Field,
            Self::Synonym { .. } => ClauseKind::Synonym,
            Self::Phrase { .. } => ClauseKind::Phrase,
        }
    }

    /// Returns the weight of the innermost clause.
    pub fn weight(&self) -> f64 {
        match self {
            Self::Term { weight, .. }
            | Self::Synonym { weight, .. }
            | Self::Phrase { weight, .. } => *weight,
            Self::Required { inner, .. } | Self::Field { inner, .. } => inner.weight(),
        }
    }

    /// Multiplies the weight of the innermost clause by `factor`.
    pub fn with_weight(mut self, factor: f64) -> Self {
        self.scale_weight(factor);
        self
    }

    /// In-place form of [`Clause::with_weight`].
    fn scale_weight(&mut self, factor: f64) {
        match self {
            Self::Term { weight, .. }
            | Self::Synonym { weight, .. }
            | Self::Phrase { weight, .. } => *weight *= factor,
            Self::Required { inner, .. } | Self::Field { inner, .. } => inner.scale_weight(factor),
        }
    }

    /// Returns the tokens owned by this clause, in order.
    pub fn tokens(&self) -> Vec<&str> {
        match self {
            Self::Term { text, .. } => vec![text.as_str()],
            Self::Synonym { terms, .. } | Self::Phrase { terms, .. } => {
                terms.iter().map(String::as_str).collect()
            }
            Self::Required { inner, .. } | Self::Field { inner, .. } => inner.tokens(),
        }
    }

    /// Normalizes every token with `pipeline`.
    ///
    /// Discarded synonym and phrase members are dropped individually. Returns
    /// false if no token survived, in which case the clause should be removed.
    fn normalize(&mut self, pipeline: &TermPipeline) -> bool {
        match self {
            Self::Term { text, .. } => match pipeline.process(text) {
                Some(normalized) if !normalized.is_empty() => {
                    *text = normalized;
                    true
                }
                _ => false,
            },
            Self::Synonym { terms, .. } | Self::Phrase { terms, .. } => {
                *terms = terms
                    .iter()
                    .filter_map(|t| pipeline.process(t))
                    .filter(|t| !t.is_empty())
                    .collect();
                !terms.is_empty()
            }
            Self::Required { inner, .. } | Self::Field { inner, .. } => inner.normalize(pipeline),
        }
    }

    /// Returns the `(name, value)` directive if this clause is a control.
    ///
    /// A control is a field clause over a plain term whose lower-cased field
    /// name is in `allowed`.
    fn control(&self, allowed: &BTreeSet<String>) -> Option<(String, String)> {
        let Self::Field { name, inner } = self else {
            return None;
        };
        let Self::Term { text, .. } = inner.as_ref() else {
            return None;
        };
        let key = name.to_lowercase();
        allowed.contains(&key).then(|| (key, text.clone()))
    }

    /// Collects leaves of `kind` below this clause.
    fn collect_terms<'a>(
        &'a self,
        kind: ClauseKind,
        only_required: bool,
        under_required: bool,
        out: &mut Vec<&'a Self>,
    ) {
        let required_here = under_required || matches!(self, Self::Required { required: true, .. });
        if self.kind() == kind && (!only_required || required_here) {
            out.push(self);
        }
        if let Self::Required { inner, .. } | Self::Field { inner, .. } = self {
            inner.collect_terms(kind, only_required, required_here, out);
        }
    }

    /// Formats the clause as a tree structure with the given indentation level.
    fn fmt_tree(&self, f: &mut fmt::Formatter<'_>, indent: usize) -> fmt::Result {
        let prefix = "  ".repeat(indent);
        match self {
            Self::Term { text, weight } => writeln!(f, "{prefix}Term({text:?}, {weight})"),
            Self::Synonym { terms, weight } => writeln!(f, "{prefix}Synonym({terms:?}, {weight})"),
            Self::Phrase {
                terms,
                window,
                weight,
            } => match window {
                Some(size) => writeln!(f, "{prefix}Phrase({terms:?}, ~{size}, {weight})"),
                None => writeln!(f, "{prefix}Phrase({terms:?}, {weight})"),
            },
            Self::Required { required, inner } => {
                writeln!(f, "{prefix}Required({required})")?;
                inner.fmt_tree(f, indent + 1)
            }
            Self::Field { name, inner } => {
                writeln!(f, "{prefix}Field({name:?})")?;
                inner.fmt_tree(f, indent + 1)
            }
        }
    }
}

/// Writes `^w` unless the weight is the default.
fn fmt_weight(f: &mut fmt::Formatter<'_>, weight: f64) -> fmt::Result {
    if weight == DEFAULT_WEIGHT {
        Ok(())
    } else {
        write!(f, "^{weight}")
    }
}

impl fmt::Display for Clause {
    /// Formats the clause in query syntax, with synonyms in `#syn(..)` form.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Term { text, weight } => {
                write!(f, "{text}")?;
                fmt_weight(f, *weight)
            }
            Self::Synonym { terms, weight } => {
                write!(f, "#syn({})", terms.join(" "))?;
                fmt_weight(f, *weight)
            }
            Self::Phrase {
                terms,
                window,
                weight,
            } => {
                write!(f, "\"{}\"", terms.join(" "))?;
                if let Some(size) = window {
                    write!(f, "~{size}")?;
                }
                fmt_weight(f, *weight)
            }
            Self::Required { required, inner } => {
                let sign = if *required { '+' } else { '-' };
                write!(f, "{sign}{inner}")
            }
            Self::Field { name, inner } => write!(f, "{name}:{inner}"),
        }
    }
}

/// A parsed query: an ordered chain of clauses.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Query {
    /// Clauses in query order.
    clauses: Vec<Clause>,
}

impl Query {
    /// Creates an empty query.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a query from clauses in chain order.
    pub fn from_clauses(clauses: Vec<Clause>) -> Self {
        Self { clauses }
    }

    /// Appends a clause to the end of the chain.
    pub fn push(&mut self, clause: Clause) {
        self.clauses.push(clause);
    }

    /// Returns the clauses in chain order.
    pub fn clauses(&self) -> &[Clause] {
        &self.clauses
    }

    /// Number of clauses in the chain.
    pub fn len(&self) -> usize {
        self.clauses.len()
    }

    /// Returns true if the chain has no clauses.
    pub fn is_empty(&self) -> bool {
        self.clauses.is_empty()
    }

    /// Returns a fully independent copy of this query.
    ///
    /// Every clause and every synonym or phrase member is duplicated; the copy
    /// can be mutated without affecting `self`.
    pub fn deep_copy(&self) -> Self {
        self.clone()
    }

    /// Normalizes every token with `pipeline`.
    ///
    /// Clauses left without any token are removed from the chain. Returns true
    /// if at least one term survived.
    pub fn apply_pipeline(&mut self, pipeline: &TermPipeline) -> bool {
        let before = self.clauses.len();
        self.clauses.retain_mut(|clause| clause.normalize(pipeline));
        let removed = before - self.clauses.len();
        if removed > 0 {
            debug!(removed, remaining = self.clauses.len(), "clauses removed by term pipeline");
        }
        !self.clauses.is_empty()
    }

    /// Extracts control directives into `controls`.
    ///
    /// A field clause over a plain term whose lower-cased field name is in
    /// `allowed` is recorded as `name -> value` and removed from the chain.
    /// Other field names are left in place as ordinary field clauses. A repeated
    /// control keeps the last value. Returns true if any control was found.
    pub fn collect_controls(
        &mut self,
        allowed: &BTreeSet<String>,
        controls: &mut BTreeMap<String, String>,
    ) -> bool {
        let mut found = false;
        self.clauses.retain(|clause| match clause.control(allowed) {
            Some((name, value)) => {
                debug!(control = %name, value = %value, "collected query control");
                controls.insert(name, value);
                found = true;
                false
            }
            None => true,
        });
        found
    }

    /// Walks the chain, calling `visitor` with each clause and its successor.
    ///
    /// The walk continues while the visitor returns true and a successor
    /// exists. Member terms of synonyms and phrases are not visited.
    pub fn visit<F>(&self, mut visitor: F)
    where
        F: FnMut(&Clause, Option<&Clause>) -> bool,
    {
        for (i, clause) in self.clauses.iter().enumerate() {
            let next = self.clauses.get(i + 1);
            if !visitor(clause, next) || next.is_none() {
                break;
            }
        }
    }

    /// Returns the chain clauses of `kind`, in chain order.
    pub fn collect_of_kind(&self, kind: ClauseKind) -> Vec<&Clause> {
        self.clauses.iter().filter(|c| c.kind() == kind).collect()
    }

    /// Returns the clauses of `kind`, looking inside requirement and field
    /// wrappers.
    ///
    /// With `only_required`, only clauses under a `+` requirement are returned.
    pub fn terms_of(&self, kind: ClauseKind, only_required: bool) -> Vec<&Clause> {
        let mut out = Vec::new();
        for clause in &self.clauses {
            clause.collect_terms(kind, only_required, false, &mut out);
        }
        out
    }

    /// Compiles the query into `terms` with default options.
    pub fn compile(&self, terms: &mut MatchingQueryTerms) {
        self.compile_with(terms, &CompileOptions::default());
    }

    /// Compiles the query into `terms`.
    ///
    /// Clauses are added in chain order; see [`CompileOptions`] for how the
    /// overrides combine with each clause.
    pub fn compile_with(&self, terms: &mut MatchingQueryTerms, options: &CompileOptions) {
        for clause in &self.clauses {
            compile_clause(clause, terms, options);
        }
        debug!(clauses = self.clauses.len(), operators = terms.len(), "compiled query");
    }

    /// Returns the query as an indented tree, one clause per line.
    pub fn parse_tree(&self) -> String {
        ParseTree(self).to_string()
    }
}

/// Display adapter rendering a query as a tree.
struct ParseTree<'a>(&'a Query);

impl fmt::Display for ParseTree<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Query")?;
        for clause in &self.0.clauses {
            clause.fmt_tree(f, 1)?;
        }
        Ok(())
    }
}

impl fmt::Display for Query {
    /// Formats the query in query syntax, clauses separated by spaces.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, clause) in self.clauses.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            write!(f, "{clause}")?;
        }
        Ok(())
    }
}
