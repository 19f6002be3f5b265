//! Per-term configuration and its builder.

use std::{collections::BTreeSet, fmt};

use crate::{EntryStatistics, Operator};

/// Opaque reference to a weighting model.
///
/// The compiler only records which models a term should be scored with; the
/// scoring engine resolves and runs them.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct WeightingModelRef(String);

impl WeightingModelRef {
    /// Creates a reference to the model with the given name.
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// Returns the model name.
    pub fn name(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for WeightingModelRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Configuration of one match-term.
#[derive(Debug, Clone, PartialEq)]
pub struct QueryTermProperties {
    /// Weight multiplier of the term.
    pub weight: f64,
    /// `Some(true)` if the term must match, `Some(false)` if it must not.
    pub required: Option<bool>,
    /// Free-form labels.
    pub tags: BTreeSet<String>,
    /// Weighting models to score the term with, in order.
    pub weighting_models: Vec<WeightingModelRef>,
    /// Corpus statistics, absent until attached.
    pub statistics: Option<EntryStatistics>,
}

impl Default for QueryTermProperties {
    fn default() -> Self {
        Self {
            weight: 1.0,
            required: None,
            tags: BTreeSet::new(),
            weighting_models: Vec::new(),
            statistics: None,
        }
    }
}

impl QueryTermProperties {
    /// Folds a later occurrence of the same operator into this one.
    ///
    /// Weights are summed and tags are unioned. The required flag and the
    /// weighting models of the first occurrence are kept. Statistics are not
    /// touched.
    pub(crate) fn merge(&mut self, later: Self) {
        self.weight += later.weight;
        self.tags.extend(later.tags);
    }
}

/// An operator together with its configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct MatchingTerm {
    /// The operator, whose canonical text identifies the term.
    pub operator: Operator,
    /// Configuration of the term.
    pub properties: QueryTermProperties,
}

impl MatchingTerm {
    /// Returns the canonical text of the operator.
    pub fn key(&self) -> String {
        self.operator.canonical()
    }
}

impl fmt::Display for MatchingTerm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.operator)
    }
}

/// Fluent builder for a [`MatchingTerm`].
///
/// The weight starts at 1.0.
#[derive(Debug, Clone)]
pub struct TermPropertiesBuilder {
    /// Operator being configured.
    operator: Operator,
    /// Properties accumulated so far.
    properties: QueryTermProperties,
}

impl TermPropertiesBuilder {
    /// Starts a builder for `operator`.
    pub fn of(operator: Operator) -> Self {
        Self {
            operator,
            properties: QueryTermProperties::default(),
        }
    }

    /// Sets the weight.
    pub fn weight(mut self, weight: f64) -> Self {
        self.properties.weight = weight;
        self
    }

    /// Sets the required flag. `None` leaves the flag unset.
    pub fn required(mut self, required: Option<bool>) -> Self {
        self.properties.required = required;
        self
    }

    /// Adds a tag.
    pub fn tag(mut self, tag: impl Into<String>) -> Self {
        self.properties.tags.insert(tag.into());
        self
    }

    /// Appends a weighting model.
    pub fn weighting_model(mut self, model: WeightingModelRef) -> Self {
        self.properties.weighting_models.push(model);
        self
    }

    /// Replaces the weighting models.
    pub fn weighting_models(mut self, models: Vec<WeightingModelRef>) -> Self {
        self.properties.weighting_models = models;
        self
    }

    /// Finishes the term.
    pub fn build(self) -> MatchingTerm {
        MatchingTerm {
            operator: self.operator,
            properties: self.properties,
        }
    }
}
