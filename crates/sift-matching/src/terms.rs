//! The compiled, insertion-ordered match-term collection.

use std::{collections::HashMap, slice};

use tracing::{debug, trace};

use crate::{
    EntryStatistics, MatchingTerm, Operator, TermPropertiesBuilder, WeightingModelRef,
};

/// Ordered collection of match-terms keyed by canonical operator text.
///
/// Terms keep the order in which they were first added. Adding an operator
/// that is already present merges the two occurrences: weights are summed,
/// tags are unioned, and the first occurrence's required flag and weighting
/// models are kept.
#[derive(Debug, Clone, Default)]
pub struct MatchingQueryTerms {
    /// Identifier of the query these terms came from.
    query_id: Option<String>,
    /// Terms in first-occurrence order.
    terms: Vec<MatchingTerm>,
    /// Canonical text to position in `terms`.
    index: HashMap<String, usize>,
}

impl MatchingQueryTerms {
    /// Creates an empty collection.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty collection for the query with the given identifier.
    pub fn with_query_id(query_id: impl Into<String>) -> Self {
        Self {
            query_id: Some(query_id.into()),
            ..Self::default()
        }
    }

    /// Returns the query identifier.
    pub fn query_id(&self) -> Option<&str> {
        self.query_id.as_deref()
    }

    /// Sets the query identifier.
    pub fn set_query_id(&mut self, query_id: impl Into<String>) {
        self.query_id = Some(query_id.into());
    }

    /// Number of distinct operators.
    pub fn len(&self) -> usize {
        self.terms.len()
    }

    /// Returns true if no operator has been added.
    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    /// Adds a term, merging with an existing operator of the same text.
    pub fn add(&mut self, term: MatchingTerm) {
        let key = term.key();
        if let Some(&position) = self.index.get(&key) {
            let existing = &mut self.terms[position].properties;
            existing.merge(term.properties);
            trace!(term = %key, weight = existing.weight, "merged repeated operator");
            return;
        }
        self.index.insert(key, self.terms.len());
        self.terms.push(term);
    }

    /// Adds `weight` to the single term `text`, creating it if absent.
    pub fn add_term_weight(&mut self, text: &str, weight: f64) {
        self.add(
            TermPropertiesBuilder::of(Operator::term(text))
                .weight(weight)
                .build(),
        );
    }

    /// Overwrites the weight of the operator with canonical text `text`.
    ///
    /// Returns false if no such operator exists.
    pub fn set_term_weight(&mut self, text: &str, weight: f64) -> bool {
        match self.get_mut(text) {
            Some(term) => {
                term.properties.weight = weight;
                true
            }
            None => false,
        }
    }

    /// Returns the weight of the operator with canonical text `text`.
    pub fn term_weight(&self, text: &str) -> Option<f64> {
        self.get(text).map(|t| t.properties.weight)
    }

    /// Attaches statistics to the operator with canonical text `text`.
    ///
    /// A later call replaces earlier statistics. Returns false if no such
    /// operator exists.
    pub fn set_statistics(&mut self, text: &str, statistics: EntryStatistics) -> bool {
        match self.get_mut(text) {
            Some(term) => {
                term.properties.statistics = Some(statistics);
                true
            }
            None => false,
        }
    }

    /// Returns the statistics of the operator with canonical text `text`.
    pub fn statistics(&self, text: &str) -> Option<&EntryStatistics> {
        self.get(text)
            .and_then(|t| t.properties.statistics.as_ref())
    }

    /// Returns the term with canonical text `text`.
    pub fn get(&self, text: &str) -> Option<&MatchingTerm> {
        self.index.get(text).map(|&i| &self.terms[i])
    }

    /// Returns the term with canonical text `text` for modification.
    ///
    /// The operator itself must not be changed through this reference.
    fn get_mut(&mut self, text: &str) -> Option<&mut MatchingTerm> {
        let position = *self.index.get(text)?;
        self.terms.get_mut(position)
    }

    /// Appends a weighting model to the operator with canonical text `text`.
    ///
    /// Returns false if no such operator exists.
    pub fn add_weighting_model(&mut self, text: &str, model: WeightingModelRef) -> bool {
        match self.get_mut(text) {
            Some(term) => {
                term.properties.weighting_models.push(model);
                true
            }
            None => false,
        }
    }

    /// Assigns `model` to every term that has no weighting model yet.
    pub fn set_default_weighting_model(&mut self, model: &WeightingModelRef) {
        let mut assigned = 0;
        for term in &mut self.terms {
            if term.properties.weighting_models.is_empty() {
                term.properties.weighting_models.push(model.clone());
                assigned += 1;
            }
        }
        debug!(model = %model, assigned, "applied default weighting model");
    }

    /// Divides every weight by the largest weight.
    ///
    /// Does nothing if the largest weight is not positive.
    pub fn normalise_weights(&mut self) {
        let max = self
            .terms
            .iter()
            .map(|t| t.properties.weight)
            .fold(f64::NEG_INFINITY, f64::max);
        if max <= 0.0 || !max.is_finite() {
            return;
        }
        for term in &mut self.terms {
            term.properties.weight /= max;
        }
    }

    /// Removes the operator with canonical text `text`, keeping the order of
    /// the remaining terms.
    pub fn remove(&mut self, text: &str) -> Option<MatchingTerm> {
        let position = self.index.remove(text)?;
        let removed = self.terms.remove(position);
        for slot in self.index.values_mut() {
            if *slot > position {
                *slot -= 1;
            }
        }
        Some(removed)
    }

    /// Returns the terms in order.
    pub fn matching_terms(&self) -> &[MatchingTerm] {
        &self.terms
    }

    /// Iterates over the terms in order.
    pub fn iter(&self) -> impl Iterator<Item = &MatchingTerm> {
        self.terms.iter()
    }

    /// Canonical texts of all operators, in order.
    pub fn keys(&self) -> Vec<String> {
        self.terms.iter().map(MatchingTerm::key).collect()
    }

    /// Iterates over the terms carrying `tag`, in order.
    pub fn with_tag<'a>(&'a self, tag: &'a str) -> impl Iterator<Item = &'a MatchingTerm> {
        self.terms
            .iter()
            .filter(move |t| t.properties.tags.contains(tag))
    }
}

impl<'a> IntoIterator for &'a MatchingQueryTerms {
    type Item = &'a MatchingTerm;
    type IntoIter = slice::Iter<'a, MatchingTerm>;

    fn into_iter(self) -> Self::IntoIter {
        self.terms.iter()
    }
}
