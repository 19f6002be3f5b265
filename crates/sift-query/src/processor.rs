//! End-to-end query processing.
//!
//! A [`QueryProcessor`] turns raw query text into compiled match-terms:
//! parse, extract control directives, normalize with the term pipeline, then
//! compile.

use std::{
    collections::{BTreeMap, BTreeSet},
    sync::Arc,
};

use sift_config::Config;
use sift_matching::MatchingQueryTerms;
use sift_terms::{PipelineError, TermPipeline, build_pipeline_with_limit};
use tracing::debug;

use crate::{
    ast::Query,
    compile::CompileOptions,
    error::QueryError,
    parser::parse,
};

/// The result of processing one query.
#[derive(Debug, Clone)]
pub struct ProcessedQuery {
    /// The normalized query, without control clauses.
    pub query: Query,
    /// Control directives found in the query.
    pub controls: BTreeMap<String, String>,
    /// Compiled match-terms.
    pub terms: MatchingQueryTerms,
}

/// Processes raw queries with a shared term pipeline.
#[derive(Debug, Clone)]
pub struct QueryProcessor {
    /// Normalization pipeline shared by every query.
    pipeline: Arc<TermPipeline>,
    /// Lower-cased field names treated as controls.
    controls: BTreeSet<String>,
    /// Lower-case tokens during compilation.
    lowercase: bool,
    /// Fail queries that normalize to nothing.
    reject_empty: bool,
}

impl QueryProcessor {
    /// Creates a processor with no controls, lower-casing and accepting empty
    /// queries.
    pub fn new(pipeline: Arc<TermPipeline>) -> Self {
        Self {
            pipeline,
            controls: BTreeSet::new(),
            lowercase: true,
            reject_empty: false,
        }
    }

    /// Builds a processor from configuration.
    ///
    /// Fails if a configured pipeline stage is unknown.
    pub fn from_config(config: &Config) -> Result<Self, PipelineError> {
        let pipeline =
            build_pipeline_with_limit(&config.pipeline.stages, config.pipeline.max_term_length)?;
        Ok(Self::new(Arc::new(pipeline))
            .with_controls(&config.query.controls)
            .lowercase(config.query.lowercase)
            .reject_empty(config.query.reject_empty))
    }

    /// Adds field names to treat as control directives.
    pub fn with_controls<S: AsRef<str>>(mut self, names: &[S]) -> Self {
        self.controls
            .extend(names.iter().map(|name| name.as_ref().to_lowercase()));
        self
    }

    /// Sets whether tokens are lower-cased during compilation.
    pub fn lowercase(mut self, lowercase: bool) -> Self {
        self.lowercase = lowercase;
        self
    }

    /// Sets whether a query with no surviving terms is an error.
    pub fn reject_empty(mut self, reject: bool) -> Self {
        self.reject_empty = reject;
        self
    }

    /// Returns the shared pipeline.
    pub fn pipeline(&self) -> &Arc<TermPipeline> {
        &self.pipeline
    }

    /// Processes one query.
    pub fn process(&self, text: &str) -> Result<ProcessedQuery, QueryError> {
        let mut query = parse(text)?;

        let mut controls = BTreeMap::new();
        query.collect_controls(&self.controls, &mut controls);

        if !query.apply_pipeline(&self.pipeline) && self.reject_empty {
            return Err(QueryError::empty(text));
        }

        let mut terms = MatchingQueryTerms::new();
        if let Some(qid) = controls.get("qid") {
            terms.set_query_id(qid.as_str());
        }
        query.compile_with(&mut terms, &CompileOptions::default().lowercase(self.lowercase));

        debug!(
            query = text,
            controls = controls.len(),
            operators = terms.len(),
            "processed query"
        );
        Ok(ProcessedQuery {
            query,
            controls,
            terms,
        })
    }
}

#[cfg(test)]
mod tests {
    use sift_terms::{SStemmer, Stopwords};

    use super::*;
    use crate::error::QueryErrorKind;

    fn stopping() -> QueryProcessor {
        let pipeline = TermPipeline::new()
            .with_stage(Stopwords::from_words(&["the", "of", "and"]))
            .with_stage(SStemmer);
        QueryProcessor::new(Arc::new(pipeline))
    }

    #[test]
    fn processes_plain_query() {
        let processed = stopping().process("The Zebras of Cities").unwrap();
        assert_eq!(processed.terms.keys(), vec!["zebra", "cit"]);
        assert_eq!(processed.query.to_string(), "zebra cit");
        assert!(processed.controls.is_empty());
    }

    #[test]
    fn extracts_controls_before_normalizing() {
        let processor = stopping().with_controls(&["start", "QID"]);
        let processed = processor
            .process("start:10 qid:Q7 zebras title:stripes")
            .unwrap();
        assert_eq!(processed.controls.get("start").map(String::as_str), Some("10"));
        assert_eq!(processed.terms.query_id(), Some("Q7"));
        assert_eq!(processed.terms.keys(), vec!["zebra", "title:strip"]);
    }

    #[test]
    fn empty_query_allowed_by_default() {
        let processed = stopping().process("the of").unwrap();
        assert!(processed.terms.is_empty());
        assert!(processed.query.is_empty());
    }

    #[test]
    fn empty_query_rejected() {
        let err = stopping().reject_empty(true).process("the of").unwrap_err();
        assert!(matches!(err.kind, QueryErrorKind::Empty));
        assert_eq!(err.query.as_deref(), Some("the of"));
    }

    #[test]
    fn syntax_errors_propagate() {
        let err = stopping().process("{zebra").unwrap_err();
        assert!(matches!(err.kind, QueryErrorKind::Parse { .. }));
    }

    #[test]
    fn from_config() {
        let config = Config::from_toml(
            r#"
[pipeline]
stages = ["lowercase"]

[query]
lowercase = false
controls = ["end"]
"#,
        )
        .unwrap();
        let processor = QueryProcessor::from_config(&config).unwrap();
        assert_eq!(processor.pipeline().stage_names(), vec!["lowercase"]);

        let processed = processor.process("Zebras END:5").unwrap();
        assert_eq!(processed.terms.keys(), vec!["zebras"]);
        assert_eq!(processed.controls.get("end").map(String::as_str), Some("5"));
    }

    #[test]
    fn from_config_unknown_stage() {
        let mut config = Config::default();
        config.pipeline.stages = vec!["porter".into()];
        let err = QueryProcessor::from_config(&config).unwrap_err();
        assert_eq!(err, PipelineError::UnknownStage("porter".into()));
    }
}
