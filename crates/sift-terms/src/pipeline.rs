//! The ordered stage chain.
//!
//! Stages are applied left to right; the output of one stage is the input of
//! the next. If any stage discards the token the whole chain reports `None`.
//!
//! The stage list is configurable via the `stages` setting in the `[pipeline]`
//! configuration section.

use std::fmt;

use tracing::{debug, trace};

use crate::{
    PipelineError,
    sstemmer::SStemmer,
    stage::{DEFAULT_MAX_TERM_LENGTH, LowerCase, RemoveLong, TermStage},
    stopwords::Stopwords,
};

/// An ordered chain of term stages.
pub struct TermPipeline {
    /// Stages in application order.
    stages: Vec<Box<dyn TermStage>>,
}

impl TermPipeline {
    /// Creates an empty pipeline, which passes every token through unchanged.
    pub fn new() -> Self {
        Self { stages: Vec::new() }
    }

    /// Appends a stage to the end of the chain.
    pub fn with_stage(mut self, stage: impl TermStage + 'static) -> Self {
        self.stages.push(Box::new(stage));
        self
    }

    /// Appends an already boxed stage to the end of the chain.
    pub fn push(&mut self, stage: Box<dyn TermStage>) {
        self.stages.push(stage);
    }

    /// Runs a token through every stage.
    ///
    /// Returns `None` as soon as a stage discards the token.
    pub fn process(&self, term: &str) -> Option<String> {
        let mut current = term.to_string();
        for stage in &self.stages {
            match stage.process(&current) {
                Some(next) => current = next,
                None => {
                    trace!(term, stage = stage.name(), "term discarded");
                    return None;
                }
            }
        }
        Some(current)
    }

    /// Names of the stages in application order.
    pub fn stage_names(&self) -> Vec<&'static str> {
        self.stages.iter().map(|s| s.name()).collect()
    }

    /// Number of stages.
    pub fn len(&self) -> usize {
        self.stages.len()
    }

    /// Returns true if the pipeline has no stages.
    pub fn is_empty(&self) -> bool {
        self.stages.is_empty()
    }
}

impl Default for TermPipeline {
    /// The single-stage "S" stemmer pipeline.
    fn default() -> Self {
        Self::new().with_stage(SStemmer)
    }
}

impl fmt::Debug for TermPipeline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TermPipeline")
            .field("stages", &self.stage_names())
            .finish()
    }
}

/// Parses a stage name into a boxed stage.
///
/// Names are matched case-insensitively. `max_term_length` configures the
/// `remove-long` stage and is ignored by the others. Returns an error if the
/// name is not recognized.
pub fn parse_stage(
    name: &str,
    max_term_length: usize,
) -> Result<Box<dyn TermStage>, PipelineError> {
    match name.to_lowercase().as_str() {
        "lowercase" => Ok(Box::new(LowerCase)),
        "sstemmer" | "s-stemmer" => Ok(Box::new(SStemmer)),
        "stopwords" => Ok(Box::new(Stopwords::english())),
        "remove-long" => {
            if max_term_length == 0 {
                return Err(PipelineError::InvalidParameter {
                    stage: "remove-long".into(),
                    message: "maximum term length must be positive".into(),
                });
            }
            Ok(Box::new(RemoveLong::limit(max_term_length)))
        }
        other => Err(PipelineError::UnknownStage(other.to_string())),
    }
}

/// Builds a pipeline from a list of stage names.
pub fn build_pipeline<S: AsRef<str>>(names: &[S]) -> Result<TermPipeline, PipelineError> {
    build_pipeline_with_limit(names, DEFAULT_MAX_TERM_LENGTH)
}

/// Builds a pipeline from stage names with an explicit `remove-long` limit.
pub fn build_pipeline_with_limit<S: AsRef<str>>(
    names: &[S],
    max_term_length: usize,
) -> Result<TermPipeline, PipelineError> {
    let mut pipeline = TermPipeline::new();
    for name in names {
        pipeline.push(parse_stage(name.as_ref(), max_term_length)?);
    }
    debug!(stages = ?pipeline.stage_names(), "built term pipeline");
    Ok(pipeline)
}
