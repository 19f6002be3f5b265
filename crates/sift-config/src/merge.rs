//! Configuration merging.
//!
//! Merges multiple `RawConfig` files into a single resolved `Config`, applying
//! precedence rules and validating the result.

use std::path::PathBuf;

use crate::{
    Config, ConfigError, IndexingSettings, PipelineSettings, QuerySettings,
    parse::{RawConfig, RawIndexingSettings, RawPipelineSettings, RawQuerySettings},
};

/// A parsed config file with its source path.
pub struct ParsedConfig {
    /// Path to the config file.
    pub path: PathBuf,
    /// Parsed raw configuration.
    pub config: RawConfig,
}

/// Merges multiple configuration files into a single resolved `Config`.
///
/// Configs should be provided in precedence order: highest precedence first.
/// Every setting takes the first defined value; lists are replaced, never
/// concatenated.
pub fn merge_configs(configs: &[ParsedConfig]) -> Result<Config, ConfigError> {
    let mut config = Config::default();

    // Iterate in reverse (lowest precedence first) so higher precedence overwrites
    for parsed in configs.iter().rev() {
        apply_raw_config(&mut config, &parsed.config);
    }

    validate(&config)?;
    Ok(config)
}

/// Applies every present section of `raw` to `config`.
pub(crate) fn apply_raw_config(config: &mut Config, raw: &RawConfig) {
    if let Some(ref pipeline) = raw.pipeline {
        apply_raw_pipeline(&mut config.pipeline, pipeline);
    }
    if let Some(ref query) = raw.query {
        apply_raw_query(&mut config.query, query);
    }
    if let Some(ref indexing) = raw.indexing {
        apply_raw_indexing(&mut config.indexing, indexing);
    }
}

/// Applies raw pipeline settings to result.
fn apply_raw_pipeline(result: &mut PipelineSettings, raw: &RawPipelineSettings) {
    if let Some(ref v) = raw.stages {
        result.stages = v.clone();
    }
    if let Some(v) = raw.max_term_length {
        result.max_term_length = v;
    }
}

/// Applies raw query settings to result.
fn apply_raw_query(result: &mut QuerySettings, raw: &RawQuerySettings) {
    if let Some(v) = raw.lowercase {
        result.lowercase = v;
    }
    if let Some(v) = raw.reject_empty {
        result.reject_empty = v;
    }
    if let Some(ref v) = raw.controls {
        result.controls = v.clone();
    }
}

/// Applies raw indexing settings to result.
fn apply_raw_indexing(result: &mut IndexingSettings, raw: &RawIndexingSettings) {
    if let Some(v) = raw.max_docno_length {
        result.max_docno_length = v;
    }
    if let Some(v) = raw.flush_every {
        result.flush_every = v;
    }
}

/// Rejects settings that cannot be used.
pub(crate) fn validate(config: &Config) -> Result<(), ConfigError> {
    let positive = [
        ("pipeline.max_term_length", config.pipeline.max_term_length),
        ("indexing.max_docno_length", config.indexing.max_docno_length),
        ("indexing.flush_every", config.indexing.flush_every),
    ];
    for (key, value) in positive {
        if value == 0 {
            return Err(ConfigError::InvalidValue {
                key: key.to_string(),
                message: "must be greater than zero".to_string(),
            });
        }
    }
    Ok(())
}
