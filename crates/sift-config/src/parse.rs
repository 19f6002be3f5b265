//! Configuration file parsing.
//!
//! Parses individual `sift.toml` files into intermediate `RawConfig` structures
//! that preserve the optional nature of all fields before merging.

use std::{fs, path::Path};

use serde::Deserialize;
use serde_with::{OneOrMany, serde_as};

use crate::ConfigError;

/// Raw configuration as parsed directly from a TOML file.
///
/// All fields are optional to support partial configs that will be merged.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RawConfig {
    /// Term pipeline section.
    pub pipeline: Option<RawPipelineSettings>,
    /// Query processing section.
    pub query: Option<RawQuerySettings>,
    /// Indexing collaborator section.
    pub indexing: Option<RawIndexingSettings>,
}

/// Raw term pipeline settings.
#[serde_as]
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RawPipelineSettings {
    /// Stage names in application order.
    /// Accepts either a single string or an array of strings.
    #[serde_as(as = "Option<OneOrMany<_>>")]
    pub stages: Option<Vec<String>>,
    /// Byte limit of the `remove-long` stage.
    pub max_term_length: Option<usize>,
}

/// Raw query processing settings.
#[serde_as]
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RawQuerySettings {
    /// Lower-case terms during compilation.
    pub lowercase: Option<bool>,
    /// Fail queries whose terms are all removed by the pipeline.
    pub reject_empty: Option<bool>,
    /// Field names treated as control directives.
    #[serde_as(as = "Option<OneOrMany<_>>")]
    pub controls: Option<Vec<String>>,
}

/// Raw indexing settings.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RawIndexingSettings {
    /// Maximum document identifier length in bytes.
    pub max_docno_length: Option<usize>,
    /// Documents per run for the single-pass indexers.
    pub flush_every: Option<usize>,
}

/// Parses a configuration file from disk.
pub fn parse_config_file(path: &Path) -> Result<RawConfig, ConfigError> {
    let contents = fs::read_to_string(path).map_err(|source| ConfigError::ReadFile {
        path: path.to_path_buf(),
        source,
    })?;

    parse_config_str(&contents, path)
}

/// Parses configuration from a TOML string.
///
/// The `path` parameter is used for error reporting.
pub fn parse_config_str(contents: &str, path: &Path) -> Result<RawConfig, ConfigError> {
    toml::from_str(contents).map_err(|source| ConfigError::ParseToml {
        path: path.to_path_buf(),
        source,
    })
}
