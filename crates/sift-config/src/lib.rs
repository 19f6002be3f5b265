//! Configuration system for sift.
//!
//! sift uses TOML configuration files, conventionally named `sift.toml`. A
//! configuration has three sections:
//!
//! ```toml
//! [pipeline]
//! stages = ["stopwords", "sstemmer"]
//! max_term_length = 40
//!
//! [query]
//! lowercase = true
//! reject_empty = false
//! controls = ["start", "end"]
//!
//! [indexing]
//! max_docno_length = 20
//! flush_every = 1000
//! ```
//!
//! Every setting is optional. Several files can be layered with
//! [`Config::load_from_files`], where the first file has the highest
//! precedence.

#![warn(missing_docs)]

mod error;
mod merge;
mod parse;

use std::path::{Path, PathBuf};

pub use error::ConfigError;
pub use merge::{ParsedConfig, merge_configs};
pub use parse::{
    RawConfig, RawIndexingSettings, RawPipelineSettings, RawQuerySettings, parse_config_file,
    parse_config_str,
};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Conventional configuration file name.
pub const CONFIG_FILENAME: &str = "sift.toml";

/// Default maximum document identifier length in bytes.
pub const DEFAULT_MAX_DOCNO_LENGTH: usize = 20;

/// Default number of documents per single-pass run.
pub const DEFAULT_FLUSH_EVERY: usize = 1000;

/// Default byte limit of the `remove-long` stage.
pub const DEFAULT_MAX_TERM_LENGTH: usize = 40;

/// Fully resolved configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Term pipeline settings.
    pub pipeline: PipelineSettings,
    /// Query processing settings.
    pub query: QuerySettings,
    /// Indexing collaborator settings.
    pub indexing: IndexingSettings,
}

impl Config {
    /// Loads configuration from a single file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        Self::load_from_files(&[path.to_path_buf()])
    }

    /// Loads configuration from a list of config file paths.
    ///
    /// Files should be provided in precedence order: highest precedence first.
    /// Returns `Ok(Config::default())` if the list is empty.
    pub fn load_from_files(files: &[PathBuf]) -> Result<Self, ConfigError> {
        let parsed: Vec<ParsedConfig> = files
            .iter()
            .map(|path| {
                let config = parse_config_file(path)?;
                Ok(ParsedConfig {
                    path: path.clone(),
                    config,
                })
            })
            .collect::<Result<Vec<_>, ConfigError>>()?;

        let config = merge_configs(&parsed)?;
        debug!(files = files.len(), "loaded configuration");
        Ok(config)
    }

    /// Parses configuration from a TOML string, filling in defaults.
    pub fn from_toml(contents: &str) -> Result<Self, ConfigError> {
        let raw = parse_config_str(contents, Path::new("<string>"))?;
        let mut config = Self::default();
        merge::apply_raw_config(&mut config, &raw);
        merge::validate(&config)?;
        Ok(config)
    }

    /// Serializes the effective settings to TOML format.
    pub fn settings_to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }
}

/// Term pipeline settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineSettings {
    /// Stage names in application order.
    pub stages: Vec<String>,
    /// Byte limit of the `remove-long` stage.
    pub max_term_length: usize,
}

impl Default for PipelineSettings {
    fn default() -> Self {
        Self {
            stages: vec![String::from("sstemmer")],
            max_term_length: DEFAULT_MAX_TERM_LENGTH,
        }
    }
}

/// Query processing settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct QuerySettings {
    /// Lower-case terms during compilation.
    pub lowercase: bool,
    /// Fail queries whose terms are all removed by the pipeline.
    pub reject_empty: bool,
    /// Field names treated as control directives rather than fields.
    pub controls: Vec<String>,
}

impl Default for QuerySettings {
    fn default() -> Self {
        Self {
            lowercase: true,
            reject_empty: false,
            controls: Vec::new(),
        }
    }
}

/// Settings for the indexing collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct IndexingSettings {
    /// Maximum document identifier length in bytes.
    pub max_docno_length: usize,
    /// Documents per run for the single-pass indexers.
    pub flush_every: usize,
}

impl Default for IndexingSettings {
    fn default() -> Self {
        Self {
            max_docno_length: DEFAULT_MAX_DOCNO_LENGTH,
            flush_every: DEFAULT_FLUSH_EVERY,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = Config::default();
        assert_eq!(config.pipeline.stages, vec!["sstemmer"]);
        assert_eq!(config.pipeline.max_term_length, 40);
        assert!(config.query.lowercase);
        assert!(!config.query.reject_empty);
        assert!(config.query.controls.is_empty());
        assert_eq!(config.indexing.max_docno_length, 20);
        assert_eq!(config.indexing.flush_every, 1000);
    }

    #[test]
    fn from_toml_fills_defaults() {
        let config = Config::from_toml(
            r#"
[query]
controls = "start"
"#,
        )
        .unwrap();
        assert_eq!(config.query.controls, vec!["start"]);
        assert!(config.query.lowercase);
        assert_eq!(config.indexing, IndexingSettings::default());
    }

    #[test]
    fn from_toml_validates() {
        let err = Config::from_toml("[pipeline]\nmax_term_length = 0\n").unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { .. }));
    }

    #[test]
    fn settings_round_trip() {
        let mut config = Config::default();
        config.query.controls = vec!["start".into()];
        config.indexing.max_docno_length = 32;

        let text = config.settings_to_toml().unwrap();
        assert!(text.contains("[pipeline]"));
        assert!(text.contains("max_docno_length = 32"));

        assert_eq!(Config::from_toml(&text).unwrap(), config);
    }
}
