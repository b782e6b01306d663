//! Configuration system for seek.
//!
//! seek reads TOML files named `.seek.toml`. Configuration is resolved by walking up the
//! directory tree from the working directory, collecting any `.seek.toml` files found,
//! then loading `~/.seek.toml` as the global config with lowest precedence.

#![warn(missing_docs)]

mod discovery;
mod error;
mod merge;
mod parse;
#[cfg(test)]
mod test_support;

use std::path::{Path, PathBuf};

pub use discovery::{CONFIG_FILENAME, discover_config_files, global_config_path, is_global_config};
pub use error::ConfigError;
pub use merge::{ParsedConfig, merge_configs};
pub use parse::{
    RawConfig, RawQuerySettings, RawSearchSettings, is_root_config, parse_config_file,
    parse_config_str,
};
use seek_query::SearchType;
use seek_stream::SelectPath;
use serde::Serialize;

/// Default result-unit limit.
pub const DEFAULT_LIMIT: usize = 500;

/// Fully merged configuration.
#[derive(Debug, Clone, Default)]
pub struct Config {
    /// Search pipeline settings.
    pub search: SearchSettings,
    /// Query parsing settings.
    pub query: QuerySettings,
}

impl Config {
    /// Loads configuration by discovering and merging all relevant `.seek.toml` files.
    ///
    /// Returns `Ok(Config::default())` if no configuration files are found.
    pub fn load(cwd: &Path) -> Result<Self, ConfigError> {
        let config_files = discover_config_files(cwd);
        Self::load_from_files(&config_files)
    }

    /// Loads configuration from a specific list of config file paths, highest precedence
    /// first.
    pub fn load_from_files(files: &[PathBuf]) -> Result<Self, ConfigError> {
        let parsed = files
            .iter()
            .map(|path| {
                Ok(ParsedConfig {
                    path: path.clone(),
                    config: parse_config_file(path)?,
                })
            })
            .collect::<Result<Vec<_>, ConfigError>>()?;

        merge_configs(&parsed)
    }

    /// Serializes the effective settings in `.seek.toml` format.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        let serializable = SerializableConfig {
            search: SerializableSearch {
                limit: self.search.limit,
                select: self.search.select.as_ref().map(ToString::to_string),
            },
            query: &self.query,
        };
        toml::to_string_pretty(&serializable).map_err(|source| ConfigError::Serialize { source })
    }
}

/// The `[search]` section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchSettings {
    /// Result-unit limit applied by the limiting sink.
    pub limit: usize,
    /// Selector applied to results, if any.
    pub select: Option<SelectPath>,
}

impl Default for SearchSettings {
    fn default() -> Self {
        Self {
            limit: DEFAULT_LIMIT,
            select: None,
        }
    }
}

/// The `[query]` section.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct QuerySettings {
    /// Dialect for unquoted patterns.
    pub search_type: SearchType,
}

/// Internal struct for TOML serialization of settings.
#[derive(Serialize)]
struct SerializableConfig<'a> {
    /// Search settings.
    search: SerializableSearch,
    /// Query settings.
    query: &'a QuerySettings,
}

/// Search settings with the selector rendered as text.
#[derive(Serialize)]
struct SerializableSearch {
    /// Result-unit limit.
    limit: usize,
    /// Select path, omitted when unset.
    #[serde(skip_serializing_if = "Option::is_none")]
    select: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = Config::default();
        assert_eq!(config.search.limit, 500);
        assert!(config.search.select.is_none());
        assert_eq!(config.query.search_type, SearchType::Regex);
    }

    #[test]
    fn to_toml_round_trips() {
        let config = Config {
            search: SearchSettings {
                limit: 20,
                select: Some(SelectPath::Symbol(Some("class".to_string()))),
            },
            query: QuerySettings {
                search_type: SearchType::Literal,
            },
        };

        let text = config.to_toml().unwrap();
        let raw = parse_config_str(&text, Path::new("rendered.toml")).unwrap();
        let search = raw.search.unwrap();
        assert_eq!(search.limit, Some(20));
        assert_eq!(search.select.as_deref(), Some("symbol.class"));
        assert_eq!(raw.query.unwrap().search_type, Some(SearchType::Literal));
    }

    #[test]
    fn to_toml_omits_unset_select() {
        let text = Config::default().to_toml().unwrap();
        assert!(text.contains("limit = 500"));
        assert!(text.contains("search_type = \"regex\""));
        assert!(!text.contains("select"));
    }
}
