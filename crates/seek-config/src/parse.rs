//! Configuration file parsing.
//!
//! Parses individual `.seek.toml` files into `RawConfig` structures whose fields stay
//! optional until merging.

use std::{fs, path::Path};

use seek_query::SearchType;
use serde::Deserialize;

use crate::ConfigError;

/// Raw configuration as parsed directly from a TOML file.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RawConfig {
    /// When true, stop discovery here and ignore parent and global configs.
    pub root: Option<bool>,
    /// Search settings section.
    pub search: Option<RawSearchSettings>,
    /// Query settings section.
    pub query: Option<RawQuerySettings>,
}

/// Raw `[search]` section.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RawSearchSettings {
    /// Result-unit limit.
    pub limit: Option<usize>,
    /// Default select path, unvalidated.
    pub select: Option<String>,
}

/// Raw `[query]` section.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RawQuerySettings {
    /// Dialect for unquoted patterns.
    pub search_type: Option<SearchType>,
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

/// Checks if a config file has `root = true` set.
///
/// Returns false if the file cannot be read or parsed.
pub fn is_root_config(path: &Path) -> bool {
    let Ok(contents) = fs::read_to_string(path) else {
        return false;
    };
    let Ok(config) = toml::from_str::<RawConfig>(&contents) else {
        return false;
    };
    config.root == Some(true)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_config() {
        let config = parse_config_str("", Path::new("test.toml")).unwrap();
        assert!(config.root.is_none());
        assert!(config.search.is_none());
        assert!(config.query.is_none());
    }

    #[test]
    fn full_config() {
        let toml = r#"
root = true

[search]
limit = 30
select = "symbol.function"

[query]
search_type = "literal"
"#;
        let config = parse_config_str(toml, Path::new("test.toml")).unwrap();
        assert_eq!(config.root, Some(true));
        let search = config.search.unwrap();
        assert_eq!(search.limit, Some(30));
        assert_eq!(search.select.as_deref(), Some("symbol.function"));
        assert_eq!(config.query.unwrap().search_type, Some(SearchType::Literal));
    }

    #[test]
    fn partial_section() {
        let config = parse_config_str("[search]\nlimit = 7\n", Path::new("test.toml")).unwrap();
        let search = config.search.unwrap();
        assert_eq!(search.limit, Some(7));
        assert!(search.select.is_none());
    }

    #[test]
    fn bad_search_type() {
        let err = parse_config_str("[query]\nsearch_type = \"glob\"\n", Path::new("x.toml"))
            .unwrap_err();
        assert!(matches!(err, ConfigError::ParseToml { .. }));
        assert!(err.to_string().contains("x.toml"));
    }

    #[test]
    fn negative_limit_is_a_parse_error() {
        let err = parse_config_str("[search]\nlimit = -1\n", Path::new("x.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::ParseToml { .. }));
    }
}
