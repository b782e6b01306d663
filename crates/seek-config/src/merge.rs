//! Configuration merging.
//!
//! Merges multiple `RawConfig` files into a single `Config`, validating values as they
//! are applied so errors name the file they came from.

use std::path::{Path, PathBuf};

use seek_stream::SelectPath;

use crate::{
    Config, ConfigError, QuerySettings, SearchSettings,
    parse::{RawConfig, RawQuerySettings, RawSearchSettings},
};

/// A parsed config file with its source path.
#[derive(Debug)]
pub struct ParsedConfig {
    /// Path to the config file.
    pub path: PathBuf,
    /// Parsed raw configuration.
    pub config: RawConfig,
}

/// Merges multiple configuration files into a single `Config`.
///
/// Configs should be provided in precedence order: highest precedence first (closest to
/// the working directory), lowest precedence last (global config). For every field the
/// first file that sets it wins.
pub fn merge_configs(configs: &[ParsedConfig]) -> Result<Config, ConfigError> {
    let mut search = SearchSettings::default();
    let mut query = QuerySettings::default();

    // Lowest precedence first so closer files overwrite.
    for parsed in configs.iter().rev() {
        if let Some(raw) = &parsed.config.search {
            apply_raw_search(&mut search, raw, &parsed.path)?;
        }
        if let Some(raw) = &parsed.config.query {
            apply_raw_query(&mut query, raw);
        }
    }

    Ok(Config { search, query })
}

/// Applies a `[search]` section, validating each value.
fn apply_raw_search(
    result: &mut SearchSettings,
    raw: &RawSearchSettings,
    path: &Path,
) -> Result<(), ConfigError> {
    if let Some(limit) = raw.limit {
        if limit == 0 {
            return Err(ConfigError::InvalidLimit {
                path: path.to_path_buf(),
            });
        }
        result.limit = limit;
    }
    if let Some(select) = &raw.select {
        let parsed = select
            .parse::<SelectPath>()
            .map_err(|source| ConfigError::InvalidSelect {
                path: path.to_path_buf(),
                source,
            })?;
        result.select = Some(parsed);
    }
    Ok(())
}

/// Applies a `[query]` section.
fn apply_raw_query(result: &mut QuerySettings, raw: &RawQuerySettings) {
    if let Some(search_type) = raw.search_type {
        result.search_type = search_type;
    }
}

#[cfg(test)]
mod tests {
    use seek_query::SearchType;

    use super::*;
    use crate::parse::parse_config_str;

    fn parsed(path: &str, toml: &str) -> ParsedConfig {
        ParsedConfig {
            path: PathBuf::from(path),
            config: parse_config_str(toml, Path::new(path)).unwrap(),
        }
    }

    #[test]
    fn empty_gives_defaults() {
        let config = merge_configs(&[]).unwrap();
        assert_eq!(config.search.limit, 500);
        assert!(config.search.select.is_none());
        assert_eq!(config.query.search_type, SearchType::Regex);
    }

    #[test]
    fn closest_wins_per_field() {
        let configs = [
            parsed("/p/a/.seek.toml", "[search]\nlimit = 10\n"),
            parsed(
                "/p/.seek.toml",
                "[search]\nlimit = 99\nselect = \"file\"\n[query]\nsearch_type = \"literal\"\n",
            ),
        ];

        let config = merge_configs(&configs).unwrap();
        assert_eq!(config.search.limit, 10);
        assert_eq!(config.search.select, Some(SelectPath::File));
        assert_eq!(config.query.search_type, SearchType::Literal);
    }

    #[test]
    fn zero_limit_is_rejected() {
        let err = merge_configs(&[parsed("/p/.seek.toml", "[search]\nlimit = 0\n")]).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidLimit { .. }));
        assert_eq!(
            err.to_string(),
            "invalid search.limit in /p/.seek.toml: must be greater than zero"
        );
    }

    #[test]
    fn bad_select_is_rejected() {
        let err = merge_configs(&[parsed("/p/.seek.toml", "[search]\nselect = \"nope\"\n")])
            .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidSelect { .. }));
    }

    #[test]
    fn invalid_value_in_shadowed_file_still_fails() {
        let configs = [
            parsed("/p/a/.seek.toml", "[search]\nlimit = 10\n"),
            parsed("/p/.seek.toml", "[search]\nlimit = 0\n"),
        ];
        assert!(merge_configs(&configs).is_err());
    }
}
