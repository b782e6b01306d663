//! Error types for seek configuration.

use std::{io, path::PathBuf};

use seek_stream::SelectError;
use thiserror::Error;
use toml::{de, ser};

/// Errors that can occur when loading or processing configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read a configuration file.
    #[error("failed to read config file {path}: {source}")]
    ReadFile {
        /// Path to the file that could not be read.
        path: PathBuf,
        /// Underlying I/O error.
        source: io::Error,
    },

    /// Failed to parse TOML configuration.
    #[error("failed to parse config file {path}: {source}")]
    ParseToml {
        /// Path to the file that could not be parsed.
        path: PathBuf,
        /// Underlying TOML parse error.
        source: de::Error,
    },

    /// `search.select` is not a valid select path.
    #[error("invalid search.select in {path}: {source}")]
    InvalidSelect {
        /// Config file containing the value.
        path: PathBuf,
        /// Why the path was rejected.
        source: SelectError,
    },

    /// `search.limit` is zero.
    #[error("invalid search.limit in {path}: must be greater than zero")]
    InvalidLimit {
        /// Config file containing the value.
        path: PathBuf,
    },

    /// Failed to render the effective configuration.
    #[error("failed to serialize config: {source}")]
    Serialize {
        /// Underlying TOML serialization error.
        source: ser::Error,
    },
}
