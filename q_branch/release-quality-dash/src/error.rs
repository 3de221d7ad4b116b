//! Errors at the edges of the engine: payload loading, config, user input.
//!
//! The filter/sort/aggregate/paginate pipeline itself never fails.

use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum DashError {
    #[error("IO error reading {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid deployments payload: {0}")]
    Payload(#[from] serde_json::Error),

    #[error("invalid config file {path}: {source}")]
    Config {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("invalid date {0:?}, expected YYYY-MM-DD")]
    InvalidDate(String),

    #[error("unknown sort key {0:?}")]
    UnknownSortKey(String),
}

pub type Result<T> = std::result::Result<T, DashError>;
