//! Dashboard configuration, loaded from an optional YAML file.
//!
//! Every field has a default, so an empty file or no file at all yields a
//! working configuration. Set `RQD_CONFIG` to point at a file when no path is
//! passed explicitly.

use crate::aggregate::{trend::MAX_DAY_BUCKETS, AggregateLimits};
use crate::error::{DashError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const CONFIG_ENV_VAR: &str = "RQD_CONFIG";

/// Canvas dimensions in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CanvasSize {
    pub width: u32,
    pub height: u32,
}

impl CanvasSize {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChartSizes {
    /// Status, type, actor and duration charts.
    pub narrow: CanvasSize,
    /// The timeline.
    pub wide: CanvasSize,
}

impl Default for ChartSizes {
    fn default() -> Self {
        Self {
            narrow: CanvasSize::new(480, 220),
            wide: CanvasSize::new(960, 220),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    pub page_size: usize,
    /// Initial date range: the last N days up to today.
    pub lookback_days: u32,
    pub search_debounce_ms: u64,
    pub top_actors: usize,
    pub max_day_buckets: usize,
    pub charts: ChartSizes,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            page_size: 25,
            lookback_days: 30,
            search_debounce_ms: 300,
            top_actors: 10,
            max_day_buckets: MAX_DAY_BUCKETS,
            charts: ChartSizes::default(),
        }
    }
}

impl DashboardConfig {
    /// Load from `path`, else from `$RQD_CONFIG`, else defaults.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match config_path(path) {
            Some(p) => Self::from_file(&p),
            None => Ok(Self::default()),
        }
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path).map_err(|source| DashError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_yaml(&contents).map_err(|source| DashError::Config {
            path: path.to_path_buf(),
            source,
        })?;
        tracing::debug!(path = %path.display(), "Loaded dashboard config");
        Ok(config)
    }

    fn from_yaml(contents: &str) -> std::result::Result<Self, serde_yaml::Error> {
        // An empty document deserializes as null, not as an empty mapping.
        if contents.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(contents)
    }

    pub fn search_debounce(&self) -> Duration {
        Duration::from_millis(self.search_debounce_ms)
    }

    pub fn aggregate_limits(&self) -> AggregateLimits {
        AggregateLimits {
            top_actors: self.top_actors,
            max_day_buckets: self.max_day_buckets,
        }
    }
}

/// The explicit path if given, otherwise `$RQD_CONFIG` when set and non-empty.
pub fn config_path(explicit: Option<&Path>) -> Option<PathBuf> {
    explicit.map(Path::to_path_buf).or_else(|| {
        std::env::var_os(CONFIG_ENV_VAR)
            .filter(|v| !v.is_empty())
            .map(PathBuf::from)
    })
}
