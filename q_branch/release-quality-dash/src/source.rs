//! Deployment retrieval port and the stale-load guard.
//!
//! Fetching happens outside the engine. A [`DeploymentSource`] resolves the
//! full record collection for one environment; the [`LoadTracker`] decides
//! whether a completed fetch may still replace the dashboard's records.

use crate::error::{DashError, Result};
use crate::record::DeploymentRecord;
use serde_json::Value;
use std::future::Future;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Parse a deployments response body.
///
/// Accepted shapes: `{"deployments": [...]}`, `{"deploymentsFull": [...]}`
/// or a bare array. Any other shape yields no records. Array elements that
/// are not deployment objects are skipped.
pub fn parse_deployments_payload(body: &str) -> Result<Vec<DeploymentRecord>> {
    let value: Value = serde_json::from_str(body)?;
    Ok(records_from_value(value))
}

pub fn records_from_value(value: Value) -> Vec<DeploymentRecord> {
    let list = match value {
        Value::Array(items) => items,
        Value::Object(mut map) => {
            let picked = ["deployments", "deploymentsFull"]
                .into_iter()
                .find_map(|key| map.remove(key).filter(is_present));
            match picked {
                Some(Value::Array(items)) => items,
                _ => Vec::new(),
            }
        }
        _ => Vec::new(),
    };

    let total = list.len();
    let records: Vec<DeploymentRecord> = list
        .into_iter()
        .enumerate()
        .filter_map(|(i, item)| match serde_json::from_value(item) {
            Ok(record) => Some(record),
            Err(e) => {
                debug!(index = i, error = %e, "Skipping malformed deployment entry");
                None
            }
        })
        .collect();
    debug!(total, parsed = records.len(), "Parsed deployments payload");
    records
}

/// Whether a wrapper field carries a value worth using.
fn is_present(v: &Value) -> bool {
    match v {
        Value::Null | Value::Bool(false) => false,
        Value::String(s) => !s.is_empty(),
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        _ => true,
    }
}

/// Where deployment records for an environment come from.
pub trait DeploymentSource {
    fn fetch(&self, environment: &str) -> impl Future<Output = Result<Vec<DeploymentRecord>>> + Send;
}

/// Reads payloads from disk.
#[derive(Debug, Clone)]
pub enum FileSource {
    /// One payload file serves every environment.
    File(PathBuf),
    /// `<dir>/<environment>.json` per environment.
    Directory(PathBuf),
}

impl FileSource {
    pub fn path_for(&self, environment: &str) -> PathBuf {
        match self {
            FileSource::File(path) => path.clone(),
            FileSource::Directory(dir) => dir.join(format!("{environment}.json")),
        }
    }
}

impl DeploymentSource for FileSource {
    fn fetch(&self, environment: &str) -> impl Future<Output = Result<Vec<DeploymentRecord>>> + Send {
        let path = self.path_for(environment);
        async move { read_payload(&path).await }
    }
}

pub async fn read_payload(path: &Path) -> Result<Vec<DeploymentRecord>> {
    let body = tokio::fs::read_to_string(path)
        .await
        .map_err(|source| DashError::Io {
            path: path.to_path_buf(),
            source,
        })?;
    parse_deployments_payload(&body)
}

/// Identifies one issued load.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadTicket {
    generation: u64,
    environment: String,
}

impl LoadTicket {
    pub fn environment(&self) -> &str {
        &self.environment
    }
}

/// Issues load tickets; only the most recent one is accepted.
#[derive(Debug, Default)]
pub struct LoadTracker {
    generation: u64,
    selection: Option<String>,
}

impl LoadTracker {
    /// Start a load for `environment`, superseding every earlier ticket.
    pub fn begin(&mut self, environment: impl Into<String>) -> LoadTicket {
        self.generation += 1;
        let environment = environment.into();
        self.selection = Some(environment.clone());
        LoadTicket {
            generation: self.generation,
            environment,
        }
    }

    pub fn selection(&self) -> Option<&str> {
        self.selection.as_deref()
    }

    pub fn is_current(&self, ticket: &LoadTicket) -> bool {
        ticket.generation == self.generation
            && self.selection.as_deref() == Some(ticket.environment.as_str())
    }

    /// Like [`is_current`](Self::is_current), logging rejected tickets.
    pub fn accept(&self, ticket: &LoadTicket) -> bool {
        let current = self.is_current(ticket);
        if !current {
            warn!(
                environment = %ticket.environment,
                generation = ticket.generation,
                latest = self.generation,
                "Discarding stale deployments response"
            );
        }
        current
    }
}
