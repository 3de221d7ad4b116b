//! Deployment record model.
//!
//! Records arrive already parsed from whatever transport the retrieval layer
//! used. Every optional field tolerates absence and `null`; malformed values
//! degrade to "absent" instead of failing the whole payload.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Lifecycle status of a deployment.
///
/// Unrecognized strings are kept verbatim in [`Status::Other`] so they still
/// show up in the status distribution and filter options.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub enum Status {
    Succeeded,
    Failed,
    Fault,
    TimedOut,
    Stopped,
    Aborted,
    InProgress,
    Started,
    Queued,
    PendingApproval,
    Approved,
    Rejected,
    Invalid,
    #[default]
    Unknown,
    Other(String),
}

impl Status {
    pub fn parse(s: &str) -> Self {
        match s {
            "SUCCEEDED" => Status::Succeeded,
            "FAILED" => Status::Failed,
            "FAULT" => Status::Fault,
            "TIMED_OUT" => Status::TimedOut,
            "STOPPED" => Status::Stopped,
            "ABORTED" => Status::Aborted,
            "IN_PROGRESS" => Status::InProgress,
            "STARTED" => Status::Started,
            "QUEUED" => Status::Queued,
            "PENDING_APPROVAL" => Status::PendingApproval,
            "APPROVED" => Status::Approved,
            "REJECTED" => Status::Rejected,
            "INVALID" => Status::Invalid,
            "UNKNOWN" => Status::Unknown,
            other => Status::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Status::Succeeded => "SUCCEEDED",
            Status::Failed => "FAILED",
            Status::Fault => "FAULT",
            Status::TimedOut => "TIMED_OUT",
            Status::Stopped => "STOPPED",
            Status::Aborted => "ABORTED",
            Status::InProgress => "IN_PROGRESS",
            Status::Started => "STARTED",
            Status::Queued => "QUEUED",
            Status::PendingApproval => "PENDING_APPROVAL",
            Status::Approved => "APPROVED",
            Status::Rejected => "REJECTED",
            Status::Invalid => "INVALID",
            Status::Unknown => "UNKNOWN",
            Status::Other(s) => s,
        }
    }

    /// FAILED and FAULT both count as failures in KPIs and the trend chart.
    pub fn is_failure(&self) -> bool {
        matches!(self, Status::Failed | Status::Fault)
    }

    pub fn is_in_flight(&self) -> bool {
        matches!(self, Status::InProgress | Status::Started)
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for Status {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Status {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        lenient::status(deserializer)
    }
}

/// Kind of release. Absent types aggregate under [`UNKNOWN_RELEASE_TYPE`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ReleaseType {
    Hotfix,
    Release,
    Launch,
    Destroy,
    Custom,
    Plan,
    Rollback,
    Other(String),
}

/// Aggregation label for records without a release type.
pub const UNKNOWN_RELEASE_TYPE: &str = "UNKNOWN";

impl ReleaseType {
    pub fn parse(s: &str) -> Self {
        match s {
            "HOTFIX" => ReleaseType::Hotfix,
            "RELEASE" => ReleaseType::Release,
            "LAUNCH" => ReleaseType::Launch,
            "DESTROY" => ReleaseType::Destroy,
            "CUSTOM" => ReleaseType::Custom,
            "PLAN" => ReleaseType::Plan,
            "ROLLBACK" => ReleaseType::Rollback,
            other => ReleaseType::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            ReleaseType::Hotfix => "HOTFIX",
            ReleaseType::Release => "RELEASE",
            ReleaseType::Launch => "LAUNCH",
            ReleaseType::Destroy => "DESTROY",
            ReleaseType::Custom => "CUSTOM",
            ReleaseType::Plan => "PLAN",
            ReleaseType::Rollback => "ROLLBACK",
            ReleaseType::Other(s) => s,
        }
    }
}

impl fmt::Display for ReleaseType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for ReleaseType {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for ReleaseType {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Ok(ReleaseType::parse(&s))
    }
}

/// A resource touched by a hotfix release.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HotfixResource {
    #[serde(default, deserialize_with = "lenient::string")]
    pub resource_type: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub resource_name: String,
}

/// One release/deployment event.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeploymentRecord {
    #[serde(default, deserialize_with = "lenient::string")]
    pub id: String,
    #[serde(default, deserialize_with = "lenient::status")]
    pub status: Status,
    #[serde(default, deserialize_with = "lenient::release_type")]
    pub release_type: Option<ReleaseType>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub deployment_type: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub triggered_by: Option<String>,
    #[serde(default, deserialize_with = "lenient::timestamp")]
    pub created_on: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "lenient::timestamp")]
    pub finished_on: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "lenient::seconds")]
    pub time_taken_in_seconds: Option<u64>,
    #[serde(default, deserialize_with = "lenient::vec")]
    pub label_ids: Vec<String>,
    #[serde(default, deserialize_with = "lenient::vec")]
    pub changes_applied: Vec<serde_json::Value>,
    #[serde(default, deserialize_with = "lenient::vec")]
    pub hotfix_resources: Vec<HotfixResource>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub release_comment: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub release_reviewed_by: Option<String>,
    #[serde(default, deserialize_with = "lenient::flag")]
    pub signed_off: bool,
    #[serde(default, deserialize_with = "lenient::flag")]
    pub force_release: bool,
}

impl DeploymentRecord {
    /// Creation time in epoch millis; absent timestamps count as epoch 0.
    pub fn created_ms(&self) -> i64 {
        self.created_on.map(|t| t.timestamp_millis()).unwrap_or(0)
    }

    pub fn finished_ms(&self) -> i64 {
        self.finished_on.map(|t| t.timestamp_millis()).unwrap_or(0)
    }

    pub fn release_type_label(&self) -> &str {
        self.release_type
            .as_ref()
            .map(ReleaseType::as_str)
            .unwrap_or(UNKNOWN_RELEASE_TYPE)
    }

    /// Duration usable for averages: present and non-zero.
    pub fn measured_duration(&self) -> Option<u64> {
        self.time_taken_in_seconds.filter(|&secs| secs > 0)
    }

    /// Lower-cased text the free-text search matches against.
    pub fn search_haystack(&self) -> String {
        let parts = [
            self.id.as_str(),
            self.description.as_deref().unwrap_or(""),
            self.release_comment.as_deref().unwrap_or(""),
            self.triggered_by.as_deref().unwrap_or(""),
            self.release_reviewed_by.as_deref().unwrap_or(""),
            &self.label_ids.join(","),
        ];
        parts.join(" ").to_lowercase()
    }
}

/// Parse a timestamp string the retrieval layer may hand us.
///
/// Accepts RFC 3339, offset-less ISO datetimes (taken as UTC) and bare dates.
pub fn parse_timestamp(s: &str) -> Option<DateTime<Utc>> {
    let s = s.trim();
    if let Ok(t) = DateTime::parse_from_rfc3339(s) {
        return Some(t.with_timezone(&Utc));
    }
    if let Ok(t) = NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(t.and_utc());
    }
    if let Ok(d) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return d.and_hms_opt(0, 0, 0).map(|t| t.and_utc());
    }
    None
}

mod lenient {
    use super::{parse_timestamp, ReleaseType, Status};
    use chrono::{DateTime, Utc};
    use serde::de::DeserializeOwned;
    use serde::{Deserialize, Deserializer};
    use serde_json::Value;

    pub fn string<'de, D: Deserializer<'de>>(d: D) -> Result<String, D::Error> {
        Ok(opt_string(d)?.unwrap_or_default())
    }

    pub fn opt_string<'de, D: Deserializer<'de>>(d: D) -> Result<Option<String>, D::Error> {
        Ok(match Option::<Value>::deserialize(d)? {
            Some(Value::String(s)) => Some(s),
            Some(Value::Number(n)) => Some(n.to_string()),
            Some(Value::Bool(b)) => Some(b.to_string()),
            _ => None,
        })
    }

    /// Anything but a string is an unknown status.
    pub fn status<'de, D: Deserializer<'de>>(d: D) -> Result<Status, D::Error> {
        Ok(match Option::<Value>::deserialize(d)? {
            Some(Value::String(s)) => Status::parse(&s),
            _ => Status::Unknown,
        })
    }

    pub fn release_type<'de, D: Deserializer<'de>>(
        d: D,
    ) -> Result<Option<ReleaseType>, D::Error> {
        Ok(opt_string(d)?
            .filter(|s| !s.is_empty())
            .map(|s| ReleaseType::parse(&s)))
    }

    pub fn timestamp<'de, D: Deserializer<'de>>(
        d: D,
    ) -> Result<Option<DateTime<Utc>>, D::Error> {
        let parsed = match Option::<Value>::deserialize(d)? {
            Some(Value::String(s)) => {
                let t = parse_timestamp(&s);
                if t.is_none() && !s.is_empty() {
                    tracing::debug!(value = %s, "Ignoring unparseable timestamp");
                }
                t
            }
            Some(Value::Number(n)) => n.as_i64().and_then(DateTime::from_timestamp_millis),
            _ => None,
        };
        Ok(parsed)
    }

    pub fn seconds<'de, D: Deserializer<'de>>(d: D) -> Result<Option<u64>, D::Error> {
        let secs = match Option::<Value>::deserialize(d)? {
            Some(Value::Number(n)) => n.as_u64().or_else(|| {
                n.as_f64()
                    .filter(|f| f.is_finite() && *f >= 0.0)
                    .map(|f| f.round() as u64)
            }),
            Some(Value::String(s)) => s.trim().parse::<f64>().ok().and_then(|f| {
                (f.is_finite() && f >= 0.0).then(|| f.round() as u64)
            }),
            _ => None,
        };
        Ok(secs)
    }

    /// Keeps the elements that parse; a non-array is empty.
    pub fn vec<'de, D, T>(d: D) -> Result<Vec<T>, D::Error>
    where
        D: Deserializer<'de>,
        T: DeserializeOwned,
    {
        let items = match Option::<Value>::deserialize(d)? {
            Some(Value::Array(items)) => items,
            _ => return Ok(Vec::new()),
        };
        let total = items.len();
        let kept: Vec<T> = items
            .into_iter()
            .filter_map(|item| serde_json::from_value(item).ok())
            .collect();
        if kept.len() < total {
            tracing::debug!(dropped = total - kept.len(), "Ignoring malformed list elements");
        }
        Ok(kept)
    }

    pub fn flag<'de, D: Deserializer<'de>>(d: D) -> Result<bool, D::Error> {
        Ok(matches!(Option::<Value>::deserialize(d)?, Some(Value::Bool(true))))
    }
}
