//! Filter engine: date range, multi-select dimensions and free-text search.
//!
//! A record passes when it satisfies every active constraint. Within one
//! dimension the selected values are alternatives; across dimensions they
//! are all required. Output keeps input order.

use crate::error::DashError;
use crate::record::{DeploymentRecord, ReleaseType, Status};
use chrono::NaiveDate;
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

/// A multi-select filter dimension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Dimension {
    Status,
    ReleaseType,
    TriggeredBy,
    DeploymentType,
}

impl Dimension {
    pub const ALL: [Dimension; 4] = [
        Dimension::Status,
        Dimension::ReleaseType,
        Dimension::TriggeredBy,
        Dimension::DeploymentType,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Dimension::Status => "status",
            Dimension::ReleaseType => "releaseType",
            Dimension::TriggeredBy => "triggeredBy",
            Dimension::DeploymentType => "deploymentType",
        }
    }
}

impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Everything the user can constrain the record list by.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FilterSpec {
    /// Inclusive lower bound, from 00:00:00 UTC. `None` means unbounded.
    pub from_date: Option<NaiveDate>,
    /// Inclusive upper bound, through 23:59:59 UTC. `None` means unbounded.
    pub to_date: Option<NaiveDate>,
    pub statuses: Vec<Status>,
    pub release_types: Vec<ReleaseType>,
    pub triggered_by: Vec<String>,
    pub deployment_types: Vec<String>,
    pub search: String,
}

impl FilterSpec {
    /// Replace the selection of one dimension with raw option values.
    pub fn with_dimension(mut self, dimension: Dimension, values: Vec<String>) -> Self {
        match dimension {
            Dimension::Status => {
                self.statuses = values.iter().map(|v| Status::parse(v)).collect();
            }
            Dimension::ReleaseType => {
                self.release_types = values.iter().map(|v| ReleaseType::parse(v)).collect();
            }
            Dimension::TriggeredBy => self.triggered_by = values,
            Dimension::DeploymentType => self.deployment_types = values,
        }
        self
    }

    /// Drop dimension selections and search text, keeping the date range.
    pub fn cleared(&self) -> Self {
        Self {
            from_date: self.from_date,
            to_date: self.to_date,
            ..Default::default()
        }
    }

    pub fn has_dimension_filters(&self) -> bool {
        !(self.statuses.is_empty()
            && self.release_types.is_empty()
            && self.triggered_by.is_empty()
            && self.deployment_types.is_empty())
    }

    /// Lower bound in epoch millis, inclusive.
    pub fn lower_bound_ms(&self) -> i64 {
        self.from_date
            .and_then(|d| d.and_hms_opt(0, 0, 0))
            .map(|t| t.and_utc().timestamp_millis())
            .unwrap_or(i64::MIN)
    }

    /// Upper bound in epoch millis, inclusive.
    pub fn upper_bound_ms(&self) -> i64 {
        self.to_date
            .and_then(|d| d.and_hms_opt(23, 59, 59))
            .map(|t| t.and_utc().timestamp_millis())
            .unwrap_or(i64::MAX)
    }
}

/// Filter spec with bounds and the lower-cased query precomputed.
struct CompiledFilter<'a> {
    spec: &'a FilterSpec,
    lower_ms: i64,
    upper_ms: i64,
    query: Option<String>,
}

impl<'a> CompiledFilter<'a> {
    fn new(spec: &'a FilterSpec) -> Self {
        let query = (!spec.search.is_empty()).then(|| spec.search.to_lowercase());
        Self {
            spec,
            lower_ms: spec.lower_bound_ms(),
            upper_ms: spec.upper_bound_ms(),
            query,
        }
    }

    fn matches(&self, record: &DeploymentRecord) -> bool {
        let ts = record.created_ms();
        if ts < self.lower_ms || ts > self.upper_ms {
            return false;
        }
        let spec = self.spec;
        if !spec.statuses.is_empty() && !spec.statuses.contains(&record.status) {
            return false;
        }
        if !spec.release_types.is_empty()
            && !record
                .release_type
                .as_ref()
                .is_some_and(|t| spec.release_types.contains(t))
        {
            return false;
        }
        if !selected(&spec.triggered_by, record.triggered_by.as_deref()) {
            return false;
        }
        if !selected(&spec.deployment_types, record.deployment_type.as_deref()) {
            return false;
        }
        match &self.query {
            Some(q) => record.search_haystack().contains(q.as_str()),
            None => true,
        }
    }
}

fn selected(set: &[String], value: Option<&str>) -> bool {
    set.is_empty() || value.is_some_and(|v| set.iter().any(|s| s == v))
}

/// Return the records passing `spec`, in input order.
pub fn apply_filter<'a>(
    records: &'a [DeploymentRecord],
    spec: &FilterSpec,
) -> Vec<&'a DeploymentRecord> {
    let compiled = CompiledFilter::new(spec);
    records.iter().filter(|r| compiled.matches(r)).collect()
}

/// Parse a `YYYY-MM-DD` date input; the empty string means "no bound".
pub fn parse_date_input(s: &str) -> Result<Option<NaiveDate>, DashError> {
    let s = s.trim();
    if s.is_empty() {
        return Ok(None);
    }
    NaiveDate::from_str(s)
        .map(Some)
        .map_err(|_| DashError::InvalidDate(s.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn record(id: &str, status: Status, day: u32) -> DeploymentRecord {
        DeploymentRecord {
            id: id.to_string(),
            status,
            created_on: Some(Utc.with_ymd_and_hms(2024, 5, day, 12, 0, 0).unwrap()),
            ..Default::default()
        }
    }

    fn ids(records: &[&DeploymentRecord]) -> Vec<String> {
        records.iter().map(|r| r.id.clone()).collect()
    }

    fn date(s: &str) -> Option<NaiveDate> {
        parse_date_input(s).unwrap()
    }

    #[test]
    fn test_empty_spec_keeps_everything_in_order() {
        let records = vec![
            record("c", Status::Failed, 3),
            record("a", Status::Succeeded, 1),
            record("b", Status::Queued, 2),
        ];
        let out = apply_filter(&records, &FilterSpec::default());
        assert_eq!(ids(&out), vec!["c", "a", "b"]);
    }

    #[test]
    fn test_date_range_inclusive_at_both_ends() {
        let at = |h, m, s| DeploymentRecord {
            id: format!("{h}:{m}:{s}"),
            created_on: Some(Utc.with_ymd_and_hms(2024, 5, 10, h, m, s).unwrap()),
            ..Default::default()
        };
        let before = DeploymentRecord {
            id: "before".to_string(),
            created_on: Some(Utc.with_ymd_and_hms(2024, 5, 9, 23, 59, 59).unwrap()),
            ..Default::default()
        };
        let after = DeploymentRecord {
            id: "after".to_string(),
            created_on: Some(Utc.with_ymd_and_hms(2024, 5, 11, 0, 0, 0).unwrap()),
            ..Default::default()
        };
        let records = vec![before, at(0, 0, 0), at(23, 59, 59), after];
        let spec = FilterSpec {
            from_date: date("2024-05-10"),
            to_date: date("2024-05-10"),
            ..Default::default()
        };
        let out = apply_filter(&records, &spec);
        assert_eq!(ids(&out), vec!["0:0:0", "23:59:59"]);
    }

    #[test]
    fn test_missing_created_on_counts_as_epoch() {
        let records = vec![DeploymentRecord {
            id: "undated".to_string(),
            ..Default::default()
        }];
        let bounded = FilterSpec {
            from_date: date("2024-01-01"),
            ..Default::default()
        };
        assert!(apply_filter(&records, &bounded).is_empty());

        let upper_only = FilterSpec {
            to_date: date("2024-01-01"),
            ..Default::default()
        };
        assert_eq!(apply_filter(&records, &upper_only).len(), 1);
    }

    #[test]
    fn test_or_within_and_across_dimensions() {
        let mut a = record("a", Status::Succeeded, 1);
        a.triggered_by = Some("alice".to_string());
        let mut b = record("b", Status::Failed, 1);
        b.triggered_by = Some("bob".to_string());
        let mut c = record("c", Status::Fault, 1);
        c.triggered_by = Some("alice".to_string());
        let records = vec![a, b, c];

        let spec = FilterSpec::default()
            .with_dimension(Dimension::Status, vec!["FAILED".into(), "FAULT".into()]);
        assert_eq!(ids(&apply_filter(&records, &spec)), vec!["b", "c"]);

        let spec = spec.with_dimension(Dimension::TriggeredBy, vec!["alice".into()]);
        assert_eq!(ids(&apply_filter(&records, &spec)), vec!["c"]);
    }

    #[test]
    fn test_release_type_filter_excludes_untyped() {
        let mut typed = record("typed", Status::Succeeded, 1);
        typed.release_type = Some(ReleaseType::Hotfix);
        let untyped = record("untyped", Status::Succeeded, 1);
        let records = vec![typed, untyped];

        let spec = FilterSpec::default().with_dimension(Dimension::ReleaseType, vec!["HOTFIX".into()]);
        assert_eq!(ids(&apply_filter(&records, &spec)), vec!["typed"]);
    }

    #[test]
    fn test_search_is_case_insensitive_over_joined_fields() {
        let mut a = record("a", Status::Succeeded, 1);
        a.label_ids = vec!["Payments".into(), "EU".into()];
        let mut b = record("b", Status::Succeeded, 1);
        b.release_comment = Some("rollback of payments".into());
        let mut c = record("c", Status::Succeeded, 1);
        c.description = Some("unrelated".into());
        let records = vec![a, b, c];

        let spec = FilterSpec {
            search: "PAYMENTS".into(),
            ..Default::default()
        };
        assert_eq!(ids(&apply_filter(&records, &spec)), vec!["a", "b"]);

        let spec = FilterSpec {
            search: "payments,eu".into(),
            ..Default::default()
        };
        assert_eq!(ids(&apply_filter(&records, &spec)), vec!["a"]);
    }

    #[test]
    fn test_zero_results_is_fine() {
        let records = vec![record("a", Status::Succeeded, 1)];
        let spec = FilterSpec {
            search: "nothing matches this".into(),
            ..Default::default()
        };
        assert!(apply_filter(&records, &spec).is_empty());
        assert!(apply_filter(&[], &spec).is_empty());
    }

    #[test]
    fn test_cleared_keeps_dates() {
        let spec = FilterSpec {
            from_date: date("2024-01-01"),
            to_date: date("2024-01-31"),
            search: "x".into(),
            ..Default::default()
        }
        .with_dimension(Dimension::Status, vec!["FAILED".into()]);
        let cleared = spec.cleared();
        assert_eq!(cleared.from_date, spec.from_date);
        assert_eq!(cleared.to_date, spec.to_date);
        assert!(!cleared.has_dimension_filters());
        assert!(cleared.search.is_empty());
    }

    #[test]
    fn test_parse_date_input() {
        assert_eq!(parse_date_input("").unwrap(), None);
        assert_eq!(
            parse_date_input("2024-02-29").unwrap(),
            NaiveDate::from_ymd_opt(2024, 2, 29)
        );
        assert!(matches!(
            parse_date_input("2024-02-30"),
            Err(DashError::InvalidDate(_))
        ));
    }
}
