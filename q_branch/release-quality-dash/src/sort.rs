//! Sort engine.
//!
//! Each sortable column maps to a typed accessor. Dates and durations compare
//! numerically with absent values as 0; everything else compares as text.
//! Sorting is stable in both directions: ties keep their prior order.

use crate::error::DashError;
use crate::record::DeploymentRecord;
use serde::Serialize;
use std::cmp::Ordering;
use std::fmt;

/// A sortable table column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum SortKey {
    Id,
    Status,
    ReleaseType,
    TriggeredBy,
    #[default]
    CreatedOn,
    FinishedOn,
    TimeTakenInSeconds,
    DeploymentType,
}

/// Comparable projection of one record field.
#[derive(Debug, PartialEq, Eq, PartialOrd, Ord)]
enum SortValue<'a> {
    Instant(i64),
    Number(u64),
    Text(&'a str),
}

impl SortKey {
    pub const ALL: [SortKey; 8] = [
        SortKey::Id,
        SortKey::Status,
        SortKey::ReleaseType,
        SortKey::TriggeredBy,
        SortKey::CreatedOn,
        SortKey::FinishedOn,
        SortKey::TimeTakenInSeconds,
        SortKey::DeploymentType,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SortKey::Id => "id",
            SortKey::Status => "status",
            SortKey::ReleaseType => "releaseType",
            SortKey::TriggeredBy => "triggeredBy",
            SortKey::CreatedOn => "createdOn",
            SortKey::FinishedOn => "finishedOn",
            SortKey::TimeTakenInSeconds => "timeTakenInSeconds",
            SortKey::DeploymentType => "deploymentType",
        }
    }

    pub fn parse(s: &str) -> Result<Self, DashError> {
        SortKey::ALL
            .into_iter()
            .find(|k| k.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| DashError::UnknownSortKey(s.to_string()))
    }

    fn value<'a>(&self, r: &'a DeploymentRecord) -> SortValue<'a> {
        match self {
            SortKey::CreatedOn => SortValue::Instant(r.created_ms()),
            SortKey::FinishedOn => SortValue::Instant(r.finished_ms()),
            SortKey::TimeTakenInSeconds => SortValue::Number(r.time_taken_in_seconds.unwrap_or(0)),
            SortKey::Id => SortValue::Text(&r.id),
            SortKey::Status => SortValue::Text(r.status.as_str()),
            SortKey::ReleaseType => {
                SortValue::Text(r.release_type.as_ref().map(|t| t.as_str()).unwrap_or(""))
            }
            SortKey::TriggeredBy => SortValue::Text(r.triggered_by.as_deref().unwrap_or("")),
            SortKey::DeploymentType => {
                SortValue::Text(r.deployment_type.as_deref().unwrap_or(""))
            }
        }
    }

    /// Ascending comparison of two records on this key.
    pub fn compare(&self, a: &DeploymentRecord, b: &DeploymentRecord) -> Ordering {
        self.value(a).cmp(&self.value(b))
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    Asc,
    #[default]
    Desc,
}

impl SortDirection {
    pub fn flipped(self) -> Self {
        match self {
            SortDirection::Asc => SortDirection::Desc,
            SortDirection::Desc => SortDirection::Asc,
        }
    }
}

/// Current sort column and direction. Defaults to newest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct SortState {
    pub key: SortKey,
    pub direction: SortDirection,
}

impl SortState {
    pub fn new(key: SortKey, direction: SortDirection) -> Self {
        Self { key, direction }
    }

    /// Header click: same column flips direction, a new column starts descending.
    pub fn select(self, key: SortKey) -> Self {
        if self.key == key {
            Self {
                key,
                direction: self.direction.flipped(),
            }
        } else {
            Self {
                key,
                direction: SortDirection::Desc,
            }
        }
    }
}

/// Order `records` by `sort`, keeping ties in their incoming order.
pub fn sort_records<'a>(
    mut records: Vec<&'a DeploymentRecord>,
    sort: SortState,
) -> Vec<&'a DeploymentRecord> {
    let key = sort.key;
    match sort.direction {
        SortDirection::Asc => records.sort_by(|a, b| key.compare(a, b)),
        SortDirection::Desc => records.sort_by(|a, b| key.compare(b, a)),
    }
    records
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::{ReleaseType, Status};
    use chrono::{TimeZone, Utc};

    fn rec(id: &str) -> DeploymentRecord {
        DeploymentRecord {
            id: id.to_string(),
            ..Default::default()
        }
    }

    fn ids(records: &[&DeploymentRecord]) -> Vec<String> {
        records.iter().map(|r| r.id.clone()).collect()
    }

    #[test]
    fn test_dates_sort_with_absent_as_epoch() {
        let mut old = rec("old");
        old.created_on = Some(Utc.with_ymd_and_hms(2023, 1, 1, 0, 0, 0).unwrap());
        let mut new = rec("new");
        new.created_on = Some(Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap());
        let none = rec("none");
        let records = vec![old, none, new];
        let refs: Vec<_> = records.iter().collect();

        let asc = sort_records(refs.clone(), SortState::new(SortKey::CreatedOn, SortDirection::Asc));
        assert_eq!(ids(&asc), vec!["none", "old", "new"]);

        let desc = sort_records(refs, SortState::default());
        assert_eq!(ids(&desc), vec!["new", "old", "none"]);
    }

    #[test]
    fn test_numbers_compare_numerically() {
        let mut a = rec("a");
        a.time_taken_in_seconds = Some(100);
        let mut b = rec("b");
        b.time_taken_in_seconds = Some(9);
        let c = rec("c");
        let records = vec![a, b, c];
        let sorted = sort_records(
            records.iter().collect(),
            SortState::new(SortKey::TimeTakenInSeconds, SortDirection::Asc),
        );
        assert_eq!(ids(&sorted), vec!["c", "b", "a"]);
    }

    #[test]
    fn test_ties_keep_input_order_both_directions() {
        let mut records = Vec::new();
        for (id, status) in [
            ("1", Status::Failed),
            ("2", Status::Succeeded),
            ("3", Status::Failed),
            ("4", Status::Succeeded),
        ] {
            let mut r = rec(id);
            r.status = status;
            records.push(r);
        }
        let refs: Vec<_> = records.iter().collect();

        let asc = sort_records(refs.clone(), SortState::new(SortKey::Status, SortDirection::Asc));
        assert_eq!(ids(&asc), vec!["1", "3", "2", "4"]);

        let desc = sort_records(refs, SortState::new(SortKey::Status, SortDirection::Desc));
        assert_eq!(ids(&desc), vec!["2", "4", "1", "3"]);
    }

    #[test]
    fn test_text_keys_absent_sorts_first() {
        let mut a = rec("a");
        a.release_type = Some(ReleaseType::Rollback);
        let b = rec("b");
        let mut c = rec("c");
        c.release_type = Some(ReleaseType::Hotfix);
        let records = vec![a, b, c];
        let sorted = sort_records(
            records.iter().collect(),
            SortState::new(SortKey::ReleaseType, SortDirection::Asc),
        );
        assert_eq!(ids(&sorted), vec!["b", "c", "a"]);
    }

    #[test]
    fn test_select_toggles_and_resets() {
        let state = SortState::default();
        assert_eq!(state.key, SortKey::CreatedOn);
        assert_eq!(state.direction, SortDirection::Desc);

        let flipped = state.select(SortKey::CreatedOn);
        assert_eq!(flipped.direction, SortDirection::Asc);

        let other = flipped.select(SortKey::Id);
        assert_eq!(other, SortState::new(SortKey::Id, SortDirection::Desc));
    }

    #[test]
    fn test_parse_sort_key() {
        assert_eq!(SortKey::parse("createdOn").unwrap(), SortKey::CreatedOn);
        assert_eq!(
            SortKey::parse("timetakeninseconds").unwrap(),
            SortKey::TimeTakenInSeconds
        );
        assert!(matches!(
            SortKey::parse("labels"),
            Err(DashError::UnknownSortKey(_))
        ));
    }
}
