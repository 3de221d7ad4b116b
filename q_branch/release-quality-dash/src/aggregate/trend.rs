//! Adaptive time bucketing for the release timeline.
//!
//! Records are first grouped by UTC calendar day. When more than
//! [`MAX_DAY_BUCKETS`] distinct days are present the day buckets are folded
//! into ISO weeks (Monday start), which bounds the bar count for long ranges.

use crate::record::{DeploymentRecord, Status};
use chrono::{Datelike, Duration, NaiveDate};
use serde::Serialize;
use std::collections::BTreeMap;

/// Above this many distinct days the trend switches to weekly buckets.
pub const MAX_DAY_BUCKETS: usize = 31;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Granularity {
    Day,
    Week,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct Counters {
    succeeded: usize,
    failed: usize,
    other: usize,
}

impl Counters {
    fn record(&mut self, status: &Status) {
        if *status == Status::Succeeded {
            self.succeeded += 1;
        } else if status.is_failure() {
            self.failed += 1;
        } else {
            self.other += 1;
        }
    }

    fn absorb(&mut self, other: Counters) {
        self.succeeded += other.succeeded;
        self.failed += other.failed;
        self.other += other.other;
    }
}

/// One bar group of the timeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TrendBucket {
    /// The day, or the Monday starting the week.
    pub start: NaiveDate,
    pub label: String,
    pub succeeded: usize,
    /// FAILED or FAULT.
    pub failed: usize,
    pub other: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Trend {
    pub granularity: Granularity,
    pub buckets: Vec<TrendBucket>,
}

impl Trend {
    pub fn labels(&self) -> Vec<String> {
        self.buckets.iter().map(|b| b.label.clone()).collect()
    }
}

/// Monday on or before `day`.
pub fn week_start(day: NaiveDate) -> NaiveDate {
    day - Duration::days(i64::from(day.weekday().num_days_from_monday()))
}

/// Bucket records by day, or by ISO week when there are more than
/// `max_day_buckets` distinct days. Records without `createdOn` are skipped.
pub fn trend(filtered: &[&DeploymentRecord], max_day_buckets: usize) -> Trend {
    let mut days: BTreeMap<NaiveDate, Counters> = BTreeMap::new();
    for r in filtered {
        if let Some(created) = r.created_on {
            days.entry(created.date_naive()).or_default().record(&r.status);
        }
    }

    if days.len() <= max_day_buckets {
        return Trend {
            granularity: Granularity::Day,
            buckets: days
                .into_iter()
                .map(|(day, c)| bucket(day, day.format("%m-%d").to_string(), c))
                .collect(),
        };
    }

    tracing::debug!(
        distinct_days = days.len(),
        max_day_buckets,
        "Folding timeline into weekly buckets"
    );
    let mut weeks: BTreeMap<NaiveDate, Counters> = BTreeMap::new();
    for (day, c) in days {
        weeks.entry(week_start(day)).or_default().absorb(c);
    }
    Trend {
        granularity: Granularity::Week,
        buckets: weeks
            .into_iter()
            .map(|(monday, c)| bucket(monday, monday.format("W/%m-%d").to_string(), c))
            .collect(),
    }
}

fn bucket(start: NaiveDate, label: String, c: Counters) -> TrendBucket {
    TrendBucket {
        start,
        label,
        succeeded: c.succeeded,
        failed: c.failed,
        other: c.other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn on(day: NaiveDate, status: Status) -> DeploymentRecord {
        DeploymentRecord {
            status,
            created_on: Some(Utc.from_utc_datetime(&day.and_hms_opt(8, 30, 0).unwrap())),
            ..Default::default()
        }
    }

    fn consecutive_days(n: i64) -> Vec<DeploymentRecord> {
        let first = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        (0..n)
            .map(|i| on(first + Duration::days(i), Status::Succeeded))
            .collect()
    }

    #[test]
    fn test_daily_buckets_split_by_outcome() {
        let d1 = NaiveDate::from_ymd_opt(2024, 3, 2).unwrap();
        let d2 = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
        let records = vec![
            on(d1, Status::Succeeded),
            on(d1, Status::Fault),
            on(d2, Status::Failed),
            on(d2, Status::Queued),
            on(d2, Status::Succeeded),
            DeploymentRecord::default(),
        ];
        let refs: Vec<_> = records.iter().collect();
        let t = trend(&refs, MAX_DAY_BUCKETS);

        assert_eq!(t.granularity, Granularity::Day);
        assert_eq!(t.labels(), vec!["03-01", "03-02"]);
        assert_eq!(
            (t.buckets[0].succeeded, t.buckets[0].failed, t.buckets[0].other),
            (1, 1, 1)
        );
        assert_eq!(
            (t.buckets[1].succeeded, t.buckets[1].failed, t.buckets[1].other),
            (1, 1, 0)
        );
    }

    #[test]
    fn test_thirty_one_days_stay_daily() {
        let records = consecutive_days(31);
        let refs: Vec<_> = records.iter().collect();
        let t = trend(&refs, MAX_DAY_BUCKETS);
        assert_eq!(t.granularity, Granularity::Day);
        assert_eq!(t.buckets.len(), 31);
    }

    #[test]
    fn test_thirty_two_days_switch_to_weeks() {
        let records = consecutive_days(32);
        let refs: Vec<_> = records.iter().collect();
        let t = trend(&refs, MAX_DAY_BUCKETS);

        assert_eq!(t.granularity, Granularity::Week);
        assert!(t.buckets.iter().all(|b| b.label.starts_with("W/")));
        assert!(t.buckets.iter().all(|b| b.start.weekday() == chrono::Weekday::Mon));
        // 2024-01-01 is a Monday: 32 days span weeks starting Jan 1, 8, 15, 22, 29.
        assert_eq!(t.buckets.len(), 5);
        assert_eq!(t.buckets[0].label, "W/01-01");
        let total: usize = t.buckets.iter().map(|b| b.succeeded).sum();
        assert_eq!(total, 32);
    }

    #[test]
    fn test_week_start() {
        let sunday = NaiveDate::from_ymd_opt(2024, 3, 10).unwrap();
        assert_eq!(week_start(sunday), NaiveDate::from_ymd_opt(2024, 3, 4).unwrap());
        let monday = NaiveDate::from_ymd_opt(2024, 3, 4).unwrap();
        assert_eq!(week_start(monday), monday);
        let new_year = NaiveDate::from_ymd_opt(2025, 1, 1).unwrap();
        assert_eq!(week_start(new_year), NaiveDate::from_ymd_opt(2024, 12, 30).unwrap());
    }

    #[test]
    fn test_empty_trend() {
        let t = trend(&[], MAX_DAY_BUCKETS);
        assert_eq!(t.granularity, Granularity::Day);
        assert!(t.buckets.is_empty());
    }
}
