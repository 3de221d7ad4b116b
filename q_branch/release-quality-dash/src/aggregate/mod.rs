//! Aggregation engine: KPIs and chart datasets over a filtered record set.
//!
//! Every function here is a pure fold over its input. Nothing is cached or
//! shared between calls, so callers can compute any subset in any order.
//!
//! Filter options are the exception to "filtered input": they come from the
//! unfiltered collection so dropdowns always offer the full option set.

pub mod trend;

use crate::palette::{palette_color, status_color, Color};
use crate::record::{DeploymentRecord, ReleaseType, Status};
use rustc_hash::FxHashMap;
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};
use std::hash::Hash;

pub use trend::{trend, Granularity, Trend, TrendBucket};

/// Headline statistics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct Kpis {
    pub total: usize,
    pub succeeded: usize,
    /// FAILED plus FAULT.
    pub failed: usize,
    /// Rounded percentage, 0 when there are no records.
    pub success_rate: u32,
    /// Rounded mean of present, non-zero durations; 0 when there are none.
    pub avg_duration_secs: u64,
    pub hotfixes: usize,
    /// IN_PROGRESS or STARTED across the *unfiltered* collection.
    pub in_flight: usize,
}

pub fn compute_kpis(filtered: &[&DeploymentRecord], all: &[DeploymentRecord]) -> Kpis {
    let total = filtered.len();
    let succeeded = filtered
        .iter()
        .filter(|r| r.status == Status::Succeeded)
        .count();
    let failed = filtered.iter().filter(|r| r.status.is_failure()).count();
    let success_rate = if total > 0 {
        (succeeded as f64 / total as f64 * 100.0).round() as u32
    } else {
        0
    };
    let durations: Vec<u64> = filtered
        .iter()
        .filter_map(|r| r.measured_duration())
        .collect();
    let avg_duration_secs = rounded_mean(&durations).unwrap_or(0);
    let hotfixes = filtered
        .iter()
        .filter(|r| r.release_type == Some(ReleaseType::Hotfix))
        .count();
    let in_flight = all.iter().filter(|r| r.status.is_in_flight()).count();

    Kpis {
        total,
        succeeded,
        failed,
        success_rate,
        avg_duration_secs,
        hotfixes,
        in_flight,
    }
}

fn rounded_mean(values: &[u64]) -> Option<u64> {
    if values.is_empty() {
        return None;
    }
    let sum: u128 = values.iter().map(|&v| u128::from(v)).sum();
    Some((sum as f64 / values.len() as f64).round() as u64)
}

/// Counts keys while remembering the order each key was first seen.
struct FirstSeenCounter<K> {
    index: FxHashMap<K, usize>,
    entries: Vec<(K, usize)>,
}

impl<K: Hash + Eq + Clone> FirstSeenCounter<K> {
    fn new() -> Self {
        Self {
            index: FxHashMap::default(),
            entries: Vec::new(),
        }
    }

    fn add(&mut self, key: K) {
        match self.index.get(&key) {
            Some(&i) => self.entries[i].1 += 1,
            None => {
                self.index.insert(key.clone(), self.entries.len());
                self.entries.push((key, 1));
            }
        }
    }

    /// Entries by count descending; equal counts stay in first-seen order.
    fn into_ranked(self) -> Vec<(K, usize)> {
        let mut entries = self.entries;
        entries.sort_by(|a, b| b.1.cmp(&a.1));
        entries
    }
}

/// One slice of the status distribution.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatusCount {
    pub status: Status,
    pub count: usize,
    pub color: Color,
}

/// Count per status present, largest first.
pub fn status_distribution(filtered: &[&DeploymentRecord]) -> Vec<StatusCount> {
    let mut counter = FirstSeenCounter::new();
    for r in filtered {
        counter.add(r.status.clone());
    }
    counter
        .into_ranked()
        .into_iter()
        .map(|(status, count)| StatusCount {
            color: status_color(&status),
            status,
            count,
        })
        .collect()
}

/// Records per release type, with its palette color.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TypeCount {
    pub label: String,
    pub count: usize,
    pub color: Color,
}

/// Count per release type (absent as UNKNOWN), labels sorted.
pub fn release_type_counts(filtered: &[&DeploymentRecord]) -> Vec<TypeCount> {
    let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
    for r in filtered {
        *counts.entry(r.release_type_label()).or_default() += 1;
    }
    counts
        .into_iter()
        .enumerate()
        .map(|(i, (label, count))| TypeCount {
            label: label.to_string(),
            count,
            color: palette_color(i),
        })
        .collect()
}

/// Releases triggered by one actor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ActorCount {
    pub actor: String,
    /// Actor identifier up to the first `@`.
    pub label: String,
    pub count: usize,
}

/// Most active triggerers, ties in first-seen order, at most `limit`.
pub fn top_actors(filtered: &[&DeploymentRecord], limit: usize) -> Vec<ActorCount> {
    let mut counter = FirstSeenCounter::new();
    for actor in filtered.iter().filter_map(|r| r.triggered_by.as_deref()) {
        if !actor.is_empty() {
            counter.add(actor);
        }
    }
    counter
        .into_ranked()
        .into_iter()
        .take(limit)
        .map(|(actor, count)| ActorCount {
            actor: actor.to_string(),
            label: actor_label(actor).to_string(),
            count,
        })
        .collect()
}

pub fn actor_label(actor: &str) -> &str {
    actor.split('@').next().unwrap_or(actor)
}

/// Mean duration of one release type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TypeDuration {
    pub label: String,
    pub avg_secs: u64,
    pub samples: usize,
}

/// Rounded mean duration per release type, in first-occurrence order.
///
/// Only records with both a type and a positive duration contribute.
pub fn avg_duration_by_type(filtered: &[&DeploymentRecord]) -> Vec<TypeDuration> {
    let mut index: FxHashMap<&str, usize> = FxHashMap::default();
    let mut groups: Vec<(&str, Vec<u64>)> = Vec::new();
    for r in filtered {
        let (Some(kind), Some(secs)) = (r.release_type.as_ref(), r.measured_duration()) else {
            continue;
        };
        let label = kind.as_str();
        let i = *index.entry(label).or_insert_with(|| {
            groups.push((label, Vec::new()));
            groups.len() - 1
        });
        groups[i].1.push(secs);
    }
    groups
        .into_iter()
        .filter_map(|(label, samples)| {
            rounded_mean(&samples).map(|avg_secs| TypeDuration {
                label: label.to_string(),
                avg_secs,
                samples: samples.len(),
            })
        })
        .collect()
}

/// Distinct values per filter dimension, sorted, from the full collection.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FilterOptions {
    pub statuses: Vec<String>,
    pub release_types: Vec<String>,
    pub triggered_by: Vec<String>,
    pub deployment_types: Vec<String>,
}

pub fn filter_options(all: &[DeploymentRecord]) -> FilterOptions {
    fn distinct<'a>(values: impl Iterator<Item = Option<&'a str>>) -> Vec<String> {
        values
            .flatten()
            .filter(|v| !v.is_empty())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .map(str::to_string)
            .collect()
    }

    FilterOptions {
        statuses: distinct(all.iter().map(|r| Some(r.status.as_str()))),
        release_types: distinct(all.iter().map(|r| r.release_type.as_ref().map(|t| t.as_str()))),
        triggered_by: distinct(all.iter().map(|r| r.triggered_by.as_deref())),
        deployment_types: distinct(all.iter().map(|r| r.deployment_type.as_deref())),
    }
}

/// Tunables for the aggregate set.
#[derive(Debug, Clone, Copy)]
pub struct AggregateLimits {
    pub top_actors: usize,
    pub max_day_buckets: usize,
}

impl Default for AggregateLimits {
    fn default() -> Self {
        Self {
            top_actors: 10,
            max_day_buckets: trend::MAX_DAY_BUCKETS,
        }
    }
}

/// Everything derived from one filtered collection.
#[derive(Debug, Clone, Serialize)]
pub struct Aggregates {
    pub kpis: Kpis,
    pub statuses: Vec<StatusCount>,
    pub release_types: Vec<TypeCount>,
    pub trend: Trend,
    pub top_actors: Vec<ActorCount>,
    pub durations: Vec<TypeDuration>,
    pub options: FilterOptions,
}

pub fn aggregate(
    filtered: &[&DeploymentRecord],
    all: &[DeploymentRecord],
    limits: AggregateLimits,
) -> Aggregates {
    Aggregates {
        kpis: compute_kpis(filtered, all),
        statuses: status_distribution(filtered),
        release_types: release_type_counts(filtered),
        trend: trend(filtered, limits.max_day_buckets),
        top_actors: top_actors(filtered, limits.top_actors),
        durations: avg_duration_by_type(filtered),
        options: filter_options(all),
    }
}
