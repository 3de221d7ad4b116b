//! Display rows for the release details table.

use crate::format::{ellipsize, fmt_date, fmt_duration, tail_chars, truncate_chars, ABSENT};
use crate::paginate::PageInfo;
use crate::palette::{status_color, type_badge_color, Color};
use crate::record::DeploymentRecord;
use crate::sort::{SortDirection, SortKey, SortState};
use serde::Serialize;

pub const EMPTY_TABLE: &str = "No releases match the current filters.";

const SHORT_ID_CHARS: usize = 12;
const LABELS_LIMIT: usize = 30;
const LABELS_KEEP: usize = 28;
const COMMENT_CHARS: usize = 40;

/// Table column headers with the sort key each one controls, if any.
pub const COLUMNS: [(&str, Option<SortKey>); 15] = [
    ("#", None),
    ("ID", Some(SortKey::Id)),
    ("Status", Some(SortKey::Status)),
    ("Type", Some(SortKey::ReleaseType)),
    ("Triggered By", Some(SortKey::TriggeredBy)),
    ("Started", Some(SortKey::CreatedOn)),
    ("Finished", Some(SortKey::FinishedOn)),
    ("Duration", Some(SortKey::TimeTakenInSeconds)),
    ("Deploy Type", Some(SortKey::DeploymentType)),
    ("Labels", None),
    ("Changes", None),
    ("Reviewed By", None),
    ("Comment", None),
    ("Signed Off", None),
    ("Forced", None),
];

/// A record formatted for display. Absent values are rendered as `—`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TableRow {
    /// 1-based position in the filtered, sorted collection.
    pub number: usize,
    pub id: String,
    pub short_id: String,
    pub status: String,
    pub status_color: Color,
    pub release_type: String,
    pub release_type_color: Color,
    pub triggered_by: String,
    pub started: String,
    pub finished: String,
    pub duration: String,
    pub deployment_type: String,
    pub deployment_type_color: Color,
    /// Full label list; `labels` may be shortened.
    pub labels_full: String,
    pub labels: String,
    pub changes: usize,
    pub changes_text: String,
    pub hotfix_resources: String,
    pub reviewed_by: String,
    pub comment_full: String,
    pub comment: String,
    pub signed_off: bool,
    pub force_release: bool,
}

fn or_absent(value: Option<&str>) -> String {
    match value {
        Some(v) if !v.is_empty() => v.to_string(),
        _ => ABSENT.to_string(),
    }
}

fn non_empty_or_absent(joined: String) -> String {
    if joined.is_empty() {
        ABSENT.to_string()
    } else {
        joined
    }
}

impl TableRow {
    pub fn new(number: usize, r: &DeploymentRecord) -> Self {
        let release_type = or_absent(r.release_type.as_ref().map(|t| t.as_str()));
        let deployment_type = or_absent(r.deployment_type.as_deref());
        let labels_full = non_empty_or_absent(r.label_ids.join(", "));
        let changes = r.changes_applied.len();
        let comment_full = r
            .release_comment
            .as_deref()
            .filter(|c| !c.is_empty())
            .or(r.description.as_deref())
            .unwrap_or("")
            .to_string();

        Self {
            number,
            short_id: if r.id.is_empty() {
                ABSENT.to_string()
            } else {
                tail_chars(&r.id, SHORT_ID_CHARS)
            },
            id: r.id.clone(),
            status: or_absent(Some(r.status.as_str())),
            status_color: status_color(&r.status),
            release_type_color: type_badge_color(&release_type),
            release_type,
            triggered_by: or_absent(r.triggered_by.as_deref()),
            started: fmt_date(r.created_on),
            finished: fmt_date(r.finished_on),
            duration: fmt_duration(r.time_taken_in_seconds),
            deployment_type_color: type_badge_color(&deployment_type),
            deployment_type,
            labels: ellipsize(&labels_full, LABELS_LIMIT, LABELS_KEEP),
            labels_full,
            changes,
            changes_text: if changes > 0 {
                format!("{changes} changes")
            } else {
                ABSENT.to_string()
            },
            hotfix_resources: non_empty_or_absent(
                r.hotfix_resources
                    .iter()
                    .map(|h| format!("{}/{}", h.resource_type, h.resource_name))
                    .collect::<Vec<_>>()
                    .join(", "),
            ),
            reviewed_by: or_absent(r.release_reviewed_by.as_deref()),
            comment: if comment_full.is_empty() {
                ABSENT.to_string()
            } else {
                truncate_chars(&comment_full, COMMENT_CHARS)
            },
            comment_full,
            signed_off: r.signed_off,
            force_release: r.force_release,
        }
    }

    pub fn signed_off_mark(&self) -> &'static str {
        if self.signed_off { "✔" } else { ABSENT }
    }

    pub fn forced_mark(&self) -> &'static str {
        if self.force_release { "⚡" } else { ABSENT }
    }
}

/// Rows for one page; `page.start` offsets the row numbers.
pub fn table_rows(page_records: &[&DeploymentRecord], page: &PageInfo) -> Vec<TableRow> {
    page_records
        .iter()
        .enumerate()
        .map(|(i, r)| TableRow::new(page.start + i + 1, r))
        .collect()
}

/// Header indicator: `⇅` for unsorted columns, else the active direction.
pub fn sort_arrow(sort: &SortState, key: SortKey) -> &'static str {
    if sort.key != key {
        return "⇅";
    }
    match sort.direction {
        SortDirection::Asc => "↑",
        SortDirection::Desc => "↓",
    }
}

/// Pagination footer text, e.g. `Page 2 of 4 (80 releases)`.
pub fn page_label(page: &PageInfo) -> String {
    format!(
        "Page {} of {} ({} releases)",
        page.page + 1,
        page.total_pages,
        page.total_count
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::paginate::paginate;
    use crate::record::{HotfixResource, ReleaseType, Status};
    use chrono::{TimeZone, Utc};

    fn full_record() -> DeploymentRecord {
        DeploymentRecord {
            id: "deployment-0123456789abcdef".into(),
            status: Status::Succeeded,
            release_type: Some(ReleaseType::Hotfix),
            deployment_type: Some("PLAN".into()),
            triggered_by: Some("alice@example.com".into()),
            created_on: Some(Utc.with_ymd_and_hms(2024, 3, 5, 9, 7, 0).unwrap()),
            finished_on: Some(Utc.with_ymd_and_hms(2024, 3, 5, 10, 8, 0).unwrap()),
            time_taken_in_seconds: Some(3660),
            label_ids: vec!["payments".into(), "critical-path".into(), "eu-west".into()],
            changes_applied: vec![serde_json::json!({"a": 1}), serde_json::json!({"b": 2})],
            hotfix_resources: vec![HotfixResource {
                resource_type: "service".into(),
                resource_name: "billing".into(),
            }],
            release_comment: None,
            description: Some("Roll out the new ledger reconciliation job to all regions".into()),
            release_reviewed_by: Some("bob".into()),
            signed_off: true,
            force_release: false,
        }
    }

    #[test]
    fn test_row_formatting() {
        let row = TableRow::new(7, &full_record());
        assert_eq!(row.number, 7);
        assert_eq!(row.short_id, "456789abcdef");
        assert_eq!(row.status, "SUCCEEDED");
        assert_eq!(row.release_type, "HOTFIX");
        assert_eq!(row.release_type_color, Color::hex(0xf97316));
        assert_eq!(row.deployment_type_color, Color::hex(0x0ea5e9));
        assert_eq!(row.started, "05 Mar 2024 09:07");
        assert_eq!(row.duration, "1h 1m");
        assert_eq!(row.labels_full, "payments, critical-path, eu-west");
        assert_eq!(row.labels, "payments, critical-path, eu-…");
        assert_eq!(row.changes_text, "2 changes");
        assert_eq!(row.hotfix_resources, "service/billing");
        assert_eq!(row.comment, "Roll out the new ledger reconciliation j");
        assert_eq!(row.comment.chars().count(), 40);
        assert_eq!(row.signed_off_mark(), "✔");
        assert_eq!(row.forced_mark(), ABSENT);
    }

    #[test]
    fn test_absent_values_render_as_dash() {
        let row = TableRow::new(1, &DeploymentRecord::default());
        assert_eq!(row.short_id, ABSENT);
        assert_eq!(row.release_type, ABSENT);
        assert_eq!(row.release_type_color, Color::hex(0x6b7280));
        assert_eq!(row.triggered_by, ABSENT);
        assert_eq!(row.started, ABSENT);
        assert_eq!(row.duration, ABSENT);
        assert_eq!(row.labels, ABSENT);
        assert_eq!(row.changes_text, ABSENT);
        assert_eq!(row.hotfix_resources, ABSENT);
        assert_eq!(row.comment, ABSENT);
    }

    #[test]
    fn test_comment_prefers_release_comment() {
        let r = DeploymentRecord {
            release_comment: Some("ship it".into()),
            description: Some("ignored".into()),
            ..Default::default()
        };
        assert_eq!(TableRow::new(1, &r).comment, "ship it");
    }

    #[test]
    fn test_row_numbers_follow_page_offset() {
        let records: Vec<DeploymentRecord> = (0..30)
            .map(|i| DeploymentRecord {
                id: format!("r{i}"),
                ..Default::default()
            })
            .collect();
        let refs: Vec<&DeploymentRecord> = records.iter().collect();
        let (page, info) = paginate(&refs, 1, 25);
        let rows = table_rows(page, &info);
        assert_eq!(rows.len(), 5);
        assert_eq!(rows[0].number, 26);
        assert_eq!(rows[4].id, "r29");
        assert_eq!(page_label(&info), "Page 2 of 2 (30 releases)");
    }

    #[test]
    fn test_sort_arrow() {
        let sort = SortState::default();
        assert_eq!(sort_arrow(&sort, SortKey::CreatedOn), "↓");
        assert_eq!(sort_arrow(&sort, SortKey::Id), "⇅");
        let asc = sort.select(SortKey::CreatedOn);
        assert_eq!(sort_arrow(&asc, SortKey::CreatedOn), "↑");
    }
}
