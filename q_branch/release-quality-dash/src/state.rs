//! View state: filters, sort order and the current page.
//!
//! State is a plain value. Interactions produce a new state rather than
//! mutating in place, so a view can always be rebuilt from `(records, state)`.

use crate::config::DashboardConfig;
use crate::filter::{Dimension, FilterSpec};
use crate::paginate::{navigate, PageNav};
use crate::sort::{SortKey, SortState};
use chrono::{Duration, NaiveDate};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DashboardState {
    pub filter: FilterSpec,
    pub sort: SortState,
    /// Zero-based.
    pub page: usize,
    pub page_size: usize,
}

/// A discrete user interaction with the dashboard.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Interaction {
    ApplyDateRange {
        from: Option<NaiveDate>,
        to: Option<NaiveDate>,
    },
    /// Replace the selection of one multi-select dimension.
    SetDimension(Dimension, Vec<String>),
    /// Free-text query; surrounding whitespace is ignored.
    SetSearch(String),
    /// Drop dimension selections and search, keeping the date range.
    ClearFilters,
    SortBy(SortKey),
    Navigate(PageNav),
}

impl DashboardState {
    /// Defaults for a freshly loaded environment: the last `lookback_days`
    /// days through `today`, no filters, newest first, first page.
    pub fn for_environment(today: NaiveDate, config: &DashboardConfig) -> Self {
        let from = today - Duration::days(i64::from(config.lookback_days));
        Self {
            filter: FilterSpec {
                from_date: Some(from),
                to_date: Some(today),
                ..Default::default()
            },
            sort: SortState::default(),
            page: 0,
            page_size: config.page_size.max(1),
        }
    }

    /// Apply `interaction`. `filtered_count` is the size of the currently
    /// filtered collection, needed to clamp page navigation.
    pub fn apply(self, interaction: Interaction, filtered_count: usize) -> Self {
        let Self {
            filter,
            sort,
            page,
            page_size,
        } = self;
        match interaction {
            Interaction::ApplyDateRange { from, to } => Self {
                filter: FilterSpec {
                    from_date: from,
                    to_date: to,
                    ..filter
                },
                sort,
                page: 0,
                page_size,
            },
            Interaction::SetDimension(dimension, values) => Self {
                filter: filter.with_dimension(dimension, values),
                sort,
                page: 0,
                page_size,
            },
            Interaction::SetSearch(text) => Self {
                filter: FilterSpec {
                    search: text.trim().to_string(),
                    ..filter
                },
                sort,
                page: 0,
                page_size,
            },
            Interaction::ClearFilters => Self {
                filter: filter.cleared(),
                sort,
                page: 0,
                page_size,
            },
            Interaction::SortBy(key) => Self {
                filter,
                sort: sort.select(key),
                page: 0,
                page_size,
            },
            Interaction::Navigate(nav) => Self {
                page: navigate(page, nav, filtered_count, page_size),
                filter,
                sort,
                page_size,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::Status;
    use crate::sort::SortDirection;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 31).unwrap()
    }

    fn fresh() -> DashboardState {
        DashboardState::for_environment(today(), &DashboardConfig::default())
    }

    #[test]
    fn test_environment_defaults() {
        let state = fresh();
        assert_eq!(state.filter.from_date, NaiveDate::from_ymd_opt(2024, 3, 1));
        assert_eq!(state.filter.to_date, Some(today()));
        assert!(!state.filter.has_dimension_filters());
        assert!(state.filter.search.is_empty());
        assert_eq!(state.sort.key, SortKey::CreatedOn);
        assert_eq!(state.sort.direction, SortDirection::Desc);
        assert_eq!(state.page, 0);
        assert_eq!(state.page_size, 25);
    }

    #[test]
    fn test_filter_changes_reset_page() {
        let state = DashboardState { page: 3, ..fresh() };
        let next = state.apply(
            Interaction::SetDimension(Dimension::Status, vec!["FAILED".into()]),
            200,
        );
        assert_eq!(next.page, 0);
        assert_eq!(next.filter.statuses, vec![Status::Failed]);
    }

    #[test]
    fn test_sort_resets_page_and_toggles() {
        let state = DashboardState { page: 2, ..fresh() };
        let next = state.apply(Interaction::SortBy(SortKey::CreatedOn), 200);
        assert_eq!(next.page, 0);
        assert_eq!(next.sort.direction, SortDirection::Asc);

        let next = next.apply(Interaction::SortBy(SortKey::Status), 200);
        assert_eq!(next.sort.key, SortKey::Status);
        assert_eq!(next.sort.direction, SortDirection::Desc);
    }

    #[test]
    fn test_search_is_trimmed() {
        let next = fresh().apply(Interaction::SetSearch("  hotfix  ".into()), 0);
        assert_eq!(next.filter.search, "hotfix");
    }

    #[test]
    fn test_clear_filters_keeps_dates() {
        let state = fresh()
            .apply(Interaction::SetSearch("x".into()), 0)
            .apply(
                Interaction::SetDimension(Dimension::TriggeredBy, vec!["a@b".into()]),
                0,
            )
            .apply(Interaction::ClearFilters, 0);
        assert!(!state.filter.has_dimension_filters());
        assert!(state.filter.search.is_empty());
        assert_eq!(state.filter.to_date, Some(today()));
        assert!(state.filter.from_date.is_some());
    }

    #[test]
    fn test_apply_date_range() {
        let from = NaiveDate::from_ymd_opt(2024, 1, 1);
        let state = DashboardState { page: 1, ..fresh() }
            .apply(Interaction::ApplyDateRange { from, to: None }, 0);
        assert_eq!(state.filter.from_date, from);
        assert_eq!(state.filter.to_date, None);
        assert_eq!(state.page, 0);
    }

    #[test]
    fn test_navigation_clamps() {
        let state = fresh();
        let state = state.apply(Interaction::Navigate(PageNav::Next), 60);
        assert_eq!(state.page, 1);
        let state = state.apply(Interaction::Navigate(PageNav::Next), 60);
        assert_eq!(state.page, 2);
        let state = state.apply(Interaction::Navigate(PageNav::Next), 60);
        assert_eq!(state.page, 2);
        let state = state.apply(Interaction::Navigate(PageNav::First), 60);
        assert_eq!(state.page, 0);
        let state = state.apply(Interaction::Navigate(PageNav::Prev), 60);
        assert_eq!(state.page, 0);
        let state = state.apply(Interaction::Navigate(PageNav::Last), 60);
        assert_eq!(state.page, 2);
        let state = state.apply(Interaction::Navigate(PageNav::Last), 0);
        assert_eq!(state.page, 0);
    }
}
