//! The full pipeline: records and state in, a renderable dashboard out.
//!
//! filter → sort → (paginate, aggregate) → chart datasets. Aggregates are
//! computed over the sorted filtered collection, so first-seen tie order in
//! rankings follows the current sort.

use crate::aggregate::{aggregate, Aggregates};
use crate::chart::{draw_pie, BarChartData, BarOptions, BarSeries, PieSlice, PixelSurface, Surface};
use crate::config::{CanvasSize, ChartSizes, DashboardConfig};
use crate::filter::apply_filter;
use crate::paginate::{paginate, PageInfo};
use crate::palette::{
    SERIES_AVG_SECS, SERIES_COUNT, SERIES_FAILED, SERIES_OTHER, SERIES_RELEASES, SERIES_SUCCEEDED,
};
use crate::record::DeploymentRecord;
use crate::sort::sort_records;
use crate::state::DashboardState;
use crate::table::{table_rows, TableRow};
use serde::Serialize;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum ChartKind {
    Status,
    Types,
    Trend,
    Actors,
    Durations,
}

impl ChartKind {
    pub const ALL: [ChartKind; 5] = [
        ChartKind::Status,
        ChartKind::Types,
        ChartKind::Actors,
        ChartKind::Trend,
        ChartKind::Durations,
    ];

    pub fn title(&self) -> &'static str {
        match self {
            ChartKind::Status => "Release Status Distribution",
            ChartKind::Types => "Releases by Type",
            ChartKind::Actors => "Top Triggerers",
            ChartKind::Trend => "Release Timeline (Succeeded vs Failed)",
            ChartKind::Durations => "Avg Duration by Release Type (s)",
        }
    }

    pub fn file_stem(&self) -> &'static str {
        match self {
            ChartKind::Status => "status",
            ChartKind::Types => "types",
            ChartKind::Actors => "triggerers",
            ChartKind::Trend => "timeline",
            ChartKind::Durations => "duration",
        }
    }

    pub fn canvas(&self, sizes: &ChartSizes) -> CanvasSize {
        match self {
            ChartKind::Trend => sizes.wide,
            _ => sizes.narrow,
        }
    }
}

/// Datasets for the five dashboard charts.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartSet {
    pub status: Vec<PieSlice>,
    pub types: BarChartData,
    pub trend: BarChartData,
    pub actors: BarChartData,
    pub durations: BarChartData,
}

fn counts(values: impl Iterator<Item = usize>) -> Vec<f64> {
    values.map(|v| v as f64).collect()
}

impl ChartSet {
    pub fn from_aggregates(agg: &Aggregates) -> Self {
        let status = agg
            .statuses
            .iter()
            .map(|s| PieSlice::new(s.status.as_str(), s.count as f64, s.color))
            .collect();

        let types = BarChartData {
            labels: agg.release_types.iter().map(|t| t.label.clone()).collect(),
            datasets: vec![
                BarSeries::new(
                    "Count",
                    counts(agg.release_types.iter().map(|t| t.count)),
                    SERIES_COUNT,
                )
                .with_bar_colors(agg.release_types.iter().map(|t| t.color).collect()),
            ],
            options: BarOptions::with_pad_bottom(55.0),
        };

        let buckets = &agg.trend.buckets;
        let trend = BarChartData {
            labels: agg.trend.labels(),
            datasets: vec![
                BarSeries::new(
                    "Succeeded",
                    counts(buckets.iter().map(|b| b.succeeded)),
                    SERIES_SUCCEEDED,
                ),
                BarSeries::new("Failed", counts(buckets.iter().map(|b| b.failed)), SERIES_FAILED),
                BarSeries::new("Other", counts(buckets.iter().map(|b| b.other)), SERIES_OTHER),
            ],
            options: BarOptions::with_pad_bottom(65.0),
        };

        let actors = BarChartData {
            labels: agg.top_actors.iter().map(|a| a.label.clone()).collect(),
            datasets: vec![BarSeries::new(
                "Releases",
                counts(agg.top_actors.iter().map(|a| a.count)),
                SERIES_RELEASES,
            )],
            options: BarOptions::with_pad_bottom(65.0),
        };

        let durations = BarChartData {
            labels: agg.durations.iter().map(|d| d.label.clone()).collect(),
            datasets: vec![BarSeries::new(
                "Avg Secs",
                agg.durations.iter().map(|d| d.avg_secs as f64).collect(),
                SERIES_AVG_SECS,
            )],
            options: BarOptions::with_pad_bottom(55.0),
        };

        Self {
            status,
            types,
            trend,
            actors,
            durations,
        }
    }

    pub fn draw<S: Surface + ?Sized>(&self, kind: ChartKind, surface: &mut S) {
        match kind {
            ChartKind::Status => draw_pie(surface, &self.status),
            ChartKind::Types => self.types.draw(surface),
            ChartKind::Trend => self.trend.draw(surface),
            ChartKind::Actors => self.actors.draw(surface),
            ChartKind::Durations => self.durations.draw(surface),
        }
    }

    /// Rasterize every chart at its configured canvas size.
    pub fn rasterize(&self, sizes: &ChartSizes) -> Vec<(ChartKind, PixelSurface)> {
        ChartKind::ALL
            .into_iter()
            .map(|kind| {
                let canvas = kind.canvas(sizes);
                let mut surface = PixelSurface::new(canvas.width, canvas.height);
                self.draw(kind, &mut surface);
                (kind, surface)
            })
            .collect()
    }
}

/// Everything needed to render the dashboard for one state.
#[derive(Debug, Clone, Serialize)]
pub struct DashboardView {
    pub state: DashboardState,
    /// Size of the filtered collection.
    pub shown: usize,
    pub page: PageInfo,
    pub rows: Vec<TableRow>,
    pub aggregates: Aggregates,
    pub charts: ChartSet,
}

pub fn build_view(
    records: &[DeploymentRecord],
    state: &DashboardState,
    config: &DashboardConfig,
) -> DashboardView {
    let filtered = apply_filter(records, &state.filter);
    let sorted = sort_records(filtered, state.sort);
    let (page_records, page) = paginate(&sorted, state.page, state.page_size);
    let rows = table_rows(page_records, &page);
    let aggregates = aggregate(&sorted, records, config.aggregate_limits());
    let charts = ChartSet::from_aggregates(&aggregates);

    debug!(
        records = records.len(),
        shown = sorted.len(),
        page = page.page,
        total_pages = page.total_pages,
        granularity = ?aggregates.trend.granularity,
        "Built dashboard view"
    );

    DashboardView {
        state: state.clone(),
        shown: sorted.len(),
        page,
        rows,
        aggregates,
        charts,
    }
}
