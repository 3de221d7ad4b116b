//! Grouped multi-series bar chart.
//!
//! One group per label, one bar per series inside each group. The y axis
//! runs from 0 to the largest value with four gridlines above the baseline.

use super::{draw_placeholder, Point, Rect, Surface, TextAlign, TextStyle};
use crate::format::{ellipsize, fmt_number, truncate_chars};
use crate::palette::{Color, AXIS_TEXT, GRID_LINE, LEGEND_TEXT, TICK_TEXT};
use serde::Serialize;
use std::f64::consts::FRAC_PI_4;

const PAD_RIGHT: f64 = 15.0;
const PAD_TOP: f64 = 15.0;
const GRID_STEPS: usize = 4;
const GROUP_INSET: f64 = 4.0;
const GUTTER: f64 = 2.0;
const MAX_BAR_WIDTH: f64 = 32.0;
/// Bars at most this wide get no value label.
const MIN_LABELED_BAR_WIDTH: f64 = 14.0;
/// Beyond this many groups x labels are rotated.
const ROTATE_LABELS_ABOVE: usize = 7;
const LEGEND_COLUMN: f64 = 90.0;
const LEGEND_LABEL_CHARS: usize = 10;

/// One named series, aligned by index with the chart labels.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BarSeries {
    pub label: String,
    pub data: Vec<f64>,
    pub color: Color,
    /// Optional per-bar colors; bars without an entry use `color`.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub bar_colors: Vec<Color>,
}

impl BarSeries {
    pub fn new(label: impl Into<String>, data: Vec<f64>, color: Color) -> Self {
        Self {
            label: label.into(),
            data,
            color,
            bar_colors: Vec::new(),
        }
    }

    pub fn with_bar_colors(mut self, colors: Vec<Color>) -> Self {
        self.bar_colors = colors;
        self
    }

    fn value_at(&self, i: usize) -> f64 {
        self.data.get(i).copied().filter(|v| v.is_finite()).unwrap_or(0.0)
    }

    fn color_at(&self, i: usize) -> Color {
        self.bar_colors.get(i).copied().unwrap_or(self.color)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BarOptions {
    pub pad_left: f64,
    pub pad_bottom: f64,
}

impl Default for BarOptions {
    fn default() -> Self {
        Self {
            pad_left: 45.0,
            pad_bottom: 55.0,
        }
    }
}

impl BarOptions {
    pub fn with_pad_bottom(pad_bottom: f64) -> Self {
        Self {
            pad_bottom,
            ..Default::default()
        }
    }
}

/// A complete bar chart dataset.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BarChartData {
    pub labels: Vec<String>,
    pub datasets: Vec<BarSeries>,
    pub options: BarOptions,
}

impl BarChartData {
    pub fn draw<S: Surface + ?Sized>(&self, surface: &mut S) {
        draw_bar(surface, &self.labels, &self.datasets, self.options);
    }
}

/// Computed geometry of a bar chart.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BarLayout {
    pub pad_left: f64,
    pub chart_width: f64,
    pub chart_height: f64,
    pub group_width: f64,
    pub bar_width: f64,
    pub series_count: usize,
}

impl BarLayout {
    pub fn new(
        width: u32,
        height: u32,
        group_count: usize,
        series_count: usize,
        options: BarOptions,
    ) -> Self {
        let chart_width = f64::from(width) - options.pad_left - PAD_RIGHT;
        let chart_height = f64::from(height) - PAD_TOP - options.pad_bottom;
        let group_width = chart_width / group_count.max(1) as f64;
        let per_series = (group_width - GROUP_INSET) / series_count.max(1) as f64 - GUTTER;
        Self {
            pad_left: options.pad_left,
            chart_width,
            chart_height,
            group_width,
            bar_width: per_series.min(MAX_BAR_WIDTH).max(1.0),
            series_count,
        }
    }

    pub fn baseline(&self) -> f64 {
        PAD_TOP + self.chart_height
    }

    pub fn group_x(&self, group: usize) -> f64 {
        self.pad_left + group as f64 * self.group_width
    }

    /// Left edge of bar `series` in `group`, bars centered in the group.
    pub fn bar_x(&self, group: usize, series: usize) -> f64 {
        let stride = self.bar_width + GUTTER;
        let used = self.series_count as f64 * stride;
        self.group_x(group) + (self.group_width - used) / 2.0 + series as f64 * stride
    }
}

/// Draw a grouped bar chart. Empty labels or series draw the placeholder.
pub fn draw_bar<S: Surface + ?Sized>(
    surface: &mut S,
    labels: &[String],
    datasets: &[BarSeries],
    options: BarOptions,
) {
    surface.clear();
    if labels.is_empty() || datasets.is_empty() {
        draw_placeholder(surface);
        return;
    }

    let layout = BarLayout::new(
        surface.width(),
        surface.height(),
        labels.len(),
        datasets.len(),
        options,
    );
    let max_value = datasets
        .iter()
        .flat_map(|ds| ds.data.iter().copied())
        .filter(|v| v.is_finite())
        .fold(0.0_f64, f64::max)
        .max(1.0);

    draw_grid(surface, &layout, max_value);

    let value_style = TextStyle::new(LEGEND_TEXT, 9.0, TextAlign::Center);
    let rotate = labels.len() > ROTATE_LABELS_ABOVE;
    let label_style = if rotate {
        TextStyle::new(TICK_TEXT, 10.0, TextAlign::Right).rotated(-FRAC_PI_4)
    } else {
        TextStyle::new(TICK_TEXT, 10.0, TextAlign::Center)
    };

    for (gi, label) in labels.iter().enumerate() {
        for (di, ds) in datasets.iter().enumerate() {
            let v = ds.value_at(gi);
            let bar_height = (v / max_value * layout.chart_height).max(0.0);
            let bx = layout.bar_x(gi, di);
            let by = layout.baseline() - bar_height;
            surface.fill_rect(
                Rect::new(bx, by, layout.bar_width, bar_height),
                ds.color_at(gi),
            );
            if v > 0.0 && layout.bar_width > MIN_LABELED_BAR_WIDTH {
                surface.fill_text(
                    &fmt_number(v),
                    Point::new(bx + layout.bar_width / 2.0, by - 2.0),
                    value_style,
                );
            }
        }

        let anchor = Point::new(
            layout.group_x(gi) + layout.group_width / 2.0,
            layout.baseline() + 10.0,
        );
        surface.fill_text(&ellipsize(label, 10, 9), anchor, label_style);
    }

    if datasets.len() > 1 {
        draw_legend(surface, &layout, datasets);
    }
}

fn draw_grid<S: Surface + ?Sized>(surface: &mut S, layout: &BarLayout, max_value: f64) {
    let tick_style = TextStyle::new(AXIS_TEXT, 10.0, TextAlign::Right);
    for i in 0..=GRID_STEPS {
        let fraction = i as f64 / GRID_STEPS as f64;
        let y = layout.baseline() - fraction * layout.chart_height;
        surface.stroke_line(
            Point::new(layout.pad_left, y),
            Point::new(layout.pad_left + layout.chart_width, y),
            GRID_LINE,
            1.0,
        );
        surface.fill_text(
            &format!("{}", (fraction * max_value).round() as i64),
            Point::new(layout.pad_left - 4.0, y + 3.0),
            tick_style,
        );
    }
}

fn draw_legend<S: Surface + ?Sized>(surface: &mut S, layout: &BarLayout, datasets: &[BarSeries]) {
    let y = f64::from(surface.height()) - 14.0;
    let text_style = TextStyle::new(LEGEND_TEXT, 10.0, TextAlign::Left);
    for (i, ds) in datasets.iter().enumerate() {
        let x = layout.pad_left + i as f64 * LEGEND_COLUMN;
        surface.fill_rect(Rect::new(x, y - 8.0, 10.0, 10.0), ds.color);
        surface.fill_text(
            &truncate_chars(&ds.label, LEGEND_LABEL_CHARS),
            Point::new(x + 13.0, y),
            text_style,
        );
    }
}
