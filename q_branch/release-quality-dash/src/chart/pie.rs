//! Pie chart with a right-hand legend.

use super::{draw_placeholder, Point, Rect, Surface, TextAlign, TextStyle};
use crate::format::truncate_chars;
use crate::palette::{Color, LEGEND_TEXT};
use serde::Serialize;
use std::f64::consts::{FRAC_PI_2, TAU};

const MARGIN: f64 = 10.0;
const BORDER_WIDTH: f64 = 2.0;
const LEGEND_LABEL_CHARS: usize = 14;
const LEGEND_ROW: f64 = 20.0;
const SWATCH: f64 = 12.0;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PieSlice {
    pub label: String,
    pub value: f64,
    pub color: Color,
}

impl PieSlice {
    pub fn new(label: impl Into<String>, value: f64, color: Color) -> Self {
        Self {
            label: label.into(),
            value,
            color,
        }
    }
}

/// Rounded share of `value` in `total`, as shown in the legend.
pub fn percentage(value: f64, total: f64) -> i64 {
    if total > 0.0 {
        (value / total * 100.0).round() as i64
    } else {
        0
    }
}

/// Draw slices clockwise from 12 o'clock in input order.
///
/// The legend lists entries in the order given; callers sort beforehand.
pub fn draw_pie<S: Surface + ?Sized>(surface: &mut S, data: &[PieSlice]) {
    surface.clear();
    let total: f64 = data.iter().map(|d| d.value).sum();
    if total.is_nan() || total <= 0.0 {
        draw_placeholder(surface);
        return;
    }

    let w = f64::from(surface.width());
    let h = f64::from(surface.height());
    let center = Point::new(w * 0.38, h / 2.0);
    let radius = (center.x.min(center.y) - MARGIN).max(0.0);

    let mut start = -FRAC_PI_2;
    for d in data {
        let span = d.value / total * TAU;
        surface.fill_wedge(center, radius, start, start + span, d.color);
        surface.stroke_wedge(center, radius, start, start + span, Color::WHITE, BORDER_WIDTH);
        start += span;
    }

    let lx = w * 0.68;
    let ly = h / 2.0 - (data.len() as f64 * 16.0) / 2.0;
    let text_style = TextStyle::new(LEGEND_TEXT, 11.0, TextAlign::Left);
    for (i, d) in data.iter().enumerate() {
        let y = ly + i as f64 * LEGEND_ROW;
        surface.fill_rect(Rect::new(lx, y - 7.0, SWATCH, SWATCH), d.color);
        let text = format!(
            "{} ({}%)",
            truncate_chars(&d.label, LEGEND_LABEL_CHARS),
            percentage(d.value, total)
        );
        surface.fill_text(&text, Point::new(lx + SWATCH + 4.0, y + 3.0), text_style);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chart::{DrawOp, RecordingSurface, NO_DATA};
    use crate::palette::Color;

    fn red() -> Color {
        Color::hex(0xff0000)
    }

    #[test]
    fn test_empty_and_zero_total_draw_placeholder() {
        for data in [vec![], vec![PieSlice::new("a", 0.0, red())]] {
            let mut surface = RecordingSurface::new(480, 220);
            draw_pie(&mut surface, &data);
            assert_eq!(surface.ops()[0], DrawOp::Clear);
            assert_eq!(surface.texts(), vec![NO_DATA.to_string()]);
            assert!(surface.wedges().is_empty());
        }
    }

    #[test]
    fn test_geometry_and_angles() {
        let mut surface = RecordingSurface::new(500, 200);
        let data = vec![
            PieSlice::new("SUCCEEDED", 3.0, Color::hex(0x22c55e)),
            PieSlice::new("FAILED", 1.0, Color::hex(0xef4444)),
        ];
        draw_pie(&mut surface, &data);

        let wedges = surface.wedges();
        assert_eq!(wedges.len(), 2);
        let (center, radius, start, end, _) = wedges[0];
        assert_eq!(center, Point::new(190.0, 100.0));
        assert_eq!(radius, 90.0);
        assert!((start + FRAC_PI_2).abs() < 1e-9);
        assert!((end - start - 0.75 * TAU).abs() < 1e-9);
        let (_, _, second_start, second_end, _) = wedges[1];
        assert!((second_start - end).abs() < 1e-9);
        assert!((second_end - (-FRAC_PI_2 + TAU)).abs() < 1e-9);

        // Each slice is outlined.
        let outlines = surface
            .ops()
            .iter()
            .filter(|op| matches!(op, DrawOp::StrokeWedge { .. }))
            .count();
        assert_eq!(outlines, 2);
    }

    #[test]
    fn test_legend_labels_truncated_with_percentages() {
        let mut surface = RecordingSurface::new(480, 220);
        let data = vec![
            PieSlice::new("PENDING_APPROVAL_LONG", 1.0, red()),
            PieSlice::new("OK", 2.0, red()),
        ];
        draw_pie(&mut surface, &data);
        assert_eq!(
            surface.texts(),
            vec!["PENDING_APPROV (33%)".to_string(), "OK (67%)".to_string()]
        );
    }

    #[test]
    fn test_percentage_rounding_drift_is_bounded() {
        let values = [1.0, 1.0, 1.0];
        let total: f64 = values.iter().sum();
        let sum: i64 = values.iter().map(|v| percentage(*v, total)).sum();
        assert_eq!(sum, 99);
        assert!((sum - 100).abs() <= values.len() as i64);
    }
}
