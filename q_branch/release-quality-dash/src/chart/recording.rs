//! A surface that records draw calls instead of rasterizing them.
//!
//! Used to inspect chart geometry in layout tests.

use super::{Point, Rect, Surface, TextStyle};
use crate::palette::Color;

#[derive(Debug, Clone, PartialEq)]
pub enum DrawOp {
    Clear,
    FillRect {
        rect: Rect,
        color: Color,
    },
    FillWedge {
        center: Point,
        radius: f64,
        start: f64,
        end: f64,
        color: Color,
    },
    StrokeWedge {
        center: Point,
        radius: f64,
        start: f64,
        end: f64,
        color: Color,
        line_width: f64,
    },
    StrokeLine {
        from: Point,
        to: Point,
        color: Color,
        line_width: f64,
    },
    FillText {
        text: String,
        at: Point,
        style: TextStyle,
    },
}

#[derive(Debug, Clone)]
pub struct RecordingSurface {
    width: u32,
    height: u32,
    ops: Vec<DrawOp>,
}

impl RecordingSurface {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            ops: Vec::new(),
        }
    }

    /// Operations since the last clear, starting with the clear itself.
    pub fn ops(&self) -> &[DrawOp] {
        &self.ops
    }

    pub fn texts(&self) -> Vec<String> {
        self.text_runs().into_iter().map(|(t, _, _)| t).collect()
    }

    pub fn text_runs(&self) -> Vec<(String, Point, TextStyle)> {
        self.ops
            .iter()
            .filter_map(|op| match op {
                DrawOp::FillText { text, at, style } => Some((text.clone(), *at, *style)),
                _ => None,
            })
            .collect()
    }

    pub fn rects(&self) -> Vec<(Rect, Color)> {
        self.ops
            .iter()
            .filter_map(|op| match op {
                DrawOp::FillRect { rect, color } => Some((*rect, *color)),
                _ => None,
            })
            .collect()
    }

    /// Filled wedges as `(center, radius, start, end, color)`.
    pub fn wedges(&self) -> Vec<(Point, f64, f64, f64, Color)> {
        self.ops
            .iter()
            .filter_map(|op| match op {
                DrawOp::FillWedge {
                    center,
                    radius,
                    start,
                    end,
                    color,
                } => Some((*center, *radius, *start, *end, *color)),
                _ => None,
            })
            .collect()
    }

    pub fn lines(&self) -> Vec<(Point, Point)> {
        self.ops
            .iter()
            .filter_map(|op| match op {
                DrawOp::StrokeLine { from, to, .. } => Some((*from, *to)),
                _ => None,
            })
            .collect()
    }
}

impl Surface for RecordingSurface {
    fn width(&self) -> u32 {
        self.width
    }

    fn height(&self) -> u32 {
        self.height
    }

    fn clear(&mut self) {
        self.ops.clear();
        self.ops.push(DrawOp::Clear);
    }

    fn fill_rect(&mut self, rect: Rect, color: Color) {
        self.ops.push(DrawOp::FillRect { rect, color });
    }

    fn fill_wedge(&mut self, center: Point, radius: f64, start: f64, end: f64, color: Color) {
        self.ops.push(DrawOp::FillWedge {
            center,
            radius,
            start,
            end,
            color,
        });
    }

    fn stroke_wedge(
        &mut self,
        center: Point,
        radius: f64,
        start: f64,
        end: f64,
        color: Color,
        line_width: f64,
    ) {
        self.ops.push(DrawOp::StrokeWedge {
            center,
            radius,
            start,
            end,
            color,
            line_width,
        });
    }

    fn stroke_line(&mut self, from: Point, to: Point, color: Color, line_width: f64) {
        self.ops.push(DrawOp::StrokeLine {
            from,
            to,
            color,
            line_width,
        });
    }

    fn fill_text(&mut self, text: &str, at: Point, style: TextStyle) {
        self.ops.push(DrawOp::FillText {
            text: text.to_string(),
            at,
            style,
        });
    }
}
