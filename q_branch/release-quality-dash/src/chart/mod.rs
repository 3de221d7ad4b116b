//! Chart rendering primitives.
//!
//! Pie and grouped-bar charts are drawn through the [`Surface`] trait, a
//! minimal immediate-mode canvas. Drawing is stateless: every call clears the
//! surface and redraws everything from the dataset it is given.
//!
//! - `pie` - pie chart with a percentage legend
//! - `bar` - grouped multi-series bar chart with gridlines and legend
//! - `raster` - in-memory RGBA surface, PPM encoding
//! - `recording` - surface that records draw operations

pub mod bar;
pub mod pie;
pub mod raster;
pub mod recording;

pub use bar::{draw_bar, BarChartData, BarOptions, BarSeries};
pub use pie::{draw_pie, PieSlice};
pub use raster::PixelSurface;
pub use recording::{DrawOp, RecordingSurface};

use crate::palette::{Color, PLACEHOLDER_TEXT};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextAlign {
    Left,
    Center,
    Right,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextStyle {
    pub color: Color,
    pub size_px: f64,
    pub align: TextAlign,
    /// Rotation about the anchor in radians; negative is counter-clockwise.
    pub rotation: f64,
}

impl TextStyle {
    pub fn new(color: Color, size_px: f64, align: TextAlign) -> Self {
        Self {
            color,
            size_px,
            align,
            rotation: 0.0,
        }
    }

    pub fn rotated(mut self, radians: f64) -> Self {
        self.rotation = radians;
        self
    }
}

/// A fixed-size drawing target.
///
/// Angles are in radians, measured clockwise from 3 o'clock, in a y-down
/// coordinate space (so `-PI/2` points at 12 o'clock).
pub trait Surface {
    fn width(&self) -> u32;
    fn height(&self) -> u32;

    /// Erase everything to transparent.
    fn clear(&mut self);

    fn fill_rect(&mut self, rect: Rect, color: Color);

    /// Fill the circular sector from `start` to `end`.
    fn fill_wedge(&mut self, center: Point, radius: f64, start: f64, end: f64, color: Color);

    /// Outline the sector: both radii and the arc.
    fn stroke_wedge(
        &mut self,
        center: Point,
        radius: f64,
        start: f64,
        end: f64,
        color: Color,
        line_width: f64,
    );

    fn stroke_line(&mut self, from: Point, to: Point, color: Color, line_width: f64);

    /// Draw `text` anchored at `at` (baseline, aligned per `style.align`).
    fn fill_text(&mut self, text: &str, at: Point, style: TextStyle);
}

pub const NO_DATA: &str = "No data";

/// Centered "No data" message for empty datasets.
pub(crate) fn draw_placeholder<S: Surface + ?Sized>(surface: &mut S) {
    let center = Point::new(
        f64::from(surface.width()) / 2.0,
        f64::from(surface.height()) / 2.0,
    );
    surface.fill_text(
        NO_DATA,
        center,
        TextStyle::new(PLACEHOLDER_TEXT, 13.0, TextAlign::Center),
    );
}
