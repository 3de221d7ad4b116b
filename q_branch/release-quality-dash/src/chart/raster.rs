//! In-memory RGBA surface.
//!
//! Shapes are rasterized by sampling pixel centers, without anti-aliasing.
//! Text is not rasterized; runs are kept with their anchor and style so a
//! caller can lay them out with a real font engine or export them.

use super::{Point, Rect, Surface, TextStyle};
use crate::error::{DashError, Result};
use crate::palette::Color;
use std::f64::consts::TAU;
use std::path::Path;

/// Text positioned on a [`PixelSurface`].
#[derive(Debug, Clone, PartialEq)]
pub struct TextRun {
    pub text: String,
    pub at: Point,
    pub style: TextStyle,
}

#[derive(Debug, Clone)]
pub struct PixelSurface {
    width: u32,
    height: u32,
    rgba: Vec<u8>,
    text: Vec<TextRun>,
}

impl PixelSurface {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            rgba: vec![0; width as usize * height as usize * 4],
            text: Vec::new(),
        }
    }

    /// RGBA at `(x, y)`, or `None` outside the surface.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = self.offset(x, y);
        Some([self.rgba[i], self.rgba[i + 1], self.rgba[i + 2], self.rgba[i + 3]])
    }

    pub fn rgba(&self) -> &[u8] {
        &self.rgba
    }

    pub fn text_runs(&self) -> &[TextRun] {
        &self.text
    }

    /// Binary PPM (P6), transparent pixels composited over white.
    pub fn to_ppm(&self) -> Vec<u8> {
        let header = format!("P6\n{} {}\n255\n", self.width, self.height);
        let mut out = Vec::with_capacity(header.len() + self.rgba.len() / 4 * 3);
        out.extend_from_slice(header.as_bytes());
        for px in self.rgba.chunks_exact(4) {
            let alpha = u32::from(px[3]);
            for channel in &px[..3] {
                let c = u32::from(*channel);
                out.push(((c * alpha + 255 * (255 - alpha)) / 255) as u8);
            }
        }
        out
    }

    pub fn write_ppm(&self, path: &Path) -> Result<()> {
        std::fs::write(path, self.to_ppm()).map_err(|source| DashError::Io {
            path: path.to_path_buf(),
            source,
        })
    }

    fn offset(&self, x: u32, y: u32) -> usize {
        (y as usize * self.width as usize + x as usize) * 4
    }

    fn put(&mut self, x: i64, y: i64, color: Color) {
        if x < 0 || y < 0 || x >= i64::from(self.width) || y >= i64::from(self.height) {
            return;
        }
        let i = self.offset(x as u32, y as u32);
        self.rgba[i..i + 4].copy_from_slice(&[color.r, color.g, color.b, 0xff]);
    }

    /// Pixel index range covering `[lo, hi)` along an axis of `len` pixels.
    fn span(lo: f64, hi: f64, len: u32) -> (i64, i64) {
        let start = lo.round().max(0.0) as i64;
        let end = hi.round().min(f64::from(len)) as i64;
        (start, end)
    }

    /// Square brush of `width` pixels centered on `p`.
    fn stamp(&mut self, p: Point, width: f64, color: Color) {
        let half = (width / 2.0).max(0.5);
        let (x0, x1) = Self::span(p.x - half, p.x + half, self.width);
        let (y0, y1) = Self::span(p.y - half, p.y + half, self.height);
        for y in y0..y1.max(y0 + 1) {
            for x in x0..x1.max(x0 + 1) {
                self.put(x, y, color);
            }
        }
    }
}

/// Whether `angle` lies on the clockwise sweep from `start` to `end`.
fn in_sweep(angle: f64, start: f64, end: f64) -> bool {
    let sweep = end - start;
    if sweep >= TAU {
        return true;
    }
    if sweep <= 0.0 {
        return false;
    }
    (angle - start).rem_euclid(TAU) <= sweep
}

impl Surface for PixelSurface {
    fn width(&self) -> u32 {
        self.width
    }

    fn height(&self) -> u32 {
        self.height
    }

    fn clear(&mut self) {
        self.rgba.fill(0);
        self.text.clear();
    }

    fn fill_rect(&mut self, rect: Rect, color: Color) {
        let (x0, x1) = Self::span(rect.x, rect.x + rect.width, self.width);
        let (y0, y1) = Self::span(rect.y, rect.y + rect.height, self.height);
        for y in y0..y1 {
            for x in x0..x1 {
                self.put(x, y, color);
            }
        }
    }

    fn fill_wedge(&mut self, center: Point, radius: f64, start: f64, end: f64, color: Color) {
        let (x0, x1) = Self::span(center.x - radius, center.x + radius, self.width);
        let (y0, y1) = Self::span(center.y - radius, center.y + radius, self.height);
        for y in y0..y1 {
            for x in x0..x1 {
                let dx = x as f64 + 0.5 - center.x;
                let dy = y as f64 + 0.5 - center.y;
                if dx.hypot(dy) <= radius && in_sweep(dy.atan2(dx), start, end) {
                    self.put(x, y, color);
                }
            }
        }
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
        let rim = |a: f64| Point::new(center.x + radius * a.cos(), center.y + radius * a.sin());
        self.stroke_line(center, rim(start), color, line_width);
        self.stroke_line(center, rim(end), color, line_width);
        let arc_steps = ((end - start).abs() * radius).ceil().max(1.0) as usize;
        for i in 0..=arc_steps {
            let a = start + (end - start) * i as f64 / arc_steps as f64;
            self.stamp(rim(a), line_width, color);
        }
    }

    fn stroke_line(&mut self, from: Point, to: Point, color: Color, line_width: f64) {
        let length = (to.x - from.x).hypot(to.y - from.y);
        let steps = length.ceil().max(1.0) as usize;
        for i in 0..=steps {
            let t = i as f64 / steps as f64;
            let p = Point::new(from.x + (to.x - from.x) * t, from.y + (to.y - from.y) * t);
            self.stamp(p, line_width, color);
        }
    }

    fn fill_text(&mut self, text: &str, at: Point, style: TextStyle) {
        self.text.push(TextRun {
            text: text.to_string(),
            at,
            style,
        });
    }
}
