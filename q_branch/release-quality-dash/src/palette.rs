//! Display colors for statuses, release types and chart series.

use crate::record::Status;
use serde::{Serialize, Serializer};
use std::fmt;

/// An opaque 24-bit RGB color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    /// Build from a `0xRRGGBB` literal.
    pub const fn hex(rgb: u32) -> Self {
        Self {
            r: ((rgb >> 16) & 0xff) as u8,
            g: ((rgb >> 8) & 0xff) as u8,
            b: (rgb & 0xff) as u8,
        }
    }

    pub const WHITE: Color = Color::hex(0xffffff);
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

impl Serialize for Color {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Color for statuses the palette does not know.
pub const FALLBACK_STATUS_COLOR: Color = Color::hex(0x9ca3af);

/// Fixed chart color for a status.
pub fn status_color(status: &Status) -> Color {
    match status {
        Status::Succeeded => Color::hex(0x22c55e),
        Status::Failed => Color::hex(0xef4444),
        Status::Fault => Color::hex(0xf97316),
        Status::TimedOut => Color::hex(0xeab308),
        Status::Stopped => Color::hex(0x6b7280),
        Status::Aborted => Color::hex(0x8b5cf6),
        Status::InProgress | Status::Started => Color::hex(0x3b82f6),
        Status::Queued => Color::hex(0xa78bfa),
        Status::PendingApproval => Color::hex(0xf59e0b),
        Status::Approved => Color::hex(0x10b981),
        Status::Rejected => Color::hex(0xdc2626),
        Status::Invalid => Color::hex(0x9ca3af),
        Status::Unknown => Color::hex(0xd1d5db),
        Status::Other(_) => FALLBACK_STATUS_COLOR,
    }
}

/// Cyclic palette for per-type bars, indexed by sorted label position.
pub const TYPE_PALETTE: [Color; 12] = [
    Color::hex(0x6366f1),
    Color::hex(0x0ea5e9),
    Color::hex(0x10b981),
    Color::hex(0xf59e0b),
    Color::hex(0xef4444),
    Color::hex(0x8b5cf6),
    Color::hex(0xec4899),
    Color::hex(0x14b8a6),
    Color::hex(0xf97316),
    Color::hex(0x84cc16),
    Color::hex(0x06b6d4),
    Color::hex(0xa855f7),
];

pub fn palette_color(index: usize) -> Color {
    TYPE_PALETTE[index % TYPE_PALETTE.len()]
}

/// Badge color for a release or deployment type label in the table.
pub fn type_badge_color(label: &str) -> Color {
    match label {
        "HOTFIX" => Color::hex(0xf97316),
        "RELEASE" => Color::hex(0x6366f1),
        "LAUNCH" => Color::hex(0x10b981),
        "DESTROY" => Color::hex(0xef4444),
        "CUSTOM" => Color::hex(0x8b5cf6),
        "PLAN" => Color::hex(0x0ea5e9),
        "ROLLBACK" => Color::hex(0xeab308),
        _ => Color::hex(0x6b7280),
    }
}

// Chart furniture.
pub const PLACEHOLDER_TEXT: Color = Color::hex(0x9ca3af);
pub const LEGEND_TEXT: Color = Color::hex(0x374151);
pub const AXIS_TEXT: Color = Color::hex(0x9ca3af);
pub const TICK_TEXT: Color = Color::hex(0x6b7280);
pub const GRID_LINE: Color = Color::hex(0xe5e7eb);

// Dashboard series.
pub const SERIES_COUNT: Color = Color::hex(0x6366f1);
pub const SERIES_SUCCEEDED: Color = Color::hex(0x22c55e);
pub const SERIES_FAILED: Color = Color::hex(0xef4444);
pub const SERIES_OTHER: Color = Color::hex(0x94a3b8);
pub const SERIES_RELEASES: Color = Color::hex(0x0ea5e9);
pub const SERIES_AVG_SECS: Color = Color::hex(0xf59e0b);
