//! Conversion between screen space and document coordinates.
//!
//! Document coordinates are integers with the origin at the document center.
//! Screen points live in the rendering surface's space, with the surface
//! center at `center`.

use egui::{Pos2, Vec2};
use serde::{Deserialize, Serialize};

/// A resolution-independent position of a placed emoji
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DocCoord {
    pub x: i32,
    pub y: i32,
}

impl DocCoord {
    pub const ORIGIN: Self = Self { x: 0, y: 0 };

    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Offsets the coordinate, dropping the fractional part of `delta`.
    pub fn offset_by(self, delta: Vec2) -> Self {
        Self {
            x: self.x.saturating_add(delta.x as i32),
            y: self.y.saturating_add(delta.y as i32),
        }
    }
}

impl From<(i32, i32)> for DocCoord {
    fn from((x, y): (i32, i32)) -> Self {
        Self { x, y }
    }
}

/// `screen = center + doc * zoom + pan`
pub fn to_screen(doc: DocCoord, center: Pos2, pan: Vec2, zoom: f32) -> Pos2 {
    Pos2::new(
        center.x + doc.x as f32 * zoom + pan.x,
        center.y + doc.y as f32 * zoom + pan.y,
    )
}

/// Inverse of [`to_screen`], truncated toward zero.
pub fn to_doc(screen: Pos2, center: Pos2, pan: Vec2, zoom: f32) -> DocCoord {
    DocCoord {
        x: ((screen.x - pan.x - center.x) / zoom) as i32,
        y: ((screen.y - pan.y - center.y) / zoom) as i32,
    }
}

/// Converts a screen-space translation into document units.
pub fn delta_to_doc(delta: Vec2, zoom: f32) -> Vec2 {
    delta / zoom
}

/// The effective transform for one frame: surface center plus combined pan/zoom.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CanvasTransform {
    pub center: Pos2,
    pub pan: Vec2,
    pub zoom: f32,
}

impl Default for CanvasTransform {
    fn default() -> Self {
        Self {
            center: Pos2::ZERO,
            pan: Vec2::ZERO,
            zoom: 1.0,
        }
    }
}

impl CanvasTransform {
    pub fn to_screen(&self, doc: DocCoord) -> Pos2 {
        to_screen(doc, self.center, self.pan, self.zoom)
    }

    pub fn to_doc(&self, screen: Pos2) -> DocCoord {
        to_doc(screen, self.center, self.pan, self.zoom)
    }
}
