use egui::Vec2;
use serde::{Deserialize, Serialize};

use crate::error::GestureError;

/// The committed (steady-state) pan and zoom of the canvas.
///
/// In-flight gesture deltas are kept by [`crate::input::GestureState`] and
/// combined with this only when a frame is laid out:
///
/// ```text
/// zoom = steady_zoom * gesture_zoom
/// pan  = (steady_pan + gesture_pan) * steady_zoom
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Viewport {
    pub steady_zoom: f32,
    pub steady_pan: Vec2,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            steady_zoom: 1.0,
            steady_pan: Vec2::ZERO,
        }
    }
}

impl Viewport {
    /// Effective zoom with the in-flight zoom factor applied.
    pub fn zoom_scale(&self, gesture_zoom: f32) -> f32 {
        self.steady_zoom * gesture_zoom
    }

    /// Effective pan with the in-flight pan delta applied.
    pub fn pan_offset(&self, gesture_pan: Vec2) -> Vec2 {
        (self.steady_pan + gesture_pan) * self.steady_zoom
    }

    pub fn commit_pan(&mut self, delta: Vec2) {
        self.steady_pan += delta;
    }

    pub fn commit_zoom(&mut self, factor: f32) -> Result<(), GestureError> {
        let zoom = self.steady_zoom * factor;
        if !is_valid_zoom(factor) || !is_valid_zoom(zoom) {
            return Err(GestureError::InvalidZoom(factor));
        }
        self.steady_zoom = zoom;
        Ok(())
    }

    /// Fits an image of `image` size inside `surface`, recentering the pan.
    ///
    /// Returns false (and leaves the viewport alone) when either size is empty.
    pub fn zoom_to_fit(&mut self, image: Vec2, surface: Vec2) -> bool {
        if image.x <= 0.0 || image.y <= 0.0 || surface.x <= 0.0 || surface.y <= 0.0 {
            return false;
        }
        let zoom = (surface.x / image.x).min(surface.y / image.y);
        if !is_valid_zoom(zoom) {
            return false;
        }
        self.steady_pan = Vec2::ZERO;
        self.steady_zoom = zoom;
        true
    }

    /// Repairs a viewport restored from storage.
    pub fn sanitized(self) -> Self {
        if is_valid_zoom(self.steady_zoom) && self.steady_pan.is_finite() {
            self
        } else {
            log::warn!("Discarding invalid stored viewport: {:?}", self);
            Self::default()
        }
    }
}

fn is_valid_zoom(zoom: f32) -> bool {
    zoom.is_finite() && zoom > 0.0
}
