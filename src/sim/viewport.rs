//! Viewport geometry and pointer unprojection
//!
//! The canvas is the window width/height, pushed down by `offset_top` and
//! left by `offset_right`. The camera is orthographic with a fixed frustum
//! height, so unprojection is a linear map.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::HALF_EXTENT;

/// Render surface size and placement
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
    /// Canvas offset from the top of the window (px)
    pub offset_top: f32,
    /// Canvas offset from the right of the window (px)
    pub offset_right: f32,
}

impl Viewport {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            width,
            height,
            offset_top: 0.0,
            offset_right: 0.0,
        }
    }

    pub fn with_offsets(mut self, top: f32, right: f32) -> Self {
        self.offset_top = top;
        self.offset_right = right;
        self
    }

    /// Width / height, or 0 for a collapsed viewport
    pub fn aspect(&self) -> f32 {
        if self.height > 0.0 {
            self.width / self.height
        } else {
            0.0
        }
    }

    /// Window client coordinates to canvas pixels
    pub fn client_to_canvas(&self, x: f32, y: f32) -> Vec2 {
        // Canvas has the window's width, so anchoring it `offset_right` from
        // the right edge shifts its left edge to -offset_right.
        Vec2::new(x + self.offset_right, y - self.offset_top)
    }

    /// Canvas pixels to world coordinates on the z = 0 plane
    pub fn canvas_to_world(&self, px: Vec2) -> Vec2 {
        if self.width <= 0.0 || self.height <= 0.0 {
            return Vec2::ZERO;
        }
        let ndc_x = (px.x / self.width) * 2.0 - 1.0;
        let ndc_y = -(px.y / self.height) * 2.0 + 1.0;
        Vec2::new(ndc_x * HALF_EXTENT * self.aspect(), ndc_y * HALF_EXTENT)
    }

    pub fn client_to_world(&self, x: f32, y: f32) -> Vec2 {
        self.canvas_to_world(self.client_to_canvas(x, y))
    }
}
