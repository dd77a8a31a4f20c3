//! Visible placement rectangle
//!
//! Derived from the orthographic frustum and inset by the ball radius so a
//! ball placed on the edge is still fully visible.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Axis-aligned rectangle in world units (inclusive edges)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundsRect {
    pub min_x: f32,
    pub max_x: f32,
    pub min_y: f32,
    pub max_y: f32,
}

/// Compute the placement rectangle for a viewport.
///
/// `half_extent` is the vertical half-size of the frustum; the horizontal
/// half-size follows the aspect ratio. The result is not validated: a margin
/// at least as large as either half-size yields an inverted rectangle, which
/// callers detect through [`BoundsRect::is_valid`].
pub fn compute_bounds(
    viewport_width: f32,
    viewport_height: f32,
    half_extent: f32,
    margin: f32,
) -> BoundsRect {
    let half_x = half_extent * (viewport_width / viewport_height);
    BoundsRect {
        min_x: -half_x + margin,
        max_x: half_x - margin,
        min_y: -half_extent + margin,
        max_y: half_extent - margin,
    }
}

impl BoundsRect {
    pub fn new(min_x: f32, max_x: f32, min_y: f32, max_y: f32) -> Self {
        Self {
            min_x,
            max_x,
            min_y,
            max_y,
        }
    }

    /// False for inverted or non-finite rectangles
    pub fn is_valid(&self) -> bool {
        let finite = self.min_x.is_finite()
            && self.max_x.is_finite()
            && self.min_y.is_finite()
            && self.max_y.is_finite();
        finite && self.min_x <= self.max_x && self.min_y <= self.max_y
    }

    pub fn width(&self) -> f32 {
        self.max_x - self.min_x
    }

    pub fn height(&self) -> f32 {
        self.max_y - self.min_y
    }

    pub fn center(&self) -> Vec2 {
        Vec2::new(
            (self.min_x + self.max_x) / 2.0,
            (self.min_y + self.max_y) / 2.0,
        )
    }

    pub fn contains(&self, p: Vec2) -> bool {
        p.x >= self.min_x && p.x <= self.max_x && p.y >= self.min_y && p.y <= self.max_y
    }

    /// Clamp a point into the rectangle.
    ///
    /// Uses min/max rather than `f32::clamp` so an inverted rectangle or a
    /// NaN coordinate never panics.
    pub fn clamp(&self, p: Vec2) -> Vec2 {
        Vec2::new(
            p.x.min(self.max_x).max(self.min_x),
            p.y.min(self.max_y).max(self.min_y),
        )
    }

    /// Overlap of two rectangles (may be inverted if they are disjoint)
    pub fn intersect(&self, other: &BoundsRect) -> BoundsRect {
        BoundsRect {
            min_x: self.min_x.max(other.min_x),
            max_x: self.max_x.min(other.max_x),
            min_y: self.min_y.max(other.min_y),
            max_y: self.max_y.min(other.max_y),
        }
    }
}
