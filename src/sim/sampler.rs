//! Placement sampler
//!
//! Rejection-samples a spawn point inside the effective rectangle, keeping a
//! minimum distance to existing balls. After `MAX_PLACEMENT_ATTEMPTS`
//! rejected candidates it falls back to one unconstrained draw, so a valid
//! rectangle always yields a position.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::bounds::BoundsRect;
use super::region::SpawnRegion;
use crate::consts::{FREE_POPULATION, HEADSHOT_POPULATION, MAX_PLACEMENT_ATTEMPTS};

/// Placement mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Mode {
    /// Every ball sits on one horizontal line
    Headshot,
    /// Balls anywhere in the effective rectangle
    Free,
}

impl Mode {
    pub fn from_headshot(headshot: bool) -> Self {
        if headshot { Mode::Headshot } else { Mode::Free }
    }

    pub fn toggled(self) -> Self {
        match self {
            Mode::Headshot => Mode::Free,
            Mode::Free => Mode::Headshot,
        }
    }

    pub fn is_headshot(self) -> bool {
        self == Mode::Headshot
    }

    /// Built-in starting population. A line needs far fewer targets than an
    /// area to stay uncluttered.
    pub fn default_population(self) -> usize {
        match self {
            Mode::Headshot => HEADSHOT_POPULATION,
            Mode::Free => FREE_POPULATION,
        }
    }

    /// Label for the mode button (names the mode it switches to)
    pub fn button_label(self) -> &'static str {
        match self {
            Mode::Headshot => "Switch to free mode",
            Mode::Free => "Switch to headshot mode",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum PlacementError {
    /// Ball margin leaves no visible area
    #[error("visible bounds are degenerate (margin exceeds half-extent)")]
    DegenerateBounds,
    /// The spawn region no longer overlaps the visible bounds
    #[error("spawn region lies outside the visible bounds")]
    EmptyRegion,
}

/// A sampled spawn point
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placement {
    pub pos: Vec2,
    /// The separation constraint could not be met; `pos` may overlap a ball
    pub saturated: bool,
}

/// The rectangle placements are drawn from: the active region clamped to
/// `bounds`, or `bounds` itself.
pub fn effective_rect(
    bounds: &BoundsRect,
    region: Option<&SpawnRegion>,
) -> Result<BoundsRect, PlacementError> {
    if !bounds.is_valid() {
        return Err(PlacementError::DegenerateBounds);
    }
    match region.filter(|r| r.is_active()) {
        Some(region) => {
            let rect = region.as_rect().intersect(bounds);
            if rect.is_valid() {
                Ok(rect)
            } else {
                Err(PlacementError::EmptyRegion)
            }
        }
        None => Ok(*bounds),
    }
}

/// Uniform draw in `[min, max]`
fn uniform<R: Rng + ?Sized>(rng: &mut R, min: f32, max: f32) -> f32 {
    let t: f32 = rng.random();
    (min + t * (max - min)).min(max).max(min)
}

/// Draw one candidate from `rect` honoring the mode's line constraint
pub fn draw_candidate<R: Rng + ?Sized>(rng: &mut R, rect: &BoundsRect, mode: Mode) -> Vec2 {
    let x = uniform(rng, rect.min_x, rect.max_x);
    let y = match mode {
        Mode::Headshot => rect.center().y,
        Mode::Free => uniform(rng, rect.min_y, rect.max_y),
    };
    Vec2::new(x, y)
}

/// Is `pos` at least `min_separation` away from every existing position
pub fn is_separated(
    pos: Vec2,
    existing: impl IntoIterator<Item = Vec2>,
    min_separation: f32,
) -> bool {
    existing
        .into_iter()
        .all(|other| pos.distance(other) >= min_separation)
}

/// Sample a spawn position.
///
/// Fails only when no rectangle exists to sample from. Otherwise returns a
/// point inside `bounds`; `saturated` is set when the fallback was used.
pub fn sample<R: Rng + ?Sized>(
    rng: &mut R,
    bounds: &BoundsRect,
    region: Option<&SpawnRegion>,
    mode: Mode,
    existing: &[Vec2],
    min_separation: f32,
) -> Result<Placement, PlacementError> {
    let rect = effective_rect(bounds, region)?;

    for _ in 0..MAX_PLACEMENT_ATTEMPTS {
        let pos = draw_candidate(rng, &rect, mode);
        if bounds.contains(pos) && is_separated(pos, existing.iter().copied(), min_separation) {
            return Ok(Placement {
                pos,
                saturated: false,
            });
        }
    }

    log::warn!(
        "placement saturated after {} attempts ({} balls, separation {})",
        MAX_PLACEMENT_ATTEMPTS,
        existing.len(),
        min_separation
    );
    Ok(Placement {
        pos: bounds.clamp(draw_candidate(rng, &rect, mode)),
        saturated: true,
    })
}
