//! Deterministic placement engine
//!
//! Everything that decides where targets appear lives here. This module must
//! stay pure and deterministic:
//! - Seeded RNG only
//! - Stable iteration order (by ball id)
//! - No rendering or platform dependencies

pub mod bounds;
pub mod range;
pub mod region;
pub mod registry;
pub mod sampler;
pub mod viewport;

pub use bounds::{BoundsRect, compute_bounds};
pub use range::{RangeEvent, TargetRange};
pub use region::{
    OutlineHandle, RegionSelector, RegionState, SpawnRegion, Transition, update_region,
};
pub use registry::{Ball, BallId, BallRegistry};
pub use sampler::{Mode, Placement, PlacementError, effective_rect, is_separated, sample};
pub use viewport::Viewport;
