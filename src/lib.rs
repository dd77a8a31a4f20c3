//! Target Range - a click-the-target wallpaper
//!
//! Core modules:
//! - `sim`: Deterministic placement engine (bounds, spawn region, sampler, registry, state machine)
//! - `settings`: User-adjustable configuration and the property channel
//! - `platform`: Browser bridge for the host page renderer

pub mod platform;
pub mod settings;
pub mod sim;

pub use settings::{Settings, SettingsError, UserProperties};
pub use sim::{Mode, RangeEvent, RegionState, TargetRange};

/// Scene configuration constants
pub mod consts {
    /// Orthographic frustum height in world units
    pub const FRUSTUM_SIZE: f32 = 100.0;
    /// Half of the frustum height (vertical half-extent of the visible area)
    pub const HALF_EXTENT: f32 = FRUSTUM_SIZE / 2.0;

    /// Ball defaults
    pub const DEFAULT_BALL_SIZE: f32 = 2.0;
    /// Minimum spacing between balls, as a multiple of ball radius
    pub const SEPARATION_FACTOR: f32 = 2.5;

    /// Rejection sampling attempts before the fallback placement
    pub const MAX_PLACEMENT_ATTEMPTS: u32 = 50;

    /// Initial population per mode
    pub const HEADSHOT_POPULATION: usize = 2;
    pub const FREE_POPULATION: usize = 20;
    /// Upper limit accepted from the property channel
    pub const MAX_POPULATION: usize = 200;
}
