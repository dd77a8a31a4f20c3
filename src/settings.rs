//! User-adjustable settings and the property channel
//!
//! The wallpaper host pushes partial property updates at any time. They are
//! parsed into [`UserProperties`], validated as a whole, and only then
//! applied to [`Settings`].

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::*;
use crate::sim::Mode;

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("ball size must be finite, > 0 and < 50 (got {0})")]
    InvalidBallSize(f32),
    #[error("ball count must be between 1 and 200 (got {0})")]
    InvalidBallCount(i64),
    #[error("render offset must be finite (got {0})")]
    InvalidOffset(f32),
    #[error("malformed properties: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Settings consumed by the placement engine
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    /// Ball radius in world units (also the edge margin)
    pub ball_size: f32,
    /// Start in headshot mode
    pub headshot: bool,
    /// Balls spawned on reset in free mode
    pub free_population: usize,
    /// Balls spawned on reset in headshot mode
    pub headshot_population: usize,
    /// Minimum spacing as a multiple of `ball_size`
    pub separation_factor: f32,

    // === Canvas placement ===
    pub render_offset_top: f32,
    pub render_offset_right: f32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            ball_size: DEFAULT_BALL_SIZE,
            headshot: true,
            free_population: FREE_POPULATION,
            headshot_population: HEADSHOT_POPULATION,
            separation_factor: SEPARATION_FACTOR,
            render_offset_top: 0.0,
            render_offset_right: 0.0,
        }
    }
}

/// One property from the host. Wallpaper Engine wraps values as
/// `{"value": x}`; plain values are accepted too.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum PropertyValue<T> {
    Wrapped { value: T },
    Plain(T),
}

impl<T: Copy> PropertyValue<T> {
    pub fn get(&self) -> T {
        match *self {
            PropertyValue::Wrapped { value } => value,
            PropertyValue::Plain(value) => value,
        }
    }
}

/// Partial settings update; absent keys leave the setting untouched
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProperties {
    #[serde(default, alias = "ballnumber")]
    pub ball_number: Option<PropertyValue<i64>>,
    #[serde(default, alias = "ballsize")]
    pub ball_size: Option<PropertyValue<f32>>,
    #[serde(default, alias = "renderareatop")]
    pub render_area_top: Option<PropertyValue<f32>>,
    #[serde(default, alias = "renderarearight")]
    pub render_area_right: Option<PropertyValue<f32>>,
    #[serde(default, alias = "headshotmode")]
    pub head_shot_mode: Option<PropertyValue<bool>>,
}

impl UserProperties {
    pub fn from_json(json: &str) -> Result<Self, SettingsError> {
        Ok(serde_json::from_str(json)?)
    }
}

/// What an applied update touched
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SettingsChange {
    pub ball_size: bool,
    pub population: bool,
    pub offsets: bool,
    pub mode: bool,
}

impl SettingsChange {
    pub fn is_empty(&self) -> bool {
        *self == SettingsChange::default()
    }
}

impl Settings {
    /// Starting population for a mode
    pub fn population(&self, mode: Mode) -> usize {
        match mode {
            Mode::Headshot => self.headshot_population,
            Mode::Free => self.free_population,
        }
    }

    /// Minimum distance between ball centers
    pub fn min_separation(&self) -> f32 {
        self.ball_size * self.separation_factor
    }

    /// Validate and apply a property update. Nothing changes on error.
    pub fn apply(&mut self, props: &UserProperties) -> Result<SettingsChange, SettingsError> {
        let ball_size = props.ball_size.map(|v| v.get());
        if let Some(size) = ball_size
            && !(size.is_finite() && size > 0.0 && size < HALF_EXTENT)
        {
            return Err(SettingsError::InvalidBallSize(size));
        }

        let population = match props.ball_number.map(|v| v.get()) {
            Some(n) if n < 1 || n > MAX_POPULATION as i64 => {
                return Err(SettingsError::InvalidBallCount(n));
            }
            Some(n) => Some(n as usize),
            None => None,
        };

        let top = props.render_area_top.map(|v| v.get());
        let right = props.render_area_right.map(|v| v.get());
        for offset in [top, right].into_iter().flatten() {
            if !offset.is_finite() {
                return Err(SettingsError::InvalidOffset(offset));
            }
        }

        let mut change = SettingsChange::default();
        if let Some(size) = ball_size
            && size != self.ball_size
        {
            self.ball_size = size;
            change.ball_size = true;
        }
        if let Some(n) = population
            && n != self.free_population
        {
            self.free_population = n;
            change.population = true;
        }
        if let Some(top) = top
            && top != self.render_offset_top
        {
            self.render_offset_top = top;
            change.offsets = true;
        }
        if let Some(right) = right
            && right != self.render_offset_right
        {
            self.render_offset_right = right;
            change.offsets = true;
        }
        if let Some(headshot) = props.head_shot_mode.map(|v| v.get())
            && headshot != self.headshot
        {
            self.headshot = headshot;
            change.mode = true;
        }

        if !change.is_empty() {
            log::info!("Settings updated: {:?}", change);
        }
        Ok(change)
    }
}
