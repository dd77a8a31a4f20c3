//! Target range state machine
//!
//! Owns the mode, the spawn-region selector and the ball registry, and turns
//! external input (buttons, pointer, clicks, resizes, property updates) into
//! registry changes. Every change is reported as a [`RangeEvent`] for the
//! renderer to drain.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::Serialize;

use super::bounds::{BoundsRect, compute_bounds};
use super::region::{OutlineHandle, RegionSelector, RegionState, SpawnRegion, Transition};
use super::registry::{Ball, BallId, BallRegistry};
use super::sampler::{Mode, sample};
use super::viewport::Viewport;
use crate::consts::HALF_EXTENT;
use crate::settings::{Settings, SettingsChange, SettingsError, UserProperties};

/// Handle of the single region outline visual
const REGION_OUTLINE: OutlineHandle = OutlineHandle(0);

/// Notifications for the renderer and UI
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum RangeEvent {
    BallSpawned {
        id: BallId,
        pos: Vec2,
        radius: f32,
        /// Placed by the fallback; may overlap another ball
        saturated: bool,
    },
    BallDespawned {
        id: BallId,
    },
    ModeChanged {
        mode: Mode,
    },
    RegionStateChanged {
        state: RegionState,
    },
    /// Replace the outline visual; `None` removes it
    RegionOutline {
        handle: OutlineHandle,
        outline: Option<[Vec2; 5]>,
    },
}

pub struct TargetRange {
    settings: Settings,
    viewport: Viewport,
    mode: Mode,
    selector: RegionSelector,
    registry: BallRegistry,
    rng: Pcg32,
    events: Vec<RangeEvent>,
}

impl TargetRange {
    /// Create a range and spawn the starting population
    pub fn new(settings: Settings, viewport: Viewport, seed: u64) -> Self {
        let viewport =
            viewport.with_offsets(settings.render_offset_top, settings.render_offset_right);
        let mut range = Self {
            mode: Mode::from_headshot(settings.headshot),
            settings,
            viewport,
            selector: RegionSelector::new(REGION_OUTLINE),
            registry: BallRegistry::new(),
            rng: Pcg32::seed_from_u64(seed),
            events: Vec::new(),
        };
        range.reset();
        range
    }

    // === Queries ===

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn region_state(&self) -> RegionState {
        self.selector.state()
    }

    pub fn region(&self) -> SpawnRegion {
        self.selector.region()
    }

    pub fn outline_handle(&self) -> OutlineHandle {
        self.selector.outline_handle()
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    /// Current visible placement rectangle
    pub fn bounds(&self) -> BoundsRect {
        compute_bounds(
            self.viewport.width,
            self.viewport.height,
            HALF_EXTENT,
            self.settings.ball_size,
        )
    }

    pub fn balls(&self) -> &[Ball] {
        self.registry.as_slice()
    }

    pub fn count(&self) -> usize {
        self.registry.count()
    }

    /// Pops, refresh and mode toggling are ignored while drawing a region
    pub fn is_input_suppressed(&self) -> bool {
        self.selector.is_selecting()
    }

    /// Take all pending events in the order they happened
    pub fn drain_events(&mut self) -> Vec<RangeEvent> {
        std::mem::take(&mut self.events)
    }

    // === Spawning ===

    /// Place and register one ball. Returns None if no position exists.
    fn spawn_one(&mut self) -> Option<Ball> {
        let bounds = self.bounds();
        let region = self.selector.region();
        let existing: Vec<Vec2> = self.registry.positions().collect();
        let placement = match sample(
            &mut self.rng,
            &bounds,
            Some(&region),
            self.mode,
            &existing,
            self.settings.min_separation(),
        ) {
            Ok(placement) => placement,
            Err(e) => {
                log::warn!("No valid spawn position: {}", e);
                return None;
            }
        };

        let ball = self.registry.spawn(placement.pos, self.settings.ball_size);
        log::debug!(
            "Spawned ball {} at ({:.2}, {:.2}){}",
            ball.id.0,
            ball.pos.x,
            ball.pos.y,
            if placement.saturated { " [saturated]" } else { "" }
        );
        self.events.push(RangeEvent::BallSpawned {
            id: ball.id,
            pos: ball.pos,
            radius: ball.radius,
            saturated: placement.saturated,
        });
        Some(ball)
    }

    /// Despawn everything and respawn the mode's starting population.
    /// Runs inside one `&mut` borrow, so no observer sees a partial reset.
    fn reset(&mut self) {
        for id in self.registry.despawn_all() {
            self.events.push(RangeEvent::BallDespawned { id });
        }
        let target = self.settings.population(self.mode);
        for _ in 0..target {
            if self.spawn_one().is_none() {
                break;
            }
        }
        log::info!(
            "Reset: {} balls ({:?} mode, region {:?})",
            self.registry.count(),
            self.mode,
            self.selector.state()
        );
    }

    /// Switch mode without repopulating; callers reset afterwards
    fn switch_mode(&mut self, mode: Mode) {
        self.mode = mode;
        self.settings.headshot = mode.is_headshot();
        self.events.push(RangeEvent::ModeChanged { mode });
        log::info!("Mode changed to {:?}", mode);
    }

    fn set_mode(&mut self, mode: Mode) {
        self.switch_mode(mode);
        self.reset();
    }

    /// Mode requested through the property channel but not applied yet
    fn pending_mode(&self) -> Option<Mode> {
        let requested = Mode::from_headshot(self.settings.headshot);
        (requested != self.mode).then_some(requested)
    }

    // === Buttons ===

    /// Flip headshot/free and repopulate. Returns false while suppressed.
    pub fn toggle_mode(&mut self) -> bool {
        if self.is_input_suppressed() {
            return false;
        }
        self.set_mode(self.mode.toggled());
        true
    }

    /// Manual repopulate. Returns false while suppressed.
    pub fn refresh(&mut self) -> bool {
        if self.is_input_suppressed() {
            return false;
        }
        self.reset();
        true
    }

    /// Cycle the area selection: select, confirm, clear
    pub fn press_area_button(&mut self) -> Transition {
        let was_drawing = self.selector.is_drawing();
        let transition = self.selector.advance();
        if transition == Transition::Confirmed && was_drawing {
            log::debug!("Confirmed mid-drag; dropping the drag");
        }
        match transition {
            Transition::Started | Transition::Cleared => {
                self.events.push(RangeEvent::RegionOutline {
                    handle: self.selector.outline_handle(),
                    outline: None,
                });
            }
            Transition::Confirmed | Transition::Rejected => {}
        }
        if transition != Transition::Rejected {
            self.events.push(RangeEvent::RegionStateChanged {
                state: self.selector.state(),
            });
            log::info!("Area selection: {:?}", self.selector.state());
        }
        if transition.changes_constraints() {
            // A mode change deferred while selecting lands with this reset
            if let Some(mode) = self.pending_mode() {
                self.switch_mode(mode);
            }
            self.reset();
        }
        transition
    }

    // === Pointer (world coordinates) ===

    pub fn pointer_down(&mut self, p: Vec2) {
        self.selector.pointer_down(p);
    }

    pub fn pointer_move(&mut self, p: Vec2) {
        let bounds = self.bounds();
        if self.selector.pointer_move(p, &bounds) {
            self.emit_outline();
        }
    }

    pub fn pointer_up(&mut self, p: Vec2) {
        let bounds = self.bounds();
        if self.selector.pointer_up(p, &bounds) {
            self.emit_outline();
        }
    }

    fn emit_outline(&mut self) {
        self.events.push(RangeEvent::RegionOutline {
            handle: self.selector.outline_handle(),
            outline: Some(self.selector.region().outline()),
        });
    }

    // === Targets ===

    /// Pop a ball reported by an external hit-test and spawn a replacement.
    /// Unknown ids are ignored.
    pub fn pop(&mut self, id: BallId) -> Option<BallId> {
        if self.is_input_suppressed() {
            return None;
        }
        let ball = self.registry.despawn(id)?;
        self.events.push(RangeEvent::BallDespawned { id: ball.id });
        log::debug!("Popped ball {}", ball.id.0);
        self.spawn_one();
        Some(ball.id)
    }

    /// Click at a world point: pop the topmost ball under it
    pub fn click(&mut self, p: Vec2) -> Option<BallId> {
        if self.is_input_suppressed() {
            return None;
        }
        let id = self.registry.hit_test(p)?;
        self.pop(id)
    }

    /// Click at window client coordinates
    pub fn click_client(&mut self, x: f32, y: f32) -> Option<BallId> {
        let p = self.viewport.client_to_world(x, y);
        self.click(p)
    }

    // === Host notifications ===

    /// Viewport resized. Existing balls stay; the region is re-clamped.
    pub fn resize(&mut self, width: f32, height: f32) {
        self.viewport.width = width;
        self.viewport.height = height;
        log::info!("Viewport resized to {}x{}", width, height);
        self.reclamp_region();
    }

    fn reclamp_region(&mut self) {
        let bounds = self.bounds();
        if !bounds.is_valid() {
            log::warn!("Visible bounds are degenerate: {:?}", bounds);
            return;
        }
        if self.selector.reclamp(&bounds) {
            self.emit_outline();
        }
    }

    /// Apply a property update from the host.
    ///
    /// Size and count changes only affect future spawns. A headshot change
    /// switches mode and repopulates, or waits for the region to be confirmed
    /// while one is being drawn.
    pub fn apply_properties(
        &mut self,
        props: &UserProperties,
    ) -> Result<SettingsChange, SettingsError> {
        let change = self.settings.apply(props)?;
        if change.offsets {
            self.viewport = self.viewport.with_offsets(
                self.settings.render_offset_top,
                self.settings.render_offset_right,
            );
        }
        if change.ball_size {
            self.reclamp_region();
        }
        if change.population {
            log::info!(
                "Free mode population set to {}; applies on next reset",
                self.settings.free_population
            );
        }
        if change.mode {
            match self.pending_mode() {
                Some(mode) if self.is_input_suppressed() => {
                    log::info!("Deferring switch to {:?} until area selection ends", mode);
                }
                Some(mode) => self.set_mode(mode),
                None => {}
            }
        }
        Ok(change)
    }

    /// Parse and apply a JSON property update
    pub fn apply_properties_json(&mut self, json: &str) -> Result<SettingsChange, SettingsError> {
        let props = UserProperties::from_json(json)?;
        self.apply_properties(&props)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn free_settings() -> Settings {
        Settings {
            headshot: false,
            ..Default::default()
        }
    }

    fn range(settings: Settings) -> TargetRange {
        TargetRange::new(settings, Viewport::new(1600.0, 800.0), 12345)
    }

    fn draw_region(range: &mut TargetRange, from: Vec2, to: Vec2) {
        range.pointer_down(from);
        range.pointer_move(to);
        range.pointer_up(to);
    }

    #[test]
    fn test_initial_population() {
        assert_eq!(range(Settings::default()).count(), 2);
        assert_eq!(range(free_settings()).count(), 20);
    }

    #[test]
    fn test_toggle_round_trip_population() {
        let mut r = range(free_settings());
        let first = r.balls()[0].id;
        r.pop(first);
        assert!(r.toggle_mode());
        assert_eq!(r.mode(), Mode::Headshot);
        assert_eq!(r.count(), 2);
        assert!(r.toggle_mode());
        assert_eq!(r.mode(), Mode::Free);
        assert_eq!(r.count(), 20);
    }

    #[test]
    fn test_pop_replaces_ball() {
        let mut r = range(free_settings());
        r.drain_events();
        let id = r.balls()[3].id;
        assert_eq!(r.pop(id), Some(id));
        assert_eq!(r.count(), 20);
        assert!(r.balls().iter().all(|b| b.id != id));

        let events = r.drain_events();
        assert_eq!(events[0], RangeEvent::BallDespawned { id });
        assert!(matches!(events[1], RangeEvent::BallSpawned { .. }));

        // Already gone
        assert_eq!(r.pop(id), None);
        assert_eq!(r.count(), 20);
    }

    #[test]
    fn test_click_hits_ball_under_pointer() {
        let mut r = range(free_settings());
        let target = r.balls()[0];
        assert_eq!(r.click(target.pos), Some(target.id));
        assert_eq!(r.count(), 20);
    }

    #[test]
    fn test_click_on_empty_space() {
        let mut r = range(Settings::default());
        // Headshot balls sit on y = 0; far above is empty
        assert_eq!(r.click(Vec2::new(0.0, 45.0)), None);
        assert_eq!(r.count(), 2);
    }

    #[test]
    fn test_input_suppressed_while_selecting() {
        let mut r = range(free_settings());
        assert_eq!(r.press_area_button(), Transition::Started);
        assert!(r.is_input_suppressed());

        let target = r.balls()[0];
        assert_eq!(r.pop(target.id), None);
        assert_eq!(r.click(target.pos), None);
        assert!(!r.toggle_mode());
        assert!(!r.refresh());
        assert_eq!(r.mode(), Mode::Free);
        assert!(r.balls().iter().any(|b| b.id == target.id));
    }

    #[test]
    fn test_region_lifecycle_resets_and_constrains() {
        let mut r = range(free_settings());
        assert_eq!(r.press_area_button(), Transition::Started);
        // Nothing drawn yet
        assert_eq!(r.press_area_button(), Transition::Rejected);
        assert_eq!(r.region_state(), RegionState::Selecting);

        draw_region(&mut r, Vec2::new(0.0, 0.0), Vec2::new(30.0, 20.0));
        let before: Vec<BallId> = r.balls().iter().map(|b| b.id).collect();
        assert_eq!(r.press_area_button(), Transition::Confirmed);
        assert_eq!(r.region_state(), RegionState::Selected);
        assert_eq!(r.count(), 20);
        assert!(r.balls().iter().all(|b| !before.contains(&b.id)));

        let region = r.region();
        assert!(r.balls().iter().all(|b| region.contains(b.pos)));

        assert_eq!(r.press_area_button(), Transition::Cleared);
        assert_eq!(r.region_state(), RegionState::Idle);
        assert_eq!(r.region().width, 0.0);
        assert_eq!(r.count(), 20);
    }

    #[test]
    fn test_headshot_line_follows_region() {
        let mut r = range(Settings::default());
        r.press_area_button();
        draw_region(&mut r, Vec2::new(-10.0, 10.0), Vec2::new(20.0, 30.0));
        r.press_area_button();
        assert!(r.balls().iter().all(|b| b.pos.y == 20.0));
    }

    #[test]
    fn test_region_events() {
        let mut r = range(free_settings());
        r.drain_events();
        r.press_area_button();
        draw_region(&mut r, Vec2::new(0.0, 0.0), Vec2::new(10.0, 10.0));
        let events = r.drain_events();
        assert_eq!(
            events[0],
            RangeEvent::RegionOutline {
                handle: r.outline_handle(),
                outline: None
            }
        );
        assert_eq!(
            events[1],
            RangeEvent::RegionStateChanged {
                state: RegionState::Selecting
            }
        );
        assert!(matches!(
            events.last(),
            Some(RangeEvent::RegionOutline {
                outline: Some(_),
                ..
            })
        ));
    }

    #[test]
    fn test_resize_reclamps_region() {
        let mut r = range(free_settings());
        r.press_area_button();
        draw_region(&mut r, Vec2::new(0.0, 0.0), Vec2::new(90.0, 40.0));
        r.press_area_button();

        // 800x800 gives bounds of +-48 on both axes
        r.resize(800.0, 800.0);
        let region = r.region();
        assert_eq!(region.max(), Vec2::new(48.0, 40.0));
        assert!(r.bounds().contains(region.max()));
    }

    #[test]
    fn test_ball_size_change_affects_future_spawns_only() {
        let mut r = range(free_settings());
        r.apply_properties_json(r#"{"ballSize": 3}"#).unwrap();
        assert!(r.balls().iter().all(|b| b.radius == 2.0));

        let id = r.balls()[0].id;
        r.pop(id);
        assert_eq!(r.balls().last().map(|b| b.radius), Some(3.0));
    }

    #[test]
    fn test_headshot_property_switches_mode() {
        let mut r = range(free_settings());
        let change = r.apply_properties_json(r#"{"headShotMode": true}"#).unwrap();
        assert!(change.mode);
        assert_eq!(r.mode(), Mode::Headshot);
        assert_eq!(r.count(), 2);

        // Toggling keeps settings in sync, so the same property applies again
        r.toggle_mode();
        let change = r.apply_properties_json(r#"{"headShotMode": true}"#).unwrap();
        assert!(change.mode);
    }

    #[test]
    fn test_headshot_property_waits_for_region_confirm() {
        let mut r = range(free_settings());
        r.press_area_button();
        draw_region(&mut r, Vec2::new(0.0, 0.0), Vec2::new(10.0, 10.0));
        let before: Vec<BallId> = r.balls().iter().map(|b| b.id).collect();

        let change = r.apply_properties_json(r#"{"headShotMode": true}"#).unwrap();
        assert!(change.mode);
        assert_eq!(r.mode(), Mode::Free);
        assert_eq!(r.region_state(), RegionState::Selecting);
        let after: Vec<BallId> = r.balls().iter().map(|b| b.id).collect();
        assert_eq!(before, after);

        assert_eq!(r.press_area_button(), Transition::Confirmed);
        assert_eq!(r.mode(), Mode::Headshot);
        assert_eq!(r.count(), 2);
        assert!(r.balls().iter().all(|b| b.pos.y == 5.0));
    }

    #[test]
    fn test_headshot_property_reverted_while_selecting() {
        let mut r = range(free_settings());
        r.press_area_button();
        r.apply_properties_json(r#"{"headShotMode": true}"#).unwrap();
        r.apply_properties_json(r#"{"headShotMode": false}"#).unwrap();
        draw_region(&mut r, Vec2::new(0.0, 0.0), Vec2::new(40.0, 30.0));
        r.press_area_button();
        assert_eq!(r.mode(), Mode::Free);
        assert_eq!(r.count(), 20);
    }

    #[test]
    fn test_confirm_mid_drag_freezes_region() {
        let mut r = range(free_settings());
        r.press_area_button();
        r.pointer_down(Vec2::new(0.0, 0.0));
        r.pointer_move(Vec2::new(20.0, 20.0));
        assert_eq!(r.press_area_button(), Transition::Confirmed);

        let frozen = r.region();
        r.pointer_up(Vec2::new(50.0, 40.0));
        assert_eq!(r.region(), frozen);
    }

    #[test]
    fn test_ball_count_applies_on_next_reset() {
        let mut r = range(free_settings());
        r.apply_properties_json(r#"{"ballNumber": 8}"#).unwrap();
        assert_eq!(r.count(), 20);
        r.refresh();
        assert_eq!(r.count(), 8);
    }

    #[test]
    fn test_invalid_property_leaves_state() {
        let mut r = range(free_settings());
        assert!(r.apply_properties_json(r#"{"ballSize": 0}"#).is_err());
        assert_eq!(r.settings().ball_size, 2.0);
    }

    #[test]
    fn test_degenerate_bounds_spawn_nothing() {
        let settings = Settings {
            ball_size: 60.0,
            ..free_settings()
        };
        let r = range(settings);
        assert!(!r.bounds().is_valid());
        assert_eq!(r.count(), 0);
    }

    #[test]
    fn test_deterministic_with_seed() {
        let a = range(free_settings());
        let b = range(free_settings());
        assert_eq!(a.balls(), b.balls());
    }
}
