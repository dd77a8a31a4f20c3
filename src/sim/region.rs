//! User-drawn spawn region and its selection lifecycle
//!
//! One button cycles the selector: Idle -> Selecting -> Selected -> Idle.
//! Pointer input only reaches the region through the drag session that
//! lives inside the `Selecting` phase, so leaving that phase drops any
//! half-finished drag.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::bounds::BoundsRect;

/// Axis-aligned spawn rectangle. Zero width or height means inactive.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct SpawnRegion {
    /// Lower-left corner
    pub origin: Vec2,
    pub width: f32,
    pub height: f32,
}

impl SpawnRegion {
    pub fn is_active(&self) -> bool {
        self.width > 0.0 && self.height > 0.0
    }

    /// Upper-right corner
    pub fn max(&self) -> Vec2 {
        self.origin + Vec2::new(self.width, self.height)
    }

    pub fn as_rect(&self) -> BoundsRect {
        let max = self.max();
        BoundsRect::new(self.origin.x, max.x, self.origin.y, max.y)
    }

    pub fn contains(&self, p: Vec2) -> bool {
        self.as_rect().contains(p)
    }

    /// Closed line strip around the region, for drawing its outline
    pub fn outline(&self) -> [Vec2; 5] {
        let max = self.max();
        [
            self.origin,
            Vec2::new(max.x, self.origin.y),
            max,
            Vec2::new(self.origin.x, max.y),
            self.origin,
        ]
    }
}

/// Build a region from two drag corners, clamped to `bounds`.
pub fn update_region(p1: Vec2, p2: Vec2, bounds: &BoundsRect) -> SpawnRegion {
    let a = bounds.clamp(p1);
    let b = bounds.clamp(p2);
    SpawnRegion {
        origin: a.min(b),
        width: (b.x - a.x).abs(),
        height: (b.y - a.y).abs(),
    }
}

/// Public view of the selector phase (for button labels)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RegionState {
    Idle,
    Selecting,
    Selected,
}

impl RegionState {
    /// Label for the area button in this state
    pub fn button_label(&self) -> &'static str {
        match self {
            RegionState::Idle => "Select area",
            RegionState::Selecting => "Confirm area",
            RegionState::Selected => "Clear area",
        }
    }
}

/// Stable id of the region outline visual, owned by the selector
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OutlineHandle(pub u32);

/// Pointer subscription held only while selecting
#[derive(Debug, Clone, Default)]
struct DragSession {
    /// Drag start, set while the button is held
    anchor: Option<Vec2>,
}

#[derive(Debug, Clone)]
enum Phase {
    Idle,
    Selecting(DragSession),
    Selected,
}

/// Outcome of pressing the area button
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// Idle -> Selecting
    Started,
    /// Selecting -> Selected
    Confirmed,
    /// Confirm attempted with an empty region; still selecting
    Rejected,
    /// Selected -> Idle
    Cleared,
}

impl Transition {
    /// Whether the transition entered or left `Selected`
    pub fn changes_constraints(&self) -> bool {
        matches!(self, Transition::Confirmed | Transition::Cleared)
    }
}

#[derive(Debug, Clone)]
pub struct RegionSelector {
    phase: Phase,
    region: SpawnRegion,
    outline: OutlineHandle,
}

impl RegionSelector {
    pub fn new(outline: OutlineHandle) -> Self {
        Self {
            phase: Phase::Idle,
            region: SpawnRegion::default(),
            outline,
        }
    }

    pub fn state(&self) -> RegionState {
        match self.phase {
            Phase::Idle => RegionState::Idle,
            Phase::Selecting(_) => RegionState::Selecting,
            Phase::Selected => RegionState::Selected,
        }
    }

    pub fn region(&self) -> SpawnRegion {
        self.region
    }

    pub fn outline_handle(&self) -> OutlineHandle {
        self.outline
    }

    pub fn is_selecting(&self) -> bool {
        matches!(self.phase, Phase::Selecting(_))
    }

    /// Is a drag currently in progress
    pub fn is_drawing(&self) -> bool {
        matches!(&self.phase, Phase::Selecting(drag) if drag.anchor.is_some())
    }

    /// Advance the lifecycle (the area button)
    pub fn advance(&mut self) -> Transition {
        match self.phase {
            Phase::Idle => {
                self.region = SpawnRegion::default();
                self.phase = Phase::Selecting(DragSession::default());
                Transition::Started
            }
            Phase::Selecting(_) => {
                if self.region.is_active() {
                    // Dropping the session releases the pointer subscription
                    self.phase = Phase::Selected;
                    Transition::Confirmed
                } else {
                    Transition::Rejected
                }
            }
            Phase::Selected => {
                self.region = SpawnRegion::default();
                self.phase = Phase::Idle;
                Transition::Cleared
            }
        }
    }

    /// Start a drag. Returns false when no session is open.
    pub fn pointer_down(&mut self, p: Vec2) -> bool {
        match &mut self.phase {
            Phase::Selecting(drag) => {
                drag.anchor = Some(p);
                true
            }
            _ => false,
        }
    }

    /// Live update while dragging. Returns true if the region changed.
    pub fn pointer_move(&mut self, p: Vec2, bounds: &BoundsRect) -> bool {
        let anchor = match &self.phase {
            Phase::Selecting(DragSession {
                anchor: Some(anchor),
            }) => *anchor,
            _ => return false,
        };
        self.region = update_region(anchor, p, bounds);
        true
    }

    /// Finish a drag. Returns true if the region changed.
    pub fn pointer_up(&mut self, p: Vec2, bounds: &BoundsRect) -> bool {
        let anchor = match &mut self.phase {
            Phase::Selecting(drag) => drag.anchor.take(),
            _ => None,
        };
        match anchor {
            Some(anchor) => {
                self.region = update_region(anchor, p, bounds);
                true
            }
            None => false,
        }
    }

    /// Re-clamp the stored region after the bounds changed.
    /// Returns true if the region moved or shrank.
    pub fn reclamp(&mut self, bounds: &BoundsRect) -> bool {
        if self.region == SpawnRegion::default() {
            return false;
        }
        let clamped = update_region(self.region.origin, self.region.max(), bounds);
        if clamped == self.region {
            return false;
        }
        self.region = clamped;
        true
    }
}
