//! Live ball set
//!
//! The registry owns every spawned ball and hands out ids. It never picks
//! positions itself; the sampler does that.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Ball identity. Ids are never reused within one registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct BallId(pub u32);

/// A target ball
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Ball {
    pub id: BallId,
    pub pos: Vec2,
    pub radius: f32,
}

impl Ball {
    /// Whether a world point falls on the ball's silhouette
    pub fn covers(&self, p: Vec2) -> bool {
        self.pos.distance_squared(p) <= self.radius * self.radius
    }
}

#[derive(Debug, Clone)]
pub struct BallRegistry {
    /// Sorted by id (spawn order)
    balls: Vec<Ball>,
    next_id: u32,
}

impl Default for BallRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl BallRegistry {
    pub fn new() -> Self {
        Self {
            balls: Vec::new(),
            next_id: 1,
        }
    }

    /// Allocate a new ball id
    fn next_ball_id(&mut self) -> BallId {
        let id = BallId(self.next_id);
        self.next_id += 1;
        id
    }

    pub fn spawn(&mut self, pos: Vec2, radius: f32) -> Ball {
        let ball = Ball {
            id: self.next_ball_id(),
            pos,
            radius,
        };
        self.balls.push(ball);
        ball
    }

    /// Remove a ball. Unknown ids are ignored.
    pub fn despawn(&mut self, id: BallId) -> Option<Ball> {
        let index = self.balls.binary_search_by_key(&id, |b| b.id).ok()?;
        Some(self.balls.remove(index))
    }

    /// Remove every ball, returning their ids in spawn order
    pub fn despawn_all(&mut self) -> Vec<BallId> {
        self.balls.drain(..).map(|b| b.id).collect()
    }

    pub fn count(&self) -> usize {
        self.balls.len()
    }

    pub fn is_empty(&self) -> bool {
        self.balls.is_empty()
    }

    pub fn get(&self, id: BallId) -> Option<&Ball> {
        self.balls
            .binary_search_by_key(&id, |b| b.id)
            .ok()
            .map(|i| &self.balls[i])
    }

    pub fn contains(&self, id: BallId) -> bool {
        self.get(id).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Ball> {
        self.balls.iter()
    }

    pub fn as_slice(&self) -> &[Ball] {
        &self.balls
    }

    pub fn positions(&self) -> impl Iterator<Item = Vec2> + '_ {
        self.balls.iter().map(|b| b.pos)
    }

    /// Topmost ball under a world point. Later spawns are drawn on top.
    pub fn hit_test(&self, p: Vec2) -> Option<BallId> {
        self.balls.iter().rev().find(|b| b.covers(p)).map(|b| b.id)
    }
}
