//! Adversary drones and their per-tick motion
//!
//! Two behaviours share one body: a patroller that sweeps horizontally
//! between two bounds, and a pursuer that closes on the agent one axis at a
//! time. Both bounce off the world edge.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::geometry::Rect;
use crate::Settings;

/// Behaviour mode of an adversary
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Behavior {
    /// Horizontal sweep; reverses when the rectangle reaches either bound
    Patrol { min_x: f32, max_x: f32 },
    /// Closes on the agent's live position, each axis at `|vel|` of that axis
    Pursuit,
}

/// An independently moving obstacle
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Adversary {
    pub rect: Rect,
    /// Per-tick velocity; pursuers only use its magnitudes
    pub vel: Vec2,
    pub behavior: Behavior,
}

impl Adversary {
    pub fn patrol(rect: Rect, speed: f32, min_x: f32, max_x: f32) -> Self {
        Self {
            rect,
            vel: Vec2::new(speed, 0.0),
            behavior: Behavior::Patrol { min_x, max_x },
        }
    }

    pub fn pursuit(rect: Rect, speed: Vec2) -> Self {
        Self {
            rect,
            vel: speed,
            behavior: Behavior::Pursuit,
        }
    }

    #[inline]
    pub fn pos(&self) -> Vec2 {
        self.rect.pos()
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        self.rect.center()
    }

    /// Advance one tick toward (or around) the agent at `agent_pos`
    pub fn advance(&mut self, agent_pos: Vec2, settings: &Settings) {
        match self.behavior {
            Behavior::Patrol { min_x, max_x } => {
                self.rect.x += self.vel.x;
                if self.rect.x <= min_x || self.rect.right() >= max_x {
                    self.vel.x = -self.vel.x;
                }
            }
            Behavior::Pursuit => {
                self.rect.x = approach(self.rect.x, agent_pos.x, self.vel.x);
                self.rect.y = approach(self.rect.y, agent_pos.y, self.vel.y);
            }
        }

        let margin = settings.wall_margin;
        if self.rect.x <= margin || self.rect.right() >= settings.world_width - margin {
            self.vel.x = -self.vel.x;
        }
        if self.rect.y <= margin || self.rect.bottom() >= settings.world_height - margin {
            self.vel.y = -self.vel.y;
        }
    }
}

/// Step `pos` toward `target` by at most `|speed|`, never past it
#[inline]
fn approach(pos: f32, target: f32, speed: f32) -> f32 {
    let gap = target - pos;
    if gap.abs() <= speed.abs() {
        target
    } else {
        pos + gap.signum() * speed.abs()
    }
}
