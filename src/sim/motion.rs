//! Agent motion: waypoint following and direct steering
//!
//! One steering source governs each tick, chosen in priority order: the
//! evasion plan, then the main plan, then direct steering toward the goal
//! (only when the main plan is empty). Whatever the source, the candidate
//! position is checked against the current obstacles and rejected on overlap.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::geometry::Rect;
use crate::{Settings, direction};

/// A waypoint sequence with a cursor to the next waypoint
///
/// Waypoints are never removed; reaching one advances the cursor.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PathPlan {
    pub waypoints: Vec<Vec2>,
    pub cursor: usize,
}

impl PathPlan {
    pub fn new(waypoints: Vec<Vec2>) -> Self {
        Self {
            waypoints,
            cursor: 0,
        }
    }

    /// Swap in a freshly planned path and rewind the cursor
    pub fn replace(&mut self, waypoints: Vec<Vec2>) {
        self.waypoints = waypoints;
        self.cursor = 0;
    }

    pub fn clear(&mut self) {
        self.replace(Vec::new());
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.waypoints.is_empty()
    }

    /// Next waypoint to reach, if any remain
    #[inline]
    pub fn current(&self) -> Option<Vec2> {
        self.waypoints.get(self.cursor).copied()
    }

    #[inline]
    pub fn is_exhausted(&self) -> bool {
        self.current().is_none()
    }

    /// Waypoints not yet reached
    pub fn remaining(&self) -> &[Vec2] {
        self.waypoints.get(self.cursor..).unwrap_or(&[])
    }

    #[inline]
    pub fn advance(&mut self) {
        self.cursor += 1;
    }
}

/// Which source steered the agent this tick
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SteerSource {
    Evasion,
    MainPath,
    Direct,
    /// Main path exists but every waypoint has been reached
    None,
}

/// Result of one motion step
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MoveResult {
    pub source: SteerSource,
    pub moved: bool,
}

/// Everything the motion step reads besides the agent itself
pub struct MotionContext<'a> {
    pub goal: Vec2,
    pub obstacles: &'a [Rect],
    /// Nearest threat position while evading
    pub threat: Option<Vec2>,
    pub evading: bool,
}

/// Bounding box of an agent of `radius` at `pos`
#[inline]
pub fn agent_box(pos: Vec2, radius: f32) -> Rect {
    Rect::centered(pos, radius)
}

/// Whether the agent may stand at `pos`
#[inline]
pub fn position_is_clear(pos: Vec2, obstacles: &[Rect], settings: &Settings) -> bool {
    agent_box(pos, settings.agent_radius).first_hit(obstacles).is_none()
}

/// Move the agent one tick using the highest-priority available source
pub fn step_agent(
    pos: &mut Vec2,
    evasion: &mut PathPlan,
    main: &mut PathPlan,
    ctx: &MotionContext<'_>,
    settings: &Settings,
) -> MoveResult {
    if ctx.evading && !evasion.is_exhausted() {
        let moved = follow(pos, evasion, ctx.obstacles, settings);
        return MoveResult {
            source: SteerSource::Evasion,
            moved,
        };
    }
    if !main.is_exhausted() {
        let moved = follow(pos, main, ctx.obstacles, settings);
        return MoveResult {
            source: SteerSource::MainPath,
            moved,
        };
    }
    if main.is_empty() {
        let heading = fallback_heading(*pos, ctx.goal, ctx.threat, settings.repulsion_strength);
        let moved = match heading {
            Some(heading) => {
                let candidate = *pos + heading * settings.agent_speed;
                try_move(pos, candidate, ctx.obstacles, settings)
            }
            None => false,
        };
        return MoveResult {
            source: SteerSource::Direct,
            moved,
        };
    }
    MoveResult {
        source: SteerSource::None,
        moved: false,
    }
}

/// Step toward the plan's current waypoint, snapping to it when within reach
///
/// Waypoints the agent already stands on are passed over without using up the
/// tick's move.
fn follow(pos: &mut Vec2, plan: &mut PathPlan, obstacles: &[Rect], settings: &Settings) -> bool {
    while let Some(target) = plan.current() {
        let offset = target - *pos;
        let dist = offset.length();
        if dist == 0.0 {
            plan.advance();
            continue;
        }
        if dist <= settings.agent_speed {
            let moved = try_move(pos, target, obstacles, settings);
            if moved {
                plan.advance();
            }
            return moved;
        }
        let candidate = *pos + offset / dist * settings.agent_speed;
        return try_move(pos, candidate, obstacles, settings);
    }
    false
}

/// Direction toward the goal, pushed away from the threat
///
/// `None` when the combined vector vanishes (already at the goal with no
/// threat, or the push cancels the pull exactly).
pub fn fallback_heading(
    pos: Vec2,
    goal: Vec2,
    threat: Option<Vec2>,
    repulsion: f32,
) -> Option<Vec2> {
    let mut desired = goal - pos;
    if let Some(threat) = threat {
        desired += direction(threat, pos) * repulsion;
    }
    let heading = desired.normalize_or_zero();
    (heading != Vec2::ZERO).then_some(heading)
}

/// Commit `candidate` if the agent's box there overlaps nothing
///
/// Only a real change of position counts as a move.
fn try_move(pos: &mut Vec2, candidate: Vec2, obstacles: &[Rect], settings: &Settings) -> bool {
    if candidate != *pos && position_is_clear(candidate, obstacles, settings) {
        *pos = candidate;
        true
    } else {
        false
    }
}
