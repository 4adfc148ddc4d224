//! Collision and goal detection
//!
//! Runs after the agent has moved. The obstacle snapshot is tested first, then
//! every adversary directly (they may have moved since the snapshot), and only
//! then the goal. A drone that crashes on the goal cell has crashed.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::adversary::Adversary;
use super::geometry::Rect;
use super::motion::agent_box;

/// What the agent ran into
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CrashCause {
    /// Index into the obstacle snapshot (static obstacles first)
    Obstacle(usize),
    /// Index into the adversary list
    Adversary(usize),
}

/// Outcome of a single detection pass
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Outcome {
    Running,
    Crashed(CrashCause),
    Won,
}

impl Outcome {
    #[inline]
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Outcome::Running)
    }
}

/// Merge static obstacles with the adversaries' current rectangles
pub fn obstacle_snapshot(static_obstacles: &[Rect], adversaries: &[Adversary]) -> Vec<Rect> {
    static_obstacles
        .iter()
        .copied()
        .chain(adversaries.iter().map(|adversary| adversary.rect))
        .collect()
}

/// Whether the agent's centre is within its radius of the goal on both axes
#[inline]
pub fn reached_goal(pos: Vec2, goal: Vec2, radius: f32) -> bool {
    let gap = (pos - goal).abs();
    gap.x < radius && gap.y < radius
}

/// Classify the agent's current position
pub fn detect(
    pos: Vec2,
    radius: f32,
    goal: Vec2,
    obstacles: &[Rect],
    adversaries: &[Adversary],
) -> Outcome {
    let body = agent_box(pos, radius);

    if let Some(index) = body.first_hit(obstacles) {
        return Outcome::Crashed(CrashCause::Obstacle(index));
    }
    if let Some(index) = adversaries.iter().position(|adversary| body.intersects(&adversary.rect)) {
        return Outcome::Crashed(CrashCause::Adversary(index));
    }
    if reached_goal(pos, goal, radius) {
        return Outcome::Won;
    }
    Outcome::Running
}

#[cfg(test)]
mod tests {
    use super::*;

    const GOAL: Vec2 = Vec2::new(700.0, 100.0);

    #[test]
    fn test_clear_space_is_running() {
        let outcome = detect(Vec2::new(300.0, 300.0), 10.0, GOAL, &[], &[]);
        assert_eq!(outcome, Outcome::Running);
        assert!(!outcome.is_terminal());
    }

    #[test]
    fn test_obstacle_hit() {
        let obstacles = [Rect::new(0.0, 0.0, 10.0, 600.0), Rect::new(305.0, 290.0, 20.0, 20.0)];
        let outcome = detect(Vec2::new(300.0, 300.0), 10.0, GOAL, &obstacles, &[]);
        assert_eq!(outcome, Outcome::Crashed(CrashCause::Obstacle(1)));
    }

    #[test]
    fn test_adversary_hit_outside_snapshot() {
        let adversaries = [Adversary::pursuit(Rect::new(295.0, 295.0, 30.0, 30.0), Vec2::ONE)];
        let outcome = detect(Vec2::new(300.0, 300.0), 10.0, GOAL, &[], &adversaries);
        assert_eq!(outcome, Outcome::Crashed(CrashCause::Adversary(0)));
    }

    #[test]
    fn test_goal_within_radius() {
        assert_eq!(detect(Vec2::new(695.0, 108.0), 10.0, GOAL, &[], &[]), Outcome::Won);
        // Exactly one radius away on an axis is not yet there
        assert_eq!(detect(Vec2::new(690.0, 100.0), 10.0, GOAL, &[], &[]), Outcome::Running);
    }

    #[test]
    fn test_crash_beats_goal() {
        let obstacles = [Rect::new(695.0, 95.0, 10.0, 10.0)];
        let outcome = detect(GOAL, 10.0, GOAL, &obstacles, &[]);
        assert_eq!(outcome, Outcome::Crashed(CrashCause::Obstacle(0)));
    }

    #[test]
    fn test_snapshot_order() {
        let statics = [Rect::new(0.0, 0.0, 1.0, 1.0)];
        let adversaries = [Adversary::patrol(Rect::new(5.0, 5.0, 2.0, 2.0), 1.0, 0.0, 10.0)];
        let snapshot = obstacle_snapshot(&statics, &adversaries);
        assert_eq!(snapshot, vec![statics[0], adversaries[0].rect]);
    }
}
