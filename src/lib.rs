//! Drone Maze - real-time path planning through a field of moving threats
//!
//! Core modules:
//! - `sim`: Deterministic simulation (planning, adversaries, motion, collisions)
//! - `settings`: Tunable constants for the planners and the world
//! - `error`: Errors for the fallible edges (loading settings and scenarios)
//!
//! Rendering, audio and input belong to the host. The host drives the core by
//! calling [`sim::tick`] once per frame and reads back agent position, active
//! path, phase and elapsed time.

pub mod error;
pub mod settings;
pub mod sim;

pub use error::{DroneError, DroneResult};
pub use settings::Settings;

use glam::Vec2;

/// Simulation configuration constants
pub mod consts {
    /// Fixed simulation timestep (one tick per rendered frame at 60 Hz)
    pub const SIM_DT: f32 = 1.0 / 60.0;

    /// World dimensions
    pub const WORLD_WIDTH: f32 = 800.0;
    pub const WORLD_HEIGHT: f32 = 600.0;
    /// Thickness of the border walls; adversaries bounce off this margin
    pub const WALL_MARGIN: f32 = 10.0;

    /// Agent defaults
    pub const AGENT_RADIUS: f32 = 10.0;
    pub const AGENT_SPEED: f32 = 2.0;
}

/// Euclidean distance between two points
#[inline]
pub fn distance(a: Vec2, b: Vec2) -> f32 {
    (a - b).length()
}

/// Unit vector from `from` toward `to`, or zero when they coincide
#[inline]
pub fn direction(from: Vec2, to: Vec2) -> Vec2 {
    (to - from).normalize_or_zero()
}
