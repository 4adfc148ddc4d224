//! Deterministic simulation module
//!
//! All planning and motion logic lives here. This module must be pure and
//! deterministic:
//! - Fixed timestep only
//! - Seeded RNG only (scenario generation)
//! - Stable iteration order (obstacles and adversaries by index)
//! - No rendering, audio or platform dependencies

pub mod adversary;
pub mod collision;
pub mod evade;
pub mod geometry;
pub mod grid;
pub mod motion;
pub mod pathfind;
pub mod scenario;
pub mod state;
pub mod tick;

pub use adversary::{Adversary, Behavior};
pub use collision::{CrashCause, Outcome, detect, obstacle_snapshot};
pub use evade::evade;
pub use geometry::Rect;
pub use grid::{quantize, to_world};
pub use motion::{MoveResult, PathPlan, SteerSource};
pub use pathfind::{path_length, plan};
pub use scenario::Scenario;
pub use state::{Agent, SimEvent, SimPhase, SimState, Threat};
pub use tick::{TickInput, tick};
