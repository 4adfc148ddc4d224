//! Simulation state and core simulation types
//!
//! Everything a run mutates lives in one `SimState` owned by the host and
//! threaded through [`tick`](super::tick::tick).

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::adversary::Adversary;
use super::collision::{CrashCause, Outcome, obstacle_snapshot};
use super::evade::evade;
use super::geometry::Rect;
use super::motion::{MoveResult, PathPlan};
use super::pathfind::plan;
use super::scenario::Scenario;
use crate::consts::SIM_DT;
use crate::{Settings, distance};

/// Lifecycle of a run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SimPhase {
    /// Built and waiting for a start command
    Idle,
    /// Ticking
    Running,
    /// Hit an obstacle or adversary; waits for reset
    Crashed,
    /// Reached the goal; waits for reset
    Won,
}

/// Notifications for the host (audio cues, HUD, logs)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SimEvent {
    Started,
    Reset,
    /// An adversary came within the threat radius
    EvadeStarted { adversary: usize },
    /// The main planner found no route from `pos`
    NoPath { pos: Vec2 },
    /// No steering source produced a legal move this tick
    Stuck { pos: Vec2 },
    Crashed { cause: CrashCause, pos: Vec2 },
    Won { elapsed_secs: f32 },
}

/// The nearest adversary inside the threat radius
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Threat {
    pub adversary: usize,
    /// Top-left corner of the adversary, the point evasion and repulsion
    /// steer away from
    pub pos: Vec2,
    /// Distance from the agent to the adversary's centre
    pub distance: f32,
}

/// The controlled drone
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Agent {
    pub pos: Vec2,
    pub radius: f32,
    pub speed: f32,
    pub main: PathPlan,
    pub evasion: PathPlan,
    /// Threat seen on the latest tick, if any
    pub threat: Option<Threat>,
}

impl Agent {
    pub fn new(pos: Vec2, settings: &Settings) -> Self {
        Self {
            pos,
            radius: settings.agent_radius,
            speed: settings.agent_speed,
            main: PathPlan::default(),
            evasion: PathPlan::default(),
            threat: None,
        }
    }

    #[inline]
    pub fn is_evading(&self) -> bool {
        self.threat.is_some()
    }
}

/// Complete simulation state
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimState {
    /// Layout every run is rebuilt from
    pub scenario: Scenario,
    pub phase: SimPhase,
    /// Result of the last detection pass (`Running` until a run ends)
    pub outcome: Outcome,
    pub agent: Agent,
    pub adversaries: Vec<Adversary>,
    /// Static obstacles plus adversary rectangles, rebuilt every tick
    pub obstacles: Vec<Rect>,
    /// Ticks since the main path was last planned
    pub replan_timer: u32,
    /// Ticks simulated in the current run
    pub running_ticks: u64,
    /// Motion result of the latest tick
    #[serde(skip)]
    pub last_move: Option<MoveResult>,
    /// Pending host notifications
    #[serde(skip)]
    pub events: Vec<SimEvent>,
}

impl SimState {
    /// Build an idle state for `scenario`
    pub fn new(scenario: Scenario, settings: &Settings) -> Self {
        let agent = Agent::new(scenario.start, settings);
        let adversaries = scenario.adversaries.clone();
        let obstacles = obstacle_snapshot(&scenario.obstacles, &adversaries);
        Self {
            scenario,
            phase: SimPhase::Idle,
            outcome: Outcome::Running,
            agent,
            adversaries,
            obstacles,
            replan_timer: 0,
            running_ticks: 0,
            last_move: None,
            events: Vec::new(),
        }
    }

    /// Rebuild the run from the scenario and return to `Idle`
    pub fn reset(&mut self, settings: &Settings) {
        let scenario = std::mem::take(&mut self.scenario);
        let events = std::mem::take(&mut self.events);
        *self = Self::new(scenario, settings);
        self.events = events;
        self.events.push(SimEvent::Reset);
        log::info!("Simulation reset");
    }

    /// Leave `Idle`: plan the first path and start ticking
    pub fn begin_run(&mut self, settings: &Settings) {
        self.refresh_obstacles();
        self.replan_main(settings);
        self.phase = SimPhase::Running;
        self.events.push(SimEvent::Started);
        log::info!(
            "Run started at {} toward {} ({} waypoints)",
            self.agent.pos,
            self.scenario.goal,
            self.agent.main.waypoints.len()
        );
    }

    /// Recompute the merged obstacle set from statics and adversaries
    pub fn refresh_obstacles(&mut self) {
        self.obstacles = obstacle_snapshot(&self.scenario.obstacles, &self.adversaries);
    }

    /// Replace the main path with a fresh plan to the goal
    pub fn replan_main(&mut self, settings: &Settings) {
        let path = plan(self.agent.pos, self.scenario.goal, &self.obstacles, settings);
        if path.is_empty() {
            log::debug!("No path found at ({:.1}, {:.1})", self.agent.pos.x, self.agent.pos.y);
            self.events.push(SimEvent::NoPath {
                pos: self.agent.pos,
            });
        }
        self.agent.main.replace(path);
        self.replan_timer = 0;
    }

    /// Replace the evasion path with an escape from `threat`
    ///
    /// The first waypoint is the cell the agent is already in. The plan is
    /// rebuilt every evading tick, so following it would pull the agent back
    /// to that cell's corner each time; the cursor starts past it instead.
    pub fn replan_evasion(&mut self, threat: Vec2, settings: &Settings) {
        let path = evade(self.agent.pos, threat, &self.obstacles, settings);
        let skip_start = path.len() > 1;
        self.agent.evasion.replace(path);
        if skip_start {
            self.agent.evasion.advance();
        }
    }

    /// Nearest adversary whose centre is within the threat radius of the agent
    pub fn nearest_threat(&self, settings: &Settings) -> Option<Threat> {
        self.adversaries
            .iter()
            .enumerate()
            .map(|(index, adversary)| Threat {
                adversary: index,
                pos: adversary.pos(),
                distance: distance(adversary.center(), self.agent.pos),
            })
            .filter(|threat| threat.distance < settings.threat_radius)
            .min_by(|a, b| a.distance.total_cmp(&b.distance))
    }

    #[inline]
    pub fn agent_pos(&self) -> Vec2 {
        self.agent.pos
    }

    /// Path the agent is currently following, for display
    pub fn active_path(&self) -> &[Vec2] {
        if self.agent.is_evading() && !self.agent.evasion.is_exhausted() {
            &self.agent.evasion.waypoints
        } else {
            &self.agent.main.waypoints
        }
    }

    /// Seconds simulated in the current run
    #[inline]
    pub fn elapsed_secs(&self) -> f32 {
        self.running_ticks as f32 * SIM_DT
    }

    #[inline]
    pub fn is_over(&self) -> bool {
        matches!(self.phase, SimPhase::Crashed | SimPhase::Won)
    }

    /// Take all pending events
    pub fn drain_events(&mut self) -> Vec<SimEvent> {
        std::mem::take(&mut self.events)
    }
}
