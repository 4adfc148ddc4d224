//! Simulation settings
//!
//! Every tunable constant of the planners, the world and the agent lives in
//! one value that is passed into each component. Persisted as JSON.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize, de::DeserializeOwned};

use crate::consts::*;
use crate::error::{DroneError, DroneResult};

/// Simulation settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === World ===
    /// World width in pixels; grid cells at or beyond it are out of bounds
    pub world_width: f32,
    /// World height in pixels
    pub world_height: f32,
    /// Adversaries reverse when their rectangle comes within this margin of the edge
    pub wall_margin: f32,

    // === Agent ===
    pub agent_radius: f32,
    /// Distance travelled per tick
    pub agent_speed: f32,

    // === Planning ===
    /// Grid quantum shared by every planner
    pub grid_size: f32,
    /// Extra clearance beyond the agent radius when testing planned cells
    pub inflation_margin: f32,
    /// Main path is recomputed every this many ticks
    pub replan_interval: u32,
    /// Expansion cap for the main A* search
    pub max_path_expansions: usize,

    // === Threats ===
    /// An adversary closer than this (centre to agent) triggers evasion
    pub threat_radius: f32,
    /// Evasion candidates closer than this to the threat are forbidden
    pub exclusion_radius: f32,
    /// Expansion budget of the evasion search
    pub evade_budget: usize,
    /// Weight of the push away from the nearest threat in direct steering
    pub repulsion_strength: f32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            world_width: WORLD_WIDTH,
            world_height: WORLD_HEIGHT,
            wall_margin: WALL_MARGIN,

            agent_radius: AGENT_RADIUS,
            agent_speed: AGENT_SPEED,

            grid_size: 5.0,
            inflation_margin: 5.0,
            replan_interval: 5,
            max_path_expansions: 50_000,

            threat_radius: 75.0,
            exclusion_radius: 50.0,
            evade_budget: 20,
            repulsion_strength: 50.0,
        }
    }
}

impl Settings {
    /// Half-size of the square footprint tested against obstacles while planning
    #[inline]
    pub fn planning_clearance(&self) -> f32 {
        self.agent_radius + self.inflation_margin
    }

    /// Reject values the planners cannot work with
    pub fn validate(&self) -> DroneResult<()> {
        let positive = [
            ("world_width", self.world_width),
            ("world_height", self.world_height),
            ("agent_radius", self.agent_radius),
            ("agent_speed", self.agent_speed),
            ("grid_size", self.grid_size),
        ];
        for (field, value) in positive {
            if !(value.is_finite() && value > 0.0) {
                return Err(DroneError::InvalidSetting {
                    field,
                    reason: "must be a positive finite number",
                });
            }
        }
        if self.inflation_margin < 0.0 || self.wall_margin < 0.0 {
            return Err(DroneError::InvalidSetting {
                field: "inflation_margin/wall_margin",
                reason: "must not be negative",
            });
        }
        if self.replan_interval == 0 {
            return Err(DroneError::InvalidSetting {
                field: "replan_interval",
                reason: "must be at least one tick",
            });
        }
        if self.max_path_expansions == 0 || self.evade_budget == 0 {
            return Err(DroneError::InvalidSetting {
                field: "max_path_expansions/evade_budget",
                reason: "search budgets must be non-zero",
            });
        }
        Ok(())
    }

    /// Load settings from a JSON file; missing fields take their defaults
    pub fn load(path: impl AsRef<Path>) -> DroneResult<Self> {
        let settings: Self = read_json(path.as_ref())?;
        settings.validate()?;
        log::info!("Loaded settings from {}", path.as_ref().display());
        Ok(settings)
    }

    /// Save settings as pretty JSON
    pub fn save(&self, path: impl AsRef<Path>) -> DroneResult<()> {
        write_json(path.as_ref(), self)?;
        log::info!("Settings saved to {}", path.as_ref().display());
        Ok(())
    }
}

pub(crate) fn read_json<T: DeserializeOwned>(path: &Path) -> DroneResult<T> {
    let text = fs::read_to_string(path).map_err(|source| DroneError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&text).map_err(|source| DroneError::Json {
        path: path.to_path_buf(),
        source,
    })
}

pub(crate) fn write_json<T: Serialize>(path: &Path, value: &T) -> DroneResult<()> {
    let json = serde_json::to_string_pretty(value).map_err(|source| DroneError::Json {
        path: path.to_path_buf(),
        source,
    })?;
    fs::write(path, json).map_err(|source| DroneError::Io {
        path: path.to_path_buf(),
        source,
    })
}
