//! Scenario layouts: the world a run starts from
//!
//! A scenario fixes the start, the goal, the static obstacles and the initial
//! adversaries. The built-in maze is the classic layout; `generate` builds a
//! reproducible maze from a seed.

use std::path::Path;

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::adversary::{Adversary, Behavior};
use super::geometry::Rect;
use super::motion::position_is_clear;
use crate::Settings;
use crate::error::{DroneError, DroneResult};
use crate::settings::{read_json, write_json};

/// Minimum vertical opening left in each generated pillar column
const MIN_GAP: f32 = 100.0;
/// Width of generated pillars
const PILLAR_WIDTH: f32 = 40.0;
/// Side of generated adversaries
const ADVERSARY_SIZE: f32 = 30.0;

/// Initial layout of a run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scenario {
    pub start: Vec2,
    pub goal: Vec2,
    /// Static obstacles, border walls included
    pub obstacles: Vec<Rect>,
    pub adversaries: Vec<Adversary>,
}

impl Default for Scenario {
    fn default() -> Self {
        Self::drone_maze()
    }
}

impl Scenario {
    /// The classic 800x600 maze: three pillar columns, one patroller guarding
    /// the approach to the goal and one slow pursuer
    pub fn drone_maze() -> Self {
        let mut obstacles = vec![
            Rect::new(100.0, 0.0, 40.0, 300.0),
            Rect::new(100.0, 400.0, 40.0, 200.0),
            Rect::new(250.0, 200.0, 40.0, 400.0),
            Rect::new(400.0, 0.0, 40.0, 300.0),
            Rect::new(400.0, 400.0, 40.0, 200.0),
        ];
        obstacles.extend(border_walls(&Settings::default()));

        Self {
            start: Vec2::new(50.0, 350.0),
            goal: Vec2::new(700.0, 100.0),
            obstacles,
            adversaries: vec![
                Adversary::patrol(Rect::new(550.0, 200.0, 30.0, 30.0), 2.0, 550.0, 650.0),
                Adversary::pursuit(Rect::new(300.0, 350.0, 30.0, 30.0), Vec2::new(0.0, 0.5)),
            ],
        }
    }

    /// Build a reproducible maze from `seed`
    ///
    /// Pillar columns each leave one opening of at least `MIN_GAP`, so the
    /// goal is reachable when adversaries are ignored.
    pub fn generate(seed: u64, settings: &Settings) -> Self {
        let mut rng = Pcg32::seed_from_u64(seed);
        let (width, height) = (settings.world_width, settings.world_height);
        let margin = settings.wall_margin + settings.planning_clearance() + settings.grid_size;

        let start = Vec2::new(50.0, draw(&mut rng, margin, height - margin)).floor();
        let goal = Vec2::new(width - 100.0, draw(&mut rng, margin, height - margin)).floor();

        let mut obstacles = border_walls(settings).to_vec();
        let columns = rng.random_range(2..=4u32);
        let span = ((goal.x - start.x - 100.0) / columns as f32).max(PILLAR_WIDTH * 2.0);
        let mut gaps = Vec::with_capacity(columns as usize);
        for column in 0..columns {
            let jitter = draw(&mut rng, 0.0, span / 4.0);
            let x = (start.x + 50.0 + span * column as f32 + jitter).floor();
            let gap_height = draw(&mut rng, MIN_GAP, MIN_GAP * 1.6);
            let gap_limit = height - settings.wall_margin - gap_height;
            let gap_top = draw(&mut rng, settings.wall_margin, gap_limit).floor();
            let gap_bottom = gap_top + gap_height;
            if gap_top > 0.0 {
                obstacles.push(Rect::new(x, 0.0, PILLAR_WIDTH, gap_top));
            }
            if gap_bottom < height {
                obstacles.push(Rect::new(x, gap_bottom, PILLAR_WIDTH, height - gap_bottom));
            }
            gaps.push((x, gap_top, gap_bottom));
        }

        let mut adversaries = Vec::new();
        // Patroller sweeps in front of the last opening
        if let Some(&(x, gap_top, gap_bottom)) = gaps.last() {
            let min_x = x + PILLAR_WIDTH + 20.0;
            let max_x = (min_x + 100.0).min(width - settings.wall_margin - 1.0);
            let y = ((gap_top + gap_bottom) / 2.0 - ADVERSARY_SIZE / 2.0).floor();
            let speed = draw(&mut rng, 1.0, 2.5);
            adversaries.push(Adversary::patrol(
                Rect::new(min_x, y, ADVERSARY_SIZE, ADVERSARY_SIZE),
                speed,
                min_x,
                max_x,
            ));
        }
        // Pursuer waits mid-field
        let pursuer_x = (start.x + (goal.x - start.x) * draw(&mut rng, 0.35, 0.65)).floor();
        let pursuer_y = draw(&mut rng, margin, height - margin - ADVERSARY_SIZE).floor();
        adversaries.push(Adversary::pursuit(
            Rect::new(pursuer_x, pursuer_y, ADVERSARY_SIZE, ADVERSARY_SIZE),
            Vec2::new(draw(&mut rng, 0.0, 0.6), draw(&mut rng, 0.2, 0.8)),
        ));

        log::debug!(
            "Generated scenario seed={} columns={} adversaries={}",
            seed,
            columns,
            adversaries.len()
        );

        Self {
            start,
            goal,
            obstacles,
            adversaries,
        }
    }

    /// Reject layouts the simulation cannot start from
    pub fn validate(&self, settings: &Settings) -> DroneResult<()> {
        let inside = |p: Vec2| {
            p.x >= 0.0 && p.x < settings.world_width && p.y >= 0.0 && p.y < settings.world_height
        };
        if !inside(self.start) {
            return Err(DroneError::InvalidScenario(format!(
                "start {} lies outside the world",
                self.start
            )));
        }
        if !inside(self.goal) {
            return Err(DroneError::InvalidScenario(format!(
                "goal {} lies outside the world",
                self.goal
            )));
        }
        if let Some(rect) = self.obstacles.iter().find(|r| r.w < 0.0 || r.h < 0.0) {
            return Err(DroneError::InvalidScenario(format!("obstacle {rect:?} has negative size")));
        }
        for adversary in &self.adversaries {
            if let Behavior::Patrol { min_x, max_x } = adversary.behavior {
                if min_x >= max_x {
                    return Err(DroneError::InvalidScenario(format!(
                        "patrol bounds {min_x}..{max_x} are empty"
                    )));
                }
            }
        }
        if !position_is_clear(self.start, &self.obstacles, settings) {
            return Err(DroneError::InvalidScenario("agent starts inside an obstacle".into()));
        }
        Ok(())
    }

    /// Load a scenario from JSON and validate it against `settings`
    pub fn load(path: impl AsRef<Path>, settings: &Settings) -> DroneResult<Self> {
        let scenario: Self = read_json(path.as_ref())?;
        scenario.validate(settings)?;
        log::info!("Loaded scenario from {}", path.as_ref().display());
        Ok(scenario)
    }

    pub fn save(&self, path: impl AsRef<Path>) -> DroneResult<()> {
        write_json(path.as_ref(), self)
    }
}

/// Uniform draw from `lo..hi`, collapsing to `lo` when the range is empty
fn draw(rng: &mut Pcg32, lo: f32, hi: f32) -> f32 {
    if hi > lo { rng.random_range(lo..hi) } else { lo }
}

/// Four walls of `wall_margin` thickness around the world
pub fn border_walls(settings: &Settings) -> [Rect; 4] {
    let (w, h, t) = (settings.world_width, settings.world_height, settings.wall_margin);
    [
        Rect::new(0.0, 0.0, w, t),
        Rect::new(0.0, h - t, w, t),
        Rect::new(0.0, 0.0, t, h),
        Rect::new(w - t, 0.0, t, h),
    ]
}
