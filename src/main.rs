//! Drone Maze entry point
//!
//! Headless native host: builds a scenario, drives the simulation one tick
//! per frame until the run ends, and reports the outcome.
//!
//! Usage: `drone-maze [--settings FILE] [--scenario FILE | --seed N] [--max-ticks N]`

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use drone_maze::sim::{Scenario, SimEvent, SimPhase, SimState, TickInput, tick};
use drone_maze::{DroneResult, Settings};

/// Default cap on simulated frames (five minutes at 60 Hz)
const DEFAULT_MAX_TICKS: u64 = 5 * 60 * 60;

/// Run one drone-maze mission without a window and report how it ended.
#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None)]
struct CliArgs {
    /// Settings JSON; missing fields take their defaults.
    #[arg(long, value_name = "FILE")]
    settings: Option<PathBuf>,

    /// Scenario JSON to fly instead of the built-in maze.
    #[arg(long, value_name = "FILE", conflicts_with = "seed")]
    scenario: Option<PathBuf>,

    /// Generate the maze from this seed.
    #[arg(long, value_parser = clap::value_parser!(u64))]
    seed: Option<u64>,

    /// Stop after this many ticks if the run has not ended.
    #[arg(
        long,
        default_value_t = DEFAULT_MAX_TICKS,
        value_parser = clap::value_parser!(u64).range(1..)
    )]
    max_ticks: u64,
}

/// Host holding the simulation and the one-shot commands for the next frame
struct Host {
    state: SimState,
    settings: Settings,
    input: TickInput,
}

impl Host {
    fn new(scenario: Scenario, settings: Settings) -> Self {
        Self {
            state: SimState::new(scenario, &settings),
            settings,
            input: TickInput::default(),
        }
    }

    /// Run one frame: a single simulation tick, then react to its events
    fn update(&mut self) {
        let input = self.input.clone();
        tick(&mut self.state, &input, &self.settings);

        // Clear one-shot inputs after processing
        self.input.start = false;
        self.input.reset = false;

        for event in self.state.drain_events() {
            match event {
                SimEvent::Crashed { cause, pos } => {
                    log::warn!("Crash at ({:.1}, {:.1}) into {:?}", pos.x, pos.y, cause);
                }
                SimEvent::Won { elapsed_secs } => {
                    log::info!("Mission complete in {:.1}s", elapsed_secs);
                }
                SimEvent::Stuck { pos } => log::trace!("Stuck at ({:.1}, {:.1})", pos.x, pos.y),
                other => log::debug!("{:?}", other),
            }
        }
    }
}

fn run(args: CliArgs) -> DroneResult<SimPhase> {
    let settings = match &args.settings {
        Some(path) => Settings::load(path)?,
        None => Settings::default(),
    };
    settings.validate()?;

    let scenario = match (&args.scenario, args.seed) {
        (Some(path), _) => Scenario::load(path, &settings)?,
        (None, Some(seed)) => {
            let scenario = Scenario::generate(seed, &settings);
            scenario.validate(&settings)?;
            scenario
        }
        (None, None) => Scenario::drone_maze(),
    };

    let mut host = Host::new(scenario, settings);
    host.input.start = true;

    let mut frames = 0u64;
    while frames <= args.max_ticks {
        host.update();
        frames += 1;
        if host.state.is_over() {
            break;
        }
    }

    let state = &host.state;
    println!(
        "{:?} after {} ticks ({:.1}s) at ({:.1}, {:.1})",
        state.phase,
        state.running_ticks,
        state.elapsed_secs(),
        state.agent_pos().x,
        state.agent_pos().y
    );
    Ok(state.phase)
}

fn main() -> ExitCode {
    env_logger::init();
    log::info!("Drone Maze (headless) starting...");

    let args = CliArgs::parse();
    match run(args) {
        Ok(SimPhase::Won) => ExitCode::SUCCESS,
        Ok(phase) => {
            log::info!("Run ended without reaching the goal: {:?}", phase);
            ExitCode::from(2)
        }
        Err(err) => {
            log::error!("{err}");
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}
