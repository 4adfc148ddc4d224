//! Fixed timestep simulation tick
//!
//! Core loop that advances the simulation deterministically. Each running tick
//! moves the adversaries, refreshes obstacles, checks for threats, replans,
//! moves the agent and finally checks for a crash or a win, always in that
//! order.

use super::collision::{Outcome, detect};
use super::motion::{MotionContext, step_agent};
use super::state::{SimEvent, SimPhase, SimState};
use crate::Settings;

/// Host commands for a single tick
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Start a run (only honoured while idle)
    pub start: bool,
    /// Abandon the current run and return to idle
    pub reset: bool,
}

/// Advance the simulation by one tick
pub fn tick(state: &mut SimState, input: &TickInput, settings: &Settings) {
    if input.reset {
        state.reset(settings);
    }

    match state.phase {
        SimPhase::Idle => {
            if input.start {
                state.begin_run(settings);
            }
        }
        SimPhase::Running => run_tick(state, settings),
        // Terminal until reset
        SimPhase::Crashed | SimPhase::Won => {}
    }
}

fn run_tick(state: &mut SimState, settings: &Settings) {
    state.running_ticks += 1;

    // 1. Adversaries
    let agent_pos = state.agent.pos;
    for adversary in &mut state.adversaries {
        adversary.advance(agent_pos, settings);
    }

    // 2. Obstacle snapshot
    state.refresh_obstacles();

    // 3. Threats
    let was_evading = state.agent.is_evading();
    let threat = state.nearest_threat(settings);
    state.agent.threat = threat;
    if let Some(threat) = threat {
        if !was_evading {
            log::debug!(
                "Evading adversary {} at distance {:.1}",
                threat.adversary,
                threat.distance
            );
            state.events.push(SimEvent::EvadeStarted {
                adversary: threat.adversary,
            });
        }
    }

    // 4. Replanning
    state.replan_timer += 1;
    let evade_started = threat.is_some() && !was_evading;
    if state.replan_timer >= settings.replan_interval || evade_started {
        state.replan_main(settings);
    }
    match threat {
        Some(threat) => state.replan_evasion(threat.pos, settings),
        None => state.agent.evasion.clear(),
    }

    // 5. Motion
    let ctx = MotionContext {
        goal: state.scenario.goal,
        obstacles: &state.obstacles,
        threat: threat.map(|t| t.pos),
        evading: threat.is_some(),
    };
    let agent = &mut state.agent;
    let result = step_agent(&mut agent.pos, &mut agent.evasion, &mut agent.main, &ctx, settings);
    state.last_move = Some(result);
    if !result.moved {
        log::debug!(
            "Drone stuck at ({:.1}, {:.1}) via {:?}",
            state.agent.pos.x,
            state.agent.pos.y,
            result.source
        );
        state.events.push(SimEvent::Stuck {
            pos: state.agent.pos,
        });
    }

    // 6. Collisions and goal
    let outcome = detect(
        state.agent.pos,
        state.agent.radius,
        state.scenario.goal,
        &state.obstacles,
        &state.adversaries,
    );
    state.outcome = outcome;

    // 7. Terminal transition
    match outcome {
        Outcome::Running => {}
        Outcome::Crashed(cause) => {
            log::info!(
                "Drone crashed at ({:.1}, {:.1}): {:?}",
                state.agent.pos.x,
                state.agent.pos.y,
                cause
            );
            state.phase = SimPhase::Crashed;
            state.events.push(SimEvent::Crashed {
                cause,
                pos: state.agent.pos,
            });
        }
        Outcome::Won => {
            let elapsed_secs = state.elapsed_secs();
            log::info!("Goal reached! Time: {:.1}s", elapsed_secs);
            state.phase = SimPhase::Won;
            state.events.push(SimEvent::Won { elapsed_secs });
        }
    }
}
