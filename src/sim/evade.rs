//! Threat evasion planner
//!
//! A bounded best-first search with no destination. Cells inside the exclusion
//! zone around the threat are forbidden outright, and the frontier prefers cells
//! that are cheap to reach and far from the threat. The search stops after a
//! fixed number of expansions, so the result is a step away from danger rather
//! than the farthest safe point.

use std::collections::{BinaryHeap, HashMap};

use glam::{IVec2, Vec2};

use super::geometry::Rect;
use super::grid::{
    Frontier, NEIGHBORS, cell_distance, cell_is_open, quantize, reconstruct, step_cost, to_world,
};
use crate::Settings;

/// Plan a short escape path from `start` away from `threat`
///
/// Returns waypoints starting at the quantized start, or an empty vector when
/// no legal neighbour was ever found.
pub fn evade(start: Vec2, threat: Vec2, obstacles: &[Rect], settings: &Settings) -> Vec<Vec2> {
    let grid = settings.grid_size;
    let start = quantize(start, grid);
    let threat_cell = quantize(threat, grid);

    let mut frontier = BinaryHeap::new();
    let mut came_from: HashMap<IVec2, IVec2> = HashMap::new();
    let mut g_score: HashMap<IVec2, f32> = HashMap::new();

    g_score.insert(start, 0.0);
    frontier.push(Frontier {
        priority: 0.0,
        cost: 0.0,
        cell: start,
    });

    let mut last_expanded = None;
    let mut expansions = 0usize;
    while expansions < settings.evade_budget {
        let Some(Frontier { cost, cell, .. }) = frontier.pop() else {
            break;
        };
        if g_score.get(&cell).is_some_and(|&best| cost > best) {
            continue;
        }
        expansions += 1;
        last_expanded = Some(cell);

        for offset in NEIGHBORS {
            let neighbor = cell + offset;
            let tentative = cost + step_cost(offset, grid);
            if !cell_is_open(neighbor, obstacles, settings) {
                continue;
            }
            // Exclusion is measured from the exact threat position
            if (to_world(neighbor, grid) - threat).length() < settings.exclusion_radius {
                continue;
            }
            if g_score.get(&neighbor).is_some_and(|&best| tentative >= best) {
                continue;
            }
            came_from.insert(neighbor, cell);
            g_score.insert(neighbor, tentative);
            frontier.push(Frontier {
                priority: tentative - cell_distance(neighbor, threat_cell),
                cost: tentative,
                cell: neighbor,
            });
        }
    }

    // Best-effort endpoint: the next node the search would have taken, or the
    // last one it did take when the frontier ran dry
    let end = frontier.pop().map(|node| node.cell).or(last_expanded);
    match end {
        Some(end) if end != start => reconstruct(&came_from, end, grid),
        _ => {
            log::debug!("No evasion cell found around threat at {:?}", threat);
            Vec::new()
        }
    }
}
