//! Grid A* pathfinder
//!
//! 8-connected search from the agent's cell to the goal cell. There is no
//! closed set: a cell is relaxed again whenever a strictly cheaper route to it
//! turns up, and outdated frontier entries are skipped when popped. The
//! heuristic is the Euclidean cell distance scaled to step cost, which is
//! admissible and consistent for these step costs.
//!
//! An unreachable goal is not an error; the planner returns an empty path and
//! the caller falls back to direct steering.

use std::collections::{BinaryHeap, HashMap};

use glam::{IVec2, Vec2};

use super::geometry::Rect;
use super::grid::{
    Frontier, NEIGHBORS, cell_distance, cell_is_open, quantize, reconstruct, step_cost,
};
use crate::Settings;

/// Plan a path from `start` to `goal` avoiding `obstacles`
///
/// Returns grid waypoints whose first element is the quantized start, or an
/// empty vector when the goal cannot be reached within the expansion cap.
pub fn plan(start: Vec2, goal: Vec2, obstacles: &[Rect], settings: &Settings) -> Vec<Vec2> {
    let grid = settings.grid_size;
    let start = quantize(start, grid);
    let goal = quantize(goal, grid);
    let heuristic = |cell: IVec2| cell_distance(cell, goal) * grid;

    let mut frontier = BinaryHeap::new();
    let mut came_from: HashMap<IVec2, IVec2> = HashMap::new();
    let mut g_score: HashMap<IVec2, f32> = HashMap::new();

    g_score.insert(start, 0.0);
    frontier.push(Frontier {
        priority: heuristic(start),
        cost: 0.0,
        cell: start,
    });

    let mut expansions = 0usize;
    while let Some(Frontier { cost, cell, .. }) = frontier.pop() {
        if cell == goal {
            log::trace!("Path found after {} expansions", expansions);
            return reconstruct(&came_from, goal, grid);
        }

        // A cheaper route reached this cell after the entry was queued
        if g_score.get(&cell).is_some_and(|&best| cost > best) {
            continue;
        }

        if expansions >= settings.max_path_expansions {
            log::debug!(
                "Path search hit expansion cap ({}) before reaching goal",
                settings.max_path_expansions
            );
            return Vec::new();
        }
        expansions += 1;

        for offset in NEIGHBORS {
            let neighbor = cell + offset;
            let tentative = cost + step_cost(offset, grid);
            if g_score.get(&neighbor).is_some_and(|&best| tentative >= best) {
                continue;
            }
            if !cell_is_open(neighbor, obstacles, settings) {
                continue;
            }
            came_from.insert(neighbor, cell);
            g_score.insert(neighbor, tentative);
            frontier.push(Frontier {
                priority: tentative + heuristic(neighbor),
                cost: tentative,
                cell: neighbor,
            });
        }
    }

    Vec::new()
}

/// Total length of a waypoint polyline
pub fn path_length(path: &[Vec2]) -> f32 {
    path.windows(2).map(|pair| (pair[1] - pair[0]).length()).sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::grid::to_world;
    use proptest::prelude::*;

    fn open_settings() -> Settings {
        Settings::default()
    }

    fn assert_clear(path: &[Vec2], obstacles: &[Rect], settings: &Settings) {
        for wp in path.iter().skip(1) {
            let footprint = Rect::centered(*wp, settings.planning_clearance());
            assert!(
                footprint.first_hit(obstacles).is_none(),
                "waypoint {wp:?} overlaps an obstacle"
            );
        }
    }

    #[test]
    fn test_straight_line() {
        let settings = open_settings();
        let path = plan(Vec2::new(100.0, 100.0), Vec2::new(200.0, 100.0), &[], &settings);
        assert_eq!(path.first(), Some(&Vec2::new(100.0, 100.0)));
        assert_eq!(path.last(), Some(&Vec2::new(200.0, 100.0)));
        assert_eq!(path.len(), 21);
        assert!((path_length(&path) - 100.0).abs() < 1e-3);
    }

    #[test]
    fn test_first_waypoint_is_quantized_start() {
        let settings = open_settings();
        let path = plan(Vec2::new(52.3, 348.9), Vec2::new(120.0, 300.0), &[], &settings);
        assert_eq!(path[0], Vec2::new(50.0, 345.0));
    }

    #[test]
    fn test_start_is_goal() {
        let settings = open_settings();
        let path = plan(Vec2::new(51.0, 51.0), Vec2::new(53.0, 54.0), &[], &settings);
        assert_eq!(path, vec![Vec2::new(50.0, 50.0)]);
    }

    #[test]
    fn test_detours_around_obstacle() {
        // Obstacle centred between (0,0) and (100,0); start and goal sit in an
        // open world shifted away from the boundary
        let settings = Settings {
            agent_radius: 10.0,
            ..Default::default()
        };
        let offset = Vec2::new(200.0, 300.0);
        let start = offset;
        let goal = offset + Vec2::new(100.0, 0.0);
        let obstacle = Rect::new(offset.x + 40.0, offset.y - 20.0, 20.0, 40.0);
        let obstacles = [obstacle];

        let path = plan(start, goal, &obstacles, &settings);
        assert!(!path.is_empty());
        assert_eq!(path.last(), Some(&goal));
        assert_clear(&path, &obstacles, &settings);
        // Must leave the straight line to get past
        assert!(path.iter().any(|wp| (wp.y - offset.y).abs() >= 35.0));
    }

    #[test]
    fn test_unreachable_goal_returns_empty() {
        let settings = open_settings();
        // Box the goal in completely
        let goal = Vec2::new(400.0, 300.0);
        let obstacles = [
            Rect::new(350.0, 250.0, 100.0, 10.0),
            Rect::new(350.0, 340.0, 100.0, 10.0),
            Rect::new(350.0, 250.0, 10.0, 100.0),
            Rect::new(440.0, 250.0, 10.0, 100.0),
        ];
        let path = plan(Vec2::new(100.0, 100.0), goal, &obstacles, &settings);
        assert!(path.is_empty());
    }

    #[test]
    fn test_goal_out_of_bounds_returns_empty() {
        let settings = open_settings();
        let path = plan(Vec2::new(100.0, 100.0), Vec2::new(900.0, 100.0), &[], &settings);
        assert!(path.is_empty());
    }

    #[test]
    fn test_expansion_cap() {
        let settings = Settings {
            max_path_expansions: 3,
            ..Default::default()
        };
        let path = plan(Vec2::new(20.0, 20.0), Vec2::new(700.0, 500.0), &[], &settings);
        assert!(path.is_empty());
    }

    #[test]
    fn test_maze_path_clears_walls() {
        let settings = open_settings();
        let scenario = crate::sim::Scenario::drone_maze();
        let path = plan(scenario.start, scenario.goal, &scenario.obstacles, &settings);
        assert!(!path.is_empty());
        assert_eq!(path.last(), Some(&scenario.goal));
        assert_clear(&path, &scenario.obstacles, &settings);
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(32))]

        #[test]
        fn prop_open_field_length_near_straight_line(
            sx in 4i32..150, sy in 4i32..110,
            gx in 4i32..150, gy in 4i32..110,
        ) {
            let settings = open_settings();
            let start = to_world(IVec2::new(sx, sy), settings.grid_size);
            let goal = to_world(IVec2::new(gx, gy), settings.grid_size);
            let path = plan(start, goal, &[], &settings);
            prop_assert!(!path.is_empty());

            // An 8-connected path can exceed the straight line by at most
            // (2 - √2) times the shorter axis span
            let d = (goal - start).abs();
            let straight = d.length();
            let tolerance = (2.0 - std::f32::consts::SQRT_2) * d.x.min(d.y) + 1e-2;
            let length = path_length(&path);
            prop_assert!(length + 1e-2 >= straight);
            prop_assert!(length <= straight + tolerance);
        }

        #[test]
        fn prop_waypoints_clear_obstacles(
            ox in 100.0f32..600.0, oy in 100.0f32..400.0,
            w in 10.0f32..80.0, h in 10.0f32..80.0,
        ) {
            let settings = open_settings();
            let obstacles = [Rect::new(ox, oy, w, h)];
            let path = plan(Vec2::new(30.0, 30.0), Vec2::new(760.0, 560.0), &obstacles, &settings);
            for wp in path.iter().skip(1) {
                let footprint = Rect::centered(*wp, settings.planning_clearance());
                prop_assert!(footprint.first_hit(&obstacles).is_none());
            }
        }
    }
}
