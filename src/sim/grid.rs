//! Grid discretization shared by the planners
//!
//! Planning happens on integer cells of `grid_size` pixels. A cell maps back to
//! the world at its top-left corner, so every planner emits waypoints on the
//! same lattice.

use std::cmp::Ordering;
use std::collections::HashMap;
use std::f32::consts::SQRT_2;

use glam::{IVec2, Vec2};

use super::geometry::Rect;
use crate::Settings;

/// The eight neighbour offsets (orthogonal first, then diagonal)
pub const NEIGHBORS: [IVec2; 8] = [
    IVec2::new(0, 1),
    IVec2::new(1, 0),
    IVec2::new(0, -1),
    IVec2::new(-1, 0),
    IVec2::new(1, 1),
    IVec2::new(1, -1),
    IVec2::new(-1, 1),
    IVec2::new(-1, -1),
];

/// Cell containing a world position
#[inline]
pub fn quantize(pos: Vec2, grid_size: f32) -> IVec2 {
    (pos / grid_size).floor().as_ivec2()
}

/// World coordinate of a cell
#[inline]
pub fn to_world(cell: IVec2, grid_size: f32) -> Vec2 {
    cell.as_vec2() * grid_size
}

/// Cost of a single step to a neighbour at `offset`
#[inline]
pub fn step_cost(offset: IVec2, grid_size: f32) -> f32 {
    if offset.x == 0 || offset.y == 0 {
        grid_size
    } else {
        grid_size * SQRT_2
    }
}

/// Euclidean distance between two cells, in cells
#[inline]
pub fn cell_distance(a: IVec2, b: IVec2) -> f32 {
    (a - b).as_vec2().length()
}

/// Whether the agent may occupy `cell` while planning
///
/// The cell must lie inside the world and the inflated agent footprint
/// centred on it must not overlap any obstacle.
pub fn cell_is_open(cell: IVec2, obstacles: &[Rect], settings: &Settings) -> bool {
    let pos = to_world(cell, settings.grid_size);
    if pos.x < 0.0
        || pos.x >= settings.world_width
        || pos.y < 0.0
        || pos.y >= settings.world_height
    {
        return false;
    }
    Rect::centered(pos, settings.planning_clearance())
        .first_hit(obstacles)
        .is_none()
}

/// Frontier entry ordered so that `BinaryHeap` pops the lowest priority first
#[derive(Debug, Clone, Copy)]
pub(crate) struct Frontier {
    pub priority: f32,
    pub cost: f32,
    pub cell: IVec2,
}

impl PartialEq for Frontier {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Frontier {}

impl PartialOrd for Frontier {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Frontier {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reversed: smaller priority is "greater" for the max-heap
        other.priority.total_cmp(&self.priority)
    }
}

/// Walk predecessor links back from `end` and emit world waypoints start-first
pub(crate) fn reconstruct(
    came_from: &HashMap<IVec2, IVec2>,
    end: IVec2,
    grid_size: f32,
) -> Vec<Vec2> {
    let mut cells = vec![end];
    let mut current = end;
    while let Some(&prev) = came_from.get(&current) {
        cells.push(prev);
        current = prev;
    }
    cells.reverse();
    cells.into_iter().map(|cell| to_world(cell, grid_size)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::collections::BinaryHeap;

    #[test]
    fn test_quantize_floors_negative() {
        assert_eq!(quantize(Vec2::new(-0.5, 4.9), 5.0), IVec2::new(-1, 0));
        assert_eq!(quantize(Vec2::new(50.0, 350.0), 5.0), IVec2::new(10, 70));
    }

    #[test]
    fn test_step_costs() {
        assert_eq!(step_cost(IVec2::new(1, 0), 5.0), 5.0);
        assert!((step_cost(IVec2::new(-1, 1), 5.0) - 7.0711).abs() < 1e-3);
    }

    #[test]
    fn test_cell_bounds() {
        let settings = Settings::default();
        assert!(cell_is_open(IVec2::new(0, 0), &[], &settings));
        assert!(!cell_is_open(IVec2::new(-1, 0), &[], &settings));
        // 160 * 5 == 800 is outside [0, 800)
        assert!(!cell_is_open(IVec2::new(160, 10), &[], &settings));
        assert!(cell_is_open(IVec2::new(159, 119), &[], &settings));
    }

    #[test]
    fn test_cell_blocked_by_inflated_footprint() {
        let settings = Settings::default();
        let wall = [Rect::new(100.0, 0.0, 10.0, 600.0)];
        // Footprint half-size 15: cell at x=85 spans 70..100, touching only
        assert!(cell_is_open(IVec2::new(17, 20), &wall, &settings));
        // x=90 spans 75..105 and overlaps
        assert!(!cell_is_open(IVec2::new(18, 20), &wall, &settings));
    }

    #[test]
    fn test_frontier_pops_lowest_priority() {
        let mut heap = BinaryHeap::new();
        for (priority, x) in [(3.0, 3), (-1.0, -1), (2.0, 2)] {
            heap.push(Frontier {
                priority,
                cost: 0.0,
                cell: IVec2::new(x, 0),
            });
        }
        let order: Vec<i32> = std::iter::from_fn(|| heap.pop().map(|n| n.cell.x)).collect();
        assert_eq!(order, vec![-1, 2, 3]);
    }

    #[test]
    fn test_reconstruct_start_first() {
        let mut came_from = HashMap::new();
        came_from.insert(IVec2::new(2, 0), IVec2::new(1, 0));
        came_from.insert(IVec2::new(1, 0), IVec2::new(0, 0));
        let path = reconstruct(&came_from, IVec2::new(2, 0), 5.0);
        assert_eq!(
            path,
            vec![Vec2::new(0.0, 0.0), Vec2::new(5.0, 0.0), Vec2::new(10.0, 0.0)]
        );
    }

    proptest! {
        #[test]
        fn prop_quantize_round_trip_within_one_cell(
            x in -1000.0f32..1000.0,
            y in -1000.0f32..1000.0,
            grid in 1.0f32..20.0,
        ) {
            let pos = Vec2::new(x, y);
            let back = to_world(quantize(pos, grid), grid);
            prop_assert!((pos.x - back.x).abs() <= grid + 1e-3);
            prop_assert!((pos.y - back.y).abs() <= grid + 1e-3);
        }
    }
}
