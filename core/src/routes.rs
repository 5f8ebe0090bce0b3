//! Trade routes between Oikumene systems.
//!
//! Pairs farther apart than `maxRange` in a straight line are pruned before
//! any search. The rest get an A* search over 8-connected cost-map cells:
//! entering a cell costs its decoded cost times the step length. The search
//! is confined to the pair's bounding box grown by `maxRange`, so a route
//! that would have to wander further than that is simply not produced.

use crate::{
    cost_map::CostMap,
    types::{Coordinate, SystemId},
};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::BinaryHeap;
use std::f64::consts::SQRT_2;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Route {
    pub origin_id: SystemId,
    pub destination_id: SystemId,
    pub cost: f64,
    pub path: Vec<Coordinate>,
}

/// An endpoint handed to the route builder.
#[derive(Debug, Clone, PartialEq)]
pub struct RouteEndpoint {
    pub id: SystemId,
    pub coordinate: Coordinate,
}

/// Neighbour offsets in a fixed order: orthogonal first, then diagonal.
const NEIGHBOURS: [(i64, i64, f64); 8] = [
    (1, 0, 1.0),
    (-1, 0, 1.0),
    (0, 1, 1.0),
    (0, -1, 1.0),
    (1, 1, SQRT_2),
    (1, -1, SQRT_2),
    (-1, 1, SQRT_2),
    (-1, -1, SQRT_2),
];

#[derive(Debug, Clone, Copy)]
struct OpenNode {
    f: f64,
    cell: usize,
}

impl PartialEq for OpenNode {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for OpenNode {}

impl Ord for OpenNode {
    // BinaryHeap is a max-heap: lowest f first, then lowest cell index.
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .f
            .total_cmp(&self.f)
            .then_with(|| other.cell.cmp(&self.cell))
    }
}

impl PartialOrd for OpenNode {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Rectangular sub-grid the search may visit.
#[derive(Debug, Clone, Copy)]
struct Window {
    x0: usize,
    y0: usize,
    width: usize,
    height: usize,
}

impl Window {
    fn around(a: (usize, usize), b: (usize, usize), margin: usize, map: &CostMap) -> Self {
        let x0 = a.0.min(b.0).saturating_sub(margin);
        let y0 = a.1.min(b.1).saturating_sub(margin);
        let x1 = a.0.max(b.0).saturating_add(margin).min(map.width() - 1);
        let y1 = a.1.max(b.1).saturating_add(margin).min(map.height() - 1);
        Self {
            x0,
            y0,
            width: x1 - x0 + 1,
            height: y1 - y0 + 1,
        }
    }

    #[inline]
    fn local(&self, gx: usize, gy: usize) -> usize {
        (gy - self.y0) * self.width + (gx - self.x0)
    }

    #[inline]
    fn global(&self, local: usize) -> (usize, usize) {
        (self.x0 + local % self.width, self.y0 + local / self.width)
    }
}

fn octile(a: (usize, usize), b: (usize, usize)) -> f64 {
    let dx = a.0.abs_diff(b.0) as f64;
    let dy = a.1.abs_diff(b.1) as f64;
    let (lo, hi) = if dx < dy { (dx, dy) } else { (dy, dx) };
    hi + (SQRT_2 - 1.0) * lo
}

/// Cheapest path between two world coordinates, or `None` when the window
/// holds no path. Returns total cost and the world-coordinate path.
pub fn find_path(
    cost_map: &CostMap,
    from: Coordinate,
    to: Coordinate,
    margin: usize,
) -> Option<(f64, Vec<Coordinate>)> {
    let start = cost_map.world_to_grid(from)?;
    let goal = cost_map.world_to_grid(to)?;
    let window = Window::around(start, goal, margin, cost_map);
    let cells = window.width * window.height;
    let min_step = cost_map.meta.min_cost.max(0.0);

    let mut g = vec![f64::INFINITY; cells];
    let mut came_from = vec![usize::MAX; cells];
    let mut closed = vec![false; cells];
    let mut open = BinaryHeap::new();

    let start_local = window.local(start.0, start.1);
    let goal_local = window.local(goal.0, goal.1);
    g[start_local] = 0.0;
    open.push(OpenNode {
        f: octile(start, goal) * min_step,
        cell: start_local,
    });

    while let Some(OpenNode { cell, .. }) = open.pop() {
        if closed[cell] {
            continue;
        }
        closed[cell] = true;

        if cell == goal_local {
            let mut path = vec![cost_map.grid_to_world(goal.0, goal.1)];
            let mut node = cell;
            while came_from[node] != usize::MAX {
                node = came_from[node];
                let (gx, gy) = window.global(node);
                path.push(cost_map.grid_to_world(gx, gy));
            }
            path.reverse();
            return Some((g[cell], path));
        }

        let (cx, cy) = window.global(cell);
        for &(dx, dy, step) in &NEIGHBOURS {
            let nx = cx as i64 + dx;
            let ny = cy as i64 + dy;
            let inside = nx >= window.x0 as i64
                && ny >= window.y0 as i64
                && nx < (window.x0 + window.width) as i64
                && ny < (window.y0 + window.height) as i64;
            if !inside {
                continue;
            }
            let (nx, ny) = (nx as usize, ny as usize);
            let next = window.local(nx, ny);
            if closed[next] {
                continue;
            }
            let tentative = g[cell] + cost_map.cost_at(nx, ny) * step;
            if tentative < g[next] {
                g[next] = tentative;
                came_from[next] = cell;
                open.push(OpenNode {
                    f: tentative + octile((nx, ny), goal) * min_step,
                    cell: next,
                });
            }
        }
    }

    None
}

/// Routes for every in-range pair, origin before destination in input order.
pub fn build_routes(endpoints: &[RouteEndpoint], cost_map: &CostMap, max_range: f64) -> Vec<Route> {
    // A margin wider than the grid cannot widen the window any further.
    let grid_span = cost_map.width().max(cost_map.height());
    let margin = (max_range.ceil().max(0.0) as usize).min(grid_span);
    let mut routes = Vec::new();
    let mut pruned = 0usize;
    let mut unreachable = 0usize;

    for (i, origin) in endpoints.iter().enumerate() {
        for destination in &endpoints[i + 1..] {
            if origin.coordinate.distance_to(&destination.coordinate) > max_range {
                pruned += 1;
                continue;
            }
            match find_path(cost_map, origin.coordinate, destination.coordinate, margin) {
                Some((cost, path)) => routes.push(Route {
                    origin_id: origin.id.clone(),
                    destination_id: destination.id.clone(),
                    cost,
                    path,
                }),
                None => unreachable += 1,
            }
        }
    }

    log::debug!(
        "Routes: {} built, {} pairs pruned by range, {} without a path",
        routes.len(),
        pruned,
        unreachable
    );
    routes
}
