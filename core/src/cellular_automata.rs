//! Binary open/wall corridor layer.
//!
//! Random fill, then `iterations` synchronous relaxation passes under the
//! rule B5678/S45678: an open cell turns to wall with 5+ wall neighbours,
//! a wall cell survives with 4+. Cells outside the grid count as wall, so
//! the border closes up.

use crate::{grid::Grid, rng::GalaxyRng};

pub const BIRTH_MIN_WALL_NEIGHBOURS: u8 = 5;
pub const SURVIVAL_MIN_WALL_NEIGHBOURS: u8 = 4;

/// `true` = wall, `false` = open.
pub type WallGrid = Grid<bool>;

/// Random fill: one draw per cell, row-major.
pub fn random_fill(width: usize, height: usize, fill_probability: f64, rng: &mut GalaxyRng) -> WallGrid {
    Grid::from_fn(width, height, |_, _| rng.random() < fill_probability)
}

pub fn wall_neighbours(grid: &WallGrid, x: usize, y: usize) -> u8 {
    let mut count = 0;
    for dy in -1i64..=1 {
        for dx in -1i64..=1 {
            if dx == 0 && dy == 0 {
                continue;
            }
            let nx = x as i64 + dx;
            let ny = y as i64 + dy;
            let outside = nx < 0 || ny < 0 || nx >= grid.width as i64 || ny >= grid.height as i64;
            if outside || *grid.get(nx as usize, ny as usize) {
                count += 1;
            }
        }
    }
    count
}

/// One synchronous relaxation pass.
pub fn step(grid: &WallGrid) -> WallGrid {
    Grid::from_fn(grid.width, grid.height, |x, y| {
        let n = wall_neighbours(grid, x, y);
        if *grid.get(x, y) {
            n >= SURVIVAL_MIN_WALL_NEIGHBOURS
        } else {
            n >= BIRTH_MIN_WALL_NEIGHBOURS
        }
    })
}

/// Fill from a dedicated sub-stream and relax.
pub fn generate_corridors(
    width: usize,
    height: usize,
    fill_probability: f64,
    iterations: u32,
    rng: &mut GalaxyRng,
) -> WallGrid {
    let mut grid = random_fill(width, height, fill_probability, rng);
    for _ in 0..iterations {
        grid = step(&grid);
    }
    grid
}

pub fn open_fraction(grid: &WallGrid) -> f64 {
    if grid.is_empty() {
        return 0.0;
    }
    let open = grid.cells().iter().filter(|wall| !**wall).count();
    open as f64 / grid.len() as f64
}
