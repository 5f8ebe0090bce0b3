//! Stellar density: neighbour counts and the environment penalty they imply.
//!
//! Purely derived, no randomness.

use crate::{spatial_hash::SpatialHash, types::Coordinate};
use serde::{Deserialize, Serialize};

/// Neighbour count at which the penalty saturates.
pub const PENALTY_SATURATION: usize = 16;
pub const NEIGHBOURS_PER_PENALTY_STEP: usize = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DensityData {
    pub neighbor_count: u32,
    /// In [-4, 0].
    pub environment_penalty: i32,
}

/// `-floor(min(n, 16) / 4)`.
pub fn environment_penalty(neighbor_count: usize) -> i32 {
    -((neighbor_count.min(PENALTY_SATURATION) / NEIGHBOURS_PER_PENALTY_STEP) as i32)
}

/// Density for every coordinate, in input order.
pub fn calculate_density(coords: &[Coordinate], radius: f64) -> Vec<DensityData> {
    let mut hash = SpatialHash::new(radius);
    for (i, c) in coords.iter().enumerate() {
        hash.insert(i, c.x, c.y);
    }

    coords
        .iter()
        .enumerate()
        .map(|(i, c)| {
            let neighbors = hash
                .query_radius(c.x, c.y, radius)
                .into_iter()
                .filter(|&id| id != i)
                .count();
            DensityData {
                neighbor_count: neighbors as u32,
                environment_penalty: environment_penalty(neighbors),
            }
        })
        .collect()
}
