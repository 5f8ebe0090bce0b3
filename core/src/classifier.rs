//! Oikumene selection and Beyond subtype rolls.
//!
//! Phase 1 filters candidates (outside the core-exclusion radius, inside an
//! open corridor) and scores each by proximity to the nearest spiral arm.
//! Phase 2 keeps the top `targetCount` by score. A stable sort means equal
//! scores keep ascending original index.
//!
//! RULE: every non-Oikumene system then gets exactly one draw, in
//! increasing index order. Never reorder or batch these draws.

use crate::{
    config::{GalaxyConfig, OikumeneConfig},
    cost_map::CostMap,
    galaxy,
    rng::GalaxyRng,
    types::{Classification, Coordinate},
};
use serde::{Deserialize, Serialize};
use std::f64::consts::{PI, TAU};

pub const UNINHABITED_THRESHOLD: f64 = 0.85;
pub const LOST_COLONY_THRESHOLD: f64 = 0.92;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassificationResult {
    pub index: usize,
    pub classification: Classification,
    pub is_oikumene: bool,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Candidate {
    pub index: usize,
    pub score: f64,
}

/// Wrap an angle difference into [-π, π].
fn wrap_angle(a: f64) -> f64 {
    (a + PI).rem_euclid(TAU) - PI
}

/// 1 on an arm, 0 exactly between two arms.
pub fn arm_proximity_score(config: &GalaxyConfig, coord: Coordinate) -> f64 {
    let half_w = config.size[0] / 2.0;
    let half_h = config.size[1] / 2.0;
    let nx = (f64::from(coord.x) - config.center[0]) / half_w;
    let ny = (f64::from(coord.y) - config.center[1]) / half_h;
    let rn = nx.hypot(ny);
    let phi = ny.atan2(nx);

    let nearest = (0..config.arms)
        .map(|arm| wrap_angle(phi - galaxy::arm_angle(config, arm, rn)).abs())
        .fold(f64::INFINITY, f64::min);

    let half_gap = galaxy::arm_gap(config.arms) / 2.0;
    (1.0 - nearest / half_gap).clamp(0.0, 1.0)
}

/// Phase 1: filter and score, in index order.
pub fn score_candidates(
    coords: &[Coordinate],
    cost_map: &CostMap,
    galaxy_config: &GalaxyConfig,
    oikumene_config: &OikumeneConfig,
) -> Vec<Candidate> {
    let center = (galaxy_config.center[0], galaxy_config.center[1]);
    coords
        .iter()
        .enumerate()
        .filter(|(_, c)| {
            let d = (f64::from(c.x) - center.0).hypot(f64::from(c.y) - center.1);
            d >= oikumene_config.core_exclusion_radius
        })
        .filter(|(_, c)| cost_map.is_open_corridor(**c))
        .map(|(index, c)| Candidate {
            index,
            score: arm_proximity_score(galaxy_config, *c),
        })
        .collect()
}

/// Phase 2: highest scores win; ties keep index order.
pub fn select_top(mut candidates: Vec<Candidate>, target: usize) -> Vec<usize> {
    candidates.sort_by(|a, b| b.score.total_cmp(&a.score));
    candidates.truncate(target);
    candidates.into_iter().map(|c| c.index).collect()
}

/// Map one uniform draw to a Beyond subtype.
pub fn beyond_subtype(roll: f64) -> Classification {
    if roll < UNINHABITED_THRESHOLD {
        Classification::Uninhabited
    } else if roll < LOST_COLONY_THRESHOLD {
        Classification::LostColony
    } else {
        Classification::HiddenEnclave
    }
}

/// One classification per coordinate, in index order.
pub fn classify(
    coords: &[Coordinate],
    cost_map: &CostMap,
    galaxy_config: &GalaxyConfig,
    oikumene_config: &OikumeneConfig,
    rng: &mut GalaxyRng,
) -> Vec<ClassificationResult> {
    let candidates = score_candidates(coords, cost_map, galaxy_config, oikumene_config);
    let candidate_count = candidates.len();
    let selected = select_top(candidates, oikumene_config.target_count);

    let mut is_oikumene = vec![false; coords.len()];
    for &i in &selected {
        is_oikumene[i] = true;
    }
    log::debug!(
        "{} Oikumene candidates, {} selected (target {})",
        candidate_count,
        selected.len(),
        oikumene_config.target_count
    );

    is_oikumene
        .into_iter()
        .enumerate()
        .map(|(index, oikumene)| {
            let classification = if oikumene {
                Classification::Oikumene
            } else {
                beyond_subtype(rng.random())
            };
            ClassificationResult {
                index,
                classification,
                is_oikumene: oikumene,
            }
        })
        .collect()
}
