//! Star placement along logarithmic spiral arms.
//!
//! Positions are sampled in a normalized frame (radius 1 = rim) and then
//! stretched to the configured galaxy size. Arm `k` at normalized radius
//! `rn` sits at angle `2πk/arms + degree·ln(1 + (e−1)·rn)`; the classifier
//! scores candidates against the same curve through `arm_angle()`.

use crate::{config::GalaxyConfig, rng::GalaxyRng, types::Coordinate};
use std::collections::HashSet;
use std::f64::consts::{E, TAU};

/// Redraws allowed per star before it is skipped.
pub const MAX_PLACEMENT_ATTEMPTS: u32 = 64;

/// Angular scatter around an arm, as a fraction of the inter-arm gap.
const ARM_SPREAD: f64 = 0.35;

/// Outer stars scatter less: spread shrinks by this fraction at the rim.
const RIM_TIGHTENING: f64 = 0.5;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StarField {
    pub coordinates: Vec<Coordinate>,
    /// Draws rejected because the rounded coordinate was already taken.
    pub collisions: u32,
    /// Stars abandoned after MAX_PLACEMENT_ATTEMPTS collisions.
    pub skipped: u32,
}

/// Angular distance between neighbouring arms.
pub fn arm_gap(arms: u32) -> f64 {
    TAU / f64::from(arms.max(1))
}

/// Expected polar angle of arm `arm` at normalized radius `rn`.
pub fn arm_angle(config: &GalaxyConfig, arm: u32, rn: f64) -> f64 {
    f64::from(arm) * arm_gap(config.arms) + config.spiral_degree * (1.0 + (E - 1.0) * rn).ln()
}

/// Unclamped star count implied by the geometry.
pub fn natural_star_count(config: &GalaxyConfig) -> usize {
    let mean_diameter = (config.size[0] + config.size[1]) / 2.0;
    let per_arm = (mean_diameter / config.spc_factor).floor().max(0.0) as usize;
    per_arm * config.arms as usize
}

/// Number of stars generation aims for, after the optional hard cap.
pub fn target_star_count(config: &GalaxyConfig) -> usize {
    let natural = natural_star_count(config);
    match config.max_stars {
        Some(cap) => natural.min(cap),
        None => natural,
    }
}

/// Place unique star coordinates. Consumes the shared stream.
pub fn generate_star_field(config: &GalaxyConfig, rng: &mut GalaxyRng) -> StarField {
    let target = target_star_count(config);
    let gap = arm_gap(config.arms);
    let half_w = config.size[0] / 2.0;
    let half_h = config.size[1] / 2.0;

    let mut field = StarField {
        coordinates: Vec::with_capacity(target),
        ..Default::default()
    };
    let mut taken: HashSet<Coordinate> = HashSet::with_capacity(target);

    for i in 0..target {
        let arm = (i % config.arms as usize) as u32;
        let mut placed = false;

        for _ in 0..MAX_PLACEMENT_ATTEMPTS {
            let rn = rng.random();
            let triangular = rng.random() + rng.random() - 1.0;
            let spread =
                gap * ARM_SPREAD * config.dyn_size_factor * (1.0 - RIM_TIGHTENING * rn);
            let theta = arm_angle(config, arm, rn) + triangular * spread;

            let coord = Coordinate::new(
                (config.center[0] + rn * half_w * theta.cos()).round() as i32,
                (config.center[1] + rn * half_h * theta.sin()).round() as i32,
            );
            if taken.insert(coord) {
                field.coordinates.push(coord);
                placed = true;
                break;
            }
            field.collisions += 1;
        }

        if !placed {
            field.skipped += 1;
        }
    }

    if field.skipped > 0 {
        log::warn!(
            "Star placement skipped {} of {} stars after {} attempts each",
            field.skipped,
            target,
            MAX_PLACEMENT_ATTEMPTS
        );
    }
    log::debug!(
        "Placed {} stars ({} coordinate collisions redrawn)",
        field.coordinates.len(),
        field.collisions
    );
    field
}
