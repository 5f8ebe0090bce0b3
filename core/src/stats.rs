//! Aggregate counts for one run.

use crate::{routes::Route, systems::StarSystem, types::Classification};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationStats {
    pub total_systems: usize,
    pub oikumene_systems: usize,
    pub beyond_systems: usize,
    pub beyond_uninhabited: usize,
    pub beyond_lost_colonies: usize,
    pub beyond_hidden_enclaves: usize,
    pub oikumene_routes: usize,
    /// 0 when no routes exist.
    pub average_route_cost: f64,
}

impl GenerationStats {
    pub fn from_run(systems: &[StarSystem], routes: &[Route]) -> Self {
        let mut stats = Self {
            total_systems: systems.len(),
            oikumene_routes: routes.len(),
            ..Default::default()
        };
        for system in systems {
            match system.classification {
                Classification::Oikumene => stats.oikumene_systems += 1,
                Classification::Uninhabited => stats.beyond_uninhabited += 1,
                Classification::LostColony => stats.beyond_lost_colonies += 1,
                Classification::HiddenEnclave => stats.beyond_hidden_enclaves += 1,
            }
        }
        stats.beyond_systems =
            stats.beyond_uninhabited + stats.beyond_lost_colonies + stats.beyond_hidden_enclaves;
        if !routes.is_empty() {
            stats.average_route_cost = routes.iter().map(|r| r.cost).sum::<f64>() / routes.len() as f64;
        }
        stats
    }
}
