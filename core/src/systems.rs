//! Stage 5: assemble one `StarSystem` per coordinate.
//!
//! Per system, in index order: id, name, then the attribute rolls. Trade
//! codes and economics are derived from the rolls without further draws.

use crate::{
    attributes::{self, CivilizationData, PlanetaryData, TerRating},
    classifier::ClassificationResult,
    density::DensityData,
    economics::{self, Economics},
    error::{GenError, GenResult},
    name_generator::NameRegistry,
    rng::GalaxyRng,
    trade_codes::{self, TradeProfile},
    types::{Classification, Coordinate, SystemId},
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StarSystem {
    pub id: SystemId,
    pub name: String,
    pub coordinate: Coordinate,
    pub classification: Classification,
    pub is_oikumene: bool,
    pub density: DensityData,
    pub ter: TerRating,
    pub planetary: PlanetaryData,
    pub civilization: CivilizationData,
    pub trade_codes: Vec<String>,
    pub economics: Economics,
}

/// Stage output plus the uniqueness counters the run reports.
#[derive(Debug, Clone, Default)]
pub struct SystemBatch {
    pub systems: Vec<StarSystem>,
    pub name_collisions: u32,
    pub id_collisions: u32,
}

pub fn generate_systems(
    coords: &[Coordinate],
    classifications: &[ClassificationResult],
    density: &[DensityData],
    rng: &mut GalaxyRng,
) -> GenResult<SystemBatch> {
    if classifications.len() != coords.len() || density.len() != coords.len() {
        return Err(GenError::InvalidArgument(format!(
            "mismatched stage inputs: {} coordinates, {} classifications, {} density records",
            coords.len(),
            classifications.len(),
            density.len()
        )));
    }

    let mut registry = NameRegistry::new();
    let mut systems = Vec::with_capacity(coords.len());

    for ((coordinate, result), density) in coords.iter().zip(classifications).zip(density) {
        let id = registry.unique_id(rng)?;
        let name = registry.unique_name(rng)?;
        let rolled = attributes::generate_attributes(rng, result.classification, density);

        let profile = TradeProfile::from_parts(&rolled.ter, &rolled.planetary, &rolled.civilization);
        systems.push(StarSystem {
            id,
            name,
            coordinate: *coordinate,
            classification: result.classification,
            is_oikumene: result.is_oikumene,
            density: *density,
            ter: rolled.ter,
            planetary: rolled.planetary,
            civilization: rolled.civilization,
            trade_codes: trade_codes::trade_codes(&profile),
            economics: economics::compute_economics(&rolled.ter, &rolled.civilization),
        });
    }

    log::debug!(
        "Assembled {} systems ({} name collisions, {} id collisions)",
        systems.len(),
        registry.name_collisions,
        registry.id_collisions
    );

    Ok(SystemBatch {
        systems,
        name_collisions: registry.name_collisions,
        id_collisions: registry.id_collisions,
    })
}
