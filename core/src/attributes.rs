//! Per-system attribute rolls.
//!
//! The roll procedure is identical for every classification, so every
//! system consumes the same number of draws. Classification rules are
//! applied afterwards as a clamp table; nothing is ever re-rolled.
//!
//! Draw order per system (fixed): technology, environment, resources
//! (4 each), size, atmosphere, temperature, hydrography, population (2
//! each), starport (1), government (2), factions (1), law level (2).

use crate::{density::DensityData, rng::GalaxyRng, types::Classification};
use serde::{Deserialize, Serialize};

pub const TER_MIN: i32 = -4;
pub const TER_MAX: i32 = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TerRating {
    pub technology: i32,
    pub environment: i32,
    pub resources: i32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanetaryData {
    pub size: i32,
    pub atmosphere: i32,
    pub temperature: i32,
    pub hydrography: i32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CivilizationData {
    pub population: i32,
    pub starport: i32,
    pub government: i32,
    pub factions: i32,
    pub law_level: i32,
}

impl CivilizationData {
    pub const EMPTY: CivilizationData = CivilizationData {
        population: 0,
        starport: 0,
        government: 0,
        factions: 0,
        law_level: 0,
    };
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SystemAttributes {
    pub ter: TerRating,
    pub planetary: PlanetaryData,
    pub civilization: CivilizationData,
}

/// Floors and ceilings one classification imposes after rolling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClampRules {
    pub technology_min: Option<i32>,
    pub technology_max: Option<i32>,
    pub population_min: Option<i32>,
    pub population_max: Option<i32>,
}

impl ClampRules {
    pub fn for_classification(classification: Classification) -> Self {
        match classification {
            Classification::Oikumene => Self {
                technology_min: Some(1),
                technology_max: None,
                population_min: Some(6),
                population_max: None,
            },
            Classification::LostColony => Self {
                technology_min: None,
                technology_max: Some(-2),
                population_min: Some(1),
                population_max: None,
            },
            Classification::HiddenEnclave => Self {
                technology_min: Some(2),
                technology_max: None,
                population_min: Some(1),
                population_max: None,
            },
            Classification::Uninhabited => Self {
                technology_min: None,
                technology_max: None,
                population_min: None,
                population_max: Some(0),
            },
        }
    }

    pub fn clamp_technology(&self, value: i32) -> i32 {
        bound(value, self.technology_min, self.technology_max)
    }

    pub fn clamp_population(&self, value: i32) -> i32 {
        bound(value, self.population_min, self.population_max)
    }
}

fn bound(value: i32, min: Option<i32>, max: Option<i32>) -> i32 {
    let v = min.map_or(value, |m| value.max(m));
    max.map_or(v, |m| v.min(m))
}

/// Sum of four Fudge dice: [-4, 4], bell-shaped.
pub fn roll_4df(rng: &mut GalaxyRng) -> i32 {
    (0..4).map(|_| rng.randint(-1, 1) as i32).sum()
}

/// Two six-sided dice: [2, 12].
pub fn roll_2d6(rng: &mut GalaxyRng) -> i32 {
    (rng.randint(1, 6) + rng.randint(1, 6)) as i32
}

fn roll_ter(rng: &mut GalaxyRng, density: &DensityData) -> TerRating {
    let technology = roll_4df(rng);
    let environment = (roll_4df(rng) + density.environment_penalty).clamp(TER_MIN, TER_MAX);
    let resources = roll_4df(rng);
    TerRating {
        technology,
        environment,
        resources,
    }
}

fn roll_planetary(rng: &mut GalaxyRng, environment: i32) -> PlanetaryData {
    let size = (roll_2d6(rng) - 2).clamp(0, 10);

    let atmosphere_roll = roll_2d6(rng) - 7 + size;
    let atmosphere = if size == 0 { 0 } else { atmosphere_roll.max(0) };

    let temperature = (roll_2d6(rng) - 7 + atmosphere).max(0);

    let hydro_roll = roll_2d6(rng);
    let hydrography = if size <= 1 {
        0
    } else {
        let extreme_atmosphere = if atmosphere <= 1 || atmosphere >= 10 { -4 } else { 0 };
        (hydro_roll - 7 + size + environment + extreme_atmosphere).clamp(0, 10)
    };

    PlanetaryData {
        size,
        atmosphere,
        temperature,
        hydrography,
    }
}

/// Civilization rolls against the already-clamped technology and the
/// classification's population bounds.
fn roll_civilization(rng: &mut GalaxyRng, ter: &TerRating, rules: &ClampRules) -> CivilizationData {
    let population_roll = (roll_2d6(rng) - 2 + ter.resources.div_euclid(2)).clamp(0, 12);
    let population = rules.clamp_population(population_roll);

    let starport_roll = rng.randint(-2, 2) as i32;
    let starport = (population + ter.technology + starport_roll).div_euclid(2).clamp(0, 6);

    let government = (roll_2d6(rng) - 7 + population).clamp(0, 15);
    let factions = (rng.randint(1, 3) as i32 + government / 5).max(1);
    let law_level = (roll_2d6(rng) - 7 + government).clamp(0, 15);

    if population == 0 {
        return CivilizationData::EMPTY;
    }
    CivilizationData {
        population,
        starport,
        government,
        factions,
        law_level,
    }
}

/// Roll every attribute for one system.
pub fn generate_attributes(
    rng: &mut GalaxyRng,
    classification: Classification,
    density: &DensityData,
) -> SystemAttributes {
    let rules = ClampRules::for_classification(classification);

    let mut ter = roll_ter(rng, density);
    ter.technology = rules.clamp_technology(ter.technology);

    let planetary = roll_planetary(rng, ter.environment);
    let civilization = roll_civilization(rng, &ter, &rules);

    SystemAttributes {
        ter,
        planetary,
        civilization,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CALM: DensityData = DensityData {
        neighbor_count: 0,
        environment_penalty: 0,
    };

    fn many(classification: Classification, seed: u32) -> Vec<SystemAttributes> {
        let mut rng = GalaxyRng::new(seed);
        (0..500)
            .map(|_| generate_attributes(&mut rng, classification, &CALM))
            .collect()
    }

    #[test]
    fn oikumene_floors_hold() {
        for a in many(Classification::Oikumene, 1) {
            assert!(a.ter.technology >= 1);
            assert!(a.civilization.population >= 6);
            assert!(a.civilization.factions >= 1);
        }
    }

    #[test]
    fn uninhabited_has_no_civilization() {
        for a in many(Classification::Uninhabited, 2) {
            assert_eq!(a.civilization, CivilizationData::EMPTY);
        }
    }

    #[test]
    fn lost_colony_and_enclave_technology_bounds() {
        for a in many(Classification::LostColony, 3) {
            assert!(a.ter.technology <= -2);
            assert!(a.civilization.population >= 1);
        }
        for a in many(Classification::HiddenEnclave, 4) {
            assert!(a.ter.technology >= 2);
            assert!(a.civilization.population >= 1);
        }
    }

    #[test]
    fn field_ranges_hold() {
        for class in [
            Classification::Oikumene,
            Classification::Uninhabited,
            Classification::LostColony,
            Classification::HiddenEnclave,
        ] {
            for a in many(class, 9) {
                for v in [a.ter.technology, a.ter.environment, a.ter.resources] {
                    assert!((TER_MIN..=TER_MAX).contains(&v));
                }
                assert!((0..=10).contains(&a.planetary.size));
                assert!(a.planetary.atmosphere >= 0);
                assert!(a.planetary.temperature >= 0);
                assert!((0..=10).contains(&a.planetary.hydrography));
                assert!(a.civilization.starport >= 0);
                assert!(a.civilization.government >= 0);
                assert!(a.civilization.law_level >= 0);
            }
        }
    }

    #[test]
    fn density_penalty_pushes_environment_down() {
        let crowded = DensityData {
            neighbor_count: 20,
            environment_penalty: -4,
        };
        let mut a = GalaxyRng::new(6);
        let mut b = GalaxyRng::new(6);
        for _ in 0..200 {
            let calm = generate_attributes(&mut a, Classification::Uninhabited, &CALM);
            let dense = generate_attributes(&mut b, Classification::Uninhabited, &crowded);
            assert!(dense.ter.environment <= calm.ter.environment);
            assert!(dense.planetary.hydrography <= calm.planetary.hydrography);
        }
    }

    #[test]
    fn every_classification_consumes_the_same_draws() {
        let mut counts = Vec::new();
        for class in [
            Classification::Oikumene,
            Classification::Uninhabited,
            Classification::LostColony,
            Classification::HiddenEnclave,
        ] {
            let mut rng = GalaxyRng::new(12);
            generate_attributes(&mut rng, class, &CALM);
            counts.push(rng.draws());
        }
        assert!(counts.iter().all(|&c| c == counts[0]), "{counts:?}");
        assert_eq!(counts[0], 4 * 3 + 2 * 5 + 1 + 2 + 1 + 2);
    }
}
