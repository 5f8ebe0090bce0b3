//! Derived system economics.
//!
//! Every field is zero when population is zero.

use crate::attributes::{CivilizationData, TerRating};
use serde::{Deserialize, Serialize};

pub const BASE_TECH_LEVEL: i32 = 8;
pub const BASE_PER_CAPITA_INCOME: f64 = 600.0;
pub const INCOME_GROWTH_PER_TECH_LEVEL: f64 = 2.5;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct Economics {
    pub gurps_tech_level: i32,
    pub per_capita_income: i64,
    pub gross_world_product: i64,
    pub resource_multiplier: f64,
    pub world_trade_number: i32,
}

pub fn compute_economics(ter: &TerRating, civ: &CivilizationData) -> Economics {
    if civ.population == 0 {
        return Economics::default();
    }

    let gurps_tech_level = BASE_TECH_LEVEL + ter.technology;
    let per_capita_income = (BASE_PER_CAPITA_INCOME
        * INCOME_GROWTH_PER_TECH_LEVEL.powi(gurps_tech_level - BASE_TECH_LEVEL))
    .round();
    let gross_world_product = (per_capita_income * 10f64.powi(civ.population - 3)).round();

    Economics {
        gurps_tech_level,
        per_capita_income: per_capita_income as i64,
        gross_world_product: gross_world_product as i64,
        resource_multiplier: f64::from(ter.resources + 4) / 5.0,
        world_trade_number: (civ.population + civ.starport).div_euclid(2),
    }
}
