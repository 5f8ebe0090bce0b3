//! Trade classification codes.
//!
//! Each rule is evaluated independently against the system's attributes;
//! every matching code is returned, sorted and free of duplicates.

use crate::attributes::{CivilizationData, PlanetaryData, TerRating};
use std::collections::BTreeSet;
use std::ops::RangeInclusive;

/// The attribute view the rules read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TradeProfile {
    pub size: i32,
    pub atmosphere: i32,
    pub hydrography: i32,
    pub population: i32,
    pub government: i32,
    pub law_level: i32,
    pub technology: i32,
}

impl TradeProfile {
    pub fn from_parts(ter: &TerRating, planetary: &PlanetaryData, civ: &CivilizationData) -> Self {
        Self {
            size: planetary.size,
            atmosphere: planetary.atmosphere,
            hydrography: planetary.hydrography,
            population: civ.population,
            government: civ.government,
            law_level: civ.law_level,
            technology: ter.technology,
        }
    }
}

type Rule = fn(&TradeProfile) -> bool;

fn within(value: i32, range: RangeInclusive<i32>) -> bool {
    range.contains(&value)
}

const RULES: &[(&str, Rule)] = &[
    ("Ag", |p| within(p.atmosphere, 4..=9) && within(p.hydrography, 4..=8) && within(p.population, 5..=7)),
    ("As", |p| p.size == 0 && p.atmosphere == 0 && p.hydrography == 0),
    ("Ba", |p| p.population == 0 && p.government == 0 && p.law_level == 0),
    ("De", |p| within(p.atmosphere, 2..=9) && p.hydrography == 0),
    ("Fl", |p| p.atmosphere >= 10 && p.hydrography >= 1),
    ("Ga", |p| within(p.size, 6..=8) && matches!(p.atmosphere, 5 | 6 | 8) && within(p.hydrography, 5..=7)),
    ("Hi", |p| p.population >= 9),
    ("Ht", |p| p.technology >= 3 && p.population >= 1),
    ("Ic", |p| within(p.atmosphere, 0..=1) && p.hydrography >= 1),
    ("In", |p| matches!(p.atmosphere, 0 | 1 | 2 | 4 | 7 | 9) && p.population >= 9),
    ("Lo", |p| within(p.population, 1..=3)),
    ("Lt", |p| p.technology <= -3 && p.population >= 1),
    ("Na", |p| within(p.atmosphere, 0..=3) && within(p.hydrography, 0..=3) && p.population >= 6),
    ("Ni", |p| within(p.population, 4..=6)),
    ("Po", |p| within(p.atmosphere, 2..=5) && within(p.hydrography, 0..=3)),
    ("Ri", |p| matches!(p.atmosphere, 6 | 8) && within(p.population, 6..=8)),
    ("Va", |p| p.atmosphere == 0),
    ("Wa", |p| p.hydrography == 10),
];

pub fn trade_codes(profile: &TradeProfile) -> Vec<String> {
    RULES
        .iter()
        .filter(|(_, rule)| rule(profile))
        .map(|(code, _)| *code)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .map(str::to_string)
        .collect()
}
