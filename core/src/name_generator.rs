//! Deterministic system names and ids.
//!
//! Names are built from onset + nucleus [+ coda] syllables drawn from
//! curated phoneme pools, words from 2-3 syllables, names from 1-3 words.
//! Ids are UUID-v4 shaped, filled from the shared stream through `RngCore`.
//!
//! RULE: names and ids are unique per run. A collision redraws a fresh
//! value from the stream; the collision is counted and nothing else.

use crate::{
    error::{GenError, GenResult},
    rng::GalaxyRng,
    types::SystemId,
};
use rand::RngCore;
use std::collections::HashSet;

/// Redraws allowed before a uniqueness loop gives up.
pub const MAX_UNIQUE_ATTEMPTS: u32 = 1000;

const CODA_PROBABILITY: f64 = 0.35;
const ONE_WORD_SHARE: f64 = 0.60;
const TWO_WORD_SHARE: f64 = 0.85;

/// Stateless phoneme-pool name builder.
pub struct NameGenerator;

impl NameGenerator {
    /// One syllable: onset + nucleus, sometimes a coda.
    pub fn generate_syllable(rng: &mut GalaxyRng) -> String {
        let onset = pick(rng, Self::onsets());
        let nucleus = pick(rng, Self::nuclei());
        let mut syllable = format!("{onset}{nucleus}");
        if rng.chance(CODA_PROBABILITY) {
            syllable.push_str(pick(rng, Self::codas()));
        }
        syllable
    }

    /// One capitalized word of 2-3 syllables.
    pub fn generate_word(rng: &mut GalaxyRng) -> String {
        let syllables = rng.randint(2, 3);
        let word: String = (0..syllables).map(|_| Self::generate_syllable(rng)).collect();
        capitalize(&word)
    }

    /// A name of 1-3 words (60/25/15 split from one roll).
    pub fn generate_name(rng: &mut GalaxyRng) -> String {
        let roll = rng.random();
        let words = if roll < ONE_WORD_SHARE {
            1
        } else if roll < TWO_WORD_SHARE {
            2
        } else {
            3
        };
        (0..words)
            .map(|_| Self::generate_word(rng))
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// UUID-v4-shaped id from 16 stream bytes (four raw draws). The version
    /// nibble is forced to 4 and the variant nibble to one of 8/9/a/b.
    pub fn generate_id(rng: &mut GalaxyRng) -> SystemId {
        let mut bytes = [0u8; 16];
        rng.fill_bytes(&mut bytes);
        uuid::Builder::from_random_bytes(bytes)
            .into_uuid()
            .hyphenated()
            .to_string()
    }

    /// Consonant onsets, weighted toward the liquid and sibilant sounds.
    fn onsets() -> &'static [&'static str] {
        &[
            "b", "br", "c", "ch", "d", "dr", "f", "g", "gl", "gr", "h", "j",
            "k", "kh", "l", "m", "n", "p", "ph", "pr", "qu", "r", "s", "sh",
            "sk", "sl", "st", "t", "th", "tr", "v", "vr", "w", "x", "y", "z",
            "zh", "",
        ]
    }

    fn nuclei() -> &'static [&'static str] {
        &[
            "a", "e", "i", "o", "u", "y", "ae", "ai", "au", "ea", "ei", "ia",
            "io", "oa", "ou", "ue",
        ]
    }

    fn codas() -> &'static [&'static str] {
        &[
            "b", "d", "g", "k", "l", "m", "n", "nd", "ng", "nt", "r", "rn",
            "s", "sk", "st", "th", "x", "z",
        ]
    }
}

fn pick(rng: &mut GalaxyRng, pool: &'static [&'static str]) -> &'static str {
    let index = rng.randint(0, pool.len() as i64 - 1) as usize;
    pool[index]
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Per-run uniqueness sets and collision counters for names and ids.
#[derive(Debug, Default)]
pub struct NameRegistry {
    names: HashSet<String>,
    ids: HashSet<SystemId>,
    pub name_collisions: u32,
    pub id_collisions: u32,
}

impl NameRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// A name not yet issued this run.
    pub fn unique_name(&mut self, rng: &mut GalaxyRng) -> GenResult<String> {
        for _ in 0..MAX_UNIQUE_ATTEMPTS {
            let name = NameGenerator::generate_name(rng);
            if self.names.insert(name.clone()) {
                return Ok(name);
            }
            self.name_collisions += 1;
        }
        Err(GenError::Exhausted {
            what: "system name",
            attempts: MAX_UNIQUE_ATTEMPTS,
        })
    }

    /// An id not yet issued this run.
    pub fn unique_id(&mut self, rng: &mut GalaxyRng) -> GenResult<SystemId> {
        for _ in 0..MAX_UNIQUE_ATTEMPTS {
            let id = NameGenerator::generate_id(rng);
            if self.ids.insert(id.clone()) {
                return Ok(id);
            }
            self.id_collisions += 1;
        }
        Err(GenError::Exhausted {
            what: "system id",
            attempts: MAX_UNIQUE_ATTEMPTS,
        })
    }

    pub fn issued_names(&self) -> usize {
        self.names.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn name_generation_is_deterministic() {
        let mut rng1 = GalaxyRng::from_seed_str("names");
        let mut rng2 = GalaxyRng::from_seed_str("names");
        for _ in 0..50 {
            assert_eq!(
                NameGenerator::generate_name(&mut rng1),
                NameGenerator::generate_name(&mut rng2),
                "Same seed should produce same name"
            );
        }
    }

    #[test]
    fn generates_valid_names() {
        let mut rng = GalaxyRng::new(12345);
        for _ in 0..200 {
            let name = NameGenerator::generate_name(&mut rng);
            let words: Vec<&str> = name.split(' ').collect();
            assert!((1..=3).contains(&words.len()), "{name}");
            for word in words {
                assert!(word.len() >= 2, "word too short in {name}");
                assert!(word.chars().next().unwrap().is_uppercase(), "{name}");
                assert!(word.chars().all(|c| c.is_ascii_alphabetic()), "{name}");
            }
        }
    }

    #[test]
    fn word_count_split_is_roughly_60_25_15() {
        let mut rng = GalaxyRng::new(2024);
        let mut counts = [0usize; 3];
        for _ in 0..10_000 {
            let n = NameGenerator::generate_name(&mut rng).split(' ').count();
            counts[n - 1] += 1;
        }
        assert!((5700..=6300).contains(&counts[0]), "{counts:?}");
        assert!((2200..=2800).contains(&counts[1]), "{counts:?}");
        assert!((1200..=1800).contains(&counts[2]), "{counts:?}");
    }

    #[test]
    fn ids_are_uuid_v4_shaped() {
        let mut rng = GalaxyRng::new(3);
        for _ in 0..100 {
            let id = NameGenerator::generate_id(&mut rng);
            assert_eq!(id.len(), 36);
            let parsed = uuid::Uuid::parse_str(&id).unwrap();
            assert_eq!(parsed.get_version_num(), 4);
            let variant = id.as_bytes()[19];
            assert!(matches!(variant, b'8' | b'9' | b'a' | b'b'), "{id}");
            assert_eq!(id.as_bytes()[14], b'4');
        }
    }

    #[test]
    fn id_consumes_four_draws() {
        let mut rng = GalaxyRng::new(1);
        NameGenerator::generate_id(&mut rng);
        assert_eq!(rng.draws(), 4);
    }

    #[test]
    fn twelve_thousand_unique_names_with_few_collisions() {
        let mut rng = GalaxyRng::from_seed_str("naming-at-scale");
        let mut registry = NameRegistry::new();
        for _ in 0..12_000 {
            registry.unique_name(&mut rng).unwrap();
        }
        assert_eq!(registry.issued_names(), 12_000);
        let rate = f64::from(registry.name_collisions) / 12_000.0;
        assert!(rate < 0.10, "collision rate {rate:.3}");
    }

    #[test]
    fn unique_ids_never_repeat() {
        let mut rng = GalaxyRng::new(8);
        let mut registry = NameRegistry::new();
        let ids: HashSet<_> = (0..2000).map(|_| registry.unique_id(&mut rng).unwrap()).collect();
        assert_eq!(ids.len(), 2000);
    }
}
