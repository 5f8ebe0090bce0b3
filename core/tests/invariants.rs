//! Whole-run invariants: partition, exclusion radius, clamps, routes.

use oikumene_core::{
    attributes::CivilizationData, economics::Economics, types::Classification, GeneratedGalaxy,
    GeneratorConfig, Pipeline,
};
use std::collections::{HashMap, HashSet};

fn generate(seed: &str) -> GeneratedGalaxy {
    let mut config = GeneratorConfig::default();
    config.galaxy.size = [600.0, 600.0];
    config.galaxy.max_stars = Some(120);
    config.oikumene.target_count = 12;
    config.oikumene.core_exclusion_radius = 60.0;
    config.route.max_range = 60.0;
    Pipeline::new(seed, config).unwrap().generate().unwrap()
}

const SEEDS: [&str; 3] = ["alpha", "beta", "gamma"];

#[test]
fn coordinates_are_unique() {
    for seed in SEEDS {
        let g = generate(seed);
        let unique: HashSet<_> = g.coordinates.iter().collect();
        assert_eq!(unique.len(), g.coordinates.len(), "seed {seed}");
    }
}

#[test]
fn classification_partitions_the_systems() {
    for seed in SEEDS {
        let s = generate(seed).stats;
        assert_eq!(s.oikumene_systems + s.beyond_systems, s.total_systems);
        assert_eq!(
            s.beyond_uninhabited + s.beyond_lost_colonies + s.beyond_hidden_enclaves,
            s.beyond_systems
        );
        assert!(s.oikumene_systems <= 12);
    }
}

#[test]
fn oikumene_respect_core_exclusion_and_corridors() {
    for seed in SEEDS {
        let g = generate(seed);
        for s in g.systems.iter().filter(|s| s.is_oikumene) {
            let d = f64::from(s.coordinate.x).hypot(f64::from(s.coordinate.y));
            assert!(d >= 60.0, "{} at distance {d}", s.name);
            assert!(g.cost_map.is_open_corridor(s.coordinate));
        }
    }
}

#[test]
fn attribute_clamps_hold_per_classification() {
    for seed in SEEDS {
        for s in generate(seed).systems {
            let civ = &s.civilization;
            match s.classification {
                Classification::Oikumene => {
                    assert!(s.ter.technology >= 1);
                    assert!(civ.population >= 6);
                }
                Classification::LostColony => assert!(s.ter.technology <= -2),
                Classification::HiddenEnclave => assert!(s.ter.technology >= 2),
                Classification::Uninhabited => {
                    assert_eq!(*civ, CivilizationData::EMPTY);
                    assert_eq!(s.economics, Economics::default());
                }
            }
            if civ.population > 0 {
                assert!(civ.factions >= 1);
            }
            assert!((0..=10).contains(&s.planetary.hydrography));
            assert!((-4..=4).contains(&s.ter.environment));
        }
    }
}

#[test]
fn names_and_ids_are_unique() {
    let g = generate("alpha");
    let names: HashSet<_> = g.systems.iter().map(|s| &s.name).collect();
    let ids: HashSet<_> = g.systems.iter().map(|s| &s.id).collect();
    assert_eq!(names.len(), g.systems.len());
    assert_eq!(ids.len(), g.systems.len());
}

#[test]
fn routes_join_oikumene_within_range() {
    for seed in SEEDS {
        let g = generate(seed);
        let by_id: HashMap<_, _> = g.systems.iter().map(|s| (s.id.as_str(), s)).collect();
        let order: HashMap<_, _> = g
            .systems
            .iter()
            .enumerate()
            .map(|(i, s)| (s.id.as_str(), i))
            .collect();

        for r in &g.routes {
            let a = by_id[r.origin_id.as_str()];
            let b = by_id[r.destination_id.as_str()];
            assert!(a.is_oikumene && b.is_oikumene);
            assert!(order[a.id.as_str()] < order[b.id.as_str()]);
            assert!(a.coordinate.distance_to(&b.coordinate) <= 60.0);
            assert_eq!(r.path.first(), Some(&a.coordinate));
            assert_eq!(r.path.last(), Some(&b.coordinate));
            assert!(r.cost > 0.0);
        }
        assert_eq!(g.stats.oikumene_routes, g.routes.len());
    }
}
