//! Deterministic star-cluster generator.
//!
//! One seed string drives every stage through a single PRNG stream; the
//! same seed and configuration always reproduce the same galaxy.

pub mod attributes;
pub mod cellular_automata;
pub mod classifier;
pub mod config;
pub mod cost_map;
pub mod density;
pub mod economics;
pub mod error;
pub mod galaxy;
pub mod grid;
pub mod metadata;
pub mod name_generator;
pub mod noise_layer;
pub mod output;
pub mod pipeline;
pub mod rng;
pub mod routes;
pub mod spatial_hash;
pub mod stats;
pub mod systems;
pub mod trade_codes;
pub mod types;

pub use config::{ConfigOverrides, GeneratorConfig};
pub use error::{GenError, GenResult};
pub use pipeline::{GeneratedGalaxy, Pipeline, RunReport};
