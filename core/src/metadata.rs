//! Run metadata: everything needed to interpret and reproduce a run.
//!
//! Written as `metadata.json` next to the generated data.
//! The cost-map section is the contract for reading `costmap.bin`.

use crate::{config::GeneratorConfig, cost_map::CostMapMeta, stats::GenerationStats};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StageTiming {
    pub number: u8,
    pub name: String,
    pub elapsed_ms: f64,
}

/// Retry and collision counters gathered while generating.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Diagnostics {
    pub stars_requested: usize,
    pub placement_collisions: u32,
    pub placement_skipped: u32,
    pub name_collisions: u32,
    pub id_collisions: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationMetadata {
    pub seed: String,
    pub numeric_seed: u32,
    /// RFC 3339, UTC.
    pub generated_at: String,
    pub generator_version: String,
    pub config: GeneratorConfig,
    pub stats: GenerationStats,
    pub cost_map: CostMapMeta,
    pub stage_timings: Vec<StageTiming>,
    pub diagnostics: Diagnostics,
}

impl GenerationMetadata {
    /// Stamp the current time onto a finished run.
    pub fn stamp(
        seed: &str,
        numeric_seed: u32,
        config: &GeneratorConfig,
        stats: &GenerationStats,
        cost_map: CostMapMeta,
        stage_timings: &[StageTiming],
        diagnostics: &Diagnostics,
    ) -> Self {
        Self {
            seed: seed.to_string(),
            numeric_seed,
            generated_at: chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Millis, true),
            generator_version: env!("CARGO_PKG_VERSION").to_string(),
            config: config.clone(),
            stats: stats.clone(),
            cost_map,
            stage_timings: stage_timings.to_vec(),
            diagnostics: diagnostics.clone(),
        }
    }
}
