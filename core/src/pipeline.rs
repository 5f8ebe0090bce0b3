//! The generation pipeline.
//!
//! EXECUTION ORDER (fixed, never reordered):
//!   1. Generate star positions
//!   2. Compute cost map
//!   3. Calculate stellar density
//!   4. Select Oikumene
//!   5. Generate system attributes
//!   6. Pre-compute routes
//!   7. Write output files
//!
//! RULES:
//!   - One GalaxyRng per run, owned here and threaded through every stage
//!     that draws. Nothing else constructs it.
//!   - A failing stage aborts the run; its error is wrapped with the stage
//!     number and name. A panic is reported the same way.
//!   - Only stage 7 is asynchronous.

use crate::{
    classifier::{self, ClassificationResult},
    config::GeneratorConfig,
    cost_map::{self, CostMap},
    density::{self, DensityData},
    error::{GenError, GenResult},
    galaxy,
    metadata::{Diagnostics, GenerationMetadata, StageTiming},
    output::{self, OutputBundle},
    rng::{self, GalaxyRng},
    routes::{self, Route, RouteEndpoint},
    stats::GenerationStats,
    systems::{self, StarSystem},
    types::Coordinate,
};
use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::path::PathBuf;
use std::time::Instant;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(u8)]
pub enum Stage {
    StarPositions = 1,
    CostMap = 2,
    Density = 3,
    Oikumene = 4,
    Attributes = 5,
    Routes = 6,
    WriteOutput = 7,
}

impl Stage {
    pub const ALL: [Stage; 7] = [
        Self::StarPositions,
        Self::CostMap,
        Self::Density,
        Self::Oikumene,
        Self::Attributes,
        Self::Routes,
        Self::WriteOutput,
    ];

    pub fn number(&self) -> u8 {
        *self as u8
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::StarPositions => "Generate star positions",
            Self::CostMap       => "Compute cost map",
            Self::Density       => "Calculate stellar density",
            Self::Oikumene      => "Select Oikumene",
            Self::Attributes    => "Generate system attributes",
            Self::Routes        => "Pre-compute routes",
            Self::WriteOutput   => "Write output files",
        }
    }

    fn wrap(&self, source: GenError) -> GenError {
        GenError::Stage {
            number: self.number(),
            name: self.name(),
            source: Box::new(source),
        }
    }

    fn timing(&self, started: Instant) -> StageTiming {
        StageTiming {
            number: self.number(),
            name: self.name().to_string(),
            elapsed_ms: started.elapsed().as_secs_f64() * 1000.0,
        }
    }
}

/// Everything stages 1–6 produce. Owned by the caller once returned.
#[derive(Debug, Clone)]
pub struct GeneratedGalaxy {
    pub seed: String,
    pub numeric_seed: u32,
    pub config: GeneratorConfig,
    pub coordinates: Vec<Coordinate>,
    pub cost_map: CostMap,
    pub density: Vec<DensityData>,
    pub classifications: Vec<ClassificationResult>,
    pub systems: Vec<StarSystem>,
    pub routes: Vec<Route>,
    pub stats: GenerationStats,
    pub diagnostics: Diagnostics,
    pub stage_timings: Vec<StageTiming>,
}

/// Result of a full run including the write stage.
#[derive(Debug, Clone)]
pub struct RunReport {
    pub galaxy: GeneratedGalaxy,
    pub metadata: GenerationMetadata,
    pub output_dir: PathBuf,
    pub files_written: usize,
}

pub struct Pipeline {
    seed: String,
    numeric_seed: u32,
    config: GeneratorConfig,
    rng: GalaxyRng,
    timings: Vec<StageTiming>,
}

impl Pipeline {
    /// Validate inputs and seed the run's stream. Nothing is generated yet.
    pub fn new(seed: &str, config: GeneratorConfig) -> GenResult<Self> {
        if seed.is_empty() {
            return Err(GenError::InvalidArgument("seed must not be empty".into()));
        }
        config.validate()?;
        let numeric_seed = rng::hash_seed(seed);
        Ok(Self {
            seed: seed.to_string(),
            numeric_seed,
            config,
            rng: GalaxyRng::new(numeric_seed),
            timings: Vec::with_capacity(Stage::ALL.len()),
        })
    }

    pub fn numeric_seed(&self) -> u32 {
        self.numeric_seed
    }

    /// Stages 1–6, no I/O.
    pub fn generate(mut self) -> GenResult<GeneratedGalaxy> {
        log::info!(
            "Generating galaxy for seed '{}' (numeric {:#010x})",
            self.seed,
            self.numeric_seed
        );
        let config = self.config.clone();

        let field = self.run_stage(Stage::StarPositions, |rng| {
            Ok(galaxy::generate_star_field(&config.galaxy, rng))
        })?;
        let coords = field.coordinates;

        let cost_map = self.run_stage(Stage::CostMap, |rng| {
            cost_map::build_cost_map(&coords, &config.cost_map, rng)
        })?;

        let density = self.run_stage(Stage::Density, |_| {
            Ok(density::calculate_density(&coords, config.density_radius))
        })?;

        let classifications = self.run_stage(Stage::Oikumene, |rng| {
            Ok(classifier::classify(
                &coords,
                &cost_map,
                &config.galaxy,
                &config.oikumene,
                rng,
            ))
        })?;

        let batch = self.run_stage(Stage::Attributes, |rng| {
            systems::generate_systems(&coords, &classifications, &density, rng)
        })?;

        let routes = self.run_stage(Stage::Routes, |_| {
            let endpoints: Vec<RouteEndpoint> = batch
                .systems
                .iter()
                .filter(|s| s.is_oikumene)
                .map(|s| RouteEndpoint {
                    id: s.id.clone(),
                    coordinate: s.coordinate,
                })
                .collect();
            Ok(routes::build_routes(&endpoints, &cost_map, config.route.max_range))
        })?;

        let stats = GenerationStats::from_run(&batch.systems, &routes);
        let diagnostics = Diagnostics {
            stars_requested: galaxy::target_star_count(&config.galaxy),
            placement_collisions: field.collisions,
            placement_skipped: field.skipped,
            name_collisions: batch.name_collisions,
            id_collisions: batch.id_collisions,
        };
        log::debug!("Diagnostics: {:?}", diagnostics);

        Ok(GeneratedGalaxy {
            seed: self.seed,
            numeric_seed: self.numeric_seed,
            config,
            coordinates: coords,
            cost_map,
            density,
            classifications,
            systems: batch.systems,
            routes,
            stats,
            diagnostics,
            stage_timings: self.timings,
        })
    }

    /// Stages 1–7. Output goes to `config.output`.
    pub async fn run(self) -> GenResult<RunReport> {
        let galaxy = self.generate()?;
        let output_dir = PathBuf::from(&galaxy.config.output);
        let stage = Stage::WriteOutput;

        log::info!("Stage {} ({}) started", stage.number(), stage.name());
        let started = Instant::now();

        let metadata = GenerationMetadata::stamp(
            &galaxy.seed,
            galaxy.numeric_seed,
            &galaxy.config,
            &galaxy.stats,
            galaxy.cost_map.meta,
            &galaxy.stage_timings,
            &galaxy.diagnostics,
        );

        let dir = output_dir.clone();
        let write = tokio::spawn(async move {
            let bundle = OutputBundle {
                metadata: &metadata,
                cost_map: &galaxy.cost_map,
                systems: &galaxy.systems,
                routes: &galaxy.routes,
            };
            let written = output::write_all(&dir, &bundle).await;
            (galaxy, metadata, written)
        });

        let (mut galaxy, metadata, written) = match write.await {
            Ok(parts) => parts,
            Err(e) if e.is_panic() => {
                return Err(stage.wrap(GenError::Panicked(panic_message(e.into_panic()))))
            }
            Err(e) => return Err(stage.wrap(GenError::Panicked(e.to_string()))),
        };
        let files_written = written.map_err(|e| stage.wrap(e))?;

        let timing = stage.timing(started);
        log::info!(
            "Stage {} ({}) completed in {:.1} ms",
            stage.number(),
            stage.name(),
            timing.elapsed_ms
        );
        galaxy.stage_timings.push(timing);

        Ok(RunReport {
            galaxy,
            metadata,
            output_dir,
            files_written,
        })
    }

    /// Run one synchronous stage body: timed, logged, errors and panics
    /// wrapped with the stage identity.
    fn run_stage<T>(
        &mut self,
        stage: Stage,
        body: impl FnOnce(&mut GalaxyRng) -> GenResult<T>,
    ) -> GenResult<T> {
        log::info!("Stage {} ({}) started", stage.number(), stage.name());
        let started = Instant::now();

        let rng = &mut self.rng;
        let outcome = panic::catch_unwind(AssertUnwindSafe(|| body(rng)))
            .unwrap_or_else(|payload| Err(GenError::Panicked(panic_message(payload))));

        match outcome {
            Ok(value) => {
                let timing = stage.timing(started);
                log::info!(
                    "Stage {} ({}) completed in {:.1} ms",
                    stage.number(),
                    stage.name(),
                    timing.elapsed_ms
                );
                self.timings.push(timing);
                Ok(value)
            }
            Err(e) => {
                log::error!("Stage {} ({}) failed: {}", stage.number(), stage.name(), e);
                Err(stage.wrap(e))
            }
        }
    }
}

/// Best-effort text of a panic payload.
fn panic_message(payload: Box<dyn Any + Send>) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "stage panicked with a non-string payload".to_string()
    }
}
