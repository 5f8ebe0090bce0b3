//! Generator configuration.
//!
//! Resolution order (later wins): built-in defaults → JSON config file →
//! CLI flags. The file is deep-merged onto the serialized defaults, so any
//! field it names overrides that one field and nothing else.

use crate::error::{GenError, GenResult};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::path::Path;

pub const DEFAULT_OUTPUT_DIR: &str = "./galaxy-output/";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GalaxyConfig {
    pub center: [f64; 2],
    pub size: [f64; 2],
    pub arms: u32,
    /// Radians of winding between the core and the rim.
    pub spiral_degree: f64,
    /// Galactic-diameter units per star, per arm.
    pub spc_factor: f64,
    /// Arm thickness multiplier.
    pub dyn_size_factor: f64,
    pub max_stars: Option<usize>,
}

impl Default for GalaxyConfig {
    fn default() -> Self {
        Self {
            center: [0.0, 0.0],
            size: [4000.0, 4000.0],
            arms: 4,
            spiral_degree: 5.0,
            spc_factor: 8.0,
            dyn_size_factor: 1.0,
            max_stars: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CostMapConfig {
    pub padding: u32,
    pub base_open_cost: f64,
    pub base_wall_cost: f64,
    pub open_noise_weight: f64,
    pub wall_noise_weight: f64,
    pub base_noise_frequency: f64,
    pub base_noise_octaves: u32,
    pub wall_noise_frequency: f64,
    pub wall_noise_octaves: u32,
    pub ca_fill_probability: f64,
    pub ca_iterations: u32,
}

impl Default for CostMapConfig {
    fn default() -> Self {
        Self {
            padding: 10,
            base_open_cost: 1.0,
            base_wall_cost: 15.0,
            open_noise_weight: 2.0,
            wall_noise_weight: 15.0,
            base_noise_frequency: 0.03,
            base_noise_octaves: 4,
            wall_noise_frequency: 0.05,
            wall_noise_octaves: 3,
            ca_fill_probability: 0.45,
            ca_iterations: 5,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct OikumeneConfig {
    pub core_exclusion_radius: f64,
    /// Carried into metadata; selection clusters through arm scoring alone.
    pub cluster_radius: f64,
    pub target_count: usize,
}

impl Default for OikumeneConfig {
    fn default() -> Self {
        Self {
            core_exclusion_radius: 100.0,
            cluster_radius: 50.0,
            target_count: 250,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RouteConfig {
    pub max_range: f64,
}

impl Default for RouteConfig {
    fn default() -> Self {
        Self { max_range: 40.0 }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GeneratorConfig {
    pub galaxy: GalaxyConfig,
    pub cost_map: CostMapConfig,
    pub oikumene: OikumeneConfig,
    pub route: RouteConfig,
    pub density_radius: f64,
    pub output: String,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            galaxy: GalaxyConfig::default(),
            cost_map: CostMapConfig::default(),
            oikumene: OikumeneConfig::default(),
            route: RouteConfig::default(),
            density_radius: 25.0,
            output: DEFAULT_OUTPUT_DIR.to_string(),
        }
    }
}

/// Values supplied on the command line. `None` leaves the lower layer alone.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConfigOverrides {
    pub output: Option<String>,
    pub arms: Option<u32>,
    pub oikumene_count: Option<usize>,
    pub max_route_range: Option<f64>,
    pub max_stars: Option<usize>,
}

impl GeneratorConfig {
    /// Resolve defaults → optional file → CLI overrides, then validate.
    pub fn resolve(config_path: Option<&Path>, overrides: &ConfigOverrides) -> GenResult<Self> {
        let mut config = match config_path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        config.apply_overrides(overrides);
        config.validate()?;
        Ok(config)
    }

    /// Defaults with the JSON file at `path` merged on top.
    pub fn from_file(path: &Path) -> GenResult<Self> {
        let shown = path.display().to_string();
        let content = std::fs::read_to_string(path).map_err(|e| GenError::ConfigLoad {
            path: shown.clone(),
            reason: format!("cannot read file: {e}"),
        })?;
        let overrides: Value = serde_json::from_str(&content).map_err(|e| GenError::ConfigLoad {
            path: shown.clone(),
            reason: format!("invalid JSON: {e}"),
        })?;
        if !overrides.is_object() {
            return Err(GenError::ConfigLoad {
                path: shown,
                reason: "top-level JSON value must be an object".into(),
            });
        }
        Self::from_json_overrides(&overrides)
    }

    /// Defaults with a JSON object of overrides merged on top.
    pub fn from_json_overrides(overrides: &Value) -> GenResult<Self> {
        let mut merged = serde_json::to_value(Self::default())?;
        merge_json(&mut merged, overrides);
        serde_json::from_value(merged).map_err(|e| GenError::validation("config", e.to_string()))
    }

    pub fn apply_overrides(&mut self, overrides: &ConfigOverrides) {
        if let Some(output) = &overrides.output {
            self.output = output.clone();
        }
        if let Some(arms) = overrides.arms {
            self.galaxy.arms = arms;
        }
        if let Some(count) = overrides.oikumene_count {
            self.oikumene.target_count = count;
        }
        if let Some(range) = overrides.max_route_range {
            self.route.max_range = range;
        }
        if let Some(cap) = overrides.max_stars {
            self.galaxy.max_stars = Some(cap);
        }
    }

    /// Check every resolved value against its documented range.
    pub fn validate(&self) -> GenResult<()> {
        let g = &self.galaxy;
        require_finite("galaxy.center[0]", g.center[0])?;
        require_finite("galaxy.center[1]", g.center[1])?;
        require_positive("galaxy.size[0]", g.size[0])?;
        require_positive("galaxy.size[1]", g.size[1])?;
        if g.arms < 1 {
            return Err(GenError::validation("galaxy.arms", "must be at least 1"));
        }
        require_finite("galaxy.spiralDegree", g.spiral_degree)?;
        require_positive("galaxy.spcFactor", g.spc_factor)?;
        require_positive("galaxy.dynSizeFactor", g.dyn_size_factor)?;
        if g.max_stars == Some(0) {
            return Err(GenError::validation("galaxy.maxStars", "must be at least 1"));
        }

        let c = &self.cost_map;
        require_non_negative("costMap.baseOpenCost", c.base_open_cost)?;
        require_non_negative("costMap.baseWallCost", c.base_wall_cost)?;
        require_non_negative("costMap.openNoiseWeight", c.open_noise_weight)?;
        require_non_negative("costMap.wallNoiseWeight", c.wall_noise_weight)?;
        require_positive("costMap.baseNoiseFrequency", c.base_noise_frequency)?;
        require_positive("costMap.wallNoiseFrequency", c.wall_noise_frequency)?;
        if c.base_noise_octaves < 1 {
            return Err(GenError::validation("costMap.baseNoiseOctaves", "must be at least 1"));
        }
        if c.wall_noise_octaves < 1 {
            return Err(GenError::validation("costMap.wallNoiseOctaves", "must be at least 1"));
        }
        if !(0.0..=1.0).contains(&c.ca_fill_probability) {
            return Err(GenError::validation(
                "costMap.caFillProbability",
                format!("{} is outside [0, 1]", c.ca_fill_probability),
            ));
        }

        require_non_negative("oikumene.coreExclusionRadius", self.oikumene.core_exclusion_radius)?;
        require_positive("oikumene.clusterRadius", self.oikumene.cluster_radius)?;
        require_positive("route.maxRange", self.route.max_range)?;
        require_positive("densityRadius", self.density_radius)?;
        if self.output.trim().is_empty() {
            return Err(GenError::validation("output", "must not be empty"));
        }
        Ok(())
    }
}

/// Recursively overlay `overrides` onto `base`. Objects merge key by key;
/// every other value replaces what was there.
fn merge_json(base: &mut Value, overrides: &Value) {
    match (base, overrides) {
        (Value::Object(base_map), Value::Object(over_map)) => {
            for (key, value) in over_map {
                match base_map.get_mut(key) {
                    Some(slot) => merge_json(slot, value),
                    None => {
                        base_map.insert(key.clone(), value.clone());
                    }
                }
            }
        }
        (slot, value) => *slot = value.clone(),
    }
}

fn require_finite(field: &str, value: f64) -> GenResult<()> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(GenError::validation(field, format!("{value} is not a finite number")))
    }
}

fn require_positive(field: &str, value: f64) -> GenResult<()> {
    require_finite(field, value)?;
    if value > 0.0 {
        Ok(())
    } else {
        Err(GenError::validation(field, format!("{value} must be greater than 0")))
    }
}

fn require_non_negative(field: &str, value: f64) -> GenResult<()> {
    require_finite(field, value)?;
    if value >= 0.0 {
        Ok(())
    } else {
        Err(GenError::validation(field, format!("{value} must not be negative")))
    }
}
