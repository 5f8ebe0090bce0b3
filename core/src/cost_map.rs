//! Traversal cost surface.
//!
//! Three layers feed the composer, each from its own sub-stream drawn from
//! the shared stream in fixed order: base noise, cellular automata, wall
//! noise. Open cells cost `baseOpenCost + openNoiseWeight·baseNoise`, wall
//! cells `baseWallCost + wallNoiseWeight·wallNoise`. Costs are quantized to
//! one byte per cell against the observed [min, max] range, which is kept
//! so the real cost can be recovered.
//!
//! RULE: the grid covers the star bounding box plus `padding` on every side,
//! so every star lies inside it.

use crate::{
    cellular_automata::{self, WallGrid},
    config::CostMapConfig,
    error::{GenError, GenResult},
    grid::Grid,
    noise_layer::{self, FractalParams},
    rng::GalaxyRng,
    types::Coordinate,
};
use serde::{Deserialize, Serialize};

/// Cells whose quantized cost sits below this fraction of the range are
/// open corridor.
pub const OPEN_CORRIDOR_FRACTION: f64 = 0.25;

/// Refuse grids larger than this many cells.
pub const MAX_GRID_CELLS: usize = 1 << 28;

/// Quantization metadata for interpreting `costmap.bin`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CostMapMeta {
    pub width: usize,
    pub height: usize,
    pub origin_x: i32,
    pub origin_y: i32,
    pub min_cost: f64,
    pub max_cost: f64,
}

/// Immutable quantized cost grid.
#[derive(Debug, Clone, PartialEq)]
pub struct CostMap {
    pub meta: CostMapMeta,
    cells: Vec<u8>,
}

/// Sub-seeds for the three layers, in draw order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LayerSeeds {
    pub base_noise: u32,
    pub cellular_automata: u32,
    pub wall_noise: u32,
}

impl LayerSeeds {
    pub fn draw(rng: &mut GalaxyRng) -> Self {
        let base_noise = rng.next_seed();
        let cellular_automata = rng.next_seed();
        let wall_noise = rng.next_seed();
        Self {
            base_noise,
            cellular_automata,
            wall_noise,
        }
    }
}

/// Grid extent in world coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridBounds {
    pub origin_x: i32,
    pub origin_y: i32,
    pub width: usize,
    pub height: usize,
}

impl GridBounds {
    /// Bounding box of `coords` padded by `padding` on all sides.
    pub fn around(coords: &[Coordinate], padding: u32) -> GenResult<Self> {
        let first = coords
            .first()
            .ok_or_else(|| GenError::InvalidArgument("cannot build a cost map without stars".into()))?;
        let (mut min_x, mut max_x, mut min_y, mut max_y) = (first.x, first.x, first.y, first.y);
        for c in coords {
            min_x = min_x.min(c.x);
            max_x = max_x.max(c.x);
            min_y = min_y.min(c.y);
            max_y = max_y.max(c.y);
        }
        let pad = i64::from(padding);
        let origin_x = i64::from(min_x) - pad;
        let origin_y = i64::from(min_y) - pad;
        let width = (i64::from(max_x) + pad - origin_x + 1) as usize;
        let height = (i64::from(max_y) + pad - origin_y + 1) as usize;
        if width.saturating_mul(height) > MAX_GRID_CELLS {
            return Err(GenError::InvalidArgument(format!(
                "cost map of {width}x{height} cells exceeds the {MAX_GRID_CELLS}-cell limit"
            )));
        }
        let origin_x = i32::try_from(origin_x)
            .map_err(|_| GenError::InvalidArgument("cost map origin out of range".into()))?;
        let origin_y = i32::try_from(origin_y)
            .map_err(|_| GenError::InvalidArgument("cost map origin out of range".into()))?;
        Ok(Self {
            origin_x,
            origin_y,
            width,
            height,
        })
    }
}

/// The three raw layers before composition.
pub struct CostLayers {
    pub base_noise: Grid<f32>,
    pub walls: WallGrid,
    pub wall_noise: Grid<f32>,
}

impl CostLayers {
    pub fn generate(bounds: GridBounds, seeds: LayerSeeds, config: &CostMapConfig) -> Self {
        let base_noise = noise_layer::generate_noise_grid(
            bounds.width,
            bounds.height,
            seeds.base_noise,
            FractalParams {
                frequency: config.base_noise_frequency,
                octaves: config.base_noise_octaves,
            },
        );
        let mut ca_rng = GalaxyRng::new(seeds.cellular_automata);
        let walls = cellular_automata::generate_corridors(
            bounds.width,
            bounds.height,
            config.ca_fill_probability,
            config.ca_iterations,
            &mut ca_rng,
        );
        let wall_noise = noise_layer::generate_noise_grid(
            bounds.width,
            bounds.height,
            seeds.wall_noise,
            FractalParams {
                frequency: config.wall_noise_frequency,
                octaves: config.wall_noise_octaves,
            },
        );
        Self {
            base_noise,
            walls,
            wall_noise,
        }
    }
}

/// Combine the layers into real-valued costs and quantize them.
pub fn compose(bounds: GridBounds, layers: &CostLayers, config: &CostMapConfig) -> CostMap {
    let costs: Vec<f64> = layers
        .walls
        .cells()
        .iter()
        .enumerate()
        .map(|(i, &wall)| {
            if wall {
                config.base_wall_cost + config.wall_noise_weight * f64::from(layers.wall_noise.cells()[i])
            } else {
                config.base_open_cost + config.open_noise_weight * f64::from(layers.base_noise.cells()[i])
            }
        })
        .collect();

    let min_cost = costs.iter().cloned().fold(f64::INFINITY, f64::min);
    let max_cost = costs.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
    let cells = costs
        .iter()
        .map(|&c| quantize(c, min_cost, max_cost))
        .collect();

    CostMap {
        meta: CostMapMeta {
            width: bounds.width,
            height: bounds.height,
            origin_x: bounds.origin_x,
            origin_y: bounds.origin_y,
            min_cost,
            max_cost,
        },
        cells,
    }
}

/// Full stage: bounds, sub-seeds, layers, composition.
pub fn build_cost_map(coords: &[Coordinate], config: &CostMapConfig, rng: &mut GalaxyRng) -> GenResult<CostMap> {
    let seeds = LayerSeeds::draw(rng);
    let bounds = GridBounds::around(coords, config.padding)?;
    log::debug!(
        "Cost map grid {}x{} at origin ({}, {}), layer seeds {:?}",
        bounds.width,
        bounds.height,
        bounds.origin_x,
        bounds.origin_y,
        seeds
    );
    let layers = CostLayers::generate(bounds, seeds, config);
    log::debug!(
        "Corridor layer open fraction {:.3}",
        cellular_automata::open_fraction(&layers.walls)
    );
    Ok(compose(bounds, &layers, config))
}

/// Linear quantization of `cost` into 0..=255 against [min, max].
pub fn quantize(cost: f64, min_cost: f64, max_cost: f64) -> u8 {
    let range = max_cost - min_cost;
    if range <= 0.0 {
        return 0;
    }
    (((cost - min_cost) / range) * 255.0).round().clamp(0.0, 255.0) as u8
}

/// Inverse of `quantize`.
pub fn dequantize(byte: u8, min_cost: f64, max_cost: f64) -> f64 {
    min_cost + (f64::from(byte) / 255.0) * (max_cost - min_cost)
}

pub fn is_open_byte(byte: u8) -> bool {
    f64::from(byte) / 255.0 < OPEN_CORRIDOR_FRACTION
}

impl CostMap {
    pub fn from_parts(meta: CostMapMeta, cells: Vec<u8>) -> Self {
        assert_eq!(cells.len(), meta.width * meta.height, "cell count mismatch");
        Self { meta, cells }
    }

    pub fn width(&self) -> usize {
        self.meta.width
    }

    pub fn height(&self) -> usize {
        self.meta.height
    }

    /// Raw byte grid, row-major. This is `costmap.bin`.
    pub fn bytes(&self) -> &[u8] {
        &self.cells
    }

    /// Grid cell for a world coordinate, if inside the grid.
    pub fn world_to_grid(&self, coord: Coordinate) -> Option<(usize, usize)> {
        let gx = i64::from(coord.x) - i64::from(self.meta.origin_x);
        let gy = i64::from(coord.y) - i64::from(self.meta.origin_y);
        if gx < 0 || gy < 0 || gx >= self.meta.width as i64 || gy >= self.meta.height as i64 {
            return None;
        }
        Some((gx as usize, gy as usize))
    }

    pub fn grid_to_world(&self, gx: usize, gy: usize) -> Coordinate {
        Coordinate::new(
            self.meta.origin_x + gx as i32,
            self.meta.origin_y + gy as i32,
        )
    }

    #[inline]
    pub fn byte_at(&self, gx: usize, gy: usize) -> u8 {
        self.cells[gy * self.meta.width + gx]
    }

    /// Decoded cost at a grid cell.
    #[inline]
    pub fn cost_at(&self, gx: usize, gy: usize) -> f64 {
        dequantize(self.byte_at(gx, gy), self.meta.min_cost, self.meta.max_cost)
    }

    /// Decoded cost at a world coordinate.
    pub fn cost_at_world(&self, coord: Coordinate) -> Option<f64> {
        self.world_to_grid(coord).map(|(gx, gy)| self.cost_at(gx, gy))
    }

    /// Whether the world coordinate lies in an open corridor cell.
    pub fn is_open_corridor(&self, coord: Coordinate) -> bool {
        self.world_to_grid(coord)
            .map(|(gx, gy)| is_open_byte(self.byte_at(gx, gy)))
            .unwrap_or(false)
    }
}
