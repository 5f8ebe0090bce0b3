//! Fractal (multi-octave) gradient noise layers for the cost map.

use crate::grid::Grid;
use noise::{NoiseFn, Perlin};

const PERSISTENCE: f64 = 0.5;
const LACUNARITY: f64 = 2.0;

/// Parameters for one fBm layer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FractalParams {
    /// Base frequency in cycles per grid cell (lower = larger features).
    pub frequency: f64,
    pub octaves: u32,
}

/// Seeded fBm sampler. Output is normalized to [0, 1].
pub struct FractalNoise {
    perlin: Perlin,
    params: FractalParams,
}

impl FractalNoise {
    pub fn new(seed: u32, params: FractalParams) -> Self {
        Self {
            perlin: Perlin::new(seed),
            params,
        }
    }

    pub fn sample(&self, x: f64, y: f64) -> f64 {
        let mut total = 0.0;
        let mut amplitude = 1.0;
        let mut frequency = self.params.frequency;
        let mut amplitude_sum = 0.0;

        for _ in 0..self.params.octaves {
            total += amplitude * self.perlin.get([x * frequency, y * frequency]);
            amplitude_sum += amplitude;
            amplitude *= PERSISTENCE;
            frequency *= LACUNARITY;
        }

        if amplitude_sum == 0.0 {
            return 0.5;
        }
        ((total / amplitude_sum + 1.0) / 2.0).clamp(0.0, 1.0)
    }
}

/// Evaluate a layer over every cell of a `width × height` grid.
pub fn generate_noise_grid(width: usize, height: usize, seed: u32, params: FractalParams) -> Grid<f32> {
    let noise = FractalNoise::new(seed, params);
    Grid::from_fn(width, height, |x, y| noise.sample(x as f64, y as f64) as f32)
}
