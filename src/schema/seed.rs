//! Seed types for initializing a grid without an input image.

use rand::prelude::*;
use serde::{Deserialize, Serialize};

/// Byte value of a live cell in the image wire format.
pub const ALIVE_BYTE: u8 = 255;
/// Byte value of a dead cell in the image wire format.
pub const DEAD_BYTE: u8 = 0;

/// Complete seed specification for grid initialization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Seed {
    /// Pattern to use for seeding.
    pub pattern: Pattern,
}

impl Default for Seed {
    fn default() -> Self {
        Self {
            pattern: Pattern::Random {
                density: 0.25,
                seed: 42,
            },
        }
    }
}

/// Predefined patterns for initialization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Pattern {
    /// Standard glider travelling towards +x, +y, top-left corner of its
    /// bounding box at `origin`.
    Glider { origin: (usize, usize) },
    /// Each cell alive with probability `density`.
    Random {
        /// Probability in [0, 1].
        density: f64,
        /// Random seed.
        seed: u64,
    },
    /// Explicit list of live (x, y) cells.
    Cells { cells: Vec<(usize, usize)> },
}

const GLIDER: [(usize, usize); 5] = [(1, 0), (2, 1), (0, 2), (1, 2), (2, 2)];

impl Seed {
    pub fn glider(x: usize, y: usize) -> Self {
        Self {
            pattern: Pattern::Glider { origin: (x, y) },
        }
    }

    pub fn random(density: f64, seed: u64) -> Self {
        Self {
            pattern: Pattern::Random { density, seed },
        }
    }

    /// Generate a row-major image (0 dead, 255 alive) of `width * height` bytes.
    ///
    /// Coordinates outside the grid wrap around.
    pub fn generate(&self, width: usize, height: usize) -> Vec<u8> {
        let mut image = vec![DEAD_BYTE; width * height];
        if image.is_empty() {
            return image;
        }

        match &self.pattern {
            Pattern::Glider { origin } => {
                for &(dx, dy) in &GLIDER {
                    let x = (origin.0 + dx) % width;
                    let y = (origin.1 + dy) % height;
                    image[y * width + x] = ALIVE_BYTE;
                }
            }
            Pattern::Random { density, seed } => {
                let mut rng = StdRng::seed_from_u64(*seed);
                let p = density.clamp(0.0, 1.0);
                for cell in image.iter_mut() {
                    if rng.gen_bool(p) {
                        *cell = ALIVE_BYTE;
                    }
                }
            }
            Pattern::Cells { cells } => {
                for &(x, y) in cells {
                    image[(y % height) * width + (x % width)] = ALIVE_BYTE;
                }
            }
        }

        image
    }
}
