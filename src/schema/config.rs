//! Run parameters for a Game of Life distribution run.

use std::time::Duration;

use serde::{Deserialize, Serialize};

fn default_tick_interval_ms() -> u64 {
    2000
}

fn default_emit_cell_flips() -> bool {
    true
}

/// Top-level run configuration.
///
/// Immutable for the lifetime of a run. Height does not need to be a multiple
/// of `threads`; remainder rows go one at a time to the first bands.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Params {
    /// Total generations to execute.
    pub turns: usize,
    /// Worker count (one band per worker).
    pub threads: usize,
    /// Grid width in cells.
    pub image_width: usize,
    /// Grid height in cells.
    pub image_height: usize,
    /// Interval between live population reports.
    #[serde(default = "default_tick_interval_ms")]
    pub tick_interval_ms: u64,
    /// Emit a `CellFlipped` event for every cell that changes state.
    #[serde(default = "default_emit_cell_flips")]
    pub emit_cell_flips: bool,
}

impl Default for Params {
    fn default() -> Self {
        Self {
            turns: 100,
            threads: 8,
            image_width: 512,
            image_height: 512,
            tick_interval_ms: default_tick_interval_ms(),
            emit_cell_flips: default_emit_cell_flips(),
        }
    }
}

impl Params {
    /// Identifier of the image the run is seeded from.
    pub fn input_name(&self) -> String {
        format!("{}x{}", self.image_width, self.image_height)
    }

    /// Identifier of an image written after `turns` completed generations.
    pub fn output_name(&self, turns: usize) -> String {
        format!("{}x{}x{}", self.image_width, self.image_height, turns)
    }

    /// Ticker period as a `Duration`.
    #[inline]
    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms)
    }

    /// Validate configuration parameters.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.image_width == 0 || self.image_height == 0 {
            return Err(ConfigError::InvalidDimensions);
        }
        if self.image_width.checked_mul(self.image_height).is_none() {
            return Err(ConfigError::DimensionsTooLarge {
                width: self.image_width,
                height: self.image_height,
            });
        }
        if self.threads == 0 {
            return Err(ConfigError::InvalidThreads);
        }
        if self.threads > self.image_height {
            return Err(ConfigError::TooManyThreads {
                threads: self.threads,
                height: self.image_height,
            });
        }
        if self.tick_interval_ms == 0 {
            return Err(ConfigError::InvalidTickInterval);
        }
        Ok(())
    }
}

/// Configuration validation errors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("Image dimensions (width, height) must be non-zero")]
    InvalidDimensions,
    #[error("Image of {width}x{height} cells does not fit in memory")]
    DimensionsTooLarge { width: usize, height: usize },
    #[error("Thread count must be at least 1")]
    InvalidThreads,
    #[error("{threads} threads would leave empty bands in a grid of height {height}")]
    TooManyThreads { threads: usize, height: usize },
    #[error("Tick interval must be non-zero")]
    InvalidTickInterval,
}
