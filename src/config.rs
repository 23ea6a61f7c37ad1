//! Configuration types for the exploration grid.
//!
//! `GridConfig` is fixed at construction time and controls the grid
//! resolution, the reveal footprint, and the chunk index granularity.
//! It is designed to be easily serializable and loadable from JSON.

use serde::de::Error;
use serde::{Deserialize, Serialize};

/// Smallest allowed chunk edge length, in fine cells.
pub const MIN_CHUNK_SIZE_CELLS: u32 = 32;

/// Exploration grid configuration.
///
/// All values are fixed when the grid is constructed; changing the cell size
/// of an existing persisted grid would reinterpret every stored key.
///
/// # Example
///
/// ```rust
/// use fogmap::GridConfig;
///
/// // Create default config
/// let config = GridConfig::default();
/// assert_eq!(config.base_cell_meters, 10.0);
///
/// // Load from JSON; missing fields fall back to defaults
/// let config = GridConfig::from_json(r#"{ "reveal_radius_meters": 30.0 }"#).unwrap();
/// assert_eq!(config.reveal_radius_meters, 30.0);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GridConfig {
    /// Edge length of a fine cell in projected meters (finest resolution).
    #[serde(default = "GridConfig::default_base_cell_meters")]
    pub base_cell_meters: f64,

    /// Radius revealed around each accepted GPS fix, in meters.
    #[serde(default = "GridConfig::default_reveal_radius_meters")]
    pub reveal_radius_meters: f64,

    /// Chunk edge length in fine cells. Clamped to a minimum of
    /// [`MIN_CHUNK_SIZE_CELLS`] and rounded up to the next power of two so
    /// chunk derivation is a shift.
    #[serde(default = "GridConfig::default_chunk_size_cells")]
    pub chunk_size_cells: u32,

    /// Minimum movement between accepted reveals, in meters. Fixes closer
    /// than this to the previous accepted fix are dropped.
    #[serde(default = "GridConfig::default_min_move_meters")]
    pub min_move_meters: f64,
}

impl GridConfig {
    const fn default_base_cell_meters() -> f64 {
        10.0
    }

    const fn default_reveal_radius_meters() -> f64 {
        20.0
    }

    const fn default_chunk_size_cells() -> u32 {
        128
    }

    const fn default_min_move_meters() -> f64 {
        6.0
    }

    pub fn with_base_cell_meters(mut self, meters: f64) -> Self {
        self.base_cell_meters = meters;
        self
    }

    pub fn with_reveal_radius_meters(mut self, meters: f64) -> Self {
        self.reveal_radius_meters = meters;
        self
    }

    pub fn with_chunk_size_cells(mut self, cells: u32) -> Self {
        self.chunk_size_cells = cells;
        self
    }

    pub fn with_min_move_meters(mut self, meters: f64) -> Self {
        self.min_move_meters = meters;
        self
    }

    /// Effective chunk edge length: clamped and rounded up to a power of two.
    pub fn resolved_chunk_size(&self) -> u32 {
        self.chunk_size_cells
            .max(MIN_CHUNK_SIZE_CELLS)
            .next_power_of_two()
    }

    /// Shift that maps a cell coordinate to its chunk coordinate.
    pub fn chunk_shift(&self) -> u32 {
        self.resolved_chunk_size().trailing_zeros()
    }

    /// Validate configuration values.
    pub fn validate(&self) -> Result<(), String> {
        if !self.base_cell_meters.is_finite() || self.base_cell_meters <= 0.0 {
            return Err("Base cell size must be a positive number of meters".to_string());
        }

        if !self.reveal_radius_meters.is_finite() || self.reveal_radius_meters <= 0.0 {
            return Err("Reveal radius must be a positive number of meters".to_string());
        }

        if !self.min_move_meters.is_finite() || self.min_move_meters < 0.0 {
            return Err("Minimum move distance must be zero or a positive number".to_string());
        }

        if self.chunk_size_cells == 0 {
            return Err("Chunk size must be greater than zero".to_string());
        }

        Ok(())
    }

    /// Load configuration from JSON string.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let config: GridConfig = serde_json::from_str(json)?;
        if let Err(e) = config.validate() {
            return Err(Error::custom(e));
        }
        Ok(config)
    }

    /// Save configuration as JSON string.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            base_cell_meters: Self::default_base_cell_meters(),
            reveal_radius_meters: Self::default_reveal_radius_meters(),
            chunk_size_cells: Self::default_chunk_size_cells(),
            min_move_meters: Self::default_min_move_meters(),
        }
    }
}

/// Options for display queries.
///
/// Pass `None` to [`crate::ExplorationGrid::display_cells`] to use defaults.
#[derive(Debug, Clone, PartialEq)]
pub struct DisplayOptions {
    /// Desired on-screen edge length of a displayed cell, in screen points.
    /// Together with the camera scale this picks the aggregation level.
    pub target_cell_pixels: f64,

    /// Outward expansion of the query rectangle on each side, in meters.
    /// Hides cell pop-in at the viewport edge while panning.
    pub extra_meters: f64,
}

impl DisplayOptions {
    pub fn with_target_cell_pixels(mut self, pixels: f64) -> Self {
        self.target_cell_pixels = pixels;
        self
    }

    pub fn with_extra_meters(mut self, meters: f64) -> Self {
        self.extra_meters = meters;
        self
    }
}

impl Default for DisplayOptions {
    fn default() -> Self {
        Self {
            target_cell_pixels: 22.0,
            extra_meters: 250.0,
        }
    }
}
