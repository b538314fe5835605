//! Simulation configuration
//!
//! Everything that shapes a run but is not part of the live environment:
//! grid size, RNG seed, initial humidity/temperature, burn rate and the
//! ignition constant. A config is validated once when the simulation is built
//! and reused verbatim on every reset.

use crate::core_types::VegetationCatalog;
use crate::error::SimulationError;
use crate::grid::{DEFAULT_HUMIDITY_RANGE, DEFAULT_TEMPERATURE};
use crate::solver::{ExecutionMode, BASE_IGNITION_PROBABILITY};
use serde::{Deserialize, Serialize};
use std::ops::Range;

/// Fuel burned per tick by each burning cell.
pub const DEFAULT_BURN_RATE: f32 = 0.1;
/// Seed used when none is given.
pub const DEFAULT_SEED: u64 = 42;

/// Grid size preset
///
/// All presets keep the 16:9 landscape aspect of the standard grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum GridPreset {
    /// 36 × 64 cells, quick previews and tests
    Small,
    /// 144 × 256 cells
    #[default]
    Standard,
    /// 288 × 512 cells
    Large,
}

impl GridPreset {
    /// `(rows, cols)` for this preset
    pub const fn dimensions(&self) -> (usize, usize) {
        match self {
            Self::Small => (36, 64),
            Self::Standard => (144, 256),
            Self::Large => (288, 512),
        }
    }
}

/// Run configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    pub rows: usize,
    pub cols: usize,
    /// Master seed for the humidity draw and per-tick spread streams
    pub seed: u64,
    /// Per-cell initial humidity is drawn uniformly from this range
    pub humidity_range: Range<f32>,
    /// Uniform initial temperature (°C)
    pub initial_temperature: f32,
    /// Fuel removed from each burning cell per tick
    pub burn_rate: f32,
    /// Per-neighbour ignition chance before modifiers
    pub base_ignition_probability: f32,
    pub execution: ExecutionMode,
    /// Catalog key of the vegetation selected at start
    pub initial_vegetation: String,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self::from_preset(GridPreset::Standard)
    }
}

impl SimulationConfig {
    /// Default configuration at the given grid size
    pub fn from_preset(preset: GridPreset) -> Self {
        let (rows, cols) = preset.dimensions();
        Self {
            rows,
            cols,
            seed: DEFAULT_SEED,
            humidity_range: DEFAULT_HUMIDITY_RANGE,
            initial_temperature: DEFAULT_TEMPERATURE,
            burn_rate: DEFAULT_BURN_RATE,
            base_ignition_probability: BASE_IGNITION_PROBABILITY,
            execution: ExecutionMode::default(),
            initial_vegetation: VegetationCatalog::standard()
                .default_type()
                .name
                .to_owned(),
        }
    }

    /// Default configuration with explicit dimensions
    pub fn with_dimensions(rows: usize, cols: usize) -> Self {
        Self {
            rows,
            cols,
            ..Self::default()
        }
    }

    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn execution(mut self, execution: ExecutionMode) -> Self {
        self.execution = execution;
        self
    }

    /// Check every field.
    ///
    /// # Errors
    ///
    /// - [`SimulationError::InvalidParameter`] for zero dimensions, a humidity
    ///   range that is inverted or outside `[0, 1]`, a non-finite temperature,
    ///   a non-positive burn rate, or an ignition probability outside `(0, 1]`
    /// - [`SimulationError::UnknownVegetation`] if `initial_vegetation` is not
    ///   in the catalog
    pub fn validate(&self) -> Result<(), SimulationError> {
        if self.rows == 0 || self.cols == 0 {
            return Err(SimulationError::invalid_parameter(
                "dimensions",
                format!("grid must be at least 1x1, got {}x{}", self.rows, self.cols),
            ));
        }
        let (start, end) = (self.humidity_range.start, self.humidity_range.end);
        if !(start.is_finite() && end.is_finite() && 0.0 <= start && start <= end && end <= 1.0) {
            return Err(SimulationError::invalid_parameter(
                "humidity_range",
                format!("must be an ordered range within [0, 1], got {start}..{end}"),
            ));
        }
        if !self.initial_temperature.is_finite() {
            return Err(SimulationError::non_finite(
                "initial_temperature",
                self.initial_temperature,
            ));
        }
        if !(self.burn_rate.is_finite() && self.burn_rate > 0.0) {
            return Err(SimulationError::invalid_parameter(
                "burn_rate",
                format!("must be finite and positive, got {}", self.burn_rate),
            ));
        }
        let p = self.base_ignition_probability;
        if !(p > 0.0 && p <= 1.0) {
            return Err(SimulationError::invalid_parameter(
                "base_ignition_probability",
                format!("must lie in (0, 1], got {p}"),
            ));
        }
        if VegetationCatalog::standard()
            .get(&self.initial_vegetation)
            .is_none()
        {
            return Err(SimulationError::unknown_vegetation(&self.initial_vegetation));
        }
        Ok(())
    }
}
