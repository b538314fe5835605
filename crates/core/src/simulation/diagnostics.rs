//! Per-tick diagnostics and statistics

use crate::core_types::CellStatus;
use crate::grid::ForestGrid;
use serde::{Deserialize, Serialize};

/// Diagnostics computed at the start of the most recent tick
///
/// Never cached across ticks: every tick recomputes all three values.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Diagnostics {
    /// Box-counting dimension of the burned/unburned mask
    pub fractal_dimension: f32,
    /// Fraction of cells burning, `[0, 1]`
    pub fire_coverage: f32,
    /// Suppressive capacity, `[0, 1]`
    pub controllability: f32,
}

/// Cell counts for client overlays
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct SimulationStats {
    /// Ticks completed since the last reset
    pub tick: u64,
    pub burning: usize,
    pub unburned: usize,
    pub burned_out: usize,
    /// Mean fuel over all cells
    pub mean_fuel: f32,
}

impl SimulationStats {
    pub(crate) fn collect(grid: &ForestGrid, tick: u64) -> Self {
        let mut stats = Self {
            tick,
            mean_fuel: grid.fuel().mean(),
            ..Self::default()
        };
        for &status in grid.status().as_slice() {
            match status {
                CellStatus::Burning => stats.burning += 1,
                CellStatus::Tree => stats.unburned += 1,
                CellStatus::Empty => stats.burned_out += 1,
            }
        }
        stats
    }

    /// Fraction of the landscape burned or burning
    pub fn affected_fraction(&self) -> f32 {
        let total = self.burning + self.unburned + self.burned_out;
        if total == 0 {
            return 0.0;
        }
        (self.burning + self.burned_out) as f32 / total as f32
    }
}
