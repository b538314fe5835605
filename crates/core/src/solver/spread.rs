//! Stochastic cell-to-cell spread rule
//!
//! Each unburned cell with fuel looks at its in-bounds 8-neighbourhood in the
//! previous tick's snapshot. Every burning neighbour pushes towards ignition
//! with a weight set by how the wind lines up with that neighbour, and the
//! combined push is turned into an ignition probability scaled by the cell's
//! fuel, humidity and temperature and by the grid-wide modifiers.
//!
//! # Wind alignment
//!
//! For a neighbour at row/column offset `(dr, dc)` the alignment vector is the
//! offset rotated by 90°, `(-dc, dr)`, normalised. The wind unit vector is
//! projected onto that, not onto the raw offset. This is the adjacency-to-wind
//! mapping the model was calibrated with and is kept as is.
//!
//! # Randomness
//!
//! Row `r` draws from `ChaCha8Rng::seed_from_u64(tick_seed)` on stream `r`,
//! one value per column. A cell's draw depends only on `(tick_seed, row, col)`,
//! so parallel and sequential execution give identical grids.

use crate::core_types::{CellStatus, Vec2};
use crate::grid::{FieldData, ForestGrid, GridSnapshot};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

/// Per-neighbour ignition chance in calm, neutral conditions.
pub const BASE_IGNITION_PROBABILITY: f32 = 0.3;
/// Smallest contribution a burning neighbour can make, however strong the headwind.
const MIN_NEIGHBOUR_WEIGHT: f32 = 0.01;
/// Fraction of a neighbour's push removed by a direct headwind.
const HEADWIND_DAMPING: f32 = 0.98;
/// Suppression gain applied to control effectiveness.
const SUPPRESSION_GAIN: f32 = 0.7;
/// Suppression ceiling.
const MAX_SUPPRESSION: f32 = 0.95;

/// Moore neighbourhood offsets as `(row, col)`.
const NEIGHBOUR_OFFSETS: [(isize, isize); 8] = [
    (-1, -1),
    (-1, 0),
    (-1, 1),
    (0, -1),
    (0, 1),
    (1, -1),
    (1, 0),
    (1, 1),
];

/// How the per-cell loop is scheduled
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ExecutionMode {
    /// Rows are processed on the rayon thread pool
    #[default]
    Parallel,
    /// Rows are processed in order on the calling thread
    Sequential,
}

/// Grid-wide inputs to one spread step
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpreadParams {
    /// Unit vector the wind blows toward
    pub wind_unit: Vec2,
    pub wind_strength: f32,
    pub drought_level: f32,
    /// Selected vegetation's multiplier
    pub spread_factor: f32,
    /// See [`fractal_factor`]
    pub fractal_factor: f32,
    /// `controllability^1.5`; zero disables suppression
    pub control_effectiveness: f32,
    pub base_probability: f32,
}

impl Default for SpreadParams {
    /// Calm, neutral conditions with no suppression.
    fn default() -> Self {
        Self {
            wind_unit: Vec2::new(1.0, 0.0),
            wind_strength: 0.0,
            drought_level: 0.0,
            spread_factor: 1.0,
            fractal_factor: 1.0,
            control_effectiveness: 0.0,
            base_probability: BASE_IGNITION_PROBABILITY,
        }
    }
}

/// Ignition multiplier derived from the fractal dimension, `[0.5, 2.0]`.
pub fn fractal_factor(fractal_dimension: f32) -> f32 {
    (1.0 + (fractal_dimension - 1.0) * 0.4).clamp(0.5, 2.0)
}

/// Contribution of one burning neighbour at offset `(dr, dc)`.
#[inline]
pub fn neighbour_weight(dr: isize, dc: isize, wind_unit: Vec2, wind_strength: f32) -> f32 {
    let perpendicular = Vec2::new(-(dc as f32), dr as f32);
    let norm = perpendicular.norm();
    if norm == 0.0 {
        return 0.0;
    }
    let dot = wind_unit.dot(&(perpendicular / norm));
    let alignment = dot.max(0.0);
    let opposite = (-dot).max(0.0);
    let effect = (1.0 + wind_strength * alignment) * (1.0 - HEADWIND_DAMPING * opposite);
    effect.max(MIN_NEIGHBOUR_WEIGHT)
}

/// Summed weight of burning neighbours around `(row, col)`, or `None` if none burn.
pub fn burning_neighbour_weight(
    snapshot: &GridSnapshot<'_>,
    row: usize,
    col: usize,
    wind_unit: Vec2,
    wind_strength: f32,
) -> Option<f32> {
    let mut weight = 0.0;
    let mut any = false;
    for &(dr, dc) in &NEIGHBOUR_OFFSETS {
        let (Some(nr), Some(nc)) = (row.checked_add_signed(dr), col.checked_add_signed(dc)) else {
            continue;
        };
        if nr >= snapshot.rows || nc >= snapshot.cols {
            continue;
        }
        if snapshot.status[nr * snapshot.cols + nc] == CellStatus::Burning {
            weight += neighbour_weight(dr, dc, wind_unit, wind_strength);
            any = true;
        }
    }
    any.then_some(weight)
}

/// Ignition probability for a cell with the given neighbour weight and local state.
pub fn ignition_probability(
    neighbour_weight: f32,
    fuel: f32,
    humidity: f32,
    temperature: f32,
    params: &SpreadParams,
) -> f32 {
    let neighbour_term = 1.0 - (1.0 - params.base_probability).powf(neighbour_weight);
    let humidity_factor = 1.0 - 0.5 * humidity;
    let temperature_factor = 1.0 + (temperature - 20.0) / 50.0;

    let mut prob = neighbour_term * fuel * humidity_factor * temperature_factor;
    prob *= params.fractal_factor * params.spread_factor;
    prob *= 1.0 + params.drought_level;
    if params.control_effectiveness > 0.0 {
        let suppression =
            (params.control_effectiveness * SUPPRESSION_GAIN).clamp(0.0, MAX_SUPPRESSION);
        prob *= 1.0 - suppression;
    }
    prob.clamp(0.0, 1.0)
}

/// Advances cell status by one tick
#[derive(Debug, Clone, Copy, Default)]
pub struct SpreadEngine {
    mode: ExecutionMode,
}

impl SpreadEngine {
    pub fn new(mode: ExecutionMode) -> Self {
        Self { mode }
    }

    pub fn mode(&self) -> ExecutionMode {
        self.mode
    }

    /// Write the next status of every cell into `out`.
    ///
    /// `snapshot` is never modified. `out` must have one entry per cell.
    ///
    /// # Panics
    ///
    /// Panics if `out.len()` differs from the snapshot's cell count.
    pub fn step_into(
        &self,
        snapshot: &GridSnapshot<'_>,
        params: &SpreadParams,
        tick_seed: u64,
        out: &mut [CellStatus],
    ) {
        assert_eq!(
            out.len(),
            snapshot.rows * snapshot.cols,
            "output buffer does not match grid shape"
        );
        let cols = snapshot.cols;
        match self.mode {
            ExecutionMode::Parallel => out
                .par_chunks_mut(cols)
                .enumerate()
                .for_each(|(row, out_row)| step_row(snapshot, params, tick_seed, row, out_row)),
            ExecutionMode::Sequential => out
                .chunks_mut(cols)
                .enumerate()
                .for_each(|(row, out_row)| step_row(snapshot, params, tick_seed, row, out_row)),
        }
    }

    /// Compute the next status field for `grid` without modifying it.
    pub fn next_status(
        &self,
        grid: &ForestGrid,
        params: &SpreadParams,
        tick_seed: u64,
    ) -> FieldData<CellStatus> {
        let mut out = FieldData::with_value(grid.rows(), grid.cols(), CellStatus::Tree);
        self.step_into(&grid.snapshot(), params, tick_seed, out.as_mut_slice());
        out
    }
}

/// Random source for one row of one tick.
fn row_rng(tick_seed: u64, row: usize) -> ChaCha8Rng {
    let mut rng = ChaCha8Rng::seed_from_u64(tick_seed);
    rng.set_stream(row as u64);
    rng
}

fn step_row(
    snapshot: &GridSnapshot<'_>,
    params: &SpreadParams,
    tick_seed: u64,
    row: usize,
    out_row: &mut [CellStatus],
) {
    let mut rng = row_rng(tick_seed, row);
    let base = row * snapshot.cols;
    for (col, next) in out_row.iter_mut().enumerate() {
        // Drawn for every column so each cell keeps a fixed slot in the stream
        let draw: f32 = rng.random();
        let idx = base + col;
        let current = snapshot.status[idx];
        *next = current;

        if current != CellStatus::Tree || snapshot.fuel[idx] <= 0.0 {
            continue;
        }
        let Some(weight) =
            burning_neighbour_weight(snapshot, row, col, params.wind_unit, params.wind_strength)
        else {
            continue;
        };
        let prob = ignition_probability(
            weight,
            snapshot.fuel[idx],
            snapshot.humidity[idx],
            snapshot.temperature[idx],
            params,
        );
        if draw < prob {
            *next = CellStatus::Burning;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core_types::vec2::unit_from_degrees;
    use approx::assert_abs_diff_eq;

    fn grid_with(rows: usize, cols: usize, burning: &[(usize, usize)]) -> ForestGrid {
        let mut status = FieldData::with_value(rows, cols, CellStatus::Tree);
        for &(r, c) in burning {
            status.set(r, c, CellStatus::Burning);
        }
        ForestGrid::from_fields(
            status,
            FieldData::with_value(rows, cols, 1.0),
            FieldData::with_value(rows, cols, 0.0),
            FieldData::with_value(rows, cols, 20.0),
        )
        .unwrap()
    }

    #[test]
    fn test_fractal_factor_bounds() {
        assert_abs_diff_eq!(fractal_factor(1.0), 1.0);
        assert_abs_diff_eq!(fractal_factor(0.0), 0.6, epsilon = 1e-6);
        assert_abs_diff_eq!(fractal_factor(2.0), 1.4, epsilon = 1e-6);
        assert_eq!(fractal_factor(-5.0), 0.5);
        assert_eq!(fractal_factor(10.0), 2.0);
    }

    #[test]
    fn test_calm_wind_only_damps_headwind() {
        let wind = unit_from_degrees(37.0);
        for &(dr, dc) in &NEIGHBOUR_OFFSETS {
            let perpendicular = Vec2::new(-(dc as f32), dr as f32).normalize();
            let weight = neighbour_weight(dr, dc, wind, 0.0);
            if wind.dot(&perpendicular) >= 0.0 {
                assert_abs_diff_eq!(weight, 1.0, epsilon = 1e-6);
            } else {
                assert!(weight < 1.0, "offset ({dr}, {dc}) should be damped");
            }
        }
    }

    #[test]
    fn test_neighbour_weight_uses_rotated_offset() {
        // Wind toward east (1, 0). The neighbour at (dr, dc) = (1, 0) rotates to
        // (0, 1): perpendicular to the wind, so neither boost nor damping.
        let east = Vec2::new(1.0, 0.0);
        assert_abs_diff_eq!(neighbour_weight(1, 0, east, 2.0), 1.0, epsilon = 1e-6);
        // (0, -1) rotates to (1, 0): fully aligned with the wind.
        assert_abs_diff_eq!(neighbour_weight(0, -1, east, 2.0), 3.0, epsilon = 1e-6);
        // (0, 1) rotates to (-1, 0): direct headwind, floored at 0.01 after damping.
        assert_abs_diff_eq!(neighbour_weight(0, 1, east, 2.0), 0.02, epsilon = 1e-6);
    }

    #[test]
    fn test_neighbour_weight_floor() {
        let east = Vec2::new(1.0, 0.0);
        // Headwind leaves 1 - 0.98 = 0.02 regardless of strength; the floor
        // only bites if something drives the product lower.
        assert!(neighbour_weight(0, 1, east, 0.0) >= MIN_NEIGHBOUR_WEIGHT);
        assert_eq!(neighbour_weight(0, 0, east, 1.0), 0.0);
    }

    #[test]
    fn test_corner_cell_scans_only_existing_neighbours() {
        let grid = grid_with(3, 3, &[(0, 1), (1, 0), (1, 1)]);
        let snapshot = grid.snapshot();
        let weight = burning_neighbour_weight(&snapshot, 0, 0, Vec2::new(1.0, 0.0), 0.0);
        // Three in-bounds burning neighbours; calm wind damps headwind ones.
        assert!(weight.is_some());

        let opposite = burning_neighbour_weight(&snapshot, 2, 2, Vec2::new(1.0, 0.0), 0.0);
        assert!(opposite.is_some(), "(1, 1) is diagonal to (2, 2)");

        let lonely = grid_with(3, 3, &[(0, 0)]);
        assert_eq!(
            burning_neighbour_weight(&lonely.snapshot(), 2, 2, Vec2::new(1.0, 0.0), 0.0),
            None
        );
    }

    #[test]
    fn test_ignition_probability_formula() {
        let params = SpreadParams {
            spread_factor: 0.7,
            fractal_factor: 0.6,
            ..SpreadParams::default()
        };
        let prob = ignition_probability(1.0, 1.0, 0.25, 25.0, &params);
        let expected = 0.3 * 0.875 * 1.1 * 0.6 * 0.7;
        assert_abs_diff_eq!(prob, expected, epsilon = 1e-6);
    }

    #[test]
    fn test_suppression_reduces_probability() {
        let free = SpreadParams::default();
        let suppressed = SpreadParams {
            control_effectiveness: 0.5,
            ..free
        };
        let p_free = ignition_probability(2.0, 1.0, 0.2, 25.0, &free);
        let p_suppressed = ignition_probability(2.0, 1.0, 0.2, 25.0, &suppressed);
        assert_abs_diff_eq!(p_suppressed, p_free * 0.65, epsilon = 1e-6);

        // Suppression is capped at 95%
        let maxed = SpreadParams {
            control_effectiveness: 10.0,
            ..free
        };
        let p_maxed = ignition_probability(2.0, 1.0, 0.2, 25.0, &maxed);
        assert_abs_diff_eq!(p_maxed, p_free * 0.05, epsilon = 1e-6);
    }

    #[test]
    fn test_probability_clamped() {
        let params = SpreadParams {
            spread_factor: 1.6,
            fractal_factor: 2.0,
            drought_level: 1.0,
            ..SpreadParams::default()
        };
        assert_eq!(ignition_probability(8.0, 1.0, 0.0, 60.0, &params), 1.0);
        // Extreme cold drives the temperature factor negative
        assert_eq!(ignition_probability(1.0, 1.0, 0.0, -100.0, &params), 0.0);
    }

    #[test]
    fn test_higher_spread_factor_raises_probability() {
        let slow = SpreadParams {
            spread_factor: 0.5,
            ..SpreadParams::default()
        };
        let fast = SpreadParams {
            spread_factor: 1.2,
            ..slow
        };
        assert!(
            ignition_probability(1.0, 1.0, 0.3, 25.0, &fast)
                > ignition_probability(1.0, 1.0, 0.3, 25.0, &slow)
        );
    }

    #[test]
    fn test_only_trees_next_to_fire_ignite() {
        let grid = grid_with(9, 9, &[(4, 4)]);
        let params = SpreadParams {
            spread_factor: 1.6,
            fractal_factor: 2.0,
            drought_level: 1.0,
            ..SpreadParams::default()
        };
        let next = SpreadEngine::default().next_status(&grid, &params, 11);
        assert_eq!(next.get(4, 4), CellStatus::Burning);
        for r in 0..9_usize {
            for c in 0..9_usize {
                if r.abs_diff(4) > 1 || c.abs_diff(4) > 1 {
                    assert_eq!(next.get(r, c), CellStatus::Tree, "cell ({r}, {c})");
                }
            }
        }
        // Neighbours not facing the eastward wind keep full weight and saturate
        for (r, c) in [(3, 4), (5, 4), (3, 5), (4, 5), (5, 5)] {
            assert_eq!(next.get(r, c), CellStatus::Burning, "cell ({r}, {c})");
        }
    }

    #[test]
    fn test_empty_and_burning_cells_unchanged() {
        let mut status = FieldData::with_value(3, 3, CellStatus::Burning);
        status.set(0, 0, CellStatus::Empty);
        let mut fuel = FieldData::with_value(3, 3, 1.0);
        fuel.set(0, 0, 0.0);
        let grid = ForestGrid::from_fields(
            status,
            fuel,
            FieldData::with_value(3, 3, 0.0),
            FieldData::with_value(3, 3, 20.0),
        )
        .unwrap();
        let next = SpreadEngine::default().next_status(&grid, &SpreadParams::default(), 3);
        assert_eq!(next.as_slice(), grid.status().as_slice());
    }

    #[test]
    fn test_parallel_matches_sequential() {
        let burning: Vec<_> = (0..40).map(|i| (i % 31 + 3, (i * 7) % 45 + 2)).collect();
        let grid = grid_with(37, 50, &burning);
        let params = SpreadParams {
            wind_unit: unit_from_degrees(135.0),
            wind_strength: 1.2,
            spread_factor: 0.9,
            ..SpreadParams::default()
        };
        for seed in [0, 1, 99, u64::MAX] {
            let par = SpreadEngine::new(ExecutionMode::Parallel).next_status(&grid, &params, seed);
            let seq =
                SpreadEngine::new(ExecutionMode::Sequential).next_status(&grid, &params, seed);
            assert_eq!(par, seq, "seed {seed}");
        }
    }

    #[test]
    fn test_seeded_step_is_reproducible() {
        let grid = grid_with(10, 10, &[(5, 5)]);
        let engine = SpreadEngine::default();
        let a = engine.next_status(&grid, &SpreadParams::default(), 42);
        let b = engine.next_status(&grid, &SpreadParams::default(), 42);
        assert_eq!(a, b);
    }
}
