//! Box-counting fractal dimension
//!
//! Estimates the spatial complexity of the burned/unburned boundary. The mask
//! is covered with non-overlapping `s × s` boxes for `s = 2, 4, 8, …` and the
//! number of boxes touching at least one set cell is counted per scale. The
//! dimension is minus the least-squares slope of `ln count` against `ln s`.
//!
//! Box sizes are `2^e` for `e = 1 .. floor(log2(min(rows, cols)))`, upper bound
//! exclusive, so a 144 × 256 grid is measured at 2 through 64. Boxes along the
//! bottom and right edges are truncated but still counted. Scales whose count
//! is zero have no defined logarithm and are dropped.
//!
//! Each scale is derived from the previous one by a 2 × 2 OR-reduction, which
//! keeps the whole estimate at `O(rows · cols)` instead of rescanning the mask
//! once per box size.

use crate::error::SimulationError;
use tracing::debug;

/// Threshold used when the input is already a 0/1 mask.
pub const DEFAULT_THRESHOLD: f32 = 0.5;

/// Box-counting fractal dimension estimator
#[derive(Debug, Clone, Copy, Default)]
pub struct FractalDimensionEstimator;

impl FractalDimensionEstimator {
    /// Box sizes measured for a `rows × cols` grid.
    pub fn box_sizes(rows: usize, cols: usize) -> Vec<usize> {
        let min_dim = rows.min(cols);
        if min_dim < 2 {
            return Vec::new();
        }
        (1..min_dim.ilog2()).map(|e| 1_usize << e).collect()
    }

    /// Occupied box count per measured box size, in increasing size order.
    ///
    /// # Panics
    ///
    /// Panics if `mask.len() != rows * cols`.
    pub fn box_counts(mask: &[bool], rows: usize, cols: usize) -> Vec<(usize, usize)> {
        assert_eq!(mask.len(), rows * cols, "mask does not match grid shape");
        let sizes = Self::box_sizes(rows, cols);
        let mut counts = Vec::with_capacity(sizes.len());

        // Level 0 is the mask itself; level k holds one flag per 2^k box.
        let mut level = mask.to_vec();
        let (mut level_rows, mut level_cols) = (rows, cols);
        for &size in &sizes {
            let (next, next_rows, next_cols) = reduce_2x2(&level, level_rows, level_cols);
            counts.push((size, next.iter().filter(|&&b| b).count()));
            level = next;
            level_rows = next_rows;
            level_cols = next_cols;
        }
        counts
    }

    /// Estimate over a boolean mask, surfacing degenerate inputs as errors.
    ///
    /// # Errors
    ///
    /// Returns [`SimulationError::DegenerateEstimate`] if fewer than two box
    /// sizes produce a non-zero count.
    pub fn try_estimate_mask(
        &self,
        mask: &[bool],
        rows: usize,
        cols: usize,
    ) -> Result<f32, SimulationError> {
        let points: Vec<(f64, f64)> = Self::box_counts(mask, rows, cols)
            .into_iter()
            .filter(|&(_, count)| count > 0)
            .map(|(size, count)| ((size as f64).ln(), (count as f64).ln()))
            .collect();

        if points.len() < 2 {
            return Err(SimulationError::DegenerateEstimate {
                usable_scales: points.len(),
            });
        }
        Ok((-least_squares_slope(&points)) as f32)
    }

    /// Estimate over a boolean mask. Degenerate inputs yield `0.0`.
    pub fn estimate_mask(&self, mask: &[bool], rows: usize, cols: usize) -> f32 {
        match self.try_estimate_mask(mask, rows, cols) {
            Ok(fd) => fd,
            Err(err) => {
                debug!(target: "solver::fractal", rows, cols, "{err}, using 0.0");
                0.0
            }
        }
    }

    /// Estimate over a real-valued matrix, treating `value > threshold` as set.
    ///
    /// # Errors
    ///
    /// Returns [`SimulationError::DegenerateEstimate`] as for
    /// [`try_estimate_mask`](Self::try_estimate_mask).
    pub fn try_estimate(
        &self,
        values: &[f32],
        rows: usize,
        cols: usize,
        threshold: f32,
    ) -> Result<f32, SimulationError> {
        let mask = threshold_mask(values, threshold);
        self.try_estimate_mask(&mask, rows, cols)
    }

    /// Estimate over a real-valued matrix. Degenerate inputs yield `0.0`.
    pub fn estimate(&self, values: &[f32], rows: usize, cols: usize, threshold: f32) -> f32 {
        let mask = threshold_mask(values, threshold);
        self.estimate_mask(&mask, rows, cols)
    }
}

fn threshold_mask(values: &[f32], threshold: f32) -> Vec<bool> {
    values.iter().map(|&v| v > threshold).collect()
}

/// OR together each 2 × 2 block; odd trailing rows/columns form truncated blocks.
fn reduce_2x2(level: &[bool], rows: usize, cols: usize) -> (Vec<bool>, usize, usize) {
    let next_rows = rows.div_ceil(2);
    let next_cols = cols.div_ceil(2);
    let mut next = vec![false; next_rows * next_cols];
    for row in 0..rows {
        let src = &level[row * cols..(row + 1) * cols];
        let dst = &mut next[(row / 2) * next_cols..(row / 2 + 1) * next_cols];
        for (col, &set) in src.iter().enumerate() {
            if set {
                dst[col / 2] = true;
            }
        }
    }
    (next, next_rows, next_cols)
}

/// Slope of the ordinary least-squares line through `points`.
fn least_squares_slope(points: &[(f64, f64)]) -> f64 {
    let n = points.len() as f64;
    let (sum_x, sum_y) = points
        .iter()
        .fold((0.0, 0.0), |(sx, sy), &(x, y)| (sx + x, sy + y));
    let mean_x = sum_x / n;
    let mean_y = sum_y / n;
    let (cov, var) = points.iter().fold((0.0, 0.0), |(c, v), &(x, y)| {
        let dx = x - mean_x;
        (c + dx * (y - mean_y), v + dx * dx)
    });
    cov / var
}
