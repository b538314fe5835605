//! Per-tick solvers
//!
//! - [`fractal`]: box-counting fractal dimension of the burned/unburned mask
//! - [`controllability`]: suppressive-capacity score from environment and fire state
//! - [`spread`]: stochastic cell-to-cell ignition rule
//!
//! All three are pure with respect to the grid they read. Only the spread
//! engine produces new state, and it writes into a separate buffer that the
//! simulation commits once the whole tick is done.
//!
//! # Example
//!
//! ```rust
//! use aura_core::grid::ForestGrid;
//! use aura_core::solver::{FractalDimensionEstimator, SpreadEngine, SpreadParams};
//! use rand::SeedableRng;
//!
//! let mut rng = rand_chacha::ChaCha8Rng::seed_from_u64(1);
//! let grid = ForestGrid::create(32, 32, &mut rng).unwrap();
//! let fd = FractalDimensionEstimator.estimate_mask(&grid.affected_mask(), 32, 32);
//! let next = SpreadEngine::default().next_status(&grid, &SpreadParams::default(), 7);
//! assert_eq!(fd, 0.0);
//! assert_eq!(next.rows(), 32);
//! ```

pub mod controllability;
pub mod fractal;
pub mod spread;

// Re-exports
pub use controllability::{
    breakdown as controllability_breakdown, control_effectiveness, score as controllability_score,
    ControllabilityBreakdown, ControllabilityInputs,
};
pub use fractal::FractalDimensionEstimator;
pub use spread::{
    fractal_factor, ignition_probability, ExecutionMode, SpreadEngine, SpreadParams,
    BASE_IGNITION_PROBABILITY,
};
