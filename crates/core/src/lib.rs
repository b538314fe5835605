//! Aura Fire Risk Core Library
//!
//! A grid-based stochastic wildfire spread simulation with per-tick risk
//! diagnostics. The landscape is a rectangular grid of cells that are either
//! unburned, burning or burned out. Each tick the fire spreads to neighbouring
//! cells with a probability shaped by wind, humidity, temperature, drought,
//! vegetation type, the fractal complexity of the fire front and an estimate of
//! suppressive capacity.
//!
//! ## Per-Tick Diagnostics
//!
//! - Box-counting fractal dimension of the burned/unburned mask
//! - Fire coverage (fraction of cells burning)
//! - Controllability score in `[0, 1]`
//!
//! ## Example
//!
//! ```rust
//! use aura_core::{FireRiskSimulation, SimulationConfig};
//!
//! let mut sim = FireRiskSimulation::new(SimulationConfig::with_dimensions(32, 32)).unwrap();
//! sim.set_wind(45.0, 0.8).unwrap();
//! sim.select_vegetation("Çalı").unwrap();
//! sim.start();
//! while let Some(diagnostics) = sim.update() {
//!     assert!((0.0..=1.0).contains(&diagnostics.controllability));
//! }
//! assert!(!sim.is_running());
//! ```

// Core types and utilities
pub mod core_types;
pub mod error;

// Grid state and per-tick solvers
pub mod grid;
pub mod solver;

// Simulation controller
pub mod simulation;

// Re-export core types
pub use core_types::{
    CellStatus, EnvironmentParameters, KilometersPerHour, Percent, Rgb, Vec2, VegetationCatalog,
    VegetationType,
};
pub use error::{SimulationError, SimulationErrorCode};

pub use grid::{FieldData, ForestGrid};
pub use solver::{ExecutionMode, FractalDimensionEstimator, SpreadEngine, SpreadParams};

pub use simulation::{
    Diagnostics, FireRiskSimulation, GridPreset, SimulationConfig, SimulationStats,
};
