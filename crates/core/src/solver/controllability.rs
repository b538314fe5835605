//! Controllability scoring
//!
//! Combines grid-averaged environment, vegetation, pattern complexity and fire
//! coverage into one suppressive-capacity score in `[0, 1]`. Higher humidity,
//! lower wind, less fuel, moderate temperature, low drought and slow-spreading
//! vegetation raise the score. Boundary complexity and coverage pull it down.
//!
//! The coverage penalty grows with the square root of coverage, so the first
//! few percent of burning area cost far more controllability than later growth.

use crate::core_types::vegetation::{MAX_SPREAD_FACTOR, MIN_SPREAD_FACTOR};
use crate::grid::field::mean;
use crate::grid::ForestGrid;

/// Weights of the combined environmental score. They sum to 1.0.
pub mod weights {
    pub const HUMIDITY: f32 = 0.30;
    pub const WIND: f32 = 0.20;
    pub const FUEL: f32 = 0.15;
    pub const TEMPERATURE: f32 = 0.15;
    pub const DROUGHT: f32 = 0.10;
    pub const SPREAD_FACTOR: f32 = 0.05;
    pub const COMPLEXITY: f32 = 0.05;
}

/// Temperature (°C) at which the temperature score is neutral.
const TEMPERATURE_REFERENCE: f32 = 20.0;
/// Temperature span (°C) over which the score falls from 1 to 0.
const TEMPERATURE_SPAN: f32 = 40.0;
/// Wind strength at and above which the wind score is zero.
const WIND_SATURATION: f32 = 1.5;
/// Share of the combined score removed at maximum complexity.
const COMPLEXITY_DAMPING: f32 = 0.6;
/// Coverage penalty gain.
const COVERAGE_GAIN: f32 = 0.95;
/// Coverage penalty exponent.
const COVERAGE_EXPONENT: f32 = 0.5;
/// Coverage penalty ceiling.
const MAX_COVERAGE_PENALTY: f32 = 0.99;

/// Inputs to [`score`], borrowed from the current tick
#[derive(Debug, Clone, Copy)]
pub struct ControllabilityInputs<'a> {
    pub fractal_dimension: f32,
    pub fuel: &'a [f32],
    pub humidity: &'a [f32],
    pub temperature: &'a [f32],
    pub wind_strength: f32,
    pub drought_level: f32,
    pub spread_factor: f32,
    /// Fraction of cells burning, in `[0, 1]`
    pub fire_coverage: f32,
}

impl<'a> ControllabilityInputs<'a> {
    /// Borrow the per-cell fields from `grid`; scalar inputs start neutral.
    pub fn from_grid(grid: &'a ForestGrid) -> Self {
        Self {
            fractal_dimension: 0.0,
            fuel: grid.fuel().as_slice(),
            humidity: grid.humidity().as_slice(),
            temperature: grid.temperature().as_slice(),
            wind_strength: 0.0,
            drought_level: 0.0,
            spread_factor: 1.0,
            fire_coverage: grid.fire_coverage(),
        }
    }
}

/// Per-factor breakdown of a controllability score
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ControllabilityBreakdown {
    pub fuel_score: f32,
    pub humidity_score: f32,
    pub temperature_score: f32,
    pub wind_score: f32,
    pub drought_score: f32,
    pub spread_factor_score: f32,
    /// Normalised boundary complexity, `[0, 1]`
    pub complexity: f32,
    /// Weighted environmental score before complexity damping
    pub combined: f32,
    /// Combined score after complexity damping
    pub base: f32,
    pub coverage_penalty: f32,
    /// Final score, `[0, 1]`
    pub controllability: f32,
}

/// Controllability score in `[0, 1]`.
pub fn score(inputs: &ControllabilityInputs<'_>) -> f32 {
    breakdown(inputs).controllability
}

/// Full factor breakdown of the controllability score.
pub fn breakdown(inputs: &ControllabilityInputs<'_>) -> ControllabilityBreakdown {
    let avg_fuel = mean(inputs.fuel).clamp(0.0, 1.0);
    let avg_humidity = mean(inputs.humidity).clamp(0.0, 1.0);
    let avg_temp = mean(inputs.temperature);

    let fuel_score = 1.0 - avg_fuel;
    let humidity_score = avg_humidity;
    let temperature_score = (1.0
        - ((avg_temp - TEMPERATURE_REFERENCE) / TEMPERATURE_SPAN).clamp(-0.5, 1.0))
    .clamp(0.0, 1.0);
    let wind_score = 1.0 - (inputs.wind_strength / WIND_SATURATION).clamp(0.0, 1.0);
    let drought_score = 1.0 - inputs.drought_level.clamp(0.0, 1.0);
    let spread_factor_score = 1.0
        - ((inputs.spread_factor - MIN_SPREAD_FACTOR) / (MAX_SPREAD_FACTOR - MIN_SPREAD_FACTOR))
            .clamp(0.0, 1.0);

    let fd_clamped = inputs.fractal_dimension.clamp(0.5, 3.0);
    let complexity = ((fd_clamped - 1.0) / 2.0).clamp(0.0, 1.0);
    let complexity_score = 1.0 - complexity;

    let combined = (weights::HUMIDITY * humidity_score
        + weights::WIND * wind_score
        + weights::FUEL * fuel_score
        + weights::TEMPERATURE * temperature_score
        + weights::DROUGHT * drought_score
        + weights::SPREAD_FACTOR * spread_factor_score
        + weights::COMPLEXITY * complexity_score)
        .clamp(0.0, 1.0);

    let base = (combined * (1.0 - COMPLEXITY_DAMPING * complexity)).clamp(0.0, 1.0);

    let coverage_penalty = (COVERAGE_GAIN * inputs.fire_coverage.max(0.0).powf(COVERAGE_EXPONENT))
        .clamp(0.0, MAX_COVERAGE_PENALTY);

    let controllability = (base * (1.0 - coverage_penalty)).clamp(0.0, 1.0);

    ControllabilityBreakdown {
        fuel_score,
        humidity_score,
        temperature_score,
        wind_score,
        drought_score,
        spread_factor_score,
        complexity,
        combined,
        base,
        coverage_penalty,
        controllability,
    }
}

/// Suppression strength applied by the spread rule: `controllability^1.5`.
pub fn control_effectiveness(controllability: f32) -> f32 {
    controllability.clamp(0.0, 1.0).powf(1.5)
}
