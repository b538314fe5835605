//! Simulation controller
//!
//! `FireRiskSimulation` owns the forest grid, the environment and the
//! vegetation selection, and runs ticks in a fixed order:
//!
//! 1. fractal dimension of the burned/unburned mask
//! 2. fire coverage
//! 3. controllability score
//! 4. spread into the back buffer, then commit
//! 5. fuel depletion and retirement of burned-out cells
//! 6. termination check
//!
//! A tick either completes fully or does not happen, so readers only ever see
//! committed state. Stopping between ticks is always safe.

pub mod config;
pub mod diagnostics;

pub use config::{GridPreset, SimulationConfig, DEFAULT_BURN_RATE, DEFAULT_SEED};
pub use diagnostics::{Diagnostics, SimulationStats};

use crate::core_types::environment::clamp_logged;
use crate::core_types::{
    CellStatus, EnvironmentParameters, KilometersPerHour, Percent, VegetationCatalog,
    VegetationType,
};
use crate::error::{ensure_finite, SimulationError};
use crate::grid::ForestGrid;
use crate::solver::{
    control_effectiveness, controllability_score, fractal_factor, ControllabilityInputs,
    FractalDimensionEstimator, SpreadEngine, SpreadParams,
};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tracing::{debug, info};

/// Lowest temperature accepted by [`FireRiskSimulation::set_temperature`] (°C).
pub const MIN_TEMPERATURE: f32 = -40.0;
/// Highest temperature accepted by [`FireRiskSimulation::set_temperature`] (°C).
pub const MAX_TEMPERATURE: f32 = 60.0;

/// Wildfire spread simulation with per-tick risk diagnostics
pub struct FireRiskSimulation {
    config: SimulationConfig,
    grid: ForestGrid,
    environment: EnvironmentParameters,
    vegetation: &'static VegetationType,
    engine: SpreadEngine,
    estimator: FractalDimensionEstimator,
    rng: ChaCha8Rng,
    running: bool,
    tick: u64,
    diagnostics: Diagnostics,
}

impl FireRiskSimulation {
    /// Create a simulation from a validated configuration.
    ///
    /// The simulation starts paused with the initial forest in place and
    /// diagnostics computed for that state.
    ///
    /// # Errors
    ///
    /// Returns the first error reported by [`SimulationConfig::validate`].
    pub fn new(config: SimulationConfig) -> Result<Self, SimulationError> {
        config.validate()?;
        let catalog = VegetationCatalog::standard();
        let vegetation = catalog
            .get(&config.initial_vegetation)
            .ok_or_else(|| SimulationError::unknown_vegetation(&config.initial_vegetation))?;

        let mut rng = ChaCha8Rng::seed_from_u64(config.seed);
        let grid = Self::build_grid(&config, &mut rng)?;

        info!(
            "Creating fire risk simulation: {}x{} grid, seed {}, vegetation {}",
            config.rows, config.cols, config.seed, vegetation.name
        );

        let mut sim = Self {
            engine: SpreadEngine::new(config.execution),
            config,
            grid,
            environment: EnvironmentParameters::default(),
            vegetation,
            estimator: FractalDimensionEstimator,
            rng,
            running: false,
            tick: 0,
            diagnostics: Diagnostics::default(),
        };
        sim.diagnostics = sim.evaluate();
        Ok(sim)
    }

    fn build_grid(
        config: &SimulationConfig,
        rng: &mut ChaCha8Rng,
    ) -> Result<ForestGrid, SimulationError> {
        ForestGrid::with_conditions(
            config.rows,
            config.cols,
            config.humidity_range.clone(),
            config.initial_temperature,
            rng,
        )
    }

    /// Diagnostics of the current committed state, without advancing.
    fn evaluate(&self) -> Diagnostics {
        let fractal_dimension = self.estimator.estimate_mask(
            &self.grid.affected_mask(),
            self.grid.rows(),
            self.grid.cols(),
        );
        let fire_coverage = self.grid.fire_coverage();
        let controllability = controllability_score(&ControllabilityInputs {
            fractal_dimension,
            wind_strength: self.environment.wind_strength(),
            drought_level: self.environment.drought_level(),
            spread_factor: self.vegetation.spread_factor,
            fire_coverage,
            ..ControllabilityInputs::from_grid(&self.grid)
        });
        Diagnostics {
            fractal_dimension,
            fire_coverage,
            controllability,
        }
    }

    /// Advance exactly one tick, whether or not the simulation is running.
    ///
    /// # Returns
    ///
    /// The diagnostics that drove this tick
    pub fn step(&mut self) -> Diagnostics {
        let diagnostics = self.evaluate();
        let params = SpreadParams {
            wind_unit: self.environment.wind_unit(),
            wind_strength: self.environment.wind_strength(),
            drought_level: self.environment.drought_level(),
            spread_factor: self.vegetation.spread_factor,
            fractal_factor: fractal_factor(diagnostics.fractal_dimension),
            control_effectiveness: control_effectiveness(diagnostics.controllability),
            base_probability: self.config.base_ignition_probability,
        };
        let tick_seed: u64 = self.rng.random();

        {
            let (snapshot, back) = self.grid.spread_buffers();
            self.engine.step_into(&snapshot, &params, tick_seed, back);
        }
        self.grid.commit_status();
        let retired = self.grid.apply_fuel_depletion(self.config.burn_rate);

        debug_assert!(
            self.grid.first_invariant_violation().is_none(),
            "grid invariant broken after tick {}",
            self.tick + 1
        );

        self.tick += 1;
        self.diagnostics = diagnostics;

        debug!(
            tick = self.tick,
            fractal_dimension = diagnostics.fractal_dimension,
            fire_coverage = diagnostics.fire_coverage,
            controllability = diagnostics.controllability,
            retired,
            "Tick complete"
        );

        if !self.grid.has_burning() {
            if self.running {
                info!("Fire burned out after {} ticks, pausing", self.tick);
            }
            self.running = false;
        }
        diagnostics
    }

    /// Advance one tick if running.
    ///
    /// # Returns
    ///
    /// The tick's diagnostics, or `None` if the simulation is paused
    pub fn update(&mut self) -> Option<Diagnostics> {
        self.running.then(|| self.step())
    }

    /// Run ticks while running, up to `max_ticks`.
    ///
    /// # Returns
    ///
    /// Number of ticks advanced
    pub fn run(&mut self, max_ticks: u64) -> u64 {
        let mut advanced = 0;
        while advanced < max_ticks && self.update().is_some() {
            advanced += 1;
        }
        advanced
    }

    pub fn start(&mut self) {
        if !self.running {
            info!("Simulation started at tick {}", self.tick);
        }
        self.running = true;
    }

    pub fn stop(&mut self) {
        if self.running {
            info!("Simulation stopped at tick {}", self.tick);
        }
        self.running = false;
    }

    /// Replace the grid with a fresh initial forest and pause.
    ///
    /// Environment and vegetation selection are kept. Humidity is redrawn
    /// from the master RNG, which keeps advancing across resets.
    pub fn reset(&mut self) {
        match Self::build_grid(&self.config, &mut self.rng) {
            Ok(grid) => self.grid = grid,
            // The config was validated at construction and never changes
            Err(err) => unreachable!("validated config rejected on reset: {err}"),
        }
        self.running = false;
        self.tick = 0;
        self.diagnostics = self.evaluate();
        info!("Simulation reset");
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Ticks completed since construction or the last reset
    pub fn tick(&self) -> u64 {
        self.tick
    }

    pub fn diagnostics(&self) -> Diagnostics {
        self.diagnostics
    }

    pub fn stats(&self) -> SimulationStats {
        SimulationStats::collect(&self.grid, self.tick)
    }

    pub fn grid(&self) -> &ForestGrid {
        &self.grid
    }

    /// Committed cell status in row-major order
    pub fn grid_view(&self) -> &[CellStatus] {
        self.grid.status().as_slice()
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    pub fn environment(&self) -> &EnvironmentParameters {
        &self.environment
    }

    pub fn vegetation(&self) -> &'static VegetationType {
        self.vegetation
    }

    /// Set wind direction (degrees, counter-clockwise from east) and strength.
    ///
    /// # Errors
    ///
    /// Returns [`SimulationError::InvalidParameter`] if either value is non-finite.
    pub fn set_wind(&mut self, angle_degrees: f32, strength: f32) -> Result<(), SimulationError> {
        self.environment.set_wind(angle_degrees, strength)
    }

    /// Set wind from a speed in km/h.
    ///
    /// # Errors
    ///
    /// Returns [`SimulationError::InvalidParameter`] if either value is non-finite.
    pub fn set_wind_kmh(
        &mut self,
        angle_degrees: f32,
        speed: KilometersPerHour,
    ) -> Result<(), SimulationError> {
        self.environment.set_wind_kmh(angle_degrees, speed)
    }

    /// Set every cell's humidity, clamped to `[0, 1]`.
    ///
    /// # Errors
    ///
    /// Returns [`SimulationError::InvalidParameter`] if the value is non-finite.
    pub fn set_humidity(&mut self, humidity: f32) -> Result<(), SimulationError> {
        let humidity = ensure_finite("humidity", humidity)?;
        let humidity = clamp_logged("humidity", humidity, 0.0, 1.0);
        self.grid.fill_humidity(humidity);
        Ok(())
    }

    /// Set every cell's humidity from a 0-100 percentage.
    ///
    /// # Errors
    ///
    /// Returns [`SimulationError::InvalidParameter`] if the value is non-finite.
    pub fn set_humidity_percent(&mut self, humidity: Percent) -> Result<(), SimulationError> {
        self.set_humidity(humidity.to_fraction())
    }

    /// Set every cell's temperature, clamped to `[MIN_TEMPERATURE, MAX_TEMPERATURE]`.
    ///
    /// # Errors
    ///
    /// Returns [`SimulationError::InvalidParameter`] if the value is non-finite.
    pub fn set_temperature(&mut self, temperature: f32) -> Result<(), SimulationError> {
        let temperature = ensure_finite("temperature", temperature)?;
        let temperature = clamp_logged("temperature", temperature, MIN_TEMPERATURE, MAX_TEMPERATURE);
        self.grid.fill_temperature(temperature);
        Ok(())
    }

    /// Set the drought level, clamped to `[0, 1]`.
    ///
    /// # Errors
    ///
    /// Returns [`SimulationError::InvalidParameter`] if the value is non-finite.
    pub fn set_drought(&mut self, level: f32) -> Result<(), SimulationError> {
        self.environment.set_drought(level)
    }

    /// Set the drought level from a 0-100 percentage.
    ///
    /// # Errors
    ///
    /// Returns [`SimulationError::InvalidParameter`] if the value is non-finite.
    pub fn set_drought_percent(&mut self, level: Percent) -> Result<(), SimulationError> {
        self.environment.set_drought_percent(level)
    }

    /// Select the vegetation type used from the next tick on.
    ///
    /// # Errors
    ///
    /// Returns [`SimulationError::UnknownVegetation`] if `name` is not in the catalog;
    /// the current selection is kept.
    pub fn select_vegetation(&mut self, name: &str) -> Result<(), SimulationError> {
        let vegetation = VegetationCatalog::standard()
            .get(name)
            .ok_or_else(|| SimulationError::unknown_vegetation(name))?;
        info!(
            "Vegetation set to {} ({}), spread factor {:.2}",
            vegetation.name, vegetation.common_name, vegetation.spread_factor
        );
        self.vegetation = vegetation;
        Ok(())
    }

    /// Set an unburned cell alight, e.g. to resume a burned-out run.
    ///
    /// # Errors
    ///
    /// Returns [`SimulationError::InvalidParameter`] if the position is out of
    /// bounds or the cell is not `Tree`.
    pub fn ignite(&mut self, row: usize, col: usize) -> Result<(), SimulationError> {
        self.grid.ignite(row, col)?;
        self.diagnostics = self.evaluate();
        debug!(row, col, "Manual ignition");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::solver::ExecutionMode;

    fn small(seed: u64) -> FireRiskSimulation {
        FireRiskSimulation::new(SimulationConfig::with_dimensions(24, 32).seed(seed)).unwrap()
    }

    #[test]
    fn test_new_is_paused_with_single_seed() {
        let sim = small(1);
        assert!(!sim.is_running());
        assert_eq!(sim.tick(), 0);
        assert_eq!(sim.grid().count(CellStatus::Burning), 1);
        assert_eq!(sim.grid().status_at(12, 16), CellStatus::Burning);
        assert_eq!(sim.vegetation().name, "Çam");
        assert_eq!(sim.diagnostics().fire_coverage, 1.0 / (24.0 * 32.0));
    }

    #[test]
    fn test_new_rejects_invalid_config() {
        let config = SimulationConfig {
            initial_vegetation: "Palm".into(),
            ..SimulationConfig::with_dimensions(8, 8)
        };
        assert!(matches!(
            FireRiskSimulation::new(config),
            Err(SimulationError::UnknownVegetation(_))
        ));
    }

    #[test]
    fn test_update_only_when_running() {
        let mut sim = small(2);
        assert!(sim.update().is_none());
        assert_eq!(sim.tick(), 0);
        sim.start();
        assert!(sim.update().is_some());
        assert_eq!(sim.tick(), 1);
        sim.stop();
        assert!(sim.update().is_none());
        assert_eq!(sim.tick(), 1);
    }

    #[test]
    fn test_step_reports_pre_spread_coverage() {
        let mut sim = small(3);
        let diag = sim.step();
        assert_eq!(diag.fire_coverage, 1.0 / (24.0 * 32.0));
        assert_eq!(sim.diagnostics(), diag);
    }

    #[test]
    fn test_termination_clears_running() {
        let mut sim = small(4);
        // Soak the forest so the seed cannot spread
        sim.set_temperature(MIN_TEMPERATURE).unwrap();
        sim.start();
        let ticks = sim.run(100);
        assert!(!sim.is_running());
        assert!(!sim.grid().has_burning());
        // Fuel 1.0 at 0.1 per tick
        assert_eq!(ticks, 10);
        assert_eq!(sim.grid().status_at(12, 16), CellStatus::Empty);
    }

    #[test]
    fn test_reset_restores_initial_state() {
        let mut sim = small(5);
        sim.start();
        sim.run(5);
        sim.reset();
        assert!(!sim.is_running());
        assert_eq!(sim.tick(), 0);
        let grid = sim.grid();
        for row in 0..grid.rows() {
            for col in 0..grid.cols() {
                let expected = if (row, col) == grid.seed_position() {
                    CellStatus::Burning
                } else {
                    CellStatus::Tree
                };
                assert_eq!(grid.status_at(row, col), expected);
                assert_eq!(grid.fuel().get(row, col), 1.0);
            }
        }
    }

    #[test]
    fn test_select_vegetation() {
        let mut sim = small(6);
        sim.select_vegetation("Çalı").unwrap();
        assert_eq!(sim.vegetation().spread_factor, 1.6);
        let err = sim.select_vegetation("Palm").unwrap_err();
        assert_eq!(err, SimulationError::UnknownVegetation("Palm".into()));
        assert_eq!(sim.vegetation().name, "Çalı", "selection kept on error");
    }

    #[test]
    fn test_setters_clamp_and_reject() {
        let mut sim = small(7);
        sim.set_humidity(1.7).unwrap();
        assert!(sim.grid().humidity().as_slice().iter().all(|&h| h == 1.0));
        sim.set_humidity_percent(Percent::new(25.0)).unwrap();
        assert!(sim.grid().humidity().as_slice().iter().all(|&h| h == 0.25));
        sim.set_temperature(1000.0).unwrap();
        assert!(sim
            .grid()
            .temperature()
            .as_slice()
            .iter()
            .all(|&t| t == MAX_TEMPERATURE));

        assert!(sim.set_humidity(f32::NAN).is_err());
        assert!(sim.set_temperature(f32::INFINITY).is_err());
        assert!(sim.set_drought(f32::NAN).is_err());
        assert!(sim.set_wind(f32::NAN, 0.0).is_err());
        assert!(sim.grid().humidity().as_slice().iter().all(|&h| h == 0.25));
    }

    #[test]
    fn test_ignite_resumes_burned_out_run() {
        let mut sim = small(8);
        sim.set_temperature(MIN_TEMPERATURE).unwrap();
        sim.start();
        sim.run(100);
        assert!(!sim.is_running());

        sim.ignite(0, 0).unwrap();
        assert!(sim.ignite(12, 16).is_err(), "burned-out cell cannot reignite");
        sim.start();
        assert!(sim.update().is_some());
    }

    #[test]
    fn test_ignite_refreshes_diagnostics() {
        let mut sim = small(9);
        let before = sim.diagnostics();
        sim.ignite(0, 0).unwrap();
        let after = sim.diagnostics();
        assert_eq!(after.fire_coverage, 2.0 / (24.0 * 32.0));
        assert!(after.fire_coverage > before.fire_coverage);
        assert!(after.controllability < before.controllability);
        assert_eq!(sim.tick(), 0, "ignition does not advance the clock");
    }

    #[test]
    fn test_same_seed_same_run_across_modes() {
        let build = |mode| {
            FireRiskSimulation::new(
                SimulationConfig::with_dimensions(30, 40)
                    .seed(77)
                    .execution(mode),
            )
            .unwrap()
        };
        let mut par = build(ExecutionMode::Parallel);
        let mut seq = build(ExecutionMode::Sequential);
        for _ in 0..15 {
            assert_eq!(par.step(), seq.step());
            assert_eq!(par.grid_view(), seq.grid_view());
        }
    }
}
