//! Forest grid state
//!
//! Four index-aligned row-major fields describe the landscape: cell status,
//! remaining fuel, humidity and temperature. The grid owns a second status
//! buffer so a spread step can read the previous tick's snapshot while writing
//! the next one, then swap the two without reallocating.
//!
//! Invariants maintained by every mutating method:
//! - all fields share the same `rows × cols` shape for the grid's lifetime
//! - `status == Empty` exactly when `fuel == 0`

use super::field::FieldData;
use crate::core_types::CellStatus;
use crate::error::SimulationError;
use rand::Rng;
use std::ops::Range;

/// Default per-cell humidity draw range (fraction).
pub const DEFAULT_HUMIDITY_RANGE: Range<f32> = 0.10..0.40;
/// Default uniform temperature (°C).
pub const DEFAULT_TEMPERATURE: f32 = 25.0;

/// Borrowed, read-only view of the per-cell fields
#[derive(Debug, Clone, Copy)]
pub struct GridSnapshot<'a> {
    pub rows: usize,
    pub cols: usize,
    pub status: &'a [CellStatus],
    pub fuel: &'a [f32],
    pub humidity: &'a [f32],
    pub temperature: &'a [f32],
}

/// Landscape state for one simulation
#[derive(Debug, Clone)]
pub struct ForestGrid {
    status: FieldData<CellStatus>,
    // Ping-pong buffer written by the spread step, then swapped with `status`
    status_back: FieldData<CellStatus>,
    fuel: FieldData<f32>,
    humidity: FieldData<f32>,
    temperature: FieldData<f32>,
}

impl ForestGrid {
    /// Create the initial forest with default humidity and temperature.
    ///
    /// See [`ForestGrid::with_conditions`].
    ///
    /// # Errors
    ///
    /// Returns [`SimulationError::InvalidParameter`] if either dimension is zero.
    pub fn create<R: Rng + ?Sized>(
        rows: usize,
        cols: usize,
        rng: &mut R,
    ) -> Result<Self, SimulationError> {
        Self::with_conditions(rows, cols, DEFAULT_HUMIDITY_RANGE, DEFAULT_TEMPERATURE, rng)
    }

    /// Create the initial forest.
    ///
    /// Every cell starts as `Tree` with fuel 1.0, humidity drawn independently
    /// from `humidity_range`, and the given uniform temperature. The centre
    /// cell `(rows / 2, cols / 2)` is the single burning seed.
    ///
    /// # Errors
    ///
    /// Returns [`SimulationError::InvalidParameter`] if either dimension is zero,
    /// the humidity range is inverted or outside `[0, 1]`, or the temperature is
    /// not finite.
    pub fn with_conditions<R: Rng + ?Sized>(
        rows: usize,
        cols: usize,
        humidity_range: Range<f32>,
        temperature: f32,
        rng: &mut R,
    ) -> Result<Self, SimulationError> {
        if rows == 0 || cols == 0 {
            return Err(SimulationError::invalid_parameter(
                "dimensions",
                format!("grid must be at least 1x1, got {rows}x{cols}"),
            ));
        }
        validate_humidity_range(&humidity_range)?;
        let temperature = crate::error::ensure_finite("temperature", temperature)?;

        let mut status = FieldData::with_value(rows, cols, CellStatus::Tree);
        status.set(rows / 2, cols / 2, CellStatus::Burning);

        let humidity = if humidity_range.is_empty() {
            FieldData::with_value(rows, cols, humidity_range.start)
        } else {
            FieldData::from_fn(rows, cols, |_, _| rng.random_range(humidity_range.clone()))
        };

        Ok(Self {
            status_back: status.clone(),
            status,
            fuel: FieldData::with_value(rows, cols, 1.0),
            humidity,
            temperature: FieldData::with_value(rows, cols, temperature),
        })
    }

    /// Assemble a grid from explicit fields.
    ///
    /// Intended for scenario setup: the fields are checked for matching shape,
    /// finite values, fuel in `[0, 1]`, and the status/fuel coupling.
    ///
    /// # Errors
    ///
    /// Returns [`SimulationError::InvalidParameter`] describing the first problem found.
    pub fn from_fields(
        status: FieldData<CellStatus>,
        fuel: FieldData<f32>,
        humidity: FieldData<f32>,
        temperature: FieldData<f32>,
    ) -> Result<Self, SimulationError> {
        let shape = (status.rows(), status.cols());
        if shape.0 == 0 || shape.1 == 0 {
            return Err(SimulationError::invalid_parameter(
                "dimensions",
                "grid must be at least 1x1",
            ));
        }
        for (name, field) in [
            ("fuel", &fuel),
            ("humidity", &humidity),
            ("temperature", &temperature),
        ] {
            if (field.rows(), field.cols()) != shape {
                return Err(SimulationError::invalid_parameter(
                    name,
                    format!(
                        "shape {}x{} does not match status shape {}x{}",
                        field.rows(),
                        field.cols(),
                        shape.0,
                        shape.1
                    ),
                ));
            }
            if field.as_slice().iter().any(|v| !v.is_finite()) {
                return Err(SimulationError::invalid_parameter(
                    name,
                    "contains non-finite values",
                ));
            }
        }
        if fuel.as_slice().iter().any(|v| !(0.0..=1.0).contains(v)) {
            return Err(SimulationError::invalid_parameter(
                "fuel",
                "values must lie in [0, 1]",
            ));
        }
        if humidity.as_slice().iter().any(|v| !(0.0..=1.0).contains(v)) {
            return Err(SimulationError::invalid_parameter(
                "humidity",
                "values must lie in [0, 1]",
            ));
        }

        let grid = Self {
            status_back: status.clone(),
            status,
            fuel,
            humidity,
            temperature,
        };
        if let Some((row, col)) = grid.first_invariant_violation() {
            return Err(SimulationError::invalid_parameter(
                "status",
                format!("cell ({row}, {col}) breaks the Empty <=> zero fuel coupling"),
            ));
        }
        Ok(grid)
    }

    pub fn rows(&self) -> usize {
        self.status.rows()
    }

    pub fn cols(&self) -> usize {
        self.status.cols()
    }

    /// Total number of cells
    pub fn len(&self) -> usize {
        self.status.len()
    }

    pub fn is_empty(&self) -> bool {
        self.status.is_empty()
    }

    /// Position of the initial ignition seed
    pub fn seed_position(&self) -> (usize, usize) {
        (self.rows() / 2, self.cols() / 2)
    }

    pub fn status(&self) -> &FieldData<CellStatus> {
        &self.status
    }

    pub fn fuel(&self) -> &FieldData<f32> {
        &self.fuel
    }

    pub fn humidity(&self) -> &FieldData<f32> {
        &self.humidity
    }

    pub fn temperature(&self) -> &FieldData<f32> {
        &self.temperature
    }

    pub fn status_at(&self, row: usize, col: usize) -> CellStatus {
        self.status.get(row, col)
    }

    /// Read-only view of all fields
    pub fn snapshot(&self) -> GridSnapshot<'_> {
        GridSnapshot {
            rows: self.rows(),
            cols: self.cols(),
            status: self.status.as_slice(),
            fuel: self.fuel.as_slice(),
            humidity: self.humidity.as_slice(),
            temperature: self.temperature.as_slice(),
        }
    }

    /// Split the grid into the committed snapshot and the back status buffer.
    ///
    /// The back buffer must be fully written before [`commit_status`](Self::commit_status).
    pub(crate) fn spread_buffers(&mut self) -> (GridSnapshot<'_>, &mut [CellStatus]) {
        let snapshot = GridSnapshot {
            rows: self.status.rows(),
            cols: self.status.cols(),
            status: self.status.as_slice(),
            fuel: self.fuel.as_slice(),
            humidity: self.humidity.as_slice(),
            temperature: self.temperature.as_slice(),
        };
        (snapshot, self.status_back.as_mut_slice())
    }

    /// Swap the freshly written back buffer in as the committed status.
    pub(crate) fn commit_status(&mut self) {
        std::mem::swap(&mut self.status, &mut self.status_back);
    }

    /// Count cells with the given status
    pub fn count(&self, status: CellStatus) -> usize {
        self.status.as_slice().iter().filter(|&&s| s == status).count()
    }

    pub fn has_burning(&self) -> bool {
        self.status
            .as_slice()
            .iter()
            .any(|&s| s == CellStatus::Burning)
    }

    /// Fraction of cells currently burning, in `[0, 1]`
    pub fn fire_coverage(&self) -> f32 {
        self.count(CellStatus::Burning) as f32 / self.len() as f32
    }

    /// `true` where a cell is no longer unburned vegetation (burning or burned out)
    pub fn affected_mask(&self) -> Vec<bool> {
        self.status
            .as_slice()
            .iter()
            .map(|s| s.is_affected())
            .collect()
    }

    /// Burn down fuel in every burning cell and retire exhausted cells.
    ///
    /// Each `Burning` cell loses `burn_rate` fuel. Cells whose fuel reaches
    /// zero or below become `Empty` with fuel exactly `0.0`.
    ///
    /// # Returns
    ///
    /// Number of cells retired this call
    pub fn apply_fuel_depletion(&mut self, burn_rate: f32) -> usize {
        let mut retired = 0;
        for (status, fuel) in self
            .status
            .as_mut_slice()
            .iter_mut()
            .zip(self.fuel.as_mut_slice().iter_mut())
        {
            if *status != CellStatus::Burning {
                continue;
            }
            *fuel -= burn_rate;
            if *fuel <= 0.0 {
                *fuel = 0.0;
                *status = CellStatus::Empty;
                retired += 1;
            }
        }
        retired
    }

    /// Set a single unburned cell alight.
    ///
    /// # Errors
    ///
    /// Returns [`SimulationError::InvalidParameter`] if the position is out of
    /// bounds or the cell is not `Tree`.
    pub fn ignite(&mut self, row: usize, col: usize) -> Result<(), SimulationError> {
        if row >= self.rows() || col >= self.cols() {
            return Err(SimulationError::invalid_parameter(
                "position",
                format!(
                    "({row}, {col}) is outside the {}x{} grid",
                    self.rows(),
                    self.cols()
                ),
            ));
        }
        match self.status.get(row, col) {
            CellStatus::Tree => {
                self.status.set(row, col, CellStatus::Burning);
                Ok(())
            }
            other => Err(SimulationError::invalid_parameter(
                "position",
                format!("cell ({row}, {col}) is {other:?}, only Tree cells can ignite"),
            )),
        }
    }

    /// Overwrite every cell's humidity. Caller validates the value.
    pub(crate) fn fill_humidity(&mut self, humidity: f32) {
        self.humidity.fill(humidity);
    }

    /// Overwrite every cell's temperature. Caller validates the value.
    pub(crate) fn fill_temperature(&mut self, temperature: f32) {
        self.temperature.fill(temperature);
    }

    /// First cell breaking the status/fuel coupling, if any.
    pub fn first_invariant_violation(&self) -> Option<(usize, usize)> {
        self.status
            .as_slice()
            .iter()
            .zip(self.fuel.as_slice())
            .position(|(&s, &f)| {
                (s == CellStatus::Empty) != (f == 0.0) || !(0.0..=1.0).contains(&f)
            })
            .map(|idx| (idx / self.cols(), idx % self.cols()))
    }
}

fn validate_humidity_range(range: &Range<f32>) -> Result<(), SimulationError> {
    let ok = range.start.is_finite()
        && range.end.is_finite()
        && range.start <= range.end
        && range.start >= 0.0
        && range.end <= 1.0;
    if ok {
        Ok(())
    } else {
        Err(SimulationError::invalid_parameter(
            "humidity_range",
            format!(
                "must be an ordered range within [0, 1], got {}..{}",
                range.start, range.end
            ),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn rng() -> ChaCha8Rng {
        ChaCha8Rng::seed_from_u64(7)
    }

    #[test]
    fn test_create_initial_state() {
        let grid = ForestGrid::create(144, 256, &mut rng()).unwrap();
        assert_eq!(grid.rows(), 144);
        assert_eq!(grid.cols(), 256);
        assert_eq!(grid.status_at(72, 128), CellStatus::Burning);
        assert_eq!(grid.count(CellStatus::Burning), 1);
        assert_eq!(grid.count(CellStatus::Tree), 144 * 256 - 1);
        assert!(grid.fuel().as_slice().iter().all(|&f| f == 1.0));
        assert!(grid.temperature().as_slice().iter().all(|&t| t == 25.0));
        assert!(grid
            .humidity()
            .as_slice()
            .iter()
            .all(|h| DEFAULT_HUMIDITY_RANGE.contains(h)));
        assert_eq!(grid.first_invariant_violation(), None);
    }

    #[test]
    fn test_create_is_seed_deterministic() {
        let a = ForestGrid::create(20, 30, &mut rng()).unwrap();
        let b = ForestGrid::create(20, 30, &mut rng()).unwrap();
        assert_eq!(a.humidity(), b.humidity());
    }

    #[test]
    fn test_create_rejects_bad_input() {
        assert!(ForestGrid::create(0, 10, &mut rng()).is_err());
        assert!(ForestGrid::with_conditions(5, 5, 0.5..0.2, 25.0, &mut rng()).is_err());
        assert!(ForestGrid::with_conditions(5, 5, 0.0..1.5, 25.0, &mut rng()).is_err());
        assert!(ForestGrid::with_conditions(5, 5, 0.1..0.4, f32::NAN, &mut rng()).is_err());
    }

    #[test]
    fn test_degenerate_humidity_range_is_uniform() {
        let grid = ForestGrid::with_conditions(4, 4, 0.25..0.25, 25.0, &mut rng()).unwrap();
        assert!(grid.humidity().as_slice().iter().all(|&h| h == 0.25));
    }

    #[test]
    fn test_fuel_depletion_retires_cells() {
        let mut grid = ForestGrid::create(3, 3, &mut rng()).unwrap();
        assert_eq!(grid.apply_fuel_depletion(0.5), 0);
        assert_eq!(grid.fuel().get(1, 1), 0.5);
        assert_eq!(grid.status_at(1, 1), CellStatus::Burning);

        assert_eq!(grid.apply_fuel_depletion(0.5), 1);
        assert_eq!(grid.fuel().get(1, 1), 0.0);
        assert_eq!(grid.status_at(1, 1), CellStatus::Empty);
        assert_eq!(grid.first_invariant_violation(), None);

        // Trees are untouched
        assert_eq!(grid.fuel().get(0, 0), 1.0);
    }

    #[test]
    fn test_fuel_depletion_clamps_overshoot() {
        let mut grid = ForestGrid::create(3, 3, &mut rng()).unwrap();
        grid.apply_fuel_depletion(0.7);
        grid.apply_fuel_depletion(0.7);
        assert_eq!(grid.fuel().get(1, 1), 0.0);
        assert_eq!(grid.status_at(1, 1), CellStatus::Empty);
    }

    #[test]
    fn test_ignite() {
        let mut grid = ForestGrid::create(5, 5, &mut rng()).unwrap();
        grid.ignite(0, 0).unwrap();
        assert_eq!(grid.status_at(0, 0), CellStatus::Burning);
        assert!(grid.ignite(0, 0).is_err(), "already burning");
        assert!(grid.ignite(5, 0).is_err(), "out of bounds");
    }

    #[test]
    fn test_fire_coverage_and_mask() {
        let grid = ForestGrid::create(4, 5, &mut rng()).unwrap();
        assert_eq!(grid.fire_coverage(), 1.0 / 20.0);
        let mask = grid.affected_mask();
        assert_eq!(mask.iter().filter(|&&m| m).count(), 1);
        assert!(mask[grid.status().index(2, 2)]);
    }

    #[test]
    fn test_from_fields_validation() {
        let status = FieldData::with_value(2, 2, CellStatus::Tree);
        let ok = ForestGrid::from_fields(
            status.clone(),
            FieldData::with_value(2, 2, 1.0),
            FieldData::with_value(2, 2, 0.2),
            FieldData::with_value(2, 2, 20.0),
        );
        assert!(ok.is_ok());

        let shape_mismatch = ForestGrid::from_fields(
            status.clone(),
            FieldData::with_value(2, 3, 1.0),
            FieldData::with_value(2, 2, 0.2),
            FieldData::with_value(2, 2, 20.0),
        );
        assert!(shape_mismatch.is_err());

        // Tree with zero fuel breaks the coupling
        let broken = ForestGrid::from_fields(
            status,
            FieldData::with_value(2, 2, 0.0),
            FieldData::with_value(2, 2, 0.2),
            FieldData::with_value(2, 2, 20.0),
        );
        assert!(broken.is_err());
    }

    #[test]
    fn test_commit_swaps_buffers() {
        let mut grid = ForestGrid::create(3, 3, &mut rng()).unwrap();
        {
            let (_, back) = grid.spread_buffers();
            back.fill(CellStatus::Burning);
        }
        grid.commit_status();
        assert_eq!(grid.count(CellStatus::Burning), 9);
    }
}
