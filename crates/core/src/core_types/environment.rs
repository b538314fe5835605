//! Grid-wide environmental forcing
//!
//! Wind and drought are scalars shared by every cell. They are owned by the
//! simulation controller and only change through the validated setters here,
//! so each tick sees one consistent, fully-checked set of values.

use super::units::{KilometersPerHour, Percent, MAX_WIND_KMH};
use super::vec2::{unit_from_degrees, Vec2};
use crate::error::{ensure_finite, SimulationError};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Maximum dimensionless wind strength accepted by [`EnvironmentParameters::set_wind`].
pub const MAX_WIND_STRENGTH: f32 = MAX_WIND_KMH / super::units::KMH_PER_UNIT_STRENGTH;

/// Clamp `value` into `[min, max]`, logging when the input had to be adjusted.
pub(crate) fn clamp_logged(name: &'static str, value: f32, min: f32, max: f32) -> f32 {
    let clamped = value.clamp(min, max);
    if clamped != value {
        debug!(parameter = name, value, clamped, "Clamped out-of-range input");
    }
    clamped
}

/// Wind and drought forcing applied uniformly to the grid
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EnvironmentParameters {
    /// Degrees in `[0, 360)`, counter-clockwise from east
    wind_angle: f32,
    /// Dimensionless, `[0, MAX_WIND_STRENGTH]`
    wind_strength: f32,
    /// Fraction, `[0, 1]`
    drought_level: f32,
}

impl Default for EnvironmentParameters {
    /// Light northerly-pointing breeze, no drought.
    fn default() -> Self {
        Self {
            wind_angle: 90.0,
            wind_strength: 0.3,
            drought_level: 0.0,
        }
    }
}

impl EnvironmentParameters {
    /// Build a validated parameter set.
    ///
    /// # Errors
    ///
    /// Returns [`SimulationError::InvalidParameter`] if any value is non-finite.
    pub fn new(
        wind_angle: f32,
        wind_strength: f32,
        drought_level: f32,
    ) -> Result<Self, SimulationError> {
        let mut params = Self::default();
        params.set_wind(wind_angle, wind_strength)?;
        params.set_drought(drought_level)?;
        Ok(params)
    }

    /// Calm, dry-free conditions.
    pub fn calm() -> Self {
        Self {
            wind_angle: 0.0,
            wind_strength: 0.0,
            drought_level: 0.0,
        }
    }

    pub fn wind_angle(&self) -> f32 {
        self.wind_angle
    }

    pub fn wind_strength(&self) -> f32 {
        self.wind_strength
    }

    pub fn drought_level(&self) -> f32 {
        self.drought_level
    }

    /// Unit vector the wind blows toward.
    pub fn wind_unit(&self) -> Vec2 {
        unit_from_degrees(self.wind_angle)
    }

    /// Set wind direction and strength.
    ///
    /// The angle is wrapped into `[0, 360)`; the strength is clamped to
    /// `[0, MAX_WIND_STRENGTH]`.
    ///
    /// # Errors
    ///
    /// Returns [`SimulationError::InvalidParameter`] if either value is non-finite.
    pub fn set_wind(&mut self, angle_degrees: f32, strength: f32) -> Result<(), SimulationError> {
        let angle = ensure_finite("wind_angle", angle_degrees)?;
        let strength = ensure_finite("wind_strength", strength)?;
        let angle = angle.rem_euclid(360.0);
        // rem_euclid rounds tiny negative inputs up to exactly 360
        self.wind_angle = if angle >= 360.0 { 0.0 } else { angle };
        self.wind_strength = clamp_logged("wind_strength", strength, 0.0, MAX_WIND_STRENGTH);
        Ok(())
    }

    /// Set wind from a speed in km/h (0-100 km/h maps to strength 0-2).
    ///
    /// # Errors
    ///
    /// Returns [`SimulationError::InvalidParameter`] if either value is non-finite.
    pub fn set_wind_kmh(
        &mut self,
        angle_degrees: f32,
        speed: KilometersPerHour,
    ) -> Result<(), SimulationError> {
        let kmh = ensure_finite("wind_speed", *speed)?;
        let kmh = clamp_logged("wind_speed", kmh, 0.0, MAX_WIND_KMH);
        self.set_wind(angle_degrees, KilometersPerHour::new(kmh).to_wind_strength())
    }

    /// Set the drought level as a fraction, clamped to `[0, 1]`.
    ///
    /// # Errors
    ///
    /// Returns [`SimulationError::InvalidParameter`] if the value is non-finite.
    pub fn set_drought(&mut self, level: f32) -> Result<(), SimulationError> {
        let level = ensure_finite("drought_level", level)?;
        self.drought_level = clamp_logged("drought_level", level, 0.0, 1.0);
        Ok(())
    }

    /// Set the drought level from a 0-100 percentage.
    ///
    /// # Errors
    ///
    /// Returns [`SimulationError::InvalidParameter`] if the value is non-finite.
    pub fn set_drought_percent(&mut self, level: Percent) -> Result<(), SimulationError> {
        self.set_drought(level.to_fraction())
    }
}
