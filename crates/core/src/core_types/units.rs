//! Semantic unit types for control-surface inputs
//!
//! The engine works internally on normalised scalars (humidity and drought as
//! fractions, wind as a dimensionless strength). Control clients usually think
//! in percentages and km/h, so these newtypes carry the conversion instead of
//! leaving magic divisors scattered across call sites.
//!
//! # Usage
//! ```
//! use aura_core::core_types::units::{KilometersPerHour, Percent};
//!
//! let humidity = Percent::new(25.0);
//! assert!((humidity.to_fraction() - 0.25).abs() < 1e-6);
//!
//! let wind = KilometersPerHour::new(30.0);
//! assert!((wind.to_wind_strength() - 0.6).abs() < 1e-6);
//! ```

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::ops::Deref;

/// Wind speed (km/h) that maps to a dimensionless strength of 1.0.
pub const KMH_PER_UNIT_STRENGTH: f32 = 50.0;

/// Upper bound of the wind speed control (km/h).
pub const MAX_WIND_KMH: f32 = 100.0;

/// Percentage (0-100)
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[repr(transparent)]
pub struct Percent(f32);

impl Eq for Percent {}

impl PartialOrd for Percent {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Percent {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.total_cmp(&other.0)
    }
}

impl Deref for Percent {
    type Target = f32;
    #[inline]
    fn deref(&self) -> &f32 {
        &self.0
    }
}

impl Percent {
    /// Create a new percentage
    #[inline]
    #[must_use]
    pub const fn new(value: f32) -> Self {
        Percent(value)
    }

    /// Convert to fraction (0-1), unclamped
    #[inline]
    #[must_use]
    pub fn to_fraction(self) -> f32 {
        self.0 / 100.0
    }
}

impl From<f32> for Percent {
    fn from(v: f32) -> Self {
        Percent(v)
    }
}

impl fmt::Display for Percent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.1}%", self.0)
    }
}

/// Wind speed in kilometres per hour
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[repr(transparent)]
pub struct KilometersPerHour(f32);

impl Eq for KilometersPerHour {}

impl PartialOrd for KilometersPerHour {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for KilometersPerHour {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.total_cmp(&other.0)
    }
}

impl Deref for KilometersPerHour {
    type Target = f32;
    #[inline]
    fn deref(&self) -> &f32 {
        &self.0
    }
}

impl KilometersPerHour {
    /// Create a new `KilometersPerHour` value.
    #[inline]
    #[must_use]
    pub const fn new(value: f32) -> Self {
        KilometersPerHour(value)
    }

    /// Convert to the dimensionless strength used by the spread rule.
    ///
    /// 50 km/h maps to 1.0, so the 0-100 km/h control covers strengths 0-2.
    #[inline]
    #[must_use]
    pub fn to_wind_strength(self) -> f32 {
        self.0 / KMH_PER_UNIT_STRENGTH
    }

    /// Inverse of [`to_wind_strength`](Self::to_wind_strength).
    #[inline]
    #[must_use]
    pub fn from_wind_strength(strength: f32) -> Self {
        KilometersPerHour(strength * KMH_PER_UNIT_STRENGTH)
    }
}

impl fmt::Display for KilometersPerHour {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.1} km/h", self.0)
    }
}
