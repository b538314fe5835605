//! Error types for the simulation core
//!
//! Every fallible operation in the crate reports a [`SimulationError`]. Parameter
//! errors are always returned synchronously to the caller; nothing is swallowed
//! except the documented degenerate fractal estimate, which the estimator maps
//! to `0.0` on the infallible path.

use std::fmt;

/// Coarse classification of a [`SimulationError`].
///
/// Clients that only need to branch on the failure kind can match on this
/// instead of the full error payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SimulationErrorCode {
    /// Setter or constructor received a malformed or out-of-domain value
    InvalidParameter,
    /// Vegetation name not present in the catalog
    UnknownVegetation,
    /// Box counting produced fewer than two usable scales
    DegenerateEstimate,
}

impl fmt::Display for SimulationErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Self::InvalidParameter => "invalid parameter",
            Self::UnknownVegetation => "unknown vegetation",
            Self::DegenerateEstimate => "degenerate fractal estimate",
        };
        f.write_str(text)
    }
}

/// Error returned by the simulation core.
#[derive(Debug, Clone, PartialEq)]
pub enum SimulationError {
    /// A parameter was rejected before it could reach the grid.
    InvalidParameter {
        /// Name of the offending parameter (e.g. `"humidity"`)
        name: &'static str,
        /// Human-readable reason
        reason: String,
    },
    /// The requested vegetation type is not in the catalog.
    UnknownVegetation(String),
    /// Fewer than two box sizes produced a non-empty count.
    DegenerateEstimate {
        /// Number of usable `(log size, log count)` pairs
        usable_scales: usize,
    },
}

impl SimulationError {
    /// Create an error for a non-finite floating point input.
    ///
    /// # Arguments
    /// * `name` - Parameter name as exposed on the public setter
    /// * `value` - The rejected value
    pub fn non_finite(name: &'static str, value: f32) -> Self {
        Self::InvalidParameter {
            name,
            reason: format!("must be finite, got {value}"),
        }
    }

    /// Create an error for an invalid parameter with a custom message.
    pub fn invalid_parameter(name: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidParameter {
            name,
            reason: reason.into(),
        }
    }

    /// Create an error for an unknown vegetation name.
    pub fn unknown_vegetation(name: &str) -> Self {
        Self::UnknownVegetation(name.to_owned())
    }

    /// Returns the coarse error code.
    pub fn code(&self) -> SimulationErrorCode {
        match self {
            Self::InvalidParameter { .. } => SimulationErrorCode::InvalidParameter,
            Self::UnknownVegetation(_) => SimulationErrorCode::UnknownVegetation,
            Self::DegenerateEstimate { .. } => SimulationErrorCode::DegenerateEstimate,
        }
    }
}

impl fmt::Display for SimulationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidParameter { name, reason } => {
                write!(f, "Parameter '{name}': {reason}")
            }
            Self::UnknownVegetation(name) => {
                write!(f, "Vegetation type '{name}' is not in the catalog")
            }
            Self::DegenerateEstimate { usable_scales } => write!(
                f,
                "Fractal estimate needs at least 2 usable scales, got {usable_scales}"
            ),
        }
    }
}

impl std::error::Error for SimulationError {}

/// Reject NaN and infinities before they can reach a grid array.
pub(crate) fn ensure_finite(name: &'static str, value: f32) -> Result<f32, SimulationError> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(SimulationError::non_finite(name, value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        assert_eq!(
            SimulationError::non_finite("humidity", f32::NAN).code(),
            SimulationErrorCode::InvalidParameter
        );
        assert_eq!(
            SimulationError::unknown_vegetation("Palm").code(),
            SimulationErrorCode::UnknownVegetation
        );
        assert_eq!(
            SimulationError::DegenerateEstimate { usable_scales: 1 }.code(),
            SimulationErrorCode::DegenerateEstimate
        );
    }

    #[test]
    fn test_error_messages() {
        let err = SimulationError::unknown_vegetation("Palm");
        assert_eq!(err.to_string(), "Vegetation type 'Palm' is not in the catalog");

        let err = SimulationError::non_finite("wind_strength", f32::INFINITY);
        assert_eq!(err.to_string(), "Parameter 'wind_strength': must be finite, got inf");
    }

    #[test]
    fn test_ensure_finite() {
        assert_eq!(ensure_finite("x", 0.5), Ok(0.5));
        assert!(ensure_finite("x", f32::NAN).is_err());
        assert!(ensure_finite("x", f32::NEG_INFINITY).is_err());
    }
}
