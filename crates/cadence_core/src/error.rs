//! Error types
//!
//! The animation engine itself never fails: redundant or malformed calls
//! degrade to no-ops. Errors only arise where text or configuration is
//! turned into engine values.

use thiserror::Error;

/// Parsing and configuration errors
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CadenceError {
    /// Easing name not recognised
    #[error("Unknown easing function: {0}")]
    UnknownEasing(String),

    /// Event name not recognised
    #[error("Unknown animation event: {0}")]
    UnknownEvent(String),

    /// Duration must be a positive, finite number
    #[error("Invalid duration {0}: must be positive and finite")]
    InvalidDuration(f64),

    /// Numeric configuration value is NaN or infinite
    #[error("Invalid value for `{field}`: {value}")]
    InvalidValue { field: &'static str, value: f64 },

    /// Frame rate outside the supported range
    #[error("Invalid frame rate {0}: must be between 1 and 1000")]
    InvalidFrameRate(u32),
}

/// Result type for parsing and configuration
pub type Result<T> = std::result::Result<T, CadenceError>;

/// Check that a duration is usable as an animation length
pub fn validate_duration(duration: f64) -> Result<f64> {
    if duration.is_finite() && duration > 0.0 {
        Ok(duration)
    } else {
        Err(CadenceError::InvalidDuration(duration))
    }
}

/// Check that an optional numeric field holds a finite number
pub fn validate_finite(field: &'static str, value: Option<f64>) -> Result<Option<f64>> {
    match value {
        Some(v) if !v.is_finite() => Err(CadenceError::InvalidValue { field, value: v }),
        other => Ok(other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_duration() {
        assert_eq!(validate_duration(250.0), Ok(250.0));
        assert_eq!(validate_duration(0.0), Err(CadenceError::InvalidDuration(0.0)));
        assert!(validate_duration(-1.0).is_err());
        assert!(validate_duration(f64::INFINITY).is_err());
        assert!(validate_duration(f64::NAN).is_err());
    }

    #[test]
    fn test_validate_finite() {
        assert_eq!(validate_finite("from", None), Ok(None));
        assert_eq!(validate_finite("from", Some(3.0)), Ok(Some(3.0)));

        let err = validate_finite("to", Some(f64::INFINITY)).unwrap_err();
        assert_eq!(err.to_string(), "Invalid value for `to`: inf");
    }
}
