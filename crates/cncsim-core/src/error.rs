//! Error handling for cncsim
//!
//! The simulation pipeline itself never fails: every anomaly inside it is
//! either recorded as a diagnostic/event or resolved with a documented
//! default. Errors only arise at the edges, when machine descriptors are
//! loaded or validated and when files are read or written.
//!
//! All error types use `thiserror` for ergonomic error handling.

use thiserror::Error;

/// Machine descriptor error type
///
/// Represents a machine descriptor that cannot be simulated faithfully.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MachineError {
    /// Axis travel range is inverted
    #[error("Axis {axis} has min {min} greater than max {max}")]
    InvertedTravel {
        /// The axis name.
        axis: String,
        /// Configured minimum travel.
        min: f64,
        /// Configured maximum travel.
        max: f64,
    },

    /// Axis velocity limit is zero, negative or not finite
    #[error("Axis {axis} has invalid max velocity {value}")]
    InvalidVelocity {
        /// The axis name.
        axis: String,
        /// The rejected velocity.
        value: f64,
    },

    /// Stock block dimensions cannot form a voxel grid
    #[error("Invalid stock: {reason}")]
    InvalidStock {
        /// Why the stock dimensions were rejected.
        reason: String,
    },

    /// Tool diameter is zero, negative or not finite
    #[error("Invalid tool diameter {diameter}")]
    InvalidTool {
        /// The rejected diameter.
        diameter: f64,
    },

    /// Fixture bounding box is inverted on at least one axis
    #[error("Fixture '{name}' has an inverted bounding box")]
    InvertedFixture {
        /// The fixture name.
        name: String,
    },
}

/// Main error type for cncsim
///
/// A unified error type that can represent any error raised at the
/// pipeline edges. This is the primary error type used in public APIs.
#[derive(Error, Debug)]
pub enum Error {
    /// Machine descriptor error
    #[error(transparent)]
    Machine(#[from] MachineError),

    /// Standard I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// TOML deserialization error
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),
}

impl Error {
    /// Check if this is a machine descriptor error
    pub fn is_machine_error(&self) -> bool {
        matches!(self, Error::Machine(_))
    }
}

/// Result type using Error
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_machine_error_display() {
        let err = MachineError::InvertedTravel {
            axis: "X".to_string(),
            min: 10.0,
            max: -10.0,
        };
        assert_eq!(err.to_string(), "Axis X has min 10 greater than max -10");

        let err = MachineError::InvalidTool { diameter: 0.0 };
        assert_eq!(err.to_string(), "Invalid tool diameter 0");
    }

    #[test]
    fn test_error_conversion() {
        let err: Error = MachineError::InvertedFixture {
            name: "vise".to_string(),
        }
        .into();
        assert!(err.is_machine_error());
        assert_eq!(err.to_string(), "Fixture 'vise' has an inverted bounding box");

        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "missing.json");
        let err: Error = io_err.into();
        assert!(matches!(err, Error::Io(_)));
        assert!(!err.is_machine_error());
    }
}
