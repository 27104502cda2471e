use thiserror::Error;

/// Parameter combinations that would corrupt every evaluation of a run.
#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("layer count must be at least 1")]
    NoLayers,
    #[error("die outline must have positive extent, got {width} x {height}")]
    InvalidDieOutline { width: f64, height: f64 },
    #[error("impulse factor must be positive, got {0}")]
    InvalidImpulseFactor(f64),
    #[error("mask boundary value must be positive, got {0}")]
    InvalidBoundaryValue(f64),
    #[error(
        "mask boundary value {boundary} must be smaller than the impulse factor {impulse}; \
         the mask cannot be fitted otherwise"
    )]
    BoundaryNotBelowImpulse { boundary: f64, impulse: f64 },
    #[error("{name} must lie within [{min}, {max}], got {value}")]
    OutOfRange {
        name: &'static str,
        value: f64,
        min: f64,
        max: f64,
    },
}
