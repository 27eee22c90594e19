//! Construction errors for generators
//!
//! Only constructors can fail. Once a generator exists, every operation on it
//! is total: arithmetic wraps and PRF evaluation cannot fail.

use thiserror::Error;

/// Errors that can occur while constructing a generator
#[derive(Debug, Error, PartialEq)]
pub enum GeneratorError {
    #[error("Invalid domain: size must be positive, got {max}")]
    InvalidDomain { max: i64 },

    #[error("Invalid source: sequence is not seeded")]
    InvalidSource,

    #[error("Invalid parameter: {name} = {value} ({reason})")]
    InvalidParameter {
        name: &'static str,
        value: f64,
        reason: &'static str,
    },
}
