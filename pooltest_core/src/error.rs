//! Error types for pool designs and simulation parameters.

use thiserror::Error;

/// Invalid simulation parameters, caught before any trial runs.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    /// Prevalence outside [0, 1] (or NaN)
    #[error("Invalid probability {0}: must lie in [0, 1]")]
    InvalidProbability(f64),

    /// A size parameter that must be at least 1
    #[error("Parameter `{parameter}` must be positive, got {value}")]
    NonPositive {
        parameter: &'static str,
        value: usize,
    },

    /// A size parameter beyond what the design can represent
    #[error("Parameter `{parameter}` is {value}, above the limit of {limit}")]
    TooLarge {
        parameter: &'static str,
        value: usize,
        limit: usize,
    },

    /// An individual references a pool that does not exist
    #[error("Individual {individual} references pool {pool}, but the design has {pool_count} pools")]
    PoolOutOfRange {
        individual: usize,
        pool: usize,
        pool_count: usize,
    },

    /// A sweep with nothing to evaluate
    #[error("Sweep has no {0} to evaluate")]
    EmptySweep(&'static str),
}

impl ConfigError {
    /// Creates a non-positive parameter error.
    pub fn non_positive(parameter: &'static str, value: usize) -> Self {
        Self::NonPositive { parameter, value }
    }
}

/// Malformed pool-assignment table.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// A pool token that is not a non-negative integer
    #[error("Line {line}: invalid pool id `{token}`")]
    InvalidPoolId { line: usize, token: String },
}

/// Any failure while building a pool design.
#[derive(Debug, Error)]
pub enum PoolError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error("Failed to read pool assignment: {0}")]
    Io(#[from] std::io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages_name_the_parameter() {
        let err = ConfigError::non_positive("vials", 0);
        assert_eq!(err.to_string(), "Parameter `vials` must be positive, got 0");

        let err = ConfigError::PoolOutOfRange { individual: 3, pool: 48, pool_count: 48 };
        assert!(err.to_string().contains("pool 48"));
    }

    #[test]
    fn test_pool_error_wraps_parse_error() {
        let err: PoolError = ParseError::InvalidPoolId { line: 2, token: "x".into() }.into();
        assert!(matches!(err, PoolError::Parse(_)));
        assert_eq!(err.to_string(), "Line 2: invalid pool id `x`");
    }
}
