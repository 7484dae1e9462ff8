//! Bernoulli sampling of individual infection status.

use crate::error::ConfigError;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Draws one Bernoulli(p) outcome from a uniform `[0, 1)` draw.
///
/// Values of `p` outside `[0, 1]` behave as if clamped: `p <= 0` never
/// yields true and `p >= 1` always does.
#[inline]
pub fn draw<R: Rng + ?Sized>(rng: &mut R, p: f64) -> bool {
    rng.gen::<f64>() < p
}

/// A per-individual prevalence, guaranteed to lie in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(try_from = "f64", into = "f64")]
pub struct Prevalence(f64);

impl Prevalence {
    pub const ZERO: Prevalence = Prevalence(0.0);
    pub const ONE: Prevalence = Prevalence(1.0);

    /// Validates a raw probability.
    pub fn new(p: f64) -> Result<Self, ConfigError> {
        if (0.0..=1.0).contains(&p) {
            Ok(Self(p))
        } else {
            Err(ConfigError::InvalidProbability(p))
        }
    }

    /// Returns the raw probability.
    pub fn value(self) -> f64 {
        self.0
    }

    /// Draws one outcome at this prevalence.
    #[inline]
    pub fn draw<R: Rng + ?Sized>(self, rng: &mut R) -> bool {
        draw(rng, self.0)
    }
}

impl TryFrom<f64> for Prevalence {
    type Error = ConfigError;

    fn try_from(p: f64) -> Result<Self, Self::Error> {
        Self::new(p)
    }
}

impl From<Prevalence> for f64 {
    fn from(p: Prevalence) -> f64 {
        p.0
    }
}

impl fmt::Display for Prevalence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
