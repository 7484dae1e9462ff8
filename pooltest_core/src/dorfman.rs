//! Dorfman two-stage pooled testing.
//!
//! Individuals are split into `vials` groups of `samples_per_vial`. Each vial
//! is screened with one test; a positive vial has every member retested
//! individually.
//!
//! # Vial lifecycle
//!
//! ```text
//!              positive screen
//!  Screened ──────────────────► Retested   (1 + s tests)
//!      │
//!      └──────────────────────► Done       (1 test)
//!              negative screen
//! ```

use crate::error::ConfigError;
use crate::sampler::Prevalence;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Where a vial is in the screen-then-retest protocol.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VialState {
    /// Pool test done, result known
    Screened { positive: bool },

    /// Members retested individually (terminal)
    Retested,

    /// Negative screen, members cleared (terminal)
    Done,
}

impl VialState {
    /// Takes the single transition out of `Screened`. Terminal states stay put.
    pub fn advance(self) -> Self {
        match self {
            VialState::Screened { positive: true } => VialState::Retested,
            VialState::Screened { positive: false } => VialState::Done,
            terminal => terminal,
        }
    }

    pub fn is_terminal(self) -> bool {
        !matches!(self, VialState::Screened { .. })
    }
}

/// A Dorfman design: `samples_per_vial` individuals in each of `vials` vials.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "DesignShape")]
pub struct DorfmanDesign {
    samples_per_vial: usize,
    vials: usize,
}

#[derive(Deserialize)]
struct DesignShape {
    samples_per_vial: usize,
    vials: usize,
}

impl TryFrom<DesignShape> for DorfmanDesign {
    type Error = ConfigError;

    fn try_from(shape: DesignShape) -> Result<Self, Self::Error> {
        DorfmanDesign::new(shape.samples_per_vial, shape.vials)
    }
}

impl DorfmanDesign {
    /// Creates a design; both sizes must be at least 1.
    pub fn new(samples_per_vial: usize, vials: usize) -> Result<Self, ConfigError> {
        if samples_per_vial == 0 {
            return Err(ConfigError::non_positive("samples_per_vial", samples_per_vial));
        }
        if vials == 0 {
            return Err(ConfigError::non_positive("vials", vials));
        }
        // Worst case charges v * (1 + s) tests
        let worst = samples_per_vial.checked_add(1).and_then(|n| n.checked_mul(vials));
        if worst.is_none() {
            return Err(ConfigError::TooLarge {
                parameter: "vials",
                value: vials,
                limit: usize::MAX / samples_per_vial.saturating_add(1),
            });
        }
        Ok(Self { samples_per_vial, vials })
    }

    pub fn samples_per_vial(&self) -> usize {
        self.samples_per_vial
    }

    pub fn vials(&self) -> usize {
        self.vials
    }

    /// Total individuals covered by one batch.
    pub fn individuals(&self) -> usize {
        self.samples_per_vial * self.vials
    }

    /// Cost when every vial screens negative.
    pub fn min_cost(&self) -> u64 {
        self.vials as u64
    }

    /// Cost when every vial screens positive.
    pub fn max_cost(&self) -> u64 {
        self.vials as u64 * (1 + self.samples_per_vial as u64)
    }

    /// Closed-form mean cost: `v * (1 + s * (1 - (1 - p)^s))`.
    pub fn expected_cost(&self, p: Prevalence) -> f64 {
        let s = self.samples_per_vial as f64;
        let vial_positive = 1.0 - (1.0 - p.value()).powi(self.samples_per_vial as i32);
        self.vials as f64 * (1.0 + s * vial_positive)
    }

    /// Screens one vial: draws every member's status and reports the pool result.
    pub fn screen_vial<R: Rng + ?Sized>(&self, rng: &mut R, p: Prevalence) -> VialState {
        let positives = (0..self.samples_per_vial).filter(|_| p.draw(rng)).count();
        VialState::Screened { positive: positives > 0 }
    }

    /// Tests charged for a vial that has reached `state`.
    pub fn tests_for(&self, state: VialState) -> u64 {
        match state {
            VialState::Retested => 1 + self.samples_per_vial as u64,
            VialState::Screened { .. } | VialState::Done => 1,
        }
    }

    /// Runs one batch and returns the number of PCR tests consumed.
    pub fn cost<R: Rng + ?Sized>(&self, rng: &mut R, p: Prevalence) -> u64 {
        (0..self.vials)
            .map(|_| self.tests_for(self.screen_vial(rng, p).advance()))
            .sum()
    }

    /// Runs `trials` batches and returns the cost of each.
    pub fn simulate<R: Rng + ?Sized>(&self, rng: &mut R, p: Prevalence, trials: usize) -> Vec<u64> {
        (0..trials).map(|_| self.cost(rng, p)).collect()
    }
}

impl fmt::Display for DorfmanDesign {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.samples_per_vial, self.vials)
    }
}

impl std::str::FromStr for DorfmanDesign {
    type Err = String;

    /// Parses `s,v` (e.g. `16,24`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (samples, vials) = s
            .split_once(',')
            .ok_or_else(|| format!("Expected `samples,vials`, got `{}`", s))?;
        let samples: usize = samples
            .trim()
            .parse()
            .map_err(|_| format!("Invalid samples per vial: `{}`", samples))?;
        let vials: usize = vials
            .trim()
            .parse()
            .map_err(|_| format!("Invalid vial count: `{}`", vials))?;
        DorfmanDesign::new(samples, vials).map_err(|e| e.to_string())
    }
}
