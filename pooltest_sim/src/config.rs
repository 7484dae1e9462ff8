//! Sweep configuration.

use pooltest_core::{ConfigError, DorfmanDesign, PoolAssignment, PoolError, Prevalence};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Where the combinatorial design comes from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DesignSource {
    /// Built-in GF(8) polynomial plate layout
    Polynomial {
        individuals: usize,
        pools_per_individual: usize,
    },

    /// Pool-assignment table on disk
    File {
        path: PathBuf,
        /// Wells on the plate; pool ids must stay below this
        pool_count: Option<usize>,
    },
}

impl Default for DesignSource {
    /// 384 samples, 48 pools, 6 pools per sample.
    fn default() -> Self {
        DesignSource::Polynomial {
            individuals: 384,
            pools_per_individual: 6,
        }
    }
}

impl DesignSource {
    /// Builds or loads the assignment.
    pub fn load(&self) -> Result<PoolAssignment, PoolError> {
        match self {
            DesignSource::Polynomial {
                individuals,
                pools_per_individual,
            } => Ok(PoolAssignment::polynomial(*individuals, *pools_per_individual)?),
            DesignSource::File { path, pool_count } => {
                let assignment = PoolAssignment::from_path(path)?;
                match pool_count {
                    Some(count) => Ok(assignment.constrain_pool_count(*count)?),
                    None => Ok(assignment),
                }
            }
        }
    }
}

/// Configuration for a sweep run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SweepConfig {
    /// Master seed for determinism
    pub seed: u64,

    /// Trials per (strategy, design, probability) point
    pub trials: usize,

    /// Batch size for exhaustive testing
    pub basic_individuals: usize,

    /// Prevalence grid for exhaustive testing
    pub basic_probabilities: Vec<f64>,

    /// Dorfman designs to compare
    pub dorfman_designs: Vec<DorfmanDesign>,

    /// Prevalence grid for Dorfman testing
    pub dorfman_probabilities: Vec<f64>,

    /// Combinatorial design
    pub pool_design: DesignSource,

    /// Prevalence grid for combinatorial testing
    pub pbest_probabilities: Vec<f64>,
}

impl Default for SweepConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            trials: 1000,
            basic_individuals: 384,
            basic_probabilities: vec![0.0002, 0.002, 0.02],
            dorfman_designs: default_dorfman_designs(),
            dorfman_probabilities: (-5..=2).map(|i| 0.02 * 2f64.powi(i)).collect(),
            pool_design: DesignSource::default(),
            pbest_probabilities: (0..=16).map(|i| 0.001 * i as f64).collect(),
        }
    }
}

/// The three 384-sample layouts `(16,24) (8,48) (4,96)`.
pub fn default_dorfman_designs() -> Vec<DorfmanDesign> {
    [(16, 24), (8, 48), (4, 96)]
        .into_iter()
        .filter_map(|(s, v)| DorfmanDesign::new(s, v).ok())
        .collect()
}

impl SweepConfig {
    /// Replaces every prevalence grid with the same points.
    pub fn with_probabilities(mut self, probabilities: Vec<f64>) -> Self {
        self.basic_probabilities = probabilities.clone();
        self.dorfman_probabilities = probabilities.clone();
        self.pbest_probabilities = probabilities;
        self
    }

    /// Checks every parameter before any trial runs.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.dorfman_designs.is_empty() {
            return Err(ConfigError::EmptySweep("Dorfman designs"));
        }
        for design in &self.dorfman_designs {
            DorfmanDesign::new(design.samples_per_vial(), design.vials())?;
        }
        for grid in [
            &self.basic_probabilities,
            &self.dorfman_probabilities,
            &self.pbest_probabilities,
        ] {
            if grid.is_empty() {
                return Err(ConfigError::EmptySweep("probabilities"));
            }
            parse_grid(grid)?;
        }
        Ok(())
    }
}

/// Validates a prevalence grid.
pub fn parse_grid(grid: &[f64]) -> Result<Vec<Prevalence>, ConfigError> {
    grid.iter().map(|&p| Prevalence::new(p)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        let config = SweepConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.dorfman_probabilities.len(), 8);
        assert!((config.dorfman_probabilities[0] - 0.000625).abs() < 1e-12);
        assert!((config.dorfman_probabilities[7] - 0.08).abs() < 1e-12);
        assert_eq!(config.pbest_probabilities.len(), 17);
        assert_eq!(config.dorfman_designs.len(), 3);
    }

    #[test]
    fn test_rejects_bad_probability() {
        let config = SweepConfig::default().with_probabilities(vec![0.1, 1.2]);
        assert_eq!(config.validate(), Err(ConfigError::InvalidProbability(1.2)));
    }

    #[test]
    fn test_rejects_empty_sweeps() {
        let config = SweepConfig::default().with_probabilities(vec![]);
        assert_eq!(config.validate(), Err(ConfigError::EmptySweep("probabilities")));

        let config = SweepConfig {
            dorfman_designs: vec![],
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_zero_trials_is_valid() {
        let config = SweepConfig {
            trials: 0,
            ..Default::default()
        };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_zero_individuals_is_valid() {
        let config = SweepConfig {
            basic_individuals: 0,
            ..Default::default()
        };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_default_design_loads() {
        let design = DesignSource::default().load().unwrap();
        assert_eq!(design.len(), 384);
        assert_eq!(design.pool_count(), 48);
    }
}
