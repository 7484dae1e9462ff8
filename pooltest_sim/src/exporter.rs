//! JSON export of sweep results for external plotting.

use crate::strategies::StrategyId;
use pooltest_core::{ConfusionTally, DistributionSummary, DorfmanDesign};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::Write;

/// Exhaustive testing at one prevalence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BasicPoint {
    pub p: f64,

    /// Tests per batch (always the batch size)
    pub cost: u64,

    /// Positives found per batch
    pub positives: DistributionSummary,

    /// Width-1 histogram of positives per batch
    pub histogram: Vec<u64>,
}

/// Dorfman testing of one design at one prevalence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DorfmanPoint {
    pub p: f64,
    pub design: DorfmanDesign,

    /// Monte-Carlo cost distribution
    pub cost: DistributionSummary,

    /// Closed-form mean cost
    pub expected_cost: f64,

    /// Width-1 histogram of cost per batch
    pub histogram: Vec<u64>,
}

/// Lowest-mean-cost Dorfman design at one prevalence.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BestDesign {
    pub p: f64,
    pub design: DorfmanDesign,
    pub mean_cost: f64,
}

/// Combinatorial testing at one prevalence.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PBestPoint {
    pub p: f64,
    pub tally: ConfusionTally,

    /// FP / (TP + FP + FN + TN)
    pub false_positive_rate: f64,

    /// Mean true positives per plate
    pub mean_true_positives: f64,

    /// Mean false positives per plate
    pub mean_false_positives: f64,
}

/// Static properties of a combinatorial design.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DesignSummary {
    pub individuals: usize,
    pub pool_count: usize,
    pub max_pools_per_individual: usize,

    /// Bucket k: pairs of individuals sharing exactly k pools
    pub overlap: Vec<u64>,
}

/// The outcome of one study.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "strategy", rename_all = "snake_case")]
pub enum StudyResult {
    Basic {
        individuals: usize,
        points: Vec<BasicPoint>,
    },
    Dorfman {
        points: Vec<DorfmanPoint>,
        best: Vec<BestDesign>,
    },
    #[serde(rename = "pbest")]
    PBest {
        design: DesignSummary,
        points: Vec<PBestPoint>,
        /// Prevalence at which mean true and false positives are closest
        #[serde(skip_serializing_if = "Option::is_none")]
        crossover_p: Option<f64>,
    },
    Overlap {
        design: DesignSummary,
    },
}

impl StudyResult {
    pub fn strategy(&self) -> StrategyId {
        match self {
            StudyResult::Basic { .. } => StrategyId::Basic,
            StudyResult::Dorfman { .. } => StrategyId::Dorfman,
            StudyResult::PBest { .. } => StrategyId::PBest,
            StudyResult::Overlap { .. } => StrategyId::Overlap,
        }
    }
}

/// Complete sweep export.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SweepExport {
    /// Seed used
    pub seed: u64,

    /// Trials per point
    pub trials: usize,

    /// All studies, in run order
    pub studies: Vec<StudyResult>,
}

impl SweepExport {
    /// Creates a new export container.
    pub fn new(seed: u64, trials: usize) -> Self {
        Self {
            seed,
            trials,
            studies: Vec::new(),
        }
    }

    /// Adds a study.
    pub fn add_study(&mut self, study: StudyResult) {
        self.studies.push(study);
    }

    /// Serializes to pretty JSON.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    /// Writes to a JSON file.
    pub fn write_to_file(&self, path: &str) -> std::io::Result<()> {
        let json = self.to_json()?;
        let mut file = File::create(path)?;
        file.write_all(json.as_bytes())?;
        Ok(())
    }
}
