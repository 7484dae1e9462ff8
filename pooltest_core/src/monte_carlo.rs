//! Seeded, parallel batch runs.
//!
//! Trial `t` of a run always draws from `trial_rng(seed, t)`, so the output
//! of a [`TrialPlan`] is identical whether it runs on one thread or many.

use crate::assignment::PoolAssignment;
use crate::combinatorial;
use crate::dorfman::DorfmanDesign;
use crate::exhaustive::ExhaustiveDesign;
use crate::rng::trial_rng;
use crate::sampler::Prevalence;
use crate::tally::ConfusionTally;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

/// How many trials to run and which master seed to draw them from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrialPlan {
    pub seed: u64,
    pub trials: usize,
}

impl TrialPlan {
    pub fn new(seed: u64, trials: usize) -> Self {
        Self { seed, trials }
    }

    /// Runs `trial` once per trial index, in parallel, preserving order.
    pub fn map<T, F>(&self, trial: F) -> Vec<T>
    where
        T: Send,
        F: Fn(&mut crate::rng::TrialRng) -> T + Sync,
    {
        (0..self.trials)
            .into_par_iter()
            .map(|t| trial(&mut trial_rng(self.seed, t as u64)))
            .collect()
    }

    /// Positive count of every exhaustive batch.
    pub fn positive_counts(&self, design: &ExhaustiveDesign, p: Prevalence) -> Vec<usize> {
        self.map(|rng| design.run(rng, p))
    }

    /// Test cost of every Dorfman batch.
    pub fn dorfman_costs(&self, design: &DorfmanDesign, p: Prevalence) -> Vec<u64> {
        self.map(|rng| design.cost(rng, p))
    }

    /// Summed confusion tally over all combinatorial trials.
    pub fn accumulate(&self, assignment: &PoolAssignment, p: Prevalence) -> ConfusionTally {
        (0..self.trials)
            .into_par_iter()
            .map(|t| combinatorial::classify(&mut trial_rng(self.seed, t as u64), p, assignment))
            .reduce(ConfusionTally::default, |a, b| a + b)
    }
}
