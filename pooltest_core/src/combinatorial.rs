//! Combinatorial multi-pool testing (P-BEST style).
//!
//! Each individual is split across several overlapping pools. A pool tests
//! positive if any member is positive, and an individual is called positive
//! only when every one of its pools is positive.
//!
//! A positive individual marks all of its own pools positive, so it is always
//! called positive: false negatives cannot occur. False positives come from
//! collisions, where every pool of a negative individual also holds some
//! positive one.

use crate::assignment::{PoolAssignment, PoolSet};
use crate::sampler::Prevalence;
use crate::tally::{ConfusionTally, Outcome};
use rand::Rng;

/// All per-trial state of one simulated plate.
///
/// `truth` and `inferred` always have one entry per individual.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Trial {
    truth: Vec<bool>,
    pool_status: Vec<bool>,
    inferred: Vec<bool>,
}

impl Trial {
    /// True infection status per individual
    pub fn truth(&self) -> &[bool] {
        &self.truth
    }

    /// Observed result per pool
    pub fn pool_status(&self) -> &[bool] {
        &self.pool_status
    }

    /// Called result per individual
    pub fn inferred(&self) -> &[bool] {
        &self.inferred
    }

    /// Scores the inferred calls against ground truth.
    pub fn tally(&self) -> ConfusionTally {
        let mut tally = ConfusionTally::default();
        for (&truth, &inferred) in self.truth.iter().zip(&self.inferred) {
            tally.record(Outcome::classify(truth, inferred));
        }
        debug_assert_eq!(
            tally.false_negatives, 0,
            "positive individual called negative: pool status propagation is broken"
        );
        tally
    }
}

/// OR of member status per pool.
pub fn pool_status(assignment: &PoolAssignment, truth: &[bool]) -> Vec<bool> {
    let mut status = vec![false; assignment.pool_count()];
    for (set, &positive) in assignment.iter().zip(truth) {
        if positive {
            for pool in set.iter() {
                status[pool] = true;
            }
        }
    }
    status
}

/// AND of an individual's pool results.
///
/// An individual in no pools is called positive: nothing ruled it out.
pub fn infer_individual(pools: &PoolSet, pool_status: &[bool]) -> bool {
    if pools.is_empty() {
        return true;
    }
    pools.iter().all(|pool| pool_status[pool])
}

/// Called result for every individual.
pub fn infer(assignment: &PoolAssignment, pool_status: &[bool]) -> Vec<bool> {
    assignment
        .iter()
        .map(|pools| infer_individual(pools, pool_status))
        .collect()
}

/// Simulates one plate end to end, keeping the intermediate vectors.
pub fn run_trial<R: Rng + ?Sized>(rng: &mut R, p: Prevalence, assignment: &PoolAssignment) -> Trial {
    let truth: Vec<bool> = (0..assignment.len()).map(|_| p.draw(rng)).collect();
    let pool_status = pool_status(assignment, &truth);
    let inferred = infer(assignment, &pool_status);
    Trial {
        truth,
        pool_status,
        inferred,
    }
}

/// One trial's (TP, FP, FN, TN).
pub fn classify<R: Rng + ?Sized>(rng: &mut R, p: Prevalence, assignment: &PoolAssignment) -> ConfusionTally {
    run_trial(rng, p, assignment).tally()
}

/// Component-wise sum of `trials` independent [`classify`] runs.
pub fn accumulate<R: Rng + ?Sized>(
    rng: &mut R,
    p: Prevalence,
    assignment: &PoolAssignment,
    trials: usize,
) -> ConfusionTally {
    (0..trials).map(|_| classify(rng, p, assignment)).sum()
}
