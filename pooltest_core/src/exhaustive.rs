//! Exhaustive per-individual testing.
//!
//! The baseline every pooled strategy is compared against: one test per
//! individual, always exactly N tests, no false positives or negatives.

use crate::sampler::Prevalence;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Draws `individuals` independent outcomes and counts the positives.
///
/// The result lies in `[0, individuals]`; its mean converges to `N * p`.
pub fn count_positives<R: Rng + ?Sized>(rng: &mut R, p: Prevalence, individuals: usize) -> usize {
    (0..individuals).filter(|_| p.draw(rng)).count()
}

/// A batch tested one individual at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExhaustiveDesign {
    individuals: usize,
}

impl Default for ExhaustiveDesign {
    /// One 384-well plate.
    fn default() -> Self {
        Self { individuals: 384 }
    }
}

impl ExhaustiveDesign {
    /// Creates a design for a batch of the given size. An empty batch is
    /// valid and finds no positives at no cost.
    pub fn new(individuals: usize) -> Self {
        Self { individuals }
    }

    /// Batch size.
    pub fn individuals(&self) -> usize {
        self.individuals
    }

    /// Tests consumed per batch, independent of prevalence.
    pub fn cost(&self) -> u64 {
        self.individuals as u64
    }

    /// Runs one batch and returns the number of positives found.
    pub fn run<R: Rng + ?Sized>(&self, rng: &mut R, p: Prevalence) -> usize {
        count_positives(rng, p, self.individuals)
    }

    /// Runs `trials` batches and returns the positive count of each.
    pub fn simulate<R: Rng + ?Sized>(&self, rng: &mut R, p: Prevalence, trials: usize) -> Vec<usize> {
        (0..trials).map(|_| self.run(rng, p)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::seeded;
    use crate::stats::mean;
    use proptest::prelude::*;

    #[test]
    fn test_extremes() {
        let mut rng = seeded(42);
        assert_eq!(count_positives(&mut rng, Prevalence::ZERO, 384), 0);
        assert_eq!(count_positives(&mut rng, Prevalence::ONE, 384), 384);
    }

    #[test]
    fn test_zero_individuals() {
        let mut rng = seeded(42);
        assert_eq!(count_positives(&mut rng, Prevalence::ONE, 0), 0);

        let empty = ExhaustiveDesign::new(0);
        assert_eq!(empty.cost(), 0);
        assert_eq!(empty.simulate(&mut rng, Prevalence::ONE, 5), vec![0; 5]);
    }

    #[test]
    fn test_cost_is_batch_size() {
        let design = ExhaustiveDesign::default();
        assert_eq!(design.cost(), 384);
        assert_eq!(design.individuals(), 384);
    }

    #[test]
    fn test_mean_converges() {
        let mut rng = seeded(7);
        let design = ExhaustiveDesign::default();
        let p = Prevalence::new(0.02).unwrap();
        let counts = design.simulate(&mut rng, p, 2000);
        assert_eq!(counts.len(), 2000);
        // N * p = 7.68, standard error of the mean ~0.06
        assert!((mean(&counts) - 7.68).abs() < 0.3);
    }

    #[test]
    fn test_zero_trials() {
        let mut rng = seeded(7);
        let counts = ExhaustiveDesign::default().simulate(&mut rng, Prevalence::ONE, 0);
        assert!(counts.is_empty());
    }

    proptest! {
        #[test]
        fn prop_count_in_range(seed in any::<u64>(), p in 0.0f64..=1.0, n in 0usize..500) {
            let mut rng = seeded(seed);
            let count = count_positives(&mut rng, Prevalence::new(p).unwrap(), n);
            prop_assert!(count <= n);
        }
    }
}
