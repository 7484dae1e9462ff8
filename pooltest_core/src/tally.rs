//! Confusion tallies: inferred results scored against ground truth.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign};

/// Which cell of the confusion matrix one individual lands in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    TruePositive,
    FalsePositive,
    FalseNegative,
    TrueNegative,
}

impl Outcome {
    /// Classifies an inferred result against the true status.
    pub fn classify(truth: bool, inferred: bool) -> Self {
        match (truth, inferred) {
            (true, true) => Outcome::TruePositive,
            (false, true) => Outcome::FalsePositive,
            (true, false) => Outcome::FalseNegative,
            (false, false) => Outcome::TrueNegative,
        }
    }
}

/// Accumulated (TP, FP, FN, TN) counts over one or more trials.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ConfusionTally {
    pub true_positives: u64,
    pub false_positives: u64,
    pub false_negatives: u64,
    pub true_negatives: u64,
}

impl ConfusionTally {
    pub fn new(true_positives: u64, false_positives: u64, false_negatives: u64, true_negatives: u64) -> Self {
        Self {
            true_positives,
            false_positives,
            false_negatives,
            true_negatives,
        }
    }

    /// Counts one individual.
    pub fn record(&mut self, outcome: Outcome) {
        match outcome {
            Outcome::TruePositive => self.true_positives += 1,
            Outcome::FalsePositive => self.false_positives += 1,
            Outcome::FalseNegative => self.false_negatives += 1,
            Outcome::TrueNegative => self.true_negatives += 1,
        }
    }

    /// Individuals scored, i.e. N times the number of trials.
    pub fn total(&self) -> u64 {
        self.true_positives + self.false_positives + self.false_negatives + self.true_negatives
    }

    /// `(TP, FP, FN, TN)`.
    pub fn as_tuple(&self) -> (u64, u64, u64, u64) {
        (
            self.true_positives,
            self.false_positives,
            self.false_negatives,
            self.true_negatives,
        )
    }

    /// False positives as a share of everyone scored.
    pub fn false_positive_rate(&self) -> f64 {
        ratio(self.false_positives, self.total())
    }

    /// True positives as a share of everyone scored.
    pub fn true_positive_rate(&self) -> f64 {
        ratio(self.true_positives, self.total())
    }

    /// Share of inferred positives that are real, 0 with no inferred positives.
    pub fn positive_predictive_value(&self) -> f64 {
        ratio(self.true_positives, self.true_positives + self.false_positives)
    }
}

fn ratio(num: u64, den: u64) -> f64 {
    if den > 0 {
        num as f64 / den as f64
    } else {
        0.0
    }
}

impl AddAssign for ConfusionTally {
    fn add_assign(&mut self, rhs: Self) {
        self.true_positives += rhs.true_positives;
        self.false_positives += rhs.false_positives;
        self.false_negatives += rhs.false_negatives;
        self.true_negatives += rhs.true_negatives;
    }
}

impl Add for ConfusionTally {
    type Output = Self;

    fn add(mut self, rhs: Self) -> Self {
        self += rhs;
        self
    }
}

impl Sum for ConfusionTally {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::default(), Add::add)
    }
}

impl fmt::Display for ConfusionTally {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "True Positive  = {}", self.true_positives)?;
        writeln!(f, "False Positive = {}", self.false_positives)?;
        writeln!(f, "False Negative = {}", self.false_negatives)?;
        write!(f, "True Negative  = {}", self.true_negatives)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_all_cells() {
        assert_eq!(Outcome::classify(true, true), Outcome::TruePositive);
        assert_eq!(Outcome::classify(false, true), Outcome::FalsePositive);
        assert_eq!(Outcome::classify(true, false), Outcome::FalseNegative);
        assert_eq!(Outcome::classify(false, false), Outcome::TrueNegative);
    }

    #[test]
    fn test_record_and_total() {
        let mut tally = ConfusionTally::default();
        tally.record(Outcome::TruePositive);
        tally.record(Outcome::FalsePositive);
        tally.record(Outcome::TrueNegative);
        tally.record(Outcome::TrueNegative);
        assert_eq!(tally.as_tuple(), (1, 1, 0, 2));
        assert_eq!(tally.total(), 4);
    }

    #[test]
    fn test_sum() {
        let tallies = vec![ConfusionTally::new(1, 2, 0, 3), ConfusionTally::new(4, 0, 0, 1)];
        let total: ConfusionTally = tallies.into_iter().sum();
        assert_eq!(total, ConfusionTally::new(5, 2, 0, 4));
    }

    #[test]
    fn test_rates() {
        let tally = ConfusionTally::new(3, 1, 0, 96);
        assert_eq!(tally.false_positive_rate(), 0.01);
        assert_eq!(tally.true_positive_rate(), 0.03);
        assert_eq!(tally.positive_predictive_value(), 0.75);

        let empty = ConfusionTally::default();
        assert_eq!(empty.false_positive_rate(), 0.0);
        assert_eq!(empty.positive_predictive_value(), 0.0);
    }

    #[test]
    fn test_display() {
        let text = ConfusionTally::new(1, 2, 0, 3).to_string();
        assert!(text.contains("False Positive = 2"));
        assert!(text.ends_with("True Negative  = 3"));
    }
}
