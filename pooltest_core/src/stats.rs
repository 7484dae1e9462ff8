//! Summaries of per-trial distributions.

use serde::{Deserialize, Serialize};

/// Integer per-trial outcomes (positive counts, test costs).
pub trait Count: Copy {
    fn as_u64(self) -> u64;
}

macro_rules! impl_count {
    ($($t:ty),*) => {
        $(impl Count for $t {
            #[inline]
            fn as_u64(self) -> u64 {
                self as u64
            }
        })*
    };
}

impl_count!(usize, u64);

/// Arithmetic mean, 0 for an empty slice.
pub fn mean<T: Count>(values: &[T]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let sum: u64 = values.iter().map(|v| v.as_u64()).sum();
    sum as f64 / values.len() as f64
}

/// Width-1 histogram over `0..=max(values)`; bin `k` counts the trials equal to `k`.
pub fn histogram<T: Count>(values: &[T]) -> Vec<u64> {
    let Some(max) = values.iter().map(|v| v.as_u64()).max() else {
        return Vec::new();
    };
    let mut bins = vec![0u64; max as usize + 1];
    for v in values {
        bins[v.as_u64() as usize] += 1;
    }
    bins
}

/// Location and spread of a per-trial distribution.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct DistributionSummary {
    pub trials: usize,
    pub mean: f64,
    pub std_dev: f64,
    pub min: u64,
    pub max: u64,
}

impl DistributionSummary {
    /// Summarizes a sample. An empty sample gives the all-zero summary.
    pub fn from_values<T: Count>(values: &[T]) -> Self {
        if values.is_empty() {
            return Self::default();
        }
        let mean = mean(values);
        let variance = values
            .iter()
            .map(|v| {
                let d = v.as_u64() as f64 - mean;
                d * d
            })
            .sum::<f64>()
            / values.len() as f64;
        let min = values.iter().map(|v| v.as_u64()).min().unwrap_or(0);
        let max = values.iter().map(|v| v.as_u64()).max().unwrap_or(0);
        Self {
            trials: values.len(),
            mean,
            std_dev: variance.sqrt(),
            min,
            max,
        }
    }
}
