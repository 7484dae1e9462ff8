//! Pooltest Core - Monte-Carlo evaluation of group-testing designs
//!
//! Three strategies for finding the rare positives in a batch:
//! 1. **Exhaustive**: one test per individual, the cost baseline
//! 2. **Dorfman**: screen vials of `s` samples, retest members of positive vials
//! 3. **Combinatorial**: split every sample across overlapping pools and call
//!    an individual positive when all its pools are positive (P-BEST)
//!
//! Every engine takes its random source as an argument; [`TrialPlan`] expands
//! one master seed into independent per-trial streams and runs them in
//! parallel.

pub mod assignment;
pub mod combinatorial;
pub mod dorfman;
pub mod error;
pub mod exhaustive;
pub mod monte_carlo;
pub mod overlap;
pub mod rng;
pub mod sampler;
pub mod stats;
pub mod tally;

// Re-export key types for convenience
pub use assignment::{PoolAssignment, PoolSet};
pub use combinatorial::{accumulate, classify, Trial};
pub use dorfman::{DorfmanDesign, VialState};
pub use error::{ConfigError, ParseError, PoolError};
pub use exhaustive::{count_positives, ExhaustiveDesign};
pub use monte_carlo::TrialPlan;
pub use overlap::overlap_counts;
pub use sampler::Prevalence;
pub use stats::{mean, DistributionSummary};
pub use tally::{ConfusionTally, Outcome};
