//! Pooltest sweep harness
//!
//! Runs seeded Monte-Carlo studies of each testing strategy over a grid of
//! prevalences and collects the results for reporting or export:
//!
//! - **basic**: positives per batch under exhaustive testing
//! - **dorfman**: PCR cost of each two-stage design, and the cheapest per p
//! - **pbest**: confusion tally and false positive rate of a pool design
//! - **overlap**: how many pairs of samples share k pools
//!
//! # Usage
//!
//! ```ignore
//! use pooltest_sim::{SweepConfig, SweepRunner, StrategyId};
//!
//! let config = SweepConfig {
//!     seed: 42,
//!     trials: 5000,
//!     ..Default::default()
//! };
//!
//! let runner = SweepRunner::new(config)?;
//! let export = runner.run_all(&StrategyId::all())?;
//! export.print();
//! ```

mod config;
mod error;
mod exporter;
mod report;
mod runner;
pub mod strategies;

pub use config::{default_dorfman_designs, parse_grid, DesignSource, SweepConfig};
pub use error::SimError;
pub use exporter::{
    BasicPoint, BestDesign, DesignSummary, DorfmanPoint, PBestPoint, StudyResult, SweepExport,
};
pub use runner::{crossover, SweepRunner};
pub use strategies::StrategyId;
