//! Sweep runner - executes each study over its prevalence grid.

use crate::config::{parse_grid, SweepConfig};
use crate::error::SimError;
use crate::exporter::{
    BasicPoint, BestDesign, DesignSummary, DorfmanPoint, PBestPoint, StudyResult, SweepExport,
};
use crate::strategies::StrategyId;
use pooltest_core::rng::derive_seed;
use pooltest_core::stats::histogram;
use pooltest_core::{
    overlap_counts, DistributionSummary, ExhaustiveDesign, PoolAssignment, TrialPlan,
};
use tracing::{debug, info, warn};

/// Runs studies for one validated configuration.
pub struct SweepRunner {
    config: SweepConfig,

    /// Loaded once, shared read-only by every combinatorial trial
    pool_design: PoolAssignment,
}

impl SweepRunner {
    /// Validates the configuration and loads the pool design.
    pub fn new(config: SweepConfig) -> Result<Self, SimError> {
        config.validate()?;
        let pool_design = config.pool_design.load()?;
        if pool_design.is_empty() {
            warn!("Pool design has no individuals; combinatorial studies will be empty");
        }
        if config.trials == 0 {
            warn!("Zero trials requested; every distribution will be empty");
        }
        Ok(Self { config, pool_design })
    }

    pub fn config(&self) -> &SweepConfig {
        &self.config
    }

    pub fn pool_design(&self) -> &PoolAssignment {
        &self.pool_design
    }

    /// Runs every requested study and collects them into one export.
    pub fn run_all(&self, strategies: &[StrategyId]) -> Result<SweepExport, SimError> {
        let mut export = SweepExport::new(self.config.seed, self.config.trials);
        for &strategy in strategies {
            export.add_study(self.run(strategy)?);
        }
        Ok(export)
    }

    /// Runs one study and returns its result.
    pub fn run(&self, strategy: StrategyId) -> Result<StudyResult, SimError> {
        info!(
            "Starting study: {} (seed={}, trials={})",
            strategy.name(),
            self.config.seed,
            self.config.trials
        );
        let result = match strategy {
            StrategyId::Basic => self.run_basic()?,
            StrategyId::Dorfman => self.run_dorfman()?,
            StrategyId::PBest => self.run_pbest()?,
            StrategyId::Overlap => StudyResult::Overlap {
                design: self.design_summary(),
            },
        };
        info!("Finished study: {}", strategy.name());
        Ok(result)
    }

    /// Plan for point `index` of a study; every point gets its own seed.
    fn plan(&self, strategy: StrategyId, index: usize) -> TrialPlan {
        let study_seed = derive_seed(self.config.seed, strategy.salt());
        TrialPlan::new(derive_seed(study_seed, index as u64), self.config.trials)
    }

    fn run_basic(&self) -> Result<StudyResult, SimError> {
        let design = ExhaustiveDesign::new(self.config.basic_individuals);
        let grid = parse_grid(&self.config.basic_probabilities)?;

        let points = grid
            .iter()
            .enumerate()
            .map(|(i, &p)| {
                let counts = self.plan(StrategyId::Basic, i).positive_counts(&design, p);
                let positives = DistributionSummary::from_values(&counts);
                debug!("  basic p={} | mean positives={:.3}", p, positives.mean);
                BasicPoint {
                    p: p.value(),
                    cost: design.cost(),
                    positives,
                    histogram: histogram(&counts),
                }
            })
            .collect();

        Ok(StudyResult::Basic {
            individuals: design.individuals(),
            points,
        })
    }

    fn run_dorfman(&self) -> Result<StudyResult, SimError> {
        let grid = parse_grid(&self.config.dorfman_probabilities)?;
        let designs = &self.config.dorfman_designs;

        let mut points = Vec::with_capacity(grid.len() * designs.len());
        let mut best = Vec::with_capacity(grid.len());

        for (i, &p) in grid.iter().enumerate() {
            let mut cheapest: Option<BestDesign> = None;

            for (j, design) in designs.iter().enumerate() {
                let costs = self
                    .plan(StrategyId::Dorfman, i * designs.len() + j)
                    .dorfman_costs(design, p);
                let cost = DistributionSummary::from_values(&costs);
                debug!(
                    "  dorfman p={} design=({}) | mean cost={:.2}",
                    p, design, cost.mean
                );

                if cheapest.map_or(true, |b| cost.mean < b.mean_cost) {
                    cheapest = Some(BestDesign {
                        p: p.value(),
                        design: *design,
                        mean_cost: cost.mean,
                    });
                }

                points.push(DorfmanPoint {
                    p: p.value(),
                    design: *design,
                    cost,
                    expected_cost: design.expected_cost(p),
                    histogram: histogram(&costs),
                });
            }

            best.extend(cheapest);
        }

        Ok(StudyResult::Dorfman { points, best })
    }

    fn run_pbest(&self) -> Result<StudyResult, SimError> {
        let grid = parse_grid(&self.config.pbest_probabilities)?;
        let trials = self.config.trials as f64;

        let points: Vec<PBestPoint> = grid
            .iter()
            .enumerate()
            .map(|(i, &p)| {
                let tally = self.plan(StrategyId::PBest, i).accumulate(&self.pool_design, p);
                debug!(
                    "  pbest p={} | TP={} FP={} FN={} TN={}",
                    p,
                    tally.true_positives,
                    tally.false_positives,
                    tally.false_negatives,
                    tally.true_negatives
                );
                PBestPoint {
                    p: p.value(),
                    tally,
                    false_positive_rate: tally.false_positive_rate(),
                    mean_true_positives: per_trial(tally.true_positives, trials),
                    mean_false_positives: per_trial(tally.false_positives, trials),
                }
            })
            .collect();

        if let Some(point) = points.iter().find(|pt| pt.tally.false_negatives > 0) {
            warn!("False negatives at p={}: pool status propagation is broken", point.p);
        }

        Ok(StudyResult::PBest {
            design: self.design_summary(),
            crossover_p: crossover(&points),
            points,
        })
    }

    fn design_summary(&self) -> DesignSummary {
        DesignSummary {
            individuals: self.pool_design.len(),
            pool_count: self.pool_design.pool_count(),
            max_pools_per_individual: self.pool_design.max_pools_per_individual(),
            overlap: overlap_counts(&self.pool_design),
        }
    }
}

fn per_trial(count: u64, trials: f64) -> f64 {
    if trials > 0.0 {
        count as f64 / trials
    } else {
        0.0
    }
}

/// Prevalence at which mean true and false positives are closest.
///
/// Only points with at least one true positive count; ties go to the lower p.
pub fn crossover(points: &[PBestPoint]) -> Option<f64> {
    points
        .iter()
        .filter(|pt| pt.p > 0.0 && pt.tally.true_positives > 0)
        .min_by_key(|pt| pt.tally.true_positives.abs_diff(pt.tally.false_positives))
        .map(|pt| pt.p)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DesignSource;
    use pooltest_core::{ConfigError, ConfusionTally, DorfmanDesign};

    fn small_config() -> SweepConfig {
        SweepConfig {
            trials: 50,
            ..Default::default()
        }
    }

    #[test]
    fn test_rejects_invalid_config() {
        let config = SweepConfig::default().with_probabilities(vec![-0.5]);
        let err = SweepRunner::new(config).err().unwrap();
        assert!(matches!(
            err,
            SimError::Config(ConfigError::InvalidProbability(_))
        ));
    }

    #[test]
    fn test_basic_study_extremes() {
        let config = small_config().with_probabilities(vec![0.0, 1.0]);
        let runner = SweepRunner::new(config).unwrap();
        let StudyResult::Basic { individuals, points } = runner.run(StrategyId::Basic).unwrap() else {
            panic!("expected basic study");
        };
        assert_eq!(individuals, 384);
        assert_eq!(points[0].positives.max, 0);
        assert_eq!(points[1].positives.min, 384);
        assert_eq!(points[1].histogram[384], 50);
        assert!(points.iter().all(|pt| pt.cost == 384));
    }

    #[test]
    fn test_basic_study_empty_batch() {
        let config = SweepConfig {
            basic_individuals: 0,
            ..small_config()
        };
        let runner = SweepRunner::new(config).unwrap();
        let StudyResult::Basic { individuals, points } = runner.run(StrategyId::Basic).unwrap() else {
            panic!("expected basic study");
        };
        assert_eq!(individuals, 0);
        for pt in &points {
            assert_eq!(pt.cost, 0);
            assert_eq!(pt.positives.max, 0);
            assert_eq!(pt.histogram, vec![50]);
        }
    }

    #[test]
    fn test_pbest_study_reports_crossover_on_default_grid() {
        let runner = SweepRunner::new(small_config()).unwrap();
        let StudyResult::PBest { crossover_p, .. } = runner.run(StrategyId::PBest).unwrap() else {
            panic!("expected pbest study");
        };
        let p = crossover_p.expect("grid has points with true positives");
        assert!(p > 0.0 && p <= 0.016);
    }

    #[test]
    fn test_dorfman_study_bounds_and_best() {
        let config = small_config().with_probabilities(vec![0.0, 0.02, 1.0]);
        let runner = SweepRunner::new(config).unwrap();
        let StudyResult::Dorfman { points, best } = runner.run(StrategyId::Dorfman).unwrap() else {
            panic!("expected dorfman study");
        };
        assert_eq!(points.len(), 9);
        assert_eq!(best.len(), 3);
        for pt in &points {
            assert!(pt.cost.min >= pt.design.min_cost());
            assert!(pt.cost.max <= pt.design.max_cost());
        }
        // Fewest vials wins when nobody is sick
        assert_eq!(best[0].design, DorfmanDesign::new(16, 24).unwrap());
        assert_eq!(best[0].mean_cost, 24.0);
        // Also cheapest when everybody is sick: 24 * 17 = 408 < 48 * 9 < 96 * 5
        assert_eq!(best[2].design, DorfmanDesign::new(16, 24).unwrap());
    }

    #[test]
    fn test_pbest_study_extremes() {
        let config = small_config().with_probabilities(vec![0.0, 1.0]);
        let runner = SweepRunner::new(config).unwrap();
        let StudyResult::PBest { design, points, .. } = runner.run(StrategyId::PBest).unwrap() else {
            panic!("expected pbest study");
        };
        assert_eq!(design.pool_count, 48);
        assert_eq!(design.overlap.iter().sum::<u64>(), 384 * 383 / 2);
        assert_eq!(points[0].tally.as_tuple(), (0, 0, 0, 384 * 50));
        assert_eq!(points[1].tally.as_tuple(), (384 * 50, 0, 0, 0));
        assert_eq!(points[1].mean_true_positives, 384.0);
    }

    #[test]
    fn test_pbest_never_false_negative() {
        let config = small_config().with_probabilities(vec![0.005, 0.05, 0.3]);
        let runner = SweepRunner::new(config).unwrap();
        let StudyResult::PBest { points, .. } = runner.run(StrategyId::PBest).unwrap() else {
            panic!("expected pbest study");
        };
        assert!(points.iter().all(|pt| pt.tally.false_negatives == 0));
        assert!(points.iter().all(|pt| pt.tally.total() == 384 * 50));
    }

    #[test]
    fn test_runs_are_reproducible() {
        let strategies = StrategyId::all();
        let a = SweepRunner::new(small_config()).unwrap().run_all(&strategies).unwrap();
        let b = SweepRunner::new(small_config()).unwrap().run_all(&strategies).unwrap();
        assert_eq!(a, b);
        assert_eq!(a.studies.len(), 4);
    }

    #[test]
    fn test_zero_trials_gives_identity_results() {
        let config = SweepConfig {
            trials: 0,
            ..Default::default()
        };
        let runner = SweepRunner::new(config).unwrap();
        let StudyResult::PBest { points, .. } = runner.run(StrategyId::PBest).unwrap() else {
            panic!("expected pbest study");
        };
        assert!(points.iter().all(|pt| pt.tally == ConfusionTally::default()));
        assert!(points.iter().all(|pt| pt.mean_false_positives == 0.0));
    }

    #[test]
    fn test_file_design_is_checked_against_pool_count() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("pools.txt");
        std::fs::write(&path, "A1 0 1 2\nA2 2 3 4\nA3 4 5 50\n").unwrap();

        let config = SweepConfig {
            pool_design: DesignSource::File {
                path: path.clone(),
                pool_count: Some(48),
            },
            ..small_config()
        };
        assert!(matches!(SweepRunner::new(config), Err(SimError::Pool(_))));

        let config = SweepConfig {
            pool_design: DesignSource::File { path, pool_count: None },
            ..small_config()
        };
        let runner = SweepRunner::new(config).unwrap();
        let StudyResult::Overlap { design } = runner.run(StrategyId::Overlap).unwrap() else {
            panic!("expected overlap study");
        };
        assert_eq!(design.overlap, vec![1, 2, 0, 0]);
        assert_eq!(design.pool_count, 51);
    }

    #[test]
    fn test_crossover() {
        let point = |p: f64, tp: u64, fp: u64| PBestPoint {
            p,
            tally: ConfusionTally::new(tp, fp, 0, 0),
            false_positive_rate: 0.0,
            mean_true_positives: 0.0,
            mean_false_positives: 0.0,
        };
        let points = vec![point(0.0, 0, 0), point(0.1, 10, 2), point(0.2, 20, 25), point(0.3, 30, 60)];
        assert_eq!(crossover(&points), Some(0.2));
        // Grid that never reaches FP >= TP still reports its closest point
        assert_eq!(crossover(&points[..2]), Some(0.1));
        assert_eq!(crossover(&points[..1]), None);
        assert_eq!(crossover(&[]), None);
    }
}
