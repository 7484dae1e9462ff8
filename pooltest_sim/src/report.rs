//! Console report for sweep results.

use crate::exporter::{StudyResult, SweepExport};

const RULE: &str = "══════════════════════════════════════════════════════════════";

fn header(title: &str) {
    println!();
    println!("╔{}╗", RULE);
    println!("║ {:<60} ║", title);
    println!("╠{}╣", RULE);
}

fn footer() {
    println!("╚{}╝", RULE);
}

impl StudyResult {
    /// Print formatted study table to console
    pub fn print(&self) {
        match self {
            StudyResult::Basic { individuals, points } => {
                header(&format!("EXHAUSTIVE TESTING ({} tests per batch)", individuals));
                println!("║ {:>10}  {:>12}  {:>10}  {:>6}  {:>6}         ║", "p", "mean pos.", "std dev", "min", "max");
                for pt in points {
                    println!(
                        "║ {:>10.4}  {:>12.3}  {:>10.3}  {:>6}  {:>6}         ║",
                        pt.p, pt.positives.mean, pt.positives.std_dev, pt.positives.min, pt.positives.max
                    );
                }
                footer();
            }
            StudyResult::Dorfman { points, best } => {
                header("DORFMAN TWO-STAGE TESTING");
                println!("║ {:>10}  {:>8}  {:>12}  {:>12}  {:>6}  {:>6} ║", "p", "s,v", "mean cost", "expected", "min", "max");
                for pt in points {
                    println!(
                        "║ {:>10.5}  {:>8}  {:>12.2}  {:>12.2}  {:>6}  {:>6} ║",
                        pt.p,
                        pt.design.to_string(),
                        pt.cost.mean,
                        pt.expected_cost,
                        pt.cost.min,
                        pt.cost.max
                    );
                }
                println!("╠{}╣", RULE);
                println!("║ {:<60} ║", "MOST COST-EFFECTIVE DESIGN");
                for b in best {
                    println!(
                        "║ p={:<10.5} ({:>6})  mean cost {:>10.2}                  ║",
                        b.p,
                        b.design.to_string(),
                        b.mean_cost
                    );
                }
                footer();
            }
            StudyResult::PBest { design, points, crossover_p } => {
                header(&format!(
                    "P-BEST: {} samples, {} pools, {} pools/sample",
                    design.individuals, design.pool_count, design.max_pools_per_individual
                ));
                println!("║ {:>8}  {:>9}  {:>9}  {:>4}  {:>11}  {:>9} ║", "p", "TP", "FP", "FN", "TN", "FPR");
                for pt in points {
                    println!(
                        "║ {:>8.4}  {:>9}  {:>9}  {:>4}  {:>11}  {:>9.6} ║",
                        pt.p,
                        pt.tally.true_positives,
                        pt.tally.false_positives,
                        pt.tally.false_negatives,
                        pt.tally.true_negatives,
                        pt.false_positive_rate
                    );
                }
                println!("╠{}╣", RULE);
                match crossover_p {
                    Some(p) => println!("║ {:<60} ║", format!("TP and FP closest at p = {}", p)),
                    None => println!("║ {:<60} ║", "No true positives over this grid"),
                }
                footer();
            }
            StudyResult::Overlap { design } => {
                header(&format!("POOL OVERLAP ({} samples)", design.individuals));
                for (shared, pairs) in design.overlap.iter().enumerate() {
                    println!("║ {:>2} shared pools: {:>12} pairs                           ║", shared, pairs);
                }
                footer();
            }
        }
    }
}

impl SweepExport {
    /// Print every study.
    pub fn print(&self) {
        for study in &self.studies {
            study.print();
        }
    }
}
