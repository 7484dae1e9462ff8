//! The studies a sweep can run.

use serde::{Deserialize, Serialize};

/// Study identifiers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StrategyId {
    /// Exhaustive testing: positive-count distribution per batch
    Basic,

    /// Dorfman two-stage testing: cost per design and prevalence
    Dorfman,

    /// Combinatorial pooling: confusion tally and false positive rate
    PBest,

    /// Pairwise pool overlap of the combinatorial design
    Overlap,
}

impl StrategyId {
    /// Returns every study, in run order.
    pub fn all() -> Vec<StrategyId> {
        vec![
            StrategyId::Basic,
            StrategyId::Dorfman,
            StrategyId::Overlap,
            StrategyId::PBest,
        ]
    }

    /// Returns the study name.
    pub fn name(&self) -> &'static str {
        match self {
            StrategyId::Basic => "basic",
            StrategyId::Dorfman => "dorfman",
            StrategyId::PBest => "pbest",
            StrategyId::Overlap => "overlap",
        }
    }

    /// Returns a description of the study.
    pub fn description(&self) -> &'static str {
        match self {
            StrategyId::Basic => "Positives per batch under individual testing",
            StrategyId::Dorfman => "PCR tests consumed by screen-then-retest pooling",
            StrategyId::PBest => "Calls from overlapping pools scored against ground truth",
            StrategyId::Overlap => "Pairs of individuals sharing k pools",
        }
    }

    /// Whether the study needs a combinatorial pool design.
    pub fn needs_pool_design(&self) -> bool {
        matches!(self, StrategyId::PBest | StrategyId::Overlap)
    }

    /// Whether the study draws random numbers.
    pub fn is_stochastic(&self) -> bool {
        !matches!(self, StrategyId::Overlap)
    }

    /// Parses a `--strategy` value; `all` (any case) selects every study.
    pub fn parse_selection(s: &str) -> Result<Vec<StrategyId>, String> {
        if s.eq_ignore_ascii_case("all") {
            Ok(StrategyId::all())
        } else {
            s.parse().map(|strategy| vec![strategy])
        }
    }

    /// Stable per-study salt for seed derivation.
    pub(crate) fn salt(&self) -> u64 {
        match self {
            StrategyId::Basic => 1,
            StrategyId::Dorfman => 2,
            StrategyId::PBest => 3,
            StrategyId::Overlap => 4,
        }
    }
}

impl std::fmt::Display for StrategyId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl std::str::FromStr for StrategyId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "basic" | "exhaustive" => Ok(StrategyId::Basic),
            "dorfman" | "two_stage" => Ok(StrategyId::Dorfman),
            "pbest" | "p_best" | "combinatorial" => Ok(StrategyId::PBest),
            "overlap" | "overlaps" => Ok(StrategyId::Overlap),
            "all" => Err("Use StrategyId::all() for every study".to_string()),
            _ => Err(format!("Unknown strategy: {}", s)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_round_trip() {
        for strategy in StrategyId::all() {
            assert_eq!(strategy.name().parse::<StrategyId>(), Ok(strategy));
        }
        assert_eq!("Exhaustive".parse::<StrategyId>(), Ok(StrategyId::Basic));
        assert_eq!("combinatorial".parse::<StrategyId>(), Ok(StrategyId::PBest));
        assert!("all".parse::<StrategyId>().is_err());
        assert!("sonar".parse::<StrategyId>().is_err());
    }

    #[test]
    fn test_parse_selection() {
        assert_eq!(StrategyId::parse_selection("all"), Ok(StrategyId::all()));
        assert_eq!(StrategyId::parse_selection("ALL"), Ok(StrategyId::all()));
        assert_eq!(StrategyId::parse_selection("Dorfman"), Ok(vec![StrategyId::Dorfman]));
        assert!(StrategyId::parse_selection("sonar").is_err());
    }

    #[test]
    fn test_salts_unique() {
        let mut salts: Vec<u64> = StrategyId::all().iter().map(|s| s.salt()).collect();
        salts.sort_unstable();
        salts.dedup();
        assert_eq!(salts.len(), StrategyId::all().len());
    }

    #[test]
    fn test_design_requirements() {
        assert!(StrategyId::PBest.needs_pool_design());
        assert!(StrategyId::Overlap.needs_pool_design());
        assert!(!StrategyId::Dorfman.needs_pool_design());
        assert!(!StrategyId::Overlap.is_stochastic());
    }
}
