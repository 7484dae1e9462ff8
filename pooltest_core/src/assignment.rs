//! Pool assignments: which pools each individual's sample is split into.
//!
//! # Table format
//!
//! One line per individual, whitespace separated. The first token is a
//! label, the remaining tokens are pool ids:
//!
//! ```text
//! A1  0 9 18 27 36 45
//! A2  1 10 19 28 37 46
//! ```
//!
//! Blank lines and `#` comments are skipped.

use crate::error::{ConfigError, ParseError, PoolError};
use std::io::Read;
use std::path::Path;
use std::str::FromStr;
use tracing::{debug, warn};

/// Pools per layer of [`PoolAssignment::polynomial`]
const GF8_ORDER: usize = 8;

/// Multiplication in GF(8) = GF(2)[x] / (x^3 + x + 1).
fn gf8_mul(mut a: u8, mut b: u8) -> u8 {
    let mut product = 0;
    while b != 0 {
        if b & 1 != 0 {
            product ^= a;
        }
        b >>= 1;
        a <<= 1;
        if a & 0b1000 != 0 {
            a ^= 0b1011;
        }
    }
    product
}

/// The set of pools one individual belongs to. Always sorted, no duplicates.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct PoolSet(Vec<usize>);

impl PoolSet {
    pub fn new(pools: impl IntoIterator<Item = usize>) -> Self {
        let mut ids: Vec<usize> = pools.into_iter().collect();
        ids.sort_unstable();
        ids.dedup();
        Self(ids)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = usize> + '_ {
        self.0.iter().copied()
    }

    pub fn as_slice(&self) -> &[usize] {
        &self.0
    }

    /// Highest pool id, if any.
    pub fn max(&self) -> Option<usize> {
        self.0.last().copied()
    }

    pub fn contains(&self, pool: usize) -> bool {
        self.0.binary_search(&pool).is_ok()
    }

    /// Number of pools shared with `other` (sorted merge).
    pub fn intersection_len(&self, other: &PoolSet) -> usize {
        let (a, b) = (&self.0, &other.0);
        let (mut i, mut j, mut shared) = (0, 0, 0);
        while i < a.len() && j < b.len() {
            match a[i].cmp(&b[j]) {
                std::cmp::Ordering::Less => i += 1,
                std::cmp::Ordering::Greater => j += 1,
                std::cmp::Ordering::Equal => {
                    shared += 1;
                    i += 1;
                    j += 1;
                }
            }
        }
        shared
    }
}

impl FromIterator<usize> for PoolSet {
    fn from_iter<I: IntoIterator<Item = usize>>(iter: I) -> Self {
        Self::new(iter)
    }
}

impl<const N: usize> From<[usize; N]> for PoolSet {
    fn from(ids: [usize; N]) -> Self {
        Self::new(ids)
    }
}

/// An immutable pooling design: one [`PoolSet`] per individual.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PoolAssignment {
    sets: Vec<PoolSet>,
    labels: Vec<String>,
    pool_count: usize,
}

impl PoolAssignment {
    /// Builds a design whose pool count is one past the highest id used.
    pub fn new(sets: Vec<PoolSet>) -> Self {
        let pool_count = sets.iter().filter_map(PoolSet::max).max().map_or(0, |m| m + 1);
        Self {
            sets,
            labels: Vec::new(),
            pool_count,
        }
    }

    /// Builds a design with a fixed number of pools, rejecting any id outside it.
    pub fn with_pool_count(sets: Vec<PoolSet>, pool_count: usize) -> Result<Self, ConfigError> {
        for (individual, set) in sets.iter().enumerate() {
            if let Some(pool) = set.max().filter(|&m| m >= pool_count) {
                return Err(ConfigError::PoolOutOfRange {
                    individual,
                    pool,
                    pool_count,
                });
            }
        }
        Ok(Self {
            sets,
            labels: Vec::new(),
            pool_count,
        })
    }

    /// Re-checks this design against a fixed pool count (e.g. the number of
    /// wells on the plate the table was written for).
    pub fn constrain_pool_count(self, pool_count: usize) -> Result<Self, ConfigError> {
        let labels = self.labels;
        let mut constrained = Self::with_pool_count(self.sets, pool_count)?;
        constrained.labels = labels;
        Ok(constrained)
    }

    /// A layered plate design with bounded pairwise overlap.
    ///
    /// Individual `i` is the polynomial `a0 + a1*x + a2*x^2` over GF(8), with
    /// `i = a0 + 8*a1 + 64*a2`. Layer `k` owns pools `8k..8k+8` and the
    /// individual joins pool `8k + f(k)`. Two distinct polynomials of degree
    /// 2 or less agree on at most 2 points, so no pair shares more than 2
    /// pools. With 6 layers this is the 48-pool, 6-pools-per-individual plate.
    pub fn polynomial(individuals: usize, pools_per_individual: usize) -> Result<Self, ConfigError> {
        if pools_per_individual == 0 {
            return Err(ConfigError::non_positive("pools_per_individual", pools_per_individual));
        }
        if pools_per_individual > GF8_ORDER {
            return Err(ConfigError::TooLarge {
                parameter: "pools_per_individual",
                value: pools_per_individual,
                limit: GF8_ORDER,
            });
        }
        let capacity = GF8_ORDER.pow(3);
        if individuals > capacity {
            return Err(ConfigError::TooLarge {
                parameter: "individuals",
                value: individuals,
                limit: capacity,
            });
        }
        let sets = (0..individuals)
            .map(|i| {
                let (a0, a1, a2) = ((i % 8) as u8, ((i / 8) % 8) as u8, (i / 64) as u8);
                (0..pools_per_individual)
                    .map(|k| {
                        let x = k as u8;
                        let value = a0 ^ gf8_mul(a1, x) ^ gf8_mul(a2, gf8_mul(x, x));
                        k * GF8_ORDER + value as usize
                    })
                    .collect()
            })
            .collect();
        Self::with_pool_count(sets, pools_per_individual * GF8_ORDER)
    }

    /// Reads a table from any reader.
    pub fn from_reader<R: Read>(mut reader: R) -> Result<Self, PoolError> {
        let mut text = String::new();
        reader.read_to_string(&mut text)?;
        Ok(text.parse::<Self>()?)
    }

    /// Reads a table from a file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, PoolError> {
        let path = path.as_ref();
        let file = std::fs::File::open(path)?;
        let assignment = Self::from_reader(file)?;
        debug!(
            "Loaded {} individuals over {} pools from {}",
            assignment.len(),
            assignment.pool_count(),
            path.display()
        );
        Ok(assignment)
    }

    /// Number of individuals.
    pub fn len(&self) -> usize {
        self.sets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sets.is_empty()
    }

    /// Size of the pool status vector for this design.
    pub fn pool_count(&self) -> usize {
        self.pool_count
    }

    /// Pools of individual `i`.
    pub fn pools_of(&self, individual: usize) -> &PoolSet {
        &self.sets[individual]
    }

    /// Label from the input table, if the design was parsed.
    pub fn label(&self, individual: usize) -> Option<&str> {
        self.labels.get(individual).map(String::as_str)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, PoolSet> {
        self.sets.iter()
    }

    pub fn sets(&self) -> &[PoolSet] {
        &self.sets
    }

    /// Largest number of pools any individual is split into.
    pub fn max_pools_per_individual(&self) -> usize {
        self.sets.iter().map(PoolSet::len).max().unwrap_or(0)
    }

    /// Number of individuals in each pool.
    pub fn pool_sizes(&self) -> Vec<usize> {
        let mut sizes = vec![0; self.pool_count];
        for pool in self.sets.iter().flat_map(PoolSet::iter) {
            sizes[pool] += 1;
        }
        sizes
    }
}

impl FromStr for PoolAssignment {
    type Err = ParseError;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        let mut sets = Vec::new();
        let mut labels = Vec::new();

        for (index, line) in text.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let mut tokens = line.split_whitespace();
            let label = tokens.next().unwrap_or_default();

            let mut ids = Vec::new();
            for token in tokens {
                let id = token.parse::<usize>().map_err(|_| ParseError::InvalidPoolId {
                    line: index + 1,
                    token: token.to_string(),
                })?;
                ids.push(id);
            }

            let set = PoolSet::new(ids.iter().copied());
            if set.len() != ids.len() {
                warn!("Line {}: duplicate pool ids for `{}` collapsed", index + 1, label);
            }
            labels.push(label.to_string());
            sets.push(set);
        }

        let mut assignment = PoolAssignment::new(sets);
        assignment.labels = labels;
        Ok(assignment)
    }
}

impl<'a> IntoIterator for &'a PoolAssignment {
    type Item = &'a PoolSet;
    type IntoIter = std::slice::Iter<'a, PoolSet>;

    fn into_iter(self) -> Self::IntoIter {
        self.sets.iter()
    }
}
