//! Exact QUBO minimization by enumerating every binary assignment.
//!
//! Assignment `value` in `[0, 2^N)` sets variable `b` to bit `b` of `value`. The lowest energy wins, and
//! among equal energies the lowest `value` wins. The range can be split into chunks searched in parallel;
//! the reduction applies the same rule, so the answer does not depend on the number of threads.

use crate::coefficients::CoefficientMap;
use crate::error::{Result, TspError};
use crate::solver_logger::SolverOutputLogger;
use crate::solver_options::SolverOptions;
use crate::utils::{bits_to_solution, get_current_time};
use ndarray::Array1;
use rayon::prelude::*;

/// The enumeration counter is a `u64`, which bounds the number of variables.
pub const MAX_ENUMERATION_VARIABLES: usize = 63;

const CHUNK_SIZE: u64 = 1 << 14;

/// Number of assignments of `num_x` binary variables, if it can be enumerated at all.
pub fn search_space_size(num_x: usize) -> Option<u64> {
    if num_x > MAX_ENUMERATION_VARIABLES {
        return None;
    }
    Some(1u64 << num_x)
}

#[derive(Debug, Clone, PartialEq)]
pub struct BestSolution {
    pub solution: Array1<usize>,
    pub energy: f64,
    /// number of evaluated assignments with exactly this energy
    pub degeneracy: u64,
    pub evaluated: u64,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SearchResult {
    /// Every assignment was evaluated.
    Optimal(BestSolution),
    /// A limit stopped the search, the solution is only the best of the evaluated assignments.
    Incomplete { best: BestSolution, total: u64 },
}

impl SearchResult {
    pub const fn is_optimal(&self) -> bool {
        matches!(self, Self::Optimal(_))
    }

    pub const fn best(&self) -> &BestSolution {
        match self {
            Self::Optimal(best) | Self::Incomplete { best, .. } => best,
        }
    }

    /// # Errors
    ///
    /// Returns `SearchIncomplete` if the search did not cover every assignment.
    pub fn into_optimal(self) -> Result<BestSolution> {
        match self {
            Self::Optimal(best) => Ok(best),
            Self::Incomplete { best, total } => Err(TspError::SearchIncomplete {
                evaluated: best.evaluated,
                total,
                best_energy: best.energy,
            }),
        }
    }
}

/// Coefficients flattened to bit masks, so a term is active when `bits & mask == mask`.
struct PackedTerms {
    terms: Vec<(u64, f64)>,
    offset: f64,
}

impl PackedTerms {
    fn new(coefficients: &CoefficientMap) -> Self {
        let terms = coefficients
            .iter()
            .map(|((v, w), value)| ((1u64 << v) | (1u64 << w), value))
            .collect();

        Self {
            terms,
            offset: coefficients.offset(),
        }
    }

    #[inline]
    fn energy(&self, bits: u64) -> f64 {
        let mut energy = self.offset;
        for &(mask, value) in &self.terms {
            if bits & mask == mask {
                energy += value;
            }
        }
        energy
    }
}

/// Best assignment of one contiguous range of the search space.
#[derive(Debug, Clone, Copy)]
struct RangeBest {
    bits: u64,
    energy: f64,
    degeneracy: u64,
    evaluated: u64,
}

impl RangeBest {
    const fn empty() -> Self {
        Self {
            bits: 0,
            energy: f64::INFINITY,
            degeneracy: 0,
            evaluated: 0,
        }
    }

    /// Combines the results of two disjoint ranges with the lowest energy, then lowest value, rule.
    fn merge(self, other: Self) -> Self {
        let evaluated = self.evaluated + other.evaluated;
        if other.evaluated == 0 {
            return Self { evaluated, ..self };
        }
        if self.evaluated == 0 {
            return Self { evaluated, ..other };
        }

        if self.energy < other.energy || (self.energy == other.energy && self.bits < other.bits) {
            let degeneracy = match self.energy == other.energy {
                true => self.degeneracy + other.degeneracy,
                false => self.degeneracy,
            };
            Self {
                degeneracy,
                evaluated,
                ..self
            }
        } else {
            let degeneracy = match self.energy == other.energy {
                true => self.degeneracy + other.degeneracy,
                false => other.degeneracy,
            };
            Self {
                degeneracy,
                evaluated,
                ..other
            }
        }
    }
}

fn search_range(terms: &PackedTerms, start: u64, end: u64) -> RangeBest {
    let mut best = RangeBest::empty();

    for bits in start..end {
        let energy = terms.energy(bits);

        // strict comparison keeps the first, i.e. lowest, assignment among ties
        if energy < best.energy {
            best.bits = bits;
            best.energy = energy;
            best.degeneracy = 1;
        } else if energy == best.energy {
            best.degeneracy += 1;
        }
    }

    best.evaluated = end.saturating_sub(start);
    best
}

/// Sequential exhaustive search over all `2^num_x` assignments, without limits or logging.
///
/// Example:
/// ``` rust
/// use tsp_qubo::coefficients::CoefficientMap;
/// use tsp_qubo::enumerate_qubo::enumerate_solve;
///
/// let mut coefficients = CoefficientMap::new(2);
/// coefficients.add_to(0, 0, -1.0);
/// coefficients.add_to(1, 1, 2.0);
/// let best = enumerate_solve(&coefficients, 2).unwrap();
/// assert_eq!(best.energy, -1.0);
/// assert_eq!(best.solution.to_vec(), vec![1, 0]);
/// ```
///
/// # Errors
///
/// Returns `TooManyVariables` if `num_x` exceeds [`MAX_ENUMERATION_VARIABLES`] or is smaller than
/// the variables used by the coefficients.
pub fn enumerate_solve(coefficients: &CoefficientMap, num_x: usize) -> Result<BestSolution> {
    let total = checked_search_space(coefficients, num_x, MAX_ENUMERATION_VARIABLES)?;
    let terms = PackedTerms::new(coefficients);

    Ok(to_best_solution(search_range(&terms, 0, total), num_x))
}

/// Exhaustive search configured by the solver options: thread count, variable cap, and the optional
/// evaluation and time limits. A search stopped by a limit is returned as [`SearchResult::Incomplete`].
///
/// # Errors
///
/// Returns `TooManyVariables` if `num_x` exceeds the configured cap, and `ThreadPool` if the worker
/// pool cannot be created.
pub fn minimize(
    coefficients: &CoefficientMap,
    num_x: usize,
    options: &SolverOptions,
) -> Result<SearchResult> {
    minimize_chunked(coefficients, num_x, options, CHUNK_SIZE)
}

fn minimize_chunked(
    coefficients: &CoefficientMap,
    num_x: usize,
    options: &SolverOptions,
    chunk_size: u64,
) -> Result<SearchResult> {
    let max_variables = options.max_variables.min(MAX_ENUMERATION_VARIABLES);
    let total = checked_search_space(coefficients, num_x, max_variables)?;
    let limit = options.max_evaluations.map_or(total, |m| m.min(total));

    let logger = SolverOutputLogger::new(options.verbose);
    let threads = options.threads.max(1);
    logger.output_header(num_x, total, threads);

    let terms = PackedTerms::new(coefficients);
    let num_chunks = limit.div_ceil(chunk_size);
    logger.output_layout(num_chunks, chunk_size, limit);

    let time_start = get_current_time();
    let deadline = options.max_time.map(|t| time_start + t);
    let expired = || deadline.is_some_and(|d| get_current_time() > d);

    let chunk = |c: u64| {
        if expired() {
            return RangeBest::empty();
        }
        let start = c * chunk_size;
        search_range(&terms, start, (start + chunk_size).min(limit))
    };

    let range_best = if threads == 1 {
        let mut best = RangeBest::empty();
        for c in 0..num_chunks {
            let chunk_best = chunk(c);
            let improved = chunk_best.evaluated > 0 && chunk_best.energy < best.energy;
            best = best.merge(chunk_best);
            if improved {
                logger.output_improvement(best.evaluated, best.energy);
            }
        }
        best
    } else {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .build()?;
        pool.install(|| {
            (0..num_chunks)
                .into_par_iter()
                .map(chunk)
                .reduce(RangeBest::empty, RangeBest::merge)
        })
    };

    let best = to_best_solution(range_best, num_x);
    let result = match best.evaluated == total {
        true => SearchResult::Optimal(best),
        false => SearchResult::Incomplete { best, total },
    };

    logger.generate_exit_line(&result, get_current_time() - time_start);

    Ok(result)
}

fn checked_search_space(
    coefficients: &CoefficientMap,
    num_x: usize,
    max_variables: usize,
) -> Result<u64> {
    let too_many = TspError::TooManyVariables {
        num_x,
        max: max_variables,
    };

    if num_x > max_variables || coefficients.num_x() > num_x {
        return Err(too_many);
    }
    search_space_size(num_x).ok_or(too_many)
}

fn to_best_solution(range_best: RangeBest, num_x: usize) -> BestSolution {
    BestSolution {
        solution: bits_to_solution(range_best.bits, num_x),
        energy: range_best.energy,
        degeneracy: range_best.degeneracy,
        evaluated: range_best.evaluated,
    }
}
