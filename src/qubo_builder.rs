//! Encodes a TSP instance as a QUBO over the `n * n` variables of [`TspVariable`].
//!
//! The energy is the sum of three passes written into one [`CoefficientMap`]:
//! - a row penalty, so each city takes exactly one position,
//! - a column penalty, so each position holds exactly one city,
//! - the tour length, as a sum over transitions between consecutive positions.
//!
//! A constant offset of `2n(A + B)` is added so the penalty part of a feasible assignment is zero, and
//! its energy is exactly the length of the tour it describes.

use crate::coefficients::CoefficientMap;
use crate::distance::DistanceMatrix;
use crate::error::{Result, TspError};
use crate::variable::{num_variables, TspVariable};
use log::{debug, warn};

/// Weights of the row (`a`) and column (`b`) constraint penalties.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PenaltyWeights {
    pub a: f64,
    pub b: f64,
}

impl PenaltyWeights {
    pub const fn new(a: f64, b: f64) -> Self {
        Self { a, b }
    }

    /// # Errors
    ///
    /// Returns `InvalidPenalty` unless both weights are finite and strictly positive.
    pub fn validate(&self) -> Result<()> {
        let is_valid = |w: f64| w.is_finite() && w > 0.0;
        if is_valid(self.a) && is_valid(self.b) {
            Ok(())
        } else {
            Err(TspError::InvalidPenalty {
                a: self.a,
                b: self.b,
            })
        }
    }
}

impl Default for PenaltyWeights {
    fn default() -> Self {
        Self::new(1000.0, 1000.0)
    }
}

/// Builds the TSP QUBO for a distance matrix.
///
/// The penalties are expected to dominate the objective; the builder does not enforce this and only
/// logs a warning when either weight is below `n * max_distance`.
///
/// Example:
/// ``` rust
/// use tsp_qubo::distance::{Coordinate, DistanceMatrix};
/// use tsp_qubo::qubo_builder::{build_tsp_qubo, PenaltyWeights};
///
/// let coords = vec![Coordinate::new(0.0, 0.0), Coordinate::new(1.0, 0.0), Coordinate::new(0.0, 1.0)];
/// let dist = DistanceMatrix::from_coordinates(&coords).unwrap();
/// let coefficients = build_tsp_qubo(&dist, &PenaltyWeights::default());
/// assert_eq!(coefficients.num_x(), 9);
/// ```
pub fn build_tsp_qubo(dist: &DistanceMatrix, penalties: &PenaltyWeights) -> CoefficientMap {
    let n = dist.num_cities();
    let mut coefficients = CoefficientMap::new(num_variables(n));

    let scale = n as f64 * dist.max_distance();
    if penalties.a.min(penalties.b) < scale {
        warn!(
            "penalty weights A = {}, B = {} are below n * max distance = {scale}, the optimum may not be a tour",
            penalties.a, penalties.b
        );
    }

    add_row_constraints(&mut coefficients, n, penalties.a);
    add_column_constraints(&mut coefficients, n, penalties.b);
    add_tour_objective(&mut coefficients, dist);
    coefficients.add_offset(2.0 * (penalties.a + penalties.b) * n as f64);

    debug!(
        "built TSP QUBO for {n} cities: {} variables, {} coefficients",
        coefficients.num_x(),
        coefficients.len()
    );

    coefficients
}

/// Each city appears at exactly one position.
pub fn add_row_constraints(coefficients: &mut CoefficientMap, n: usize, a: f64) {
    for city in 0..n {
        for j in 0..n {
            let x_j = TspVariable::new(city, j).index(n);
            coefficients.add_to(x_j, x_j, -2.0 * a);

            for k in (j + 1)..n {
                let x_k = TspVariable::new(city, k).index(n);
                coefficients.add_to(x_j, x_k, 2.0 * a);
            }
        }
    }
}

/// Each position holds exactly one city.
pub fn add_column_constraints(coefficients: &mut CoefficientMap, n: usize, b: f64) {
    for position in 0..n {
        for i in 0..n {
            let x_i = TspVariable::new(i, position).index(n);
            coefficients.add_to(x_i, x_i, -2.0 * b);

            for k in (i + 1)..n {
                let x_k = TspVariable::new(k, position).index(n);
                coefficients.add_to(x_i, x_k, 2.0 * b);
            }
        }
    }
}

/// Adds `dist[i][k]` for city `i` at position `j` followed by city `k` at position `j + 1`, wrapping the
/// last position back to the first.
pub fn add_tour_objective(coefficients: &mut CoefficientMap, dist: &DistanceMatrix) {
    let n = dist.num_cities();

    for j in 0..n {
        let j_next = (j + 1) % n;
        for i in 0..n {
            for k in 0..n {
                if i == k {
                    continue;
                }

                let x_i = TspVariable::new(i, j).index(n);
                let x_k = TspVariable::new(k, j_next).index(n);
                coefficients.add_to(x_i, x_k, dist.get(i, k));
            }
        }
    }
}
