//! End to end solve: coordinates, distance matrix, QUBO, exhaustive minimization, decoded tour.

use crate::coefficients::CoefficientMap;
use crate::distance::{Coordinate, DistanceMatrix};
use crate::enumerate_qubo::{minimize, search_space_size, MAX_ENUMERATION_VARIABLES};
use crate::error::{Result, TspError};
use crate::qubo_builder::build_tsp_qubo;
use crate::solution_decoder::{decode_tour, is_permutation};
use crate::solver_options::SolverOptions;
use crate::utils::solution_to_bits;
use crate::variable::num_variables;
use log::{debug, info};
use ndarray::Array1;

/// The optimal tour of an instance, together with the search statistics.
#[derive(Debug, Clone, PartialEq)]
pub struct TspSolution {
    pub tour: Vec<usize>,
    pub energy: f64,
    pub tour_length: f64,
    pub solution: Array1<usize>,
    pub degeneracy: u64,
    pub evaluated: u64,
}

/// Number of assignments an `n` city instance requires, rejected if it exceeds the configured cap.
///
/// # Errors
///
/// Returns `TooManyVariables` if `n * n` exceeds `options.max_variables`.
pub fn check_problem_size(n: usize, options: &SolverOptions) -> Result<u64> {
    let num_x = num_variables(n);
    let max = options.max_variables.min(MAX_ENUMERATION_VARIABLES);

    match search_space_size(num_x) {
        Some(size) if num_x <= max => Ok(size),
        _ => Err(TspError::TooManyVariables { num_x, max }),
    }
}

/// Solves a TSP instance given by coordinates.
///
/// Example:
/// ``` rust
/// use tsp_qubo::distance::Coordinate;
/// use tsp_qubo::solver_options::SolverOptions;
/// use tsp_qubo::tsp_solver::solve_tsp;
///
/// let coords = vec![Coordinate::new(0.0, 0.0), Coordinate::new(0.0, 1.0), Coordinate::new(1.0, 0.0)];
/// let mut options = SolverOptions::new();
/// options.verbose = 0;
/// let solution = solve_tsp(&coords, &options).unwrap();
/// assert_eq!(solution.tour.len(), 3);
/// ```
///
/// # Errors
///
/// Returns `InvalidInput` or `InvalidPenalty` for bad input, `TooManyVariables` for oversized instances,
/// `SearchIncomplete` if a limit stopped the search, and `InfeasibleAssignment` if the optimum is not a
/// tour, which happens when the penalties do not dominate the distances.
pub fn solve_tsp(coordinates: &[Coordinate], options: &SolverOptions) -> Result<TspSolution> {
    let dist = DistanceMatrix::from_coordinates(coordinates)?;
    solve_distance_matrix(&dist, options)
}

/// Solves a TSP instance given by its distance matrix.
///
/// # Errors
///
/// See [`solve_tsp`].
pub fn solve_distance_matrix(
    dist: &DistanceMatrix,
    options: &SolverOptions,
) -> Result<TspSolution> {
    options.penalties.validate()?;
    check_problem_size(dist.num_cities(), options)?;

    let coefficients = build_tsp_qubo(dist, &options.penalties);
    solve_with_coefficients(dist, &coefficients, options)
}

/// Minimizes an already built TSP QUBO and decodes the result.
///
/// # Errors
///
/// See [`solve_tsp`].
pub fn solve_with_coefficients(
    dist: &DistanceMatrix,
    coefficients: &CoefficientMap,
    options: &SolverOptions,
) -> Result<TspSolution> {
    let n = dist.num_cities();
    let best = minimize(coefficients, num_variables(n), options)?.into_optimal()?;
    debug!(
        "winning assignment {:#b} shared by {} assignments",
        solution_to_bits(&best.solution),
        best.degeneracy
    );

    let tour = decode_tour(&best.solution, n)?;
    debug_assert!(is_permutation(&tour, n));
    let tour_length = dist.tour_length(&tour);

    info!(
        "optimal tour {tour:?}, energy {}, length {tour_length}",
        best.energy
    );

    Ok(TspSolution {
        tour,
        energy: best.energy,
        tour_length,
        solution: best.solution,
        degeneracy: best.degeneracy,
        evaluated: best.evaluated,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Infeasibility;
    use crate::qubo::Qubo;
    use crate::qubo_builder::PenaltyWeights;
    use crate::tests::{make_random_coordinates, make_test_prng, make_unit_square};

    fn quiet_options() -> SolverOptions {
        let mut options = SolverOptions::new();
        options.verbose = 0;
        options
    }

    /// true if `tour` is a rotation or a reflected rotation of `reference`
    fn same_cycle(tour: &[usize], reference: &[usize]) -> bool {
        let n = reference.len();
        let mut reversed = reference.to_vec();
        reversed.reverse();

        (0..n).any(|shift| {
            (0..n).all(|j| tour[j] == reference[(j + shift) % n])
                || (0..n).all(|j| tour[j] == reversed[(j + shift) % n])
        })
    }

    #[test]
    fn test_unit_square() {
        let solution = solve_tsp(&make_unit_square(), &quiet_options()).unwrap();

        assert!(same_cycle(&solution.tour, &[0, 1, 2, 3]));
        assert_eq!(solution.energy, 4.0);
        assert_eq!(solution.tour_length, 4.0);
        // four rotations in two directions
        assert_eq!(solution.degeneracy, 8);
        assert_eq!(solution.evaluated, 1 << 16);
    }

    #[test]
    fn test_unit_square_tie_break() {
        let sequential = solve_tsp(&make_unit_square(), &quiet_options()).unwrap();

        // city 3 first, then city 2 as early as possible, is the lowest optimal assignment
        assert_eq!(sequential.tour, vec![3, 2, 1, 0]);

        for threads in [2, 4, 7] {
            let mut options = quiet_options();
            options.threads = threads;
            assert_eq!(solve_tsp(&make_unit_square(), &options).unwrap(), sequential);
        }
    }

    #[test]
    fn test_single_city() {
        let solution = solve_tsp(&[Coordinate::new(3.0, 4.0)], &quiet_options()).unwrap();

        assert_eq!(solution.tour, vec![0]);
        assert_eq!(solution.energy, 0.0);
        assert_eq!(solution.tour_length, 0.0);
    }

    #[test]
    fn test_two_cities() {
        let coords = vec![Coordinate::new(0.0, 0.0), Coordinate::new(0.0, 2.5)];
        let solution = solve_tsp(&coords, &quiet_options()).unwrap();

        assert!(is_permutation(&solution.tour, 2));
        assert_eq!(solution.energy, 5.0);
    }

    #[test]
    fn test_random_instances_are_feasible_and_exact() {
        let mut prng = make_test_prng();
        for n in [3, 4] {
            for _ in 0..3 {
                let coords = make_random_coordinates(n, &mut prng);
                let dist = DistanceMatrix::from_coordinates(&coords).unwrap();
                let solution = solve_distance_matrix(&dist, &quiet_options()).unwrap();

                assert!(is_permutation(&solution.tour, n));
                assert!((solution.energy - solution.tour_length).abs() < 1E-9);

                // matrix form agrees with the enumerated energy
                let coefficients = build_tsp_qubo(&dist, &PenaltyWeights::default());
                let qubo = Qubo::from_coefficients(&coefficients);
                assert!((qubo.eval_usize(&solution.solution) - solution.energy).abs() < 1E-9);
            }
        }
    }

    #[test]
    fn test_weak_penalties_are_reported() {
        // far apart cities with tiny penalties make a partial assignment optimal
        let coords = vec![
            Coordinate::new(0.0, 0.0),
            Coordinate::new(100.0, 0.0),
            Coordinate::new(0.0, 100.0),
        ];
        let mut options = quiet_options();
        options.penalties = PenaltyWeights::new(0.01, 0.01);

        assert!(matches!(
            solve_tsp(&coords, &options),
            Err(TspError::InfeasibleAssignment(_))
        ));
    }

    #[test]
    fn test_collinear_cities_tie_with_crowded_assignment() {
        // a row or column holding two bits costs the same penalty as one holding a single bit, so
        // with the middle city listed first the lowest tied assignment stacks both ends at position 0
        let coords = vec![
            Coordinate::new(1.0, 0.0),
            Coordinate::new(0.0, 0.0),
            Coordinate::new(2.0, 0.0),
        ];

        match solve_tsp(&coords, &quiet_options()) {
            Err(TspError::InfeasibleAssignment(Infeasibility::CrowdedPosition {
                position,
                cities,
            })) => {
                assert_eq!(position, 0);
                assert_eq!(cities, vec![1, 2]);
            }
            other => panic!("unexpected result {other:?}"),
        }

        // the assignment ties the optimal tour, it does not undercut it
        let coefficients = build_tsp_qubo(
            &DistanceMatrix::from_coordinates(&coords).unwrap(),
            &PenaltyWeights::default(),
        );
        let best = minimize(&coefficients, 9, &quiet_options())
            .unwrap()
            .into_optimal()
            .unwrap();
        assert!((best.energy - 4.0).abs() < 1E-9);
        assert_eq!(best.degeneracy, 9);
    }

    #[test]
    fn test_invalid_input() {
        assert!(matches!(
            solve_tsp(&[], &quiet_options()),
            Err(TspError::InvalidInput(_))
        ));

        let mut options = quiet_options();
        options.penalties = PenaltyWeights::new(-5.0, 1000.0);
        assert!(matches!(
            solve_tsp(&make_unit_square(), &options),
            Err(TspError::InvalidPenalty { .. })
        ));
    }

    #[test]
    fn test_size_check() {
        let options = quiet_options();
        assert_eq!(check_problem_size(4, &options).unwrap(), 1 << 16);
        assert!(matches!(
            check_problem_size(7, &options),
            Err(TspError::TooManyVariables { num_x: 49, max: 36 })
        ));
    }

    #[test]
    fn test_limited_search_is_not_a_solution() {
        let mut options = quiet_options();
        options.max_evaluations = Some(1000);

        assert!(matches!(
            solve_tsp(&make_unit_square(), &options),
            Err(TspError::SearchIncomplete {
                evaluated: 1000,
                total: 65536,
                ..
            })
        ));
    }
}
