//! Exact solutions of small Traveling Salesman Problems through a QUBO formulation.
//!
//! The tour is encoded over `n * n` binary variables, `(city, position)`, with row and column
//! penalties that push minimum-energy assignments towards permutation matrices. The QUBO is then
//! minimized by enumerating every assignment, which is exponential in `n * n` and therefore limited
//! to a handful of cities. A minimum that is not a tour, which collinear cities can produce, is
//! reported as an error rather than repaired.
//!
//! Example:
//! ``` rust
//! use tsp_qubo::distance::Coordinate;
//! use tsp_qubo::solver_options::SolverOptions;
//! use tsp_qubo::tsp_solver::solve_tsp;
//!
//! let square = vec![
//!     Coordinate::new(0.0, 0.0),
//!     Coordinate::new(1.0, 0.0),
//!     Coordinate::new(1.0, 1.0),
//!     Coordinate::new(0.0, 1.0),
//! ];
//! let solution = solve_tsp(&square, &SolverOptions::new()).unwrap();
//! assert_eq!(solution.energy, 4.0);
//! ```

pub mod coefficients;
pub mod distance;
pub mod enumerate_qubo;
pub mod error;
pub mod qubo;
pub mod qubo_builder;
pub mod solution_decoder;
pub mod solver_logger;
pub mod solver_options;
pub mod tsp_solver;
pub mod utils;
pub mod variable;

pub use error::{Infeasibility, Result, TspError};
