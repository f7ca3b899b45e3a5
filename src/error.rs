//! Error types shared by every stage of the pipeline.

use thiserror::Error;

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, TspError>;

/// Reason an assignment does not describe a permutation tour.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Infeasibility {
    /// The assignment does not have `n * n` entries.
    #[error("expected {expected} variables, found {found}")]
    WrongLength { expected: usize, found: usize },
    /// No city is placed at this position.
    #[error("position {0} holds no city")]
    EmptyPosition(usize),
    /// More than one city is placed at this position.
    #[error("position {position} holds cities {cities:?}")]
    CrowdedPosition { position: usize, cities: Vec<usize> },
    /// A city is placed at more than one position.
    #[error("city {city} is visited at positions {positions:?}")]
    RepeatedCity { city: usize, positions: Vec<usize> },
}

#[derive(Debug, Error)]
pub enum TspError {
    /// Empty or malformed coordinates or distance matrix.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Penalty weights must be finite and strictly positive.
    #[error("penalty weights must be finite and positive, got A = {a}, B = {b}")]
    InvalidPenalty { a: f64, b: f64 },

    /// The winning assignment is not a permutation matrix.
    #[error("assignment does not decode to a tour: {0}")]
    InfeasibleAssignment(Infeasibility),

    /// The instance is too large to enumerate.
    #[error("{num_x} binary variables exceed the enumeration limit of {max}")]
    TooManyVariables { num_x: usize, max: usize },

    /// A search limit stopped the enumeration before it covered every assignment.
    #[error("search incomplete after {evaluated} of {total} assignments, best energy so far {best_energy}")]
    SearchIncomplete {
        evaluated: u64,
        total: u64,
        best_energy: f64,
    },

    #[error("could not parse QUBO file at line {line}: {message}")]
    QuboFormat { line: usize, message: String },

    #[error("could not start worker threads: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_infeasibility_messages() {
        let err = TspError::InfeasibleAssignment(Infeasibility::CrowdedPosition {
            position: 0,
            cities: vec![1, 2],
        });
        assert_eq!(
            err.to_string(),
            "assignment does not decode to a tour: position 0 holds cities [1, 2]"
        );

        assert_eq!(
            Infeasibility::EmptyPosition(2).to_string(),
            "position 2 holds no city"
        );
        assert_eq!(
            Infeasibility::WrongLength {
                expected: 4,
                found: 5
            }
            .to_string(),
            "expected 4 variables, found 5"
        );

        let source: &dyn std::error::Error = &Infeasibility::RepeatedCity {
            city: 0,
            positions: vec![0, 1],
        };
        assert_eq!(source.to_string(), "city 0 is visited at positions [0, 1]");
    }
}
