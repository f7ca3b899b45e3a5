//! Turns a winning assignment back into the tour it describes.

use crate::error::{Infeasibility, Result, TspError};
use crate::variable::{num_variables, TspVariable};
use ndarray::Array1;

/// Reads the tour out of an assignment over `n * n` variables.
///
/// Every position must hold exactly one city and every city must be placed exactly once, anything
/// else is reported as `InfeasibleAssignment` rather than patched into a partial tour.
///
/// Example:
/// ``` rust
/// use ndarray::Array1;
/// use tsp_qubo::solution_decoder::decode_tour;
///
/// // city 0 at position 1, city 1 at position 0
/// let x = Array1::from_vec(vec![0, 1, 1, 0]);
/// assert_eq!(decode_tour(&x, 2).unwrap(), vec![1, 0]);
/// ```
///
/// # Errors
///
/// Returns `InfeasibleAssignment` if the assignment is not a permutation matrix.
pub fn decode_tour(x: &Array1<usize>, n: usize) -> Result<Vec<usize>> {
    let expected = num_variables(n);
    if x.len() != expected {
        return Err(TspError::InfeasibleAssignment(Infeasibility::WrongLength {
            expected,
            found: x.len(),
        }));
    }

    let mut at_position: Vec<Vec<usize>> = vec![Vec::new(); n];
    for (index, _) in x.iter().enumerate().filter(|&(_, &x_i)| x_i == 1) {
        let var = TspVariable::from_index(index, n);
        at_position[var.position].push(var.city);
    }

    let mut tour = Vec::with_capacity(n);
    for (position, cities) in at_position.into_iter().enumerate() {
        match cities.len() {
            0 => {
                return Err(TspError::InfeasibleAssignment(
                    Infeasibility::EmptyPosition(position),
                ))
            }
            1 => tour.push(cities[0]),
            _ => {
                return Err(TspError::InfeasibleAssignment(
                    Infeasibility::CrowdedPosition { position, cities },
                ))
            }
        }
    }

    // n positions with one city each can still repeat a city
    let mut seen = vec![false; n];
    for &city in &tour {
        if seen[city] {
            let positions = tour
                .iter()
                .enumerate()
                .filter(|&(_, &c)| c == city)
                .map(|(position, _)| position)
                .collect();
            return Err(TspError::InfeasibleAssignment(
                Infeasibility::RepeatedCity { city, positions },
            ));
        }
        seen[city] = true;
    }

    Ok(tour)
}

/// Checks that a tour visits each of `0..n` exactly once.
pub fn is_permutation(tour: &[usize], n: usize) -> bool {
    let mut seen = vec![false; n];
    tour.len() == n
        && tour.iter().all(|&city| {
            city < n && !std::mem::replace(&mut seen[city], true)
        })
}
