//! This is the general Utils module, which contains functions that are used by multiple algorithms and there is not a
//! better place to put them as of yet.

use ndarray::Array1;
use std::time::SystemTime;

/// Expands the low `num_x` bits of an enumeration counter into a solution vector, bit b being variable b.
pub fn bits_to_solution(bits: u64, num_x: usize) -> Array1<usize> {
    Array1::from_iter((0..num_x).map(|b| ((bits >> b) & 1) as usize))
}

/// Packs a binary solution vector back into an enumeration counter.
///
/// # Panics
///
/// Will panic if the solution has more than 64 entries.
pub fn solution_to_bits(x: &Array1<usize>) -> u64 {
    assert!(x.len() <= 64, "a solution of {} variables does not fit in 64 bits", x.len());
    x.iter()
        .enumerate()
        .filter(|&(_, &x_b)| x_b == 1)
        .fold(0u64, |bits, (b, _)| bits | (1u64 << b))
}

/// Seconds since the unix epoch, as a float.
pub fn get_current_time() -> f64 {
    SystemTime::now()
        .duration_since(SystemTime::UNIX_EPOCH)
        .map_or(0.0, |d| d.as_secs_f64())
}
