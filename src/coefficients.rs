//! Sparse accumulator for QUBO coefficients.
//!
//! Every entry is keyed by an unordered pair of variable indices, with `(v, v)` holding the linear
//! term of variable `v`. Pairs that were never touched are zero. Updates accumulate into the
//! existing entry rather than replacing it, so several constraint and objective passes can write
//! into the same map.

use ndarray::Array1;
use smolprng::{Algorithm, PRNG};
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq)]
pub struct CoefficientMap {
    num_x: usize,
    terms: BTreeMap<(usize, usize), f64>,
    offset: f64,
}

impl CoefficientMap {
    /// Creates an empty map over `num_x` variables.
    pub const fn new(num_x: usize) -> Self {
        Self {
            num_x,
            terms: BTreeMap::new(),
            offset: 0.0,
        }
    }

    /// Adds `delta` to the coefficient of the unordered pair `(v, w)`, treating an absent entry as zero.
    ///
    /// # Panics
    ///
    /// Will panic if either index is not below `num_x`.
    pub fn add_to(&mut self, v: usize, w: usize, delta: f64) {
        assert!(
            v < self.num_x && w < self.num_x,
            "variable pair ({v}, {w}) out of range for {} variables",
            self.num_x
        );

        let key = if v <= w { (v, w) } else { (w, v) };
        *self.terms.entry(key).or_insert(0.0) += delta;
    }

    /// Adds a constant to the energy of every assignment.
    pub fn add_offset(&mut self, delta: f64) {
        self.offset += delta;
    }

    /// The coefficient of the unordered pair `(v, w)`, zero if it was never written.
    pub fn get(&self, v: usize, w: usize) -> f64 {
        let key = if v <= w { (v, w) } else { (w, v) };
        self.terms.get(&key).copied().unwrap_or(0.0)
    }

    /// Stored entries as `((v, w), coefficient)` with `v <= w`, in ascending key order.
    pub fn iter(&self) -> impl Iterator<Item = ((usize, usize), f64)> + '_ {
        self.terms.iter().map(|(&key, &value)| (key, value))
    }

    pub const fn num_x(&self) -> usize {
        self.num_x
    }

    pub const fn offset(&self) -> f64 {
        self.offset
    }

    pub fn len(&self) -> usize {
        self.terms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    /// Energy of a binary assignment, summing the stored entries in key order.
    pub fn energy(&self, x: &Array1<usize>) -> f64 {
        let mut energy = self.offset;
        for ((v, w), value) in self.iter() {
            if x[v] == 1 && x[w] == 1 {
                energy += value;
            }
        }
        energy
    }

    /// Generates a random map, where each pair is stored with probability `sparsity`.
    pub fn make_random<T: Algorithm>(num_x: usize, prng: &mut PRNG<T>, sparsity: f64) -> Self {
        let mut map = Self::new(num_x);
        for i in 0..num_x {
            for j in i..num_x {
                if prng.gen_f64() < sparsity {
                    map.add_to(i, j, prng.gen_f64() - 0.5f64);
                }
            }
        }
        map
    }
}
