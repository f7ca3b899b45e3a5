//! The binary decision variables of the TSP QUBO.
//!
//! Variable `(city, position)` is set when `city` is visited at `position` of the tour, and it is
//! stored at flat index `city * n + position`. All index arithmetic goes through this type.

/// A `(city, position)` pair of an `n` city problem.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TspVariable {
    pub city: usize,
    pub position: usize,
}

impl TspVariable {
    pub const fn new(city: usize, position: usize) -> Self {
        Self { city, position }
    }

    /// Flat variable index for an `n` city problem.
    pub const fn index(&self, n: usize) -> usize {
        self.city * n + self.position
    }

    /// Inverse of [`TspVariable::index`].
    pub const fn from_index(index: usize, n: usize) -> Self {
        Self {
            city: index / n,
            position: index % n,
        }
    }
}

/// Number of binary variables of an `n` city problem.
pub const fn num_variables(n: usize) -> usize {
    n * n
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_index_bijection() {
        let n = 5;
        for index in 0..num_variables(n) {
            let var = TspVariable::from_index(index, n);
            assert!(var.city < n && var.position < n);
            assert_eq!(var.index(n), index);
        }
    }

    #[test]
    fn test_row_major_layout() {
        assert_eq!(TspVariable::new(0, 3).index(4), 3);
        assert_eq!(TspVariable::new(1, 0).index(4), 4);
        assert_eq!(TspVariable::new(3, 3).index(4), 15);
    }
}
