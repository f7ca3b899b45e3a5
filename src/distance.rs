//! City coordinates and the pairwise distance matrix the QUBO objective is built from.

use crate::error::{Result, TspError};
use ndarray::Array2;

/// A city location in the plane.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coordinate {
    pub x: f64,
    pub y: f64,
}

impl Coordinate {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn distance_to(&self, other: &Self) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

impl From<(f64, f64)> for Coordinate {
    fn from((x, y): (f64, f64)) -> Self {
        Self { x, y }
    }
}

/// Square matrix of non-negative distances between cities, read-only once built.
#[derive(Debug, Clone, PartialEq)]
pub struct DistanceMatrix {
    dist: Array2<f64>,
}

impl DistanceMatrix {
    /// Computes the pairwise Euclidean distances of a list of coordinates.
    ///
    /// Example:
    /// ``` rust
    /// use tsp_qubo::distance::{Coordinate, DistanceMatrix};
    ///
    /// let coords = vec![Coordinate::new(0.0, 0.0), Coordinate::new(3.0, 4.0)];
    /// let dist = DistanceMatrix::from_coordinates(&coords).unwrap();
    /// assert!((dist.get(0, 1) - 5.0).abs() < 1e-10);
    /// ```
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` for an empty list or a coordinate that is not finite.
    pub fn from_coordinates(coordinates: &[Coordinate]) -> Result<Self> {
        if coordinates.is_empty() {
            return Err(TspError::InvalidInput(
                "at least one coordinate is required".to_string(),
            ));
        }

        if let Some(index) = coordinates.iter().position(|c| !c.is_finite()) {
            return Err(TspError::InvalidInput(format!(
                "coordinate {index} is not finite"
            )));
        }

        let n = coordinates.len();
        let mut dist = Array2::<f64>::zeros((n, n));

        // only the upper triangle is computed, so both halves are bit-identical
        for i in 0..n {
            for j in (i + 1)..n {
                let d = coordinates[i].distance_to(&coordinates[j]);
                dist[[i, j]] = d;
                dist[[j, i]] = d;
            }
        }

        Ok(Self { dist })
    }

    /// Wraps an explicit distance matrix.
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` if the matrix is empty, not square, not symmetric, has a non-zero
    /// diagonal, or holds negative or non-finite entries.
    pub fn from_array(dist: Array2<f64>) -> Result<Self> {
        let (rows, cols) = dist.dim();
        if rows == 0 || rows != cols {
            return Err(TspError::InvalidInput(format!(
                "distance matrix must be square and non-empty, got {rows}x{cols}"
            )));
        }

        if dist.iter().any(|d| !d.is_finite() || *d < 0.0) {
            return Err(TspError::InvalidInput(
                "distances must be finite and non-negative".to_string(),
            ));
        }

        if let Some(i) = (0..rows).find(|&i| dist[[i, i]] != 0.0) {
            return Err(TspError::InvalidInput(format!(
                "distance from city {i} to itself must be zero"
            )));
        }

        for i in 0..rows {
            if let Some(j) = ((i + 1)..rows).find(|&j| dist[[i, j]] != dist[[j, i]]) {
                return Err(TspError::InvalidInput(format!(
                    "distance matrix is not symmetric at ({i}, {j})"
                )));
            }
        }

        Ok(Self { dist })
    }

    pub fn num_cities(&self) -> usize {
        self.dist.nrows()
    }

    pub fn get(&self, i: usize, j: usize) -> f64 {
        self.dist[[i, j]]
    }

    pub fn max_distance(&self) -> f64 {
        self.dist.iter().fold(0.0, |acc, &d| acc.max(d))
    }

    /// Length of the closed tour, including the leg from the last city back to the first.
    pub fn tour_length(&self, tour: &[usize]) -> f64 {
        let n = tour.len();
        (0..n).map(|j| self.get(tour[j], tour[(j + 1) % n])).sum()
    }
}
