//! Matrix form of a QUBO, `0.5 x'Qx + c'x + offset`, with plain text import and export.

use crate::coefficients::CoefficientMap;
use crate::error::{Result, TspError};
use ndarray::Array1;
use sprs::{CsMat, TriMat};
use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;

#[derive(Debug, Clone)]
pub struct Qubo {
    pub q: CsMat<f64>,
    pub c: Array1<f64>,
    pub offset: f64,
}

impl Qubo {
    /// Builds the symmetric matrix form of a coefficient map. The coefficient of an off-diagonal
    /// pair is placed at both `(v, w)` and `(w, v)`, so the `0.5` of the quadratic form cancels.
    pub fn from_coefficients(coefficients: &CoefficientMap) -> Self {
        let num_x = coefficients.num_x();
        let mut q = TriMat::<f64>::new((num_x, num_x));
        let mut c = Array1::<f64>::zeros(num_x);

        for ((v, w), value) in coefficients.iter() {
            if v == w {
                c[v] += value;
            } else {
                q.add_triplet(v, w, value);
                q.add_triplet(w, v, value);
            }
        }

        Self {
            q: q.to_csr(),
            c,
            offset: coefficients.offset(),
        }
    }

    /// Converts back to a coefficient map, reading the upper triangle of Q.
    pub fn to_coefficients(&self) -> CoefficientMap {
        let mut map = CoefficientMap::new(self.num_x());

        for (&value, (i, j)) in self.q.iter() {
            if i < j {
                map.add_to(i, j, value);
            } else if i == j {
                // a diagonal entry of Q acts as 0.5 * q_ii on a binary variable
                map.add_to(i, i, 0.5 * value);
            }
        }

        for (i, &value) in self.c.iter().enumerate() {
            if value != 0.0 {
                map.add_to(i, i, value);
            }
        }

        map.add_offset(self.offset);
        map
    }

    pub fn num_x(&self) -> usize {
        self.q.cols()
    }

    pub fn eval(&self, x: &Array1<f64>) -> f64 {
        let mut quad = 0.0;
        for (&value, (i, j)) in self.q.iter() {
            quad += value * x[i] * x[j];
        }
        0.5 * quad + self.c.dot(x) + self.offset
    }

    pub fn eval_usize(&self, x: &Array1<usize>) -> f64 {
        self.eval(&x.mapv(|x_i| x_i as f64))
    }

    /// Writes the QUBO as text. The first line is `num_x offset`, followed by one `i j value`
    /// line per stored coefficient with `i <= j`, where `i == j` holds the linear term.
    ///
    /// # Errors
    ///
    /// Returns `Io` if the file cannot be written.
    pub fn write_qubo<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let mut writer = BufWriter::new(File::create(path)?);
        let coefficients = self.to_coefficients();

        writeln!(writer, "{} {}", self.num_x(), self.offset)?;
        for ((i, j), value) in coefficients.iter() {
            writeln!(writer, "{i} {j} {value}")?;
        }
        writer.flush()?;

        Ok(())
    }

    /// Reads a QUBO written by [`Qubo::write_qubo`].
    ///
    /// # Errors
    ///
    /// Returns `Io` if the file cannot be read and `QuboFormat` if a line does not parse.
    pub fn read_qubo<P: AsRef<Path>>(path: P) -> Result<Self> {
        let reader = BufReader::new(File::open(path)?);
        let mut lines = reader.lines();

        let header = lines.next().transpose()?.ok_or_else(|| TspError::QuboFormat {
            line: 1,
            message: "missing header".to_string(),
        })?;
        let mut fields = header.split_whitespace();
        let num_x: usize = parse_field(fields.next(), 1)?;
        let offset: f64 = parse_field(fields.next(), 1)?;

        let mut map = CoefficientMap::new(num_x);
        map.add_offset(offset);

        for (line_index, line) in lines.enumerate() {
            let line = line?;
            let line_number = line_index + 2;
            if line.trim().is_empty() {
                continue;
            }

            let mut fields = line.split_whitespace();
            let i: usize = parse_field(fields.next(), line_number)?;
            let j: usize = parse_field(fields.next(), line_number)?;
            let value: f64 = parse_field(fields.next(), line_number)?;

            if i >= num_x || j >= num_x {
                return Err(TspError::QuboFormat {
                    line: line_number,
                    message: format!("index out of range for {num_x} variables"),
                });
            }
            map.add_to(i, j, value);
        }

        Ok(Self::from_coefficients(&map))
    }
}

fn parse_field<T: std::str::FromStr>(field: Option<&str>, line: usize) -> Result<T> {
    let field = field.ok_or_else(|| TspError::QuboFormat {
        line,
        message: "missing field".to_string(),
    })?;

    field.parse().map_err(|_| TspError::QuboFormat {
        line,
        message: format!("cannot parse '{field}'"),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tests::make_test_prng;
    use crate::utils::bits_to_solution;

    #[test]
    fn test_matches_coefficient_energy() {
        let mut prng = make_test_prng();
        let mut map = CoefficientMap::make_random(8, &mut prng, 0.5);
        map.add_offset(2.5);
        let p = Qubo::from_coefficients(&map);

        for bits in 0..(1u64 << 8) {
            let x = bits_to_solution(bits, 8);
            assert!((p.eval_usize(&x) - map.energy(&x)).abs() < 1E-10);
        }
    }

    #[test]
    fn test_symmetric_form() {
        let mut map = CoefficientMap::new(3);
        map.add_to(0, 2, 4.0);
        map.add_to(1, 1, -1.0);
        let p = Qubo::from_coefficients(&map);

        assert_eq!(p.q.get(0, 2), Some(&4.0));
        assert_eq!(p.q.get(2, 0), Some(&4.0));
        assert_eq!(p.c[1], -1.0);
        assert_eq!(p.eval(&Array1::from_vec(vec![1.0, 1.0, 1.0])), 3.0);
    }

    #[test]
    fn test_write_read_qubo() {
        let mut prng = make_test_prng();
        let mut map = CoefficientMap::make_random(6, &mut prng, 0.6);
        map.add_offset(-7.25);
        let p = Qubo::from_coefficients(&map);

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("problem.qubo");
        p.write_qubo(&path).unwrap();
        let p_read = Qubo::read_qubo(&path).unwrap();

        assert_eq!(p_read.num_x(), 6);
        assert_eq!(p_read.offset, -7.25);
        for bits in 0..(1u64 << 6) {
            let x = bits_to_solution(bits, 6);
            assert!((p_read.eval_usize(&x) - p.eval_usize(&x)).abs() < 1E-10);
        }
    }

    #[test]
    fn test_read_rejects_garbage() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.qubo");
        std::fs::write(&path, "2 0\n0 1 abc\n").unwrap();

        assert!(matches!(
            Qubo::read_qubo(&path),
            Err(TspError::QuboFormat { line: 2, .. })
        ));
    }
}
