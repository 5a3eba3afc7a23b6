use crate::error::Result;
use crate::math::matrix::Matrix;

use super::{paired, Cost};

/// Binary cross-entropy summed over every output neuron.
#[derive(Debug, Clone, Copy)]
pub struct CrossEntropyCost;

/// Keeps ln() and the derivative's denominator finite at saturated outputs.
const EPS: f64 = 1e-12;

impl Cost for CrossEntropyCost {
    /// Scalar: -Σ(y·ln(a+ε) + (1-y)·ln(1-a+ε))
    fn cost(&self, expected: &Matrix, actual: &Matrix) -> Result<f64> {
        let (y, a) = paired(expected, actual)?;
        Ok(a.iter()
            .zip(y.iter())
            .map(|(a, y)| -(y * (a + EPS).ln() + (1.0 - y) * (1.0 - a + EPS).ln()))
            .sum())
    }

    /// Per-output gradient: (a - y) / ((a + ε)·(1 - a + ε))
    fn derivative(&self, expected: &Matrix, actual: &Matrix) -> Result<Matrix> {
        let (y, a) = paired(expected, actual)?;
        Ok(a.iter()
            .zip(y.iter())
            .map(|(a, y)| (a - y) / ((a + EPS) * (1.0 - a + EPS)))
            .collect())
    }
}
