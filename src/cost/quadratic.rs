use crate::error::Result;
use crate::math::matrix::Matrix;

use super::{paired, Cost};

#[derive(Debug, Clone, Copy)]
pub struct QuadraticCost;

impl Cost for QuadraticCost {
    /// Scalar: 0.5·Σ(actual - expected)²
    fn cost(&self, expected: &Matrix, actual: &Matrix) -> Result<f64> {
        let (y, a) = paired(expected, actual)?;
        Ok(0.5 * a.iter().zip(y.iter()).map(|(a, y)| (a - y).powi(2)).sum::<f64>())
    }

    /// Per-output gradient: actual - expected
    fn derivative(&self, expected: &Matrix, actual: &Matrix) -> Result<Matrix> {
        actual.sub(expected)
    }
}
