pub mod cost_type;
pub mod cross_entropy;
pub mod quadratic;

pub use cost_type::CostType;
pub use cross_entropy::CrossEntropyCost;
pub use quadratic::QuadraticCost;

use std::fmt::Debug;

use crate::error::{NetworkError, Result};
use crate::math::matrix::Matrix;

/// Loss comparing the expected output vector with the network's final activations.
pub trait Cost: Debug {
    fn cost(&self, expected: &Matrix, actual: &Matrix) -> Result<f64>;

    /// Gradient of the cost with respect to the final activations.
    fn derivative(&self, expected: &Matrix, actual: &Matrix) -> Result<Matrix>;
}

/// Scalars of both vectors, rejecting mismatched lengths.
pub(crate) fn paired(expected: &Matrix, actual: &Matrix) -> Result<(Vec<f64>, Vec<f64>)> {
    if !expected.similar(actual) {
        return Err(NetworkError::shape(format!(
            "expected output has {} values, network produced {}",
            expected.len(),
            actual.len()
        )));
    }
    Ok((expected.to_vec()?, actual.to_vec()?))
}
