use serde::{Serialize, Deserialize};
use std::fmt::Debug;

use crate::math::matrix::Matrix;

/// Persisted tag selecting the weight penalty.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RegularizationType {
    L2,
    #[default]
    None,
}

impl RegularizationType {
    pub fn build(self) -> Box<dyn Regularization> {
        match self {
            RegularizationType::L2 => Box::new(L2Regularization),
            RegularizationType::None => Box::new(NoRegularization),
        }
    }
}

/// Penalty on weight magnitudes and its gradient.
///
/// `gradient` is unscaled; the optimizer multiplies it by `λ·η / n`.
pub trait Regularization: Debug {
    fn penalty(&self, weights: &Matrix) -> f64;
    fn gradient(&self, weights: &Matrix) -> Matrix;
}

#[derive(Debug, Clone, Copy)]
pub struct L2Regularization;

impl Regularization for L2Regularization {
    /// 0.5·Σw²
    fn penalty(&self, weights: &Matrix) -> f64 {
        0.5 * weights.apply(|w| w * w).sum()
    }

    fn gradient(&self, weights: &Matrix) -> Matrix {
        weights.clone()
    }
}

#[derive(Debug, Clone, Copy)]
pub struct NoRegularization;

impl Regularization for NoRegularization {
    fn penalty(&self, _weights: &Matrix) -> f64 {
        0.0
    }

    fn gradient(&self, weights: &Matrix) -> Matrix {
        weights.shape()
    }
}
