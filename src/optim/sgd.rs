use serde::{Serialize, Deserialize};

use crate::error::{NetworkError, Result};
use crate::layers::Layer;
use crate::math::matrix::Matrix;
use crate::regularization::Regularization;

/// Which count divides the summed mini-batch gradient.
///
/// - `DatasetSize` — the whole epoch's example count (the default).
/// - `BatchSize`   — the mini-batch's example count, as in textbook SGD.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GradientNormalization {
    #[default]
    DatasetSize,
    BatchSize,
}

impl GradientNormalization {
    pub fn divisor(self, dataset_size: usize, batch_size: usize) -> usize {
        match self {
            GradientNormalization::DatasetSize => dataset_size,
            GradientNormalization::BatchSize => batch_size,
        }
    }
}

/// Gradient descent step rule.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Sgd {
    pub eta: f64,
    pub lambda: f64,
    #[serde(default)]
    pub normalization: GradientNormalization,
    /// Adds the regularization gradient, scaled by `λ·η / divisor`, to the
    /// weight step.
    #[serde(default)]
    pub weight_decay: bool,
}

impl Sgd {
    pub fn new(eta: f64, lambda: f64) -> Sgd {
        Sgd {
            eta,
            lambda,
            normalization: GradientNormalization::default(),
            weight_decay: false,
        }
    }

    /// η must be finite and positive, λ finite and non-negative.
    pub fn validate(&self) -> Result<()> {
        if !self.eta.is_finite() || self.eta <= 0.0 {
            return Err(NetworkError::config(format!("eta must be positive, got {}", self.eta)));
        }
        if !self.lambda.is_finite() || self.lambda < 0.0 {
            return Err(NetworkError::config(format!(
                "lambda must be non-negative, got {}",
                self.lambda
            )));
        }
        Ok(())
    }

    /// Turns summed gradients into the steps a layer subtracts.
    pub fn steps(
        &self,
        bias_grad: &Matrix,
        weight_grad: &Matrix,
        weights: &Matrix,
        regularization: &dyn Regularization,
        divisor: usize,
    ) -> Result<(Matrix, Matrix)> {
        if divisor == 0 {
            return Err(NetworkError::config("gradient divisor must be at least 1"));
        }
        let rate = self.eta / divisor as f64;
        let bias_step = bias_grad.scale(rate);
        let mut weight_step = weight_grad.scale(rate);
        if self.weight_decay {
            let decay = regularization
                .gradient(weights)
                .scale(self.lambda * self.eta / divisor as f64);
            weight_step = weight_step.add(&decay)?;
        }
        Ok((bias_step, weight_step))
    }

    /// Applies one update to `layer` given its summed gradients.
    pub fn step(
        &self,
        layer: &mut Layer,
        bias_grad: &Matrix,
        weight_grad: &Matrix,
        regularization: &dyn Regularization,
        divisor: usize,
    ) -> Result<()> {
        let (bias_step, weight_step) =
            self.steps(bias_grad, weight_grad, layer.weights(), regularization, divisor)?;
        layer.update(&bias_step, &weight_step)
    }
}
