use rand::rngs::StdRng;

use crate::activation::Activation;
use crate::error::{NetworkError, Result};
use crate::initialization::Initialization;
use crate::math::matrix::Matrix;

use super::trace::Trace;

/// Draws a `size × fan_in` weight matrix and a `size` bias vector.
///
/// Each neuron draws its incoming weights first, then its bias.
pub fn random_parameters(
    init: &dyn Initialization,
    size: usize,
    fan_in: usize,
    rng: &mut StdRng,
    n: usize,
) -> (Matrix, Matrix) {
    let mut weights = Matrix::new();
    let mut biases = Matrix::new();
    for _ in 0..size {
        let row: Matrix = (0..fan_in).map(|_| init.weight(rng, n)).collect();
        weights.append(row);
        biases.append(init.bias(rng, n));
    }
    (weights, biases)
}

/// `z_i = Σ_j w[i][j]·a[j] + b_i`, `a_i = activation(z_i)`; records both vectors.
pub fn forward(
    weights: &Matrix,
    biases: &Matrix,
    input: &Matrix,
    activation: &dyn Activation,
    trace: &mut Trace,
) -> Result<Matrix> {
    if weights.len() != biases.len() {
        return Err(NetworkError::shape(format!(
            "{} weight rows but {} biases",
            weights.len(),
            biases.len()
        )));
    }
    let mut z = Matrix::new();
    for neuron in 0..weights.len() {
        let row = weights.get_matrix(neuron)?;
        z.append(row.product(input)?.sum() + biases.get_scalar(neuron)?);
    }
    let a = z.apply(|x| activation.value(x));
    trace.record(z, a.clone());
    Ok(a)
}

/// New parameters after subtracting already-scaled steps.
pub fn stepped(
    weights: &Matrix,
    biases: &Matrix,
    weight_step: &Matrix,
    bias_step: &Matrix,
) -> Result<(Matrix, Matrix)> {
    Ok((weights.sub(weight_step)?, biases.sub(bias_step)?))
}
