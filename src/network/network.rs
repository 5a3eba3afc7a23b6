use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, trace};

use crate::activation::{Activation, ActivationType};
use crate::cost::{Cost, CostType};
use crate::error::{NetworkError, Result};
use crate::initialization::Initialization;
use crate::layers::{Layer, LayerKind, Trace};
use crate::math::matrix::Matrix;
use crate::network::state::NetworkState;
use crate::optim::sgd::{GradientNormalization, Sgd};
use crate::regularization::{Regularization, RegularizationType};

/// Per-layer bias and weight gradients for every trainable layer.
///
/// Entry `k` of both matrices belongs to layer `k + 1`; the input layer has
/// no entry.
#[derive(Debug, Clone, PartialEq)]
pub struct Gradient {
    pub biases: Matrix,
    pub weights: Matrix,
}

impl Gradient {
    pub fn add(&self, other: &Gradient) -> Result<Gradient> {
        Ok(Gradient {
            biases: self.biases.add(&other.biases)?,
            weights: self.weights.add(&other.weights)?,
        })
    }
}

/// An ordered stack of layers plus the strategies and generator that drive it.
///
/// Strategy objects are always derived from the stored type tags; change a
/// tag through its setter (or call [`refresh`](Network::refresh)) and the
/// live object follows.
#[derive(Debug)]
pub struct Network {
    layers: Vec<Layer>,
    activation_type: ActivationType,
    cost_type: CostType,
    regularization_type: RegularizationType,
    activation: Box<dyn Activation>,
    cost: Box<dyn Cost>,
    regularization: Box<dyn Regularization>,
    sgd: Sgd,
    seed: u64,
    rng: StdRng,
}

impl Network {
    /// Wires layers and strategies together without touching parameters.
    /// Rejects topologies that cannot be trained.
    pub(crate) fn assemble(
        layers: Vec<Layer>,
        activation_type: ActivationType,
        cost_type: CostType,
        regularization_type: RegularizationType,
        sgd: Sgd,
        seed: u64,
    ) -> Result<Network> {
        validate_topology(&layers)?;
        Ok(Network {
            layers,
            activation_type,
            cost_type,
            regularization_type,
            activation: activation_type.build(),
            cost: cost_type.build(),
            regularization: regularization_type.build(),
            sgd,
            seed,
            rng: StdRng::seed_from_u64(seed),
        })
    }

    /// Product of every layer's neuron count; used as the initialization fan-in.
    /// Fails with `ConfigurationInvalid` when the product overflows `usize`.
    pub fn size(&self) -> Result<usize> {
        self.layers.iter().try_fold(1usize, |acc, layer| {
            acc.checked_mul(layer.size()).ok_or_else(|| {
                NetworkError::config(format!(
                    "network size overflows: {} layers multiply past {}",
                    self.layers.len(),
                    usize::MAX
                ))
            })
        })
    }

    /// Draws fresh parameters for every layer from the network's generator.
    pub fn initialize(&mut self, init: &dyn Initialization) -> Result<()> {
        let n = self.size()?;
        for i in 0..self.layers.len() {
            let previous_size = self.layers[i.saturating_sub(1)].size();
            self.layers[i].initialize(init, previous_size, &mut self.rng, n)?;
        }
        Ok(())
    }

    /// Re-derives the strategy objects from their tags and re-checks every
    /// layer's weight shape.
    pub fn refresh(&mut self) -> Result<()> {
        self.activation = self.activation_type.build();
        self.cost = self.cost_type.build();
        self.regularization = self.regularization_type.build();
        self.check()
    }

    pub fn check(&self) -> Result<()> {
        for (i, layer) in self.layers.iter().enumerate() {
            let previous = &self.layers[i.saturating_sub(1)];
            layer.check(previous.size())?;
        }
        Ok(())
    }

    /// Forward pass; returns the output layer's activations.
    pub fn feedforward(&self, input: &Matrix) -> Result<Matrix> {
        self.feedforward_traced(input, &mut Trace::new())
    }

    /// Forward pass that records every layer's z and a vectors into `trace`.
    pub fn feedforward_traced(&self, input: &Matrix, trace: &mut Trace) -> Result<Matrix> {
        let mut current = input.clone();
        for layer in &self.layers {
            current = layer.feedforward(&current, self.activation.as_ref(), trace)?;
        }
        Ok(current)
    }

    /// Convenience wrapper over [`feedforward`](Network::feedforward) for flat inputs.
    pub fn predict(&self, input: &[f64]) -> Result<Vec<f64>> {
        self.feedforward(&Matrix::from_vec(input.to_vec()))?.to_vec()
    }

    /// Backpropagation for a single example.
    pub fn compute_gradient(&self, example: &Matrix, expected: &Matrix) -> Result<Gradient> {
        let mut trace = Trace::new();
        let output = self.feedforward_traced(example, &mut trace)?;
        let mut error = self.cost.derivative(expected, &output)?;

        let last = self.layers.len() - 1;
        let mut deltas = Vec::with_capacity(last);
        for layer in (1..=last).rev() {
            let adjust = trace.zs[layer].apply(|z| self.activation.derivative(z));
            let delta = error.product(&adjust)?;
            if layer > 1 {
                let weights = self.layers[layer].weights();
                let mut projected = Matrix::new();
                for neuron in 0..self.layers[layer - 1].size() {
                    projected.append(delta.product(&weights.column(neuron)?)?.sum());
                }
                error = projected;
            }
            deltas.push(delta);
        }
        deltas.reverse();

        let mut weights = Matrix::new();
        for (k, delta) in deltas.iter().enumerate() {
            let previous = &trace.activations[k];
            let mut layer_gradient = Matrix::new();
            for neuron in 0..delta.len() {
                let d = delta.get_scalar(neuron)?;
                layer_gradient.append(previous.apply(|a| a * d));
            }
            weights.append(layer_gradient);
        }

        trace!(layers = deltas.len(), output = ?output, "computed example gradient");
        Ok(Gradient {
            biases: deltas.into_iter().collect(),
            weights,
        })
    }

    /// Sums the gradients of one mini-batch and applies them, scaled by
    /// `η / divisor`, to every trainable layer.
    pub fn batch(&mut self, data: &[Matrix], expected: &[Matrix], divisor: usize) -> Result<()> {
        check_pairs(data, expected)?;
        let mut total: Option<Gradient> = None;
        for (example, answer) in data.iter().zip(expected) {
            let gradient = self.compute_gradient(example, answer)?;
            total = Some(match total {
                Some(sum) => sum.add(&gradient)?,
                None => gradient,
            });
        }
        let total = total.ok_or_else(|| NetworkError::config("mini-batch must not be empty"))?;
        debug!(examples = data.len(), divisor, eta = self.sgd.eta, "applying mini-batch");

        for k in 0..self.layers.len() - 1 {
            self.sgd.step(
                &mut self.layers[k + 1],
                total.biases.get_matrix(k)?,
                total.weights.get_matrix(k)?,
                self.regularization.as_ref(),
                divisor,
            )?;
        }
        Ok(())
    }

    /// Runs `batch` over consecutive chunks of `batch_size` examples. A
    /// trailing partial chunk is dropped. Returns the number of examples used.
    pub fn epoch(&mut self, data: &[Matrix], expected: &[Matrix], batch_size: usize) -> Result<usize> {
        check_pairs(data, expected)?;
        if batch_size == 0 {
            return Err(NetworkError::config("batch size must be at least 1"));
        }
        let batches = data.len() / batch_size;
        let divisor = self.sgd.normalization.divisor(data.len(), batch_size);
        for b in 0..batches {
            let range = b * batch_size..(b + 1) * batch_size;
            self.batch(&data[range.clone()], &expected[range], divisor)?;
        }

        let processed = batches * batch_size;
        if processed < data.len() {
            debug!(dropped = data.len() - processed, batch_size, "dropped partial batch");
        }
        Ok(processed)
    }

    /// Copies of both datasets permuted by `n` random pairwise swaps.
    fn shuffled(&mut self, data: &[Matrix], expected: &[Matrix]) -> (Vec<Matrix>, Vec<Matrix>) {
        let n = data.len();
        let mut data = data.to_vec();
        let mut expected = expected.to_vec();
        for _ in 0..n {
            let a = (self.rng.gen::<f64>() * n as f64) as usize;
            let b = (self.rng.gen::<f64>() * n as f64) as usize;
            data.swap(a, b);
            expected.swap(a, b);
        }
        (data, expected)
    }

    /// Runs `epochs` epochs, reshuffling the data before each one.
    pub fn train(
        &mut self,
        data: &[Matrix],
        expected: &[Matrix],
        epochs: usize,
        batch_size: usize,
    ) -> Result<()> {
        check_pairs(data, expected)?;
        for epoch in 1..=epochs {
            let (data, expected) = self.shuffled(data, expected);
            let processed = self.epoch(&data, &expected, batch_size)?;
            debug!(epoch, epochs, processed, "finished epoch");
        }
        Ok(())
    }

    /// Mean cost over the dataset plus the regularization penalty of every
    /// layer's weights. The penalty is not divided by the dataset size.
    pub fn evaluate(&self, data: &[Matrix], expected: &[Matrix]) -> Result<f64> {
        check_pairs(data, expected)?;
        if data.is_empty() {
            return Err(NetworkError::shape("cannot evaluate an empty dataset"));
        }
        let mut total = 0.0;
        for (example, answer) in data.iter().zip(expected) {
            let output = self.feedforward(example)?;
            total += self.cost.cost(answer, &output)?;
        }
        let penalty: f64 = self
            .layers
            .iter()
            .map(|layer| self.regularization.penalty(layer.weights()))
            .sum();
        Ok(total / data.len() as f64 + penalty)
    }

    pub fn layers(&self) -> &[Layer] {
        &self.layers
    }

    /// Mutable access to a single layer's parameters.
    pub fn layer_mut(&mut self, index: usize) -> Result<&mut Layer> {
        let len = self.layers.len();
        self.layers
            .get_mut(index)
            .ok_or(NetworkError::IndexOutOfRange { index, len })
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn eta(&self) -> f64 {
        self.sgd.eta
    }

    pub fn lambda(&self) -> f64 {
        self.sgd.lambda
    }

    pub fn sgd(&self) -> &Sgd {
        &self.sgd
    }

    pub fn set_eta(&mut self, eta: f64) {
        self.sgd.eta = eta;
    }

    pub fn set_lambda(&mut self, lambda: f64) {
        self.sgd.lambda = lambda;
    }

    pub fn set_normalization(&mut self, normalization: GradientNormalization) {
        self.sgd.normalization = normalization;
    }

    pub fn set_weight_decay(&mut self, enabled: bool) {
        self.sgd.weight_decay = enabled;
    }

    pub fn activation_type(&self) -> ActivationType {
        self.activation_type
    }

    pub fn cost_type(&self) -> CostType {
        self.cost_type
    }

    pub fn regularization_type(&self) -> RegularizationType {
        self.regularization_type
    }

    pub fn set_activation(&mut self, activation: ActivationType) -> Result<()> {
        self.activation_type = activation;
        self.refresh()
    }

    pub fn set_cost(&mut self, cost: CostType) -> Result<()> {
        self.cost_type = cost;
        self.refresh()
    }

    pub fn set_regularization(&mut self, regularization: RegularizationType) -> Result<()> {
        self.regularization_type = regularization;
        self.refresh()
    }

    /// Snapshot of everything needed to rebuild this network.
    pub fn to_state(&self) -> NetworkState {
        NetworkState {
            seed: self.seed,
            layers: self.layers.clone(),
            activation: self.activation_type,
            cost: self.cost_type,
            regularization: self.regularization_type,
            sgd: self.sgd,
        }
    }

    /// Rebuilds a network from a snapshot, deriving strategies from the tags
    /// and re-checking every layer. Rejects invalid hyperparameters. The
    /// generator restarts from the seed.
    pub fn from_state(state: NetworkState) -> Result<Network> {
        state.sgd.validate()?;
        let mut network = Network::assemble(
            state.layers,
            state.activation,
            state.cost,
            state.regularization,
            state.sgd,
            state.seed,
        )?;
        network.refresh()?;
        Ok(network)
    }
}

/// First layer is Input, no other layer is, the last one is Output.
fn validate_topology(layers: &[Layer]) -> Result<()> {
    if layers.len() < 2 {
        return Err(NetworkError::config(format!(
            "a network needs an input and an output layer, got {} layer(s)",
            layers.len()
        )));
    }
    if layers[0].kind() != LayerKind::Input {
        return Err(NetworkError::config("the first layer must be an input layer"));
    }
    if let Some(i) = layers.iter().skip(1).position(|l| l.kind() == LayerKind::Input) {
        return Err(NetworkError::config(format!("layer {} is a second input layer", i + 1)));
    }
    if layers[layers.len() - 1].kind() != LayerKind::Output {
        return Err(NetworkError::config("the last layer must be an output layer"));
    }
    if let Some(i) = layers.iter().position(|l| l.size() == 0) {
        return Err(NetworkError::config(format!("layer {i} has no neurons")));
    }
    Ok(())
}

fn check_pairs(data: &[Matrix], expected: &[Matrix]) -> Result<()> {
    if data.len() != expected.len() {
        return Err(NetworkError::shape(format!(
            "{} examples but {} expected outputs",
            data.len(),
            expected.len()
        )));
    }
    Ok(())
}
