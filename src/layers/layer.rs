use rand::rngs::StdRng;
use serde::{Serialize, Deserialize};

use crate::activation::Activation;
use crate::error::{NetworkError, Result};
use crate::initialization::Initialization;
use crate::math::matrix::{Element, Matrix};

use super::{dense, input, trace::Trace};

/// Role of a layer within the network.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LayerKind {
    /// Identity pass-through; always the first layer, never trained.
    Input,
    /// Fully connected hidden layer.
    Feedforward,
    /// Fully connected final layer whose activations are the prediction.
    Output,
    /// Reserved for convolutional grids. Every computation on it fails with
    /// `UnsupportedLayerOperation`.
    Convolutional,
}

impl LayerKind {
    pub fn name(self) -> &'static str {
        match self {
            LayerKind::Input => "input",
            LayerKind::Feedforward => "feedforward",
            LayerKind::Output => "output",
            LayerKind::Convolutional => "convolutional",
        }
    }
}

/// One layer of neurons arranged in a `width × height` grid.
///
/// `weights` holds one row per neuron with one column per neuron of the
/// previous layer; `biases` holds one value per neuron.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Layer {
    kind: LayerKind,
    width: usize,
    height: usize,
    weights: Matrix,
    biases: Matrix,
}

impl Layer {
    pub fn new(kind: LayerKind, width: usize, height: usize) -> Layer {
        Layer {
            kind,
            width,
            height,
            weights: Matrix::new(),
            biases: Matrix::new(),
        }
    }

    pub fn input(height: usize) -> Layer {
        Layer::new(LayerKind::Input, 1, height)
    }

    pub fn hidden(height: usize) -> Layer {
        Layer::new(LayerKind::Feedforward, 1, height)
    }

    pub fn output(height: usize) -> Layer {
        Layer::new(LayerKind::Output, 1, height)
    }

    pub fn convolutional(width: usize, height: usize) -> Layer {
        Layer::new(LayerKind::Convolutional, width, height)
    }

    pub fn kind(&self) -> LayerKind {
        self.kind
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Number of neurons.
    pub fn size(&self) -> usize {
        self.width * self.height
    }

    pub fn weights(&self) -> &Matrix {
        &self.weights
    }

    pub fn biases(&self) -> &Matrix {
        &self.biases
    }

    /// Overwrites the weight from input `input` into neuron `neuron`.
    pub fn set_weight(&mut self, neuron: usize, input: usize, value: f64) -> Result<()> {
        self.weights.get_matrix_mut(neuron)?.set(input, value)
    }

    pub fn set_bias(&mut self, neuron: usize, value: f64) -> Result<()> {
        self.biases.set(neuron, value)
    }

    fn unsupported(&self, operation: &'static str) -> NetworkError {
        NetworkError::UnsupportedLayerOperation {
            layer: self.kind.name(),
            operation,
        }
    }

    /// Populates weights and biases. `previous_size` is the neuron count of
    /// the preceding layer; `n` is the network-wide fan-in scale.
    pub fn initialize(
        &mut self,
        init: &dyn Initialization,
        previous_size: usize,
        rng: &mut StdRng,
        n: usize,
    ) -> Result<()> {
        let (weights, biases) = match self.kind {
            LayerKind::Input => input::identity_parameters(self.size()),
            LayerKind::Feedforward | LayerKind::Output => {
                dense::random_parameters(init, self.size(), previous_size, rng, n)
            }
            LayerKind::Convolutional => return Err(self.unsupported("initialize")),
        };
        self.weights = weights;
        self.biases = biases;
        Ok(())
    }

    /// Propagates `input` through this layer, appending z and a to `trace`.
    pub fn feedforward(
        &self,
        input: &Matrix,
        activation: &dyn Activation,
        trace: &mut Trace,
    ) -> Result<Matrix> {
        match self.kind {
            LayerKind::Input => {
                if input.len() != self.size() {
                    return Err(NetworkError::shape(format!(
                        "input layer expects {} values, got {}",
                        self.size(),
                        input.len()
                    )));
                }
                Ok(input::pass_through(input, trace))
            }
            LayerKind::Feedforward | LayerKind::Output => {
                dense::forward(&self.weights, &self.biases, input, activation, trace)
            }
            LayerKind::Convolutional => Err(self.unsupported("feedforward")),
        }
    }

    /// Replaces the parameters with `biases - bias_step` and
    /// `weights - weight_step`. Steps arrive already scaled and signed.
    pub fn update(&mut self, bias_step: &Matrix, weight_step: &Matrix) -> Result<()> {
        match self.kind {
            LayerKind::Input => Ok(()),
            LayerKind::Feedforward | LayerKind::Output => {
                let (weights, biases) =
                    dense::stepped(&self.weights, &self.biases, weight_step, bias_step)?;
                self.weights = weights;
                self.biases = biases;
                Ok(())
            }
            LayerKind::Convolutional => Err(self.unsupported("update")),
        }
    }

    /// Verifies the weight shape against this layer's size and the previous
    /// layer's size.
    pub fn check(&self, previous_size: usize) -> Result<()> {
        let name = self.kind.name();
        if self.weights.len() != self.size() {
            return Err(NetworkError::config(format!(
                "{name} layer has {} neurons but {} weight rows",
                self.size(),
                self.weights.len()
            )));
        }
        if self.biases.len() != self.size() {
            return Err(NetworkError::config(format!(
                "{name} layer has {} neurons but {} biases",
                self.size(),
                self.biases.len()
            )));
        }
        if let Some(neuron) = self.biases.iter().position(|b| b.as_scalar().is_none()) {
            return Err(NetworkError::config(format!(
                "{name} layer bias {neuron} is a matrix, expected a scalar"
            )));
        }
        for (neuron, row) in self.weights.iter().enumerate() {
            let columns = match row {
                Element::Nested(m) => m.len(),
                Element::Scalar(_) => {
                    return Err(NetworkError::config(format!(
                        "{name} layer weight row {neuron} is a scalar"
                    )))
                }
            };
            if columns != previous_size {
                return Err(NetworkError::config(format!(
                    "{name} layer neuron {neuron} has {columns} weights, previous layer has {previous_size} neurons"
                )));
            }
        }
        Ok(())
    }
}
