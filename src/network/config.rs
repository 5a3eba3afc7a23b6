use serde::{Serialize, Deserialize};
use tracing::info;

use crate::activation::ActivationType;
use crate::cost::CostType;
use crate::error::Result;
use crate::initialization::InitializationType;
use crate::layers::{Layer, LayerKind};
use crate::network::network::Network;
use crate::optim::sgd::{GradientNormalization, Sgd};
use crate::regularization::RegularizationType;

/// Describes one layer in a network configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayerSpec {
    pub kind: LayerKind,
    #[serde(default = "one")]
    pub width: usize,
    pub height: usize,
}

fn one() -> usize {
    1
}

impl LayerSpec {
    fn to_layer(self) -> Layer {
        Layer::new(self.kind, self.width, self.height)
    }
}

/// Everything needed to build and initialize a [`Network`].
///
/// Layers are listed input first. [`build`](NetworkConfig::build) validates
/// the whole configuration once; a network that comes out of it has a legal
/// topology and correctly shaped weights.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NetworkConfig {
    pub seed: u64,
    pub layers: Vec<LayerSpec>,
    pub eta: f64,
    pub lambda: f64,
    pub cost: CostType,
    pub activation: ActivationType,
    pub initialization: InitializationType,
    pub regularization: RegularizationType,
    pub normalization: GradientNormalization,
    pub weight_decay: bool,
}

impl Default for NetworkConfig {
    fn default() -> Self {
        NetworkConfig {
            seed: 0,
            layers: Vec::new(),
            eta: 0.5,
            lambda: 0.0,
            cost: CostType::default(),
            activation: ActivationType::default(),
            initialization: InitializationType::default(),
            regularization: RegularizationType::default(),
            normalization: GradientNormalization::default(),
            weight_decay: false,
        }
    }
}

impl NetworkConfig {
    pub fn new(seed: u64) -> Self {
        NetworkConfig { seed, ..Default::default() }
    }

    fn layer(mut self, kind: LayerKind, width: usize, height: usize) -> Self {
        self.layers.push(LayerSpec { kind, width, height });
        self
    }

    pub fn input(self, height: usize) -> Self {
        self.layer(LayerKind::Input, 1, height)
    }

    pub fn input_grid(self, width: usize, height: usize) -> Self {
        self.layer(LayerKind::Input, width, height)
    }

    pub fn feedforward(self, height: usize) -> Self {
        self.layer(LayerKind::Feedforward, 1, height)
    }

    pub fn convolutional(self, width: usize, height: usize) -> Self {
        self.layer(LayerKind::Convolutional, width, height)
    }

    pub fn output(self, height: usize) -> Self {
        self.layer(LayerKind::Output, 1, height)
    }

    pub fn eta(mut self, eta: f64) -> Self {
        self.eta = eta;
        self
    }

    pub fn lambda(mut self, lambda: f64) -> Self {
        self.lambda = lambda;
        self
    }

    pub fn cost(mut self, cost: CostType) -> Self {
        self.cost = cost;
        self
    }

    pub fn activation(mut self, activation: ActivationType) -> Self {
        self.activation = activation;
        self
    }

    pub fn initialization(mut self, initialization: InitializationType) -> Self {
        self.initialization = initialization;
        self
    }

    pub fn regularization(mut self, regularization: RegularizationType) -> Self {
        self.regularization = regularization;
        self
    }

    pub fn normalization(mut self, normalization: GradientNormalization) -> Self {
        self.normalization = normalization;
        self
    }

    pub fn weight_decay(mut self, enabled: bool) -> Self {
        self.weight_decay = enabled;
        self
    }

    /// Validates the configuration, initializes parameters from the seeded
    /// generator and checks every layer's weight shape.
    pub fn build(&self) -> Result<Network> {
        let sgd = Sgd {
            eta: self.eta,
            lambda: self.lambda,
            normalization: self.normalization,
            weight_decay: self.weight_decay,
        };
        sgd.validate()?;
        let layers = self.layers.iter().map(|spec| spec.to_layer()).collect();
        let mut network = Network::assemble(
            layers,
            self.activation,
            self.cost,
            self.regularization,
            sgd,
            self.seed,
        )?;
        network.initialize(self.initialization.build().as_ref())?;
        network.refresh()?;

        info!(
            seed = self.seed,
            layers = self.layers.len(),
            size = network.size()?,
            "built network"
        );
        Ok(network)
    }

    /// Serializes the configuration to a pretty-printed JSON file.
    pub fn save_json(&self, path: &str) -> Result<()> {
        let file = std::fs::File::create(path)?;
        let writer = std::io::BufWriter::new(file);
        serde_json::to_writer_pretty(writer, self)?;
        Ok(())
    }

    /// Deserializes a `NetworkConfig` from a JSON file.
    pub fn load_json(path: &str) -> Result<NetworkConfig> {
        let file = std::fs::File::open(path)?;
        let reader = std::io::BufReader::new(file);
        Ok(serde_json::from_reader(reader)?)
    }
}
