use serde::{Serialize, Deserialize};
use tracing::info;

use crate::activation::ActivationType;
use crate::cost::CostType;
use crate::error::Result;
use crate::layers::Layer;
use crate::network::network::Network;
use crate::optim::sgd::Sgd;
use crate::regularization::RegularizationType;

/// Persisted form of a [`Network`].
///
/// Holds the layers with their parameters, the strategy type tags and the
/// step hyperparameters. Live strategy objects and the generator state are
/// never stored; `Network::from_state` derives them again.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NetworkState {
    pub seed: u64,
    pub layers: Vec<Layer>,
    pub activation: ActivationType,
    pub cost: CostType,
    pub regularization: RegularizationType,
    #[serde(flatten)]
    pub sgd: Sgd,
}

impl Network {
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(&self.to_state())?)
    }

    pub fn from_json(json: &str) -> Result<Network> {
        let state: NetworkState = serde_json::from_str(json)?;
        let network = Network::from_state(state)?;
        info!(layers = network.layers().len(), "loaded network from json");
        Ok(network)
    }

    /// Serializes the network to a pretty-printed JSON file.
    pub fn save_json(&self, path: &str) -> Result<()> {
        let file = std::fs::File::create(path)?;
        let writer = std::io::BufWriter::new(file);
        serde_json::to_writer_pretty(writer, &self.to_state())?;
        Ok(())
    }

    /// Deserializes a network from a JSON file previously written by `save_json`.
    pub fn load_json(path: &str) -> Result<Network> {
        let file = std::fs::File::open(path)?;
        let reader = std::io::BufReader::new(file);
        let state: NetworkState = serde_json::from_reader(reader)?;
        let network = Network::from_state(state)?;
        info!(path, layers = network.layers().len(), "loaded network");
        Ok(network)
    }
}
