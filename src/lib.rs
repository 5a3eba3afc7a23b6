pub mod error;
pub mod math;
pub mod activation;
pub mod cost;
pub mod regularization;
pub mod initialization;
pub mod layers;
pub mod network;
pub mod optim;
pub mod train;

// Convenience re-exports
pub use error::{NetworkError, Result};
pub use math::matrix::{Element, Matrix};
pub use activation::ActivationType;
pub use cost::CostType;
pub use regularization::RegularizationType;
pub use initialization::InitializationType;
pub use layers::{Layer, LayerKind, Trace};
pub use network::{Gradient, LayerSpec, Network, NetworkConfig, NetworkState};
pub use optim::sgd::{GradientNormalization, Sgd};
pub use train::{train_loop, EpochStats, TrainConfig};
