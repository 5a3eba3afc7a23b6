pub mod config;
pub mod network;
pub mod state;

pub use config::{LayerSpec, NetworkConfig};
pub use network::{Gradient, Network};
pub use state::NetworkState;
