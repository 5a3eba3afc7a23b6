pub mod activation;

pub use activation::{Activation, ActivationType, ReLU, Sigmoid, Tanh};
