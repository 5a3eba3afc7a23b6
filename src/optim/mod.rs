pub mod sgd;

pub use sgd::{GradientNormalization, Sgd};
