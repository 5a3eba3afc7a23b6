use rand::rngs::StdRng;
use rand::Rng;
use serde::{Serialize, Deserialize};
use std::fmt::Debug;

/// Selects how `NetworkConfig::build` seeds weights and biases.
///
/// - `Dumb`  — difference of two uniform draws, in (-1, 1).
/// - `Smart` — the same difference scaled by `1/√n` for weights, where `n` is
///             the network-wide size passed as fan-in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InitializationType {
    #[default]
    Dumb,
    Smart,
}

impl InitializationType {
    pub fn build(self) -> Box<dyn Initialization> {
        match self {
            InitializationType::Dumb => Box::new(DumbInitialization),
            InitializationType::Smart => Box::new(SmartInitialization),
        }
    }
}

/// Random generator for initial parameters. Every draw comes from the
/// network-owned generator so a seed fixes the result.
pub trait Initialization: Debug {
    fn weight(&self, rng: &mut StdRng, fan_in: usize) -> f64;
    fn bias(&self, rng: &mut StdRng, fan_in: usize) -> f64;
}

fn uniform_difference(rng: &mut StdRng) -> f64 {
    rng.gen::<f64>() - rng.gen::<f64>()
}

#[derive(Debug, Clone, Copy)]
pub struct DumbInitialization;

impl Initialization for DumbInitialization {
    fn weight(&self, rng: &mut StdRng, _fan_in: usize) -> f64 {
        uniform_difference(rng)
    }

    fn bias(&self, rng: &mut StdRng, _fan_in: usize) -> f64 {
        uniform_difference(rng)
    }
}

#[derive(Debug, Clone, Copy)]
pub struct SmartInitialization;

impl Initialization for SmartInitialization {
    fn weight(&self, rng: &mut StdRng, fan_in: usize) -> f64 {
        uniform_difference(rng) / (fan_in.max(1) as f64).sqrt()
    }

    fn bias(&self, rng: &mut StdRng, _fan_in: usize) -> f64 {
        uniform_difference(rng)
    }
}
