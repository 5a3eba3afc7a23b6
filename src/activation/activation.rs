use serde::{Serialize, Deserialize};
use std::f64::consts::E;
use std::fmt::Debug;

/// Persisted tag selecting the activation used by every non-input layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivationType {
    #[default]
    Sigmoid,
    #[serde(rename = "relu")]
    ReLU,
    Tanh,
}

impl ActivationType {
    /// Derives the live strategy for this tag.
    pub fn build(self) -> Box<dyn Activation> {
        match self {
            ActivationType::Sigmoid => Box::new(Sigmoid),
            ActivationType::ReLU => Box::new(ReLU),
            ActivationType::Tanh => Box::new(Tanh),
        }
    }
}

/// Element-wise activation and its derivative, both evaluated at the
/// pre-activation value `z`.
pub trait Activation: Debug {
    fn value(&self, z: f64) -> f64;
    fn derivative(&self, z: f64) -> f64;
}

#[derive(Debug, Clone, Copy)]
pub struct Sigmoid;

impl Activation for Sigmoid {
    fn value(&self, z: f64) -> f64 {
        1.0 / (1.0 + E.powf(-z))
    }

    fn derivative(&self, z: f64) -> f64 {
        let fz = self.value(z);
        fz * (1.0 - fz)
    }
}

#[derive(Debug, Clone, Copy)]
pub struct ReLU;

impl Activation for ReLU {
    fn value(&self, z: f64) -> f64 {
        if z > 0.0 { z } else { 0.0 }
    }

    fn derivative(&self, z: f64) -> f64 {
        if z > 0.0 { 1.0 } else { 0.0 }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct Tanh;

impl Activation for Tanh {
    fn value(&self, z: f64) -> f64 {
        z.tanh()
    }

    fn derivative(&self, z: f64) -> f64 {
        let t = z.tanh();
        1.0 - t * t
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn sigmoid_is_centered_at_half() {
        let s = ActivationType::Sigmoid.build();
        assert_relative_eq!(s.value(0.0), 0.5);
        assert_relative_eq!(s.derivative(0.0), 0.25);
    }

    #[test]
    fn relu_clamps_negatives() {
        let r = ActivationType::ReLU.build();
        assert_eq!(r.value(-3.0), 0.0);
        assert_eq!(r.value(2.5), 2.5);
        assert_eq!(r.derivative(-1.0), 0.0);
        assert_eq!(r.derivative(1.0), 1.0);
    }

    #[test]
    fn derivatives_match_finite_differences() {
        let h = 1e-6;
        for tag in [ActivationType::Sigmoid, ActivationType::Tanh] {
            let f = tag.build();
            for z in [-2.0, -0.3, 0.0, 0.7, 1.9] {
                let numeric = (f.value(z + h) - f.value(z - h)) / (2.0 * h);
                assert_relative_eq!(f.derivative(z), numeric, epsilon = 1e-6);
            }
        }
    }

    #[test]
    fn tags_use_snake_case() {
        assert_eq!(serde_json::to_string(&ActivationType::ReLU).unwrap(), "\"relu\"");
        let t: ActivationType = serde_json::from_str("\"tanh\"").unwrap();
        assert_eq!(t, ActivationType::Tanh);
    }
}
