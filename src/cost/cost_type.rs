use serde::{Serialize, Deserialize};

use super::{Cost, CrossEntropyCost, QuadraticCost};

/// Persisted tag selecting the cost function.
///
/// - `Quadratic`    — `0.5·Σ(a - y)²`; pairs with any activation.
/// - `CrossEntropy` — binary cross-entropy summed over outputs; pair with Sigmoid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CostType {
    #[default]
    Quadratic,
    CrossEntropy,
}

impl CostType {
    pub fn build(self) -> Box<dyn Cost> {
        match self {
            CostType::Quadratic => Box::new(QuadraticCost),
            CostType::CrossEntropy => Box::new(CrossEntropyCost),
        }
    }
}
