pub mod dense;
pub mod input;
pub mod layer;
pub mod trace;

pub use layer::{Layer, LayerKind};
pub use trace::Trace;
