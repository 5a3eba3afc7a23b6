use crate::math::matrix::Matrix;

/// Pre-activation (z) and post-activation (a) vectors recorded by a forward
/// pass, one entry per layer in order. The input layer records its input as
/// both.
#[derive(Debug, Clone, Default)]
pub struct Trace {
    pub zs: Vec<Matrix>,
    pub activations: Vec<Matrix>,
}

impl Trace {
    pub fn new() -> Trace {
        Trace::default()
    }

    pub fn record(&mut self, z: Matrix, a: Matrix) {
        self.zs.push(z);
        self.activations.push(a);
    }

    pub fn len(&self) -> usize {
        self.zs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.zs.is_empty()
    }
}
