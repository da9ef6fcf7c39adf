use candle_core::{Module, Result, Tensor};

/// Ordered stack of residual blocks applied back to back.
#[derive(Debug, Clone)]
pub struct Sequential<T: Module> {
    layers: Vec<T>,
}

pub fn seq<T: Module>(capacity: usize) -> Sequential<T> {
    Sequential {
        layers: Vec::with_capacity(capacity),
    }
}

impl<T: Module> Sequential<T> {
    pub fn len(&self) -> usize {
        self.layers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }

    pub fn push(mut self, layer: T) -> Self {
        self.layers.push(layer);
        self
    }
}

impl<T: Module> Module for Sequential<T> {
    fn forward(&self, xs: &Tensor) -> Result<Tensor> {
        let mut xs = xs.clone();
        for layer in self.layers.iter() {
            xs = xs.apply(layer)?;
        }
        Ok(xs)
    }
}
