//! Dist2Cycle message-passing layer.
//!
//! For edge features X (n × c), pseudo-inverse L⁺ and coface adjacency A:
//!
//! ```text
//!   X' = ReLU( (A ⊙ L⁺) · (X W + b) )
//! ```
//!
//! Every ordered pair of adjacent edges (i, j) contributes
//! `A[i,j] · L⁺[i,j] · (x_j W + b)` to edge i; contributions are summed per
//! destination edge before the nonlinearity.

use candle_core::{Device, Tensor, Var};
use rand::Rng;

use super::{Linear, Parameterized};
use crate::error::{Dist2CycleError, Dist2CycleResult};

#[derive(Debug, Clone)]
pub struct Dist2CycleLayer {
    transform: Linear,
}

impl Dist2CycleLayer {
    pub fn new<R: Rng + ?Sized>(
        channels: usize,
        rng: &mut R,
        device: &Device,
    ) -> Dist2CycleResult<Self> {
        Ok(Self {
            transform: Linear::new(channels, channels, rng, device)?,
        })
    }

    /// Output has the same shape as `x`.
    pub fn forward(&self, x: &Tensor, linv: &Tensor, adjacency: &Tensor) -> Dist2CycleResult<Tensor> {
        let (n, _) = x.dims2()?;
        let (rows, cols) = linv.dims2()?;
        if rows != n || cols != n {
            return Err(Dist2CycleError::shape_mismatch(
                "pseudo-inverse vs features",
                vec![n, n],
                vec![rows, cols],
            ));
        }

        let weighting = adjacency.mul(linv)?;
        let messages = self.transform.forward(x)?;
        Ok(weighting.matmul(&messages)?.relu()?)
    }
}

impl Parameterized for Dist2CycleLayer {
    fn parameters(&self) -> Vec<Var> {
        self.transform.parameters()
    }
}

/// A stack of identical Dist2Cycle layers
#[derive(Debug, Clone)]
pub struct Dist2Cycle {
    layers: Vec<Dist2CycleLayer>,
}

impl Dist2Cycle {
    pub fn new<R: Rng + ?Sized>(
        channels: usize,
        n_layers: usize,
        rng: &mut R,
        device: &Device,
    ) -> Dist2CycleResult<Self> {
        let layers = (0..n_layers)
            .map(|_| Dist2CycleLayer::new(channels, rng, device))
            .collect::<Dist2CycleResult<Vec<_>>>()?;
        Ok(Self { layers })
    }

    pub fn n_layers(&self) -> usize {
        self.layers.len()
    }

    pub fn forward(&self, x: &Tensor, linv: &Tensor, adjacency: &Tensor) -> Dist2CycleResult<Tensor> {
        let mut h = x.clone();
        for layer in &self.layers {
            h = layer.forward(&h, linv, adjacency)?;
        }
        Ok(h)
    }
}

impl Parameterized for Dist2Cycle {
    fn parameters(&self) -> Vec<Var> {
        self.layers.iter().flat_map(|l| l.parameters()).collect()
    }
}
