//! Affine projection `x W + b` with uniform fan-in initialisation.

use candle_core::{Device, Tensor, Var};
use rand::Rng;
use rand_distr::{Distribution, Uniform};

use super::Parameterized;
use crate::error::{Dist2CycleError, Dist2CycleResult};

/// Fully connected layer, weights stored `in × out`
#[derive(Debug, Clone)]
pub struct Linear {
    weight: Var,
    bias: Var,
}

impl Linear {
    /// Weights and bias drawn from U(-1/√in, 1/√in)
    pub fn new<R: Rng + ?Sized>(
        in_channels: usize,
        out_channels: usize,
        rng: &mut R,
        device: &Device,
    ) -> Dist2CycleResult<Self> {
        let bound = 1.0 / (in_channels.max(1) as f64).sqrt();
        Ok(Self {
            weight: uniform_var(&[in_channels, out_channels], bound, rng, device)?,
            bias: uniform_var(&[out_channels], bound, rng, device)?,
        })
    }

    pub fn forward(&self, x: &Tensor) -> Dist2CycleResult<Tensor> {
        Ok(x.matmul(&self.weight)?.broadcast_add(&self.bias)?)
    }

    pub fn in_channels(&self) -> usize {
        self.weight.dims()[0]
    }

    pub fn out_channels(&self) -> usize {
        self.weight.dims()[1]
    }
}

impl Parameterized for Linear {
    fn parameters(&self) -> Vec<Var> {
        vec![self.weight.clone(), self.bias.clone()]
    }
}

fn uniform_var<R: Rng + ?Sized>(
    shape: &[usize],
    bound: f64,
    rng: &mut R,
    device: &Device,
) -> Dist2CycleResult<Var> {
    let dist = Uniform::new_inclusive(-bound, bound)
        .map_err(|e| Dist2CycleError::Init(e.to_string()))?;
    let n: usize = shape.iter().product();
    let data: Vec<f64> = (0..n).map(|_| dist.sample(rng)).collect();
    let tensor = Tensor::from_vec(data, shape.to_vec(), device)?;
    Ok(Var::from_tensor(&tensor)?)
}
