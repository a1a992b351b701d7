//! Classifier on top of the Dist2Cycle stack.
//!
//! ```text
//!   edge features ──► Dist2Cycle × n_layers ──► readout (edges → nodes)
//!                 ──► Linear(channels → out) ──► softmax
//! ```

use candle_core::{Device, Tensor, Var, D};
use rand::rngs::StdRng;
use rand::SeedableRng;

use super::{Dist2Cycle, Linear, Parameterized};
use crate::error::{Dist2CycleError, Dist2CycleResult};
use crate::structure::StructureTensors;

#[derive(Debug, Clone)]
pub struct Network {
    base: Dist2Cycle,
    head: Linear,
}

impl Network {
    /// All parameters are drawn from a `StdRng` seeded with `seed`.
    pub fn new(
        channels: usize,
        out_channels: usize,
        n_layers: usize,
        seed: u64,
        device: &Device,
    ) -> Dist2CycleResult<Self> {
        let mut rng = StdRng::seed_from_u64(seed);
        let base = Dist2Cycle::new(channels, n_layers, &mut rng, device)?;
        let head = Linear::new(channels, out_channels, &mut rng, device)?;
        Ok(Self { base, head })
    }

    pub fn channels(&self) -> usize {
        self.head.in_channels()
    }

    pub fn out_channels(&self) -> usize {
        self.head.out_channels()
    }

    pub fn n_layers(&self) -> usize {
        self.base.n_layers()
    }

    /// Class probabilities, one row per face of the structure's readout.
    pub fn forward(&self, x: &Tensor, structure: &StructureTensors) -> Dist2CycleResult<Tensor> {
        let (_, channels) = x.dims2()?;
        if channels != self.channels() {
            return Err(Dist2CycleError::shape_mismatch(
                "feature channels",
                vec![self.channels()],
                vec![channels],
            ));
        }

        let h = self.base.forward(x, &structure.linv, &structure.adjacency)?;
        let pooled = structure.readout.matmul(&h)?;
        let logits = self.head.forward(&pooled)?;
        Ok(candle_nn::ops::softmax(&logits, D::Minus1)?)
    }

    /// `forward` cut off from the autodiff graph, for evaluation
    pub fn predict(&self, x: &Tensor, structure: &StructureTensors) -> Dist2CycleResult<Tensor> {
        Ok(self.forward(x, structure)?.detach())
    }
}

impl Parameterized for Network {
    fn parameters(&self) -> Vec<Var> {
        let mut out = self.base.parameters();
        out.extend(self.head.parameters());
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::structure::{StructuralInputs, StructureOptions};
    use crate::topology::SimplicialComplex;
    use candle_core::DType;

    fn structure() -> StructureTensors {
        let k = SimplicialComplex::from_simplices(vec![vec![0, 1, 2], vec![1, 2, 3], vec![3, 4]]).unwrap();
        StructuralInputs::extract(&k, 1, StructureOptions::default())
            .unwrap()
            .to_tensors(&Device::Cpu)
            .unwrap()
    }

    #[test]
    fn test_softmax_rows_are_distributions() {
        let structure = structure();
        let net = Network::new(3, 2, 4, 11, &Device::Cpu).unwrap();
        let x = Tensor::randn(0.0f64, 3.0, (6, 3), &Device::Cpu).unwrap();

        let probs = net.forward(&x, &structure).unwrap();
        assert_eq!(probs.dims(), &[5, 2]);
        for row in probs.to_vec2::<f64>().unwrap() {
            assert!(row.iter().all(|&p| p >= 0.0));
            assert!((row.iter().sum::<f64>() - 1.0).abs() < 1e-9);
        }
    }

    #[test]
    fn test_zero_input_still_normalised() {
        let structure = structure();
        let net = Network::new(3, 2, 10, 0, &Device::Cpu).unwrap();
        let x = Tensor::zeros((6, 3), DType::F64, &Device::Cpu).unwrap();
        for row in net.forward(&x, &structure).unwrap().to_vec2::<f64>().unwrap() {
            assert!((row.iter().sum::<f64>() - 1.0).abs() < 1e-9);
        }
    }

    #[test]
    fn test_seed_determines_parameters() {
        let a = Network::new(3, 2, 2, 5, &Device::Cpu).unwrap();
        let b = Network::new(3, 2, 2, 5, &Device::Cpu).unwrap();
        let c = Network::new(3, 2, 2, 6, &Device::Cpu).unwrap();
        assert_eq!(a.parameter_snapshot().unwrap(), b.parameter_snapshot().unwrap());
        assert_ne!(a.parameter_snapshot().unwrap(), c.parameter_snapshot().unwrap());
    }

    #[test]
    fn test_predict_carries_no_gradient() {
        let structure = structure();
        let net = Network::new(3, 2, 2, 3, &Device::Cpu).unwrap();
        let x = Tensor::randn(0.0f64, 1.0, (6, 3), &Device::Cpu).unwrap();

        let tracked = net.forward(&x, &structure).unwrap();
        let detached = net.predict(&x, &structure).unwrap();
        assert_eq!(
            tracked.to_vec2::<f64>().unwrap(),
            detached.to_vec2::<f64>().unwrap()
        );

        let head_bias = net.parameters().pop().unwrap();
        let grads = detached.sum_all().unwrap().backward().unwrap();
        assert!(grads.get(&head_bias).is_none());
        let grads = tracked.sum_all().unwrap().backward().unwrap();
        assert!(grads.get(&head_bias).is_some());
    }

    #[test]
    fn test_rejects_wrong_channel_count() {
        let structure = structure();
        let net = Network::new(3, 2, 1, 0, &Device::Cpu).unwrap();
        let x = Tensor::zeros((6, 4), DType::F64, &Device::Cpu).unwrap();
        assert!(net.forward(&x, &structure).is_err());
    }
}
