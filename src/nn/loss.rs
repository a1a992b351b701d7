//! Binary classification losses and the thresholded accuracy metric.

use candle_core::Tensor;
use serde::{Deserialize, Serialize};

use crate::error::{Dist2CycleError, Dist2CycleResult};

/// Probabilities are clamped to `[EPS, 1 - EPS]` before taking logs
const EPS: f64 = 1e-7;

/// Which binary classification loss to apply to the network output
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LossKind {
    /// Sigmoid cross-entropy, treating the network output as logits.
    ///
    /// The network already ends in a softmax, so inputs live in [0, 1] and
    /// the loss stays bounded at lr 0.4.
    #[default]
    BceWithLogits,
    /// Plain cross-entropy on the probabilities
    Bce,
}

#[derive(Debug, Clone, Copy)]
pub struct LossFn {
    kind: LossKind,
}

impl LossFn {
    pub fn new(kind: LossKind) -> Self {
        Self { kind }
    }

    /// Mean loss over every entry, as a 0-dim tensor.
    pub fn compute(&self, input: &Tensor, target: &Tensor) -> Dist2CycleResult<Tensor> {
        if input.dims() != target.dims() {
            return Err(Dist2CycleError::shape_mismatch(
                "loss target",
                input.dims().to_vec(),
                target.dims().to_vec(),
            ));
        }

        let loss = match self.kind {
            LossKind::BceWithLogits => {
                // max(x, 0) - x·y + log(1 + exp(-|x|))
                let positive = input.relu()?;
                let xy = input.mul(target)?;
                let softplus = input.abs()?.neg()?.exp()?.affine(1.0, 1.0)?.log()?;
                positive.sub(&xy)?.add(&softplus)?
            }
            LossKind::Bce => {
                let p = input.clamp(EPS, 1.0 - EPS)?;
                let log_p = p.log()?;
                let log_not_p = p.affine(-1.0, 1.0)?.log()?;
                let not_target = target.affine(-1.0, 1.0)?;
                target
                    .mul(&log_p)?
                    .add(&not_target.mul(&log_not_p)?)?
                    .neg()?
            }
        };
        Ok(loss.mean_all()?)
    }
}

/// Fraction of rows whose thresholded prediction matches the target in
/// every column. Empty inputs score 0.
pub fn thresholded_accuracy(
    probabilities: &Tensor,
    targets: &Tensor,
    threshold: f64,
) -> Dist2CycleResult<f64> {
    if probabilities.dims() != targets.dims() {
        return Err(Dist2CycleError::shape_mismatch(
            "accuracy targets",
            probabilities.dims().to_vec(),
            targets.dims().to_vec(),
        ));
    }
    let probs = probabilities.to_vec2::<f64>()?;
    let targets = targets.to_vec2::<f64>()?;
    if probs.is_empty() {
        return Ok(0.0);
    }

    let correct = probs
        .iter()
        .zip(targets.iter())
        .filter(|(p, t)| {
            p.iter()
                .zip(t.iter())
                .all(|(&pv, &tv)| (pv > threshold) == (tv > 0.5))
        })
        .count();
    Ok(correct as f64 / probs.len() as f64)
}
