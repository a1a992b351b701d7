//! Full-batch training loop.
//!
//! Every epoch runs one forward pass over the whole complex, scores the
//! training rows, takes one optimizer step and, every `test_interval`
//! epochs, scores the test rows with a fresh forward pass. There is no early
//! stopping and nothing is checkpointed: the loop always runs `epochs`
//! epochs and reports each one.

use candle_core::Tensor;
use candle_nn::{AdamW, Optimizer, ParamsAdamW, SGD};
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::debug;

use super::LabelSplit;
use crate::error::{ConfigError, Dist2CycleError, Dist2CycleResult};
use crate::nn::{thresholded_accuracy, LossFn, LossKind, Network, Parameterized};
use crate::structure::StructureTensors;

/// First-order optimizer used for the parameter updates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OptimizerKind {
    /// Adam (AdamW with zero weight decay), β = (0.9, 0.999), ε = 1e-8
    #[default]
    Adam,
    /// Plain stochastic gradient descent
    Sgd,
}

enum ParamOptimizer {
    Adam(AdamW),
    Sgd(SGD),
}

impl ParamOptimizer {
    fn new(kind: OptimizerKind, network: &Network, learning_rate: f64) -> Dist2CycleResult<Self> {
        let vars = network.parameters();
        Ok(match kind {
            OptimizerKind::Adam => {
                let params = ParamsAdamW {
                    lr: learning_rate,
                    beta1: 0.9,
                    beta2: 0.999,
                    eps: 1e-8,
                    weight_decay: 0.0,
                };
                ParamOptimizer::Adam(AdamW::new(vars, params)?)
            }
            OptimizerKind::Sgd => ParamOptimizer::Sgd(SGD::new(vars, learning_rate)?),
        })
    }

    fn backward_step(&mut self, loss: &Tensor) -> Dist2CycleResult<()> {
        match self {
            ParamOptimizer::Adam(opt) => opt.backward_step(loss)?,
            ParamOptimizer::Sgd(opt) => opt.backward_step(loss)?,
        }
        Ok(())
    }
}

/// Schedule and objective of a training run
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrainingOptions {
    pub epochs: usize,
    pub learning_rate: f64,
    pub optimizer: OptimizerKind,
    pub loss: LossKind,
    /// Evaluate on the test rows when `epoch % test_interval == 0`
    pub test_interval: usize,
    pub threshold: f64,
}

impl Default for TrainingOptions {
    fn default() -> Self {
        Self {
            epochs: 60,
            learning_rate: 0.4,
            optimizer: OptimizerKind::Adam,
            loss: LossKind::BceWithLogits,
            test_interval: 2,
            threshold: 0.5,
        }
    }
}

/// Fixed inputs of a run: features, structure and split targets
#[derive(Debug, Clone)]
pub struct TrainingInputs {
    features: Tensor,
    structure: StructureTensors,
    train_targets: Tensor,
    test_targets: Tensor,
    split: LabelSplit,
}

impl TrainingInputs {
    /// `targets` has one row per readout row (node) and one column per class.
    pub fn new(
        features: Tensor,
        structure: StructureTensors,
        targets: Tensor,
        split: LabelSplit,
    ) -> Dist2CycleResult<Self> {
        let (n_features, _) = features.dims2()?;
        let (n_edges, _) = structure.linv.dims2()?;
        if n_features != n_edges {
            return Err(Dist2CycleError::shape_mismatch(
                "feature rows",
                vec![n_edges],
                vec![n_features],
            ));
        }

        let (n_targets, _) = targets.dims2()?;
        let (n_nodes, _) = structure.readout.dims2()?;
        if n_targets != n_nodes || split.n_rows() != n_nodes {
            return Err(Dist2CycleError::shape_mismatch(
                "target rows",
                vec![n_nodes],
                vec![n_targets, split.n_rows()],
            ));
        }

        let train_targets = targets.narrow(0, split.train.start, split.train.len())?;
        let test_targets = targets.narrow(0, split.test.start, split.test.len())?;
        Ok(Self {
            features,
            structure,
            train_targets,
            test_targets,
            split,
        })
    }

    pub fn features(&self) -> &Tensor {
        &self.features
    }

    pub fn structure(&self) -> &StructureTensors {
        &self.structure
    }
}

/// What one epoch produced
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EpochReport {
    pub epoch: usize,
    pub loss: f64,
    pub train_accuracy: f64,
    /// Only set on test epochs
    pub test_accuracy: Option<f64>,
}

impl fmt::Display for EpochReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Epoch: {} loss: {:.4} Train_acc: {:.4}",
            self.epoch, self.loss, self.train_accuracy
        )?;
        if let Some(test) = self.test_accuracy {
            write!(f, "\nTest_acc: {:.4}", test)?;
        }
        Ok(())
    }
}

/// Every epoch report of a run, in order
#[derive(Debug, Clone, Default)]
pub struct TrainingHistory {
    pub reports: Vec<EpochReport>,
}

impl TrainingHistory {
    pub fn losses(&self) -> Vec<f64> {
        self.reports.iter().map(|r| r.loss).collect()
    }

    /// Mean loss over each window of `window` consecutive epochs
    pub fn windowed_mean_loss(&self, window: usize) -> Vec<f64> {
        if window == 0 {
            return Vec::new();
        }
        self.losses()
            .windows(window)
            .map(|w| w.iter().sum::<f64>() / window as f64)
            .collect()
    }

    pub fn final_train_accuracy(&self) -> Option<f64> {
        self.reports.last().map(|r| r.train_accuracy)
    }

    pub fn final_test_accuracy(&self) -> Option<f64> {
        self.reports.iter().rev().find_map(|r| r.test_accuracy)
    }
}

pub struct Trainer {
    options: TrainingOptions,
    loss_fn: LossFn,
}

impl Trainer {
    /// Rejects a zero test interval, a non-positive learning rate and a
    /// threshold outside (0, 1).
    pub fn new(options: TrainingOptions) -> Dist2CycleResult<Self> {
        if options.test_interval == 0 {
            return Err(ConfigError::invalid_value("test_interval", "must be > 0").into());
        }
        if !options.learning_rate.is_finite() || options.learning_rate <= 0.0 {
            return Err(ConfigError::invalid_value("learning_rate", "must be > 0.0").into());
        }
        if options.threshold.is_nan() || options.threshold <= 0.0 || options.threshold >= 1.0 {
            return Err(ConfigError::invalid_value("threshold", "must be in (0, 1)").into());
        }
        Ok(Self {
            loss_fn: LossFn::new(options.loss),
            options,
        })
    }

    /// Train `network` in place, handing each epoch report to `observer`.
    pub fn run<F>(
        &self,
        network: &mut Network,
        inputs: &TrainingInputs,
        mut observer: F,
    ) -> Dist2CycleResult<TrainingHistory>
    where
        F: FnMut(&EpochReport),
    {
        let mut history = TrainingHistory::default();
        if self.options.epochs == 0 {
            return Ok(history);
        }

        let mut optimizer =
            ParamOptimizer::new(self.options.optimizer, network, self.options.learning_rate)?;
        let train = &inputs.split.train;
        let test = &inputs.split.test;

        for epoch in 1..=self.options.epochs {
            let output = network.forward(&inputs.features, &inputs.structure)?;
            let train_output = output.narrow(0, train.start, train.len())?;

            let loss = self.loss_fn.compute(&train_output, &inputs.train_targets)?;
            optimizer.backward_step(&loss)?;
            let loss_value = loss.to_scalar::<f64>()?;

            let train_accuracy =
                thresholded_accuracy(&train_output, &inputs.train_targets, self.options.threshold)?;

            // Fresh pass with the updated parameters
            let test_accuracy = if epoch % self.options.test_interval == 0 {
                let output = network.predict(&inputs.features, &inputs.structure)?;
                let test_output = output.narrow(0, test.start, test.len())?;
                Some(thresholded_accuracy(
                    &test_output,
                    &inputs.test_targets,
                    self.options.threshold,
                )?)
            } else {
                None
            };

            let report = EpochReport {
                epoch,
                loss: loss_value,
                train_accuracy,
                test_accuracy,
            };
            debug!(epoch, loss = loss_value, train_accuracy, ?test_accuracy, "epoch finished");
            observer(&report);
            history.reports.push(report);
        }

        Ok(history)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_report_format() {
        let plain = EpochReport {
            epoch: 1,
            loss: 0.72345,
            train_accuracy: 0.5,
            test_accuracy: None,
        };
        assert_eq!(plain.to_string(), "Epoch: 1 loss: 0.7235 Train_acc: 0.5000");

        let with_test = EpochReport {
            test_accuracy: Some(0.75),
            epoch: 2,
            ..plain
        };
        assert_eq!(
            with_test.to_string(),
            "Epoch: 2 loss: 0.7235 Train_acc: 0.5000\nTest_acc: 0.7500"
        );
    }

    #[test]
    fn test_rejects_unusable_options() {
        let bad = [
            TrainingOptions { test_interval: 0, ..Default::default() },
            TrainingOptions { learning_rate: 0.0, ..Default::default() },
            TrainingOptions { learning_rate: f64::NAN, ..Default::default() },
            TrainingOptions { threshold: 1.0, ..Default::default() },
        ];
        for options in bad {
            assert!(
                matches!(Trainer::new(options), Err(Dist2CycleError::Config(_))),
                "{options:?} should be rejected"
            );
        }
        assert!(Trainer::new(TrainingOptions::default()).is_ok());
    }

    #[test]
    fn test_history_windows() {
        let history = TrainingHistory {
            reports: (1..=4)
                .map(|epoch| EpochReport {
                    epoch,
                    loss: epoch as f64,
                    train_accuracy: 0.0,
                    test_accuracy: if epoch == 2 { Some(0.25) } else { None },
                })
                .collect(),
        };
        assert_eq!(history.windowed_mean_loss(2), vec![1.5, 2.5, 3.5]);
        assert!(history.windowed_mean_loss(0).is_empty());
        assert_eq!(history.final_test_accuracy(), Some(0.25));
        assert_eq!(history.final_train_accuracy(), Some(0.0));
    }
}
