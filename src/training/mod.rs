//! Training Module: split, schedule and the epoch loop

mod split;
mod trainer;

pub use split::{binary_targets, LabelSplit};
pub use trainer::{
    EpochReport, OptimizerKind, Trainer, TrainingHistory, TrainingInputs, TrainingOptions,
};
