//! End-to-end karate-club run: load, extract, build, train.

use candle_core::{Device, Tensor};
use tracing::info;

use crate::config::{ExperimentConfig, FeatureSource};
use crate::error::Dist2CycleResult;
use crate::nn::Network;
use crate::structure::{array_to_tensor, StructuralInputs};
use crate::topology::{feature_attribute, KarateClub, SimplicialDataset};
use crate::training::{
    binary_targets, EpochReport, LabelSplit, Trainer, TrainingHistory, TrainingInputs,
};

/// The network runs on edges
pub const EDGE_RANK: usize = 1;

/// A prepared experiment, ready to train
pub struct Experiment {
    config: ExperimentConfig,
    structure: StructuralInputs,
    inputs: TrainingInputs,
    network: Network,
}

impl Experiment {
    /// Validate `config`, lift the karate club and build every input.
    pub fn prepare(config: &ExperimentConfig) -> Dist2CycleResult<Self> {
        config.validate()?;
        let device = Device::Cpu;

        let dataset = KarateClub::load_with_max_rank(config.max_rank)?;
        let complex = dataset.complex();
        let structure =
            StructuralInputs::extract(complex, EDGE_RANK, config.structure_options())?;

        let features = match config.features {
            FeatureSource::EffectiveAdjacency => structure.effective_adjacency.clone(),
            FeatureSource::EdgeAttributes => complex
                .get_simplex_attributes(EDGE_RANK, &feature_attribute(EDGE_RANK))?
                .clone(),
        };
        let channels = features.ncols();

        let labels = dataset.labels();
        let split = LabelSplit::by_position(labels.len(), config.train_size)?;
        let targets = array_to_tensor(&binary_targets(labels), &device)?;

        let inputs = TrainingInputs::new(
            array_to_tensor(&features, &device)?,
            structure.to_tensors(&device)?,
            targets,
            split,
        )?;
        let network = Network::new(
            channels,
            config.out_channels,
            config.n_layers,
            config.seed,
            &device,
        )?;

        info!(
            channels,
            n_layers = config.n_layers,
            features = ?config.features,
            train = config.train_size,
            test = labels.len() - config.train_size,
            "prepared experiment"
        );

        Ok(Self {
            config: config.clone(),
            structure,
            inputs,
            network,
        })
    }

    /// Train for the configured number of epochs.
    pub fn run<F>(&mut self, observer: F) -> Dist2CycleResult<TrainingHistory>
    where
        F: FnMut(&EpochReport),
    {
        let trainer = Trainer::new(self.config.training_options())?;
        let history = trainer.run(&mut self.network, &self.inputs, observer)?;
        if let Some(accuracy) = history.final_train_accuracy() {
            info!(
                epochs = history.reports.len(),
                train_accuracy = accuracy,
                test_accuracy = ?history.final_test_accuracy(),
                "training finished"
            );
        }
        Ok(history)
    }

    /// Class probabilities for every node under the current parameters
    pub fn predict(&self) -> Dist2CycleResult<Tensor> {
        self.network
            .predict(self.inputs.features(), self.inputs.structure())
    }

    pub fn structure(&self) -> &StructuralInputs {
        &self.structure
    }

    pub fn network(&self) -> &Network {
        &self.network
    }
}
