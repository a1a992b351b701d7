//! Experiment configuration.
//!
//! [`ExperimentConfig`] holds every knob of a run: how the complex is lifted,
//! how the structural inputs are regularised, the network shape and the
//! training schedule. Defaults give a 10-layer, 60-epoch Adam run at lr 0.4.
//!
//! # Example
//!
//! ```rust
//! use simplicial_dist2cycle::config::ExperimentConfig;
//!
//! let cfg = ExperimentConfig::default();
//! cfg.validate().expect("default config is valid");
//!
//! assert_eq!(cfg.n_layers, 10);
//! assert_eq!(cfg.epochs, 60);
//! ```

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::ConfigError;
use crate::nn::LossKind;
use crate::structure::StructureOptions;
use crate::topology::KARATE_CLUB_NODES;
use crate::training::{OptimizerKind, TrainingOptions};

/// Which per-edge tensor is fed to the network as features
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeatureSource {
    /// Rows of `A ⊙ L⁺`, one channel per edge
    #[default]
    EffectiveAdjacency,
    /// The 2-channel `edge_feat` attribute of the dataset
    EdgeAttributes,
}

impl std::str::FromStr for FeatureSource {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "effective_adjacency" => Ok(FeatureSource::EffectiveAdjacency),
            "edge_attributes" => Ok(FeatureSource::EdgeAttributes),
            other => Err(ConfigError::invalid_value(
                "features",
                format!("unknown feature source `{other}`"),
            )),
        }
    }
}

/// Complete configuration for one training run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExperimentConfig {
    // -----------------------------------------------------------------------
    // Dataset
    // -----------------------------------------------------------------------
    /// Highest simplex rank built by clique lifting (`None` = all). Must be
    /// at least 1, the rank the network runs on. Default: **None**.
    pub max_rank: Option<usize>,

    // -----------------------------------------------------------------------
    // Structure
    // -----------------------------------------------------------------------
    /// Singular values below this are zero in the pseudo-inverse. Default: **1e-10**.
    pub pinv_tolerance: f64,

    /// Multiple of the identity added to the down-Laplacian before
    /// inversion. Default: **1.0**, i.e. L⁺ = (L↓ + I)⁻¹.
    pub laplacian_shift: f64,

    /// Features fed to the first layer. Default: **effective_adjacency**.
    pub features: FeatureSource,

    // -----------------------------------------------------------------------
    // Model
    // -----------------------------------------------------------------------
    /// Number of stacked Dist2Cycle layers. Default: **10**.
    pub n_layers: usize,

    /// Output classes. Default: **2**.
    pub out_channels: usize,

    // -----------------------------------------------------------------------
    // Optimisation
    // -----------------------------------------------------------------------
    /// Default: **adam**.
    pub optimizer: OptimizerKind,

    /// Default: **0.4**.
    pub learning_rate: f64,

    /// Default: **60**.
    pub epochs: usize,

    /// Default: **bce_with_logits**.
    pub loss: LossKind,

    // -----------------------------------------------------------------------
    // Evaluation
    // -----------------------------------------------------------------------
    /// Evaluate on the test slice every N epochs. Default: **2**.
    pub test_interval: usize,

    /// Nodes `[0, train_size)` train, the rest test. Default: **30**.
    pub train_size: usize,

    /// Probability above which a class counts as predicted. Default: **0.5**.
    pub threshold: f64,

    // -----------------------------------------------------------------------
    // Reproducibility
    // -----------------------------------------------------------------------
    /// Seed for parameter initialisation. Default: **42**.
    pub seed: u64,
}

impl Default for ExperimentConfig {
    fn default() -> Self {
        ExperimentConfig {
            max_rank: None,
            pinv_tolerance: 1e-10,
            laplacian_shift: 1.0,
            features: FeatureSource::EffectiveAdjacency,
            n_layers: 10,
            out_channels: 2,
            optimizer: OptimizerKind::Adam,
            learning_rate: 0.4,
            epochs: 60,
            loss: LossKind::BceWithLogits,
            test_interval: 2,
            train_size: 30,
            threshold: 0.5,
            seed: 42,
        }
    }
}

impl ExperimentConfig {
    /// Load a configuration from a JSON file. Missing fields take their
    /// defaults; the result is validated.
    pub fn from_json(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::FileAccess {
            path: path.to_path_buf(),
            source,
        })?;
        let cfg: ExperimentConfig =
            serde_json::from_str(&contents).map_err(|source| ConfigError::Malformed {
                path: path.to_path_buf(),
                source,
            })?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Write this configuration as pretty-printed JSON.
    pub fn to_json(&self, path: &Path) -> Result<(), ConfigError> {
        let json = serde_json::to_string_pretty(self).map_err(|source| ConfigError::Malformed {
            path: path.to_path_buf(),
            source,
        })?;
        std::fs::write(path, json).map_err(|source| ConfigError::FileAccess {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Validate all fields and return the first problem found.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_rank == Some(0) {
            return Err(ConfigError::invalid_value(
                "max_rank",
                "must be >= 1, the network runs on edges",
            ));
        }
        if self.pinv_tolerance.is_nan() || self.pinv_tolerance <= 0.0 {
            return Err(ConfigError::invalid_value("pinv_tolerance", "must be > 0.0"));
        }
        if self.laplacian_shift.is_nan() || self.laplacian_shift < 0.0 {
            return Err(ConfigError::invalid_value("laplacian_shift", "must be >= 0.0"));
        }
        if self.n_layers == 0 {
            return Err(ConfigError::invalid_value("n_layers", "must be > 0"));
        }
        if self.out_channels == 0 {
            return Err(ConfigError::invalid_value("out_channels", "must be > 0"));
        }
        if self.learning_rate.is_nan() || self.learning_rate <= 0.0 {
            return Err(ConfigError::invalid_value("learning_rate", "must be > 0.0"));
        }
        if self.test_interval == 0 {
            return Err(ConfigError::invalid_value("test_interval", "must be > 0"));
        }
        if self.train_size == 0 || self.train_size >= KARATE_CLUB_NODES {
            return Err(ConfigError::invalid_value(
                "train_size",
                format!("must be in [1, {})", KARATE_CLUB_NODES),
            ));
        }
        if self.threshold.is_nan() || self.threshold <= 0.0 || self.threshold >= 1.0 {
            return Err(ConfigError::invalid_value("threshold", "must be in (0, 1)"));
        }
        Ok(())
    }

    pub fn structure_options(&self) -> StructureOptions {
        StructureOptions {
            pinv_tolerance: self.pinv_tolerance,
            laplacian_shift: self.laplacian_shift,
        }
    }

    pub fn training_options(&self) -> TrainingOptions {
        TrainingOptions {
            epochs: self.epochs,
            learning_rate: self.learning_rate,
            optimizer: self.optimizer,
            loss: self.loss,
            test_interval: self.test_interval,
            threshold: self.threshold,
        }
    }
}
