//! Integration tests for the full karate-club training run.
//!
//! Every run is seeded, so two runs with the same configuration must agree
//! bit for bit.

use simplicial_dist2cycle::config::{ExperimentConfig, FeatureSource};
use simplicial_dist2cycle::experiment::Experiment;
use simplicial_dist2cycle::nn::Parameterized;
use simplicial_dist2cycle::training::{EpochReport, OptimizerKind};

fn run(cfg: &ExperimentConfig) -> Vec<EpochReport> {
    let mut exp = Experiment::prepare(cfg).expect("experiment must prepare");
    exp.run(|_| {}).expect("training must succeed").reports
}

// ---------------------------------------------------------------------------
// Default run
// ---------------------------------------------------------------------------

#[test]
fn default_run_reports_every_epoch() {
    let cfg = ExperimentConfig::default();
    let mut exp = Experiment::prepare(&cfg).unwrap();

    let mut printed = Vec::new();
    let history = exp.run(|r| printed.push(r.to_string())).unwrap();

    assert_eq!(history.reports.len(), 60);
    assert_eq!(printed.len(), 60);
    for (i, report) in history.reports.iter().enumerate() {
        assert_eq!(report.epoch, i + 1);
        assert_eq!(report.test_accuracy.is_some(), report.epoch % 2 == 0);
    }
    assert!(printed[0].starts_with("Epoch: 1 loss: "));
    assert!(printed[1].contains("\nTest_acc: "));
}

/// Seeds the default schedule is checked against
const SEEDS: [u64; 3] = [42, 0, 7];

/// True when every node gets the same one-hot prediction
fn saturated_single_class(probs: &[Vec<f64>]) -> bool {
    let first = &probs[0];
    first.iter().any(|&p| p >= 1.0 - 1e-9)
        && probs
            .iter()
            .all(|row| row.iter().zip(first).all(|(a, b)| (a - b).abs() < 1e-12))
}

#[test]
fn default_run_losses_are_finite_and_do_not_grow() {
    for seed in SEEDS {
        let cfg = ExperimentConfig {
            seed,
            ..Default::default()
        };
        let mut exp = Experiment::prepare(&cfg).unwrap();
        let history = exp.run(|_| {}).unwrap();

        let losses = history.losses();
        assert!(losses.iter().all(|l| l.is_finite()), "seed {seed}: {losses:?}");

        let windows = history.windowed_mean_loss(10);
        let first = windows[0];
        let last = windows[windows.len() - 1];
        assert!(
            last <= first,
            "seed {seed}: late window {last} > early window {first}"
        );
    }
}

#[test]
fn default_run_beats_chance_floor() {
    for seed in SEEDS {
        let cfg = ExperimentConfig {
            seed,
            ..Default::default()
        };
        let mut exp = Experiment::prepare(&cfg).unwrap();
        let history = exp.run(|_| {}).unwrap();

        let train = history.final_train_accuracy().unwrap();
        assert!(train > 0.40, "seed {seed}: final train accuracy {train}");
        let test = history.final_test_accuracy().unwrap();
        assert!((0.0..=1.0).contains(&test));
    }
}

#[test]
fn default_run_does_not_saturate() {
    for seed in SEEDS {
        let cfg = ExperimentConfig {
            seed,
            ..Default::default()
        };
        let mut exp = Experiment::prepare(&cfg).unwrap();
        exp.run(|_| {}).unwrap();

        let probs = exp.predict().unwrap().to_vec2::<f64>().unwrap();
        assert!(
            !saturated_single_class(&probs),
            "seed {seed}: every node predicted {:?}",
            probs[0]
        );
    }
}

// ---------------------------------------------------------------------------
// Reproducibility
// ---------------------------------------------------------------------------

#[test]
fn same_seed_same_losses() {
    let cfg = ExperimentConfig {
        epochs: 8,
        n_layers: 3,
        ..Default::default()
    };
    let a: Vec<f64> = run(&cfg).iter().map(|r| r.loss).collect();
    let b: Vec<f64> = run(&cfg).iter().map(|r| r.loss).collect();
    assert_eq!(a, b);
}

#[test]
fn zero_epochs_changes_nothing() {
    let cfg = ExperimentConfig {
        epochs: 0,
        ..Default::default()
    };
    let mut exp = Experiment::prepare(&cfg).unwrap();
    let before = exp.network().parameter_snapshot().unwrap();
    let history = exp.run(|_| panic!("no epoch should run")).unwrap();

    assert!(history.reports.is_empty());
    assert_eq!(history.final_train_accuracy(), None);
    assert_eq!(before, exp.network().parameter_snapshot().unwrap());
}

#[test]
fn training_updates_parameters() {
    let cfg = ExperimentConfig {
        epochs: 1,
        n_layers: 2,
        ..Default::default()
    };
    let mut exp = Experiment::prepare(&cfg).unwrap();
    let before = exp.network().parameter_snapshot().unwrap();
    exp.run(|_| {}).unwrap();
    assert_ne!(before, exp.network().parameter_snapshot().unwrap());
}

// ---------------------------------------------------------------------------
// Alternative settings
// ---------------------------------------------------------------------------

#[test]
fn sgd_with_edge_attributes_runs() {
    let cfg = ExperimentConfig {
        features: FeatureSource::EdgeAttributes,
        optimizer: OptimizerKind::Sgd,
        learning_rate: 0.05,
        epochs: 6,
        n_layers: 2,
        test_interval: 3,
        ..Default::default()
    };
    let reports = run(&cfg);
    assert_eq!(reports.len(), 6);
    assert!(reports.iter().all(|r| r.loss.is_finite()));
    let tested: Vec<usize> = reports
        .iter()
        .filter(|r| r.test_accuracy.is_some())
        .map(|r| r.epoch)
        .collect();
    assert_eq!(tested, vec![3, 6]);
}

#[test]
fn predictions_are_distributions() {
    let exp = Experiment::prepare(&ExperimentConfig::default()).unwrap();
    let probs = exp.predict().unwrap().to_vec2::<f64>().unwrap();
    assert_eq!(probs.len(), 34);
    for row in probs {
        assert!((row.iter().sum::<f64>() - 1.0).abs() < 1e-9);
    }
}
