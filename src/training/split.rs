//! Positional train/test split and binary targets.

use ndarray::{Array1, Array2};
use std::ops::Range;

use crate::error::{ConfigError, Dist2CycleResult};

/// Disjoint train and test row ranges, covering `0..n` in order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabelSplit {
    pub train: Range<usize>,
    pub test: Range<usize>,
}

impl LabelSplit {
    /// Rows `[0, train_size)` train, `[train_size, n)` test.
    pub fn by_position(n: usize, train_size: usize) -> Dist2CycleResult<Self> {
        if train_size == 0 || train_size > n {
            return Err(ConfigError::invalid_value(
                "train_size",
                format!("must be in [1, {n}]"),
            )
            .into());
        }
        Ok(Self {
            train: 0..train_size,
            test: train_size..n,
        })
    }

    pub fn n_rows(&self) -> usize {
        self.test.end
    }
}

/// Two-column targets: column 0 is the label, column 1 its complement
pub fn binary_targets(labels: &Array1<f64>) -> Array2<f64> {
    let mut targets = Array2::<f64>::zeros((labels.len(), 2));
    for (i, &y) in labels.iter().enumerate() {
        targets[[i, 0]] = y;
        targets[[i, 1]] = 1.0 - y;
    }
    targets
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_split_is_positional_and_disjoint() {
        let split = LabelSplit::by_position(34, 30).unwrap();
        assert_eq!(split.train, 0..30);
        assert_eq!(split.test, 30..34);
        assert_eq!(split.n_rows(), 34);
    }

    #[test]
    fn test_split_bounds() {
        assert!(LabelSplit::by_position(34, 0).is_err());
        assert!(LabelSplit::by_position(34, 35).is_err());
        // Everything in training leaves an empty test slice
        assert!(LabelSplit::by_position(34, 34).unwrap().test.is_empty());
    }

    #[test]
    fn test_binary_targets() {
        let targets = binary_targets(&array![1.0, 0.0]);
        assert_eq!(targets, array![[1.0, 0.0], [0.0, 1.0]]);
    }
}
