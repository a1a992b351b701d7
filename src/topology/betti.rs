//! Betti Numbers: Topological Invariants
//!
//! The k-th Betti number βₖ counts the number of k-dimensional
//! "holes" in a simplicial complex:
//!
//! - β₀: Number of connected components
//! - β₁: Number of 1-dimensional loops/cycles
//! - β₂: Number of 2-dimensional voids/cavities
//!
//! By the discrete Hodge theorem βₖ = dim ker Lₖ, where Lₖ is the Hodge
//! Laplacian of rank k. Edge features living close to ker L₁ are the
//! harmonic (cycle) components that Dist2Cycle layers learn to locate.

use tracing::warn;

use super::{SimplicialComplex, SimplicialDataset};
use crate::error::Dist2CycleResult;
use crate::structure::nullity;

/// Betti numbers of a complex, indexed by rank
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BettiNumbers {
    pub values: Vec<usize>,
}

impl BettiNumbers {
    pub fn new(values: Vec<usize>) -> Self {
        Self { values }
    }

    /// βₖ for every rank of the complex, as the nullity of Lₖ
    ///
    /// `tolerance` is the eigenvalue magnitude below which an eigenvalue
    /// counts as zero.
    pub fn of_complex(complex: &SimplicialComplex, tolerance: f64) -> Dist2CycleResult<Self> {
        let mut values = Vec::with_capacity(complex.dim() + 1);
        for rank in 0..=complex.dim() {
            let laplacian = complex.hodge_laplacian_matrix(rank)?;
            values.push(nullity(&laplacian, tolerance));
        }

        let components = complex.connected_components();
        if values.first().copied() != Some(components) {
            warn!(
                beta_0 = values.first().copied().unwrap_or(0),
                components, "Hodge nullity disagrees with union-find component count"
            );
        }

        Ok(Self::new(values))
    }

    /// βₖ, zero beyond the top rank
    pub fn beta(&self, k: usize) -> usize {
        self.values.get(k).copied().unwrap_or(0)
    }

    /// Total topological complexity
    pub fn total(&self) -> usize {
        self.values.iter().sum()
    }

    /// Euler characteristic χ = β₀ - β₁ + β₂ - ...
    pub fn euler_characteristic(&self) -> i64 {
        alternating_sum(&self.values)
    }
}

/// Euler characteristic from simplex counts, χ = n₀ - n₁ + n₂ - ...
pub fn euler_characteristic(complex: &SimplicialComplex) -> i64 {
    alternating_sum(&complex.shape())
}

fn alternating_sum(values: &[usize]) -> i64 {
    values
        .iter()
        .enumerate()
        .map(|(k, &v)| if k % 2 == 0 { v as i64 } else { -(v as i64) })
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filled_triangle_is_contractible() {
        let k = SimplicialComplex::from_simplices(vec![vec![0, 1, 2]]).unwrap();
        let betti = BettiNumbers::of_complex(&k, 1e-9).unwrap();
        assert_eq!(betti.values, vec![1, 0, 0]);
        assert_eq!(betti.euler_characteristic(), 1);
    }

    #[test]
    fn test_hollow_square_has_one_cycle() {
        let k = SimplicialComplex::from_graph(4, &[(0, 1), (1, 2), (2, 3), (0, 3)], None).unwrap();
        let betti = BettiNumbers::of_complex(&k, 1e-9).unwrap();
        assert_eq!(betti.beta(0), 1);
        assert_eq!(betti.beta(1), 1);
        assert_eq!(betti.beta(2), 0);
    }

    #[test]
    fn test_disjoint_pieces() {
        let k = SimplicialComplex::from_graph(5, &[(0, 1), (2, 3)], None).unwrap();
        let betti = BettiNumbers::of_complex(&k, 1e-9).unwrap();
        assert_eq!(betti.beta(0), 3);
        assert_eq!(betti.total(), 3);
    }

    #[test]
    fn test_euler_characteristic_matches_counts() {
        let k = SimplicialComplex::from_simplices(vec![
            vec![0, 1, 2],
            vec![2, 3],
            vec![3, 4],
            vec![2, 4],
        ])
        .unwrap();
        let betti = BettiNumbers::of_complex(&k, 1e-9).unwrap();
        assert_eq!(betti.euler_characteristic(), euler_characteristic(&k));
    }
}
