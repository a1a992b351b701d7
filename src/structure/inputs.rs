//! Structural inputs of a Dist2Cycle network
//!
//! For the rank-k simplices the network operates on:
//!
//! ```text
//!   B      = incidence_matrix(k)                  n_{k-1} × n_k
//!   A      = adjacency_matrix(k)                  n_k × n_k
//!   L↓     = down_laplacian_matrix(k)             n_k × n_k
//!   L⁺     = pinv(L↓ + shift·I)                   n_k × n_k
//!   A ⊙ L⁺ = effective adjacency                  n_k × n_k
//! ```
//!
//! Everything here is computed once, before training, and never mutated.

use candle_core::{Device, Tensor};
use ndarray::Array2;
use tracing::info;

use super::linalg::pseudo_inverse;
use crate::error::Dist2CycleResult;
use crate::topology::SimplicialDataset;

/// Options for extracting structural inputs
#[derive(Debug, Clone, Copy)]
pub struct StructureOptions {
    /// Singular values below this are treated as zero in the pseudo-inverse
    pub pinv_tolerance: f64,
    /// Multiple of the identity added to L↓ before inversion. At the
    /// default of 1.0 the shifted Laplacian is positive definite and L⁺ is
    /// its true inverse; 0.0 gives the plain pseudo-inverse of L↓.
    pub laplacian_shift: f64,
}

impl Default for StructureOptions {
    fn default() -> Self {
        Self {
            pinv_tolerance: 1e-10,
            laplacian_shift: 1.0,
        }
    }
}

/// Dense structural matrices for one rank of a complex
#[derive(Debug, Clone, PartialEq)]
pub struct StructuralInputs {
    pub rank: usize,
    pub incidence: Array2<f64>,
    pub adjacency: Array2<f64>,
    pub down_laplacian: Array2<f64>,
    pub laplacian_pinv: Array2<f64>,
    pub effective_adjacency: Array2<f64>,
}

impl StructuralInputs {
    /// Extract the structural matrices of `rank` (which must be ≥ 1).
    pub fn extract<D: SimplicialDataset + ?Sized>(
        dataset: &D,
        rank: usize,
        options: StructureOptions,
    ) -> Dist2CycleResult<Self> {
        let incidence = dataset.incidence_matrix(rank)?;
        let adjacency = dataset.adjacency_matrix(rank)?;
        let down_laplacian = dataset.down_laplacian_matrix(rank)?;

        let mut shifted = down_laplacian.clone();
        if options.laplacian_shift != 0.0 {
            shifted.diag_mut().mapv_inplace(|v| v + options.laplacian_shift);
        }
        let laplacian_pinv = pseudo_inverse(&shifted, options.pinv_tolerance)?;
        let effective_adjacency = &adjacency * &laplacian_pinv;

        info!(
            rank,
            incidence = ?incidence.dim(),
            pinv = ?laplacian_pinv.dim(),
            adjacent_pairs = adjacency.iter().filter(|&&v| v != 0.0).count(),
            "extracted structural inputs"
        );

        Ok(Self {
            rank,
            incidence,
            adjacency,
            down_laplacian,
            laplacian_pinv,
            effective_adjacency,
        })
    }

    /// Number of rank-k simplices (rows of every square matrix)
    pub fn n_simplices(&self) -> usize {
        self.adjacency.nrows()
    }

    /// Number of rank-(k-1) faces (rows of the incidence matrix)
    pub fn n_faces(&self) -> usize {
        self.incidence.nrows()
    }

    /// |B| with each row divided by its degree: averages rank-k features
    /// onto their faces. Rows of faces with no coface stay zero.
    pub fn incidence_readout(&self) -> Array2<f64> {
        let mut readout = self.incidence.mapv(f64::abs);
        for mut row in readout.rows_mut() {
            let degree = row.sum();
            if degree > 0.0 {
                row.mapv_inplace(|v| v / degree);
            }
        }
        readout
    }

    /// Tensors consumed by the network forward pass
    pub fn to_tensors(&self, device: &Device) -> Dist2CycleResult<StructureTensors> {
        Ok(StructureTensors {
            linv: array_to_tensor(&self.laplacian_pinv, device)?,
            adjacency: array_to_tensor(&self.adjacency, device)?,
            readout: array_to_tensor(&self.incidence_readout(), device)?,
        })
    }
}

/// Structural tensors on a device
#[derive(Debug, Clone)]
pub struct StructureTensors {
    /// Pseudo-inverse of the down-Laplacian, `n × n`
    pub linv: Tensor,
    /// Coface adjacency indicator, `n × n`
    pub adjacency: Tensor,
    /// Degree-normalised unsigned incidence, `faces × n`
    pub readout: Tensor,
}

/// Copy a 2-D array into an f64 tensor of the same shape
pub fn array_to_tensor(array: &Array2<f64>, device: &Device) -> Dist2CycleResult<Tensor> {
    let data: Vec<f64> = array.iter().copied().collect();
    Ok(Tensor::from_vec(data, array.dim(), device)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::topology::SimplicialComplex;

    fn two_triangles() -> SimplicialComplex {
        // Triangles {0,1,2} and {1,2,3} glued along [1,2], plus a tail [3,4]
        SimplicialComplex::from_simplices(vec![vec![0, 1, 2], vec![1, 2, 3], vec![3, 4]]).unwrap()
    }

    #[test]
    fn test_shapes() {
        let k = two_triangles();
        let inputs = StructuralInputs::extract(&k, 1, StructureOptions::default()).unwrap();
        assert_eq!(inputs.incidence.dim(), (5, 6));
        assert_eq!(inputs.laplacian_pinv.dim(), (6, 6));
        assert_eq!(inputs.effective_adjacency.dim(), (6, 6));
        assert_eq!(inputs.n_faces(), 5);
        assert_eq!(inputs.n_simplices(), 6);
    }

    #[test]
    fn test_effective_adjacency_is_masked() {
        let k = two_triangles();
        let inputs = StructuralInputs::extract(&k, 1, StructureOptions::default()).unwrap();
        for ((i, j), &v) in inputs.effective_adjacency.indexed_iter() {
            if inputs.adjacency[[i, j]] == 0.0 {
                assert_eq!(v, 0.0);
            } else {
                assert_eq!(v, inputs.laplacian_pinv[[i, j]]);
            }
        }
    }

    #[test]
    fn test_extraction_is_deterministic() {
        let k = two_triangles();
        let a = StructuralInputs::extract(&k, 1, StructureOptions::default()).unwrap();
        let b = StructuralInputs::extract(&k, 1, StructureOptions::default()).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_default_shift_regularises_pinv() {
        let k = two_triangles();
        let inputs = StructuralInputs::extract(&k, 1, StructureOptions::default()).unwrap();
        // L↓ + I is invertible, so the pseudo-inverse is a true inverse
        let mut shifted = inputs.down_laplacian.clone();
        shifted.diag_mut().mapv_inplace(|v| v + 1.0);
        let product = shifted.dot(&inputs.laplacian_pinv);
        for ((i, j), &v) in product.indexed_iter() {
            let expected = if i == j { 1.0 } else { 0.0 };
            assert!((v - expected).abs() < 1e-9);
        }
    }

    #[test]
    fn test_zero_shift_is_plain_pseudo_inverse() {
        let k = two_triangles();
        let opts = StructureOptions {
            laplacian_shift: 0.0,
            ..StructureOptions::default()
        };
        let inputs = StructuralInputs::extract(&k, 1, opts).unwrap();
        let expected = pseudo_inverse(&inputs.down_laplacian, 1e-10).unwrap();
        assert_eq!(inputs.laplacian_pinv, expected);
    }

    #[test]
    fn test_readout_rows_average() {
        let k = two_triangles();
        let inputs = StructuralInputs::extract(&k, 1, StructureOptions::default()).unwrap();
        let readout = inputs.incidence_readout();
        for row in readout.rows() {
            assert!((row.sum() - 1.0).abs() < 1e-12);
        }
        // Vertex 4 only touches [3,4]
        assert_eq!(readout.row(4).iter().filter(|&&v| v > 0.0).count(), 1);
    }

    #[test]
    fn test_tensors_keep_shapes() {
        let k = two_triangles();
        let inputs = StructuralInputs::extract(&k, 1, StructureOptions::default()).unwrap();
        let tensors = inputs.to_tensors(&Device::Cpu).unwrap();
        assert_eq!(tensors.linv.dims(), &[6, 6]);
        assert_eq!(tensors.adjacency.dims(), &[6, 6]);
        assert_eq!(tensors.readout.dims(), &[5, 6]);
    }

    #[test]
    fn test_rank_zero_is_rejected() {
        let k = two_triangles();
        assert!(StructuralInputs::extract(&k, 0, StructureOptions::default()).is_err());
    }
}
