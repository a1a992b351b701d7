//! Dataset Traits: the query surface a simplicial dataset exposes
//!
//! Everything downstream of dataset loading (structure extraction, feature
//! assembly, Betti numbers) only talks to a complex through this trait, so
//! any source of simplices can be trained on.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                  SimplicialDataset Trait                     │
//! ├─────────────────────────────────────────────────────────────┤
//! │  + incidence_matrix(k)        - B_k, signed boundary        │
//! │  + get_simplex_attributes(k)  - named per-simplex features  │
//! │  + down_laplacian_matrix(k)   - B_kᵀ B_k         (default)  │
//! │  + up_laplacian_matrix(k)     - B_{k+1} B_{k+1}ᵀ (default)  │
//! │  + adjacency_matrix(k)        - shared coface    (default)  │
//! └─────────────────────────────────────────────────────────────┘
//! ```

use ndarray::Array2;

use crate::error::ComplexError;

/// Query surface of a simplicial dataset.
///
/// Implementors provide the boundary operators and attribute storage; the
/// Laplacians and adjacencies are derived from the boundary operators.
pub trait SimplicialDataset {
    /// Highest rank with at least one simplex.
    fn dim(&self) -> usize;

    /// Number of simplices of the given rank (0 when out of range).
    fn n_simplices(&self, rank: usize) -> usize;

    /// Signed boundary matrix of shape `n_{rank-1} × n_rank`.
    fn incidence_matrix(&self, rank: usize) -> Result<Array2<f64>, ComplexError>;

    /// Named per-simplex attribute, one row per simplex of `rank`.
    fn get_simplex_attributes(&self, rank: usize, name: &str)
        -> Result<&Array2<f64>, ComplexError>;

    /// Lower Laplacian `B_kᵀ B_k`.
    fn down_laplacian_matrix(&self, rank: usize) -> Result<Array2<f64>, ComplexError> {
        let b = self.incidence_matrix(rank)?;
        Ok(b.t().dot(&b))
    }

    /// Upper Laplacian `B_{k+1} B_{k+1}ᵀ`; zero at the top rank.
    fn up_laplacian_matrix(&self, rank: usize) -> Result<Array2<f64>, ComplexError> {
        let dim = self.dim();
        if rank > dim {
            return Err(ComplexError::RankOutOfRange { rank, dim });
        }
        if rank == dim {
            let n = self.n_simplices(rank);
            return Ok(Array2::zeros((n, n)));
        }
        let b = self.incidence_matrix(rank + 1)?;
        Ok(b.dot(&b.t()))
    }

    /// Hodge Laplacian `L_up + L_down` (no down term at rank 0).
    fn hodge_laplacian_matrix(&self, rank: usize) -> Result<Array2<f64>, ComplexError> {
        let up = self.up_laplacian_matrix(rank)?;
        if rank == 0 {
            return Ok(up);
        }
        Ok(up + self.down_laplacian_matrix(rank)?)
    }

    /// Two k-simplices are adjacent iff they are faces of a common
    /// (k+1)-simplex. At rank 0 this is the graph adjacency.
    fn adjacency_matrix(&self, rank: usize) -> Result<Array2<f64>, ComplexError> {
        Ok(off_diagonal_indicator(self.up_laplacian_matrix(rank)?))
    }

    /// Two k-simplices are coadjacent iff they share a (k-1)-face.
    fn coadjacency_matrix(&self, rank: usize) -> Result<Array2<f64>, ComplexError> {
        Ok(off_diagonal_indicator(self.down_laplacian_matrix(rank)?))
    }
}

/// `|L|` with the diagonal cleared, entries clipped to {0, 1}.
fn off_diagonal_indicator(mut laplacian: Array2<f64>) -> Array2<f64> {
    laplacian.mapv_inplace(|v| if v != 0.0 { 1.0 } else { 0.0 });
    laplacian.diag_mut().fill(0.0);
    laplacian
}
