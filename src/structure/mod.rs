//! Structure Module: from a complex to the tensors a network consumes
//!
//! - `linalg`: pseudo-inverse and nullity on top of `nalgebra`
//! - `inputs`: incidence, adjacency, down-Laplacian, its pseudo-inverse and
//!   the effective adjacency `A ⊙ L⁺`
//!
//! The pseudo-inverse of the down-Laplacian approximates a geodesic-like
//! weighting between edges: entries are large for edges that sit on the same
//! short cycle and small for edges far apart.

mod inputs;
mod linalg;

pub use inputs::{array_to_tensor, StructuralInputs, StructureOptions, StructureTensors};
pub use linalg::{nullity, pseudo_inverse};
