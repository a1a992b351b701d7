//! Topology Module: Simplicial Complexes and their Operators
//!
//! Implements the combinatorial side of the pipeline:
//! - Simplicial complexes built by clique lifting or face closure
//! - Boundary (incidence) matrices, Laplacians and adjacencies
//! - Betti numbers via Hodge Laplacian nullity
//! - The karate-club benchmark dataset
//!
//! ## Mathematical Background
//!
//! For a complex K with boundary operators Bₖ: Cₖ → Cₖ₋₁, the rank-k
//! Hodge Laplacian splits into
//!
//!   Lₖ = Bₖᵀ Bₖ + Bₖ₊₁ Bₖ₊₁ᵀ = L_down + L_up
//!
//! L_down couples simplices sharing a face, L_up couples simplices sharing
//! a coface. Dist2Cycle layers weight messages between edges with the
//! pseudo-inverse of L_down, masked by the L_up adjacency.

mod betti;
mod datasets;
mod simplicial;
mod traits;

pub use betti::{euler_characteristic, BettiNumbers};
pub use datasets::{feature_attribute, KarateClub, KARATE_CLUB_NODES};
pub use simplicial::{Simplex, SimplicialComplex};
pub use traits::SimplicialDataset;
