//! Zachary's Karate Club, lifted to its clique complex
//!
//! The social network of a university karate club (Zachary, 1977):
//! 34 members, 78 friendship ties. After a dispute the club split into the
//! followers of the instructor ("Mr. Hi") and of the administrator
//! ("Officer"); that split is the binary node label.
//!
//! Clique lifting gives a complex of shape [34, 78, 45, 11, 2].
//!
//! ## Attributes
//!
//! Every rank carries a 2-channel `<rank name>_feat` attribute:
//! - channel 0: mean degree of the simplex's vertices / max degree
//! - channel 1: number of cofaces / max coface count at that rank
//!
//! Rank 0 additionally carries `club` (1.0 = Mr. Hi, 0.0 = Officer).

use ndarray::{Array1, Array2};
use tracing::info;

use super::{SimplicialComplex, SimplicialDataset};
use crate::error::ComplexError;

/// Number of club members
pub const KARATE_CLUB_NODES: usize = 34;

/// Friendship ties, 0-indexed
#[rustfmt::skip]
const KARATE_CLUB_EDGES: [(usize, usize); 78] = [
    (0, 1), (0, 2), (0, 3), (0, 4), (0, 5), (0, 6), (0, 7), (0, 8),
    (0, 10), (0, 11), (0, 12), (0, 13), (0, 17), (0, 19), (0, 21), (0, 31),
    (1, 2), (1, 3), (1, 7), (1, 13), (1, 17), (1, 19), (1, 21), (1, 30),
    (2, 3), (2, 7), (2, 8), (2, 9), (2, 13), (2, 27), (2, 28), (2, 32),
    (3, 7), (3, 12), (3, 13),
    (4, 6), (4, 10),
    (5, 6), (5, 10), (5, 16),
    (6, 16),
    (8, 30), (8, 32), (8, 33),
    (9, 33),
    (13, 33),
    (14, 32), (14, 33),
    (15, 32), (15, 33),
    (18, 32), (18, 33),
    (19, 33),
    (20, 32), (20, 33),
    (22, 32), (22, 33),
    (23, 25), (23, 27), (23, 29), (23, 32), (23, 33),
    (24, 25), (24, 27), (24, 31),
    (25, 31),
    (26, 29), (26, 33),
    (27, 33),
    (28, 31), (28, 33),
    (29, 32), (29, 33),
    (30, 32), (30, 33),
    (31, 32), (31, 33),
    (32, 33),
];

/// Club membership after the split: 1 = Mr. Hi, 0 = Officer
#[rustfmt::skip]
const KARATE_CLUB_LABELS: [u8; KARATE_CLUB_NODES] = [
    1, 1, 1, 1, 1, 1, 1, 1, 1, 0, 1, 1, 1, 1, 0, 0, 1,
    1, 0, 1, 0, 1, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0,
];

/// Attribute name used for the features of a rank
pub fn feature_attribute(rank: usize) -> String {
    match rank {
        0 => "node_feat".to_string(),
        1 => "edge_feat".to_string(),
        2 => "face_feat".to_string(),
        3 => "tetrahedron_feat".to_string(),
        k => format!("rank{k}_feat"),
    }
}

/// The karate club complex together with its node labels
#[derive(Debug, Clone)]
pub struct KarateClub {
    complex: SimplicialComplex,
    labels: Array1<f64>,
}

impl KarateClub {
    /// Full clique complex
    pub fn load() -> Result<Self, ComplexError> {
        Self::load_with_max_rank(None)
    }

    /// Clique complex truncated at `max_rank`
    pub fn load_with_max_rank(max_rank: Option<usize>) -> Result<Self, ComplexError> {
        let mut complex =
            SimplicialComplex::from_graph(KARATE_CLUB_NODES, &KARATE_CLUB_EDGES, max_rank)?;

        let degrees = complex.vertex_degrees();
        let max_degree = degrees.iter().copied().max().unwrap_or(1).max(1) as f64;

        for rank in 0..=complex.dim() {
            let cofaces = complex.coface_counts(rank);
            let max_cofaces = cofaces.iter().copied().max().unwrap_or(0);

            let mut features = Array2::<f64>::zeros((complex.n_simplices(rank), 2));
            for (i, simplex) in complex.simplices(rank).iter().enumerate() {
                let vertices = simplex.vertices();
                let mean_degree =
                    vertices.iter().map(|&v| degrees[v] as f64).sum::<f64>() / vertices.len() as f64;
                features[[i, 0]] = mean_degree / max_degree;
                if max_cofaces > 0 {
                    features[[i, 1]] = cofaces[i] as f64 / max_cofaces as f64;
                }
            }
            complex.set_simplex_attributes(rank, &feature_attribute(rank), features)?;
        }

        let labels = Array1::from_iter(KARATE_CLUB_LABELS.iter().map(|&l| l as f64));
        let club = labels.clone().insert_axis(ndarray::Axis(1));
        complex.set_simplex_attributes(0, "club", club)?;

        info!(shape = ?complex.shape(), "loaded karate club clique complex");

        Ok(Self { complex, labels })
    }

    pub fn complex(&self) -> &SimplicialComplex {
        &self.complex
    }

    /// Per-node club membership (1.0 = Mr. Hi, 0.0 = Officer)
    pub fn labels(&self) -> &Array1<f64> {
        &self.labels
    }
}
