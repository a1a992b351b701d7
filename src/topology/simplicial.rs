//! Simplicial Complex Construction
//!
//! A simplicial complex K is a collection of simplices closed under taking
//! faces:
//! - 0-simplices are vertices
//! - a k-simplex [v₀, ..., vₖ] has k+1 faces [v₀, ..., v̂ᵢ, ..., vₖ]
//!
//! The clique complex of a graph G contains a k-simplex for every
//! (k+1)-clique of G. Lifting a graph this way keeps its edges as the
//! 1-skeleton and fills in every triangle, tetrahedron, ... that G supports.
//!
//! Simplices of each rank are kept in lexicographic order; the position of a
//! simplex in that order is its row/column in every matrix of that rank.

use ndarray::Array2;
use std::collections::{BTreeSet, HashMap};
use tracing::debug;

use super::traits::SimplicialDataset;
use crate::error::ComplexError;

/// Face closure enumerates vertex subsets as bits of a `u64`
const MAX_CLOSURE_VERTICES: usize = 63;

/// A simplex represented by its sorted vertex indices
#[derive(Debug, Clone, Hash, Eq, PartialEq, Ord, PartialOrd)]
pub struct Simplex {
    vertices: Vec<usize>,
}

impl Simplex {
    /// Build a simplex from vertex indices in any order.
    ///
    /// Empty vertex lists and repeated vertices are rejected.
    pub fn new(vertices: impl IntoIterator<Item = usize>) -> Result<Self, ComplexError> {
        let raw: Vec<usize> = vertices.into_iter().collect();
        let mut sorted = raw.clone();
        sorted.sort_unstable();
        sorted.dedup();
        if sorted.is_empty() || sorted.len() != raw.len() {
            return Err(ComplexError::DegenerateSimplex(raw));
        }
        Ok(Self { vertices: sorted })
    }

    /// Rank k of a k-simplex (vertex count minus one)
    pub fn rank(&self) -> usize {
        self.vertices.len() - 1
    }

    pub fn vertices(&self) -> &[usize] {
        &self.vertices
    }

    /// Codimension-1 faces with their boundary orientation `(-1)^i`.
    ///
    /// Empty for vertices.
    pub fn faces(&self) -> Vec<(f64, Simplex)> {
        if self.vertices.len() < 2 {
            return Vec::new();
        }
        (0..self.vertices.len())
            .map(|i| {
                let mut face = self.vertices.clone();
                face.remove(i);
                let sign = if i % 2 == 0 { 1.0 } else { -1.0 };
                (sign, Simplex { vertices: face })
            })
            .collect()
    }
}

/// Immutable simplicial complex with named per-simplex attributes
#[derive(Debug, Clone)]
pub struct SimplicialComplex {
    /// Number of vertices (0-simplices are exactly `0..n_vertices`)
    n_vertices: usize,
    /// Simplices grouped by rank, each rank sorted
    simplices: Vec<Vec<Simplex>>,
    /// Simplex -> position within its rank
    index: Vec<HashMap<Simplex, usize>>,
    /// (rank, name) -> one row per simplex
    attributes: HashMap<(usize, String), Array2<f64>>,
}

impl SimplicialComplex {
    /// Clique complex of a graph.
    ///
    /// # Arguments
    /// * `n_nodes` - Number of graph vertices, labelled `0..n_nodes`
    /// * `edges` - Undirected edges; duplicates and orientation are ignored
    /// * `max_rank` - Highest simplex rank to build (`None` = every clique)
    pub fn from_graph(
        n_nodes: usize,
        edges: &[(usize, usize)],
        max_rank: Option<usize>,
    ) -> Result<Self, ComplexError> {
        let mut neighbors = vec![BTreeSet::new(); n_nodes];
        let mut edge_set = BTreeSet::new();

        for &(u, v) in edges {
            for w in [u, v] {
                if w >= n_nodes {
                    return Err(ComplexError::VertexOutOfRange {
                        vertex: w,
                        n_vertices: n_nodes,
                    });
                }
            }
            if u == v {
                return Err(ComplexError::DegenerateSimplex(vec![u, v]));
            }
            neighbors[u].insert(v);
            neighbors[v].insert(u);
            edge_set.insert((u.min(v), u.max(v)));
        }

        let max_rank = max_rank.unwrap_or(usize::MAX);
        let mut levels: Vec<Vec<Simplex>> = vec![(0..n_nodes)
            .map(|v| Simplex { vertices: vec![v] })
            .collect()];

        if max_rank >= 1 && !edge_set.is_empty() {
            levels.push(
                edge_set
                    .iter()
                    .map(|&(u, v)| Simplex { vertices: vec![u, v] })
                    .collect(),
            );
        }

        // Extend every k-clique by a larger vertex adjacent to all of it
        while levels.len() > 1 && levels.len() <= max_rank {
            let mut next = Vec::new();
            if let Some(top) = levels.last() {
                for s in top {
                    let last = s.vertices[s.vertices.len() - 1];
                    for &w in neighbors[last].range(last + 1..) {
                        if s.vertices.iter().all(|v| neighbors[*v].contains(&w)) {
                            let mut vertices = s.vertices.clone();
                            vertices.push(w);
                            next.push(Simplex { vertices });
                        }
                    }
                }
            }
            if next.is_empty() {
                break;
            }
            levels.push(next);
        }

        Ok(Self::from_levels(n_nodes, levels))
    }

    /// Closure of the given simplices under taking faces.
    ///
    /// Vertices are `0..=max_vertex`, including any vertex no simplex
    /// mentions.
    pub fn from_simplices<I, S>(simplices: I) -> Result<Self, ComplexError>
    where
        I: IntoIterator<Item = S>,
        S: IntoIterator<Item = usize>,
    {
        let mut levels: Vec<BTreeSet<Simplex>> = Vec::new();
        let mut n_vertices = 0;

        for raw in simplices {
            let simplex = Simplex::new(raw)?;
            n_vertices = n_vertices.max(simplex.vertices[simplex.rank()] + 1);

            // Every non-empty subset of the vertex set is a face
            let m = simplex.vertices.len();
            if m > MAX_CLOSURE_VERTICES {
                return Err(ComplexError::SimplexTooLarge {
                    vertices: m,
                    max: MAX_CLOSURE_VERTICES,
                });
            }
            for mask in 1u64..(1u64 << m) {
                let vertices: Vec<usize> = (0..m)
                    .filter(|i| mask & (1 << i) != 0)
                    .map(|i| simplex.vertices[i])
                    .collect();
                let rank = vertices.len() - 1;
                while levels.len() <= rank {
                    levels.push(BTreeSet::new());
                }
                levels[rank].insert(Simplex { vertices });
            }
        }

        let mut levels: Vec<Vec<Simplex>> =
            levels.into_iter().map(|l| l.into_iter().collect()).collect();
        if levels.is_empty() {
            levels.push(Vec::new());
        }
        levels[0] = (0..n_vertices).map(|v| Simplex { vertices: vec![v] }).collect();

        Ok(Self::from_levels(n_vertices, levels))
    }

    fn from_levels(n_vertices: usize, mut levels: Vec<Vec<Simplex>>) -> Self {
        for level in levels.iter_mut() {
            level.sort();
        }
        let index = levels
            .iter()
            .map(|level| {
                level
                    .iter()
                    .enumerate()
                    .map(|(i, s)| (s.clone(), i))
                    .collect()
            })
            .collect();

        let complex = Self {
            n_vertices,
            simplices: levels,
            index,
            attributes: HashMap::new(),
        };
        debug!(shape = ?complex.shape(), "built simplicial complex");
        complex
    }

    /// Number of simplices per rank, from rank 0 upwards
    pub fn shape(&self) -> Vec<usize> {
        self.simplices.iter().map(|l| l.len()).collect()
    }

    pub fn n_vertices(&self) -> usize {
        self.n_vertices
    }

    /// Simplices of a rank in matrix order (empty when out of range)
    pub fn simplices(&self, rank: usize) -> &[Simplex] {
        self.simplices.get(rank).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Row/column of a simplex within its rank
    pub fn index_of(&self, simplex: &Simplex) -> Option<usize> {
        self.index.get(simplex.rank())?.get(simplex).copied()
    }

    /// Vertex degrees in the 1-skeleton
    pub fn vertex_degrees(&self) -> Vec<usize> {
        let mut degrees = vec![0; self.n_vertices];
        for edge in self.simplices(1) {
            for &v in edge.vertices() {
                degrees[v] += 1;
            }
        }
        degrees
    }

    /// For every simplex of `rank`, how many (rank+1)-simplices contain it
    pub fn coface_counts(&self, rank: usize) -> Vec<usize> {
        let mut counts = vec![0; self.n_simplices(rank)];
        for coface in self.simplices(rank + 1) {
            for (_, face) in coface.faces() {
                if let Some(i) = self.index_of(&face) {
                    counts[i] += 1;
                }
            }
        }
        counts
    }

    /// Store a named attribute, one row per simplex of `rank`.
    pub fn set_simplex_attributes(
        &mut self,
        rank: usize,
        name: &str,
        values: Array2<f64>,
    ) -> Result<(), ComplexError> {
        self.check_rank(rank)?;
        let expected = self.n_simplices(rank);
        if values.nrows() != expected {
            return Err(ComplexError::AttributeShape {
                rank,
                name: name.to_string(),
                rows: values.nrows(),
                expected,
            });
        }
        self.attributes.insert((rank, name.to_string()), values);
        Ok(())
    }

    /// Attribute names stored for a rank, sorted
    pub fn attribute_names(&self, rank: usize) -> Vec<&str> {
        let mut names: Vec<&str> = self
            .attributes
            .keys()
            .filter(|(r, _)| *r == rank)
            .map(|(_, name)| name.as_str())
            .collect();
        names.sort_unstable();
        names
    }

    /// Count connected components of the 1-skeleton using Union-Find
    pub fn connected_components(&self) -> usize {
        let n = self.n_vertices;
        let mut parent: Vec<usize> = (0..n).collect();
        let mut rank = vec![0usize; n];

        fn find(parent: &mut [usize], i: usize) -> usize {
            if parent[i] != i {
                parent[i] = find(parent, parent[i]);
            }
            parent[i]
        }

        fn union(parent: &mut [usize], rank: &mut [usize], x: usize, y: usize) {
            let rx = find(parent, x);
            let ry = find(parent, y);
            if rx != ry {
                if rank[rx] < rank[ry] {
                    parent[rx] = ry;
                } else if rank[rx] > rank[ry] {
                    parent[ry] = rx;
                } else {
                    parent[ry] = rx;
                    rank[rx] += 1;
                }
            }
        }

        for edge in self.simplices(1) {
            union(&mut parent, &mut rank, edge.vertices[0], edge.vertices[1]);
        }

        (0..n).filter(|&i| find(&mut parent, i) == i).count()
    }

    fn check_rank(&self, rank: usize) -> Result<(), ComplexError> {
        let dim = self.dim();
        if rank > dim {
            return Err(ComplexError::RankOutOfRange { rank, dim });
        }
        Ok(())
    }
}

impl SimplicialDataset for SimplicialComplex {
    fn dim(&self) -> usize {
        self.simplices.len().saturating_sub(1)
    }

    fn n_simplices(&self, rank: usize) -> usize {
        self.simplices(rank).len()
    }

    fn incidence_matrix(&self, rank: usize) -> Result<Array2<f64>, ComplexError> {
        if rank == 0 {
            return Err(ComplexError::NoLowerRank {
                query: "incidence_matrix",
            });
        }
        self.check_rank(rank)?;

        let mut b = Array2::<f64>::zeros((self.n_simplices(rank - 1), self.n_simplices(rank)));
        for (col, simplex) in self.simplices(rank).iter().enumerate() {
            for (sign, face) in simplex.faces() {
                // Faces are present by closure
                if let Some(row) = self.index[rank - 1].get(&face) {
                    b[[*row, col]] = sign;
                }
            }
        }
        Ok(b)
    }

    fn get_simplex_attributes(
        &self,
        rank: usize,
        name: &str,
    ) -> Result<&Array2<f64>, ComplexError> {
        self.attributes
            .get(&(rank, name.to_string()))
            .ok_or_else(|| ComplexError::MissingAttribute {
                rank,
                name: name.to_string(),
            })
    }

    fn down_laplacian_matrix(&self, rank: usize) -> Result<Array2<f64>, ComplexError> {
        if rank == 0 {
            return Err(ComplexError::NoLowerRank {
                query: "down_laplacian_matrix",
            });
        }
        let b = self.incidence_matrix(rank)?;
        Ok(b.t().dot(&b))
    }
}
