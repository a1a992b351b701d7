//! Error types for the Dist2Cycle pipeline.
//!
//! ## Hierarchy
//!
//! ```text
//! Dist2CycleError (top-level)
//! ├── ConfigError   (config validation / file loading)
//! ├── ComplexError  (simplicial complex construction and queries)
//! └── candle_core::Error (tensor backend)
//! ```

use std::path::PathBuf;
use thiserror::Error;

/// Convenient `Result` alias used by pipeline-level functions.
pub type Dist2CycleResult<T> = Result<T, Dist2CycleError>;

/// Top-level error type.
#[derive(Debug, Error)]
pub enum Dist2CycleError {
    /// A configuration validation or loading error.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// A simplicial complex could not be built or queried.
    #[error("Complex error: {0}")]
    Complex(#[from] ComplexError),

    /// The tensor backend failed (shape mismatch inside a product, dtype, ...).
    #[error("Tensor error: {0}")]
    Candle(#[from] candle_core::Error),

    /// The SVD behind the pseudo-inverse failed.
    #[error("Pseudo-inverse failed: {0}")]
    PseudoInverse(String),

    /// Two arrays that must agree on their shape do not.
    #[error("Shape mismatch for {what}: expected {expected:?}, got {actual:?}")]
    ShapeMismatch {
        /// What was being matched.
        what: &'static str,
        /// Expected shape.
        expected: Vec<usize>,
        /// Actual shape.
        actual: Vec<usize>,
    },

    /// A parameter distribution could not be constructed.
    #[error("Parameter initialisation failed: {0}")]
    Init(String),
}

impl Dist2CycleError {
    /// Construct a [`Dist2CycleError::ShapeMismatch`].
    pub fn shape_mismatch(what: &'static str, expected: Vec<usize>, actual: Vec<usize>) -> Self {
        Dist2CycleError::ShapeMismatch {
            what,
            expected,
            actual,
        }
    }
}

/// Errors produced when loading or validating an
/// [`ExperimentConfig`](crate::config::ExperimentConfig).
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A field has an invalid value.
    #[error("Invalid value for `{field}`: {reason}")]
    InvalidValue {
        /// Name of the field.
        field: &'static str,
        /// Human-readable reason.
        reason: String,
    },

    /// A configuration file could not be read or written.
    #[error("Cannot access config file `{path}`: {source}")]
    FileAccess {
        /// Path that was being accessed.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The file was read but is not a valid configuration.
    #[error("Malformed config file `{path}`: {source}")]
    Malformed {
        /// Path of the file.
        path: PathBuf,
        /// Underlying JSON error.
        #[source]
        source: serde_json::Error,
    },
}

impl ConfigError {
    /// Construct a [`ConfigError::InvalidValue`].
    pub fn invalid_value<S: Into<String>>(field: &'static str, reason: S) -> Self {
        ConfigError::InvalidValue {
            field,
            reason: reason.into(),
        }
    }
}

/// Errors raised by [`SimplicialComplex`](crate::topology::SimplicialComplex)
/// construction and queries.
#[derive(Debug, Error)]
pub enum ComplexError {
    /// The requested rank exceeds the dimension of the complex.
    #[error("Rank {rank} is out of range for a complex of dimension {dim}")]
    RankOutOfRange {
        /// Requested rank.
        rank: usize,
        /// Dimension of the complex.
        dim: usize,
    },

    /// The query needs faces one rank below, which rank 0 does not have.
    #[error("Rank 0 has no lower rank for `{query}`")]
    NoLowerRank {
        /// Name of the query.
        query: &'static str,
    },

    /// A simplex refers to a vertex outside `0..n_vertices`.
    #[error("Vertex {vertex} is out of range for {n_vertices} vertices")]
    VertexOutOfRange {
        /// Offending vertex.
        vertex: usize,
        /// Number of vertices.
        n_vertices: usize,
    },

    /// A simplex has too many vertices for its faces to be enumerated.
    #[error("Simplex with {vertices} vertices exceeds the limit of {max}")]
    SimplexTooLarge {
        /// Vertices of the offending simplex.
        vertices: usize,
        /// Largest supported vertex count.
        max: usize,
    },

    /// A simplex has repeated vertices or no vertices at all.
    #[error("Degenerate simplex {0:?}")]
    DegenerateSimplex(Vec<usize>),

    /// No attribute with that name is stored for that rank.
    #[error("No attribute `{name}` on rank {rank}")]
    MissingAttribute {
        /// Rank queried.
        rank: usize,
        /// Attribute name.
        name: String,
    },

    /// An attribute array does not have one row per simplex.
    #[error("Attribute `{name}` on rank {rank} has {rows} rows, expected {expected}")]
    AttributeShape {
        /// Rank written.
        rank: usize,
        /// Attribute name.
        name: String,
        /// Rows supplied.
        rows: usize,
        /// Simplices at that rank.
        expected: usize,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_error_converts_into_top_level() {
        let err: Dist2CycleError = ConfigError::invalid_value("n_layers", "must be > 0").into();
        assert!(matches!(err, Dist2CycleError::Config(_)));
        assert!(err.to_string().contains("n_layers"));
    }

    #[test]
    fn shape_mismatch_message_lists_shapes() {
        let err = Dist2CycleError::shape_mismatch("labels", vec![34, 2], vec![30, 2]);
        let msg = err.to_string();
        assert!(msg.contains("[34, 2]"));
        assert!(msg.contains("[30, 2]"));
    }
}
