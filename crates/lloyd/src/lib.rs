//! Deterministic k-means clustering (Lloyd's algorithm) over dense numeric vectors.
//!
//! ```
//! let vectors = lloyd::VectorSet::parse("0,0\n10,0\n0,1\n10,1\n").unwrap();
//! let clustering = lloyd::cluster(&vectors, 2).unwrap();
//!
//! assert_eq!(
//!     lloyd::format_centroids(&clustering.centroids),
//!     "0.0000,0.5000\n10.0000,0.5000\n"
//! );
//! ```

pub mod cli;
mod config;
mod format;
pub mod kmeans;
mod numeric;
#[cfg(test)]
mod rng;
mod vector_set;

pub use config::{DEFAULT_EPSILON, DEFAULT_MAX_ITER, EmptyClusterPolicy, KMeansConfig};
pub use format::{format_centroid, format_centroids, write_centroids};
pub use kmeans::{Clustering, Outcome};
pub use numeric::{Number, parse_number, parse_whole_number};
pub use vector_set::VectorSet;

use snafu::prelude::*;

/// Everything that can stop a clustering run. None of these are recoverable.
#[derive(Debug, Snafu)]
#[non_exhaustive]
pub enum Error {
    #[snafu(display("number of clusters must be at least 1 and less than {n}, got {k}"))]
    InvalidClusterCount { k: usize, n: usize },

    #[snafu(display("maximum iteration count must be at least 1, got {max_iter}"))]
    InvalidIterationCount { max_iter: usize },

    #[snafu(display("convergence threshold must be finite and non-negative, got {eps}"))]
    InvalidThreshold { eps: f64 },

    #[snafu(display("line {line}, field {field}: {token:?} is not a finite number"))]
    MalformedInput {
        line: usize,
        field: usize,
        token: String,
    },

    #[snafu(display("input contains no vectors"))]
    EmptyInput,

    #[snafu(display("line {line} has {found} fields, expected {expected}"))]
    DimensionMismatch {
        line: usize,
        expected: usize,
        found: usize,
    },

    #[snafu(display("cluster {cluster} has no members after assignment pass {iteration}"))]
    EmptyCluster { cluster: usize, iteration: usize },
}

/// Cluster `vectors` into `k` groups with the default parameters.
///
/// See [`cluster_with`] for control over the iteration budget, the convergence
/// threshold and the empty cluster policy.
pub fn cluster(vectors: &VectorSet, k: usize) -> Result<Clustering, Error> {
    cluster_with(vectors, &KMeansConfig::new(k))
}

pub fn cluster_with(vectors: &VectorSet, config: &KMeansConfig) -> Result<Clustering, Error> {
    kmeans::lloyds::find_centroids(vectors, config)
}
