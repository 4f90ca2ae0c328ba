use crate::VectorSet;

pub mod init;
pub mod lloyds;

// References:
// - Least squares quantization in PCM (S. Lloyd)
//   https://doi.org/10.1109/TIT.1982.1056489
//
// Seeds are the first k input vectors and ties go to the lowest index, so a
// run is a pure function of its input and parameters.

/// Convergence is only declared once this many passes have run, so a run that
/// starts at a fixed point still does one confirming pass.
pub const MIN_ITERATIONS_FOR_CONVERGENCE: usize = 2;

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Every centroid moved by no more than `eps` in the last pass.
    Converged,
    /// `max_iter` passes ran without convergence. The result is still usable.
    IterationLimitReached,
}

/// Final state of a clustering run.
#[derive(Debug, Clone)]
pub struct Clustering {
    /// Exactly `k` centroids, indexed by cluster.
    pub centroids: Vec<Vec<f64>>,
    /// Member indices into the input set, per cluster, in input order. These come
    /// from the last assignment pass, so each centroid is the mean of its members.
    pub clusters: Vec<Vec<usize>>,
    /// Cluster index for every input vector.
    pub assignments: Vec<usize>,
    /// Number of assignment+update passes that ran.
    pub iterations: usize,
    pub outcome: Outcome,
    /// Sum of squared distances from each vector to its assigned centroid, per pass.
    pub inertia: Vec<f64>,
}

impl Clustering {
    pub fn converged(&self) -> bool {
        self.outcome == Outcome::Converged
    }

    /// The member vectors of cluster `j`.
    pub fn cluster_vectors<'a>(
        &'a self,
        vectors: &'a VectorSet,
        j: usize,
    ) -> impl Iterator<Item = &'a [f64]> + 'a {
        self.clusters[j].iter().map(move |&i| vectors.get(i))
    }
}
