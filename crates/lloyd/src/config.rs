use crate::{Error, InvalidClusterCountSnafu, InvalidIterationCountSnafu, InvalidThresholdSnafu};
use snafu::prelude::*;

pub const DEFAULT_MAX_ITER: usize = 400;
pub const DEFAULT_EPSILON: f64 = 0.001;

/// What the update step does with a cluster that received no vectors.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub enum EmptyClusterPolicy {
    /// Abort the run with [`Error::EmptyCluster`].
    #[default]
    Fail,
    /// Keep the previous centroid. It does not count against convergence.
    KeepPrevious,
}

/// Parameters of a single clustering run.
#[derive(Debug, Clone, PartialEq)]
pub struct KMeansConfig {
    /// Number of clusters; must be in `1..n` for `n` input vectors.
    pub k: usize,
    /// Upper bound on assignment+update passes.
    pub max_iter: usize,
    /// A centroid that moves by no more than this is considered settled.
    pub eps: f64,
    pub empty_cluster: EmptyClusterPolicy,
}

impl KMeansConfig {
    pub fn new(k: usize) -> Self {
        Self {
            k,
            max_iter: DEFAULT_MAX_ITER,
            eps: DEFAULT_EPSILON,
            empty_cluster: EmptyClusterPolicy::default(),
        }
    }

    pub fn with_max_iter(mut self, max_iter: usize) -> Self {
        self.max_iter = max_iter;
        self
    }

    pub fn with_eps(mut self, eps: f64) -> Self {
        debug_assert!(eps.is_finite() && eps >= 0.0, "eps must be finite and non-negative");
        self.eps = eps;
        self
    }

    pub fn with_empty_cluster(mut self, policy: EmptyClusterPolicy) -> Self {
        self.empty_cluster = policy;
        self
    }

    /// Check the parameters against a collection of `n` vectors.
    pub fn validate(&self, n: usize) -> Result<(), Error> {
        ensure!(
            self.k >= 1 && self.k < n,
            InvalidClusterCountSnafu { k: self.k, n }
        );
        ensure!(
            self.max_iter >= 1,
            InvalidIterationCountSnafu {
                max_iter: self.max_iter
            }
        );
        ensure!(
            self.eps.is_finite() && self.eps >= 0.0,
            InvalidThresholdSnafu { eps: self.eps }
        );
        Ok(())
    }
}
