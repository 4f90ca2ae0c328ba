use super::init::find_initial;
use super::{Clustering, MIN_ITERATIONS_FOR_CONVERGENCE, Outcome};
use crate::{EmptyClusterPolicy, EmptyClusterSnafu, Error, KMeansConfig, VectorSet};
use tracing::{debug, warn};

#[inline(always)]
pub fn squared_distance(x: &[f64], y: &[f64]) -> f64 {
    debug_assert_eq!(x.len(), y.len());
    x.iter().zip(y).fold(0.0, |acc, (a, b)| {
        let d = a - b;
        d.mul_add(d, acc)
    })
}

#[inline]
pub fn distance(x: &[f64], y: &[f64]) -> f64 {
    squared_distance(x, y).sqrt()
}

/// Result of one assignment pass.
#[derive(Debug)]
pub struct Assignment {
    /// Member indices per centroid, in input order. May contain empty clusters.
    pub clusters: Vec<Vec<usize>>,
    pub assignments: Vec<usize>,
    /// Sum of squared distances to the assigned centroids.
    pub inertia: f64,
}

/// Assign every vector to its nearest centroid. On equal distances the lowest
/// centroid index wins.
pub fn assign_points(vectors: &VectorSet, centroids: &[Vec<f64>]) -> Assignment {
    assert!(!centroids.is_empty());

    let mut clusters = vec![Vec::new(); centroids.len()];
    let mut assignments = Vec::with_capacity(vectors.len());
    let mut inertia = 0.0;

    for (i, point) in vectors.iter().enumerate() {
        let mut min = f64::INFINITY;
        let mut min_squared = f64::INFINITY;
        let mut min_idx = 0;
        for (j, centroid) in centroids.iter().enumerate() {
            let squared = squared_distance(point, centroid);
            let d = squared.sqrt();
            if d < min {
                min = d;
                min_squared = squared;
                min_idx = j;
            }
        }

        clusters[min_idx].push(i);
        assignments.push(min_idx);
        inertia += min_squared;
    }

    Assignment {
        clusters,
        assignments,
        inertia,
    }
}

#[derive(Debug)]
pub struct UpdateResult {
    pub centroids: Vec<Vec<f64>>,
    /// Largest distance any centroid moved.
    pub max_shift: f64,
    /// True when no centroid moved by more than `eps`.
    pub converged: bool,
}

fn mean(vectors: &VectorSet, members: &[usize]) -> Vec<f64> {
    let mut sums = vec![0.0; vectors.dim()];
    for &i in members {
        for (sum, x) in sums.iter_mut().zip(vectors.get(i)) {
            *sum += x;
        }
    }

    let count = members.len() as f64;
    for sum in &mut sums {
        *sum /= count;
    }
    sums
}

/// Replace every centroid with the mean of its cluster.
///
/// `iteration` is only used to report where an empty cluster occurred.
pub fn update_centroids(
    vectors: &VectorSet,
    clusters: &[Vec<usize>],
    centroids: &[Vec<f64>],
    eps: f64,
    empty_cluster: EmptyClusterPolicy,
    iteration: usize,
) -> Result<UpdateResult, Error> {
    assert_eq!(clusters.len(), centroids.len());

    let mut new_centroids = Vec::with_capacity(centroids.len());
    let mut max_shift = 0f64;
    let mut converged = true;

    for (j, (members, old)) in clusters.iter().zip(centroids).enumerate() {
        if members.is_empty() {
            warn!(cluster = j, iteration, policy = ?empty_cluster, "empty cluster");
            match empty_cluster {
                EmptyClusterPolicy::Fail => {
                    return EmptyClusterSnafu {
                        cluster: j,
                        iteration,
                    }
                    .fail();
                }
                EmptyClusterPolicy::KeepPrevious => {
                    new_centroids.push(old.clone());
                    continue;
                }
            }
        }

        let new = mean(vectors, members);
        let shift = distance(old, &new);
        if shift > eps || shift.is_nan() {
            converged = false;
        }
        max_shift = max_shift.max(shift);
        new_centroids.push(new);
    }

    Ok(UpdateResult {
        centroids: new_centroids,
        max_shift,
        converged,
    })
}

/// The only mutable state of a run. Replaced as a whole after every pass.
struct ClusteringState {
    centroids: Vec<Vec<f64>>,
    clusters: Vec<Vec<usize>>,
    assignments: Vec<usize>,
    iteration: usize,
    converged: bool,
}

/// Run Lloyd's algorithm until convergence or until `config.max_iter` passes.
pub fn find_centroids(vectors: &VectorSet, config: &KMeansConfig) -> Result<Clustering, Error> {
    config.validate(vectors.len())?;

    let mut state = ClusteringState {
        centroids: find_initial(vectors, config.k)?,
        clusters: Vec::new(),
        assignments: Vec::new(),
        iteration: 0,
        converged: false,
    };
    assert!(state.centroids.iter().all(|c| c.len() == vectors.dim()));

    let mut inertia = Vec::new();

    let outcome = loop {
        let iteration = state.iteration + 1;
        let assignment = assign_points(vectors, &state.centroids);
        let update = update_centroids(
            vectors,
            &assignment.clusters,
            &state.centroids,
            config.eps,
            config.empty_cluster,
            iteration,
        )?;

        debug!(
            iteration,
            inertia = assignment.inertia,
            max_shift = update.max_shift,
            converged = update.converged,
            "lloyd pass"
        );
        inertia.push(assignment.inertia);

        state = ClusteringState {
            centroids: update.centroids,
            clusters: assignment.clusters,
            assignments: assignment.assignments,
            iteration,
            converged: update.converged,
        };

        if state.converged && state.iteration >= MIN_ITERATIONS_FOR_CONVERGENCE {
            break Outcome::Converged;
        }
        if state.iteration >= config.max_iter {
            break Outcome::IterationLimitReached;
        }
    };

    debug!(?outcome, iterations = state.iteration, "clustering finished");

    Ok(Clustering {
        centroids: state.centroids,
        clusters: state.clusters,
        assignments: state.assignments,
        iterations: state.iteration,
        outcome,
        inertia,
    })
}
