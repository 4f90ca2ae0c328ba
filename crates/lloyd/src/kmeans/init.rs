use crate::{Error, InvalidClusterCountSnafu, VectorSet};
use snafu::prelude::*;

/// Seed `k` centroids with copies of the first `k` vectors, in input order.
pub fn find_initial(vectors: &VectorSet, k: usize) -> Result<Vec<Vec<f64>>, Error> {
    let n = vectors.len();
    // Every centroid needs its own seed, and at least one vector must be left over
    ensure!(k >= 1 && k < n, InvalidClusterCountSnafu { k, n });

    Ok(vectors.iter().take(k).map(<[f64]>::to_vec).collect())
}
