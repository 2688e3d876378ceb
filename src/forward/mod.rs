//! Forward modelling of point sources
//!
//! Every kernel reduces to the same loop: for each source, add its
//! contribution to every observation point. [`accumulate`] runs that loop
//! either sequentially or split over sources across the rayon pool. Each
//! worker owns a contiguous source range and its own output buffer; the
//! buffers are summed in worker order after the join, so the parallel
//! result does not depend on thread scheduling.
//!
//! Observation points that coincide with a source are not guarded: kernels
//! with a `1/r^n` factor return infinities or NaN there.

use log::debug;
use rayon::prelude::*;
use std::ops::{AddAssign, Range};

pub mod dipole;
pub mod point;

/// Sum `kernel(observation, source)` over all sources for every observation
/// point
pub(crate) fn accumulate<K>(n_obs: usize, n_src: usize, kernel: K, parallel: bool) -> Vec<f64>
where
    K: Fn(usize, usize) -> f64 + Sync,
{
    accumulate_with(n_obs, n_src, 0.0, kernel, parallel)
}

/// [`accumulate`] for any summable value, starting every observation at `zero`
pub(crate) fn accumulate_with<T, K>(
    n_obs: usize,
    n_src: usize,
    zero: T,
    kernel: K,
    parallel: bool,
) -> Vec<T>
where
    T: Copy + Send + Sync + AddAssign,
    K: Fn(usize, usize) -> T + Sync,
{
    if parallel && n_src > 1 {
        accumulate_parallel(n_obs, n_src, zero, &kernel)
    } else {
        accumulate_range(n_obs, 0..n_src, zero, &kernel)
    }
}

fn accumulate_range<T, K>(n_obs: usize, sources: Range<usize>, zero: T, kernel: &K) -> Vec<T>
where
    T: Copy + AddAssign,
    K: Fn(usize, usize) -> T,
{
    let mut out = vec![zero; n_obs];
    for j in sources {
        for (i, value) in out.iter_mut().enumerate() {
            *value += kernel(i, j);
        }
    }
    out
}

fn accumulate_parallel<T, K>(n_obs: usize, n_src: usize, zero: T, kernel: &K) -> Vec<T>
where
    T: Copy + Send + Sync + AddAssign,
    K: Fn(usize, usize) -> T + Sync,
{
    let workers = rayon::current_num_threads().clamp(1, n_src);
    let chunk = (n_src + workers - 1) / workers;
    debug!(
        "accumulating {} sources over {} workers ({} sources each)",
        n_src, workers, chunk
    );

    let partials: Vec<Vec<T>> = (0..workers)
        .into_par_iter()
        .map(|w| {
            let start = (w * chunk).min(n_src);
            let end = ((w + 1) * chunk).min(n_src);
            accumulate_range(n_obs, start..end, zero, kernel)
        })
        .collect();

    let mut out = vec![zero; n_obs];
    for partial in partials {
        for (value, p) in out.iter_mut().zip(partial) {
            *value += p;
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::Vector3;

    #[test]
    fn test_accumulate_counts_pairs() {
        let serial = accumulate(4, 7, |_, _| 1.0, false);
        assert_eq!(serial, vec![7.0; 4]);

        let parallel = accumulate(4, 7, |_, _| 1.0, true);
        assert_eq!(parallel, vec![7.0; 4]);
    }

    #[test]
    fn test_accumulate_uses_indices() {
        let kernel = |i: usize, j: usize| (i * 10 + j) as f64;
        let serial = accumulate(3, 5, kernel, false);
        let parallel = accumulate(3, 5, kernel, true);
        // sum_j (10 i + j) = 50 i + 10
        assert_eq!(serial, vec![10.0, 60.0, 110.0]);
        assert_eq!(parallel, serial);
    }

    #[test]
    fn test_accumulate_vectors() {
        let kernel = |i: usize, j: usize| Vector3::new(i as f64, j as f64, 1.0);
        let serial = accumulate_with(2, 4, Vector3::zeros(), kernel, false);
        let parallel = accumulate_with(2, 4, Vector3::zeros(), kernel, true);
        assert_eq!(serial[0], Vector3::new(0.0, 6.0, 4.0));
        assert_eq!(serial[1], Vector3::new(4.0, 6.0, 4.0));
        assert_eq!(parallel, serial);
    }

    #[test]
    fn test_accumulate_no_observations() {
        assert!(accumulate(0, 3, |_, _| 1.0, true).is_empty());
    }
}
