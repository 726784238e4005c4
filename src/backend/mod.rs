//! Compute backend dispatcher
//!
//! Every calculation is embarrassingly parallel across samples (salinity
//! sweep), zone groups (segment regression) or wells. The dispatcher decides
//! per call whether to fan work out on rayon or stay on the calling thread.
//! Results are identical either way: each work item is computed
//! independently and collected in input order.

use crate::Backend;

#[cfg(feature = "rayon")]
use rayon::prelude::*;

/// Work units (samples x inner iterations) below which `CostBased` stays scalar
pub const PARALLEL_THRESHOLD: usize = 16_384;

/// Cost-based backend selection
pub struct BackendDispatcher {
    _private: (),
}

impl BackendDispatcher {
    /// Whether a job of `work_units` should run in parallel on `backend`
    ///
    /// Always `false` when the `rayon` feature is disabled.
    #[must_use]
    pub const fn use_parallel(backend: Backend, work_units: usize) -> bool {
        if !cfg!(feature = "rayon") {
            return false;
        }
        match backend {
            Backend::Scalar => false,
            Backend::Parallel => true,
            Backend::CostBased => work_units >= PARALLEL_THRESHOLD,
        }
    }

    /// Map `f` over `items`, preserving order
    pub fn map<T, R, F>(backend: Backend, work_units: usize, items: &[T], f: F) -> Vec<R>
    where
        T: Sync,
        R: Send,
        F: Fn(&T) -> R + Sync + Send,
    {
        if Self::use_parallel(backend, work_units) {
            map_parallel(items, f)
        } else {
            items.iter().map(f).collect()
        }
    }

    /// Run `f(row_index, row)` over consecutive `row_len`-sized rows of `data`
    pub fn for_each_row_mut<F>(backend: Backend, data: &mut [f64], row_len: usize, f: F)
    where
        F: Fn(usize, &mut [f64]) + Sync + Send,
    {
        if row_len == 0 {
            return;
        }
        if Self::use_parallel(backend, data.len()) {
            rows_parallel(data, row_len, f);
        } else {
            data.chunks_mut(row_len)
                .enumerate()
                .for_each(|(i, row)| f(i, row));
        }
    }
}

#[cfg(feature = "rayon")]
fn map_parallel<T, R, F>(items: &[T], f: F) -> Vec<R>
where
    T: Sync,
    R: Send,
    F: Fn(&T) -> R + Sync + Send,
{
    items.par_iter().map(f).collect()
}

#[cfg(not(feature = "rayon"))]
fn map_parallel<T, R, F>(items: &[T], f: F) -> Vec<R>
where
    T: Sync,
    R: Send,
    F: Fn(&T) -> R + Sync + Send,
{
    items.iter().map(f).collect()
}

#[cfg(feature = "rayon")]
fn rows_parallel<F>(data: &mut [f64], row_len: usize, f: F)
where
    F: Fn(usize, &mut [f64]) + Sync + Send,
{
    data.par_chunks_mut(row_len)
        .enumerate()
        .for_each(|(i, row)| f(i, row));
}

#[cfg(not(feature = "rayon"))]
fn rows_parallel<F>(data: &mut [f64], row_len: usize, f: F)
where
    F: Fn(usize, &mut [f64]) + Sync + Send,
{
    data.chunks_mut(row_len)
        .enumerate()
        .for_each(|(i, row)| f(i, row));
}
