use rayon::prelude::*;
use thiserror::Error;

use blurrer_image::Image;

/// Errors that can occur during parallel execution.
#[derive(Error, Debug, PartialEq)]
pub enum ParallelError {
    /// The thread pool failed to build.
    #[error("failed to build thread pool: {0}")]
    BuildError(String),

    /// The requested thread count is invalid.
    #[error("thread count must be > 0, got {0}")]
    InvalidThreadCount(usize),

    /// The row stride must be valid.
    #[error("row stride must be > 0, got {0}")]
    InvalidRowStride(usize),

    /// The destination length is not a multiple of the row stride.
    #[error("destination length {0} is not a multiple of the row stride {1}")]
    SizeMismatch(usize, usize),
}

/// Controls how the per-row filter loops are executed.
///
/// Every output row is computed from read-only inputs and written exactly
/// once, so all strategies produce identical results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExecutionStrategy {
    /// Use the global Rayon thread pool to process rows in parallel.
    #[default]
    ParallelRows,

    /// Run sequentially on the current thread.
    ///
    /// Useful for small images, debugging, or when the overhead of parallelization
    /// outweighs the benefits.
    Serial,

    /// Run on a local thread pool with `n` threads.
    ///
    /// # Warning
    /// Creates a new thread pool on every call, which has significant overhead.
    Fixed(usize),
}

impl ExecutionStrategy {
    /// Check that the strategy can be executed.
    pub fn validate(&self) -> Result<(), ParallelError> {
        match self {
            ExecutionStrategy::Fixed(0) => Err(ParallelError::InvalidThreadCount(0)),
            _ => Ok(()),
        }
    }
}

/// Run `op` under the given strategy.
///
/// For [`ExecutionStrategy::Fixed`] a local pool with `n` threads is built
/// and `op` runs inside it, receiving [`ExecutionStrategy::ParallelRows`] so
/// that nested row loops use that pool instead of building their own. The
/// other strategies are passed to `op` unchanged.
///
/// # Errors
///
/// Returns an error if the thread count is zero or the pool fails to build.
pub fn run_with<R, F>(strategy: ExecutionStrategy, op: F) -> Result<R, ParallelError>
where
    R: Send,
    F: FnOnce(ExecutionStrategy) -> R + Send,
{
    match strategy {
        ExecutionStrategy::Fixed(n) => {
            if n == 0 {
                return Err(ParallelError::InvalidThreadCount(n));
            }
            let pool = rayon::ThreadPoolBuilder::new()
                .num_threads(n)
                .build()
                .map_err(|e| ParallelError::BuildError(e.to_string()))?;

            Ok(pool.install(|| op(ExecutionStrategy::ParallelRows)))
        }
        ExecutionStrategy::Serial | ExecutionStrategy::ParallelRows => Ok(op(strategy)),
    }
}

/// Apply a function to every row of `dst` with the given strategy.
///
/// [`ExecutionStrategy::Serial`] never touches a rayon pool.
/// [`ExecutionStrategy::ParallelRows`] uses the current pool, which is the
/// global one unless called from inside [`run_with`].
///
/// # Arguments
///
/// * `strategy` - The execution strategy.
/// * `dst` - The destination buffer, a whole number of rows.
/// * `row_stride` - The number of samples in one row (width * channels).
/// * `op` - The operation receiving the row index and the mutable row.
pub fn for_each_row<T, F>(
    strategy: ExecutionStrategy,
    dst: &mut [T],
    row_stride: usize,
    op: F,
) -> Result<(), ParallelError>
where
    T: Send,
    F: Fn(usize, &mut [T]) + Send + Sync,
{
    if row_stride == 0 {
        return Err(ParallelError::InvalidRowStride(row_stride));
    }

    if dst.len() % row_stride != 0 {
        return Err(ParallelError::SizeMismatch(dst.len(), row_stride));
    }

    match strategy {
        ExecutionStrategy::Serial => {
            dst.chunks_exact_mut(row_stride)
                .enumerate()
                .for_each(|(row, dst_row)| op(row, dst_row));
        }
        ExecutionStrategy::ParallelRows => {
            dst.par_chunks_exact_mut(row_stride)
                .enumerate()
                .for_each(|(row, dst_row)| op(row, dst_row));
        }
        ExecutionStrategy::Fixed(_) => {
            return run_with(strategy, |inner| for_each_row(inner, dst, row_stride, op))?;
        }
    }

    Ok(())
}

/// Apply a function to each sample of the image row by row, writing into `dst`.
///
/// PRECONDITION: `src` and `dst` must have the same size.
pub fn iter_rows_val<T1, T2, const C: usize>(
    strategy: ExecutionStrategy,
    src: &Image<T1, C>,
    dst: &mut Image<T2, C>,
    f: impl Fn(&T1, &mut T2) + Send + Sync,
) -> Result<(), ParallelError>
where
    T1: Send + Sync,
    T2: Send + Sync,
{
    let row_stride = src.row_stride();
    let src_data = src.as_slice();
    for_each_row(strategy, dst.as_slice_mut(), row_stride, |row, dst_row| {
        let src_row = &src_data[row * row_stride..(row + 1) * row_stride];
        src_row
            .iter()
            .zip(dst_row.iter_mut())
            .for_each(|(src_val, dst_val)| f(src_val, dst_val));
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row_index_fill(strategy: ExecutionStrategy) -> Result<Vec<usize>, ParallelError> {
        let mut dst = vec![0usize; 12];
        for_each_row(strategy, &mut dst, 3, |row, dst_row| {
            dst_row.iter_mut().for_each(|v| *v = row);
        })?;
        Ok(dst)
    }

    #[test]
    fn test_for_each_row_strategies_agree() -> Result<(), ParallelError> {
        let expected = vec![0, 0, 0, 1, 1, 1, 2, 2, 2, 3, 3, 3];
        assert_eq!(row_index_fill(ExecutionStrategy::Serial)?, expected);
        assert_eq!(row_index_fill(ExecutionStrategy::ParallelRows)?, expected);
        assert_eq!(row_index_fill(ExecutionStrategy::Fixed(2))?, expected);
        Ok(())
    }

    #[test]
    fn test_for_each_row_invalid_stride() {
        let mut dst = vec![0; 4];
        let res = for_each_row(ExecutionStrategy::Serial, &mut dst, 0, |_, _| {});
        assert_eq!(res, Err(ParallelError::InvalidRowStride(0)));

        let res = for_each_row(ExecutionStrategy::Serial, &mut dst, 3, |_, _| {});
        assert_eq!(res, Err(ParallelError::SizeMismatch(4, 3)));
    }

    #[test]
    fn test_for_each_row_fixed_error() {
        let mut dst = vec![0; 4];
        let res = for_each_row(ExecutionStrategy::Fixed(0), &mut dst, 2, |_, _| {});
        assert_eq!(res, Err(ParallelError::InvalidThreadCount(0)));
        assert_eq!(
            ExecutionStrategy::Fixed(0).validate(),
            Err(ParallelError::InvalidThreadCount(0))
        );
    }

    #[test]
    fn test_run_with_fixed_installs_pool() -> Result<(), ParallelError> {
        let (inner, threads) = run_with(ExecutionStrategy::Fixed(2), |inner| {
            (inner, rayon::current_num_threads())
        })?;
        assert_eq!(inner, ExecutionStrategy::ParallelRows);
        assert_eq!(threads, 2);

        let inner = run_with(ExecutionStrategy::Serial, |inner| inner)?;
        assert_eq!(inner, ExecutionStrategy::Serial);

        assert_eq!(
            run_with(ExecutionStrategy::Fixed(0), |_| ()),
            Err(ParallelError::InvalidThreadCount(0))
        );
        Ok(())
    }

    #[test]
    fn test_serial_stays_on_current_thread() -> Result<(), ParallelError> {
        let caller = std::thread::current().id();
        let mut dst = vec![0u8; 8];
        for_each_row(ExecutionStrategy::Serial, &mut dst, 2, |_, _| {
            assert_eq!(std::thread::current().id(), caller);
        })?;
        Ok(())
    }

    #[test]
    fn test_iter_rows_val() -> Result<(), Box<dyn std::error::Error>> {
        let src = Image::<u8, 1>::new([2, 2].into(), vec![1, 2, 3, 4])?;
        for strategy in [
            ExecutionStrategy::Serial,
            ExecutionStrategy::ParallelRows,
            ExecutionStrategy::Fixed(2),
        ] {
            let mut dst = Image::<u8, 1>::from_size_val(src.size(), 0)?;
            iter_rows_val(strategy, &src, &mut dst, |s, d| *d = *s * 2)?;
            assert_eq!(dst.as_slice(), &[2, 4, 6, 8]);
        }
        Ok(())
    }
}
