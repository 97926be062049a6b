use blurrer_image::{Image, ImageError};

use super::check_same_size;
use crate::{
    error::FilterError,
    padding::pad_replicate,
    parallel::{self, ExecutionStrategy},
};

/// Apply a median filter to an image.
///
/// Every output sample is the element at index `n / 2` of the ascending
/// sorted `size x size` window of the same channel. For even sizes this picks
/// the upper of the two middle values instead of their mean.
///
/// # Arguments
///
/// * `src` - The source image with shape (H, W, C).
/// * `dst` - The destination image with shape (H, W, C).
/// * `size` - The side length of the window.
///
/// PRECONDITION: `src` and `dst` must have the same shape.
///
/// # Example
///
/// ```
/// use blurrer_image::Image;
/// use blurrer_imgproc::filter::median_filter;
///
/// let src = Image::<f32, 1>::new(
///     [3, 3].into(),
///     vec![0.0, 0.0, 0.0, 0.0, 255.0, 0.0, 0.0, 0.0, 0.0],
/// ).unwrap();
/// let mut dst = Image::<f32, 1>::from_size_val(src.size(), 1.0).unwrap();
///
/// median_filter(&src, &mut dst, 3).unwrap();
///
/// assert!(dst.as_slice().iter().all(|&v| v == 0.0));
/// ```
pub fn median_filter<const C: usize>(
    src: &Image<f32, C>,
    dst: &mut Image<f32, C>,
    size: usize,
) -> Result<(), FilterError> {
    median_filter_with(src, dst, size, ExecutionStrategy::default())
}

/// Apply a median filter to an image using the given execution strategy.
///
/// See [`median_filter`].
pub fn median_filter_with<const C: usize>(
    src: &Image<f32, C>,
    dst: &mut Image<f32, C>,
    size: usize,
    strategy: ExecutionStrategy,
) -> Result<(), FilterError> {
    check_same_size(src, dst)?;

    if size == 0 {
        return Err(ImageError::InvalidKernelSize(size).into());
    }

    let half = size / 2;

    parallel::run_with(strategy, |strategy| -> Result<(), FilterError> {
        let padded = pad_replicate(src, half, half, strategy)?;

        let padded_stride = padded.row_stride();
        let padded_data = padded.as_slice();
        let row_stride = src.row_stride();
        let n = size * size;

        parallel::for_each_row(strategy, dst.as_slice_mut(), row_stride, |row, dst_row| {
            let mut window = Vec::with_capacity(n);
            for (col, dst_pixel) in dst_row.chunks_exact_mut(C).enumerate() {
                for (ch, out) in dst_pixel.iter_mut().enumerate() {
                    window.clear();
                    for kh in 0..size {
                        let padded_row = (row + kh) * padded_stride;
                        window.extend(
                            (0..size).map(|kw| padded_data[padded_row + (col + kw) * C + ch]),
                        );
                    }
                    window.sort_unstable_by(f32::total_cmp);
                    *out = window[n / 2];
                }
            }
        })?;

        Ok(())
    })?
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_median_constant_image() -> Result<(), FilterError> {
        let src = Image::<f32, 4>::from_size_val([5, 3].into(), 12.5)?;
        let mut dst = Image::<f32, 4>::from_size_val(src.size(), 0.0)?;

        for size in [1, 2, 3, 5] {
            median_filter(&src, &mut dst, size)?;
            assert!(dst.as_slice().iter().all(|&v| v == 12.5));
        }

        Ok(())
    }

    #[test]
    fn test_median_removes_impulse() -> Result<(), FilterError> {
        #[rustfmt::skip]
        let src = Image::<f32, 1>::new(
            [3, 3].into(),
            vec![
                0.0, 0.0, 0.0,
                0.0, 255.0, 0.0,
                0.0, 0.0, 0.0,
            ],
        )?;
        let mut dst = Image::<f32, 1>::from_size_val(src.size(), 1.0)?;

        median_filter(&src, &mut dst, 3)?;

        assert_eq!(dst.as_slice(), &[0.0f32; 9]);

        Ok(())
    }

    #[test]
    fn test_median_per_channel() -> Result<(), FilterError> {
        // channel 0 holds a ramp, channel 1 a constant
        let data = [1.0, 5.0, 2.0, 5.0, 3.0, 5.0];
        let src = Image::<f32, 2>::new([3, 1].into(), data.to_vec())?;
        let mut dst = Image::<f32, 2>::from_size_val(src.size(), 0.0)?;

        median_filter(&src, &mut dst, 3)?;

        assert_eq!(dst.as_slice(), &[1.0f32, 5.0, 2.0, 5.0, 3.0, 5.0]);

        Ok(())
    }

    #[test]
    fn test_median_even_size_takes_upper_middle() -> Result<(), FilterError> {
        let src = Image::<f32, 1>::new([2, 2].into(), vec![4.0, 1.0, 3.0, 2.0])?;
        let mut dst = Image::<f32, 1>::from_size_val(src.size(), 0.0)?;

        median_filter(&src, &mut dst, 2)?;

        // pad = 1, window at (0, 0) covers rows {0, 0} x cols {0, 0} => [4, 4, 4, 4]
        assert_eq!(dst.get([0, 0, 0]), Some(&4.0));
        // window at (1, 1) covers rows {0, 1} x cols {0, 1} => [1, 2, 3, 4], upper middle is 3
        assert_eq!(dst.get([1, 1, 0]), Some(&3.0));

        Ok(())
    }

    #[test]
    fn test_median_zero_size() -> Result<(), FilterError> {
        let src = Image::<f32, 1>::from_size_val([2, 2].into(), 1.0)?;
        let mut dst = Image::<f32, 1>::from_size_val(src.size(), 0.0)?;
        assert_eq!(
            median_filter(&src, &mut dst, 0),
            Err(FilterError::Image(ImageError::InvalidKernelSize(0)))
        );
        Ok(())
    }
}
