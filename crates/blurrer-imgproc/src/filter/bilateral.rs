use blurrer_image::{Image, ImageError};

use super::{check_kernel, check_same_size, Kernel};
use crate::{
    error::FilterError,
    padding::pad_replicate,
    parallel::{self, ExecutionStrategy},
};

/// Apply a bilateral filter to an image.
///
/// Each neighbor is weighted by the spatial kernel times a range term
/// `exp(-diff^2 / (2 sigma_range^2))`, where `diff` is the intensity
/// difference to the center sample in the same channel. The output is the
/// weighted mean of the neighbors, so large intensity steps are preserved.
///
/// # Arguments
///
/// * `src` - The source image with shape (H, W, C).
/// * `dst` - The destination image with shape (H, W, C).
/// * `spatial_kernel` - The spatial weights, see [`super::kernels::bilateral_spatial_kernel`].
/// * `sigma_range` - The standard deviation of the range term.
///
/// PRECONDITION: `src` and `dst` must have the same shape. The center weight
/// of `spatial_kernel` must be positive.
pub fn bilateral_filter<const C: usize>(
    src: &Image<f32, C>,
    dst: &mut Image<f32, C>,
    spatial_kernel: &Kernel,
    sigma_range: f32,
) -> Result<(), FilterError> {
    bilateral_filter_with(
        src,
        dst,
        spatial_kernel,
        sigma_range,
        ExecutionStrategy::default(),
    )
}

/// Apply a bilateral filter to an image using the given execution strategy.
///
/// See [`bilateral_filter`].
pub fn bilateral_filter_with<const C: usize>(
    src: &Image<f32, C>,
    dst: &mut Image<f32, C>,
    spatial_kernel: &Kernel,
    sigma_range: f32,
    strategy: ExecutionStrategy,
) -> Result<(), FilterError> {
    check_same_size(src, dst)?;
    check_kernel::<C>(spatial_kernel)?;

    if !(sigma_range.is_finite() && sigma_range > 0.0) {
        return Err(ImageError::InvalidFilterParameter("sigma_range", sigma_range).into());
    }

    let ksize = spatial_kernel.size();
    let half = ksize / 2;

    parallel::run_with(strategy, |strategy| -> Result<(), FilterError> {
        let padded = pad_replicate(src, half, half, strategy)?;

        let padded_stride = padded.row_stride();
        let padded_data = padded.as_slice();
        let src_data = src.as_slice();
        let kernel_data = spatial_kernel.as_slice();
        let row_stride = src.row_stride();
        let range_denom = 2.0 * sigma_range * sigma_range;

        parallel::for_each_row(strategy, dst.as_slice_mut(), row_stride, |row, dst_row| {
            let src_row = &src_data[row * row_stride..(row + 1) * row_stride];
            for (col, dst_pixel) in dst_row.chunks_exact_mut(C).enumerate() {
                for (ch, out) in dst_pixel.iter_mut().enumerate() {
                    let center = src_row[col * C + ch];
                    let mut sum = 0.0;
                    let mut weight_sum = 0.0;
                    for kh in 0..ksize {
                        let padded_row = (row + kh) * padded_stride;
                        let kernel_row = kh * ksize * C;
                        for kw in 0..ksize {
                            let neighbor = padded_data[padded_row + (col + kw) * C + ch];
                            let diff = center - neighbor;
                            let range_weight = (-(diff * diff) / range_denom).exp();
                            let weight = kernel_data[kernel_row + kw * C + ch] * range_weight;
                            sum += weight * neighbor;
                            weight_sum += weight;
                        }
                    }
                    *out = sum / weight_sum;
                }
            }
        })?;

        Ok(())
    })?
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::{convolve, kernels::bilateral_spatial_kernel};
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_bilateral_constant_image() -> Result<(), FilterError> {
        let src = Image::<f32, 3>::from_size_val([6, 4].into(), 77.0)?;
        let mut dst = Image::<f32, 3>::from_size_val(src.size(), 0.0)?;

        let kernel = bilateral_spatial_kernel(5, 2.0, 3)?;
        bilateral_filter(&src, &mut dst, &kernel, 50.0)?;

        for &v in dst.as_slice() {
            assert_abs_diff_eq!(v, 77.0, epsilon = 1e-3);
        }

        Ok(())
    }

    #[test]
    fn test_bilateral_large_sigma_range_matches_convolution() -> Result<(), FilterError> {
        let data = (0..(8 * 6)).map(|v| ((v * 37) % 256) as f32).collect();
        let src = Image::<f32, 1>::new([8, 6].into(), data)?;

        let kernel = bilateral_spatial_kernel(3, 1.5, 1)?;

        let mut bilateral = Image::<f32, 1>::from_size_val(src.size(), 0.0)?;
        bilateral_filter(&src, &mut bilateral, &kernel, 1e6)?;

        let mut linear = Image::<f32, 1>::from_size_val(src.size(), 0.0)?;
        convolve(&src, &mut linear, &kernel.normalized())?;

        for (a, b) in bilateral.as_slice().iter().zip(linear.as_slice()) {
            assert_abs_diff_eq!(a, b, epsilon = 1e-2);
        }

        Ok(())
    }

    #[test]
    fn test_bilateral_preserves_step_edge() -> Result<(), FilterError> {
        #[rustfmt::skip]
        let src = Image::<f32, 1>::new(
            [4, 2].into(),
            vec![
                0.0, 0.0, 255.0, 255.0,
                0.0, 0.0, 255.0, 255.0,
            ],
        )?;
        let mut dst = Image::<f32, 1>::from_size_val(src.size(), 0.0)?;

        let kernel = bilateral_spatial_kernel(3, 2.0, 1)?;
        bilateral_filter(&src, &mut dst, &kernel, 10.0)?;

        for (a, b) in dst.as_slice().iter().zip(src.as_slice()) {
            assert_abs_diff_eq!(a, b, epsilon = 1e-3);
        }

        Ok(())
    }

    #[test]
    fn test_bilateral_invalid_sigma_range() -> Result<(), FilterError> {
        let src = Image::<f32, 1>::from_size_val([2, 2].into(), 1.0)?;
        let mut dst = Image::<f32, 1>::from_size_val(src.size(), 0.0)?;
        let kernel = bilateral_spatial_kernel(3, 2.0, 1)?;

        let res = bilateral_filter(&src, &mut dst, &kernel, 0.0);
        assert_eq!(
            res,
            Err(FilterError::Image(ImageError::InvalidFilterParameter(
                "sigma_range",
                0.0
            )))
        );

        Ok(())
    }
}
