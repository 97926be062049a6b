use blurrer_image::Image;

use super::{check_kernel, check_same_size, Kernel};
use crate::{
    error::FilterError,
    padding::pad_replicate,
    parallel::{self, ExecutionStrategy},
};

/// Convolve an image with a kernel.
///
/// The image is padded by half the kernel size with border replication and
/// every output sample is the weighted sum of the window below the kernel,
/// channel by channel.
///
/// # Arguments
///
/// * `src` - The source image with shape (H, W, C).
/// * `dst` - The destination image with shape (H, W, C).
/// * `kernel` - The kernel with shape (size, size, C).
///
/// PRECONDITION: `src` and `dst` must have the same shape.
///
/// # Example
///
/// ```
/// use blurrer_image::Image;
/// use blurrer_imgproc::filter::{convolve, kernels, MotionDirection};
///
/// let src = Image::<f32, 1>::new([3, 1].into(), vec![10.0, 20.0, 30.0]).unwrap();
/// let mut dst = Image::<f32, 1>::from_size_val(src.size(), 0.0).unwrap();
///
/// let kernel = kernels::motion_kernel(3, MotionDirection::Horizontal, 1).unwrap();
/// convolve(&src, &mut dst, &kernel).unwrap();
///
/// assert!((dst.as_slice()[1] - 20.0).abs() < 1e-4);
/// ```
pub fn convolve<const C: usize>(
    src: &Image<f32, C>,
    dst: &mut Image<f32, C>,
    kernel: &Kernel,
) -> Result<(), FilterError> {
    convolve_with(src, dst, kernel, ExecutionStrategy::default())
}

/// Convolve an image with a kernel using the given execution strategy.
///
/// See [`convolve`].
pub fn convolve_with<const C: usize>(
    src: &Image<f32, C>,
    dst: &mut Image<f32, C>,
    kernel: &Kernel,
    strategy: ExecutionStrategy,
) -> Result<(), FilterError> {
    check_same_size(src, dst)?;
    check_kernel::<C>(kernel)?;

    let ksize = kernel.size();
    let half = ksize / 2;

    parallel::run_with(strategy, |strategy| -> Result<(), FilterError> {
        let padded = pad_replicate(src, half, half, strategy)?;

        let padded_stride = padded.row_stride();
        let padded_data = padded.as_slice();
        let kernel_data = kernel.as_slice();
        let row_stride = src.row_stride();

        parallel::for_each_row(strategy, dst.as_slice_mut(), row_stride, |row, dst_row| {
            for (col, dst_pixel) in dst_row.chunks_exact_mut(C).enumerate() {
                for (ch, out) in dst_pixel.iter_mut().enumerate() {
                    let mut sum = 0.0;
                    for kh in 0..ksize {
                        let padded_row = (row + kh) * padded_stride;
                        let kernel_row = kh * ksize * C;
                        for kw in 0..ksize {
                            sum += kernel_data[kernel_row + kw * C + ch]
                                * padded_data[padded_row + (col + kw) * C + ch];
                        }
                    }
                    *out = sum;
                }
            }
        })?;

        Ok(())
    })?
}
