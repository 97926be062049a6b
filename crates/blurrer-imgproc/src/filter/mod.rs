//! Filter operations
//!
//! This module provides the spatial filters used for blurring and denoising.

/// Filter kernels
pub mod kernels;
pub use kernels::{Kernel, MotionDirection};

/// Linear convolution with a fixed kernel
mod convolution;
pub use convolution::*;

/// Edge preserving bilateral filter
mod bilateral;
pub use bilateral::*;

/// Rank order median filter
mod median;
pub use median::*;

use blurrer_image::{Image, ImageError};

/// Check that `src` and `dst` have the same size.
fn check_same_size<T, U, const C: usize>(
    src: &Image<T, C>,
    dst: &Image<U, C>,
) -> Result<(), ImageError> {
    if src.size() != dst.size() {
        return Err(ImageError::InvalidImageSize(
            dst.width(),
            dst.height(),
            src.width(),
            src.height(),
        ));
    }
    Ok(())
}

/// Check that a kernel can be applied to an image with `C` channels.
fn check_kernel<const C: usize>(kernel: &Kernel) -> Result<(), ImageError> {
    if kernel.channels() != C {
        return Err(ImageError::KernelChannelMismatch(kernel.channels(), C));
    }
    Ok(())
}
