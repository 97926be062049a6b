use blurrer_image::Image;

use crate::{
    config::{FilterAlgorithm, FilterConfig},
    error::FilterError,
    filter::{bilateral_filter_with, convolve_with, kernels, median_filter_with},
    parallel::{self, ExecutionStrategy},
    quantize::quantize_with,
};

/// Filter a float image according to `config`.
///
/// The configuration is validated first; the kernel for the selected
/// algorithm is then built with `C` channels and applied to a border
/// replicated copy of `src`. The returned image has the size of `src`.
///
/// # Errors
///
/// Returns an error if the configuration is invalid or `C` is not 1, 3 or 4.
///
/// # Example
///
/// ```
/// use blurrer_image::Image;
/// use blurrer_imgproc::{config::FilterConfig, pipeline::apply_filter};
///
/// let src = Image::<f32, 1>::from_size_val([5, 5].into(), 100.0).unwrap();
/// let dst = apply_filter(&src, &FilterConfig::default()).unwrap();
///
/// assert!(dst.as_slice().iter().all(|v| (v - 100.0).abs() < 1e-3));
/// ```
pub fn apply_filter<const C: usize>(
    src: &Image<f32, C>,
    config: &FilterConfig,
) -> Result<Image<f32, C>, FilterError> {
    if !matches!(C, 1 | 3 | 4) {
        return Err(FilterError::UnsupportedChannels(C));
    }

    config.validate()?;

    log::debug!(
        "applying {} filter of size {} to a {}x{}x{} image",
        config.algorithm(),
        config.strength(),
        src.width(),
        src.height(),
        C
    );

    parallel::run_with(config.execution(), |strategy| filter_with(src, config, strategy))?
}

fn filter_with<const C: usize>(
    src: &Image<f32, C>,
    config: &FilterConfig,
    strategy: ExecutionStrategy,
) -> Result<Image<f32, C>, FilterError> {
    let size = config.strength();
    let mut dst = Image::from_size_val(src.size(), 0.0f32)?;

    match config.algorithm() {
        FilterAlgorithm::Gaussian => {
            let kernel = kernels::gaussian_kernel(size, C)?;
            convolve_with(src, &mut dst, &kernel, strategy)?;
        }
        FilterAlgorithm::Box => {
            let kernel = kernels::box_kernel(size, C)?;
            convolve_with(src, &mut dst, &kernel, strategy)?;
        }
        FilterAlgorithm::Bilateral => {
            let kernel = kernels::bilateral_spatial_kernel(size, config.sigma_space(), C)?;
            bilateral_filter_with(src, &mut dst, &kernel, config.sigma_range(), strategy)?;
        }
        FilterAlgorithm::Median => {
            median_filter_with(src, &mut dst, size, strategy)?;
        }
        FilterAlgorithm::Motion => {
            let direction = config
                .motion_direction()
                .ok_or(FilterError::MissingMotionDirection)?;
            log::debug!("motion direction: {direction}");
            let kernel = kernels::motion_kernel(size, direction, C)?;
            convolve_with(src, &mut dst, &kernel, strategy)?;
        }
    }

    Ok(dst)
}

/// Filter a decoded 8-bit image and quantize the result back to 8 bits.
///
/// Samples are widened to `f32` without rescaling, filtered with
/// [`apply_filter`] and converted back with
/// [`quantize`](crate::quantize::quantize). Both steps share the execution
/// strategy of `config`.
pub fn blur_u8<const C: usize>(
    src: &Image<u8, C>,
    config: &FilterConfig,
) -> Result<Image<u8, C>, FilterError> {
    let src_f32 = src.cast::<f32>()?;
    parallel::run_with(config.execution(), |strategy| {
        let filtered = apply_filter(&src_f32, &config.with_execution(strategy))?;
        quantize_with(&filtered, strategy)
    })?
}
