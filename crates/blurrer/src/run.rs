use blurrer_imgproc::{config::FilterConfig, pipeline::blur_u8, FilterError};
use blurrer_io::DynamicRaster;

/// Filter a decoded raster with `config` and return a raster of the same
/// size and channel layout.
///
/// # Example
///
/// ```
/// use blurrer::{image::Image, imgproc::config::FilterConfig, io::DynamicRaster, run::blur_raster};
///
/// let raster = DynamicRaster::Mono8(Image::from_size_val([4, 4].into(), 100).unwrap());
/// let blurred = blur_raster(&raster, &FilterConfig::default()).unwrap();
///
/// assert_eq!(blurred, raster);
/// ```
pub fn blur_raster(
    raster: &DynamicRaster,
    config: &FilterConfig,
) -> Result<DynamicRaster, FilterError> {
    let blurred = match raster {
        DynamicRaster::Mono8(img) => DynamicRaster::Mono8(blur_u8(img, config)?),
        DynamicRaster::Rgb8(img) => DynamicRaster::Rgb8(blur_u8(img, config)?),
        DynamicRaster::Rgba8(img) => DynamicRaster::Rgba8(blur_u8(img, config)?),
    };
    Ok(blurred)
}
