use blurrer_image::{Image, ImageError};

use crate::{
    error::FilterError,
    parallel::{self, ExecutionStrategy},
};

/// Convert one float sample to 8 bits.
///
/// The value is rounded half away from zero and clamped to [0, 255]; NaN maps to 0.
#[inline]
pub fn quantize_sample(x: f32) -> u8 {
    if x.is_nan() {
        return 0;
    }
    x.round().clamp(0.0, 255.0) as u8
}

/// Convert a filtered float image into an 8-bit image of the same shape.
///
/// # Example
///
/// ```
/// use blurrer_image::Image;
/// use blurrer_imgproc::quantize::quantize;
///
/// let image = Image::<f32, 1>::new([4, 1].into(), vec![-3.0, 19.5, 254.6, 300.0]).unwrap();
/// let image_u8 = quantize(&image).unwrap();
///
/// assert_eq!(image_u8.as_slice(), &[0, 20, 255, 255]);
/// ```
pub fn quantize<const C: usize>(src: &Image<f32, C>) -> Result<Image<u8, C>, FilterError> {
    quantize_with(src, ExecutionStrategy::default())
}

/// Convert a filtered float image into 8 bits using the given execution strategy.
///
/// See [`quantize`].
pub fn quantize_with<const C: usize>(
    src: &Image<f32, C>,
    strategy: ExecutionStrategy,
) -> Result<Image<u8, C>, FilterError> {
    let mut dst = Image::from_size_val(src.size(), 0u8)?;
    quantize_into(src, &mut dst, strategy)?;
    Ok(dst)
}

/// Convert a filtered float image into a preallocated 8-bit image.
///
/// # Errors
///
/// Returns an error if `src` and `dst` have different sizes or `strategy`
/// cannot run.
pub fn quantize_into<const C: usize>(
    src: &Image<f32, C>,
    dst: &mut Image<u8, C>,
    strategy: ExecutionStrategy,
) -> Result<(), FilterError> {
    if src.size() != dst.size() {
        return Err(ImageError::InvalidImageSize(
            dst.width(),
            dst.height(),
            src.width(),
            src.height(),
        )
        .into());
    }

    parallel::iter_rows_val(strategy, src, dst, |&x, y| *y = quantize_sample(x))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quantize_sample() {
        assert_eq!(quantize_sample(0.0), 0);
        assert_eq!(quantize_sample(0.49), 0);
        assert_eq!(quantize_sample(0.5), 1);
        assert_eq!(quantize_sample(127.5), 128);
        assert_eq!(quantize_sample(254.6), 255);
        assert_eq!(quantize_sample(300.0), 255);
        assert_eq!(quantize_sample(-3.0), 0);
        assert_eq!(quantize_sample(f32::NAN), 0);
        assert_eq!(quantize_sample(f32::INFINITY), 255);
    }

    #[test]
    fn test_quantize_image() -> Result<(), FilterError> {
        let src = Image::<f32, 3>::new([2, 1].into(), vec![0.2, 99.9, 100.5, 255.0, 12.0, 7.49])?;
        let dst = quantize(&src)?;
        assert_eq!(dst.size(), src.size());
        assert_eq!(dst.into_vec(), vec![0, 100, 101, 255, 12, 7]);
        Ok(())
    }

    #[test]
    fn test_quantize_strategies_agree() -> Result<(), FilterError> {
        let data = (0..(5 * 4 * 3)).map(|v| v as f32 * 4.7 - 10.0).collect();
        let src = Image::<f32, 3>::new([5, 4].into(), data)?;

        let serial = quantize_with(&src, ExecutionStrategy::Serial)?;
        for strategy in [ExecutionStrategy::ParallelRows, ExecutionStrategy::Fixed(2)] {
            assert_eq!(quantize_with(&src, strategy)?, serial);
        }
        Ok(())
    }

    #[test]
    fn test_quantize_into_size_mismatch() -> Result<(), FilterError> {
        let src = Image::<f32, 1>::from_size_val([2, 2].into(), 1.0)?;
        let mut dst = Image::<u8, 1>::from_size_val([2, 1].into(), 0)?;
        assert_eq!(
            quantize_into(&src, &mut dst, ExecutionStrategy::Serial),
            Err(FilterError::Image(ImageError::InvalidImageSize(2, 1, 2, 2)))
        );
        Ok(())
    }
}
