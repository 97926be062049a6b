use blurrer_image::{Image, ImageError, ImageSize};

use crate::{
    error::FilterError,
    parallel::{self, ExecutionStrategy},
};

/// Represents 2D padding with top, bottom, left, and right values (in pixels).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Padding2D {
    /// Amount of padding to add on the top side.
    pub top: usize,
    /// Amount of padding to add on the bottom side.
    pub bottom: usize,
    /// Amount of padding to add on the left side.
    pub left: usize,
    /// Amount of padding to add on the right side.
    pub right: usize,
}

impl Padding2D {
    /// Padding of `pad_h` rows above and below, and `pad_w` columns left and right.
    pub fn symmetric(pad_h: usize, pad_w: usize) -> Self {
        Self {
            top: pad_h,
            bottom: pad_h,
            left: pad_w,
            right: pad_w,
        }
    }

    /// The size of an image of `size` once this padding is applied.
    pub fn padded_size(&self, size: ImageSize) -> ImageSize {
        ImageSize {
            width: size.width + self.left + self.right,
            height: size.height + self.top + self.bottom,
        }
    }

    /// Validates that a new image size correctly matches the expected dimensions
    /// after applying this padding to an existing image.
    ///
    /// # Example
    /// ```rust
    /// use blurrer_image::ImageSize;
    /// use blurrer_imgproc::padding::Padding2D;
    /// let padding = Padding2D { top: 1, bottom: 1, left: 2, right: 2 };
    /// let old_size = ImageSize { width: 4, height: 4 };
    /// let new_size = ImageSize { width: 8, height: 6 };
    ///
    /// assert!(padding.validate_size(old_size, new_size));
    /// ```
    pub fn validate_size(&self, old_size: ImageSize, new_size: ImageSize) -> bool {
        self.padded_size(old_size) == new_size
    }
}

/// Maps index `i` to `[0, len)` by clamping to the nearest edge.
#[inline]
fn replicate_index(i: isize, len: usize) -> usize {
    i.clamp(0, len as isize - 1) as usize
}

/// Fills `dst` with `src` surrounded by a border-replicated frame.
///
/// Every output pixel `(y, x)` takes the value of the source pixel
/// `(clamp(y - top, 0, H - 1), clamp(x - left, 0, W - 1))`.
///
/// The rows of `dst` are filled with `strategy`.
///
/// # Errors
///
/// Returns an error if the size of `dst` does not match the size of `src`
/// after applying `padding`, or if `strategy` cannot run.
///
/// # Example
///
/// ```rust
/// use blurrer_image::Image;
/// use blurrer_imgproc::{
///     padding::{spatial_padding, Padding2D},
///     parallel::ExecutionStrategy,
/// };
///
/// let src = Image::<u8, 1>::new([2, 1].into(), vec![1, 2]).unwrap();
/// let mut dst = Image::<u8, 1>::from_size_val([4, 3].into(), 0).unwrap();
///
/// spatial_padding(&src, &mut dst, Padding2D::symmetric(1, 1), ExecutionStrategy::Serial).unwrap();
///
/// assert_eq!(dst.as_slice(), &[1, 1, 2, 2, 1, 1, 2, 2, 1, 1, 2, 2]);
/// ```
pub fn spatial_padding<T, const C: usize>(
    src: &Image<T, C>,
    dst: &mut Image<T, C>,
    padding: Padding2D,
    strategy: ExecutionStrategy,
) -> Result<(), FilterError>
where
    T: Copy + Send + Sync,
{
    if !padding.validate_size(src.size(), dst.size()) {
        let expected = padding.padded_size(src.size());
        return Err(ImageError::InvalidImageSize(
            dst.width(),
            dst.height(),
            expected.width,
            expected.height,
        )
        .into());
    }

    let old_height = src.height();
    let old_stride = src.row_stride();
    let new_stride = dst.row_stride();
    let left = padding.left * C;
    let top = padding.top as isize;
    let old_data = src.as_slice();

    parallel::for_each_row(strategy, dst.as_slice_mut(), new_stride, |y, dst_row| {
        let src_y = replicate_index(y as isize - top, old_height);
        let src_row = &old_data[src_y * old_stride..(src_y + 1) * old_stride];

        let (left_section, rest) = dst_row.split_at_mut(left);
        let (center, right_section) = rest.split_at_mut(old_stride);

        center.copy_from_slice(src_row);

        let first = &src_row[..C];
        left_section
            .chunks_exact_mut(C)
            .for_each(|px| px.copy_from_slice(first));

        let last = &src_row[old_stride - C..];
        right_section
            .chunks_exact_mut(C)
            .for_each(|px| px.copy_from_slice(last));
    })?;

    Ok(())
}

/// Creates a border-replicated copy of `src` enlarged by `pad_h` rows and
/// `pad_w` columns on each side.
pub fn pad_replicate<T, const C: usize>(
    src: &Image<T, C>,
    pad_h: usize,
    pad_w: usize,
    strategy: ExecutionStrategy,
) -> Result<Image<T, C>, FilterError>
where
    T: Copy + Default + Send + Sync,
{
    let padding = Padding2D::symmetric(pad_h, pad_w);
    let mut dst = Image::from_size_val(padding.padded_size(src.size()), T::default())?;
    spatial_padding(src, &mut dst, padding, strategy)?;
    Ok(dst)
}
