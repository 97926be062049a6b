/// An error type for the image module.
#[derive(thiserror::Error, Debug, PartialEq)]
pub enum ImageError {
    /// Error when the image has a zero width or height.
    #[error("Image size must be non-zero, got {0}x{1}")]
    EmptyImage(usize, usize),

    /// Error when channel and shape are not valid.
    #[error("Data length ({0}) does not match the image size ({1})")]
    InvalidChannelShape(usize, usize),

    /// Error when two images are expected to have the same size.
    #[error("Image size ({0}x{1}) does not match the expected size ({2}x{3})")]
    InvalidImageSize(usize, usize, usize, usize),

    /// Error when the channel count of a kernel and an image differ.
    #[error("Kernel has {0} channels but the image has {1}")]
    KernelChannelMismatch(usize, usize),

    /// Error when a kernel or window size is not usable.
    #[error("Invalid kernel size {0}, must be > 0")]
    InvalidKernelSize(usize),

    /// Error when a filter parameter is not a finite positive number.
    #[error("Invalid value for `{0}`: {1}, must be finite and > 0")]
    InvalidFilterParameter(&'static str, f32),

    /// Error when the pixel index is out of bounds.
    #[error("Pixel index ({0}, {1}) out of bounds ({2}x{3})")]
    PixelIndexOutOfBounds(usize, usize, usize, usize),

    /// Error when the channel index is out of bounds.
    #[error("Channel index {0} out of bounds (image has {1} channels)")]
    ChannelIndexOutOfBounds(usize, usize),

    /// Error when a pixel value cannot be represented in the target type.
    #[error("Failed to cast image data to {0}")]
    CastError(String),
}
