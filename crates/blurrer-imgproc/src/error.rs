use blurrer_image::ImageError;

use crate::parallel::ParallelError;

/// An error type for the filtering operations.
///
/// Every variant is raised before the per-pixel loops start, so a failing
/// call never leaves a partially written output behind.
#[derive(thiserror::Error, Debug, PartialEq)]
pub enum FilterError {
    /// The kernel or window size is zero.
    #[error("Invalid strength {0}, must be a positive integer")]
    InvalidStrength(usize),

    /// The bilateral range sigma is not a finite positive number.
    #[error("Invalid sigma range {0}, must be finite and > 0")]
    InvalidSigmaRange(f32),

    /// The bilateral spatial sigma is not a finite positive number.
    #[error("Invalid sigma space {0}, must be finite and > 0")]
    InvalidSigmaSpace(f32),

    /// Motion blur was requested without a direction.
    #[error("Please specify motion direction (horizontal, vertical, diagonal)")]
    MissingMotionDirection,

    /// The motion direction string is not recognized.
    #[error("Invalid motion direction `{0}` (valid: horizontal, vertical, diagonal)")]
    InvalidMotionDirection(String),

    /// The algorithm name is not recognized.
    #[error("Unknown algorithm `{0}` (valid: gaussian, box, bilateral, median, motion)")]
    UnknownAlgorithm(String),

    /// Only images with 1, 3 or 4 channels are filtered.
    #[error("Unsupported number of channels {0} (valid: 1, 3, 4)")]
    UnsupportedChannels(usize),

    /// Error coming from the image types.
    #[error(transparent)]
    Image(#[from] ImageError),

    /// Error coming from the parallel execution.
    #[error(transparent)]
    Parallel(#[from] ParallelError),
}
