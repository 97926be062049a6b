/// An error type for the io module.
#[derive(thiserror::Error, Debug)]
pub enum IoError {
    /// Error when the file does not exist.
    #[error("File does not exist: {0}")]
    FileDoesNotExist(std::path::PathBuf),

    /// Invalid file extension.
    #[error("Unsupported output file format: {0}. Please use .png or .jpg/.jpeg")]
    InvalidFileExtension(std::path::PathBuf),

    /// Error to open the file.
    #[error("Failed to manipulate the file. {0}")]
    FileError(#[from] std::io::Error),

    /// Error to create the image.
    #[error("Failed to create image. {0}")]
    ImageCreationError(#[from] blurrer_image::ImageError),

    /// Error to decode or encode the image.
    #[error("Failed to decode or encode the image. {0}")]
    ImageCodecError(#[from] image::ImageError),

    /// The number of channels cannot be encoded.
    #[error("Cannot encode an image with {0} channels")]
    UnsupportedChannels(usize),
}
