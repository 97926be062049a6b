use std::{
    fs::File,
    io::{BufWriter, Write},
    path::Path,
};

use blurrer_image::{Image, ImageSize};
use image::{
    codecs::{jpeg::JpegEncoder, png::PngEncoder},
    ExtendedColorType, ImageEncoder, ImageReader,
};

use crate::error::IoError;

/// Quality used when encoding JPEG images.
const JPEG_QUALITY: u8 = 100;

/// A decoded 8-bit image with 1, 3 or 4 channels.
#[derive(Clone, Debug, PartialEq)]
pub enum DynamicRaster {
    /// A grayscale image.
    Mono8(Image<u8, 1>),
    /// A RGB image.
    Rgb8(Image<u8, 3>),
    /// A RGBA image.
    Rgba8(Image<u8, 4>),
}

impl DynamicRaster {
    /// The size of the image in pixels.
    pub fn size(&self) -> ImageSize {
        match self {
            DynamicRaster::Mono8(img) => img.size(),
            DynamicRaster::Rgb8(img) => img.size(),
            DynamicRaster::Rgba8(img) => img.size(),
        }
    }

    /// The number of channels of the image.
    pub fn num_channels(&self) -> usize {
        match self {
            DynamicRaster::Mono8(_) => 1,
            DynamicRaster::Rgb8(_) => 3,
            DynamicRaster::Rgba8(_) => 4,
        }
    }
}

/// The file formats that can be written.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Lossless PNG.
    Png,
    /// JPEG at quality 100.
    Jpeg,
}

impl OutputFormat {
    /// Pick the output format from the file extension, ignoring case.
    ///
    /// # Errors
    ///
    /// Returns [`IoError::InvalidFileExtension`] for anything other than
    /// `png`, `jpg` or `jpeg`.
    ///
    /// # Example
    ///
    /// ```
    /// use blurrer_io::OutputFormat;
    ///
    /// assert_eq!(OutputFormat::from_path("out.PNG").unwrap(), OutputFormat::Png);
    /// assert_eq!(OutputFormat::from_path("out.jpeg").unwrap(), OutputFormat::Jpeg);
    /// assert!(OutputFormat::from_path("out.bmp").is_err());
    /// ```
    pub fn from_path(file_path: impl AsRef<Path>) -> Result<Self, IoError> {
        let file_path = file_path.as_ref();
        let ext = file_path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.to_ascii_lowercase());

        match ext.as_deref() {
            Some("png") => Ok(OutputFormat::Png),
            Some("jpg") | Some("jpeg") => Ok(OutputFormat::Jpeg),
            _ => Err(IoError::InvalidFileExtension(file_path.to_path_buf())),
        }
    }
}

/// Reads an image from the given file path.
///
/// The format is detected from the file contents. Grayscale images are read
/// as [`DynamicRaster::Mono8`], images with alpha as [`DynamicRaster::Rgba8`]
/// and everything else as [`DynamicRaster::Rgb8`]; samples wider than 8 bits
/// are converted to 8 bits.
///
/// # Arguments
///
/// * `file_path` - The path to the image.
pub fn read_image_any(file_path: impl AsRef<Path>) -> Result<DynamicRaster, IoError> {
    let file_path = file_path.as_ref();

    // verify the file exists
    if !file_path.exists() {
        return Err(IoError::FileDoesNotExist(file_path.to_path_buf()));
    }

    let img = ImageReader::open(file_path)?
        .with_guessed_format()?
        .decode()?;

    let color = img.color();
    log::debug!(
        "decoded {} ({}x{}, {:?})",
        file_path.display(),
        img.width(),
        img.height(),
        color
    );

    let raster = if color.has_alpha() {
        DynamicRaster::Rgba8(into_image(img.into_rgba8())?)
    } else if color.has_color() {
        DynamicRaster::Rgb8(into_image(img.into_rgb8())?)
    } else {
        DynamicRaster::Mono8(into_image(img.into_luma8())?)
    };

    Ok(raster)
}

fn into_image<P, const C: usize>(
    buf: image::ImageBuffer<P, Vec<u8>>,
) -> Result<Image<u8, C>, IoError>
where
    P: image::Pixel<Subpixel = u8>,
{
    let size = ImageSize {
        width: buf.width() as usize,
        height: buf.height() as usize,
    };
    Ok(Image::new(size, buf.into_raw())?)
}

/// Writes an image to the given file path, choosing the encoder from the extension.
///
/// # Arguments
///
/// * `file_path` - The path to the output image, ending in `.png`, `.jpg` or `.jpeg`.
/// * `raster` - The image to encode.
pub fn write_image_any(file_path: impl AsRef<Path>, raster: &DynamicRaster) -> Result<(), IoError> {
    let file_path = file_path.as_ref();
    match OutputFormat::from_path(file_path)? {
        OutputFormat::Png => match raster {
            DynamicRaster::Mono8(img) => write_image_png(file_path, img),
            DynamicRaster::Rgb8(img) => write_image_png(file_path, img),
            DynamicRaster::Rgba8(img) => write_image_png(file_path, img),
        },
        OutputFormat::Jpeg => match raster {
            DynamicRaster::Mono8(img) => write_image_jpeg(file_path, img),
            DynamicRaster::Rgb8(img) => write_image_jpeg(file_path, img),
            DynamicRaster::Rgba8(img) => write_image_jpeg(file_path, img),
        },
    }
}

/// Writes an 8-bit image with 1, 3 or 4 channels as PNG.
pub fn write_image_png<const C: usize>(
    file_path: impl AsRef<Path>,
    image: &Image<u8, C>,
) -> Result<(), IoError> {
    let color_type = color_type::<C>()?;
    let mut writer = BufWriter::new(File::create(file_path)?);

    PngEncoder::new(&mut writer).write_image(
        image.as_slice(),
        image.width() as u32,
        image.height() as u32,
        color_type,
    )?;
    writer.flush()?;

    Ok(())
}

/// Writes an 8-bit image with 1, 3 or 4 channels as JPEG at quality 100.
///
/// JPEG has no alpha channel, so the alpha of RGBA images is dropped.
pub fn write_image_jpeg<const C: usize>(
    file_path: impl AsRef<Path>,
    image: &Image<u8, C>,
) -> Result<(), IoError> {
    let (data, color_type) = match C {
        1 => (image.as_slice().to_vec(), ExtendedColorType::L8),
        3 => (image.as_slice().to_vec(), ExtendedColorType::Rgb8),
        4 => {
            let rgb = image
                .as_slice()
                .chunks_exact(4)
                .flat_map(|px| px[..3].iter().copied())
                .collect::<Vec<u8>>();
            (rgb, ExtendedColorType::Rgb8)
        }
        _ => return Err(IoError::UnsupportedChannels(C)),
    };

    let mut writer = BufWriter::new(File::create(file_path)?);
    JpegEncoder::new_with_quality(&mut writer, JPEG_QUALITY).encode(
        &data,
        image.width() as u32,
        image.height() as u32,
        color_type,
    )?;
    writer.flush()?;

    Ok(())
}

fn color_type<const C: usize>() -> Result<ExtendedColorType, IoError> {
    match C {
        1 => Ok(ExtendedColorType::L8),
        3 => Ok(ExtendedColorType::Rgb8),
        4 => Ok(ExtendedColorType::Rgba8),
        _ => Err(IoError::UnsupportedChannels(C)),
    }
}
