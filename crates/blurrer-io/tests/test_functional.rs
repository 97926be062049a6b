use blurrer_image::Image;
use blurrer_io::{
    functional::{read_image_any, write_image_any, write_image_jpeg, write_image_png},
    DynamicRaster, IoError, OutputFormat,
};

#[test]
fn test_png_roundtrip_rgb() -> Result<(), Box<dyn std::error::Error>> {
    let tmp_dir = tempfile::tempdir()?;
    let file_path = tmp_dir.path().join("rgb.png");

    let data = (0..4 * 3 * 3).map(|v| (v * 7) as u8).collect();
    let image = Image::<u8, 3>::new([4, 3].into(), data)?;

    write_image_png(&file_path, &image)?;
    let raster = read_image_any(&file_path)?;

    assert_eq!(raster, DynamicRaster::Rgb8(image));

    Ok(())
}

#[test]
fn test_png_roundtrip_mono_and_rgba() -> Result<(), Box<dyn std::error::Error>> {
    let tmp_dir = tempfile::tempdir()?;

    let mono = DynamicRaster::Mono8(Image::new([3, 2].into(), vec![0, 50, 100, 150, 200, 250])?);
    let mono_path = tmp_dir.path().join("mono.png");
    write_image_any(&mono_path, &mono)?;
    let decoded = read_image_any(&mono_path)?;
    assert_eq!(decoded.num_channels(), 1);
    assert_eq!(decoded, mono);

    let rgba = DynamicRaster::Rgba8(Image::from_size_val([2, 2].into(), 128)?);
    let rgba_path = tmp_dir.path().join("rgba.PNG");
    write_image_any(&rgba_path, &rgba)?;
    let decoded = read_image_any(&rgba_path)?;
    assert_eq!(decoded.num_channels(), 4);
    assert_eq!(decoded, rgba);

    Ok(())
}

#[test]
fn test_jpeg_write_drops_alpha() -> Result<(), Box<dyn std::error::Error>> {
    let tmp_dir = tempfile::tempdir()?;
    let file_path = tmp_dir.path().join("rgba.jpg");

    let image = Image::<u8, 4>::from_size_val([8, 8].into(), 200)?;
    write_image_jpeg(&file_path, &image)?;

    let raster = read_image_any(&file_path)?;
    assert_eq!(raster.num_channels(), 3);
    assert_eq!(raster.size(), image.size());

    Ok(())
}

#[test]
fn test_write_unsupported_extension() -> Result<(), Box<dyn std::error::Error>> {
    let tmp_dir = tempfile::tempdir()?;
    let file_path = tmp_dir.path().join("out.bmp");

    let raster = DynamicRaster::Mono8(Image::from_size_val([2, 2].into(), 0)?);
    let res = write_image_any(&file_path, &raster);

    assert!(matches!(res, Err(IoError::InvalidFileExtension(_))));
    assert!(!file_path.exists());
    assert!(matches!(
        OutputFormat::from_path("no_extension"),
        Err(IoError::InvalidFileExtension(_))
    ));

    Ok(())
}

#[test]
fn test_read_missing_file() {
    let res = read_image_any("does/not/exist.png");
    assert!(matches!(res, Err(IoError::FileDoesNotExist(_))));
}
