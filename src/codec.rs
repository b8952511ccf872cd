use crate::watermark::WatermarkError;
use image::{
    DynamicImage, ImageEncoder, ImageFormat, ImageReader, Rgba, RgbaImage,
    codecs::jpeg::JpegEncoder,
};
use std::io::Cursor;
use std::path::Path;
use tracing::debug;

pub const DEFAULT_JPEG_QUALITY: u8 = 95;

const SUPPORTED_FORMATS: [ImageFormat; 4] = [
    ImageFormat::Jpeg,
    ImageFormat::Png,
    ImageFormat::Bmp,
    ImageFormat::Tiff,
];

fn check_supported(format: Option<ImageFormat>) -> Result<ImageFormat, WatermarkError> {
    match format {
        Some(format) if SUPPORTED_FORMATS.contains(&format) => Ok(format),
        Some(format) => Err(WatermarkError::UnsupportedFormat(format!("{:?}", format))),
        None => Err(WatermarkError::UnsupportedFormat("unrecognised".to_string())),
    }
}

/// Decode an image file, returning it with the format it was stored in.
pub fn load_image(path: &Path) -> Result<(DynamicImage, ImageFormat), WatermarkError> {
    let reader = ImageReader::open(path)?.with_guessed_format()?;
    let format = check_supported(reader.format())?;

    let image = reader.decode().map_err(|source| WatermarkError::Load {
        path: path.to_path_buf(),
        source,
    })?;

    debug!(
        "Loaded {:?} {}x{} from {:?}",
        format,
        image.width(),
        image.height(),
        path
    );
    Ok((image, format))
}

/// Decode an in-memory image, returning it with its format.
pub fn decode_image(bytes: &[u8]) -> Result<(DynamicImage, ImageFormat), WatermarkError> {
    let reader = ImageReader::new(Cursor::new(bytes)).with_guessed_format()?;
    let format = check_supported(reader.format())?;
    Ok((reader.decode()?, format))
}

/// Composite `image` over an opaque white background.
pub fn flatten_onto_white(image: &DynamicImage) -> RgbaImage {
    let mut flat = RgbaImage::from_pixel(image.width(), image.height(), Rgba([255, 255, 255, 255]));
    image::imageops::overlay(&mut flat, &image.to_rgba8(), 0, 0);
    flat
}

/// Encode `image` in `format`.
///
/// JPEG has no alpha channel, so translucent pixels are flattened onto white
/// first and the result is written at `jpeg_quality`.
pub fn encode_image(
    image: &DynamicImage,
    format: ImageFormat,
    jpeg_quality: u8,
) -> Result<Vec<u8>, WatermarkError> {
    check_supported(Some(format))?;
    let mut buffer = Cursor::new(Vec::new());

    match format {
        ImageFormat::Jpeg => {
            let rgb_image = DynamicImage::ImageRgba8(flatten_onto_white(image)).to_rgb8();
            let encoder = JpegEncoder::new_with_quality(&mut buffer, jpeg_quality);
            encoder.write_image(
                &rgb_image,
                rgb_image.width(),
                rgb_image.height(),
                image::ExtendedColorType::Rgb8,
            )?;
        }
        _ => image.write_to(&mut buffer, format)?,
    }

    Ok(buffer.into_inner())
}

/// Encode fully in memory, then write to `path`.
///
/// A failed encode leaves nothing on disk.
pub fn save_image(
    image: &DynamicImage,
    path: &Path,
    format: ImageFormat,
    jpeg_quality: u8,
) -> Result<(), WatermarkError> {
    let bytes = encode_image(image, format, jpeg_quality)?;

    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, &bytes)?;

    debug!("Wrote {} bytes of {:?} to {:?}", bytes.len(), format, path);
    Ok(())
}
