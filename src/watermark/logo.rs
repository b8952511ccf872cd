use super::{LogoWatermarkSpec, WatermarkError, placement};
use image::{DynamicImage, RgbaImage, imageops::FilterType};
use std::path::Path;
use tracing::debug;

/// Load a logo from disk. Any decode failure is reported as a load error.
pub fn load_logo(path: &Path) -> Result<DynamicImage, WatermarkError> {
    let logo = image::ImageReader::open(path)?
        .with_guessed_format()?
        .decode()
        .map_err(|source| WatermarkError::Load {
            path: path.to_path_buf(),
            source,
        })?;

    if !logo.color().has_alpha() {
        debug!("Logo {:?} has no alpha channel, it will be drawn opaque", path);
    }

    Ok(logo)
}

/// Size the logo takes on a base image `base_width` pixels wide.
pub fn scaled_logo_size(
    base_width: u32,
    (logo_width, logo_height): (u32, u32),
    scale_factor: f32,
) -> (u32, u32) {
    let width = (base_width as f64 * scale_factor as f64).round().max(1.0);
    let height = (width * logo_height as f64 / logo_width as f64).round().max(1.0);
    (width as u32, height as u32)
}

/// Resize the logo to `scale_factor` of the base width and composite it onto
/// a copy of `image`, honouring the logo's alpha channel.
pub fn apply_logo_watermark(
    image: &DynamicImage,
    spec: &LogoWatermarkSpec,
) -> Result<DynamicImage, WatermarkError> {
    spec.validate()?;

    let (target_width, target_height) = scaled_logo_size(
        image.width(),
        (spec.logo.width(), spec.logo.height()),
        spec.scale_factor,
    );

    let (x, y) = placement::anchor(
        spec.corner,
        (image.width(), image.height()),
        (target_width, target_height),
        spec.padding,
    )?;

    // Logos without alpha come through as fully opaque
    let unchanged = (target_width, target_height) == (spec.logo.width(), spec.logo.height());
    let logo: RgbaImage = if unchanged {
        spec.logo.to_rgba8()
    } else {
        spec.logo
            .resize_exact(target_width, target_height, FilterType::Lanczos3)
            .to_rgba8()
    };

    debug!(
        "Placing {}x{} logo at ({}, {}) in {} corner",
        target_width, target_height, x, y, spec.corner
    );

    let mut canvas = image.to_rgba8();
    image::imageops::overlay(&mut canvas, &logo, x as i64, y as i64);

    Ok(DynamicImage::ImageRgba8(canvas))
}
