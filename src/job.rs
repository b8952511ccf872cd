use crate::codec::{decode_image, encode_image, load_image, save_image};
use crate::watermark::{
    LogoWatermarkSpec, TextWatermarkSpec, WatermarkError, apply_logo_watermark,
    apply_text_watermark,
};
use image::{DynamicImage, ImageFormat};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// The watermarks to draw in one invocation.
#[derive(Clone, Default)]
pub struct WatermarkJob {
    pub text: Option<TextWatermarkSpec>,
    pub logo: Option<LogoWatermarkSpec>,
}

impl WatermarkJob {
    pub fn is_empty(&self) -> bool {
        self.text.is_none() && self.logo.is_none()
    }

    /// Check every parameter before any pixel is touched.
    pub fn validate(&self) -> Result<(), WatermarkError> {
        if let Some(text) = &self.text {
            text.validate()?;
        }
        if let Some(logo) = &self.logo {
            logo.validate()?;
        }
        Ok(())
    }

    /// Logo first, then text, so text is never hidden under the logo.
    pub fn apply(&self, image: &DynamicImage) -> Result<DynamicImage, WatermarkError> {
        self.validate()?;

        let mut output = DynamicImage::ImageRgba8(image.to_rgba8());

        if let Some(logo) = &self.logo {
            output = apply_logo_watermark(&output, logo)?;
        }
        if let Some(text) = &self.text {
            output = apply_text_watermark(&output, text)?;
        }

        Ok(output)
    }
}

/// Watermark encoded image bytes and re-encode them in their own format.
pub fn watermark_bytes(
    bytes: &[u8],
    job: &WatermarkJob,
    jpeg_quality: u8,
) -> Result<(Vec<u8>, ImageFormat), WatermarkError> {
    let (image, format) = decode_image(bytes)?;
    let output = job.apply(&image)?;
    Ok((encode_image(&output, format, jpeg_quality)?, format))
}

/// Watermark the image at `input` and write it to `output` in the input's
/// format. Nothing is written unless every step succeeds.
pub fn watermark_file(
    input: &Path,
    output: &Path,
    job: &WatermarkJob,
    jpeg_quality: u8,
) -> Result<ImageFormat, WatermarkError> {
    let (image, format) = load_image(input)?;
    let watermarked = job.apply(&image)?;
    save_image(&watermarked, output, format, jpeg_quality)?;

    info!("Watermarked {:?} -> {:?}", input, output);
    Ok(format)
}

/// Sibling `<stem>.txt` next to an image, if there is one.
pub fn find_text_file(image_path: &Path) -> Option<PathBuf> {
    let candidate = image_path.with_extension("txt");
    if candidate != image_path && candidate.is_file() {
        debug!("Found text file {:?} for {:?}", candidate, image_path);
        Some(candidate)
    } else {
        None
    }
}

/// Read watermark text, trimmed. Empty files yield `None`.
///
/// Non-UTF-8 content is decoded lossily rather than rejected.
pub fn read_watermark_text(path: &Path) -> Result<Option<String>, WatermarkError> {
    let bytes = std::fs::read(path)?;
    let text = match String::from_utf8(bytes) {
        Ok(text) => text,
        Err(e) => {
            warn!("{:?} is not valid UTF-8, decoding lossily", path);
            String::from_utf8_lossy(e.as_bytes()).into_owned()
        }
    };

    let trimmed = text.trim();
    Ok((!trimmed.is_empty()).then(|| trimmed.to_string()))
}
