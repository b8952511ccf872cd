use super::WatermarkError;
use image::DynamicImage;

pub const MIN_SUGGESTED_FONT_SIZE: u32 = 10;
pub const MAX_SUGGESTED_FONT_SIZE: u32 = 100;
pub const MIN_SUGGESTED_PADDING: u32 = 5;
pub const MAX_SUGGESTED_PADDING: u32 = 50;

/// Font size of roughly 5% of the image width.
pub fn suggest_font_size(image: &DynamicImage) -> Result<u32, WatermarkError> {
    let width = checked_width(image)?;
    Ok(percent_of(width, 5).clamp(MIN_SUGGESTED_FONT_SIZE, MAX_SUGGESTED_FONT_SIZE))
}

/// Edge padding of roughly 2% of the image width.
pub fn suggest_padding(image: &DynamicImage) -> Result<u32, WatermarkError> {
    let width = checked_width(image)?;
    Ok(percent_of(width, 2).clamp(MIN_SUGGESTED_PADDING, MAX_SUGGESTED_PADDING))
}

fn checked_width(image: &DynamicImage) -> Result<u32, WatermarkError> {
    match image.width() {
        0 => Err(WatermarkError::InvalidParameter(
            "image width must be positive".to_string(),
        )),
        width => Ok(width),
    }
}

fn percent_of(value: u32, percent: u32) -> u32 {
    (value as u64 * percent as u64 / 100) as u32
}
