use super::blend::paint_mask;
use super::{MAX_FONT_SIZE, TextWatermarkSpec, WatermarkError, placement};
use ab_glyph::{Font, FontArc, PxScale, ScaleFont};
use image::{DynamicImage, GrayImage, Luma};
use imageproc::drawing::{draw_text_mut, text_size};
use imageproc::morphology::{Mask, grayscale_dilate};
use tracing::debug;

/// Rendered text as a coverage mask cropped to its ink box.
pub struct TextLayer {
    pub coverage: GrayImage,
}

impl TextLayer {
    pub fn width(&self) -> u32 {
        self.coverage.width()
    }

    pub fn height(&self) -> u32 {
        self.coverage.height()
    }
}

/// Render `text` and crop it to the pixels it actually covers.
pub fn render_text(
    font: &FontArc,
    font_size: u32,
    text: &str,
) -> Result<TextLayer, WatermarkError> {
    if font_size == 0 || font_size > MAX_FONT_SIZE {
        return Err(WatermarkError::InvalidParameter(format!(
            "font size must be in 1..={}, got {}",
            MAX_FONT_SIZE, font_size
        )));
    }

    let scale = PxScale::from(font_size as f32);
    let (advance_width, _) = text_size(scale, font, text);
    let line_height = font.as_scaled(scale).height().ceil().max(0.0) as u32;

    // Glyphs may overhang their advance box, leave room on every side
    let margin = font_size;
    let mut scratch = GrayImage::new(
        advance_width.saturating_add(2 * margin),
        line_height.saturating_add(2 * margin),
    );
    draw_text_mut(
        &mut scratch,
        Luma([u8::MAX]),
        margin as i32,
        margin as i32,
        scale,
        font,
        text,
    );

    let (min_x, min_y, max_x, max_y) = ink_bounds(&scratch).ok_or_else(|| {
        WatermarkError::InvalidParameter(format!("text {:?} renders no visible glyphs", text))
    })?;

    let coverage = image::imageops::crop_imm(
        &scratch,
        min_x,
        min_y,
        max_x - min_x + 1,
        max_y - min_y + 1,
    )
    .to_image();

    Ok(TextLayer { coverage })
}

/// Measure the ink box of `text` without drawing it anywhere.
pub fn measure_text(
    font: &FontArc,
    font_size: u32,
    text: &str,
) -> Result<(u32, u32), WatermarkError> {
    let layer = render_text(font, font_size, text)?;
    Ok((layer.width(), layer.height()))
}

/// Reject text that cannot fit from its layout metrics alone, before any
/// scratch canvas is allocated.
///
/// The ink box is never shorter than the tallest glyph box (less a pixel of
/// empty edge on each side), and side bearings trim at most one em from
/// each end of the advance width.
fn check_layout_fits(
    spec: &TextWatermarkSpec,
    (image_width, image_height): (u32, u32),
) -> Result<(), WatermarkError> {
    let scale = PxScale::from(spec.font_size as f32);
    let (advance_width, glyph_height) = text_size(scale, &spec.font, &spec.text);

    let min_width = advance_width.saturating_sub(2 * spec.font_size);
    let min_height = glyph_height.saturating_sub(2);

    if min_width.saturating_add(spec.padding) > image_width
        || min_height.saturating_add(spec.padding) > image_height
    {
        return Err(WatermarkError::DoesNotFit {
            width: advance_width,
            height: glyph_height,
            padding: spec.padding,
            image_width,
            image_height,
        });
    }
    Ok(())
}

/// Draw a text watermark onto a copy of `image`.
///
/// The fill text's ink box is inset by `padding` from the edges touching
/// `spec.corner`. The outline is painted first so the fill always sits on
/// top of it; outline pixels that spill past the image edge are clipped.
pub fn apply_text_watermark(
    image: &DynamicImage,
    spec: &TextWatermarkSpec,
) -> Result<DynamicImage, WatermarkError> {
    spec.validate()?;
    check_layout_fits(spec, (image.width(), image.height()))?;

    let layer = render_text(&spec.font, spec.font_size, &spec.text)?;
    let (x, y) = placement::anchor(
        spec.corner,
        (image.width(), image.height()),
        (layer.width(), layer.height()),
        spec.padding,
    )?;

    debug!(
        "Placing {}x{} text at ({}, {}) in {} corner",
        layer.width(),
        layer.height(),
        x,
        y,
        spec.corner
    );

    let mut canvas = image.to_rgba8();

    // validate() caps the width at u8::MAX
    if let Ok(radius) = u8::try_from(spec.outline_width)
        && radius > 0
    {
        let outline = spread(&layer.coverage, radius);
        let offset = radius as i64;
        paint_mask(
            &mut canvas,
            &outline,
            spec.outline,
            x as i64 - offset,
            y as i64 - offset,
        );
    }

    paint_mask(&mut canvas, &layer.coverage, spec.fill, x as i64, y as i64);

    Ok(DynamicImage::ImageRgba8(canvas))
}

/// Tight bounds of the non-zero pixels as (min_x, min_y, max_x, max_y).
fn ink_bounds(mask: &GrayImage) -> Option<(u32, u32, u32, u32)> {
    let mut bounds: Option<(u32, u32, u32, u32)> = None;

    for (x, y, pixel) in mask.enumerate_pixels() {
        if pixel[0] == 0 {
            continue;
        }
        bounds = Some(match bounds {
            None => (x, y, x, y),
            Some((min_x, min_y, max_x, max_y)) => {
                (min_x.min(x), min_y.min(y), max_x.max(x), max_y.max(y))
            }
        });
    }

    bounds
}

/// Grow a coverage mask by `radius` pixels in every direction, keeping the
/// strongest coverage within each (2 * radius + 1) square. This matches
/// stamping the mask at every offset in that square. The result is
/// `2 * radius` larger on each axis.
fn spread(mask: &GrayImage, radius: u8) -> GrayImage {
    let border = radius as u32;
    let mut padded = GrayImage::new(mask.width() + 2 * border, mask.height() + 2 * border);
    image::imageops::replace(&mut padded, mask, border as i64, border as i64);

    grayscale_dilate(&padded, &Mask::square(radius))
}
