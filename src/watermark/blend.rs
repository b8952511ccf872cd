use image::{GrayImage, Pixel, Rgb, Rgba, RgbaImage};

/// Composite `color` at `alpha` onto `dst`.
pub fn blend_pixel(dst: &mut Rgba<u8>, color: Rgb<u8>, alpha: u8) {
    dst.blend(&Rgba([color[0], color[1], color[2], alpha]));
}

/// Paint `color` onto `base` through a coverage `mask` whose top-left lands
/// at (`x`, `y`). Mask pixels outside `base` are clipped.
pub fn paint_mask(base: &mut RgbaImage, mask: &GrayImage, color: Rgb<u8>, x: i64, y: i64) {
    let (width, height) = (base.width() as i64, base.height() as i64);

    for (mx, my, coverage) in mask.enumerate_pixels() {
        let tx = x + mx as i64;
        let ty = y + my as i64;
        if (0..width).contains(&tx) && (0..height).contains(&ty) {
            blend_pixel(base.get_pixel_mut(tx as u32, ty as u32), color, coverage[0]);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blend_extremes() {
        let mut px = Rgba([10, 20, 30, 255]);
        blend_pixel(&mut px, Rgb([200, 200, 200]), 0);
        assert_eq!(px, Rgba([10, 20, 30, 255]));

        blend_pixel(&mut px, Rgb([200, 150, 100]), 255);
        assert_eq!(px, Rgba([200, 150, 100, 255]));
    }

    #[test]
    fn test_blend_half_coverage_on_opaque_background() {
        let mut px = Rgba([0, 0, 0, 255]);
        blend_pixel(&mut px, Rgb([255, 255, 255]), 128);
        assert!((127..=128).contains(&px[0]), "got {:?}", px);
        assert_eq!(px[0], px[1]);
        assert_eq!(px[3], 255);
    }

    #[test]
    fn test_coverage_marks_transparent_background() {
        let mut px = Rgba([0, 0, 0, 0]);
        blend_pixel(&mut px, Rgb([255, 0, 0]), 1);
        assert!(px[3] > 0);
        assert_eq!(px[1], 0);
    }

    #[test]
    fn test_paint_mask_clips_outside_pixels() {
        let mut base = RgbaImage::from_pixel(4, 4, Rgba([0, 0, 0, 255]));
        let mask = GrayImage::from_pixel(3, 3, image::Luma([255]));

        paint_mask(&mut base, &mask, Rgb([255, 0, 0]), -1, 2);

        assert_eq!(base.get_pixel(0, 2), &Rgba([255, 0, 0, 255]));
        assert_eq!(base.get_pixel(1, 3), &Rgba([255, 0, 0, 255]));
        assert_eq!(base.get_pixel(2, 2), &Rgba([0, 0, 0, 255]));
        assert_eq!(base.get_pixel(0, 1), &Rgba([0, 0, 0, 255]));
    }
}
