use super::{Corner, WatermarkError};

/// Top-left coordinate of a `box_width` x `box_height` watermark placed in
/// `corner`, inset by `padding` from the edges touching that corner.
///
/// Fails when the box plus padding does not fit, so the returned box always
/// lies inside the image.
pub fn anchor(
    corner: Corner,
    (image_width, image_height): (u32, u32),
    (box_width, box_height): (u32, u32),
    padding: u32,
) -> Result<(u32, u32), WatermarkError> {
    let does_not_fit = || WatermarkError::DoesNotFit {
        width: box_width,
        height: box_height,
        padding,
        image_width,
        image_height,
    };

    let free_x = image_width
        .checked_sub(box_width)
        .and_then(|rest| rest.checked_sub(padding))
        .ok_or_else(does_not_fit)?;
    let free_y = image_height
        .checked_sub(box_height)
        .and_then(|rest| rest.checked_sub(padding))
        .ok_or_else(does_not_fit)?;

    let x = if corner.is_right() { free_x } else { padding };
    let y = if corner.is_bottom() { free_y } else { padding };

    Ok((x, y))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_anchor_per_corner() {
        let image = (1000, 800);
        let size = (120, 30);

        assert_eq!(anchor(Corner::TopLeft, image, size, 20).unwrap(), (20, 20));
        assert_eq!(anchor(Corner::TopRight, image, size, 20).unwrap(), (860, 20));
        assert_eq!(
            anchor(Corner::BottomLeft, image, size, 20).unwrap(),
            (20, 750)
        );
        assert_eq!(
            anchor(Corner::BottomRight, image, size, 20).unwrap(),
            (860, 750)
        );
    }

    #[test]
    fn test_anchor_keeps_box_inside_image() {
        let image = (64, 48);
        for corner in Corner::ALL {
            for padding in 0..=16 {
                for (w, h) in [(1, 1), (10, 5), (40, 30), (48, 32)] {
                    let Ok((x, y)) = anchor(corner, image, (w, h), padding) else {
                        assert!(w + padding > image.0 || h + padding > image.1);
                        continue;
                    };
                    assert!(x + w <= image.0, "{corner} {padding} overflows x");
                    assert!(y + h <= image.1, "{corner} {padding} overflows y");
                    assert!(x >= padding || corner.is_right());
                    assert!(y >= padding || corner.is_bottom());
                }
            }
        }
    }

    #[test]
    fn test_anchor_rejects_oversized_box() {
        let err = anchor(Corner::BottomRight, (100, 100), (95, 10), 10).unwrap_err();
        assert!(matches!(err, WatermarkError::DoesNotFit { .. }));
        assert!(err.is_validation());

        // Exact fit is allowed
        assert_eq!(
            anchor(Corner::BottomRight, (100, 100), (90, 90), 10).unwrap(),
            (0, 0)
        );
    }

    #[test]
    fn test_anchor_handles_extreme_padding() {
        assert!(anchor(Corner::TopLeft, (100, 100), (10, 10), u32::MAX).is_err());
    }
}
