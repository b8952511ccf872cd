use super::WatermarkError;
use ab_glyph::FontArc;
use image::{DynamicImage, Rgb};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Font sizes above this are rejected before allocating a scratch canvas.
pub const MAX_FONT_SIZE: u32 = 4096;

/// Thickest outline accepted, in pixels.
pub const MAX_OUTLINE_WIDTH: u32 = u8::MAX as u32;

/// Where a watermark is anchored on the base image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum Corner {
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
}

impl Corner {
    pub const ALL: [Corner; 4] = [
        Corner::TopLeft,
        Corner::TopRight,
        Corner::BottomLeft,
        Corner::BottomRight,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Corner::TopLeft => "top-left",
            Corner::TopRight => "top-right",
            Corner::BottomLeft => "bottom-left",
            Corner::BottomRight => "bottom-right",
        }
    }

    pub fn is_right(&self) -> bool {
        matches!(self, Corner::TopRight | Corner::BottomRight)
    }

    pub fn is_bottom(&self) -> bool {
        matches!(self, Corner::BottomLeft | Corner::BottomRight)
    }
}

impl fmt::Display for Corner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Corner {
    type Err = WatermarkError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase().replace(['_', ' '], "-");
        Corner::ALL
            .into_iter()
            .find(|corner| corner.as_str() == normalized)
            .ok_or_else(|| WatermarkError::UnknownCorner(s.to_string()))
    }
}

/// An RGB color written as `#RRGGBB`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(try_from = "String", into = "String")]
pub struct HexColor(pub Rgb<u8>);

impl HexColor {
    pub const WHITE: HexColor = HexColor(Rgb([255, 255, 255]));
    pub const BLACK: HexColor = HexColor(Rgb([0, 0, 0]));

    pub fn rgb(&self) -> Rgb<u8> {
        self.0
    }
}

impl FromStr for HexColor {
    type Err = WatermarkError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let hex = s.trim().trim_start_matches('#');
        if hex.len() != 6 || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(WatermarkError::MalformedColor(s.to_string()));
        }

        let channel = |i: usize| {
            u8::from_str_radix(&hex[i..i + 2], 16)
                .map_err(|_| WatermarkError::MalformedColor(s.to_string()))
        };

        Ok(HexColor(Rgb([channel(0)?, channel(2)?, channel(4)?])))
    }
}

impl TryFrom<String> for HexColor {
    type Error = WatermarkError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<HexColor> for String {
    fn from(color: HexColor) -> Self {
        color.to_string()
    }
}

impl fmt::Display for HexColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Rgb([r, g, b]) = self.0;
        write!(f, "#{:02X}{:02X}{:02X}", r, g, b)
    }
}

/// Everything needed to draw one text watermark.
#[derive(Clone)]
pub struct TextWatermarkSpec {
    pub text: String,
    /// Font size in pixels
    pub font_size: u32,
    pub fill: Rgb<u8>,
    pub outline: Rgb<u8>,
    /// Outline thickness in pixels, 0 disables the outline
    pub outline_width: u32,
    pub corner: Corner,
    /// Distance in pixels from the edges touching `corner`
    pub padding: u32,
    pub font: FontArc,
}

impl TextWatermarkSpec {
    pub fn validate(&self) -> Result<(), WatermarkError> {
        if self.text.trim().is_empty() {
            return Err(WatermarkError::InvalidParameter(
                "watermark text is empty".to_string(),
            ));
        }
        if self.font_size == 0 || self.font_size > MAX_FONT_SIZE {
            return Err(WatermarkError::InvalidParameter(format!(
                "font size must be in 1..={}, got {}",
                MAX_FONT_SIZE, self.font_size
            )));
        }
        if self.outline_width > MAX_OUTLINE_WIDTH {
            return Err(WatermarkError::InvalidParameter(format!(
                "outline width must be at most {}, got {}",
                MAX_OUTLINE_WIDTH, self.outline_width
            )));
        }
        Ok(())
    }
}

/// Everything needed to composite one logo watermark.
#[derive(Debug, Clone)]
pub struct LogoWatermarkSpec {
    pub logo: DynamicImage,
    /// Logo width as a fraction of the base image width, in (0, 1]
    pub scale_factor: f32,
    pub corner: Corner,
    pub padding: u32,
}

impl LogoWatermarkSpec {
    pub fn validate(&self) -> Result<(), WatermarkError> {
        if !(self.scale_factor > 0.0 && self.scale_factor <= 1.0) {
            return Err(WatermarkError::InvalidParameter(format!(
                "logo scale factor must be in (0, 1], got {}",
                self.scale_factor
            )));
        }
        if self.logo.width() == 0 || self.logo.height() == 0 {
            return Err(WatermarkError::InvalidParameter(
                "logo has no pixels".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::RgbaImage;

    #[test]
    fn test_corner_parsing() {
        assert_eq!("top-left".parse::<Corner>().unwrap(), Corner::TopLeft);
        assert_eq!("Bottom Right".parse::<Corner>().unwrap(), Corner::BottomRight);
        assert_eq!("bottom_left".parse::<Corner>().unwrap(), Corner::BottomLeft);

        let err = "center".parse::<Corner>().unwrap_err();
        assert!(matches!(err, WatermarkError::UnknownCorner(_)));
        assert!(err.is_validation());
    }

    #[test]
    fn test_corner_display_round_trips() {
        for corner in Corner::ALL {
            assert_eq!(corner.to_string().parse::<Corner>().unwrap(), corner);
        }
    }

    #[test]
    fn test_hex_color_parsing() {
        assert_eq!("#FFFFFF".parse::<HexColor>().unwrap(), HexColor::WHITE);
        assert_eq!("000000".parse::<HexColor>().unwrap(), HexColor::BLACK);
        assert_eq!(
            "#1a2B3c".parse::<HexColor>().unwrap().rgb(),
            Rgb([0x1a, 0x2b, 0x3c])
        );
        assert_eq!(HexColor(Rgb([1, 2, 255])).to_string(), "#0102FF");
    }

    #[test]
    fn test_hex_color_rejects_malformed() {
        for bad in ["", "#FFF", "#GGGGGG", "#1234567", "red"] {
            let err = bad.parse::<HexColor>().unwrap_err();
            assert!(
                matches!(err, WatermarkError::MalformedColor(_)),
                "{} should be rejected",
                bad
            );
        }
    }

    fn text_spec() -> TextWatermarkSpec {
        TextWatermarkSpec {
            text: "Sample".to_string(),
            font_size: 40,
            fill: Rgb([255, 255, 255]),
            outline: Rgb([0, 0, 0]),
            outline_width: 2,
            corner: Corner::BottomLeft,
            padding: 20,
            font: crate::font::default_font(),
        }
    }

    #[test]
    fn test_text_spec_validation() {
        let mut spec = text_spec();
        assert!(spec.validate().is_ok());

        spec.outline_width = MAX_OUTLINE_WIDTH;
        assert!(spec.validate().is_ok());

        for bad in [MAX_OUTLINE_WIDTH + 1, u32::MAX / 2 + 1, u32::MAX] {
            spec.outline_width = bad;
            assert!(spec.validate().unwrap_err().is_validation(), "{}", bad);
        }

        let mut spec = text_spec();
        spec.font_size = MAX_FONT_SIZE + 1;
        assert!(spec.validate().unwrap_err().is_validation());

        spec.font_size = 40;
        spec.text = " \n ".to_string();
        assert!(spec.validate().unwrap_err().is_validation());
    }

    #[test]
    fn test_logo_spec_validation() {
        let logo = DynamicImage::ImageRgba8(RgbaImage::new(10, 10));
        let mut spec = LogoWatermarkSpec {
            logo,
            scale_factor: 0.15,
            corner: Corner::BottomRight,
            padding: 10,
        };
        assert!(spec.validate().is_ok());

        spec.scale_factor = 1.0;
        assert!(spec.validate().is_ok());

        for bad in [0.0, -0.5, 1.01, f32::NAN] {
            spec.scale_factor = bad;
            assert!(spec.validate().unwrap_err().is_validation());
        }
    }
}
