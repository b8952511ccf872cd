use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_subscriber::EnvFilter;

pub mod codec;
pub mod font;
pub mod job;
pub mod watermark;

use watermark::{Corner, HexColor, LogoWatermarkSpec, TextWatermarkSpec, WatermarkError};

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub text: TextSettings,
    #[serde(default)]
    pub logo: LogoSettings,
    #[serde(default)]
    pub output: OutputSettings,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TextSettings {
    /// Family name ("Times New Roman", "Inter") or path to a font file
    pub font: String,
    pub font_size: u32,
    /// Derive font size and padding from the image width instead
    pub auto_size: bool,
    pub color: HexColor,
    pub outline_color: HexColor,
    pub outline_width: u32,
    pub padding: u32,
    pub corner: Corner,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LogoSettings {
    pub path: Option<PathBuf>,
    pub scale_factor: f32,
    pub padding: u32,
    pub corner: Corner,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct OutputSettings {
    pub jpeg_quality: u8,
}

impl Default for TextSettings {
    fn default() -> Self {
        Self {
            font: "Times New Roman".to_string(),
            font_size: 40,
            auto_size: false,
            color: HexColor::WHITE,
            outline_color: HexColor::BLACK,
            outline_width: 2,
            padding: 20,
            corner: Corner::BottomLeft,
        }
    }
}

impl Default for LogoSettings {
    fn default() -> Self {
        Self {
            path: None,
            scale_factor: 0.15,
            padding: 10,
            corner: Corner::BottomRight,
        }
    }
}

impl Default for OutputSettings {
    fn default() -> Self {
        Self {
            jpeg_quality: codec::DEFAULT_JPEG_QUALITY,
        }
    }
}

impl Config {
    /// Read a TOML config, or fall back to defaults when the file is absent.
    pub fn load(path: &Path) -> Result<Self, Box<dyn std::error::Error>> {
        if !path.exists() {
            info!("Config file not found at {:?}, using defaults", path);
            return Ok(Config::default());
        }

        let content = std::fs::read_to_string(path)?;
        let config = toml_edit::de::from_str::<Config>(&content)?;
        info!("Configuration loaded from: {:?}", path);
        Ok(config)
    }
}

/// Log filter for a `--log-level` value. Unknown levels fall back to info.
pub fn log_filter(log_level: &str) -> EnvFilter {
    let level = match log_level.to_lowercase().as_str() {
        level @ ("trace" | "debug" | "info" | "warn" | "error") => level.to_string(),
        _ => "info".to_string(),
    };
    EnvFilter::new(level)
}

impl TextSettings {
    pub fn to_spec(&self, text: String, font: ab_glyph::FontArc) -> TextWatermarkSpec {
        TextWatermarkSpec {
            text,
            font_size: self.font_size,
            fill: self.color.rgb(),
            outline: self.outline_color.rgb(),
            outline_width: self.outline_width,
            corner: self.corner,
            padding: self.padding,
            font,
        }
    }
}

impl LogoSettings {
    /// Load the configured logo, `None` when no logo is configured.
    pub fn to_spec(&self) -> Result<Option<LogoWatermarkSpec>, WatermarkError> {
        let Some(path) = &self.path else {
            return Ok(None);
        };

        Ok(Some(LogoWatermarkSpec {
            logo: watermark::load_logo(path)?,
            scale_factor: self.scale_factor,
            corner: self.corner,
            padding: self.padding,
        }))
    }
}
