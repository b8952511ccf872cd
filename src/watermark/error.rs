use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum WatermarkError {
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("Unknown corner: {0}")]
    UnknownCorner(String),

    #[error("Malformed color: {0}")]
    MalformedColor(String),

    #[error(
        "Watermark of {width}x{height} with padding {padding} does not fit in a {image_width}x{image_height} image"
    )]
    DoesNotFit {
        width: u32,
        height: u32,
        padding: u32,
        image_width: u32,
        image_height: u32,
    },

    #[error("Failed to load {path:?}: {source}")]
    Load {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("Unsupported image format: {0}")]
    UnsupportedFormat(String),

    #[error("Image error: {0}")]
    ImageError(#[from] image::ImageError),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

impl WatermarkError {
    /// True for errors raised by parameter checks before any drawing.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            WatermarkError::InvalidParameter(_)
                | WatermarkError::UnknownCorner(_)
                | WatermarkError::MalformedColor(_)
                | WatermarkError::DoesNotFit { .. }
        )
    }
}
