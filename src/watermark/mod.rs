mod blend;
mod error;
pub mod logo;
pub mod placement;
mod suggest;
pub mod text;
mod types;

pub use error::WatermarkError;
pub use logo::{apply_logo_watermark, load_logo};
pub use suggest::{suggest_font_size, suggest_padding};
pub use text::apply_text_watermark;
pub use types::{
    Corner, HexColor, LogoWatermarkSpec, MAX_FONT_SIZE, MAX_OUTLINE_WIDTH, TextWatermarkSpec,
};
