use ab_glyph::FontArc;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// DejaVu Sans, used when no requested or fallback font can be loaded.
static EMBEDDED_FONT: &[u8] = include_bytes!("../static/DejaVuSans.ttf");

const TIMES_CANDIDATES: &[&str] = &[
    "C:/Windows/Fonts/times.ttf",
    "C:/Windows/Fonts/Times.ttf",
    "C:/Windows/Fonts/timesnewroman.ttf",
    "/usr/share/fonts/truetype/liberation/LiberationSerif-Regular.ttf",
    "/usr/share/fonts/liberation/LiberationSerif-Regular.ttf",
    "/usr/share/fonts/truetype/times/Times-Roman.ttf",
    "/Library/Fonts/Times New Roman.ttf",
    "/System/Library/Fonts/Supplemental/Times New Roman.ttf",
];

const INTER_CANDIDATES: &[&str] = &[
    "C:/Windows/Fonts/Inter-Regular.ttf",
    "/usr/share/fonts/truetype/inter/Inter-Regular.ttf",
    "/usr/share/fonts/Inter-Regular.ttf",
    "/Library/Fonts/Inter-Regular.ttf",
    "fonts/Inter-Regular.ttf",
    "Inter-Regular.ttf",
];

const DEJAVU_CANDIDATES: &[&str] = &[
    "static/DejaVuSans.ttf",
    "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/dejavu/DejaVuSans.ttf",
];

const FALLBACK_CANDIDATES: &[&str] = &[
    "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/truetype/liberation/LiberationSans-Regular.ttf",
    "C:/Windows/Fonts/arial.ttf",
    "/Library/Fonts/Arial.ttf",
    "/System/Library/Fonts/Supplemental/Arial.ttf",
];

/// The font bundled into the binary.
pub fn default_font() -> FontArc {
    // The bytes are compiled in, so parsing them cannot fail at runtime
    FontArc::try_from_slice(EMBEDDED_FONT).expect("embedded DejaVu Sans is a valid font")
}

/// Candidate files for a font family name, most preferred first.
pub fn family_candidates(name: &str) -> Vec<PathBuf> {
    let known: &[&str] = match name.trim().to_lowercase().as_str() {
        "times new roman" | "times" => TIMES_CANDIDATES,
        "inter" => INTER_CANDIDATES,
        "dejavu sans" | "dejavu" => DEJAVU_CANDIDATES,
        _ => &[],
    };
    known.iter().map(PathBuf::from).collect()
}

/// Read and parse a font file, `None` if either step fails.
pub fn load_font_file(path: &Path) -> Option<FontArc> {
    let data = match std::fs::read(path) {
        Ok(data) => data,
        Err(e) => {
            debug!("Cannot read font {:?}: {}", path, e);
            return None;
        }
    };

    match FontArc::try_from_vec(data) {
        Ok(font) => Some(font),
        Err(e) => {
            debug!("Cannot parse font {:?}: {}", path, e);
            None
        }
    }
}

/// First candidate that loads.
pub fn load_first_font(candidates: &[PathBuf]) -> Option<(FontArc, PathBuf)> {
    candidates
        .iter()
        .filter(|path| path.exists())
        .find_map(|path| load_font_file(path).map(|font| (font, path.clone())))
}

/// Resolve a font by file path or family name.
///
/// Never fails: when neither the request nor the generic fallbacks load,
/// the embedded DejaVu Sans is returned.
pub fn load_font(name: &str) -> FontArc {
    let as_path = Path::new(name);
    if as_path.is_file() {
        if let Some(font) = load_font_file(as_path) {
            info!("Loaded font from {:?}", as_path);
            return font;
        }
        warn!("Font file {:?} could not be parsed", as_path);
    }

    if let Some((font, path)) = load_first_font(&family_candidates(name)) {
        info!("Loaded {} font from {:?}", name, path);
        return font;
    }

    warn!("{} font not found, trying fallback fonts", name);
    let fallbacks: Vec<PathBuf> = FALLBACK_CANDIDATES.iter().map(PathBuf::from).collect();
    if let Some((font, path)) = load_first_font(&fallbacks) {
        info!("Using fallback font {:?}", path);
        return font;
    }

    warn!("No fallback font found, using embedded DejaVu Sans");
    default_font()
}

#[cfg(test)]
mod tests {
    use super::*;
    use ab_glyph::Font;
    use tempfile::TempDir;

    #[test]
    fn test_default_font_has_latin_glyphs() {
        let font = default_font();
        assert_ne!(font.glyph_id('A').0, 0);
        assert_ne!(font.glyph_id('z').0, 0);
    }

    #[test]
    fn test_family_candidates() {
        assert!(!family_candidates("Times New Roman").is_empty());
        assert_eq!(family_candidates("times"), family_candidates("TIMES NEW ROMAN"));
        assert!(!family_candidates("inter").is_empty());
        assert!(family_candidates("Comic Sans").is_empty());
    }

    #[test]
    fn test_corrupt_font_file_falls_back() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("broken.ttf");
        std::fs::write(&path, b"not a font").unwrap();

        assert!(load_font_file(&path).is_none());

        // Still yields something usable
        let font = load_font(path.to_str().unwrap());
        assert_ne!(font.glyph_id('W').0, 0);
    }

    #[test]
    fn test_load_font_from_explicit_path() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("copy.ttf");
        std::fs::write(&path, EMBEDDED_FONT).unwrap();

        assert!(load_font_file(&path).is_some());
        let (_, picked) =
            load_first_font(&[temp_dir.path().join("missing.ttf"), path.clone()]).unwrap();
        assert_eq!(picked, path);
    }

    #[test]
    fn test_unknown_family_still_loads() {
        let font = load_font("No Such Family");
        assert_ne!(font.glyph_id('a').0, 0);
    }
}
