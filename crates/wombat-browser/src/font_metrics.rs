//! System fonts and font metrics backed by fontdue.
//!
//! One face is loaded per weight/slant combination from well-known system
//! locations. Families are not matched; every family is drawn with the same
//! sans-serif faces.

use fontdue::{Font, FontSettings};
use wombat_common::warning::warn_once;
use wombat_css::font::{FontSlant, FontWeight};
use wombat_css::{ApproximateFontMetrics, FontKey, FontMetrics, LineMetrics};

/// Common system font paths to search for the regular face.
const FONT_SEARCH_PATHS: &[&str] = &[
    // macOS
    "/System/Library/Fonts/Helvetica.ttc",
    "/Library/Fonts/Arial.ttf",
    "/System/Library/Fonts/Supplemental/Arial.ttf",
    // Linux
    "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/TTF/DejaVuSans.ttf",
    "/usr/share/fonts/truetype/liberation/LiberationSans-Regular.ttf",
    // Windows
    "C:\\Windows\\Fonts\\arial.ttf",
];

/// System font paths for bold faces.
const FONT_BOLD_SEARCH_PATHS: &[&str] = &[
    "/System/Library/Fonts/Supplemental/Arial Bold.ttf",
    "/usr/share/fonts/truetype/dejavu/DejaVuSans-Bold.ttf",
    "/usr/share/fonts/TTF/DejaVuSans-Bold.ttf",
    "/usr/share/fonts/truetype/liberation/LiberationSans-Bold.ttf",
    "C:\\Windows\\Fonts\\arialbd.ttf",
];

/// System font paths for italic faces.
const FONT_ITALIC_SEARCH_PATHS: &[&str] = &[
    "/System/Library/Fonts/Supplemental/Arial Italic.ttf",
    "/usr/share/fonts/truetype/dejavu/DejaVuSans-Oblique.ttf",
    "/usr/share/fonts/TTF/DejaVuSans-Oblique.ttf",
    "/usr/share/fonts/truetype/liberation/LiberationSans-Italic.ttf",
    "C:\\Windows\\Fonts\\ariali.ttf",
];

/// System font paths for bold-italic faces.
const FONT_BOLD_ITALIC_SEARCH_PATHS: &[&str] = &[
    "/System/Library/Fonts/Supplemental/Arial Bold Italic.ttf",
    "/usr/share/fonts/truetype/dejavu/DejaVuSans-BoldOblique.ttf",
    "/usr/share/fonts/TTF/DejaVuSans-BoldOblique.ttf",
    "/usr/share/fonts/truetype/liberation/LiberationSans-BoldItalic.ttf",
    "C:\\Windows\\Fonts\\arialbi.ttf",
];

/// The faces used for measuring and drawing text.
#[derive(Clone)]
pub struct SystemFonts {
    regular: Font,
    bold: Option<Font>,
    italic: Option<Font>,
    bold_italic: Option<Font>,
}

impl SystemFonts {
    /// Load the system faces. `None` if not even a regular face is found.
    #[must_use]
    pub fn load() -> Option<Self> {
        let Some(regular) = load_font_from_paths(FONT_SEARCH_PATHS) else {
            warn_once(
                "Fonts",
                &format!(
                    "no system font found (searched {} paths), text will not be drawn",
                    FONT_SEARCH_PATHS.len()
                ),
            );
            return None;
        };
        Some(Self {
            regular,
            bold: load_font_from_paths(FONT_BOLD_SEARCH_PATHS),
            italic: load_font_from_paths(FONT_ITALIC_SEARCH_PATHS),
            bold_italic: load_font_from_paths(FONT_BOLD_ITALIC_SEARCH_PATHS),
        })
    }

    /// The best available face for a font, falling back through the partial
    /// matches to the regular face.
    #[must_use]
    pub fn face(&self, font: &FontKey) -> &Font {
        let face = match (font.weight, font.slant) {
            (FontWeight::Bold, FontSlant::Italic) => self
                .bold_italic
                .as_ref()
                .or(self.bold.as_ref())
                .or(self.italic.as_ref()),
            (FontWeight::Bold, FontSlant::Roman) => self.bold.as_ref(),
            (FontWeight::Normal, FontSlant::Italic) => self.italic.as_ref(),
            (FontWeight::Normal, FontSlant::Roman) => None,
        };
        face.unwrap_or(&self.regular)
    }
}

fn load_font_from_paths(paths: &[&str]) -> Option<Font> {
    paths.iter().find_map(|path| {
        let data = std::fs::read(path).ok()?;
        Font::from_bytes(data, FontSettings::default()).ok()
    })
}

/// [`FontMetrics`] from real glyph advances and the face's line metrics.
pub struct FontdueFontMetrics<'a> {
    fonts: &'a SystemFonts,
}

impl<'a> FontdueFontMetrics<'a> {
    /// Measure with the given faces.
    #[must_use]
    pub const fn new(fonts: &'a SystemFonts) -> Self {
        Self { fonts }
    }
}

impl FontMetrics for FontdueFontMetrics<'_> {
    fn measure(&self, font: &FontKey, text: &str) -> f32 {
        let face = self.fonts.face(font);
        let px = font.pixel_size();
        text.chars()
            .filter(|ch| !ch.is_control())
            .map(|ch| face.metrics(ch, px).advance_width)
            .sum()
    }

    fn metrics(&self, font: &FontKey) -> LineMetrics {
        let px = font.pixel_size();
        self.fonts
            .face(font)
            .horizontal_line_metrics(px)
            .map_or_else(
                || ApproximateFontMetrics.metrics(font),
                |line| LineMetrics {
                    ascent: line.ascent,
                    descent: -line.descent,
                    linespace: line.new_line_size,
                },
            )
    }
}

/// Metrics from the system faces when there are any, approximate metrics
/// otherwise.
#[must_use]
pub fn load_font_metrics(fonts: Option<&SystemFonts>) -> Box<dyn FontMetrics + '_> {
    match fonts {
        Some(fonts) => Box::new(FontdueFontMetrics::new(fonts)),
        None => Box::new(ApproximateFontMetrics),
    }
}
