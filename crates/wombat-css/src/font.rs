//! Font selection and measurement.
//!
//! Layout never touches font files. It asks a [`FontMetrics`] implementation
//! for advance widths and vertical metrics, keyed by [`FontKey`]. The
//! browser crate supplies a real implementation; [`ApproximateFontMetrics`]
//! is the fallback and the test double.

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};
use wombat_common::warning::warn_once;
use wombat_dom::ComputedStyle;

use crate::style::{DEFAULT_FONT_SIZE_PX, parse_px};

/// Points per CSS pixel.
pub const POINTS_PER_PX: f64 = 0.75;

/// Font weight as far as font selection is concerned.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum FontWeight {
    /// Regular weight.
    #[default]
    Normal,
    /// Bold weight.
    Bold,
}

impl FontWeight {
    /// Map a computed `font-weight` value. `bold`, `bolder` and `600`-`900`
    /// select the bold face; everything else is normal.
    #[must_use]
    pub fn from_css(value: &str) -> Self {
        if let Ok(weight) = value.parse::<Self>() {
            return weight;
        }
        match value {
            "bolder" => Self::Bold,
            numeric => match numeric.parse::<u16>() {
                Ok(n) if n >= 600 => Self::Bold,
                _ => Self::Normal,
            },
        }
    }
}

/// Font slant.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum FontSlant {
    /// Upright.
    #[default]
    Roman,
    /// Italic (also used for `oblique`).
    Italic,
}

impl FontSlant {
    /// Map a computed `font-style` value; `normal` means roman.
    #[must_use]
    pub fn from_css(value: &str) -> Self {
        match value {
            "italic" | "oblique" => Self::Italic,
            _ => Self::Roman,
        }
    }
}

/// Identifies one concrete font: size in points, weight, slant and family.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FontKey {
    /// Size in points, `floor(px * 0.75)`.
    pub size: i32,
    /// Weight.
    pub weight: FontWeight,
    /// Slant.
    pub slant: FontSlant,
    /// Family name as written in the style.
    pub family: String,
}

impl FontKey {
    /// Select the font for a node from its computed style.
    ///
    /// A `font-size` that is not a `px` length is reported and treated as
    /// 16px.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn from_style(style: &ComputedStyle) -> Self {
        let font_size = style.get_or("font-size", "16px");
        let px = parse_px(font_size).unwrap_or_else(|| {
            warn_once(
                "Font",
                &format!("font-size '{font_size}' is not a px length, using 16px"),
            );
            DEFAULT_FONT_SIZE_PX
        });
        Self {
            size: (px * POINTS_PER_PX).floor() as i32,
            weight: FontWeight::from_css(style.get_or("font-weight", "normal")),
            slant: FontSlant::from_css(style.get_or("font-style", "normal")),
            family: style.get_or("font-family", "Times").to_string(),
        }
    }

    /// Size in CSS pixels.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn pixel_size(&self) -> f32 {
        (f64::from(self.size) / POINTS_PER_PX) as f32
    }
}

impl fmt::Display for FontKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}pt {} {}", self.family, self.size, self.weight, self.slant)
    }
}

/// Vertical metrics of a font, in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LineMetrics {
    /// Height above the baseline.
    pub ascent: f32,
    /// Depth below the baseline.
    pub descent: f32,
    /// Recommended distance between baselines.
    pub linespace: f32,
}

/// Source of text measurements.
pub trait FontMetrics {
    /// Advance width of `text` set in `font`, in pixels.
    fn measure(&self, font: &FontKey, text: &str) -> f32;

    /// Vertical metrics of `font`.
    fn metrics(&self, font: &FontKey) -> LineMetrics;
}

/// Approximate font metrics using fixed ratios of the pixel size.
///
/// Every character advances 0.6 em; ascent is 0.8 em, descent 0.2 em and
/// the line spacing 1.2 em.
///
/// This is used as a fallback when no font is available, and in tests.
#[derive(Debug, Clone, Copy, Default)]
pub struct ApproximateFontMetrics;

impl FontMetrics for ApproximateFontMetrics {
    fn measure(&self, font: &FontKey, text: &str) -> f32 {
        const CHAR_WIDTH_RATIO: f32 = 0.6;
        text.chars().count() as f32 * font.pixel_size() * CHAR_WIDTH_RATIO
    }

    fn metrics(&self, font: &FontKey) -> LineMetrics {
        const ASCENT_RATIO: f32 = 0.8;
        const DESCENT_RATIO: f32 = 0.2;
        const LINE_HEIGHT_RATIO: f32 = 1.2;
        let px = font.pixel_size();
        LineMetrics {
            ascent: px * ASCENT_RATIO,
            descent: px * DESCENT_RATIO,
            linespace: px * LINE_HEIGHT_RATIO,
        }
    }
}

/// Session-wide memo of per-font metrics.
///
/// Entries are only ever added. Widths of arbitrary words are not cached;
/// vertical metrics and the width of a space are, since layout asks for
/// them for every word.
pub struct FontCache<'a> {
    source: &'a dyn FontMetrics,
    lines: HashMap<FontKey, LineMetrics>,
    spaces: HashMap<FontKey, f32>,
}

impl<'a> FontCache<'a> {
    /// Create an empty cache over a metrics source.
    #[must_use]
    pub fn new(source: &'a dyn FontMetrics) -> Self {
        Self {
            source,
            lines: HashMap::new(),
            spaces: HashMap::new(),
        }
    }

    /// Advance width of `text` in `font`.
    #[must_use]
    pub fn measure(&self, font: &FontKey, text: &str) -> f32 {
        self.source.measure(font, text)
    }

    /// Vertical metrics of `font`.
    pub fn metrics(&mut self, font: &FontKey) -> LineMetrics {
        if let Some(&metrics) = self.lines.get(font) {
            return metrics;
        }
        let metrics = self.source.metrics(font);
        let _ = self.lines.insert(font.clone(), metrics);
        metrics
    }

    /// Width of a single space in `font`.
    pub fn space_width(&mut self, font: &FontKey) -> f32 {
        if let Some(&width) = self.spaces.get(font) {
            return width;
        }
        let width = self.source.measure(font, " ");
        let _ = self.spaces.insert(font.clone(), width);
        width
    }

    /// Number of distinct fonts seen so far.
    #[must_use]
    pub fn len(&self) -> usize {
        self.lines.len().max(self.spaces.len())
    }

    /// Whether no font has been used yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn style(pairs: &[(&str, &str)]) -> ComputedStyle {
        let mut style = ComputedStyle::new();
        for (property, value) in pairs {
            style.set(property, value);
        }
        style
    }

    #[test]
    fn test_font_key_from_style() {
        let key = FontKey::from_style(&style(&[
            ("font-size", "14.4px"),
            ("font-weight", "bold"),
            ("font-style", "italic"),
            ("font-family", "Helvetica"),
        ]));
        assert_eq!(key.size, 10);
        assert_eq!(key.weight, FontWeight::Bold);
        assert_eq!(key.slant, FontSlant::Italic);
        assert_eq!(key.family, "Helvetica");
    }

    #[test]
    fn test_font_key_non_px_size_falls_back() {
        let key = FontKey::from_style(&style(&[("font-size", "large")]));
        assert_eq!(key.size, 12);
        assert_eq!(key.slant, FontSlant::Roman);
    }

    #[test]
    fn test_numeric_weights() {
        assert_eq!(FontWeight::from_css("700"), FontWeight::Bold);
        assert_eq!(FontWeight::from_css("400"), FontWeight::Normal);
        assert_eq!(FontWeight::from_css("bolder"), FontWeight::Bold);
    }

    #[test]
    fn test_cache_is_append_only() {
        let mut cache = FontCache::new(&ApproximateFontMetrics);
        let key = FontKey::from_style(&ComputedStyle::new());
        let first = cache.metrics(&key);
        let _ = cache.space_width(&key);
        assert_eq!(cache.metrics(&key), first);
        assert_eq!(cache.len(), 1);
    }
}
