//! Computed value helpers.
//!
//! Computed styles are plain strings (see [`wombat_dom::ComputedStyle`]);
//! these helpers hold the inherited defaults and turn `px` lengths into
//! numbers and back.

/// Default font size when nothing else applies.
pub const DEFAULT_FONT_SIZE_PX: f64 = 16.0;

/// Inherited properties and the values the root starts from.
///
/// Every styled node carries all of these after the cascade.
pub const INHERITED_PROPERTIES: &[(&str, &str)] = &[
    ("font-size", "16px"),
    ("font-style", "normal"),
    ("font-weight", "normal"),
    ("color", "black"),
    ("font-family", "Times"),
];

/// Parse a `px` length such as `12px` or `-3.5px`.
#[must_use]
pub fn parse_px(value: &str) -> Option<f64> {
    value
        .trim()
        .strip_suffix("px")
        .and_then(|number| number.trim().parse::<f64>().ok())
        .filter(|px| px.is_finite())
}

/// Parse a percentage such as `90%`.
#[must_use]
pub fn parse_percentage(value: &str) -> Option<f64> {
    value
        .trim()
        .strip_suffix('%')
        .and_then(|number| number.trim().parse::<f64>().ok())
        .filter(|pct| pct.is_finite())
}

/// Format a pixel length the way computed styles store it (`14.4px`,
/// `16px`).
#[must_use]
pub fn format_px(px: f64) -> String {
    format!("{px}px")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_px() {
        assert_eq!(parse_px("12px"), Some(12.0));
        assert_eq!(parse_px("-3.5px"), Some(-3.5));
        assert_eq!(parse_px("12"), None);
        assert_eq!(parse_px("auto"), None);
    }

    #[test]
    fn test_parse_percentage() {
        assert_eq!(parse_percentage("90%"), Some(90.0));
        assert_eq!(parse_percentage("abc%"), None);
    }

    #[test]
    fn test_format_px_drops_trailing_zero() {
        assert_eq!(format_px(10.0), "10px");
        assert_eq!(format_px(0.9 * 16.0), "14.4px");
    }
}
