//! CSS parser module.

/// Style sheet and declaration list parser.
pub mod css_parser;

pub use css_parser::{CSSParser, Declarations, ParseError, Rule, expand_font_shorthand};
