//! User-agent style sheet.
//!
//! Applied before every author sheet. Because rules are ordered by
//! priority afterwards, an author rule of the same priority still wins.

use std::sync::OnceLock;

use crate::parser::{CSSParser, Rule};

/// Built-in rules for the few elements that look different by default.
pub const DEFAULT_STYLE_SHEET: &str = "
a { color: blue; }
i { font-style: italic; }
b { font-weight: bold; }
small { font-size: 90%; }
big { font-size: 110%; }
";

/// The parsed user-agent rules, parsed once per process.
#[must_use]
pub fn default_rules() -> &'static [Rule] {
    static RULES: OnceLock<Vec<Rule>> = OnceLock::new();
    RULES.get_or_init(|| CSSParser::new(DEFAULT_STYLE_SHEET).parse())
}
