//! CSS parsing, cascade, layout and painting for the Wombat document engine.
//!
//! # Scope
//!
//! This crate implements everything between a parsed DOM and a list of draw
//! commands:
//! - **CSS Parser** - rules and declaration lists, with error recovery that
//!   skips a malformed declaration or rule and carries on
//!
//! - **Selectors** - tag, class and descendant selectors with a simple
//!   additive priority
//!
//! - **Cascade** - inheritance of font and colour properties, priority
//!   ordered rules, `style` attributes and percentage font sizes
//!
//! - **Layout** - document, block, line and text boxes with word wrapping,
//!   soft hyphens and baseline alignment
//!
//! - **Paint** - a flat display list of text, rectangles and lines
//!
//! # Not Implemented
//!
//! - Selectors beyond tag/class/descendant, at-rules, `!important`
//! - The box model (margins, borders, padding), floats, positioning, flexbox
//! - Bidirectional text

/// Style computation.
pub mod cascade;
/// Font selection and text measurement.
pub mod font;
/// Box layout.
pub mod layout;
/// Display list generation.
pub mod paint;
/// Style sheet parsing.
pub mod parser;
/// Selectors and matching.
pub mod selector;
/// Computed value helpers.
pub mod style;
/// Built-in default rules.
pub mod ua_stylesheet;

pub use cascade::{compute_styles, sort_rules};
pub use font::{ApproximateFontMetrics, FontCache, FontKey, FontMetrics, LineMetrics};
pub use layout::{BoxId, BoxKind, LayoutBox, LayoutTree, Rect, Viewport};
pub use paint::{DisplayCommand, DisplayList, PaintOptions, Painter};
pub use parser::{CSSParser, Declarations, ParseError, Rule};
pub use selector::Selector;

use std::fmt::Display;

use wombat_common::warning::warn_once;
use wombat_dom::{DomTree, ElementData, NodeId, NodeType};

/// Where an author style sheet comes from, in document order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StylesheetSource {
    /// `<link rel="stylesheet" href="...">`.
    External {
        /// The `href` as written, not yet resolved.
        href: String,
    },
    /// The text of a `<style>` element.
    Inline {
        /// The style sheet text.
        css: String,
    },
}

/// Find every author style sheet in document order.
#[must_use]
pub fn collect_stylesheet_sources(tree: &DomTree) -> Vec<StylesheetSource> {
    let mut sources = Vec::new();
    if !tree.is_empty() {
        collect_sources_recursive(tree, tree.root(), &mut sources);
    }
    sources
}

fn collect_sources_recursive(tree: &DomTree, id: NodeId, sources: &mut Vec<StylesheetSource>) {
    let Some(node) = tree.get(id) else { return };

    if let NodeType::Element(data) = &node.node_type {
        if data.tag_name == "link" {
            if is_stylesheet_link(data)
                && let Some(href) = data.attrs.get("href")
                && !href.trim().is_empty()
            {
                sources.push(StylesheetSource::External { href: href.clone() });
            }
        } else if data.tag_name == "style" {
            sources.push(StylesheetSource::Inline {
                css: tree.text_content(id),
            });
        }
    }

    for &child in tree.children(id) {
        collect_sources_recursive(tree, child, sources);
    }
}

/// Whether a `link` element's `rel` contains the `stylesheet` token.
#[must_use]
pub fn is_stylesheet_link(data: &ElementData) -> bool {
    let Some(rel) = data.attrs.get("rel") else {
        return false;
    };
    rel.split_ascii_whitespace()
        .any(|token| token.eq_ignore_ascii_case("stylesheet"))
}

/// The `href` of every linked style sheet, in document order.
#[must_use]
pub fn stylesheet_links(tree: &DomTree) -> Vec<String> {
    collect_stylesheet_sources(tree)
        .into_iter()
        .filter_map(|source| match source {
            StylesheetSource::External { href } => Some(href),
            StylesheetSource::Inline { .. } => None,
        })
        .collect()
}

/// Gather the rules that apply to a document: the user-agent rules, then
/// every author sheet in document order.
///
/// `fetch` is given each linked sheet's `href` as written. A sheet it cannot
/// produce is reported and contributes no rules.
pub fn collect_rules<E, F>(tree: &DomTree, mut fetch: F) -> Vec<Rule>
where
    E: Display,
    F: FnMut(&str) -> Result<String, E>,
{
    let mut rules = ua_stylesheet::default_rules().to_vec();
    for source in collect_stylesheet_sources(tree) {
        match source {
            StylesheetSource::External { href } => match fetch(&href) {
                Ok(css) => rules.extend(CSSParser::new(&css).parse()),
                Err(err) => {
                    warn_once("CSS", &format!("skipping stylesheet '{href}': {err}"));
                }
            },
            StylesheetSource::Inline { css } => rules.extend(CSSParser::new(&css).parse()),
        }
    }
    rules
}
