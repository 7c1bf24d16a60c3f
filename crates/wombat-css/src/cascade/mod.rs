//! Cascading and style computation.
//!
//! Styles are computed top-down in document order. Each node starts from
//! its parent's inherited properties, then matching rules are applied from
//! lowest to highest priority, then the node's own `style` attribute, and
//! finally a percentage `font-size` is resolved against the parent.

use wombat_common::warning::warn_once;
use wombat_dom::{ComputedStyle, DomTree, NodeId};

use crate::parser::{CSSParser, Rule};
use crate::style::{
    DEFAULT_FONT_SIZE_PX, INHERITED_PROPERTIES, format_px, parse_percentage, parse_px,
};

/// Stably sort rules by ascending selector priority.
///
/// Rules with equal priority keep their source order, so a later rule
/// overrides an earlier one of the same priority.
pub fn sort_rules(rules: &mut [Rule]) {
    rules.sort_by_key(|rule| rule.selector.priority());
}

/// Compute the style of every attached node, text nodes included.
///
/// `rules` may be in any order; they are applied in [`sort_rules`] order.
pub fn compute_styles(tree: &mut DomTree, rules: &[Rule]) {
    if tree.is_empty() {
        return;
    }

    let mut ordered: Vec<&Rule> = rules.iter().collect();
    ordered.sort_by_key(|rule| rule.selector.priority());

    // Pre-order, so a parent's style is final before its children read it.
    let mut stack = vec![tree.root()];
    while let Some(id) = stack.pop() {
        let style = compute_node_style(tree, &ordered, id);
        *tree.style_mut(id) = style;
        stack.extend(tree.children(id).iter().rev().copied());
    }
}

fn compute_node_style(tree: &DomTree, rules: &[&Rule], id: NodeId) -> ComputedStyle {
    let parent_style = tree.parent(id).map(|parent| tree.style(parent));
    let mut style = ComputedStyle::new();

    // STEP 1: Inherit.
    for &(property, default) in INHERITED_PROPERTIES {
        let value = parent_style
            .and_then(|parent| parent.get(property))
            .unwrap_or(default);
        style.set(property, value);
    }

    // STEP 2: Matching rules, lowest priority first.
    for rule in rules.iter().filter(|rule| rule.selector.matches(tree, id)) {
        for (property, value) in rule.declarations.iter() {
            style.set(property, value);
        }
    }

    // STEP 3: The style attribute beats every rule.
    if let Some(inline) = tree.as_element(id).and_then(|e| e.attrs.get("style")) {
        for (property, value) in CSSParser::new(inline).parse_declarations().iter() {
            style.set(property, value);
        }
    }

    // STEP 4: Percentage font sizes become pixels.
    resolve_font_size(&mut style, parent_style);
    style
}

fn resolve_font_size(style: &mut ComputedStyle, parent_style: Option<&ComputedStyle>) {
    let Some(value) = style.get("font-size") else {
        return;
    };
    if !value.trim_end().ends_with('%') {
        return;
    }

    let parent_value = parent_style.and_then(|parent| parent.get("font-size"));
    let parent_px = match parent_value {
        None => DEFAULT_FONT_SIZE_PX,
        Some(parent_value) => parse_px(parent_value).unwrap_or_else(|| {
            warn_once(
                "CSS",
                &format!("parent font-size '{parent_value}' is not a px length, using 16px"),
            );
            DEFAULT_FONT_SIZE_PX
        }),
    };

    let resolved = if let Some(pct) = parse_percentage(value) {
        pct / 100.0 * parent_px
    } else {
        warn_once(
            "CSS",
            &format!("invalid font-size '{value}', using the parent size"),
        );
        parent_px
    };
    style.set("font-size", &format_px(resolved));
}
