//! Cascade: rule priority, inheritance, `style` attributes, percentage font
//! sizes and the user-agent sheet.

use wombat_css::{CSSParser, collect_rules, compute_styles};
use wombat_dom::{DomTree, NodeId};
use wombat_html::parse;

/// Helper to parse a document and compute its styles with `css` as the only
/// author sheet (after the user-agent rules).
fn styled(html: &str, css: &str) -> DomTree {
    let mut tree = parse(html);
    let mut rules = collect_rules(&tree, |href: &str| Err::<String, _>(format!("no network for {href}")));
    rules.extend(CSSParser::new(css).parse());
    compute_styles(&mut tree, &rules);
    tree
}

fn first_element(tree: &DomTree, tag: &str) -> NodeId {
    tree.iter_all()
        .find(|&id| tree.is_element(id, tag))
        .unwrap_or_else(|| panic!("no <{tag}> in document"))
}

fn first_text(tree: &DomTree, text: &str) -> NodeId {
    tree.iter_all()
        .find(|&id| tree.as_text(id) == Some(text))
        .unwrap_or_else(|| panic!("no text node {text:?}"))
}

fn style_of<'a>(tree: &'a DomTree, id: NodeId, property: &str) -> Option<&'a str> {
    tree.style(id).get(property)
}

#[test]
fn test_root_gets_inherited_defaults() {
    let tree = styled("<p>x</p>", "");
    let root = tree.root();
    assert_eq!(style_of(&tree, root, "font-size"), Some("16px"));
    assert_eq!(style_of(&tree, root, "font-style"), Some("normal"));
    assert_eq!(style_of(&tree, root, "font-weight"), Some("normal"));
    assert_eq!(style_of(&tree, root, "color"), Some("black"));
    assert_eq!(style_of(&tree, root, "font-family"), Some("Times"));
}

#[test]
fn test_class_beats_tag_regardless_of_order() {
    let tree = styled(r#"<p class="c">x</p>"#, ".c { color: red } p { color: green }");
    let p = first_element(&tree, "p");
    assert_eq!(style_of(&tree, p, "color"), Some("red"));
}

#[test]
fn test_equal_priority_later_rule_wins() {
    let tree = styled("<p>x</p>", "p { color: red } p { color: green }");
    let p = first_element(&tree, "p");
    assert_eq!(style_of(&tree, p, "color"), Some("green"));
}

#[test]
fn test_descendant_beats_plain_tag() {
    let tree = styled(
        "<div><p>in</p></div><p>out</p>",
        "div p { color: red } p { color: green }",
    );
    let inner = first_text(&tree, "in");
    let outer = first_text(&tree, "out");
    assert_eq!(style_of(&tree, inner, "color"), Some("red"));
    assert_eq!(style_of(&tree, outer, "color"), Some("green"));
}

#[test]
fn test_inheritance_reaches_text_nodes() {
    let tree = styled(
        r#"<div style="color: red; font-family: Courier"><p>x</p></div>"#,
        "",
    );
    let text = first_text(&tree, "x");
    assert_eq!(style_of(&tree, text, "color"), Some("red"));
    assert_eq!(style_of(&tree, text, "font-family"), Some("Courier"));
}

#[test]
fn test_non_inherited_properties_stay_put() {
    let tree = styled("<p>x</p>", "p { background-color: red }");
    let p = first_element(&tree, "p");
    let text = first_text(&tree, "x");
    assert_eq!(style_of(&tree, p, "background-color"), Some("red"));
    assert_eq!(style_of(&tree, text, "background-color"), None);
}

#[test]
fn test_style_attribute_beats_rules() {
    let tree = styled(
        r#"<p class="c" style="color: blue">x</p>"#,
        "p { color: red } .c { color: green }",
    );
    let p = first_element(&tree, "p");
    assert_eq!(style_of(&tree, p, "color"), Some("blue"));
}

#[test]
fn test_percentage_font_size() {
    let tree = styled(
        r#"<div style="font-size: 20px"><p style="font-size: 50%">x</p></div>"#,
        "",
    );
    let p = first_element(&tree, "p");
    let text = first_text(&tree, "x");
    assert_eq!(style_of(&tree, p, "font-size"), Some("10px"));
    assert_eq!(style_of(&tree, text, "font-size"), Some("10px"));
}

#[test]
fn test_user_agent_rules() {
    let tree = styled("<a href=x>l</a><i>i</i><b>b</b><small>s</small>", "");
    assert_eq!(style_of(&tree, first_text(&tree, "l"), "color"), Some("blue"));
    assert_eq!(
        style_of(&tree, first_text(&tree, "i"), "font-style"),
        Some("italic")
    );
    assert_eq!(
        style_of(&tree, first_text(&tree, "b"), "font-weight"),
        Some("bold")
    );
    assert_eq!(
        style_of(&tree, first_text(&tree, "s"), "font-size"),
        Some("14.4px")
    );
}

#[test]
fn test_author_rule_overrides_user_agent() {
    let tree = styled("<a href=x>l</a>", "a { color: red }");
    assert_eq!(style_of(&tree, first_text(&tree, "l"), "color"), Some("red"));
}

#[test]
fn test_malformed_declaration_is_ignored() {
    let tree = styled("<p>x</p>", "p { color: ; font-weight: bold }");
    let p = first_element(&tree, "p");
    assert_eq!(style_of(&tree, p, "color"), Some("black"));
    assert_eq!(style_of(&tree, p, "font-weight"), Some("bold"));
}

#[test]
fn test_style_element_rules_apply() {
    let mut tree = parse("<style>p { color: purple }</style><p>x</p>");
    let rules = collect_rules(&tree, |_: &str| Err::<String, _>("offline"));
    compute_styles(&mut tree, &rules);
    assert_eq!(style_of(&tree, first_text(&tree, "x"), "color"), Some("purple"));
}

#[test]
fn test_failed_linked_sheet_contributes_nothing() {
    let mut tree = parse(r#"<link rel="stylesheet" href="missing.css"><p>x</p>"#);
    let mut asked = Vec::new();
    let rules = collect_rules(&tree, |href: &str| {
        asked.push(href.to_string());
        Err::<String, _>("not found")
    });
    assert_eq!(asked, vec!["missing.css".to_string()]);
    compute_styles(&mut tree, &rules);
    assert_eq!(style_of(&tree, first_text(&tree, "x"), "color"), Some("black"));
}

#[test]
fn test_linked_sheets_apply_in_document_order() {
    let mut tree = parse(
        r#"<link rel="stylesheet" href="a.css"><link rel="Alternate StyleSheet" href="b.css"><p>x</p>"#,
    );
    let rules = collect_rules(&tree, |href: &str| match href {
        "a.css" => Ok::<_, String>("p { color: red }".to_string()),
        "b.css" => Ok("p { color: green }".to_string()),
        other => Err(format!("unexpected {other}")),
    });
    compute_styles(&mut tree, &rules);
    assert_eq!(style_of(&tree, first_text(&tree, "x"), "color"), Some("green"));
}
