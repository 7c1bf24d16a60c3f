//! Style sheet parser: rules, declarations, the `font` shorthand and error
//! recovery.

use wombat_css::parser::expand_font_shorthand;
use wombat_css::{CSSParser, Declarations, Rule, Selector};

fn rules(css: &str) -> Vec<Rule> {
    CSSParser::new(css).parse()
}

fn declarations(css: &str) -> Declarations {
    CSSParser::new(css).parse_declarations()
}

fn pairs(declarations: &Declarations) -> Vec<(String, String)> {
    declarations
        .iter()
        .map(|(p, v)| (p.to_string(), v.to_string()))
        .collect()
}

#[test]
fn test_simple_rule() {
    let parsed = rules("p { color: red; font-weight: bold; }");
    assert_eq!(parsed.len(), 1);
    assert_eq!(parsed[0].selector, Selector::Tag("p".to_string()));
    assert_eq!(parsed[0].declarations.get("color"), Some("red"));
    assert_eq!(parsed[0].declarations.get("font-weight"), Some("bold"));
}

#[test]
fn test_descendant_selector() {
    let parsed = rules("nav .links a { color: blue }");
    assert_eq!(parsed.len(), 1);
    assert_eq!(parsed[0].selector.to_string(), "nav .links a");
    assert_eq!(parsed[0].selector.priority(), 12);
}

#[test]
fn test_missing_final_semicolon() {
    let parsed = rules("p{color:red}");
    assert_eq!(parsed[0].declarations.get("color"), Some("red"));
}

#[test]
fn test_property_names_lowercased() {
    let parsed = declarations("COLOR: Red");
    assert_eq!(parsed.get("color"), Some("Red"));
}

#[test]
fn test_empty_value_is_dropped() {
    let parsed = rules("p { color: ; font-weight: bold; }");
    assert_eq!(parsed.len(), 1);
    assert_eq!(parsed[0].declarations.get("color"), None);
    assert_eq!(parsed[0].declarations.get("font-weight"), Some("bold"));
}

#[test]
fn test_bad_declaration_skipped() {
    let parsed = declarations("color: red; !!!; margin: 4px");
    assert_eq!(
        pairs(&parsed),
        vec![
            ("color".to_string(), "red".to_string()),
            ("margin".to_string(), "4px".to_string()),
        ]
    );
}

#[test]
fn test_bad_rule_skipped() {
    let parsed = rules("@media print { p { color: red } } div { color: green }");
    let selectors: Vec<String> = parsed.iter().map(|r| r.selector.to_string()).collect();
    assert!(selectors.contains(&"div".to_string()));
    assert!(!selectors.iter().any(|s| s.contains("media")));
}

#[test]
fn test_unterminated_rule_stops() {
    let parsed = rules("p { color: red } div { color");
    assert_eq!(parsed.len(), 1);
    assert_eq!(parsed[0].selector.to_string(), "p");
}

#[test]
fn test_comments_ignored() {
    let parsed = rules("/* header */ p { /* inner */ color: red; }");
    assert_eq!(parsed.len(), 1);
    assert_eq!(parsed[0].declarations.get("color"), Some("red"));
}

#[test]
fn test_later_duplicate_wins() {
    let parsed = declarations("color: red; color: blue");
    assert_eq!(parsed.len(), 1);
    assert_eq!(parsed.get("color"), Some("blue"));
}

#[test]
fn test_font_shorthand_in_declarations() {
    let parsed = declarations("font: italic bold 12px Helvetica");
    assert_eq!(parsed.get("font-style"), Some("italic"));
    assert_eq!(parsed.get("font-weight"), Some("bold"));
    assert_eq!(parsed.get("font-size"), Some("12px"));
    assert_eq!(parsed.get("font-family"), Some("Helvetica"));
}

#[test]
fn test_font_shorthand_token_counts() {
    let mut one = Declarations::new();
    expand_font_shorthand("Arial", &mut one);
    assert_eq!(pairs(&one), vec![("font-family".to_string(), "Arial".to_string())]);

    let mut two = Declarations::new();
    expand_font_shorthand("14px Arial", &mut two);
    assert_eq!(two.get("font-size"), Some("14px"));
    assert_eq!(two.get("font-family"), Some("Arial"));

    let mut italic = Declarations::new();
    expand_font_shorthand("italic 14px Arial", &mut italic);
    assert_eq!(italic.get("font-style"), Some("italic"));
    assert_eq!(italic.get("font-weight"), None);

    let mut bold = Declarations::new();
    expand_font_shorthand("bold 14px Arial", &mut bold);
    assert_eq!(bold.get("font-weight"), Some("bold"));
    assert_eq!(bold.get("font-style"), None);

    let mut long = Declarations::new();
    expand_font_shorthand("italic bold 14px Times New Roman", &mut long);
    assert_eq!(long.get("font-family"), Some("Times New Roman"));
}

#[test]
fn test_font_shorthand_in_rule_keeps_following_declarations() {
    let parsed = rules("p { font: bold 20px Georgia; color: red }");
    assert_eq!(parsed[0].declarations.get("font-size"), Some("20px"));
    assert_eq!(parsed[0].declarations.get("color"), Some("red"));
}
