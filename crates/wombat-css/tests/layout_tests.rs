//! Layout with fixed-width metrics: every character is 0.6em wide, so
//! 16px text advances 9.6px per character and a line is 20px tall.

use wombat_css::{
    ApproximateFontMetrics, BoxKind, CSSParser, FontCache, LayoutBox, LayoutTree, Viewport,
    collect_rules, compute_styles,
};
use wombat_dom::{DomTree, NodeId};
use wombat_html::parse;

const CHAR: f32 = 9.6;
const LINE: f32 = 20.0;

fn assert_close(actual: f32, expected: f32) {
    assert!(
        (actual - expected).abs() < 1e-3,
        "expected {expected}, got {actual}"
    );
}

/// A viewport whose document content area is `content_width` wide.
fn narrow(content_width: f32) -> Viewport {
    let defaults = Viewport::default();
    Viewport {
        width: content_width + 2.0 * defaults.hstep,
        ..defaults
    }
}

fn layout_with(html: &str, css: &str, viewport: &Viewport) -> (DomTree, LayoutTree) {
    let mut dom = parse(html);
    let mut rules = collect_rules(&dom, |_: &str| Err::<String, _>("offline"));
    rules.extend(CSSParser::new(css).parse());
    compute_styles(&mut dom, &rules);
    let metrics = ApproximateFontMetrics;
    let mut fonts = FontCache::new(&metrics);
    let layout = LayoutTree::layout(&dom, viewport, &mut fonts);
    (dom, layout)
}

fn layout(html: &str) -> (DomTree, LayoutTree) {
    layout_with(html, "", &Viewport::default())
}

/// The words of every line box, in order.
fn lines(layout: &LayoutTree) -> Vec<Vec<String>> {
    layout
        .iter()
        .filter(|(_, b)| matches!(b.kind, BoxKind::Line { .. }))
        .map(|(id, _)| {
            layout
                .children(id)
                .iter()
                .filter_map(|&w| layout.get(w))
                .filter_map(|w| match &w.kind {
                    BoxKind::Text { word, .. } => Some(word.clone()),
                    _ => None,
                })
                .collect()
        })
        .collect()
}

fn line_boxes(layout: &LayoutTree) -> Vec<&LayoutBox> {
    layout
        .iter()
        .filter(|(_, b)| matches!(b.kind, BoxKind::Line { .. }))
        .map(|(_, b)| b)
        .collect()
}

fn word_box<'a>(layout: &'a LayoutTree, text: &str) -> &'a LayoutBox {
    layout
        .iter()
        .map(|(_, b)| b)
        .find(|b| matches!(&b.kind, BoxKind::Text { word, .. } if word == text))
        .unwrap_or_else(|| panic!("no word {text:?}"))
}

fn element(dom: &DomTree, tag: &str) -> NodeId {
    dom.iter_all()
        .find(|&id| dom.is_element(id, tag))
        .unwrap_or_else(|| panic!("no <{tag}>"))
}

fn block_of<'a>(layout: &'a LayoutTree, node: NodeId) -> &'a LayoutBox {
    layout
        .iter()
        .map(|(_, b)| b)
        .find(|b| b.is_block() && b.node() == Some(node))
        .unwrap_or_else(|| panic!("no block for {node:?}"))
}

#[test]
fn test_document_box() {
    let (_, layout) = layout("<p>x</p>");
    let document = layout
        .get(layout.root())
        .unwrap_or_else(|| panic!("no document box"));
    assert!(matches!(document.kind, BoxKind::Document { .. }));
    assert_close(document.x, 13.0);
    assert_close(document.y, 18.0);
    assert_close(document.width, 774.0);
    assert_close(document.height, LINE);
    assert_close(layout.document_height(), LINE);
}

#[test]
fn test_empty_document_has_no_height() {
    let (_, layout) = layout("");
    assert_close(layout.document_height(), 0.0);
    assert!(lines(&layout).is_empty());
}

#[test]
fn test_words_on_one_line() {
    let (_, layout) = layout("<p>hello world</p>");
    assert_eq!(lines(&layout), vec![vec!["hello", "world"]]);

    let hello = word_box(&layout, "hello");
    let world = word_box(&layout, "world");
    assert_close(hello.x, 13.0);
    assert_close(hello.width, 5.0 * CHAR);
    assert_close(world.x, 13.0 + 5.0 * CHAR + CHAR);
    // Baseline at 18 + 1.25 * 12.8, words hang 12.8 above it.
    assert_close(hello.y, 18.0 + 1.25 * 12.8 - 12.8);
    assert_close(hello.height, 19.2);
}

#[test]
fn test_line_breaking() {
    let (_, layout) = layout_with("<p>aaaa bbbb cccc</p>", "", &narrow(100.0));
    assert_eq!(lines(&layout), vec![vec!["aaaa", "bbbb"], vec!["cccc"]]);

    let boxes = line_boxes(&layout);
    assert_close(boxes[0].height, LINE);
    assert_close(boxes[1].y, boxes[0].y + LINE);
    assert_close(word_box(&layout, "cccc").x, 13.0);
}

#[test]
fn test_overlong_word_gets_its_own_line() {
    let (_, alone) = layout_with("<p>abcdefghijklmnop</p>", "", &narrow(100.0));
    assert_eq!(lines(&alone), vec![vec!["abcdefghijklmnop"]]);

    let (_, after) = layout_with("<p>a abcdefghijklmnop</p>", "", &narrow(100.0));
    assert_eq!(lines(&after), vec![vec!["a"], vec!["abcdefghijklmnop"]]);
}

#[test]
fn test_soft_hyphen_unbroken_when_it_fits() {
    let (_, layout) = layout("<p>aaaa&shy;bbbb&shy;cccc</p>");
    assert_eq!(lines(&layout), vec![vec!["aaaabbbbcccc"]]);
    assert_close(word_box(&layout, "aaaabbbbcccc").width, 12.0 * CHAR);
}

#[test]
fn test_soft_hyphen_breaks() {
    let (_, layout) = layout_with("<p>aaaa&shy;bbbb&shy;cccc</p>", "", &narrow(100.0));
    assert_eq!(lines(&layout), vec![vec!["aaaabbbb-"], vec!["cccc"]]);
}

#[test]
fn test_soft_hyphen_first_segment_moves_to_next_line() {
    let (_, layout) = layout_with("<p>xx aaaaaaaaaa&shy;bb</p>", "", &narrow(100.0));
    assert_eq!(
        lines(&layout),
        vec![vec!["xx"], vec!["aaaaaaaaaa-"], vec!["bb"]]
    );
}

#[test]
fn test_br_starts_a_new_line() {
    let (_, tree) = layout("<p>a<br>b</p>");
    assert_eq!(lines(&tree), vec![vec!["a"], vec!["b"]]);

    let (_, leading) = layout("<p><br>a</p>");
    assert_eq!(lines(&leading), vec![vec![], vec!["a"]]);
    let boxes = line_boxes(&leading);
    assert_close(boxes[0].height, 0.0);
    assert_close(boxes[1].y, boxes[0].y);
}

#[test]
fn test_mixed_fonts_share_a_baseline() {
    let (_, layout) = layout("<p>a <big>B</big></p>");
    let small = word_box(&layout, "a");
    let big = word_box(&layout, "B");
    // 110% of 16px is 17.6px, which selects 13pt, drawn at 13 / 0.75 px.
    let big_px = 13.0 / 0.75;
    assert_close(small.y + 0.8 * 16.0, big.y + 0.8 * big_px);
    assert_close(line_boxes(&layout)[0].height, 1.25 * big_px);
}

#[test]
fn test_anonymous_blocks_stack() {
    let (dom, layout) = layout("<div>text<p>para</p>tail</div>");
    let div = element(&dom, "div");
    let div_box = block_of(&layout, div);
    let children: Vec<&LayoutBox> = div_box
        .children
        .iter()
        .filter_map(|&c| layout.get(c))
        .collect();
    assert_eq!(children.len(), 3);
    assert_eq!(children[1].node(), Some(element(&dom, "p")));
    assert_close(children[0].y, div_box.y);
    assert_close(children[1].y, div_box.y + LINE);
    assert_close(children[2].y, div_box.y + 2.0 * LINE);
    assert_close(div_box.height, 3.0 * LINE);
}

#[test]
fn test_head_is_not_laid_out() {
    let (_, layout) = layout("<title>Title</title><script>var x;</script><p>x</p>");
    assert_eq!(lines(&layout), vec![vec!["x"]]);
}

#[test]
fn test_script_and_style_in_body_flow_as_text() {
    let (_, layout) = layout("<body>hi<script>x=1</script> there<style>p{}</style></body>");
    assert_eq!(lines(&layout), vec![vec!["hi", "x=1", "there", "p{}"]]);
}

#[test]
fn test_list_items_are_indented() {
    let (dom, layout) = layout("<ul><li>x</li></ul>");
    let li = block_of(&layout, element(&dom, "li"));
    assert_close(li.x, 13.0 + 26.0);
    assert_close(li.width, 774.0 - 26.0);
}

#[test]
fn test_explicit_width() {
    let (dom, layout) = layout(r#"<div style="width: 200px"><p>x</p></div>"#);
    assert_close(block_of(&layout, element(&dom, "div")).width, 200.0);
    assert_close(block_of(&layout, element(&dom, "p")).width, 200.0);
}

#[test]
fn test_negative_and_unknown_widths_use_parent() {
    let (dom, layout) = layout(r#"<div style="width: -5px">x</div><p style="width: 50%">y</p>"#);
    assert_close(block_of(&layout, element(&dom, "div")).width, 774.0);
    assert_close(block_of(&layout, element(&dom, "p")).width, 774.0);
}

#[test]
fn test_width_constrains_wrapping() {
    let (_, layout) = layout(r#"<p style="width: 100px">aaaa bbbb cccc</p>"#);
    assert_eq!(lines(&layout), vec![vec!["aaaa", "bbbb"], vec!["cccc"]]);
}

#[test]
fn test_layout_is_idempotent() {
    let html = "<h1>Title</h1><p>Some <b>bold</b> and <i>italic</i> words</p><ul><li>one</li></ul>";
    let (_, first) = layout_with(html, "", &narrow(120.0));
    let (_, second) = layout_with(html, "", &narrow(120.0));
    assert_eq!(first, second);
}

#[test]
fn test_hit_test_finds_innermost_box() {
    let (_, layout) = layout("<p>hello world</p>");
    let hello = word_box(&layout, "hello");
    let hit = layout
        .hit_test(hello.x + 1.0, hello.y + 1.0)
        .and_then(|id| layout.get(id))
        .unwrap_or_else(|| panic!("nothing hit"));
    assert_eq!(hit, hello);
    assert_eq!(layout.hit_test(0.0, 0.0), None);
}

#[test]
fn test_link_at() {
    let (dom, layout) = layout(r#"<p><a href="/next">go <b>now</b></a> stay</p>"#);
    let go = word_box(&layout, "go");
    let now = word_box(&layout, "now");
    let stay = word_box(&layout, "stay");
    assert_eq!(layout.link_at(&dom, go.x + 1.0, go.y + 1.0), Some("/next"));
    assert_eq!(layout.link_at(&dom, now.x + 1.0, now.y + 1.0), Some("/next"));
    assert_eq!(layout.link_at(&dom, stay.x + 1.0, stay.y + 1.0), None);
}

#[test]
fn test_scroll_target() {
    let (dom, layout) = layout(r#"<p>one</p><p id="second">two</p>"#);
    let target = layout.scroll_target(&dom, "second");
    assert_eq!(target, Some(block_of(&layout, element(&dom, "p")).y + LINE));
    assert_eq!(layout.scroll_target(&dom, "missing"), None);
}

#[test]
fn test_serializes_to_json() {
    let (_, layout) = layout("<p>x</p>");
    let json = serde_json::to_value(&layout).unwrap_or_else(|e| panic!("serialize: {e}"));
    assert_eq!(json["boxes"][0]["kind"]["type"], "document");
}
