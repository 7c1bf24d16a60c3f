//! Tests for the arena DOM: attachment, traversal, styles and lookups.

use wombat_dom::{ComputedStyle, DomTree, ElementData, NodeId, NodeType};

/// Helper to create an element node and return its NodeId.
fn alloc_element(tree: &mut DomTree, tag: &str) -> NodeId {
    tree.alloc(NodeType::Element(ElementData::new(tag)))
}

/// Helper to create an element carrying one attribute.
fn alloc_with_attr(tree: &mut DomTree, tag: &str, key: &str, value: &str) -> NodeId {
    let mut data = ElementData::new(tag);
    let _ = data.attrs.insert(key.to_string(), value.to_string());
    tree.alloc(NodeType::Element(data))
}

#[test]
fn test_first_alloc_is_root() {
    let mut tree = DomTree::new();
    assert!(tree.is_empty());
    let html = alloc_element(&mut tree, "html");
    assert_eq!(html, NodeId::ROOT);
    assert_eq!(tree.root(), html);
    assert_eq!(tree.parent(html), None);
}

#[test]
fn test_append_child_sets_parent_and_order() {
    let mut tree = DomTree::new();
    let html = alloc_element(&mut tree, "html");
    let head = alloc_element(&mut tree, "head");
    let body = alloc_element(&mut tree, "body");
    tree.append_child(html, head);
    tree.append_child(html, body);

    assert_eq!(tree.children(html), &[head, body]);
    assert_eq!(tree.parent(body), Some(html));
}

#[test]
fn test_detached_node_has_no_parent() {
    let mut tree = DomTree::new();
    let _html = alloc_element(&mut tree, "html");
    let orphan = alloc_element(&mut tree, "div");
    assert_eq!(tree.parent(orphan), None);
    // Detached nodes are not visited by the document-order walk.
    assert!(tree.iter_all().all(|id| id != orphan));
}

#[test]
fn test_ancestors_walk_to_root() {
    let mut tree = DomTree::new();
    let html = alloc_element(&mut tree, "html");
    let body = alloc_element(&mut tree, "body");
    let p = alloc_element(&mut tree, "p");
    let text = tree.alloc(NodeType::Text("hi".to_string()));
    tree.append_child(p, text);
    tree.append_child(body, p);
    tree.append_child(html, body);

    let ancestors: Vec<NodeId> = tree.ancestors(text).collect();
    assert_eq!(ancestors, vec![p, body, html]);
}

#[test]
fn test_iter_all_is_document_order() {
    let mut tree = DomTree::new();
    let html = alloc_element(&mut tree, "html");
    let head = alloc_element(&mut tree, "head");
    let body = alloc_element(&mut tree, "body");
    let a = alloc_element(&mut tree, "a");
    let b = alloc_element(&mut tree, "b");
    tree.append_child(body, a);
    tree.append_child(body, b);
    tree.append_child(html, head);
    tree.append_child(html, body);

    let order: Vec<NodeId> = tree.iter_all().collect();
    assert_eq!(order, vec![html, head, body, a, b]);
}

#[test]
fn test_element_by_id_first_match() {
    let mut tree = DomTree::new();
    let html = alloc_element(&mut tree, "html");
    let first = alloc_with_attr(&mut tree, "h2", "id", "intro");
    let second = alloc_with_attr(&mut tree, "h3", "id", "intro");
    tree.append_child(html, first);
    tree.append_child(html, second);

    assert_eq!(tree.element_by_id("intro"), Some(first));
    assert_eq!(tree.element_by_id("missing"), None);
}

#[test]
fn test_classes_split_on_whitespace() {
    let mut data = ElementData::new("nav");
    let _ = data
        .attrs
        .insert("class".to_string(), "links  main\tbar".to_string());
    let classes = data.classes();
    assert_eq!(classes.len(), 3);
    assert!(data.has_class("links"));
    assert!(!data.has_class("link"));
}

#[test]
fn test_computed_style_set_and_get() {
    let mut style = ComputedStyle::new();
    style.set("color", "red");
    style.set("color", "blue");
    assert_eq!(style.get("color"), Some("blue"));
    assert_eq!(style.get_or("background-color", "transparent"), "transparent");
    assert_eq!(style.len(), 1);
}

#[test]
fn test_text_content_concatenates() {
    let mut tree = DomTree::new();
    let html = alloc_element(&mut tree, "html");
    let one = tree.alloc(NodeType::Text("one ".to_string()));
    let b = alloc_element(&mut tree, "b");
    let two = tree.alloc(NodeType::Text("two".to_string()));
    tree.append_child(b, two);
    tree.append_child(html, one);
    tree.append_child(html, b);

    assert_eq!(tree.text_content(html), "one two");
}
