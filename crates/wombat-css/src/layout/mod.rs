//! Layout: turning a styled DOM into positioned boxes.
//!
//! ```text
//! Document
//!  └─ Block (html)
//!      └─ Block (body)
//!          ├─ Block (p)            block mode: one child block per block-level element
//!          │   ├─ Line             inline mode: words flow into lines
//!          │   │   ├─ Text "Hello"
//!          │   │   └─ Text "world"
//!          │   └─ Line
//!          └─ Block (text, b, ...) anonymous block for a run of inline siblings
//! ```
//!
//! Blocks stack vertically below their previous sibling; lines stack inside
//! their block; words sit on a shared baseline within a line.

mod block;
mod inline;
/// Layout box types.
pub mod layout_box;

use serde::{Deserialize, Serialize};
use strum_macros::Display;
use wombat_dom::{DomTree, NodeId, NodeType};

use crate::font::FontCache;
pub use layout_box::{BoxId, BoxKind, LayoutBox, Rect};

/// Elements laid out as blocks.
pub const BLOCK_ELEMENTS: &[&str] = &[
    "html", "body", "article", "section", "nav", "aside", "h1", "h2", "h3", "h4", "h5", "h6",
    "hgroup", "header", "footer", "address", "p", "hr", "pre", "blockquote", "ol", "ul", "menu",
    "li", "dl", "dt", "dd", "figure", "figcaption", "main", "div", "table", "form", "fieldset",
    "legend", "details", "summary",
];

/// Line boxes are this many times taller than the tallest font's ascent
/// plus descent.
pub const LINE_SPACING: f32 = 1.25;

/// Page geometry the layout is computed for.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Viewport {
    /// Page width in pixels.
    pub width: f32,
    /// Visible height in pixels; only consumers use it, for culling.
    pub height: f32,
    /// Horizontal page margin, also the list indent unit.
    pub hstep: f32,
    /// Vertical page margin.
    pub vstep: f32,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            width: 800.0,
            height: 600.0,
            hstep: 13.0,
            vstep: 18.0,
        }
    }
}

/// How a block lays out its contents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum LayoutMode {
    /// Children become stacked child blocks.
    Block,
    /// Words flow into lines.
    Inline,
}

/// Whether `node` is an element from [`BLOCK_ELEMENTS`].
#[must_use]
pub fn is_block_element(dom: &DomTree, node: NodeId) -> bool {
    dom.as_element(node)
        .is_some_and(|e| BLOCK_ELEMENTS.contains(&e.tag_name.as_str()))
}

/// Decide the layout mode of a block holding `nodes`.
///
/// Several nodes or a single text node flow inline. A single element is a
/// block container if any child is block-level, flows inline if it has
/// other children, and is an (empty) block otherwise.
#[must_use]
pub fn layout_mode(dom: &DomTree, nodes: &[NodeId]) -> LayoutMode {
    let [node] = nodes else {
        return if nodes.is_empty() {
            LayoutMode::Block
        } else {
            LayoutMode::Inline
        };
    };
    match dom.get(*node).map(|n| &n.node_type) {
        Some(NodeType::Text(_)) => LayoutMode::Inline,
        _ => {
            let children = dom.children(*node);
            if children.is_empty() || children.iter().any(|&c| is_block_element(dom, c)) {
                LayoutMode::Block
            } else {
                LayoutMode::Inline
            }
        }
    }
}

/// A fully positioned box tree.
///
/// Only [`LayoutTree::layout`] creates one, so every box it exposes has its
/// final geometry.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct LayoutTree {
    boxes: Vec<LayoutBox>,
}

impl LayoutTree {
    /// Lay out a styled DOM for a viewport.
    ///
    /// The DOM must already have computed styles. The same inputs always
    /// produce the same geometry.
    #[must_use]
    pub fn layout(dom: &DomTree, viewport: &Viewport, fonts: &mut FontCache<'_>) -> Self {
        let boxes = block::LayoutEngine::new(dom, viewport, fonts).run();
        Self { boxes }
    }

    /// The document box.
    #[must_use]
    pub const fn root(&self) -> BoxId {
        BoxId(0)
    }

    /// Get a box by id.
    #[must_use]
    pub fn get(&self, id: BoxId) -> Option<&LayoutBox> {
        self.boxes.get(id.0)
    }

    /// Number of boxes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.boxes.len()
    }

    /// Whether the tree has no boxes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.boxes.is_empty()
    }

    /// Height of the whole document.
    #[must_use]
    pub fn document_height(&self) -> f32 {
        self.get(self.root()).map_or(0.0, |b| b.height)
    }

    /// Child boxes of `id`.
    #[must_use]
    pub fn children(&self, id: BoxId) -> &[BoxId] {
        self.get(id).map(|b| b.children.as_slice()).unwrap_or(&[])
    }

    /// Iterate over all boxes in pre-order (parents before children).
    pub fn iter(&self) -> impl Iterator<Item = (BoxId, &LayoutBox)> {
        let mut stack = if self.is_empty() {
            Vec::new()
        } else {
            vec![self.root()]
        };
        std::iter::from_fn(move || {
            let id = stack.pop()?;
            stack.extend(self.children(id).iter().rev().copied());
            self.get(id).map(|b| (id, b))
        })
    }

    /// The innermost box containing the point, i.e. the last one in
    /// pre-order.
    #[must_use]
    pub fn hit_test(&self, x: f32, y: f32) -> Option<BoxId> {
        self.iter()
            .filter(|(_, b)| b.rect().contains_point(x, y))
            .map(|(id, _)| id)
            .last()
    }

    /// The `href` of the link under the point, if any: the nearest `a`
    /// element with an `href` among the hit node and its ancestors.
    #[must_use]
    pub fn link_at<'d>(&self, dom: &'d DomTree, x: f32, y: f32) -> Option<&'d str> {
        let node = self.get(self.hit_test(x, y)?)?.node()?;
        std::iter::once(node)
            .chain(dom.ancestors(node))
            .filter_map(|id| dom.as_element(id))
            .filter(|e| e.tag_name == "a")
            .find_map(|e| e.attrs.get("href"))
            .map(String::as_str)
    }

    /// Vertical position to scroll to for `#fragment`: the top of the last
    /// box whose node has that `id` attribute.
    #[must_use]
    pub fn scroll_target(&self, dom: &DomTree, fragment: &str) -> Option<f32> {
        self.iter()
            .filter(|(_, b)| {
                b.node()
                    .and_then(|node| dom.as_element(node))
                    .and_then(|e| e.id())
                    == Some(fragment)
            })
            .map(|(_, b)| b.y)
            .last()
    }

    /// Height of the first line inside `id`, descending through first
    /// children. Zero when there is none.
    #[must_use]
    pub fn first_line_height(&self, id: BoxId) -> f32 {
        let mut current = id;
        loop {
            let Some(layout_box) = self.get(current) else {
                return 0.0;
            };
            if matches!(layout_box.kind, BoxKind::Line { .. }) {
                return layout_box.height;
            }
            match layout_box.children.first() {
                Some(&first) => current = first,
                None => return 0.0,
            }
        }
    }
}
