//! Layout box types.

use serde::{Deserialize, Serialize};
use wombat_dom::NodeId;

use crate::font::FontKey;

/// Index of a box in a [`LayoutTree`](super::LayoutTree).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct BoxId(pub usize);

/// An axis-aligned rectangle given by its edges.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    /// Left edge.
    pub left: f32,
    /// Top edge.
    pub top: f32,
    /// Right edge.
    pub right: f32,
    /// Bottom edge.
    pub bottom: f32,
}

impl Rect {
    /// Create a rectangle from its edges.
    #[must_use]
    pub const fn new(left: f32, top: f32, right: f32, bottom: f32) -> Self {
        Self {
            left,
            top,
            right,
            bottom,
        }
    }

    /// Whether the point lies inside. Left and top edges are inclusive,
    /// right and bottom exclusive.
    #[must_use]
    pub fn contains_point(&self, x: f32, y: f32) -> bool {
        self.left <= x && x < self.right && self.top <= y && y < self.bottom
    }

    /// Whether any part of the rectangle falls in the horizontal band
    /// `[top, bottom]`.
    #[must_use]
    pub fn intersects_band(&self, top: f32, bottom: f32) -> bool {
        self.top <= bottom && self.bottom >= top
    }

    /// Width of the rectangle.
    #[must_use]
    pub fn width(&self) -> f32 {
        self.right - self.left
    }

    /// Height of the rectangle.
    #[must_use]
    pub fn height(&self) -> f32 {
        self.bottom - self.top
    }
}

/// What a layout box represents.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum BoxKind {
    /// The page itself. Exactly one, at the root.
    Document {
        /// The DOM root.
        node: NodeId,
    },
    /// A block. Holds one element, or several consecutive inline-level
    /// siblings wrapped in an anonymous block.
    Block {
        /// The DOM nodes laid out by this block, never empty.
        nodes: Vec<NodeId>,
    },
    /// One line of an inline formatting context.
    Line {
        /// The first node of the block that owns the line.
        node: NodeId,
    },
    /// A single word.
    Text {
        /// The text node the word came from.
        node: NodeId,
        /// The word, without surrounding whitespace.
        word: String,
        /// The font it is set in.
        font: FontKey,
    },
}

/// A positioned box. All geometry is in page pixels.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LayoutBox {
    /// What the box represents.
    pub kind: BoxKind,
    /// Containing box; `None` only for the document.
    pub parent: Option<BoxId>,
    /// Previous sibling, used to stack blocks, lines and words.
    pub previous: Option<BoxId>,
    /// Child boxes in order.
    pub children: Vec<BoxId>,
    /// Left edge.
    pub x: f32,
    /// Top edge.
    pub y: f32,
    /// Width.
    pub width: f32,
    /// Height.
    pub height: f32,
}

impl LayoutBox {
    pub(crate) const fn new(kind: BoxKind, parent: Option<BoxId>, previous: Option<BoxId>) -> Self {
        Self {
            kind,
            parent,
            previous,
            children: Vec::new(),
            x: 0.0,
            y: 0.0,
            width: 0.0,
            height: 0.0,
        }
    }

    /// The DOM node this box stands for; the first node for an anonymous
    /// block.
    #[must_use]
    pub fn node(&self) -> Option<NodeId> {
        match &self.kind {
            BoxKind::Document { node } | BoxKind::Line { node } | BoxKind::Text { node, .. } => {
                Some(*node)
            }
            BoxKind::Block { nodes } => nodes.first().copied(),
        }
    }

    /// The box's border rectangle.
    #[must_use]
    pub fn rect(&self) -> Rect {
        Rect::new(self.x, self.y, self.x + self.width, self.y + self.height)
    }

    /// Whether this is a block box.
    #[must_use]
    pub const fn is_block(&self) -> bool {
        matches!(self.kind, BoxKind::Block { .. })
    }
}
