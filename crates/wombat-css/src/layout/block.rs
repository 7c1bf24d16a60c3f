//! Block layout: stacking child blocks and choosing how each block lays
//! out its contents.

use wombat_common::warning::warn_once;
use wombat_dom::{DomTree, NodeId};

use super::{BoxId, BoxKind, LayoutBox, LayoutMode, Viewport, is_block_element, layout_mode};
use crate::font::FontCache;
use crate::style::parse_px;

/// Builds and positions the box arena for one layout pass.
pub(super) struct LayoutEngine<'a, 'f> {
    pub(super) dom: &'a DomTree,
    pub(super) viewport: &'a Viewport,
    pub(super) fonts: &'a mut FontCache<'f>,
    pub(super) boxes: Vec<LayoutBox>,
}

impl<'a, 'f> LayoutEngine<'a, 'f> {
    pub(super) const fn new(
        dom: &'a DomTree,
        viewport: &'a Viewport,
        fonts: &'a mut FontCache<'f>,
    ) -> Self {
        Self {
            dom,
            viewport,
            fonts,
            boxes: Vec::new(),
        }
    }

    /// Lay out the whole document and hand back the boxes, the document box
    /// first.
    pub(super) fn run(mut self) -> Vec<LayoutBox> {
        let document = self.alloc(
            BoxKind::Document {
                node: self.dom.root(),
            },
            None,
            None,
        );
        {
            let Viewport {
                width, hstep, vstep, ..
            } = *self.viewport;
            let doc = self.get_mut(document);
            doc.x = hstep;
            doc.width = width - 2.0 * hstep;
            doc.y = vstep;
        }
        if self.dom.is_empty() {
            return self.boxes;
        }

        let child = self.alloc(
            BoxKind::Block {
                nodes: vec![self.dom.root()],
            },
            Some(document),
            None,
        );
        self.layout_block(child);
        let height = self.get(child).height;
        self.get_mut(document).height = height;
        self.boxes
    }

    pub(super) fn alloc(
        &mut self,
        kind: BoxKind,
        parent: Option<BoxId>,
        previous: Option<BoxId>,
    ) -> BoxId {
        let id = BoxId(self.boxes.len());
        self.boxes.push(LayoutBox::new(kind, parent, previous));
        if let Some(parent) = parent {
            self.get_mut(parent).children.push(id);
        }
        id
    }

    pub(super) fn get(&self, id: BoxId) -> &LayoutBox {
        &self.boxes[id.0]
    }

    pub(super) fn get_mut(&mut self, id: BoxId) -> &mut LayoutBox {
        &mut self.boxes[id.0]
    }

    /// Position a block below its previous sibling, size it, lay out its
    /// contents and take the height of what it contains.
    fn layout_block(&mut self, id: BoxId) {
        let nodes = match &self.get(id).kind {
            BoxKind::Block { nodes } if !nodes.is_empty() => nodes.clone(),
            _ => return,
        };
        let first = nodes[0];

        let (parent_x, parent_y, parent_width) = self
            .get(id)
            .parent
            .map_or((0.0, 0.0, self.viewport.width), |p| {
                let parent = self.get(p);
                (parent.x, parent.y, parent.width)
            });
        let y = self
            .get(id)
            .previous
            .map_or(parent_y, |p| self.get(p).y + self.get(p).height);

        let (x, width) = if self.dom.is_element(first, "li") {
            let indent = 2.0 * self.viewport.hstep;
            (parent_x + indent, parent_width - indent)
        } else {
            (
                parent_x,
                resolve_width(self.dom.style(first).get("width"), parent_width),
            )
        };

        {
            let block = self.get_mut(id);
            block.x = x;
            block.y = y;
            block.width = width;
        }

        match layout_mode(self.dom, &nodes) {
            LayoutMode::Block => {
                self.build_child_blocks(id, first);
                for child in self.get(id).children.clone() {
                    self.layout_block(child);
                }
            }
            LayoutMode::Inline => self.layout_inline(id, &nodes),
        }

        let height = self
            .get(id)
            .children
            .iter()
            .map(|&child| self.get(child).height)
            .sum();
        self.get_mut(id).height = height;
    }

    /// One child block per block-level child element; each run of other
    /// children goes into an anonymous block. `head` is not laid out.
    fn build_child_blocks(&mut self, id: BoxId, node: NodeId) {
        let dom = self.dom;
        let mut previous = None;
        let mut pending: Vec<NodeId> = Vec::new();

        for &child in dom.children(node) {
            if dom.is_element(child, "head") {
                continue;
            }
            if !is_block_element(dom, child) {
                pending.push(child);
                continue;
            }
            if !pending.is_empty() {
                let nodes = std::mem::take(&mut pending);
                previous = Some(self.alloc(BoxKind::Block { nodes }, Some(id), previous));
            }
            previous = Some(self.alloc(
                BoxKind::Block {
                    nodes: vec![child],
                },
                Some(id),
                previous,
            ));
        }

        if !pending.is_empty() {
            let _ = self.alloc(BoxKind::Block { nodes: pending }, Some(id), previous);
        }
    }
}

/// Width of a block from its `width` property.
///
/// `auto`, `unset`, a missing value and negative lengths take the parent's
/// width. Anything that is not a `px` length is reported and does the same.
#[allow(clippy::cast_possible_truncation)]
fn resolve_width(value: Option<&str>, parent_width: f32) -> f32 {
    match value {
        None | Some("auto" | "unset") => parent_width,
        Some(value) => match parse_px(value) {
            Some(px) if px >= 0.0 => px as f32,
            Some(_) => parent_width,
            None => {
                warn_once(
                    "Layout",
                    &format!("unsupported width '{value}', using the parent width"),
                );
                parent_width
            }
        },
    }
}
