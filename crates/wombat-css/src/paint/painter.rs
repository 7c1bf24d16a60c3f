//! Painter - generates a display list from a layout tree.
//!
//! Boxes are painted in pre-order, so a block's own decorations always sit
//! underneath the text and blocks it contains.

use serde::{Deserialize, Serialize};
use wombat_dom::{DomTree, ElementData, NodeId};

use super::{DisplayCommand, DisplayList};
use crate::font::FontKey;
use crate::layout::{BoxId, BoxKind, LayoutBox, LayoutTree, Rect, Viewport};

/// Debugging switches for painting.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaintOptions {
    /// Stroke a red outline around every block box.
    pub outline_boxes: bool,
}

/// Turns a [`LayoutTree`] into a [`DisplayList`].
pub struct Painter<'a> {
    dom: &'a DomTree,
    viewport: &'a Viewport,
    options: PaintOptions,
}

impl<'a> Painter<'a> {
    /// Create a painter for the styled DOM the tree was laid out from.
    #[must_use]
    pub const fn new(dom: &'a DomTree, viewport: &'a Viewport, options: PaintOptions) -> Self {
        Self {
            dom,
            viewport,
            options,
        }
    }

    /// Paint every box of `tree`.
    ///
    /// Painting is a pure function of the tree, the DOM and the options.
    #[must_use]
    pub fn paint(&self, tree: &LayoutTree) -> DisplayList {
        let mut list = DisplayList::new();
        for (id, layout_box) in tree.iter() {
            match &layout_box.kind {
                BoxKind::Block { nodes } => {
                    self.paint_background(layout_box, &mut list);
                    if let [node] = nodes.as_slice()
                        && let Some(element) = self.dom.as_element(*node)
                    {
                        self.paint_decorations(tree, id, layout_box, element, &mut list);
                    }
                    if self.options.outline_boxes {
                        list.push(DisplayCommand::Outline {
                            rect: layout_box.rect(),
                            color: "red".to_string(),
                            thickness: 1.0,
                        });
                    }
                }
                BoxKind::Text { node, word, font } => {
                    list.push(self.text_command(layout_box, *node, word, font));
                }
                BoxKind::Document { .. } | BoxKind::Line { .. } => {}
            }
        }
        list
    }

    /// Fill a block with the `background-color` of its first node. An
    /// anonymous block takes the background of whatever it starts with.
    fn paint_background(&self, layout_box: &LayoutBox, list: &mut DisplayList) {
        let Some(node) = layout_box.node() else {
            return;
        };
        let background = self
            .dom
            .style(node)
            .get_or("background-color", "transparent");
        if background != "transparent" {
            list.push(DisplayCommand::Rect {
                rect: layout_box.rect(),
                color: background.to_string(),
            });
        }
    }

    /// Tag-specific decorations of a block that stands for a single element.
    fn paint_decorations(
        &self,
        tree: &LayoutTree,
        id: BoxId,
        layout_box: &LayoutBox,
        element: &ElementData,
        list: &mut DisplayList,
    ) {
        let rect = layout_box.rect();
        match element.tag_name.as_str() {
            "li" => {
                let hstep = self.viewport.hstep;
                let middle = layout_box.y + tree.first_line_height(id) / 2.0;
                list.push(DisplayCommand::Rect {
                    rect: Rect::new(
                        layout_box.x - (hstep + 2.0),
                        middle - 2.0,
                        layout_box.x - (hstep - 2.0),
                        middle + 2.0,
                    ),
                    color: "black".to_string(),
                });
            }
            "nav" if element.has_class("links") => list.push(DisplayCommand::Rect {
                rect,
                color: "lightgray".to_string(),
            }),
            "pre" => list.push(DisplayCommand::Rect {
                rect,
                color: "gray".to_string(),
            }),
            "hr" => list.push(DisplayCommand::Line {
                x1: rect.left,
                y1: rect.top,
                x2: rect.right,
                y2: rect.top,
                color: "gray".to_string(),
                thickness: 1.0,
                rect: Rect::new(rect.left, rect.top, rect.right, rect.top + 1.0),
            }),
            _ => {}
        }
    }

    fn text_command(
        &self,
        layout_box: &LayoutBox,
        node: NodeId,
        word: &str,
        font: &FontKey,
    ) -> DisplayCommand {
        DisplayCommand::Text {
            x: layout_box.x,
            y: layout_box.y,
            text: word.to_string(),
            font: font.clone(),
            color: self.dom.style(node).get_or("color", "black").to_string(),
            rect: layout_box.rect(),
        }
    }
}
