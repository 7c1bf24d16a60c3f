//! Inline layout: flowing words into lines and placing them on a baseline.

use wombat_dom::{NodeId, NodeType};

use super::block::LayoutEngine;
use super::{BoxId, BoxKind, LINE_SPACING};
use crate::font::FontKey;

/// U+00AD, a break opportunity that only shows as `-` when taken.
const SOFT_HYPHEN: char = '\u{ad}';

/// Where the next word goes.
struct Cursor {
    block: BoxId,
    width: f32,
    line: BoxId,
    x: f32,
}

impl LayoutEngine<'_, '_> {
    /// Flow `nodes` into line boxes under `block`, then position the lines.
    pub(super) fn layout_inline(&mut self, block: BoxId, nodes: &[NodeId]) {
        let line = self.open_line(block);
        let mut cursor = Cursor {
            block,
            width: self.get(block).width,
            line,
            x: 0.0,
        };
        for &node in nodes {
            self.recurse(&mut cursor, node);
        }

        for line in self.get(block).children.clone() {
            self.layout_line(line);
        }
    }

    fn open_line(&mut self, block: BoxId) -> BoxId {
        let previous = self.get(block).children.last().copied();
        let node = self.get(block).node().unwrap_or_else(|| self.dom.root());
        self.alloc(BoxKind::Line { node }, Some(block), previous)
    }

    fn new_line(&mut self, cursor: &mut Cursor) {
        cursor.line = self.open_line(cursor.block);
        cursor.x = 0.0;
    }

    fn line_is_empty(&self, cursor: &Cursor) -> bool {
        self.get(cursor.line).children.is_empty()
    }

    fn recurse(&mut self, cursor: &mut Cursor, node: NodeId) {
        let dom = self.dom;
        match dom.get(node).map(|n| &n.node_type) {
            Some(NodeType::Text(text)) => {
                let font = FontKey::from_style(dom.style(node));
                for word in text.split_whitespace() {
                    self.word(cursor, node, &font, word);
                }
            }
            Some(NodeType::Element(element)) => {
                if element.tag_name == "head" {
                    return;
                }
                if element.tag_name == "br" {
                    self.new_line(cursor);
                }
                for &child in dom.children(node) {
                    self.recurse(cursor, child);
                }
            }
            None => {}
        }
    }

    fn word(&mut self, cursor: &mut Cursor, node: NodeId, font: &FontKey, word: &str) {
        if !word.contains(SOFT_HYPHEN) {
            self.place_word(cursor, node, font, word);
            return;
        }

        let joined: String = word.chars().filter(|&c| c != SOFT_HYPHEN).collect();
        if joined.is_empty() {
            return;
        }
        let width = self.fonts.measure(font, &joined);
        if cursor.x + width <= cursor.width {
            self.place_word(cursor, node, font, &joined);
        } else {
            self.hyphenate(cursor, node, font, word);
        }
    }

    /// Break a word at its soft hyphens, packing as many segments onto each
    /// line as fit with a trailing `-`.
    fn hyphenate(&mut self, cursor: &mut Cursor, node: NodeId, font: &FontKey, word: &str) {
        let mut buffer = String::new();
        for segment in word.split(SOFT_HYPHEN).filter(|s| !s.is_empty()) {
            let candidate = format!("{buffer}{segment}-");
            let fits = cursor.x + self.fonts.measure(font, &candidate) <= cursor.width;
            if fits {
                buffer.push_str(segment);
            } else if buffer.is_empty() {
                if !self.line_is_empty(cursor) {
                    self.new_line(cursor);
                }
                buffer.push_str(segment);
            } else {
                self.place_word(cursor, node, font, &format!("{buffer}-"));
                self.new_line(cursor);
                buffer.clear();
                buffer.push_str(segment);
            }
        }
        if !buffer.is_empty() {
            self.place_word(cursor, node, font, &buffer);
        }
    }

    fn place_word(&mut self, cursor: &mut Cursor, node: NodeId, font: &FontKey, text: &str) {
        let width = self.fonts.measure(font, text);
        if cursor.x + width > cursor.width && !self.line_is_empty(cursor) {
            self.new_line(cursor);
        }

        let previous = self.get(cursor.line).children.last().copied();
        let _ = self.alloc(
            BoxKind::Text {
                node,
                word: text.to_string(),
                font: font.clone(),
            },
            Some(cursor.line),
            previous,
        );
        cursor.x += width + self.fonts.space_width(font);
    }

    /// Position a line below its predecessor and its words on a shared
    /// baseline.
    fn layout_line(&mut self, line: BoxId) {
        let Some(block) = self.get(line).parent else {
            return;
        };
        let (block_x, block_y, block_width) = {
            let b = self.get(block);
            (b.x, b.y, b.width)
        };
        let y = self
            .get(line)
            .previous
            .map_or(block_y, |p| self.get(p).y + self.get(p).height);
        {
            let l = self.get_mut(line);
            l.x = block_x;
            l.y = y;
            l.width = block_width;
        }

        let words = self.get(line).children.clone();
        if words.is_empty() {
            self.get_mut(line).height = 0.0;
            return;
        }

        let mut ascents = Vec::with_capacity(words.len());
        let mut max_ascent = 0.0_f32;
        let mut max_descent = 0.0_f32;
        let mut previous: Option<(f32, f32, FontKey)> = None;

        for &word in &words {
            let (text, font) = match &self.get(word).kind {
                BoxKind::Text { word, font, .. } => (word.clone(), font.clone()),
                _ => continue,
            };
            let width = self.fonts.measure(&font, &text);
            let x = match &previous {
                Some((prev_x, prev_width, prev_font)) => {
                    prev_x + self.fonts.space_width(prev_font) + prev_width
                }
                None => block_x,
            };
            let metrics = self.fonts.metrics(&font);
            {
                let w = self.get_mut(word);
                w.x = x;
                w.width = width;
                w.height = metrics.linespace;
            }
            max_ascent = max_ascent.max(metrics.ascent);
            max_descent = max_descent.max(metrics.descent);
            ascents.push((word, metrics.ascent));
            previous = Some((x, width, font));
        }

        let baseline = y + LINE_SPACING * max_ascent;
        for (word, ascent) in ascents {
            self.get_mut(word).y = baseline - ascent;
        }
        self.get_mut(line).height = LINE_SPACING * (max_ascent + max_descent);
    }
}
