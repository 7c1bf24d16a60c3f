//! Display list: draw commands in painting order.

use serde::Serialize;

use crate::font::FontKey;
use crate::layout::Rect;

/// A single drawing command, in page coordinates.
///
/// Every command carries its bounding rectangle so consumers can cull it
/// without knowing how it will be drawn.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum DisplayCommand {
    /// Draw a word with its top-left corner at `(x, y)`.
    Text {
        /// Left edge.
        x: f32,
        /// Top edge.
        y: f32,
        /// The word.
        text: String,
        /// Font to set it in.
        font: FontKey,
        /// Computed `color`.
        color: String,
        /// Bounding rectangle, one line spacing tall.
        rect: Rect,
    },
    /// Fill a rectangle.
    Rect {
        /// The area to fill.
        rect: Rect,
        /// Fill colour.
        color: String,
    },
    /// Draw a straight line.
    Line {
        /// Start x.
        x1: f32,
        /// Start y.
        y1: f32,
        /// End x.
        x2: f32,
        /// End y.
        y2: f32,
        /// Stroke colour.
        color: String,
        /// Stroke width in pixels.
        thickness: f32,
        /// Bounding rectangle.
        rect: Rect,
    },
    /// Stroke the border of a rectangle.
    Outline {
        /// The rectangle to outline.
        rect: Rect,
        /// Stroke colour.
        color: String,
        /// Stroke width in pixels.
        thickness: f32,
    },
}

impl DisplayCommand {
    /// The area the command may touch.
    #[must_use]
    pub const fn rect(&self) -> Rect {
        match self {
            Self::Text { rect, .. }
            | Self::Rect { rect, .. }
            | Self::Line { rect, .. }
            | Self::Outline { rect, .. } => *rect,
        }
    }
}

/// A list of drawing commands, back to front.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct DisplayList {
    commands: Vec<DisplayCommand>,
}

impl DisplayList {
    /// Create an empty display list.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            commands: Vec::new(),
        }
    }

    /// Add a command on top of everything so far.
    pub fn push(&mut self, command: DisplayCommand) {
        self.commands.push(command);
    }

    /// The commands in painting order.
    #[must_use]
    pub fn commands(&self) -> &[DisplayCommand] {
        &self.commands
    }

    /// Number of commands.
    #[must_use]
    pub fn len(&self) -> usize {
        self.commands.len()
    }

    /// Whether there are no commands.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Commands that reach into the band of page rows
    /// `[scroll, scroll + height]`, in painting order.
    pub fn visible(&self, scroll: f32, height: f32) -> impl Iterator<Item = &DisplayCommand> {
        self.commands
            .iter()
            .filter(move |command| command.rect().intersects_band(scroll, scroll + height))
    }
}

impl<'a> IntoIterator for &'a DisplayList {
    type Item = &'a DisplayCommand;
    type IntoIter = std::slice::Iter<'a, DisplayCommand>;

    fn into_iter(self) -> Self::IntoIter {
        self.commands.iter()
    }
}
