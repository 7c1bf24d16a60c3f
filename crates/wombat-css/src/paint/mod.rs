//! Painting: flattening a layout tree into draw commands.
//!
//! ```text
//! Style → Layout → Paint → Render
//!                    ↓
//!              DisplayList
//! ```
//!
//! Painting knows nothing about pixels or windows. Whatever consumes the
//! [`DisplayList`] (the PNG renderer in `wombat-browser`, the CLI dumps)
//! decides how to draw each command and which ones are visible.

mod display_list;
mod painter;

pub use display_list::{DisplayCommand, DisplayList};
pub use painter::{PaintOptions, Painter};
