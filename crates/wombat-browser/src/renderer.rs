//! Software renderer for headless screenshots.
//!
//! Executes a [`DisplayList`] into an RGBA image using fontdue for glyphs.
//!
//! ```text
//! Style → Layout → Paint → Render
//!                    ↓        ↓
//!              DisplayList → Pixels
//! ```
//!
//! The renderer knows nothing about CSS, layout or the DOM. It draws the
//! commands that reach into the visible band, shifted up by the scroll
//! offset.

use std::path::Path;

use anyhow::Result;
use image::{ImageBuffer, Rgba, RgbaImage};
use wombat_common::warning::warn_once;
use wombat_css::{DisplayCommand, DisplayList, FontKey, Rect};

use crate::font_metrics::SystemFonts;

const WHITE: Rgba<u8> = Rgba([255, 255, 255, 255]);
const BLACK: Rgba<u8> = Rgba([0, 0, 0, 255]);

/// Named colours the renderer understands, besides `#rgb` and `#rrggbb`.
const NAMED_COLORS: &[(&str, [u8; 3])] = &[
    ("black", [0, 0, 0]),
    ("white", [255, 255, 255]),
    ("red", [255, 0, 0]),
    ("green", [0, 128, 0]),
    ("blue", [0, 0, 255]),
    ("yellow", [255, 255, 0]),
    ("orange", [255, 165, 0]),
    ("purple", [128, 0, 128]),
    ("gray", [128, 128, 128]),
    ("grey", [128, 128, 128]),
    ("lightgray", [211, 211, 211]),
    ("lightgrey", [211, 211, 211]),
    ("darkgray", [169, 169, 169]),
    ("darkgrey", [169, 169, 169]),
    ("silver", [192, 192, 192]),
    ("maroon", [128, 0, 0]),
    ("navy", [0, 0, 128]),
    ("teal", [0, 128, 128]),
    ("olive", [128, 128, 0]),
    ("lime", [0, 255, 0]),
    ("aqua", [0, 255, 255]),
    ("cyan", [0, 255, 255]),
    ("fuchsia", [255, 0, 255]),
    ("magenta", [255, 0, 255]),
    ("brown", [165, 42, 42]),
    ("pink", [255, 192, 203]),
];

/// Parse a colour value: a name from a small table, `#rgb` or `#rrggbb`.
#[must_use]
pub fn parse_color(value: &str) -> Option<Rgba<u8>> {
    let value = value.trim();
    if let Some(hex) = value.strip_prefix('#') {
        return parse_hex(hex);
    }
    NAMED_COLORS
        .iter()
        .find(|(name, _)| name.eq_ignore_ascii_case(value))
        .map(|&(_, [r, g, b])| Rgba([r, g, b, 255]))
}

fn parse_hex(hex: &str) -> Option<Rgba<u8>> {
    if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }
    let channel = |s: &str| u8::from_str_radix(s, 16).ok();
    match hex.len() {
        3 => Some(Rgba([
            channel(&hex[0..1])? * 17,
            channel(&hex[1..2])? * 17,
            channel(&hex[2..3])? * 17,
            255,
        ])),
        6 => Some(Rgba([
            channel(&hex[0..2])?,
            channel(&hex[2..4])?,
            channel(&hex[4..6])?,
            255,
        ])),
        _ => None,
    }
}

fn color_or_black(value: &str) -> Rgba<u8> {
    parse_color(value).unwrap_or_else(|| {
        warn_once("Renderer", &format!("unknown color '{value}', using black"));
        BLACK
    })
}

/// Draws display lists into a fixed-size RGBA buffer.
pub struct Renderer<'a> {
    buffer: RgbaImage,
    width: u32,
    height: u32,
    fonts: Option<&'a SystemFonts>,
}

impl<'a> Renderer<'a> {
    /// Create a white canvas. Without fonts, text commands are skipped.
    #[must_use]
    pub fn new(width: u32, height: u32, fonts: Option<&'a SystemFonts>) -> Self {
        Self {
            buffer: ImageBuffer::from_pixel(width, height, WHITE),
            width,
            height,
            fonts,
        }
    }

    /// Draw the commands visible with the page scrolled down by `scroll`
    /// pixels, back to front.
    pub fn render(&mut self, display_list: &DisplayList, scroll: f32) {
        for command in display_list.visible(scroll, self.height as f32) {
            self.execute_command(command, scroll);
        }
    }

    fn execute_command(&mut self, command: &DisplayCommand, scroll: f32) {
        match command {
            DisplayCommand::Text {
                x,
                y,
                text,
                font,
                color,
                ..
            } => self.draw_text(text, *x, *y - scroll, font, color_or_black(color)),
            DisplayCommand::Rect { rect, color } => {
                self.fill_rect(shifted(rect, scroll), color_or_black(color));
            }
            DisplayCommand::Line {
                x1,
                y1,
                x2,
                y2,
                color,
                thickness,
                ..
            } => self.draw_line(
                (*x1, *y1 - scroll),
                (*x2, *y2 - scroll),
                *thickness,
                color_or_black(color),
            ),
            DisplayCommand::Outline {
                rect,
                color,
                thickness,
            } => self.stroke_rect(shifted(rect, scroll), *thickness, color_or_black(color)),
        }
    }

    /// Fill a rectangle, clipped to the canvas.
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    fn fill_rect(&mut self, rect: Rect, color: Rgba<u8>) {
        let clamp_x = |v: f32| v.round().clamp(0.0, self.width as f32) as u32;
        let clamp_y = |v: f32| v.round().clamp(0.0, self.height as f32) as u32;
        let (left, right) = (clamp_x(rect.left), clamp_x(rect.right));
        let (top, bottom) = (clamp_y(rect.top), clamp_y(rect.bottom));

        for py in top..bottom {
            for px in left..right {
                self.blend_pixel(px, py, color);
            }
        }
    }

    fn stroke_rect(&mut self, rect: Rect, thickness: f32, color: Rgba<u8>) {
        let Rect {
            left,
            top,
            right,
            bottom,
        } = rect;
        self.fill_rect(Rect::new(left, top, right, top + thickness), color);
        self.fill_rect(Rect::new(left, bottom - thickness, right, bottom), color);
        self.fill_rect(Rect::new(left, top, left + thickness, bottom), color);
        self.fill_rect(Rect::new(right - thickness, top, right, bottom), color);
    }

    /// Stroke a line by stamping a `thickness`-sized square along it.
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    fn draw_line(&mut self, from: (f32, f32), to: (f32, f32), thickness: f32, color: Rgba<u8>) {
        let (dx, dy) = (to.0 - from.0, to.1 - from.1);
        let steps = dx.abs().max(dy.abs()).ceil().max(1.0) as u32;
        for step in 0..=steps {
            let t = step as f32 / steps as f32;
            let x = dx.mul_add(t, from.0);
            let y = dy.mul_add(t, from.1);
            self.fill_rect(Rect::new(x, y, x + thickness, y + thickness), color);
        }
    }

    /// Draw a word with its top-left corner at `(x, y)`.
    #[allow(
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss,
        clippy::cast_possible_wrap
    )]
    fn draw_text(&mut self, text: &str, x: f32, y: f32, font: &FontKey, color: Rgba<u8>) {
        let Some(fonts) = self.fonts else {
            return;
        };
        let face = fonts.face(font);
        let px = font.pixel_size();
        let ascent = face
            .horizontal_line_metrics(px)
            .map_or(px * 0.8, |line| line.ascent);
        let baseline = (y + ascent).round() as i32;

        let mut cursor_x = x;
        for ch in text.chars().filter(|ch| !ch.is_control()) {
            let (metrics, bitmap) = face.rasterize(ch, px);
            let glyph_x = cursor_x.round() as i32 + metrics.xmin;
            let glyph_y = baseline - metrics.ymin - metrics.height as i32;

            for gy in 0..metrics.height {
                for gx in 0..metrics.width {
                    let coverage = bitmap[gy * metrics.width + gx];
                    let tx = glyph_x + gx as i32;
                    let ty = glyph_y + gy as i32;
                    if coverage == 0 || tx < 0 || ty < 0 {
                        continue;
                    }
                    let mut glyph_color = color;
                    glyph_color[3] = coverage;
                    self.blend_pixel(tx as u32, ty as u32, glyph_color);
                }
            }
            cursor_x += metrics.advance_width;
        }
    }

    fn blend_pixel(&mut self, x: u32, y: u32, color: Rgba<u8>) {
        if x >= self.width || y >= self.height {
            return;
        }
        let blended = match color[3] {
            255 => color,
            alpha => alpha_blend(color, *self.buffer.get_pixel(x, y), alpha),
        };
        self.buffer.put_pixel(x, y, blended);
    }

    /// The rendered pixels.
    #[must_use]
    pub const fn image(&self) -> &RgbaImage {
        &self.buffer
    }

    /// Save the rendered image; the format follows the file extension.
    ///
    /// # Errors
    ///
    /// Returns an error if the image cannot be saved to the given path.
    pub fn save(&self, path: &Path) -> Result<()> {
        self.buffer.save(path).map_err(|e| {
            anyhow::anyhow!("failed to save screenshot to '{}': {e}", path.display())
        })
    }
}

fn shifted(rect: &Rect, scroll: f32) -> Rect {
    Rect::new(rect.left, rect.top - scroll, rect.right, rect.bottom - scroll)
}

/// Alpha blend a foreground colour onto a background colour.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn alpha_blend(fg: Rgba<u8>, bg: Rgba<u8>, alpha: u8) -> Rgba<u8> {
    let a = f32::from(alpha) / 255.0;
    let inv_a = 1.0 - a;
    Rgba([
        f32::from(fg[0]).mul_add(a, f32::from(bg[0]) * inv_a) as u8,
        f32::from(fg[1]).mul_add(a, f32::from(bg[1]) * inv_a) as u8,
        f32::from(fg[2]).mul_add(a, f32::from(bg[2]) * inv_a) as u8,
        255,
    ])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_color() {
        assert_eq!(parse_color("red"), Some(Rgba([255, 0, 0, 255])));
        assert_eq!(parse_color("LightGray"), Some(Rgba([211, 211, 211, 255])));
        assert_eq!(parse_color("#0f8"), Some(Rgba([0, 255, 136, 255])));
        assert_eq!(parse_color("#102030"), Some(Rgba([16, 32, 48, 255])));
        assert_eq!(parse_color("#12"), None);
        assert_eq!(parse_color("#gggggg"), None);
        assert_eq!(parse_color("transparent"), None);
    }

    #[test]
    fn test_alpha_blend() {
        assert_eq!(alpha_blend(BLACK, WHITE, 255), Rgba([0, 0, 0, 255]));
        assert_eq!(alpha_blend(BLACK, WHITE, 0), WHITE);
    }

    #[test]
    fn test_fill_rect_is_clipped_and_scrolled() {
        let mut list = DisplayList::new();
        list.push(DisplayCommand::Rect {
            rect: Rect::new(-5.0, 110.0, 4.0, 112.0),
            color: "blue".to_string(),
        });
        let mut renderer = Renderer::new(10, 10, None);
        renderer.render(&list, 105.0);

        let image = renderer.image();
        assert_eq!(*image.get_pixel(0, 5), Rgba([0, 0, 255, 255]));
        assert_eq!(*image.get_pixel(3, 6), Rgba([0, 0, 255, 255]));
        assert_eq!(*image.get_pixel(4, 5), WHITE);
        assert_eq!(*image.get_pixel(0, 7), WHITE);
    }

    #[test]
    fn test_offscreen_commands_are_skipped() {
        let mut list = DisplayList::new();
        list.push(DisplayCommand::Rect {
            rect: Rect::new(0.0, 0.0, 10.0, 10.0),
            color: "red".to_string(),
        });
        let mut renderer = Renderer::new(10, 10, None);
        renderer.render(&list, 50.0);
        assert!(renderer.image().pixels().all(|p| *p == WHITE));
    }
}
