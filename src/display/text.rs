//! Bitmap text rendering
//!
//! 8x8 glyphs from `font8x8`, drawn straight into a pixel buffer with an
//! integer scale factor. Pixels outside the buffer are clipped.

use std::num::NonZeroU32;

use font8x8::{UnicodeFonts, BASIC_FONTS};

use super::pixel::Pixel;
use super::PixelBuffer;
use crate::growable::GrowableBuffer;

pub const GLYPH_WIDTH: u32 = 8;
pub const GLYPH_HEIGHT: u32 = 8;

/// Where one character lands, in buffer pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GlyphPlacement {
    pub ch: char,
    pub x: i64,
    pub y: i64,
}

/// Position every character of `text`; `\n` starts a new line at `x`
pub fn layout_text(text: &str, x: i32, y: i32, scale: NonZeroU32) -> GrowableBuffer<GlyphPlacement> {
    let advance = i64::from(GLYPH_WIDTH) * i64::from(scale.get());
    let line_height = i64::from(GLYPH_HEIGHT) * i64::from(scale.get());

    let mut placements = GrowableBuffer::new();
    let mut cx = i64::from(x);
    let mut cy = i64::from(y);
    for ch in text.chars() {
        if ch == '\n' {
            cx = i64::from(x);
            cy = cy.saturating_add(line_height);
            continue;
        }
        placements.push(GlyphPlacement { ch, x: cx, y: cy });
        cx = cx.saturating_add(advance);
    }
    placements
}

/// Rows of the glyph for `ch`, bit 0 is the leftmost column.
/// Unknown characters render as a hollow box.
fn glyph_rows(ch: char) -> [u8; 8] {
    BASIC_FONTS
        .get(ch)
        .unwrap_or([0xFF, 0x81, 0x81, 0x81, 0x81, 0x81, 0x81, 0xFF])
}

/// Intersect `[start, start + len)` with `[0, limit)`
fn clip_span(start: i64, len: i64, limit: u32) -> Option<(i64, i64)> {
    let lo = start.max(0);
    let hi = start.saturating_add(len).min(i64::from(limit));
    (lo < hi).then_some((lo, hi))
}

fn draw_glyph(buffer: &mut PixelBuffer, glyph: &GlyphPlacement, color: Pixel, scale: i64) -> usize {
    let (width, height) = buffer.size();
    let mut written = 0;
    for (row, bits) in glyph_rows(glyph.ch).iter().enumerate() {
        let py = glyph.y.saturating_add(row as i64 * scale);
        let Some((y0, y1)) = clip_span(py, scale, height) else {
            continue;
        };
        for col in 0..GLYPH_WIDTH as i64 {
            if bits & (1 << col) == 0 {
                continue;
            }
            let px = glyph.x.saturating_add(col * scale);
            let Some((x0, x1)) = clip_span(px, scale, width) else {
                continue;
            };
            for y in y0..y1 {
                for x in x0..x1 {
                    if buffer.put_clipped(x, y, color) {
                        written += 1;
                    }
                }
            }
        }
    }
    written
}

/// Draw `text` with its top-left corner at (x, y). Returns the number of pixels written.
pub fn print(
    buffer: &mut PixelBuffer,
    text: &str,
    x: i32,
    y: i32,
    color: Pixel,
    scale: NonZeroU32,
) -> usize {
    let placements = layout_text(text, x, y, scale);
    let scale = i64::from(scale.get());
    placements
        .iter()
        .map(|glyph| draw_glyph(buffer, glyph, color, scale))
        .sum()
}
