//! 8x8 bitmap text for the chrome's labels.
//!
//! Glyphs come from `font8x8`'s legacy ASCII table: rows top to bottom,
//! bit 0 is the leftmost column. Anything outside ASCII renders as `?`.

use artworks::{Canvas, Color};
use font8x8::legacy::BASIC_LEGACY;

pub const GLYPH_WIDTH: u32 = 8;
pub const GLYPH_HEIGHT: u32 = 8;

fn glyph(ch: char) -> [u8; 8] {
    let index = ch as usize;
    if index < BASIC_LEGACY.len() {
        BASIC_LEGACY[index]
    } else {
        BASIC_LEGACY[b'?' as usize]
    }
}

/// Width in pixels of `text` drawn at `scale`.
pub fn text_width(text: &str, scale: u32) -> u32 {
    text.chars().count() as u32 * GLYPH_WIDTH * scale.max(1)
}

/// Draws `text` with its top-left corner at `(x, y)`; returns the width
/// drawn.
pub fn draw_text(canvas: &mut Canvas, x: f32, y: f32, text: &str, scale: u32, color: Color) -> u32 {
    let scale = scale.max(1);
    let size = scale as f32;
    let mut pen = x;
    for ch in text.chars() {
        for (row, bits) in glyph(ch).iter().enumerate() {
            for col in 0..GLYPH_WIDTH {
                if bits & (1 << col) != 0 {
                    canvas.fill_rect(
                        pen + col as f32 * size,
                        y + row as f32 * size,
                        size,
                        size,
                        color,
                    );
                }
            }
        }
        pen += (GLYPH_WIDTH * scale) as f32;
    }
    text_width(text, scale)
}

/// Longest prefix of `text` that fits in `max_width`, with a trailing `..`
/// when shortened.
pub fn fit(text: &str, scale: u32, max_width: u32) -> String {
    if text_width(text, scale) <= max_width {
        return text.to_string();
    }
    let mut out = String::new();
    for ch in text.chars() {
        out.push(ch);
        if text_width(&format!("{out}.."), scale) > max_width {
            out.pop();
            break;
        }
    }
    out.push_str("..");
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn widths_scale_with_glyph_count() {
        assert_eq!(text_width("", 2), 0);
        assert_eq!(text_width("A", 1), 8);
        assert_eq!(text_width("2D", 1), 16);
        assert_eq!(text_width("2D", 2), 32);
    }

    #[test]
    fn non_ascii_falls_back_to_question_mark() {
        assert_eq!(glyph('é'), glyph('?'));
        assert_ne!(glyph('k'), glyph('K'));
        assert_eq!(glyph(' '), [0; 8]);
    }

    #[test]
    fn draws_lit_pixels() {
        let mut canvas = Canvas::new(20, 10).unwrap();
        let width = draw_text(&mut canvas, 1.0, 1.0, "I", 1, Color::WHITE);
        assert_eq!(width, 8);
        canvas.flush();
        // Left half of the I stem, one row below the serif.
        assert_eq!(canvas.pixel(3, 4), Some(Color::WHITE));
        assert_eq!(canvas.pixel(1, 4), Some(Color::VOID));
    }

    #[test]
    fn fit_shortens_long_labels() {
        assert_eq!(fit("Zen", 1, 100), "Zen");
        let short = fit("Interactive Ripples", 1, 80);
        assert!(short.ends_with(".."));
        assert!(text_width(&short, 1) <= 80);
    }
}
