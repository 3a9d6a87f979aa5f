//! Text field layout and glyph drawing.
//!
//! Fields are word-wrapped to their box width, aligned within it, and drawn
//! onto the canvas either as anti-aliased TTF glyphs or as scaled Spleen
//! bitmap glyphs when no system font is available.

use ab_glyph::{Font, FontArc, PxScale, ScaleFont};
use image::RgbImage;
use spleen_font::{FONT_12X24, PSF2Font};

use super::blend_pixel;
use super::font::LoadedFont;
use crate::document::types::{Color, FontWeight, TextAlign, TextField};

/// Spleen glyph cell dimensions.
const GLYPH_WIDTH: usize = 12;
const GLYPH_HEIGHT: usize = 24;

/// Draw a text field onto the canvas. `quality` is the raster multiplier;
/// every coordinate and the font size scale by it.
pub fn draw_text_field(canvas: &mut RgbImage, field: &TextField, font: &LoadedFont, quality: f32) {
    if field.text.is_empty() || field.font_size <= 0.0 {
        return;
    }
    let px = field.font_size * quality;
    let box_x = field.x * quality;
    let box_y = field.y * quality;
    let box_w = field.width * quality;

    match font {
        LoadedFont::Ttf(face) => draw_ttf(canvas, field, face, px, box_x, box_y, box_w),
        LoadedFont::Bitmap => draw_bitmap(canvas, field, px, box_x, box_y, box_w),
    }
}

/// Offset of a line's left edge within its box for the given alignment.
fn align_offset(align: TextAlign, box_w: f32, line_w: f32) -> f32 {
    match align {
        TextAlign::Left => 0.0,
        TextAlign::Center => ((box_w - line_w) / 2.0).max(0.0),
        TextAlign::Right => (box_w - line_w).max(0.0),
    }
}

/// Greedy word-wrap against a measuring function.
///
/// Explicit newlines start new lines; a single word wider than the box is
/// emitted as-is (text is never truncated).
fn wrap_lines(text: &str, max_width: f32, measure: &dyn Fn(&str) -> f32) -> Vec<String> {
    let mut lines = Vec::new();
    for paragraph in text.split('\n') {
        if paragraph.trim().is_empty() {
            lines.push(String::new());
            continue;
        }
        let mut current = String::new();
        for word in paragraph.split_whitespace() {
            let candidate = if current.is_empty() {
                word.to_string()
            } else {
                format!("{} {}", current, word)
            };
            if !current.is_empty() && measure(&candidate) > max_width {
                lines.push(current);
                current = word.to_string();
            } else {
                current = candidate;
            }
        }
        if !current.is_empty() {
            lines.push(current);
        }
    }
    lines
}

fn draw_ttf(
    canvas: &mut RgbImage,
    field: &TextField,
    font: &FontArc,
    px: f32,
    box_x: f32,
    box_y: f32,
    box_w: f32,
) {
    let scale = PxScale::from(px);
    let scaled = font.as_scaled(scale);
    let ascent = scaled.ascent();
    let line_height = ascent - scaled.descent() + scaled.line_gap();

    let measure = |line: &str| -> f32 {
        line.chars()
            .map(|ch| scaled.h_advance(font.glyph_id(ch)))
            .sum()
    };
    let lines = wrap_lines(&field.text, box_w, &measure);

    for (i, line) in lines.iter().enumerate() {
        let line_w = measure(line);
        let mut caret = box_x + align_offset(field.align, box_w, line_w);
        let baseline = box_y + ascent + i as f32 * line_height;

        for ch in line.chars() {
            let glyph_id = font.glyph_id(ch);
            let advance = scaled.h_advance(glyph_id);
            let glyph = glyph_id.with_scale_and_position(scale, ab_glyph::point(caret, baseline));

            if let Some(outlined) = font.outline_glyph(glyph) {
                let bounds = outlined.px_bounds();
                outlined.draw(|gx, gy, coverage| {
                    let x = gx as i32 + bounds.min.x as i32;
                    let y = gy as i32 + bounds.min.y as i32;
                    blend_pixel(canvas, x, y, field.color, coverage);
                });
            }
            caret += advance;
        }
    }
}

fn draw_bitmap(
    canvas: &mut RgbImage,
    field: &TextField,
    px: f32,
    box_x: f32,
    box_y: f32,
    box_w: f32,
) {
    let scale = px / GLYPH_HEIGHT as f32;
    let cell_w = GLYPH_WIDTH as f32 * scale;

    let measure = |line: &str| line.chars().count() as f32 * cell_w;
    let lines = wrap_lines(&field.text, box_w, &measure);

    // Double-strike fake bold, matching the bitmap font's lack of a bold face
    let bold_offset = if field.weight == FontWeight::Bold {
        scale.round().max(1.0) as i32
    } else {
        0
    };

    for (i, line) in lines.iter().enumerate() {
        let line_w = measure(line);
        let x0 = box_x + align_offset(field.align, box_w, line_w);
        let y0 = box_y + i as f32 * px;

        for (ci, ch) in line.chars().enumerate() {
            let glyph_x = x0 + ci as f32 * cell_w;
            draw_bitmap_glyph(canvas, ch, glyph_x, y0, scale, field.color);
            if bold_offset > 0 {
                draw_bitmap_glyph(canvas, ch, glyph_x + bold_offset as f32, y0, scale, field.color);
            }
        }
    }
}

/// Draw one Spleen glyph, nearest-neighbor scaled to the target cell.
fn draw_bitmap_glyph(canvas: &mut RgbImage, ch: char, x: f32, y: f32, scale: f32, color: Color) {
    let Ok(mut spleen) = PSF2Font::new(FONT_12X24) else {
        return;
    };
    let utf8 = ch.to_string();
    let Some(glyph) = spleen.glyph_for_utf8(utf8.as_bytes()) else {
        return;
    };

    let mut bitmap = [[false; GLYPH_WIDTH]; GLYPH_HEIGHT];
    for (row_y, row) in glyph.enumerate() {
        for (col_x, on) in row.enumerate() {
            if row_y < GLYPH_HEIGHT && col_x < GLYPH_WIDTH {
                bitmap[row_y][col_x] = on;
            }
        }
    }

    let target_w = (GLYPH_WIDTH as f32 * scale).ceil() as i32;
    let target_h = (GLYPH_HEIGHT as f32 * scale).ceil() as i32;
    let origin_x = x.round() as i32;
    let origin_y = y.round() as i32;

    for dy in 0..target_h {
        for dx in 0..target_w {
            let sx = (dx as f32 / scale) as usize;
            let sy = (dy as f32 / scale) as usize;
            if sx < GLYPH_WIDTH && sy < GLYPH_HEIGHT && bitmap[sy][sx] {
                blend_pixel(canvas, origin_x + dx, origin_y + dy, color, 1.0);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;

    fn char_count_measure(line: &str) -> f32 {
        line.chars().count() as f32
    }

    #[test]
    fn wrap_keeps_short_text_on_one_line() {
        let lines = wrap_lines("hello world", 100.0, &char_count_measure);
        assert_eq!(lines, vec!["hello world"]);
    }

    #[test]
    fn wrap_breaks_at_box_width() {
        // 8 units per line: "aaa bbb" fits, adding "ccc" would not
        let lines = wrap_lines("aaa bbb ccc", 8.0, &char_count_measure);
        assert_eq!(lines, vec!["aaa bbb", "ccc"]);
    }

    #[test]
    fn wrap_never_truncates_oversized_words() {
        let lines = wrap_lines("extraordinarily", 3.0, &char_count_measure);
        assert_eq!(lines, vec!["extraordinarily"]);
    }

    #[test]
    fn wrap_honors_explicit_newlines() {
        let lines = wrap_lines("one\ntwo", 100.0, &char_count_measure);
        assert_eq!(lines, vec!["one", "two"]);
    }

    #[test]
    fn align_offsets() {
        assert_eq!(align_offset(TextAlign::Left, 100.0, 40.0), 0.0);
        assert_eq!(align_offset(TextAlign::Center, 100.0, 40.0), 30.0);
        assert_eq!(align_offset(TextAlign::Right, 100.0, 40.0), 60.0);
        // lines wider than the box never get a negative offset
        assert_eq!(align_offset(TextAlign::Center, 100.0, 120.0), 0.0);
    }

    #[test]
    fn bitmap_glyphs_leave_ink_on_the_canvas() {
        let mut canvas = RgbImage::from_pixel(120, 60, Rgb([255, 255, 255]));
        let field = TextField {
            x: 0.0,
            y: 0.0,
            width: 120.0,
            font_size: 24.0,
            ..TextField::new("A")
        };
        draw_text_field(&mut canvas, &field, &LoadedFont::Bitmap, 1.0);
        let inked = canvas.pixels().filter(|p| p.0 != [255, 255, 255]).count();
        assert!(inked > 0, "expected glyph pixels on the canvas");
    }

    #[test]
    fn centered_text_lands_around_the_box_center() {
        let mut canvas = RgbImage::from_pixel(200, 40, Rgb([255, 255, 255]));
        let field = TextField {
            x: 0.0,
            y: 0.0,
            width: 200.0,
            font_size: 24.0,
            align: TextAlign::Center,
            ..TextField::new("AB")
        };
        draw_text_field(&mut canvas, &field, &LoadedFont::Bitmap, 1.0);

        let inked_xs: Vec<u32> = canvas
            .enumerate_pixels()
            .filter(|(_, _, p)| p.0 != [255, 255, 255])
            .map(|(x, _, _)| x)
            .collect();
        let min = *inked_xs.iter().min().unwrap();
        let max = *inked_xs.iter().max().unwrap();
        // two 12px cells centered in 200px → ink between x=88 and x=112
        assert!(min >= 80 && max <= 120, "ink spans {}..{}", min, max);
    }
}
