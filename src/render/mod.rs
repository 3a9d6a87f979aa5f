//! # Rasterization
//!
//! Turns a substituted [`DocumentInstance`] into a pixel image at the
//! document's canvas size times an integer quality multiplier.
//!
//! The multiplier is a pure pixel-density knob: every coordinate, font size,
//! stroke width and image placement scales by the same factor, so relative
//! layout is invariant. Rendering at quality 2 yields exactly double the
//! pixel dimensions of quality 1 with the same composition.
//!
//! Objects draw strictly in document order: the stored sequence is the
//! z-order, and later objects draw over earlier ones.

pub mod font;
mod text;

pub use font::{FontLibrary, LoadedFont};

use std::sync::Arc;

use image::imageops::{self, FilterType};
use image::{Rgb, RgbImage};

use crate::document::types::{Color, Line};
use crate::document::{DocumentInstance, GraphicObject};
use crate::error::LaurelError;

/// Renders document instances to RGB rasters.
///
/// Cheap to clone: the font library is shared behind an `Arc`.
#[derive(Clone)]
pub struct Rasterizer {
    fonts: Arc<FontLibrary>,
}

impl Rasterizer {
    pub fn new(fonts: Arc<FontLibrary>) -> Self {
        Self { fonts }
    }

    /// Render the instance at the given quality multiplier (≥ 1).
    ///
    /// Requires every image source in the document to have been resolved
    /// (see [`crate::document::resolve::ImageResolver`]); an unresolved
    /// slot is a render error, never a silently skipped object.
    pub fn rasterize(
        &self,
        instance: &DocumentInstance,
        quality: u32,
    ) -> Result<RgbImage, LaurelError> {
        if quality == 0 {
            return Err(LaurelError::Validation(
                "quality multiplier must be at least 1".into(),
            ));
        }
        let doc = instance.document();
        if doc.width == 0 || doc.height == 0 {
            return Err(LaurelError::Validation(
                "canvas dimensions must be non-zero".into(),
            ));
        }

        let q = quality as f32;
        let out_w = doc.width * quality;
        let out_h = doc.height * quality;
        let mut canvas = RgbImage::from_pixel(out_w, out_h, Rgb([255, 255, 255]));

        if let Some(background) = &doc.background {
            let source = background.resolved.as_ref().ok_or_else(|| {
                LaurelError::Render(format!(
                    "background '{}' has not been resolved",
                    background.source
                ))
            })?;
            // Stretched to cover the canvas exactly, like the editor shows it
            let scaled = source.resize_exact(out_w, out_h, FilterType::Lanczos3).to_rgb8();
            imageops::overlay(&mut canvas, &scaled, 0, 0);
        }

        for object in &doc.objects {
            match object {
                GraphicObject::TextField(field) => {
                    let face = self.fonts.get(field.font, field.weight);
                    text::draw_text_field(&mut canvas, field, &face, q);
                }
                GraphicObject::Image(img) => {
                    let source = img.resolved.as_ref().ok_or_else(|| {
                        LaurelError::Render(format!(
                            "image '{}' has not been resolved",
                            img.source
                        ))
                    })?;
                    let w = (source.width() as f32 * img.scale * q).round().max(1.0) as u32;
                    let h = (source.height() as f32 * img.scale * q).round().max(1.0) as u32;
                    let scaled = source.resize_exact(w, h, FilterType::Lanczos3).to_rgb8();
                    imageops::overlay(
                        &mut canvas,
                        &scaled,
                        (img.x * q).round() as i64,
                        (img.y * q).round() as i64,
                    );
                }
                GraphicObject::Line(line) => draw_line(&mut canvas, line, q),
            }
        }

        Ok(canvas)
    }
}

/// Blend `color` into the canvas pixel at (x, y) with the given coverage.
pub(crate) fn blend_pixel(canvas: &mut RgbImage, x: i32, y: i32, color: Color, coverage: f32) {
    if coverage <= 0.0 || x < 0 || y < 0 || x as u32 >= canvas.width() || y as u32 >= canvas.height()
    {
        return;
    }
    let cov = coverage.min(1.0);
    let src = [color.r, color.g, color.b];
    let px = canvas.get_pixel_mut(x as u32, y as u32);
    for c in 0..3 {
        px.0[c] = (px.0[c] as f32 * (1.0 - cov) + src[c] as f32 * cov).round() as u8;
    }
}

/// Anti-aliased edge falloff: full coverage inside the half-thickness,
/// a linear ramp of `aa_width` pixels outside it.
fn aa_edge(dist: f32, half_thickness: f32, aa_width: f32) -> f32 {
    if dist < half_thickness {
        1.0
    } else if dist < half_thickness + aa_width {
        1.0 - (dist - half_thickness) / aa_width
    } else {
        0.0
    }
}

/// Distance from a point to a line segment.
fn dist_to_segment(px: f32, py: f32, x1: f32, y1: f32, x2: f32, y2: f32) -> f32 {
    let dx = x2 - x1;
    let dy = y2 - y1;
    let len_sq = dx * dx + dy * dy;
    let t = if len_sq == 0.0 {
        0.0
    } else {
        (((px - x1) * dx + (py - y1) * dy) / len_sq).clamp(0.0, 1.0)
    };
    let cx = x1 + t * dx;
    let cy = y1 + t * dy;
    ((px - cx) * (px - cx) + (py - cy) * (py - cy)).sqrt()
}

fn draw_line(canvas: &mut RgbImage, line: &Line, q: f32) {
    let (x1, y1, x2, y2) = (line.x1 * q, line.y1 * q, line.x2 * q, line.y2 * q);
    let half = (line.stroke_width * q / 2.0).max(0.5);
    let pad = half + 1.5;

    let min_x = ((x1.min(x2) - pad).floor() as i32).max(0);
    let max_x = ((x1.max(x2) + pad).ceil() as i32).min(canvas.width() as i32 - 1);
    let min_y = ((y1.min(y2) - pad).floor() as i32).max(0);
    let max_y = ((y1.max(y2) + pad).ceil() as i32).min(canvas.height() as i32 - 1);

    for y in min_y..=max_y {
        for x in min_x..=max_x {
            let dist = dist_to_segment(x as f32 + 0.5, y as f32 + 0.5, x1, y1, x2, y2);
            let coverage = aa_edge(dist, half, 1.0);
            blend_pixel(canvas, x, y, line.color, coverage);
        }
    }
}
