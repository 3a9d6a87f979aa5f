//! Graphic object types for the certificate document model.
//!
//! All types derive `Serialize + Deserialize` so the same types work for
//! both Rust API construction and JSON persistence. The `role` tag on
//! [`TextField`] is application metadata, not a canvas property, and is
//! always serialized: losing it on a round-trip would break name
//! substitution for every future load of that template.

use image::DynamicImage;
use serde::{Deserialize, Serialize};

// ============================================================================
// STYLE PRIMITIVES
// ============================================================================

/// RGB color, serialized as a `#rrggbb` hex string.
///
/// Accepts `#rgb` shorthand on input (each digit doubled, CSS-style).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const BLACK: Color = Color { r: 0, g: 0, b: 0 };

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parse a `#rrggbb` or `#rgb` hex string.
    pub fn from_hex(s: &str) -> Option<Color> {
        let hex = s.strip_prefix('#')?;
        if !hex.is_ascii() {
            return None;
        }
        match hex.len() {
            3 => {
                let mut digits = hex.chars().map(|c| c.to_digit(16));
                let (r, g, b) = (digits.next()??, digits.next()??, digits.next()??);
                // #abc expands to #aabbcc
                Some(Color::rgb((r * 17) as u8, (g * 17) as u8, (b * 17) as u8))
            }
            6 => {
                let byte = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
                Some(Color::rgb(byte(0)?, byte(2)?, byte(4)?))
            }
            _ => None,
        }
    }

    pub fn to_hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

impl Default for Color {
    fn default() -> Self {
        Color::BLACK
    }
}

impl Serialize for Color {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for Color {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Color::from_hex(&s)
            .ok_or_else(|| serde::de::Error::custom(format!("invalid color '{}'", s)))
    }
}

/// Generic font family, resolved to a concrete face at render time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FontFamily {
    #[default]
    Serif,
    SansSerif,
    Monospace,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FontWeight {
    #[default]
    Normal,
    Bold,
}

/// Horizontal alignment of text within its field box.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TextAlign {
    Left,
    #[default]
    Center,
    Right,
}

/// Substitution role marker for text fields.
///
/// A single variant today; an explicit enum (rather than a bare bool or a
/// free-form string) keeps the serialized form stable and exhaustive
/// matching possible if more roles ever appear.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldRole {
    /// The one field whose text is replaced per participant during export.
    Name,
}

// ============================================================================
// GRAPHIC OBJECTS
// ============================================================================

fn default_text_width() -> f32 {
    800.0
}

fn default_font_size() -> f32 {
    24.0
}

/// A wrapping text box placed on the canvas.
///
/// `x`/`y` is the top-left corner of the box; `width` is the wrap and
/// alignment width. Text longer than the box wraps onto further lines; it is
/// never truncated or re-fitted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextField {
    pub text: String,
    #[serde(default)]
    pub x: f32,
    #[serde(default)]
    pub y: f32,
    /// Wrap/alignment box width. Default: 800.
    #[serde(default = "default_text_width")]
    pub width: f32,
    /// Font size in canvas pixels. Default: 24.
    #[serde(default = "default_font_size")]
    pub font_size: f32,
    #[serde(default)]
    pub font: FontFamily,
    #[serde(default)]
    pub color: Color,
    #[serde(default)]
    pub weight: FontWeight,
    #[serde(default)]
    pub align: TextAlign,
    /// Substitution role. `Some(Name)` marks the single field whose text is
    /// replaced per participant during bulk export.
    #[serde(default)]
    pub role: Option<FieldRole>,
}

impl Default for TextField {
    fn default() -> Self {
        Self {
            text: String::new(),
            x: 0.0,
            y: 0.0,
            width: default_text_width(),
            font_size: default_font_size(),
            font: FontFamily::default(),
            color: Color::default(),
            weight: FontWeight::default(),
            align: TextAlign::default(),
            role: None,
        }
    }
}

impl TextField {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Default::default()
        }
    }

    pub fn is_name_field(&self) -> bool {
        self.role == Some(FieldRole::Name)
    }
}

fn default_image_scale() -> f32 {
    1.0
}

/// An image placed on the canvas.
///
/// `scale` multiplies the decoded image's natural size. The `resolved` slot
/// is populated by [`crate::document::resolve::ImageResolver`] before
/// rendering and is never serialized.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Image {
    /// Blob-store key or filesystem path of the image.
    pub source: String,
    #[serde(default)]
    pub x: f32,
    #[serde(default)]
    pub y: f32,
    /// Uniform scale applied to the natural size. Default: 1.0.
    #[serde(default = "default_image_scale")]
    pub scale: f32,
    /// Decoded pixels, populated by the resolver. Transient.
    #[serde(skip)]
    pub resolved: Option<DynamicImage>,
}

impl Image {
    pub fn new(source: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            x: 0.0,
            y: 0.0,
            scale: default_image_scale(),
            resolved: None,
        }
    }
}

// Equality ignores the transient decoded pixels: two placements are the same
// placement whether or not either has been resolved yet.
impl PartialEq for Image {
    fn eq(&self, other: &Self) -> bool {
        self.source == other.source
            && self.x == other.x
            && self.y == other.y
            && self.scale == other.scale
    }
}

fn default_stroke_width() -> f32 {
    2.0
}

/// A straight stroke between two points.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Line {
    pub x1: f32,
    pub y1: f32,
    pub x2: f32,
    pub y2: f32,
    /// Stroke thickness in canvas pixels. Default: 2.
    #[serde(default = "default_stroke_width")]
    pub stroke_width: f32,
    #[serde(default)]
    pub color: Color,
}

impl Line {
    pub fn new(x1: f32, y1: f32, x2: f32, y2: f32) -> Self {
        Self {
            x1,
            y1,
            x2,
            y2,
            stroke_width: default_stroke_width(),
            color: Color::default(),
        }
    }
}

/// Background image reference: a blob-store key plus its decoded pixels.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImageRef {
    pub source: String,
    /// Decoded pixels, populated by the resolver. Transient.
    #[serde(skip)]
    pub resolved: Option<DynamicImage>,
}

impl ImageRef {
    pub fn new(source: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            resolved: None,
        }
    }
}

impl PartialEq for ImageRef {
    fn eq(&self, other: &Self) -> bool {
        self.source == other.source
    }
}
