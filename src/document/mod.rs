//! # Certificate Document Model
//!
//! A single type hierarchy that is both the Rust API and the persisted JSON
//! form. [`TemplateDocument`] is constructible in Rust and round-trips
//! losslessly through [`TemplateDocument::to_bytes`] / [`from_bytes`],
//! including the name-role tag that drives per-participant substitution.
//!
//! ```
//! use laurel::document::{GraphicObject, TemplateDocument};
//! use laurel::document::types::{FieldRole, TextField};
//!
//! // Rust construction
//! let mut doc = TemplateDocument::new(1400, 990);
//! doc.push(GraphicObject::TextField(TextField {
//!     role: Some(FieldRole::Name),
//!     ..TextField::new("Participant Name")
//! }));
//!
//! // Round-trip through the persisted form
//! let bytes = doc.to_bytes().unwrap();
//! let back = TemplateDocument::from_bytes(&bytes).unwrap();
//! assert_eq!(doc, back);
//! ```
//!
//! [`from_bytes`]: TemplateDocument::from_bytes

pub mod resolve;
pub mod substitute;
pub mod types;

pub use resolve::ImageResolver;
pub use types::*;

use serde::{Deserialize, Serialize};

use crate::error::LaurelError;

/// Default canvas width in pixels.
pub const DEFAULT_CANVAS_WIDTH: u32 = 1400;
/// Default canvas height in pixels.
pub const DEFAULT_CANVAS_HEIGHT: u32 = 990;

fn default_canvas_width() -> u32 {
    DEFAULT_CANVAS_WIDTH
}

fn default_canvas_height() -> u32 {
    DEFAULT_CANVAS_HEIGHT
}

/// A single element on the certificate canvas.
///
/// Serialized with an explicit `type` tag:
/// `{"type": "text_field", "text": "CERTIFICATE", ...}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum GraphicObject {
    TextField(TextField),
    Image(Image),
    Line(Line),
}

impl GraphicObject {
    /// The text field carrying the name role, if this object is one.
    pub fn name_field(&self) -> Option<&TextField> {
        match self {
            GraphicObject::TextField(field) if field.is_name_field() => Some(field),
            _ => None,
        }
    }
}

/// A certificate design: canvas dimensions, an optional background image,
/// and an ordered sequence of graphic objects.
///
/// Object order is the z-order: later objects draw over earlier ones, and
/// the rasterizer preserves the stored sequence faithfully.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TemplateDocument {
    /// Canvas width in pixels. Shared by editor, rasterizer, and exporter.
    #[serde(default = "default_canvas_width")]
    pub width: u32,
    /// Canvas height in pixels.
    #[serde(default = "default_canvas_height")]
    pub height: u32,
    /// Background image, stretched to cover the canvas exactly.
    #[serde(default)]
    pub background: Option<ImageRef>,
    /// Graphic objects in z-order.
    #[serde(default)]
    pub objects: Vec<GraphicObject>,
}

impl Default for TemplateDocument {
    fn default() -> Self {
        Self::new(DEFAULT_CANVAS_WIDTH, DEFAULT_CANVAS_HEIGHT)
    }
}

impl TemplateDocument {
    /// Create an empty document with the given canvas dimensions.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            background: None,
            objects: Vec::new(),
        }
    }

    /// The seed design a fresh editing session starts from: a classic
    /// award layout with one name-role field, ready for substitution.
    ///
    /// No background is attached; callers set one from their blob store.
    pub fn starter() -> Self {
        let mut doc = Self::default();
        let center_x = (DEFAULT_CANVAS_WIDTH / 2) as f32 - 400.0;

        let heading = |text: &str, y: f32, size: f32, weight: FontWeight| {
            GraphicObject::TextField(TextField {
                x: center_x,
                y,
                font_size: size,
                weight,
                ..TextField::new(text)
            })
        };

        doc.push(heading("CERTIFICATE", 180.0, 70.0, FontWeight::Bold));
        doc.push(heading("Of Achievement", 250.0, 36.0, FontWeight::Normal));
        doc.push(heading(
            "This Certificate Is Proudly Presented To",
            380.0,
            26.0,
            FontWeight::Normal,
        ));
        doc.push(GraphicObject::TextField(TextField {
            x: center_x,
            y: 430.0,
            font_size: 60.0,
            weight: FontWeight::Bold,
            color: Color::rgb(0x8b, 0x6b, 0x2e),
            role: Some(FieldRole::Name),
            ..TextField::new("Participant Name")
        }));
        doc.push(heading(
            "Awarded for successfully completing the event and demonstrating \
             outstanding perseverance and spirit.",
            520.0,
            22.0,
            FontWeight::Normal,
        ));

        // Signature rules with labels underneath
        doc.push(GraphicObject::Line(Line::new(200.0, 705.0, 520.0, 705.0)));
        doc.push(GraphicObject::TextField(TextField {
            x: 160.0,
            y: 715.0,
            width: 400.0,
            font_size: 24.0,
            ..TextField::new("Date")
        }));
        doc.push(GraphicObject::Line(Line::new(880.0, 705.0, 1200.0, 705.0)));
        doc.push(GraphicObject::TextField(TextField {
            x: 840.0,
            y: 715.0,
            width: 400.0,
            font_size: 24.0,
            ..TextField::new("Signature")
        }));

        doc
    }

    /// Append an object on top of the existing z-order.
    pub fn push(&mut self, object: GraphicObject) {
        self.objects.push(object);
    }

    /// The first (contractually only) name-role field, if any.
    pub fn name_field(&self) -> Option<&TextField> {
        self.objects.iter().find_map(|o| o.name_field())
    }

    /// Number of objects carrying the name role.
    pub fn name_field_count(&self) -> usize {
        self.objects.iter().filter(|o| o.name_field().is_some()).count()
    }

    /// Reject documents whose tagging would make substitution ambiguous.
    ///
    /// At most one name-role field is allowed. Zero is legal: substitution
    /// is then a no-op and bulk export produces identical certificates.
    pub fn validate(&self) -> Result<(), LaurelError> {
        let tagged = self.name_field_count();
        if tagged > 1 {
            return Err(LaurelError::Validation(format!(
                "document has {} name-role fields; at most one is allowed",
                tagged
            )));
        }
        Ok(())
    }

    /// Serialize to the persisted JSON form. Lossless, including `role` tags.
    pub fn to_bytes(&self) -> Result<Vec<u8>, LaurelError> {
        serde_json::to_vec(self)
            .map_err(|e| LaurelError::Persistence(format!("failed to encode template: {}", e)))
    }

    /// Deserialize the persisted JSON form.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, LaurelError> {
        serde_json::from_slice(bytes)
            .map_err(|e| LaurelError::Persistence(format!("failed to decode template: {}", e)))
    }
}

/// One substituted, rendering-ready copy of a template.
///
/// Produced by [`substitute::substitute`]; exists only for the duration of a
/// single participant's render and is never persisted. The inner document is
/// an independent object graph: mutating it cannot affect the source
/// template or any sibling instance.
#[derive(Debug, Clone, PartialEq)]
pub struct DocumentInstance {
    document: TemplateDocument,
    participant: String,
}

impl DocumentInstance {
    pub(crate) fn new(document: TemplateDocument, participant: impl Into<String>) -> Self {
        Self {
            document,
            participant: participant.into(),
        }
    }

    pub fn document(&self) -> &TemplateDocument {
        &self.document
    }

    /// The literal participant name this instance was produced for.
    pub fn participant(&self) -> &str {
        &self.participant
    }
}
