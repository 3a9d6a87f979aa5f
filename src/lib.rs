//! # Laurel - Certificate Template & Bulk PDF Export
//!
//! Laurel is the rendering core of a certificate-design tool. A design is a
//! [`TemplateDocument`]: a fixed-size canvas with a background image and an
//! ordered stack of text fields, images, and strokes, one text field tagged
//! as the per-participant name slot. Laurel provides:
//!
//! - **Template model**: lossless JSON round-trips, including the name tag
//! - **Template store**: durable named persistence, last-write-wins
//! - **Substitution**: template + participant name → independent instance
//! - **Rasterization**: pixel rendering with an integer quality multiplier
//! - **Export**: single-page PDFs, zipped when a batch has many names
//!
//! ## Quick Start
//!
//! ```no_run
//! use std::sync::Arc;
//! use laurel::{BatchExporter, FontLibrary, ImageResolver, TemplateStore};
//!
//! # async fn example() -> Result<(), laurel::LaurelError> {
//! // Load a saved design
//! let store = TemplateStore::open("templates.json")?;
//! let template = store.fetch("Kalsubai")?;
//!
//! // One PDF per participant; many participants produce a ZIP
//! let exporter = BatchExporter::new(
//!     ImageResolver::new("backgrounds"),
//!     Arc::new(FontLibrary::new()),
//! );
//! let names = vec!["Alice".to_string(), "Bob".to_string()];
//! let output = exporter.run(&template, &names).await?;
//! std::fs::write(output.file_name(), output.bytes())?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Module Overview
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`document`] | Template model, substitution, image resolution |
//! | [`store`] | Durable template and background persistence |
//! | [`render`] | Rasterization and font handling |
//! | [`export`] | PDF pages, ZIP archives, batch orchestration |
//! | [`error`] | Error types |

pub mod document;
pub mod error;
pub mod export;
pub mod render;
pub mod store;

// Re-exports for convenience
pub use document::resolve::ImageResolver;
pub use document::substitute::substitute;
pub use document::{DocumentInstance, GraphicObject, TemplateDocument};
pub use error::LaurelError;
pub use export::{BatchExporter, CancelToken, ExportOutput};
pub use render::{FontLibrary, Rasterizer};
pub use store::{BackgroundStore, TemplateStore};
