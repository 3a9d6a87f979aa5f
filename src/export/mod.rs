//! # Batch Export Orchestration
//!
//! Drives substitute → rasterize → export across a participant list and
//! packages the result: the PDF itself for one participant, a ZIP with one
//! PDF entry per participant otherwise. The single-name case deliberately
//! skips the archive wrapper; nobody wants a one-entry ZIP.
//!
//! Participants are processed strictly sequentially, in input order, with
//! each step awaited before the next starts; archive entry order therefore
//! mirrors the participant list. A failed render aborts the whole batch with
//! that participant's error. Export is read-only over the template: the
//! template store is never touched, so cancelling mid-batch cannot corrupt
//! stored state.

pub mod archive;
pub mod pdf;

pub use archive::sanitize_entry_stem;

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::document::TemplateDocument;
use crate::document::resolve::ImageResolver;
use crate::document::substitute::substitute;
use crate::error::LaurelError;
use crate::render::{FontLibrary, Rasterizer};

/// File name suggested for multi-participant output.
pub const ARCHIVE_FILE_NAME: &str = "certificates.zip";

/// Cooperative cancellation flag for an in-flight batch.
///
/// Cloning shares the flag. The orchestrator checks it between participants
/// and abandons the batch with [`LaurelError::Cancelled`] once set.
#[derive(Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// The outcome of a batch export.
#[derive(Debug, Clone)]
pub enum ExportOutput {
    /// Exactly one participant: the PDF itself, not wrapped in an archive.
    Single { file_name: String, bytes: Vec<u8> },
    /// Two or more participants: a ZIP with one PDF entry per participant.
    Archive { file_name: String, bytes: Vec<u8> },
}

impl ExportOutput {
    /// Suggested file name for the output (`<name>.pdf` or the archive name).
    pub fn file_name(&self) -> &str {
        match self {
            ExportOutput::Single { file_name, .. } | ExportOutput::Archive { file_name, .. } => {
                file_name
            }
        }
    }

    pub fn bytes(&self) -> &[u8] {
        match self {
            ExportOutput::Single { bytes, .. } | ExportOutput::Archive { bytes, .. } => bytes,
        }
    }

    pub fn into_bytes(self) -> Vec<u8> {
        match self {
            ExportOutput::Single { bytes, .. } | ExportOutput::Archive { bytes, .. } => bytes,
        }
    }

    pub fn is_archive(&self) -> bool {
        matches!(self, ExportOutput::Archive { .. })
    }
}

/// Bulk certificate exporter.
pub struct BatchExporter {
    resolver: ImageResolver,
    rasterizer: Rasterizer,
    quality: u32,
}

impl BatchExporter {
    pub fn new(resolver: ImageResolver, fonts: Arc<FontLibrary>) -> Self {
        Self {
            resolver,
            rasterizer: Rasterizer::new(fonts),
            quality: 1,
        }
    }

    /// Set the raster quality multiplier (≥ 1; validated at render time).
    pub fn with_quality(mut self, quality: u32) -> Self {
        self.quality = quality;
        self
    }

    /// Export one certificate per participant name.
    pub async fn run(
        &self,
        template: &TemplateDocument,
        names: &[String],
    ) -> Result<ExportOutput, LaurelError> {
        self.run_cancellable(template, names, &CancelToken::new())
            .await
    }

    /// [`run`](Self::run) with cooperative cancellation between participants.
    pub async fn run_cancellable(
        &self,
        template: &TemplateDocument,
        names: &[String],
        cancel: &CancelToken,
    ) -> Result<ExportOutput, LaurelError> {
        if names.is_empty() {
            return Err(LaurelError::Validation("participant list is empty".into()));
        }
        template.validate()?;

        if template.name_field_count() == 0 {
            log::warn!("template has no name-role field; all certificates will be identical");
        }

        // Substitution never changes image content, so sources are resolved
        // once on the snapshot and shared by every participant's clone.
        let mut snapshot = template.clone();
        self.resolver.resolve(&mut snapshot).await?;

        if names.len() == 1 {
            let name = &names[0];
            let bytes = self.render_participant(&snapshot, name).await?;
            return Ok(ExportOutput::Single {
                file_name: format!("{}.pdf", sanitize_entry_stem(name)),
                bytes,
            });
        }

        let mut builder = archive::ArchiveBuilder::new();
        for name in names {
            if cancel.is_cancelled() {
                return Err(LaurelError::Cancelled);
            }
            let bytes = self.render_participant(&snapshot, name).await?;
            builder.add_entry(&format!("{}.pdf", sanitize_entry_stem(name)), &bytes)?;
        }
        log::info!("exported {} certificates", names.len());
        Ok(ExportOutput::Archive {
            file_name: ARCHIVE_FILE_NAME.to_string(),
            bytes: builder.finish()?,
        })
    }

    /// substitute → rasterize → export for one participant.
    ///
    /// The pixel work runs on the blocking thread pool; the instance is
    /// private to this call, so the shared snapshot is never mutated.
    async fn render_participant(
        &self,
        snapshot: &TemplateDocument,
        name: &str,
    ) -> Result<Vec<u8>, LaurelError> {
        let instance = substitute(snapshot, name);
        let rasterizer = self.rasterizer.clone();
        let quality = self.quality;
        let (page_w, page_h) = (snapshot.width as f32, snapshot.height as f32);
        let title = name.to_string();

        tokio::task::spawn_blocking(move || {
            let raster = rasterizer.rasterize(&instance, quality)?;
            pdf::export_page(&raster, page_w, page_h, &title)
        })
        .await
        .map_err(|e| LaurelError::Render(format!("render task failed: {}", e)))?
    }
}
