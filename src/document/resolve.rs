//! Image resolution: loads and decodes image sources referenced by a document.
//!
//! `ImageResolver` handles all image loading concerns so that
//! [`TemplateDocument`] stays a pure data model with no filesystem
//! knowledge. Decoding is an explicit awaited step: the rasterizer only ever
//! sees documents whose image slots are already populated.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::RwLock;

use image::DynamicImage;

use super::{GraphicObject, TemplateDocument};
use crate::error::LaurelError;

/// Resolves image sources (background and image objects) in a document.
///
/// Sources are blob-store keys or paths; relative sources resolve against
/// the store's root directory. Decoded images are cached behind a shared
/// lock, so resolving many documents against the same backgrounds decodes
/// each source once.
#[derive(Clone)]
pub struct ImageResolver {
    root: PathBuf,
    cache: Arc<RwLock<HashMap<String, DynamicImage>>>,
}

impl ImageResolver {
    /// Create a resolver rooted at the given directory (typically the
    /// background blob store's directory).
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            cache: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Resolve every image source in the document in place.
    ///
    /// Populates the background's and each image object's `resolved` slot.
    /// Already-resolved slots are left alone, so resolving a document twice
    /// is cheap and idempotent.
    pub async fn resolve(&self, doc: &mut TemplateDocument) -> Result<(), LaurelError> {
        if let Some(background) = &mut doc.background {
            if background.resolved.is_none() {
                background.resolved = Some(self.load(&background.source).await?);
            }
        }
        for object in &mut doc.objects {
            if let GraphicObject::Image(img) = object {
                if img.resolved.is_none() && !img.source.is_empty() {
                    img.resolved = Some(self.load(&img.source).await?);
                }
            }
        }
        Ok(())
    }

    /// Load and decode a single source, using the cache when possible.
    pub async fn load(&self, source: &str) -> Result<DynamicImage, LaurelError> {
        {
            let cache = self.cache.read().await;
            if let Some(img) = cache.get(source) {
                return Ok(img.clone());
            }
        }

        let path = if Path::new(source).is_absolute() {
            PathBuf::from(source)
        } else {
            self.root.join(source)
        };
        let bytes = tokio::fs::read(&path).await.map_err(|e| {
            LaurelError::Render(format!("failed to read image '{}': {}", source, e))
        })?;
        let img = image::load_from_memory(&bytes).map_err(|e| {
            LaurelError::Render(format!("failed to decode image '{}': {}", source, e))
        })?;

        let mut cache = self.cache.write().await;
        cache.insert(source.to_string(), img.clone());
        Ok(img)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::types::{Image, ImageRef};
    use image::{Rgb, RgbImage};

    fn write_png(dir: &Path, name: &str, w: u32, h: u32) {
        let img = RgbImage::from_pixel(w, h, Rgb([200, 10, 10]));
        img.save(dir.join(name)).unwrap();
    }

    #[tokio::test]
    async fn resolves_background_and_image_objects() {
        let dir = tempfile::tempdir().unwrap();
        write_png(dir.path(), "bg.png", 8, 4);
        write_png(dir.path(), "logo.png", 3, 3);

        let mut doc = TemplateDocument::new(100, 100);
        doc.background = Some(ImageRef::new("bg.png"));
        doc.push(GraphicObject::Image(Image::new("logo.png")));

        let resolver = ImageResolver::new(dir.path());
        resolver.resolve(&mut doc).await.unwrap();

        let bg = doc.background.as_ref().unwrap().resolved.as_ref().unwrap();
        assert_eq!((bg.width(), bg.height()), (8, 4));
        match &doc.objects[0] {
            GraphicObject::Image(img) => assert!(img.resolved.is_some()),
            other => panic!("unexpected object {:?}", other),
        }
    }

    #[tokio::test]
    async fn missing_source_is_a_render_error() {
        let dir = tempfile::tempdir().unwrap();
        let mut doc = TemplateDocument::new(100, 100);
        doc.background = Some(ImageRef::new("nope.png"));

        let err = ImageResolver::new(dir.path())
            .resolve(&mut doc)
            .await
            .unwrap_err();
        assert!(matches!(err, LaurelError::Render(_)));
    }

    #[tokio::test]
    async fn undecodable_source_is_a_render_error() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("bad.png"), b"definitely not a png").unwrap();
        let resolver = ImageResolver::new(dir.path());
        let err = resolver.load("bad.png").await.unwrap_err();
        assert!(matches!(err, LaurelError::Render(_)));
    }

    #[tokio::test]
    async fn second_resolve_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        write_png(dir.path(), "bg.png", 2, 2);
        let mut doc = TemplateDocument::new(100, 100);
        doc.background = Some(ImageRef::new("bg.png"));

        let resolver = ImageResolver::new(dir.path());
        resolver.resolve(&mut doc).await.unwrap();
        // deleting the file does not matter: the slot is already populated
        std::fs::remove_file(dir.path().join("bg.png")).unwrap();
        resolver.resolve(&mut doc).await.unwrap();
        assert!(doc.background.as_ref().unwrap().resolved.is_some());
    }
}
