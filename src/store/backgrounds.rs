//! Background image blob store.
//!
//! Filesystem-backed put/list store for uploaded background images. Stored
//! keys are timestamped so repeated uploads of the same file never collide.
//! Listings are filtered to known raster formats; files with unrecognized
//! extensions are kept on disk but never listed.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::Utc;

use crate::error::LaurelError;

/// Extensions that count as listable background images.
const IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "gif", "webp"];

/// Key-value blob store for background images.
pub struct BackgroundStore {
    dir: PathBuf,
}

impl BackgroundStore {
    /// Open (or create) a store rooted at the given directory.
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self, LaurelError> {
        let dir = dir.into();
        fs::create_dir_all(&dir).map_err(|e| {
            LaurelError::Persistence(format!(
                "failed to create background store {}: {}",
                dir.display(),
                e
            ))
        })?;
        Ok(Self { dir })
    }

    /// The store's root directory; image resolvers use it as their root.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Store image bytes under a generated key and return the key.
    ///
    /// The key is `bg-<millis>-<name>` with the original file name stripped
    /// to its final component and whitespace collapsed to dashes.
    pub fn put(&self, original_name: &str, bytes: &[u8]) -> Result<String, LaurelError> {
        let base = Path::new(original_name)
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("background");
        let base: String = base.split_whitespace().collect::<Vec<_>>().join("-");
        let base = if base.is_empty() {
            "background".to_string()
        } else {
            base
        };
        let key = format!("bg-{}-{}", Utc::now().timestamp_millis(), base);

        fs::write(self.dir.join(&key), bytes).map_err(|e| {
            LaurelError::Persistence(format!("failed to store background '{}': {}", key, e))
        })?;
        Ok(key)
    }

    /// List stored keys with a recognized image extension, sorted.
    pub fn list(&self) -> Result<Vec<String>, LaurelError> {
        let entries = fs::read_dir(&self.dir).map_err(|e| {
            LaurelError::Persistence(format!(
                "failed to read background store {}: {}",
                self.dir.display(),
                e
            ))
        })?;

        let mut keys = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| {
                LaurelError::Persistence(format!("failed to read store entry: {}", e))
            })?;
            if let Some(name) = entry.file_name().to_str() {
                if has_image_extension(name) {
                    keys.push(name.to_string());
                }
            }
        }
        keys.sort();
        Ok(keys)
    }
}

fn has_image_extension(name: &str) -> bool {
    Path::new(name)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| IMAGE_EXTENSIONS.contains(&e.to_ascii_lowercase().as_str()))
        .unwrap_or(false)
}
