//! Durable named template storage.
//!
//! A flat name → template mapping held in one JSON file and rewritten
//! atomically (temp file + rename) on every save. Writes are visible to
//! `list`/`load` immediately and survive process restart. Inserting with an
//! existing name overwrites silently: last writer wins, no versioning.

use std::collections::BTreeMap;
use std::fs;
use std::path::PathBuf;
use std::sync::Mutex;

use crate::document::TemplateDocument;
use crate::error::LaurelError;

/// Named template persistence backed by a single JSON file.
pub struct TemplateStore {
    path: PathBuf,
    entries: Mutex<BTreeMap<String, TemplateDocument>>,
}

impl TemplateStore {
    /// Open (or create) a store backed by the given JSON file.
    ///
    /// A missing file is an empty store; an unreadable or unparsable file
    /// is a persistence error.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, LaurelError> {
        let path = path.into();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(|e| {
                    LaurelError::Persistence(format!(
                        "failed to create store directory {}: {}",
                        parent.display(),
                        e
                    ))
                })?;
            }
        }
        let entries = match fs::read(&path) {
            Ok(bytes) => serde_json::from_slice(&bytes).map_err(|e| {
                LaurelError::Persistence(format!(
                    "failed to parse template store {}: {}",
                    path.display(),
                    e
                ))
            })?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => BTreeMap::new(),
            Err(e) => {
                return Err(LaurelError::Persistence(format!(
                    "failed to read template store {}: {}",
                    path.display(),
                    e
                )));
            }
        };
        Ok(Self {
            path,
            entries: Mutex::new(entries),
        })
    }

    /// Store or overwrite the template under `name`.
    ///
    /// An empty name is rejected; so is a document whose name-role tagging
    /// is ambiguous (more than one tagged field), since every later bulk
    /// export would inherit the ambiguity.
    pub fn save(&self, name: &str, doc: &TemplateDocument) -> Result<(), LaurelError> {
        if name.trim().is_empty() {
            return Err(LaurelError::Validation(
                "template name must not be empty".into(),
            ));
        }
        doc.validate()?;

        let mut entries = self.entries.lock().unwrap();
        entries.insert(name.to_string(), doc.clone());
        self.persist(&entries)?;
        log::debug!("saved template '{}' ({} objects)", name, doc.objects.len());
        Ok(())
    }

    /// All stored template names, in sorted order.
    pub fn list(&self) -> Vec<String> {
        self.entries.lock().unwrap().keys().cloned().collect()
    }

    /// Load a template. A missing name is a benign miss, not an error.
    pub fn load(&self, name: &str) -> Option<TemplateDocument> {
        self.entries.lock().unwrap().get(name).cloned()
    }

    /// Like [`load`](Self::load), for callers that require the template:
    /// a miss becomes [`LaurelError::TemplateNotFound`].
    pub fn fetch(&self, name: &str) -> Result<TemplateDocument, LaurelError> {
        self.load(name)
            .ok_or_else(|| LaurelError::TemplateNotFound(name.to_string()))
    }

    fn persist(&self, entries: &BTreeMap<String, TemplateDocument>) -> Result<(), LaurelError> {
        let bytes = serde_json::to_vec_pretty(entries).map_err(|e| {
            LaurelError::Persistence(format!("failed to encode template store: {}", e))
        })?;
        let tmp = self.path.with_extension("tmp");
        fs::write(&tmp, &bytes).map_err(|e| {
            LaurelError::Persistence(format!("failed to write {}: {}", tmp.display(), e))
        })?;
        fs::rename(&tmp, &self.path).map_err(|e| {
            LaurelError::Persistence(format!("failed to replace {}: {}", self.path.display(), e))
        })?;
        Ok(())
    }
}
