//! ZIP packaging for multi-participant exports.

use std::io::{Cursor, Write};

use zip::CompressionMethod;
use zip::write::{SimpleFileOptions, ZipWriter};

use crate::error::LaurelError;

/// In-memory ZIP builder. Entry order is insertion order.
pub struct ArchiveBuilder {
    writer: ZipWriter<Cursor<Vec<u8>>>,
    options: SimpleFileOptions,
}

impl ArchiveBuilder {
    pub fn new() -> Self {
        Self {
            writer: ZipWriter::new(Cursor::new(Vec::new())),
            options: SimpleFileOptions::default().compression_method(CompressionMethod::Deflated),
        }
    }

    /// Append an entry. Duplicate names are allowed and produce duplicate,
    /// independently valid entries.
    pub fn add_entry(&mut self, name: &str, bytes: &[u8]) -> Result<(), LaurelError> {
        self.writer.start_file(name, self.options).map_err(|e| {
            LaurelError::Render(format!("failed to start archive entry '{}': {}", name, e))
        })?;
        self.writer.write_all(bytes).map_err(|e| {
            LaurelError::Render(format!("failed to write archive entry '{}': {}", name, e))
        })?;
        Ok(())
    }

    /// Finalize the archive into a byte blob.
    pub fn finish(self) -> Result<Vec<u8>, LaurelError> {
        let cursor = self
            .writer
            .finish()
            .map_err(|e| LaurelError::Render(format!("failed to finalize archive: {}", e)))?;
        Ok(cursor.into_inner())
    }
}

impl Default for ArchiveBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Make a participant name safe as an archive entry stem.
///
/// Path separators, control characters, and characters illegal in common
/// filesystems are replaced with `_`; everything else is kept verbatim so
/// the entry still reads as the literal participant name.
pub fn sanitize_entry_stem(name: &str) -> String {
    let cleaned: String = name
        .chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect();
    let cleaned = cleaned.trim().to_string();
    if cleaned.is_empty() {
        "participant".to_string()
    } else {
        cleaned
    }
}
