//! Font discovery and loading.
//!
//! Text fields name a generic family (serif, sans-serif, monospace). The
//! library resolves each family to a system face through `fontdb` and
//! renders it with `ab_glyph`. When no matching face exists (headless
//! containers, minimal images), rendering falls back to the embedded Spleen
//! bitmap font, so rasterization never depends on host font installation.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use ab_glyph::{FontArc, FontVec};
use fontdb::{Database, Family, Query, Stretch, Style, Weight};

use crate::document::types::{FontFamily, FontWeight};

/// A loaded face: either a scalable system font or the embedded bitmap
/// fallback.
pub enum LoadedFont {
    /// Anti-aliased TTF rendering via ab_glyph.
    Ttf(FontArc),
    /// Embedded Spleen 12x24 glyphs, scaled to the requested size.
    Bitmap,
}

/// Caching family/weight → face resolver.
pub struct FontLibrary {
    db: Database,
    cache: Mutex<HashMap<(FontFamily, FontWeight), Arc<LoadedFont>>>,
}

impl FontLibrary {
    /// A library backed by the system font database.
    pub fn new() -> Self {
        let mut db = Database::new();
        db.load_system_fonts();
        Self {
            db,
            cache: Mutex::new(HashMap::new()),
        }
    }

    /// A library that ignores system fonts and always renders with the
    /// embedded bitmap font. Output is identical on every machine; tests
    /// use this for deterministic rasters.
    pub fn embedded_only() -> Self {
        Self {
            db: Database::new(),
            cache: Mutex::new(HashMap::new()),
        }
    }

    /// Resolve a family/weight pair, falling back to the embedded bitmap
    /// font when no system face matches. Never fails.
    pub fn get(&self, family: FontFamily, weight: FontWeight) -> Arc<LoadedFont> {
        let key = (family, weight);
        if let Some(font) = self.cache.lock().unwrap().get(&key) {
            return font.clone();
        }
        let loaded = match self.lookup(family, weight) {
            Some(font) => Arc::new(LoadedFont::Ttf(font)),
            None => {
                log::debug!(
                    "no system face for {:?}/{:?}; using embedded bitmap font",
                    family,
                    weight
                );
                Arc::new(LoadedFont::Bitmap)
            }
        };
        self.cache.lock().unwrap().insert(key, loaded.clone());
        loaded
    }

    fn lookup(&self, family: FontFamily, weight: FontWeight) -> Option<FontArc> {
        let family = match family {
            FontFamily::Serif => Family::Serif,
            FontFamily::SansSerif => Family::SansSerif,
            FontFamily::Monospace => Family::Monospace,
        };
        let weight = match weight {
            FontWeight::Normal => Weight::NORMAL,
            FontWeight::Bold => Weight::BOLD,
        };
        let query = Query {
            families: &[family],
            weight,
            stretch: Stretch::Normal,
            style: Style::Normal,
        };
        let id = self.db.query(&query)?;
        let font = self.db.with_face_data(id, |data, index| {
            FontVec::try_from_vec_and_index(data.to_vec(), index).ok()
        })??;
        Some(FontArc::new(font))
    }
}

impl Default for FontLibrary {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn embedded_only_always_falls_back_to_bitmap() {
        let fonts = FontLibrary::embedded_only();
        let face = fonts.get(FontFamily::Serif, FontWeight::Bold);
        assert!(matches!(*face, LoadedFont::Bitmap));
    }

    #[test]
    fn lookups_are_cached() {
        let fonts = FontLibrary::embedded_only();
        let a = fonts.get(FontFamily::Monospace, FontWeight::Normal);
        let b = fonts.get(FontFamily::Monospace, FontWeight::Normal);
        assert!(Arc::ptr_eq(&a, &b));
    }
}
