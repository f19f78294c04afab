use std::{collections::HashMap, path::PathBuf, sync::Arc};

/// Font lookup and lazy loading behind the measurement layer.
///
/// Combines a `fontdb` database of available faces with a cache of loaded
/// `fontdue` instances. Faces are only parsed when measurement first touches
/// them; family-name resolution is memoized per queried name.
pub struct FontCache {
    db: fontdb::Database,
    loaded: HashMap<fontdb::ID, Arc<fontdue::Font>, fxhash::FxBuildHasher>,
    /// Memoized name → face resolution. `None` records a miss so absent
    /// families are not re-queried on every run.
    resolved: HashMap<String, Option<fontdb::ID>, fxhash::FxBuildHasher>,
}

impl Default for FontCache {
    fn default() -> Self {
        Self::new()
    }
}

impl FontCache {
    /// Creates an empty cache.
    pub fn new() -> Self {
        Self {
            db: fontdb::Database::new(),
            loaded: HashMap::with_hasher(fxhash::FxBuildHasher::default()),
            resolved: HashMap::with_hasher(fxhash::FxBuildHasher::default()),
        }
    }
}

/// Loading faces into the database.
impl FontCache {
    /// Loads a font from binary data.
    pub fn load_font_binary(&mut self, data: impl Into<Vec<u8>>) {
        self.db.load_font_data(data.into());
        self.resolved.clear();
    }

    /// Loads a font from a file path.
    pub fn load_font_file(&mut self, path: PathBuf) -> Result<(), std::io::Error> {
        let result = self.db.load_font_file(path);
        self.resolved.clear();
        result
    }

    /// Loads all fonts from a directory.
    pub fn load_fonts_dir(&mut self, dir: PathBuf) {
        self.db.load_fonts_dir(dir);
        self.resolved.clear();
    }

    /// Loads the system fonts.
    pub fn load_system_fonts(&mut self) {
        self.db.load_system_fonts();
        self.resolved.clear();
    }

    /// Checks whether any faces are available.
    pub fn is_empty(&self) -> bool {
        self.db.is_empty()
    }

    /// Returns the number of available faces.
    pub fn len(&self) -> usize {
        self.db.len()
    }
}

/// Resolving and loading fonts.
impl FontCache {
    /// Resolves a font name to a face ID.
    ///
    /// The generic CSS family names map to the database's configured generic
    /// families; anything else is queried as a concrete family name.
    pub fn resolve(&mut self, name: &str) -> Option<fontdb::ID> {
        if let Some(cached) = self.resolved.get(name) {
            return *cached;
        }

        let family = match name {
            "serif" => fontdb::Family::Serif,
            "sans-serif" => fontdb::Family::SansSerif,
            "cursive" => fontdb::Family::Cursive,
            "fantasy" => fontdb::Family::Fantasy,
            "monospace" => fontdb::Family::Monospace,
            other => fontdb::Family::Name(other),
        };
        let id = self.db.query(&fontdb::Query {
            families: &[family],
            ..fontdb::Query::default()
        });

        self.resolved.insert(name.to_string(), id);
        id
    }

    /// Retrieves a loaded font by ID, parsing it on first use.
    pub fn font(&mut self, id: fontdb::ID) -> Option<Arc<fontdue::Font>> {
        use std::collections::hash_map::Entry;

        match self.loaded.entry(id) {
            Entry::Occupied(entry) => Some(Arc::clone(entry.get())),
            Entry::Vacant(entry) => {
                let font_result = self.db.with_face_data(id, |data, index| {
                    fontdue::Font::from_bytes(
                        data,
                        fontdue::FontSettings {
                            collection_index: index,
                            scale: 40.0,
                            load_substitutions: true,
                        },
                    )
                })?;

                match font_result {
                    Ok(font) => {
                        let r: &mut Arc<fontdue::Font> = entry.insert(Arc::new(font));
                        Some(Arc::clone(r))
                    }
                    Err(e) => {
                        log::error!("Failed to load font (id: {:?}): {}", id, e);
                        None
                    }
                }
            }
        }
    }

    /// Resolves a name and loads the face in one step.
    pub fn font_by_name(&mut self, name: &str) -> Option<Arc<fontdue::Font>> {
        let id = self.resolve(name)?;
        self.font(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_cache_resolves_nothing() {
        let mut cache = FontCache::new();
        assert!(cache.is_empty());
        assert_eq!(cache.len(), 0);
        assert!(cache.resolve("sans-serif").is_none());
        assert!(cache.font_by_name("No Such Family").is_none());
        // The miss is memoized, a second query takes the cached path.
        assert!(cache.resolve("sans-serif").is_none());
    }
}
