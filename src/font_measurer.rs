use std::collections::HashSet;

use euclid::default::Size2D;
use parking_lot::Mutex;

use crate::font_cache::FontCache;
use crate::measure::TextMeasurer;

/// Per-character width used when a font cannot be resolved, as a fraction of
/// the font size.
pub const FALLBACK_ADVANCE_SCALE: f32 = 0.5;
/// Line height used when a font cannot be resolved, as a fraction of the
/// font size.
pub const FALLBACK_LINE_HEIGHT_SCALE: f32 = 1.25;

/// [`TextMeasurer`] backed by real font metrics.
///
/// Widths are kerning-aware advance sums; line height is
/// `ascent - descent + line_gap` for the face. A name that cannot be
/// resolved (or a face that fails to parse) degrades to fallback metrics so
/// layout still completes; the miss is logged once per name.
///
/// The cache sits behind a `Mutex` because measurement takes `&self` while
/// font loading is lazy and mutates the cache.
pub struct FontMeasurer {
    fonts: Mutex<FontCache>,
    warned: Mutex<HashSet<String, fxhash::FxBuildHasher>>,
}

impl Default for FontMeasurer {
    fn default() -> Self {
        Self::new()
    }
}

impl FontMeasurer {
    /// Creates a measurer with an empty font cache. Every measurement falls
    /// back until fonts are loaded.
    pub fn new() -> Self {
        Self::with_cache(FontCache::new())
    }

    /// Creates a measurer over a pre-populated cache.
    pub fn with_cache(cache: FontCache) -> Self {
        Self {
            fonts: Mutex::new(cache),
            warned: Mutex::new(HashSet::with_hasher(fxhash::FxBuildHasher::default())),
        }
    }

    /// Direct access to the underlying cache, for loading fonts.
    pub fn fonts(&self) -> &Mutex<FontCache> {
        &self.fonts
    }

    /// Loads the system fonts into the cache.
    pub fn load_system_fonts(&self) {
        self.fonts.lock().load_system_fonts();
    }

    /// Loads a font from binary data.
    pub fn load_font_binary(&self, data: impl Into<Vec<u8>>) {
        self.fonts.lock().load_font_binary(data);
    }

    /// Loads a font from a file path.
    pub fn load_font_file(&self, path: std::path::PathBuf) -> Result<(), std::io::Error> {
        self.fonts.lock().load_font_file(path)
    }

    fn warn_missing(&self, font_name: &str) {
        let mut warned = self.warned.lock();
        if warned.insert(font_name.to_string()) {
            log::warn!(
                "Font '{}' not available, measuring with fallback metrics.",
                font_name
            );
        }
    }

    fn fallback_line_height(font_size: f32) -> f32 {
        font_size * FALLBACK_LINE_HEIGHT_SCALE
    }

    fn fallback_width(text: &str, font_size: f32) -> f32 {
        text.chars().count() as f32 * font_size * FALLBACK_ADVANCE_SCALE
    }
}

impl TextMeasurer for FontMeasurer {
    fn measure_text(&self, text: &str, font_name: &str, font_size: f32) -> Size2D<f32> {
        if text.is_empty() {
            return Size2D::new(0.0, 0.0);
        }

        let Some(font) = self.fonts.lock().font_by_name(font_name) else {
            self.warn_missing(font_name);
            return Size2D::new(
                Self::fallback_width(text, font_size),
                Self::fallback_line_height(font_size),
            );
        };

        let height = font
            .horizontal_line_metrics(font_size)
            .map(|m| m.ascent - m.descent + m.line_gap)
            .unwrap_or_else(|| Self::fallback_line_height(font_size));

        let mut width = 0.0;
        let mut prev_glyph: Option<u16> = None;
        for ch in text.chars() {
            let glyph = font.lookup_glyph_index(ch);
            if let Some(prev) = prev_glyph {
                width += font
                    .horizontal_kern_indexed(prev, glyph, font_size)
                    .unwrap_or(0.0);
            }
            width += font.metrics_indexed(glyph, font_size).advance_width;
            prev_glyph = Some(glyph);
        }

        Size2D::new(width, height)
    }

    fn line_height(&self, font_name: &str, font_size: f32) -> f32 {
        let Some(font) = self.fonts.lock().font_by_name(font_name) else {
            self.warn_missing(font_name);
            return Self::fallback_line_height(font_size);
        };

        font.horizontal_line_metrics(font_size)
            .map(|m| m.ascent - m.descent + m.line_gap)
            .unwrap_or_else(|| Self::fallback_line_height(font_size))
    }
}
