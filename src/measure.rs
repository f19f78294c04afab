use euclid::default::Size2D;

/// Measurement seam between layout and the text engine.
///
/// Implementations must be total: a missing font or glyph degrades to
/// fallback metrics, never an error, so layout always produces a
/// geometrically valid result.
pub trait TextMeasurer {
    /// Natural size of a run: advance width by line height.
    fn measure_text(&self, text: &str, font_name: &str, font_size: f32) -> Size2D<f32>;

    /// Height of an empty line in the given font.
    fn line_height(&self, font_name: &str, font_size: f32) -> f32;
}

/// Deterministic measurer with a constant advance per character.
///
/// Every character is `advance` units wide regardless of font, and the line
/// height is `font_size * line_height_scale`. Used by the crate's tests and
/// handy for headless layout where no fonts are available.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FixedMeasurer {
    pub advance: f32,
    pub line_height_scale: f32,
}

impl FixedMeasurer {
    pub fn new(advance: f32) -> Self {
        Self {
            advance,
            line_height_scale: 1.0,
        }
    }
}

impl Default for FixedMeasurer {
    fn default() -> Self {
        Self::new(8.0)
    }
}

impl TextMeasurer for FixedMeasurer {
    fn measure_text(&self, text: &str, font_name: &str, font_size: f32) -> Size2D<f32> {
        let width = text.chars().count() as f32 * self.advance;
        let height = if text.is_empty() {
            0.0
        } else {
            self.line_height(font_name, font_size)
        };
        Size2D::new(width, height)
    }

    fn line_height(&self, _font_name: &str, font_size: f32) -> f32 {
        font_size * self.line_height_scale
    }
}
