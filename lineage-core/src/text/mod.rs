//! Text measurement used to fit the center label.

#[cfg(target_arch = "wasm32")]
pub mod html_canvas;

/// Measured box of a single line of text.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct TextBounds {
    pub width: f64,
    pub height: f64,
}

pub trait TextMeasurer {
    /// Bounding box of `text` rendered at `font_size` pixels in `font`.
    fn measure(&self, text: &str, font: &str, font_size: f64) -> TextBounds;
}

/// Character-count estimate, used off the browser and in tests.
#[derive(Debug, Clone, Copy)]
pub struct HeuristicMeasurer {
    /// Average glyph advance relative to font size.
    pub char_width: f64,
    /// Line box height relative to font size.
    pub line_height: f64,
}

impl Default for HeuristicMeasurer {
    fn default() -> Self {
        Self { char_width: 0.6, line_height: 1.2 }
    }
}

impl TextMeasurer for HeuristicMeasurer {
    fn measure(&self, text: &str, _font: &str, font_size: f64) -> TextBounds {
        TextBounds {
            width: text.chars().count() as f64 * font_size * self.char_width,
            height: font_size * self.line_height,
        }
    }
}

impl<T: TextMeasurer + ?Sized> TextMeasurer for Box<T> {
    fn measure(&self, text: &str, font: &str, font_size: f64) -> TextBounds {
        (**self).measure(text, font, font_size)
    }
}
