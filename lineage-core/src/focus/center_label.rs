use serde::Serialize;

use crate::config::CenterLabelConfig;
use crate::text::TextMeasurer;

/// Text drawn in the middle of the chart, naming the focused node.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CenterLabel {
    pub text: String,
    pub font_size: f64,
    /// Vertical offset that centers the text on the origin.
    pub dy: f64,
}

/// Largest font size in range whose measured box fits inside the focus
/// ring of radius `radius`.
pub fn fit_center_label(
    text: &str,
    radius: f64,
    cfg: &CenterLabelConfig,
    measurer: &dyn TextMeasurer,
) -> CenterLabel {
    let max_width = radius * cfg.width_fraction;
    let max_height = radius * cfg.height_fraction;

    // A step outside (0, 1) would never reach the minimum.
    let shrinks = cfg.shrink_step > 0.0 && cfg.shrink_step < 1.0;

    let mut font_size = cfg.max_font_size;
    let mut bounds = measurer.measure(text, &cfg.font_family, font_size);
    while shrinks
        && (bounds.width > max_width || bounds.height > max_height)
        && font_size > cfg.min_font_size
    {
        font_size *= cfg.shrink_step;
        bounds = measurer.measure(text, &cfg.font_family, font_size);
    }
    let font_size = font_size.max(cfg.min_font_size);

    CenterLabel { text: text.to_string(), font_size, dy: font_size / 2.0 }
}
