use wasm_bindgen::{JsCast, JsValue};
use web_sys::{OffscreenCanvas, OffscreenCanvasRenderingContext2d};

use super::{HeuristicMeasurer, TextBounds, TextMeasurer};

/// Measures text with an offscreen 2d canvas, falling back to the heuristic
/// when the canvas is unavailable (e.g. workers without OffscreenCanvas).
pub struct HtmlCanvasMeasurer {
    context: Option<OffscreenCanvasRenderingContext2d>,
    fallback: HeuristicMeasurer,
}

fn make_context() -> Result<OffscreenCanvasRenderingContext2d, JsValue> {
    let canvas = OffscreenCanvas::new(400, 100)?;
    let context = canvas
        .get_context("2d")?
        .ok_or_else(|| JsValue::from_str("2d context unavailable"))?;
    context.dyn_into::<OffscreenCanvasRenderingContext2d>().map_err(JsValue::from)
}

impl HtmlCanvasMeasurer {
    pub fn new() -> Self {
        let context = match make_context() {
            Ok(ctx) => Some(ctx),
            Err(e) => {
                log::warn!("offscreen canvas unavailable, estimating text size: {:?}", e);
                None
            }
        };
        Self { context, fallback: HeuristicMeasurer::default() }
    }
}

impl TextMeasurer for HtmlCanvasMeasurer {
    fn measure(&self, text: &str, font: &str, font_size: f64) -> TextBounds {
        let Some(ctx) = &self.context else {
            return self.fallback.measure(text, font, font_size);
        };
        ctx.set_font(&format!("{}px {}", font_size, font));
        match ctx.measure_text(text) {
            Ok(metrics) => TextBounds {
                width: metrics.actual_bounding_box_left() + metrics.actual_bounding_box_right(),
                height: metrics.font_bounding_box_ascent() + metrics.font_bounding_box_descent(),
            },
            Err(_) => self.fallback.measure(text, font, font_size),
        }
    }
}
