//! WASM bindings for the lineage-core library.
//!
//! All functions exposed to JavaScript via wasm-bindgen are defined here.
//! Structured results cross the boundary as JSON strings.

use serde::Serialize;
use wasm_bindgen::prelude::*;

use crate::chart::{InteractionMode, PointerEvent, SunburstChart, tree_from_sheet_text};
use crate::config::SunburstConfig;
use crate::output::{FrameCollector, InteractionOutput};
use crate::sheet::{NodeId, SheetRow};
use crate::text::html_canvas::HtmlCanvasMeasurer;

fn to_json<T: Serialize>(value: &T) -> String {
    serde_json::to_string(value).unwrap_or_else(|e| {
        log::error!("failed to serialize output: {}", e);
        "{}".to_string()
    })
}

fn parse_config(config_json: Option<String>) -> Result<SunburstConfig, JsError> {
    match config_json.as_deref().map(str::trim) {
        None | Some("") => Ok(SunburstConfig::default()),
        Some(json) => Ok(SunburstConfig::from_json(json)?),
    }
}

fn now() -> f64 {
    web_sys::window()
        .and_then(|w| w.performance())
        .map_or(0.0, |p| p.now())
}

fn window_size() -> Result<(f64, f64), JsError> {
    let window = web_sys::window().ok_or_else(|| JsError::new("no window available"))?;
    let dim = |v: Result<JsValue, JsValue>| v.ok().and_then(|v| v.as_f64());
    match (dim(window.inner_width()), dim(window.inner_height())) {
        (Some(w), Some(h)) => Ok((w, h)),
        _ => Err(JsError::new("could not read the window size")),
    }
}

/// Install the panic hook and the console logger.
#[wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();
    // Already initialized when several modules share the logger.
    let _ = console_log::init_with_level(log::Level::Debug);
}

/// Build the lineage tree from a sheet export and return it as nested JSON.
#[wasm_bindgen]
pub fn build_hierarchy(csv_text: &str, config_json: Option<String>) -> Result<String, JsError> {
    let config = parse_config(config_json)?;
    let tree = tree_from_sheet_text(csv_text, &config.tree)?;
    Ok(to_json(&tree.to_chart_data()))
}

#[wasm_bindgen]
pub struct LineageChart {
    inner: SunburstChart<HtmlCanvasMeasurer>,
}

#[wasm_bindgen]
impl LineageChart {
    #[wasm_bindgen(constructor)]
    pub fn new(
        csv_text: &str,
        width: f64,
        height: f64,
        config_json: Option<String>,
    ) -> Result<LineageChart, JsError> {
        let config = parse_config(config_json)?;
        let measurer = HtmlCanvasMeasurer::new();
        let inner = SunburstChart::from_sheet_text(csv_text, width, height, config, measurer)?;
        Ok(LineageChart { inner })
    }

    /// Rows as `[{header: value}]`, headers in column order.
    #[wasm_bindgen(js_name = fromRows)]
    pub fn from_rows(
        rows_json: &str,
        headers_json: &str,
        width: f64,
        height: f64,
        config_json: Option<String>,
    ) -> Result<LineageChart, JsError> {
        let config = parse_config(config_json)?;
        let rows: Vec<SheetRow> = serde_json::from_str(rows_json)?;
        let headers: Vec<String> = serde_json::from_str(headers_json)?;
        let measurer = HtmlCanvasMeasurer::new();
        let inner = SunburstChart::from_rows(&rows, &headers, width, height, config, measurer)?;
        Ok(LineageChart { inner })
    }

    /// Size the chart to the browser window.
    #[wasm_bindgen(js_name = forWindow)]
    pub fn for_window(
        csv_text: &str,
        config_json: Option<String>,
    ) -> Result<LineageChart, JsError> {
        let (width, height) = window_size()?;
        Self::new(csv_text, width, height, config_json)
    }

    /// Advance to `now` (ms) and return the frame as JSON.
    pub fn frame(&mut self, now: f64) -> String {
        let mut collector = FrameCollector::new();
        let transitioning = match self.inner.render(&mut collector, now) {
            Ok(more) => more,
            Err(never) => match never {},
        };
        to_json(&collector.finish(transitioning))
    }

    pub fn click(&mut self, node: usize, alt: bool, now: f64) -> String {
        self.dispatch(PointerEvent::Click { node: NodeId(node), alt }, now)
    }

    #[wasm_bindgen(js_name = clickCenter)]
    pub fn click_center(&mut self, alt: bool, now: f64) -> String {
        self.dispatch(PointerEvent::ClickCenter { alt }, now)
    }

    pub fn hover(&mut self, node: usize) -> String {
        self.dispatch(PointerEvent::Hover { node: NodeId(node) }, now())
    }

    #[wasm_bindgen(js_name = pointerMove)]
    pub fn pointer_move(&mut self) -> String {
        self.dispatch(PointerEvent::Move, now())
    }

    #[wasm_bindgen(js_name = pointerLeave)]
    pub fn pointer_leave(&mut self) -> String {
        self.dispatch(PointerEvent::Leave, now())
    }

    #[wasm_bindgen(js_name = isTransitioning)]
    pub fn is_transitioning(&self) -> bool {
        self.inner.is_transitioning()
    }

    /// "pointer" or "touch".
    #[wasm_bindgen(js_name = interactionMode)]
    pub fn interaction_mode(&self) -> String {
        match self.inner.interaction_mode() {
            InteractionMode::Pointer => "pointer".to_string(),
            InteractionMode::Touch => "touch".to_string(),
        }
    }
}

impl LineageChart {
    fn dispatch(&mut self, event: PointerEvent, now: f64) -> String {
        let outcome = self.inner.handle(event, now);
        let output = InteractionOutput::new(
            outcome,
            self.inner.is_transitioning(),
            self.inner.focus().pending_focus(),
        );
        to_json(&output)
    }
}
