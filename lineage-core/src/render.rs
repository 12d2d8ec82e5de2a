//! Render contract.
//!
//! The chart computes everything a renderer needs for one repaint and hands
//! it over in a fixed sequence: `begin_frame`, `draw_arcs`, `draw_labels`,
//! `draw_center`. Items come in breadth-first order, one per non-root node,
//! whether or not they are currently visible (opacity 0 hides them).

use serde::Serialize;

use crate::focus::CenterLabel;
use crate::layout::ViewBox;
use crate::layout::arc::{ArcShape, LabelTransform};
use crate::sheet::NodeId;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ArcItem {
    pub id: NodeId,
    pub name: String,
    pub shape: ArcShape,
    /// SVG path data for `shape`.
    pub path: String,
    /// CSS color.
    pub fill: String,
    pub opacity: f64,
    /// Receives pointer events.
    pub interactive: bool,
    /// Clicking zooms in (the node has children).
    pub clickable: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LabelItem {
    pub id: NodeId,
    pub text: String,
    pub transform: LabelTransform,
    /// SVG transform attribute for `transform`.
    pub transform_attr: String,
    pub font_size: f64,
    pub opacity: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CenterItem {
    #[serde(flatten)]
    pub label: CenterLabel,
    /// Radius of the clickable center disc.
    pub radius: f64,
}

/// Everything drawn in one repaint.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Frame {
    pub view_box: ViewBox,
    pub arcs: Vec<ArcItem>,
    pub labels: Vec<LabelItem>,
    pub center: CenterItem,
}

pub trait RenderAdapter {
    type Error;

    fn begin_frame(&mut self, view: &ViewBox) -> Result<(), Self::Error>;
    fn draw_arcs(&mut self, arcs: &[ArcItem]) -> Result<(), Self::Error>;
    fn draw_labels(&mut self, labels: &[LabelItem]) -> Result<(), Self::Error>;
    fn draw_center(&mut self, center: &CenterItem) -> Result<(), Self::Error>;
}

impl Frame {
    /// Replay this frame into `adapter`.
    pub fn render_to<A: RenderAdapter>(&self, adapter: &mut A) -> Result<(), A::Error> {
        adapter.begin_frame(&self.view_box)?;
        adapter.draw_arcs(&self.arcs)?;
        adapter.draw_labels(&self.labels)?;
        adapter.draw_center(&self.center)
    }
}
