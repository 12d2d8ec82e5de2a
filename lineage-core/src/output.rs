//! Output types for the JavaScript front end.
//!
//! These structs are serialized to JSON and handed to the page, which only
//! has to copy the values into SVG attributes.

use std::convert::Infallible;

use serde::Serialize;

use crate::chart::{InteractionOutcome, TooltipAction};
use crate::focus::FocusResponse;
use crate::layout::ViewBox;
use crate::render::{ArcItem, CenterItem, LabelItem, RenderAdapter};
use crate::sheet::NodeId;

/// One repaint, as sent to the page.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FrameOutput {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub view_box: Option<ViewBox>,
    pub arcs: Vec<ArcItem>,
    pub labels: Vec<LabelItem>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub center: Option<CenterItem>,
    /// The page should request another frame.
    pub transitioning: bool,
}

/// Adapter that records the draw calls of a frame.
#[derive(Debug, Default)]
pub struct FrameCollector {
    output: FrameOutput,
}

impl FrameCollector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn finish(mut self, transitioning: bool) -> FrameOutput {
        self.output.transitioning = transitioning;
        self.output
    }
}

impl RenderAdapter for FrameCollector {
    type Error = Infallible;

    fn begin_frame(&mut self, view: &ViewBox) -> Result<(), Infallible> {
        self.output = FrameOutput { view_box: Some(*view), ..FrameOutput::default() };
        Ok(())
    }

    fn draw_arcs(&mut self, arcs: &[ArcItem]) -> Result<(), Infallible> {
        self.output.arcs.extend_from_slice(arcs);
        Ok(())
    }

    fn draw_labels(&mut self, labels: &[LabelItem]) -> Result<(), Infallible> {
        self.output.labels.extend_from_slice(labels);
        Ok(())
    }

    fn draw_center(&mut self, center: &CenterItem) -> Result<(), Infallible> {
        self.output.center = Some(center.clone());
        Ok(())
    }
}

/// Result of one pointer event, as sent to the page.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InteractionOutput {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub focus: Option<FocusResponse>,
    pub tooltip: TooltipAction,
    pub transitioning: bool,
    /// Node the chart is focused on, or zooming to.
    pub focus_node: NodeId,
}

impl InteractionOutput {
    pub fn new(outcome: InteractionOutcome, transitioning: bool, focus_node: NodeId) -> Self {
        InteractionOutput {
            focus: outcome.focus,
            tooltip: outcome.tooltip,
            transitioning,
            focus_node,
        }
    }
}
