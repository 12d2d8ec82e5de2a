// Chart session.
//
// A SunburstChart owns one built and laid out lineage together with its zoom
// state. Everything that only depends on the tree (colors, label text, label
// font sizes) is computed once at construction; per frame only geometry,
// opacity and the center label change.
//
// Events arrive already resolved to node ids by the host, which knows which
// SVG element was hit.

use serde::Serialize;

use crate::config::{SunburstConfig, TreeConfig};
use crate::error::Result;
use crate::focus::{CenterLabel, FocusController, FocusResponse, NodeStyle, fit_center_label};
use crate::layout::arc::{ArcShape, LabelTransform, label_font_size, truncate_label};
use crate::layout::palette::{Rgb, branch_colors, css_rgb};
use crate::layout::{Partition, ViewBox, partition, ring_unit};
use crate::render::{ArcItem, CenterItem, Frame, LabelItem, RenderAdapter};
use crate::sheet::{ChartTree, NodeId, SheetRow, build_tree, parse_sheet};
use crate::text::{HeuristicMeasurer, TextMeasurer};
use crate::tooltip::TooltipContent;

/// How pointer input is interpreted.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum InteractionMode {
    /// Hover shows the tooltip, click zooms.
    Pointer,
    /// Tap zooms and shows the tooltip.
    Touch,
}

impl InteractionMode {
    pub fn for_width(width: f64, touch_breakpoint: f64) -> Self {
        if width <= touch_breakpoint { InteractionMode::Touch } else { InteractionMode::Pointer }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum PointerEvent {
    Click { node: NodeId, alt: bool },
    ClickCenter { alt: bool },
    Hover { node: NodeId },
    Move,
    Leave,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "action", content = "content", rename_all = "camelCase")]
pub enum TooltipAction {
    None,
    Show(TooltipContent),
    UpdatePosition,
    Hide,
}

#[derive(Debug, Clone, PartialEq)]
pub struct InteractionOutcome {
    /// Set when the event asked for a focus change.
    pub focus: Option<FocusResponse>,
    pub tooltip: TooltipAction,
}

impl InteractionOutcome {
    fn ignored() -> Self {
        InteractionOutcome { focus: None, tooltip: TooltipAction::None }
    }
}

/// Parse a sheet export and build its lineage tree.
pub fn tree_from_sheet_text(text: &str, cfg: &TreeConfig) -> Result<ChartTree> {
    let sheet = parse_sheet(text)?;
    Ok(build_tree(&sheet.rows, &sheet.headers, cfg))
}

pub struct SunburstChart<M: TextMeasurer = HeuristicMeasurer> {
    tree: ChartTree,
    focus: FocusController,
    config: SunburstConfig,
    measurer: M,
    radius: f64,
    view_box: ViewBox,
    mode: InteractionMode,
    colors: Vec<Rgb>,
    label_text: Vec<String>,
    label_font: Vec<f64>,
    center: (NodeId, CenterLabel),
}

impl<M: TextMeasurer> SunburstChart<M> {
    pub fn from_sheet_text(
        text: &str,
        width: f64,
        height: f64,
        config: SunburstConfig,
        measurer: M,
    ) -> Result<Self> {
        let tree = tree_from_sheet_text(text, &config.tree)?;
        Self::from_tree(tree, width, height, config, measurer)
    }

    pub fn from_rows(
        rows: &[SheetRow],
        headers: &[String],
        width: f64,
        height: f64,
        config: SunburstConfig,
        measurer: M,
    ) -> Result<Self> {
        let tree = build_tree(rows, headers, &config.tree);
        Self::from_tree(tree, width, height, config, measurer)
    }

    pub fn from_tree(
        tree: ChartTree,
        width: f64,
        height: f64,
        config: SunburstConfig,
        measurer: M,
    ) -> Result<Self> {
        config.validate()?;
        let radius = ring_unit(width, height, &config.layout)?;
        let layout = partition(&tree);
        let view_box = ViewBox::for_chart(radius, layout.height, &config.layout);
        let mode = InteractionMode::for_width(width, config.interaction.touch_breakpoint);
        let colors = node_colors(&layout, &config.style.palette)?;

        let label_text = layout
            .nodes
            .iter()
            .map(|n| truncate_label(&tree.nodes[n.id.0].name, &n.layout, radius, &config.style))
            .collect();
        let label_font = layout
            .nodes
            .iter()
            .map(|n| label_font_size(&n.layout, radius, &config.style))
            .collect();

        let root = layout.root;
        let root_name = &tree.nodes[root.0].name;
        let center = fit_center_label(root_name, radius, &config.center_label, &measurer);
        let focus = FocusController::new(layout, config.motion.clone(), config.style.clone());

        log::debug!(
            "chart ready: {} people, ring unit {:.2}px, {:?} mode",
            tree.len(),
            radius,
            mode
        );
        Ok(SunburstChart {
            tree,
            focus,
            config,
            measurer,
            radius,
            view_box,
            mode,
            colors,
            label_text,
            label_font,
            center: (root, center),
        })
    }

    pub fn tree(&self) -> &ChartTree {
        &self.tree
    }

    pub fn partition(&self) -> &Partition {
        self.focus.partition()
    }

    pub fn focus(&self) -> &FocusController {
        &self.focus
    }

    pub fn radius(&self) -> f64 {
        self.radius
    }

    pub fn view_box(&self) -> ViewBox {
        self.view_box
    }

    pub fn interaction_mode(&self) -> InteractionMode {
        self.mode
    }

    pub fn is_transitioning(&self) -> bool {
        self.focus.is_transitioning()
    }

    /// Center label for the pending focus, refit only when the focus changes.
    fn center_label(&mut self) -> &CenterLabel {
        let pending = self.focus.pending_focus();
        if self.center.0 != pending {
            let name = &self.tree.nodes[pending.0].name;
            let label =
                fit_center_label(name, self.radius, &self.config.center_label, &self.measurer);
            self.center = (pending, label);
        }
        &self.center.1
    }

    /// Advance any running transition to `now` and describe the result.
    pub fn frame(&mut self, now: f64) -> Frame {
        self.focus.advance(now);

        let center = CenterItem { label: self.center_label().clone(), radius: self.radius };
        let part = self.focus.partition();
        let mut arcs = Vec::with_capacity(part.order.len());
        let mut labels = Vec::with_capacity(part.order.len());
        for id in part.descendants() {
            let node = &part.nodes[id.0];
            let style = self.focus.style_of(id).copied().unwrap_or(NodeStyle {
                arc_opacity: 0.0,
                label_opacity: 0.0,
                interactive: false,
            });
            let shape = ArcShape::from_geometry(&node.current, self.radius, &self.config.layout);
            arcs.push(ArcItem {
                id,
                name: self.tree.nodes[id.0].name.clone(),
                path: shape.to_svg_path(),
                shape,
                fill: css_rgb(self.colors[id.0]),
                opacity: style.arc_opacity,
                interactive: style.interactive,
                clickable: node.has_children(),
            });
            let transform = LabelTransform::from_geometry(&node.current, self.radius);
            labels.push(LabelItem {
                id,
                text: self.label_text[id.0].clone(),
                transform_attr: transform.to_svg(),
                transform,
                font_size: self.label_font[id.0],
                opacity: style.label_opacity,
            });
        }

        Frame { view_box: self.view_box, arcs, labels, center }
    }

    /// Advance to `now` and draw into `adapter`. Returns whether more frames
    /// are needed.
    pub fn render<A: RenderAdapter>(
        &mut self,
        adapter: &mut A,
        now: f64,
    ) -> std::result::Result<bool, A::Error> {
        let frame = self.frame(now);
        frame.render_to(adapter)?;
        Ok(self.is_transitioning())
    }

    pub fn handle(&mut self, event: PointerEvent, now: f64) -> InteractionOutcome {
        let interactive =
            |chart: &Self, node: NodeId| chart.focus.style_of(node).is_some_and(|s| s.interactive);

        match (self.mode, event) {
            (_, PointerEvent::ClickCenter { alt }) => InteractionOutcome {
                focus: Some(self.focus.request_parent(alt, now)),
                tooltip: TooltipAction::None,
            },
            (mode, PointerEvent::Click { node, alt }) => {
                if !interactive(self, node) {
                    return InteractionOutcome::ignored();
                }
                let focus = Some(self.focus.request_focus(node, alt, now));
                let tooltip = match mode {
                    InteractionMode::Touch => self.tooltip_for(node),
                    InteractionMode::Pointer => TooltipAction::None,
                };
                InteractionOutcome { focus, tooltip }
            }
            (InteractionMode::Pointer, PointerEvent::Hover { node }) => {
                if !interactive(self, node) {
                    return InteractionOutcome::ignored();
                }
                InteractionOutcome { focus: None, tooltip: self.tooltip_for(node) }
            }
            (InteractionMode::Pointer, PointerEvent::Move) => {
                InteractionOutcome { focus: None, tooltip: TooltipAction::UpdatePosition }
            }
            (InteractionMode::Pointer, PointerEvent::Leave) => {
                InteractionOutcome { focus: None, tooltip: TooltipAction::Hide }
            }
            (InteractionMode::Touch, _) => InteractionOutcome::ignored(),
        }
    }

    fn tooltip_for(&self, node: NodeId) -> TooltipAction {
        match self.tree.get(node) {
            Some(person) => TooltipAction::Show(TooltipContent::for_node(person)),
            None => TooltipAction::None,
        }
    }
}

/// Color of every node, taken from its depth-1 branch.
fn node_colors(layout: &Partition, palette: &[String]) -> Result<Vec<Rgb>> {
    let branches = &layout.nodes[layout.root.0].children;
    let branch_rgb = branch_colors(palette, branches.len())?;
    let mut by_branch = vec![0_usize; layout.nodes.len()];
    for (i, b) in branches.iter().enumerate() {
        by_branch[b.0] = i;
    }
    Ok(layout
        .nodes
        .iter()
        .map(|n| match layout.branch_of(n.id) {
            Some(b) => branch_rgb[by_branch[b.0]],
            None => [0, 0, 0],
        })
        .collect())
}
