// Zoom state machine.
//
// Goals:
// - One focus node at a time; the focus fills the full turn and sits on the
//   innermost drawn ring
// - Focus changes animate over a fixed duration; requests arriving while a
//   change is in flight are rejected, never queued
// - Time is supplied by the caller, so the whole machine is a pure function
//   of (state, now) and runs the same natively and in the browser
//
// Properties:
// - Targets are always derived from the base partition geometry, so zooming
//   into a node and back out to its parent restores the previous geometry
// - Once a transition completes every node's current geometry equals its
//   target geometry

use std::f64::consts::TAU;

use serde::Serialize;

use crate::config::{MotionConfig, StyleConfig};
use crate::layout::arc::{arc_opacity, arc_visible, label_visible};
use crate::layout::{Geometry, Partition, PositionedNode};
use crate::sheet::NodeId;

pub mod center_label;
pub mod transition;

pub use center_label::{CenterLabel, fit_center_label};
pub use transition::ease_quad_in_out;

use transition::{LabelTrack, Track, Transition};

/// Result of a focus request.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum FocusResponse {
    Started,
    /// A transition is already running; nothing changed.
    Busy,
    /// Leaves cannot be zoomed into.
    NotExpandable,
    Unknown,
}

/// Render attributes that are not geometry.
#[derive(Debug, Copy, Clone, PartialEq, Serialize)]
pub struct NodeStyle {
    pub arc_opacity: f64,
    pub label_opacity: f64,
    /// Whether the arc receives pointer events.
    pub interactive: bool,
}

/// Geometry of `d` once `focus` fills the chart.
pub fn focus_target(d: &Geometry, focus: &Geometry, focus_depth: usize) -> Geometry {
    let span = focus.angular_span();
    let angle = |x: f64| {
        let rel = if span > 0.0 { (x - focus.x0) / span } else { 0.0 };
        rel.clamp(0.0, 1.0) * TAU
    };
    let depth = focus_depth as f64;
    Geometry {
        x0: angle(d.x0),
        x1: angle(d.x1),
        y0: (d.y0 - depth).max(0.0),
        y1: (d.y1 - depth).max(0.0),
    }
}

fn resting_arc_opacity(node: &PositionedNode, g: &Geometry, style: &StyleConfig) -> f64 {
    if arc_visible(g) { arc_opacity(node.depth, style) } else { 0.0 }
}

#[derive(Debug, Clone)]
pub struct FocusController {
    partition: Partition,
    styles: Vec<NodeStyle>,
    focus: NodeId,
    transition: Option<Transition>,
    motion: MotionConfig,
    style: StyleConfig,
}

impl FocusController {
    /// Idle controller focused on the root.
    pub fn new(partition: Partition, motion: MotionConfig, style: StyleConfig) -> Self {
        let styles = partition
            .nodes
            .iter()
            .map(|n| NodeStyle {
                arc_opacity: resting_arc_opacity(n, &n.current, &style),
                label_opacity: if label_visible(&n.current, &style) { 1.0 } else { 0.0 },
                interactive: arc_visible(&n.current),
            })
            .collect();
        let focus = partition.root;
        Self { partition, styles, focus, transition: None, motion, style }
    }

    pub fn focus(&self) -> NodeId {
        self.focus
    }

    /// Where the chart is heading: the transition's focus, or the focus when idle.
    pub fn pending_focus(&self) -> NodeId {
        self.transition.as_ref().map_or(self.focus, |t| t.focus)
    }

    pub fn is_transitioning(&self) -> bool {
        self.transition.is_some()
    }

    pub fn partition(&self) -> &Partition {
        &self.partition
    }

    pub fn nodes(&self) -> &[PositionedNode] {
        &self.partition.nodes
    }

    pub fn style_of(&self, id: NodeId) -> Option<&NodeStyle> {
        self.styles.get(id.0)
    }

    /// Zoom into `node`. Only nodes with children can take the focus.
    pub fn request_focus(&mut self, node: NodeId, slow: bool, now: f64) -> FocusResponse {
        if self.transition.is_some() {
            return FocusResponse::Busy;
        }
        let Some(target) = self.partition.get(node) else {
            return FocusResponse::Unknown;
        };
        if !target.has_children() {
            return FocusResponse::NotExpandable;
        }
        self.start(node, slow, now);
        FocusResponse::Started
    }

    /// Zoom out to the parent of the focus (the root stays on the root).
    pub fn request_parent(&mut self, slow: bool, now: f64) -> FocusResponse {
        if self.transition.is_some() {
            return FocusResponse::Busy;
        }
        let parent = self
            .partition
            .get(self.focus)
            .and_then(|n| n.parent)
            .unwrap_or(self.partition.root);
        self.start(parent, slow, now);
        FocusResponse::Started
    }

    fn start(&mut self, p: NodeId, slow: bool, now: f64) {
        let focus_node = &self.partition.nodes[p.0];
        let (focus_geom, focus_depth) = (focus_node.layout, focus_node.depth);

        let mut arcs = Vec::new();
        let mut labels = Vec::new();
        for (node, style) in self.partition.nodes.iter_mut().zip(self.styles.iter_mut()) {
            node.target = focus_target(&node.layout, &focus_geom, focus_depth);

            let active = arc_visible(&node.current)
                || arc_visible(&node.target)
                || node.current.y0 == 0.0
                || node.target.y0 == 0.0;
            if active {
                arcs.push(Track {
                    id: node.id,
                    from: node.current,
                    to: node.target,
                    from_opacity: style.arc_opacity,
                    to_opacity: resting_arc_opacity(node, &node.target, &self.style),
                });
            } else {
                node.current = node.target;
                style.arc_opacity = 0.0;
            }
            style.interactive = arc_visible(&node.target);

            if label_visible(&node.target, &self.style) {
                labels.push(LabelTrack {
                    id: node.id,
                    from_opacity: style.label_opacity,
                    to_opacity: 1.0,
                });
            } else {
                style.label_opacity = 0.0;
            }
        }

        let duration = if slow { self.motion.slow_duration_ms } else { self.motion.duration_ms };
        log::debug!(
            "focus {:?} -> {:?} over {}ms ({} arcs, {} labels animate)",
            self.focus,
            p,
            duration,
            arcs.len(),
            labels.len()
        );
        self.transition = Some(Transition { focus: p, start: now, duration, arcs, labels });
    }

    /// Step the running transition to `now`. Returns true while it is still
    /// running after this step.
    pub fn advance(&mut self, now: f64) -> bool {
        let Some(t) = self.transition.as_ref() else {
            return false;
        };
        let fraction = t.fraction(now);
        let eased = ease_quad_in_out(fraction);

        for track in &t.arcs {
            self.partition.nodes[track.id.0].current = Transition::geometry_at(track, eased);
            self.styles[track.id.0].arc_opacity =
                Transition::opacity_at(track.from_opacity, track.to_opacity, eased);
        }
        for track in &t.labels {
            self.styles[track.id.0].label_opacity =
                Transition::opacity_at(track.from_opacity, track.to_opacity, eased);
        }

        if fraction < 1.0 {
            return true;
        }
        self.focus = t.focus;
        self.transition = None;
        for node in &mut self.partition.nodes {
            node.current = node.target;
        }
        log::debug!("focus settled on {:?}", self.focus);
        false
    }
}
