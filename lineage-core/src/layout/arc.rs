// Arc geometry in pixels, visibility predicates and label placement.
//
// Angles follow the SVG sunburst convention: 0 at twelve o'clock, growing
// clockwise. A point at angle a and radius r sits at (r·sin a, -r·cos a).

use std::f64::consts::PI;

use lyon_path::builder::SvgPathBuilder;
use lyon_path::geom::ArcFlags;
use lyon_path::math::{Angle, point, vector};
use lyon_path::{Path, PathEvent};
use serde::Serialize;

use crate::config::{LayoutConfig, StyleConfig};
use crate::layout::Geometry;

/// Drawn only once it sits on ring 1 or beyond and has some angular width.
pub fn arc_visible(g: &Geometry) -> bool {
    g.y0 >= 1.0 && g.x1 > g.x0
}

/// Labels additionally need enough angular x radial area to be readable.
pub fn label_visible(g: &Geometry, style: &StyleConfig) -> bool {
    g.y0 >= 1.0 && g.radial_span() * g.angular_span() > style.label_area_threshold
}

/// Fill opacity of a visible arc. `depth` is measured from the overall root.
pub fn arc_opacity(depth: usize, style: &StyleConfig) -> f64 {
    let factor = (1.0 - (depth as f64 - 1.0) * style.depth_falloff).max(style.min_depth_factor);
    style.base_opacity * factor
}

/// Padded annular sector in pixels.
#[derive(Debug, Copy, Clone, PartialEq, Serialize)]
pub struct ArcShape {
    pub start_angle: f64,
    pub end_angle: f64,
    pub inner_radius: f64,
    pub outer_radius: f64,
}

impl ArcShape {
    pub fn from_geometry(g: &Geometry, radius: f64, cfg: &LayoutConfig) -> Self {
        let pad = (g.angular_span() / 2.0).min(cfg.pad_angle).max(0.0);
        let inner_radius = g.y0 * radius;
        ArcShape {
            start_angle: g.x0 + pad / 2.0,
            end_angle: g.x1 - pad / 2.0,
            inner_radius,
            outer_radius: inner_radius.max(g.y1 * radius - cfg.ring_gap),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.end_angle <= self.start_angle || self.outer_radius <= self.inner_radius
    }

    /// The padded sector as a lyon path. Arcs are flattened into quadratic
    /// curves by the builder. Empty shapes produce an empty path.
    pub fn to_path(&self) -> Path {
        let mut builder = Path::builder().with_svg();
        if self.is_empty() {
            return builder.build();
        }
        let at = |r: f64, a: f64| point((r * a.sin()) as f32, (-r * a.cos()) as f32);
        let radii = |r: f64| vector(r as f32, r as f32);
        let sweep = self.end_angle - self.start_angle;
        let (r0, r1) = (self.inner_radius, self.outer_radius);

        // A full ring cannot be drawn with a single arc, since its end point
        // equals its start point. Draw two half turns instead, and cut the hole
        // with the opposite winding.
        if sweep >= 2.0 * PI - 1e-9 {
            let half = ArcFlags { large_arc: false, sweep: true };
            builder.move_to(at(r1, 0.0));
            builder.arc_to(radii(r1), Angle::zero(), half, at(r1, PI));
            builder.arc_to(radii(r1), Angle::zero(), half, at(r1, 0.0));
            builder.close();
            if r0 > 0.0 {
                let back = ArcFlags { large_arc: false, sweep: false };
                builder.move_to(at(r0, 0.0));
                builder.arc_to(radii(r0), Angle::zero(), back, at(r0, PI));
                builder.arc_to(radii(r0), Angle::zero(), back, at(r0, 0.0));
                builder.close();
            }
            return builder.build();
        }

        let large_arc = sweep > PI;
        builder.move_to(at(r1, self.start_angle));
        builder.arc_to(
            radii(r1),
            Angle::zero(),
            ArcFlags { large_arc, sweep: true },
            at(r1, self.end_angle),
        );
        if r0 > 0.0 {
            builder.line_to(at(r0, self.end_angle));
            builder.arc_to(
                radii(r0),
                Angle::zero(),
                ArcFlags { large_arc, sweep: false },
                at(r0, self.start_angle),
            );
        } else {
            builder.line_to(point(0.0, 0.0));
        }
        builder.close();
        builder.build()
    }

    /// SVG path data for [`ArcShape::to_path`].
    pub fn to_svg_path(&self) -> String {
        svg_path_data(&self.to_path())
    }
}

/// Serialize path events as SVG path commands.
pub fn svg_path_data(path: &Path) -> String {
    let mut d = String::new();
    for event in path.iter() {
        match event {
            PathEvent::Begin { at } => d.push_str(&format!("M{:.3},{:.3}", at.x, at.y)),
            PathEvent::Line { to, .. } => d.push_str(&format!("L{:.3},{:.3}", to.x, to.y)),
            PathEvent::Quadratic { ctrl, to, .. } => d.push_str(&format!(
                "Q{:.3},{:.3},{:.3},{:.3}",
                ctrl.x, ctrl.y, to.x, to.y
            )),
            PathEvent::Cubic { ctrl1, ctrl2, to, .. } => d.push_str(&format!(
                "C{:.3},{:.3},{:.3},{:.3},{:.3},{:.3}",
                ctrl1.x, ctrl1.y, ctrl2.x, ctrl2.y, to.x, to.y
            )),
            PathEvent::End { close, .. } => {
                if close {
                    d.push('Z');
                }
            }
        }
    }
    d
}

/// Rotate to the mid angle, move out to the mid radius, and flip text on the
/// left half so it stays upright.
#[derive(Debug, Copy, Clone, PartialEq, Serialize)]
pub struct LabelTransform {
    /// Degrees, already offset by -90 so 0 points right.
    pub rotate: f64,
    pub translate: f64,
    pub flip: bool,
}

impl LabelTransform {
    pub fn from_geometry(g: &Geometry, radius: f64) -> Self {
        let mid_deg = (g.x0 + g.x1) / 2.0 * 180.0 / PI;
        let mid_radius = (g.y0 + g.y1) / 2.0 * radius;
        LabelTransform { rotate: mid_deg - 90.0, translate: mid_radius, flip: mid_deg >= 180.0 }
    }

    pub fn to_svg(&self) -> String {
        format!(
            "rotate({}) translate({},0) rotate({})",
            self.rotate,
            self.translate,
            if self.flip { 180 } else { 0 }
        )
    }
}

/// Font size of a ring label.
pub fn label_font_size(g: &Geometry, radius: f64, style: &StyleConfig) -> f64 {
    g.radial_span() * radius * style.label_font_factor
}

/// Shorten `text` with "..." when its estimated width exceeds what the
/// sector offers. Keeps at least one character before the ellipsis.
pub fn truncate_label(text: &str, g: &Geometry, radius: f64, style: &StyleConfig) -> String {
    let available = (g.y0 + g.y1) / 2.0 * radius;
    let font_size = g.radial_span() * radius * style.truncate_font_factor;
    let char_width = font_size * style.char_width_factor;
    if char_width <= 0.0 {
        return text.to_string();
    }
    let max_chars = (available / char_width).floor().max(0.0) as usize;

    let len = text.chars().count();
    if len <= max_chars {
        return text.to_string();
    }
    let keep = max_chars.saturating_sub(3).max(1);
    let mut out: String = text.chars().take(keep).collect();
    out.push_str("...");
    out
}
