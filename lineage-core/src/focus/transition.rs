use crate::layout::Geometry;
use crate::sheet::NodeId;

/// Quadratic ease-in-out on [0, 1].
pub fn ease_quad_in_out(t: f64) -> f64 {
    let t = t.clamp(0.0, 1.0) * 2.0;
    if t <= 1.0 {
        t * t / 2.0
    } else {
        let t = t - 1.0;
        (t * (2.0 - t) + 1.0) / 2.0
    }
}

fn mix(a: f64, b: f64, t: f64) -> f64 {
    a + (b - a) * t
}

/// Per-node animation track, captured when the transition starts.
#[derive(Debug, Clone)]
pub(crate) struct Track {
    pub id: NodeId,
    pub from: Geometry,
    pub to: Geometry,
    pub from_opacity: f64,
    pub to_opacity: f64,
}

/// Label opacity track; labels move with their arc's geometry.
#[derive(Debug, Clone)]
pub(crate) struct LabelTrack {
    pub id: NodeId,
    pub from_opacity: f64,
    pub to_opacity: f64,
}

/// One in-flight focus change.
#[derive(Debug, Clone)]
pub(crate) struct Transition {
    pub focus: NodeId,
    pub start: f64,
    pub duration: f64,
    pub arcs: Vec<Track>,
    pub labels: Vec<LabelTrack>,
}

impl Transition {
    /// Linear time fraction at `now`, clamped to [0, 1].
    pub fn fraction(&self, now: f64) -> f64 {
        if self.duration <= 0.0 {
            return 1.0;
        }
        ((now - self.start) / self.duration).clamp(0.0, 1.0)
    }

    pub fn geometry_at(track: &Track, eased: f64) -> Geometry {
        track.from.lerp(&track.to, eased)
    }

    pub fn opacity_at(from: f64, to: f64, eased: f64) -> f64 {
        mix(from, to, eased)
    }
}
