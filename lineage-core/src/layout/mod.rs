// Radial partition layout.
//
// Turns a ChartTree into nested annular sectors:
// - Values: leaves weigh their value (1), internal nodes the sum of children
// - Siblings are sorted (see order.rs) before any angle is assigned
// - Root spans the full turn [0, 2π) and the radial band [0, 1)
// - A node at depth d spans [d, d+1) radially; its angular span is split among
//   its children in proportion to their values, left to right
//
// Properties:
// - Deterministic: same tree, same geometry, bit for bit
// - Children's spans add up to the parent's span (up to float rounding)
//
// Geometry is kept in abstract units (radians, depth). Scaling to pixels
// happens in arc.rs with the ring unit computed from the viewport.

use std::collections::VecDeque;
use std::f64::consts::TAU;

use serde::Serialize;

use crate::config::LayoutConfig;
use crate::error::{Result, SunburstError};
use crate::sheet::{ChartTree, NodeId};

pub mod arc;
pub mod order;
pub mod palette;

use order::{SiblingKey, compare_siblings, parse_year};

/// Angular span `[x0, x1)` in radians, radial span `[y0, y1)` in depth units.
#[derive(Debug, Copy, Clone, PartialEq, Default, Serialize)]
pub struct Geometry {
    pub x0: f64,
    pub x1: f64,
    pub y0: f64,
    pub y1: f64,
}

impl Geometry {
    pub fn angular_span(&self) -> f64 {
        self.x1 - self.x0
    }

    pub fn radial_span(&self) -> f64 {
        self.y1 - self.y0
    }

    /// Interpolate every bound independently; `t` in [0, 1].
    pub fn lerp(&self, to: &Geometry, t: f64) -> Geometry {
        let mix = |a: f64, b: f64| a + (b - a) * t;
        Geometry {
            x0: mix(self.x0, to.x0),
            x1: mix(self.x1, to.x1),
            y0: mix(self.y0, to.y0),
            y1: mix(self.y1, to.y1),
        }
    }
}

/// A tree node with its layout and render-time geometry.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PositionedNode {
    pub id: NodeId,
    pub parent: Option<NodeId>,
    /// Sorted sibling order.
    pub children: Vec<NodeId>,
    /// Distance from the overall root (root = 0).
    pub depth: usize,
    /// Sum of descendant leaf values.
    pub value: f64,
    /// Partition result; never changes after layout.
    pub layout: Geometry,
    /// Geometry currently rendered.
    pub current: Geometry,
    /// Geometry the active (or last) transition animates toward.
    pub target: Geometry,
}

impl PositionedNode {
    pub fn has_children(&self) -> bool {
        !self.children.is_empty()
    }
}

/// Positioned nodes indexed by `NodeId`, plus a breadth-first draw order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Partition {
    pub root: NodeId,
    pub nodes: Vec<PositionedNode>,
    /// Breadth-first from the root, siblings in sorted order.
    pub order: Vec<NodeId>,
    /// Maximum depth in the tree.
    pub height: usize,
}

impl Partition {
    pub fn get(&self, id: NodeId) -> Option<&PositionedNode> {
        self.nodes.get(id.0)
    }

    /// Node ids except the root, in draw order.
    pub fn descendants(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.order.iter().copied().filter(move |&id| id != self.root)
    }

    /// Ancestor at depth 1 (the root ring branch), None for the root itself.
    pub fn branch_of(&self, id: NodeId) -> Option<NodeId> {
        let mut cur = self.nodes.get(id.0)?;
        if cur.depth == 0 {
            return None;
        }
        while cur.depth > 1 {
            cur = &self.nodes[cur.parent?.0];
        }
        Some(cur.id)
    }
}

pub fn partition(tree: &ChartTree) -> Partition {
    let n = tree.len();

    // Ids are pre-order, so a reverse sweep visits children before parents.
    let mut values = vec![0.0_f64; n];
    for node in tree.nodes.iter().rev() {
        let own = node.value.unwrap_or(0.0);
        let sum: f64 = node.children.iter().map(|c| values[c.0]).sum();
        values[node.id.0] = own + sum;
    }

    let mut depths = vec![0_usize; n];
    for node in &tree.nodes {
        for c in &node.children {
            depths[c.0] = depths[node.id.0] + 1;
        }
    }
    let height = depths.iter().copied().max().unwrap_or(0);

    let mut nodes: Vec<PositionedNode> = tree
        .nodes
        .iter()
        .map(|p| {
            let mut children = p.children.clone();
            children.sort_by(|a, b| {
                let key = |id: &NodeId| SiblingKey {
                    end_year: tree.nodes[id.0].end_year.as_deref().and_then(parse_year),
                    value: Some(values[id.0]),
                };
                compare_siblings(&key(a), &key(b))
            });
            PositionedNode {
                id: p.id,
                parent: p.parent,
                children,
                depth: depths[p.id.0],
                value: values[p.id.0],
                layout: Geometry::default(),
                current: Geometry::default(),
                target: Geometry::default(),
            }
        })
        .collect();

    let root = tree.root;
    let mut order = Vec::with_capacity(n);
    if n > 0 {
        nodes[root.0].layout = Geometry { x0: 0.0, x1: TAU, y0: 0.0, y1: 1.0 };

        let mut queue: VecDeque<NodeId> = VecDeque::from([root]);
        while let Some(id) = queue.pop_front() {
            order.push(id);
            let parent = nodes[id.0].layout;
            let value = nodes[id.0].value;
            let k = if value > 0.0 { parent.angular_span() / value } else { 0.0 };

            let mut x = parent.x0;
            for i in 0..nodes[id.0].children.len() {
                let c = nodes[id.0].children[i];
                let child = &mut nodes[c.0];
                let y0 = child.depth as f64;
                let x0 = x;
                x += child.value * k;
                child.layout = Geometry { x0, x1: x, y0, y1: y0 + 1.0 };
                queue.push_back(c);
            }
        }
    }

    for node in &mut nodes {
        node.current = node.layout;
        node.target = node.layout;
    }

    log::debug!("partitioned {} nodes, height {}", n, height);
    Partition { root, nodes, order, height }
}

/// Pixel length of one depth unit for a viewport.
pub fn ring_unit(width: f64, height: f64, cfg: &LayoutConfig) -> Result<f64> {
    let valid = |v: f64| v.is_finite() && v > 0.0;
    if !valid(width) || !valid(height) {
        return Err(SunburstError::InvalidViewport { width, height });
    }
    Ok(width.min(height) * cfg.viewport_fraction / cfg.ring_count)
}

/// Square view box centered on the chart origin.
#[derive(Debug, Copy, Clone, PartialEq, Serialize)]
pub struct ViewBox {
    pub min_x: f64,
    pub min_y: f64,
    pub width: f64,
    pub height: f64,
}

impl ViewBox {
    pub fn for_chart(radius: f64, tree_height: usize, cfg: &LayoutConfig) -> Self {
        let max_radius = radius * (tree_height as f64 + 1.0);
        let size = max_radius * 2.0 + cfg.view_padding;
        ViewBox { min_x: -size / 2.0, min_y: -size / 2.0, width: size, height: size }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::TreeConfig;
    use crate::sheet::{build_tree, parse_sheet};
    use float_cmp::approx_eq;

    fn tree_from(csv: &str) -> ChartTree {
        let sheet = parse_sheet(csv).unwrap();
        build_tree(&sheet.rows, &sheet.headers, &TreeConfig::default())
    }

    fn sample() -> ChartTree {
        tree_from(
            "Name,PhD Students,PhD Completion Year\n\
             A,B;C;D,\n\
             B,E;F,2001\n\
             C,,1995\n\
             D,G,\n\
             H,,\n\
             I,J;K;L,\n",
        )
    }

    fn by_name<'a>(tree: &ChartTree, p: &'a Partition, name: &str) -> &'a PositionedNode {
        &p.nodes[tree.find(name).unwrap().id.0]
    }

    #[test]
    fn test_values_are_leaf_sums() {
        let tree = tree_from("Name,PhD Students\nA,B;C\nB,\nC,\n");
        let p = partition(&tree);
        assert_eq!(by_name(&tree, &p, "A").value, 2.0);
        assert_eq!(by_name(&tree, &p, "B").value, 1.0);
        assert_eq!(p.nodes[0].value, 2.0);

        let tree = sample();
        let p = partition(&tree);
        for node in &p.nodes {
            if node.children.is_empty() {
                assert_eq!(node.value, 1.0);
            } else {
                let sum: f64 = node.children.iter().map(|c| p.nodes[c.0].value).sum();
                assert_eq!(node.value, sum);
            }
        }
        assert_eq!(p.nodes[0].value, 8.0);
    }

    #[test]
    fn test_children_spans_sum_to_parent() {
        let tree = sample();
        let p = partition(&tree);
        for node in &p.nodes {
            if node.children.is_empty() {
                continue;
            }
            let sum: f64 = node.children.iter().map(|c| p.nodes[c.0].layout.angular_span()).sum();
            assert!(approx_eq!(f64, sum, node.layout.angular_span(), epsilon = 1e-9));
            let first = &p.nodes[node.children[0].0];
            let last = &p.nodes[node.children[node.children.len() - 1].0];
            assert!(approx_eq!(f64, first.layout.x0, node.layout.x0, epsilon = 1e-12));
            assert!(approx_eq!(f64, last.layout.x1, node.layout.x1, epsilon = 1e-9));
        }
    }

    #[test]
    fn test_spans_proportional_to_value() {
        let tree = sample();
        let p = partition(&tree);
        let total = p.nodes[0].value;
        for node in &p.nodes {
            let expected = TAU * node.value / total;
            assert!(approx_eq!(f64, node.layout.angular_span(), expected, epsilon = 1e-9));
        }
    }

    #[test]
    fn test_radial_bands_follow_depth() {
        let tree = sample();
        let p = partition(&tree);
        assert_eq!(p.height, 3);
        for node in &p.nodes {
            assert_eq!(node.layout.y0, node.depth as f64);
            assert_eq!(node.layout.y1, node.depth as f64 + 1.0);
        }
    }

    #[test]
    fn test_sibling_order_applied() {
        let tree = sample();
        let p = partition(&tree);
        let a = by_name(&tree, &p, "A");
        let names: Vec<&str> = a.children.iter().map(|c| tree.nodes[c.0].name.as_str()).collect();
        // C (1995) < B (2001) < D (no year)
        assert_eq!(names, vec!["C", "B", "D"]);

        // Root ring: no years, larger subtree first, ties keep listing order.
        let root: Vec<&str> = p.nodes[0]
            .children
            .iter()
            .map(|c| tree.nodes[c.0].name.as_str())
            .collect();
        assert_eq!(root, vec!["A", "I", "H"]);

        let c = by_name(&tree, &p, "C");
        let b = by_name(&tree, &p, "B");
        assert!(c.layout.x1 <= b.layout.x0 + 1e-12);
    }

    #[test]
    fn test_breadth_first_order() {
        let tree = sample();
        let p = partition(&tree);
        let depths: Vec<usize> = p.order.iter().map(|id| p.nodes[id.0].depth).collect();
        assert!(depths.windows(2).all(|w| w[0] <= w[1]));
        assert_eq!(p.order.len(), tree.len());
        assert_eq!(p.descendants().count(), tree.len() - 1);
    }

    #[test]
    fn test_layout_is_deterministic() {
        let a = partition(&sample());
        let b = partition(&sample());
        assert_eq!(a, b);
    }

    #[test]
    fn test_bare_root() {
        let tree = tree_from("");
        let p = partition(&tree);
        assert_eq!(p.nodes.len(), 1);
        assert_eq!(p.height, 0);
        assert_eq!(p.nodes[0].layout, Geometry { x0: 0.0, x1: TAU, y0: 0.0, y1: 1.0 });
        assert_eq!(p.descendants().count(), 0);
    }

    #[test]
    fn test_branch_of() {
        let tree = sample();
        let p = partition(&tree);
        let a = tree.find("A").unwrap().id;
        let e = tree.find("E").unwrap().id;
        assert_eq!(p.branch_of(e), Some(a));
        assert_eq!(p.branch_of(a), Some(a));
        assert_eq!(p.branch_of(p.root), None);
    }

    #[test]
    fn test_ring_unit_and_view_box() {
        let cfg = LayoutConfig::default();
        let r = ring_unit(1200.0, 800.0, &cfg).unwrap();
        assert!(approx_eq!(f64, r, 60.0, epsilon = 1e-12));
        assert!(ring_unit(0.0, 800.0, &cfg).is_err());
        assert!(ring_unit(f64::NAN, 800.0, &cfg).is_err());

        let vb = ViewBox::for_chart(r, 3, &cfg);
        assert!(approx_eq!(f64, vb.width, 500.0, epsilon = 1e-9));
        assert!(approx_eq!(f64, vb.min_x, -250.0, epsilon = 1e-9));
    }
}
