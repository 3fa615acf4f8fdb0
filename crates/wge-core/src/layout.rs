//! Top-down tidy tree layout for reconciliation graphs.
//!
//! Subtrees are placed left to right and pushed apart level by level until
//! their contours are at least one node step apart, then each parent is
//! centred over its first and last child. Positions are node centres; the
//! root sits at the origin and `y` grows with depth.

use crate::tree::ReconciliationNode;
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// NodeSize
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NodeSize {
    #[serde(default = "default_width")]
    pub width: f64,
    #[serde(default = "default_height")]
    pub height: f64,
    #[serde(default = "default_vertical_separation")]
    pub vertical_separation: f64,
    #[serde(default = "default_horizontal_separation")]
    pub horizontal_separation: f64,
}

fn default_width() -> f64 {
    800.0
}

fn default_height() -> f64 {
    300.0
}

fn default_vertical_separation() -> f64 {
    150.0
}

fn default_horizontal_separation() -> f64 {
    100.0
}

impl Default for NodeSize {
    fn default() -> Self {
        Self {
            width: default_width(),
            height: default_height(),
            vertical_separation: default_vertical_separation(),
            horizontal_separation: default_horizontal_separation(),
        }
    }
}

impl NodeSize {
    /// Distance between the centres of adjacent siblings.
    pub fn step_x(&self) -> f64 {
        self.width + self.horizontal_separation
    }

    /// Distance between the centres of adjacent levels.
    pub fn step_y(&self) -> f64 {
        self.height + self.vertical_separation
    }
}

// ---------------------------------------------------------------------------
// Layout output
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PositionedNode {
    pub index: usize,
    pub parent: Option<usize>,
    pub depth: usize,
    pub x: f64,
    pub y: f64,
    pub name: String,
    pub namespace: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub cluster_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suspended: Option<bool>,
    pub is_current_node: bool,
}

/// Parent to child, as indices into [`Layout::descendants`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Edge {
    pub source: usize,
    pub target: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Bounds {
    pub min_x: f64,
    pub max_x: f64,
    pub min_y: f64,
    pub max_y: f64,
}

impl Bounds {
    pub fn width(&self) -> f64 {
        self.max_x - self.min_x
    }

    pub fn height(&self) -> f64 {
        self.max_y - self.min_y
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Layout {
    /// Breadth-first, root first.
    pub descendants: Vec<PositionedNode>,
    /// One per non-root node, in `descendants` order.
    pub links: Vec<Edge>,
}

impl Layout {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.descendants.is_empty()
    }

    /// Extent of the node boxes, not just their centres.
    pub fn bounds(&self, size: &NodeSize) -> Option<Bounds> {
        let first = self.descendants.first()?;
        let init = Bounds {
            min_x: first.x,
            max_x: first.x,
            min_y: first.y,
            max_y: first.y,
        };
        let b = self.descendants.iter().fold(init, |b, n| Bounds {
            min_x: b.min_x.min(n.x),
            max_x: b.max_x.max(n.x),
            min_y: b.min_y.min(n.y),
            max_y: b.max_y.max(n.y),
        });
        Some(Bounds {
            min_x: b.min_x - size.width / 2.0,
            max_x: b.max_x + size.width / 2.0,
            min_y: b.min_y - size.height / 2.0,
            max_y: b.max_y + size.height / 2.0,
        })
    }
}

// ---------------------------------------------------------------------------
// Layout algorithm
// ---------------------------------------------------------------------------

struct Slot<'a> {
    node: &'a ReconciliationNode,
    parent: Option<usize>,
    depth: usize,
    children: Vec<usize>,
}

/// Leftmost and rightmost offset per level, relative to the subtree root.
#[derive(Debug, Clone)]
struct Contour {
    left: Vec<f64>,
    right: Vec<f64>,
}

impl Contour {
    fn leaf() -> Self {
        Self {
            left: vec![0.0],
            right: vec![0.0],
        }
    }

    /// Offset at which `next` must sit so that no level overlaps `self`.
    fn separation(&self, next: &Contour) -> f64 {
        self.right
            .iter()
            .zip(&next.left)
            .map(|(r, l)| r - l + 1.0)
            .fold(f64::NEG_INFINITY, f64::max)
    }

    /// Absorb `next` placed at `offset`; `next` lies to the right.
    fn merge(&mut self, next: &Contour, offset: f64) {
        for (d, (l, r)) in next.left.iter().zip(&next.right).enumerate() {
            if d < self.left.len() {
                self.left[d] = self.left[d].min(l + offset);
                self.right[d] = r + offset;
            } else {
                self.left.push(l + offset);
                self.right.push(r + offset);
            }
        }
    }
}

fn flatten(root: &ReconciliationNode) -> Vec<Slot<'_>> {
    let mut slots = vec![Slot {
        node: root,
        parent: None,
        depth: 0,
        children: Vec::new(),
    }];
    let mut i = 0;
    while i < slots.len() {
        let node = slots[i].node;
        let depth = slots[i].depth;
        for child in &node.children {
            let idx = slots.len();
            slots.push(Slot {
                node: child,
                parent: Some(i),
                depth: depth + 1,
                children: Vec::new(),
            });
            slots[i].children.push(idx);
        }
        i += 1;
    }
    slots
}

/// Lay `root` out top-down with uniform sibling separation.
pub fn layout(root: &ReconciliationNode, size: &NodeSize) -> Layout {
    let slots = flatten(root);
    let n = slots.len();

    // Breadth-first order puts every child after its parent, so walking
    // backwards visits subtrees before the node that owns them.
    let mut offsets = vec![0.0_f64; n];
    let mut contours: Vec<Option<Contour>> = vec![None; n];
    for i in (0..n).rev() {
        let children = &slots[i].children;
        if children.is_empty() {
            contours[i] = Some(Contour::leaf());
            continue;
        }

        let mut positions = Vec::with_capacity(children.len());
        let mut acc = contours[children[0]].take().unwrap_or_else(Contour::leaf);
        positions.push(0.0);
        for &c in &children[1..] {
            let child = contours[c].take().unwrap_or_else(Contour::leaf);
            let at = acc.separation(&child);
            positions.push(at);
            acc.merge(&child, at);
        }

        let mid = positions.last().copied().unwrap_or(0.0) / 2.0;
        for (&c, p) in children.iter().zip(&positions) {
            offsets[c] = p - mid;
        }

        let mut contour = Contour::leaf();
        contour.left.extend(acc.left.iter().map(|l| l - mid));
        contour.right.extend(acc.right.iter().map(|r| r - mid));
        contours[i] = Some(contour);
    }

    let mut xs = vec![0.0_f64; n];
    for i in 1..n {
        if let Some(p) = slots[i].parent {
            xs[i] = xs[p] + offsets[i];
        }
    }

    let descendants = slots
        .iter()
        .enumerate()
        .map(|(i, s)| PositionedNode {
            index: i,
            parent: s.parent,
            depth: s.depth,
            x: xs[i] * size.step_x(),
            y: s.depth as f64 * size.step_y(),
            name: s.node.name.clone(),
            namespace: s.node.namespace.clone(),
            kind: s.node.kind.clone(),
            cluster_name: s.node.cluster_name.clone(),
            suspended: s.node.suspended,
            is_current_node: s.node.is_current_node,
        })
        .collect();

    let links = slots
        .iter()
        .enumerate()
        .filter_map(|(i, s)| s.parent.map(|p| Edge { source: p, target: i }))
        .collect();

    tracing::debug!(nodes = n, "reconciliation tree laid out");
    Layout { descendants, links }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
