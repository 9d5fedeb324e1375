//! Layout Engines
//!
//! Two layout algorithms:
//! - Layered: columns by depth, siblings centered within a level
//! - Radial: concentric rings around an elected root, angular sweep split
//!   among descendants
//!
//! Both are pure functions of (nodes, options) and deterministic for a given
//! input order.

use crate::config::MindMapOptions;
use crate::node::{self, MindNode};
use eframe::egui::Vec2;
use std::collections::{BTreeMap, HashMap, HashSet};
use std::f32::consts::TAU;

/// Extra ring growth added to `spacing_x` per depth in radial mode
const RADIAL_RING_EXTRA: f32 = 40.0;

/// Factor by which a child's angular sweep shrinks per depth
const SWEEP_SHRINK: f32 = 0.6;

/// Minimum angular sweep handed to a subtree (45 degrees)
const MIN_SWEEP: f32 = TAU / 8.0;

/// Available layout algorithms
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LayoutMode {
    /// Columns by depth, siblings centered
    #[default]
    Layered,
    /// Concentric rings around the root
    Radial,
}

impl LayoutMode {
    pub fn name(&self) -> &'static str {
        match self {
            LayoutMode::Layered => "Layered",
            LayoutMode::Radial => "Radial",
        }
    }

    pub fn all() -> &'static [LayoutMode] {
        &[LayoutMode::Layered, LayoutMode::Radial]
    }
}

/// Compute positions for every node.
///
/// Passes host coordinates through untouched when auto-layout is disabled.
/// An empty set yields an empty result; a single node lands at the origin.
pub fn compute_layout(nodes: &[MindNode], options: &MindMapOptions) -> Vec<MindNode> {
    if !options.auto_layout || nodes.is_empty() {
        return nodes.to_vec();
    }
    match options.layout {
        LayoutMode::Layered => layered_layout(nodes, options),
        LayoutMode::Radial => radial_layout(nodes, options),
    }
}

/// Index of the node anchoring the layout at the origin: the first node with
/// effective level 0, falling back to the first node in input order. The
/// fallback is deliberate, not an error (a set may arrive without any
/// level-0 node).
pub fn anchor_index(nodes: &[MindNode], levels: &HashMap<String, u32>) -> Option<usize> {
    if nodes.is_empty() {
        return None;
    }
    let root = nodes
        .iter()
        .position(|n| levels.get(&n.id).copied().unwrap_or(n.level) == 0);
    Some(root.unwrap_or(0))
}

fn layered_layout(nodes: &[MindNode], options: &MindMapOptions) -> Vec<MindNode> {
    let levels = node::effective_levels(nodes);

    // Group node indices by level, preserving input order within a level
    let mut by_level: BTreeMap<u32, Vec<usize>> = BTreeMap::new();
    for (i, n) in nodes.iter().enumerate() {
        let level = levels.get(&n.id).copied().unwrap_or(n.level);
        by_level.entry(level).or_default().push(i);
    }

    let mut out = nodes.to_vec();
    for (level, members) in &by_level {
        let count = members.len();
        for (slot, &i) in members.iter().enumerate() {
            out[i].x = *level as f32 * options.spacing_x;
            out[i].y = (slot as f32 - (count as f32 - 1.0) / 2.0) * options.spacing_y;
        }
    }

    // Translate so the anchoring root sits at the origin
    if let Some(root) = anchor_index(nodes, &levels) {
        let shift = Vec2::new(out[root].x, out[root].y);
        for n in &mut out {
            n.x -= shift.x;
            n.y -= shift.y;
        }
    }
    out
}

/// Root election for radial mode: a node without a `parent` wins over a node
/// with level 0, which wins over the first node in input order.
fn radial_root_index(nodes: &[MindNode]) -> usize {
    nodes
        .iter()
        .position(|n| n.parent.is_none())
        .or_else(|| nodes.iter().position(|n| n.level == 0))
        .unwrap_or(0)
}

fn radial_layout(nodes: &[MindNode], options: &MindMapOptions) -> Vec<MindNode> {
    let index_of: HashMap<&str, usize> = nodes
        .iter()
        .enumerate()
        .map(|(i, n)| (n.id.as_str(), i))
        .collect();

    let root = radial_root_index(nodes);
    let mut out = nodes.to_vec();
    out[root].x = 0.0;
    out[root].y = 0.0;

    let mut visited: HashSet<usize> = HashSet::new();
    visited.insert(root);
    let ring = options.spacing_x + RADIAL_RING_EXTRA;

    // Iterative DFS carrying each child's (depth, angle window)
    struct Frame {
        index: usize,
        depth: u32,
        sweep_start: f32,
        sweep: f32,
    }
    let mut stack = vec![Frame {
        index: root,
        depth: 0,
        sweep_start: 0.0,
        sweep: TAU,
    }];
    let mut max_depth = 0u32;

    while let Some(frame) = stack.pop() {
        let children: Vec<usize> = nodes[frame.index]
            .children
            .iter()
            .filter_map(|id| index_of.get(id.as_str()).copied())
            .filter(|i| !visited.contains(i))
            .collect();
        if children.is_empty() {
            continue;
        }

        let depth = frame.depth + 1;
        max_depth = max_depth.max(depth);
        let radius = depth as f32 * ring;
        let parent = out[frame.index].pos();
        let count = children.len() as f32;
        let child_sweep = (frame.sweep * SWEEP_SHRINK).max(MIN_SWEEP);

        for (slot, &child) in children.iter().enumerate() {
            visited.insert(child);
            let angle = frame.sweep_start + frame.sweep * (slot as f32 + 0.5) / count;
            out[child].x = parent.x + angle.cos() * radius;
            out[child].y = parent.y + angle.sin() * radius;
            stack.push(Frame {
                index: child,
                depth,
                sweep_start: angle - child_sweep / 2.0,
                sweep: child_sweep,
            });
        }
    }

    // Unreachable nodes land on an outer ring, evenly spaced
    let orphans: Vec<usize> = (0..nodes.len()).filter(|i| !visited.contains(i)).collect();
    if !orphans.is_empty() {
        let radius = (max_depth + 1) as f32 * ring;
        let count = orphans.len() as f32;
        for (slot, &i) in orphans.iter().enumerate() {
            let angle = TAU * slot as f32 / count;
            out[i].x = angle.cos() * radius;
            out[i].y = angle.sin() * radius;
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn options(mode: LayoutMode) -> MindMapOptions {
        MindMapOptions {
            layout: mode,
            ..MindMapOptions::default()
        }
    }

    fn tree_abc() -> Vec<MindNode> {
        vec![
            MindNode::new("a", "A", 0).with_children(&["b", "c"]),
            MindNode::new("b", "B", 1).with_parent("a"),
            MindNode::new("c", "C", 1).with_parent("a"),
        ]
    }

    #[test]
    fn empty_set_yields_empty_layout() {
        assert!(compute_layout(&[], &options(LayoutMode::Layered)).is_empty());
        assert!(compute_layout(&[], &options(LayoutMode::Radial)).is_empty());
    }

    #[test]
    fn single_node_lands_at_origin() {
        for mode in LayoutMode::all() {
            let out = compute_layout(&[MindNode::new("only", "Only", 0)], &options(*mode));
            assert_eq!(out[0].pos(), eframe::egui::Pos2::ZERO);
        }
    }

    #[test]
    fn layered_root_at_origin_siblings_symmetric() {
        let out = compute_layout(&tree_abc(), &options(LayoutMode::Layered));
        assert_eq!(out[0].x, 0.0);
        assert_eq!(out[0].y, 0.0);
        assert_eq!(out[1].x, 240.0);
        assert_eq!(out[2].x, 240.0);
        assert_eq!(out[1].y, -55.0);
        assert_eq!(out[2].y, 55.0);
    }

    #[test]
    fn layered_is_deterministic() {
        let nodes = tree_abc();
        let opts = options(LayoutMode::Layered);
        let a = compute_layout(&nodes, &opts);
        let b = compute_layout(&nodes, &opts);
        assert_eq!(a, b);
    }

    #[test]
    fn layered_falls_back_to_first_node_without_level_zero() {
        let nodes = vec![MindNode::new("p", "P", 2), MindNode::new("q", "Q", 2)];
        let out = compute_layout(&nodes, &options(LayoutMode::Layered));
        assert_eq!(out[0].pos(), eframe::egui::Pos2::ZERO);
    }

    #[test]
    fn auto_layout_off_passes_positions_through() {
        let mut nodes = tree_abc();
        nodes[1].x = 123.0;
        nodes[1].y = -77.0;
        let opts = MindMapOptions {
            auto_layout: false,
            ..MindMapOptions::default()
        };
        let out = compute_layout(&nodes, &opts);
        assert_eq!(out, nodes);
    }

    #[test]
    fn radial_children_equally_spaced_on_one_ring() {
        let nodes = vec![
            MindNode::new("r", "Root", 0).with_children(&["a", "b", "c", "d"]),
            MindNode::new("a", "A", 1).with_parent("r"),
            MindNode::new("b", "B", 1).with_parent("r"),
            MindNode::new("c", "C", 1).with_parent("r"),
            MindNode::new("d", "D", 1).with_parent("r"),
        ];
        let opts = options(LayoutMode::Radial);
        let out = compute_layout(&nodes, &opts);

        let ring = opts.spacing_x + 40.0;
        let mut angles: Vec<f32> = Vec::new();
        for child in &out[1..] {
            let r = (child.x * child.x + child.y * child.y).sqrt();
            assert!((r - ring).abs() < 1e-3, "radius {r} != {ring}");
            angles.push(child.y.atan2(child.x));
        }
        // Consecutive children are a quarter turn apart
        for pair in angles.windows(2) {
            let mut delta = (pair[1] - pair[0]).rem_euclid(TAU);
            if delta > TAU / 2.0 {
                delta = TAU - delta;
            }
            assert!((delta - TAU / 4.0).abs() < 1e-3, "spacing {delta}");
        }
    }

    #[test]
    fn radial_prefers_parentless_root() {
        // "zero" has level 0 but a parent; "free" has no parent. The
        // parentless node wins the election.
        let nodes = vec![
            MindNode::new("zero", "Zero", 0).with_parent("free"),
            MindNode::new("free", "Free", 3).with_children(&["zero"]),
        ];
        let out = compute_layout(&nodes, &options(LayoutMode::Radial));
        assert_eq!(out[1].pos(), eframe::egui::Pos2::ZERO);
        assert_ne!(out[0].pos(), eframe::egui::Pos2::ZERO);
    }

    #[test]
    fn radial_orphans_placed_on_outer_ring() {
        let nodes = vec![
            MindNode::new("r", "Root", 0).with_children(&["a"]),
            MindNode::new("a", "A", 1).with_parent("r"),
            MindNode::new("lost", "Lost", 2),
            MindNode::new("stray", "Stray", 2),
        ];
        let opts = options(LayoutMode::Radial);
        let out = compute_layout(&nodes, &opts);

        let ring = opts.spacing_x + 40.0;
        let outer = 2.0 * ring;
        for orphan in &out[2..] {
            let r = (orphan.x * orphan.x + orphan.y * orphan.y).sqrt();
            assert!((r - outer).abs() < 1e-3, "orphan radius {r} != {outer}");
        }
    }

    #[test]
    fn radial_child_cycle_stops_descending() {
        let nodes = vec![
            MindNode::new("r", "Root", 0).with_children(&["a"]),
            MindNode::new("a", "A", 1).with_parent("r").with_children(&["r", "a", "b"]),
            MindNode::new("b", "B", 2).with_parent("a"),
        ];
        // Must terminate; the root stays at the origin
        let out = compute_layout(&nodes, &options(LayoutMode::Radial));
        assert_eq!(out[0].pos(), eframe::egui::Pos2::ZERO);
        assert_ne!(out[2].pos(), out[1].pos());
    }

    #[test]
    fn radial_skips_dangling_child_ids() {
        let nodes = vec![
            MindNode::new("r", "Root", 0).with_children(&["ghost", "a"]),
            MindNode::new("a", "A", 1).with_parent("r"),
        ];
        let out = compute_layout(&nodes, &options(LayoutMode::Radial));
        assert_eq!(out.len(), 2);
        assert_ne!(out[1].pos(), eframe::egui::Pos2::ZERO);
    }
}
