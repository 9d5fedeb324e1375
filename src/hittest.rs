//! Hit-Test Index
//!
//! World-space bounding boxes for pointer resolution, rebuilt on every
//! render pass from the same shape boxes the painter draws. Kept explicit
//! rather than re-deriving from node data so interaction always matches the
//! last drawn frame.

use crate::geometry::NodeVisual;
use eframe::egui::{Pos2, Rect};

/// Tolerance padding applied when resolving a point, in world pixels. Eases
/// pointer/touch precision near shape borders.
pub const HIT_TOLERANCE: f32 = 6.0;

/// Per-frame map from node id to its world-space shape box
#[derive(Debug, Clone, Default)]
pub struct HitTestIndex {
    // Draw order; last entry is topmost
    boxes: Vec<(String, Rect)>,
}

impl HitTestIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the index contents from this pass's visuals
    pub fn rebuild(&mut self, visuals: &[NodeVisual]) {
        self.boxes.clear();
        self.boxes
            .extend(visuals.iter().map(|v| (v.id.clone(), v.rect)));
    }

    /// Resolve a world-space point to the topmost node under it
    pub fn hit(&self, world: Pos2) -> Option<&str> {
        self.boxes
            .iter()
            .rev()
            .find(|(_, rect)| rect.expand(HIT_TOLERANCE).contains(world))
            .map(|(id, _)| id.as_str())
    }

    /// Bounding box recorded for a node id
    pub fn rect_of(&self, id: &str) -> Option<Rect> {
        self.boxes
            .iter()
            .find(|(bid, _)| bid == id)
            .map(|(_, rect)| *rect)
    }

    /// Union of all recorded boxes; `None` when the index is empty
    pub fn bounds(&self) -> Option<Rect> {
        let mut iter = self.boxes.iter().map(|(_, r)| *r);
        let first = iter.next()?;
        Some(iter.fold(first, |acc, r| acc.union(r)))
    }

    pub fn len(&self) -> usize {
        self.boxes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.boxes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::MindMapOptions;
    use crate::geometry::{self, NodeTier};
    use crate::layout::{self, LayoutMode};
    use crate::node::MindNode;
    use eframe::egui::{Color32, Vec2};

    fn visual(id: &str, center: Pos2, size: Vec2) -> NodeVisual {
        NodeVisual {
            id: id.to_string(),
            tier: NodeTier::Leaf,
            rect: Rect::from_center_size(center, size),
            lines: vec![id.to_string()],
            fill: Color32::WHITE,
            text_color: Color32::BLACK,
        }
    }

    #[test]
    fn every_laid_out_node_hits_at_its_center() {
        let nodes = vec![
            MindNode::new("a", "A", 0).with_children(&["b", "c"]),
            MindNode::new("b", "B", 1).with_parent("a"),
            MindNode::new("c", "C", 1).with_parent("a"),
        ];
        let options = MindMapOptions {
            layout: LayoutMode::Layered,
            ..MindMapOptions::default()
        };
        let positioned = layout::compute_layout(&nodes, &options);

        let visuals: Vec<NodeVisual> = positioned
            .iter()
            .map(|n| {
                let tier = NodeTier::from_level(n.level);
                let rect = geometry::shape_rect(tier, n.pos(), 90.0, 1, 18.0, &options);
                let mut v = visual(&n.id, n.pos(), rect.size());
                v.tier = tier;
                v
            })
            .collect();

        let mut index = HitTestIndex::new();
        index.rebuild(&visuals);
        for n in &positioned {
            assert_eq!(index.hit(n.pos()), Some(n.id.as_str()), "node {}", n.id);
        }
    }

    #[test]
    fn tolerance_extends_beyond_the_box() {
        let mut index = HitTestIndex::new();
        index.rebuild(&[visual("a", Pos2::ZERO, Vec2::new(100.0, 40.0))]);

        // 50 px half-width, plus tolerance
        assert_eq!(index.hit(Pos2::new(50.0 + HIT_TOLERANCE - 0.5, 0.0)), Some("a"));
        assert_eq!(index.hit(Pos2::new(50.0 + HIT_TOLERANCE + 1.0, 0.0)), None);
    }

    #[test]
    fn topmost_box_wins_on_overlap() {
        let mut index = HitTestIndex::new();
        index.rebuild(&[
            visual("under", Pos2::ZERO, Vec2::splat(80.0)),
            visual("over", Pos2::new(10.0, 0.0), Vec2::splat(80.0)),
        ]);
        assert_eq!(index.hit(Pos2::new(10.0, 0.0)), Some("over"));
    }

    #[test]
    fn bounds_union_all_boxes() {
        let mut index = HitTestIndex::new();
        index.rebuild(&[
            visual("a", Pos2::new(-100.0, 0.0), Vec2::splat(20.0)),
            visual("b", Pos2::new(100.0, 50.0), Vec2::splat(20.0)),
        ]);
        let bounds = index.bounds().unwrap();
        assert_eq!(bounds.min, Pos2::new(-110.0, -10.0));
        assert_eq!(bounds.max, Pos2::new(110.0, 60.0));
        assert!(HitTestIndex::new().bounds().is_none());
    }
}
