//! Shape Geometry
//!
//! Maps a node's depth to one of three visual tiers and sizes its box from
//! the wrapped label, not the raw label length. The boxes computed here feed
//! both the render pass and the hit-test index.

use crate::config::MindMapOptions;
use eframe::egui::{Color32, Pos2, Rect, Vec2};

/// Root circle radius in layout space
pub const ROOT_RADIUS: f32 = 46.0;

/// Corner radius for level-2+ cards
pub const CARD_ROUNDING: f32 = 8.0;

/// Gap between a shape and its selection ring
pub const SELECTION_RING_GAP: f32 = 3.0;

/// Visual tier of a node shape
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeTier {
    /// Level 0: filled circle
    Root,
    /// Level 1: fully rounded pill with an accent fill
    Branch,
    /// Level 2+: bordered card
    Leaf,
}

impl NodeTier {
    pub fn from_level(level: u32) -> Self {
        match level {
            0 => NodeTier::Root,
            1 => NodeTier::Branch,
            _ => NodeTier::Leaf,
        }
    }
}

/// One node's resolved geometry and styling for a render pass.
///
/// Rects are in world (layout) coordinates; the viewport transform is applied
/// at paint time only.
#[derive(Debug, Clone)]
pub struct NodeVisual {
    pub id: String,
    pub tier: NodeTier,
    pub rect: Rect,
    pub lines: Vec<String>,
    pub fill: Color32,
    pub text_color: Color32,
}

/// Content width labels are wrapped to before the box is sized
pub fn wrap_width(tier: NodeTier, options: &MindMapOptions) -> f32 {
    match tier {
        NodeTier::Root => ROOT_RADIUS * 1.8,
        NodeTier::Branch | NodeTier::Leaf => options.max_node_width - 2.0 * options.node_padding_x,
    }
}

/// Final shape box for a node, centered on `center`, sized from the wrapped
/// line count and widest line.
pub fn shape_rect(
    tier: NodeTier,
    center: Pos2,
    max_line_width: f32,
    line_count: usize,
    row_height: f32,
    options: &MindMapOptions,
) -> Rect {
    let size = match tier {
        NodeTier::Root => Vec2::splat(ROOT_RADIUS * 2.0),
        NodeTier::Branch | NodeTier::Leaf => Vec2::new(
            max_line_width + 2.0 * options.node_padding_x,
            line_count as f32 * row_height + 2.0 * options.node_padding_y,
        ),
    };
    Rect::from_center_size(center, size)
}

/// Corner rounding for a shape box. Pills are fully rounded at the ends;
/// cards use a fixed radius; the root circle is drawn as a circle and
/// ignores this.
pub fn rounding(tier: NodeTier, rect: &Rect) -> f32 {
    match tier {
        NodeTier::Root => rect.height() / 2.0,
        NodeTier::Branch => rect.height() / 2.0,
        NodeTier::Leaf => CARD_ROUNDING,
    }
}

/// Control point for the quadratic edge curve between two node centers: the
/// midpoint pushed perpendicular to the edge by a fraction of its length.
/// Degenerates to the midpoint for coincident endpoints.
pub fn edge_control_point(a: Pos2, b: Pos2) -> Pos2 {
    let dir = b - a;
    let length = dir.length();
    let mid = Pos2::new((a.x + b.x) / 2.0, (a.y + b.y) / 2.0);
    if length < f32::EPSILON {
        return mid;
    }
    let normal = Vec2::new(-dir.y, dir.x) / length;
    mid + normal * length * 0.12
}
