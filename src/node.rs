//! Mind-Map Node Model
//!
//! The host-owned node shape the engine consumes and emits. The engine never
//! mutates a host slice in place; position edits travel back through
//! `MindMapEvent::NodesChanged` as a fresh vector.

use eframe::egui::Pos2;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

/// A labeled diagram node with structural links to other nodes.
///
/// `x`/`y` are layout-space coordinates and are authoritative only when
/// auto-layout is disabled; otherwise the layout engine overwrites them on
/// every computation. `children` may reference ids absent from the current
/// set; such edges are skipped when drawing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MindNode {
    /// Unique identifier, stable across re-layouts
    pub id: String,

    /// Display text, wrapped before drawing
    pub label: String,

    /// Layout-space x coordinate (node center)
    #[serde(default)]
    pub x: f32,

    /// Layout-space y coordinate (node center)
    #[serde(default)]
    pub y: f32,

    /// Depth from the root; 0 = root
    #[serde(default)]
    pub level: u32,

    /// Ordered child node ids
    #[serde(default)]
    pub children: Vec<String>,

    /// Structural parent id, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent: Option<String>,
}

impl MindNode {
    /// Create a node with default position
    pub fn new(id: impl Into<String>, label: impl Into<String>, level: u32) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            x: 0.0,
            y: 0.0,
            level,
            children: Vec::new(),
            parent: None,
        }
    }

    /// Builder-style parent assignment
    pub fn with_parent(mut self, parent: impl Into<String>) -> Self {
        self.parent = Some(parent.into());
        self
    }

    /// Builder-style child list assignment
    pub fn with_children(mut self, children: &[&str]) -> Self {
        self.children = children.iter().map(|c| (*c).to_string()).collect();
        self
    }

    /// Node center in layout space
    pub fn pos(&self) -> Pos2 {
        Pos2::new(self.x, self.y)
    }
}

/// Resolve the effective depth of every node.
///
/// Externally supplied non-zero levels are trusted. A node reporting level 0
/// while carrying a `parent` link gets its depth re-derived by walking the
/// parent chain; a visited set stops the walk on cycles or dangling parents.
pub fn effective_levels(nodes: &[MindNode]) -> HashMap<String, u32> {
    let by_id: HashMap<&str, &MindNode> = nodes.iter().map(|n| (n.id.as_str(), n)).collect();

    let mut levels = HashMap::with_capacity(nodes.len());
    for node in nodes {
        let level = if node.level > 0 || node.parent.is_none() {
            node.level
        } else {
            let mut depth = 0u32;
            let mut visited: HashSet<&str> = HashSet::new();
            visited.insert(node.id.as_str());
            let mut current = node.parent.as_deref();
            while let Some(pid) = current {
                if !visited.insert(pid) {
                    break;
                }
                depth += 1;
                current = by_id.get(pid).and_then(|p| p.parent.as_deref());
            }
            depth
        };
        levels.insert(node.id.clone(), level);
    }
    levels
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_levels_are_trusted() {
        let nodes = vec![
            MindNode::new("a", "A", 0),
            MindNode::new("b", "B", 3).with_parent("a"),
        ];
        let levels = effective_levels(&nodes);
        assert_eq!(levels["a"], 0);
        assert_eq!(levels["b"], 3);
    }

    #[test]
    fn missing_levels_derived_from_parent_chain() {
        let nodes = vec![
            MindNode::new("root", "Root", 0),
            MindNode::new("mid", "Mid", 0).with_parent("root"),
            MindNode::new("leaf", "Leaf", 0).with_parent("mid"),
        ];
        let levels = effective_levels(&nodes);
        assert_eq!(levels["mid"], 1);
        assert_eq!(levels["leaf"], 2);
    }

    #[test]
    fn parent_cycle_terminates() {
        let nodes = vec![
            MindNode::new("a", "A", 0).with_parent("b"),
            MindNode::new("b", "B", 0).with_parent("a"),
        ];
        let levels = effective_levels(&nodes);
        // Both walks terminate; depths are bounded by the cycle length.
        assert!(levels["a"] >= 1 && levels["b"] >= 1);
    }

    #[test]
    fn node_json_round_trip_is_camel_case() {
        let json = r#"{"id":"n1","label":"Hello","x":10.0,"y":-4.0,"level":1,"children":["n2"],"parent":"n0"}"#;
        let node: MindNode = serde_json::from_str(json).unwrap();
        assert_eq!(node.id, "n1");
        assert_eq!(node.children, vec!["n2".to_string()]);
        assert_eq!(node.parent.as_deref(), Some("n0"));

        let back = serde_json::to_string(&node).unwrap();
        assert!(back.contains("\"children\""));
        assert!(!back.contains("\"Parent\""));
    }
}
