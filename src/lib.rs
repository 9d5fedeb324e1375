//! Mindmap Studio - Native Mind-Map Diagram Engine
//!
//! Provides automatic layout (layered/radial), pan/zoom, node dragging,
//! selection, and PNG export, rendered with egui.

pub mod config;
pub mod export;
pub mod geometry;
pub mod hittest;
pub mod interact;
pub mod layout;
pub mod node;
pub mod render;
pub mod text;
pub mod viewport;

// Re-export commonly used types
pub use config::{MindMapOptions, Palette};
pub use export::ExportError;
pub use layout::{compute_layout, LayoutMode};
pub use node::MindNode;
pub use render::{MindMapEvent, MindMapOutput, MindMapView};
pub use viewport::Viewport;
