//! Engine Configuration
//!
//! Spacing, sizing, and color options supplied by the host alongside the
//! node set.

use crate::layout::LayoutMode;
use eframe::egui::{Color32, FontFamily};

/// Layout and rendering options
#[derive(Debug, Clone)]
pub struct MindMapOptions {
    /// Recompute positions from structure on every node-set change; when
    /// false, host-supplied `x`/`y` pass through unchanged
    pub auto_layout: bool,
    /// Layout algorithm
    pub layout: LayoutMode,
    /// Horizontal spacing between levels (layered) / ring growth (radial)
    pub spacing_x: f32,
    /// Vertical spacing between siblings in a level
    pub spacing_y: f32,
    /// Maximum content width a label is wrapped to
    pub max_node_width: f32,
    /// Horizontal text padding inside pill/card shapes
    pub node_padding_x: f32,
    /// Vertical text padding inside pill/card shapes
    pub node_padding_y: f32,
    /// Label font size in layout-space points
    pub font_size: f32,
    /// Label font family
    pub font_family: FontFamily,
    /// Draw the dotted background grid
    pub show_grid: bool,
    /// Fill all available width instead of the framed canvas look
    pub full_bleed: bool,
    /// Lower bound on the allocated canvas width
    pub canvas_min_width: f32,
    /// Colors
    pub palette: Palette,
}

impl Default for MindMapOptions {
    fn default() -> Self {
        Self {
            auto_layout: true,
            layout: LayoutMode::default(),
            spacing_x: 240.0,
            spacing_y: 110.0,
            max_node_width: 220.0,
            node_padding_x: 14.0,
            node_padding_y: 10.0,
            font_size: 14.0,
            font_family: FontFamily::Proportional,
            show_grid: true,
            full_bleed: false,
            canvas_min_width: 480.0,
            palette: Palette::dark(),
        }
    }
}

/// Diagram color palette
#[derive(Debug, Clone, Copy)]
pub struct Palette {
    /// Canvas background
    pub canvas_bg: Color32,

    /// Background grid dots
    pub grid_dot: Color32,

    /// Vignette shading along the canvas edges
    pub vignette: Color32,

    /// Edge strokes
    pub edge: Color32,

    /// Root circle fill
    pub root_fill: Color32,

    /// Root label text
    pub root_text: Color32,

    /// Pill label text (level 1)
    pub pill_text: Color32,

    /// Card fill (level 2+)
    pub card_fill: Color32,

    /// Card border
    pub card_stroke: Color32,

    /// Card label text
    pub card_text: Color32,

    /// Selection ring
    pub selection: Color32,

    /// Hovered node stroke
    pub hover: Color32,

    /// Accent fills cycled per node index for level-1 pills
    pub accents: [Color32; 6],
}

impl Palette {
    pub fn dark() -> Self {
        Self {
            canvas_bg: Color32::from_rgb(24, 26, 32),
            grid_dot: Color32::from_rgb(48, 52, 62),
            vignette: Color32::from_rgba_unmultiplied(0, 0, 0, 36),
            edge: Color32::from_rgb(94, 100, 116),
            root_fill: Color32::from_rgb(86, 98, 246),
            root_text: Color32::WHITE,
            pill_text: Color32::from_rgb(24, 26, 32),
            card_fill: Color32::from_rgb(240, 242, 246),
            card_stroke: Color32::from_rgb(160, 166, 180),
            card_text: Color32::from_rgb(34, 38, 46),
            selection: Color32::from_rgb(255, 196, 66),
            hover: Color32::from_rgb(140, 180, 255),
            accents: [
                Color32::from_rgb(255, 183, 77),
                Color32::from_rgb(129, 199, 132),
                Color32::from_rgb(100, 181, 246),
                Color32::from_rgb(240, 98, 146),
                Color32::from_rgb(186, 157, 255),
                Color32::from_rgb(77, 208, 225),
            ],
        }
    }

    pub fn light() -> Self {
        Self {
            canvas_bg: Color32::from_rgb(250, 250, 252),
            grid_dot: Color32::from_rgb(224, 226, 232),
            vignette: Color32::from_rgba_unmultiplied(0, 0, 0, 14),
            edge: Color32::from_rgb(150, 156, 170),
            root_fill: Color32::from_rgb(63, 81, 181),
            root_text: Color32::WHITE,
            pill_text: Color32::from_rgb(30, 32, 38),
            card_fill: Color32::WHITE,
            card_stroke: Color32::from_rgb(190, 194, 204),
            card_text: Color32::from_rgb(40, 44, 52),
            selection: Color32::from_rgb(230, 150, 20),
            hover: Color32::from_rgb(80, 130, 230),
            accents: [
                Color32::from_rgb(255, 204, 128),
                Color32::from_rgb(165, 214, 167),
                Color32::from_rgb(144, 202, 249),
                Color32::from_rgb(244, 143, 177),
                Color32::from_rgb(206, 180, 255),
                Color32::from_rgb(128, 222, 234),
            ],
        }
    }

    /// Accent color for the node at `index`, cycling through the fixed list
    pub fn accent(&self, index: usize) -> Color32 {
        self.accents[index % self.accents.len()]
    }
}
