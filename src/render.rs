//! Interactive Mind-Map Renderer
//!
//! Native egui rendering of the mind-map with:
//! - Pan and zoom (wheel/pinch + drag)
//! - Node dragging, selection and rename requests
//! - Three visual tiers (root circle, accent pills, cards)
//! - PNG export of the current scene
//!
//! Redraw is a pure function of (nodes, viewport, selection): the widget
//! recomputes layout, shape boxes and the hit-test index on every pass, and
//! reports host-facing changes as returned events instead of mutating the
//! host's node slice.

use crate::config::MindMapOptions;
use crate::export::{self, ExportError, ExportScene};
use crate::geometry::{self, NodeTier, NodeVisual};
use crate::hittest::HitTestIndex;
use crate::interact::{Action, InteractionController, PointerEvent};
use crate::layout;
use crate::node::{self, MindNode};
use crate::text;
use crate::viewport::Viewport;
use egui::{Align2, Color32, FontId, Painter, Pos2, Rect, Sense, Stroke, Vec2};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// World padding around the scene when fitting to view
const FIT_PADDING: f32 = 80.0;

/// Background grid spacing at scale 1.0
const GRID_STEP: f32 = 24.0;

/// Wheel and command zoom steps, ±10%
const ZOOM_IN_STEP: f32 = 1.1;
const ZOOM_OUT_STEP: f32 = 0.9;

/// Host-facing notifications emitted by one render pass
#[derive(Debug, Clone, PartialEq)]
pub enum MindMapEvent {
    /// Selection changed by a click; `None` means the canvas was clicked
    NodeSelected(Option<String>),
    /// A drag produced updated positions; the host should replace its copy
    NodesChanged(Vec<MindNode>),
    /// Double-click on a node while editable; the host opens its rename UI
    RenameRequested(String),
}

/// Result of one widget pass
pub struct MindMapOutput {
    pub response: egui::Response,
    pub events: Vec<MindMapEvent>,
}

/// The mind-map widget. One instance owns the private viewport, selection
/// and interaction state for a diagram; the node set itself stays host-owned
/// and is passed fresh into [`MindMapView::ui`] each frame.
pub struct MindMapView {
    viewport: Viewport,
    selected: Option<String>,
    hovered: Option<String>,
    hit_index: HitTestIndex,
    controller: InteractionController,
    export_scene: ExportScene,
    fitted: bool,
    pending_fit: bool,
    last_canvas: Vec2,
}

impl Default for MindMapView {
    fn default() -> Self {
        Self::new()
    }
}

impl MindMapView {
    pub fn new() -> Self {
        Self {
            viewport: Viewport::default(),
            selected: None,
            hovered: None,
            hit_index: HitTestIndex::new(),
            controller: InteractionController::new(),
            export_scene: ExportScene::default(),
            fitted: false,
            pending_fit: false,
            last_canvas: Vec2::ZERO,
        }
    }

    /// Currently selected node id, if any
    pub fn selected_node(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    /// Current pan/zoom state (read-only)
    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    // ── command surface ────────────────────────────────────────────────

    /// Zoom in by 10%
    pub fn zoom_in(&mut self) {
        self.viewport.zoom_by(ZOOM_IN_STEP);
    }

    /// Zoom out by 10%
    pub fn zoom_out(&mut self) {
        self.viewport.zoom_by(ZOOM_OUT_STEP);
    }

    /// Re-run fit-to-bounds against the current nodes on the next pass
    pub fn reset_view(&mut self) {
        self.pending_fit = true;
    }

    /// Toggle OS fullscreen for the hosting viewport
    pub fn toggle_fullscreen(&mut self, ctx: &egui::Context) {
        let current = ctx.input(|i| i.viewport().fullscreen.unwrap_or(false));
        ctx.send_viewport_cmd(egui::ViewportCommand::Fullscreen(!current));
    }

    /// Export the last rendered scene as `mindmap-<unixMillis>.png` in the
    /// download directory. Returns `Ok(None)` when there is nothing to
    /// export (no file is produced).
    pub fn export_image(&self, options: &MindMapOptions) -> Result<Option<PathBuf>, ExportError> {
        self.export_image_to(options, &export::default_export_dir())
    }

    /// Export into a specific directory
    pub fn export_image_to(
        &self,
        options: &MindMapOptions,
        dir: &Path,
    ) -> Result<Option<PathBuf>, ExportError> {
        if self.export_scene.is_empty() {
            log::info!("image export skipped: empty diagram");
            return Ok(None);
        }
        export::export_png_to(&self.export_scene, &options.palette, options.font_size, dir)
            .map(Some)
    }

    // ── main widget pass ───────────────────────────────────────────────

    pub fn ui(
        &mut self,
        ui: &mut egui::Ui,
        nodes: &[MindNode],
        editable: bool,
        options: &MindMapOptions,
    ) -> MindMapOutput {
        let available = ui.available_size();
        let size = Vec2::new(
            available.x.max(options.canvas_min_width),
            available.y.max(240.0),
        );
        let (response, painter) = ui.allocate_painter(size, Sense::click_and_drag());
        let canvas = response.rect;
        let painter = painter.with_clip_rect(canvas);

        let positioned = layout::compute_layout(nodes, options);
        let visuals = self.build_visuals(&painter, &positioned, options);
        let edges = edge_list(&positioned);

        self.hit_index.rebuild(&visuals);
        self.export_scene = ExportScene {
            nodes: visuals.clone(),
            edges: edges
                .iter()
                .map(|&(p, c)| (visuals[p].rect.center(), visuals[c].rect.center()))
                .collect(),
        };

        // Fit on first non-empty layout, on resize, and on reset_view
        let resized = (canvas.size() - self.last_canvas).length() > 0.5;
        self.last_canvas = canvas.size();
        if (!self.fitted && !visuals.is_empty()) || self.pending_fit || (resized && self.fitted) {
            self.viewport
                .fit_to_bounds(self.hit_index.bounds(), canvas.size(), FIT_PADDING);
            self.pending_fit = false;
            if !visuals.is_empty() {
                self.fitted = true;
            }
        }

        let events = self.handle_input(ui, &response, canvas, editable, &positioned);

        // Hover feedback uses the same index as click resolution
        self.hovered = response.hover_pos().and_then(|p| {
            let world = self.viewport.screen_to_world(p - canvas.min.to_vec2());
            self.hit_index.hit(world).map(str::to_string)
        });

        self.paint(&painter, canvas, &visuals, &edges, options);

        MindMapOutput { response, events }
    }

    // ── input ──────────────────────────────────────────────────────────

    fn handle_input(
        &mut self,
        ui: &egui::Ui,
        response: &egui::Response,
        canvas: Rect,
        editable: bool,
        positioned: &[MindNode],
    ) -> Vec<MindMapEvent> {
        let mut events = Vec::new();

        // Multi-finger gestures cancel the single-pointer machine; pinch
        // zoom still applies through zoom_delta below.
        if ui.input(|i| i.multi_touch().is_some()) {
            self.controller.handle(PointerEvent::Cancel, None, editable);
        }

        if response.hovered() {
            let scroll_y = ui.input(|i| i.smooth_scroll_delta.y);
            if scroll_y != 0.0 {
                let factor = if scroll_y > 0.0 { ZOOM_IN_STEP } else { ZOOM_OUT_STEP };
                match response.hover_pos() {
                    Some(p) => self.viewport.zoom_about(factor, p - canvas.min.to_vec2()),
                    None => self.viewport.zoom_by(factor),
                }
            }
            let pinch = ui.input(|i| i.zoom_delta());
            if (pinch - 1.0).abs() > 1e-4 {
                self.viewport.zoom_by(pinch);
            }
        }

        let mut drag_updates: Vec<(String, Vec2)> = Vec::new();
        for (event, pos) in collect_pointer_events(ui, response, canvas) {
            let hit: Option<String> = pos.and_then(|p| {
                let world = self.viewport.screen_to_world(p);
                self.hit_index.hit(world).map(str::to_string)
            });
            let Some(action) = self.controller.handle(event, hit.as_deref(), editable) else {
                continue;
            };
            match action {
                Action::Pan(delta) => {
                    // Offset lives in screen pixels; no scale division
                    self.viewport.offset += delta;
                }
                Action::DragNode { id, delta } => {
                    drag_updates.push((id, delta / self.viewport.scale));
                }
                Action::Select(id) => {
                    self.selected = id.clone();
                    events.push(MindMapEvent::NodeSelected(id));
                }
                Action::Rename(id) => {
                    events.push(MindMapEvent::RenameRequested(id));
                }
            }
        }

        // Pointer gone without a release event (left the window)
        if !ui.input(|i| i.pointer.primary_down()) && !self.controller.is_idle() {
            self.controller.handle(PointerEvent::Cancel, None, editable);
        }

        if !drag_updates.is_empty() {
            let mut updated = positioned.to_vec();
            for (id, world_delta) in drag_updates {
                if let Some(n) = updated.iter_mut().find(|n| n.id == id) {
                    n.x += world_delta.x;
                    n.y += world_delta.y;
                }
            }
            events.push(MindMapEvent::NodesChanged(updated));
        }

        events
    }

    // ── scene construction ─────────────────────────────────────────────

    fn build_visuals(
        &self,
        painter: &Painter,
        nodes: &[MindNode],
        options: &MindMapOptions,
    ) -> Vec<NodeVisual> {
        let levels = node::effective_levels(nodes);
        let has_root = nodes
            .iter()
            .any(|n| levels.get(&n.id).copied().unwrap_or(n.level) == 0);

        let font = FontId::new(options.font_size, options.font_family.clone());
        let measure = |s: &str| -> f32 {
            if s.is_empty() {
                return 0.0;
            }
            painter
                .layout_no_wrap(s.to_owned(), font.clone(), Color32::WHITE)
                .rect
                .width()
        };
        let row_height = painter
            .layout_no_wrap("Ag".to_owned(), font.clone(), Color32::WHITE)
            .rect
            .height();

        let palette = &options.palette;
        nodes
            .iter()
            .enumerate()
            .map(|(i, n)| {
                let level = levels.get(&n.id).copied().unwrap_or(n.level);
                // Without any level-0 node the first node is drawn root-style
                let tier = if !has_root && i == 0 {
                    NodeTier::Root
                } else {
                    NodeTier::from_level(level)
                };

                let lines = text::wrap_lines(&n.label, geometry::wrap_width(tier, options), &measure);
                let max_line_width = lines.iter().map(|l| measure(l)).fold(0.0, f32::max);
                let rect =
                    geometry::shape_rect(tier, n.pos(), max_line_width, lines.len(), row_height, options);

                let (fill, text_color) = match tier {
                    NodeTier::Root => (palette.root_fill, palette.root_text),
                    NodeTier::Branch => (palette.accent(i), palette.pill_text),
                    NodeTier::Leaf => (palette.card_fill, palette.card_text),
                };

                NodeVisual {
                    id: n.id.clone(),
                    tier,
                    rect,
                    lines,
                    fill,
                    text_color,
                }
            })
            .collect()
    }

    // ── painting ───────────────────────────────────────────────────────

    fn to_screen(&self, canvas: Rect, world: Pos2) -> Pos2 {
        canvas.min + self.viewport.world_to_screen(world).to_vec2()
    }

    fn paint(
        &self,
        painter: &Painter,
        canvas: Rect,
        visuals: &[NodeVisual],
        edges: &[(usize, usize)],
        options: &MindMapOptions,
    ) {
        let palette = &options.palette;
        let scale = self.viewport.scale;
        let corner = if options.full_bleed { 0.0 } else { 6.0 };

        painter.rect_filled(canvas, corner, palette.canvas_bg);
        if options.show_grid {
            self.paint_grid(painter, canvas, palette.grid_dot);
        }

        let edge_stroke = Stroke::new((1.5 * scale).max(0.75), palette.edge);
        for &(p, c) in edges {
            let a = visuals[p].rect.center();
            let b = visuals[c].rect.center();
            let control = geometry::edge_control_point(a, b);
            painter.add(egui::epaint::QuadraticBezierShape::from_points_stroke(
                [
                    self.to_screen(canvas, a),
                    self.to_screen(canvas, control),
                    self.to_screen(canvas, b),
                ],
                false,
                Color32::TRANSPARENT,
                edge_stroke,
            ));
        }

        let font = FontId::new(options.font_size * scale, options.font_family.clone());
        let row_height = painter
            .layout_no_wrap("Ag".to_owned(), font.clone(), Color32::WHITE)
            .rect
            .height();
        let ring_gap = geometry::SELECTION_RING_GAP * scale;

        for visual in visuals {
            let rect = Rect::from_min_max(
                self.to_screen(canvas, visual.rect.min),
                self.to_screen(canvas, visual.rect.max),
            );
            let selected = self.selected.as_deref() == Some(visual.id.as_str());
            let hovered = self.hovered.as_deref() == Some(visual.id.as_str());

            match visual.tier {
                NodeTier::Root => {
                    let radius = rect.width() / 2.0;
                    painter.circle(rect.center(), radius, visual.fill, Stroke::NONE);
                    if hovered && !selected {
                        painter.circle_stroke(
                            rect.center(),
                            radius,
                            Stroke::new(1.5 * scale, palette.hover),
                        );
                    }
                    if selected {
                        painter.circle_stroke(
                            rect.center(),
                            radius + ring_gap,
                            Stroke::new(2.0 * scale, palette.selection),
                        );
                    }
                }
                NodeTier::Branch | NodeTier::Leaf => {
                    let rounding = geometry::rounding(visual.tier, &rect);
                    let stroke = if visual.tier == NodeTier::Leaf {
                        Stroke::new(1.2 * scale, palette.card_stroke)
                    } else {
                        Stroke::NONE
                    };
                    painter.rect(rect, rounding, visual.fill, stroke);
                    if hovered && !selected {
                        painter.rect_stroke(rect, rounding, Stroke::new(1.5 * scale, palette.hover));
                    }
                    if selected {
                        painter.rect_stroke(
                            rect.expand(ring_gap),
                            rounding + ring_gap,
                            Stroke::new(2.0 * scale, palette.selection),
                        );
                    }
                }
            }

            let count = visual.lines.len() as f32;
            for (i, line) in visual.lines.iter().enumerate() {
                let offset = (i as f32 - (count - 1.0) / 2.0) * row_height;
                painter.text(
                    rect.center() + Vec2::new(0.0, offset),
                    Align2::CENTER_CENTER,
                    line,
                    font.clone(),
                    visual.text_color,
                );
            }
        }

        self.paint_vignette(painter, canvas, corner, palette.vignette);
    }

    fn paint_grid(&self, painter: &Painter, canvas: Rect, color: Color32) {
        let step = GRID_STEP * self.viewport.scale;
        if step < 4.0 {
            return;
        }
        let offset = Vec2::new(
            self.viewport.offset.x.rem_euclid(step),
            self.viewport.offset.y.rem_euclid(step),
        );
        let mut y = canvas.min.y + offset.y;
        while y < canvas.max.y {
            let mut x = canvas.min.x + offset.x;
            while x < canvas.max.x {
                painter.circle_filled(Pos2::new(x, y), 1.0, color);
                x += step;
            }
            y += step;
        }
    }

    fn paint_vignette(&self, painter: &Painter, canvas: Rect, corner: f32, color: Color32) {
        for i in 0..3 {
            painter.rect_stroke(
                canvas.shrink(i as f32 * 2.0),
                corner,
                Stroke::new(2.0, color),
            );
        }
    }
}

/// Resolvable (parent, child) index pairs; dangling child references are
/// skipped without aborting the pass.
fn edge_list(nodes: &[MindNode]) -> Vec<(usize, usize)> {
    let index: HashMap<&str, usize> = nodes
        .iter()
        .enumerate()
        .map(|(i, n)| (n.id.as_str(), i))
        .collect();

    let mut out = Vec::new();
    for (i, n) in nodes.iter().enumerate() {
        for child in &n.children {
            match index.get(child.as_str()) {
                Some(&j) if j != i => out.push((i, j)),
                Some(_) => {}
                None => log::debug!("edge to missing node {child} skipped"),
            }
        }
    }
    out
}

/// Normalize raw egui input into pointer events, paired with the canvas-local
/// position the hit test should resolve against.
fn collect_pointer_events(
    ui: &egui::Ui,
    response: &egui::Response,
    canvas: Rect,
) -> Vec<(PointerEvent, Option<Pos2>)> {
    let (pressed, released, down, interact_pos, latest_pos) = ui.input(|i| {
        (
            i.pointer.primary_pressed(),
            i.pointer.primary_released(),
            i.pointer.primary_down(),
            i.pointer.interact_pos(),
            i.pointer.latest_pos(),
        )
    });
    let to_local = |p: Pos2| p - canvas.min.to_vec2();

    let mut out = Vec::new();
    if pressed && response.hovered() {
        if let Some(p) = interact_pos {
            let local = to_local(p);
            out.push((PointerEvent::Down(local), Some(local)));
        }
    } else if down {
        if let Some(p) = latest_pos {
            let local = to_local(p);
            out.push((PointerEvent::Move(local), Some(local)));
        }
    }
    if released {
        let local = to_local(latest_pos.or(interact_pos).unwrap_or(canvas.min));
        out.push((PointerEvent::Up(local), Some(local)));
    }
    if response.double_clicked() {
        if let Some(p) = interact_pos {
            let local = to_local(p);
            out.push((PointerEvent::DoubleClick(local), Some(local)));
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn export_with_no_scene_produces_no_file() {
        let view = MindMapView::new();
        let dir = tempfile::tempdir().unwrap();
        let result = view
            .export_image_to(&MindMapOptions::default(), dir.path())
            .unwrap();
        assert!(result.is_none());
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[test]
    fn zoom_commands_stay_clamped() {
        let mut view = MindMapView::new();
        for _ in 0..100 {
            view.zoom_in();
        }
        assert!(view.viewport().scale <= crate::viewport::MAX_SCALE);
        for _ in 0..100 {
            view.zoom_out();
        }
        assert!(view.viewport().scale >= crate::viewport::MIN_SCALE);
    }

    #[test]
    fn edge_list_skips_dangling_and_self_references() {
        let nodes = vec![
            MindNode::new("a", "A", 0).with_children(&["b", "ghost", "a"]),
            MindNode::new("b", "B", 1).with_parent("a"),
        ];
        assert_eq!(edge_list(&nodes), vec![(0, 1)]);
    }

    #[test]
    fn reset_view_requests_a_refit() {
        let mut view = MindMapView::new();
        assert!(!view.pending_fit);
        view.reset_view();
        assert!(view.pending_fit);
    }
}
