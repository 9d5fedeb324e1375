//! Mindmap Studio - Native Mind-Map Viewer
//! Built with egui for native Wayland support

mod config;
mod export;
mod geometry;
mod hittest;
mod interact;
mod layout;
mod node;
mod render;
mod text;
mod viewport;

use config::{MindMapOptions, Palette};
use eframe::egui::{self, ComboBox, RichText, TextEdit};
use layout::LayoutMode;
use node::MindNode;
use render::{MindMapEvent, MindMapView};

/// Sample diagram in the host wire format: `{ "nodes": [...] }`
const SAMPLE_DIAGRAM: &str = r#"{
  "nodes": [
    { "id": "product", "label": "Product Launch", "level": 0,
      "children": ["design", "engineering", "marketing", "ops"] },
    { "id": "design", "label": "Design", "level": 1, "parent": "product",
      "children": ["wireframes", "brand"] },
    { "id": "engineering", "label": "Engineering", "level": 1, "parent": "product",
      "children": ["backend", "frontend", "infra"] },
    { "id": "marketing", "label": "Marketing", "level": 1, "parent": "product",
      "children": ["launch-post", "press-kit"] },
    { "id": "ops", "label": "Operations", "level": 1, "parent": "product" },
    { "id": "wireframes", "label": "Wireframes and interactive prototypes for the onboarding flow", "level": 2, "parent": "design" },
    { "id": "brand", "label": "Brand refresh", "level": 2, "parent": "design" },
    { "id": "backend", "label": "Backend API", "level": 2, "parent": "engineering" },
    { "id": "frontend", "label": "Frontend app", "level": 2, "parent": "engineering" },
    { "id": "infra", "label": "Deployment pipeline and monitoring", "level": 2, "parent": "engineering" },
    { "id": "launch-post", "label": "Launch blog post", "level": 2, "parent": "marketing" },
    { "id": "press-kit", "label": "Press kit", "level": 2, "parent": "marketing" }
  ]
}"#;

#[derive(serde::Deserialize)]
struct DiagramPayload {
    nodes: Vec<MindNode>,
}

fn main() -> eframe::Result<()> {
    env_logger::init();

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1200.0, 800.0])
            .with_min_inner_size([700.0, 480.0])
            .with_title("Mindmap Studio"),
        ..Default::default()
    };

    eframe::run_native(
        "Mindmap Studio",
        options,
        Box::new(|_cc| Ok(Box::new(MindmapStudio::new()))),
    )
}

struct MindmapStudio {
    nodes: Vec<MindNode>,
    view: MindMapView,
    options: MindMapOptions,
    editable: bool,
    dark: bool,
    /// Open rename dialog: (node id, edit buffer)
    rename: Option<(String, String)>,
    status: String,
}

impl MindmapStudio {
    fn new() -> Self {
        let nodes = match serde_json::from_str::<DiagramPayload>(SAMPLE_DIAGRAM) {
            Ok(payload) => payload.nodes,
            Err(e) => {
                log::error!("sample diagram failed to parse: {}", e);
                Vec::new()
            }
        };
        Self {
            nodes,
            view: MindMapView::new(),
            options: MindMapOptions::default(),
            editable: true,
            dark: true,
            rename: None,
            status: String::new(),
        }
    }

    fn toolbar(&mut self, ui: &mut egui::Ui, ctx: &egui::Context) {
        ui.horizontal(|ui| {
            if ui.button("➕ Zoom In").clicked() {
                self.view.zoom_in();
            }
            if ui.button("➖ Zoom Out").clicked() {
                self.view.zoom_out();
            }
            if ui.button("🏠 Reset View").clicked() {
                self.view.reset_view();
            }
            if ui.button("⛶ Fullscreen").clicked() {
                self.view.toggle_fullscreen(ctx);
            }
            if ui.button("💾 Export PNG").clicked() {
                match self.view.export_image(&self.options) {
                    Ok(Some(path)) => self.status = format!("Exported {}", path.display()),
                    Ok(None) => self.status = "Nothing to export".to_string(),
                    Err(e) => {
                        log::error!("export failed: {}", e);
                        self.status = format!("Export failed: {}", e);
                    }
                }
            }

            ui.separator();

            let mut mode = self.options.layout;
            ComboBox::from_label("Layout")
                .selected_text(mode.name())
                .show_ui(ui, |ui| {
                    for &candidate in LayoutMode::all() {
                        ui.selectable_value(&mut mode, candidate, candidate.name());
                    }
                });
            let relayout = ui.button("↺ Re-layout").clicked();
            if mode != self.options.layout || relayout {
                self.options.layout = mode;
                self.options.auto_layout = true;
                self.view.reset_view();
            }

            ui.checkbox(&mut self.editable, "Editable");
            ui.checkbox(&mut self.options.show_grid, "Grid");

            if ui.checkbox(&mut self.dark, "Dark").changed() {
                self.options.palette = if self.dark {
                    Palette::dark()
                } else {
                    Palette::light()
                };
            }

            ui.separator();
            ui.label(format!("{:.0}%", self.view.viewport().scale * 100.0));
        });
    }

    fn rename_dialog(&mut self, ctx: &egui::Context) {
        let Some((id, mut buffer)) = self.rename.take() else {
            return;
        };
        let mut open = true;
        let mut committed = false;
        egui::Window::new("Rename Node")
            .collapsible(false)
            .resizable(false)
            .show(ctx, |ui| {
                let edit = ui.add(TextEdit::singleline(&mut buffer).desired_width(260.0));
                edit.request_focus();
                let submitted = edit.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter));
                ui.horizontal(|ui| {
                    if ui.button("Save").clicked() || submitted {
                        committed = true;
                    }
                    if ui.button("Cancel").clicked() {
                        open = false;
                    }
                });
                if ui.input(|i| i.key_pressed(egui::Key::Escape)) {
                    open = false;
                }
            });

        if committed {
            let trimmed = buffer.trim();
            if !trimmed.is_empty() {
                if let Some(n) = self.nodes.iter_mut().find(|n| n.id == id) {
                    n.label = trimmed.to_string();
                }
            }
        } else if open {
            // Still editing next frame
            self.rename = Some((id, buffer));
        }
    }
}

impl eframe::App for MindmapStudio {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        egui::TopBottomPanel::top("toolbar").show(ctx, |ui| {
            ui.add_space(4.0);
            self.toolbar(ui, ctx);
            ui.add_space(4.0);
        });

        egui::TopBottomPanel::bottom("status").show(ctx, |ui| {
            ui.horizontal(|ui| {
                let selected = self.view.selected_node().unwrap_or("—");
                ui.label(RichText::new(format!("Selected: {}", selected)).monospace());
                ui.separator();
                ui.label(&self.status);
            });
        });

        let output = egui::CentralPanel::default()
            .show(ctx, |ui| {
                self.view.ui(ui, &self.nodes, self.editable, &self.options)
            })
            .inner;

        for event in output.events {
            match event {
                MindMapEvent::NodeSelected(id) => {
                    self.status = match &id {
                        Some(id) => format!("Selected {}", id),
                        None => "Selection cleared".to_string(),
                    };
                }
                MindMapEvent::NodesChanged(updated) => {
                    // Dragged positions replace the set wholesale; freeze
                    // auto layout so they stick until the next re-layout.
                    self.nodes = updated;
                    self.options.auto_layout = false;
                }
                MindMapEvent::RenameRequested(id) => {
                    let label = self
                        .nodes
                        .iter()
                        .find(|n| n.id == id)
                        .map(|n| n.label.clone())
                        .unwrap_or_default();
                    self.rename = Some((id, label));
                }
            }
        }

        self.rename_dialog(ctx);
    }
}
