//! PNG Export
//!
//! Offscreen rasterization of the current scene into an `egui::ColorImage`,
//! encoded with the `image` crate. Works without a live GPU surface: shapes
//! are software-rendered, and labels are drawn with `fontdue` when a font
//! file can be found (label-less export is not an error).

use crate::config::Palette;
use crate::geometry::{self, NodeTier, NodeVisual};
use eframe::egui::{Color32, ColorImage, Pos2, Rect};
use std::path::{Path, PathBuf};

/// Largest output dimension before padding
const MAX_DIM: f32 = 2000.0;

/// Pixel padding around the scene
const PADDING: f32 = 32.0;

/// Card border thickness at scale 1.0
const CARD_BORDER: f32 = 2.0;

/// Errors surfaced by image export
#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("failed to write image: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to encode image: {0}")]
    Image(#[from] image::ImageError),
}

/// Snapshot of the last render pass, in world coordinates
#[derive(Debug, Clone, Default)]
pub struct ExportScene {
    pub nodes: Vec<NodeVisual>,
    /// Parent-center to child-center pairs for resolvable edges
    pub edges: Vec<(Pos2, Pos2)>,
}

impl ExportScene {
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

/// Directory exported files land in: the user's download directory, or the
/// working directory when none exists.
pub fn default_export_dir() -> PathBuf {
    dirs::download_dir()
        .or_else(|| std::env::current_dir().ok())
        .unwrap_or_else(|| PathBuf::from("."))
}

/// Rasterize `scene` and write `mindmap-<unixMillis>.png` into `dir`.
/// Returns the written path.
pub fn export_png_to(
    scene: &ExportScene,
    palette: &Palette,
    font_size: f32,
    dir: &Path,
) -> Result<PathBuf, ExportError> {
    let image = rasterize(scene, palette, font_size);
    let filename = format!("mindmap-{}.png", chrono::Utc::now().timestamp_millis());
    let path = dir.join(filename);
    write_color_image_png(&path, &image)?;
    log::info!(
        "exported {} nodes to {} ({}x{})",
        scene.nodes.len(),
        path.display(),
        image.size[0],
        image.size[1]
    );
    Ok(path)
}

fn rasterize(scene: &ExportScene, palette: &Palette, font_size: f32) -> ColorImage {
    let mut bounds = scene
        .nodes
        .iter()
        .map(|v| v.rect)
        .reduce(|acc, r| acc.union(r))
        .unwrap_or(Rect::from_min_max(Pos2::ZERO, Pos2::new(1.0, 1.0)));
    // Curved edges bulge past the node boxes; keep their control points in
    // frame so long edges don't clip at the border.
    for (a, b) in &scene.edges {
        bounds.extend_with(geometry::edge_control_point(*a, *b));
    }

    let width = bounds.width().max(1.0);
    let height = bounds.height().max(1.0);
    let scale = (MAX_DIM / width).min(MAX_DIM / height).clamp(0.1, 2.0);

    let img_w = ((width * scale) + PADDING * 2.0).ceil() as usize;
    let img_h = ((height * scale) + PADDING * 2.0).ceil() as usize;
    let mut image = ColorImage::new([img_w.max(1), img_h.max(1)], palette.canvas_bg);

    let origin = bounds.min;
    let map = |p: Pos2| -> Pos2 {
        Pos2::new(
            (p.x - origin.x) * scale + PADDING,
            (p.y - origin.y) * scale + PADDING,
        )
    };

    // Edges behind nodes
    let stroke = (2.0 * scale).max(1.0);
    for (a, b) in &scene.edges {
        let control = geometry::edge_control_point(*a, *b);
        let (pa, pc, pb) = (map(*a), map(control), map(*b));
        draw_quadratic(&mut image, pa, pc, pb, stroke, palette.edge);
    }

    let font = load_export_font();
    for visual in &scene.nodes {
        let rect_px = Rect::from_min_max(map(visual.rect.min), map(visual.rect.max));
        match visual.tier {
            NodeTier::Root => {
                fill_circle(
                    &mut image,
                    rect_px.center(),
                    rect_px.width() / 2.0,
                    visual.fill,
                );
            }
            NodeTier::Branch => {
                let r = rect_px.height() / 2.0;
                fill_round_rect(&mut image, rect_px, r, visual.fill);
            }
            NodeTier::Leaf => {
                let r = geometry::CARD_ROUNDING * scale;
                let border = (CARD_BORDER * scale).max(1.0);
                fill_round_rect(&mut image, rect_px, r, palette.card_stroke);
                fill_round_rect(
                    &mut image,
                    rect_px.shrink(border),
                    (r - border).max(1.0),
                    visual.fill,
                );
            }
        }

        if let Some(font) = &font {
            let px = font_size * scale;
            let line_h = font
                .horizontal_line_metrics(px)
                .map(|m| m.new_line_size)
                .unwrap_or(px * 1.25);
            let count = visual.lines.len() as f32;
            for (i, line) in visual.lines.iter().enumerate() {
                let cy = rect_px.center().y + (i as f32 - (count - 1.0) / 2.0) * line_h;
                draw_text_centered(
                    &mut image,
                    font,
                    line,
                    px,
                    rect_px.center().x,
                    cy,
                    visual.text_color,
                );
            }
        }
    }

    image
}

fn write_color_image_png(path: &Path, image: &ColorImage) -> Result<(), ExportError> {
    let mut bytes = Vec::with_capacity(image.pixels.len() * 4);
    for pixel in &image.pixels {
        let (r, g, b, a) = pixel.to_tuple();
        bytes.extend_from_slice(&[r, g, b, a]);
    }
    image::save_buffer(
        path,
        &bytes,
        image.size[0] as u32,
        image.size[1] as u32,
        image::ColorType::Rgba8,
    )?;
    Ok(())
}

// ── software rasterizer ────────────────────────────────────────────────────

fn blend_pixel(image: &mut ColorImage, x: i32, y: i32, color: Color32, coverage: f32) {
    if x < 0 || y < 0 || x >= image.size[0] as i32 || y >= image.size[1] as i32 {
        return;
    }
    let coverage = coverage.clamp(0.0, 1.0);
    if coverage <= 0.0 {
        return;
    }
    let idx = y as usize * image.size[0] + x as usize;
    let dst = image.pixels[idx];
    let a = coverage * color.a() as f32 / 255.0;
    let mix = |src: u8, dst: u8| -> u8 {
        (src as f32 * a + dst as f32 * (1.0 - a)).round().clamp(0.0, 255.0) as u8
    };
    image.pixels[idx] = Color32::from_rgba_unmultiplied(
        mix(color.r(), dst.r()),
        mix(color.g(), dst.g()),
        mix(color.b(), dst.b()),
        dst.a().max((a * 255.0) as u8),
    );
}

fn fill_circle(image: &mut ColorImage, center: Pos2, radius: f32, color: Color32) {
    let min_x = (center.x - radius - 1.0).floor() as i32;
    let max_x = (center.x + radius + 1.0).ceil() as i32;
    let min_y = (center.y - radius - 1.0).floor() as i32;
    let max_y = (center.y + radius + 1.0).ceil() as i32;
    for y in min_y..=max_y {
        for x in min_x..=max_x {
            let dx = x as f32 + 0.5 - center.x;
            let dy = y as f32 + 0.5 - center.y;
            let dist = (dx * dx + dy * dy).sqrt();
            blend_pixel(image, x, y, color, radius - dist + 0.5);
        }
    }
}

fn fill_round_rect(image: &mut ColorImage, rect: Rect, radius: f32, color: Color32) {
    let radius = radius.min(rect.width() / 2.0).min(rect.height() / 2.0);
    let half = rect.size() / 2.0;
    let center = rect.center();
    let min_x = (rect.min.x - 1.0).floor() as i32;
    let max_x = (rect.max.x + 1.0).ceil() as i32;
    let min_y = (rect.min.y - 1.0).floor() as i32;
    let max_y = (rect.max.y + 1.0).ceil() as i32;
    for y in min_y..=max_y {
        for x in min_x..=max_x {
            // Signed distance to the rounded rectangle
            let dx = (x as f32 + 0.5 - center.x).abs() - (half.x - radius);
            let dy = (y as f32 + 0.5 - center.y).abs() - (half.y - radius);
            let outside = (dx.max(0.0).powi(2) + dy.max(0.0).powi(2)).sqrt();
            let inside = dx.max(dy).min(0.0);
            blend_pixel(image, x, y, color, radius - (outside + inside) + 0.5);
        }
    }
}

fn draw_quadratic(image: &mut ColorImage, a: Pos2, control: Pos2, b: Pos2, width: f32, color: Color32) {
    let approx_len = (b - a).length() + 1.0;
    let steps = (approx_len / 3.0).ceil().clamp(8.0, 256.0) as usize;
    let mut prev = a;
    for i in 1..=steps {
        let t = i as f32 / steps as f32;
        let u = 1.0 - t;
        let p = Pos2::new(
            u * u * a.x + 2.0 * u * t * control.x + t * t * b.x,
            u * u * a.y + 2.0 * u * t * control.y + t * t * b.y,
        );
        draw_segment(image, prev, p, width, color);
        prev = p;
    }
}

fn draw_segment(image: &mut ColorImage, a: Pos2, b: Pos2, width: f32, color: Color32) {
    let length = (b - a).length();
    let steps = length.ceil().max(1.0) as usize;
    let radius = width / 2.0;
    for i in 0..=steps {
        let t = i as f32 / steps as f32;
        let p = a + (b - a) * t;
        fill_circle(image, p, radius, color);
    }
}

// ── label rasterization ────────────────────────────────────────────────────

/// Best-effort font lookup for export labels: `MINDMAP_STUDIO_FONT`, then a
/// handful of common system locations. `None` means labels are skipped.
fn load_export_font() -> Option<fontdue::Font> {
    let mut candidates: Vec<PathBuf> = Vec::new();
    if let Ok(path) = std::env::var("MINDMAP_STUDIO_FONT") {
        candidates.push(PathBuf::from(path));
    }
    candidates.extend(
        [
            "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
            "/usr/share/fonts/TTF/DejaVuSans.ttf",
            "/usr/share/fonts/dejavu/DejaVuSans.ttf",
            "/Library/Fonts/Arial.ttf",
            "/System/Library/Fonts/Supplemental/Arial.ttf",
            "C:\\Windows\\Fonts\\arial.ttf",
        ]
        .iter()
        .map(PathBuf::from),
    );

    for path in candidates {
        if let Ok(bytes) = std::fs::read(&path) {
            if let Ok(font) = fontdue::Font::from_bytes(bytes, fontdue::FontSettings::default()) {
                return Some(font);
            }
        }
    }
    log::debug!("no export font found; labels omitted from PNG");
    None
}

fn draw_text_centered(
    image: &mut ColorImage,
    font: &fontdue::Font,
    text: &str,
    px: f32,
    center_x: f32,
    center_y: f32,
    color: Color32,
) {
    let width: f32 = text
        .chars()
        .map(|c| font.metrics(c, px).advance_width)
        .sum();
    let baseline = match font.horizontal_line_metrics(px) {
        Some(m) => center_y + (m.ascent + m.descent) / 2.0,
        None => center_y + px * 0.35,
    };

    let mut cursor = center_x - width / 2.0;
    for ch in text.chars() {
        let (metrics, bitmap) = font.rasterize(ch, px);
        let x0 = (cursor + metrics.xmin as f32).round() as i32;
        let y0 = (baseline - metrics.ymin as f32 - metrics.height as f32).round() as i32;
        for row in 0..metrics.height {
            for col in 0..metrics.width {
                let alpha = bitmap[row * metrics.width + col];
                if alpha > 0 {
                    blend_pixel(
                        image,
                        x0 + col as i32,
                        y0 + row as i32,
                        color,
                        alpha as f32 / 255.0,
                    );
                }
            }
        }
        cursor += metrics.advance_width;
    }
}
