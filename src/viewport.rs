//! Viewport Transform
//!
//! Pan/zoom state mapping world (layout) coordinates to canvas pixels:
//! `screen = world * scale + offset`. The offset is kept in screen pixels so
//! panning is a raw pixel delta regardless of zoom.

use eframe::egui::{Pos2, Rect, Vec2};

/// Minimum interactive zoom
pub const MIN_SCALE: f32 = 0.4;
/// Maximum interactive zoom
pub const MAX_SCALE: f32 = 2.5;
/// Fit-to-bounds never zooms in past this
pub const MAX_FIT_SCALE: f32 = 1.2;

/// Pan/zoom state for one engine instance
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    /// Zoom factor, clamped to [`MIN_SCALE`, `MAX_SCALE`]
    pub scale: f32,
    /// Pixel offset of the world origin
    pub offset: Vec2,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            scale: 1.0,
            offset: Vec2::ZERO,
        }
    }
}

impl Viewport {
    /// Multiply the scale by `factor`, clamped. Out-of-range requests degrade
    /// to the nearest bound, never an error.
    pub fn zoom_by(&mut self, factor: f32) {
        self.scale = (self.scale * factor).clamp(MIN_SCALE, MAX_SCALE);
    }

    /// Zoom keeping the world point under `anchor` (canvas pixels) fixed
    pub fn zoom_about(&mut self, factor: f32, anchor: Pos2) {
        let world = self.screen_to_world(anchor);
        self.zoom_by(factor);
        self.offset = anchor.to_vec2() - world.to_vec2() * self.scale;
    }

    /// Derive scale and offset so `bounds` (world space, padded) is centered
    /// and fully visible in a viewport of `viewport_size` pixels. A `None`
    /// bounds (empty node set) is a no-op, guarding the zero-size divide.
    pub fn fit_to_bounds(&mut self, bounds: Option<Rect>, viewport_size: Vec2, padding: f32) {
        let Some(bounds) = bounds else {
            return;
        };
        let padded = bounds.expand(padding);
        let width = padded.width().max(1.0);
        let height = padded.height().max(1.0);

        self.scale = (viewport_size.x / width)
            .min(viewport_size.y / height)
            .clamp(MIN_SCALE, MAX_FIT_SCALE);
        self.offset = (viewport_size / 2.0) - padded.center().to_vec2() * self.scale;
    }

    pub fn screen_to_world(&self, screen: Pos2) -> Pos2 {
        Pos2::new(
            (screen.x - self.offset.x) / self.scale,
            (screen.y - self.offset.y) / self.scale,
        )
    }

    pub fn world_to_screen(&self, world: Pos2) -> Pos2 {
        Pos2::new(
            world.x * self.scale + self.offset.x,
            world.y * self.scale + self.offset.y,
        )
    }

    pub fn rect_to_screen(&self, rect: Rect) -> Rect {
        Rect::from_min_max(
            self.world_to_screen(rect.min),
            self.world_to_screen(rect.max),
        )
    }
}
