//! Interaction Controller
//!
//! One state machine for mouse and single-touch input: `Idle`,
//! `PanningCanvas`, `DraggingNode`. The render layer normalizes raw egui
//! input into [`PointerEvent`]s (canvas-local pixels) and resolves what is
//! under the pointer via the hit-test index; this module stays free of egui
//! widgets so the transitions are unit-testable.

use eframe::egui::{Pos2, Vec2};

/// Movement below this many screen pixels counts as a click, not a drag
pub const DRAG_THRESHOLD: f32 = 4.0;

/// Normalized pointer input, in canvas-local screen pixels
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointerEvent {
    Down(Pos2),
    Move(Pos2),
    Up(Pos2),
    DoubleClick(Pos2),
    /// Pointer left the window or a second finger landed
    Cancel,
}

/// Current gesture
#[derive(Debug, Clone, PartialEq, Default)]
pub enum InteractionState {
    #[default]
    Idle,
    PanningCanvas {
        /// Node under the press, if any (selected on a movement-free release)
        pressed_over: Option<String>,
        press: Pos2,
        last: Pos2,
        moved: bool,
    },
    DraggingNode {
        id: String,
        press: Pos2,
        last: Pos2,
        moved: bool,
    },
}

/// What the render layer should do in response to one pointer event
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    /// Shift the viewport offset by this raw screen-space delta
    Pan(Vec2),
    /// Move a node; delta is screen-space, divide by scale for world units
    DragNode { id: String, delta: Vec2 },
    /// Selection changed by a click (`None` = clicked empty canvas)
    Select(Option<String>),
    /// Double-click on a node while editable
    Rename(String),
}

/// Pointer-gesture state machine
#[derive(Debug, Default)]
pub struct InteractionController {
    state: InteractionState,
}

impl InteractionController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &InteractionState {
        &self.state
    }

    pub fn is_idle(&self) -> bool {
        self.state == InteractionState::Idle
    }

    /// Feed one event. `hit` is the node under the event position per the
    /// latest hit-test index.
    pub fn handle(
        &mut self,
        event: PointerEvent,
        hit: Option<&str>,
        editable: bool,
    ) -> Option<Action> {
        match event {
            PointerEvent::Down(pos) => {
                self.state = match hit {
                    Some(id) if editable => InteractionState::DraggingNode {
                        id: id.to_string(),
                        press: pos,
                        last: pos,
                        moved: false,
                    },
                    _ => InteractionState::PanningCanvas {
                        pressed_over: hit.map(str::to_string),
                        press: pos,
                        last: pos,
                        moved: false,
                    },
                };
                None
            }

            PointerEvent::Move(pos) => match &mut self.state {
                InteractionState::DraggingNode {
                    id,
                    press,
                    last,
                    moved,
                } => {
                    if !*moved && (pos - *press).length() < DRAG_THRESHOLD {
                        *last = pos;
                        return None;
                    }
                    *moved = true;
                    let delta = pos - *last;
                    *last = pos;
                    if delta == Vec2::ZERO {
                        None
                    } else {
                        Some(Action::DragNode {
                            id: id.clone(),
                            delta,
                        })
                    }
                }
                InteractionState::PanningCanvas {
                    press, last, moved, ..
                } => {
                    if !*moved && (pos - *press).length() < DRAG_THRESHOLD {
                        *last = pos;
                        return None;
                    }
                    *moved = true;
                    let delta = pos - *last;
                    *last = pos;
                    if delta == Vec2::ZERO {
                        None
                    } else {
                        Some(Action::Pan(delta))
                    }
                }
                InteractionState::Idle => None,
            },

            PointerEvent::Up(_pos) => {
                let finished = std::mem::take(&mut self.state);
                match finished {
                    InteractionState::DraggingNode { id, moved: false, .. } => {
                        Some(Action::Select(Some(id)))
                    }
                    InteractionState::PanningCanvas {
                        pressed_over,
                        moved: false,
                        ..
                    } => Some(Action::Select(pressed_over)),
                    _ => None,
                }
            }

            PointerEvent::DoubleClick(_pos) => {
                if editable {
                    hit.map(|id| Action::Rename(id.to_string()))
                } else {
                    None
                }
            }

            PointerEvent::Cancel => {
                self.state = InteractionState::Idle;
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn p(x: f32, y: f32) -> Pos2 {
        Pos2::new(x, y)
    }

    #[test]
    fn click_on_empty_canvas_clears_selection() {
        let mut ctl = InteractionController::new();
        assert_eq!(ctl.handle(PointerEvent::Down(p(10.0, 10.0)), None, true), None);
        assert_eq!(
            ctl.handle(PointerEvent::Up(p(11.0, 10.0)), None, true),
            Some(Action::Select(None))
        );
        assert!(ctl.is_idle());
    }

    #[test]
    fn click_on_node_selects_it() {
        let mut ctl = InteractionController::new();
        ctl.handle(PointerEvent::Down(p(0.0, 0.0)), Some("n1"), true);
        assert_eq!(
            ctl.handle(PointerEvent::Up(p(1.0, 1.0)), Some("n1"), true),
            Some(Action::Select(Some("n1".to_string())))
        );
    }

    #[test]
    fn click_on_node_selects_even_when_not_editable() {
        let mut ctl = InteractionController::new();
        ctl.handle(PointerEvent::Down(p(0.0, 0.0)), Some("n1"), false);
        assert!(matches!(ctl.state(), InteractionState::PanningCanvas { .. }));
        assert_eq!(
            ctl.handle(PointerEvent::Up(p(0.0, 0.0)), Some("n1"), false),
            Some(Action::Select(Some("n1".to_string())))
        );
    }

    #[test]
    fn dragging_node_emits_deltas_after_threshold() {
        let mut ctl = InteractionController::new();
        ctl.handle(PointerEvent::Down(p(0.0, 0.0)), Some("n1"), true);

        // Below threshold: swallowed
        assert_eq!(ctl.handle(PointerEvent::Move(p(2.0, 0.0)), Some("n1"), true), None);

        // Crosses threshold: emits from the last tracked position
        assert_eq!(
            ctl.handle(PointerEvent::Move(p(10.0, 0.0)), Some("n1"), true),
            Some(Action::DragNode {
                id: "n1".to_string(),
                delta: Vec2::new(8.0, 0.0),
            })
        );
        assert_eq!(
            ctl.handle(PointerEvent::Move(p(10.0, 5.0)), None, true),
            Some(Action::DragNode {
                id: "n1".to_string(),
                delta: Vec2::new(0.0, 5.0),
            })
        );

        // A moved drag does not select on release
        assert_eq!(ctl.handle(PointerEvent::Up(p(10.0, 5.0)), None, true), None);
        assert!(ctl.is_idle());
    }

    #[test]
    fn node_press_pans_when_not_editable() {
        let mut ctl = InteractionController::new();
        ctl.handle(PointerEvent::Down(p(0.0, 0.0)), Some("n1"), false);
        assert_eq!(
            ctl.handle(PointerEvent::Move(p(12.0, 0.0)), Some("n1"), false),
            Some(Action::Pan(Vec2::new(12.0, 0.0)))
        );
    }

    #[test]
    fn empty_press_pans_canvas() {
        let mut ctl = InteractionController::new();
        ctl.handle(PointerEvent::Down(p(5.0, 5.0)), None, true);
        assert_eq!(
            ctl.handle(PointerEvent::Move(p(5.0, 25.0)), None, true),
            Some(Action::Pan(Vec2::new(0.0, 20.0)))
        );
        assert_eq!(ctl.handle(PointerEvent::Up(p(5.0, 25.0)), None, true), None);
    }

    #[test]
    fn double_click_renames_only_when_editable() {
        let mut ctl = InteractionController::new();
        assert_eq!(
            ctl.handle(PointerEvent::DoubleClick(p(0.0, 0.0)), Some("n1"), true),
            Some(Action::Rename("n1".to_string()))
        );
        assert_eq!(
            ctl.handle(PointerEvent::DoubleClick(p(0.0, 0.0)), Some("n1"), false),
            None
        );
        assert_eq!(ctl.handle(PointerEvent::DoubleClick(p(0.0, 0.0)), None, true), None);
    }

    #[test]
    fn cancel_returns_to_idle_without_actions() {
        let mut ctl = InteractionController::new();
        ctl.handle(PointerEvent::Down(p(0.0, 0.0)), Some("n1"), true);
        ctl.handle(PointerEvent::Move(p(20.0, 0.0)), None, true);
        assert_eq!(ctl.handle(PointerEvent::Cancel, None, true), None);
        assert!(ctl.is_idle());
    }
}
