//! Drawing controller: turns one classified gesture per frame into canvas
//! operations, a status report and a cursor hint.
//!
//! This is a Mealy machine over [`SessionState`]; there is no separate mode
//! enum. The pen is down only while consecutive frames are plain Draw
//! gestures, so any other gesture (or a lost hand) breaks the stroke.

use log::{debug, info};
use serde::Serialize;

use crate::gesture::Gesture;
use crate::palette;
use crate::types::{Point, WHITE};

pub const MIN_BRUSH: u32 = 1;
pub const MAX_BRUSH: u32 = 50;
pub const DEFAULT_BRUSH: u32 = 5;
pub const ERASE_RADIUS: u32 = 30;
/// Seconds between two fist-triggered color advances.
pub const COLOR_CYCLE_COOLDOWN: f64 = 1.0;

pub const LABEL_READY: &str = "Ready";

/// Long-lived session fields, mutated in place every frame.
#[derive(Clone, Debug, PartialEq)]
pub struct SessionState {
    pub color_index: usize,
    pub brush_size: u32,
    pub pen_down: bool,
    /// Previous stroke point; only meaningful while `pen_down`.
    pub last_point: Option<Point>,
    /// When the fist last advanced the color (None = never).
    pub last_cycle: Option<f64>,
}

impl Default for SessionState {
    fn default() -> Self {
        Self {
            color_index: 0,
            brush_size: DEFAULT_BRUSH,
            pen_down: false,
            last_point: None,
            last_cycle: None,
        }
    }
}

/// An edit to the persistent canvas.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CanvasOp {
    /// Stroke segment, `size` pixels thick.
    Line { from: Point, to: Point, color: u32, size: u32 },
    /// Filled disc repainted with the canvas background.
    Erase { center: Point, radius: u32, color: u32 },
}

/// Preview drawn on the output frame only (never on the canvas).
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum Cursor {
    #[default]
    None,
    Brush { at: Point, radius: u32, color: u32 },
    Hover { at: Point, radius: u32 },
    Eraser { at: Point, radius: u32 },
    Size { at: Point, radius: u32, color: u32 },
    NextColor { at: Point, name: &'static str },
}

/// Status record reported with every frame and on demand.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Status {
    pub gesture: String,
    pub color: String,
    pub color_index: usize,
    pub brush_size: u32,
    pub drawing: bool,
}

/// Everything one frame produced.
#[derive(Clone, Debug, PartialEq)]
pub struct Step {
    pub ops: Vec<CanvasOp>,
    pub status: Status,
    pub cursor: Cursor,
}

pub struct DrawingController {
    state: SessionState,
    label: String,
}

impl Default for DrawingController {
    fn default() -> Self {
        Self::new(SessionState::default())
    }
}

impl DrawingController {
    pub fn new(mut state: SessionState) -> Self {
        state.brush_size = clamp_brush(state.brush_size);
        state.color_index %= palette::PALETTE.len();
        Self { state, label: LABEL_READY.to_string() }
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    /// Advance the machine by one frame. `now` is in seconds on any monotonic clock.
    pub fn step(&mut self, gesture: Gesture, now: f64) -> Step {
        let gesture = gesture.resolve_palette();
        let mut ops = Vec::new();
        let mut cursor = Cursor::None;

        // Anything but a plain Draw lifts the pen first.
        if !matches!(gesture, Gesture::Draw(_)) {
            self.lift_pen();
        }

        let label = match gesture {
            Gesture::Draw(tip) => {
                match (self.state.pen_down, self.state.last_point) {
                    (true, Some(prev)) => ops.push(CanvasOp::Line {
                        from: prev,
                        to: tip,
                        color: palette::color(self.state.color_index),
                        size: self.state.brush_size,
                    }),
                    _ => self.state.pen_down = true,
                }
                self.state.last_point = Some(tip);
                cursor = Cursor::Brush {
                    at: tip,
                    radius: self.state.brush_size,
                    color: palette::color(self.state.color_index),
                };
                "Drawing".to_string()
            }
            Gesture::PaletteSelect(i) => {
                if self.set_color_index(i) {
                    info!("Palette touch: color {}", palette::name(i));
                }
                format!("Color: {}", palette::name(i))
            }
            Gesture::Hover(tip) => {
                cursor = Cursor::Hover { at: tip, radius: self.state.brush_size };
                "Hover".to_string()
            }
            Gesture::Erase(tip) => {
                ops.push(CanvasOp::Erase { center: tip, radius: ERASE_RADIUS, color: WHITE });
                cursor = Cursor::Eraser { at: tip, radius: ERASE_RADIUS };
                "Erasing".to_string()
            }
            Gesture::Resize { tip, distance } => {
                self.state.brush_size = clamp_brush(distance / 2);
                cursor = Cursor::Size {
                    at: tip,
                    radius: self.state.brush_size,
                    color: palette::color(self.state.color_index),
                };
                "Adjusting Size".to_string()
            }
            Gesture::ColorCycle(tip) => {
                let label = if self.cooldown_elapsed(now) {
                    self.state.color_index = (self.state.color_index + 1) % palette::PALETTE.len();
                    self.state.last_cycle = Some(now);
                    info!("Fist: next color {}", palette::name(self.state.color_index));
                    format!("Next Color: {}", palette::name(self.state.color_index))
                } else {
                    LABEL_READY.to_string()
                };
                cursor = Cursor::NextColor {
                    at: tip,
                    name: palette::name(self.state.color_index + 1),
                };
                label
            }
            Gesture::Idle => LABEL_READY.to_string(),
        };

        debug!("gesture={} ops={} pen_down={}", gesture.kind(), ops.len(), self.state.pen_down);
        self.label = label;
        Step { ops, status: self.status(), cursor }
    }

    fn cooldown_elapsed(&self, now: f64) -> bool {
        self.state
            .last_cycle
            .is_none_or(|last| now - last > COLOR_CYCLE_COOLDOWN)
    }

    fn lift_pen(&mut self) {
        self.state.pen_down = false;
        self.state.last_point = None;
    }

    /// Current status without advancing a frame.
    pub fn status(&self) -> Status {
        Status {
            gesture: self.label.clone(),
            color: palette::name(self.state.color_index).to_string(),
            color_index: self.state.color_index,
            brush_size: self.state.brush_size,
            drawing: self.state.pen_down,
        }
    }

    /// External command: select a palette entry by index (wrapping).
    /// Returns whether the color changed.
    pub fn set_color_index(&mut self, i: usize) -> bool {
        let i = i % palette::PALETTE.len();
        let changed = self.state.color_index != i;
        self.state.color_index = i;
        changed
    }

    /// External command: set brush size (clamped).
    pub fn set_brush_size(&mut self, size: u32) {
        self.state.brush_size = clamp_brush(size);
    }
}

pub fn clamp_brush(size: u32) -> u32 {
    size.clamp(MIN_BRUSH, MAX_BRUSH)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line(ops: &[CanvasOp]) -> Option<(Point, Point)> {
        ops.iter().find_map(|op| match op {
            CanvasOp::Line { from, to, .. } => Some((*from, *to)),
            _ => None,
        })
    }

    #[test]
    fn first_draw_only_puts_pen_down() {
        let mut c = DrawingController::default();
        let s = c.step(Gesture::Draw(Point::new(100, 100)), 0.0);
        assert!(s.ops.is_empty());
        assert!(s.status.drawing);
        let s = c.step(Gesture::Draw(Point::new(110, 100)), 0.03);
        assert_eq!(line(&s.ops), Some((Point::new(100, 100), Point::new(110, 100))));
        assert_eq!(s.status.gesture, "Drawing");
    }

    #[test]
    fn palette_touch_never_extends_stroke() {
        let mut c = DrawingController::default();
        c.step(Gesture::Draw(Point::new(300, 300)), 0.0);
        let s = c.step(Gesture::Draw(Point::new(145, 45)), 0.1); // swatch 2 (Blue)
        assert!(s.ops.is_empty());
        assert_eq!(s.status.gesture, "Color: Blue");
        assert_eq!(s.status.color, "Blue");
        assert!(!s.status.drawing);
        // back on the canvas: fresh stroke, not a segment from the swatch or old point
        let s = c.step(Gesture::Draw(Point::new(310, 300)), 0.2);
        assert!(s.ops.is_empty());
    }

    #[test]
    fn resting_on_a_swatch_selects_once() {
        let mut c = DrawingController::default();
        assert!(!c.set_color_index(0));
        for t in [0.0, 0.03, 0.06] {
            let s = c.step(Gesture::PaletteSelect(4), t);
            assert_eq!(s.status.gesture, "Color: Yellow");
            assert_eq!(s.status.color_index, 4);
        }
        // already selected: nothing changes, nothing to report
        assert!(!c.set_color_index(4));
        assert!(c.set_color_index(7));
        assert_eq!(c.state().color_index, 1);
    }

    #[test]
    fn any_other_gesture_breaks_the_stroke() {
        let interruptions = [
            Gesture::Idle,
            Gesture::Hover(Point::new(1, 1)),
            Gesture::Erase(Point::new(1, 1)),
            Gesture::Resize { tip: Point::new(1, 1), distance: 10 },
            Gesture::ColorCycle(Point::new(1, 1)),
        ];
        for g in interruptions {
            let mut c = DrawingController::default();
            c.step(Gesture::Draw(Point::new(200, 200)), 0.0);
            c.step(Gesture::Draw(Point::new(210, 200)), 0.1);
            let s = c.step(g, 0.2);
            assert!(!s.status.drawing, "{g:?}");
            let s = c.step(Gesture::Draw(Point::new(400, 400)), 0.3);
            assert!(line(&s.ops).is_none(), "{g:?} reconnected the stroke");
        }
    }

    #[test]
    fn resize_clamps_both_ends() {
        let mut c = DrawingController::default();
        let tip = Point::new(0, 0);
        assert_eq!(c.step(Gesture::Resize { tip, distance: 0 }, 0.0).status.brush_size, 1);
        assert_eq!(c.step(Gesture::Resize { tip, distance: 1000 }, 0.0).status.brush_size, 50);
        assert_eq!(c.step(Gesture::Resize { tip, distance: 41 }, 0.0).status.brush_size, 20);
    }

    #[test]
    fn fist_is_debounced() {
        let mut c = DrawingController::default();
        let fist = Gesture::ColorCycle(Point::new(300, 300));
        let s = c.step(fist, 0.0);
        assert_eq!(s.status.gesture, "Next Color: Green");
        for t in [0.1, 0.5, 0.9, 1.0] {
            let s = c.step(fist, t);
            assert_eq!(s.status.color_index, 1, "advanced again at t={t}");
            assert_eq!(s.status.gesture, LABEL_READY);
        }
        let s = c.step(fist, 1.1);
        assert_eq!(s.status.color_index, 2);
        assert_eq!(s.cursor, Cursor::NextColor { at: Point::new(300, 300), name: "Black" });
    }

    #[test]
    fn erase_emits_background_disc() {
        let mut c = DrawingController::default();
        let s = c.step(Gesture::Erase(Point::new(50, 60)), 0.0);
        assert_eq!(s.ops, vec![CanvasOp::Erase { center: Point::new(50, 60), radius: 30, color: WHITE }]);
        assert_eq!(s.status.gesture, "Erasing");
    }

    #[test]
    fn idle_reports_ready() {
        let mut c = DrawingController::default();
        let s = c.step(Gesture::Idle, 0.0);
        assert_eq!(s.status.gesture, "Ready");
        assert!(s.ops.is_empty());
        assert_eq!(s.cursor, Cursor::None);
    }

    #[test]
    fn status_serializes_camel_case() {
        let c = DrawingController::default();
        let json = serde_json::to_value(c.status()).unwrap();
        assert_eq!(json["brushSize"], 5);
        assert_eq!(json["color"], "Red");
        assert_eq!(json["drawing"], false);
    }
}
