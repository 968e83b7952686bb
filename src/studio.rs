//! The drawing session: controller + canvas behind one lock.
//!
//! The frame loop and the external command surface (keyboard, a future
//! network handler) both go through [`Studio`], so a color change or a clear
//! can never land in the middle of a frame's read-modify-write.

use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Instant;

use log::{debug, info, warn};

use crate::canvas::Canvas;
use crate::controller::{DrawingController, SessionState, Status, Step};
use crate::error::Error;
use crate::gesture::classify_hand;
use crate::landmarks::{LandmarkSet, RawHand};
use crate::overlay::{draw_cursor, draw_hud, draw_skeleton};
use crate::palette;
use crate::types::FrameBuffer;

/// What one frame produced for the outside world.
#[derive(Clone, Debug)]
pub struct FrameOutput {
    pub frame: FrameBuffer, // composited + decorated
    pub status: Status,
}

struct Session {
    controller: DrawingController,
    canvas: Canvas,
}

pub struct Studio {
    session: Mutex<Session>,
}

impl Studio {
    pub fn new(width: usize, height: usize, initial: SessionState) -> Self {
        Self {
            session: Mutex::new(Session {
                controller: DrawingController::new(initial),
                canvas: Canvas::new(width, height),
            }),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Session> {
        // state stays consistent per field even if a holder panicked
        self.session.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// One frame with a detector hand in normalized coordinates.
    pub fn process(&self, live: &FrameBuffer, hand: Option<&RawHand>, now: f64) -> Result<FrameOutput, Error> {
        let set = hand.map(|h| LandmarkSet::from_normalized(h, live.width, live.height));
        self.process_landmarks(live, set.as_ref(), now)
    }

    /// One frame with a hand already in pixel space.
    pub fn process_landmarks(
        &self,
        live: &FrameBuffer,
        hand: Option<&LandmarkSet>,
        now: f64,
    ) -> Result<FrameOutput, Error> {
        let started = Instant::now();
        let gesture = classify_hand(hand);

        let (step, mut frame): (Step, FrameBuffer) = {
            let mut session = self.lock();
            if session.canvas.width() != live.width || session.canvas.height() != live.height {
                info!("New canvas {}x{} to match the camera", live.width, live.height);
                session.canvas = Canvas::new(live.width, live.height);
            }
            let step = session.controller.step(gesture, now);
            for op in &step.ops {
                session.canvas.apply(op);
            }
            let frame = session.canvas.composite(live)?;
            (step, frame)
        };

        // Decorations go on the output only; the canvas never sees them.
        if let Some(set) = hand {
            draw_skeleton(&mut frame, set);
        }
        draw_cursor(&mut frame, &step.cursor);
        draw_hud(&mut frame, &step.status);

        debug!("Frame processed in {:.2}ms", started.elapsed().as_secs_f64() * 1000.0);
        Ok(FrameOutput { frame, status: step.status })
    }

    /// External command: select a color by its exact palette name.
    pub fn set_color(&self, name: &str) -> Result<Status, Error> {
        let Some(i) = palette::index_of(name) else {
            warn!("Invalid color requested: {name}");
            return Err(Error::UnknownColor(name.to_string()));
        };
        let mut session = self.lock();
        session.controller.set_color_index(i);
        info!("Color set to {name}");
        Ok(session.controller.status())
    }

    /// External command: set the brush size (clamped to the allowed range).
    pub fn set_brush_size(&self, size: u32) -> Status {
        let mut session = self.lock();
        session.controller.set_brush_size(size);
        session.controller.status()
    }

    /// External command: wipe the drawing back to blank.
    pub fn clear_canvas(&self) {
        self.lock().canvas.clear();
        info!("Canvas cleared");
    }

    /// Current status without advancing a frame.
    pub fn status(&self) -> Status {
        self.lock().controller.status()
    }

    pub fn session_state(&self) -> SessionState {
        self.lock().controller.state().clone()
    }

    /// Copy of the raw canvas (strokes on white, no camera, no HUD).
    pub fn canvas_snapshot(&self) -> FrameBuffer {
        self.lock().canvas.pixels().clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{BLACK, WHITE};

    #[test]
    fn unknown_color_leaves_state_alone() {
        let studio = Studio::new(64, 48, SessionState::default());
        let before = studio.session_state();
        assert!(matches!(studio.set_color("Purple"), Err(Error::UnknownColor(n)) if n == "Purple"));
        assert_eq!(studio.session_state(), before);
        assert_eq!(studio.set_color("Blue").unwrap().color, "Blue");
    }

    #[test]
    fn brush_command_clamps() {
        let studio = Studio::new(64, 48, SessionState::default());
        assert_eq!(studio.set_brush_size(0).brush_size, 1);
        assert_eq!(studio.set_brush_size(99).brush_size, 50);
    }

    #[test]
    fn canvas_follows_frame_size() {
        let studio = Studio::new(64, 48, SessionState::default());
        let live = FrameBuffer::filled(640, 480, BLACK);
        let out = studio.process_landmarks(&live, None, 0.0).unwrap();
        assert_eq!((out.frame.width, out.frame.height), (640, 480));
        let canvas = studio.canvas_snapshot();
        assert_eq!((canvas.width, canvas.height), (640, 480));
        assert!(canvas.pixels.iter().all(|&p| p == WHITE));
        assert_eq!(out.status.gesture, "Ready");
    }
}
