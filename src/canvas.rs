// The persistent drawing and how it is merged with the live camera.
// Visual expectation: strokes sit on top of the video; everywhere the canvas
// is still (near) white you see the raw camera image.

use crate::controller::CanvasOp;
use crate::draw::{fill_disc, thick_line};
use crate::error::Error;
use crate::types::{FrameBuffer, Mask, WHITE, luminance};

/// Canvas pixels at or above this luminance count as untouched background.
pub const BLANK_THRESHOLD: u8 = 250;

pub struct Canvas {
    buf: FrameBuffer, // never holds camera pixels, only strokes on white
}

impl Canvas {
    /// A fresh all-white canvas the size of the camera frame.
    pub fn new(width: usize, height: usize) -> Self {
        Self { buf: FrameBuffer::filled(width, height, WHITE) }
    }

    pub fn width(&self) -> usize {
        self.buf.width
    }

    pub fn height(&self) -> usize {
        self.buf.height
    }

    pub fn pixels(&self) -> &FrameBuffer {
        &self.buf
    }

    /// Back to all-white.
    pub fn clear(&mut self) {
        self.buf.pixels.fill(WHITE);
    }

    /// Apply one edit from the controller.
    pub fn apply(&mut self, op: &CanvasOp) {
        match *op {
            CanvasOp::Line { from, to, color, size } => {
                thick_line(&mut self.buf, from.x, from.y, to.x, to.y, (size / 2) as i32, color);
            }
            CanvasOp::Erase { center, radius, color } => {
                fill_disc(&mut self.buf, center.x, center.y, radius as i32, color);
            }
        }
    }

    /// Which pixels carry drawing (luminance below the blank threshold).
    pub fn mask(&self) -> Mask {
        Mask {
            width: self.buf.width,
            height: self.buf.height,
            foreground: self.buf.pixels.iter().map(|&px| luminance(px) < BLANK_THRESHOLD).collect(),
        }
    }

    /// Live frame where the canvas is blank, canvas pixel elsewhere.
    pub fn composite(&self, live: &FrameBuffer) -> Result<FrameBuffer, Error> {
        if !live.same_size(&self.buf) {
            return Err(Error::CameraFrame(format!(
                "composite: live {}x{} vs canvas {}x{}",
                live.width, live.height, self.buf.width, self.buf.height
            )));
        }
        let mask = self.mask();
        let pixels = live
            .pixels
            .iter()
            .zip(&self.buf.pixels)
            .zip(&mask.foreground)
            .map(|((&cam, &ink), &fg)| if fg { ink } else { cam })
            .collect();
        Ok(FrameBuffer { width: live.width, height: live.height, pixels })
    }
}
