#![allow(dead_code)]

pub use air_canvas::landmarks::fixtures::{hand, pinch};
use air_canvas::landmarks::{LandmarkSet, RawHand};
use air_canvas::types::{FrameBuffer, Point};

pub const W: usize = 640;
pub const H: usize = 480;

pub const DRAW: [u8; 5] = [0, 1, 0, 0, 0];
pub const HOVER: [u8; 5] = [0, 1, 1, 0, 0];
pub const PALM: [u8; 5] = [1, 1, 1, 1, 1];
pub const PINCH: [u8; 5] = [1, 1, 0, 0, 0];
pub const FIST: [u8; 5] = [0, 0, 0, 0, 0];

/// Same hand in detector coordinates (0..1).
pub fn normalized(set: &LandmarkSet) -> RawHand {
    RawHand {
        points: set.points.iter().map(|p| (p.x as f32 / W as f32, p.y as f32 / H as f32)).collect(),
        score: 1.0,
    }
}

/// A busy "camera" frame with no near-white pixels.
pub fn live_frame() -> FrameBuffer {
    let pixels = (0..W * H)
        .map(|i| {
            let (x, y) = ((i % W) as u32, (i / W) as u32);
            ((x & 0x7F) << 16) | ((y & 0x7F) << 8) | ((x + y) & 0x7F)
        })
        .collect();
    FrameBuffer { width: W, height: H, pixels }
}
