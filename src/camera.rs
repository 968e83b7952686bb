// Opens the camera and converts frames into a buffer suitable for the window.
// Visual expectation: each `next_frame()` gives a mirrored (selfie view)
// 0x00RRGGBB image at the working resolution, ready for tracking and drawing.

use crate::error::Error;
use crate::types::FrameBuffer;

use log::info;

// Bring in nokhwa types for camera control.
use nokhwa::{
    Camera,
    pixel_format::RgbFormat,
    utils::{
        CameraFormat, CameraIndex, FrameFormat, RequestedFormat, RequestedFormatType, Resolution,
    },
};

// `image` does the RGB decode target type, flipping and resizing.
use image::{ImageBuffer, Rgb, RgbImage, imageops};

/// Anything that hands out live frames. The stream loop only sees this.
/// Not `Send`: camera handles are opened on the thread that reads them.
pub trait FrameSource {
    fn next_frame(&mut self) -> Result<FrameBuffer, Error>;
    fn resolution(&self) -> (u32, u32);
}

// A small wrapper around nokhwa::Camera so the stream loop stays clean.
pub struct CameraCapture {
    cam: Camera,
    width: u32,  // working size handed to the pipeline
    height: u32,
    mirror: bool,
}

impl CameraCapture {
    /// Open camera `index` near the requested resolution.
    /// Frames that come back at another size are resized to `width`x`height`,
    /// so swatch positions stay where the palette expects them.
    pub fn new(index: u32, width: u32, height: u32, mirror: bool) -> Result<Self, Error> {
        let idx = CameraIndex::Index(index);

        let fmt = CameraFormat::new(
            Resolution::new(width, height),
            FrameFormat::YUYV, // uncompressed; cheap to convert to RGB
            30,                // target FPS
        );

        // Ask for RGB frames, closest to our requested format.
        let req = RequestedFormat::new::<RgbFormat>(RequestedFormatType::Closest(fmt));

        let mut cam = Camera::new(idx, req)
            .map_err(|e| Error::CameraInit(format!("Create camera: {e}")))?;

        cam.open_stream()
            .map_err(|e| Error::CameraInit(format!("Open stream: {e}")))?;

        let actual = cam.resolution();
        info!(
            "Camera {index} streaming at {}x{} (working size {width}x{height}, mirror={mirror})",
            actual.width(),
            actual.height()
        );

        Ok(Self { cam, width, height, mirror })
    }
}

impl FrameSource for CameraCapture {
    /// Grab one frame (blocks until the device has one).
    fn next_frame(&mut self) -> Result<FrameBuffer, Error> {
        let frame = self
            .cam
            .frame()
            .map_err(|e| Error::CameraFrame(format!("Fetch frame: {e}")))?;

        let rgb_img: ImageBuffer<Rgb<u8>, Vec<u8>> = frame
            .decode_image::<RgbFormat>()
            .map_err(|e| Error::CameraFrame(format!("Decode RGB: {e}")))?;

        Ok(prepare_frame(rgb_img, self.width, self.height, self.mirror))
    }

    fn resolution(&self) -> (u32, u32) {
        (self.width, self.height)
    }
}

/// Resize to the working size if needed, mirror, and pack as 0x00RRGGBB.
pub fn prepare_frame(mut img: RgbImage, width: u32, height: u32, mirror: bool) -> FrameBuffer {
    if img.dimensions() != (width, height) {
        img = imageops::resize(&img, width, height, imageops::FilterType::Triangle);
    }
    if mirror {
        imageops::flip_horizontal_in_place(&mut img);
    }
    let pixels = img
        .pixels()
        .map(|p| ((p[0] as u32) << 16) | ((p[1] as u32) << 8) | p[2] as u32)
        .collect();
    FrameBuffer { width: width as usize, height: height as usize, pixels }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::rgb;

    #[test]
    fn mirrors_left_to_right() {
        let mut img = RgbImage::new(3, 1);
        img.put_pixel(0, 0, Rgb([255, 0, 0]));
        img.put_pixel(2, 0, Rgb([0, 0, 255]));
        let fb = prepare_frame(img, 3, 1, true);
        assert_eq!(fb.get(0, 0), Some(rgb(0, 0, 255)));
        assert_eq!(fb.get(2, 0), Some(rgb(255, 0, 0)));
    }

    #[test]
    fn resizes_to_working_size() {
        let img = RgbImage::from_pixel(1280, 720, Rgb([10, 20, 30]));
        let fb = prepare_frame(img, 640, 480, false);
        assert_eq!((fb.width, fb.height), (640, 480));
        assert_eq!(fb.pixels.len(), 640 * 480);
        assert_eq!(fb.get(320, 240), Some(rgb(10, 20, 30)));
    }
}
