// Core types shared by the pipeline, canvas and overlay.

#[derive(Clone, Debug, PartialEq)]
pub struct FrameBuffer {
    pub width: usize,      // how wide the frame is on screen (pixels)
    pub height: usize,     // how tall the frame is on screen (pixels)
    pub pixels: Vec<u32>,  // each entry is 0x00RRGGBB for minifb
}

impl FrameBuffer {
    /// A frame filled with one color.
    pub fn filled(width: usize, height: usize, color: u32) -> Self {
        Self { width, height, pixels: vec![color; width * height] }
    }

    /// Pixel at (x,y), or None when outside the frame.
    #[inline]
    pub fn get(&self, x: i32, y: i32) -> Option<u32> {
        if x < 0 || y < 0 {
            return None;
        }
        let (x, y) = (x as usize, y as usize);
        if x >= self.width || y >= self.height {
            return None;
        }
        Some(self.pixels[y * self.width + x])
    }

    pub fn same_size(&self, other: &FrameBuffer) -> bool {
        self.width == other.width && self.height == other.height
    }
}

/// Binary compositing mask; `true` = canvas shows through, `false` = live frame.
/// Visual: unseen directly; it decides which pixels come from the drawing.
pub struct Mask {
    pub width: usize,
    pub height: usize,
    pub foreground: Vec<bool>, // length = width * height
}

/// Integer pixel coordinate (x grows right, y grows down).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Euclidean distance, truncated toward zero.
    pub fn distance(self, other: Point) -> u32 {
        let dx = (self.x as i64 - other.x as i64) as f64;
        let dy = (self.y as i64 - other.y as i64) as f64;
        (dx * dx + dy * dy).sqrt() as u32
    }
}

#[inline]
pub const fn rgb(r: u8, g: u8, b: u8) -> u32 {
    ((r as u32) << 16) | ((g as u32) << 8) | (b as u32)
}

#[inline]
pub const fn unpack(px: u32) -> (u8, u8, u8) {
    (((px >> 16) & 0xFF) as u8, ((px >> 8) & 0xFF) as u8, (px & 0xFF) as u8)
}

/// Grayscale value of a pixel (ITU-R 601 weights, rounded to nearest, 0..=255).
#[inline]
pub fn luminance(px: u32) -> u8 {
    let (r, g, b) = unpack(px);
    ((299 * r as u32 + 587 * g as u32 + 114 * b as u32 + 500) / 1000) as u8
}

pub const WHITE: u32 = rgb(255, 255, 255);
pub const BLACK: u32 = rgb(0, 0, 0);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn distance_truncates() {
        // sqrt(2) = 1.41.. -> 1, sqrt(8) = 2.83.. -> 2
        assert_eq!(Point::new(0, 0).distance(Point::new(1, 1)), 1);
        assert_eq!(Point::new(0, 0).distance(Point::new(2, 2)), 2);
        assert_eq!(Point::new(3, 4).distance(Point::new(0, 0)), 5);
        assert_eq!(Point::new(7, 7).distance(Point::new(7, 7)), 0);
    }

    #[test]
    fn luminance_extremes() {
        assert_eq!(luminance(WHITE), 255);
        assert_eq!(luminance(BLACK), 0);
        assert!(luminance(rgb(255, 255, 0)) < 250);
    }

    #[test]
    fn luminance_rounds_to_nearest() {
        // 249.886 and 249.114
        assert_eq!(luminance(rgb(250, 250, 249)), 250);
        assert_eq!(luminance(rgb(249, 249, 250)), 249);
    }

    #[test]
    fn get_is_bounds_checked() {
        let fb = FrameBuffer::filled(4, 3, WHITE);
        assert_eq!(fb.get(3, 2), Some(WHITE));
        assert_eq!(fb.get(4, 0), None);
        assert_eq!(fb.get(-1, 0), None);
    }
}
