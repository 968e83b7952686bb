// Window + software drawing utilities.
// Visual effects provided here:
// 1) A window that shows the composited camera + drawing.
// 2) Pixel-level primitives: lines, thick strokes, discs, rings, rectangles.
// 3) A tiny 5x7 bitmap font to render HUD text on top of the video.

use crate::error::Error;
use crate::types::{BLACK, FrameBuffer};
use minifb::{Key, KeyRepeat, Window, WindowOptions};

pub struct Drawer {
    window: Window, // the on-screen window you see
}

impl Drawer {
    /// Create a window sized to the camera feed.
    /// Visual: a new empty window appears with your chosen title.
    pub fn new(title: &str, width: usize, height: usize) -> Result<Self, Error> {
        let window = Window::new(title, width, height, WindowOptions::default())
            .map_err(|e| Error::WindowInit(e.to_string()))?;
        Ok(Self { window })
    }

    /// Push the pixels for this frame to the screen.
    /// Visual: the window immediately displays the new image.
    pub fn present(&mut self, framebuffer: &FrameBuffer) -> Result<(), Error> {
        self.window
            .update_with_buffer(&framebuffer.pixels, framebuffer.width, framebuffer.height)
            .map_err(|e| Error::WindowUpdate(e.to_string()))?;
        Ok(())
    }

    /// Pump window events without a new image (keeps keys responsive between frames).
    pub fn poll(&mut self) {
        self.window.update();
    }

    /// Returns false when the user closes the window (so we can stop the loop).
    pub fn is_open(&self) -> bool {
        self.window.is_open()
    }

    /// ESC or Q held: leave the main loop.
    pub fn quit_pressed(&self) -> bool {
        self.window.is_key_down(Key::Escape) || self.window.is_key_down(Key::Q)
    }

    /// Visual: when pressed, the drawing disappears and only live video remains.
    pub fn c_pressed_once(&self) -> bool {
        self.window.is_key_pressed(Key::C, KeyRepeat::No)
    }

    /// Number keys 1..6 pick a palette slot (returned 0-based).
    pub fn digit_pressed_once(&self) -> Option<usize> {
        const DIGITS: [Key; 6] = [Key::Key1, Key::Key2, Key::Key3, Key::Key4, Key::Key5, Key::Key6];
        DIGITS
            .iter()
            .position(|&k| self.window.is_key_pressed(k, KeyRepeat::No))
    }

    /// +1 / -1 for brush size from the +/- keys (repeat allowed while held).
    pub fn brush_delta(&self) -> i32 {
        let up = self.window.is_key_pressed(Key::Equal, KeyRepeat::Yes)
            || self.window.is_key_pressed(Key::NumPadPlus, KeyRepeat::Yes);
        let down = self.window.is_key_pressed(Key::Minus, KeyRepeat::Yes)
            || self.window.is_key_pressed(Key::NumPadMinus, KeyRepeat::Yes);
        up as i32 - down as i32
    }
}

/* ---------- Software drawing: pixels, lines, discs, rectangles ---------- */

/// Put a pixel on the framebuffer if (x,y) is inside bounds.
/// Visual: the exact pixel at (x,y) changes color.
#[inline]
pub fn put_pixel(fb: &mut FrameBuffer, x: i32, y: i32, color: u32) {
    if x < 0 || y < 0 {
        return;
    }
    let (x, y) = (x as usize, y as usize);
    if x >= fb.width || y >= fb.height {
        return;
    }
    let idx = y * fb.width + x;
    fb.pixels[idx] = color;
}

/// Walk the Bresenham points from (x0,y0) to (x1,y1), both ends included.
fn bresenham(x0: i32, y0: i32, x1: i32, y1: i32, mut plot: impl FnMut(i32, i32)) {
    let (mut x0, mut y0) = (x0, y0);
    let dx = (x1 - x0).abs();
    let sx = if x0 < x1 { 1 } else { -1 };
    let dy = -(y1 - y0).abs();
    let sy = if y0 < y1 { 1 } else { -1 };
    let mut err = dx + dy;
    loop {
        plot(x0, y0);
        if x0 == x1 && y0 == y1 { break; }
        let e2 = 2 * err;
        if e2 >= dy { err += dy; x0 += sx; }
        if e2 <= dx { err += dx; y0 += sy; }
    }
}

/// Clip a segment to the frame grown by `pad` on every side (Liang-Barsky).
/// None when it misses; an untouched segment comes back unchanged.
fn clip_line(fb: &FrameBuffer, x0: i32, y0: i32, x1: i32, y1: i32, pad: i32) -> Option<(i32, i32, i32, i32)> {
    let pad = pad.max(0) as f64;
    let (lo_x, lo_y) = (-pad, -pad);
    let (hi_x, hi_y) = (fb.width as f64 - 1.0 + pad, fb.height as f64 - 1.0 + pad);
    let (fx, fy) = (x0 as f64, y0 as f64);
    let (dx, dy) = (x1 as f64 - fx, y1 as f64 - fy);
    let (mut t0, mut t1) = (0.0f64, 1.0f64);
    for (p, q) in [(-dx, fx - lo_x), (dx, hi_x - fx), (-dy, fy - lo_y), (dy, hi_y - fy)] {
        if p == 0.0 {
            if q < 0.0 { return None; }
            continue;
        }
        let r = q / p;
        if p < 0.0 {
            if r > t1 { return None; }
            t0 = t0.max(r);
        } else {
            if r < t0 { return None; }
            t1 = t1.min(r);
        }
    }
    let at = |t: f64| ((fx + t * dx).round() as i32, (fy + t * dy).round() as i32);
    let ((ax, ay), (bx, by)) = (at(t0), at(t1));
    Some((ax, ay, bx, by))
}

/// True when a square of half-size `radius` around (cx,cy) can't touch the frame.
fn misses_frame(fb: &FrameBuffer, cx: i32, cy: i32, radius: i32) -> bool {
    let (cx, cy, r) = (cx as i64, cy as i64, radius.max(0) as i64);
    cx + r < 0 || cy + r < 0 || cx - r >= fb.width as i64 || cy - r >= fb.height as i64
}

/// Draw a thin line between (x0,y0) and (x1,y1).
/// Visual: a straight 1-pixel line; only the part over the frame is walked.
pub fn draw_line(fb: &mut FrameBuffer, x0: i32, y0: i32, x1: i32, y1: i32, color: u32) {
    if let Some((x0, y0, x1, y1)) = clip_line(fb, x0, y0, x1, y1, 0) {
        bresenham(x0, y0, x1, y1, |x, y| put_pixel(fb, x, y, color));
    }
}

/// Filled disc of `radius` centered at (cx,cy); radius 0 is one pixel.
/// Visual: a solid round dot (brush tip, eraser footprint).
pub fn fill_disc(fb: &mut FrameBuffer, cx: i32, cy: i32, radius: i32, color: u32) {
    if radius < 0 || misses_frame(fb, cx, cy, radius) { return; }
    let r2 = radius * radius;
    for dy in -radius..=radius {
        for dx in -radius..=radius {
            if dx * dx + dy * dy <= r2 {
                put_pixel(fb, cx + dx, cy + dy, color);
            }
        }
    }
}

/// Line with round caps: a disc of `radius` stamped at every Bresenham step.
/// Visual: a smooth brush stroke, `2*radius+1` pixels wide.
pub fn thick_line(fb: &mut FrameBuffer, x0: i32, y0: i32, x1: i32, y1: i32, radius: i32, color: u32) {
    if radius <= 0 {
        draw_line(fb, x0, y0, x1, y1, color);
        return;
    }
    if let Some((x0, y0, x1, y1)) = clip_line(fb, x0, y0, x1, y1, radius) {
        bresenham(x0, y0, x1, y1, |x, y| fill_disc(fb, x, y, radius, color));
    }
}

/// Circle outline `thickness` pixels wide, drawn inward from `radius`.
/// Visual: a ring around the fingertip (hover, eraser, size preview).
pub fn draw_ring(fb: &mut FrameBuffer, cx: i32, cy: i32, radius: i32, thickness: i32, color: u32) {
    if misses_frame(fb, cx, cy, radius) { return; }
    let outer = radius * radius;
    let inner_r = (radius - thickness).max(0);
    let inner = inner_r * inner_r;
    for dy in -radius..=radius {
        for dx in -radius..=radius {
            let d2 = dx * dx + dy * dy;
            if d2 <= outer && (d2 > inner || inner_r == 0) {
                put_pixel(fb, cx + dx, cy + dy, color);
            }
        }
    }
}

/// Solid rectangle between two inclusive corners.
pub fn fill_rect(fb: &mut FrameBuffer, x0: i32, y0: i32, x1: i32, y1: i32, color: u32) {
    let (max_x, max_y) = (fb.width as i32 - 1, fb.height as i32 - 1);
    for y in y0.min(y1).max(0)..=y0.max(y1).min(max_y) {
        for x in x0.min(x1).max(0)..=x0.max(x1).min(max_x) {
            put_pixel(fb, x, y, color);
        }
    }
}

/// Rectangle border growing outward by `thickness` pixels from the given corners.
pub fn draw_rect(fb: &mut FrameBuffer, x0: i32, y0: i32, x1: i32, y1: i32, thickness: i32, color: u32) {
    for t in 0..thickness.max(1) {
        let (l, r, top, bot) = (x0 - t, x1 + t, y0 - t, y1 + t);
        draw_line(fb, l, top, r, top, color);
        draw_line(fb, l, bot, r, bot, color);
        draw_line(fb, l, top, l, bot, color);
        draw_line(fb, r, top, r, bot, color);
    }
}

/* ---------- 5x7 bitmap font (uppercase, digits, a little punctuation) ---------- */

/// Return a 5x7 glyph bitmap. Lowercase is folded to uppercase by the caller.
/// Each u8 is a row; the low 5 bits are the pixels (bit 4 = leftmost).
fn glyph5x7(ch: char) -> Option<[u8; 7]> {
    // Helper macro to define a glyph quickly
    macro_rules! g { ($a:expr,$b:expr,$c:expr,$d:expr,$e:expr,$f:expr,$g:expr) => {
        Some([$a,$b,$c,$d,$e,$f,$g])
    }; }

    match ch {
        // Digits 0..9
        '0' => g!(0b01110,0b10001,0b10011,0b10101,0b11001,0b10001,0b01110),
        '1' => g!(0b00100,0b01100,0b00100,0b00100,0b00100,0b00100,0b01110),
        '2' => g!(0b01110,0b10001,0b00001,0b00010,0b00100,0b01000,0b11111),
        '3' => g!(0b11110,0b00001,0b00001,0b01110,0b00001,0b00001,0b11110),
        '4' => g!(0b00010,0b00110,0b01010,0b10010,0b11111,0b00010,0b00010),
        '5' => g!(0b11111,0b10000,0b11110,0b00001,0b00001,0b10001,0b01110),
        '6' => g!(0b00110,0b01000,0b10000,0b11110,0b10001,0b10001,0b01110),
        '7' => g!(0b11111,0b00001,0b00010,0b00100,0b01000,0b01000,0b01000),
        '8' => g!(0b01110,0b10001,0b10001,0b01110,0b10001,0b10001,0b01110),
        '9' => g!(0b01110,0b10001,0b10001,0b01111,0b00001,0b00010,0b01100),

        // Letters A..Z
        'A' => g!(0b01110,0b10001,0b10001,0b11111,0b10001,0b10001,0b10001),
        'B' => g!(0b11110,0b10001,0b10001,0b11110,0b10001,0b10001,0b11110),
        'C' => g!(0b01110,0b10001,0b10000,0b10000,0b10000,0b10001,0b01110),
        'D' => g!(0b11100,0b10010,0b10001,0b10001,0b10001,0b10010,0b11100),
        'E' => g!(0b11111,0b10000,0b10000,0b11110,0b10000,0b10000,0b11111),
        'F' => g!(0b11111,0b10000,0b10000,0b11110,0b10000,0b10000,0b10000),
        'G' => g!(0b01110,0b10001,0b10000,0b10111,0b10001,0b10001,0b01111),
        'H' => g!(0b10001,0b10001,0b10001,0b11111,0b10001,0b10001,0b10001),
        'I' => g!(0b01110,0b00100,0b00100,0b00100,0b00100,0b00100,0b01110),
        'J' => g!(0b00111,0b00010,0b00010,0b00010,0b00010,0b10010,0b01100),
        'K' => g!(0b10001,0b10010,0b10100,0b11000,0b10100,0b10010,0b10001),
        'L' => g!(0b10000,0b10000,0b10000,0b10000,0b10000,0b10000,0b11111),
        'M' => g!(0b10001,0b11011,0b10101,0b10101,0b10001,0b10001,0b10001),
        'N' => g!(0b10001,0b10001,0b11001,0b10101,0b10011,0b10001,0b10001),
        'O' => g!(0b01110,0b10001,0b10001,0b10001,0b10001,0b10001,0b01110),
        'P' => g!(0b11110,0b10001,0b10001,0b11110,0b10000,0b10000,0b10000),
        'Q' => g!(0b01110,0b10001,0b10001,0b10001,0b10101,0b10010,0b01101),
        'R' => g!(0b11110,0b10001,0b10001,0b11110,0b10100,0b10010,0b10001),
        'S' => g!(0b01111,0b10000,0b10000,0b01110,0b00001,0b00001,0b11110),
        'T' => g!(0b11111,0b00100,0b00100,0b00100,0b00100,0b00100,0b00100),
        'U' => g!(0b10001,0b10001,0b10001,0b10001,0b10001,0b10001,0b01110),
        'V' => g!(0b10001,0b10001,0b10001,0b10001,0b10001,0b01010,0b00100),
        'W' => g!(0b10001,0b10001,0b10001,0b10101,0b10101,0b10101,0b01010),
        'X' => g!(0b10001,0b10001,0b01010,0b00100,0b01010,0b10001,0b10001),
        'Y' => g!(0b10001,0b10001,0b01010,0b00100,0b00100,0b00100,0b00100),
        'Z' => g!(0b11111,0b00001,0b00010,0b00100,0b01000,0b10000,0b11111),

        // Punctuation: space, vertical bar, colon, dot, minus, plus
        ' ' => g!(0b00000,0b00000,0b00000,0b00000,0b00000,0b00000,0b00000),
        '|' => g!(0b00100,0b00100,0b00100,0b00100,0b00100,0b00100,0b00100),
        ':' => g!(0b00000,0b00100,0b00000,0b00000,0b00100,0b00000,0b00000),
        '.' => g!(0b00000,0b00000,0b00000,0b00000,0b00000,0b00100,0b00000),
        '-' => g!(0b00000,0b00000,0b00000,0b11111,0b00000,0b00000,0b00000),
        '+' => g!(0b00000,0b00100,0b00100,0b11111,0b00100,0b00100,0b00000),

        _ => None,
    }
}

/// Draw a single 5x7 character at (x,y), each font pixel `scale` screen pixels.
/// Visual: a glyph with a 1-pixel black shadow for contrast.
fn draw_char_5x7(fb: &mut FrameBuffer, x: i32, y: i32, ch: char, color: u32, scale: i32) {
    let Some(rows) = glyph5x7(ch.to_ascii_uppercase()) else { return };
    // Shadow pass first, then the glyph in its color on top
    for (offset, c) in [(1, BLACK), (0, color)] {
        for (ry, rowbits) in rows.iter().enumerate() {
            for rx in 0..5 {
                if (rowbits & (1 << (4 - rx))) != 0 {
                    let px = x + rx * scale + offset;
                    let py = y + ry as i32 * scale + offset;
                    fill_rect(fb, px, py, px + scale - 1, py + scale - 1, c);
                }
            }
        }
    }
}

/// Draw a text string using 5x7 glyphs.
/// Visual: a compact HUD string; each glyph is 5x7 with 1-pixel spacing (times `scale`).
pub fn draw_text_5x7(fb: &mut FrameBuffer, mut x: i32, y: i32, text: &str, color: u32, scale: i32) {
    let scale = scale.max(1);
    for ch in text.chars() {
        draw_char_5x7(fb, x, y, ch, color, scale);
        x += 6 * scale; // 5 pixels glyph width + 1 pixel spacing
    }
}

/// Width in pixels of `text` as drawn by [`draw_text_5x7`].
pub fn text_width(text: &str, scale: i32) -> i32 {
    text.chars().count() as i32 * 6 * scale.max(1)
}
