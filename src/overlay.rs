// Per-frame decorations on the composited output (never on the canvas).
// Visual: palette squares top-left, active one boxed in white, status text
// top-right, the hand skeleton, and a gesture-specific cursor at the fingertip.

use crate::controller::{Cursor, Status};
use crate::draw::{draw_line, draw_rect, draw_ring, draw_text_5x7, fill_disc, fill_rect, text_width};
use crate::landmarks::{HAND_CONNECTIONS, LandmarkSet};
use crate::palette::{self, PALETTE};
use crate::types::{BLACK, FrameBuffer, WHITE, rgb};

const YELLOW: u32 = rgb(255, 255, 0);
const CYAN: u32 = rgb(0, 255, 255);
const SKELETON_LINE: u32 = rgb(255, 255, 255);
const SKELETON_JOINT: u32 = rgb(255, 0, 0);

/// Swatches, active highlight and the "<color> | Size: n" readout.
pub fn draw_hud(fb: &mut FrameBuffer, status: &Status) {
    for (i, swatch) in PALETTE.iter().enumerate() {
        let (tl, br) = palette::swatch_rect(i);
        fill_rect(fb, tl.x, tl.y, br.x, br.y, swatch.color);
        draw_rect(fb, tl.x, tl.y, br.x, br.y, 1, BLACK);
        if i == status.color_index {
            draw_rect(fb, tl.x - 3, tl.y - 3, br.x + 3, br.y + 3, 3, WHITE);
        }
    }

    let info = format!("{} | Size: {}", status.color, status.brush_size);
    let x = (fb.width as i32 - 250).max(0);
    draw_text_5x7(fb, x, 24, &info, palette::color(status.color_index), 2);
    draw_text_5x7(fb, x, 46, &status.gesture, WHITE, 2);
}

/// Fingertip preview for the current gesture.
pub fn draw_cursor(fb: &mut FrameBuffer, cursor: &Cursor) {
    match *cursor {
        Cursor::None => {}
        Cursor::Brush { at, radius, color } => fill_disc(fb, at.x, at.y, radius as i32, color),
        Cursor::Hover { at, radius } => {
            draw_ring(fb, at.x, at.y, radius as i32, 2, WHITE);
            draw_text_5x7(fb, at.x + 20, at.y, "HOVER", WHITE, 2);
        }
        Cursor::Eraser { at, radius } => {
            draw_ring(fb, at.x, at.y, radius as i32, 2, YELLOW);
            draw_text_5x7(fb, at.x + 20, at.y, "ERASE", YELLOW, 2);
        }
        Cursor::Size { at, radius, color } => {
            draw_ring(fb, at.x, at.y, radius as i32, 2, color);
            draw_text_5x7(fb, at.x + 20, at.y, &format!("SIZE: {radius}"), CYAN, 2);
        }
        Cursor::NextColor { at, name } => {
            let text = format!("NEXT: {name}");
            // keep the hint on screen when the fist is near the right edge
            let x = (at.x + 20).min(fb.width as i32 - text_width(&text, 2));
            draw_text_5x7(fb, x, at.y, &text, YELLOW, 2);
        }
    }
}

/// Bones and joints of the detected hand.
pub fn draw_skeleton(fb: &mut FrameBuffer, hand: &LandmarkSet) {
    let p = &hand.points;
    for &(a, b) in HAND_CONNECTIONS.iter() {
        if let (Some(pa), Some(pb)) = (p.get(a), p.get(b)) {
            draw_line(fb, pa.x, pa.y, pb.x, pb.y, SKELETON_LINE);
        }
    }
    for pt in p {
        fill_disc(fb, pt.x, pt.y, 2, SKELETON_JOINT);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Point;

    fn status(color_index: usize) -> Status {
        Status {
            gesture: "Ready".into(),
            color: palette::name(color_index).into(),
            color_index,
            brush_size: 5,
            drawing: false,
        }
    }

    #[test]
    fn hud_paints_swatches_and_highlight() {
        let mut fb = FrameBuffer::filled(640, 480, BLACK);
        draw_hud(&mut fb, &status(1));
        assert_eq!(fb.get(45, 45), Some(PALETTE[0].color));
        assert_eq!(fb.get(105, 45), Some(PALETTE[1].color));
        // highlight sits just outside swatch 1 only
        assert_eq!(fb.get(77, 45), Some(WHITE));
        assert_eq!(fb.get(75, 45), Some(WHITE));
        assert_eq!(fb.get(18, 45), Some(BLACK));
    }

    #[test]
    fn cursor_variants_draw_near_the_tip() {
        let at = Point::new(320, 240);
        for cursor in [
            Cursor::Brush { at, radius: 5, color: YELLOW },
            Cursor::Hover { at, radius: 5 },
            Cursor::Eraser { at, radius: 30 },
            Cursor::Size { at, radius: 12, color: YELLOW },
            Cursor::NextColor { at: Point::new(630, 240), name: "Orange" },
        ] {
            let mut fb = FrameBuffer::filled(640, 480, BLACK);
            draw_cursor(&mut fb, &cursor);
            assert!(fb.pixels.iter().any(|&p| p != BLACK), "{cursor:?} drew nothing");
        }
        let mut fb = FrameBuffer::filled(64, 48, BLACK);
        draw_cursor(&mut fb, &Cursor::None);
        assert!(fb.pixels.iter().all(|&p| p == BLACK));
    }
}
