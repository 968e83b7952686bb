// The fixed color palette and its on-screen swatches.
// Visual: six filled squares along the top-left of the output; touching one
// with the index finger selects that color.

use crate::types::{Point, rgb};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Swatch {
    pub color: u32, // 0x00RRGGBB
    pub name: &'static str,
}

pub const PALETTE: [Swatch; 6] = [
    Swatch { color: rgb(255, 0, 0), name: "Red" },
    Swatch { color: rgb(0, 255, 0), name: "Green" },
    Swatch { color: rgb(0, 0, 255), name: "Blue" },
    Swatch { color: rgb(0, 0, 0), name: "Black" },
    Swatch { color: rgb(255, 255, 0), name: "Yellow" },
    Swatch { color: rgb(255, 165, 0), name: "Orange" },
];

// Swatch band geometry (pixels from the frame's top-left).
pub const SWATCH_LEFT: i32 = 20;
pub const SWATCH_TOP: i32 = 20;
pub const SWATCH_SIZE: i32 = 50;
pub const SWATCH_SPACING: i32 = 60;

/// Top-left and bottom-right corners (inclusive) of swatch `i`.
pub fn swatch_rect(i: usize) -> (Point, Point) {
    let x = SWATCH_LEFT + i as i32 * SWATCH_SPACING;
    (
        Point::new(x, SWATCH_TOP),
        Point::new(x + SWATCH_SIZE, SWATCH_TOP + SWATCH_SIZE),
    )
}

/// Which swatch (if any) the point is touching. Edges count as inside.
pub fn hit_test(p: Point) -> Option<usize> {
    if p.y < SWATCH_TOP || p.y > SWATCH_TOP + SWATCH_SIZE {
        return None;
    }
    (0..PALETTE.len()).find(|&i| {
        let (tl, br) = swatch_rect(i);
        p.x >= tl.x && p.x <= br.x
    })
}

/// Palette index for an exact color name.
pub fn index_of(name: &str) -> Option<usize> {
    PALETTE.iter().position(|s| s.name == name)
}

/// Name of palette entry `i`, wrapping out-of-range indices.
pub fn name(i: usize) -> &'static str {
    PALETTE[i % PALETTE.len()].name
}

pub fn color(i: usize) -> u32 {
    PALETTE[i % PALETTE.len()].color
}
