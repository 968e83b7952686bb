// Hand landmarks: normalized detector output -> pixel points -> finger states.
// Visual expectation: nothing drawn here; these numbers decide which gesture
// the overlay shows and where the brush sits (index fingertip).

use crate::types::Point;

/// Hand landmark indices (MediaPipe hand model convention).
pub mod index {
    pub const THUMB_IP: usize = 3;
    pub const THUMB_TIP: usize = 4;
    pub const INDEX_TIP: usize = 8;
    pub const MIDDLE_TIP: usize = 12;
    pub const RING_TIP: usize = 16;
    pub const PINKY_TIP: usize = 20;
}

/// Normalized coordinates are clamped to this band around the frame.
pub const NORMALIZED_MARGIN: (f32, f32) = (-1.0, 2.0);

/// Number of landmarks in a complete hand.
pub const LANDMARK_COUNT: usize = 21;

/// Bone pairs for drawing the hand skeleton.
pub const HAND_CONNECTIONS: [(usize, usize); 21] = [
    (0, 1), (1, 2), (2, 3), (3, 4),         // thumb
    (0, 5), (5, 6), (6, 7), (7, 8),         // index
    (5, 9), (9, 10), (10, 11), (11, 12),    // middle
    (9, 13), (13, 14), (14, 15), (15, 16),  // ring
    (13, 17), (0, 17), (17, 18), (18, 19), (19, 20), // pinky + palm
];

/// One hand as the detector reports it: points normalized to 0..1.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RawHand {
    pub points: Vec<(f32, f32)>,
    pub score: f32,
}

/// One hand in pixel space for a frame of known size.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct LandmarkSet {
    pub points: Vec<Point>,
}

impl LandmarkSet {
    /// Convert normalized coordinates to integer pixels (truncating, like the detector helpers do).
    /// Values are first clamped to [`NORMALIZED_MARGIN`]; NaN lands on its low edge.
    pub fn from_normalized(hand: &RawHand, width: usize, height: usize) -> Self {
        let (w, h) = (width as f32, height as f32);
        let points = hand
            .points
            .iter()
            .map(|&(x, y)| Point::new(to_pixel(x, w), to_pixel(y, h)))
            .collect();
        Self { points }
    }

    /// True when the set has enough points to read every finger.
    pub fn is_complete(&self) -> bool {
        self.points.len() >= LANDMARK_COUNT
    }

    pub fn index_tip(&self) -> Option<Point> {
        self.points.get(index::INDEX_TIP).copied()
    }

    pub fn thumb_tip(&self) -> Option<Point> {
        self.points.get(index::THUMB_TIP).copied()
    }
}

fn to_pixel(v: f32, size: f32) -> i32 {
    let (lo, hi) = NORMALIZED_MARGIN;
    let v = if v.is_nan() { lo } else { v.clamp(lo, hi) };
    (v * size) as i32
}

/// Up/down state of thumb, index, middle, ring, pinky (in that order).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct FingerState(pub [bool; 5]);

impl FingerState {
    pub const ALL_DOWN: FingerState = FingerState([false; 5]);

    /// Build from 0/1 digits; handy for fixtures and pattern tables.
    pub const fn from_bits(bits: [u8; 5]) -> Self {
        FingerState([bits[0] != 0, bits[1] != 0, bits[2] != 0, bits[3] != 0, bits[4] != 0])
    }

    pub fn count_up(&self) -> usize {
        self.0.iter().filter(|&&up| up).count()
    }

    pub fn bits(&self) -> [u8; 5] {
        self.0.map(u8::from)
    }

    /// Read the finger states from a landmark set.
    ///
    /// Thumb: up when its tip is left of the IP joint (right hand in a mirrored
    /// frame; a lateral test, so it only holds for that orientation).
    /// Other fingers: up when the tip is above the joint two indices back.
    /// Fewer than 21 points gives all-down.
    pub fn from_landmarks(set: &LandmarkSet) -> Self {
        if !set.is_complete() {
            return Self::ALL_DOWN;
        }
        let p = &set.points;
        let mut up = [false; 5];
        up[0] = p[index::THUMB_TIP].x < p[index::THUMB_IP].x;
        for (slot, tip) in [index::INDEX_TIP, index::MIDDLE_TIP, index::RING_TIP, index::PINKY_TIP]
            .into_iter()
            .enumerate()
        {
            up[slot + 1] = p[tip].y < p[tip - 2].y;
        }
        FingerState(up)
    }
}

/// Synthetic hands for tests in this crate and in `tests/`.
#[doc(hidden)]
pub mod fixtures {
    use super::*;

    /// A synthetic right hand (mirrored view) with the index tip at `tip` and
    /// each finger raised or curled according to `bits`.
    pub fn hand(bits: [u8; 5], tip: Point) -> LandmarkSet {
        let mut points = vec![Point::new(tip.x, tip.y + 120); LANDMARK_COUNT];

        // thumb: IP joint at x, tip moves left when up
        let thumb_base = Point::new(tip.x - 40, tip.y + 60);
        points[index::THUMB_IP] = thumb_base;
        points[index::THUMB_TIP] = if bits[0] != 0 {
            Point::new(thumb_base.x - 15, thumb_base.y - 10)
        } else {
            Point::new(thumb_base.x + 15, thumb_base.y)
        };

        for (finger, tip_idx) in [index::INDEX_TIP, index::MIDDLE_TIP, index::RING_TIP, index::PINKY_TIP]
            .into_iter()
            .enumerate()
        {
            let x = tip.x + 15 * finger as i32;
            let pip = Point::new(x, tip.y + 40);
            points[tip_idx - 3] = Point::new(x, tip.y + 60);
            points[tip_idx - 2] = pip;
            points[tip_idx - 1] = Point::new(x, tip.y + 20);
            points[tip_idx] = if bits[finger + 1] != 0 {
                Point::new(x, tip.y)
            } else {
                Point::new(x, pip.y + 10)
            };
        }
        // keep the index tip exactly where asked, even when curled
        if bits[1] == 0 {
            points[index::INDEX_TIP - 2] = Point::new(tip.x, tip.y - 10);
        }
        points[index::INDEX_TIP] = tip;
        LandmarkSet { points }
    }

    /// Thumb + index pinch with the thumb tip `distance` pixels left of the index tip.
    pub fn pinch(tip: Point, distance: i32) -> LandmarkSet {
        let mut set = hand([1, 1, 0, 0, 0], tip);
        set.points[index::THUMB_TIP] = Point::new(tip.x - distance, tip.y);
        set.points[index::THUMB_IP] = Point::new(tip.x - distance + 1, tip.y + 5);
        set
    }
}

#[cfg(test)]
mod tests {
    use super::fixtures::hand;
    use super::*;

    #[test]
    fn normalizes_to_pixels() {
        let raw = RawHand { points: vec![(0.5, 0.25), (0.999, 1.0)], score: 1.0 };
        let set = LandmarkSet::from_normalized(&raw, 640, 480);
        assert_eq!(set.points, vec![Point::new(320, 120), Point::new(639, 480)]);
    }

    #[test]
    fn garbage_coordinates_stay_near_the_frame() {
        let raw = RawHand {
            points: vec![(1.0e7, 0.5), (-3.0e9, f32::INFINITY), (f32::NAN, f32::NEG_INFINITY)],
            score: 1.0,
        };
        let set = LandmarkSet::from_normalized(&raw, 640, 480);
        assert_eq!(
            set.points,
            vec![Point::new(1280, 240), Point::new(-640, 960), Point::new(-640, -480)]
        );
    }

    #[test]
    fn short_set_is_all_down() {
        let set = LandmarkSet { points: vec![Point::new(1, 1); 20] };
        assert_eq!(FingerState::from_landmarks(&set), FingerState::ALL_DOWN);
        assert_eq!(FingerState::from_landmarks(&LandmarkSet::default()).count_up(), 0);
    }

    #[test]
    fn fixtures_round_trip_every_pattern() {
        for n in 0u8..32 {
            let bits = [n & 1, (n >> 1) & 1, (n >> 2) & 1, (n >> 3) & 1, (n >> 4) & 1];
            let set = hand(bits, Point::new(300, 300));
            let state = FingerState::from_landmarks(&set);
            assert_eq!(state.bits(), bits, "pattern {bits:?}");
            assert_eq!(state.0.len(), 5);
            assert_eq!(set.index_tip(), Some(Point::new(300, 300)));
        }
    }

    #[test]
    fn thumb_rule_is_lateral() {
        let mut set = hand([0, 0, 0, 0, 0], Point::new(300, 300));
        // tip far above the joint but to its right: still "down"
        set.points[index::THUMB_TIP] = Point::new(set.points[index::THUMB_IP].x + 1, 0);
        assert!(!FingerState::from_landmarks(&set).0[0]);
        set.points[index::THUMB_TIP].x -= 2;
        assert!(FingerState::from_landmarks(&set).0[0]);
    }
}
