//! Gesture classification from finger states.
//!
//! Rules are tried top to bottom and the first match wins. Several patterns
//! overlap (an open palm also "contains" the pinch pattern), so the order of
//! [`RULES`] is the priority contract.

use crate::landmarks::{FingerState, LandmarkSet};
use crate::palette;
use crate::types::Point;

/// What the hand asks for in this frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Gesture {
    /// No hand, incomplete hand, or a pattern with no meaning.
    Idle,
    /// Index finger only: paint at the fingertip.
    Draw(Point),
    /// Index finger only, over a swatch: pick that color.
    PaletteSelect(usize),
    /// Index + middle: move without painting.
    Hover(Point),
    /// Open palm: erase around the fingertip.
    Erase(Point),
    /// Thumb + index: brush size from the pinch distance.
    Resize { tip: Point, distance: u32 },
    /// Fist: advance to the next color (debounced by the controller).
    ColorCycle(Point),
}

impl Gesture {
    /// Turn a Draw over a palette swatch into a PaletteSelect.
    pub fn resolve_palette(self) -> Gesture {
        match self {
            Gesture::Draw(tip) => match palette::hit_test(tip) {
                Some(i) => Gesture::PaletteSelect(i),
                None => self,
            },
            other => other,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Gesture::Idle => "idle",
            Gesture::Draw(_) => "draw",
            Gesture::PaletteSelect(_) => "palette-select",
            Gesture::Hover(_) => "hover",
            Gesture::Erase(_) => "erase",
            Gesture::Resize { .. } => "resize",
            Gesture::ColorCycle(_) => "color-cycle",
        }
    }
}

/// Geometry the rules may need besides the finger states.
#[derive(Clone, Copy, Debug)]
pub struct Features {
    pub index_tip: Point,
    pub thumb_tip: Point,
}

/// One row of the priority table.
pub struct Rule {
    pub name: &'static str,
    pub matches: fn(&FingerState) -> bool,
    pub build: fn(&Features) -> Gesture,
}

const DRAW: FingerState = FingerState::from_bits([0, 1, 0, 0, 0]);
const HOVER: FingerState = FingerState::from_bits([0, 1, 1, 0, 0]);
const PINCH: FingerState = FingerState::from_bits([1, 1, 0, 0, 0]);

pub const RULES: [Rule; 5] = [
    Rule {
        name: "draw",
        matches: |s| *s == DRAW,
        build: |f| Gesture::Draw(f.index_tip),
    },
    Rule {
        name: "hover",
        matches: |s| *s == HOVER,
        build: |f| Gesture::Hover(f.index_tip),
    },
    Rule {
        name: "erase",
        matches: |s| s.count_up() == 5,
        build: |f| Gesture::Erase(f.index_tip),
    },
    Rule {
        name: "resize",
        matches: |s| *s == PINCH && s.count_up() == 2,
        build: |f| Gesture::Resize {
            tip: f.index_tip,
            distance: f.thumb_tip.distance(f.index_tip),
        },
    },
    Rule {
        name: "color-cycle",
        matches: |s| s.count_up() == 0,
        build: |f| Gesture::ColorCycle(f.index_tip),
    },
];

/// First matching rule wins; nothing matching is Idle.
pub fn classify(state: &FingerState, features: &Features) -> Gesture {
    RULES
        .iter()
        .find(|rule| (rule.matches)(state))
        .map(|rule| (rule.build)(features))
        .unwrap_or(Gesture::Idle)
}

/// Classify an optional detected hand. Missing or incomplete hands are Idle.
pub fn classify_hand(hand: Option<&LandmarkSet>) -> Gesture {
    let Some(set) = hand.filter(|s| s.is_complete()) else {
        return Gesture::Idle;
    };
    let (Some(index_tip), Some(thumb_tip)) = (set.index_tip(), set.thumb_tip()) else {
        return Gesture::Idle;
    };
    classify(&FingerState::from_landmarks(set), &Features { index_tip, thumb_tip })
}
