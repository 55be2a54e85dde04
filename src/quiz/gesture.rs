//! Drag distances and their classification into swipes

use serde::{Deserialize, Serialize};

/// Minimum drag distance, in presentation units, that counts as a swipe
pub const DEFAULT_SWIPE_THRESHOLD: f32 = 80.0;

/// A 2D displacement; `y` grows downwards as on screen
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Offset {
    pub x: f32,
    pub y: f32,
}

impl Offset {
    pub const ZERO: Offset = Offset { x: 0.0, y: 0.0 };

    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn is_zero(&self) -> bool {
        self.x == 0.0 && self.y == 0.0
    }
}

/// Vertical direction of a dismiss gesture
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Direction {
    Up,
    Down,
}

/// What a settled drag amounts to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Gesture {
    /// Flip the card
    Horizontal,
    /// Toss the card off-screen
    Vertical(Direction),
    /// Too short or too diagonal; snap back
    None,
}

/// Classify a final drag distance. The dominant axis must strictly exceed
/// both the threshold and the other axis.
pub fn classify(distance: Offset, threshold: f32) -> Gesture {
    let dx = distance.x.abs();
    let dy = distance.y.abs();

    if dx > threshold && dx > dy {
        Gesture::Horizontal
    } else if dy > threshold && dy > dx {
        if distance.y > 0.0 {
            Gesture::Vertical(Direction::Down)
        } else {
            Gesture::Vertical(Direction::Up)
        }
    } else {
        Gesture::None
    }
}
