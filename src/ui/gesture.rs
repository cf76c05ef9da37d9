/// Pointer and touch adapters for viewer navigation
///
/// Both adapters produce the same `Direction` command, so the thresholds
/// live here and nowhere else.

use crate::state::viewer::Direction;

/// Click/tap zones: the left part of the surface goes back, the rest forward
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TapZones {
    /// Fraction of the width (from the left) that means "previous"
    pub previous_fraction: f32,
}

impl Default for TapZones {
    fn default() -> Self {
        Self {
            previous_fraction: 0.3,
        }
    }
}

impl TapZones {
    /// Direction for a tap at `x` on a surface `width` wide
    pub fn direction(&self, x: f32, width: f32) -> Direction {
        if x < width * self.previous_fraction {
            Direction::Previous
        } else {
            Direction::Next
        }
    }
}

/// Tracks one horizontal swipe from finger-down to finger-up
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SwipeTracker {
    start: Option<f32>,
    end: Option<f32>,
}

impl SwipeTracker {
    pub fn begin(&mut self, x: f32) {
        self.start = Some(x);
        self.end = None;
    }

    pub fn update(&mut self, x: f32) {
        if self.start.is_some() {
            self.end = Some(x);
        }
    }

    /// Finish the gesture. A finger that never moved is not a swipe.
    pub fn finish(&mut self, threshold: f32) -> Option<Direction> {
        let (start, end) = (self.start.take()?, self.end.take()?);
        swipe_direction(start - end, threshold)
    }

    pub fn cancel(&mut self) {
        self.start = None;
        self.end = None;
    }
}

/// `distance` is start minus end: positive means the finger moved left
pub fn swipe_direction(distance: f32, threshold: f32) -> Option<Direction> {
    if distance > threshold {
        Some(Direction::Next)
    } else if distance < -threshold {
        Some(Direction::Previous)
    } else {
        None
    }
}
