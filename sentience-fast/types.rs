#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Which side of the threshold band a segment-test arc fell on
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CornerType {
    Bright,
    Dark,
    None,
}

impl CornerType {
    pub fn is_corner(self) -> bool {
        !matches!(self, CornerType::None)
    }
}

/// Offset added to surviving corner positions after suppression.
///
/// The shifted position is truncated toward zero, so fractional offsets
/// only take effect once they accumulate past a whole pixel.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct CalibrationOffset {
    pub x: f32,
    pub y: f32,
}

impl CalibrationOffset {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn is_zero(&self) -> bool {
        self.x == 0.0 && self.y == 0.0
    }

    #[inline]
    pub fn apply(&self, x: i32, y: i32) -> (i32, i32) {
        ((x as f64 + self.x as f64) as i32, (y as f64 + self.y as f64) as i32)
    }
}
