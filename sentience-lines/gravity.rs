//! Dominant line orientation as a gravity estimate.
//!
//! Orientations are binned over the full circle, smoothed against the bins a
//! quarter and half turn away, and the strongest bin is folded into
//! `[-π/4, π/4]`.

use sentience_core::{CornerSet, Line};
use std::f32::consts::{FRAC_PI_2, FRAC_PI_4, PI, TAU};

pub const ORIENTATION_BINS: usize = 30;

const BIN_WIDTH: f32 = TAU / ORIENTATION_BINS as f32;

/// Orientation of a line in `[0, 2π)`, `None` for a degenerate line.
///
/// The angle is `atan(dx / length)`, moved by half a turn when the line points
/// upwards so opposite directions land in different bins.
pub fn line_orientation(corners: &CornerSet, line: &Line) -> Option<f32> {
    let (a, b) = line.endpoints(corners);
    let (dx, dy) = ((b.x - a.x) as f32, (b.y - a.y) as f32);
    let length = (dx * dx + dy * dy).sqrt();
    if length == 0.0 {
        return None;
    }
    let mut angle = (dx / length).atan();
    if dy < 0.0 {
        angle += PI;
    }
    Some(angle.rem_euclid(TAU))
}

/// Count visible lines per orientation bin
pub fn orientation_histogram(corners: &CornerSet, lines: &[Line]) -> [f32; ORIENTATION_BINS] {
    let mut hist = [0.0; ORIENTATION_BINS];
    for angle in lines
        .iter()
        .filter(|l| l.visible)
        .filter_map(|l| line_orientation(corners, l))
    {
        let bin = ((angle / BIN_WIDTH) as usize).min(ORIENTATION_BINS - 1);
        hist[bin] += 1.0;
    }
    hist
}

/// Average each bin with the bins a quarter turn either side and half a turn away
pub fn smooth_histogram(hist: &[f32; ORIENTATION_BINS]) -> [f32; ORIENTATION_BINS] {
    let n = ORIENTATION_BINS;
    let quarter = n / 4;
    let half = n / 2;
    std::array::from_fn(|i| {
        (hist[i] + hist[(i + quarter) % n] + hist[(i + n - quarter) % n] + hist[(i + half) % n]) / 4.0
    })
}

/// Tilt of the dominant line orientation, always within `[-π/4, π/4]`.
///
/// Returns `0.0` when there are no usable lines. Ties go to the lowest bin.
pub fn gravity_direction(corners: &CornerSet, lines: &[Line]) -> f32 {
    let smoothed = smooth_histogram(&orientation_histogram(corners, lines));

    let mut best = 0;
    for (i, &v) in smoothed.iter().enumerate() {
        if v > smoothed[best] {
            best = i;
        }
    }
    if smoothed[best] == 0.0 {
        return 0.0;
    }

    let centre = (best as f32 + 0.5) * BIN_WIDTH;
    let folded = centre.rem_euclid(FRAC_PI_2);
    let angle = if folded > FRAC_PI_4 { folded - FRAC_PI_2 } else { folded };
    angle.clamp(-FRAC_PI_4, FRAC_PI_4)
}
