use sentience_core::{CornerSet, Line, MonoImage};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Samples taken along a candidate horizon line
const HORIZON_SAMPLES: i32 = 10;
/// Rows skipped above a sample before the sky walk starts
const SKY_OFFSET: i32 = 10;
/// Rows visited by the sky walk, roughly
const SKY_STEPS: i32 = 15;
/// Mean intensity above which a sample counts as sky
const SKY_INTENSITY: f32 = 230.0;

/// Horizon position at the image's horizontal midpoint and its tilt
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct HorizonEstimate {
    pub vertical_position: f32,
    /// Radians, positive when the horizon descends to the right
    pub gravity_angle: f32,
}

/// Whether a line separates bright sky above from the scene below.
///
/// Both endpoints must sit in the band `(h/10, h - h/8)` and the line must
/// span more than a tenth of the width. Every sample along it must have a
/// near-white mean intensity in the rows above.
pub fn is_on_horizon(img: &MonoImage, corners: &CornerSet, line: &Line) -> bool {
    let (w, h) = (img.width() as i32, img.height() as i32);
    let (a, b) = line.endpoints(corners);

    let in_band = |y: i32| y > h / 10 && y < h - h / 8;
    if !in_band(a.y) || !in_band(b.y) {
        return false;
    }
    let (dx, dy) = (b.x - a.x, b.y - a.y);
    if dx.abs() <= w / 10 {
        return false;
    }

    (0..HORIZON_SAMPLES).all(|i| {
        let x = a.x + dx * i / HORIZON_SAMPLES;
        let y = a.y + dy * i / HORIZON_SAMPLES;
        sky_above(img, x, y)
    })
}

/// Mean intensity of the rows walked upward from `y - SKY_OFFSET` exceeds the sky level
fn sky_above(img: &MonoImage, x: i32, y: i32) -> bool {
    let start = y - SKY_OFFSET;
    if start < 0 {
        return false;
    }
    let step = (start / SKY_STEPS).max(1);

    let (sum, count) = (0..=start / step)
        .filter_map(|k| img.get(x, start - k * step))
        .fold((0u32, 0u32), |(s, n), v| (s + v as u32, n + 1));
    count > 0 && sum as f32 / count as f32 > SKY_INTENSITY
}

/// Flag the lines that lie on the horizon, returning how many did
pub fn classify(img: &MonoImage, corners: &CornerSet, lines: &mut [Line]) -> usize {
    let mut count = 0;
    for line in lines.iter_mut() {
        line.on_horizon = is_on_horizon(img, corners, line);
        count += line.on_horizon as usize;
    }
    log::debug!("{} of {} lines on the horizon", count, lines.len());
    count
}

/// Average the horizon lines into a single position and tilt.
///
/// Each flagged line is extended to `x = width / 2`. `None` when no line is
/// flagged.
pub fn horizon_detection(width: usize, corners: &CornerSet, lines: &[Line]) -> Option<HorizonEstimate> {
    let mid = (width / 2) as f32;
    let mut n = 0usize;
    let (mut sum_intercept, mut sum_gradient) = (0.0f32, 0.0f32);

    for line in lines.iter().filter(|l| l.on_horizon) {
        let (a, b) = line.endpoints(corners);
        let dx = (b.x - a.x) as f32;
        if dx == 0.0 {
            continue;
        }
        let gradient = (b.y - a.y) as f32 / dx;
        sum_intercept += a.y as f32 + gradient * (mid - a.x as f32);
        sum_gradient += gradient;
        n += 1;
    }

    if n == 0 {
        return None;
    }
    let gradient = sum_gradient / n as f32;
    Some(HorizonEstimate {
        vertical_position: sum_intercept / n as f32,
        gravity_angle: gradient.atan(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use sentience_core::{Corner, CornerId};

    /// Bright sky above `sky_rows`, dark ground below
    fn sky_image(width: usize, height: usize, sky_rows: usize) -> MonoImage {
        let mut img = MonoImage::filled(width, height, 60);
        for y in 0..sky_rows {
            for x in 0..width {
                img.set(x, y, 250);
            }
        }
        img
    }

    fn pair(a: (i32, i32), b: (i32, i32)) -> (CornerSet, Vec<Line>) {
        let corners = CornerSet::from_corners(vec![Corner::new(a.0, a.1), Corner::new(b.0, b.1)]);
        let lines = vec![Line::new(CornerId(0), CornerId(1))];
        (corners, lines)
    }

    #[test]
    fn test_level_horizon() {
        let img = sky_image(100, 100, 50);
        let (corners, mut lines) = pair((20, 50), (80, 50));
        assert_eq!(classify(&img, &corners, &mut lines), 1);

        let est = horizon_detection(100, &corners, &lines).unwrap();
        assert_eq!(est.vertical_position, 50.0);
        assert_eq!(est.gravity_angle, 0.0);
    }

    #[test]
    fn test_tilted_horizon() {
        let img = sky_image(100, 100, 45);
        let (corners, mut lines) = pair((20, 40), (80, 52));
        assert_eq!(classify(&img, &corners, &mut lines), 1);

        let est = horizon_detection(100, &corners, &lines).unwrap();
        assert!((est.vertical_position - 46.0).abs() < 1e-4);
        assert!((est.gravity_angle - 0.2f32.atan()).abs() < 1e-6);
    }

    #[test]
    fn test_dark_sky_rejected() {
        let img = sky_image(100, 100, 0);
        let (corners, mut lines) = pair((20, 50), (80, 50));
        assert_eq!(classify(&img, &corners, &mut lines), 0);
        assert!(horizon_detection(100, &corners, &lines).is_none());
    }

    #[test]
    fn test_band_and_extent() {
        let img = sky_image(100, 100, 100);
        // too high
        let (corners, lines) = pair((20, 10), (80, 50));
        assert!(!is_on_horizon(&img, &corners, &lines[0]));
        // too low: h - h/8 = 88
        let (corners, lines) = pair((20, 50), (80, 88));
        assert!(!is_on_horizon(&img, &corners, &lines[0]));
        // too short horizontally
        let (corners, lines) = pair((40, 30), (50, 60));
        assert!(!is_on_horizon(&img, &corners, &lines[0]));
        let (corners, lines) = pair((40, 30), (51, 60));
        assert!(is_on_horizon(&img, &corners, &lines[0]));
    }

    #[test]
    fn test_sky_walk_needs_room() {
        let img = sky_image(100, 100, 100);
        assert!(!sky_above(&img, 50, 9));
        assert!(sky_above(&img, 50, 10));
    }
}
