use rayon::prelude::*;
use sentience_core::{Corner, CornerId, CornerSet, Line, MonoImage};

pub const DEFAULT_SAMPLES: usize = 100;
pub const DEFAULT_RADIUS: i32 = 10;

/// Checks whether the straight path between two corners follows a line.
///
/// At every sample the intensity on either side of the path, `radius`
/// pixels away and summed over two adjacent pixels, must differ by less than
/// `line_threshold` horizontally and then vertically.
#[derive(Debug, Clone, Copy)]
pub struct LineVerifier {
    samples: usize,
    radius: i32,
    line_threshold: i32,
    min_length: i32,
}

impl LineVerifier {
    pub fn new(line_threshold: i32, min_length: i32) -> Self {
        Self {
            samples: DEFAULT_SAMPLES,
            radius: DEFAULT_RADIUS,
            line_threshold,
            min_length,
        }
    }

    pub fn with_samples(mut self, samples: usize) -> Self {
        self.samples = samples.max(1);
        self
    }

    pub fn with_radius(mut self, radius: i32) -> Self {
        self.radius = radius;
        self
    }

    pub fn radius(&self) -> i32 {
        self.radius
    }

    /// Walk `samples + 1` points from `a` to `b`, stopping at the first failure
    pub fn is_line(&self, img: &MonoImage, a: &Corner, b: &Corner) -> bool {
        let n = self.samples as i32;
        let (dx, dy) = (b.x - a.x, b.y - a.y);
        (0..=n).all(|i| self.sample_passes(img, a.x + dx * i / n, a.y + dy * i / n))
    }

    fn sample_passes(&self, img: &MonoImage, x: i32, y: i32) -> bool {
        let r = self.radius;
        let pair = |x1: i32, y1: i32, x2: i32, y2: i32| -> Option<i32> {
            Some(img.get(x1, y1)? as i32 + img.get(x2, y2)? as i32)
        };

        let horizontal = match (pair(x - r, y, x - r - 1, y), pair(x + r, y, x + r + 1, y)) {
            (Some(left), Some(right)) => (left - right).abs(),
            _ => return false,
        };
        if horizontal >= self.line_threshold {
            return false;
        }

        match (pair(x, y - r, x, y - r - 1), pair(x, y + r, x, y + r + 1)) {
            (Some(up), Some(down)) => (up - down).abs() < self.line_threshold,
            _ => false,
        }
    }

    /// Whether a pair is far enough apart to be tested
    fn long_enough(&self, a: &Corner, b: &Corner, width: i32, height: i32) -> bool {
        (b.x - a.x).abs() > self.min_length
            || (b.y - a.y).abs() * width / height.max(1) > self.min_length
    }

    /// Every corner pair `i < j` that is long enough and passes [`Self::is_line`].
    ///
    /// Lines come back in `(i, j)` order.
    pub fn fast_lines(&self, img: &MonoImage, corners: &CornerSet) -> Vec<Line> {
        let n = corners.len();
        let (w, h) = (img.width() as i32, img.height() as i32);

        let per_corner: Vec<Vec<Line>> = (0..n)
            .into_par_iter()
            .map(|i| {
                let a = &corners[CornerId(i)];
                (i + 1..n)
                    .filter(|&j| {
                        let b = &corners[CornerId(j)];
                        self.long_enough(a, b, w, h) && self.is_line(img, a, b)
                    })
                    .map(|j| Line::new(CornerId(i), CornerId(j)))
                    .collect()
            })
            .collect();

        let lines: Vec<Line> = per_corner.into_iter().flatten().collect();
        log::debug!("{} lines from {} corners", lines.len(), n);
        lines
    }
}
