//! Geometric context descriptors for corners.
//!
//! A [`Constellation`] records where the other corners lie relative to a
//! corner, quantized into a square histogram. It carries no appearance
//! information, so two views of the same scene point can be compared by the
//! layout of their neighbours alone.

use rayon::prelude::*;
use sentience_core::{Constellation, CornerId, CornerSet, DEFAULT_CONSTELLATION_HALF_SIZE};

pub mod direction;

pub use direction::DirectionAggregator;

/// Builds constellation histograms over a rectangular window
#[derive(Debug, Clone, Copy)]
pub struct ConstellationBuilder {
    half_size: usize,
    max_x_diff: i32,
    max_y_diff: i32,
}

impl ConstellationBuilder {
    /// `None` unless both window half-extents are positive
    pub fn new(max_x_diff: i32, max_y_diff: i32) -> Option<Self> {
        if max_x_diff <= 0 || max_y_diff <= 0 {
            return None;
        }
        Some(Self {
            half_size: DEFAULT_CONSTELLATION_HALF_SIZE,
            max_x_diff,
            max_y_diff,
        })
    }

    pub fn with_half_size(mut self, half_size: usize) -> Self {
        self.half_size = half_size;
        self
    }

    pub fn half_size(&self) -> usize {
        self.half_size
    }

    /// Histogram of every other corner within `±max_x_diff, ±max_y_diff` of `id`
    pub fn describe(&self, corners: &CornerSet, id: CornerId) -> Constellation {
        let c = &corners[id];
        let mut hist = Constellation::new(self.half_size);
        let k = self.half_size as i32;

        for j in corners.row_range(c.y - self.max_y_diff, c.y + self.max_y_diff) {
            if j == id.0 {
                continue;
            }
            let o = &corners[CornerId(j)];
            let dx = o.x - c.x;
            if dx.abs() > self.max_x_diff {
                continue;
            }
            let bx = quantize(dx, k, self.max_x_diff);
            let by = quantize(o.y - c.y, k, self.max_y_diff);
            hist.increment(bx, by);
        }
        hist
    }

    /// Compute and store a constellation for every corner
    pub fn describe_all(&self, corners: &mut CornerSet) {
        let shared: &CornerSet = corners;
        let descriptors: Vec<Constellation> = (0..shared.len())
            .into_par_iter()
            .map(|i| self.describe(shared, CornerId(i)))
            .collect();

        log::debug!("built {} constellations (half size {})", descriptors.len(), self.half_size);
        for (i, hist) in descriptors.into_iter().enumerate() {
            corners.set_constellation(CornerId(i), hist);
        }
    }
}

/// Map an offset in `[-max, max]` linearly onto a bin in `[0, 2k]`
fn quantize(d: i32, k: i32, max: i32) -> usize {
    let scaled = (d * k) as f32 / max as f32;
    (scaled.round() as i32 + k) as usize
}

/// Sum of absolute bin differences over bins where either side is non-zero.
///
/// Lower is more similar. `None` when no bin is active on either side or the
/// histograms differ in shape, meaning there is no comparable context.
pub fn matching_score(a: &Constellation, b: &Constellation) -> Option<u32> {
    if !a.same_shape(b) {
        return None;
    }
    a.bins()
        .iter()
        .zip(b.bins())
        .filter(|&(&p, &q)| p != 0 || q != 0)
        .fold(None, |score, (&p, &q)| Some(score.unwrap_or(0) + p.abs_diff(q)))
}

/// Picks the corner whose constellation best matches a query
#[derive(Debug, Clone, Copy)]
pub struct ConstellationMatcher {
    max_score: u32,
}

impl ConstellationMatcher {
    /// Matches scoring above `max_score` are rejected
    pub fn new(max_score: u32) -> Self {
        Self { max_score }
    }

    /// Lowest-scoring corner of `candidates`; the earliest wins ties
    pub fn best_match(&self, query: &Constellation, candidates: &CornerSet) -> Option<(CornerId, u32)> {
        candidates
            .ids()
            .filter_map(|id| {
                let hist = candidates[id].constellation.as_ref()?;
                let score = matching_score(query, hist)?;
                (score <= self.max_score).then_some((id, score))
            })
            .min_by_key(|&(_, score)| score)
    }
}
