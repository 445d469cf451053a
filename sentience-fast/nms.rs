use sentience_core::{Corner, CornerSet};
use crate::types::CalibrationOffset;

/// Below this many corners suppression is skipped and nothing survives
pub const MIN_CORNERS: usize = 5;

/// Index of the first corner in `row`, if the row has any
fn row_start(corners: &CornerSet, row: i32) -> Option<usize> {
    let range = corners.row_range(row, row);
    (!range.is_empty()).then_some(range.start)
}

/// Non-maximal suppression over a raster-ordered corner set.
///
/// A corner survives unless one of its eight neighbours is also a corner with
/// a strictly higher score. Rows above and below are visited through two
/// cursors that only move forward; each cursor is placed on its row with a
/// binary search, so no row table proportional to the image height is built.
#[derive(Debug, Clone)]
pub struct RasterNms {
    width: usize,
    height: usize,
    calibration: CalibrationOffset,
}

impl RasterNms {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            calibration: CalibrationOffset::default(),
        }
    }

    pub fn with_calibration(mut self, calibration: CalibrationOffset) -> Self {
        self.calibration = calibration;
        self
    }

    pub fn calibration(&self) -> CalibrationOffset {
        self.calibration
    }

    /// Suppress non-maximal corners and apply the calibration offset to survivors.
    ///
    /// Scores must already be set. Survivors shifted outside the image are dropped.
    pub fn suppress(&self, corners: &CornerSet) -> CornerSet {
        let cs = corners.as_slice();
        let n = cs.len();
        if n < MIN_CORNERS {
            log::debug!("non-max suppression skipped: {} corners (< {})", n, MIN_CORNERS);
            return CornerSet::new();
        }
        debug_assert!(sentience_core::is_raster_ordered(cs));

        let mut above = 0usize;
        let mut below = 0usize;
        let mut survivors = Vec::with_capacity(n / 2);

        for (i, c) in cs.iter().enumerate() {
            if Self::beaten_in_row(cs, i) {
                continue;
            }
            if let Some(row) = c.y.checked_sub(1) {
                if let Some(start) = row_start(corners, row) {
                    if Self::beaten_in_adjacent_row(cs, c, row, start, &mut above) {
                        continue;
                    }
                }
            }
            if let Some(row) = c.y.checked_add(1) {
                if let Some(start) = row_start(corners, row) {
                    if Self::beaten_in_adjacent_row(cs, c, row, start, &mut below) {
                        continue;
                    }
                }
            }

            let (x, y) = self.calibration.apply(c.x, c.y);
            if x < 0 || y < 0 || x as usize >= self.width || y as usize >= self.height {
                log::trace!("corner ({}, {}) calibrated out of bounds", c.x, c.y);
                continue;
            }
            survivors.push(Corner::with_score(x, y, c.score));
        }

        log::debug!("non-max suppression kept {} of {} corners", survivors.len(), n);
        CornerSet::from_corners(survivors)
    }

    /// Left and right neighbours in the same row
    fn beaten_in_row(cs: &[Corner], i: usize) -> bool {
        let c = &cs[i];
        let left = i.checked_sub(1).map(|j| &cs[j]);
        let right = cs.get(i + 1);
        [left, right].into_iter().flatten().any(|o| {
            o.y == c.y && o.x.abs_diff(c.x) == 1 && o.score > c.score
        })
    }

    /// Scan `row` for a stronger corner at `x - 1 ..= x + 1`, advancing `cursor`.
    ///
    /// `cursor` is left at the first corner of `row` not left of `x - 1`, which
    /// is where the next corner of the current row starts its own scan.
    fn beaten_in_adjacent_row(
        cs: &[Corner],
        c: &Corner,
        row: i32,
        row_start: usize,
        cursor: &mut usize,
    ) -> bool {
        if *cursor < row_start {
            *cursor = row_start;
        }

        let left = c.x.saturating_sub(1);
        while *cursor < cs.len() && cs[*cursor].y == row && cs[*cursor].x < left {
            *cursor += 1;
        }

        cs[*cursor..]
            .iter()
            .take_while(|o| o.y == row && o.x <= c.x.saturating_add(1))
            .any(|o| o.x.abs_diff(c.x) <= 1 && o.score > c.score)
    }
}
