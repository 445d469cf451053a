use sentience_core::{Corner, FastVariant, MonoImage};
use crate::types::CornerType;
use crate::utils::{has_contiguous_arc, ring_mask, RING_LEN};
use rayon::prelude::*;

/// Accelerated segment test: detection and scoring
pub struct CornerDetector;

impl CornerDetector {
    /// Radius-3 Bresenham circle, clockwise from north
    pub const CIRCLE_OFFSETS: [(i32, i32); RING_LEN] = [
        (0, 3), (1, 3), (2, 2), (3, 1),
        (3, 0), (3, -1), (2, -2), (1, -3),
        (0, -3), (-1, -3), (-2, -2), (-3, -1),
        (-3, 0), (-3, 1), (-2, 2), (-1, 3),
    ];

    /// Circle radius; pixels nearer than this to a border are never tested
    pub const BORDER: usize = 3;

    /// Samples 0, 4, 8 and 12 are a quarter turn apart
    const CARDINALS: [usize; 4] = [0, 4, 8, 12];

    /// Flat buffer offsets (`dx + dy * width`) of the circle samples
    pub fn ring_offsets(width: usize) -> [isize; RING_LEN] {
        let w = width as isize;
        let mut offsets = [0isize; RING_LEN];
        for (o, &(dx, dy)) in offsets.iter_mut().zip(Self::CIRCLE_OFFSETS.iter()) {
            *o = dx as isize + dy as isize * w;
        }
        offsets
    }

    /// True if `(x, y)` keeps the whole circle inside the image
    #[inline]
    pub fn in_margin(img: &MonoImage, x: i32, y: i32) -> bool {
        let b = Self::BORDER as i32;
        x >= b && y >= b && x + b < img.width() as i32 && y + b < img.height() as i32
    }

    /// Detect corners in raster order. Scores are left at zero.
    pub fn detect(img: &MonoImage, barrier: u8, variant: FastVariant, parallel: bool) -> Vec<Corner> {
        let (w, h) = (img.width(), img.height());
        if w < 2 * Self::BORDER + 1 || h < 2 * Self::BORDER + 1 {
            return Vec::new();
        }

        let offsets = Self::ring_offsets(w);
        let rows = Self::BORDER..h - Self::BORDER;

        let corners: Vec<Corner> = if parallel {
            // Rows are collected in index order, so concatenation keeps raster order
            rows.into_par_iter()
                .map(|y| Self::detect_row(img, y, barrier, variant, &offsets))
                .collect::<Vec<_>>()
                .into_iter()
                .flatten()
                .collect()
        } else {
            rows.flat_map(|y| Self::detect_row(img, y, barrier, variant, &offsets))
                .collect()
        };

        log::debug!(
            "segment test (arc {}, barrier {}) found {} corners in {}x{} image",
            variant.arc_length(), barrier, corners.len(), w, h
        );
        corners
    }

    fn detect_row(
        img: &MonoImage,
        y: usize,
        barrier: u8,
        variant: FastVariant,
        offsets: &[isize; RING_LEN],
    ) -> Vec<Corner> {
        let w = img.width();
        let pixels = img.pixels();
        let arc = variant.arc_length();

        let mut row = Vec::new();
        for x in Self::BORDER..w - Self::BORDER {
            if Self::classify_at(pixels, y * w + x, offsets, barrier, arc).is_corner() {
                row.push(Corner::new(x as i32, y as i32));
            }
        }
        row
    }

    /// Segment test for a single pixel. Pixels inside the border are never corners.
    pub fn classify(img: &MonoImage, x: i32, y: i32, barrier: u8, variant: FastVariant) -> CornerType {
        if !Self::in_margin(img, x, y) {
            return CornerType::None;
        }
        let w = img.width();
        Self::classify_at(
            img.pixels(),
            y as usize * w + x as usize,
            &Self::ring_offsets(w),
            barrier,
            variant.arc_length(),
        )
    }

    #[inline]
    fn classify_at(
        pixels: &[u8],
        centre: usize,
        offsets: &[isize; RING_LEN],
        barrier: u8,
        arc: usize,
    ) -> CornerType {
        let p = pixels[centre] as i32;
        let cb = p + barrier as i32;
        let c_b = p - barrier as i32;
        let sample = |i: usize| pixels[(centre as isize + offsets[i]) as usize] as i32;

        // A run of `arc` samples covers at least arc / 4 of the cardinals
        let need = arc / 4;
        let bright_cardinals = Self::CARDINALS.iter().filter(|&&i| sample(i) > cb).count();
        let dark_cardinals = Self::CARDINALS.iter().filter(|&&i| sample(i) < c_b).count();
        if bright_cardinals < need && dark_cardinals < need {
            return CornerType::None;
        }

        let ring: [i32; RING_LEN] = std::array::from_fn(|i| sample(i));
        if has_contiguous_arc(ring_mask(|i| ring[i] > cb), arc) {
            CornerType::Bright
        } else if has_contiguous_arc(ring_mask(|i| ring[i] < c_b), arc) {
            CornerType::Dark
        } else {
            CornerType::None
        }
    }

    /// Corner strength: the larger of the summed excess above `cb` and the
    /// summed shortfall below `c_b`, over all 16 samples.
    pub fn score(img: &MonoImage, x: i32, y: i32, barrier: u8) -> i32 {
        if !Self::in_margin(img, x, y) {
            return 0;
        }
        let w = img.width();
        Self::score_at(img.pixels(), y as usize * w + x as usize, &Self::ring_offsets(w), barrier)
    }

    #[inline]
    fn score_at(pixels: &[u8], centre: usize, offsets: &[isize; RING_LEN], barrier: u8) -> i32 {
        let p = pixels[centre] as i32;
        let cb = p + barrier as i32;
        let c_b = p - barrier as i32;

        let mut bright = 0i32;
        let mut dark = 0i32;
        for &off in offsets {
            let s = pixels[(centre as isize + off) as usize] as i32;
            bright += (s - cb).max(0);
            dark += (c_b - s).max(0);
        }
        bright.max(dark)
    }

    /// Score every corner in place
    pub fn score_corners(img: &MonoImage, corners: &mut [Corner], barrier: u8, parallel: bool) {
        let offsets = Self::ring_offsets(img.width());
        let score_one = |c: &mut Corner| {
            c.score = if Self::in_margin(img, c.x, c.y) {
                Self::score_at(img.pixels(), c.y as usize * img.width() + c.x as usize, &offsets, barrier)
            } else {
                0
            };
        };

        if parallel {
            corners.par_iter_mut().for_each(score_one);
        } else {
            corners.iter_mut().for_each(score_one);
        }
    }
}
