//! Ring helpers for the 16-sample segment test.
//!
//! A ring is packed into a `u16` with bit `i` standing for circle sample `i`.
//! Sample 15 is adjacent to sample 0.

pub const RING_LEN: usize = 16;

/// Pack a per-sample predicate into a ring mask
#[inline]
pub fn ring_mask<F: Fn(usize) -> bool>(pred: F) -> u16 {
    let mut mask = 0u16;
    for i in 0..RING_LEN {
        if pred(i) {
            mask |= 1 << i;
        }
    }
    mask
}

/// Check for a run of at least `min_run` set bits, wrapping from bit 15 to bit 0.
///
/// After folding in `k` rotations, bit `i` survives only if bits
/// `i..=i+k` (mod 16) are all set.
#[inline]
pub fn has_contiguous_arc(mask: u16, min_run: usize) -> bool {
    if min_run == 0 {
        return true;
    }
    if min_run > RING_LEN {
        return false;
    }
    let mut run = mask;
    for k in 1..min_run {
        run &= mask.rotate_right(k as u32);
        if run == 0 {
            return false;
        }
    }
    run != 0
}

/// Length of the longest circular run of set bits, scanning the ring twice
pub fn longest_arc(mask: u16) -> usize {
    if mask == u16::MAX {
        return RING_LEN;
    }
    let mut longest = 0;
    let mut current = 0;
    for i in 0..(RING_LEN * 2) {
        if mask & (1 << (i % RING_LEN)) != 0 {
            current += 1;
            longest = longest.max(current);
        } else {
            current = 0;
        }
    }
    longest
}
