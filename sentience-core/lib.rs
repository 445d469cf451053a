use std::ops::{Index, Range};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Row-major 8-bit single-channel image, stride = width
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonoImage {
    width: usize,
    height: usize,
    pixels: Vec<u8>,
}

impl MonoImage {
    /// Wrap an existing buffer; `None` when its length is not `width * height`
    pub fn from_raw(width: usize, height: usize, pixels: Vec<u8>) -> Option<Self> {
        if width.checked_mul(height)? != pixels.len() {
            return None;
        }
        Some(Self { width, height, pixels })
    }

    /// Uniform image of the given intensity
    pub fn filled(width: usize, height: usize, value: u8) -> Self {
        Self {
            width,
            height,
            pixels: vec![value; width * height],
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    /// Intensity at `(x, y)`. Panics outside the image.
    #[inline]
    pub fn at(&self, x: usize, y: usize) -> u8 {
        self.pixels[y * self.width + x]
    }

    /// Intensity at signed coordinates, `None` outside the image
    #[inline]
    pub fn get(&self, x: i32, y: i32) -> Option<u8> {
        if x < 0 || y < 0 {
            return None;
        }
        let (x, y) = (x as usize, y as usize);
        if x >= self.width || y >= self.height {
            return None;
        }
        Some(self.pixels[y * self.width + x])
    }

    pub fn set(&mut self, x: usize, y: usize, value: u8) {
        self.pixels[y * self.width + x] = value;
    }
}

/// Handle of a corner inside a [`CornerSet`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct CornerId(pub usize);

/// Mean offset towards neighbouring corners
#[derive(Debug, Clone, Copy, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Direction {
    pub dx: f32,
    pub dy: f32,
    pub magnitude: f32,
}

impl Direction {
    pub const ZERO: Direction = Direction { dx: 0.0, dy: 0.0, magnitude: 0.0 };

    pub fn new(dx: f32, dy: f32) -> Self {
        Self {
            dx,
            dy,
            magnitude: (dx * dx + dy * dy).sqrt(),
        }
    }
}

/// Default constellation half-size (11x11 bins)
pub const DEFAULT_CONSTELLATION_HALF_SIZE: usize = 5;

/// Square histogram of neighbouring corner positions around a corner.
///
/// Bin `(k, k)` is the corner itself; bins are stored row-major.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Constellation {
    half_size: usize,
    bins: Vec<u32>,
}

impl Constellation {
    pub fn new(half_size: usize) -> Self {
        let side = 2 * half_size + 1;
        Self {
            half_size,
            bins: vec![0; side * side],
        }
    }

    pub fn half_size(&self) -> usize {
        self.half_size
    }

    /// Bins per axis, `2 * half_size + 1`
    pub fn side(&self) -> usize {
        2 * self.half_size + 1
    }

    pub fn get(&self, bx: usize, by: usize) -> u32 {
        self.bins[by * self.side() + bx]
    }

    pub fn increment(&mut self, bx: usize, by: usize) {
        let side = self.side();
        self.bins[by * side + bx] += 1;
    }

    pub fn bins(&self) -> &[u32] {
        &self.bins
    }

    /// Number of corners counted into the histogram
    pub fn total(&self) -> u32 {
        self.bins.iter().sum()
    }

    pub fn same_shape(&self, other: &Constellation) -> bool {
        self.half_size == other.half_size
    }
}

/// A detected corner and everything later stages attach to it
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Corner {
    pub x: i32,
    pub y: i32,
    pub score: i32,
    pub direction: Option<Direction>,
    pub neighbours: Vec<CornerId>,
    pub constellation: Option<Constellation>,
    /// Written by the stereo matcher, never by this pipeline
    pub disparity: f32,
}

impl Corner {
    pub fn new(x: i32, y: i32) -> Self {
        Self::with_score(x, y, 0)
    }

    pub fn with_score(x: i32, y: i32, score: i32) -> Self {
        Self {
            x,
            y,
            score,
            direction: None,
            neighbours: Vec::new(),
            constellation: None,
            disparity: 0.0,
        }
    }

    /// Sort key for raster order: row first, then column
    #[inline]
    pub fn raster_key(&self) -> (i32, i32) {
        (self.y, self.x)
    }
}

/// True if `corners` ascend by row and by column within each row
pub fn is_raster_ordered(corners: &[Corner]) -> bool {
    corners
        .windows(2)
        .all(|w| w[0].raster_key() <= w[1].raster_key())
}

/// Corners kept in raster order.
///
/// Non-maximal suppression and line enumeration rely on the ordering, so it
/// is established at construction and positions cannot be changed afterwards.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(from = "Vec<Corner>", into = "Vec<Corner>"))]
pub struct CornerSet {
    corners: Vec<Corner>,
}

impl CornerSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a set, sorting into raster order if the input is not already
    pub fn from_corners(mut corners: Vec<Corner>) -> Self {
        if !is_raster_ordered(&corners) {
            log::warn!(
                "corner sequence of {} entries is not in raster order, sorting",
                corners.len()
            );
            corners.sort_by_key(Corner::raster_key);
        }
        Self { corners }
    }

    pub fn len(&self) -> usize {
        self.corners.len()
    }

    pub fn is_empty(&self) -> bool {
        self.corners.is_empty()
    }

    pub fn get(&self, id: CornerId) -> Option<&Corner> {
        self.corners.get(id.0)
    }

    pub fn as_slice(&self) -> &[Corner] {
        &self.corners
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Corner> {
        self.corners.iter()
    }

    pub fn ids(&self) -> impl Iterator<Item = CornerId> + '_ {
        (0..self.corners.len()).map(CornerId)
    }

    pub fn into_vec(self) -> Vec<Corner> {
        self.corners
    }

    /// Index range covering every corner with `y_min <= y <= y_max`
    pub fn row_range(&self, y_min: i32, y_max: i32) -> Range<usize> {
        let start = self.corners.partition_point(|c| c.y < y_min);
        let end = self.corners.partition_point(|c| c.y <= y_max);
        start..end.max(start)
    }

    pub fn set_direction(&mut self, id: CornerId, direction: Direction, neighbours: Vec<CornerId>) {
        let corner = &mut self.corners[id.0];
        corner.direction = Some(direction);
        corner.neighbours = neighbours;
    }

    pub fn set_constellation(&mut self, id: CornerId, constellation: Constellation) {
        self.corners[id.0].constellation = Some(constellation);
    }

    pub fn set_disparity(&mut self, id: CornerId, disparity: f32) {
        self.corners[id.0].disparity = disparity;
    }
}

impl Index<CornerId> for CornerSet {
    type Output = Corner;

    fn index(&self, id: CornerId) -> &Corner {
        &self.corners[id.0]
    }
}

impl From<Vec<Corner>> for CornerSet {
    fn from(corners: Vec<Corner>) -> Self {
        Self::from_corners(corners)
    }
}

impl From<CornerSet> for Vec<Corner> {
    fn from(set: CornerSet) -> Self {
        set.corners
    }
}

impl<'a> IntoIterator for &'a CornerSet {
    type Item = &'a Corner;
    type IntoIter = std::slice::Iter<'a, Corner>;

    fn into_iter(self) -> Self::IntoIter {
        self.corners.iter()
    }
}

/// Straight segment between two corners of a [`CornerSet`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Line {
    pub point1: CornerId,
    pub point2: CornerId,
    pub visible: bool,
    pub on_horizon: bool,
}

impl Line {
    pub fn new(point1: CornerId, point2: CornerId) -> Self {
        Self {
            point1,
            point2,
            visible: true,
            on_horizon: false,
        }
    }

    /// Resolve both endpoints against the set the line was built from
    pub fn endpoints<'a>(&self, corners: &'a CornerSet) -> (&'a Corner, &'a Corner) {
        (&corners[self.point1], &corners[self.point2])
    }
}

/// Minimum contiguous arc length of the segment test
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum FastVariant {
    #[default]
    Nine,
    Ten,
}

impl FastVariant {
    pub fn arc_length(self) -> usize {
        match self {
            FastVariant::Nine => 9,
            FastVariant::Ten => 10,
        }
    }

    pub fn from_arc_length(n: usize) -> Option<Self> {
        match n {
            9 => Some(FastVariant::Nine),
            10 => Some(FastVariant::Ten),
            _ => None,
        }
    }
}

#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct FeatureConfig {
    pub barrier: u8,
    pub variant: FastVariant,
    pub n_threads: usize,
}

impl Default for FeatureConfig {
    fn default() -> Self {
        Self {
            barrier: 20,
            variant: FastVariant::Nine,
            n_threads: num_cpus::get().max(1),
        }
    }
}

/// Initialize Rayon thread pool with the specified number of threads
pub fn init_thread_pool(n_threads: usize) -> Result<(), rayon::ThreadPoolBuildError> {
    rayon::ThreadPoolBuilder::new()
        .num_threads(n_threads)
        .build_global()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn corners(points: &[(i32, i32)]) -> Vec<Corner> {
        points.iter().map(|&(x, y)| Corner::new(x, y)).collect()
    }

    #[test]
    fn test_from_raw_rejects_wrong_length() {
        assert!(MonoImage::from_raw(4, 4, vec![0; 15]).is_none());
        assert!(MonoImage::from_raw(4, 4, vec![0; 16]).is_some());
    }

    #[test]
    fn test_signed_access_outside_image() {
        let mut img = MonoImage::filled(5, 4, 7);
        img.set(4, 3, 200);
        assert_eq!(img.get(4, 3), Some(200));
        assert_eq!(img.get(-1, 0), None);
        assert_eq!(img.get(5, 0), None);
        assert_eq!(img.get(0, 4), None);
        assert_eq!(img.at(0, 0), 7);
    }

    #[test]
    fn test_raster_order_check() {
        assert!(is_raster_ordered(&corners(&[(5, 1), (7, 1), (0, 2)])));
        assert!(!is_raster_ordered(&corners(&[(5, 2), (7, 1)])));
        assert!(!is_raster_ordered(&corners(&[(7, 1), (5, 1)])));
        assert!(is_raster_ordered(&[]));
    }

    #[test]
    fn test_corner_set_sorts_unordered_input() {
        let set = CornerSet::from_corners(corners(&[(3, 9), (8, 2), (1, 2)]));
        let keys: Vec<_> = set.iter().map(|c| (c.x, c.y)).collect();
        assert_eq!(keys, vec![(1, 2), (8, 2), (3, 9)]);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_deserialized_set_is_raster_ordered() {
        let unordered = corners(&[(3, 9), (8, 2), (1, 2), (0, 9)]);
        let json = serde_json::to_string(&unordered).unwrap();

        let set: CornerSet = serde_json::from_str(&json).unwrap();
        assert!(is_raster_ordered(set.as_slice()));
        assert_eq!(set.row_range(9, 9), 2..4);

        // serialized form is the plain corner array
        let back: Vec<Corner> = serde_json::from_str(&serde_json::to_string(&set).unwrap()).unwrap();
        assert_eq!(back, set.into_vec());
    }

    #[test]
    fn test_row_range() {
        let set = CornerSet::from_corners(corners(&[(0, 1), (4, 3), (6, 3), (2, 5), (1, 8)]));
        assert_eq!(set.row_range(3, 5), 1..4);
        assert_eq!(set.row_range(6, 7), 4..4);
        assert_eq!(set.row_range(-10, 100), 0..5);
        assert_eq!(set.row_range(9, 2), 5..5);
    }

    #[test]
    fn test_constellation_bins() {
        let mut c = Constellation::new(DEFAULT_CONSTELLATION_HALF_SIZE);
        assert_eq!(c.side(), 11);
        assert_eq!(c.bins().len(), 121);
        c.increment(10, 0);
        c.increment(10, 0);
        c.increment(5, 5);
        assert_eq!(c.get(10, 0), 2);
        assert_eq!(c.get(0, 10), 0);
        assert_eq!(c.total(), 3);
        assert!(!c.same_shape(&Constellation::new(3)));
    }

    #[test]
    fn test_setters_write_fields() {
        let mut set = CornerSet::from_corners(corners(&[(1, 1), (2, 1)]));
        set.set_direction(CornerId(0), Direction::new(3.0, 4.0), vec![CornerId(1)]);
        set.set_disparity(CornerId(1), 2.5);
        assert_eq!(set[CornerId(0)].direction.unwrap().magnitude, 5.0);
        assert_eq!(set[CornerId(0)].neighbours, vec![CornerId(1)]);
        assert_eq!(set[CornerId(1)].disparity, 2.5);
    }

    #[test]
    fn test_line_defaults_and_endpoints() {
        let set = CornerSet::from_corners(corners(&[(1, 1), (9, 4)]));
        let line = Line::new(CornerId(0), CornerId(1));
        assert!(line.visible);
        assert!(!line.on_horizon);
        let (a, b) = line.endpoints(&set);
        assert_eq!((a.x, b.x), (1, 9));
    }

    #[test]
    fn test_fast_variant_arc_lengths() {
        assert_eq!(FastVariant::Nine.arc_length(), 9);
        assert_eq!(FastVariant::Ten.arc_length(), 10);
        assert_eq!(FastVariant::from_arc_length(10), Some(FastVariant::Ten));
        assert_eq!(FastVariant::from_arc_length(12), None);
    }
}
