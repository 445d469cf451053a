use rayon::prelude::*;
use sentience_core::{CornerId, CornerSet, Direction};

/// Default sampling stride over candidate corners
pub const DEFAULT_STRIDE: usize = 5;

/// Mean offset from each corner to the corners around it.
///
/// Only candidates whose index is a multiple of `stride` are examined, so a
/// stride above one trades exactness for speed on dense corner sets.
#[derive(Debug, Clone, Copy)]
pub struct DirectionAggregator {
    radius: i32,
    stride: usize,
}

impl DirectionAggregator {
    pub fn new(radius: i32) -> Self {
        Self {
            radius,
            stride: DEFAULT_STRIDE,
        }
    }

    /// Sampling stride; 0 is treated as 1
    pub fn with_stride(mut self, stride: usize) -> Self {
        self.stride = stride.max(1);
        self
    }

    pub fn radius(&self) -> i32 {
        self.radius
    }

    pub fn stride(&self) -> usize {
        self.stride
    }

    /// Direction towards the corners within `radius` of `id`, and their ids
    pub fn neighbourhood(&self, corners: &CornerSet, id: CornerId) -> (Direction, Vec<CornerId>) {
        let c = &corners[id];
        let rows = corners.row_range(c.y - self.radius, c.y + self.radius);
        let first = rows.start.div_ceil(self.stride) * self.stride;

        let mut neighbours = Vec::new();
        let (mut sum_dx, mut sum_dy) = (0i64, 0i64);
        for j in (first..rows.end).step_by(self.stride) {
            if j == id.0 {
                continue;
            }
            let o = &corners[CornerId(j)];
            let (dx, dy) = (o.x - c.x, o.y - c.y);
            if dx.abs() <= self.radius && dy.abs() <= self.radius {
                sum_dx += dx as i64;
                sum_dy += dy as i64;
                neighbours.push(CornerId(j));
            }
        }

        if neighbours.is_empty() {
            return (Direction::ZERO, neighbours);
        }
        let n = neighbours.len() as f32;
        (Direction::new(sum_dx as f32 / n, sum_dy as f32 / n), neighbours)
    }

    /// Compute and store the direction and neighbour list of every corner
    pub fn aggregate(&self, corners: &mut CornerSet) {
        let shared: &CornerSet = corners;
        let results: Vec<(Direction, Vec<CornerId>)> = (0..shared.len())
            .into_par_iter()
            .map(|i| self.neighbourhood(shared, CornerId(i)))
            .collect();

        let isolated = results.iter().filter(|(_, n)| n.is_empty()).count();
        log::debug!(
            "directions for {} corners, {} without neighbours (radius {}, stride {})",
            results.len(), isolated, self.radius, self.stride
        );
        for (i, (direction, neighbours)) in results.into_iter().enumerate() {
            corners.set_direction(CornerId(i), direction, neighbours);
        }
    }
}
