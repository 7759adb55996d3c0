use episode::SensorArray;

use crate::pose::Vec3;

/// Top-down map cell outside the navigable region.
pub const MAP_UNNAVIGABLE: u8 = 0;
/// Top-down map cell inside the navigable region.
pub const MAP_NAVIGABLE: u8 = 1;
/// Navigable cell touching the edge of the region.
pub const MAP_BORDER: u8 = 2;

/// Axis-aligned navigable square centred on the origin.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct NavigableArea {
    /// Half the side length, in metres.
    pub half_extent: f32,
    /// Height of the floor the agent stands on.
    pub floor_height: f32,
}

impl Default for NavigableArea {
    fn default() -> Self {
        Self { half_extent: 5.0, floor_height: 0.0 }
    }
}

impl NavigableArea {
    #[must_use]
    pub fn new(half_extent: f32) -> Self {
        Self { half_extent, ..Self::default() }
    }

    #[must_use]
    pub fn contains(&self, point: Vec3) -> bool {
        point.x.abs() <= self.half_extent && point.z.abs() <= self.half_extent
    }

    /// Closest navigable point, snapped to the floor.
    #[must_use]
    pub fn clamp(&self, point: Vec3) -> Vec3 {
        let h = self.half_extent;
        Vec3::new(point.x.clamp(-h, h), self.floor_height, point.z.clamp(-h, h))
    }

    /// Uniformly drawn point on the navigable floor.
    pub fn random_navigable_point(&self, rng: &mut fastrand::Rng) -> Vec3 {
        let h = self.half_extent;
        let x = (rng.f32() * 2.0 - 1.0) * h;
        let z = (rng.f32() * 2.0 - 1.0) * h;
        Vec3::new(x, self.floor_height, z)
    }

    /// Distance from `origin` to the region's edge along `direction`.
    ///
    /// `origin` must lie inside the region. Returns `0.0` for a zero direction.
    #[must_use]
    pub fn distance_to_edge(&self, origin: Vec3, direction: Vec3) -> f32 {
        let h = self.half_extent;
        let axis = |p: f32, d: f32| {
            if d > f32::EPSILON {
                (h - p) / d
            } else if d < -f32::EPSILON {
                (-h - p) / d
            } else {
                f32::INFINITY
            }
        };
        let t = axis(origin.x, direction.x).min(axis(origin.z, direction.z));
        if t.is_finite() { t.max(0.0) } else { 0.0 }
    }

    /// Occupancy grid of `cells x cells` covering the region plus a margin.
    ///
    /// Cells hold [`MAP_UNNAVIGABLE`], [`MAP_NAVIGABLE`] or [`MAP_BORDER`].
    /// Row 0 is the `-z` edge.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn topdown_map(&self, cells: usize) -> SensorArray<u8> {
        let extent = self.half_extent * 1.25;
        let cell_size = 2.0 * extent / cells.max(1) as f32;
        let inside = |row: usize, col: usize| {
            let x = -extent + (col as f32 + 0.5) * cell_size;
            let z = -extent + (row as f32 + 0.5) * cell_size;
            self.contains(Vec3::new(x, self.floor_height, z))
        };

        SensorArray::from_fn(cells, cells, |row, col| {
            let cell = if !inside(row, col) {
                MAP_UNNAVIGABLE
            } else if row == 0
                || col == 0
                || row + 1 == cells
                || col + 1 == cells
                || !inside(row - 1, col)
                || !inside(row + 1, col)
                || !inside(row, col - 1)
                || !inside(row, col + 1)
            {
                MAP_BORDER
            } else {
                MAP_NAVIGABLE
            };
            [cell]
        })
    }
}
