use glam::Vec2;
use raymancer_common::CameraPose;
use raymancer_map::{Cell, CellCoord, Grid};

/// Ray marching granularity.
///
/// A smaller `step` gives more accurate hit distances and texture
/// coordinates at proportionally more work per column.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MarchConfig {
    /// Distance advanced per sample, in map units.
    pub step: f32,
    /// Rays that travel further than this without hitting a wall miss.
    pub max_distance: f32,
}

impl Default for MarchConfig {
    fn default() -> Self {
        Self {
            step: 0.01,
            max_distance: 20.0,
        }
    }
}

impl MarchConfig {
    pub fn new(step: f32, max_distance: f32) -> Self {
        Self { step, max_distance }
    }

    /// Number of samples a ray takes before giving up. Saturates at `u64::MAX`.
    pub fn max_samples(&self) -> u64 {
        ((self.max_distance / self.step).floor() as u64).saturating_add(1)
    }

    pub fn is_valid(&self) -> bool {
        self.step.is_finite()
            && self.step > 0.0
            && self.max_distance.is_finite()
            && self.max_distance >= 0.0
    }
}

/// Where a ray stopped and what it hit.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HitRecord {
    /// Distance travelled along the ray.
    pub t: f32,
    /// Sample position inside the wall cell.
    pub position: Vec2,
    pub cell: CellCoord,
    pub material: u8,
    /// Horizontal texture coordinate in `[0, S)`.
    pub u: usize,
}

/// Result of marching one ray.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RayCast {
    Hit(HitRecord),
    /// Nothing within `max_distance`, or the ray left the grid.
    Miss,
}

impl RayCast {
    pub fn hit(&self) -> Option<&HitRecord> {
        match self {
            RayCast::Hit(h) => Some(h),
            RayCast::Miss => None,
        }
    }
}

/// One point sampled along a ray.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MarchSample {
    pub t: f32,
    pub position: Vec2,
    /// `None` when the sample lies outside the grid.
    pub cell: Option<Cell>,
}

/// Iterator over the fixed-step samples of a ray, nearest first.
///
/// `t` is computed as `i * step` rather than accumulated so long rays do not
/// drift.
#[derive(Debug, Clone)]
pub struct RayMarch<'a> {
    grid: &'a Grid,
    origin: Vec2,
    dir: Vec2,
    march: MarchConfig,
    index: u64,
    limit: u64,
}

impl<'a> RayMarch<'a> {
    pub fn new(grid: &'a Grid, origin: Vec2, angle: f32, march: MarchConfig) -> Self {
        Self {
            grid,
            origin,
            dir: Vec2::from_angle(angle),
            march,
            index: 0,
            limit: march.max_samples(),
        }
    }
}

impl Iterator for RayMarch<'_> {
    type Item = MarchSample;

    fn next(&mut self) -> Option<MarchSample> {
        if !self.march.is_valid() {
            return None;
        }
        if self.index >= self.limit {
            return None;
        }
        let t = self.index as f32 * self.march.step;
        if t > self.march.max_distance {
            return None;
        }
        self.index += 1;
        let position = self.origin + self.dir * t;
        Some(MarchSample {
            t,
            position,
            cell: self.grid.cell_at(position),
        })
    }
}

/// Cast the ray for one screen column.
///
/// `column_fraction` in `[0, 1)` picks the column, leftmost at
/// `camera.angle - fov / 2`. Samples that fall outside the grid end the march
/// as a miss.
pub fn cast(
    grid: &Grid,
    camera: &CameraPose,
    column_fraction: f32,
    march: &MarchConfig,
    texture_size: usize,
) -> RayCast {
    let angle = camera.ray_angle(column_fraction);
    for sample in RayMarch::new(grid, camera.position, angle, *march) {
        match sample.cell {
            None => return RayCast::Miss,
            Some(Cell::Empty) => continue,
            Some(Cell::Wall(material)) => {
                return RayCast::Hit(HitRecord {
                    t: sample.t,
                    position: sample.position,
                    cell: CellCoord::new(
                        sample.position.x.floor() as u32,
                        sample.position.y.floor() as u32,
                    ),
                    material,
                    u: texture_coord(sample.position, texture_size),
                });
            }
        }
    }
    RayCast::Miss
}

/// Horizontal texture coordinate of a wall hit.
///
/// The axis whose coordinate sits further from a whole number runs along the
/// face that was hit, so its fractional offset becomes the coordinate.
pub fn texture_coord(position: Vec2, texture_size: usize) -> usize {
    let hx = position.x - (position.x + 0.5).floor();
    let hy = position.y - (position.y + 0.5).floor();
    let offset = if hx.abs() > hy.abs() { hx } else { hy };
    wrap_texture_coord(offset, texture_size)
}

/// Scale a fractional offset by the texture size and wrap negatives into `[0, S)`.
pub fn wrap_texture_coord(offset: f32, texture_size: usize) -> usize {
    if texture_size == 0 {
        return 0;
    }
    let scaled = (offset * texture_size as f32) as i64;
    scaled.rem_euclid(texture_size as i64) as usize
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::{FRAC_PI_2, FRAC_PI_3, PI};

    /// Empty square room with walls of material `m` on the border.
    fn room(size: usize, m: char) -> Grid {
        let mut rows = Vec::new();
        for y in 0..size {
            let row: String = (0..size)
                .map(|x| {
                    if x == 0 || y == 0 || x == size - 1 || y == size - 1 {
                        m
                    } else {
                        ' '
                    }
                })
                .collect();
            rows.push(row);
        }
        Grid::from_rows(&rows).unwrap()
    }

    fn looking(x: f32, y: f32, angle: f32) -> CameraPose {
        CameraPose::new(Vec2::new(x, y), angle, FRAC_PI_3)
    }

    #[test]
    fn straight_cast_hits_within_one_step() {
        let grid = room(16, '1');
        let march = MarchConfig::default();
        // Wall face at x = 15, camera at x = 5 facing +x.
        let cam = looking(5.0, 8.5, 0.0);
        let hit = *cast(&grid, &cam, 0.5, &march, 64).hit().unwrap();
        assert!((hit.t - 10.0).abs() <= march.step + 1e-4, "t = {}", hit.t);
        assert_eq!(hit.material, 1);
        assert_eq!(hit.cell, CellCoord::new(15, 8));
    }

    #[test]
    fn straight_cast_in_each_direction() {
        let grid = room(16, '2');
        let march = MarchConfig::new(0.005, 30.0);
        let cam = |a| looking(8.0, 8.0, a);
        for (angle, expected) in [(0.0, 7.0), (FRAC_PI_2, 7.0), (PI, 7.0), (-FRAC_PI_2, 7.0)] {
            let hit = *cast(&grid, &cam(angle), 0.5, &march, 8).hit().unwrap();
            // +x and +y faces sit at 15.0 (7 away); -x and -y faces at 1.0 (7 away).
            assert!(
                (hit.t - expected).abs() <= march.step + 1e-3,
                "angle {angle}: t = {}",
                hit.t
            );
        }
    }

    #[test]
    fn coarse_step_still_within_one_step() {
        let grid = room(16, '1');
        let march = MarchConfig::new(0.25, 20.0);
        let cam = looking(2.1, 8.5, 0.0);
        let hit = *cast(&grid, &cam, 0.5, &march, 4).hit().unwrap();
        assert!((hit.t - 12.9).abs() <= march.step, "t = {}", hit.t);
    }

    #[test]
    fn empty_region_misses() {
        let grid = Grid::from_literal(64, 64, &" ".repeat(64 * 64)).unwrap();
        let march = MarchConfig::new(0.01, 20.0);
        let cam = looking(32.0, 32.0, 0.3);
        for i in 0..16 {
            let fraction = i as f32 / 16.0;
            assert_eq!(cast(&grid, &cam, fraction, &march, 16), RayCast::Miss);
        }
    }

    #[test]
    fn leaving_the_grid_is_a_miss() {
        let grid = Grid::from_rows(&["    ", "    "]).unwrap();
        let march = MarchConfig::new(0.01, 100.0);
        let cam = looking(1.0, 1.0, 0.0);
        assert_eq!(cast(&grid, &cam, 0.5, &march, 16), RayCast::Miss);
    }

    #[test]
    fn max_distance_shorter_than_wall_misses() {
        let grid = room(16, '1');
        let march = MarchConfig::new(0.01, 5.0);
        let cam = looking(2.0, 8.0, 0.0);
        assert_eq!(cast(&grid, &cam, 0.5, &march, 16), RayCast::Miss);
    }

    #[test]
    fn invalid_march_produces_no_samples() {
        let grid = room(4, '1');
        let samples = RayMarch::new(&grid, Vec2::ONE, 0.0, MarchConfig::new(0.0, 10.0)).count();
        assert_eq!(samples, 0);
    }

    #[test]
    fn march_sample_count_matches_config() {
        let grid = Grid::from_literal(64, 64, &" ".repeat(64 * 64)).unwrap();
        let march = MarchConfig::new(0.5, 10.0);
        let samples: Vec<_> = RayMarch::new(&grid, Vec2::splat(32.0), 0.0, march).collect();
        assert_eq!(samples.len() as u64, march.max_samples());
        assert_eq!(samples[0].t, 0.0);
        assert_eq!(samples.last().unwrap().t, 10.0);
    }

    #[test]
    fn sample_count_beyond_u32_does_not_overflow() {
        let march = MarchConfig::new(1e-6, 1e4);
        assert!(march.max_samples() > u64::from(u32::MAX));
        assert_eq!(MarchConfig::new(f32::MIN_POSITIVE, 1e30).max_samples(), u64::MAX);

        let grid = Grid::from_literal(4, 4, &" ".repeat(16)).unwrap();
        let samples: Vec<_> = RayMarch::new(&grid, Vec2::splat(2.0), 0.0, march)
            .take(3)
            .collect();
        assert_eq!(samples.len(), 3);
        assert_eq!(samples[2].t, 2.0 * 1e-6);
    }

    #[test]
    fn texture_coord_follows_face_axis() {
        // Hit on a vertical face at x ~ 15: y offset picks the column.
        assert_eq!(texture_coord(Vec2::new(15.001, 8.25), 64), 16);
        // Hit on a horizontal face at y ~ 3: x offset picks the column.
        assert_eq!(texture_coord(Vec2::new(4.125, 3.002), 64), 8);
    }

    #[test]
    fn negative_offset_wraps_into_range() {
        for size in [1usize, 2, 3, 16, 64, 100] {
            for i in 1..50 {
                let offset = -(i as f32) / 100.0;
                let u = wrap_texture_coord(offset, size);
                assert!(u < size, "offset {offset} size {size} gave {u}");
            }
        }
        assert_eq!(wrap_texture_coord(-0.25, 64), 48);
        assert_eq!(wrap_texture_coord(-0.5, 2), 1);
    }

    #[test]
    fn hit_texture_coord_always_in_range() {
        let grid = Grid::demo();
        let march = MarchConfig::default();
        let cam = CameraPose::default();
        for c in 0..256 {
            if let RayCast::Hit(hit) = cast(&grid, &cam, c as f32 / 256.0, &march, 7) {
                assert!(hit.u < 7);
            }
        }
    }
}
