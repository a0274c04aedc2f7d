use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Viewer position and orientation in map space (one unit = one grid cell).
///
/// The pose is not validated: standing inside a wall cell is the caller's
/// problem, not the renderer's.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CameraPose {
    pub position: Vec2,
    /// Facing angle in radians.
    pub angle: f32,
    /// Horizontal field of view in radians.
    pub fov: f32,
}

impl Default for CameraPose {
    fn default() -> Self {
        Self {
            position: Vec2::new(3.456, 2.345),
            angle: 1.523,
            fov: std::f32::consts::FRAC_PI_3,
        }
    }
}

impl CameraPose {
    pub fn new(position: Vec2, angle: f32, fov: f32) -> Self {
        Self {
            position,
            angle,
            fov,
        }
    }

    /// Angle of the ray for a screen column, where `column_fraction` in
    /// `[0, 1)` sweeps linearly from the left edge of the field of view.
    pub fn ray_angle(&self, column_fraction: f32) -> f32 {
        self.angle - self.fov / 2.0 + self.fov * column_fraction
    }

    /// Same pose turned by `delta` radians.
    pub fn rotated(self, delta: f32) -> Self {
        Self {
            angle: self.angle + delta,
            ..self
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ray_angle_sweeps_fov() {
        let pose = CameraPose::new(Vec2::ZERO, 1.0, 0.5);
        assert!((pose.ray_angle(0.0) - 0.75).abs() < 1e-6);
        assert!((pose.ray_angle(0.5) - 1.0).abs() < 1e-6);
        assert!((pose.ray_angle(1.0) - 1.25).abs() < 1e-6);
    }

    #[test]
    fn rotated_only_changes_angle() {
        let pose = CameraPose::default();
        let turned = pose.rotated(0.25);
        assert_eq!(turned.position, pose.position);
        assert_eq!(turned.fov, pose.fov);
        assert!((turned.angle - pose.angle - 0.25).abs() < 1e-6);
    }
}
