use raymancer_assets::{AtlasError, TextureAtlas};
use raymancer_common::CameraPose;

use crate::raycast::HitRecord;

/// Lower bound on the perpendicular distance used for column heights.
///
/// Keeps a camera standing on a wall from producing an unbounded strip.
pub const MIN_PERP_DISTANCE: f32 = 0.01;

/// A textured vertical strip ready to be copied into a frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnStrip {
    pub draw_height: u32,
    /// First row of the strip; negative when the strip starts above the viewport.
    pub start_y: i64,
    /// Exactly `draw_height` colors, top to bottom.
    pub colors: Vec<u32>,
}

/// On-screen height of a wall at the given perpendicular distance.
pub fn column_height(perp_distance: f32, viewport_height: u32) -> u32 {
    let distance = if perp_distance.is_nan() {
        MIN_PERP_DISTANCE
    } else {
        perp_distance.max(MIN_PERP_DISTANCE)
    };
    (viewport_height as f32 / distance) as u32
}

/// Project a hit onto the screen and texture it.
///
/// The ray distance is projected onto the camera's forward axis before the
/// height is derived, which removes fisheye distortion.
pub fn project(
    hit: &HitRecord,
    camera: &CameraPose,
    column_angle: f32,
    viewport_height: u32,
    atlas: &TextureAtlas,
) -> Result<ColumnStrip, AtlasError> {
    let perp_distance = hit.t * (column_angle - camera.angle).cos();
    let draw_height = column_height(perp_distance, viewport_height);
    let start_y = (viewport_height / 2) as i64 - (draw_height / 2) as i64;

    let source = atlas.column(hit.material as usize, hit.u)?;
    let colors = resample(&source, draw_height as usize);

    Ok(ColumnStrip {
        draw_height,
        start_y,
        colors,
    })
}

/// Nearest-neighbour resample of a texture column to `height` rows.
///
/// Row `y` takes source row `y * S / height`, repeating rows when stretching
/// and skipping them when shrinking.
pub fn resample(source: &[u32], height: usize) -> Vec<u32> {
    if source.is_empty() {
        return Vec::new();
    }
    (0..height)
        .map(|y| source[y * source.len() / height])
        .collect()
}
