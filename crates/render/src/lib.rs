//! Rendering: grid ray marching, column projection, frame compositing.
//!
//! # Invariants
//! - Renderers never mutate the grid, the atlas or the camera pose.
//! - A frame depends only on its pose snapshot, so rendering is deterministic.
//! - Buffer writes outside the viewport are dropped, never wrapped.
//! - A wall whose material or texture coordinate falls outside the atlas is an
//!   error, never clamped into range.

mod compositor;
mod overhead;
mod projector;
mod raycast;
mod renderer;

pub use compositor::FirstPersonRenderer;
pub use overhead::{OverheadMap, OverheadMapRenderer, OverlayOptions};
pub use projector::{ColumnStrip, MIN_PERP_DISTANCE, column_height, project, resample};
pub use raycast::{
    HitRecord, MarchConfig, MarchSample, RayCast, RayMarch, cast, texture_coord, wrap_texture_coord,
};
pub use renderer::{RenderError, Renderer, Scene, Viewport};

pub fn crate_info() -> &'static str {
    "raymancer-render v0.1.0"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crate_loads() {
        assert!(crate_info().contains("render"));
    }
}
