//! Shared types used by every raymancer crate.
//!
//! # Invariants
//! - A packed color stores R in the lowest byte and A in the highest.
//! - A `PixelBuffer` always holds exactly `width * height` pixels.
//! - Writes outside a `PixelBuffer` are dropped, never wrapped or clamped.

mod camera;
mod color;
mod pixels;

pub use camera::CameraPose;
pub use color::{Rgba, pack_color, unpack_color};
pub use pixels::{BufferError, PixelBuffer};

pub fn crate_info() -> &'static str {
    "raymancer-common v0.1.0"
}
