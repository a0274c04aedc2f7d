//! Sequencing: drive the renderer across a fixed number of frames.
//!
//! # Invariants
//! - The camera pose changes only between frames, never during one.
//! - The per-frame angle step is a fixed constant, independent of the frame count.
//! - The overhead map always uses the pose the sequence started from.
//! - The first failing frame aborts the run; earlier frames are kept.

mod sequencer;
mod timer;

pub use sequencer::{
    DEFAULT_ANGLE_STEP, FrameSequencer, SequenceConfig, SequenceError, SequenceState, SequenceStats,
};
pub use timer::FrameTimer;

pub fn crate_info() -> &'static str {
    "raymancer-sequence v0.1.0"
}
