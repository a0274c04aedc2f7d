//! Output: binary PPM encoding, frame sinks, run manifest.
//!
//! # Layout
//! ```text
//! <out>/
//!   00001.ppm ... 0NNNN.ppm   - first-person frames, one per sequence step
//!   out.ppm                    - overhead map
//!   manifest.json              - optional: file list with SHA-256 digests
//! ```
//!
//! # Invariants
//! - Files already written stay on disk when a later write fails.
//! - Frame names are zero-padded so lexical order is frame order.

mod manifest;
mod ppm;
mod sink;

pub use manifest::{MANIFEST_FILE, ManifestEntry, OutputKind, RunManifest, sha256_hex};
pub use ppm::{OVERHEAD_MAP_FILE, encode_ppm, frame_file_name, write_ppm};
pub use sink::{FrameSink, MemorySink, PpmDirectorySink};

/// Errors from writing output files.
#[derive(Debug, thiserror::Error)]
pub enum EncodeError {
    #[error("cannot write {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("cannot read {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("integrity check failed for {filename}: expected {expected}, got {actual}")]
    IntegrityMismatch {
        filename: String,
        expected: String,
        actual: String,
    },
}

pub fn crate_info() -> &'static str {
    "raymancer-persist v0.1.0"
}
