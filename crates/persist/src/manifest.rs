use std::path::Path;

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::EncodeError;

/// File name of the run manifest inside the output directory.
pub const MANIFEST_FILE: &str = "manifest.json";

/// What an output file holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutputKind {
    Frame,
    OverheadMap,
}

/// One written file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ManifestEntry {
    pub filename: String,
    pub kind: OutputKind,
    /// Sequence index for frames.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub index: Option<u32>,
    /// Camera angle in radians the image was rendered with.
    pub angle: f32,
    pub sha256: String,
}

/// Every file written by one run, in write order.
///
/// Rendering is deterministic, so two runs with the same scene produce
/// manifests with identical digests.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RunManifest {
    pub entries: Vec<ManifestEntry>,
}

impl RunManifest {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(
        &mut self,
        filename: impl Into<String>,
        kind: OutputKind,
        index: Option<u32>,
        angle: f32,
        bytes: &[u8],
    ) {
        self.entries.push(ManifestEntry {
            filename: filename.into(),
            kind,
            index,
            angle,
            sha256: sha256_hex(bytes),
        });
    }

    pub fn frame_count(&self) -> usize {
        self.entries
            .iter()
            .filter(|e| e.kind == OutputKind::Frame)
            .count()
    }

    /// Write as pretty JSON.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), EncodeError> {
        let path = path.as_ref();
        let file = std::fs::File::create(path).map_err(|source| EncodeError::Io {
            path: path.display().to_string(),
            source,
        })?;
        serde_json::to_writer_pretty(file, self)?;
        Ok(())
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, EncodeError> {
        let path = path.as_ref();
        let file = std::fs::File::open(path).map_err(|source| EncodeError::Read {
            path: path.display().to_string(),
            source,
        })?;
        Ok(serde_json::from_reader(file)?)
    }

    /// Re-hash every listed file under `dir` and compare against the manifest.
    pub fn verify(&self, dir: impl AsRef<Path>) -> Result<(), EncodeError> {
        let dir = dir.as_ref();
        for entry in &self.entries {
            let path = dir.join(&entry.filename);
            let data = std::fs::read(&path).map_err(|source| EncodeError::Read {
                path: path.display().to_string(),
                source,
            })?;
            let actual = sha256_hex(&data);
            if actual != entry.sha256 {
                return Err(EncodeError::IntegrityMismatch {
                    filename: entry.filename.clone(),
                    expected: entry.sha256.clone(),
                    actual,
                });
            }
        }
        Ok(())
    }
}

/// Lowercase hex SHA-256 of `data`.
pub fn sha256_hex(data: &[u8]) -> String {
    let digest = Sha256::digest(data);
    digest.iter().map(|b| format!("{b:02x}")).collect()
}
