use std::path::{Path, PathBuf};

use raymancer_common::PixelBuffer;

use crate::EncodeError;
use crate::manifest::{MANIFEST_FILE, OutputKind, RunManifest};
use crate::ppm::{OVERHEAD_MAP_FILE, frame_file_name, write_ppm};

/// Destination for finished images.
///
/// A sink error aborts the run; nothing already emitted is rolled back.
pub trait FrameSink {
    /// Accept first-person frame `index` rendered at camera `angle`.
    fn emit_frame(&mut self, index: u32, angle: f32, frame: &PixelBuffer)
    -> Result<(), EncodeError>;

    /// Accept the overhead map rendered at camera `angle`.
    fn emit_overhead_map(&mut self, angle: f32, map: &PixelBuffer) -> Result<(), EncodeError>;
}

/// Writes every image as a PPM file into one directory.
#[derive(Debug)]
pub struct PpmDirectorySink {
    root: PathBuf,
    manifest: Option<RunManifest>,
    written: Vec<PathBuf>,
}

impl PpmDirectorySink {
    /// Use `dir` as the output directory, creating it if needed.
    pub fn create(dir: impl AsRef<Path>) -> Result<Self, EncodeError> {
        let root = dir.as_ref().to_path_buf();
        std::fs::create_dir_all(&root).map_err(|source| EncodeError::Io {
            path: root.display().to_string(),
            source,
        })?;
        Ok(Self {
            root,
            manifest: None,
            written: Vec::new(),
        })
    }

    /// Also record a SHA-256 manifest, saved by [`PpmDirectorySink::finish`].
    pub fn with_manifest(mut self) -> Self {
        self.manifest = Some(RunManifest::new());
        self
    }

    fn write(&mut self, filename: &str, image: &PixelBuffer) -> Result<Vec<u8>, EncodeError> {
        let path = self.root.join(filename);
        let bytes = write_ppm(&path, image)?;
        self.written.push(path);
        Ok(bytes)
    }

    /// Save the manifest if one was requested and return every path written.
    pub fn finish(self) -> Result<Vec<PathBuf>, EncodeError> {
        let mut written = self.written;
        if let Some(manifest) = &self.manifest {
            let path = self.root.join(MANIFEST_FILE);
            manifest.save(&path)?;
            written.push(path);
        }
        Ok(written)
    }
}

impl FrameSink for PpmDirectorySink {
    fn emit_frame(
        &mut self,
        index: u32,
        angle: f32,
        frame: &PixelBuffer,
    ) -> Result<(), EncodeError> {
        let filename = frame_file_name(index);
        let bytes = self.write(&filename, frame)?;
        tracing::debug!(file = %filename, angle, "frame written");
        if let Some(manifest) = &mut self.manifest {
            manifest.record(filename, OutputKind::Frame, Some(index), angle, &bytes);
        }
        Ok(())
    }

    fn emit_overhead_map(&mut self, angle: f32, map: &PixelBuffer) -> Result<(), EncodeError> {
        let bytes = self.write(OVERHEAD_MAP_FILE, map)?;
        tracing::debug!(file = OVERHEAD_MAP_FILE, "overhead map written");
        if let Some(manifest) = &mut self.manifest {
            manifest.record(OVERHEAD_MAP_FILE, OutputKind::OverheadMap, None, angle, &bytes);
        }
        Ok(())
    }
}

/// Keeps every emitted image in memory.
#[derive(Debug, Default)]
pub struct MemorySink {
    pub frames: Vec<(u32, f32, PixelBuffer)>,
    pub overhead_map: Option<(f32, PixelBuffer)>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }
}

impl FrameSink for MemorySink {
    fn emit_frame(
        &mut self,
        index: u32,
        angle: f32,
        frame: &PixelBuffer,
    ) -> Result<(), EncodeError> {
        self.frames.push((index, angle, frame.clone()));
        Ok(())
    }

    fn emit_overhead_map(&mut self, angle: f32, map: &PixelBuffer) -> Result<(), EncodeError> {
        self.overhead_map = Some((angle, map.clone()));
        Ok(())
    }
}
