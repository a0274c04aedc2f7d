//! YAML scene file. Every field is optional; missing ones take the defaults
//! of the built-in demo scene.

use std::path::{Path, PathBuf};

use anyhow::{Context, bail};
use glam::Vec2;
use serde::{Deserialize, Serialize};

use raymancer_common::CameraPose;
use raymancer_map::{Grid, MapError};
use raymancer_render::{MarchConfig, OverlayOptions, Viewport};
use raymancer_sequence::SequenceConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewportSettings {
    pub width: u32,
    pub height: u32,
}

impl Default for ViewportSettings {
    fn default() -> Self {
        Self {
            width: 1024,
            height: 512,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraSettings {
    pub position: Vec2,
    /// Radians.
    pub angle: f32,
    /// Radians.
    pub fov: f32,
}

impl Default for CameraSettings {
    fn default() -> Self {
        let pose = CameraPose::default();
        Self {
            position: pose.position,
            angle: pose.angle,
            fov: pose.fov,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MarchSettings {
    pub step: f32,
    pub max_distance: f32,
}

impl Default for MarchSettings {
    fn default() -> Self {
        let march = MarchConfig::default();
        Self {
            step: march.step,
            max_distance: march.max_distance,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OverlaySettings {
    pub trace_rays: bool,
    pub preview_texture: Option<u8>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneConfig {
    pub viewport: ViewportSettings,
    pub camera: CameraSettings,
    pub frames: u32,
    /// Camera turn between frames, in degrees.
    pub angle_step_degrees: f32,
    pub march: MarchSettings,
    pub atlas: PathBuf,
    pub out_dir: PathBuf,
    /// Inline map rows. Takes precedence over `map_file`.
    pub map: Option<Vec<String>>,
    pub map_file: Option<PathBuf>,
    pub overlay: OverlaySettings,
    /// Write `manifest.json` next to the images.
    pub manifest: bool,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            viewport: ViewportSettings::default(),
            camera: CameraSettings::default(),
            frames: 360,
            angle_step_degrees: 1.0,
            march: MarchSettings::default(),
            atlas: PathBuf::from("walltext.png"),
            out_dir: PathBuf::from("."),
            map: None,
            map_file: None,
            overlay: OverlaySettings::default(),
            manifest: false,
        }
    }
}

impl SceneConfig {
    pub fn from_yaml(text: &str) -> Result<Self, serde_yaml::Error> {
        serde_yaml::from_str(text)
    }

    pub fn load(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading scene file {}", path.display()))?;
        Self::from_yaml(&text).with_context(|| format!("parsing scene file {}", path.display()))
    }

    /// Reject settings no renderer can work with.
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.viewport.width == 0 || self.viewport.height == 0 {
            bail!(
                "viewport must be non-empty, got {}x{}",
                self.viewport.width,
                self.viewport.height
            );
        }
        if !self.march().is_valid() {
            bail!(
                "march step {} and max distance {} must be positive and finite",
                self.march.step,
                self.march.max_distance
            );
        }
        if !(self.camera.fov > 0.0 && self.camera.fov < std::f32::consts::PI) {
            bail!("field of view {} must lie in (0, pi)", self.camera.fov);
        }
        if !self.camera.position.is_finite() || !self.camera.angle.is_finite() {
            bail!("camera pose must be finite");
        }
        if !self.angle_step_degrees.is_finite() {
            bail!("angle step must be finite");
        }
        Ok(())
    }

    pub fn viewport(&self) -> Viewport {
        Viewport::new(self.viewport.width, self.viewport.height)
    }

    pub fn camera(&self) -> CameraPose {
        CameraPose::new(self.camera.position, self.camera.angle, self.camera.fov)
    }

    pub fn march(&self) -> MarchConfig {
        MarchConfig::new(self.march.step, self.march.max_distance)
    }

    pub fn overlay(&self) -> OverlayOptions {
        OverlayOptions {
            trace_rays: self.overlay.trace_rays,
            preview_texture: self.overlay.preview_texture,
        }
    }

    pub fn sequence(&self) -> SequenceConfig {
        SequenceConfig {
            frame_count: self.frames,
            angle_step: self.angle_step_degrees.to_radians(),
            ..SequenceConfig::default()
        }
    }

    /// Inline rows, then the map file, then the demo map.
    pub fn grid(&self) -> Result<Grid, MapError> {
        match (&self.map, &self.map_file) {
            (Some(rows), _) => Grid::from_rows(rows),
            (None, Some(path)) => Grid::load(path),
            (None, None) => Ok(Grid::demo()),
        }
    }
}
