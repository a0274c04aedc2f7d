use raymancer_assets::{AtlasError, TextureAtlas};
use raymancer_common::{BufferError, CameraPose};
use raymancer_map::Grid;

/// Output image dimensions in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            width: 1024,
            height: 512,
        }
    }
}

impl Viewport {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

/// Read-only inputs shared by every frame.
#[derive(Debug, Clone, Copy)]
pub struct Scene<'a> {
    pub grid: &'a Grid,
    pub atlas: &'a TextureAtlas,
}

impl<'a> Scene<'a> {
    pub fn new(grid: &'a Grid, atlas: &'a TextureAtlas) -> Self {
        Self { grid, atlas }
    }

    /// Verify every wall material has a texture in the atlas.
    ///
    /// Rendering performs the same check lazily; this reports the first bad
    /// cell before any frame is produced.
    pub fn validate(&self) -> Result<(), RenderError> {
        let count = self.atlas.texture_count();
        for (coord, material) in self.grid.walls() {
            if material as usize >= count {
                return Err(RenderError::Material {
                    x: coord.x,
                    y: coord.y,
                    material,
                    source: AtlasError::TextureOutOfRange {
                        id: material as usize,
                        count,
                    },
                });
            }
        }
        Ok(())
    }
}

/// Errors raised while rendering a frame.
///
/// All of them point at an inconsistency between the map and the atlas or at
/// a bad viewport; none are recoverable by retrying.
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error("screen column {column}: {source}")]
    Column {
        column: u32,
        #[source]
        source: AtlasError,
    },
    #[error("wall at ({x}, {y}) uses material {material}: {source}")]
    Material {
        x: u32,
        y: u32,
        material: u8,
        #[source]
        source: AtlasError,
    },
    #[error(transparent)]
    Atlas(#[from] AtlasError),
    #[error(transparent)]
    Buffer(#[from] BufferError),
}

/// Renderer-agnostic interface. Every image product implements this trait.
///
/// A renderer reads the scene and one camera pose and produces output. It
/// never mutates either.
pub trait Renderer {
    /// The output type produced by this renderer.
    type Output;

    /// Render one image of the scene from the given pose.
    fn render(&self, scene: &Scene<'_>, camera: &CameraPose) -> Self::Output;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn viewport_default() {
        let v = Viewport::default();
        assert_eq!((v.width, v.height), (1024, 512));
    }

    #[test]
    fn validate_reports_first_bad_wall() {
        let grid = Grid::from_rows(&["0 ", " 3"]).unwrap();
        let atlas = TextureAtlas::from_packed(1, 2, vec![0; 2]).unwrap();
        let err = Scene::new(&grid, &atlas).validate().unwrap_err();
        match err {
            RenderError::Material { x, y, material, .. } => {
                assert_eq!((x, y, material), (1, 1, 3));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn validate_accepts_consistent_scene() {
        let grid = Grid::demo();
        let atlas = TextureAtlas::from_packed(1, 6, vec![0; 6]).unwrap();
        assert!(Scene::new(&grid, &atlas).validate().is_ok());
    }
}
