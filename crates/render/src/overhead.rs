use raymancer_common::{CameraPose, PixelBuffer, Rgba};
use raymancer_map::Cell;

use crate::raycast::{MarchConfig, RayMarch};
use crate::renderer::{RenderError, Renderer, Scene, Viewport};

/// Optional extras drawn on top of the overhead map.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OverlayOptions {
    /// Plot the empty-cell samples of every column's ray for the map pose.
    pub trace_rays: bool,
    /// Copy this whole atlas texture into the top-left corner.
    pub preview_texture: Option<u8>,
}

/// A rendered overhead map and how many wall cells were drawn on it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OverheadMap {
    pub image: PixelBuffer,
    pub filled_cells: usize,
}

/// Top-down view of the grid with a camera marker.
#[derive(Debug, Clone)]
pub struct OverheadMapRenderer {
    pub viewport: Viewport,
    /// Step and range for the ray overlay.
    pub march: MarchConfig,
    pub marker_size: u32,
    pub marker_color: u32,
    pub overlay: OverlayOptions,
}

impl Default for OverheadMapRenderer {
    fn default() -> Self {
        Self {
            viewport: Viewport::default(),
            march: MarchConfig::default(),
            marker_size: 5,
            marker_color: Rgba::WHITE.pack(),
            overlay: OverlayOptions::default(),
        }
    }
}

/// Decorative red/green ramp behind empty cells.
fn gradient(width: u32, height: u32) -> Result<PixelBuffer, RenderError> {
    Ok(PixelBuffer::from_fn(width, height, |x, y| {
        let r = (255.0 * y as f32 / height as f32) as u8;
        let g = (255.0 * x as f32 / width as f32) as u8;
        Rgba::opaque(r, g, 0).pack()
    })?)
}

impl OverheadMapRenderer {
    pub fn new(viewport: Viewport, march: MarchConfig, overlay: OverlayOptions) -> Self {
        Self {
            viewport,
            march,
            overlay,
            ..Self::default()
        }
    }

    /// Pixel size of one grid cell, `(viewport_w / W, viewport_h / H)`.
    pub fn cell_size(&self, scene: &Scene<'_>) -> (u32, u32) {
        (
            self.viewport.width / scene.grid.width(),
            self.viewport.height / scene.grid.height(),
        )
    }

    fn trace_rays(
        &self,
        scene: &Scene<'_>,
        camera: &CameraPose,
        image: &mut PixelBuffer,
        cell: (u32, u32),
    ) {
        let width = self.viewport.width;
        for column in 0..width {
            let angle = camera.ray_angle(column as f32 / width as f32);
            let samples = RayMarch::new(scene.grid, camera.position, angle, self.march)
                .take_while(|s| s.cell == Some(Cell::Empty));
            for sample in samples {
                let px = (sample.position.x * cell.0 as f32) as i64;
                let py = (sample.position.y * cell.1 as f32) as i64;
                image.set(px, py, Rgba::WHITE.pack());
            }
        }
    }
}

impl Renderer for OverheadMapRenderer {
    type Output = Result<OverheadMap, RenderError>;

    fn render(&self, scene: &Scene<'_>, camera: &CameraPose) -> Self::Output {
        let _span = tracing::info_span!("overhead_map").entered();
        let mut image = gradient(self.viewport.width, self.viewport.height)?;
        let (cell_w, cell_h) = self.cell_size(scene);

        let mut filled_cells = 0;
        for (coord, material) in scene.grid.walls() {
            let color = scene
                .atlas
                .swatch(material as usize)
                .map_err(|source| RenderError::Material {
                    x: coord.x,
                    y: coord.y,
                    material,
                    source,
                })?;
            image.fill_rect(
                coord.x as i64 * cell_w as i64,
                coord.y as i64 * cell_h as i64,
                cell_w,
                cell_h,
                color,
            );
            filled_cells += 1;
        }

        if self.overlay.trace_rays {
            self.trace_rays(scene, camera, &mut image, (cell_w, cell_h));
        }

        image.fill_rect(
            (camera.position.x * cell_w as f32) as i64,
            (camera.position.y * cell_h as f32) as i64,
            self.marker_size,
            self.marker_size,
            self.marker_color,
        );

        if let Some(id) = self.overlay.preview_texture {
            let texture = scene.atlas.texture(id as usize)?;
            for y in 0..texture.height() as i64 {
                for x in 0..texture.width() as i64 {
                    if let Some(color) = texture.get(x, y) {
                        image.set(x, y, color);
                    }
                }
            }
        }

        tracing::debug!(filled_cells, "overhead map rendered");
        Ok(OverheadMap {
            image,
            filled_cells,
        })
    }
}
