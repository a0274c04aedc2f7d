use raymancer_common::{CameraPose, PixelBuffer, Rgba};

use crate::projector::project;
use crate::raycast::{MarchConfig, RayCast, cast};
use crate::renderer::{RenderError, Renderer, Scene, Viewport};

/// First-person view: one cast ray and one textured strip per screen column.
#[derive(Debug, Clone)]
pub struct FirstPersonRenderer {
    pub viewport: Viewport,
    pub march: MarchConfig,
    /// Color every frame is cleared to before compositing.
    pub background: u32,
}

impl Default for FirstPersonRenderer {
    fn default() -> Self {
        Self {
            viewport: Viewport::default(),
            march: MarchConfig::default(),
            background: Rgba::WHITE.pack(),
        }
    }
}

impl FirstPersonRenderer {
    pub fn new(viewport: Viewport, march: MarchConfig) -> Self {
        Self {
            viewport,
            march,
            ..Self::default()
        }
    }

    /// Render into an existing buffer of the viewport's size.
    ///
    /// The buffer is cleared first, so nothing carries over from a previous frame.
    pub fn render_into(
        &self,
        scene: &Scene<'_>,
        camera: &CameraPose,
        frame: &mut PixelBuffer,
    ) -> Result<(), RenderError> {
        frame.clear(self.background);

        let width = self.viewport.width;
        let texture_size = scene.atlas.texture_size();
        let mut hits = 0u32;

        for column in 0..width {
            let fraction = column as f32 / width as f32;
            let RayCast::Hit(hit) = cast(scene.grid, camera, fraction, &self.march, texture_size)
            else {
                continue;
            };
            hits += 1;

            let angle = camera.ray_angle(fraction);
            let strip = project(&hit, camera, angle, self.viewport.height, scene.atlas)
                .map_err(|source| RenderError::Column { column, source })?;
            frame.blit_column(column as i64, strip.start_y, &strip.colors);
        }

        tracing::trace!(hits, misses = width - hits, "first-person frame composited");
        Ok(())
    }
}

impl Renderer for FirstPersonRenderer {
    type Output = Result<PixelBuffer, RenderError>;

    fn render(&self, scene: &Scene<'_>, camera: &CameraPose) -> Self::Output {
        let mut frame = PixelBuffer::new(self.viewport.width, self.viewport.height, self.background)?;
        self.render_into(scene, camera, &mut frame)?;
        Ok(frame)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec2;
    use raymancer_assets::TextureAtlas;
    use raymancer_map::Grid;

    fn red_atlas() -> TextureAtlas {
        TextureAtlas::from_packed(2, 1, vec![Rgba::opaque(200, 0, 0).pack(); 4]).unwrap()
    }

    fn corridor() -> Grid {
        Grid::from_rows(&["00000000", "0      0", "0      0", "00000000"]).unwrap()
    }

    #[test]
    fn every_column_gets_a_wall_in_a_closed_room() {
        let grid = corridor();
        let atlas = red_atlas();
        let renderer = FirstPersonRenderer::new(Viewport::new(32, 32), MarchConfig::default());
        let cam = CameraPose::new(Vec2::new(2.0, 2.0), 0.0, std::f32::consts::FRAC_PI_3);
        let frame = renderer.render(&Scene::new(&grid, &atlas), &cam).unwrap();

        let red = Rgba::opaque(200, 0, 0).pack();
        for x in 0..32 {
            assert_eq!(frame.get(x, 16), Some(red), "column {x} has no wall at the horizon");
        }
    }

    #[test]
    fn missed_columns_keep_background() {
        let grid = Grid::from_literal(8, 8, &" ".repeat(64)).unwrap();
        let atlas = red_atlas();
        let renderer = FirstPersonRenderer::new(Viewport::new(16, 8), MarchConfig::default());
        let frame = renderer
            .render(&Scene::new(&grid, &atlas), &CameraPose::new(Vec2::splat(4.0), 0.0, 1.0))
            .unwrap();
        assert!(frame.pixels().iter().all(|&p| p == Rgba::WHITE.pack()));
    }

    #[test]
    fn close_walls_are_clipped_not_wrapped() {
        let grid = corridor();
        let atlas = red_atlas();
        let renderer = FirstPersonRenderer::new(Viewport::new(8, 16), MarchConfig::default());
        // Right against the east wall: strips are far taller than the viewport.
        let cam = CameraPose::new(Vec2::new(6.95, 2.0), 0.0, 0.2);
        let frame = renderer.render(&Scene::new(&grid, &atlas), &cam).unwrap();
        let red = Rgba::opaque(200, 0, 0).pack();
        assert!(frame.pixels().iter().all(|&p| p == red));
    }

    #[test]
    fn render_into_clears_previous_frame() {
        let grid = Grid::from_literal(8, 8, &" ".repeat(64)).unwrap();
        let atlas = red_atlas();
        let renderer = FirstPersonRenderer::new(Viewport::new(4, 4), MarchConfig::default());
        let mut frame = PixelBuffer::new(4, 4, 7).unwrap();
        renderer
            .render_into(
                &Scene::new(&grid, &atlas),
                &CameraPose::new(Vec2::splat(4.0), 0.0, 1.0),
                &mut frame,
            )
            .unwrap();
        assert!(frame.pixels().iter().all(|&p| p == renderer.background));
    }

    #[test]
    fn unknown_material_fails_the_frame() {
        let grid = Grid::from_rows(&["33333", "3   3", "33333"]).unwrap();
        let atlas = red_atlas();
        let renderer = FirstPersonRenderer::new(Viewport::new(4, 4), MarchConfig::default());
        let cam = CameraPose::new(Vec2::new(2.0, 1.5), 0.0, 0.5);
        let err = renderer.render(&Scene::new(&grid, &atlas), &cam).unwrap_err();
        assert!(matches!(err, RenderError::Column { column: 0, .. }));
    }

    #[test]
    fn rendering_is_deterministic() {
        let grid = Grid::demo();
        let atlas = TextureAtlas::from_packed(2, 6, (0..24).collect()).unwrap();
        let renderer = FirstPersonRenderer::new(Viewport::new(64, 32), MarchConfig::default());
        let scene = Scene::new(&grid, &atlas);
        let cam = CameraPose::default();
        assert_eq!(
            renderer.render(&scene, &cam).unwrap(),
            renderer.render(&scene, &cam).unwrap()
        );
    }
}
