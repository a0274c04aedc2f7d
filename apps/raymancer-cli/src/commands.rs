use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::Context;

use raymancer_assets::TextureAtlas;
use raymancer_map::Grid;
use raymancer_persist::{MANIFEST_FILE, PpmDirectorySink, RunManifest};
use raymancer_render::{FirstPersonRenderer, OverheadMapRenderer, Scene};
use raymancer_sequence::FrameSequencer;

use crate::scene::SceneConfig;

/// What `check` found.
#[derive(Debug)]
pub struct CheckReport {
    pub grid_size: (u32, u32),
    pub walls: usize,
    pub max_material: Option<u8>,
    pub texture_count: usize,
    pub texture_size: usize,
}

/// What `render` wrote.
#[derive(Debug)]
pub struct RenderSummary {
    pub frames: u32,
    pub map_cells: Option<usize>,
    pub written: Vec<PathBuf>,
    pub average_frame: Duration,
    pub slowest_frame: Duration,
}

fn load_assets(config: &SceneConfig) -> anyhow::Result<(Grid, TextureAtlas)> {
    let grid = config.grid().context("map load")?;
    let atlas = TextureAtlas::load(&config.atlas)
        .with_context(|| format!("asset load: {}", config.atlas.display()))?;
    Scene::new(&grid, &atlas)
        .validate()
        .context("asset check")?;
    Ok((grid, atlas))
}

/// Load the map and atlas and make sure every wall has a texture.
pub fn check(config: &SceneConfig) -> anyhow::Result<CheckReport> {
    let (grid, atlas) = load_assets(config)?;
    Ok(CheckReport {
        grid_size: (grid.width(), grid.height()),
        walls: grid.wall_count(),
        max_material: grid.max_material(),
        texture_count: atlas.texture_count(),
        texture_size: atlas.texture_size(),
    })
}

/// Write the overhead map (unless `no_map`) and then every frame into the
/// configured output directory.
pub fn render(config: &SceneConfig, no_map: bool) -> anyhow::Result<RenderSummary> {
    let (grid, atlas) = load_assets(config)?;
    let scene = Scene::new(&grid, &atlas);

    let mut sink = PpmDirectorySink::create(&config.out_dir)
        .with_context(|| format!("encode: output directory {}", config.out_dir.display()))?;
    if config.manifest {
        sink = sink.with_manifest();
    }

    let mut sequencer =
        FrameSequencer::new(config.camera(), config.sequence()).context("render")?;

    let map_cells = if no_map {
        None
    } else {
        let map_renderer =
            OverheadMapRenderer::new(config.viewport(), config.march(), config.overlay());
        let filled = sequencer
            .emit_overhead_map(&map_renderer, &scene, &mut sink)
            .context("overhead map")?;
        tracing::info!(filled, "overhead map written");
        Some(filled)
    };

    let renderer = FirstPersonRenderer::new(config.viewport(), config.march());
    let stats = sequencer
        .run(&renderer, &scene, &mut sink)
        .context("render")?;
    let written = sink.finish().context("encode: manifest")?;

    Ok(RenderSummary {
        frames: stats.frames_rendered,
        map_cells,
        written,
        average_frame: stats.average_frame,
        slowest_frame: stats.slowest_frame,
    })
}

/// Re-hash every file listed in `<dir>/manifest.json`. Returns how many
/// files matched.
pub fn verify(dir: &Path) -> anyhow::Result<usize> {
    let manifest = RunManifest::load(dir.join(MANIFEST_FILE))
        .with_context(|| format!("manifest load: {}", dir.display()))?;
    manifest.verify(dir).context("manifest verify")?;
    Ok(manifest.entries.len())
}
