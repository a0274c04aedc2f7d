mod commands;
mod scene;

use std::path::PathBuf;

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use raymancer_persist::MANIFEST_FILE;

use crate::scene::SceneConfig;

#[derive(Parser)]
#[command(name = "raymancer", about = "Grid raycasting renderer that writes PPM frames")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// YAML scene file; built-in defaults are used when omitted
    #[arg(short, long, global = true)]
    scene: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print crate versions
    Info,
    /// Load the map and atlas and verify every wall has a texture
    Check {
        #[command(flatten)]
        overrides: Overrides,
    },
    /// Render the overhead map and the rotating first-person sequence
    Render {
        #[command(flatten)]
        overrides: Overrides,
        /// Write manifest.json with a SHA-256 digest per image
        #[arg(long)]
        manifest: bool,
        /// Skip the overhead map
        #[arg(long)]
        no_map: bool,
    },
    /// Re-hash the images of a previous run against its manifest.json
    Verify {
        /// Output directory of the run
        #[arg(default_value = ".")]
        dir: PathBuf,
    },
}

/// Flags that take precedence over the scene file.
#[derive(Args)]
struct Overrides {
    /// Texture atlas image
    #[arg(long)]
    atlas: Option<PathBuf>,
    /// Output directory
    #[arg(long)]
    out: Option<PathBuf>,
    /// Number of first-person frames
    #[arg(long)]
    frames: Option<u32>,
    /// Ray march step, in map units
    #[arg(long)]
    step: Option<f32>,
    /// Ray march range, in map units
    #[arg(long)]
    max_distance: Option<f32>,
}

impl Overrides {
    fn apply(self, config: &mut SceneConfig) {
        if let Some(atlas) = self.atlas {
            config.atlas = atlas;
        }
        if let Some(out) = self.out {
            config.out_dir = out;
        }
        if let Some(frames) = self.frames {
            config.frames = frames;
        }
        if let Some(step) = self.step {
            config.march.step = step;
        }
        if let Some(max_distance) = self.max_distance {
            config.march.max_distance = max_distance;
        }
    }
}

fn load_config(path: Option<&PathBuf>, overrides: Overrides) -> anyhow::Result<SceneConfig> {
    let mut config = match path {
        Some(path) => SceneConfig::load(path)?,
        None => SceneConfig::default(),
    };
    overrides.apply(&mut config);
    config.validate().context("scene configuration")?;
    Ok(config)
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .init();

    match cli.command {
        Commands::Info => {
            println!("raymancer v{}", env!("CARGO_PKG_VERSION"));
            println!("common: {}", raymancer_common::crate_info());
            println!("map: {}", raymancer_map::crate_info());
            println!("assets: {}", raymancer_assets::crate_info());
            println!("render: {}", raymancer_render::crate_info());
            println!("persist: {}", raymancer_persist::crate_info());
            println!("sequence: {}", raymancer_sequence::crate_info());
        }
        Commands::Check { overrides } => {
            let config = load_config(cli.scene.as_ref(), overrides)?;
            let report = commands::check(&config)?;
            println!(
                "map: {}x{}, {} walls, highest material {}",
                report.grid_size.0,
                report.grid_size.1,
                report.walls,
                report.max_material.map_or("-".to_string(), |m| m.to_string())
            );
            println!(
                "atlas: {} textures of {}x{}",
                report.texture_count, report.texture_size, report.texture_size
            );
            println!("OK");
        }
        Commands::Render {
            overrides,
            manifest,
            no_map,
        } => {
            let mut config = load_config(cli.scene.as_ref(), overrides)?;
            config.manifest |= manifest;
            let summary = commands::render(&config, no_map)?;
            if let Some(cells) = summary.map_cells {
                println!("Overhead map: {cells} wall cells");
            }
            println!(
                "Rendered {} frames into {} ({} files), avg {:?}/frame, slowest {:?}",
                summary.frames,
                config.out_dir.display(),
                summary.written.len(),
                summary.average_frame,
                summary.slowest_frame
            );
        }
        Commands::Verify { dir } => {
            let files = commands::verify(&dir)?;
            println!("{files} files match {}", dir.join(MANIFEST_FILE).display());
        }
    }

    Ok(())
}
