//! `lumen` - render one of the built-in scenes to a `.ppm` file.

mod scenes;

use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use clap::Parser;
use lumen_core::ImageBuffer;
use lumen_renderer::{render, RenderSettings};
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::scenes::SceneKind;

/// Command-line options.
#[derive(Parser, Debug)]
#[command(author, version, about = "Monte Carlo path tracer", long_about = None)]
struct Options {
    /// Output image path; the extension is replaced with `.ppm`.
    #[arg(default_value = "scene")]
    output: PathBuf,

    /// Scene to render.
    #[arg(long, value_enum, default_value_t = SceneKind::Final)]
    scene: SceneKind,

    /// JSON render settings replacing the scene defaults.
    #[arg(long, value_name = "FILE")]
    settings: Option<PathBuf>,

    #[arg(long, value_name = "NUM")]
    samples: Option<u32>,

    /// Maximum bounce depth.
    #[arg(long, value_name = "NUM")]
    depth: Option<u32>,

    /// Master random seed.
    #[arg(long)]
    seed: Option<u64>,

    /// Render workers (defaults to the processor count).
    #[arg(long, value_name = "NUM")]
    workers: Option<usize>,

    #[arg(long)]
    width: Option<u32>,

    #[arg(long)]
    height: Option<u32>,

    /// Image used by the image-textured scenes.
    #[arg(long, value_name = "FILE")]
    texture: Option<PathBuf>,

    /// Also write a `.bmp` next to the `.ppm`.
    #[arg(long)]
    bmp: bool,
}

/// Scene defaults, then the settings file, then individual flags.
fn resolve_settings(options: &Options, scene: &scenes::Scene) -> Result<RenderSettings> {
    let mut settings = match &options.settings {
        Some(path) => {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("reading settings {}", path.display()))?;
            serde_json::from_str(&text)
                .with_context(|| format!("parsing settings {}", path.display()))?
        }
        None => RenderSettings {
            samples_per_pixel: scene.samples_per_pixel,
            max_depth: scene.max_depth,
            background: scene.background,
            ..Default::default()
        },
    };

    if let Some(samples) = options.samples {
        settings.samples_per_pixel = samples;
    }
    if let Some(depth) = options.depth {
        settings.max_depth = depth;
    }
    if let Some(seed) = options.seed {
        settings.seed = seed;
    }
    if options.workers.is_some() {
        settings.workers = options.workers;
    }
    Ok(settings)
}

/// Human-readable duration: seconds below a minute, minutes below an hour.
fn format_duration(elapsed: Duration) -> String {
    let secs = elapsed.as_secs_f64();
    if secs < 60.0 {
        format!("{:.2} seconds", secs)
    } else if secs < 3600.0 {
        format!("{:.2} minutes", secs / 60.0)
    } else {
        format!("{:.2} hours", secs / 3600.0)
    }
}

fn output_paths(output: &Path) -> (PathBuf, PathBuf) {
    (output.with_extension("ppm"), output.with_extension("bmp"))
}

fn main() -> Result<()> {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .init();

    let options = Options::parse();
    log::info!("Starting lumen");

    // Scene layout follows the seed too
    let scene_seed = options.seed.unwrap_or_default();
    let mut rng = StdRng::seed_from_u64(scene_seed);
    let scene = scenes::build(options.scene, options.texture.as_deref(), &mut rng)?;
    let settings = resolve_settings(&options, &scene)?;

    let mut camera = scene.camera;
    if options.width.is_some() || options.height.is_some() {
        let width = options.width.unwrap_or(camera.image_width);
        let height = options.height.unwrap_or(camera.image_height);
        camera = camera.with_resolution(width, height);
    }
    camera.initialize()?;

    let start = Instant::now();
    let image = render(&camera, scene.world.as_ref(), &settings)?;
    log::info!("Render time: {}", format_duration(start.elapsed()));

    write_outputs(&image, &options.output, options.bmp)
}

/// Write the `.ppm` and, when asked, the `.bmp` beside it.
fn write_outputs(image: &ImageBuffer, output: &Path, bmp: bool) -> Result<()> {
    let (ppm_path, bmp_path) = output_paths(output);
    image.save_ppm(&ppm_path).map_err(|e| {
        log::error!("Failed to write {}: {}", ppm_path.display(), e);
        anyhow::Error::new(e).context(format!("writing {}", ppm_path.display()))
    })?;

    if bmp {
        lumen_core::convert_ppm_to_bmp(&ppm_path, &bmp_path).map_err(|e| {
            log::error!("Failed to write {}: {}", bmp_path.display(), e);
            anyhow::Error::new(e).context(format!("writing {}", bmp_path.display()))
        })?;
    }

    Ok(())
}
