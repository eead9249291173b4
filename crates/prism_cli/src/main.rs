use anyhow::{Context, Result};
use clap::Parser;
use prism_renderer::{Accumulator, ImageBuffer, RenderError, Renderer, Scene};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

mod cli;
mod scenes;

use cli::Args;

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    log::info!("Starting prism");

    if let Some(threads) = args.threads {
        rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .build_global()
            .context("Failed to build worker pool")?;
    }

    let settings = args.settings()?;
    let scene_seed = settings.seed.unwrap_or_else(|| rand::thread_rng().gen());
    let scene = args
        .scene
        .build(&mut StdRng::seed_from_u64(scene_seed))
        .context("Failed to build scene")?;
    let renderer = Renderer::from_settings(&settings).context("Invalid render settings")?;

    let cancel = Arc::new(AtomicBool::new(false));
    {
        let handler_cancel = cancel.clone();
        ctrlc::set_handler(move || {
            log::warn!("Interrupted, stopping after the current rows");
            handler_cancel.store(true, Ordering::Relaxed);
        })
        .context("Failed to install Ctrl-C handler")?;
    }

    if args.preview {
        render_progressive(&renderer, &scene, &args.output, &cancel)
    } else {
        render_once(&renderer, &scene, &args.output, &cancel)
    }
}

/// Full-quality render, saved once when every pixel is done.
fn render_once(
    renderer: &Renderer,
    scene: &Scene,
    output: &Path,
    cancel: &AtomicBool,
) -> Result<()> {
    let mut image = ImageBuffer::new(renderer.image_width(), renderer.image_height());
    let stats = renderer.render_with_cancel(scene, &mut image, cancel)?;

    log::info!(
        "Traced {} camera rays in {:.2?}",
        stats.primary_rays(),
        stats.elapsed
    );
    save_image(&image, output)
}

/// One sample per pass, re-saving the running average after every pass.
fn render_progressive(
    renderer: &Renderer,
    scene: &Scene,
    output: &Path,
    cancel: &AtomicBool,
) -> Result<()> {
    let mut acc = Accumulator::new(renderer.image_width(), renderer.image_height());
    let mut image = ImageBuffer::new(renderer.image_width(), renderer.image_height());

    for pass in 0..renderer.samples_num {
        match renderer.accumulate(scene, &mut acc, 1, pass as u64, cancel) {
            Ok(_) => {}
            Err(RenderError::Cancelled { .. }) => {
                log::info!("Stopped after {} passes", acc.samples());
                return Ok(());
            }
            Err(err) => return Err(err.into()),
        }

        acc.resolve(&mut image);
        save_image(&image, output)?;
        log::info!("Pass {}/{} saved", acc.samples(), renderer.samples_num);
    }

    Ok(())
}

fn save_image(image: &ImageBuffer, path: &Path) -> Result<()> {
    let rgb = image::RgbImage::from_raw(image.width, image.height, image.to_rgb_bytes())
        .context("Image buffer does not match its dimensions")?;
    rgb.save(path)
        .with_context(|| format!("Failed to save {}", path.display()))?;
    log::info!("Saved {}", path.display());
    Ok(())
}
