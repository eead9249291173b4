use crate::scenes::SceneKind;
use anyhow::{Context, Result};
use clap::Parser;
use prism_renderer::RenderSettings;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(author, version, about = "Multithreaded CPU ray tracer")]
pub struct Args {
    /// Demo scene to render
    #[arg(long, value_enum, default_value = "showcase")]
    pub scene: SceneKind,

    /// JSON render settings; fields it omits take the scene's defaults
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    #[arg(long)]
    pub width: Option<u32>,

    #[arg(long)]
    pub height: Option<u32>,

    /// Samples per pixel (passes in preview mode)
    #[arg(short, long)]
    pub samples: Option<u32>,

    /// Maximum bounces per camera ray
    #[arg(short, long)]
    pub depth: Option<u32>,

    /// Seed for scene generation and sampling
    #[arg(long)]
    pub seed: Option<u64>,

    /// Worker threads (defaults to one per core)
    #[arg(short, long)]
    pub threads: Option<usize>,

    /// Output image; the format follows the extension
    #[arg(short, long, default_value = "render.png")]
    pub output: PathBuf,

    /// Render one sample per pass and save the image after every pass
    #[arg(long, action)]
    pub preview: bool,
}

impl Args {
    /// Scene defaults, then the settings file, then command-line overrides.
    pub fn settings(&self) -> Result<RenderSettings> {
        let mut settings = match &self.config {
            Some(path) => {
                let text = std::fs::read_to_string(path)
                    .with_context(|| format!("Failed to read settings {}", path.display()))?;
                merge_json(self.scene.default_settings(), &text)
                    .with_context(|| format!("Failed to parse settings {}", path.display()))?
            }
            None => self.scene.default_settings(),
        };

        if let Some(width) = self.width {
            settings.image_width = width;
        }
        if let Some(height) = self.height {
            settings.image_height = height;
        }
        if let Some(samples) = self.samples {
            settings.samples_num = samples;
        }
        if let Some(depth) = self.depth {
            settings.render_depth = depth;
        }
        if self.seed.is_some() {
            settings.seed = self.seed;
        }
        Ok(settings)
    }
}

/// Overlay the fields present in `json` onto `base`.
fn merge_json(base: RenderSettings, json: &str) -> Result<RenderSettings> {
    let mut merged = serde_json::to_value(base)?;
    let overrides: serde_json::Value = serde_json::from_str(json)?;

    let (Some(target), serde_json::Value::Object(fields)) = (merged.as_object_mut(), overrides)
    else {
        anyhow::bail!("settings must be a JSON object");
    };
    target.extend(fields);

    Ok(serde_json::from_value(merged)?)
}
