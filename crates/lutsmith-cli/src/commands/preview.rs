//! Preview rendering command

use anyhow::{Context, Result};
use lutsmith_core::PreviewJob;
use tracing::{debug, info};

use crate::PreviewArgs;
use crate::config::AppConfig;
use crate::image_loader::{load_image, save_image};

pub fn run(args: PreviewArgs, config: &AppConfig) -> Result<()> {
    let preset = super::load_preset(&args.preset)?;
    let image = load_image(&args.image)
        .with_context(|| format!("Failed to load: {}", args.image.display()))?;
    let gamma = args.gamma.unwrap_or(config.export.preview_gamma);

    info!(
        "Grading {} ({}x{}, {}, {gamma})",
        args.image.display(),
        image.width,
        image.height,
        image.source_bit_depth
    );

    let mut job = PreviewJob::new(&image, &preset.settings, gamma);
    while !job.step(args.batch_rows) {
        debug!(progress = job.progress(), "preview batch");
    }
    let graded = job.finish();

    save_image(&args.output, &graded)
        .with_context(|| format!("Failed to save: {}", args.output.display()))?;
    info!("Wrote {}", args.output.display());
    Ok(())
}
