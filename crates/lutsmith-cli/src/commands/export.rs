//! LUT export command

use std::fs;

use anyhow::{Context, Result, bail};
use lutsmith_core::ExportSession;
use tracing::{debug, info};

use crate::ExportArgs;
use crate::config::AppConfig;

pub fn run(args: ExportArgs, config: &AppConfig) -> Result<()> {
    let mut export = config.export;
    if let Some(size) = args.size {
        export.size = size;
    }
    if let Some(space) = args.color_space {
        export.color_space = space;
    }
    if args.no_clamp {
        export.clamp = false;
    }

    // An explicit color space alone means a single LUT for that space.
    let variants: &[String] = if !args.variants.is_empty() {
        &args.variants
    } else if args.color_space.is_some() {
        &[]
    } else {
        &config.variants
    };
    if variants.is_empty() && args.color_space.is_none() {
        bail!("No export variants selected");
    }

    let output_dir = args.output.as_deref().unwrap_or(&config.output_dir);
    fs::create_dir_all(output_dir)
        .with_context(|| format!("Failed to create output directory: {}", output_dir.display()))?;

    let mut written = 0usize;
    for path in &args.presets {
        let preset = super::load_preset(path)?;
        let name = super::preset_file_name(path);
        debug!(preset = %name, display_name = ?preset.name, "loaded preset");

        let mut session = ExportSession::new(name, preset.settings).with_config(export);
        session.select_variants(variants)?;

        let mut files = session.export()?;
        if args.color_space.is_some() {
            files.push(session.export_config()?);
        }

        for file in files {
            let out = output_dir.join(&file.filename);
            fs::write(&out, &file.contents)
                .with_context(|| format!("Failed to write: {}", out.display()))?;
            info!("Wrote {}", out.display());
            written += 1;
        }
    }

    info!(
        "Exported {written} LUT file(s) at {} ({} nodes each)",
        export.size.label(),
        export.size.node_count()
    );
    Ok(())
}
