//! lutsmith — turn Camera Raw XMP presets into `.cube` 3D LUTs.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use lutsmith_core::{ColorSpace, LutSize, PreviewGamma};
use tracing_subscriber::EnvFilter;

mod commands;
mod config;
mod image_loader;

use config::AppConfig;

#[derive(Parser, Debug)]
#[command(name = "lutsmith")]
#[command(author, version, about = "Convert XMP color presets into .cube 3D LUTs")]
#[command(long_about = "
Reads Lightroom / Camera Raw XMP presets and bakes their color adjustments
into .cube 3D LUTs for video and grading applications.

Examples:
  lutsmith export Moody.xmp                         # 33³ Rec709_Clean LUT
  lutsmith export *.xmp -s 65 --variant log_input -o luts/
  lutsmith export Moody.xmp --color-space log_vlog  # single V-Log LUT
  lutsmith inspect Moody.xmp --json
  lutsmith preview Moody.xmp photo.jpg -o graded.png
  lutsmith verify Moody.xmp luts/Moody_33x33x33_Rec709_Clean.cube
  lutsmith variants
")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Verbose output (debug logging)
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Number of threads (0 = auto)
    #[arg(short = 'j', long, global = true)]
    threads: Option<usize>,

    /// JSON configuration file
    #[arg(long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Write one .cube file per preset and export variant
    #[command(visible_alias = "e")]
    Export(ExportArgs),

    /// Print the settings parsed from a preset
    #[command(visible_alias = "i")]
    Inspect(InspectArgs),

    /// Render a graded preview of an image
    #[command(visible_alias = "p")]
    Preview(PreviewArgs),

    /// Check a .cube file against the preset it was generated from
    Verify(VerifyArgs),

    /// List export variants, LUT sizes and color spaces
    Variants,
}

#[derive(Args, Debug)]
struct ExportArgs {
    /// Preset file(s) (.xmp, or .json settings)
    #[arg(required = true)]
    presets: Vec<PathBuf>,

    /// LUT size per axis (17, 25, 33 or 65)
    #[arg(short, long)]
    size: Option<LutSize>,

    /// Export variant id (repeatable)
    #[arg(long = "variant", value_name = "ID")]
    variants: Vec<String>,

    /// Export a single LUT for this input color space
    #[arg(long, value_name = "ID")]
    color_space: Option<ColorSpace>,

    /// Leave out-of-range output values unclamped
    #[arg(long)]
    no_clamp: bool,

    /// Output directory
    #[arg(short, long)]
    output: Option<PathBuf>,
}

#[derive(Args, Debug)]
struct InspectArgs {
    /// Preset file (.xmp, or .json settings)
    preset: PathBuf,

    /// Print the full settings as JSON
    #[arg(long)]
    json: bool,
}

#[derive(Args, Debug)]
struct PreviewArgs {
    /// Preset file (.xmp, or .json settings)
    preset: PathBuf,

    /// Input image
    image: PathBuf,

    /// Output image
    #[arg(short, long)]
    output: PathBuf,

    /// Encoding of the image pixels (linear, srgb, rec709)
    #[arg(short, long)]
    gamma: Option<PreviewGamma>,

    /// Rows graded per batch
    #[arg(long, default_value = "64")]
    batch_rows: u32,
}

#[derive(Args, Debug)]
struct VerifyArgs {
    /// Preset file (.xmp, or .json settings)
    preset: PathBuf,

    /// .cube file to check
    cube: PathBuf,

    /// Input color space the LUT was generated for
    #[arg(long, default_value = "rec709")]
    color_space: ColorSpace,

    /// Largest allowed per-channel difference
    #[arg(long, default_value = "0.00001")]
    tolerance: f32,
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config = AppConfig::load(cli.config.as_deref())?;

    // Configure thread pool
    let threads = cli.threads.unwrap_or(config.threads);
    if threads > 0 {
        rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .build_global()
            .context("Failed to configure thread pool")?;
    }

    match cli.command {
        Commands::Export(args) => commands::export::run(args, &config),
        Commands::Inspect(args) => commands::inspect::run(args),
        Commands::Preview(args) => commands::preview::run(args, &config),
        Commands::Verify(args) => commands::verify::run(args),
        Commands::Variants => commands::variants::run(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_export_flags() {
        let cli = Cli::try_parse_from([
            "lutsmith", "-v", "export", "a.xmp", "b.xmp", "-s", "65", "--variant", "log_input",
            "--variant", "wide_gamut", "--no-clamp", "-o", "out",
        ])
        .expect("valid arguments");
        assert!(cli.verbose);
        let Commands::Export(args) = cli.command else {
            panic!("expected export");
        };
        assert_eq!(args.presets.len(), 2);
        assert_eq!(args.size, Some(LutSize::Size65));
        assert_eq!(args.variants, ["log_input", "wide_gamut"]);
        assert!(args.no_clamp);
        assert_eq!(args.output, Some(PathBuf::from("out")));
        assert!(args.color_space.is_none());
    }

    #[test]
    fn test_rejects_unsupported_size() {
        assert!(Cli::try_parse_from(["lutsmith", "export", "a.xmp", "-s", "32"]).is_err());
    }

    #[test]
    fn test_rejects_unknown_color_space() {
        let err = Cli::try_parse_from(["lutsmith", "export", "a.xmp", "--color-space", "aces"]);
        assert!(err.is_err());
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from([
            "lutsmith", "preview", "p.xmp", "in.png", "-o", "out.png", "-g", "linear", "-j", "4",
            "--config", "lutsmith.json",
        ])
        .expect("valid arguments");
        assert_eq!(cli.threads, Some(4));
        assert_eq!(cli.config, Some(PathBuf::from("lutsmith.json")));
        let Commands::Preview(args) = cli.command else {
            panic!("expected preview");
        };
        assert_eq!(args.gamma, Some(PreviewGamma::Linear));
        assert_eq!(args.batch_rows, 64);
    }
}
