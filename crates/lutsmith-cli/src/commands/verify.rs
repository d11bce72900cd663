//! LUT verification command

use anyhow::{Context, Result, bail};
use lutsmith_core::Lut3D;
use tracing::info;

use crate::VerifyArgs;

pub fn run(args: VerifyArgs) -> Result<()> {
    let preset = super::load_preset(&args.preset)?;
    let lut = Lut3D::load_cube(&args.cube)
        .with_context(|| format!("Failed to load LUT: {}", args.cube.display()))?;

    let reference = Lut3D::bake(lut.size, &preset.settings, args.color_space, true);
    let max_error = max_difference(&lut, &reference);

    info!(
        "{}: {}³ nodes, max difference {max_error:.2e}",
        args.cube.display(),
        lut.size
    );
    if max_error > args.tolerance {
        bail!(
            "LUT differs from preset by {max_error:.6} (tolerance {})",
            args.tolerance
        );
    }
    Ok(())
}

/// Largest per-channel difference between two LUTs of the same size.
pub fn max_difference(a: &Lut3D, b: &Lut3D) -> f32 {
    a.data
        .iter()
        .zip(&b.data)
        .flat_map(|(x, y)| (0..3).map(move |ch| (x[ch] - y[ch]).abs()))
        .fold(0.0, f32::max)
}
