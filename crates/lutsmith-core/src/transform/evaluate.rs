//! Core transform evaluation — applies the full grading chain to a single pixel.

use crate::grading::calibration::apply_calibration;
use crate::grading::curves::apply_tone_curves;
use crate::grading::hsl::{apply_grayscale, apply_hsl};
use crate::grading::sliders::{
    apply_clarity, apply_contrast, apply_dehaze, apply_exposure, apply_highlights_shadows,
    apply_temperature_tint, apply_texture, apply_whites_blacks, luminance,
};
use crate::grading::split_toning::apply_split_toning;
use crate::transform::params::ColorSettings;

/// The core function. Pure and allocation-free, safe to call from any thread.
///
/// Applies the complete grading chain to a single RGB pixel in `[0, 1]`:
/// 1. Exposure
/// 2. Whites/blacks
/// 3. Highlights/shadows (captures the tonal luminance used by later zones)
/// 4. Contrast
/// 5. Clarity
/// 6. Texture
/// 7. Dehaze
/// 8. Tone curves
/// 9. Grayscale conversion (returns early)
/// 10. HSL adjustments, vibrance and saturation
/// 11. Split toning
/// 12. Camera calibration
/// 13. Temperature/tint
/// 14. Final clamp to `[0, 1]`
pub fn evaluate_transform(rgb: [f32; 3], settings: &ColorSettings) -> [f32; 3] {
    let rgb = apply_exposure(rgb, settings.exposure);
    let rgb = apply_whites_blacks(rgb, settings.whites, settings.blacks);

    let tonal_luma = luminance(rgb);
    let rgb = apply_highlights_shadows(rgb, settings.highlights, settings.shadows);

    let rgb = apply_contrast(rgb, settings.contrast);
    let rgb = apply_clarity(rgb, settings.clarity);
    let rgb = apply_texture(rgb, settings.texture);
    let rgb = apply_dehaze(rgb, settings.dehaze);
    let rgb = apply_tone_curves(rgb, &settings.tone_curve);

    if settings.convert_to_grayscale {
        let gray = apply_grayscale(rgb, &settings.gray_mixer);
        return [gray, gray, gray];
    }

    let rgb = apply_hsl(rgb, &settings.hsl, settings.vibrance, settings.saturation);
    let rgb = apply_split_toning(rgb, &settings.split_toning, tonal_luma);
    let rgb = apply_calibration(rgb, &settings.calibration, tonal_luma);
    let rgb = apply_temperature_tint(rgb, settings.temperature, settings.tint);

    rgb.map(|c| c.clamp(0.0, 1.0))
}
