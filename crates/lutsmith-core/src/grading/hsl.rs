//! HSL conversions, hue-channel weighting, per-channel HSL adjustments and
//! the gray mixer.
//!
//! Hue is expressed as a fraction of the wheel in `[0, 1)` throughout this
//! module; preset hue values in degrees are divided by 360 at the call site.

use crate::grading::sliders::{apply_vibrance_saturation, luminance};
use crate::transform::params::{HslAdjustments, HueChannel, HueChannels};

/// Luminance shift applied by a full ±100 HSL luminance slider.
const LUMINANCE_SCALE: f32 = 0.3;

/// Gray mixer contribution scale.
const GRAY_MIXER_SCALE: f32 = 0.5;

/// Center and half-width of each hue channel, in degrees.
const CHANNEL_RANGES: [(HueChannel, f32, f32); 8] = [
    (HueChannel::Red, 0.0, 30.0),
    (HueChannel::Orange, 30.0, 30.0),
    (HueChannel::Yellow, 60.0, 30.0),
    (HueChannel::Green, 120.0, 60.0),
    (HueChannel::Aqua, 180.0, 30.0),
    (HueChannel::Blue, 220.0, 40.0),
    (HueChannel::Purple, 270.0, 30.0),
    (HueChannel::Magenta, 310.0, 50.0),
];

/// Convert RGB to HSL (hue as a wheel fraction, saturation and lightness in 0..1).
pub fn rgb_to_hsl(rgb: [f32; 3]) -> (f32, f32, f32) {
    let [r, g, b] = rgb;

    let max = r.max(g).max(b);
    let min = r.min(g).min(b);
    let lum = (max + min) * 0.5;

    if max == min {
        return (0.0, 0.0, lum);
    }

    let delta = max - min;
    let sat = if lum > 0.5 {
        delta / (2.0 - max - min)
    } else {
        delta / (max + min)
    };

    let hue = if max == r {
        (g - b) / delta + if g < b { 6.0 } else { 0.0 }
    } else if max == g {
        (b - r) / delta + 2.0
    } else {
        (r - g) / delta + 4.0
    };

    (hue / 6.0, sat, lum)
}

/// Convert HSL (hue as a wheel fraction) to RGB.
pub fn hsl_to_rgb(hue: f32, sat: f32, lum: f32) -> [f32; 3] {
    if sat == 0.0 {
        return [lum, lum, lum];
    }

    let q = if lum < 0.5 {
        lum * (1.0 + sat)
    } else {
        lum + sat - lum * sat
    };
    let p = 2.0 * lum - q;

    [
        hue_to_rgb(p, q, hue + 1.0 / 3.0),
        hue_to_rgb(p, q, hue),
        hue_to_rgb(p, q, hue - 1.0 / 3.0),
    ]
}

fn hue_to_rgb(p: f32, q: f32, mut t: f32) -> f32 {
    if t < 0.0 {
        t += 1.0;
    }
    if t > 1.0 {
        t -= 1.0;
    }
    if t < 1.0 / 6.0 {
        p + (q - p) * 6.0 * t
    } else if t < 1.0 / 2.0 {
        q
    } else if t < 2.0 / 3.0 {
        p + (q - p) * (2.0 / 3.0 - t) * 6.0
    } else {
        p
    }
}

/// Weight of each hue channel for a hue in `[0, 1)`, in [`HueChannel::ALL`]
/// order.
///
/// Each channel contributes `1 − distance / half_width` inside its range,
/// with circular distance on the hue wheel. Weights are normalized to sum
/// to 1 unless all of them are zero.
pub fn hue_channel_weights(hue: f32) -> [f32; 8] {
    let mut weights = [0.0_f32; 8];
    for (channel, center, half_width) in CHANNEL_RANGES {
        let center = center / 360.0;
        let range = half_width / 360.0;
        let mut distance = (hue - center).abs();
        if distance > 0.5 {
            distance = 1.0 - distance;
        }
        if distance < range {
            weights[channel.index()] = 1.0 - distance / range;
        }
    }

    let total: f32 = weights.iter().sum();
    if total > 0.0 {
        for w in &mut weights {
            *w /= total;
        }
    }
    weights
}

/// Weighted sum of per-channel values.
fn weighted(weights: &[f32; 8], values: &HueChannels) -> f32 {
    HueChannel::ALL
        .iter()
        .map(|&c| weights[c.index()] * values.get(c))
        .sum()
}

/// Convert to a single gray value using the gray mixer.
///
/// The mixer reweights the Rec. 709 luminance by the pixel's hue channel,
/// scaled by its saturation so neutral pixels are unaffected.
///
/// ```text
/// gray = clamp(L + 0.5 × Σ weight[c] × mixer[c]/100 × s)
/// ```
pub fn apply_grayscale(rgb: [f32; 3], mixer: &HueChannels) -> f32 {
    let (hue, sat, _) = rgb_to_hsl(rgb);
    let weights = hue_channel_weights(hue);
    let base = luminance(rgb);
    let adjustment = weighted(&weights, mixer) / 100.0 * sat;
    (base + adjustment * GRAY_MIXER_SCALE).clamp(0.0, 1.0)
}

/// Per-channel HSL adjustments followed by vibrance and saturation.
///
/// Input is clamped to `[0, 1]` before conversion. Hue channel weights are
/// taken from the input hue and shared by all three adjustments.
///
/// ```text
/// h' = (h + Σ w × hue[c]/360) mod 1
/// s' = s × max(0, 1 + Σ w × sat[c]/100)
/// l' = clamp(l + Σ w × lum[c]/100 × 0.3)
/// ```
pub fn apply_hsl(rgb: [f32; 3], hsl: &HslAdjustments, vibrance: f32, saturation: f32) -> [f32; 3] {
    let clamped = rgb.map(|c| c.clamp(0.0, 1.0));
    let (hue, sat, lum) = rgb_to_hsl(clamped);
    let weights = hue_channel_weights(hue);

    let hue_shift = weighted(&weights, &hsl.hue) / 360.0;
    let hue = (hue + hue_shift + 1.0).rem_euclid(1.0);

    let sat_mult = 1.0 + weighted(&weights, &hsl.saturation) / 100.0;
    let sat = sat * sat_mult.max(0.0);

    let lum_shift = weighted(&weights, &hsl.luminance) / 100.0 * LUMINANCE_SCALE;
    let lum = (lum + lum_shift).clamp(0.0, 1.0);

    let sat = apply_vibrance_saturation(sat, vibrance, saturation);
    hsl_to_rgb(hue, sat, lum)
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f32 = 1e-5;

    #[test]
    fn test_hsl_roundtrip_preserves_values() {
        let original = [0.8, 0.4, 0.2];
        let (h, s, l) = rgb_to_hsl(original);
        let back = hsl_to_rgb(h, s, l);
        for i in 0..3 {
            assert!(
                (original[i] - back[i]).abs() < 0.001,
                "channel {i}: {:.6} vs {:.6}",
                original[i],
                back[i]
            );
        }
    }

    #[test]
    fn test_hsl_gray_has_zero_saturation() {
        let (_, s, _) = rgb_to_hsl([0.5, 0.5, 0.5]);
        assert!(s.abs() < EPSILON);
    }

    #[test]
    fn test_primary_hues() {
        assert!(rgb_to_hsl([1.0, 0.0, 0.0]).0.abs() < EPSILON);
        assert!((rgb_to_hsl([0.0, 1.0, 0.0]).0 - 1.0 / 3.0).abs() < EPSILON);
        assert!((rgb_to_hsl([0.0, 0.0, 1.0]).0 - 2.0 / 3.0).abs() < EPSILON);
        assert!((rgb_to_hsl([1.0, 0.0, 0.5]).0 - 11.0 / 12.0).abs() < EPSILON);
    }

    #[test]
    fn test_hue_weights_sum_to_one_everywhere() {
        for deg in 0..360 {
            for frac in [0.0, 0.25, 0.5, 0.75] {
                let hue = (deg as f32 + frac) / 360.0;
                let total: f32 = hue_channel_weights(hue).iter().sum();
                assert!(
                    (total - 1.0).abs() < 1e-4,
                    "weights at {:.2}° sum to {total}",
                    deg as f32 + frac
                );
            }
        }
    }

    #[test]
    fn test_hue_weights_at_channel_centers() {
        let weights = hue_channel_weights(0.0);
        assert!((weights[HueChannel::Red.index()] - 1.0).abs() < EPSILON);
        let weights = hue_channel_weights(120.0 / 360.0);
        assert!((weights[HueChannel::Green.index()] - 1.0).abs() < EPSILON);
    }

    #[test]
    fn test_red_wraps_around_the_wheel() {
        let weights = hue_channel_weights(350.0 / 360.0);
        assert!(weights[HueChannel::Red.index()] > 0.0);
        assert!(weights[HueChannel::Magenta.index()] > 0.0);
    }

    #[test]
    fn test_grayscale_without_mixer_is_luminance() {
        let gray = apply_grayscale([1.0, 0.0, 0.0], &HueChannels::default());
        assert!((gray - 0.2126).abs() < EPSILON);
    }

    #[test]
    fn test_gray_mixer_brightens_matching_hue() {
        let mixer = HueChannels {
            red: 100.0,
            ..Default::default()
        };
        let gray = apply_grayscale([1.0, 0.0, 0.0], &mixer);
        // 0.2126 + 1.0 × 1.0 × 1.0 × 0.5
        assert!((gray - 0.7126).abs() < EPSILON);

        let blue = apply_grayscale([0.0, 0.0, 1.0], &mixer);
        assert!((blue - 0.0722).abs() < EPSILON);
    }

    #[test]
    fn test_hsl_neutral_is_identity() {
        let rgb = [0.3, 0.6, 0.45];
        let out = apply_hsl(rgb, &HslAdjustments::default(), 0.0, 0.0);
        for i in 0..3 {
            assert!((out[i] - rgb[i]).abs() < 1e-4);
        }
    }

    #[test]
    fn test_hsl_saturation_minus_100_desaturates_channel() {
        let mut hsl = HslAdjustments::default();
        hsl.saturation.red = -100.0;
        let out = apply_hsl([0.8, 0.2, 0.2], &hsl, 0.0, 0.0);
        assert!((out[0] - out[1]).abs() < EPSILON);
        assert!((out[1] - out[2]).abs() < EPSILON);
    }

    #[test]
    fn test_hsl_hue_shift_rotates_red_toward_orange() {
        let mut hsl = HslAdjustments::default();
        hsl.hue.red = 30.0;
        let out = apply_hsl([1.0, 0.0, 0.0], &hsl, 0.0, 0.0);
        let (h, _, _) = rgb_to_hsl(out);
        assert!((h - 30.0 / 360.0).abs() < 1e-4);
    }

    #[test]
    fn test_hsl_luminance_shift() {
        let mut hsl = HslAdjustments::default();
        hsl.luminance.blue = 100.0;
        let out = apply_hsl([0.0, 0.0, 0.6], &hsl, 0.0, 0.0);
        let (_, _, l) = rgb_to_hsl(out);
        assert!((l - 0.6).abs() < 1e-4);
    }
}
