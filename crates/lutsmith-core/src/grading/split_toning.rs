//! Split toning / three-way color grading.
//!
//! Each tonal zone (shadows, midtones, highlights) adds a tint of its hue,
//! weighted by how strongly the pixel belongs to that zone:
//!
//! ```text
//!   shadow_weight    = (1 − L)²
//!   midtone_weight   = 1 − 2 × |L − 0.5|
//!   highlight_weight = L²
//!
//!   zone_rgb = hsl_to_rgb(hue / 360, 1, 0.5)
//!   strength = sat/100 × weight × 0.2
//!   out     += (zone_rgb − 0.5) × strength
//! ```
//!
//! `L` is the tonal luminance captured before the tone curve, so the zones
//! follow the exposure-adjusted image rather than the curved one.

use crate::grading::hsl::hsl_to_rgb;
use crate::transform::params::{SplitToning, ToneZone};

/// Tint strength of a zone at full saturation and full weight.
const ZONE_STRENGTH: f32 = 0.2;

/// Shadow membership for a tonal luminance.
pub fn shadow_weight(luma: f32) -> f32 {
    (1.0 - luma) * (1.0 - luma)
}

/// Highlight membership for a tonal luminance.
pub fn highlight_weight(luma: f32) -> f32 {
    luma * luma
}

/// Midtone membership for a tonal luminance, peaking at 0.5.
pub fn midtone_weight(luma: f32) -> f32 {
    1.0 - (luma - 0.5).abs() * 2.0
}

fn tint_zone(rgb: [f32; 3], zone: &ToneZone, weight: f32) -> [f32; 3] {
    if zone.saturation <= 0.0 {
        return rgb;
    }
    let strength = (zone.saturation / 100.0) * weight * ZONE_STRENGTH;
    let tint = hsl_to_rgb(zone.hue / 360.0, 1.0, 0.5);
    [
        rgb[0] + (tint[0] - 0.5) * strength,
        rgb[1] + (tint[1] - 0.5) * strength,
        rgb[2] + (tint[2] - 0.5) * strength,
    ]
}

/// Apply shadow, highlight and midtone tints in that order.
///
/// Zones with zero saturation are skipped.
pub fn apply_split_toning(rgb: [f32; 3], split: &SplitToning, tonal_luma: f32) -> [f32; 3] {
    let rgb = tint_zone(rgb, &split.shadow, shadow_weight(tonal_luma));
    let rgb = tint_zone(rgb, &split.highlight, highlight_weight(tonal_luma));
    tint_zone(rgb, &split.midtone, midtone_weight(tonal_luma))
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f32 = 1e-5;

    #[test]
    fn test_zero_saturation_is_identity() {
        let rgb = [0.2, 0.4, 0.6];
        let split = SplitToning {
            shadow: ToneZone {
                hue: 200.0,
                saturation: 0.0,
                luminance: 0.0,
            },
            ..Default::default()
        };
        assert_eq!(apply_split_toning(rgb, &split, 0.3), rgb);
    }

    #[test]
    fn test_red_shadow_tint_on_black() {
        let split = SplitToning {
            shadow: ToneZone {
                hue: 0.0,
                saturation: 100.0,
                luminance: 0.0,
            },
            ..Default::default()
        };
        // weight 1, strength 0.2, red tint (1,0,0) − 0.5
        let out = apply_split_toning([0.5, 0.5, 0.5], &split, 0.0);
        assert!((out[0] - 0.6).abs() < EPSILON);
        assert!((out[1] - 0.4).abs() < EPSILON);
        assert!((out[2] - 0.4).abs() < EPSILON);
    }

    #[test]
    fn test_highlight_zone_ignores_shadows() {
        let split = SplitToning {
            highlight: ToneZone {
                hue: 60.0,
                saturation: 100.0,
                luminance: 0.0,
            },
            ..Default::default()
        };
        let rgb = [0.1, 0.1, 0.1];
        assert_eq!(apply_split_toning(rgb, &split, 0.0), rgb);
        let lit = apply_split_toning(rgb, &split, 1.0);
        assert!(lit[2] < rgb[2]);
    }

    #[test]
    fn test_midtone_zone_peaks_at_middle_gray() {
        assert!((midtone_weight(0.5) - 1.0).abs() < EPSILON);
        assert!(midtone_weight(0.0).abs() < EPSILON);
        assert!(midtone_weight(1.0).abs() < EPSILON);

        let split = SplitToning {
            midtone: ToneZone {
                hue: 240.0,
                saturation: 50.0,
                luminance: 0.0,
            },
            ..Default::default()
        };
        let out = apply_split_toning([0.5, 0.5, 0.5], &split, 0.5);
        assert!((out[2] - 0.55).abs() < EPSILON);
        assert!((out[0] - 0.45).abs() < EPSILON);
    }
}
