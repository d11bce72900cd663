//! Tone curve evaluation.
//!
//! Curves are piecewise-linear over control points in the `[0, 255]` domain.
//! Channel values in `[0, 1]` are scaled into that domain, interpolated
//! between the two bracketing points, and scaled back.
//!
//! # Complexity
//! - Evaluate: O(log N) binary search + O(1) interpolation

use crate::transform::params::{ToneCurve, ToneCurves};

/// Curve domain upper bound.
const CURVE_SCALE: f32 = 255.0;

/// Evaluate a tone curve at `value` (in `[0, 1]`).
///
/// Values outside the control point range take the output of the nearest
/// endpoint. Control points are borrowed sorted from [`ToneCurve`], so
/// evaluation does not allocate.
pub fn apply_tone_curve(value: f32, curve: &ToneCurve) -> f32 {
    let pts = curve.points();
    if pts.len() < 2 {
        return value;
    }

    let v = value * CURVE_SCALE;
    let first = pts[0];
    let last = pts[pts.len() - 1];
    if v <= first[0] {
        return first[1] / CURVE_SCALE;
    }
    if v >= last[0] {
        return last[1] / CURVE_SCALE;
    }

    // First segment whose range holds v; ties on duplicate inputs go left.
    let hi = pts.partition_point(|p| p[0] < v);
    let lo = hi - 1;

    let [x1, y1] = pts[lo];
    let [x2, y2] = pts[hi];
    if x2 - x1 <= f32::EPSILON {
        return y2 / CURVE_SCALE;
    }
    let t = (v - x1) / (x2 - x1);
    (y1 + t * (y2 - y1)) / CURVE_SCALE
}

/// Apply the combined RGB curve to every channel, then the per-channel curves
/// that differ from the identity.
///
/// Input is clamped to `[0, 1]` first.
pub fn apply_tone_curves(rgb: [f32; 3], curves: &ToneCurves) -> [f32; 3] {
    let clamped = rgb.map(|c| c.clamp(0.0, 1.0));
    let mut out = clamped.map(|c| apply_tone_curve(c, &curves.rgb));

    let channel_curves = [&curves.red, &curves.green, &curves.blue];
    for (value, curve) in out.iter_mut().zip(channel_curves) {
        if !curve.is_identity() {
            *value = apply_tone_curve(*value, curve);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f32 = 1e-5;

    #[test]
    fn test_identity_curve_is_identity() {
        let curve = ToneCurve::identity();
        for i in 0..=100 {
            let x = i as f32 / 100.0;
            assert!(
                (apply_tone_curve(x, &curve) - x).abs() < EPSILON,
                "identity curve changed {x}"
            );
        }
    }

    #[test]
    fn test_linear_interpolation_between_points() {
        let curve = ToneCurve::new(vec![[0.0, 0.0], [128.0, 200.0], [255.0, 255.0]]);
        let out = apply_tone_curve(64.0 / 255.0, &curve);
        assert!((out - 100.0 / 255.0).abs() < EPSILON);
        let out = apply_tone_curve(128.0 / 255.0, &curve);
        assert!((out - 200.0 / 255.0).abs() < EPSILON);
    }

    #[test]
    fn test_outside_range_clamps_to_endpoints() {
        let curve = ToneCurve::new(vec![[32.0, 20.0], [224.0, 240.0]]);
        assert!((apply_tone_curve(0.0, &curve) - 20.0 / 255.0).abs() < EPSILON);
        assert!((apply_tone_curve(1.0, &curve) - 240.0 / 255.0).abs() < EPSILON);
    }

    #[test]
    fn test_duplicate_inputs_use_first_segment() {
        let curve = ToneCurve::new(vec![[0.0, 0.0], [100.0, 50.0], [100.0, 150.0], [255.0, 255.0]]);
        let out = apply_tone_curve(100.0 / 255.0, &curve);
        assert!(out.is_finite());
        assert!((out * 255.0 - 50.0).abs() < 1e-3, "{}", out * 255.0);

        // Just past the step, the segment after the duplicate applies.
        let past = apply_tone_curve(101.0 / 255.0, &curve) * 255.0;
        assert!(past > 150.0 && past < 152.0, "{past}");
    }

    #[test]
    fn test_channel_curve_only_affects_its_channel() {
        let curves = ToneCurves {
            green: ToneCurve::new(vec![[0.0, 0.0], [255.0, 128.0]]),
            ..Default::default()
        };
        let out = apply_tone_curves([1.0, 1.0, 1.0], &curves);
        assert!((out[0] - 1.0).abs() < EPSILON);
        assert!((out[1] - 128.0 / 255.0).abs() < EPSILON);
        assert!((out[2] - 1.0).abs() < EPSILON);
    }

    #[test]
    fn test_tone_curves_clamp_input() {
        let out = apply_tone_curves([1.4, -0.2, 0.5], &ToneCurves::default());
        assert!((out[0] - 1.0).abs() < EPSILON);
        assert!(out[1].abs() < EPSILON);
        assert!((out[2] - 0.5).abs() < EPSILON);
    }
}
