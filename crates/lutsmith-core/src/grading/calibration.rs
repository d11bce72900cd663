//! Camera calibration: shadow tint and primary hue/saturation offsets.
//!
//! The primaries are modelled as cross-channel mixes rather than a true
//! camera matrix. Coefficients are fixed to match the reference grading tool
//! and must stay as they are for preset compatibility.
//!
//! For a primary `P` with hue offset `h` and saturation offset `s`
//! (both divided by 100), using the values entering this stage:
//!
//! ```text
//!   influence = P × 0.3
//!   share     = P / max(0.001, R + G + B)
//!
//!   hue:        P += h × influence × 0.5, one neighbor += h × influence,
//!               the other −= h × influence
//!   saturation: P += s × share × 0.4, both others −= s × share × 0.15
//! ```

use crate::grading::split_toning::shadow_weight;
use crate::transform::params::Calibration;

const SHADOW_TINT_STRENGTH: f32 = 0.2;
const HUE_INFLUENCE: f32 = 0.3;
const SAT_BOOST: f32 = 0.4;
const SAT_CUT: f32 = 0.15;

/// Apply shadow tint, then red, green and blue primary adjustments.
///
/// `tonal_luma` selects the shadow region for the tint. Primary adjustments
/// read the channel values as they enter this stage, so their order does
/// not matter.
pub fn apply_calibration(rgb: [f32; 3], cal: &Calibration, tonal_luma: f32) -> [f32; 3] {
    let orig = rgb;
    let [mut r, mut g, mut b] = rgb;

    // Positive is magenta, negative is green.
    if cal.shadow_tint != 0.0 {
        let tint = (cal.shadow_tint / 100.0) * shadow_weight(tonal_luma) * SHADOW_TINT_STRENGTH;
        g -= tint;
        r += tint * 0.5;
        b += tint * 0.5;
    }

    let total = (orig[0] + orig[1] + orig[2]).max(0.001);
    let share = [orig[0] / total, orig[1] / total, orig[2] / total];

    // Red hue: positive leans toward yellow, negative toward magenta.
    let red_hue = cal.red.hue / 100.0;
    let red_sat = cal.red.saturation / 100.0;
    let influence = orig[0] * HUE_INFLUENCE;
    r += red_hue * influence * 0.5;
    g += red_hue * influence;
    b -= red_hue * influence;
    r += red_sat * share[0] * SAT_BOOST;
    g -= red_sat * share[0] * SAT_CUT;
    b -= red_sat * share[0] * SAT_CUT;

    // Green hue: positive leans toward cyan, negative toward yellow.
    let green_hue = cal.green.hue / 100.0;
    let green_sat = cal.green.saturation / 100.0;
    let influence = orig[1] * HUE_INFLUENCE;
    r -= green_hue * influence;
    g += green_hue * influence * 0.5;
    b += green_hue * influence;
    r -= green_sat * share[1] * SAT_CUT;
    g += green_sat * share[1] * SAT_BOOST;
    b -= green_sat * share[1] * SAT_CUT;

    // Blue hue: positive leans toward magenta, negative toward cyan.
    let blue_hue = cal.blue.hue / 100.0;
    let blue_sat = cal.blue.saturation / 100.0;
    let influence = orig[2] * HUE_INFLUENCE;
    r += blue_hue * influence;
    g -= blue_hue * influence;
    b += blue_hue * influence * 0.5;
    r -= blue_sat * share[2] * SAT_CUT;
    g -= blue_sat * share[2] * SAT_CUT;
    b += blue_sat * share[2] * SAT_BOOST;

    [r, g, b]
}
