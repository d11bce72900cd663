//! Slider-based global adjustments: exposure, tone, presence, vibrance and
//! white balance.
//!
//! Slider values use the preset's native units: percentages in `[-100, 100]`
//! and exposure in stops. Every function returns its input unchanged when the
//! slider sits at zero.

/// Rec. 709 luminance weights.
pub const LUMA_REC709: [f32; 3] = [0.2126, 0.7152, 0.0722];

/// Rec. 709 luminance of an RGB triple.
pub fn luminance(rgb: [f32; 3]) -> f32 {
    rgb[0] * LUMA_REC709[0] + rgb[1] * LUMA_REC709[1] + rgb[2] * LUMA_REC709[2]
}

/// Apply exposure in stops.
///
/// ```text
/// out = in × 2^exposure
/// ```
pub fn apply_exposure(rgb: [f32; 3], exposure: f32) -> [f32; 3] {
    if exposure == 0.0 {
        return rgb;
    }
    let mult = exposure.exp2();
    rgb.map(|c| c * mult)
}

/// Blend each channel toward white and black.
///
/// ```text
/// out = in + (whites/100 × 0.3) × in + (blacks/100 × 0.3) × (1 − in)
/// ```
pub fn apply_whites_blacks(rgb: [f32; 3], whites: f32, blacks: f32) -> [f32; 3] {
    if whites == 0.0 && blacks == 0.0 {
        return rgb;
    }
    let whites_offset = whites / 100.0 * 0.3;
    let blacks_offset = blacks / 100.0 * 0.3;
    rgb.map(|c| c + whites_offset * c + blacks_offset * (1.0 - c))
}

/// Lift or compress bright and dark regions by a luminance-weighted offset.
///
/// The offset is identical for all channels, so hue is preserved.
///
/// ```text
/// L   = dot(rgb, rec709)
/// out = in + L² × highlights/100 × 0.5 + (1 − L)² × shadows/100 × 0.5
/// ```
pub fn apply_highlights_shadows(rgb: [f32; 3], highlights: f32, shadows: f32) -> [f32; 3] {
    if highlights == 0.0 && shadows == 0.0 {
        return rgb;
    }
    let luma = luminance(rgb);
    let highlight_amount = luma * luma * (highlights / 100.0) * 0.5;
    let shadow_amount = (1.0 - luma) * (1.0 - luma) * (shadows / 100.0) * 0.5;
    rgb.map(|c| c + highlight_amount + shadow_amount)
}

/// Linear contrast around a fixed 0.5 pivot.
///
/// ```text
/// out = 0.5 + (in − 0.5) × (1 + contrast/100)
/// ```
pub fn apply_contrast(rgb: [f32; 3], contrast: f32) -> [f32; 3] {
    if contrast == 0.0 {
        return rgb;
    }
    pivot_contrast(rgb, 1.0 + contrast / 100.0)
}

/// Midtone-weighted local contrast.
///
/// Each channel is pushed away from (or toward) the pixel's luminance. The
/// weight peaks at `L = 0.5` and falls to zero at black and white.
///
/// ```text
/// weight = 1 − 2 × |L − 0.5|
/// out    = L + (in − L) × (1 + clarity/100 × 0.3 × weight)
/// ```
pub fn apply_clarity(rgb: [f32; 3], clarity: f32) -> [f32; 3] {
    if clarity == 0.0 {
        return rgb;
    }
    let luma = luminance(rgb);
    let midtone_weight = 1.0 - (luma - 0.5).abs() * 2.0;
    let factor = 1.0 + (clarity / 100.0) * 0.3 * midtone_weight;
    spread_from_luma(rgb, luma, factor)
}

/// Flat micro-contrast, same technique as clarity without midtone weighting.
///
/// ```text
/// out = L + (in − L) × (1 + texture/100 × 0.15)
/// ```
pub fn apply_texture(rgb: [f32; 3], texture: f32) -> [f32; 3] {
    if texture == 0.0 {
        return rgb;
    }
    let luma = luminance(rgb);
    spread_from_luma(rgb, luma, 1.0 + (texture / 100.0) * 0.15)
}

/// Haze removal: a pivot contrast boost followed by a slight darkening.
///
/// ```text
/// out = 0.5 + (in − 0.5) × (1 + dehaze/100 × 0.3) − dehaze/100 × 0.1
/// ```
pub fn apply_dehaze(rgb: [f32; 3], dehaze: f32) -> [f32; 3] {
    if dehaze == 0.0 {
        return rgb;
    }
    let amount = dehaze / 100.0;
    let boosted = pivot_contrast(rgb, 1.0 + amount * 0.3);
    let darken = amount * 0.1;
    boosted.map(|c| c - darken)
}

/// Scale an HSL saturation value by vibrance, then by global saturation.
///
/// Vibrance is attenuated by the existing saturation so already-saturated
/// colors are left mostly alone. The result is clamped to `[0, 1]`.
///
/// ```text
/// s' = s × (1 + vibrance/100 × (1 − s))
/// s' = s' × (1 + saturation/100)
/// ```
pub fn apply_vibrance_saturation(sat: f32, vibrance: f32, saturation: f32) -> f32 {
    let s = sat * (1.0 + (vibrance / 100.0) * (1.0 - sat));
    let s = s * (1.0 + saturation / 100.0);
    s.clamp(0.0, 1.0)
}

/// Additive white balance shift.
///
/// Temperature moves red against blue. Tint moves green against red and blue
/// at half strength.
///
/// ```text
/// t = temperature/100 × 0.1      R += t, B −= t
/// k = tint/100 × 0.1             G −= k, R += k/2, B += k/2
/// ```
pub fn apply_temperature_tint(rgb: [f32; 3], temperature: f32, tint: f32) -> [f32; 3] {
    let [mut r, mut g, mut b] = rgb;
    if temperature != 0.0 {
        let shift = temperature / 100.0 * 0.1;
        r += shift;
        b -= shift;
    }
    if tint != 0.0 {
        let shift = tint / 100.0 * 0.1;
        g -= shift;
        r += shift * 0.5;
        b += shift * 0.5;
    }
    [r, g, b]
}

fn pivot_contrast(rgb: [f32; 3], factor: f32) -> [f32; 3] {
    rgb.map(|c| 0.5 + (c - 0.5) * factor)
}

fn spread_from_luma(rgb: [f32; 3], luma: f32, factor: f32) -> [f32; 3] {
    rgb.map(|c| luma + (c - luma) * factor)
}
