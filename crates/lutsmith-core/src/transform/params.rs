//! Central settings struct that defines the entire color transform.
//!
//! `ColorSettings` is the single source of truth for all grading adjustments.
//! The preset parser writes here, the UI mutates it in place, and the
//! transform engine reads it without ever mutating it.
//!
//! Every field has a neutral default, so `ColorSettings::default()` is the
//! identity transform.

use serde::{Deserialize, Serialize};

/// One of the eight named hue ranges used by the gray mixer and HSL panels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HueChannel {
    Red,
    Orange,
    Yellow,
    Green,
    Aqua,
    Blue,
    Purple,
    Magenta,
}

impl HueChannel {
    /// All channels in hue-wheel order.
    pub const ALL: [HueChannel; 8] = [
        HueChannel::Red,
        HueChannel::Orange,
        HueChannel::Yellow,
        HueChannel::Green,
        HueChannel::Aqua,
        HueChannel::Blue,
        HueChannel::Purple,
        HueChannel::Magenta,
    ];

    /// Suffix used by preset attribute names (`HueAdjustmentRed`, ...).
    pub const fn label(self) -> &'static str {
        match self {
            Self::Red => "Red",
            Self::Orange => "Orange",
            Self::Yellow => "Yellow",
            Self::Green => "Green",
            Self::Aqua => "Aqua",
            Self::Blue => "Blue",
            Self::Purple => "Purple",
            Self::Magenta => "Magenta",
        }
    }

    /// Position of this channel in [`HueChannel::ALL`].
    pub const fn index(self) -> usize {
        self as usize
    }
}

/// A value for each of the eight hue channels.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HueChannels {
    pub red: f32,
    pub orange: f32,
    pub yellow: f32,
    pub green: f32,
    pub aqua: f32,
    pub blue: f32,
    pub purple: f32,
    pub magenta: f32,
}

impl HueChannels {
    pub fn get(&self, channel: HueChannel) -> f32 {
        match channel {
            HueChannel::Red => self.red,
            HueChannel::Orange => self.orange,
            HueChannel::Yellow => self.yellow,
            HueChannel::Green => self.green,
            HueChannel::Aqua => self.aqua,
            HueChannel::Blue => self.blue,
            HueChannel::Purple => self.purple,
            HueChannel::Magenta => self.magenta,
        }
    }

    pub fn get_mut(&mut self, channel: HueChannel) -> &mut f32 {
        match channel {
            HueChannel::Red => &mut self.red,
            HueChannel::Orange => &mut self.orange,
            HueChannel::Yellow => &mut self.yellow,
            HueChannel::Green => &mut self.green,
            HueChannel::Aqua => &mut self.aqua,
            HueChannel::Blue => &mut self.blue,
            HueChannel::Purple => &mut self.purple,
            HueChannel::Magenta => &mut self.magenta,
        }
    }

    /// Values in [`HueChannel::ALL`] order.
    pub fn to_array(&self) -> [f32; 8] {
        HueChannel::ALL.map(|c| self.get(c))
    }

    pub fn is_neutral(&self) -> bool {
        self.to_array().iter().all(|v| *v == 0.0)
    }
}

/// Per-hue-channel HSL adjustments, each in `[-100, 100]`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HslAdjustments {
    pub hue: HueChannels,
    pub saturation: HueChannels,
    pub luminance: HueChannels,
}

/// A single tonal zone of the color grading wheels.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ToneZone {
    /// Hue in degrees, `[0, 360)`.
    pub hue: f32,
    /// Tint strength, `[0, 100]`.
    pub saturation: f32,
    /// Zone luminance, `[-100, 100]`. Carried, not applied by the engine.
    pub luminance: f32,
}

/// Split toning / three-way color grading.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SplitToning {
    pub shadow: ToneZone,
    pub midtone: ToneZone,
    pub highlight: ToneZone,
    /// Shadow/highlight balance, `[-100, 100]`.
    pub balance: f32,
    /// Zone blending, `[0, 100]`.
    pub blending: f32,
}

/// Hue and saturation offsets for one camera primary.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PrimaryAdjustment {
    pub hue: f32,
    pub saturation: f32,
}

/// Camera calibration panel.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Calibration {
    pub shadow_tint: f32,
    pub red: PrimaryAdjustment,
    pub green: PrimaryAdjustment,
    pub blue: PrimaryAdjustment,
}

/// Piecewise-linear tone curve over the `[0, 255]` domain.
///
/// Points are kept sorted by input and there are always at least two of
/// them; anything shorter collapses to the identity curve.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "Vec<[f32; 2]>", into = "Vec<[f32; 2]>")]
pub struct ToneCurve {
    points: Vec<[f32; 2]>,
}

impl ToneCurve {
    /// The two-point identity curve `[(0,0), (255,255)]`.
    pub const IDENTITY: [[f32; 2]; 2] = [[0.0, 0.0], [255.0, 255.0]];

    pub fn identity() -> Self {
        Self {
            points: Self::IDENTITY.to_vec(),
        }
    }

    /// Build a curve from `(input, output)` pairs in any order.
    pub fn new(mut points: Vec<[f32; 2]>) -> Self {
        if points.len() < 2 {
            if !points.is_empty() {
                tracing::warn!(
                    count = points.len(),
                    "tone curve has fewer than two points, using identity"
                );
            }
            return Self::identity();
        }
        points.sort_by(|a, b| a[0].total_cmp(&b[0]));
        Self { points }
    }

    /// Control points sorted by input.
    pub fn points(&self) -> &[[f32; 2]] {
        &self.points
    }

    /// True for exactly the default `[(0,0), (255,255)]` curve.
    pub fn is_identity(&self) -> bool {
        self.points.as_slice() == Self::IDENTITY.as_slice()
    }
}

impl Default for ToneCurve {
    fn default() -> Self {
        Self::identity()
    }
}

impl From<Vec<[f32; 2]>> for ToneCurve {
    fn from(points: Vec<[f32; 2]>) -> Self {
        Self::new(points)
    }
}

impl From<ToneCurve> for Vec<[f32; 2]> {
    fn from(curve: ToneCurve) -> Self {
        curve.points
    }
}

/// Combined RGB curve plus one curve per channel.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ToneCurves {
    /// Applied to all three channels.
    pub rgb: ToneCurve,
    pub red: ToneCurve,
    pub green: ToneCurve,
    pub blue: ToneCurve,
}

/// Every tool writes here. The transform engine reads the full struct.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ColorSettings {
    // Global tone
    /// Exposure in stops, `[-5, 5]`.
    pub exposure: f32,
    pub contrast: f32,
    pub highlights: f32,
    pub shadows: f32,
    pub whites: f32,
    pub blacks: f32,

    // Presence
    pub clarity: f32,
    pub dehaze: f32,
    pub texture: f32,
    pub vibrance: f32,
    pub saturation: f32,

    // White balance
    pub temperature: f32,
    pub tint: f32,

    // Grayscale
    pub convert_to_grayscale: bool,
    /// Gray mixer weights, `[-200, 200]`.
    pub gray_mixer: HueChannels,

    pub hsl: HslAdjustments,
    pub split_toning: SplitToning,
    pub calibration: Calibration,
    pub tone_curve: ToneCurves,
}

impl ColorSettings {
    /// True when no field differs from its neutral default.
    pub fn is_identity(&self) -> bool {
        *self == Self::default()
    }
}
