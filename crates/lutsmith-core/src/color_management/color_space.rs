//! LUT target color spaces and the input mapping applied before grading.
//!
//! The transform engine works on display-referred Rec. 709 values. A LUT
//! built for a log target receives log-encoded input, so each grid node is
//! decoded to scene-linear, re-encoded with the Rec. 709 OETF and
//! soft-clipped into `[0, 1]` before it is graded.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::color_management::transfer::{
    ArriLogC3Transfer, Rec709Transfer, SLog3Transfer, TransferFunction, VLogTransfer,
};
use crate::error::LutsmithError;

/// Start of the highlight shoulder used when folding log input into `[0, 1]`.
const SOFT_CLIP_KNEE: f32 = 0.8;

/// Color space a generated LUT expects on its input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ColorSpace {
    /// Display-referred Rec. 709. No remapping.
    #[default]
    #[serde(rename = "rec709")]
    Rec709,
    /// Sony S-Log3.
    #[serde(rename = "log_slog3")]
    SLog3,
    /// Panasonic V-Log.
    #[serde(rename = "log_vlog")]
    VLog,
    /// ARRI LogC3 (EI 800).
    #[serde(rename = "log_logc")]
    LogC,
}

impl ColorSpace {
    /// Every supported target, in menu order.
    pub const ALL: [ColorSpace; 4] = [
        ColorSpace::Rec709,
        ColorSpace::SLog3,
        ColorSpace::VLog,
        ColorSpace::LogC,
    ];

    /// Stable identifier used in configuration files and on the command line.
    pub const fn id(&self) -> &'static str {
        match self {
            Self::Rec709 => "rec709",
            Self::SLog3 => "log_slog3",
            Self::VLog => "log_vlog",
            Self::LogC => "log_logc",
        }
    }

    /// Human-readable label for UI menus and `.cube` comments.
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Rec709 => "Rec.709",
            Self::SLog3 => "S-Log3",
            Self::VLog => "V-Log",
            Self::LogC => "ARRI LogC",
        }
    }

    /// Log curve of the target, or `None` for Rec. 709.
    pub fn log_transfer(&self) -> Option<&'static dyn TransferFunction> {
        match self {
            Self::Rec709 => None,
            Self::SLog3 => Some(&SLog3Transfer),
            Self::VLog => Some(&VLogTransfer),
            Self::LogC => Some(&ArriLogC3Transfer),
        }
    }

    /// Map one input triple from this target's encoding into the engine's
    /// working encoding.
    pub fn to_working(&self, rgb: [f32; 3]) -> [f32; 3] {
        match self.log_transfer() {
            None => rgb,
            Some(tf) => rgb.map(|c| {
                let linear = tf.to_linear(c).max(0.0);
                soft_clip(Rec709Transfer.to_encoded(linear))
            }),
        }
    }
}

/// Compress values above the knee smoothly toward 1.0.
///
/// Identity below the knee, continuous in value and slope at the knee,
/// and never exceeds 1.0.
pub fn soft_clip(value: f32) -> f32 {
    if value <= SOFT_CLIP_KNEE {
        return value;
    }
    let headroom = 1.0 - SOFT_CLIP_KNEE;
    SOFT_CLIP_KNEE + headroom * (1.0 - (-(value - SOFT_CLIP_KNEE) / headroom).exp())
}

impl fmt::Display for ColorSpace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for ColorSpace {
    type Err = LutsmithError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|space| space.id().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| LutsmithError::UnknownColorSpace(s.to_string()))
    }
}
