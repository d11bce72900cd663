//! Image representation for the preview renderer.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Supported bit depths for source images.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BitDepth {
    /// 8-bit unsigned integer.
    U8,
    /// 16-bit unsigned integer.
    U16,
    /// 32-bit floating point.
    F32,
}

impl fmt::Display for BitDepth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::U8 => write!(f, "8-bit"),
            Self::U16 => write!(f, "16-bit"),
            Self::F32 => write!(f, "32-bit float"),
        }
    }
}

/// RGBA f32 image in its source encoding, rows top to bottom.
#[derive(Debug, Clone, PartialEq)]
pub struct GradingImage {
    /// Image width in pixels.
    pub width: u32,
    /// Image height in pixels.
    pub height: u32,
    /// Pixel data, `width × height` entries.
    pub pixels: Vec<[f32; 4]>,
    /// Original bit depth of the source image.
    pub source_bit_depth: BitDepth,
}

impl GradingImage {
    /// Wrap pixel data. Returns `None` when the pixel count does not match
    /// the dimensions.
    pub fn new(width: u32, height: u32, pixels: Vec<[f32; 4]>, depth: BitDepth) -> Option<Self> {
        (pixels.len() == width as usize * height as usize).then_some(Self {
            width,
            height,
            pixels,
            source_bit_depth: depth,
        })
    }

    /// Image filled with one color.
    pub fn filled(width: u32, height: u32, color: [f32; 4]) -> Self {
        Self {
            width,
            height,
            pixels: vec![color; width as usize * height as usize],
            source_bit_depth: BitDepth::F32,
        }
    }
}
