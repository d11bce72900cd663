//! Lutsmith Core — domain layer for preset-driven LUT generation.
//!
//! This crate parses Camera Raw XMP presets into [`ColorSettings`], evaluates
//! the grading chain per pixel, bakes it into `.cube` 3D LUTs, and renders
//! graded previews. No UI or framework dependencies.

pub mod color_management;
pub mod error;
pub mod export;
pub mod grading;
pub mod image;
pub mod preset;
pub mod preview;
pub mod transform;

// Re-exports for convenience.
pub use color_management::color_space::ColorSpace;
pub use error::{LutsmithError, Result};
pub use export::{
    EXPORT_VARIANTS, ExportSession, ExportVariant, ExportedLut, LutExportConfig, LutSize,
    PreviewGamma, cube_filename, find_variant,
};
pub use image::{BitDepth, GradingImage};
pub use preset::{Preset, parse_preset, read_preset, read_settings_file};
pub use preview::{PreviewJob, render_preview};
pub use transform::evaluate::evaluate_transform;
pub use transform::lut::{Lut3D, generate_cube};
pub use transform::params::{ColorSettings, HueChannel, ToneCurve};
