//! CLI command implementations

pub mod export;
pub mod inspect;
pub mod preview;
pub mod variants;
pub mod verify;

use std::path::Path;

use anyhow::{Context, Result};
use lutsmith_core::Preset;
use lutsmith_core::preset::read_settings_file;

/// Load a preset (.xmp or .json settings) from path
pub fn load_preset(path: &Path) -> Result<Preset> {
    read_settings_file(path).with_context(|| format!("Failed to load preset: {}", path.display()))
}

/// File name used for generated outputs, e.g. `Moody.xmp`.
pub fn preset_file_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| "preset".to_string())
}
