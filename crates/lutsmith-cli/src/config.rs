//! Application configuration for the command-line tool.
//!
//! Layers, later ones winning: built-in defaults, environment variables,
//! the `--config` JSON file, then command-line flags (applied by each
//! command).

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use lutsmith_core::{ColorSpace, LutExportConfig, LutSize, PreviewGamma};
use serde::Deserialize;

/// Default output directory for generated LUTs.
const DEFAULT_OUTPUT_DIR: &str = ".";
/// Default export variant.
const DEFAULT_VARIANT: &str = "rec709_clean";

/// Runtime configuration for the lutsmith CLI.
#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    /// Export options shared by every command.
    pub export: LutExportConfig,
    /// Variant ids exported when `--variant` is not given.
    pub variants: Vec<String>,
    /// Directory generated files are written to.
    pub output_dir: PathBuf,
    /// Worker threads for LUT baking and previews (0 = auto).
    pub threads: usize,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            export: LutExportConfig::default(),
            variants: vec![DEFAULT_VARIANT.to_string()],
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            threads: 0,
        }
    }
}

/// Contents of a `--config` file. Every field is optional.
#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ConfigFile {
    pub export: ExportOverrides,
    pub variants: Option<Vec<String>>,
    pub output_dir: Option<PathBuf>,
    pub threads: Option<usize>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ExportOverrides {
    pub size: Option<LutSize>,
    pub color_space: Option<ColorSpace>,
    pub clamp: Option<bool>,
    pub preview_gamma: Option<PreviewGamma>,
}

impl AppConfig {
    /// Defaults, then the process environment, then `file` if given.
    pub fn load(file: Option<&Path>) -> Result<Self> {
        let mut config = Self::default();
        config.apply_env(|key| std::env::var(key).ok());
        if let Some(path) = file {
            config.apply_file(&ConfigFile::read(path)?);
            tracing::debug!(path = %path.display(), "loaded configuration file");
        }
        Ok(config)
    }

    /// Apply `LUTSMITH_LUT_SIZE`, `LUTSMITH_OUTPUT_DIR` and `LUTSMITH_THREADS`.
    /// Unparseable values are ignored.
    pub fn apply_env(&mut self, var: impl Fn(&str) -> Option<String>) {
        if let Some(value) = var("LUTSMITH_LUT_SIZE") {
            match value.parse::<LutSize>() {
                Ok(size) => self.export.size = size,
                Err(err) => tracing::warn!(%value, "ignoring LUTSMITH_LUT_SIZE: {err}"),
            }
        }
        if let Some(dir) = var("LUTSMITH_OUTPUT_DIR").filter(|d| !d.is_empty()) {
            self.output_dir = PathBuf::from(dir);
        }
        if let Some(threads) = var("LUTSMITH_THREADS").and_then(|s| s.parse().ok()) {
            self.threads = threads;
        }
    }

    pub fn apply_file(&mut self, file: &ConfigFile) {
        let export = &file.export;
        if let Some(size) = export.size {
            self.export.size = size;
        }
        if let Some(space) = export.color_space {
            self.export.color_space = space;
        }
        if let Some(clamp) = export.clamp {
            self.export.clamp = clamp;
        }
        if let Some(gamma) = export.preview_gamma {
            self.export.preview_gamma = gamma;
        }
        if let Some(variants) = &file.variants {
            self.variants = variants.clone();
        }
        if let Some(dir) = &file.output_dir {
            self.output_dir = dir.clone();
        }
        if let Some(threads) = file.threads {
            self.threads = threads;
        }
    }
}

impl ConfigFile {
    pub fn read(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config: {}", path.display()))?;
        serde_json::from_str(&text)
            .with_context(|| format!("Invalid config file: {}", path.display()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();
        assert_eq!(config.export, LutExportConfig::default());
        assert_eq!(config.variants, ["rec709_clean"]);
        assert_eq!(config.output_dir, PathBuf::from("."));
        assert_eq!(config.threads, 0);
    }

    #[test]
    fn test_env_overrides_defaults() {
        let mut config = AppConfig::default();
        config.apply_env(env(&[
            ("LUTSMITH_LUT_SIZE", "65"),
            ("LUTSMITH_OUTPUT_DIR", "/tmp/luts"),
            ("LUTSMITH_THREADS", "3"),
        ]));
        assert_eq!(config.export.size, LutSize::Size65);
        assert_eq!(config.output_dir, PathBuf::from("/tmp/luts"));
        assert_eq!(config.threads, 3);
    }

    #[test]
    fn test_bad_env_values_are_ignored() {
        let mut config = AppConfig::default();
        config.apply_env(env(&[("LUTSMITH_LUT_SIZE", "31"), ("LUTSMITH_THREADS", "many")]));
        assert_eq!(config, AppConfig::default());
    }

    #[test]
    fn test_file_overrides_env_field_by_field() {
        let mut config = AppConfig::default();
        config.apply_env(env(&[("LUTSMITH_LUT_SIZE", "17"), ("LUTSMITH_OUTPUT_DIR", "env")]));

        let file: ConfigFile = serde_json::from_str(
            r#"{"export": {"colorSpace": "log_slog3", "clamp": false},
                "variants": ["log_input", "wide_gamut"]}"#,
        )
        .expect("valid config");
        config.apply_file(&file);

        assert_eq!(config.export.size, LutSize::Size17);
        assert_eq!(config.export.color_space, ColorSpace::SLog3);
        assert!(!config.export.clamp);
        assert_eq!(config.export.preview_gamma, PreviewGamma::Srgb);
        assert_eq!(config.variants, ["log_input", "wide_gamut"]);
        assert_eq!(config.output_dir, PathBuf::from("env"));
    }

    #[test]
    fn test_read_config_file() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("lutsmith.json");
        fs::write(&path, r#"{"outputDir": "luts", "export": {"size": 25}}"#).expect("write");

        let file = ConfigFile::read(&path).expect("valid config");
        assert_eq!(file.output_dir, Some(PathBuf::from("luts")));
        assert_eq!(file.export.size, Some(LutSize::Size25));

        fs::write(&path, r#"{"export": {"size": 24}}"#).expect("write");
        assert!(ConfigFile::read(&path).is_err());
    }
}
