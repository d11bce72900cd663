//! Export configuration, the fixed variant registry, and the export session.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::color_management::color_space::ColorSpace;
use crate::color_management::transfer::{Rec709Transfer, SrgbTransfer, TransferFunction};
use crate::error::{LutsmithError, Result};
use crate::transform::lut::generate_cube;
use crate::transform::params::ColorSettings;

/// A named export target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ExportVariant {
    pub id: &'static str,
    /// Name used in generated filenames and `.cube` headers.
    pub name: &'static str,
    pub description: &'static str,
    pub color_space: ColorSpace,
}

/// Every export variant, in menu order.
pub const EXPORT_VARIANTS: [ExportVariant; 3] = [
    ExportVariant {
        id: "rec709_clean",
        name: "Rec709_Clean",
        description: "Standard Rec.709 LUT, no gamut expansion",
        color_space: ColorSpace::Rec709,
    },
    ExportVariant {
        id: "log_input",
        name: "Log_Input",
        description: "Log-encoded input LUT for video workflows",
        color_space: ColorSpace::SLog3,
    },
    ExportVariant {
        id: "wide_gamut",
        name: "Wide_Gamut",
        description: "Extended gamut LUT with soft clipping",
        color_space: ColorSpace::LogC,
    },
];

/// Look up a variant by id.
pub fn find_variant(id: &str) -> Result<&'static ExportVariant> {
    EXPORT_VARIANTS
        .iter()
        .find(|v| v.id == id)
        .ok_or_else(|| LutsmithError::UnknownVariant(id.to_string()))
}

/// Supported LUT grid sizes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub enum LutSize {
    Size17,
    Size25,
    #[default]
    Size33,
    Size65,
}

impl LutSize {
    pub const ALL: [LutSize; 4] = [
        LutSize::Size17,
        LutSize::Size25,
        LutSize::Size33,
        LutSize::Size65,
    ];

    /// Nodes per axis.
    pub const fn value(self) -> u32 {
        match self {
            Self::Size17 => 17,
            Self::Size25 => 25,
            Self::Size33 => 33,
            Self::Size65 => 65,
        }
    }

    /// Total grid nodes (N³).
    pub const fn node_count(self) -> usize {
        let n = self.value() as usize;
        n * n * n
    }

    /// Display label, e.g. `33×33×33`.
    pub fn label(self) -> String {
        let n = self.value();
        format!("{n}×{n}×{n}")
    }
}

impl TryFrom<u32> for LutSize {
    type Error = LutsmithError;

    fn try_from(value: u32) -> std::result::Result<Self, Self::Error> {
        Self::ALL
            .into_iter()
            .find(|size| size.value() == value)
            .ok_or_else(|| LutsmithError::InvalidLutSize(value.to_string()))
    }
}

impl From<LutSize> for u32 {
    fn from(size: LutSize) -> Self {
        size.value()
    }
}

impl FromStr for LutSize {
    type Err = LutsmithError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        s.trim()
            .parse::<u32>()
            .ok()
            .and_then(|value| Self::try_from(value).ok())
            .ok_or_else(|| LutsmithError::InvalidLutSize(s.to_string()))
    }
}

impl fmt::Display for LutSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.value())
    }
}

/// Encoding of the pixels handed to the preview renderer.
///
/// The engine grades display-referred values; pixels are brought into that
/// encoding before grading and returned to their own encoding afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PreviewGamma {
    /// Scene-linear values.
    Linear,
    /// sRGB-encoded values (the usual case for 8-bit images).
    #[default]
    Srgb,
    /// Rec. 709 OETF-encoded values.
    Rec709,
}

impl PreviewGamma {
    pub const ALL: [PreviewGamma; 3] = [
        PreviewGamma::Linear,
        PreviewGamma::Srgb,
        PreviewGamma::Rec709,
    ];

    pub const fn id(self) -> &'static str {
        match self {
            Self::Linear => "linear",
            Self::Srgb => "srgb",
            Self::Rec709 => "rec709",
        }
    }

    /// Convert one channel from this encoding into the grading encoding.
    pub fn to_display(self, value: f32) -> f32 {
        match self {
            Self::Linear => SrgbTransfer.to_encoded(value.max(0.0)),
            Self::Srgb => value,
            Self::Rec709 => SrgbTransfer.to_encoded(Rec709Transfer.to_linear(value).max(0.0)),
        }
    }

    /// Convert one channel from the grading encoding back into this encoding.
    pub fn from_display(self, value: f32) -> f32 {
        match self {
            Self::Linear => SrgbTransfer.to_linear(value),
            Self::Srgb => value,
            Self::Rec709 => Rec709Transfer.to_encoded(SrgbTransfer.to_linear(value).max(0.0)),
        }
    }
}

impl FromStr for PreviewGamma {
    type Err = LutsmithError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|g| g.id().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| LutsmithError::UnknownPreviewGamma(s.to_string()))
    }
}

impl fmt::Display for PreviewGamma {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

/// User-facing export options.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LutExportConfig {
    pub size: LutSize,
    /// Target used when exporting outside the variant registry.
    pub color_space: ColorSpace,
    pub clamp: bool,
    pub preview_gamma: PreviewGamma,
}

impl Default for LutExportConfig {
    fn default() -> Self {
        Self {
            size: LutSize::Size33,
            color_space: ColorSpace::Rec709,
            clamp: true,
            preview_gamma: PreviewGamma::Srgb,
        }
    }
}

/// Preset name with a trailing `.xmp` extension removed.
pub fn preset_stem(preset_name: &str) -> &str {
    let split = preset_name.len().saturating_sub(4);
    match preset_name.get(split..) {
        Some(ext) if split > 0 && ext.eq_ignore_ascii_case(".xmp") => &preset_name[..split],
        _ => preset_name,
    }
}

/// Output filename: `{preset}_{N}x{N}x{N}_{variant}.cube`.
pub fn cube_filename(preset_name: &str, size: LutSize, variant_name: &str) -> String {
    let n = size.value();
    format!("{}_{n}x{n}x{n}_{variant_name}.cube", preset_stem(preset_name))
}

/// One generated LUT file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportedLut {
    pub filename: String,
    pub contents: String,
}

/// Export state for one loaded preset.
///
/// Holds what an interactive front end would mutate between exports: the
/// settings, the export options and the selected variants.
#[derive(Debug, Clone)]
pub struct ExportSession {
    pub preset_name: String,
    pub settings: ColorSettings,
    pub config: LutExportConfig,
    selected_variants: Vec<&'static str>,
}

impl ExportSession {
    /// New session with default options and `rec709_clean` selected.
    pub fn new(preset_name: impl Into<String>, settings: ColorSettings) -> Self {
        Self {
            preset_name: preset_name.into(),
            settings,
            config: LutExportConfig::default(),
            selected_variants: vec![EXPORT_VARIANTS[0].id],
        }
    }

    pub fn with_config(mut self, config: LutExportConfig) -> Self {
        self.config = config;
        self
    }

    pub fn selected_variants(&self) -> &[&'static str] {
        &self.selected_variants
    }

    /// Replace the selection. Fails on the first unknown id and leaves the
    /// selection unchanged.
    pub fn select_variants<I, S>(&mut self, ids: I) -> Result<()>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut selected = Vec::new();
        for id in ids {
            let variant = find_variant(id.as_ref())?;
            if !selected.contains(&variant.id) {
                selected.push(variant.id);
            }
        }
        self.selected_variants = selected;
        Ok(())
    }

    /// Toggle one variant. Returns whether it is now selected.
    pub fn toggle_variant(&mut self, id: &str) -> Result<bool> {
        let variant = find_variant(id)?;
        if let Some(pos) = self.selected_variants.iter().position(|v| *v == variant.id) {
            self.selected_variants.remove(pos);
            Ok(false)
        } else {
            self.selected_variants.push(variant.id);
            Ok(true)
        }
    }

    /// Filenames the next export will produce, in selection order.
    pub fn planned_filenames(&self) -> Result<Vec<String>> {
        self.selected_variants
            .iter()
            .map(|id| {
                let variant = find_variant(id)?;
                Ok(cube_filename(&self.preset_name, self.config.size, variant.name))
            })
            .collect()
    }

    /// Generate one `.cube` file per selected variant, in selection order.
    pub fn export(&self) -> Result<Vec<ExportedLut>> {
        let name = preset_stem(&self.preset_name);
        self.selected_variants
            .iter()
            .map(|id| {
                let variant = find_variant(id)?;
                let contents = generate_cube(
                    name,
                    self.config.size,
                    variant.color_space,
                    variant.name,
                    self.config.clamp,
                    &self.settings,
                )?;
                tracing::debug!(variant = variant.id, "exported variant");
                Ok(ExportedLut {
                    filename: cube_filename(&self.preset_name, self.config.size, variant.name),
                    contents,
                })
            })
            .collect()
    }

    /// Generate a single `.cube` file for the configured color space,
    /// named after the color space id.
    pub fn export_config(&self) -> Result<ExportedLut> {
        let space = self.config.color_space;
        let contents = generate_cube(
            preset_stem(&self.preset_name),
            self.config.size,
            space,
            space.id(),
            self.config.clamp,
            &self.settings,
        )?;
        Ok(ExportedLut {
            filename: cube_filename(&self.preset_name, self.config.size, space.id()),
            contents,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f32 = 1e-5;

    #[test]
    fn test_variant_registry() {
        assert_eq!(find_variant("log_input").map(|v| v.color_space).ok(), Some(ColorSpace::SLog3));
        assert_eq!(find_variant("wide_gamut").map(|v| v.name).ok(), Some("Wide_Gamut"));
        assert!(matches!(
            find_variant("hdr_pq"),
            Err(LutsmithError::UnknownVariant(ref id)) if id == "hdr_pq"
        ));
    }

    #[test]
    fn test_lut_size_conversions() {
        assert_eq!(LutSize::try_from(25).ok(), Some(LutSize::Size25));
        assert!(matches!(
            LutSize::try_from(32),
            Err(LutsmithError::InvalidLutSize(ref v)) if v == "32"
        ));
        assert_eq!("65".parse::<LutSize>().ok(), Some(LutSize::Size65));
        assert_eq!(LutSize::Size17.label(), "17×17×17");
        assert_eq!(LutSize::Size65.node_count(), 274_625);
    }

    #[test]
    fn test_parse_errors_name_the_input() {
        for text in ["abc", "32", "-17", ""] {
            let err = text.parse::<LutSize>().unwrap_err();
            assert!(
                matches!(err, LutsmithError::InvalidLutSize(ref v) if v == text),
                "{text:?} -> {err}"
            );
        }
        let err = "abc".parse::<LutSize>().unwrap_err();
        assert!(err.to_string().contains("'abc'"), "{err}");

        assert_eq!(" SRGB ".parse::<PreviewGamma>().ok(), Some(PreviewGamma::Srgb));
        let err = "gamma22".parse::<PreviewGamma>().unwrap_err();
        assert!(matches!(err, LutsmithError::UnknownPreviewGamma(ref v) if v == "gamma22"));
        assert!(matches!(
            "aces".parse::<ColorSpace>(),
            Err(LutsmithError::UnknownColorSpace(_))
        ));
    }

    #[test]
    fn test_lut_size_serde_as_number() {
        let json = serde_json::to_string(&LutSize::Size33).expect("serialize");
        assert_eq!(json, "33");
        let parsed: LutSize = serde_json::from_str("17").expect("deserialize");
        assert_eq!(parsed, LutSize::Size17);
        assert!(serde_json::from_str::<LutSize>("18").is_err());
    }

    #[test]
    fn test_export_config_defaults_and_partial_json() {
        let config = LutExportConfig::default();
        assert_eq!(config.size, LutSize::Size33);
        assert_eq!(config.color_space, ColorSpace::Rec709);
        assert!(config.clamp);
        assert_eq!(config.preview_gamma, PreviewGamma::Srgb);

        let parsed: LutExportConfig =
            serde_json::from_str(r#"{"size": 65, "colorSpace": "log_vlog"}"#).expect("deserialize");
        assert_eq!(parsed.size, LutSize::Size65);
        assert_eq!(parsed.color_space, ColorSpace::VLog);
        assert!(parsed.clamp);
    }

    #[test]
    fn test_preview_gamma_roundtrip() {
        for gamma in PreviewGamma::ALL {
            for v in [0.0, 0.05, 0.18, 0.5, 1.0] {
                let back = gamma.from_display(gamma.to_display(v));
                assert!((back - v).abs() < 1e-4, "{gamma}: {v} -> {back}");
            }
        }
        assert!((PreviewGamma::Linear.to_display(0.214041) - 0.5).abs() < 1e-3);
        assert!((PreviewGamma::Srgb.to_display(0.3) - 0.3).abs() < EPSILON);
    }

    #[test]
    fn test_cube_filename() {
        assert_eq!(
            cube_filename("Moody Teal.xmp", LutSize::Size33, "Rec709_Clean"),
            "Moody Teal_33x33x33_Rec709_Clean.cube"
        );
        assert_eq!(
            cube_filename("Plain", LutSize::Size17, "Log_Input"),
            "Plain_17x17x17_Log_Input.cube"
        );
        assert_eq!(preset_stem("A.XMP"), "A");
        assert_eq!(preset_stem("xmp"), "xmp");
    }

    #[test]
    fn test_session_selection() {
        let mut session = ExportSession::new("Look.xmp", ColorSettings::default());
        assert_eq!(session.selected_variants(), &["rec709_clean"]);

        assert_eq!(session.toggle_variant("log_input").ok(), Some(true));
        assert_eq!(session.toggle_variant("rec709_clean").ok(), Some(false));
        assert_eq!(session.selected_variants(), &["log_input"]);

        assert!(session.select_variants(["wide_gamut", "bogus"]).is_err());
        assert_eq!(session.selected_variants(), &["log_input"]);

        session
            .select_variants(["wide_gamut", "rec709_clean", "wide_gamut"])
            .expect("known ids");
        assert_eq!(session.selected_variants(), &["wide_gamut", "rec709_clean"]);
    }

    #[test]
    fn test_session_export_in_selection_order() {
        let mut session = ExportSession::new("Look.xmp", ColorSettings::default()).with_config(
            LutExportConfig {
                size: LutSize::Size17,
                ..Default::default()
            },
        );
        session
            .select_variants(["log_input", "rec709_clean"])
            .expect("known ids");

        let files = session.export().expect("export");
        let names: Vec<&str> = files.iter().map(|f| f.filename.as_str()).collect();
        assert_eq!(
            names,
            ["Look_17x17x17_Log_Input.cube", "Look_17x17x17_Rec709_Clean.cube"]
        );
        assert_eq!(session.planned_filenames().expect("known ids"), names);
        assert!(files[0].contents.contains("TITLE \"Look Log_Input\""));
        assert!(files[1].contents.contains("LUT_3D_SIZE 17"));
    }

    #[test]
    fn test_session_export_config_uses_color_space_id() {
        let session = ExportSession::new("Look", ColorSettings::default()).with_config(LutExportConfig {
            size: LutSize::Size17,
            color_space: ColorSpace::VLog,
            ..Default::default()
        });
        let file = session.export_config().expect("export");
        assert_eq!(file.filename, "Look_17x17x17_log_vlog.cube");
        assert!(file.contents.contains("V-Log"));
    }
}
