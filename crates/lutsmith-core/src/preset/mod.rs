//! Preset documents — reading develop settings out of XMP files.
//!
//! Settings can also be stored as camelCase JSON (the serde form of
//! [`ColorSettings`]); missing fields take their neutral defaults.

pub mod xmp;

use std::fs;
use std::path::Path;

use crate::error::{LutsmithError, Result};
use crate::transform::params::ColorSettings;

pub use xmp::{Preset, parse_preset, parse_preset_document, read_preset};

/// Read a preset from an `.xmp` file or a `.json` settings file, chosen by
/// extension.
pub fn read_settings_file(path: &Path) -> Result<Preset> {
    let is_json = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
    if !is_json {
        return read_preset(path);
    }

    let text = fs::read_to_string(path)?;
    let settings: ColorSettings =
        serde_json::from_str(&text).map_err(|err| LutsmithError::Preset {
            path: path.to_path_buf(),
            message: err.to_string(),
        })?;
    Ok(Preset {
        name: None,
        settings,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_json_settings_file() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("look.json");
        fs::write(&path, r#"{"contrast": 20, "convertToGrayscale": true}"#).expect("write");

        let preset = read_settings_file(&path).expect("valid settings");
        assert_eq!(preset.settings.contrast, 20.0);
        assert!(preset.settings.convert_to_grayscale);
        assert!(preset.name.is_none());
    }

    #[test]
    fn test_bad_json_names_the_file() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("broken.JSON");
        fs::write(&path, "{ not json").expect("write");

        match read_settings_file(&path) {
            Err(LutsmithError::Preset { path: p, .. }) => assert_eq!(p, path),
            other => panic!("expected a preset error, got {other:?}"),
        }
    }

    #[test]
    fn test_malformed_xmp_names_the_file() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("broken.xmp");
        fs::write(&path, "<x:xmpmeta><rdf:RDF></x:xmpmeta>").expect("write");

        let err = read_settings_file(&path).unwrap_err();
        assert!(err.to_string().contains("broken.xmp"), "{err}");
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = read_settings_file(Path::new("/nonexistent/preset.xmp")).unwrap_err();
        assert!(matches!(err, LutsmithError::Io(_)));
    }
}
