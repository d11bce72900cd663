use std::path::PathBuf;

/// Result alias used across the core crate.
pub type Result<T> = std::result::Result<T, LutsmithError>;

#[derive(Debug, thiserror::Error)]
pub enum LutsmithError {
    /// The preset document is not well-formed XML.
    #[error("malformed preset document: {0}")]
    Xml(String),
    /// Same as [`LutsmithError::Xml`], with the offending file attached.
    #[error("failed to parse preset {}: {message}", path.display())]
    Preset { path: PathBuf, message: String },
    #[error("unknown color space: {0}")]
    UnknownColorSpace(String),
    #[error("unknown export variant: {0}")]
    UnknownVariant(String),
    #[error("unknown preview gamma '{0}', expected linear, srgb or rec709")]
    UnknownPreviewGamma(String),
    #[error("invalid LUT size '{0}', expected one of 17, 25, 33, 65")]
    InvalidLutSize(String),
    #[error("invalid .cube data: {0}")]
    CubeParse(String),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
