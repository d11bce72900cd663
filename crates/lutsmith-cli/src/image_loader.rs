//! Image loading and saving for previews.

use std::path::Path;

use image::{DynamicImage, ImageBuffer, Rgba};
use lutsmith_core::image::{BitDepth, GradingImage};

/// Load an image from disk and convert to the internal `GradingImage` format.
///
/// Supports common formats via the `image` crate (PNG, JPEG, TIFF, EXR).
/// Pixels keep their source encoding; the preview gamma says what it is.
pub fn load_image(path: &Path) -> Result<GradingImage, ImageLoadError> {
    let img = image::open(path).map_err(ImageLoadError::Decode)?;
    let rgba = img.to_rgba32f();
    let (width, height) = rgba.dimensions();

    let pixels: Vec<[f32; 4]> = rgba.pixels().map(|p| p.0).collect();

    let bit_depth = match img.color() {
        image::ColorType::L16
        | image::ColorType::La16
        | image::ColorType::Rgb16
        | image::ColorType::Rgba16 => BitDepth::U16,
        image::ColorType::Rgb32F | image::ColorType::Rgba32F => BitDepth::F32,
        _ => BitDepth::U8,
    };

    Ok(GradingImage {
        width,
        height,
        pixels,
        source_bit_depth: bit_depth,
    })
}

/// Save a `GradingImage`, keeping float precision for EXR and 16-bit depth
/// for 16-bit sources.
pub fn save_image(path: &Path, image: &GradingImage) -> Result<(), ImageLoadError> {
    let raw: Vec<f32> = image.pixels.iter().flatten().copied().collect();
    let buffer = ImageBuffer::<Rgba<f32>, Vec<f32>>::from_raw(image.width, image.height, raw)
        .ok_or(ImageLoadError::Dimensions {
            width: image.width,
            height: image.height,
        })?;
    let dynamic = DynamicImage::ImageRgba32F(buffer);

    let is_exr = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("exr"));
    let result = if is_exr {
        dynamic.save(path)
    } else if image.source_bit_depth == BitDepth::U16 {
        DynamicImage::ImageRgba16(dynamic.to_rgba16()).save(path)
    } else {
        DynamicImage::ImageRgba8(dynamic.to_rgba8()).save(path)
    };
    result.map_err(ImageLoadError::Encode)
}

/// Errors that can occur during image loading and saving.
#[derive(Debug, thiserror::Error)]
pub enum ImageLoadError {
    #[error("failed to decode image: {0}")]
    Decode(image::ImageError),
    #[error("failed to encode image: {0}")]
    Encode(image::ImageError),
    #[error("pixel data does not match {width}x{height}")]
    Dimensions { width: u32, height: u32 },
}
