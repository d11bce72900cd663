//! Preview rendering: the transform engine applied to every pixel of an image.
//!
//! [`render_preview`] grades a whole image with rows spread across the rayon
//! pool. [`PreviewJob`] grades the same image in row batches so an
//! interactive loop can redraw between batches.

use rayon::prelude::*;

use crate::export::PreviewGamma;
use crate::image::GradingImage;
use crate::transform::evaluate::evaluate_transform;
use crate::transform::params::ColorSettings;

/// Grade one RGBA pixel. Alpha passes through untouched.
pub fn grade_pixel(pixel: [f32; 4], settings: &ColorSettings, gamma: PreviewGamma) -> [f32; 4] {
    let [r, g, b, a] = pixel;
    let input = [r, g, b].map(|c| gamma.to_display(c));
    let [r, g, b] = evaluate_transform(input, settings).map(|c| gamma.from_display(c));
    [r, g, b, a]
}

fn grade_row(row: &mut [[f32; 4]], settings: &ColorSettings, gamma: PreviewGamma) {
    for px in row {
        *px = grade_pixel(*px, settings, gamma);
    }
}

/// Grade a full image. Rows are processed in parallel.
pub fn render_preview(
    image: &GradingImage,
    settings: &ColorSettings,
    gamma: PreviewGamma,
) -> GradingImage {
    let mut out = image.clone();
    let width = image.width as usize;
    if width == 0 || settings.is_identity() {
        return out;
    }

    out.pixels
        .par_chunks_mut(width)
        .for_each(|row| grade_row(row, settings, gamma));

    tracing::debug!(
        width = image.width,
        height = image.height,
        %gamma,
        "rendered preview"
    );
    out
}

/// Incremental preview render.
///
/// Each [`step`](Self::step) grades the next batch of rows; the output is
/// complete once `step` returns `true`.
#[derive(Debug)]
pub struct PreviewJob<'a> {
    source: &'a GradingImage,
    settings: &'a ColorSettings,
    gamma: PreviewGamma,
    output: GradingImage,
    next_row: u32,
}

impl<'a> PreviewJob<'a> {
    pub fn new(source: &'a GradingImage, settings: &'a ColorSettings, gamma: PreviewGamma) -> Self {
        Self {
            source,
            settings,
            gamma,
            output: source.clone(),
            next_row: 0,
        }
    }

    /// Grade up to `rows` more rows. Returns `true` when every row is done.
    pub fn step(&mut self, rows: u32) -> bool {
        let end = self.next_row.saturating_add(rows.max(1)).min(self.source.height);
        let width = self.source.width as usize;
        if width > 0 && end > self.next_row {
            let start = self.next_row as usize * width;
            let stop = end as usize * width;
            let (settings, gamma) = (self.settings, self.gamma);
            self.output.pixels[start..stop]
                .par_chunks_mut(width)
                .for_each(|row| grade_row(row, settings, gamma));
        }
        self.next_row = end;
        self.is_done()
    }

    pub fn is_done(&self) -> bool {
        self.next_row >= self.source.height
    }

    /// Fraction of rows graded, in `[0, 1]`.
    pub fn progress(&self) -> f32 {
        if self.source.height == 0 {
            return 1.0;
        }
        self.next_row as f32 / self.source.height as f32
    }

    /// The image as graded so far. Rows not yet reached hold source pixels.
    pub fn output(&self) -> &GradingImage {
        &self.output
    }

    /// Run remaining batches and return the graded image.
    pub fn finish(mut self) -> GradingImage {
        while !self.step(self.source.height) {}
        self.output
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f32 = 1e-4;

    fn gradient(width: u32, height: u32) -> GradingImage {
        let pixels = (0..width * height)
            .map(|i| {
                let t = i as f32 / (width * height - 1) as f32;
                [t, 1.0 - t, 0.5 * t, 0.25 + 0.5 * t]
            })
            .collect();
        GradingImage {
            width,
            height,
            pixels,
            source_bit_depth: crate::image::BitDepth::F32,
        }
    }

    #[test]
    fn test_default_settings_leave_image_unchanged() {
        let image = gradient(8, 4);
        for gamma in PreviewGamma::ALL {
            let out = render_preview(&image, &ColorSettings::default(), gamma);
            assert_eq!(out, image);
        }
    }

    #[test]
    fn test_preview_matches_engine_per_pixel() {
        let image = gradient(6, 5);
        let settings = ColorSettings {
            exposure: 0.5,
            vibrance: 30.0,
            ..Default::default()
        };
        let out = render_preview(&image, &settings, PreviewGamma::Srgb);
        for (src, dst) in image.pixels.iter().zip(&out.pixels) {
            let expected = evaluate_transform([src[0], src[1], src[2]], &settings);
            for ch in 0..3 {
                assert!((dst[ch] - expected[ch]).abs() < EPSILON);
            }
            assert_eq!(dst[3], src[3]);
        }
    }

    #[test]
    fn test_linear_gamma_converts_around_engine() {
        let image = GradingImage::filled(2, 2, [0.214041, 0.214041, 0.214041, 1.0]);
        let settings = ColorSettings {
            exposure: 1.0,
            ..Default::default()
        };
        let out = render_preview(&image, &settings, PreviewGamma::Linear);
        // display 0.5 doubled to 1.0, back to linear 1.0
        assert!((out.pixels[0][0] - 1.0).abs() < 1e-3);
    }

    #[test]
    fn test_job_batches_match_full_render() {
        let image = gradient(7, 9);
        let settings = ColorSettings {
            contrast: 40.0,
            tint: -20.0,
            ..Default::default()
        };
        let full = render_preview(&image, &settings, PreviewGamma::Rec709);

        let mut job = PreviewJob::new(&image, &settings, PreviewGamma::Rec709);
        let mut steps = 0;
        while !job.step(2) {
            steps += 1;
            assert!(job.progress() < 1.0);
        }
        assert_eq!(steps, 4);
        assert!(job.is_done());
        assert_eq!(job.output(), &full);
        assert_eq!(job.finish(), full);
    }

    #[test]
    fn test_job_on_empty_image_is_done() {
        let image = GradingImage::filled(0, 0, [0.0; 4]);
        let settings = ColorSettings::default();
        let mut job = PreviewJob::new(&image, &settings, PreviewGamma::Srgb);
        assert!(job.step(16));
        assert_eq!(job.progress(), 1.0);
    }
}
