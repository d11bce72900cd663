//! 3D LUT baking, application, and `.cube` file I/O.
//!
//! Entries are stored in `.cube` file order: red varies fastest, then green,
//! then blue.
//!
//! ```text
//! index(r, g, b) = r + g × N + b × N²
//! input(i)       = i / (N − 1)
//! ```

use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;

use rayon::prelude::*;

use crate::color_management::color_space::ColorSpace;
use crate::error::{LutsmithError, Result};
use crate::export::LutSize;
use crate::transform::evaluate::evaluate_transform;
use crate::transform::params::ColorSettings;

/// A 3D lookup table for fast color transform application.
///
/// The LUT maps input RGB values to graded output RGB values using
/// trilinear interpolation. Typical sizes are 33³ or 65³ entries.
#[derive(Debug, Clone, PartialEq)]
pub struct Lut3D {
    /// Grid size per axis.
    pub size: u32,
    /// LUT entries as RGB values, red fastest. Length = size³.
    pub data: Vec<[f32; 3]>,
    /// `TITLE` line, without quotes.
    pub title: Option<String>,
    /// Comment lines written before the header, without the leading `#`.
    pub comments: Vec<String>,
    /// Minimum domain values per channel.
    pub domain_min: [f32; 3],
    /// Maximum domain values per channel.
    pub domain_max: [f32; 3],
}

impl Lut3D {
    /// Identity LUT of the given size.
    pub fn identity(size: u32) -> Self {
        let size = size.max(2);
        let data = (0..node_count(size))
            .map(|i| grid_input(size, i))
            .collect();
        Self::from_data(size, data)
    }

    fn from_data(size: u32, data: Vec<[f32; 3]>) -> Self {
        Self {
            size,
            data,
            title: None,
            comments: Vec::new(),
            domain_min: [0.0; 3],
            domain_max: [1.0; 3],
        }
    }

    /// Bake the full grading transform into a LUT.
    ///
    /// Each grid input is first mapped from `color_space` into the engine's
    /// working encoding. Nodes are sampled in parallel and collected in file
    /// order, so the result matches sequential sampling exactly.
    pub fn bake(size: u32, settings: &ColorSettings, color_space: ColorSpace, clamp: bool) -> Self {
        let size = size.max(2);
        let count = node_count(size);
        tracing::debug!(size, %color_space, clamp, nodes = count, "baking 3D LUT");

        let data = (0..count)
            .into_par_iter()
            .map(|i| {
                let input = color_space.to_working(grid_input(size, i));
                let out = evaluate_transform(input, settings);
                if clamp {
                    out.map(|c| c.clamp(0.0, 1.0))
                } else {
                    out
                }
            })
            .collect();

        Self::from_data(size, data)
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_comment(mut self, comment: impl Into<String>) -> Self {
        self.comments.push(comment.into());
        self
    }

    /// Entry at integer grid coordinates.
    pub fn get(&self, r: u32, g: u32, b: u32) -> [f32; 3] {
        let n = self.size as usize;
        self.data[r as usize + g as usize * n + b as usize * n * n]
    }

    /// Apply this LUT to an RGB pixel using trilinear interpolation.
    ///
    /// Inputs outside the domain are clamped to its edges.
    pub fn apply(&self, rgb: [f32; 3]) -> [f32; 3] {
        let max_index = (self.size - 1) as f32;
        let mut lo = [0_u32; 3];
        let mut hi = [0_u32; 3];
        let mut frac = [0.0_f32; 3];
        for ch in 0..3 {
            let span = self.domain_max[ch] - self.domain_min[ch];
            let t = if span > 0.0 {
                ((rgb[ch] - self.domain_min[ch]) / span).clamp(0.0, 1.0)
            } else {
                0.0
            };
            let coord = t * max_index;
            let base = (coord.floor() as u32).min(self.size - 1);
            lo[ch] = base;
            hi[ch] = (base + 1).min(self.size - 1);
            frac[ch] = coord - base as f32;
        }

        let c000 = self.get(lo[0], lo[1], lo[2]);
        let c100 = self.get(hi[0], lo[1], lo[2]);
        let c010 = self.get(lo[0], hi[1], lo[2]);
        let c110 = self.get(hi[0], hi[1], lo[2]);
        let c001 = self.get(lo[0], lo[1], hi[2]);
        let c101 = self.get(hi[0], lo[1], hi[2]);
        let c011 = self.get(lo[0], hi[1], hi[2]);
        let c111 = self.get(hi[0], hi[1], hi[2]);

        let [fr, fg, fb] = frac;
        std::array::from_fn(|ch| {
            let c00 = lerp(c000[ch], c100[ch], fr);
            let c10 = lerp(c010[ch], c110[ch], fr);
            let c01 = lerp(c001[ch], c101[ch], fr);
            let c11 = lerp(c011[ch], c111[ch], fr);
            lerp(lerp(c00, c10, fg), lerp(c01, c11, fg), fb)
        })
    }

    /// Serialize as `.cube` text.
    pub fn write_cube<W: Write>(&self, mut writer: W) -> std::io::Result<()> {
        for comment in &self.comments {
            writeln!(writer, "# {comment}")?;
        }
        if let Some(title) = &self.title {
            writeln!(writer, "TITLE \"{}\"", title.replace('"', "'"))?;
        }
        writeln!(writer, "LUT_3D_SIZE {}", self.size)?;
        let [r0, g0, b0] = self.domain_min;
        let [r1, g1, b1] = self.domain_max;
        writeln!(writer, "DOMAIN_MIN {r0:.1} {g0:.1} {b0:.1}")?;
        writeln!(writer, "DOMAIN_MAX {r1:.1} {g1:.1} {b1:.1}")?;
        writeln!(writer)?;

        for rgb in &self.data {
            let [r, g, b] = rgb.map(no_negative_zero);
            writeln!(writer, "{r:.6} {g:.6} {b:.6}")?;
        }
        writer.flush()
    }

    /// Serialize as `.cube` text into a string.
    pub fn to_cube_string(&self) -> Result<String> {
        let nodes = self.data.len();
        let mut buf = Vec::with_capacity(nodes * 27 + 256);
        self.write_cube(&mut buf)?;
        Ok(String::from_utf8_lossy(&buf).into_owned())
    }

    /// Save this 3D LUT to a `.cube` file.
    pub fn save_cube(&self, path: &Path) -> Result<()> {
        let file = File::create(path)?;
        self.write_cube(BufWriter::new(file))?;
        Ok(())
    }

    /// Load a 3D LUT from a `.cube` file.
    pub fn load_cube(path: &Path) -> Result<Self> {
        let file = File::open(path)?;
        Self::read_cube(BufReader::new(file))
    }

    /// Parse `.cube` text.
    pub fn parse_cube(text: &str) -> Result<Self> {
        Self::read_cube(text.as_bytes())
    }

    fn read_cube<R: BufRead>(reader: R) -> Result<Self> {
        let mut size: Option<u32> = None;
        let mut title = None;
        let mut comments = Vec::new();
        let mut domain_min = [0.0_f32; 3];
        let mut domain_max = [1.0_f32; 3];
        let mut data: Vec<[f32; 3]> = Vec::new();

        for (line_no, line) in reader.lines().enumerate() {
            let line = line?;
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            if let Some(comment) = line.strip_prefix('#') {
                if data.is_empty() {
                    comments.push(comment.trim().to_string());
                }
                continue;
            }

            let mut parts = line.split_whitespace();
            let Some(keyword) = parts.next() else {
                continue;
            };
            match keyword {
                "TITLE" => {
                    let rest = line["TITLE".len()..].trim();
                    title = Some(rest.trim_matches('"').to_string());
                }
                "LUT_3D_SIZE" => {
                    let value = parts
                        .next()
                        .and_then(|v| v.parse::<u32>().ok())
                        .filter(|n| (2..=MAX_CUBE_SIZE).contains(n))
                        .ok_or_else(|| cube_error(line_no, "invalid LUT_3D_SIZE"))?;
                    size = Some(value);
                }
                "LUT_1D_SIZE" => {
                    return Err(cube_error(line_no, "expected a 3D LUT, found LUT_1D_SIZE"));
                }
                "DOMAIN_MIN" => domain_min = parse_triple(parts, line_no)?,
                "DOMAIN_MAX" => domain_max = parse_triple(parts, line_no)?,
                _ => data.push(parse_triple(line.split_whitespace(), line_no)?),
            }
        }

        let size = size.ok_or_else(|| LutsmithError::CubeParse("missing LUT_3D_SIZE".into()))?;
        let expected = node_count(size);
        if data.len() != expected {
            return Err(LutsmithError::CubeParse(format!(
                "expected {expected} entries for size {size}, found {}",
                data.len()
            )));
        }

        Ok(Self {
            size,
            data,
            title,
            comments,
            domain_min,
            domain_max,
        })
    }
}

/// Generate the `.cube` text for one preset export.
///
/// The header names the preset and the variant; the body holds `size³`
/// data lines sampled from the transform engine.
pub fn generate_cube(
    name: &str,
    size: LutSize,
    color_space: ColorSpace,
    variant_label: &str,
    clamp: bool,
    settings: &ColorSettings,
) -> Result<String> {
    let lut = Lut3D::bake(size.value(), settings, color_space, clamp)
        .with_comment(format!("Generated by lutsmith from preset {name}"))
        .with_comment(format!("Variant: {variant_label}"))
        .with_comment(format!("Input color space: {}", color_space.label()))
        .with_comment(format!("Clamped: {clamp}"))
        .with_title(format!("{name} {variant_label}"));
    let text = lut.to_cube_string()?;
    tracing::debug!(
        preset = name,
        variant = variant_label,
        bytes = text.len(),
        "generated .cube text"
    );
    Ok(text)
}

/// Largest `LUT_3D_SIZE` accepted when reading `.cube` files.
const MAX_CUBE_SIZE: u32 = 256;

fn node_count(size: u32) -> usize {
    let n = size as usize;
    n * n * n
}

/// Evenly spaced grid input for a flattened node index.
fn grid_input(size: u32, index: usize) -> [f32; 3] {
    let n = size as usize;
    let scale = (size - 1) as f32;
    let r = index % n;
    let g = (index / n) % n;
    let b = index / (n * n);
    [r as f32 / scale, g as f32 / scale, b as f32 / scale]
}

fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

/// Values that would print as `-0.000000` are written as zero.
fn no_negative_zero(value: f32) -> f32 {
    if value.abs() < 5e-7 { 0.0 } else { value }
}

fn parse_triple<'a>(mut parts: impl Iterator<Item = &'a str>, line_no: usize) -> Result<[f32; 3]> {
    let mut out = [0.0_f32; 3];
    for slot in &mut out {
        *slot = parts
            .next()
            .and_then(|v| v.parse::<f32>().ok())
            .ok_or_else(|| cube_error(line_no, "expected three numbers"))?;
    }
    if parts.next().is_some() {
        return Err(cube_error(line_no, "expected three numbers"));
    }
    Ok(out)
}

fn cube_error(line_no: usize, message: &str) -> LutsmithError {
    LutsmithError::CubeParse(format!("line {}: {message}", line_no + 1))
}
