//! Camera Raw / Lightroom XMP preset parser.
//!
//! A preset is an XMP packet whose `rdf:Description` element carries the
//! develop settings as `crs:`-prefixed attributes:
//!
//! ```xml
//! <x:xmpmeta xmlns:x="adobe:ns:meta/">
//!  <rdf:RDF xmlns:rdf="http://www.w3.org/1999/02/22-rdf-syntax-ns#">
//!   <rdf:Description xmlns:crs="http://ns.adobe.com/camera-raw-settings/1.0/"
//!     crs:Exposure2012="+0.35" crs:Contrast2012="+12" crs:ConvertToGrayscale="False">
//!    <crs:ToneCurvePV2012>
//!     <rdf:Seq>
//!      <rdf:li>0, 0</rdf:li>
//!      <rdf:li>255, 255</rdf:li>
//!     </rdf:Seq>
//!    </crs:ToneCurvePV2012>
//!   </rdf:Description>
//!  </rdf:RDF>
//! </x:xmpmeta>
//! ```
//!
//! Settings may also appear as simple child elements of the description
//! (`<crs:Exposure2012>+0.35</crs:Exposure2012>`). Attributes win when both
//! forms are present.
//!
//! Only a malformed document is an error. Missing or unparseable fields fall
//! back to their neutral value.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use quick_xml::Reader;
use quick_xml::escape::resolve_predefined_entity;
use quick_xml::events::{BytesRef, BytesStart, Event};

use crate::error::{LutsmithError, Result};
use crate::transform::params::{
    Calibration, ColorSettings, HslAdjustments, HueChannel, HueChannels, PrimaryAdjustment,
    SplitToning, ToneCurve, ToneCurves, ToneZone,
};

/// Attribute prefix of the Camera Raw settings namespace.
const CRS_PREFIX: &str = "crs";

/// A parsed preset document.
#[derive(Debug, Clone, PartialEq)]
pub struct Preset {
    /// Display name from `crs:Name`, when the preset carries one.
    pub name: Option<String>,
    pub settings: ColorSettings,
}

/// Parse preset text into fully-defaulted settings.
pub fn parse_preset(text: &str) -> Result<ColorSettings> {
    parse_preset_document(text).map(|preset| preset.settings)
}

/// Parse preset text, keeping the preset's display name.
pub fn parse_preset_document(text: &str) -> Result<Preset> {
    let raw = RawPreset::collect(text)?;
    Ok(Preset {
        name: raw.name(),
        settings: raw.settings(),
    })
}

/// Read and parse a preset file. Parse failures name the file.
pub fn read_preset(path: &Path) -> Result<Preset> {
    let text = fs::read_to_string(path)?;
    parse_preset_document(&text).map_err(|err| match err {
        LutsmithError::Xml(message) => LutsmithError::Preset {
            path: path.to_path_buf(),
            message,
        },
        other => other,
    })
}

/// Parse a numeric attribute string, defaulting to 0.
///
/// Accepts a leading `+`, surrounding whitespace and trailing garbage after
/// a numeric prefix (`"12.5 "`, `"+16"`, `"-30"`, `"7px"`).
pub fn parse_number(value: Option<&str>) -> f32 {
    let Some(value) = value else {
        return 0.0;
    };
    let trimmed = value.trim();
    let trimmed = trimmed.strip_prefix('+').unwrap_or(trimmed);
    if let Ok(v) = trimmed.parse::<f32>() {
        return if v.is_finite() { v } else { 0.0 };
    }

    let end = trimmed
        .char_indices()
        .find(|&(i, c)| !(c.is_ascii_digit() || c == '.' || (i == 0 && c == '-')))
        .map_or(trimmed.len(), |(i, _)| i);
    match trimmed[..end].parse::<f32>() {
        Ok(v) if v.is_finite() => v,
        _ => {
            tracing::trace!(value, "unparseable numeric value, using 0");
            0.0
        }
    }
}

/// Parse a boolean attribute: case-insensitive `"true"`.
pub fn parse_bool(value: Option<&str>) -> bool {
    value.is_some_and(|v| v.trim().eq_ignore_ascii_case("true"))
}

/// Parse tone curve list items (`"x, y"`), skipping malformed entries.
pub fn parse_curve_points<'a>(items: impl IntoIterator<Item = &'a str>) -> Vec<[f32; 2]> {
    items
        .into_iter()
        .filter_map(|item| {
            let mut parts = item.split(',').map(|p| p.trim().parse::<f32>());
            match (parts.next(), parts.next(), parts.next()) {
                (Some(Ok(x)), Some(Ok(y)), None) if x.is_finite() && y.is_finite() => Some([x, y]),
                _ => {
                    tracing::trace!(item, "skipping malformed tone curve point");
                    None
                }
            }
        })
        .collect()
}

/// Raw string values pulled out of the document, keyed by local name.
#[derive(Debug, Default)]
struct RawPreset {
    attributes: HashMap<String, String>,
    elements: HashMap<String, String>,
    lists: HashMap<String, Vec<String>>,
}

struct OpenElement {
    name: String,
    has_children: bool,
}

fn split_qname(name: &str) -> (Option<&str>, &str) {
    match name.split_once(':') {
        Some((prefix, local)) => (Some(prefix), local),
        None => (None, name),
    }
}

fn crs_local(name: &str) -> Option<&str> {
    match split_qname(name) {
        (Some(CRS_PREFIX), local) => Some(local),
        _ => None,
    }
}

/// Resolve `&name;` or `&#N;` into `buf`. Only the predefined XML entities
/// are known; anything else is a malformed document.
fn push_entity(buf: &mut String, e: &BytesRef<'_>) -> Result<()> {
    if let Some(ch) = e
        .resolve_char_ref()
        .map_err(|err| LutsmithError::Xml(err.to_string()))?
    {
        buf.push(ch);
        return Ok(());
    }
    let name = e
        .decode()
        .map_err(|err| LutsmithError::Xml(err.to_string()))?;
    let resolved = resolve_predefined_entity(&name)
        .ok_or_else(|| LutsmithError::Xml(format!("unknown entity &{name};")))?;
    buf.push_str(resolved);
    Ok(())
}

fn qname(e: &BytesStart<'_>) -> String {
    String::from_utf8_lossy(e.name().as_ref()).into_owned()
}

impl RawPreset {
    fn collect(text: &str) -> Result<Self> {
        // Text is trimmed once per element, so whitespace around entity
        // references inside a value survives.
        let mut xml = Reader::from_str(text);

        let mut raw = RawPreset::default();
        let mut stack: Vec<OpenElement> = Vec::new();
        let mut text_buf = String::new();
        let mut saw_root = false;

        loop {
            match xml.read_event() {
                Ok(Event::Start(e)) => {
                    saw_root = true;
                    let name = qname(&e);
                    if split_qname(&name).1 == "Description" {
                        raw.absorb_attributes(&e)?;
                    }
                    if let Some(parent) = stack.last_mut() {
                        parent.has_children = true;
                    }
                    stack.push(OpenElement {
                        name,
                        has_children: false,
                    });
                    text_buf.clear();
                }
                Ok(Event::Empty(e)) => {
                    saw_root = true;
                    if split_qname(&qname(&e)).1 == "Description" {
                        raw.absorb_attributes(&e)?;
                    }
                    if let Some(parent) = stack.last_mut() {
                        parent.has_children = true;
                    }
                }
                Ok(Event::Text(e)) => {
                    let decoded = e
                        .decode()
                        .map_err(|err| LutsmithError::Xml(err.to_string()))?;
                    text_buf.push_str(&decoded);
                }
                Ok(Event::GeneralRef(e)) => push_entity(&mut text_buf, &e)?,
                Ok(Event::End(_)) => {
                    let Some(open) = stack.pop() else {
                        return Err(LutsmithError::Xml("unexpected closing tag".into()));
                    };
                    raw.close_element(&open, &stack, text_buf.trim());
                    text_buf.clear();
                }
                Ok(Event::Eof) => break,
                Err(err) => {
                    return Err(LutsmithError::Xml(format!(
                        "at byte {}: {err}",
                        xml.error_position()
                    )));
                }
                _ => {}
            }
        }

        if let Some(open) = stack.last() {
            return Err(LutsmithError::Xml(format!(
                "unexpected end of document inside <{}>",
                open.name
            )));
        }
        if !saw_root {
            return Err(LutsmithError::Xml("document has no root element".into()));
        }
        Ok(raw)
    }

    fn absorb_attributes(&mut self, e: &BytesStart<'_>) -> Result<()> {
        for attr in e.attributes() {
            let attr = attr.map_err(|err| LutsmithError::Xml(err.to_string()))?;
            let key = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
            let Some(local) = crs_local(&key) else {
                continue;
            };
            let value = attr
                .unescape_value()
                .map_err(|err| LutsmithError::Xml(err.to_string()))?;
            self.attributes
                .entry(local.to_string())
                .or_insert_with(|| value.into_owned());
        }
        Ok(())
    }

    fn close_element(&mut self, open: &OpenElement, ancestors: &[OpenElement], text: &str) {
        if split_qname(&open.name).1 == "li" {
            // List items belong to the nearest enclosing crs: element.
            if let Some(owner) = ancestors.iter().rev().find_map(|a| crs_local(&a.name)) {
                self.lists
                    .entry(owner.to_string())
                    .or_default()
                    .push(text.to_string());
            }
            return;
        }
        if open.has_children {
            return;
        }
        if let Some(local) = crs_local(&open.name) {
            self.elements
                .entry(local.to_string())
                .or_insert_with(|| text.to_string());
        }
    }

    /// First non-empty value among `names`, attributes before elements.
    fn value(&self, names: &[&str]) -> Option<&str> {
        names.iter().find_map(|name| {
            self.attributes
                .get(*name)
                .or_else(|| self.elements.get(*name))
                .map(String::as_str)
                .filter(|v| !v.is_empty())
        })
    }

    fn number(&self, names: &[&str]) -> f32 {
        parse_number(self.value(names))
    }

    fn hue_channels(&self, prefix: &str) -> HueChannels {
        let mut channels = HueChannels::default();
        for channel in HueChannel::ALL {
            let name = format!("{prefix}{}", channel.label());
            *channels.get_mut(channel) = self.number(&[&name]);
        }
        channels
    }

    fn curve(&self, name: &str) -> ToneCurve {
        match self.lists.get(name) {
            Some(items) => ToneCurve::new(parse_curve_points(items.iter().map(String::as_str))),
            None => ToneCurve::identity(),
        }
    }

    fn primary(&self, color: &str) -> PrimaryAdjustment {
        PrimaryAdjustment {
            hue: self.number(&[
                &format!("CameraProfile{color}PrimaryHue"),
                &format!("{color}Hue"),
            ]),
            saturation: self.number(&[
                &format!("CameraProfile{color}PrimarySaturation"),
                &format!("{color}Saturation"),
            ]),
        }
    }

    fn name(&self) -> Option<String> {
        self.value(&["Name"])
            .map(str::to_string)
            .or_else(|| {
                self.lists
                    .get("Name")
                    .and_then(|items| items.iter().find(|s| !s.is_empty()).cloned())
            })
    }

    fn settings(&self) -> ColorSettings {
        ColorSettings {
            exposure: self.number(&["Exposure2012"]),
            contrast: self.number(&["Contrast2012"]),
            highlights: self.number(&["Highlights2012"]),
            shadows: self.number(&["Shadows2012"]),
            whites: self.number(&["Whites2012"]),
            blacks: self.number(&["Blacks2012"]),
            clarity: self.number(&["Clarity2012"]),
            dehaze: self.number(&["Dehaze"]),
            texture: self.number(&["Texture"]),
            vibrance: self.number(&["Vibrance"]),
            saturation: self.number(&["Saturation"]),

            temperature: self.number(&["IncrementalTemperature"]),
            tint: self.number(&["IncrementalTint"]),

            convert_to_grayscale: parse_bool(self.value(&["ConvertToGrayscale"])),
            gray_mixer: self.hue_channels("GrayMixer"),

            hsl: HslAdjustments {
                hue: self.hue_channels("HueAdjustment"),
                saturation: self.hue_channels("SaturationAdjustment"),
                luminance: self.hue_channels("LuminanceAdjustment"),
            },

            split_toning: SplitToning {
                shadow: ToneZone {
                    hue: self.number(&["SplitToningShadowHue", "ColorGradeShadowHue"]),
                    saturation: self
                        .number(&["SplitToningShadowSaturation", "ColorGradeShadowSat"]),
                    luminance: self.number(&["ColorGradeShadowLum"]),
                },
                midtone: ToneZone {
                    hue: self.number(&["ColorGradeMidtoneHue"]),
                    saturation: self.number(&["ColorGradeMidtoneSat"]),
                    luminance: self.number(&["ColorGradeMidtoneLum"]),
                },
                highlight: ToneZone {
                    hue: self.number(&["SplitToningHighlightHue", "ColorGradeHighlightHue"]),
                    saturation: self
                        .number(&["SplitToningHighlightSaturation", "ColorGradeHighlightSat"]),
                    luminance: self.number(&["ColorGradeHighlightLum"]),
                },
                balance: self.number(&["SplitToningBalance"]),
                blending: self.number(&["ColorGradeBlending"]),
            },

            calibration: Calibration {
                shadow_tint: self.number(&["ShadowTint"]),
                red: self.primary("Red"),
                green: self.primary("Green"),
                blue: self.primary("Blue"),
            },

            tone_curve: ToneCurves {
                rgb: self.curve("ToneCurvePV2012"),
                red: self.curve("ToneCurvePV2012Red"),
                green: self.curve("ToneCurvePV2012Green"),
                blue: self.curve("ToneCurvePV2012Blue"),
            },
        }
    }
}
