//! Shape style: colors, fill styles and per-tool style resolution.

use super::ShapeId;
use crate::error::CoreError;
use crate::tools::ToolKind;
use peniko::Color;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Serializable color representation (RGBA8).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SerializableColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl SerializableColor {
    pub fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub fn black() -> Self {
        Self::new(0, 0, 0, 255)
    }

    pub fn white() -> Self {
        Self::new(255, 255, 255, 255)
    }

    /// Parse `#rrggbb` or `#rrggbbaa`.
    pub fn from_hex(hex: &str) -> Result<Self, CoreError> {
        let invalid = || CoreError::InvalidColor(hex.to_string());
        let digits = hex.strip_prefix('#').ok_or_else(invalid)?;
        if !(digits.len() == 6 || digits.len() == 8) || !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(invalid());
        }
        let channel = |i: usize| u8::from_str_radix(&digits[i..i + 2], 16).map_err(|_| invalid());
        let a = if digits.len() == 8 { channel(6)? } else { 255 };
        Ok(Self::new(channel(0)?, channel(2)?, channel(4)?, a))
    }

    /// Format as `#RRGGBB`, or `#RRGGBBAA` when not fully opaque.
    pub fn to_hex(&self) -> String {
        if self.a == 255 {
            format!("#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
        } else {
            format!("#{:02X}{:02X}{:02X}{:02X}", self.r, self.g, self.b, self.a)
        }
    }

    /// Copy of this color with opacity baked into the alpha channel.
    ///
    /// An opacity of exactly 1 leaves the color untouched. Zero and NaN count
    /// as fully opaque.
    pub fn with_opacity(self, opacity: f64) -> Self {
        let opacity = normalize_opacity(opacity);
        if opacity == 1.0 {
            return self;
        }
        Self {
            a: (opacity * 255.0).round() as u8,
            ..self
        }
    }
}

fn normalize_opacity(opacity: f64) -> f64 {
    if opacity == 0.0 || opacity.is_nan() {
        1.0
    } else {
        opacity.clamp(0.0, 1.0)
    }
}

impl fmt::Display for SerializableColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl FromStr for SerializableColor {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_hex(s)
    }
}

impl From<Color> for SerializableColor {
    fn from(color: Color) -> Self {
        let rgba = color.to_rgba8();
        Self {
            r: rgba.r,
            g: rgba.g,
            b: rgba.b,
            a: rgba.a,
        }
    }
}

impl From<SerializableColor> for Color {
    fn from(color: SerializableColor) -> Self {
        Color::from_rgba8(color.r, color.g, color.b, color.a)
    }
}

/// Background fill style for closed shapes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FillStyle {
    #[default]
    None,
    Solid,
    /// Parallel diagonal lines.
    Hachure,
}

/// Style options chosen in the toolbar, before per-tool resolution.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StyleOptions {
    pub stroke: SerializableColor,
    pub stroke_opacity: f64,
    pub fill: SerializableColor,
    pub fill_style: FillStyle,
    pub stroke_width: f64,
    pub font_size: f64,
    pub font_family: String,
}

impl Default for StyleOptions {
    fn default() -> Self {
        Self {
            stroke: SerializableColor::black(),
            stroke_opacity: 1.0,
            fill: SerializableColor::white(),
            fill_style: FillStyle::None,
            stroke_width: 1.0,
            font_size: 24.0,
            font_family: "sans-serif".to_string(),
        }
    }
}

/// Font settings carried by text shapes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Font {
    pub size: f64,
    pub family: String,
}

/// Style stored on a shape, resolved for its tool.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShapeStyle {
    /// Stroke color with opacity baked in.
    pub stroke: SerializableColor,
    /// Opacity the stroke was resolved with.
    pub stroke_opacity: f64,
    /// Stroke width (zero for text).
    pub stroke_width: f64,
    /// Fill color; `None` when unfilled.
    pub fill: Option<SerializableColor>,
    /// Fill style; `None` when unfilled.
    pub fill_style: Option<FillStyle>,
    /// Font, set only for text shapes.
    pub font: Option<Font>,
    /// Seed for the sketch generator.
    pub seed: u32,
}

impl ShapeStyle {
    /// Resolve toolbar options into the style stored on a shape of `tool`.
    pub fn resolve(tool: ToolKind, options: &StyleOptions, id: ShapeId) -> Self {
        let stroke = options.stroke.with_opacity(options.stroke_opacity);
        let mut style = Self {
            stroke,
            stroke_opacity: options.stroke_opacity,
            stroke_width: options.stroke_width,
            fill: None,
            fill_style: None,
            font: None,
            seed: seed_from_id(id),
        };
        match tool {
            ToolKind::Line | ToolKind::Arrow | ToolKind::Pen => {}
            ToolKind::Text => {
                style.stroke_width = 0.0;
                style.font = Some(Font {
                    size: options.font_size,
                    family: options.font_family.clone(),
                });
            }
            _ => {
                if options.fill_style != FillStyle::None {
                    style.fill = Some(options.fill);
                    style.fill_style = Some(options.fill_style);
                }
            }
        }
        style
    }

    /// Opacity to paint with; zero and NaN count as fully opaque.
    pub fn opacity(&self) -> f64 {
        normalize_opacity(self.stroke_opacity)
    }

    /// Stroke color as a peniko Color.
    pub fn stroke_color(&self) -> Color {
        self.stroke.into()
    }

    /// Fill color as a peniko Color.
    pub fn fill_color(&self) -> Option<Color> {
        self.fill.map(Into::into)
    }
}

/// Derive a stable sketch seed from a shape id (splitmix32 finalizer).
pub fn seed_from_id(id: ShapeId) -> u32 {
    let bits = id.as_u128();
    let folded = (bits as u32) ^ ((bits >> 32) as u32) ^ ((bits >> 64) as u32) ^ ((bits >> 96) as u32);
    let mut x = folded.wrapping_mul(0x9E3779B9);
    x ^= x >> 16;
    x = x.wrapping_mul(0x85EBCA6B);
    x ^= x >> 13;
    x = x.wrapping_mul(0xC2B2AE35);
    x ^= x >> 16;
    x.max(1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    #[test]
    fn test_hex_parsing() {
        let color = SerializableColor::from_hex("#ff8000").unwrap();
        assert_eq!(color, SerializableColor::new(255, 128, 0, 255));
        assert_eq!(color.to_hex(), "#FF8000");
        assert!(SerializableColor::from_hex("ff8000").is_err());
        assert!(SerializableColor::from_hex("#ff80").is_err());
        assert!(SerializableColor::from_hex("#gg8000").is_err());
        assert!(SerializableColor::from_hex("#+f+f+f").is_err());
        assert!(SerializableColor::from_hex("#ff8000+1").is_err());
    }

    #[test]
    fn test_opacity_baked_into_alpha() {
        let black = SerializableColor::black();
        assert_eq!(black.with_opacity(1.0), black);
        assert_eq!(black.with_opacity(0.5).to_hex(), "#00000080");
        assert_eq!(black.with_opacity(2.0), black);
        assert_eq!(black.with_opacity(0.0), black);
    }

    #[test]
    fn test_resolve_per_tool() {
        let options = StyleOptions {
            fill_style: FillStyle::Hachure,
            stroke_opacity: 0.5,
            ..StyleOptions::default()
        };
        let id = Uuid::new_v4();

        let line = ShapeStyle::resolve(ToolKind::Line, &options, id);
        assert!(line.fill.is_none());
        assert_eq!(line.stroke.a, 128);

        let rect = ShapeStyle::resolve(ToolKind::Rectangle, &options, id);
        assert_eq!(rect.fill_style, Some(FillStyle::Hachure));
        assert_eq!(rect.fill, Some(SerializableColor::white()));

        let text = ShapeStyle::resolve(ToolKind::Text, &options, id);
        assert_eq!(text.font.as_ref().map(|f| f.size), Some(24.0));
        assert!(text.fill.is_none());
    }

    #[test]
    fn test_unfilled_when_fill_style_none() {
        let style = ShapeStyle::resolve(ToolKind::Circle, &StyleOptions::default(), Uuid::new_v4());
        assert!(style.fill.is_none());
        assert!(style.fill_style.is_none());
    }

    #[test]
    fn test_seed_is_stable() {
        let id = Uuid::new_v4();
        assert_eq!(seed_from_id(id), seed_from_id(id));
        assert_ne!(seed_from_id(Uuid::nil()), 0);
    }
}
