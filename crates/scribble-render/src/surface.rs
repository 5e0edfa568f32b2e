//! Canvas surface abstraction.
//!
//! The renderer only ever talks to a [`Surface`], a small 2D-context style
//! state machine. [`RecordingSurface`] keeps every call as a display list,
//! which is what tests assert against and what the SVG export walks.

use kurbo::{BezPath, Point, Rect, Size};
use peniko::Color;
use scribble_core::shapes::{Font, SerializableColor};
use std::sync::Arc;

/// Vertical anchor used when placing text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TextBaseline {
    /// The text origin is the top of the em box.
    Top,
    #[default]
    Alphabetic,
    Middle,
    Bottom,
}

/// RGBA8 pixels ready to paint.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DecodedImage {
    pub width: u32,
    pub height: u32,
    pub rgba: Arc<Vec<u8>>,
}

impl DecodedImage {
    /// Natural size of the image in canvas units.
    pub fn size(&self) -> Size {
        Size::new(self.width as f64, self.height as f64)
    }
}

/// Drawing target for shapes.
pub trait Surface {
    fn set_fill_color(&mut self, color: Color);
    fn set_stroke_color(&mut self, color: Color);
    fn set_line_width(&mut self, width: f64);
    /// Multiplier applied to everything painted afterwards.
    fn set_global_alpha(&mut self, alpha: f64);
    fn fill_path(&mut self, path: &BezPath);
    fn stroke_path(&mut self, path: &BezPath);
    fn set_font(&mut self, font: &Font);
    fn set_text_baseline(&mut self, baseline: TextBaseline);
    fn fill_text(&mut self, text: &str, origin: Point);
    /// Paint `image` scaled into `dest`.
    fn draw_image(&mut self, image: &DecodedImage, dest: Rect);
}

/// One recorded surface call, with the state it was painted with.
#[derive(Debug, Clone, PartialEq)]
pub enum SurfaceOp {
    FillPath {
        path: BezPath,
        color: SerializableColor,
        alpha: f64,
    },
    StrokePath {
        path: BezPath,
        color: SerializableColor,
        width: f64,
        alpha: f64,
    },
    FillText {
        text: String,
        origin: Point,
        font: Font,
        baseline: TextBaseline,
        color: SerializableColor,
        alpha: f64,
    },
    DrawImage {
        width: u32,
        height: u32,
        dest: Rect,
        alpha: f64,
    },
}

/// Surface that records a display list instead of rasterizing.
#[derive(Debug, Clone)]
pub struct RecordingSurface {
    ops: Vec<SurfaceOp>,
    fill: SerializableColor,
    stroke: SerializableColor,
    line_width: f64,
    alpha: f64,
    font: Font,
    baseline: TextBaseline,
}

impl Default for RecordingSurface {
    fn default() -> Self {
        Self {
            ops: Vec::new(),
            fill: SerializableColor::black(),
            stroke: SerializableColor::black(),
            line_width: 1.0,
            alpha: 1.0,
            font: Font {
                size: 10.0,
                family: "sans-serif".to_string(),
            },
            baseline: TextBaseline::default(),
        }
    }
}

impl RecordingSurface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn ops(&self) -> &[SurfaceOp] {
        &self.ops
    }

    pub fn clear(&mut self) {
        self.ops.clear();
    }

    /// Render the display list as a standalone SVG document.
    pub fn to_svg(&self, size: Size) -> String {
        let mut svg = format!(
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}">"#,
            w = size.width,
            h = size.height,
        );
        svg.push('\n');
        for op in &self.ops {
            let element = match op {
                SurfaceOp::FillPath { path, color, alpha } => format!(
                    r#"  <path d="{}" fill="{}" fill-opacity="{}"/>"#,
                    path.to_svg(),
                    svg_color(color),
                    svg_opacity(color, *alpha),
                ),
                SurfaceOp::StrokePath {
                    path,
                    color,
                    width,
                    alpha,
                } => format!(
                    r#"  <path d="{}" fill="none" stroke="{}" stroke-width="{}" stroke-opacity="{}" stroke-linecap="round" stroke-linejoin="round"/>"#,
                    path.to_svg(),
                    svg_color(color),
                    width,
                    svg_opacity(color, *alpha),
                ),
                SurfaceOp::FillText {
                    text,
                    origin,
                    font,
                    baseline,
                    color,
                    alpha,
                } => format!(
                    r#"  <text x="{}" y="{}" font-size="{}" font-family="{}" dominant-baseline="{}" fill="{}" fill-opacity="{}">{}</text>"#,
                    origin.x,
                    origin.y,
                    font.size,
                    escape(&font.family),
                    svg_baseline(*baseline),
                    svg_color(color),
                    svg_opacity(color, *alpha),
                    escape(text),
                ),
                SurfaceOp::DrawImage { dest, alpha, .. } => format!(
                    r##"  <rect class="image" x="{}" y="{}" width="{}" height="{}" fill="#dddddd" opacity="{}"/>"##,
                    dest.x0,
                    dest.y0,
                    dest.width(),
                    dest.height(),
                    alpha,
                ),
            };
            svg.push_str(&element);
            svg.push('\n');
        }
        svg.push_str("</svg>\n");
        svg
    }
}

impl Surface for RecordingSurface {
    fn set_fill_color(&mut self, color: Color) {
        self.fill = color.into();
    }

    fn set_stroke_color(&mut self, color: Color) {
        self.stroke = color.into();
    }

    fn set_line_width(&mut self, width: f64) {
        self.line_width = width;
    }

    fn set_global_alpha(&mut self, alpha: f64) {
        self.alpha = alpha.clamp(0.0, 1.0);
    }

    fn fill_path(&mut self, path: &BezPath) {
        self.ops.push(SurfaceOp::FillPath {
            path: path.clone(),
            color: self.fill,
            alpha: self.alpha,
        });
    }

    fn stroke_path(&mut self, path: &BezPath) {
        self.ops.push(SurfaceOp::StrokePath {
            path: path.clone(),
            color: self.stroke,
            width: self.line_width,
            alpha: self.alpha,
        });
    }

    fn set_font(&mut self, font: &Font) {
        self.font = font.clone();
    }

    fn set_text_baseline(&mut self, baseline: TextBaseline) {
        self.baseline = baseline;
    }

    fn fill_text(&mut self, text: &str, origin: Point) {
        self.ops.push(SurfaceOp::FillText {
            text: text.to_string(),
            origin,
            font: self.font.clone(),
            baseline: self.baseline,
            color: self.fill,
            alpha: self.alpha,
        });
    }

    fn draw_image(&mut self, image: &DecodedImage, dest: Rect) {
        self.ops.push(SurfaceOp::DrawImage {
            width: image.width,
            height: image.height,
            dest,
            alpha: self.alpha,
        });
    }
}

fn svg_color(color: &SerializableColor) -> String {
    format!("#{:02x}{:02x}{:02x}", color.r, color.g, color.b)
}

fn svg_opacity(color: &SerializableColor, alpha: f64) -> f64 {
    color.a as f64 / 255.0 * alpha
}

fn svg_baseline(baseline: TextBaseline) -> &'static str {
    match baseline {
        TextBaseline::Top => "hanging",
        TextBaseline::Alphabetic => "alphabetic",
        TextBaseline::Middle => "middle",
        TextBaseline::Bottom => "text-after-edge",
    }
}

fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}
