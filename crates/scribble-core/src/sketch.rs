//! Sketch generation for geometric shapes.
//!
//! A [`SketchGenerator`] turns a geometric [`Primitive`] plus a resolved style
//! into a [`Drawable`]: a list of ready-to-paint paths. Shapes cache their
//! drawable at creation, so generation must be deterministic for fixed inputs.
//! The built-in [`RoughGenerator`] draws in a hand-drawn style seeded from the
//! shape's style.

use crate::shapes::{FillStyle, SerializableColor, ShapeStyle};
use kurbo::{Affine, BezPath, Circle, PathEl, Point, Rect, Shape as KurboShape, Vec2};
use serde::{Deserialize, Serialize};

/// Geometry handed to the sketch generator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Primitive {
    Line { start: Point, end: Point },
    /// Rectangle given by its first corner and signed extent.
    Rectangle { origin: Point, width: f64, height: f64 },
    Circle { center: Point, diameter: f64 },
    /// Closed polygon through the vertices in order.
    Polygon(Vec<Point>),
}

impl Primitive {
    /// Clean (un-sketched) outline of the primitive.
    pub fn to_path(&self) -> BezPath {
        match self {
            Primitive::Line { start, end } => {
                let mut path = BezPath::new();
                path.move_to(*start);
                path.line_to(*end);
                path
            }
            Primitive::Rectangle { origin, width, height } => {
                let mut path = BezPath::new();
                path.move_to(*origin);
                path.line_to(Point::new(origin.x + width, origin.y));
                path.line_to(Point::new(origin.x + width, origin.y + height));
                path.line_to(Point::new(origin.x, origin.y + height));
                path.close_path();
                path
            }
            Primitive::Circle { center, diameter } => {
                Circle::new(*center, diameter / 2.0).to_path(0.1)
            }
            Primitive::Polygon(points) => {
                let mut path = BezPath::new();
                if let Some((first, rest)) = points.split_first() {
                    path.move_to(*first);
                    for p in rest {
                        path.line_to(*p);
                    }
                    path.close_path();
                }
                path
            }
        }
    }

    /// Vertices of the closed region, if the primitive encloses one.
    fn region(&self) -> Option<Vec<Point>> {
        match self {
            Primitive::Line { .. } => None,
            Primitive::Rectangle { origin, width, height } => Some(vec![
                *origin,
                Point::new(origin.x + width, origin.y),
                Point::new(origin.x + width, origin.y + height),
                Point::new(origin.x, origin.y + height),
            ]),
            Primitive::Circle { center, diameter } => {
                const SEGMENTS: usize = 48;
                let radius = diameter / 2.0;
                Some(
                    (0..SEGMENTS)
                        .map(|i| {
                            let theta = i as f64 / SEGMENTS as f64 * std::f64::consts::TAU;
                            *center + Vec2::from_angle(theta) * radius
                        })
                        .collect(),
                )
            }
            Primitive::Polygon(points) => (points.len() >= 3).then(|| points.clone()),
        }
    }
}

/// How a drawable path is painted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OpKind {
    /// Stroked with the shape's stroke color and width.
    Stroke,
    /// Filled with the shape's fill color.
    FillPath,
    /// Hachure lines stroked with the fill color.
    FillSketch,
}

/// One path of a drawable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DrawOp {
    pub kind: OpKind,
    pub path: BezPath,
}

/// Generated, ready-to-paint description of a geometric shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Drawable {
    pub primitive: Primitive,
    pub ops: Vec<DrawOp>,
    pub stroke: SerializableColor,
    pub stroke_width: f64,
    pub fill: Option<SerializableColor>,
}

/// Produces drawables from primitives.
pub trait SketchGenerator: Send + Sync {
    fn generate(&self, primitive: Primitive, style: &ShapeStyle) -> Drawable;
}

/// Simple seeded random number generator (xorshift32).
struct SimpleRng {
    state: u32,
}

impl SimpleRng {
    fn new(seed: u32) -> Self {
        Self { state: seed.max(1) }
    }

    fn next_u32(&mut self) -> u32 {
        let mut x = self.state;
        x ^= x << 13;
        x ^= x >> 17;
        x ^= x << 5;
        self.state = x;
        x
    }

    /// Random float in range [-1, 1]
    fn next_f64(&mut self) -> f64 {
        (self.next_u32() as f64 / u32::MAX as f64) * 2.0 - 1.0
    }

    fn offset(&mut self, amount: f64) -> f64 {
        self.next_f64() * amount
    }
}

/// Hand-drawn style generator.
///
/// Each outline is stroked twice with different jitter so corners overshoot,
/// the way rough.js sketches. Solid fills use a lightly jittered outline and
/// hachure fills are parallel lines at -41 degrees.
#[derive(Debug, Clone)]
pub struct RoughGenerator {
    /// 0 = clean lines, 1 = slight wobble, 2+ = very sketchy.
    pub roughness: f64,
}

impl Default for RoughGenerator {
    fn default() -> Self {
        Self { roughness: 1.0 }
    }
}

impl RoughGenerator {
    pub const HACHURE_ANGLE_DEGREES: f64 = -41.0;

    pub fn new(roughness: f64) -> Self {
        Self { roughness }
    }

    fn jitter(&self, path: &BezPath, roughness: f64, seed: u32, stroke_index: u32) -> BezPath {
        if roughness <= 0.0 {
            return path.clone();
        }

        let max_randomness_offset = roughness * 2.0;
        let bowing = roughness;
        let combined_seed = seed.wrapping_add(stroke_index.wrapping_mul(99991));
        let mut rng = SimpleRng::new(combined_seed);

        let mut result = BezPath::new();
        let mut last_point = Point::ZERO;
        let mut subpath_start = Point::ZERO;

        let bowed_line = |rng: &mut SimpleRng, result: &mut BezPath, from: Point, to: Point| {
            let delta = to - from;
            let len = delta.hypot();
            let bow = rng.offset(bowing * roughness * len / 200.0);
            let perp = if len > 0.001 {
                Vec2::new(-delta.y / len, delta.x / len)
            } else {
                Vec2::ZERO
            };
            let mid = from.midpoint(to) + perp * bow;
            let end = Point::new(
                to.x + rng.offset(max_randomness_offset),
                to.y + rng.offset(max_randomness_offset),
            );
            result.quad_to(mid, end);
        };

        for el in path.elements() {
            match *el {
                PathEl::MoveTo(p) => {
                    result.move_to(Point::new(
                        p.x + rng.offset(max_randomness_offset),
                        p.y + rng.offset(max_randomness_offset),
                    ));
                    last_point = p;
                    subpath_start = p;
                }
                PathEl::LineTo(p) => {
                    bowed_line(&mut rng, &mut result, last_point, p);
                    last_point = p;
                }
                PathEl::QuadTo(p1, p2) => {
                    result.quad_to(
                        Point::new(
                            p1.x + rng.offset(max_randomness_offset * 0.7),
                            p1.y + rng.offset(max_randomness_offset * 0.7),
                        ),
                        Point::new(
                            p2.x + rng.offset(max_randomness_offset),
                            p2.y + rng.offset(max_randomness_offset),
                        ),
                    );
                    last_point = p2;
                }
                PathEl::CurveTo(p1, p2, p3) => {
                    result.curve_to(
                        Point::new(
                            p1.x + rng.offset(max_randomness_offset * 0.5),
                            p1.y + rng.offset(max_randomness_offset * 0.5),
                        ),
                        Point::new(
                            p2.x + rng.offset(max_randomness_offset * 0.5),
                            p2.y + rng.offset(max_randomness_offset * 0.5),
                        ),
                        Point::new(
                            p3.x + rng.offset(max_randomness_offset),
                            p3.y + rng.offset(max_randomness_offset),
                        ),
                    );
                    last_point = p3;
                }
                PathEl::ClosePath => {
                    // Sketch the closing edge explicitly so it overshoots too.
                    if last_point != subpath_start {
                        bowed_line(&mut rng, &mut result, last_point, subpath_start);
                        last_point = subpath_start;
                    }
                }
            }
        }

        result
    }
}

impl SketchGenerator for RoughGenerator {
    fn generate(&self, primitive: Primitive, style: &ShapeStyle) -> Drawable {
        let outline = primitive.to_path();
        let mut ops = Vec::new();

        if let (Some(region), Some(fill_style)) = (primitive.region(), style.fill_style) {
            match fill_style {
                FillStyle::Solid => ops.push(DrawOp {
                    kind: OpKind::FillPath,
                    path: self.jitter(&outline, self.roughness * 0.3, style.seed, 0),
                }),
                FillStyle::Hachure => {
                    let gap = (style.stroke_width * 4.0).max(4.0);
                    ops.push(DrawOp {
                        kind: OpKind::FillSketch,
                        path: self.jitter(
                            &hachure_lines(&region, gap, Self::HACHURE_ANGLE_DEGREES),
                            self.roughness * 0.5,
                            style.seed,
                            2,
                        ),
                    });
                }
                FillStyle::None => {}
            }
        }

        if self.roughness > 0.0 {
            for stroke_index in 0..2 {
                ops.push(DrawOp {
                    kind: OpKind::Stroke,
                    path: self.jitter(&outline, self.roughness, style.seed, stroke_index),
                });
            }
        } else {
            ops.push(DrawOp {
                kind: OpKind::Stroke,
                path: outline,
            });
        }

        Drawable {
            primitive,
            ops,
            stroke: style.stroke,
            stroke_width: style.stroke_width,
            fill: style.fill,
        }
    }
}

/// Upper bound on scanlines per hachure fill.
pub const MAX_HACHURE_LINES: usize = 10_000;

/// Parallel fill lines clipped to a polygon, `gap` apart at `angle_degrees`.
pub fn hachure_lines(polygon: &[Point], gap: f64, angle_degrees: f64) -> BezPath {
    let mut path = BezPath::new();
    if polygon.len() < 3 || gap <= 0.0 {
        return path;
    }

    let angle = angle_degrees.to_radians();
    let to_scan = Affine::rotate(-angle);
    let from_scan = Affine::rotate(angle);
    let rotated: Vec<Point> = polygon.iter().map(|p| to_scan * *p).collect();

    let bounds = rotated
        .iter()
        .fold(Rect::from_points(rotated[0], rotated[0]), |r, p| r.union_pt(*p));

    let lines = (bounds.height() / gap - 0.5).ceil();
    if !lines.is_finite() || lines <= 0.0 {
        return path;
    }
    for k in 0..(lines as usize).min(MAX_HACHURE_LINES) {
        let y = bounds.y0 + gap * (k as f64 + 0.5);
        let mut xs: Vec<f64> = Vec::new();
        for i in 0..rotated.len() {
            let a = rotated[i];
            let b = rotated[(i + 1) % rotated.len()];
            if (a.y <= y && b.y > y) || (b.y <= y && a.y > y) {
                let t = (y - a.y) / (b.y - a.y);
                xs.push(a.x + t * (b.x - a.x));
            }
        }
        xs.sort_by(f64::total_cmp);
        for pair in xs.chunks_exact(2) {
            path.move_to(from_scan * Point::new(pair[0], y));
            path.line_to(from_scan * Point::new(pair[1], y));
        }
    }

    path
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shapes::StyleOptions;
    use crate::tools::ToolKind;
    use uuid::Uuid;

    fn style(fill_style: FillStyle) -> ShapeStyle {
        let options = StyleOptions {
            fill_style,
            ..StyleOptions::default()
        };
        ShapeStyle::resolve(ToolKind::Rectangle, &options, Uuid::new_v4())
    }

    fn square() -> Primitive {
        Primitive::Rectangle {
            origin: Point::new(0.0, 0.0),
            width: 100.0,
            height: 100.0,
        }
    }

    #[test]
    fn test_generation_is_deterministic() {
        let style = style(FillStyle::Hachure);
        let generator = RoughGenerator::default();
        let a = generator.generate(square(), &style);
        let b = generator.generate(square(), &style);
        assert_eq!(a, b);
    }

    #[test]
    fn test_rough_strokes_twice() {
        let drawable = RoughGenerator::default().generate(square(), &style(FillStyle::None));
        let strokes = drawable.ops.iter().filter(|op| op.kind == OpKind::Stroke).count();
        assert_eq!(strokes, 2);
        assert!(drawable.fill.is_none());
    }

    #[test]
    fn test_clean_generator_keeps_outline() {
        let drawable = RoughGenerator::new(0.0).generate(square(), &style(FillStyle::None));
        assert_eq!(drawable.ops.len(), 1);
        assert_eq!(drawable.ops[0].path, square().to_path());
    }

    #[test]
    fn test_fill_ops() {
        let solid = RoughGenerator::default().generate(square(), &style(FillStyle::Solid));
        assert_eq!(solid.ops[0].kind, OpKind::FillPath);

        let hachure = RoughGenerator::default().generate(square(), &style(FillStyle::Hachure));
        assert_eq!(hachure.ops[0].kind, OpKind::FillSketch);
    }

    #[test]
    fn test_lines_are_never_filled() {
        let line = Primitive::Line {
            start: Point::new(0.0, 0.0),
            end: Point::new(10.0, 10.0),
        };
        let drawable = RoughGenerator::default().generate(line, &style(FillStyle::Solid));
        assert!(drawable.ops.iter().all(|op| op.kind == OpKind::Stroke));
    }

    #[test]
    fn test_hachure_lines_stay_inside() {
        let polygon = [
            Point::new(0.0, 0.0),
            Point::new(100.0, 0.0),
            Point::new(100.0, 100.0),
            Point::new(0.0, 100.0),
        ];
        let path = hachure_lines(&polygon, 10.0, -41.0);
        let mut count = 0;
        for el in path.elements() {
            if let PathEl::MoveTo(p) | PathEl::LineTo(p) = el {
                assert!(p.x > -1e-6 && p.x < 100.0 + 1e-6);
                assert!(p.y > -1e-6 && p.y < 100.0 + 1e-6);
                count += 1;
            }
        }
        assert!(count > 10);
    }

    fn square_polygon(origin: f64, side: f64) -> [Point; 4] {
        [
            Point::new(origin, origin),
            Point::new(origin + side, origin),
            Point::new(origin + side, origin + side),
            Point::new(origin, origin + side),
        ]
    }

    #[test]
    fn test_hachure_far_from_origin_terminates() {
        // A unit gap is below f64 resolution at this magnitude.
        let path = hachure_lines(&square_polygon(1e17, 1e3), 1.0, 0.0);
        assert!(path.elements().len() <= 2 * MAX_HACHURE_LINES);
    }

    #[test]
    fn test_hachure_line_count_capped() {
        let path = hachure_lines(&square_polygon(0.0, 1e12), 1.0, 0.0);
        assert_eq!(path.elements().len(), 2 * MAX_HACHURE_LINES);
        assert!(hachure_lines(&square_polygon(0.0, 10.0), f64::NAN, 0.0).elements().is_empty());
    }
}
