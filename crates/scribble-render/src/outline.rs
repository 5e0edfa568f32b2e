//! Freehand stroke outlines.
//!
//! A freehand shape stores the raw pointer samples. Before painting, an
//! [`StrokeOutliner`] turns them into the closed polygon of a variable-width
//! stroke, which [`path_from_stroke`] smooths into quadratic segments.

use kurbo::{BezPath, Point, Vec2};
use scribble_core::StrokeOptions;
use std::f64::consts::PI;

/// Builds the outline polygon of a pen stroke.
pub trait StrokeOutliner: Send + Sync {
    /// Outline of the stroke through `points` with diameter `size`.
    fn outline(&self, points: &[Point], options: &StrokeOptions, size: f64) -> Vec<Point>;
}

/// Velocity-thinned outliner with round caps.
///
/// Fast strokes get thinner, slow ones approach the full diameter. A stroke
/// with a single distinct point becomes a round dot.
#[derive(Debug, Clone, Copy, Default)]
pub struct FreehandOutliner;

impl FreehandOutliner {
    /// How quickly simulated pressure follows pointer speed.
    const PRESSURE_RATE: f64 = 0.275;
    const CAP_SEGMENTS: usize = 8;
    const DOT_SEGMENTS: usize = 16;

    pub fn new() -> Self {
        Self
    }

    /// Pull each sample toward the previous one; `streamline` 0 keeps raw input.
    fn streamline(points: &[Point], streamline: f64) -> Vec<Point> {
        let t = 0.15 + (1.0 - streamline.clamp(0.0, 1.0)) * 0.85;
        let mut result: Vec<Point> = Vec::with_capacity(points.len());
        for (i, &p) in points.iter().enumerate() {
            let next = match result.last() {
                Some(&prev) if i + 1 < points.len() => prev.lerp(p, t),
                _ => p,
            };
            if result.last().is_none_or(|prev| prev.distance(next) > 1e-6) {
                result.push(next);
            }
        }
        result
    }

    fn radius(size: f64, thinning: f64, pressure: f64) -> f64 {
        (size * (0.5 - thinning * (0.5 - pressure))).max(0.01)
    }

    fn dot(center: Point, radius: f64) -> Vec<Point> {
        (0..Self::DOT_SEGMENTS)
            .map(|i| {
                let theta = 2.0 * PI * i as f64 / Self::DOT_SEGMENTS as f64;
                center + Vec2::new(theta.cos(), theta.sin()) * radius
            })
            .collect()
    }

    /// Half circle around `center`, sweeping from `from` through `through`.
    fn cap(out: &mut Vec<Point>, center: Point, from: Vec2, through: Vec2, radius: f64) {
        for i in 0..=Self::CAP_SEGMENTS {
            let theta = PI * i as f64 / Self::CAP_SEGMENTS as f64;
            out.push(center + (from * theta.cos() + through * theta.sin()) * radius);
        }
    }
}

impl StrokeOutliner for FreehandOutliner {
    fn outline(&self, points: &[Point], options: &StrokeOptions, size: f64) -> Vec<Point> {
        let pts = Self::streamline(points, options.streamline);
        match pts.len() {
            0 => return Vec::new(),
            1 => return Self::dot(pts[0], Self::radius(size, options.thinning, 0.5)),
            _ => {}
        }

        let mut pressure = 0.5;
        let mut radii = Vec::with_capacity(pts.len());
        for (i, p) in pts.iter().enumerate() {
            if i > 0 {
                let speed = (p.distance(pts[i - 1]) / size.max(f64::EPSILON)).min(1.0);
                let target = 1.0 - speed;
                pressure = (pressure + (target - pressure) * speed * Self::PRESSURE_RATE).min(1.0);
            }
            radii.push(Self::radius(size, options.thinning, pressure));
        }

        let min_distance = size * options.smoothing;
        let last = pts.len() - 1;
        let mut direction = (pts[1] - pts[0]).normalize();
        let mut left: Vec<Point> = Vec::with_capacity(pts.len());
        let mut right: Vec<Point> = Vec::with_capacity(pts.len());
        for i in 0..=last {
            let before = pts[i.saturating_sub(1)];
            let after = pts[(i + 1).min(last)];
            let tangent = after - before;
            if tangent.hypot() > 1e-9 {
                direction = tangent.normalize();
            }
            let normal = Vec2::new(-direction.y, direction.x);
            let l = pts[i] + normal * radii[i];
            let r = pts[i] - normal * radii[i];
            let crowded = left.last().is_some_and(|prev| prev.distance(l) < min_distance);
            if !crowded || i == last {
                left.push(l);
                right.push(r);
            }
        }

        let start_dir = (pts[1] - pts[0]).normalize();
        let start_normal = Vec2::new(-start_dir.y, start_dir.x);
        let end_dir = (pts[last] - pts[last - 1]).normalize();
        let end_normal = Vec2::new(-end_dir.y, end_dir.x);

        let mut outline = Vec::with_capacity(left.len() + right.len() + 2 * (Self::CAP_SEGMENTS + 1));
        Self::cap(&mut outline, pts[0], -start_normal, -start_dir, radii[0]);
        outline.extend(left.iter().skip(1));
        Self::cap(&mut outline, pts[last], end_normal, end_dir, radii[last]);
        outline.extend(right.iter().rev().skip(1));
        outline
    }
}

/// SVG path data for a closed stroke outline.
///
/// `M p0 Q p1 mid(p1,p2) T mid(p2,p3) … Z`; fewer than four points give the
/// empty string.
pub fn svg_path_from_stroke(points: &[Point]) -> String {
    let len = points.len();
    if len < 4 {
        return String::new();
    }

    let (a, b, c) = (points[0], points[1], points[2]);
    let mid = b.midpoint(c);
    let mut result = format!(
        "M{} Q{} {} T",
        fixed_point(a),
        fixed_point(b),
        fixed_point(mid)
    );
    for pair in points[2..].windows(2) {
        result.push_str(&fixed_point(pair[0].midpoint(pair[1])));
        result.push(' ');
    }
    result.push('Z');
    result
}

/// `x,y` with two decimals; values that round to zero print unsigned.
fn fixed_point(p: Point) -> String {
    let fixed = |v: f64| if (v * 100.0).round() == 0.0 { 0.0 } else { v };
    format!("{:.2},{:.2}", fixed(p.x), fixed(p.y))
}

/// The path described by [`svg_path_from_stroke`], built directly.
///
/// Each smooth quadratic reflects the previous control point about the
/// previous end point.
pub fn path_from_stroke(points: &[Point]) -> BezPath {
    let mut path = BezPath::new();
    if points.len() < 4 {
        return path;
    }

    let mut control = points[1];
    let mut end = points[1].midpoint(points[2]);
    path.move_to(points[0]);
    path.quad_to(control, end);
    for pair in points[2..].windows(2) {
        control = end + (end - control);
        end = pair[0].midpoint(pair[1]);
        path.quad_to(control, end);
    }
    path.close_path();
    path
}
