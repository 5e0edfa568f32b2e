//! Point arithmetic and proximity tests.
//!
//! Everything here is a pure function over [`kurbo::Point`] and [`kurbo::Rect`].
//! Rectangles are treated as two arbitrary corner points; nothing here assumes
//! `x0 <= x1` unless it says so.

use kurbo::{Point, Rect, Vec2};

/// Component-wise sum of two points.
pub fn add_points(p1: Point, p2: Point) -> Point {
    p1 + p2.to_vec2()
}

/// Component-wise difference `p1 - p2`, as a point.
pub fn diff_points(p1: Point, p2: Point) -> Point {
    (p1 - p2).to_point()
}

/// Divide both coordinates by `scale` (screen to world under a zoom factor).
pub fn scale_points(p: Point, scale: f64) -> Point {
    Point::new(p.x / scale, p.y / scale)
}

/// Arithmetic mean of two values.
pub fn average(a: f64, b: f64) -> f64 {
    (a + b) / 2.0
}

/// Euclidean distance between two points.
pub fn distance(a: Point, b: Point) -> f64 {
    a.distance(b)
}

/// Whether `point` is within `tolerance` of `target` on both axes
/// (Chebyshev distance strictly below the tolerance).
pub fn near_point(point: Point, target: Point, tolerance: f64) -> bool {
    (point.x - target.x).abs() < tolerance && (point.y - target.y).abs() < tolerance
}

/// Triangle-inequality test for `c` lying on segment `a`-`b`.
///
/// The detour `d(a,c) + d(b,c)` exceeds `d(a,b)` by less than `max_offset`
/// only close to the segment, so this also acts as a thin elliptical band.
pub fn on_segment(a: Point, b: Point, c: Point, max_offset: f64) -> bool {
    let offset = distance(a, b) - (distance(a, c) + distance(b, c));
    offset.abs() < max_offset
}

/// Distance from a point to a line segment (a-b).
pub fn point_to_segment_dist(point: Point, a: Point, b: Point) -> f64 {
    let seg = b - a;
    let pv = point - a;
    let len_sq = seg.hypot2();
    if len_sq < f64::EPSILON {
        return pv.hypot();
    }
    let t = (pv.dot(seg) / len_sq).clamp(0.0, 1.0);
    let proj = a + seg * t;
    point.distance(proj)
}

/// Inclusive containment test on the normalized form of `rect`.
pub fn box_contains(rect: Rect, point: Point) -> bool {
    let r = rect.abs();
    point.x >= r.x0 && point.x <= r.x1 && point.y >= r.y0 && point.y <= r.y1
}

/// First corner of a box as a vector, used for drag offsets.
pub fn origin(rect: Rect) -> Vec2 {
    Vec2::new(rect.x0, rect.y0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_point_arithmetic() {
        let a = Point::new(3.0, 4.0);
        let b = Point::new(1.0, -2.0);
        assert_eq!(add_points(a, b), Point::new(4.0, 2.0));
        assert_eq!(diff_points(a, b), Point::new(2.0, 6.0));
        assert_eq!(scale_points(a, 2.0), Point::new(1.5, 2.0));
    }

    #[test]
    fn test_near_point_is_strict() {
        let target = Point::new(10.0, 10.0);
        assert!(near_point(Point::new(14.9, 5.1), target, 5.0));
        assert!(!near_point(Point::new(15.0, 10.0), target, 5.0));
    }

    #[test]
    fn test_on_segment() {
        let a = Point::new(0.0, 0.0);
        let b = Point::new(10.0, 0.0);
        assert!(on_segment(a, b, Point::new(5.0, 0.0), 1.0));
        assert!(on_segment(a, b, Point::new(5.0, 0.5), 1.0));
        assert!(!on_segment(a, b, Point::new(5.0, 5.0), 1.0));
        assert!(!on_segment(a, b, Point::new(20.0, 0.0), 1.0));
    }

    #[test]
    fn test_point_to_segment_dist() {
        let a = Point::new(0.0, 0.0);
        let b = Point::new(100.0, 0.0);
        assert!((point_to_segment_dist(Point::new(50.0, 3.0), a, b) - 3.0).abs() < 1e-9);
        assert!((point_to_segment_dist(Point::new(-4.0, 3.0), a, b) - 5.0).abs() < 1e-9);
        assert!((point_to_segment_dist(Point::new(0.0, 2.0), a, a) - 2.0).abs() < 1e-9);
    }

    #[test]
    fn test_box_contains_unnormalized() {
        let rect = Rect::new(10.0, 10.0, 0.0, 0.0);
        assert!(box_contains(rect, Point::new(0.0, 0.0)));
        assert!(box_contains(rect, Point::new(10.0, 10.0)));
        assert!(box_contains(rect, Point::new(5.0, 5.0)));
        assert!(!box_contains(rect, Point::new(10.1, 5.0)));
    }
}
