//! Geometric shapes rendered through the sketch generator.

use super::{ShapeId, ShapeStyle};
use crate::geometry::distance;
use crate::sketch::Drawable;
use crate::tools::GeometricTool;
use kurbo::{Point, Rect};
use serde::{Deserialize, Serialize};

/// A line, rectangle, circle, triangle, rhombus or arrow.
///
/// `rect` holds the two drag corners as given; only rectangles are ever
/// normalized (see [`crate::points::adjust_drawing_points`]).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Geometric {
    pub(crate) id: ShapeId,
    pub tool: GeometricTool,
    pub rect: Rect,
    pub style: ShapeStyle,
    /// Sketch output cached at creation.
    pub drawable: Drawable,
}

impl Geometric {
    pub fn id(&self) -> ShapeId {
        self.id
    }

    /// First drag point.
    pub fn start(&self) -> Point {
        Point::new(self.rect.x0, self.rect.y0)
    }

    /// Second drag point.
    pub fn end(&self) -> Point {
        Point::new(self.rect.x1, self.rect.y1)
    }

    /// Midpoint of the two drag points.
    pub fn center(&self) -> Point {
        self.start().midpoint(self.end())
    }

    /// Circle radius: half the drag diagonal, not half the box width.
    pub fn radius(&self) -> f64 {
        distance(self.start(), self.end()) / 2.0
    }
}
