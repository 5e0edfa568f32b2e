//! Freehand stroke shape.

use super::{ShapeId, ShapeStyle};
use kurbo::{Point, Rect};
use serde::{Deserialize, Serialize};

/// A freehand stroke (series of points).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Freehand {
    pub(crate) id: ShapeId,
    /// Points in drawing order.
    pub points: Vec<Point>,
    /// Style properties.
    pub style: ShapeStyle,
}

impl Freehand {
    /// Start a stroke at a single point.
    pub fn new(id: ShapeId, start: Point, style: ShapeStyle) -> Self {
        Self {
            id,
            points: vec![start],
            style,
        }
    }

    pub fn id(&self) -> ShapeId {
        self.id
    }

    /// Append a point while drawing.
    pub fn add_point(&mut self, point: Point) {
        self.points.push(point);
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn bounds(&self) -> Rect {
        let Some(first) = self.points.first() else {
            return Rect::ZERO;
        };
        self.points
            .iter()
            .fold(Rect::from_points(*first, *first), |r, p| r.union_pt(*p))
    }
}
