//! Control-point editing during resize and drag.

use crate::error::{CoreError, CoreResult};
use crate::factory::ShapeFactory;
use crate::geometry::origin;
use crate::hit_test::PositionTag;
use crate::shapes::{Freehand, Geometric, Shape};
use crate::tools::GeometricTool;
use kurbo::{Point, Rect, Vec2};

pub use crate::geometry::{add_points, diff_points, scale_points};

/// Move the corner(s) owned by `handle` to `cursor`; the opposite corner stays.
///
/// Tags that are not resize handles return the box unchanged.
pub fn resize_points(cursor: Point, handle: PositionTag, rect: Rect) -> Rect {
    let Rect { x0, y0, x1, y1 } = rect;
    match handle {
        PositionTag::TopLeft | PositionTag::Start => Rect::new(cursor.x, cursor.y, x1, y1),
        PositionTag::TopRight => Rect::new(x0, cursor.y, cursor.x, y1),
        PositionTag::BottomLeft => Rect::new(cursor.x, y0, x1, cursor.y),
        PositionTag::BottomRight | PositionTag::End => Rect::new(x0, y0, cursor.x, cursor.y),
        _ => rect,
    }
}

/// Canonical box for a finished edit.
///
/// Lines are oriented so the first point is lexicographically smaller;
/// rectangles are normalized to top-left/bottom-right. Other tools keep the
/// box as drawn.
pub fn adjust_drawing_points(shape: &Geometric) -> Rect {
    adjust_rect(shape.tool, shape.rect)
}

/// [`adjust_drawing_points`] for a bare tool and box.
pub fn adjust_rect(tool: GeometricTool, rect: Rect) -> Rect {
    let Rect { x0, y0, x1, y1 } = rect;
    match tool {
        GeometricTool::Line => {
            if x0 < x1 || (x0 == x1 && y0 <= y1) {
                rect
            } else {
                Rect::new(x1, y1, x0, y0)
            }
        }
        GeometricTool::Rectangle => rect.abs(),
        _ => rect,
    }
}

/// Cursor-relative offsets captured when a drag starts.
#[derive(Debug, Clone, PartialEq)]
pub enum ElementOffsets {
    /// One offset per freehand point.
    PerPoint(Vec<Vec2>),
    /// Offset from the shape's first corner.
    Single(Vec2),
}

impl ElementOffsets {
    pub fn len(&self) -> usize {
        match self {
            ElementOffsets::PerPoint(offsets) => offsets.len(),
            ElementOffsets::Single(_) => 1,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// X components, one per offset.
    pub fn offset_x(&self) -> Vec<f64> {
        self.iter().map(|v| v.x).collect()
    }

    /// Y components, one per offset.
    pub fn offset_y(&self) -> Vec<f64> {
        self.iter().map(|v| v.y).collect()
    }

    fn iter(&self) -> impl Iterator<Item = &Vec2> {
        match self {
            ElementOffsets::PerPoint(offsets) => offsets.iter(),
            ElementOffsets::Single(offset) => std::slice::from_ref(offset).iter(),
        }
    }
}

/// Offsets from the shape to the cursor: `cursor - point`.
pub fn calc_element_offsets(shape: &Shape, cursor: Point) -> ElementOffsets {
    match shape {
        Shape::Freehand(f) => ElementOffsets::PerPoint(f.points.iter().map(|p| cursor - *p).collect()),
        Shape::Text(t) => ElementOffsets::Single(cursor.to_vec2() - origin(t.rect)),
        Shape::Image(i) => ElementOffsets::Single(cursor.to_vec2() - origin(i.rect)),
        Shape::Geometric(g) => ElementOffsets::Single(cursor.to_vec2() - origin(g.rect)),
    }
}

/// Shape dragged so it keeps the offsets captured at drag start.
///
/// Freehand points become `cursor - offset_i`; boxed shapes translate their
/// box, and geometric shapes regenerate their drawable.
pub fn move_element(
    factory: &ShapeFactory,
    shape: &Shape,
    cursor: Point,
    offsets: &ElementOffsets,
) -> CoreResult<Shape> {
    match (shape, offsets) {
        (Shape::Freehand(f), ElementOffsets::PerPoint(offsets)) if offsets.len() == f.points.len() => {
            Ok(Shape::Freehand(Freehand {
                points: offsets.iter().map(|offset| cursor - *offset).collect(),
                ..f.clone()
            }))
        }
        (Shape::Freehand(_), _) => Err(CoreError::UnsupportedEdit(shape.tool())),
        (_, ElementOffsets::Single(offset)) => {
            let Some(rect) = shape.rect() else {
                return Err(CoreError::UnsupportedEdit(shape.tool()));
            };
            let delta = (cursor - *offset) - rect.origin();
            factory.update_element(shape, rect + delta)
        }
        (_, ElementOffsets::PerPoint(_)) => Err(CoreError::UnsupportedEdit(shape.tool())),
    }
}
