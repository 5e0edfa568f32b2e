//! Shape definitions for the board.

mod freehand;
mod geometric;
mod image;
mod style;
mod text;

pub use freehand::Freehand;
pub use geometric::Geometric;
pub use image::Image;
pub use style::{seed_from_id, FillStyle, Font, SerializableColor, ShapeStyle, StyleOptions};
pub use text::Text;

use crate::tools::ToolKind;
use kurbo::Rect;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for shapes.
pub type ShapeId = Uuid;

/// Any shape on the board.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Shape {
    Freehand(Freehand),
    Text(Text),
    Image(Image),
    Geometric(Geometric),
}

impl Shape {
    pub fn id(&self) -> ShapeId {
        match self {
            Shape::Freehand(s) => s.id,
            Shape::Text(s) => s.id,
            Shape::Image(s) => s.id,
            Shape::Geometric(s) => s.id,
        }
    }

    /// The tool that created this shape.
    pub fn tool(&self) -> ToolKind {
        match self {
            Shape::Freehand(_) => ToolKind::Pen,
            Shape::Text(_) => ToolKind::Text,
            Shape::Image(_) => ToolKind::Image,
            Shape::Geometric(s) => s.tool.into(),
        }
    }

    pub fn style(&self) -> &ShapeStyle {
        match self {
            Shape::Freehand(s) => &s.style,
            Shape::Text(s) => &s.style,
            Shape::Image(s) => &s.style,
            Shape::Geometric(s) => &s.style,
        }
    }

    /// The stored two-corner box, for every shape except freehand strokes.
    pub fn rect(&self) -> Option<Rect> {
        match self {
            Shape::Freehand(_) => None,
            Shape::Text(s) => Some(s.rect),
            Shape::Image(s) => Some(s.rect),
            Shape::Geometric(s) => Some(s.rect),
        }
    }

    /// Normalized extent of the shape.
    pub fn bounds(&self) -> Rect {
        match self {
            Shape::Freehand(s) => s.bounds(),
            Shape::Text(s) => s.rect.abs(),
            Shape::Image(s) => s.rect.abs(),
            Shape::Geometric(s) => s.rect.abs(),
        }
    }

    pub fn as_geometric(&self) -> Option<&Geometric> {
        match self {
            Shape::Geometric(g) => Some(g),
            _ => None,
        }
    }

    pub fn as_freehand_mut(&mut self) -> Option<&mut Freehand> {
        match self {
            Shape::Freehand(f) => Some(f),
            _ => None,
        }
    }

    pub fn as_text_mut(&mut self) -> Option<&mut Text> {
        match self {
            Shape::Text(t) => Some(t),
            _ => None,
        }
    }

    pub fn as_image_mut(&mut self) -> Option<&mut Image> {
        match self {
            Shape::Image(i) => Some(i),
            _ => None,
        }
    }
}
