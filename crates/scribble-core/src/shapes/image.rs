//! Image shape.

use super::{ShapeId, ShapeStyle};
use kurbo::Rect;
use serde::{Deserialize, Serialize};

/// An image placed on the board.
///
/// The pixels live in an external image store keyed by the shape id;
/// `source` records where they came from once the upload completes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Image {
    pub(crate) id: ShapeId,
    pub rect: Rect,
    pub source: Option<String>,
    pub style: ShapeStyle,
}

impl Image {
    pub fn new(id: ShapeId, rect: Rect, style: ShapeStyle) -> Self {
        Self {
            id,
            rect,
            source: None,
            style,
        }
    }

    pub fn id(&self) -> ShapeId {
        self.id
    }

    pub fn set_source(&mut self, source: impl Into<String>) {
        self.source = Some(source.into());
    }

    pub fn is_loaded(&self) -> bool {
        self.source.is_some()
    }
}
