//! Text shape.

use super::{Font, ShapeId, ShapeStyle};
use kurbo::Rect;
use serde::{Deserialize, Serialize};

/// A text box. Content starts empty and is typed in afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Text {
    pub(crate) id: ShapeId,
    pub rect: Rect,
    pub text: String,
    pub style: ShapeStyle,
}

impl Text {
    pub const DEFAULT_FONT_SIZE: f64 = 24.0;
    pub const DEFAULT_FONT_FAMILY: &'static str = "sans-serif";

    pub fn new(id: ShapeId, rect: Rect, style: ShapeStyle) -> Self {
        Self {
            id,
            rect,
            text: String::new(),
            style,
        }
    }

    pub fn id(&self) -> ShapeId {
        self.id
    }

    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = text.into();
    }

    /// Font size and family, falling back to defaults when the style has none.
    pub fn font(&self) -> Font {
        self.style.font.clone().unwrap_or_else(|| Font {
            size: Self::DEFAULT_FONT_SIZE,
            family: Self::DEFAULT_FONT_FAMILY.to_string(),
        })
    }
}
