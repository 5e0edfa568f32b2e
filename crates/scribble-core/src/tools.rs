//! Tool selection state.
//!
//! The interaction controller owns a [`ToolState`] and passes it into the
//! factory; nothing in the core reads tool state from a global.

use crate::error::CoreError;
use crate::shapes::StyleOptions;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Available tools.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum ToolKind {
    Select,
    Line,
    Circle,
    Rectangle,
    #[default]
    Pen,
    Text,
    Eraser,
    Move,
    Image,
    Triangle,
    Arrow,
    Rhombus,
}

impl ToolKind {
    /// All tools, in toolbar order.
    pub const ALL: [ToolKind; 12] = [
        ToolKind::Select,
        ToolKind::Line,
        ToolKind::Circle,
        ToolKind::Rectangle,
        ToolKind::Pen,
        ToolKind::Text,
        ToolKind::Eraser,
        ToolKind::Move,
        ToolKind::Image,
        ToolKind::Triangle,
        ToolKind::Arrow,
        ToolKind::Rhombus,
    ];

    /// Tag used in configuration and logs.
    pub fn name(self) -> &'static str {
        match self {
            ToolKind::Select => "select",
            ToolKind::Line => "line",
            ToolKind::Circle => "circle",
            ToolKind::Rectangle => "rectangle",
            ToolKind::Pen => "pen",
            ToolKind::Text => "text",
            ToolKind::Eraser => "eraser",
            ToolKind::Move => "move",
            ToolKind::Image => "image",
            ToolKind::Triangle => "triangle",
            ToolKind::Arrow => "arrow",
            ToolKind::Rhombus => "rhombus",
        }
    }

    /// Whether dragging with this tool creates a shape.
    pub fn creates_shape(self) -> bool {
        !matches!(self, ToolKind::Select | ToolKind::Eraser | ToolKind::Move)
    }

    /// Whether shapes of this tool carry a sketch drawable.
    pub fn is_geometric(self) -> bool {
        GeometricTool::try_from(self).is_ok()
    }
}

impl fmt::Display for ToolKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ToolKind {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ToolKind::ALL
            .into_iter()
            .find(|tool| tool.name() == s)
            .ok_or_else(|| CoreError::InvalidTool(s.to_string()))
    }
}

/// The subset of tools whose shapes are rendered by the sketch generator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum GeometricTool {
    Line,
    Rectangle,
    Circle,
    Triangle,
    Rhombus,
    Arrow,
}

impl From<GeometricTool> for ToolKind {
    fn from(tool: GeometricTool) -> Self {
        match tool {
            GeometricTool::Line => ToolKind::Line,
            GeometricTool::Rectangle => ToolKind::Rectangle,
            GeometricTool::Circle => ToolKind::Circle,
            GeometricTool::Triangle => ToolKind::Triangle,
            GeometricTool::Rhombus => ToolKind::Rhombus,
            GeometricTool::Arrow => ToolKind::Arrow,
        }
    }
}

impl TryFrom<ToolKind> for GeometricTool {
    type Error = CoreError;

    fn try_from(tool: ToolKind) -> Result<Self, Self::Error> {
        match tool {
            ToolKind::Line => Ok(GeometricTool::Line),
            ToolKind::Rectangle => Ok(GeometricTool::Rectangle),
            ToolKind::Circle => Ok(GeometricTool::Circle),
            ToolKind::Triangle => Ok(GeometricTool::Triangle),
            ToolKind::Rhombus => Ok(GeometricTool::Rhombus),
            ToolKind::Arrow => Ok(GeometricTool::Arrow),
            other => Err(CoreError::InvalidTool(other.to_string())),
        }
    }
}

impl fmt::Display for GeometricTool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        ToolKind::from(*self).fmt(f)
    }
}

/// What the pointer is currently doing on the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Action {
    Drawing,
    Erasing,
    Moving,
    Selecting,
    Resizing,
    Writing,
    #[default]
    None,
}

/// Current tool and the style applied to new shapes.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ToolState {
    pub tool: ToolKind,
    pub options: StyleOptions,
}

impl ToolState {
    /// Create a tool state with default options.
    pub fn new(tool: ToolKind) -> Self {
        Self {
            tool,
            options: StyleOptions::default(),
        }
    }

    /// Set the current tool.
    pub fn set_tool(&mut self, tool: ToolKind) {
        self.tool = tool;
    }

    /// Replace the style options.
    pub fn set_options(&mut self, options: StyleOptions) {
        self.options = options;
    }

    /// The action a pointer-down on empty canvas starts with this tool.
    pub fn pointer_down_action(&self) -> Action {
        match self.tool {
            ToolKind::Select | ToolKind::Move => Action::Selecting,
            ToolKind::Eraser => Action::Erasing,
            ToolKind::Text => Action::Writing,
            _ => Action::Drawing,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tool_names_round_trip() {
        for tool in ToolKind::ALL {
            assert_eq!(tool.name().parse::<ToolKind>().ok(), Some(tool));
        }
    }

    #[test]
    fn test_unknown_tool_name() {
        let err = "hexagon".parse::<ToolKind>().unwrap_err();
        assert!(matches!(err, CoreError::InvalidTool(name) if name == "hexagon"));
    }

    #[test]
    fn test_geometric_subset() {
        let geometric: Vec<_> = ToolKind::ALL.into_iter().filter(|t| t.is_geometric()).collect();
        assert_eq!(geometric.len(), 6);
        assert!(!ToolKind::Pen.is_geometric());
        assert!(!ToolKind::Select.creates_shape());
        assert!(ToolKind::Image.creates_shape());
    }

    #[test]
    fn test_tool_state_actions() {
        let mut state = ToolState::new(ToolKind::Rectangle);
        assert_eq!(state.pointer_down_action(), Action::Drawing);
        state.set_tool(ToolKind::Text);
        assert_eq!(state.pointer_down_action(), Action::Writing);
        state.set_tool(ToolKind::Eraser);
        assert_eq!(state.pointer_down_action(), Action::Erasing);
    }

    #[test]
    fn test_serde_tags() {
        let json = serde_json::to_string(&ToolKind::Rhombus).unwrap();
        assert_eq!(json, "\"rhombus\"");
    }
}
