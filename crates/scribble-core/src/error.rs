//! Error types for the core crate.

use crate::shapes::ShapeId;
use crate::tools::ToolKind;
use thiserror::Error;

/// Errors produced by shape construction, editing and configuration.
#[derive(Debug, Error)]
pub enum CoreError {
    /// The tool does not create shapes, or the tool name is unknown.
    #[error("Invalid tool: {0}")]
    InvalidTool(String),
    /// The requested edit is not defined for this kind of shape.
    #[error("Edit not supported for {0} shapes")]
    UnsupportedEdit(ToolKind),
    /// No shape with this id exists in the list.
    #[error("Shape not found: {0}")]
    ShapeNotFound(ShapeId),
    /// A color string could not be parsed as `#rrggbb` or `#rrggbbaa`.
    #[error("Invalid color: {0}")]
    InvalidColor(String),
    /// Engine configuration could not be parsed.
    #[error("Configuration error: {0}")]
    Config(#[from] serde_json::Error),
}

/// Result type for core operations.
pub type CoreResult<T> = Result<T, CoreError>;
