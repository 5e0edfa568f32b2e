//! Scribble Core Library
//!
//! Platform-agnostic shape model and interaction logic for the Scribble
//! drawing engine: building shapes from drag geometry, hit testing, and
//! editing control points.

pub mod config;
pub mod document;
pub mod error;
pub mod factory;
pub mod geometry;
pub mod images;
pub mod points;
pub mod shapes;
pub mod sketch;
pub mod tools;

pub use config::{EngineConfig, HitOrder, StrokeOptions};
pub use document::ShapeList;
pub use error::{CoreError, CoreResult};
pub use factory::ShapeFactory;
pub use hit_test::{HitTester, PositionTag};
pub use images::{ImageError, ImageStore, MemoryImageStore};
pub use points::{adjust_drawing_points, calc_element_offsets, move_element, resize_points, ElementOffsets};
pub use shapes::{Shape, ShapeId, ShapeStyle, StyleOptions};
pub use sketch::{Drawable, Primitive, RoughGenerator, SketchGenerator};
pub use tools::{Action, GeometricTool, ToolKind, ToolState};
