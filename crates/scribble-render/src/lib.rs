//! Scribble Render Library
//!
//! Draws core shapes onto an abstract canvas [`Surface`]. Freehand strokes
//! are outlined and smoothed here, images are resolved through a
//! non-blocking [`ImageCache`], and geometric shapes paint their cached
//! drawables.

mod error;
pub mod image_cache;
pub mod outline;
mod renderer;
pub mod surface;

pub use error::{RenderResult, RendererError};
pub use image_cache::{ImageCache, ImageState};
pub use outline::{path_from_stroke, svg_path_from_stroke, FreehandOutliner, StrokeOutliner};
pub use renderer::{draw_drawable, ElementRenderer, SELECTION_COLOR, SELECTION_PADDING};
pub use surface::{DecodedImage, RecordingSurface, Surface, SurfaceOp, TextBaseline};
