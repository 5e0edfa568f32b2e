//! Shape construction from drag geometry.

use crate::config::EngineConfig;
use crate::error::{CoreError, CoreResult};
use crate::geometry::{average, distance};
use crate::shapes::{Freehand, Geometric, Image, Shape, ShapeId, ShapeStyle, StyleOptions, Text};
use crate::sketch::{Primitive, RoughGenerator, SketchGenerator};
use crate::tools::{GeometricTool, ToolKind, ToolState};
use kurbo::{Point, Rect, Vec2};

/// Builds shapes for the current tool and caches their sketch drawables.
pub struct ShapeFactory {
    generator: Box<dyn SketchGenerator>,
    arrow_head_length: f64,
}

impl Default for ShapeFactory {
    fn default() -> Self {
        Self::new(&EngineConfig::default())
    }
}

impl ShapeFactory {
    /// Factory using the built-in rough generator.
    pub fn new(config: &EngineConfig) -> Self {
        Self {
            generator: Box::new(RoughGenerator::new(config.roughness)),
            arrow_head_length: config.arrow_head_length,
        }
    }

    /// Replace the sketch generator.
    pub fn with_generator(mut self, generator: impl SketchGenerator + 'static) -> Self {
        self.generator = Box::new(generator);
        self
    }

    /// Create a shape from the two drag points `(x1, y1)` and `(x2, y2)`.
    ///
    /// Fails with [`CoreError::InvalidTool`] for tools that do not draw.
    #[allow(clippy::too_many_arguments)]
    pub fn create_element(
        &self,
        x1: f64,
        y1: f64,
        x2: f64,
        y2: f64,
        tool: ToolKind,
        id: ShapeId,
        options: &StyleOptions,
    ) -> CoreResult<Shape> {
        let rect = Rect::new(x1, y1, x2, y2);
        let style = ShapeStyle::resolve(tool, options, id);

        let shape = match tool {
            ToolKind::Pen => Shape::Freehand(Freehand::new(id, Point::new(x2, y2), style)),
            ToolKind::Text => Shape::Text(Text::new(id, rect, style)),
            ToolKind::Image => Shape::Image(Image::new(id, rect, style)),
            ToolKind::Line
            | ToolKind::Rectangle
            | ToolKind::Circle
            | ToolKind::Triangle
            | ToolKind::Rhombus
            | ToolKind::Arrow => {
                let tool = GeometricTool::try_from(tool)?;
                Shape::Geometric(self.build_geometric(id, tool, rect, style))
            }
            ToolKind::Select | ToolKind::Eraser | ToolKind::Move => {
                return Err(CoreError::InvalidTool(tool.to_string()));
            }
        };

        log::debug!("Created {} shape {}", tool, id);
        Ok(shape)
    }

    /// Create a shape for the controller's current tool and options.
    pub fn create_for_state(&self, start: Point, end: Point, state: &ToolState, id: ShapeId) -> CoreResult<Shape> {
        self.create_element(start.x, start.y, end.x, end.y, state.tool, id, &state.options)
    }

    /// Rebuild `shape` for a new box, keeping its id and style.
    ///
    /// Geometric shapes get a freshly generated drawable. Freehand strokes
    /// have no box and are rejected.
    pub fn update_element(&self, shape: &Shape, rect: Rect) -> CoreResult<Shape> {
        match shape {
            Shape::Geometric(g) => Ok(Shape::Geometric(self.build_geometric(g.id, g.tool, rect, g.style.clone()))),
            Shape::Text(t) => Ok(Shape::Text(Text { rect, ..t.clone() })),
            Shape::Image(i) => Ok(Shape::Image(Image { rect, ..i.clone() })),
            Shape::Freehand(_) => Err(CoreError::UnsupportedEdit(ToolKind::Pen)),
        }
    }

    fn build_geometric(&self, id: ShapeId, tool: GeometricTool, rect: Rect, style: ShapeStyle) -> Geometric {
        let primitive = self.primitive(tool, rect);
        let drawable = self.generator.generate(primitive, &style);
        Geometric {
            id,
            tool,
            rect,
            style,
            drawable,
        }
    }

    /// Geometry handed to the sketch generator for `tool` over `rect`.
    pub fn primitive(&self, tool: GeometricTool, rect: Rect) -> Primitive {
        let Rect { x0: x1, y0: y1, x1: x2, y1: y2 } = rect;
        let start = Point::new(x1, y1);
        let end = Point::new(x2, y2);
        match tool {
            GeometricTool::Line => Primitive::Line { start, end },
            GeometricTool::Rectangle => Primitive::Rectangle {
                origin: start,
                width: x2 - x1,
                height: y2 - y1,
            },
            GeometricTool::Circle => Primitive::Circle {
                center: start.midpoint(end),
                diameter: distance(start, end),
            },
            GeometricTool::Triangle => Primitive::Polygon(triangle_vertices(rect).to_vec()),
            GeometricTool::Rhombus => Primitive::Polygon(rhombus_vertices(rect).to_vec()),
            GeometricTool::Arrow => {
                let (wing_225, wing_135) = arrow_wings(start, end, self.arrow_head_length);
                Primitive::Polygon(vec![start, end, wing_225, wing_135, end])
            }
        }
    }
}

/// Isosceles triangle: base along `y2`, apex centered on `y1`.
pub fn triangle_vertices(rect: Rect) -> [Point; 3] {
    [
        Point::new(rect.x0, rect.y1),
        Point::new(rect.x1, rect.y1),
        Point::new(average(rect.x0, rect.x1), rect.y0),
    ]
}

/// Edge midpoints of the box: top, right, bottom, left.
pub fn rhombus_vertices(rect: Rect) -> [Point; 4] {
    let mid_x = average(rect.x0, rect.x1);
    let mid_y = average(rect.y0, rect.y1);
    [
        Point::new(mid_x, rect.y0),
        Point::new(rect.x1, mid_y),
        Point::new(mid_x, rect.y1),
        Point::new(rect.x0, mid_y),
    ]
}

/// Arrowhead wing endpoints at `tip`, returned as (angle + 225°, angle + 135°).
pub fn arrow_wings(tail: Point, tip: Point, length: f64) -> (Point, Point) {
    let delta = tip - tail;
    let angle = delta.y.atan2(delta.x);
    let wing = |degrees: f64| tip + Vec2::from_angle(angle + degrees.to_radians()) * length;
    (wing(225.0), wing(135.0))
}
