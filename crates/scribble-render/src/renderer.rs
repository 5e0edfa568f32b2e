//! Shape rendering onto a [`Surface`].

use crate::image_cache::{ImageCache, ImageState};
use crate::outline::{path_from_stroke, FreehandOutliner, StrokeOutliner};
use crate::surface::{Surface, TextBaseline};
use kurbo::{Rect, Shape as _};
use scribble_core::shapes::{Freehand, Geometric, Image, SerializableColor, Text};
use scribble_core::sketch::{Drawable, OpKind};
use scribble_core::{EngineConfig, GeometricTool, Shape, ShapeId, ShapeList, StrokeOptions};
use std::sync::Arc;

/// Stroke color of the selection border.
pub const SELECTION_COLOR: SerializableColor = SerializableColor {
    r: 0xbf,
    g: 0x94,
    b: 0xff,
    a: 0xff,
};
/// Padding between a selected rectangle and its border.
pub const SELECTION_PADDING: f64 = 10.0;

/// Draws shapes with a stroke outliner and a shared image cache.
pub struct ElementRenderer {
    outliner: Box<dyn StrokeOutliner>,
    stroke: StrokeOptions,
    images: Arc<ImageCache>,
}

impl Default for ElementRenderer {
    fn default() -> Self {
        Self::new(&EngineConfig::default())
    }
}

impl ElementRenderer {
    pub fn new(config: &EngineConfig) -> Self {
        Self {
            outliner: Box::new(FreehandOutliner::new()),
            stroke: config.stroke,
            images: Arc::new(ImageCache::new(config.image_cache_capacity)),
        }
    }

    /// Replace the freehand outliner.
    pub fn with_outliner(mut self, outliner: Box<dyn StrokeOutliner>) -> Self {
        self.outliner = outliner;
        self
    }

    pub fn image_cache(&self) -> &Arc<ImageCache> {
        &self.images
    }

    /// Remove a shape from `shapes` along with its cached pixels.
    pub fn remove_shape(&self, shapes: &mut ShapeList, id: ShapeId) -> Option<Shape> {
        let removed = shapes.remove(id)?;
        if matches!(removed, Shape::Image(_)) {
            self.images.invalidate(id);
        }
        Some(removed)
    }

    /// Empty `shapes` and drop every cached image.
    pub fn clear_shapes(&self, shapes: &mut ShapeList) {
        shapes.clear();
        self.images.clear();
    }

    /// Draw every shape in paint order.
    pub fn draw_all<'a>(&self, surface: &mut dyn Surface, shapes: impl IntoIterator<Item = &'a Shape>) {
        for shape in shapes {
            self.draw_element(surface, shape);
        }
    }

    /// Draw one shape.
    pub fn draw_element(&self, surface: &mut dyn Surface, shape: &Shape) {
        log::trace!("Drawing {} {}", shape.tool(), shape.id());
        match shape {
            Shape::Freehand(f) => self.draw_freehand(surface, f),
            Shape::Text(t) => draw_text(surface, t),
            Shape::Image(i) => self.draw_image(surface, i),
            Shape::Geometric(g) => draw_geometric(surface, g),
        }
    }

    fn draw_freehand(&self, surface: &mut dyn Surface, stroke: &Freehand) {
        let size = self.stroke.base_size + stroke.style.stroke_width;
        let outline = self.outliner.outline(&stroke.points, &self.stroke, size);
        let path = path_from_stroke(&outline);
        if path.elements().is_empty() {
            return;
        }
        surface.set_fill_color(stroke.style.stroke_color());
        surface.set_global_alpha(stroke.style.opacity());
        surface.fill_path(&path);
    }

    fn draw_image(&self, surface: &mut dyn Surface, image: &Image) {
        if !image.is_loaded() {
            return;
        }
        match self.images.lookup(image.id()) {
            ImageState::Ready(decoded) => {
                let dest = Rect::from_origin_size(image.rect.origin(), decoded.size());
                surface.set_global_alpha(1.0);
                surface.draw_image(&decoded, dest);
            }
            ImageState::Missing => self.images.request(image.id()),
            ImageState::Loading | ImageState::Failed => {}
        }
    }

    /// Outline a selected rectangle or circle.
    pub fn draw_selection_border(&self, surface: &mut dyn Surface, shape: &Shape) {
        let Some(geometric) = shape.as_geometric() else {
            return;
        };
        let border = match geometric.tool {
            GeometricTool::Rectangle => {
                let Rect { x0, y0, x1, y1 } = geometric.rect;
                Rect::new(
                    x0 - SELECTION_PADDING,
                    y0 - SELECTION_PADDING,
                    x1 + SELECTION_PADDING,
                    y1 + SELECTION_PADDING,
                )
            }
            GeometricTool::Circle => {
                let d = geometric.start().distance(geometric.end());
                Rect::from_center_size(geometric.center(), (d, d))
            }
            _ => return,
        };
        surface.set_stroke_color(SELECTION_COLOR.into());
        surface.set_line_width(1.0);
        surface.set_global_alpha(1.0);
        surface.stroke_path(&border.to_path(0.1));
    }
}

fn draw_text(surface: &mut dyn Surface, text: &Text) {
    surface.set_font(&text.font());
    surface.set_text_baseline(TextBaseline::Top);
    surface.set_fill_color(text.style.stroke_color());
    surface.set_global_alpha(text.style.opacity());
    surface.fill_text(&text.text, text.rect.origin());
}

fn draw_geometric(surface: &mut dyn Surface, shape: &Geometric) {
    // Opacity is already baked into the drawable's colors.
    surface.set_global_alpha(1.0);
    draw_drawable(surface, &shape.drawable);
}

/// Paint a generated drawable: fills first, then strokes, in op order.
pub fn draw_drawable(surface: &mut dyn Surface, drawable: &Drawable) {
    for op in &drawable.ops {
        match op.kind {
            OpKind::Stroke => {
                surface.set_stroke_color(drawable.stroke.into());
                surface.set_line_width(drawable.stroke_width);
                surface.stroke_path(&op.path);
            }
            OpKind::FillPath => {
                if let Some(fill) = drawable.fill {
                    surface.set_fill_color(fill.into());
                    surface.fill_path(&op.path);
                }
            }
            OpKind::FillSketch => {
                if let Some(fill) = drawable.fill {
                    surface.set_stroke_color(fill.into());
                    surface.set_line_width((drawable.stroke_width / 2.0).max(0.5));
                    surface.stroke_path(&op.path);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::{DecodedImage, RecordingSurface, SurfaceOp};
    use kurbo::{Point, Shape as _};
    use scribble_core::shapes::FillStyle;
    use scribble_core::{ShapeFactory, StyleOptions, ToolKind};
    use uuid::Uuid;

    fn create(tool: ToolKind, x1: f64, y1: f64, x2: f64, y2: f64, options: &StyleOptions) -> Shape {
        ShapeFactory::default()
            .create_element(x1, y1, x2, y2, tool, Uuid::new_v4(), options)
            .unwrap()
    }

    fn red() -> StyleOptions {
        StyleOptions {
            stroke: SerializableColor::new(255, 0, 0, 255),
            ..StyleOptions::default()
        }
    }

    struct TinyOutliner;

    impl StrokeOutliner for TinyOutliner {
        fn outline(&self, points: &[Point], _: &StrokeOptions, _: f64) -> Vec<Point> {
            points.iter().copied().take(3).collect()
        }
    }

    #[test]
    fn test_freehand_filled_with_stroke_color() {
        let options = StyleOptions {
            stroke_opacity: 0.5,
            ..red()
        };
        let mut shape = create(ToolKind::Pen, 0.0, 0.0, 0.0, 0.0, &options);
        let stroke = shape.as_freehand_mut().unwrap();
        stroke.add_point(Point::new(20.0, 5.0));
        stroke.add_point(Point::new(40.0, 0.0));

        let mut surface = RecordingSurface::new();
        ElementRenderer::default().draw_element(&mut surface, &shape);

        assert_eq!(surface.ops().len(), 1);
        match &surface.ops()[0] {
            SurfaceOp::FillPath { path, color, alpha } => {
                assert_eq!(*color, SerializableColor::new(255, 0, 0, 128));
                assert_eq!(*alpha, 0.5);
                assert!(path.elements().len() > 2);
            }
            other => panic!("unexpected op {:?}", other),
        }
    }

    #[test]
    fn test_short_outline_draws_nothing() {
        let mut shape = create(ToolKind::Pen, 0.0, 0.0, 0.0, 0.0, &red());
        shape.as_freehand_mut().unwrap().add_point(Point::new(10.0, 10.0));

        let renderer = ElementRenderer::default().with_outliner(Box::new(TinyOutliner));
        let mut surface = RecordingSurface::new();
        renderer.draw_element(&mut surface, &shape);
        assert!(surface.ops().is_empty());
    }

    #[test]
    fn test_text_drawn_at_top_left() {
        let mut shape = create(ToolKind::Text, 12.0, 34.0, 80.0, 60.0, &red());
        shape.as_text_mut().unwrap().set_text("hello");

        let mut surface = RecordingSurface::new();
        ElementRenderer::default().draw_element(&mut surface, &shape);

        match &surface.ops()[0] {
            SurfaceOp::FillText {
                text,
                origin,
                font,
                baseline,
                color,
                alpha,
            } => {
                assert_eq!(text, "hello");
                assert_eq!(*origin, Point::new(12.0, 34.0));
                assert_eq!(font.size, 24.0);
                assert_eq!(font.family, "sans-serif");
                assert_eq!(*baseline, TextBaseline::Top);
                assert_eq!(*color, SerializableColor::new(255, 0, 0, 255));
                assert_eq!(*alpha, 1.0);
            }
            other => panic!("unexpected op {:?}", other),
        }
    }

    #[test]
    fn test_geometric_draws_drawable_ops() {
        let options = StyleOptions {
            fill_style: FillStyle::Solid,
            fill: SerializableColor::new(0, 255, 0, 255),
            ..red()
        };
        let shape = create(ToolKind::Rectangle, 0.0, 0.0, 50.0, 30.0, &options);
        let op_count = shape.as_geometric().unwrap().drawable.ops.len();

        let mut surface = RecordingSurface::new();
        ElementRenderer::default().draw_element(&mut surface, &shape);

        assert_eq!(surface.ops().len(), op_count);
        assert!(matches!(
            surface.ops()[0],
            SurfaceOp::FillPath { color, .. } if color == SerializableColor::new(0, 255, 0, 255)
        ));
        assert!(surface.ops()[1..]
            .iter()
            .all(|op| matches!(op, SurfaceOp::StrokePath { color, .. } if *color == SerializableColor::new(255, 0, 0, 255))));
    }

    #[test]
    fn test_image_requested_then_drawn() {
        let mut shape = create(ToolKind::Image, 5.0, 6.0, 100.0, 100.0, &red());
        shape.as_image_mut().unwrap().set_source("photo.png");
        let renderer = ElementRenderer::default();

        let mut surface = RecordingSurface::new();
        renderer.draw_element(&mut surface, &shape);
        assert!(surface.ops().is_empty());
        assert_eq!(renderer.image_cache().take_requests(), vec![shape.id()]);

        renderer.image_cache().insert(
            shape.id(),
            DecodedImage {
                width: 4,
                height: 2,
                rgba: Arc::new(vec![0; 32]),
            },
        );
        renderer.draw_element(&mut surface, &shape);
        assert_eq!(
            surface.ops(),
            &[SurfaceOp::DrawImage {
                width: 4,
                height: 2,
                dest: Rect::new(5.0, 6.0, 9.0, 8.0),
                alpha: 1.0,
            }]
        );
    }

    fn placed_image(x: f64, y: f64) -> Shape {
        let mut shape = create(ToolKind::Image, x, y, x + 10.0, y + 10.0, &red());
        shape.as_image_mut().unwrap().set_source("photo.png");
        shape
    }

    #[test]
    fn test_removed_image_leaves_cache() {
        let renderer = ElementRenderer::default();
        let kept = placed_image(0.0, 0.0);
        let dropped = placed_image(50.0, 0.0);
        let (kept_id, dropped_id) = (kept.id(), dropped.id());
        let mut shapes: ShapeList = [kept, dropped].into_iter().collect();
        renderer.image_cache().insert(kept_id, DecodedImage::default());
        renderer.image_cache().insert(dropped_id, DecodedImage::default());

        let removed = renderer.remove_shape(&mut shapes, dropped_id).unwrap();
        assert_eq!(removed.id(), dropped_id);
        assert_eq!(renderer.image_cache().lookup(dropped_id), ImageState::Missing);
        assert!(matches!(renderer.image_cache().lookup(kept_id), ImageState::Ready(_)));
        assert_eq!(shapes.len(), 1);

        assert!(renderer.remove_shape(&mut shapes, dropped_id).is_none());
    }

    #[test]
    fn test_clear_shapes_empties_cache() {
        let renderer = ElementRenderer::default();
        let image = placed_image(0.0, 0.0);
        renderer.image_cache().insert(image.id(), DecodedImage::default());
        let mut shapes: ShapeList = std::iter::once(image).collect();

        renderer.clear_shapes(&mut shapes);
        assert!(shapes.is_empty());
        assert!(renderer.image_cache().is_empty());
    }

    #[test]
    fn test_unset_image_not_requested() {
        let shape = create(ToolKind::Image, 0.0, 0.0, 10.0, 10.0, &red());
        let renderer = ElementRenderer::default();
        let mut surface = RecordingSurface::new();
        renderer.draw_element(&mut surface, &shape);
        assert!(surface.ops().is_empty());
        assert!(renderer.image_cache().take_requests().is_empty());
    }

    #[test]
    fn test_draw_all_in_order() {
        let mut text = create(ToolKind::Text, 0.0, 0.0, 10.0, 10.0, &red());
        text.as_text_mut().unwrap().set_text("top");
        let line = create(ToolKind::Line, 0.0, 0.0, 10.0, 10.0, &red());
        let shapes = vec![line, text];

        let mut surface = RecordingSurface::new();
        ElementRenderer::default().draw_all(&mut surface, &shapes);

        assert!(matches!(surface.ops().first(), Some(SurfaceOp::StrokePath { .. })));
        assert!(matches!(surface.ops().last(), Some(SurfaceOp::FillText { .. })));
    }

    fn border_bounds(surface: &RecordingSurface) -> Rect {
        match &surface.ops()[0] {
            SurfaceOp::StrokePath { path, color, width, .. } => {
                assert_eq!(*color, SerializableColor::new(0xbf, 0x94, 0xff, 0xff));
                assert_eq!(*width, 1.0);
                path.bounding_box()
            }
            other => panic!("unexpected op {:?}", other),
        }
    }

    #[test]
    fn test_rectangle_selection_border() {
        let shape = create(ToolKind::Rectangle, 0.0, 0.0, 50.0, 30.0, &red());
        let mut surface = RecordingSurface::new();
        ElementRenderer::default().draw_selection_border(&mut surface, &shape);
        assert_eq!(border_bounds(&surface), Rect::new(-10.0, -10.0, 60.0, 40.0));
    }

    #[test]
    fn test_circle_selection_border() {
        let shape = create(ToolKind::Circle, 0.0, 0.0, 6.0, 8.0, &red());
        let mut surface = RecordingSurface::new();
        ElementRenderer::default().draw_selection_border(&mut surface, &shape);
        let bounds = border_bounds(&surface);
        assert!((bounds.x0 - -2.0).abs() < 1e-9);
        assert!((bounds.y0 - -1.0).abs() < 1e-9);
        assert!((bounds.width() - 10.0).abs() < 1e-9);
        assert!((bounds.height() - 10.0).abs() < 1e-9);
    }

    #[test]
    fn test_no_border_for_other_shapes() {
        let renderer = ElementRenderer::default();
        for tool in [ToolKind::Line, ToolKind::Triangle, ToolKind::Text, ToolKind::Pen] {
            let shape = create(tool, 0.0, 0.0, 10.0, 10.0, &red());
            let mut surface = RecordingSurface::new();
            renderer.draw_selection_border(&mut surface, &shape);
            assert!(surface.ops().is_empty(), "{} drew a border", tool);
        }
    }
}
