//! Scribble application shell.
//!
//! Drives the engine the way an interactive host would (tool state, pointer
//! drags, hit tests, resizes, image loads) and exports the resulting frame
//! as SVG.

use kurbo::{Point, Size};
use scribble_core::shapes::{FillStyle, SerializableColor};
use scribble_core::{
    adjust_drawing_points, calc_element_offsets, move_element, resize_points, CoreError, EngineConfig, HitTester,
    ImageError, ImageStore, MemoryImageStore, Shape, ShapeFactory, ShapeId, ShapeList, StyleOptions,
    ToolKind, ToolState,
};
use scribble_render::{ElementRenderer, RecordingSurface, RendererError};
use std::path::PathBuf;
use std::sync::Arc;
use thiserror::Error;
use uuid::Uuid;

/// Canvas size of the exported frame.
pub const CANVAS_SIZE: Size = Size::new(800.0, 600.0);

/// Application errors.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Core(#[from] CoreError),
    #[error(transparent)]
    Render(#[from] RendererError),
    #[error(transparent)]
    Store(#[from] ImageError),
    #[error("Image encoding failed: {0}")]
    Encode(#[from] image::ImageError),
    #[error("Usage: scribble [CONFIG.json] [OUTPUT.svg]")]
    Usage,
}

/// Command-line arguments.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Args {
    pub config: Option<PathBuf>,
    pub output: Option<PathBuf>,
}

impl Args {
    /// Parse positional arguments (program name excluded).
    pub fn parse(args: impl IntoIterator<Item = String>) -> Result<Self, AppError> {
        let mut args = args.into_iter();
        let parsed = Self {
            config: args.next().map(PathBuf::from),
            output: args.next().map(PathBuf::from),
        };
        if args.next().is_some() {
            return Err(AppError::Usage);
        }
        Ok(parsed)
    }
}

/// Load engine configuration, falling back to defaults without a path.
pub fn load_config(path: Option<&PathBuf>) -> Result<EngineConfig, AppError> {
    match path {
        Some(path) => {
            let json = std::fs::read_to_string(path)?;
            let config = EngineConfig::from_json(&json)?;
            log::info!("Loaded config from {}", path.display());
            Ok(config)
        }
        None => Ok(EngineConfig::default()),
    }
}

/// A scene built through pointer-style interactions.
pub struct Scene {
    pub shapes: ShapeList,
    pub selected: Option<ShapeId>,
    pub images: Arc<MemoryImageStore>,
}

impl Scene {
    /// Erase a shape, dropping its cached pixels and stored bytes.
    pub fn remove_shape(&mut self, renderer: &ElementRenderer, id: ShapeId) -> Result<Option<Shape>, AppError> {
        let removed = renderer.remove_shape(&mut self.shapes, id);
        if matches!(removed, Some(Shape::Image(_))) {
            pollster::block_on(self.images.delete(id))?;
        }
        if self.selected == Some(id) {
            self.selected = None;
        }
        Ok(removed)
    }
}

/// Press at `from`, release at `to` with the current tool.
fn drag(
    factory: &ShapeFactory,
    state: &ToolState,
    shapes: &mut ShapeList,
    from: (f64, f64),
    to: (f64, f64),
) -> Result<ShapeId, AppError> {
    let shape = factory.create_for_state(from.into(), to.into(), state, Uuid::new_v4())?;
    let id = shape.id();
    log::debug!(
        "{:?} created {} {} over {:?}",
        state.pointer_down_action(),
        shape.tool(),
        id,
        shape.bounds()
    );
    shapes.push(shape);
    Ok(id)
}

/// Build the demonstration scene.
pub fn build_scene(config: &EngineConfig) -> Result<Scene, AppError> {
    let factory = ShapeFactory::new(config);
    let hit_tester = HitTester::new(config);
    let mut state = ToolState::new(ToolKind::Rectangle);
    let mut shapes = ShapeList::new();

    state.set_options(StyleOptions {
        stroke: SerializableColor::from_hex("#1e1e1e")?,
        fill: SerializableColor::from_hex("#a5d8ff")?,
        fill_style: FillStyle::Hachure,
        stroke_width: 2.0,
        ..StyleOptions::default()
    });
    drag(&factory, &state, &mut shapes, (60.0, 60.0), (260.0, 180.0))?;

    state.set_tool(ToolKind::Circle);
    drag(&factory, &state, &mut shapes, (320.0, 80.0), (420.0, 180.0))?;

    state.set_tool(ToolKind::Triangle);
    drag(&factory, &state, &mut shapes, (480.0, 60.0), (600.0, 180.0))?;

    state.set_tool(ToolKind::Rhombus);
    drag(&factory, &state, &mut shapes, (640.0, 60.0), (760.0, 180.0))?;

    state.set_options(StyleOptions {
        stroke: SerializableColor::from_hex("#e03131")?,
        stroke_opacity: 0.8,
        ..state.options.clone()
    });
    state.set_tool(ToolKind::Line);
    drag(&factory, &state, &mut shapes, (60.0, 260.0), (260.0, 320.0))?;
    state.set_tool(ToolKind::Arrow);
    drag(&factory, &state, &mut shapes, (320.0, 320.0), (480.0, 240.0))?;

    // Freehand: pointer-down creates the stroke, moves append points.
    state.set_tool(ToolKind::Pen);
    let pen = drag(&factory, &state, &mut shapes, (540.0, 300.0), (540.0, 300.0))?;
    if let Some(stroke) = shapes.get_mut(pen).and_then(|s| s.as_freehand_mut()) {
        for i in 1..=40 {
            let t = i as f64 / 40.0;
            stroke.add_point(Point::new(540.0 + t * 200.0, 300.0 + (t * 12.0).sin() * 25.0));
        }
    }

    state.set_tool(ToolKind::Text);
    let text = drag(&factory, &state, &mut shapes, (60.0, 400.0), (300.0, 440.0))?;
    if let Some(label) = shapes.get_mut(text).and_then(|s| s.as_text_mut()) {
        label.set_text("Scribble");
    }

    let images = Arc::new(MemoryImageStore::new());
    state.set_tool(ToolKind::Image);
    let image = drag(&factory, &state, &mut shapes, (560.0, 420.0), (700.0, 540.0))?;
    pollster::block_on(images.save(image, demo_png()?))?;
    if let Some(placed) = shapes.get_mut(image).and_then(|s| s.as_image_mut()) {
        placed.set_source(image.to_string());
    }

    // Grab the rectangle by its bottom-right handle and drag it past the
    // top-left corner, then normalize.
    let grabbed = shapes
        .element_at_point(&hit_tester, Point::new(262.0, 182.0))
        .map(|(shape, handle)| (shape.clone(), handle));
    match grabbed {
        Some((target, handle)) if handle.is_handle() => {
            if let Some(rect) = target.rect() {
                let resized = factory.update_element(&target, resize_points(Point::new(30.0, 40.0), handle, rect))?;
                let normalized = match resized.as_geometric() {
                    Some(geometric) => factory.update_element(&resized, adjust_drawing_points(geometric))?,
                    None => resized,
                };
                shapes.replace(normalized)?;
            }
        }
        _ => log::warn!("Resize handle not found"),
    }

    // Move the circle by grabbing its interior.
    let grab = Point::new(370.0, 150.0);
    let selected = match shapes.element_at_point(&hit_tester, grab) {
        Some((shape, tag)) if !tag.is_handle() => {
            let shape = shape.clone();
            let offsets = calc_element_offsets(&shape, grab);
            let moved = move_element(&factory, &shape, grab + kurbo::Vec2::new(0.0, 20.0), &offsets)?;
            let id = moved.id();
            shapes.replace(moved)?;
            Some(id)
        }
        _ => None,
    };

    log::info!("Built scene with {} shapes", shapes.len());
    Ok(Scene {
        shapes,
        selected,
        images,
    })
}

fn demo_png() -> Result<Vec<u8>, AppError> {
    let img = image::RgbaImage::from_fn(140, 120, |x, y| {
        image::Rgba([(x * 255 / 140) as u8, (y * 255 / 120) as u8, 180, 255])
    });
    let mut bytes = Vec::new();
    img.write_to(&mut std::io::Cursor::new(&mut bytes), image::ImageFormat::Png)?;
    Ok(bytes)
}

/// Render `scene`, loading any images the first frame asked for, and
/// return the final frame as SVG.
pub fn render_svg(renderer: &ElementRenderer, scene: &Scene) -> Result<String, AppError> {
    let mut surface = RecordingSurface::new();
    renderer.draw_all(&mut surface, scene.shapes.iter());

    let requests = renderer.image_cache().take_requests();
    if !requests.is_empty() {
        let store: Arc<dyn ImageStore> = scene.images.clone();
        for id in requests {
            if let Some(load) = renderer.image_cache().begin_load(id, Arc::clone(&store)) {
                // Failures are already recorded in the cache.
                let _ = pollster::block_on(load);
            }
        }
        surface.clear();
        renderer.draw_all(&mut surface, scene.shapes.iter());
    }

    if let Some(shape) = scene.selected.and_then(|id| scene.shapes.get(id)) {
        renderer.draw_selection_border(&mut surface, shape);
    }
    Ok(surface.to_svg(CANVAS_SIZE))
}

/// Parse arguments, build the scene and write or print the SVG.
pub fn run(args: impl IntoIterator<Item = String>) -> Result<(), AppError> {
    let args = Args::parse(args)?;
    let config = load_config(args.config.as_ref())?;
    let scene = build_scene(&config)?;
    let renderer = ElementRenderer::new(&config);
    let svg = render_svg(&renderer, &scene)?;
    match args.output {
        Some(path) => {
            std::fs::write(&path, svg)?;
            log::info!("Wrote {}", path.display());
        }
        None => print!("{}", svg),
    }
    Ok(())
}
