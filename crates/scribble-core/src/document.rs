//! Ordered shape list.

use crate::error::{CoreError, CoreResult};
use crate::hit_test::{HitTester, PositionTag};
use crate::shapes::{Shape, ShapeId};
use kurbo::Point;

/// Shapes in paint order (back to front), which is also creation order.
#[derive(Debug, Clone, Default)]
pub struct ShapeList {
    shapes: Vec<Shape>,
}

impl ShapeList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a shape on top of the others.
    pub fn push(&mut self, shape: Shape) {
        self.shapes.push(shape);
    }

    pub fn get(&self, id: ShapeId) -> Option<&Shape> {
        self.shapes.iter().find(|s| s.id() == id)
    }

    pub fn get_mut(&mut self, id: ShapeId) -> Option<&mut Shape> {
        self.shapes.iter_mut().find(|s| s.id() == id)
    }

    pub fn index_of(&self, id: ShapeId) -> Option<usize> {
        self.shapes.iter().position(|s| s.id() == id)
    }

    /// Swap in an edited shape at the position of the shape with the same id.
    pub fn replace(&mut self, shape: Shape) -> CoreResult<()> {
        let id = shape.id();
        let index = self.index_of(id).ok_or(CoreError::ShapeNotFound(id))?;
        self.shapes[index] = shape;
        Ok(())
    }

    /// Remove a shape. Hosts that render images remove through their
    /// renderer so the decoded pixels are dropped too.
    pub fn remove(&mut self, id: ShapeId) -> Option<Shape> {
        let index = self.index_of(id)?;
        Some(self.shapes.remove(index))
    }

    pub fn clear(&mut self) {
        self.shapes.clear();
    }

    pub fn iter(&self) -> impl Iterator<Item = &Shape> {
        self.shapes.iter()
    }

    pub fn as_slice(&self) -> &[Shape] {
        &self.shapes
    }

    pub fn len(&self) -> usize {
        self.shapes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty()
    }

    /// Shape under `point` and the part of it that was hit.
    pub fn element_at_point(&self, hit_tester: &HitTester, point: Point) -> Option<(&Shape, PositionTag)> {
        hit_tester.element_at_point(point, &self.shapes)
    }
}

impl FromIterator<Shape> for ShapeList {
    fn from_iter<I: IntoIterator<Item = Shape>>(iter: I) -> Self {
        Self {
            shapes: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::factory::ShapeFactory;
    use crate::shapes::StyleOptions;
    use crate::tools::ToolKind;
    use uuid::Uuid;

    fn rect(x: f64) -> Shape {
        ShapeFactory::default()
            .create_element(x, 0.0, x + 10.0, 10.0, ToolKind::Rectangle, Uuid::new_v4(), &StyleOptions::default())
            .unwrap()
    }

    #[test]
    fn test_lookup_by_id() {
        let mut list = ShapeList::new();
        let first = rect(0.0);
        let second = rect(20.0);
        list.push(first.clone());
        list.push(second.clone());

        assert_eq!(list.index_of(second.id()), Some(1));
        assert_eq!(list.get(first.id()).map(Shape::id), Some(first.id()));
        assert!(list.get(Uuid::new_v4()).is_none());
        assert!(list.index_of(Uuid::new_v4()).is_none());
    }

    #[test]
    fn test_replace_keeps_position() {
        let factory = ShapeFactory::default();
        let mut list: ShapeList = [rect(0.0), rect(20.0)].into_iter().collect();
        let target = list.as_slice()[0].clone();
        let edited = factory.update_element(&target, kurbo::Rect::new(0.0, 0.0, 50.0, 50.0)).unwrap();
        list.replace(edited).unwrap();
        assert_eq!(list.index_of(target.id()), Some(0));
        assert_eq!(list.as_slice()[0].rect(), Some(kurbo::Rect::new(0.0, 0.0, 50.0, 50.0)));
    }

    #[test]
    fn test_replace_missing() {
        let mut list = ShapeList::new();
        let shape = rect(0.0);
        let id = shape.id();
        assert!(matches!(list.replace(shape), Err(CoreError::ShapeNotFound(missing)) if missing == id));
    }

    #[test]
    fn test_remove() {
        let mut list: ShapeList = [rect(0.0), rect(20.0)].into_iter().collect();
        let id = list.as_slice()[0].id();
        assert!(list.remove(id).is_some());
        assert!(list.remove(id).is_none());
        assert_eq!(list.len(), 1);
    }

    #[test]
    fn test_element_at_point() {
        let list: ShapeList = [rect(0.0), rect(20.0)].into_iter().collect();
        let tester = HitTester::default();
        let (shape, tag) = list.element_at_point(&tester, Point::new(25.0, 5.0)).unwrap();
        assert_eq!(shape.id(), list.as_slice()[1].id());
        assert_eq!(tag, PositionTag::Inside);
    }
}
