//! Image storage abstraction.
//!
//! Image shapes only carry a reference; the encoded bytes live in an
//! [`ImageStore`] keyed by shape id. Loads are asynchronous so hosts can back
//! the store with IndexedDB, a filesystem or a network service.

use crate::shapes::ShapeId;
use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;
use std::sync::RwLock;
use thiserror::Error;

/// Image store errors.
#[derive(Debug, Error)]
pub enum ImageError {
    #[error("No stored image for shape {0}")]
    NotFound(ShapeId),
    #[error("Image store error: {0}")]
    Backend(String),
}

/// Result type for image store operations.
pub type ImageResult<T> = Result<T, ImageError>;

/// Boxed future for async operations.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Backend holding encoded image bytes.
pub trait ImageStore: Send + Sync {
    /// Load the encoded image stored for `id`.
    fn load_by_id(&self, id: ShapeId) -> BoxFuture<'_, ImageResult<Vec<u8>>>;

    /// Store encoded image bytes for `id`.
    fn save(&self, id: ShapeId, data: Vec<u8>) -> BoxFuture<'_, ImageResult<()>>;

    /// Forget the image stored for `id`.
    fn delete(&self, id: ShapeId) -> BoxFuture<'_, ImageResult<()>>;
}

/// In-memory image store for testing and ephemeral use.
#[derive(Default)]
pub struct MemoryImageStore {
    images: RwLock<HashMap<ShapeId, Vec<u8>>>,
}

impl MemoryImageStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ImageStore for MemoryImageStore {
    fn load_by_id(&self, id: ShapeId) -> BoxFuture<'_, ImageResult<Vec<u8>>> {
        Box::pin(async move {
            let images = self
                .images
                .read()
                .map_err(|e| ImageError::Backend(format!("Lock error: {}", e)))?;
            images.get(&id).cloned().ok_or(ImageError::NotFound(id))
        })
    }

    fn save(&self, id: ShapeId, data: Vec<u8>) -> BoxFuture<'_, ImageResult<()>> {
        Box::pin(async move {
            let mut images = self
                .images
                .write()
                .map_err(|e| ImageError::Backend(format!("Lock error: {}", e)))?;
            images.insert(id, data);
            Ok(())
        })
    }

    fn delete(&self, id: ShapeId) -> BoxFuture<'_, ImageResult<()>> {
        Box::pin(async move {
            let mut images = self
                .images
                .write()
                .map_err(|e| ImageError::Backend(format!("Lock error: {}", e)))?;
            images.remove(&id);
            Ok(())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    #[test]
    fn test_save_and_load() {
        let store = MemoryImageStore::new();
        let id = Uuid::new_v4();
        pollster::block_on(store.save(id, vec![1, 2, 3])).unwrap();
        let data = pollster::block_on(store.load_by_id(id)).unwrap();
        assert_eq!(data, vec![1, 2, 3]);
    }

    #[test]
    fn test_load_missing() {
        let store = MemoryImageStore::new();
        let id = Uuid::new_v4();
        let result = pollster::block_on(store.load_by_id(id));
        assert!(matches!(result, Err(ImageError::NotFound(missing)) if missing == id));
    }

    #[test]
    fn test_delete() {
        let store = MemoryImageStore::new();
        let id = Uuid::new_v4();
        pollster::block_on(store.save(id, vec![9])).unwrap();
        pollster::block_on(store.delete(id)).unwrap();
        assert!(pollster::block_on(store.load_by_id(id)).is_err());
    }
}
