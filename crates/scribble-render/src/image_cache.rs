//! Decoded image cache.
//!
//! Rendering never blocks on image bytes. When a frame meets an image that is
//! not decoded yet, the renderer records a request and draws nothing; the
//! host drains [`ImageCache::take_requests`], drives the futures returned by
//! [`ImageCache::begin_load`] on whatever executor it has, and redraws.

use crate::error::RenderResult;
use crate::surface::DecodedImage;
use scribble_core::images::{BoxFuture, ImageStore};
use scribble_core::ShapeId;
use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::{Arc, PoisonError, RwLock, RwLockWriteGuard};

/// Where an image stands in the cache.
#[derive(Debug, Clone, PartialEq)]
pub enum ImageState {
    Ready(Arc<DecodedImage>),
    /// A load is in flight.
    Loading,
    /// The last load failed; it is not retried until invalidated.
    Failed,
    /// Never requested, evicted or invalidated.
    Missing,
}

#[derive(Debug, Default)]
struct CacheInner {
    ready: HashMap<ShapeId, Arc<DecodedImage>>,
    /// Least recently used first.
    order: VecDeque<ShapeId>,
    /// In-flight loads and the generation each was started with.
    pending: HashMap<ShapeId, u64>,
    next_generation: u64,
    failed: HashSet<ShapeId>,
    requests: Vec<ShapeId>,
}

impl CacheInner {
    fn touch(&mut self, id: ShapeId) {
        if let Some(pos) = self.order.iter().position(|&other| other == id) {
            self.order.remove(pos);
        }
        self.order.push_back(id);
    }

    fn store(&mut self, id: ShapeId, image: Arc<DecodedImage>, capacity: usize) {
        self.pending.remove(&id);
        self.failed.remove(&id);
        self.ready.insert(id, image);
        self.touch(id);
        while self.ready.len() > capacity {
            let Some(oldest) = self.order.pop_front() else {
                break;
            };
            self.ready.remove(&oldest);
            log::debug!("Evicted image {}", oldest);
        }
    }

    fn forget(&mut self, id: ShapeId) {
        self.ready.remove(&id);
        self.order.retain(|&other| other != id);
        self.pending.remove(&id);
        self.failed.remove(&id);
        self.requests.retain(|&other| other != id);
    }
}

/// Bounded LRU of decoded images keyed by shape id.
#[derive(Debug)]
pub struct ImageCache {
    capacity: usize,
    inner: RwLock<CacheInner>,
}

impl Default for ImageCache {
    fn default() -> Self {
        Self::new(64)
    }
}

impl ImageCache {
    /// A cache holding at most `capacity` decoded images (at least one).
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity: capacity.max(1),
            inner: RwLock::new(CacheInner::default()),
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Number of decoded images held.
    pub fn len(&self) -> usize {
        self.inner.read().unwrap_or_else(PoisonError::into_inner).ready.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn write(&self) -> RwLockWriteGuard<'_, CacheInner> {
        self.inner.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Current state of `id`, marking it most recently used when ready.
    pub fn lookup(&self, id: ShapeId) -> ImageState {
        let mut inner = self.write();
        if let Some(image) = inner.ready.get(&id).cloned() {
            inner.touch(id);
            return ImageState::Ready(image);
        }
        if inner.pending.contains_key(&id) {
            ImageState::Loading
        } else if inner.failed.contains(&id) {
            ImageState::Failed
        } else {
            ImageState::Missing
        }
    }

    /// Note that a frame wanted `id`; duplicates are dropped.
    pub fn request(&self, id: ShapeId) {
        let mut inner = self.write();
        let known = inner.ready.contains_key(&id) || inner.pending.contains_key(&id) || inner.failed.contains(&id);
        if !known && !inner.requests.contains(&id) {
            log::debug!("Image {} requested", id);
            inner.requests.push(id);
        }
    }

    /// Drain the ids recorded by [`ImageCache::request`].
    pub fn take_requests(&self) -> Vec<ShapeId> {
        std::mem::take(&mut self.write().requests)
    }

    /// Store a decoded image, evicting the least recently used past capacity.
    pub fn insert(&self, id: ShapeId, image: DecodedImage) -> Arc<DecodedImage> {
        let image = Arc::new(image);
        self.write().store(id, Arc::clone(&image), self.capacity);
        image
    }

    /// Start loading `id` from `store`.
    ///
    /// Returns `None` when the image is already decoded or a load for it is
    /// in flight. The returned future decodes the bytes and fills the cache;
    /// failures are logged and remembered as [`ImageState::Failed`]. A load
    /// that outlives an [`ImageCache::invalidate`] of its id commits nothing.
    pub fn begin_load(
        self: &Arc<Self>,
        id: ShapeId,
        store: Arc<dyn ImageStore>,
    ) -> Option<BoxFuture<'static, RenderResult<Arc<DecodedImage>>>> {
        let generation = {
            let mut inner = self.write();
            if inner.ready.contains_key(&id) || inner.pending.contains_key(&id) {
                return None;
            }
            let generation = inner.next_generation;
            inner.next_generation += 1;
            inner.pending.insert(id, generation);
            inner.failed.remove(&id);
            inner.requests.retain(|&other| other != id);
            generation
        };
        log::debug!("Loading image {} (generation {})", id, generation);

        let cache = Arc::clone(self);
        Some(Box::pin(async move {
            let result = match store.load_by_id(id).await {
                Ok(bytes) => decode(&bytes),
                Err(e) => Err(e.into()),
            };
            cache.finish_load(id, generation, result)
        }))
    }

    fn finish_load(
        &self,
        id: ShapeId,
        generation: u64,
        result: RenderResult<DecodedImage>,
    ) -> RenderResult<Arc<DecodedImage>> {
        let mut inner = self.write();
        if inner.pending.get(&id) != Some(&generation) {
            // Invalidated while loading, possibly with a newer load started.
            log::debug!("Dropped stale load of image {} (generation {})", id, generation);
            return result.map(Arc::new);
        }
        match result {
            Ok(image) => {
                let image = Arc::new(image);
                inner.store(id, Arc::clone(&image), self.capacity);
                Ok(image)
            }
            Err(e) => {
                log::warn!("Failed to load image {}: {}", id, e);
                inner.pending.remove(&id);
                inner.failed.insert(id);
                Err(e)
            }
        }
    }

    /// Forget everything known about `id`.
    pub fn invalidate(&self, id: ShapeId) {
        self.write().forget(id);
        log::debug!("Invalidated image {}", id);
    }

    /// Forget every image.
    pub fn clear(&self) {
        let mut inner = self.write();
        let next_generation = inner.next_generation;
        *inner = CacheInner {
            next_generation,
            ..CacheInner::default()
        };
    }
}

/// Decode encoded image bytes into RGBA8.
pub fn decode(bytes: &[u8]) -> RenderResult<DecodedImage> {
    let rgba = image::load_from_memory(bytes)?.to_rgba8();
    let (width, height) = rgba.dimensions();
    Ok(DecodedImage {
        width,
        height,
        rgba: Arc::new(rgba.into_raw()),
    })
}
