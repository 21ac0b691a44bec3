//! In-memory and seed-backed stores.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use super::{ImageError, ImageStore};
use crate::schema::Seed;

#[derive(Debug, Clone, PartialEq, Eq)]
struct StoredImage {
    width: usize,
    height: usize,
    cells: Vec<u8>,
}

/// Image store kept in memory.
///
/// Clones share the same images, so a caller can keep one clone to inspect
/// what a run saved after handing the other to the run.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    images: Arc<Mutex<HashMap<String, StoredImage>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-populated with one image.
    pub fn with_image(name: &str, width: usize, height: usize, cells: Vec<u8>) -> Self {
        let store = Self::new();
        store.insert(name, width, height, cells);
        store
    }

    pub fn insert(&self, name: &str, width: usize, height: usize, cells: Vec<u8>) {
        self.images
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(
                name.to_string(),
                StoredImage {
                    width,
                    height,
                    cells,
                },
            );
    }

    /// Cells of image `name`, if present.
    pub fn get(&self, name: &str) -> Option<Vec<u8>> {
        self.images
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(name)
            .map(|image| image.cells.clone())
    }

    /// Sorted names of all stored images.
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self
            .images
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .keys()
            .cloned()
            .collect();
        names.sort();
        names
    }
}

impl ImageStore for MemoryStore {
    fn load(&mut self, name: &str, width: usize, height: usize) -> Result<Vec<u8>, ImageError> {
        let images = self.images.lock().unwrap_or_else(PoisonError::into_inner);
        let image = images
            .get(name)
            .ok_or_else(|| ImageError::NotFound(name.to_string()))?;
        if (image.width, image.height) != (width, height) {
            return Err(ImageError::DimensionMismatch {
                expected: (width, height),
                found: (image.width, image.height),
            });
        }
        Ok(image.cells.clone())
    }

    fn save(
        &mut self,
        name: &str,
        width: usize,
        height: usize,
        cells: &[u8],
    ) -> Result<(), ImageError> {
        self.insert(name, width, height, cells.to_vec());
        Ok(())
    }
}

/// Serves every load from a `Seed` and forwards saves to `inner`.
#[derive(Debug, Clone)]
pub struct SeededStore<S> {
    seed: Seed,
    inner: S,
}

impl<S: ImageStore> SeededStore<S> {
    pub fn new(seed: Seed, inner: S) -> Self {
        Self { seed, inner }
    }
}

impl<S: ImageStore> ImageStore for SeededStore<S> {
    fn load(&mut self, _name: &str, width: usize, height: usize) -> Result<Vec<u8>, ImageError> {
        Ok(self.seed.generate(width, height))
    }

    fn save(
        &mut self,
        name: &str,
        width: usize,
        height: usize,
        cells: &[u8],
    ) -> Result<(), ImageError> {
        self.inner.save(name, width, height, cells)
    }
}
