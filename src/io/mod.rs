//! Image storage collaborator.
//!
//! The distributor never touches storage directly. It talks to an `IoHandle`,
//! a dedicated thread that owns an `ImageStore` and serves load, save and idle
//! requests strictly in the order they were queued.
//!
//! # Wire format
//!
//! Images are row-major byte sequences of `width * height` cells, 0 for dead
//! and 255 for alive. The file-backed store keeps them as binary PGM:
//!
//! ```text
//! P5
//! <width> <height>
//! 255
//! <width * height bytes>
//! ```

mod handle;
mod memory;
mod pgm;

pub use handle::IoHandle;
pub use memory::{MemoryStore, SeededStore};
pub use pgm::{PgmStore, read_pgm, write_pgm};

/// Storage backend for grid images.
pub trait ImageStore: Send {
    /// Load image `name`, which must be `width * height` cells.
    fn load(&mut self, name: &str, width: usize, height: usize) -> Result<Vec<u8>, ImageError>;

    /// Persist `cells` as image `name`.
    fn save(
        &mut self,
        name: &str,
        width: usize,
        height: usize,
        cells: &[u8],
    ) -> Result<(), ImageError>;
}

impl<S: ImageStore + ?Sized> ImageStore for Box<S> {
    fn load(&mut self, name: &str, width: usize, height: usize) -> Result<Vec<u8>, ImageError> {
        (**self).load(name, width, height)
    }

    fn save(
        &mut self,
        name: &str,
        width: usize,
        height: usize,
        cells: &[u8],
    ) -> Result<(), ImageError> {
        (**self).save(name, width, height, cells)
    }
}

/// Image storage errors.
#[derive(Debug, thiserror::Error)]
pub enum ImageError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Invalid image header: {0}")]
    InvalidHeader(String),
    #[error("Image is {found:?}, expected {expected:?}")]
    DimensionMismatch {
        expected: (usize, usize),
        found: (usize, usize),
    },
    #[error("Image data truncated: expected {expected} bytes, found {found}")]
    Truncated { expected: usize, found: usize },
    #[error("Image {0} not found")]
    NotFound(String),
    #[error("Image I/O thread is no longer running")]
    Disconnected,
}
