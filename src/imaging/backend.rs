//! Image processing backend trait and shared types.
//!
//! The [`ImageBackend`] trait defines what every backend must support:
//! telling which files it can decode, identifying dimensions, and producing
//! an encoded resize. Backends return encoded bytes rather than writing files,
//! so the pipeline decides when a derivative set is complete enough to land on
//! disk.
//!
//! The production implementation is
//! [`RustBackend`](super::rust_backend::RustBackend), pure Rust and statically
//! linked into the binary.

use super::params::ResizeParams;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BackendError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Unsupported format: {0}")]
    Unsupported(String),
    #[error("Processing failed: {0}")]
    ProcessingFailed(String),
}

/// Result of an identify operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
pub struct Dimensions {
    pub width: u32,
    pub height: u32,
}

impl From<(u32, u32)> for Dimensions {
    fn from((width, height): (u32, u32)) -> Self {
        Self { width, height }
    }
}

/// Trait for image processing backends.
///
/// `Sync` so a single backend can be shared across rayon workers.
pub trait ImageBackend: Sync {
    /// Whether files with this path's extension can be decoded.
    fn supports(&self, path: &Path) -> bool;

    /// Get image dimensions.
    fn identify(&self, path: &Path) -> Result<Dimensions, BackendError>;

    /// Resize to exactly the requested dimensions and return the encoded JPEG.
    fn resize(&self, params: &ResizeParams) -> Result<Vec<u8>, BackendError>;
}
