//! High-level image operations.
//!
//! These functions combine calculations with backend execution.
//! They take configuration, compute parameters, and call the backend.
//! Nothing here touches the output directory: a [`DerivativeSet`] is held in
//! memory until the caller writes it out as a unit.

use super::backend::{BackendError, Dimensions, ImageBackend};
use super::calculations::fit_long_edge;
use super::params::{Quality, ResizeParams};
use super::rust_backend::is_jpeg;
use crate::config::ImagesConfig;
use std::path::Path;

/// Result type for image operations.
pub type Result<T> = std::result::Result<T, BackendError>;

/// Get image dimensions using the backend.
pub fn get_dimensions(backend: &impl ImageBackend, path: &Path) -> Result<(u32, u32)> {
    let dims = backend.identify(path)?;
    Ok((dims.width, dims.height))
}

/// Target long edge and encoding quality for one derivative.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DerivativeConfig {
    pub long_edge: u32,
    pub quality: Quality,
}

/// Settings for the display and thumbnail derivatives.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DerivativesConfig {
    pub display: DerivativeConfig,
    pub thumbnail: DerivativeConfig,
}

impl DerivativesConfig {
    pub fn from_images_config(config: &ImagesConfig) -> Self {
        Self {
            display: DerivativeConfig {
                long_edge: config.display_width,
                quality: Quality::new(config.display_quality),
            },
            thumbnail: DerivativeConfig {
                long_edge: config.thumbnail_width,
                quality: Quality::new(config.thumbnail_quality),
            },
        }
    }
}

impl Default for DerivativesConfig {
    fn default() -> Self {
        Self::from_images_config(&ImagesConfig::default())
    }
}

/// An encoded derivative and its pixel dimensions.
#[derive(Debug, Clone, PartialEq)]
pub struct EncodedImage {
    pub dimensions: Dimensions,
    pub bytes: Vec<u8>,
}

/// Everything produced for one source image.
#[derive(Debug, Clone, PartialEq)]
pub struct DerivativeSet {
    pub source_dimensions: Dimensions,
    /// The source file's bytes, unmodified.
    pub original: Vec<u8>,
    pub display: EncodedImage,
    pub thumbnail: EncodedImage,
}

/// Plan a derivative without executing it.
///
/// Useful for testing parameter generation.
pub fn plan_derivative(
    source: &Path,
    original_dims: (u32, u32),
    config: &DerivativeConfig,
) -> ResizeParams {
    let (width, height) = fit_long_edge(original_dims, config.long_edge);
    ResizeParams {
        source: source.to_path_buf(),
        width,
        height,
        quality: config.quality,
    }
}

/// Produce one derivative.
///
/// A JPEG source that already fits is passed through byte-for-byte instead of
/// being re-encoded.
pub fn create_derivative(
    backend: &impl ImageBackend,
    source: &Path,
    original: &[u8],
    original_dims: (u32, u32),
    config: &DerivativeConfig,
) -> Result<EncodedImage> {
    let params = plan_derivative(source, original_dims, config);
    let dimensions = Dimensions {
        width: params.width,
        height: params.height,
    };

    let bytes = if (params.width, params.height) == original_dims && is_jpeg(source) {
        original.to_vec()
    } else {
        backend.resize(&params)?
    };

    Ok(EncodedImage { dimensions, bytes })
}

/// Produce the original copy, display image and thumbnail for `source`.
pub fn create_derivatives(
    backend: &impl ImageBackend,
    source: &Path,
    config: &DerivativesConfig,
) -> Result<DerivativeSet> {
    if !backend.supports(source) {
        return Err(BackendError::Unsupported(source.display().to_string()));
    }

    let original_dims = get_dimensions(backend, source)?;
    let original = std::fs::read(source)?;

    let display = create_derivative(backend, source, &original, original_dims, &config.display)?;
    let thumbnail =
        create_derivative(backend, source, &original, original_dims, &config.thumbnail)?;

    Ok(DerivativeSet {
        source_dimensions: original_dims.into(),
        original,
        display,
        thumbnail,
    })
}
