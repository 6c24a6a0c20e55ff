//! Image discovery and derivative generation.
//!
//! Stage 5 of the build. Discovery runs earlier, during loading, so templates
//! can link to derivatives before they exist on disk.
//!
//! ## Output Structure
//!
//! For each source image `{source_dir}/{rel_dir}/{stem}.{ext}`:
//!
//! ```text
//! dist/photos/
//! ├── original/live/001.jpg           # byte-identical copy
//! ├── 1600/live/001-1600.jpg          # display, long edge ≤ 1600
//! └── thumb/live/001-thumb.jpg        # thumbnail, long edge ≤ 400
//! ```
//!
//! ## Failure Policy
//!
//! Every image is an isolated unit. A corrupt, unreadable or unsupported file
//! becomes an [`ImageFailure`] in the [`ProcessReport`]; the remaining images
//! are still processed. The three outputs of an image are encoded in memory
//! and written together, so a failed image never leaves partial output.
//!
//! ## Parallel Processing
//!
//! Images are processed in parallel using [rayon](https://docs.rs/rayon).
//! Results keep discovery order regardless of completion order.

use crate::config::ImagesConfig;
use crate::imaging::{
    BackendError, DerivativeSet, DerivativesConfig, Dimensions, ImageBackend, create_derivatives,
};
use crate::layout::{ImageSource, to_url_path};
use crate::types::ImageAsset;
use rayon::prelude::*;
use serde::Serialize;
use std::collections::HashMap;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;
use walkdir::WalkDir;

/// Fatal: the image directory itself could not be read.
#[derive(Error, Debug)]
pub enum ProcessError {
    #[error("cannot scan image directory {path}: {source}")]
    Walk {
        path: PathBuf,
        #[source]
        source: walkdir::Error,
    },
}

/// Non-fatal: one image failed and was skipped.
#[derive(Error, Debug)]
pub enum ImageError {
    #[error("{0}: unsupported image format")]
    Unsupported(PathBuf),
    #[error("{path}: {source}")]
    Processing {
        path: PathBuf,
        #[source]
        source: BackendError,
    },
    #[error("{path}: output {output} is already produced by {other}")]
    NameCollision {
        path: PathBuf,
        output: String,
        other: PathBuf,
    },
    #[error("{path}: cannot write {output}: {source}")]
    Write {
        path: PathBuf,
        output: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// A source image scheduled for processing.
#[derive(Debug, Clone, PartialEq)]
pub struct PlannedImage {
    pub asset: ImageAsset,
}

/// Result of scanning one image source.
#[derive(Debug, Default)]
pub struct Discovery {
    /// The source directory scanned.
    pub dir: PathBuf,
    /// Images to process, in discovery order.
    pub planned: Vec<PlannedImage>,
    /// Files rejected before processing (unsupported, unreadable, colliding).
    pub rejected: Vec<ImageFailure>,
}

/// An image whose three outputs were written.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProcessedImage {
    pub source: PathBuf,
    pub original: Dimensions,
    pub display: Dimensions,
    pub thumbnail: Dimensions,
}

#[derive(Debug, Serialize)]
pub struct ImageFailure {
    pub source: PathBuf,
    #[serde(serialize_with = "serialize_display")]
    pub error: ImageError,
}

impl ImageFailure {
    fn new(source: &Path, error: ImageError) -> Self {
        Self {
            source: source.to_path_buf(),
            error,
        }
    }
}

fn serialize_display<S, T>(value: &T, serializer: S) -> Result<S::Ok, S::Error>
where
    S: serde::Serializer,
    T: std::fmt::Display,
{
    serializer.collect_str(value)
}

#[derive(Debug, Default, Serialize)]
pub struct ProcessReport {
    pub processed: Vec<ProcessedImage>,
    pub failures: Vec<ImageFailure>,
}

/// Destination-relative URLs of the three derivatives of `rel`.
///
/// ```
/// # use bandsite::config::ImagesConfig;
/// # use bandsite::layout::ImageSource;
/// # use bandsite::process::plan_asset;
/// # use std::path::Path;
/// let source = ImageSource { dir: "/site/photos/raw".into(), url_prefix: "photos".into() };
/// let asset = plan_asset(&source, Path::new("live/001.png"), &ImagesConfig::default());
/// assert_eq!(asset.original, "photos/original/live/001.png");
/// assert_eq!(asset.display, "photos/1600/live/001-1600.jpg");
/// assert_eq!(asset.thumbnail, "photos/thumb/live/001-thumb.jpg");
/// ```
pub fn plan_asset(source: &ImageSource, rel: &Path, config: &ImagesConfig) -> ImageAsset {
    let rel_dir = rel.parent().unwrap_or(Path::new(""));
    let stem = rel
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let prefix = Path::new(&source.url_prefix);
    let display_dir = config.display_width.to_string();

    let original = prefix.join("original").join(rel);
    let display = prefix
        .join(&display_dir)
        .join(rel_dir)
        .join(format!("{stem}-{display_dir}.jpg"));
    let thumbnail = prefix
        .join("thumb")
        .join(rel_dir)
        .join(format!("{stem}-thumb.jpg"));

    ImageAsset {
        name: to_url_path(rel),
        source: source.dir.join(rel),
        original: to_url_path(&original),
        display: to_url_path(&display),
        thumbnail: to_url_path(&thumbnail),
    }
}

fn is_hidden(entry: &walkdir::DirEntry) -> bool {
    entry.depth() > 0 && entry.file_name().to_string_lossy().starts_with('.')
}

/// Find every image under `source.dir`, recursively, in file-name order.
///
/// Hidden files and directories are skipped and symlinks are followed. A
/// missing directory yields an empty discovery. Files the backend does not
/// support or cannot identify, and files whose derivatives would overwrite an
/// earlier image's, are rejected up front so templates never link to them.
pub fn discover(
    backend: &impl ImageBackend,
    source: &ImageSource,
    config: &ImagesConfig,
) -> Result<Discovery, ProcessError> {
    let mut discovery = Discovery {
        dir: source.dir.clone(),
        ..Discovery::default()
    };
    if !source.dir.is_dir() {
        return Ok(discovery);
    }

    let mut claimed: HashMap<String, PathBuf> = HashMap::new();
    let walker = WalkDir::new(&source.dir)
        .follow_links(true)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|e| !is_hidden(e));

    for entry in walker {
        let entry = entry.map_err(|e| ProcessError::Walk {
            path: source.dir.clone(),
            source: e,
        })?;
        if !entry.file_type().is_file() {
            continue;
        }

        let path = entry.path();
        if !backend.supports(path) {
            discovery.rejected.push(ImageFailure::new(
                path,
                ImageError::Unsupported(path.to_path_buf()),
            ));
            continue;
        }
        if let Err(e) = backend.identify(path) {
            discovery.rejected.push(ImageFailure::new(
                path,
                ImageError::Processing {
                    path: path.to_path_buf(),
                    source: e,
                },
            ));
            continue;
        }

        let rel = path.strip_prefix(&source.dir).unwrap_or(path);
        let asset = plan_asset(source, rel, config);

        // `a.jpg` and `a.png` share a display and thumbnail name.
        if let Some(other) = claimed.get(&asset.display) {
            discovery.rejected.push(ImageFailure::new(
                path,
                ImageError::NameCollision {
                    path: path.to_path_buf(),
                    output: asset.display.clone(),
                    other: other.clone(),
                },
            ));
            continue;
        }
        claimed.insert(asset.display.clone(), path.to_path_buf());
        discovery.planned.push(PlannedImage { asset });
    }

    Ok(discovery)
}

/// Process images using a specific backend (allows testing with mock).
pub fn process_with_backend(
    backend: &impl ImageBackend,
    planned: &[PlannedImage],
    dest: &Path,
    config: &ImagesConfig,
) -> ProcessReport {
    let derivatives = DerivativesConfig::from_images_config(config);

    let results: Vec<Result<ProcessedImage, ImageFailure>> = planned
        .par_iter()
        .map(|image| process_image(backend, image, dest, &derivatives))
        .collect();

    let mut report = ProcessReport::default();
    for result in results {
        match result {
            Ok(processed) => report.processed.push(processed),
            Err(failure) => report.failures.push(failure),
        }
    }
    report
}

fn process_image(
    backend: &impl ImageBackend,
    image: &PlannedImage,
    dest: &Path,
    config: &DerivativesConfig,
) -> Result<ProcessedImage, ImageFailure> {
    let source = &image.asset.source;
    let set = create_derivatives(backend, source, config).map_err(|e| {
        ImageFailure::new(
            source,
            ImageError::Processing {
                path: source.clone(),
                source: e,
            },
        )
    })?;

    write_unit(dest, &image.asset, &set).map_err(|e| ImageFailure::new(source, e))?;

    Ok(ProcessedImage {
        source: source.clone(),
        original: set.source_dimensions,
        display: set.display.dimensions,
        thumbnail: set.thumbnail.dimensions,
    })
}

/// Write all three outputs, or none of them.
fn write_unit(dest: &Path, asset: &ImageAsset, set: &DerivativeSet) -> Result<(), ImageError> {
    let outputs = [
        (&asset.original, set.original.as_slice()),
        (&asset.display, set.display.bytes.as_slice()),
        (&asset.thumbnail, set.thumbnail.bytes.as_slice()),
    ];

    let mut written: Vec<PathBuf> = Vec::new();
    for (url, bytes) in outputs {
        let output = dest.join(url);
        if let Err(source) = write_file(&output, bytes) {
            for path in &written {
                let _ = std::fs::remove_file(path);
            }
            return Err(ImageError::Write {
                path: asset.source.clone(),
                output,
                source,
            });
        }
        written.push(output);
    }
    Ok(())
}

fn write_file(path: &Path, bytes: &[u8]) -> io::Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, bytes)
}
