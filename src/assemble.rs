//! Output assembly: the build pipeline.
//!
//! A build is a strict linear sequence of [`Stage`]s:
//!
//! 1. **Reset** the destination to an empty directory
//! 2. **Load** pages, concerts, albums, templates and the image plan
//! 3. **Render** the homepage, every page and the listings
//! 4. **Copy static** assets verbatim
//! 5. **Process images** into originals, display images and thumbnails
//!
//! Content and template errors surface during loading, before anything is
//! written. Image failures never abort the build: they are collected into the
//! [`BuildReport`].

use crate::config::SiteConfig;
use crate::content::{self, ContentError};
use crate::imaging::{ImageBackend, RustBackend};
use crate::layout::{
    ALBUMS_OUTPUT, CONCERTS_OUTPUT, HOME_OUTPUT, STATIC_OUTPUT, SiteLayout, page_output,
};
use crate::process::{self, Discovery, ImageFailure, ProcessError, ProcessedImage};
use crate::render::{self, Renderer, SiteData, TemplateError, TemplateName};
use crate::types::{AlbumEntry, ConcertEntry, ImageAsset, Page};
use chrono::{Datelike, NaiveDate};
use serde::Serialize;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;
use walkdir::WalkDir;

#[derive(Error, Debug)]
pub enum BuildError {
    #[error("refusing to build into {dest}: it contains the site root {root}")]
    UnsafeDestination { dest: PathBuf, root: PathBuf },
    #[error("cannot reset output directory {path}: {source}")]
    Reset {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error(transparent)]
    Content(#[from] ContentError),
    #[error(transparent)]
    Template(#[from] TemplateError),
    #[error(transparent)]
    Images(#[from] ProcessError),
    #[error("cannot read {path}: {source}")]
    Walk {
        path: PathBuf,
        #[source]
        source: walkdir::Error,
    },
    #[error("cannot write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Pipeline stages, reported to the progress callback as each one starts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Reset,
    Load,
    Render,
    CopyStatic,
    ProcessImages,
}

/// Everything loaded from a site before any output is produced.
#[derive(Debug)]
pub struct SiteContent {
    pub pages: Vec<Page>,
    /// `None` when `content/concerts.yaml` does not exist.
    pub concerts: Option<Vec<ConcertEntry>>,
    /// `None` when `content/albums.yaml` does not exist.
    pub albums: Option<Vec<AlbumEntry>>,
    pub renderer: Renderer,
    pub gallery: Discovery,
    pub artwork: Discovery,
}

impl SiteContent {
    /// Gallery images as they will be published, in discovery order.
    pub fn photos(&self) -> Vec<ImageAsset> {
        self.gallery
            .planned
            .iter()
            .map(|p| p.asset.clone())
            .collect()
    }
}

/// A listing page and how many entries it shows.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ListingReport {
    pub output: String,
    pub entries: usize,
}

/// Summary of a finished build.
#[derive(Debug, Serialize)]
pub struct BuildReport {
    pub destination: PathBuf,
    /// Output paths of the homepage and every page, relative to the destination.
    pub pages: Vec<String>,
    pub listings: Vec<ListingReport>,
    pub static_files: usize,
    pub images: Vec<ProcessedImage>,
    pub image_failures: Vec<ImageFailure>,
}

/// Build the site at `layout.root` into `dest` with the pure Rust backend.
pub fn build(
    layout: &SiteLayout,
    dest: &Path,
    config: &SiteConfig,
    today: NaiveDate,
) -> Result<BuildReport, BuildError> {
    build_with_backend(&RustBackend::new(), layout, dest, config, today, &mut |_| {})
}

/// Build using a specific image backend, reporting each stage as it starts.
pub fn build_with_backend(
    backend: &impl ImageBackend,
    layout: &SiteLayout,
    dest: &Path,
    config: &SiteConfig,
    today: NaiveDate,
    progress: &mut dyn FnMut(Stage),
) -> Result<BuildReport, BuildError> {
    progress(Stage::Reset);
    reset_destination(&layout.root, dest)?;

    progress(Stage::Load);
    let site = load(backend, layout, config, today)?;

    progress(Stage::Render);
    let (pages, listings) = write_pages(&site, dest, config, today)?;

    progress(Stage::CopyStatic);
    let static_files = copy_static(&layout.static_dir, &dest.join(STATIC_OUTPUT))?;

    progress(Stage::ProcessImages);
    let mut image_failures: Vec<ImageFailure> = Vec::new();
    let mut images = Vec::new();
    for discovery in [site.gallery, site.artwork] {
        let report =
            process::process_with_backend(backend, &discovery.planned, dest, &config.images);
        image_failures.extend(discovery.rejected);
        image_failures.extend(report.failures);
        images.extend(report.processed);
    }

    Ok(BuildReport {
        destination: dest.to_path_buf(),
        pages,
        listings,
        static_files,
        images,
        image_failures,
    })
}

/// Delete `dest` if present and recreate it empty.
///
/// Refuses a destination that is the site root or one of its ancestors.
pub fn reset_destination(root: &Path, dest: &Path) -> Result<(), BuildError> {
    let reset_err = |source| BuildError::Reset {
        path: dest.to_path_buf(),
        source,
    };

    if dest.exists() {
        let canonical_dest = dest.canonicalize().map_err(reset_err)?;
        let canonical_root = root.canonicalize().map_err(reset_err)?;
        if canonical_root.starts_with(&canonical_dest) {
            return Err(BuildError::UnsafeDestination {
                dest: dest.to_path_buf(),
                root: root.to_path_buf(),
            });
        }

        if dest.is_dir() {
            fs::remove_dir_all(dest).map_err(reset_err)?;
        } else {
            fs::remove_file(dest).map_err(reset_err)?;
        }
    }

    fs::create_dir_all(dest).map_err(reset_err)
}

/// Load and validate all inputs. Writes nothing.
///
/// Every template that [`write_pages`] will render must be present.
pub fn load(
    backend: &impl ImageBackend,
    layout: &SiteLayout,
    config: &SiteConfig,
    today: NaiveDate,
) -> Result<SiteContent, BuildError> {
    let pages = content::load_pages(&layout.pages_dir)?;
    let concerts = if layout.concerts_file.is_file() {
        Some(content::load_concerts(&layout.concerts_file, today)?)
    } else {
        None
    };
    let albums = if layout.albums_file.is_file() {
        Some(content::load_albums(&layout.albums_file, &config.albums)?)
    } else {
        None
    };

    let renderer = Renderer::load(&layout.templates_dir)?;
    let mut required = vec![TemplateName::Home];
    if !pages.is_empty() {
        required.push(TemplateName::Page);
    }
    if concerts.is_some() {
        required.push(TemplateName::Concerts);
    }
    if albums.is_some() {
        required.push(TemplateName::Albums);
    }
    renderer.require(&required)?;

    let gallery = process::discover(backend, &layout.gallery, &config.images)?;
    let artwork = process::discover(backend, &layout.artwork, &config.images)?;

    Ok(SiteContent {
        pages,
        concerts,
        albums,
        renderer,
        gallery,
        artwork,
    })
}

/// An HTML document ready to be written.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedPage {
    /// Destination-relative output path.
    pub output: String,
    pub html: String,
}

/// Every document of the site, rendered in memory.
#[derive(Debug, Default)]
pub struct RenderedSite {
    /// The homepage followed by each page.
    pub pages: Vec<RenderedPage>,
    pub listings: Vec<(RenderedPage, ListingReport)>,
}

/// Render the homepage, every page and the listings without writing.
pub fn render_site(
    site: &SiteContent,
    config: &SiteConfig,
    today: NaiveDate,
) -> Result<RenderedSite, BuildError> {
    let data = SiteData::new(&config.site, &site.pages, today.year());
    let concerts = site.concerts.as_deref().unwrap_or_default();
    let albums = site.albums.as_deref().unwrap_or_default();
    let mut rendered = RenderedSite::default();

    let ctx = render::home_context(
        &data,
        &site.pages,
        concerts,
        albums,
        &site.photos(),
        &config.home,
    );
    rendered.pages.push(RenderedPage {
        output: HOME_OUTPUT.to_string(),
        html: site.renderer.render(TemplateName::Home, &ctx)?,
    });

    for page in &site.pages {
        let ctx = render::page_context(&data, page);
        rendered.pages.push(RenderedPage {
            output: page_output(&page.slug),
            html: site.renderer.render(TemplateName::Page, &ctx)?,
        });
    }

    if let Some(concerts) = &site.concerts {
        let ctx = render::concerts_context(&data, concerts);
        let page = RenderedPage {
            output: CONCERTS_OUTPUT.to_string(),
            html: site.renderer.render(TemplateName::Concerts, &ctx)?,
        };
        let listing = ListingReport {
            output: CONCERTS_OUTPUT.to_string(),
            entries: concerts.len(),
        };
        rendered.listings.push((page, listing));
    }

    if let Some(albums) = &site.albums {
        let ctx = render::albums_context(&data, albums);
        let page = RenderedPage {
            output: ALBUMS_OUTPUT.to_string(),
            html: site.renderer.render(TemplateName::Albums, &ctx)?,
        };
        let listing = ListingReport {
            output: ALBUMS_OUTPUT.to_string(),
            entries: albums.len(),
        };
        rendered.listings.push((page, listing));
    }

    Ok(rendered)
}

/// Render everything, then write it under `dest`.
///
/// Returns the page outputs and the listings written. A render error leaves
/// `dest` untouched.
pub fn write_pages(
    site: &SiteContent,
    dest: &Path,
    config: &SiteConfig,
    today: NaiveDate,
) -> Result<(Vec<String>, Vec<ListingReport>), BuildError> {
    let rendered = render_site(site, config, today)?;
    let mut pages = Vec::new();
    let mut listings = Vec::new();

    for page in rendered.pages {
        write_output(dest, &page.output, &page.html)?;
        pages.push(page.output);
    }
    for (page, listing) in rendered.listings {
        write_output(dest, &page.output, &page.html)?;
        listings.push(listing);
    }

    Ok((pages, listings))
}

fn write_output(dest: &Path, output: &str, html: &str) -> Result<(), BuildError> {
    let path = dest.join(output);
    let write_err = |source| BuildError::Write {
        path: path.clone(),
        source,
    };
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(write_err)?;
    }
    fs::write(&path, html).map_err(write_err)
}

/// Copy `src/**` into `dest/**` byte-for-byte. Returns the number of files.
///
/// A missing source directory copies nothing.
pub fn copy_static(src: &Path, dest: &Path) -> Result<usize, BuildError> {
    if !src.is_dir() {
        return Ok(0);
    }

    let mut copied = 0;
    for entry in WalkDir::new(src).follow_links(true).sort_by_file_name() {
        let entry = entry.map_err(|source| BuildError::Walk {
            path: src.to_path_buf(),
            source,
        })?;
        let rel = entry.path().strip_prefix(src).unwrap_or(entry.path());
        let target = dest.join(rel);
        let write_err = |source| BuildError::Write {
            path: target.clone(),
            source,
        };

        if entry.file_type().is_dir() {
            fs::create_dir_all(&target).map_err(write_err)?;
        } else {
            fs::copy(entry.path(), &target).map_err(write_err)?;
            copied += 1;
        }
    }
    Ok(copied)
}
