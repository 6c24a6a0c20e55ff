//! Shared content types.
//!
//! These are produced by the content loader and the image discovery step, and
//! serialized into template contexts by the renderer. Field names are the
//! names templates see.

use chrono::NaiveDate;
use serde::Serialize;
use std::path::PathBuf;

/// A page generated from a markdown file in `content/pages/`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Page {
    /// Filename stem, lower-cased. Also the output directory name.
    pub slug: String,
    /// From the required `title` front-matter key.
    pub title: String,
    /// Optional `description` front-matter key.
    pub description: Option<String>,
    /// Whether the page is listed in `nav_pages` (front-matter `nav`, default true).
    pub nav: bool,
    /// Markdown body rendered to HTML.
    pub body: String,
}

/// Navigation entry handed to every template as part of `nav_pages`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NavLink {
    pub slug: String,
    pub title: String,
}

impl From<&Page> for NavLink {
    fn from(page: &Page) -> Self {
        Self {
            slug: page.slug.clone(),
            title: page.title.clone(),
        }
    }
}

/// One show from `content/concerts.yaml`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConcertEntry {
    /// Serialized as `YYYY-MM-DD`.
    pub date: NaiveDate,
    /// Human readable date, e.g. `07 Mar 2026`.
    pub date_display: String,
    pub venue: String,
    pub city: String,
    pub country: Option<String>,
    /// Ticket link (`tickets`, or `url` when `tickets` is absent).
    pub tickets: Option<String>,
    pub notes: Option<String>,
    /// True when the show is on or after the build date.
    pub upcoming: bool,
}

/// One release from `content/albums.yaml`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AlbumEntry {
    pub title: String,
    /// Explicit `year`, or the leading four digits of `date`.
    pub year: Option<i32>,
    pub date: Option<String>,
    pub cover: Option<String>,
    pub description: Option<String>,
    pub tracks: Vec<String>,
    pub links: Vec<AlbumLink>,
}

/// A labelled external link on an album (streaming, store, ...).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AlbumLink {
    pub label: String,
    pub url: String,
}

/// A source image and the site-relative URLs of its three derivatives.
///
/// URLs always use `/` separators and are relative to the destination root.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ImageAsset {
    /// Path relative to the source directory, e.g. `live/001.jpg`.
    pub name: String,
    #[serde(skip)]
    pub source: PathBuf,
    pub original: String,
    pub display: String,
    pub thumbnail: String,
}
