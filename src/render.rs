//! Template rendering.
//!
//! Templates are [Tera](https://keats.github.io/tera/) files read once from
//! `templates/`. Every `*.html` file is loaded, so pages can `extends` a shared
//! layout, but only four names are rendered directly (see [`TemplateName`]).
//!
//! ## Undefined variables
//!
//! Rendering is strict: an expression that names a variable the context does
//! not provide fails with [`TemplateError::Render`] instead of printing an
//! empty string. Every context therefore carries the same site-wide keys:
//!
//! | Key | Value |
//! |---|---|
//! | `site` | `[site]` table from `config.toml` |
//! | `nav_pages` | `[{slug, title}]` for pages with `nav: true` |
//! | `current_year` | year of the build date |
//! | `base` | relative path back to the site root (`.` or `..`) |
//!
//! Output is HTML-escaped; emit pre-rendered Markdown with `{{ page.body | safe }}`.

use crate::config::{HomeConfig, SiteMeta};
use crate::layout::{
    ALBUMS_OUTPUT, CONCERTS_OUTPUT, HOME_OUTPUT, base_for, page_output, to_url_path,
};
use crate::types::{AlbumEntry, ConcertEntry, ImageAsset, NavLink, Page};
use std::fs;
use std::path::{Path, PathBuf};
use tera::{Context, Tera};
use thiserror::Error;
use walkdir::WalkDir;

#[derive(Error, Debug)]
pub enum TemplateError {
    #[error("template directory not found: {0}")]
    MissingDirectory(PathBuf),
    #[error("cannot read template {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("template parse error: {0}")]
    Parse(String),
    #[error("template `{name}` not found in {dir}")]
    Missing { name: String, dir: PathBuf },
    #[error("failed to render `{name}`: {message}")]
    Render { name: String, message: String },
}

/// The templates the site renders directly.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TemplateName {
    Home,
    Page,
    Concerts,
    Albums,
}

impl TemplateName {
    pub fn file_name(self) -> &'static str {
        match self {
            TemplateName::Home => "index.html",
            TemplateName::Page => "page.html",
            TemplateName::Concerts => "concerts.html",
            TemplateName::Albums => "albums.html",
        }
    }
}

/// Loaded template set.
#[derive(Debug)]
pub struct Renderer {
    tera: Tera,
    dir: PathBuf,
}

impl Renderer {
    /// Read and parse every `*.html` template under `dir`.
    pub fn load(dir: &Path) -> Result<Self, TemplateError> {
        if !dir.is_dir() {
            return Err(TemplateError::MissingDirectory(dir.to_path_buf()));
        }

        let mut sources = Vec::new();
        for entry in WalkDir::new(dir).sort_by_file_name() {
            let entry = entry.map_err(|e| TemplateError::Read {
                path: e.path().unwrap_or(dir).to_path_buf(),
                source: e.into(),
            })?;
            let path = entry.path();
            let is_template = entry.file_type().is_file()
                && !entry.file_name().to_string_lossy().starts_with('.')
                && path
                    .extension()
                    .is_some_and(|e| e.eq_ignore_ascii_case("html"));
            if !is_template {
                continue;
            }

            let name = to_url_path(path.strip_prefix(dir).unwrap_or(path));
            let content = fs::read_to_string(path).map_err(|source| TemplateError::Read {
                path: path.to_path_buf(),
                source,
            })?;
            sources.push((name, content));
        }

        let mut tera = Tera::default();
        tera.add_raw_templates(sources)
            .map_err(|e| TemplateError::Parse(error_chain(&e)))?;

        Ok(Self {
            tera,
            dir: dir.to_path_buf(),
        })
    }

    fn has(&self, name: &str) -> bool {
        self.tera.get_template_names().any(|n| n == name)
    }

    /// Fail early if any of `templates` is not loaded.
    pub fn require(&self, templates: &[TemplateName]) -> Result<(), TemplateError> {
        match templates.iter().find(|t| !self.has(t.file_name())) {
            Some(missing) => Err(self.missing(*missing)),
            None => Ok(()),
        }
    }

    fn missing(&self, template: TemplateName) -> TemplateError {
        TemplateError::Missing {
            name: template.file_name().to_string(),
            dir: self.dir.clone(),
        }
    }

    /// Render `template` with `context`.
    ///
    /// Pure: the same template and context always produce the same string.
    pub fn render(
        &self,
        template: TemplateName,
        context: &Context,
    ) -> Result<String, TemplateError> {
        let name = template.file_name();
        if !self.has(name) {
            return Err(self.missing(template));
        }
        self.tera
            .render(name, context)
            .map_err(|e| TemplateError::Render {
                name: name.to_string(),
                message: error_chain(&e),
            })
    }
}

/// Tera reports the useful part (which variable, which line) in the source
/// chain, not the top-level message.
fn error_chain(err: &dyn std::error::Error) -> String {
    let mut parts = vec![err.to_string()];
    let mut source = err.source();
    while let Some(inner) = source {
        parts.push(inner.to_string());
        source = inner.source();
    }
    parts.join(": ")
}

// ============================================================================
// Binding contexts
// ============================================================================

/// Data bound into every template.
#[derive(Debug, Clone)]
pub struct SiteData<'a> {
    pub site: &'a SiteMeta,
    pub nav_pages: Vec<NavLink>,
    pub current_year: i32,
}

impl<'a> SiteData<'a> {
    pub fn new(site: &'a SiteMeta, pages: &[Page], current_year: i32) -> Self {
        Self {
            site,
            nav_pages: pages.iter().filter(|p| p.nav).map(NavLink::from).collect(),
            current_year,
        }
    }

    /// Fresh context holding the site-wide keys for a file written at `output`.
    fn context_for(&self, output: &str) -> Context {
        let mut ctx = Context::new();
        ctx.insert("site", self.site);
        ctx.insert("nav_pages", &self.nav_pages);
        ctx.insert("current_year", &self.current_year);
        ctx.insert("base", &base_for(output));
        ctx
    }
}

fn upcoming(concerts: &[ConcertEntry]) -> impl Iterator<Item = &ConcertEntry> {
    concerts.iter().filter(|c| c.upcoming)
}

/// Context for `index.html`.
pub fn home_context(
    site: &SiteData,
    pages: &[Page],
    concerts: &[ConcertEntry],
    albums: &[AlbumEntry],
    photos: &[ImageAsset],
    home: &HomeConfig,
) -> Context {
    let mut ctx = site.context_for(HOME_OUTPUT);
    let next_shows: Vec<&ConcertEntry> = upcoming(concerts).take(home.concert_limit).collect();
    let photos = &photos[..photos.len().min(home.photo_limit)];
    ctx.insert("pages", pages);
    ctx.insert("upcoming_concerts", &next_shows);
    ctx.insert("albums", albums);
    ctx.insert("photos", photos);
    ctx
}

/// Context for `page.html`.
pub fn page_context(site: &SiteData, page: &Page) -> Context {
    let mut ctx = site.context_for(&page_output(&page.slug));
    ctx.insert("page", page);
    ctx
}

/// Context for `concerts.html`. All three lists are in ascending date order.
pub fn concerts_context(site: &SiteData, concerts: &[ConcertEntry]) -> Context {
    let mut ctx = site.context_for(CONCERTS_OUTPUT);
    let next_shows: Vec<&ConcertEntry> = upcoming(concerts).collect();
    let past_shows: Vec<&ConcertEntry> = concerts.iter().filter(|c| !c.upcoming).collect();
    ctx.insert("concerts", concerts);
    ctx.insert("upcoming_concerts", &next_shows);
    ctx.insert("past_concerts", &past_shows);
    ctx
}

/// Context for `albums.html`.
pub fn albums_context(site: &SiteData, albums: &[AlbumEntry]) -> Context {
    let mut ctx = site.context_for(ALBUMS_OUTPUT);
    ctx.insert("albums", albums);
    ctx
}
