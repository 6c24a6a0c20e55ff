//! # Bandsite
//!
//! A static site builder for band websites. Markdown pages, a YAML list of
//! shows, a YAML discography and a folder of raw photos go in; a directory of
//! plain HTML and web-sized JPEGs comes out, ready to be copied to any file
//! server.
//!
//! # Architecture: One Linear Pipeline
//!
//! ```text
//! 1. Reset     dist/ → empty               (refuses the site root itself)
//! 2. Load      content/ + templates/       (all validation happens here)
//! 3. Render    contexts → HTML             (strict Tera templates)
//! 4. Static    static/** → dist/static/**  (verbatim)
//! 5. Images    photos/raw/**, images/**    (original + display + thumbnail)
//! ```
//!
//! Everything that can make a build fail fatally is checked in the Load stage,
//! so a broken page or template never leaves a half-written site behind.
//! Images are the exception: each image is an isolated unit, and a corrupt
//! photo is reported as a warning while the rest of the site is published.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`assemble`] | The pipeline: reset, load, render, copy static, process images, report |
//! | [`content`] | Markdown pages with front-matter, `concerts.yaml`, `albums.yaml` |
//! | [`render`] | Template loading and the per-template binding contexts |
//! | [`process`] | Image discovery, derivative naming and parallel processing |
//! | [`imaging`] | Pure-Rust image operations: identify, resize, JPEG encode |
//! | [`config`] | `config.toml` loading, validation and stock defaults |
//! | [`layout`] | Where inputs live and where outputs go |
//! | [`types`] | Content types handed to templates (`Page`, `ConcertEntry`, ...) |
//! | [`output`] | CLI output formatting of content summaries and build reports |
//!
//! # Design Decisions
//!
//! ## Strict Templates
//!
//! A template that names a variable its context does not provide is an error,
//! not an empty string. Typos in templates surface on the first build instead
//! of shipping as silently blank sections. Optional fields (a show without a
//! ticket link, an album without a cover) are always present in the context as
//! `null`, so templates guard them with `{% if %}`.
//!
//! ## Images Never Grow
//!
//! Display images and thumbnails are scaled so their long edge fits the
//! configured size (1600 and 400 by default). A source that already fits keeps
//! its pixel dimensions, and a small JPEG is published byte-for-byte.
//!
//! ## Reproducible Builds
//!
//! The build date is a parameter rather than a global clock read, content is
//! sorted deterministically, and image encoding is deterministic. Building the
//! same inputs twice produces byte-identical output.

pub mod assemble;
pub mod config;
pub mod content;
pub mod imaging;
pub mod layout;
pub mod output;
pub mod process;
pub mod render;
pub mod types;

#[cfg(test)]
pub(crate) mod test_helpers;
