//! CLI output formatting for the build pipeline.
//!
//! # Information-First Display
//!
//! Every entity (page, show, album, image) leads with its positional index and
//! its identity; where it came from or where it went is shown as indented
//! context. Image warnings go to stderr so `--json` output stays parseable.
//!
//! # Output Format
//!
//! ## Content (`check`)
//!
//! ```text
//! Pages
//! 001 About → about/index.html
//!     Description: Four people, one van, too many...
//! 002 Press → press/index.html (not in nav)
//!
//! Concerts (4 shows, 2 upcoming)
//! 001 2023-01-10 Rough Trade East, London
//!
//! Albums (2)
//! 001 Night Buses (2022)
//!
//! Images
//!     photos/raw: 2 images
//!     images: 1 image
//! ```
//!
//! ## Build report
//!
//! ```text
//! Pages
//! 001 index.html
//! 002 about/index.html
//!
//! Listings
//! 001 concerts/index.html (4 entries)
//!
//! Static: 1 file copied
//!
//! Images
//! 001 photos/raw/001-stage.jpg 3200x2400
//!     display: 1600x1200
//!     thumbnail: 400x300
//!
//! Built 2 pages, 1 listing, 1 image (0 failed) → dist
//! ```
//!
//! # Architecture
//!
//! Each view has a `format_*` function (returns `Vec<String>`) for testability
//! and a `print_*` wrapper that writes to stdout. Format functions do no I/O.

use crate::assemble::{BuildReport, SiteContent, Stage};
use crate::imaging::Dimensions;
use crate::process::ImageFailure;
use std::path::Path;

// ============================================================================
// Shared display helpers
// ============================================================================

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

/// Return indentation string: 4 spaces per depth level.
fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

/// `1 image`, `3 images`.
fn plural(count: usize, noun: &str) -> String {
    if count == 1 {
        format!("{count} {noun}")
    } else {
        format!("{count} {noun}s")
    }
}

/// Truncate text to `max` characters, appending `...` if truncated.
fn truncate_desc(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        text.to_string()
    } else {
        let head: String = text.chars().take(max).collect();
        format!("{}...", head.trim_end())
    }
}

/// Show `path` relative to `root` when it lives inside it.
fn display_path(path: &Path, root: &Path) -> String {
    path.strip_prefix(root)
        .unwrap_or(path)
        .display()
        .to_string()
}

fn dims(d: Dimensions) -> String {
    format!("{}x{}", d.width, d.height)
}

// ============================================================================
// Stage banners
// ============================================================================

/// One-line banner printed as a stage starts.
pub fn format_stage(stage: Stage, root: &Path, dest: &Path) -> String {
    match stage {
        Stage::Reset => format!("==> Resetting {}", dest.display()),
        Stage::Load => format!("==> Loading {}", root.display()),
        Stage::Render => "==> Rendering pages".to_string(),
        Stage::CopyStatic => "==> Copying static assets".to_string(),
        Stage::ProcessImages => "==> Processing images".to_string(),
    }
}

pub fn print_stage(stage: Stage, root: &Path, dest: &Path) {
    println!("{}", format_stage(stage, root, dest));
}

// ============================================================================
// Content summary
// ============================================================================

/// Inventory of everything loaded from a site.
pub fn format_content(site: &SiteContent, root: &Path) -> Vec<String> {
    let mut lines = Vec::new();

    lines.push("Pages".to_string());
    for (i, page) in site.pages.iter().enumerate() {
        let hidden = if page.nav { "" } else { " (not in nav)" };
        lines.push(format!(
            "{} {} → {}/index.html{}",
            format_index(i + 1),
            page.title,
            page.slug,
            hidden
        ));
        if let Some(desc) = &page.description {
            lines.push(format!("{}Description: {}", indent(1), truncate_desc(desc, 40)));
        }
    }

    if let Some(concerts) = &site.concerts {
        let upcoming = concerts.iter().filter(|c| c.upcoming).count();
        lines.push(String::new());
        lines.push(format!(
            "Concerts ({}, {} upcoming)",
            plural(concerts.len(), "show"),
            upcoming
        ));
        for (i, show) in concerts.iter().enumerate() {
            lines.push(format!(
                "{} {} {}, {}",
                format_index(i + 1),
                show.date,
                show.venue,
                show.city
            ));
        }
    }

    if let Some(albums) = &site.albums {
        lines.push(String::new());
        lines.push(format!("Albums ({})", albums.len()));
        for (i, album) in albums.iter().enumerate() {
            match album.year {
                Some(year) => {
                    lines.push(format!("{} {} ({})", format_index(i + 1), album.title, year))
                }
                None => lines.push(format!("{} {}", format_index(i + 1), album.title)),
            }
        }
    }

    lines.push(String::new());
    lines.push("Images".to_string());
    for discovery in [&site.gallery, &site.artwork] {
        if discovery.planned.is_empty() && discovery.rejected.is_empty() {
            continue;
        }
        lines.push(format!(
            "{}{}: {}",
            indent(1),
            display_path(&discovery.dir, root),
            plural(discovery.planned.len(), "image")
        ));
    }
    for failure in site.gallery.rejected.iter().chain(&site.artwork.rejected) {
        lines.push(format!("{}Skipped: {}", indent(1), failure.error));
    }

    lines
}

pub fn print_content(site: &SiteContent, root: &Path) {
    for line in format_content(site, root) {
        println!("{}", line);
    }
}

// ============================================================================
// Build report
// ============================================================================

/// Format a finished build: outputs, images and a one-line summary.
pub fn format_build_report(report: &BuildReport, root: &Path) -> Vec<String> {
    let mut lines = Vec::new();

    lines.push("Pages".to_string());
    for (i, output) in report.pages.iter().enumerate() {
        lines.push(format!("{} {}", format_index(i + 1), output));
    }

    if !report.listings.is_empty() {
        lines.push(String::new());
        lines.push("Listings".to_string());
        for (i, listing) in report.listings.iter().enumerate() {
            lines.push(format!(
                "{} {} ({})",
                format_index(i + 1),
                listing.output,
                if listing.entries == 1 {
                    "1 entry".to_string()
                } else {
                    format!("{} entries", listing.entries)
                }
            ));
        }
    }

    lines.push(String::new());
    lines.push(format!(
        "Static: {} copied",
        plural(report.static_files, "file")
    ));

    if !report.images.is_empty() {
        lines.push(String::new());
        lines.push("Images".to_string());
        for (i, image) in report.images.iter().enumerate() {
            lines.push(format!(
                "{} {} {}",
                format_index(i + 1),
                display_path(&image.source, root),
                dims(image.original)
            ));
            lines.push(format!("{}display: {}", indent(1), dims(image.display)));
            lines.push(format!("{}thumbnail: {}", indent(1), dims(image.thumbnail)));
        }
    }

    lines.push(String::new());
    lines.push(format!(
        "Built {}, {}, {} ({} failed) → {}",
        plural(report.pages.len(), "page"),
        plural(report.listings.len(), "listing"),
        plural(report.images.len(), "image"),
        report.image_failures.len(),
        report.destination.display()
    ));

    lines
}

pub fn print_build_report(report: &BuildReport, root: &Path) {
    for line in format_build_report(report, root) {
        println!("{}", line);
    }
}

/// One warning line per image that was skipped.
pub fn format_image_warnings(failures: &[ImageFailure]) -> Vec<String> {
    failures
        .iter()
        .map(|f| format!("warning: image skipped: {}", f.error))
        .collect()
}

pub fn print_image_warnings(failures: &[ImageFailure]) {
    for line in format_image_warnings(failures) {
        eprintln!("{}", line);
    }
}
