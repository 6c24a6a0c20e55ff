//! Shared test utilities for the bandsite test suite.
//!
//! # Usage
//!
//! ```rust
//! use crate::test_helpers::*;
//!
//! let (_tmp, site) = setup_site();
//! let layout = SiteLayout::new(&site);
//! let pages = load_pages(&layout.pages_dir).unwrap();
//! assert_eq!(page_slugs(&pages), vec!["about", "contact", "press"]);
//! ```

use chrono::NaiveDate;
use image::{ImageEncoder, Rgb, RgbImage, Rgba, RgbaImage};
use std::path::{Path, PathBuf};
use tempfile::TempDir;

use crate::types::Page;

// =========================================================================
// Fixture setup
// =========================================================================

/// Build date used by fixture tests. Concerts after it are upcoming.
pub fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 3, 15).unwrap()
}

/// Copy `fixtures/site/` to a temp directory and add its source images.
///
/// Returns the temp dir guard and the site root inside it, so tests can put
/// the destination next to the site. Images are generated rather than checked
/// in:
///
/// ```text
/// photos/raw/001-stage.jpg   64x48
/// photos/raw/002-crowd.jpg   32x48
/// images/banner.png          80x20
/// ```
pub fn setup_site() -> (TempDir, PathBuf) {
    let tmp = TempDir::new().unwrap();
    let site = tmp.path().join("site");
    let fixtures = Path::new(env!("CARGO_MANIFEST_DIR")).join("fixtures/site");
    copy_dir_recursive(&fixtures, &site).unwrap();

    let raw = site.join("photos/raw");
    std::fs::create_dir_all(&raw).unwrap();
    write_test_jpeg(&raw.join("001-stage.jpg"), 64, 48);
    write_test_jpeg(&raw.join("002-crowd.jpg"), 32, 48);

    let images = site.join("images");
    std::fs::create_dir_all(&images).unwrap();
    write_test_png(&images.join("banner.png"), 80, 20);

    (tmp, site)
}

fn copy_dir_recursive(src: &Path, dst: &Path) -> std::io::Result<()> {
    std::fs::create_dir_all(dst)?;
    for entry in std::fs::read_dir(src)? {
        let entry = entry?;
        let src_path = entry.path();
        let dst_path = dst.join(entry.file_name());

        if src_path.is_dir() {
            copy_dir_recursive(&src_path, &dst_path)?;
        } else {
            std::fs::copy(&src_path, &dst_path)?;
        }
    }
    Ok(())
}

// =========================================================================
// Synthetic images
// =========================================================================

/// Write a valid baseline JPEG with a gradient pattern.
pub fn write_test_jpeg(path: &Path, width: u32, height: u32) {
    let img = RgbImage::from_fn(width, height, |x, y| {
        Rgb([(x % 256) as u8, (y % 256) as u8, 128])
    });
    let file = std::fs::File::create(path).unwrap();
    let writer = std::io::BufWriter::new(file);
    image::codecs::jpeg::JpegEncoder::new(writer)
        .write_image(img.as_raw(), width, height, image::ExtendedColorType::Rgb8)
        .unwrap();
}

/// Write a valid RGBA PNG with a half-transparent pattern.
pub fn write_test_png(path: &Path, width: u32, height: u32) {
    let img = RgbaImage::from_fn(width, height, |x, y| {
        Rgba([(x % 256) as u8, 64, (y % 256) as u8, if x < width / 2 { 255 } else { 128 }])
    });
    img.save_with_format(path, image::ImageFormat::Png).unwrap();
}

// =========================================================================
// Extractors
// =========================================================================

/// All page slugs in load order.
pub fn page_slugs(pages: &[Page]) -> Vec<&str> {
    pages.iter().map(|p| p.slug.as_str()).collect()
}
