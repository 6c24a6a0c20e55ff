//! Filesystem layout of a site: where inputs live and where outputs go.
//!
//! ```text
//! site/                              dist/
//! ├── config.toml                    ├── index.html
//! ├── templates/*.html               ├── {slug}/index.html
//! ├── content/                       ├── concerts/index.html
//! │   ├── pages/*.md                 ├── albums/index.html
//! │   ├── concerts.yaml              ├── static/**
//! │   └── albums.yaml                ├── photos/{original,1600,thumb}/*
//! ├── static/**                      └── images/{original,1600,thumb}/*
//! ├── photos/raw/**
//! └── images/**
//! ```

use std::path::{Path, PathBuf};

/// A directory of source images and the URL prefix its derivatives get.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageSource {
    pub dir: PathBuf,
    /// Output subtree under the destination root, e.g. `photos`.
    pub url_prefix: String,
}

/// Input paths of a site rooted at one directory.
#[derive(Debug, Clone)]
pub struct SiteLayout {
    pub root: PathBuf,
    pub templates_dir: PathBuf,
    pub pages_dir: PathBuf,
    pub concerts_file: PathBuf,
    pub albums_file: PathBuf,
    pub static_dir: PathBuf,
    /// The photo gallery (`photos/raw` → `photos/`).
    pub gallery: ImageSource,
    /// Banners and artwork (`images` → `images/`).
    pub artwork: ImageSource,
}

impl SiteLayout {
    pub fn new(root: &Path) -> Self {
        let content = root.join("content");
        Self {
            root: root.to_path_buf(),
            templates_dir: root.join("templates"),
            pages_dir: content.join("pages"),
            concerts_file: content.join("concerts.yaml"),
            albums_file: content.join("albums.yaml"),
            static_dir: root.join("static"),
            gallery: ImageSource {
                dir: root.join("photos").join("raw"),
                url_prefix: "photos".to_string(),
            },
            artwork: ImageSource {
                dir: root.join("images"),
                url_prefix: "images".to_string(),
            },
        }
    }
}

/// Destination-relative output path of the homepage.
pub const HOME_OUTPUT: &str = "index.html";
/// Destination-relative output path of the concerts listing.
pub const CONCERTS_OUTPUT: &str = "concerts/index.html";
/// Destination-relative output path of the albums listing.
pub const ALBUMS_OUTPUT: &str = "albums/index.html";
/// Destination subdirectory receiving `static/`.
pub const STATIC_OUTPUT: &str = "static";

/// Destination-relative output path of a page.
pub fn page_output(slug: &str) -> String {
    format!("{slug}/index.html")
}

/// Relative prefix from an output file back to the destination root.
///
/// `index.html` → `.`, `about/index.html` → `..`
pub fn base_for(output: &str) -> String {
    let depth = output.matches('/').count();
    if depth == 0 {
        ".".to_string()
    } else {
        vec![".."; depth].join("/")
    }
}

/// Join a path relative to some root into a `/`-separated URL path.
pub fn to_url_path(path: &Path) -> String {
    path.components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn layout_paths() {
        let layout = SiteLayout::new(Path::new("/site"));
        assert_eq!(layout.templates_dir, Path::new("/site/templates"));
        assert_eq!(layout.pages_dir, Path::new("/site/content/pages"));
        assert_eq!(layout.concerts_file, Path::new("/site/content/concerts.yaml"));
        assert_eq!(layout.albums_file, Path::new("/site/content/albums.yaml"));
        assert_eq!(layout.gallery.dir, Path::new("/site/photos/raw"));
        assert_eq!(layout.gallery.url_prefix, "photos");
        assert_eq!(layout.artwork.dir, Path::new("/site/images"));
    }

    #[test]
    fn page_output_path() {
        assert_eq!(page_output("about"), "about/index.html");
    }

    #[test]
    fn base_prefix_by_depth() {
        assert_eq!(base_for(HOME_OUTPUT), ".");
        assert_eq!(base_for(CONCERTS_OUTPUT), "..");
        assert_eq!(base_for("a/b/index.html"), "../..");
    }

    #[test]
    fn url_path_uses_forward_slashes() {
        let path = Path::new("live").join("2024").join("01.jpg");
        assert_eq!(to_url_path(&path), "live/2024/01.jpg");
    }
}
