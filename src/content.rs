//! Content loading: Markdown pages and YAML lists.
//!
//! ## Pages
//!
//! Every `*.md` file in `content/pages/` becomes a [`Page`]. A page opens with
//! a YAML front-matter block delimited by `---` lines:
//!
//! ```text
//! ---
//! title: About us          # required
//! description: Who we are  # optional
//! nav: false               # optional, default true
//! ---
//! Four people, one van.
//! ```
//!
//! The slug is the filename stem lower-cased (`About.md` → `about`) and is
//! used verbatim as the output directory. Two files with the same slug, or a
//! slug that names a generated section (`concerts`, `albums`, ...), are errors.
//!
//! ## Lists
//!
//! `concerts.yaml` and `albums.yaml` are top-level YAML sequences of
//! mappings. Concerts are always sorted by date (stable, ascending). Albums
//! keep file order unless `[albums] sort_by` is configured.
//!
//! Everything here is read-only: nothing is written to disk.

use crate::config::{AlbumSort, AlbumsConfig};
use crate::types::{AlbumEntry, AlbumLink, ConcertEntry, Page};
use chrono::NaiveDate;
use pulldown_cmark::{Options, Parser, html as md_html};
use serde::de::Error as _;
use serde::{Deserialize, Deserializer};
use serde_yaml::Value;
use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Top-level output directories owned by the build; pages cannot use them.
pub const RESERVED_SLUGS: &[&str] = &["concerts", "albums", "static", "photos", "images"];

#[derive(Error, Debug)]
pub enum ContentError {
    #[error("cannot read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("{0}: missing front-matter block (expected a leading `---` section)")]
    MissingFrontMatter(PathBuf),
    #[error("{path}: invalid front-matter: {message}")]
    FrontMatter { path: PathBuf, message: String },
    #[error("{0}: front-matter is missing required field `title`")]
    MissingTitle(PathBuf),
    #[error("{0}: cannot derive a slug from the filename")]
    EmptySlug(PathBuf),
    #[error("{path}: slug `{slug}` is already used by {other}")]
    SlugCollision {
        slug: String,
        path: PathBuf,
        other: PathBuf,
    },
    #[error("{path}: slug `{slug}` is reserved for a generated section")]
    ReservedSlug { slug: String, path: PathBuf },
    #[error("{path}: invalid YAML: {source}")]
    Yaml {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },
    #[error("{0}: top-level structure must be a sequence")]
    NotASequence(PathBuf),
    #[error("{path}: entry {position}: {message}")]
    Entry {
        path: PathBuf,
        position: usize,
        message: String,
    },
}

// ============================================================================
// Markdown and front-matter
// ============================================================================

/// Render Markdown to HTML. Pure: the same text always yields the same HTML.
pub fn markdown_to_html(markdown: &str) -> String {
    let mut options = Options::empty();
    options.insert(Options::ENABLE_TABLES);
    options.insert(Options::ENABLE_FOOTNOTES);
    options.insert(Options::ENABLE_STRIKETHROUGH);

    let parser = Parser::new_ext(markdown, options);
    let mut html = String::with_capacity(markdown.len() * 3 / 2);
    md_html::push_html(&mut html, parser);
    html
}

/// Split a document into `(front_matter, body)`.
///
/// The document must open with a `---` line and the block ends at the next
/// `---` line. Returns `None` if there is no complete block.
pub fn split_front_matter(text: &str) -> Option<(&str, &str)> {
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);
    let mut lines = text.split_inclusive('\n');
    let first = lines.next()?;
    if first.trim_end() != "---" {
        return None;
    }

    let start = first.len();
    let mut offset = start;
    for line in lines {
        if line.trim_end() == "---" {
            return Some((&text[start..offset], &text[offset + line.len()..]));
        }
        offset += line.len();
    }
    None
}

/// Recognized front-matter keys. Anything else is ignored.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct FrontMatter {
    title: Option<String>,
    description: Option<String>,
    nav: Option<bool>,
}

/// Parse one page file. `slug` is computed by the caller.
fn parse_page(path: &Path, slug: String, text: &str) -> Result<Page, ContentError> {
    let Some((yaml, body)) = split_front_matter(text) else {
        if text.trim_start_matches('\u{feff}').starts_with("---") {
            return Err(ContentError::FrontMatter {
                path: path.to_path_buf(),
                message: "unterminated block (no closing `---` line)".into(),
            });
        }
        return Err(ContentError::MissingFrontMatter(path.to_path_buf()));
    };

    let front: FrontMatter = if yaml.trim().is_empty() {
        FrontMatter::default()
    } else {
        serde_yaml::from_str(yaml).map_err(|e| ContentError::FrontMatter {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?
    };

    let title = front
        .title
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty())
        .ok_or_else(|| ContentError::MissingTitle(path.to_path_buf()))?;

    Ok(Page {
        slug,
        title,
        description: front.description,
        nav: front.nav.unwrap_or(true),
        body: markdown_to_html(body),
    })
}

// ============================================================================
// Pages
// ============================================================================

/// Slug for a page file: the filename stem, lower-cased.
pub fn slug_for(path: &Path) -> Option<String> {
    let stem = path.file_stem()?.to_string_lossy().trim().to_lowercase();
    (!stem.is_empty()).then_some(stem)
}

fn is_markdown(path: &Path) -> bool {
    path.is_file()
        && path
            .extension()
            .is_some_and(|e| e.eq_ignore_ascii_case("md"))
}

fn is_hidden(path: &Path) -> bool {
    path.file_name()
        .is_some_and(|n| n.to_string_lossy().starts_with('.'))
}

/// Load every Markdown page in `pages_dir`, in filename order.
///
/// A missing directory yields no pages.
pub fn load_pages(pages_dir: &Path) -> Result<Vec<Page>, ContentError> {
    if !pages_dir.is_dir() {
        return Ok(Vec::new());
    }

    let read_err = |source| ContentError::Read {
        path: pages_dir.to_path_buf(),
        source,
    };
    let mut md_files: Vec<PathBuf> = fs::read_dir(pages_dir)
        .map_err(read_err)?
        .filter_map(|e| e.ok())
        .map(|e| e.path())
        .filter(|p| is_markdown(p) && !is_hidden(p))
        .collect();
    md_files.sort();

    let mut seen: BTreeMap<String, PathBuf> = BTreeMap::new();
    let mut pages = Vec::with_capacity(md_files.len());

    for path in md_files {
        let slug = slug_for(&path).ok_or_else(|| ContentError::EmptySlug(path.clone()))?;
        if RESERVED_SLUGS.contains(&slug.as_str()) {
            return Err(ContentError::ReservedSlug { slug, path });
        }
        if let Some(other) = seen.get(&slug) {
            return Err(ContentError::SlugCollision {
                slug,
                path,
                other: other.clone(),
            });
        }

        let text = fs::read_to_string(&path).map_err(|source| ContentError::Read {
            path: path.clone(),
            source,
        })?;
        let page = parse_page(&path, slug.clone(), &text)?;
        seen.insert(slug, path);
        pages.push(page);
    }

    Ok(pages)
}

// ============================================================================
// YAML lists
// ============================================================================

/// Read a YAML file whose top level must be a sequence.
///
/// An empty document is an empty sequence.
fn read_sequence(path: &Path) -> Result<Vec<Value>, ContentError> {
    let text = fs::read_to_string(path).map_err(|source| ContentError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    if text.trim().is_empty() {
        return Ok(Vec::new());
    }

    let value: Value = serde_yaml::from_str(&text).map_err(|source| ContentError::Yaml {
        path: path.to_path_buf(),
        source,
    })?;
    match value {
        Value::Sequence(items) => Ok(items),
        Value::Null => Ok(Vec::new()),
        _ => Err(ContentError::NotASequence(path.to_path_buf())),
    }
}

/// Render a YAML scalar as a string (`2024-05-01`, `2021`, `"x"`, `true`).
fn scalar_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.trim().to_string()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// Free text field: any scalar is accepted, so a venue called `229` or a
/// track called `1979` stays text.
fn optional_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => Ok(None),
        Some(value) => scalar_to_string(&value)
            .map(Some)
            .ok_or_else(|| D::Error::custom("expected text, found a list or mapping")),
    }
}

/// A list of free text items, see [`optional_text`].
fn text_list<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<Vec<Value>>::deserialize(deserializer)?
        .unwrap_or_default()
        .into_iter()
        .map(|item| {
            scalar_to_string(&item)
                .ok_or_else(|| D::Error::custom("expected text items, found a list or mapping"))
        })
        .collect()
}

/// Parse a `YYYY-MM-DD` date. Only the first ten characters are considered,
/// so `2024-05-01T20:00` and `2024-05-01 doors 19h` are accepted.
///
/// The prefix must be exactly `dddd-dd-dd`: chrono alone would read `24-5-1`
/// as the year 24.
pub fn parse_date(text: &str) -> Option<NaiveDate> {
    let head = text.trim().get(..10)?;
    let well_formed = head.bytes().enumerate().all(|(i, b)| match i {
        4 | 7 => b == b'-',
        _ => b.is_ascii_digit(),
    });
    if !well_formed {
        return None;
    }
    NaiveDate::parse_from_str(head, "%Y-%m-%d").ok()
}

/// Format a date for display: `07 Mar 2026`.
pub fn format_date_display(date: NaiveDate) -> String {
    date.format("%d %b %Y").to_string()
}

#[derive(Debug, Deserialize)]
struct RawConcert {
    #[serde(default)]
    date: Option<Value>,
    #[serde(default, deserialize_with = "optional_text")]
    venue: Option<String>,
    #[serde(default, deserialize_with = "optional_text")]
    city: Option<String>,
    #[serde(default, deserialize_with = "optional_text")]
    country: Option<String>,
    #[serde(default, deserialize_with = "optional_text")]
    tickets: Option<String>,
    #[serde(default, deserialize_with = "optional_text")]
    url: Option<String>,
    #[serde(default, deserialize_with = "optional_text")]
    notes: Option<String>,
}

/// Load `concerts.yaml`, sorted ascending by date.
///
/// Equal dates keep their file order. `today` decides the `upcoming` flag.
pub fn load_concerts(path: &Path, today: NaiveDate) -> Result<Vec<ConcertEntry>, ContentError> {
    let items = read_sequence(path)?;
    let mut concerts = Vec::with_capacity(items.len());

    for (i, item) in items.into_iter().enumerate() {
        let entry_err = |message: String| ContentError::Entry {
            path: path.to_path_buf(),
            position: i + 1,
            message,
        };
        let raw: RawConcert = serde_yaml::from_value(item).map_err(|e| entry_err(e.to_string()))?;

        let date_text = raw.date.as_ref().and_then(scalar_to_string);
        let date = match date_text.as_deref() {
            None => return Err(entry_err("missing `date`".into())),
            Some(text) => parse_date(text)
                .ok_or_else(|| entry_err(format!("`date` {text:?} is not a YYYY-MM-DD date")))?,
        };

        concerts.push(ConcertEntry {
            date,
            date_display: format_date_display(date),
            venue: raw.venue.unwrap_or_default(),
            city: raw.city.unwrap_or_default(),
            country: raw.country,
            tickets: raw.tickets.or(raw.url),
            notes: raw.notes,
            upcoming: date >= today,
        });
    }

    concerts.sort_by_key(|c| c.date);
    Ok(concerts)
}

#[derive(Debug, Deserialize)]
struct RawAlbum {
    #[serde(default, deserialize_with = "optional_text")]
    title: Option<String>,
    #[serde(default)]
    year: Option<Value>,
    #[serde(default)]
    date: Option<Value>,
    #[serde(default, deserialize_with = "optional_text")]
    cover: Option<String>,
    #[serde(default, deserialize_with = "optional_text")]
    description: Option<String>,
    #[serde(default, deserialize_with = "text_list")]
    tracks: Vec<String>,
    #[serde(default)]
    links: Vec<RawLink>,
}

#[derive(Debug, Deserialize)]
struct RawLink {
    #[serde(default, deserialize_with = "optional_text")]
    label: Option<String>,
    #[serde(default, deserialize_with = "optional_text")]
    url: Option<String>,
}

/// Load `albums.yaml`. File order unless `config.sort_by` is set.
pub fn load_albums(path: &Path, config: &AlbumsConfig) -> Result<Vec<AlbumEntry>, ContentError> {
    let items = read_sequence(path)?;
    let mut albums = Vec::with_capacity(items.len());

    for (i, item) in items.into_iter().enumerate() {
        let entry_err = |message: String| ContentError::Entry {
            path: path.to_path_buf(),
            position: i + 1,
            message,
        };
        let raw: RawAlbum = serde_yaml::from_value(item).map_err(|e| entry_err(e.to_string()))?;

        let title = raw
            .title
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty())
            .ok_or_else(|| entry_err("missing `title`".into()))?;
        let date = raw.date.as_ref().and_then(scalar_to_string);
        let year = match raw.year.as_ref().and_then(scalar_to_string) {
            Some(text) => Some(
                text.parse::<i32>()
                    .map_err(|_| entry_err(format!("`year` {text:?} is not a number")))?,
            ),
            None => date
                .as_deref()
                .and_then(|d| d.get(..4))
                .and_then(|y| y.parse().ok()),
        };

        let links = raw
            .links
            .into_iter()
            .map(|link| match link.url {
                Some(url) => Ok(AlbumLink {
                    label: link.label.unwrap_or_else(|| url.clone()),
                    url,
                }),
                None => Err(entry_err("link without `url`".into())),
            })
            .collect::<Result<Vec<_>, _>>()?;

        albums.push(AlbumEntry {
            title,
            year,
            date,
            cover: raw.cover,
            description: raw.description,
            tracks: raw.tracks,
            links,
        });
    }

    sort_albums(&mut albums, config);
    Ok(albums)
}

/// Stable sort on the configured field. Entries without the field go last.
fn sort_albums(albums: &mut [AlbumEntry], config: &AlbumsConfig) {
    let Some(field) = config.sort_by else {
        return;
    };
    let descending = config.newest_first;
    albums.sort_by(|a, b| match field {
        AlbumSort::Date => order_present_first(a.date.as_deref(), b.date.as_deref(), descending),
        AlbumSort::Year => order_present_first(a.year, b.year, descending),
        AlbumSort::Title => order_present_first(
            Some(a.title.to_lowercase()),
            Some(b.title.to_lowercase()),
            descending,
        ),
    });
}

fn order_present_first<T: Ord>(a: Option<T>, b: Option<T>, descending: bool) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) if descending => b.cmp(&a),
        (Some(a), Some(b)) => a.cmp(&b),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()
    }

    fn write(dir: &Path, name: &str, content: &str) -> PathBuf {
        let path = dir.join(name);
        fs::write(&path, content).unwrap();
        path
    }

    // =========================================================================
    // Markdown / front-matter
    // =========================================================================

    #[test]
    fn markdown_is_rendered() {
        let html = markdown_to_html("# Hello\n\nSome *text*.");
        assert!(html.contains("<h1>Hello</h1>"));
        assert!(html.contains("<em>text</em>"));
    }

    #[test]
    fn markdown_is_deterministic() {
        let text = "| a | b |\n|---|---|\n| 1 | 2 |\n\n~~old~~ news";
        assert_eq!(markdown_to_html(text), markdown_to_html(text));
        assert!(markdown_to_html(text).contains("<table>"));
    }

    #[test]
    fn split_front_matter_basic() {
        let (yaml, body) = split_front_matter("---\ntitle: Hi\n---\nBody\n").unwrap();
        assert_eq!(yaml, "title: Hi\n");
        assert_eq!(body, "Body\n");
    }

    #[test]
    fn split_front_matter_crlf_and_eof() {
        let (yaml, body) = split_front_matter("---\r\ntitle: Hi\r\n---").unwrap();
        assert_eq!(yaml, "title: Hi\r\n");
        assert_eq!(body, "");
    }

    #[test]
    fn split_front_matter_requires_leading_fence() {
        assert!(split_front_matter("title: Hi\n---\nBody").is_none());
        assert!(split_front_matter("---\ntitle: Hi\nBody").is_none());
    }

    #[test]
    fn horizontal_rule_in_body_is_not_a_fence() {
        let (yaml, body) = split_front_matter("---\ntitle: A\n---\nOne\n\n---\n\nTwo\n").unwrap();
        assert_eq!(yaml, "title: A\n");
        assert!(body.contains("---"));
    }

    // =========================================================================
    // load_pages
    // =========================================================================

    #[test]
    fn load_pages_parses_front_matter_and_body() {
        let tmp = TempDir::new().unwrap();
        write(
            tmp.path(),
            "About.md",
            "---\ntitle: About us\ndescription: Who we are\nextra: ignored\n---\nWe play **loud**.\n",
        );
        write(tmp.path(), "contact.md", "---\ntitle: Contact\nnav: false\n---\nMail us.\n");
        write(tmp.path(), "notes.txt", "not a page");

        let pages = load_pages(tmp.path()).unwrap();
        assert_eq!(pages.len(), 2);

        assert_eq!(pages[0].slug, "about");
        assert_eq!(pages[0].title, "About us");
        assert_eq!(pages[0].description.as_deref(), Some("Who we are"));
        assert!(pages[0].nav);
        assert!(pages[0].body.contains("<strong>loud</strong>"));

        assert_eq!(pages[1].slug, "contact");
        assert!(!pages[1].nav);
    }

    #[test]
    fn load_pages_missing_dir_is_empty() {
        let tmp = TempDir::new().unwrap();
        let pages = load_pages(&tmp.path().join("nope")).unwrap();
        assert!(pages.is_empty());
    }

    #[test]
    fn load_pages_missing_title_is_error() {
        let tmp = TempDir::new().unwrap();
        write(tmp.path(), "about.md", "---\ndescription: no title\n---\nBody\n");

        let result = load_pages(tmp.path());
        assert!(matches!(result, Err(ContentError::MissingTitle(p)) if p.ends_with("about.md")));
    }

    #[test]
    fn load_pages_blank_title_is_error() {
        let tmp = TempDir::new().unwrap();
        write(tmp.path(), "about.md", "---\ntitle: \"  \"\n---\nBody\n");
        assert!(matches!(load_pages(tmp.path()), Err(ContentError::MissingTitle(_))));
    }

    #[test]
    fn load_pages_without_front_matter_is_error() {
        let tmp = TempDir::new().unwrap();
        write(tmp.path(), "about.md", "# About\n\nNo metadata here.\n");
        assert!(matches!(
            load_pages(tmp.path()),
            Err(ContentError::MissingFrontMatter(_))
        ));
    }

    #[test]
    fn load_pages_unterminated_front_matter_is_error() {
        let tmp = TempDir::new().unwrap();
        write(tmp.path(), "about.md", "---\ntitle: About\n\nBody\n");
        assert!(matches!(
            load_pages(tmp.path()),
            Err(ContentError::FrontMatter { .. })
        ));
    }

    #[test]
    fn load_pages_malformed_yaml_is_error() {
        let tmp = TempDir::new().unwrap();
        write(tmp.path(), "about.md", "---\ntitle: [unclosed\n---\nBody\n");
        assert!(matches!(
            load_pages(tmp.path()),
            Err(ContentError::FrontMatter { .. })
        ));
    }

    #[test]
    fn load_pages_slug_collision_is_error() {
        let tmp = TempDir::new().unwrap();
        write(tmp.path(), "About.md", "---\ntitle: A\n---\n");
        write(tmp.path(), "about.MD", "---\ntitle: B\n---\n");

        let result = load_pages(tmp.path());
        assert!(matches!(
            result,
            Err(ContentError::SlugCollision { ref slug, .. }) if slug == "about"
        ));
    }

    #[test]
    fn load_pages_reserved_slug_is_error() {
        let tmp = TempDir::new().unwrap();
        write(tmp.path(), "Concerts.md", "---\ntitle: Shows\n---\n");
        assert!(matches!(
            load_pages(tmp.path()),
            Err(ContentError::ReservedSlug { .. })
        ));
    }

    // =========================================================================
    // load_concerts
    // =========================================================================

    #[test]
    fn concerts_sorted_ascending_and_stable() {
        let tmp = TempDir::new().unwrap();
        let path = write(
            tmp.path(),
            "concerts.yaml",
            r#"
- date: 2024-05-01
  venue: Late
- date: 2023-01-10
  venue: First
- date: 2023-01-10
  venue: Second
"#,
        );

        let concerts = load_concerts(&path, today()).unwrap();
        let order: Vec<(String, &str)> = concerts
            .iter()
            .map(|c| (c.date.to_string(), c.venue.as_str()))
            .collect();
        assert_eq!(
            order,
            vec![
                ("2023-01-10".to_string(), "First"),
                ("2023-01-10".to_string(), "Second"),
                ("2024-05-01".to_string(), "Late"),
            ]
        );
    }

    #[test]
    fn concerts_derive_display_fields() {
        let tmp = TempDir::new().unwrap();
        let path = write(
            tmp.path(),
            "concerts.yaml",
            "- date: \"2026-03-07T20:00\"\n  city: Lyon\n  url: https://tickets.example/1\n- date: 2023-06-01\n",
        );

        let concerts = load_concerts(&path, today()).unwrap();
        assert_eq!(concerts[0].date_display, "01 Jun 2023");
        assert!(!concerts[0].upcoming);
        assert_eq!(concerts[0].venue, "");

        assert_eq!(concerts[1].date_display, "07 Mar 2026");
        assert!(concerts[1].upcoming);
        assert_eq!(concerts[1].city, "Lyon");
        assert_eq!(concerts[1].tickets.as_deref(), Some("https://tickets.example/1"));
    }

    #[test]
    fn concerts_tickets_wins_over_url() {
        let tmp = TempDir::new().unwrap();
        let path = write(
            tmp.path(),
            "concerts.yaml",
            "- date: 2024-02-02\n  tickets: https://a\n  url: https://b\n",
        );
        let concerts = load_concerts(&path, today()).unwrap();
        assert_eq!(concerts[0].tickets.as_deref(), Some("https://a"));
    }

    #[test]
    fn concerts_missing_date_is_error() {
        let tmp = TempDir::new().unwrap();
        let path = write(
            tmp.path(),
            "concerts.yaml",
            "- date: 2024-02-02\n- venue: Nowhere\n",
        );
        let result = load_concerts(&path, today());
        assert!(matches!(result, Err(ContentError::Entry { position: 2, .. })));
    }

    #[test]
    fn concerts_unparseable_date_is_error() {
        let tmp = TempDir::new().unwrap();
        let path = write(tmp.path(), "concerts.yaml", "- date: next friday\n");
        assert!(matches!(
            load_concerts(&path, today()),
            Err(ContentError::Entry { position: 1, .. })
        ));
    }

    #[test]
    fn concerts_top_level_mapping_is_error() {
        let tmp = TempDir::new().unwrap();
        let path = write(
            tmp.path(),
            "concerts.yaml",
            "concerts:\n  - date: 2024-02-02\n",
        );
        assert!(matches!(
            load_concerts(&path, today()),
            Err(ContentError::NotASequence(_))
        ));
    }

    #[test]
    fn concerts_malformed_yaml_is_error() {
        let tmp = TempDir::new().unwrap();
        let path = write(tmp.path(), "concerts.yaml", "- date: [2024\n");
        assert!(matches!(
            load_concerts(&path, today()),
            Err(ContentError::Yaml { .. })
        ));
    }

    #[test]
    fn concerts_empty_file_is_empty_list() {
        let tmp = TempDir::new().unwrap();
        let path = write(tmp.path(), "concerts.yaml", "\n# nothing booked yet\n");
        assert!(load_concerts(&path, today()).unwrap().is_empty());
    }

    #[test]
    fn parse_date_accepts_prefix() {
        assert_eq!(
            parse_date("2024-05-01 doors 19h"),
            NaiveDate::from_ymd_opt(2024, 5, 1)
        );
        assert_eq!(parse_date("2024-13-01"), None);
        assert_eq!(parse_date("24-5-1"), None);
    }

    #[test]
    fn parse_date_requires_padded_fields() {
        assert_eq!(parse_date("2024-5-1"), None);
        assert_eq!(parse_date("2024-5-10 late"), None);
        assert_eq!(parse_date("24-05-01xx"), None);
        assert_eq!(parse_date("2024/05/01"), None);
        assert_eq!(parse_date("  2024-05-01  "), NaiveDate::from_ymd_opt(2024, 5, 1));
    }

    #[test]
    fn concerts_short_date_is_error_not_year_24() {
        let tmp = TempDir::new().unwrap();
        let path = write(tmp.path(), "concerts.yaml", "- date: 24-5-1\n  venue: Typo\n");
        assert!(matches!(
            load_concerts(&path, today()),
            Err(ContentError::Entry { position: 1, .. })
        ));
    }

    #[test]
    fn concerts_numeric_text_fields_stay_text() {
        let tmp = TempDir::new().unwrap();
        let path = write(
            tmp.path(),
            "concerts.yaml",
            "- date: 2024-06-01\n  venue: 229\n  city: 1984\n  notes: true\n",
        );

        let concerts = load_concerts(&path, today()).unwrap();
        assert_eq!(concerts[0].venue, "229");
        assert_eq!(concerts[0].city, "1984");
        assert_eq!(concerts[0].notes.as_deref(), Some("true"));
    }

    #[test]
    fn concerts_mapping_in_text_field_is_error() {
        let tmp = TempDir::new().unwrap();
        let path = write(
            tmp.path(),
            "concerts.yaml",
            "- date: 2024-06-01\n  venue:\n    name: Hall\n",
        );
        assert!(matches!(
            load_concerts(&path, today()),
            Err(ContentError::Entry { position: 1, .. })
        ));
    }

    // =========================================================================
    // load_albums
    // =========================================================================

    const ALBUMS: &str = r#"
- title: Middle
  date: 2019-04-12
  tracks: [One, Two]
- title: Newest
  year: 2023
  links:
    - label: Bandcamp
      url: https://example.bandcamp.com
- title: Undated
- title: Oldest
  date: "2015"
"#;

    #[test]
    fn albums_keep_source_order_by_default() {
        let tmp = TempDir::new().unwrap();
        let path = write(tmp.path(), "albums.yaml", ALBUMS);

        let albums = load_albums(&path, &AlbumsConfig::default()).unwrap();
        let titles: Vec<&str> = albums.iter().map(|a| a.title.as_str()).collect();
        assert_eq!(titles, vec!["Middle", "Newest", "Undated", "Oldest"]);

        assert_eq!(albums[0].year, Some(2019));
        assert_eq!(albums[0].tracks, vec!["One", "Two"]);
        assert_eq!(albums[1].year, Some(2023));
        assert_eq!(albums[1].links[0].label, "Bandcamp");
        assert_eq!(albums[2].year, None);
        assert_eq!(albums[3].year, Some(2015));
    }

    #[test]
    fn albums_sorted_by_year_newest_first() {
        let tmp = TempDir::new().unwrap();
        let path = write(tmp.path(), "albums.yaml", ALBUMS);
        let config = AlbumsConfig {
            sort_by: Some(AlbumSort::Year),
            newest_first: true,
        };

        let albums = load_albums(&path, &config).unwrap();
        let titles: Vec<&str> = albums.iter().map(|a| a.title.as_str()).collect();
        assert_eq!(titles, vec!["Newest", "Middle", "Oldest", "Undated"]);
    }

    #[test]
    fn albums_sorted_by_title() {
        let tmp = TempDir::new().unwrap();
        let path = write(tmp.path(), "albums.yaml", ALBUMS);
        let config = AlbumsConfig {
            sort_by: Some(AlbumSort::Title),
            newest_first: false,
        };

        let albums = load_albums(&path, &config).unwrap();
        let titles: Vec<&str> = albums.iter().map(|a| a.title.as_str()).collect();
        assert_eq!(titles, vec!["Middle", "Newest", "Oldest", "Undated"]);
    }

    #[test]
    fn albums_numeric_text_fields_stay_text() {
        let tmp = TempDir::new().unwrap();
        let path = write(
            tmp.path(),
            "albums.yaml",
            r#"
- title: 1989
  tracks: [Cherub Rock, 1979, 7]
  links:
    - label: 24
      url: https://example.com/24
    - url: https://example.com/plain
"#,
        );

        let albums = load_albums(&path, &AlbumsConfig::default()).unwrap();
        assert_eq!(albums[0].title, "1989");
        assert_eq!(albums[0].tracks, vec!["Cherub Rock", "1979", "7"]);
        assert_eq!(albums[0].links[0].label, "24");
        assert_eq!(albums[0].links[1].label, "https://example.com/plain");
    }

    #[test]
    fn albums_link_without_url_is_error() {
        let tmp = TempDir::new().unwrap();
        let path = write(tmp.path(), "albums.yaml", "- title: A\n  links:\n    - label: Shop\n");
        assert!(matches!(
            load_albums(&path, &AlbumsConfig::default()),
            Err(ContentError::Entry { position: 1, .. })
        ));
    }

    #[test]
    fn albums_missing_title_is_error() {
        let tmp = TempDir::new().unwrap();
        let path = write(tmp.path(), "albums.yaml", "- title: Ok\n- year: 2020\n");
        assert!(matches!(
            load_albums(&path, &AlbumsConfig::default()),
            Err(ContentError::Entry { position: 2, .. })
        ));
    }

    #[test]
    fn albums_scalar_top_level_is_error() {
        let tmp = TempDir::new().unwrap();
        let path = write(tmp.path(), "albums.yaml", "just a string\n");
        assert!(matches!(
            load_albums(&path, &AlbumsConfig::default()),
            Err(ContentError::NotASequence(_))
        ));
    }
}
