//! Defines the [`Post`] type and the derivation of post slugs from source
//! file paths.

use crate::frontmatter::Metadata;
use crate::markdown::escape;
use gtmpl::Value;
use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};

/// The extension of post source files.
pub const MARKDOWN_EXTENSION: &str = ".md";

/// The extension of rendered output files.
pub const HTML_EXTENSION: &str = ".html";

/// A post, assembled from its source file. Posts are built once per run and
/// only read afterwards.
#[derive(Clone, Debug, PartialEq)]
pub struct Post {
    /// The title of the post.
    pub title: String,

    /// The date of the post, conventionally `YYYY-MM-DD`.
    pub date: String,

    /// The tags associated with the post, in declaration order.
    pub tags: Vec<String>,

    /// Identifies the post. Derived from the source file path (see
    /// [`slug_from_path`]) and used to name the post's output file.
    pub slug: String,

    /// The body of the post, converted to HTML.
    pub content: String,

    /// The site-wide URL prefix, made available to templates for building
    /// links.
    pub base_url: String,
}

impl Post {
    /// Combines decoded frontmatter, the rendered body, and the slug into a
    /// [`Post`].
    pub fn assemble(metadata: Metadata, content: String, slug: String, base_url: &str) -> Post {
        Post {
            title: metadata.title,
            date: metadata.date,
            tags: metadata.tags,
            slug,
            content,
            base_url: base_url.to_owned(),
        }
    }
}

impl From<&Post> for Value {
    /// Converts a [`Post`] into a template [`Value`] with the fields `Title`,
    /// `Date`, `Tags`, `Slug`, `Content`, and `BaseURL`. The frontmatter
    /// fields and the slug are HTML-escaped; `Content` is already HTML.
    fn from(p: &Post) -> Value {
        let mut m: HashMap<String, Value> = HashMap::new();
        m.insert("Title".to_owned(), Value::String(escape(&p.title)));
        m.insert("Date".to_owned(), Value::String(escape(&p.date)));
        m.insert(
            "Tags".to_owned(),
            Value::Array(p.tags.iter().map(|t| Value::String(escape(t))).collect()),
        );
        m.insert("Slug".to_owned(), Value::String(escape(&p.slug)));
        m.insert("Content".to_owned(), Value::String(p.content.clone()));
        m.insert("BaseURL".to_owned(), Value::String(p.base_url.clone()));
        Value::Object(m)
    }
}

/// Derives a slug from the path of a post source file by stripping the
/// `content_root` prefix and the [`MARKDOWN_EXTENSION`] (e.g.,
/// `content/posts/hello-world.md` becomes `hello-world`).
pub fn slug_from_path(
    content_root: &Path,
    path: &Path,
) -> Result<String, InvalidFileNameError> {
    let relative = path.strip_prefix(content_root).unwrap_or(path);
    let relative = relative
        .to_str()
        .ok_or_else(|| InvalidFileNameError(path.to_owned()))?;
    let slug = relative.strip_suffix(MARKDOWN_EXTENSION).unwrap_or(relative);
    if slug.is_empty() {
        return Err(InvalidFileNameError(path.to_owned()));
    }
    Ok(slug.to_owned())
}

/// Returned when a post's slug can't be derived from its file name.
#[derive(Debug)]
pub struct InvalidFileNameError(pub PathBuf);

impl fmt::Display for InvalidFileNameError {
    /// Displays an [`InvalidFileNameError`] as human-readable text.
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "invalid file name: {:?}", &self.0)
    }
}

impl std::error::Error for InvalidFileNameError {}
