//! Creates, deletes, and updates post source files. These operate on the
//! files directly and never touch rendered output.

use crate::frontmatter::{self, Metadata, FENCE};
use crate::post::MARKDOWN_EXTENSION;
use chrono::NaiveDate;
use serde_yaml::{Mapping, Value};
use std::fmt;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

/// The date format of post frontmatter.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// The fields of a post to create.
pub struct NewPost {
    pub title: String,
    pub content: String,
    pub tags: Vec<String>,

    /// Defaults to today's (local) date.
    pub date: Option<String>,
}

/// Changes to apply to an existing post. `None` leaves a field untouched.
#[derive(Default)]
pub struct PostUpdate {
    pub title: Option<String>,
    pub content: Option<String>,
    pub tags: Option<Vec<String>>,
}

/// Splits a comma-separated tag list, dropping blank entries.
pub fn parse_tags(tags: &str) -> Vec<String> {
    tags.split(',')
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_owned)
        .collect()
}

/// Writes a new post source file into `dir` (created if necessary) named
/// after the slugified title, and returns its path. An existing file is
/// never overwritten.
pub fn create_post(dir: &Path, post: NewPost) -> Result<PathBuf> {
    let date = match post.date {
        Some(date) => {
            NaiveDate::parse_from_str(&date, DATE_FORMAT)
                .map_err(|err| Error::InvalidDate { date: date.clone(), err })?;
            date
        }
        None => chrono::Local::now().format(DATE_FORMAT).to_string(),
    };

    let slug = slug::slugify(&post.title);
    let path = source_path(dir, &slug)?;
    let metadata = Metadata {
        title: post.title,
        date,
        tags: post.tags,
    };
    let source = format!("{}\n{}{}\n\n{}", FENCE, metadata.encode()?, FENCE, post.content);

    fs::create_dir_all(dir).map_err(|err| Error::io(dir, err))?;
    OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(&path)
        .and_then(|mut file| file.write_all(source.as_bytes()))
        .map_err(|err| Error::io(&path, err))?;

    tracing::info!(slug = %slug, path = %path.display(), "Created post");
    Ok(path)
}

/// Removes the source file of the post identified by `slug`.
pub fn delete_post(dir: &Path, slug: &str) -> Result<PathBuf> {
    let path = source_path(dir, slug)?;
    fs::remove_file(&path).map_err(|err| Error::io(&path, err))?;
    tracing::info!(slug = %slug, path = %path.display(), "Deleted post");
    Ok(path)
}

/// Rewrites the frontmatter of the post identified by `slug`, keeping keys
/// that aren't updated (and their order) as they were. If new content is
/// given, it replaces the whole body.
pub fn update_post(dir: &Path, slug: &str, update: PostUpdate) -> Result<PathBuf> {
    let path = source_path(dir, slug)?;
    let input = fs::read_to_string(&path).map_err(|err| Error::io(&path, err))?;
    let (block, body) = frontmatter::split(&input);

    let mut mapping: Mapping = if block.trim().is_empty() {
        Mapping::new()
    } else {
        serde_yaml::from_str(&block)?
    };
    if let Some(title) = update.title {
        mapping.insert(Value::String("title".to_owned()), Value::String(title));
    }
    if let Some(tags) = update.tags {
        mapping.insert(
            Value::String("tags".to_owned()),
            Value::Sequence(tags.into_iter().map(Value::String).collect()),
        );
    }

    let body = match update.content {
        Some(content) => format!("\n{}", content),
        None => body,
    };
    let yaml = serde_yaml::to_string(&mapping)?;
    let source = format!(
        "{}\n{}{}\n{}",
        FENCE,
        frontmatter::strip_document_marker(&yaml),
        FENCE,
        body
    );
    fs::write(&path, source).map_err(|err| Error::io(&path, err))?;

    tracing::info!(slug = %slug, path = %path.display(), "Updated post");
    Ok(path)
}

fn source_path(dir: &Path, slug: &str) -> Result<PathBuf> {
    if slug.is_empty() || slug.contains(|c: char| c == '/' || c == '\\') || slug.starts_with('.') {
        return Err(Error::InvalidSlug(slug.to_owned()));
    }
    Ok(dir.join(format!("{}{}", slug, MARKDOWN_EXTENSION)))
}

/// The result of a fallible post-management operation.
pub type Result<T> = std::result::Result<T, Error>;

/// Represents an error creating, deleting, or updating a post.
#[derive(Debug)]
pub enum Error {
    /// Returned for I/O errors on a post source file or directory.
    Io { path: PathBuf, err: std::io::Error },

    /// Returned when frontmatter can't be encoded or decoded.
    Yaml(serde_yaml::Error),

    /// Returned when a date isn't formatted as `YYYY-MM-DD`.
    InvalidDate {
        date: String,
        err: chrono::ParseError,
    },

    /// Returned when a slug is empty or would escape the posts directory.
    InvalidSlug(String),
}

impl Error {
    fn io(path: &Path, err: std::io::Error) -> Error {
        Error::Io {
            path: path.to_owned(),
            err,
        }
    }
}

impl fmt::Display for Error {
    /// Displays an [`Error`] as human-readable text.
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::Io { path, err } => write!(f, "'{}': {}", path.display(), err),
            Error::Yaml(err) => write!(f, "frontmatter: {}", err),
            Error::InvalidDate { date, err } => {
                write!(f, "invalid date `{}` (expected YYYY-MM-DD): {}", date, err)
            }
            Error::InvalidSlug(slug) => write!(f, "invalid slug `{}`", slug),
        }
    }
}

impl std::error::Error for Error {
    /// Implements the [`std::error::Error`] trait for [`Error`].
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Io { err, .. } => Some(err),
            Error::Yaml(err) => Some(err),
            Error::InvalidDate { err, .. } => Some(err),
            Error::InvalidSlug(_) => None,
        }
    }
}

impl From<serde_yaml::Error> for Error {
    /// Converts a [`serde_yaml::Error`] into an [`Error`]. It allows us to use
    /// the `?` operator for frontmatter (de)serialization.
    fn from(err: serde_yaml::Error) -> Error {
        Error::Yaml(err)
    }
}
