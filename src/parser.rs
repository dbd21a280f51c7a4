//! Defines the [`Parser`] and [`Error`] types: the logic for reading a
//! directory of post source files into memory as [`Post`] objects.

use std::fmt;
use std::fs::{read_dir, read_to_string};
use std::path::{Path, PathBuf};

use crate::frontmatter::{self, Metadata};
use crate::markdown;
use crate::post::{slug_from_path, InvalidFileNameError, Post, MARKDOWN_EXTENSION};

/// Parses [`Post`] objects from source files.
pub struct Parser<'a> {
    /// `base_url` is the site-wide URL prefix, threaded into every parsed
    /// [`Post`] so templates can build links from it.
    base_url: &'a str,
}

impl<'a> Parser<'a> {
    /// Constructs a new parser. See fields on [`Parser`] for argument
    /// descriptions.
    pub fn new(base_url: &'a str) -> Parser<'a> {
        Parser { base_url }
    }

    /// Parses a single [`Post`] from the source file at `path`. The slug is
    /// `path` relative to `source_directory` less the extension.
    pub fn parse_post(&self, source_directory: &Path, path: &Path) -> Result<Post> {
        match self._parse_post(source_directory, path) {
            Ok(p) => Ok(p),
            Err(e) => Err(Error::Annotated(
                format!("parsing post `{}`", path.display()),
                Box::new(e),
            )),
        }
    }

    fn _parse_post(&self, source_directory: &Path, path: &Path) -> Result<Post> {
        let input = read_to_string(path)?;
        let (frontmatter, body) = frontmatter::split(&input);
        let metadata = Metadata::decode(&frontmatter)?;
        let slug = slug_from_path(source_directory, path)?;
        tracing::debug!(slug = %slug, path = %path.display(), "Parsed post");
        Ok(Post::assemble(
            metadata,
            markdown::to_html(&body),
            slug,
            self.base_url,
        ))
    }

    /// Searches `source_directory` (non-recursively) for post files
    /// (extension = `.md`) and returns a list of [`Post`] objects ordered by
    /// file name. Each post file is structured as follows:
    ///
    /// 1. Initial frontmatter fence (`---`)
    /// 2. YAML frontmatter with fields `title`, `date`, and optionally `tags`
    /// 3. Terminal frontmatter fence (`---`)
    /// 4. Post body
    ///
    /// For example:
    ///
    /// ```md
    /// ---
    /// title: Hello, world!
    /// date: 2021-04-16
    /// tags: [greet]
    /// ---
    /// # Hello
    ///
    /// World
    /// ```
    ///
    /// The first file that can't be read or decoded aborts the whole parse.
    pub fn parse_posts(&self, source_directory: &Path) -> Result<Vec<Post>> {
        let mut paths: Vec<PathBuf> = Vec::new();
        for result in read_dir(source_directory)? {
            let entry = result?;
            let os_file_name = entry.file_name();
            let file_name = os_file_name.to_string_lossy();
            if !entry.file_type()?.is_dir() && file_name.ends_with(MARKDOWN_EXTENSION) {
                paths.push(entry.path());
            }
        }

        // Directory listings come back in no particular order; sorting keeps
        // the output of repeated runs identical.
        paths.sort();

        let posts = paths
            .iter()
            .map(|path| self.parse_post(source_directory, path))
            .collect::<Result<Vec<Post>>>()?;
        tracing::info!(
            count = posts.len(),
            directory = %source_directory.display(),
            "Parsed posts"
        );
        Ok(posts)
    }
}

/// Represents the result of a [`Post`]-parse operation.
pub type Result<T> = std::result::Result<T, Error>;

/// Represents an error parsing a [`Post`] object.
#[derive(Debug)]
pub enum Error {
    /// Returned when there was an error parsing the frontmatter as YAML.
    DeserializeYaml(serde_yaml::Error),

    /// Returned when a directory or source file can't be read.
    Io(std::io::Error),

    /// Returned when a slug can't be derived from a source file name.
    InvalidFileName(InvalidFileNameError),

    /// An error with an annotation.
    Annotated(String, Box<Error>),
}

impl fmt::Display for Error {
    /// Displays an [`Error`] as human-readable text.
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::DeserializeYaml(err) => write!(f, "decoding frontmatter: {}", err),
            Error::Io(err) => err.fmt(f),
            Error::InvalidFileName(err) => err.fmt(f),
            Error::Annotated(annotation, err) => {
                write!(f, "{}: {}", &annotation, err)
            }
        }
    }
}

impl std::error::Error for Error {
    /// Implements the [`std::error::Error`] trait for [`Error`].
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::DeserializeYaml(err) => Some(err),
            Error::Io(err) => Some(err),
            Error::InvalidFileName(err) => Some(err),
            Error::Annotated(_, err) => Some(err),
        }
    }
}

impl From<InvalidFileNameError> for Error {
    fn from(err: InvalidFileNameError) -> Error {
        Error::InvalidFileName(err)
    }
}

impl From<serde_yaml::Error> for Error {
    /// Converts a [`serde_yaml::Error`] into an [`Error`]. It allows us to use
    /// the `?` operator for [`serde_yaml`] deserialization functions.
    fn from(err: serde_yaml::Error) -> Error {
        Error::DeserializeYaml(err)
    }
}

impl From<std::io::Error> for Error {
    /// Converts a [`std::io::Error`] into an [`Error`]. It allows us to
    /// use the `?` operator for fallible I/O functions.
    fn from(err: std::io::Error) -> Error {
        Error::Io(err)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn write(dir: &Path, name: &str, contents: &str) {
        fs::write(dir.join(name), contents).unwrap();
    }

    #[test]
    fn test_parse_posts() -> Result<()> {
        let dir = TempDir::new()?;
        write(
            dir.path(),
            "hello-world.md",
            "---\ntitle: Hello World\ndate: 2024-01-01\ntags: [intro, test]\n---\n\n# Hi",
        );
        write(dir.path(), "notes.txt", "not a post");
        fs::create_dir(dir.path().join("nested"))?;
        write(&dir.path().join("nested"), "deep.md", "---\ntitle: Deep\n---\n");
        fs::create_dir(dir.path().join("folder.md"))?;

        let posts = Parser::new("https://example.org").parse_posts(dir.path())?;

        assert_eq!(
            vec![Post {
                title: String::from("Hello World"),
                date: String::from("2024-01-01"),
                tags: vec![String::from("intro"), String::from("test")],
                slug: String::from("hello-world"),
                content: String::from("<h1>Hi</h1>\n"),
                base_url: String::from("https://example.org"),
            }],
            posts
        );
        Ok(())
    }

    #[test]
    fn test_parse_posts_in_file_name_order() -> Result<()> {
        let dir = TempDir::new()?;
        for name in &["c", "a", "b"] {
            write(dir.path(), &format!("{}.md", name), "---\ntitle: x\n---\n");
        }
        let slugs: Vec<String> = Parser::new("")
            .parse_posts(dir.path())?
            .into_iter()
            .map(|p| p.slug)
            .collect();
        assert_eq!(vec!["a", "b", "c"], slugs);
        Ok(())
    }

    #[test]
    fn test_parse_post_without_tags() -> Result<()> {
        let dir = TempDir::new()?;
        write(dir.path(), "plain.md", "---\ntitle: Plain\ndate: 2024-02-02\n---\ntext");
        let posts = Parser::new("").parse_posts(dir.path())?;
        assert_eq!(1, posts.len());
        assert!(posts[0].tags.is_empty());
        Ok(())
    }

    #[test]
    fn test_parse_posts_empty_directory() -> Result<()> {
        let dir = TempDir::new()?;
        assert!(Parser::new("").parse_posts(dir.path())?.is_empty());
        Ok(())
    }

    #[test]
    fn test_parse_posts_missing_directory() {
        let dir = TempDir::new().unwrap();
        match Parser::new("").parse_posts(&dir.path().join("missing")) {
            Err(Error::Io(_)) => {}
            other => panic!("expected an I/O error, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_posts_fails_fast_on_invalid_frontmatter() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "good.md", "---\ntitle: Good\n---\n");
        write(dir.path(), "bad.md", "---\ntitle: [oops\n---\n");
        match Parser::new("").parse_posts(dir.path()) {
            Err(Error::Annotated(annotation, inner)) => {
                assert!(annotation.contains("bad.md"));
                assert!(matches!(*inner, Error::DeserializeYaml(_)));
            }
            other => panic!("expected an annotated YAML error, got {:?}", other),
        }
    }
}
