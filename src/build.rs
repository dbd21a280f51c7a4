//! Exports the [`build_site`] function which stitches together the high-level
//! steps of building the output static site: parsing the posts
//! ([`crate::parser`]), parsing the templates, composing the post, index, and
//! tag documents ([`crate::write`]), and writing them to disk.

use crate::config::Config;
use crate::parser::{Error as ParseError, Parser as PostParser};
use crate::write::{write_documents, Composer, Error as WriteError};
use gtmpl::Template;
use std::fmt;
use std::fs::File;
use std::path::{Path, PathBuf};

/// What a successful [`build_site`] run produced.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Summary {
    pub posts: usize,
    pub documents: usize,
}

/// Builds the site from a [`Config`] object. This calls into
/// [`PostParser::parse_posts`] and [`Composer::compose`] which do the
/// heavy-lifting. Every document is rendered before the first one is written,
/// so a template failure leaves the output directory untouched.
pub fn build_site(config: &Config) -> Result<Summary> {
    // collect all posts
    let posts = PostParser::new(&config.base_url).parse_posts(&config.content_directory)?;

    // Parse the template files. Each view is appended to the layout.
    let post_template = parse_template([&config.layout_template, &config.post_template].iter())?;
    let index_template =
        parse_template([&config.layout_template, &config.index_template].iter())?;
    let tag_template = parse_template([&config.layout_template, &config.tag_template].iter())?;

    let composer = Composer {
        post_template: &post_template,
        index_template: &index_template,
        tag_template: &tag_template,
        base_url: &config.base_url,
    };
    let documents = composer.compose(&posts)?;
    write_documents(&config.output_directory, &documents)?;

    let summary = Summary {
        posts: posts.len(),
        documents: documents.len(),
    };
    tracing::info!(
        posts = summary.posts,
        documents = summary.documents,
        output = %config.output_directory.display(),
        "Generated site"
    );
    Ok(summary)
}

// Loads the template file contents, concatenates them, and parses the result
// into a template.
fn parse_template<P: AsRef<Path>>(template_files: impl Iterator<Item = P>) -> Result<Template> {
    let mut contents = String::new();
    for template_file in template_files {
        use std::io::Read;
        let template_file = template_file.as_ref();
        File::open(&template_file)
            .map_err(|e| Error::OpenTemplateFile {
                path: template_file.to_owned(),
                err: e,
            })?
            .read_to_string(&mut contents)?;
        contents.push(' ');
    }

    let mut template = Template::default();
    template.parse(&contents).map_err(Error::ParseTemplate)?;
    Ok(template)
}

type Result<T> = std::result::Result<T, Error>;

/// The error type for building a site. Errors can be during parsing, writing,
/// parsing template files, and other I/O.
#[derive(Debug)]
pub enum Error {
    /// Returned for errors during parsing.
    Parse(ParseError),

    /// Returned for errors rendering or writing documents.
    Write(WriteError),

    /// Returned for I/O problems while opening template files.
    OpenTemplateFile { path: PathBuf, err: std::io::Error },

    /// Returned for errors parsing template files.
    ParseTemplate(String),

    /// Returned for other I/O errors.
    Io(std::io::Error),
}

impl fmt::Display for Error {
    /// Implements [`fmt::Display`] for [`Error`].
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::Parse(err) => err.fmt(f),
            Error::Write(err) => err.fmt(f),
            Error::OpenTemplateFile { path, err } => {
                write!(f, "Opening template file '{}': {}", path.display(), err)
            }
            Error::ParseTemplate(err) => write!(f, "Parsing template: {}", err),
            Error::Io(err) => err.fmt(f),
        }
    }
}

impl std::error::Error for Error {
    /// Implements [`std::error::Error`] for [`Error`].
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Parse(err) => Some(err),
            Error::Write(err) => Some(err),
            Error::OpenTemplateFile { path: _, err } => Some(err),
            Error::ParseTemplate(_) => None,
            Error::Io(err) => Some(err),
        }
    }
}

impl From<std::io::Error> for Error {
    /// Converts [`std::io::Error`]s into [`Error`]. This allows us to use the
    /// `?` operator.
    fn from(err: std::io::Error) -> Error {
        Error::Io(err)
    }
}

impl From<ParseError> for Error {
    /// Converts [`ParseError`]s into [`Error`]. This allows us to use the `?`
    /// operator.
    fn from(err: ParseError) -> Error {
        Error::Parse(err)
    }
}

impl From<WriteError> for Error {
    /// Converts [`WriteError`]s into [`Error`]. This allows us to use the `?`
    /// operator.
    fn from(err: WriteError) -> Error {
        Error::Write(err)
    }
}
