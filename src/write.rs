use crate::markdown::escape;
use crate::post::{Post, HTML_EXTENSION};
use crate::tag::TagIndex;
use gtmpl::{Context, Template, Value};
use std::collections::HashMap;
use std::fmt;
use std::io;
use std::path::Path;

/// The identifier of the index document.
pub const INDEX_ID: &str = "index";

/// The prefix of tag document identifiers.
pub const TAG_PREFIX: &str = "tag-";

/// Responsible for templating post, index, and tag documents from [`Post`]
/// sources. Each template is a layout with a view appended to it (see
/// [`crate::build`]).
pub struct Composer<'a> {
    /// The template for post documents.
    pub post_template: &'a Template,

    /// The template for the index document.
    pub index_template: &'a Template,

    /// The template for tag documents.
    pub tag_template: &'a Template,

    /// The site-wide URL prefix. This is made available to the index and tag
    /// templates as `BaseURL` (post templates get it from the post itself).
    pub base_url: &'a str,
}

/// A rendered output document. It is written to `{id}.html` in the output
/// directory.
#[derive(Clone, Debug, PartialEq)]
pub struct Document {
    pub id: String,
    pub html: String,
}

impl Document {
    pub fn file_name(&self) -> String {
        format!("{}{}", self.id, HTML_EXTENSION)
    }
}

impl Composer<'_> {
    /// Renders one document per post, identified by the post's slug.
    pub fn post_documents(&self, posts: &[Post]) -> Result<Vec<Document>> {
        posts
            .iter()
            .map(|post| render(self.post_template, post.slug.clone(), Value::from(post)))
            .collect()
    }

    /// Renders the index document listing every post.
    pub fn index_document(&self, posts: &[Post]) -> Result<Document> {
        let mut m: HashMap<String, Value> = HashMap::new();
        m.insert("Posts".to_owned(), posts_to_value(posts.iter()));
        m.insert("BaseURL".to_owned(), Value::String(self.base_url.to_owned()));
        render(self.index_template, INDEX_ID.to_owned(), Value::Object(m))
    }

    /// Renders one document per distinct tag listing the posts carrying it.
    /// Tag documents are identified by `tag-{tag}`; the tag is escaped in the
    /// template value but not in the identifier, so a tag containing a path
    /// separator fails to write.
    pub fn tag_documents(&self, posts: &[Post]) -> Result<Vec<Document>> {
        TagIndex::build(posts)
            .iter()
            .map(|(tag, tagged)| {
                let mut m: HashMap<String, Value> = HashMap::new();
                m.insert("Tag".to_owned(), Value::String(escape(tag)));
                m.insert("Posts".to_owned(), posts_to_value(tagged.iter().copied()));
                m.insert("BaseURL".to_owned(), Value::String(self.base_url.to_owned()));
                render(
                    self.tag_template,
                    format!("{}{}", TAG_PREFIX, tag),
                    Value::Object(m),
                )
            })
            .collect()
    }

    /// Renders every post, index, and tag document. Nothing is returned
    /// unless every document rendered successfully and no two documents
    /// share an identifier (e.g., a post named `index.md` would otherwise be
    /// overwritten by the index).
    pub fn compose(&self, posts: &[Post]) -> Result<Vec<Document>> {
        let mut documents = self.post_documents(posts)?;
        documents.push(self.index_document(posts)?);
        documents.extend(self.tag_documents(posts)?);

        // Posts come first, then the index, then the tags.
        let describe = |i: usize, id: &str| match i.cmp(&posts.len()) {
            std::cmp::Ordering::Less => format!("post `{}`", id),
            std::cmp::Ordering::Equal => String::from("the index"),
            std::cmp::Ordering::Greater => {
                format!("tag `{}`", id.strip_prefix(TAG_PREFIX).unwrap_or(id))
            }
        };
        let mut seen: HashMap<&str, usize> = HashMap::new();
        for (i, document) in documents.iter().enumerate() {
            if let Some(&first) = seen.get(document.id.as_str()) {
                return Err(Error::DuplicateDocument {
                    id: document.id.clone(),
                    first: describe(first, &document.id),
                    second: describe(i, &document.id),
                });
            }
            seen.insert(&document.id, i);
        }
        Ok(documents)
    }
}

/// Writes `documents` into `output_directory`, creating it if necessary.
pub fn write_documents(output_directory: &Path, documents: &[Document]) -> Result<()> {
    std::fs::create_dir_all(output_directory)?;
    for document in documents {
        let path = output_directory.join(document.file_name());
        std::fs::write(&path, &document.html)?;
        tracing::debug!(path = %path.display(), "Wrote document");
    }
    Ok(())
}

fn posts_to_value<'a>(posts: impl Iterator<Item = &'a Post>) -> Value {
    Value::Array(posts.map(Value::from).collect())
}

fn render(template: &Template, id: String, value: Value) -> Result<Document> {
    let annotate = |err: String| Error::Render {
        document: id.clone(),
        err,
    };
    let context = Context::from(value).map_err(annotate)?;
    let mut out: Vec<u8> = Vec::new();
    template.execute(&mut out, &context).map_err(annotate)?;
    let html = String::from_utf8(out).map_err(|e| annotate(e.to_string()))?;
    Ok(Document { id, html })
}

/// The result of a fallible document operation.
type Result<T> = std::result::Result<T, Error>;

/// Represents an error in a rendering or writing operation.
#[derive(Debug)]
pub enum Error {
    /// An error executing the template for a document.
    Render { document: String, err: String },

    /// Two documents would be written to the same file.
    DuplicateDocument {
        id: String,
        first: String,
        second: String,
    },

    /// An error writing the output files.
    Io(io::Error),
}

impl From<io::Error> for Error {
    /// Converts an [`io::Error`] into an [`Error`]. This allows us to use the
    /// `?` operator for fallible I/O operations.
    fn from(err: io::Error) -> Error {
        Error::Io(err)
    }
}

impl fmt::Display for Error {
    /// Displays an [`Error`] as presentable text.
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::Render { document, err } => {
                write!(f, "rendering document `{}`: {}", document, err)
            }
            Error::DuplicateDocument { id, first, second } => write!(
                f,
                "{} and {} both render to `{}{}`",
                first, second, id, HTML_EXTENSION
            ),
            Error::Io(err) => err.fmt(f),
        }
    }
}

impl std::error::Error for Error {
    /// Implements the [`std::error::Error`] trait for [`Error`].
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Render { .. } => None,
            Error::DuplicateDocument { .. } => None,
            Error::Io(err) => Some(err),
        }
    }
}
