//! Splits post sources into a YAML frontmatter block and a markdown body
//! ([`split`]) and decodes the frontmatter into [`Metadata`].
//!
//! A post source looks like this:
//!
//! ```md
//! ---
//! title: Hello World
//! date: 2024-01-01
//! tags: [intro, test]
//! ---
//!
//! # Hi
//! ```
//!
//! Splitting is lenient: a source without any `---` line is all body, and a
//! source with only an opening `---` is all frontmatter.

use serde::{Deserialize, Deserializer, Serialize};

/// The line which opens and closes the frontmatter block.
pub const FENCE: &str = "---";

/// Splits `input` into `(frontmatter, body)`. The first [`FENCE`] line opens
/// the frontmatter block and the second one closes it. Lines preceding the
/// opening fence are discarded; everything after the closing fence
/// (including blank lines and further fences) is body.
pub fn split(input: &str) -> (String, String) {
    let mut preamble: Vec<&str> = Vec::new();
    let mut frontmatter: Vec<&str> = Vec::new();
    let mut body: Vec<&str> = Vec::new();
    let mut fences = 0;

    // `lines()` already strips `\r\n`, but a lone trailing `\r` can survive
    // on the final line.
    for line in input.lines() {
        if fences < 2 && line.trim_end_matches('\r') == FENCE {
            fences += 1;
            continue;
        }
        match fences {
            0 => preamble.push(line),
            1 => frontmatter.push(line),
            _ => body.push(line),
        }
    }

    if fences == 0 {
        return (String::new(), preamble.join("\n"));
    }
    (frontmatter.join("\n"), body.join("\n"))
}

/// The decoded frontmatter of a post. Unknown keys are ignored and missing
/// (or `null`) keys decode to empty values; enforcing required fields is the
/// job of whoever creates the post.
#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize)]
pub struct Metadata {
    /// The title of the post.
    #[serde(default, deserialize_with = "nullable")]
    pub title: String,

    /// The date of the post, conventionally `YYYY-MM-DD`.
    #[serde(default, deserialize_with = "nullable")]
    pub date: String,

    /// The tags associated with the post, in declaration order.
    #[serde(default, deserialize_with = "nullable")]
    pub tags: Vec<String>,
}

impl Metadata {
    /// Decodes a frontmatter block. Fails only if the block isn't a valid
    /// YAML mapping.
    pub fn decode(frontmatter: &str) -> Result<Metadata, serde_yaml::Error> {
        if frontmatter.trim().is_empty() {
            return Ok(Metadata::default());
        }
        serde_yaml::from_str(frontmatter)
    }

    /// Encodes the metadata as a YAML block suitable for placing between two
    /// [`FENCE`] lines.
    pub fn encode(&self) -> Result<String, serde_yaml::Error> {
        Ok(strip_document_marker(&serde_yaml::to_string(self)?).to_owned())
    }
}

/// `serde_yaml` prefixes serialized documents with a `---` marker, which
/// would be mistaken for the closing fence.
pub(crate) fn strip_document_marker(yaml: &str) -> &str {
    yaml.strip_prefix("---\n").unwrap_or(yaml)
}

fn nullable<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

#[cfg(test)]
mod test {
    use super::*;

    const HELLO: &str = "---
title: Hello World
date: 2024-01-01
tags: [intro, test]
---

# Hi";

    #[test]
    fn test_split() {
        let (frontmatter, body) = split(HELLO);
        assert_eq!(
            "title: Hello World\ndate: 2024-01-01\ntags: [intro, test]",
            frontmatter
        );
        assert_eq!("\n# Hi", body);
    }

    #[test]
    fn test_split_discards_preamble() {
        let (frontmatter, body) = split("junk\n---\ntitle: x\n---\nbody");
        assert_eq!("title: x", frontmatter);
        assert_eq!("body", body);
    }

    #[test]
    fn test_split_without_fences_is_all_body() {
        let (frontmatter, body) = split("# Just markdown\n\ntext");
        assert_eq!("", frontmatter);
        assert_eq!("# Just markdown\n\ntext", body);
    }

    #[test]
    fn test_split_unclosed_fence_is_all_frontmatter() {
        let (frontmatter, body) = split("---\ntitle: x\ndate: y");
        assert_eq!("title: x\ndate: y", frontmatter);
        assert_eq!("", body);
    }

    #[test]
    fn test_split_keeps_later_fences_and_blank_lines_in_body() {
        let (_, body) = split("---\ntitle: x\n---\none\n\n---\n\ntwo");
        assert_eq!("one\n\n---\n\ntwo", body);
    }

    #[test]
    fn test_split_requires_exact_fence() {
        let (frontmatter, body) = split("----\n--- \ntext");
        assert_eq!("", frontmatter);
        assert_eq!("----\n--- \ntext", body);
    }

    #[test]
    fn test_split_crlf() {
        let (frontmatter, body) = split("---\r\ntitle: x\r\n---\r\nbody\r\n");
        assert_eq!("title: x", frontmatter);
        assert_eq!("body", body);
    }

    #[test]
    fn test_decode() -> Result<(), serde_yaml::Error> {
        let (frontmatter, _) = split(HELLO);
        assert_eq!(
            Metadata {
                title: "Hello World".to_owned(),
                date: "2024-01-01".to_owned(),
                tags: vec!["intro".to_owned(), "test".to_owned()],
            },
            Metadata::decode(&frontmatter)?,
        );
        Ok(())
    }

    #[test]
    fn test_decode_missing_and_null_keys() -> Result<(), serde_yaml::Error> {
        let metadata = Metadata::decode("title: Untagged\ntags:\nauthor: me")?;
        assert_eq!("Untagged", metadata.title);
        assert_eq!("", metadata.date);
        assert!(metadata.tags.is_empty());
        Ok(())
    }

    #[test]
    fn test_decode_empty_block() -> Result<(), serde_yaml::Error> {
        assert_eq!(Metadata::default(), Metadata::decode("  \n")?);
        Ok(())
    }

    #[test]
    fn test_decode_invalid_yaml() {
        assert!(Metadata::decode("title: [unclosed").is_err());
        assert!(Metadata::decode("just a sentence").is_err());
        assert!(Metadata::decode("tags: not-a-list").is_err());
    }

    #[test]
    fn test_encode_round_trip() -> Result<(), serde_yaml::Error> {
        let metadata = Metadata {
            title: "Colons: and \"quotes\"".to_owned(),
            date: "2024-01-01".to_owned(),
            tags: vec!["b".to_owned(), "a".to_owned(), "true".to_owned()],
        };
        let encoded = metadata.encode()?;
        assert!(!encoded.starts_with(FENCE));

        let source = format!("{}\n{}{}\nbody", FENCE, encoded, FENCE);
        let (frontmatter, body) = split(&source);
        assert_eq!(metadata, Metadata::decode(&frontmatter)?);
        assert_eq!("body", body);
        Ok(())
    }
}
