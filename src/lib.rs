//! The library code for the `quire` static site generator. The architecture
//! can be generally broken down into two distinct steps:
//!
//! 1. Parsing posts from source files on disk ([`crate::parser`])
//! 2. Converting the posts into output files on disk ([`crate::write`])
//!
//! Parsing a post splits its source into YAML frontmatter and a markdown body
//! ([`crate::frontmatter`]), converts the body to HTML ([`crate::markdown`]),
//! and assembles the result into a [`crate::post::Post`] whose slug comes
//! from the source file name.
//!
//! Converting the posts is composed of three sub-steps, each rendered with a
//! layout template wrapping a view template:
//!
//! 1. Rendering one document per post
//! 2. Rendering the index document listing every post
//! 3. Rendering one document per tag ([`crate::tag`]) listing the posts
//!    carrying it
//!
//! All documents are rendered in memory before any of them is written, and
//! [`crate::build::build_site`] ties the steps together. [`crate::manage`]
//! creates, deletes, and updates the post source files themselves.

#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]

pub mod build;
pub mod config;
pub mod frontmatter;
pub mod manage;
pub mod markdown;
pub mod parser;
pub mod post;
pub mod tag;
mod util;
pub mod write;
