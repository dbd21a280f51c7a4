//! Defines the [`TagIndex`] type, which groups [`Post`]s by tag.

use crate::post::Post;
use std::collections::HashMap;

/// Maps each tag to the posts carrying it. Tags are kept in the order they
/// were first seen, and posts within a tag keep the order of the collection
/// the index was built from.
pub struct TagIndex<'a> {
    tags: Vec<(&'a str, Vec<&'a Post>)>,
}

impl<'a> TagIndex<'a> {
    /// Indexes `posts` in a single pass. A post with N distinct tags appears
    /// in N groups; a tag declared twice on one post still lists the post
    /// once.
    pub fn build(posts: &'a [Post]) -> TagIndex<'a> {
        let mut positions: HashMap<&'a str, usize> = HashMap::new();
        let mut tags: Vec<(&'a str, Vec<&'a Post>)> = Vec::new();

        for post in posts {
            for tag in post.tags.iter() {
                let tag: &'a str = tag.as_str();
                match positions.get(tag) {
                    None => {
                        positions.insert(tag, tags.len());
                        tags.push((tag, vec![post]));
                    }
                    Some(&i) => {
                        let group = &mut tags[i].1;
                        if !group.last().map_or(false, |last| std::ptr::eq(*last, post)) {
                            group.push(post);
                        }
                    }
                }
            }
        }

        TagIndex { tags }
    }

    /// Iterates over `(tag, posts)` pairs.
    pub fn iter<'s>(&'s self) -> impl Iterator<Item = (&'a str, &'s [&'a Post])> + 's {
        self.tags.iter().map(|(tag, posts)| (*tag, posts.as_slice()))
    }

    /// Returns the posts carrying `tag`, if any.
    pub fn get(&self, tag: &str) -> Option<&[&'a Post]> {
        self.tags
            .iter()
            .find(|(t, _)| *t == tag)
            .map(|(_, posts)| posts.as_slice())
    }

    /// Returns the number of distinct tags.
    pub fn len(&self) -> usize {
        self.tags.len()
    }

    /// Returns `true` if no post carries a tag.
    pub fn is_empty(&self) -> bool {
        self.tags.is_empty()
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::frontmatter::Metadata;

    fn post(slug: &str, tags: &[&str]) -> Post {
        Post::assemble(
            Metadata {
                title: slug.to_owned(),
                date: String::new(),
                tags: tags.iter().map(|t| t.to_string()).collect(),
            },
            String::new(),
            slug.to_owned(),
            "",
        )
    }

    fn slugs(posts: &[&Post]) -> Vec<String> {
        posts.iter().map(|p| p.slug.clone()).collect()
    }

    #[test]
    fn test_build() {
        let posts = vec![
            post("a", &["rust", "intro"]),
            post("b", &["intro"]),
            post("c", &[]),
            post("d", &["rust"]),
        ];
        let index = TagIndex::build(&posts);

        assert_eq!(2, index.len());
        let tags: Vec<&str> = index.iter().map(|(tag, _)| tag).collect();
        assert_eq!(vec!["rust", "intro"], tags);
        assert_eq!(vec!["a", "d"], slugs(index.get("rust").unwrap()));
        assert_eq!(vec!["a", "b"], slugs(index.get("intro").unwrap()));
        assert!(index.get("c").is_none());
    }

    #[test]
    fn test_build_is_complete() {
        let posts = vec![
            post("a", &["x", "y"]),
            post("b", &["y", "z"]),
            post("c", &["z", "x"]),
        ];
        let index = TagIndex::build(&posts);
        for p in posts.iter() {
            for tag in p.tags.iter() {
                let group = index.get(tag).unwrap();
                assert_eq!(1, group.iter().filter(|q| q.slug == p.slug).count());
            }
        }
    }

    #[test]
    fn test_build_duplicate_tag_on_one_post() {
        let posts = vec![post("a", &["x", "y", "x"]), post("b", &["x"])];
        let index = TagIndex::build(&posts);
        assert_eq!(vec!["a", "b"], slugs(index.get("x").unwrap()));
    }

    #[test]
    fn test_build_empty() {
        assert!(TagIndex::build(&[]).is_empty());
    }
}
