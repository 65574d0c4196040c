//! Post model

use chrono::NaiveDate;
use serde::Serialize;
use std::path::PathBuf;

use super::FrontMatter;
use crate::helpers::parse_display_date;

/// A blog post as loaded from disk. The body is kept unprocessed;
/// rendering happens per request in [`crate::processor::ContentProcessor`].
#[derive(Debug, Clone, Serialize)]
pub struct Post {
    /// Slug (file stem), used in `/post/{slug}`
    pub slug: String,

    /// Post title
    pub title: String,

    /// Publication date as written in the front-matter
    pub date: String,

    /// Parsed publication date, used for ordering
    #[serde(skip)]
    pub published: NaiveDate,

    /// One-line summary shown on the index card
    pub summary: String,

    /// Post tags, in front-matter order
    pub tags: Vec<String>,

    /// Raw markdown body (front-matter removed)
    #[serde(skip)]
    pub raw_body: String,

    /// Full source file path
    #[serde(skip)]
    pub source: PathBuf,
}

impl Post {
    /// Build a post from its parsed front-matter and body.
    ///
    /// Returns `None` if the front-matter date does not parse, which
    /// [`FrontMatter::from_yaml`] already rules out.
    pub fn from_parts(slug: String, fm: FrontMatter, body: &str, source: PathBuf) -> Option<Self> {
        let published = parse_display_date(&fm.date)?;
        Some(Self {
            slug,
            title: fm.title,
            date: fm.date,
            published,
            summary: fm.summary,
            tags: fm.tags,
            raw_body: body.to_string(),
            source,
        })
    }

    /// Whether the post carries the given tag
    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t == tag)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fm(date: &str) -> FrontMatter {
        FrontMatter {
            title: "Title".to_string(),
            date: date.to_string(),
            summary: String::new(),
            tags: vec!["rust".to_string(), "web-dev".to_string()],
        }
    }

    #[test]
    fn test_from_parts() {
        let post = Post::from_parts(
            "hello".to_string(),
            fm("February 2, 2024"),
            "body",
            PathBuf::from("posts/hello.md"),
        )
        .unwrap();
        assert_eq!(post.slug, "hello");
        assert_eq!(post.published, NaiveDate::from_ymd_opt(2024, 2, 2).unwrap());
        assert_eq!(post.raw_body, "body");
        assert!(post.has_tag("web-dev"));
        assert!(!post.has_tag("web"));
    }

    #[test]
    fn test_from_parts_rejects_bad_date() {
        assert!(Post::from_parts("x".to_string(), fm("soon"), "", PathBuf::new()).is_none());
    }
}
