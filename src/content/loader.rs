//! Content loader - loads posts from the posts directory
//!
//! Posts are read from disk on every call; there is no cache to invalidate.

use std::cmp::Reverse;
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use super::{FrontMatter, LoadError, Post};
use crate::Blog;

/// Loads posts from the posts directory
pub struct ContentLoader<'a> {
    blog: &'a Blog,
}

impl<'a> ContentLoader<'a> {
    /// Create a new content loader
    pub fn new(blog: &'a Blog) -> Self {
        Self { blog }
    }

    /// Load all posts, newest first.
    ///
    /// Posts that fail to load are skipped with a warning. A missing posts
    /// directory yields an empty list.
    pub fn load_posts(&self) -> Vec<Post> {
        let mut posts = Vec::new();

        for path in self.post_files() {
            match load_post(&path) {
                Ok(post) => posts.push(post),
                Err(e) => {
                    tracing::warn!("Failed to load post {:?}: {}", path, e);
                }
            }
        }

        // Stable sort keeps reverse filename order for posts sharing a date
        posts.sort_by_key(|p| Reverse(p.published));

        posts
    }

    /// Find a post by slug. `Ok(None)` means no such post exists.
    pub fn find_post(&self, slug: &str) -> Result<Option<Post>, LoadError> {
        match self
            .post_files()
            .into_iter()
            .find(|path| file_slug(path) == slug)
        {
            Some(path) => load_post(&path).map(Some),
            None => Ok(None),
        }
    }

    /// Markdown files directly inside the posts directory, in reverse
    /// filename order
    fn post_files(&self) -> Vec<PathBuf> {
        let posts_dir = &self.blog.posts_dir;
        if !posts_dir.exists() {
            tracing::debug!("Posts directory {:?} does not exist", posts_dir);
            return Vec::new();
        }

        let mut files: Vec<PathBuf> = WalkDir::new(posts_dir)
            .min_depth(1)
            .max_depth(1)
            .follow_links(true)
            .into_iter()
            .filter_map(|e| e.ok())
            .map(|e| e.into_path())
            .filter(|path| path.is_file() && is_markdown_file(path))
            .collect();

        files.sort_by(|a, b| b.cmp(a));
        files
    }
}

/// Load a single post from a file
fn load_post(path: &Path) -> Result<Post, LoadError> {
    let content = fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let (fm, body) = FrontMatter::parse(&content)?;
    let date = fm.date.clone();

    Post::from_parts(file_slug(path), fm, body, path.to_path_buf())
        .ok_or(LoadError::InvalidDate(date))
}

/// Slug of a post file: its file stem
fn file_slug(path: &Path) -> String {
    path.file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or_default()
        .to_string()
}

/// Check if a file is a markdown file
fn is_markdown_file(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| e == "md")
        .unwrap_or(false)
}
