//! Render one post body to HTML

use anyhow::{Context, Result};
use std::fs;
use std::path::Path;

use crate::Blog;

/// Render the body of post `slug` as an HTML fragment
pub fn render_post(blog: &Blog, slug: &str) -> Result<String> {
    let post = blog
        .loader()
        .find_post(slug)
        .with_context(|| format!("Failed to load post {}", slug))?
        .ok_or_else(|| anyhow::anyhow!("No post named {:?} in {:?}", slug, blog.posts_dir))?;

    Ok(blog.processor().render(&post.raw_body))
}

/// Render a post to `output`, or to stdout
pub fn run(blog: &Blog, slug: &str, output: Option<&Path>) -> Result<()> {
    let html = render_post(blog, slug)?;
    match output {
        Some(path) => {
            fs::write(path, html).with_context(|| format!("Failed to write {:?}", path))?;
            println!("Rendered {} to {:?}", slug, path);
        }
        None => println!("{}", html),
    }
    Ok(())
}
