//! List posts and tags

use anyhow::Result;
use std::io::{self, Write};

use crate::content::Post;
use crate::helpers::{filter_by_tag, ranked_tags};
use crate::Blog;

/// Print posts (optionally only those tagged `tag`) and tag frequencies
pub fn run(blog: &Blog, tag: Option<&str>) -> Result<()> {
    let posts = blog.loader().load_posts();
    let stdout = io::stdout();
    write_listing(&mut stdout.lock(), &posts, tag)
}

fn write_listing(out: &mut impl Write, posts: &[Post], tag: Option<&str>) -> Result<()> {
    let shown = filter_by_tag(posts, tag);
    match tag {
        Some(tag) => writeln!(out, "Posts tagged {} ({}):", tag, shown.len())?,
        None => writeln!(out, "Posts ({}):", shown.len())?,
    }
    for post in shown {
        writeln!(
            out,
            "  {} - {} [{}]",
            post.published.format("%Y-%m-%d"),
            post.title,
            post.source.display()
        )?;
    }

    let tags = ranked_tags(posts);
    writeln!(out, "Tags ({}):", tags.len())?;
    for (tag, count) in tags {
        writeln!(out, "  {} ({})", tag, count)?;
    }

    Ok(())
}
