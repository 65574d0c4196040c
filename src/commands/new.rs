//! Create a new post

use anyhow::Result;
use std::fs;
use std::path::PathBuf;

use crate::content::FrontMatter;
use crate::helpers::format_display_date;
use crate::Blog;

/// Scaffold `<posts_dir>/<slug>.md` dated today. Returns the new file.
pub fn create_post(blog: &Blog, title: &str, tags: &[String]) -> Result<PathBuf> {
    let slug = slug::slugify(title);
    if slug.is_empty() {
        anyhow::bail!("Cannot derive a file name from title {:?}", title);
    }

    let today = chrono::Local::now().date_naive();
    let fm = FrontMatter {
        title: title.to_string(),
        date: format_display_date(&today),
        summary: String::new(),
        tags: tags.to_vec(),
    };

    fs::create_dir_all(&blog.posts_dir)?;
    let file_path = blog.posts_dir.join(format!("{}.md", slug));
    if file_path.exists() {
        anyhow::bail!("File already exists: {:?}", file_path);
    }

    let content = format!("---\n{}---\n\n", serde_yaml::to_string(&fm)?);
    fs::write(&file_path, content)?;

    tracing::debug!("Created post {:?}", file_path);
    Ok(file_path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SiteConfig;
    use tempfile::TempDir;

    #[test]
    fn test_create_post_is_loadable() {
        let dir = TempDir::new().unwrap();
        let blog = Blog::with_config(dir.path(), SiteConfig::default());

        let path = create_post(&blog, "Hello, Live World!", &["web-dev".to_string()]).unwrap();
        assert_eq!(path, dir.path().join("posts").join("hello-live-world.md"));

        let post = blog.loader().find_post("hello-live-world").unwrap().unwrap();
        assert_eq!(post.title, "Hello, Live World!");
        assert_eq!(post.tags, vec!["web-dev"]);
        assert_eq!(post.raw_body, "");
    }

    #[test]
    fn test_create_post_refuses_to_overwrite() {
        let dir = TempDir::new().unwrap();
        let blog = Blog::with_config(dir.path(), SiteConfig::default());

        create_post(&blog, "Twice", &[]).unwrap();
        assert!(create_post(&blog, "Twice", &[]).is_err());
    }

    #[test]
    fn test_create_post_needs_a_slug() {
        let dir = TempDir::new().unwrap();
        let blog = Blog::with_config(dir.path(), SiteConfig::default());
        assert!(create_post(&blog, "!!!", &[]).is_err());
    }
}
