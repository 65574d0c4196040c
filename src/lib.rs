//! livepost: a personal blog server with live code snippets
//!
//! Posts are markdown files with YAML front-matter. Fenced code blocks can
//! carry a directive (`python:show:run`, `python:show:run:call`,
//! `python:run`) that makes the renderer execute the snippet and inline the
//! markup it produces. See [`processor::ContentProcessor`].

pub mod commands;
pub mod config;
pub mod content;
pub mod helpers;
pub mod processor;
pub mod server;
pub mod templates;

use anyhow::Result;
use std::path::{Path, PathBuf};

/// The blog application: configuration plus resolved directories
#[derive(Debug, Clone)]
pub struct Blog {
    /// Site configuration
    pub config: config::SiteConfig,
    /// Base directory
    pub base_dir: PathBuf,
    /// Directory holding the post files
    pub posts_dir: PathBuf,
    /// Directory served as static files
    pub static_dir: PathBuf,
}

impl Blog {
    /// Open a blog from a directory, reading `_config.yml` if present
    pub fn new<P: AsRef<Path>>(base_dir: P) -> Result<Self> {
        let base_dir = base_dir.as_ref();
        let config_path = base_dir.join("_config.yml");

        let config = if config_path.exists() {
            config::SiteConfig::load(&config_path)?
        } else {
            tracing::debug!("No _config.yml in {:?}, using defaults", base_dir);
            config::SiteConfig::default()
        };

        Ok(Self::with_config(base_dir, config))
    }

    /// Open a blog with an explicit configuration
    pub fn with_config<P: AsRef<Path>>(base_dir: P, config: config::SiteConfig) -> Self {
        let base_dir = base_dir.as_ref().to_path_buf();
        let posts_dir = base_dir.join(&config.posts_dir);
        let static_dir = base_dir.join(&config.static_dir);

        Self {
            config,
            base_dir,
            posts_dir,
            static_dir,
        }
    }

    /// Loader reading this blog's posts
    pub fn loader(&self) -> content::ContentLoader<'_> {
        content::ContentLoader::new(self)
    }

    /// Processor configured for this blog
    pub fn processor(&self) -> processor::ContentProcessor {
        processor::ContentProcessor::for_blog(self)
    }
}
