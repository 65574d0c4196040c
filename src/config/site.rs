//! Site configuration (_config.yml)

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Main site configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    // Site
    pub title: String,
    pub tagline: String,
    pub author: String,
    #[serde(default)]
    pub social: Vec<SocialLink>,

    // Directory
    pub posts_dir: String,
    pub static_dir: String,

    // Index page
    pub top_tags: usize,

    // Rendering
    #[serde(default)]
    pub external_link: ExternalLinkConfig,
    #[serde(default)]
    pub highlight: HighlightConfig,
    #[serde(default)]
    pub exec: ExecConfig,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            title: "My Blog".to_string(),
            tagline: String::new(),
            author: String::new(),
            social: Vec::new(),

            posts_dir: "posts".to_string(),
            static_dir: "static".to_string(),

            top_tags: 5,

            external_link: ExternalLinkConfig::default(),
            highlight: HighlightConfig::default(),
            exec: ExecConfig::default(),
        }
    }
}

impl SiteConfig {
    /// Load configuration from a file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref())?;
        let config: SiteConfig = serde_yaml::from_str(&content)?;
        Ok(config)
    }
}

/// A link shown in the index page header
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SocialLink {
    pub icon: String,
    pub text: String,
    pub url: String,
}

/// External link configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExternalLinkConfig {
    /// Open non-site links in a new browsing context
    pub enable: bool,
    /// href prefixes that are never rewritten
    #[serde(default)]
    pub exclude: Vec<String>,
}

impl Default for ExternalLinkConfig {
    fn default() -> Self {
        Self {
            enable: true,
            exclude: Vec::new(),
        }
    }
}

/// Code highlighting configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HighlightConfig {
    /// Highlight plain code blocks with syntect instead of leaving it to highlight.js
    pub server_side: bool,
    pub theme: String,
}

impl Default for HighlightConfig {
    fn default() -> Self {
        Self {
            server_side: false,
            theme: "base16-ocean.dark".to_string(),
        }
    }
}

/// Which engine runs live snippets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExecBackend {
    Quickjs,
    Command,
    Disabled,
}

/// Live snippet execution configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExecConfig {
    pub backend: ExecBackend,
    /// Prefix of the directive markers (`<language>:show:run` etc.). Also
    /// labels listings for backends that run whatever they are given
    /// (`command`); QuickJS listings are labelled `javascript`.
    pub language: String,
    /// Interpreter for the `command` backend
    pub command: String,
    #[serde(default)]
    pub args: Vec<String>,
}

impl Default for ExecConfig {
    fn default() -> Self {
        Self {
            backend: ExecBackend::Quickjs,
            language: "python".to_string(),
            command: "python3".to_string(),
            args: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = SiteConfig::default();
        assert_eq!(config.posts_dir, "posts");
        assert_eq!(config.top_tags, 5);
        assert!(config.external_link.enable);
        assert_eq!(config.exec.backend, ExecBackend::Quickjs);
        assert_eq!(config.exec.language, "python");
    }

    #[test]
    fn test_parse_config() {
        let yaml = r#"
title: Drew Echerd's Blog
tagline: Sharing what I'm learning.
social:
  - icon: github
    text: GitHub
    url: https://github.com/decherd
exec:
  backend: command
  command: python3
  args: [tools/run_snippet.py]
"#;
        let config: SiteConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.title, "Drew Echerd's Blog");
        assert_eq!(config.social.len(), 1);
        assert_eq!(config.social[0].icon, "github");
        assert_eq!(config.exec.backend, ExecBackend::Command);
        assert_eq!(config.exec.args, vec!["tools/run_snippet.py"]);
        // untouched sections keep their defaults
        assert_eq!(config.exec.language, "python");
        assert_eq!(config.static_dir, "static");
    }
}
