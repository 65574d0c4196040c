//! Errors raised while loading posts

use std::path::PathBuf;

/// Why a post could not be loaded
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    /// The file does not contain the two `---` separators around the front-matter
    #[error("front-matter must be delimited by two `---` separators")]
    MissingSeparators,

    #[error("invalid YAML front-matter: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// The date is not written as "Month Day, Year"
    #[error("unparsable date {0:?}, expected e.g. \"January 15, 2024\"")]
    InvalidDate(String),

    #[error("failed to read {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
