//! Content module - handles posts and content loading

mod error;
mod frontmatter;
pub mod loader;
mod post;

pub use error::LoadError;
pub use frontmatter::FrontMatter;
pub use loader::ContentLoader;
pub use post::Post;
