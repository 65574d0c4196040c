//! Configuration module

mod site;

pub use site::ExecBackend;
pub use site::ExecConfig;
pub use site::ExternalLinkConfig;
pub use site::HighlightConfig;
pub use site::SiteConfig;
pub use site::SocialLink;
