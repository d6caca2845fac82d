//! Configuration module

mod site;

pub use site::Backend;
pub use site::CmsConfig;
pub use site::ContentConfig;
pub use site::ServerConfig;
pub use site::SiteConfig;
