//! Content module - post/author models and the repositories serving them

mod cms;
mod files;
mod frontmatter;
mod markdown;
mod post;
pub mod repository;

pub use cms::CmsRepository;
pub use files::{is_valid_slug, FileRepository};
pub use frontmatter::FrontMatter;
pub use markdown::MarkdownRenderer;
pub use post::{Author, Post, PostMeta};
pub use repository::ContentRepository;
