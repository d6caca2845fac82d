//! Content repository - one read interface over every content source

use async_trait::async_trait;
use std::path::Path;
use std::sync::Arc;

use super::{Author, CmsRepository, FileRepository, Post, PostMeta};
use crate::config::{Backend, SiteConfig};
use crate::error::Result;
use crate::source::CmsClient;

/// Read operations the pages need from a content source
#[async_trait]
pub trait ContentRepository: Send + Sync {
    /// Every post, in the order the source yields them
    async fn list_posts(&self) -> Result<Vec<PostMeta>>;

    /// A single post with its body, `None` when no post has this slug
    async fn get_post_by_slug(&self, slug: &str) -> Result<Option<Post>>;

    /// The `limit` most recently created posts, newest first
    async fn latest_posts(&self, limit: usize) -> Result<Vec<PostMeta>>;

    /// The site author's profile
    async fn get_author(&self) -> Result<Author>;

    /// Short name for logs
    fn name(&self) -> &'static str;
}

/// Build the repository selected by `content.backend`
pub fn from_config(config: &SiteConfig, base_dir: &Path) -> Result<Arc<dyn ContentRepository>> {
    let repo: Arc<dyn ContentRepository> = match config.content.backend {
        Backend::Cms => {
            let client = CmsClient::new(&config.content.cms)?;
            tracing::debug!("Querying CMS at {}", client.query_url());
            Arc::new(CmsRepository::new(client))
        }
        Backend::Files => {
            let posts_dir = base_dir.join(&config.content.posts_dir);
            tracing::debug!("Reading posts from {:?}", posts_dir);
            Arc::new(FileRepository::new(posts_dir, config.author.clone()))
        }
    };
    Ok(repo)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ContentError;

    #[test]
    fn test_files_backend_selected() {
        let mut config = SiteConfig::default();
        config.content.backend = Backend::Files;
        let repo = from_config(&config, Path::new("/tmp")).unwrap();
        assert_eq!(repo.name(), "files");
    }

    #[test]
    fn test_cms_backend_selected() {
        let mut config = SiteConfig::default();
        config.content.cms.project_id = "abc123".to_string();
        let repo = from_config(&config, Path::new("/tmp")).unwrap();
        assert_eq!(repo.name(), "cms");
    }

    #[test]
    fn test_cms_backend_needs_project() {
        let err = from_config(&SiteConfig::default(), Path::new("/tmp"))
            .err()
            .unwrap();
        assert!(matches!(err, ContentError::InvalidConfig(_)));
    }
}
