//! CMS-backed repository

use async_trait::async_trait;
use serde_json::json;

use super::{Author, ContentRepository, Post, PostMeta};
use crate::error::{ContentError, Result};
use crate::source::CmsClient;

const POST_PROJECTION: &str = r#"{title, "slug": slug.current, excerpt, "date": _createdAt}"#;
const POST_WITH_BODY_PROJECTION: &str =
    r#"{title, "slug": slug.current, excerpt, content, "date": _createdAt}"#;

/// Reads posts and the author profile from the headless CMS
pub struct CmsRepository {
    client: CmsClient,
}

impl CmsRepository {
    pub fn new(client: CmsClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ContentRepository for CmsRepository {
    async fn list_posts(&self) -> Result<Vec<PostMeta>> {
        let query = format!(r#"*[_type == "post"]{}"#, POST_PROJECTION);
        let posts: Option<Vec<PostMeta>> = self.client.query(&query, &[]).await?;
        Ok(posts.unwrap_or_default())
    }

    async fn get_post_by_slug(&self, slug: &str) -> Result<Option<Post>> {
        let query = format!(
            r#"*[_type == "post" && slug.current == $slug][0]{}"#,
            POST_WITH_BODY_PROJECTION
        );
        self.client.query(&query, &[("slug", json!(slug))]).await
    }

    async fn latest_posts(&self, limit: usize) -> Result<Vec<PostMeta>> {
        if limit == 0 {
            return Ok(Vec::new());
        }
        let query = format!(
            r#"*[_type == "post"] | order(_createdAt desc)[0...$limit]{}"#,
            POST_PROJECTION
        );
        let posts: Option<Vec<PostMeta>> = self
            .client
            .query(&query, &[("limit", json!(limit))])
            .await?;
        let mut posts = posts.unwrap_or_default();
        posts.truncate(limit);
        Ok(posts)
    }

    async fn get_author(&self) -> Result<Author> {
        let author: Option<Author> = self
            .client
            .query(r#"*[_type == "author"][0]{name, avatarUrl, bio}"#, &[])
            .await?;
        author.ok_or_else(|| ContentError::NotFound("author".to_string()))
    }

    fn name(&self) -> &'static str {
        "cms"
    }
}
