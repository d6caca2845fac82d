//! Post and Author models

use serde::{Deserialize, Deserializer, Serialize};

/// GROQ projections yield `null` for absent fields; read those as empty strings
fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

/// Summary of a blog post as shown in listings
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PostMeta {
    /// Post title
    #[serde(deserialize_with = "null_as_empty")]
    pub title: String,

    /// URL-safe unique identifier
    #[serde(deserialize_with = "null_as_empty")]
    pub slug: String,

    /// Short teaser shown on cards
    #[serde(deserialize_with = "null_as_empty")]
    pub excerpt: String,

    /// Creation date, when the source provides one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
}

/// A full blog post
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Post {
    #[serde(flatten)]
    pub meta: PostMeta,

    /// Markdown body
    #[serde(default, deserialize_with = "null_as_empty")]
    pub content: String,
}

impl Post {
    pub fn title(&self) -> &str {
        &self.meta.title
    }

    pub fn slug(&self) -> &str {
        &self.meta.slug
    }

    pub fn excerpt(&self) -> &str {
        &self.meta.excerpt
    }
}

/// Author profile shown on the blog index
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Author {
    #[serde(deserialize_with = "null_as_empty")]
    pub name: String,
    #[serde(rename = "avatarUrl", deserialize_with = "null_as_empty")]
    pub avatar_url: String,
    #[serde(deserialize_with = "null_as_empty")]
    pub bio: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_post_from_cms_projection() {
        let json = r#"{"title":"Hi","slug":"hello","excerpt":"Hello","content":"World"}"#;
        let post: Post = serde_json::from_str(json).unwrap();
        assert_eq!(post.title(), "Hi");
        assert_eq!(post.slug(), "hello");
        assert_eq!(post.excerpt(), "Hello");
        assert_eq!(post.meta.date, None);
        assert_eq!(post.content, "World");
    }

    #[test]
    fn test_missing_fields_default_to_empty() {
        let meta: PostMeta =
            serde_json::from_str(r#"{"slug":"bare","excerpt":null,"date":null}"#).unwrap();
        assert_eq!(meta.slug, "bare");
        assert!(meta.title.is_empty());
        assert!(meta.excerpt.is_empty());
        assert_eq!(meta.date, None);
    }

    #[test]
    fn test_author_field_names() {
        let author: Author =
            serde_json::from_str(r#"{"name":"Jane","avatarUrl":"/a.png","bio":"Hi"}"#).unwrap();
        assert_eq!(author.avatar_url, "/a.png");
        let value = serde_json::to_value(&author).unwrap();
        assert_eq!(value["avatarUrl"], "/a.png");
    }
}
