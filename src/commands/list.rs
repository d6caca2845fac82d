//! List site content

use anyhow::Result;

use crate::content::ContentRepository;
use crate::Site;

/// List content from the configured backend by type
pub async fn run(site: &Site, content_type: &str) -> Result<()> {
    let repo = site.repository()?;
    let lines = describe(repo.as_ref(), content_type).await?;
    for line in lines {
        println!("{}", line);
    }
    Ok(())
}

/// Lines describing the requested content
pub async fn describe(repo: &dyn ContentRepository, content_type: &str) -> Result<Vec<String>> {
    let mut lines = Vec::new();

    match content_type {
        "post" | "posts" => {
            let posts = repo.list_posts().await?;
            lines.push(format!("Posts ({}) from {}:", posts.len(), repo.name()));
            for post in posts {
                lines.push(format!(
                    "  {} - {} [{}]",
                    post.date.as_deref().unwrap_or("----------"),
                    post.title,
                    post.slug
                ));
            }
        }
        "author" => {
            let author = repo.get_author().await?;
            lines.push(format!("Author: {}", author.name));
            lines.push(format!("  avatar: {}", author.avatar_url));
            lines.push(format!("  bio: {}", author.bio));
        }
        _ => {
            anyhow::bail!("Unknown type: {}. Available: post, author", content_type);
        }
    }

    Ok(lines)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::{Author, FileRepository};
    use std::fs;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_describe_posts() {
        let tmp = TempDir::new().unwrap();
        fs::write(
            tmp.path().join("hello.md"),
            "---\ntitle: Hi\ndate: 2024-01-01\n---\nWorld",
        )
        .unwrap();
        let repo = FileRepository::new(tmp.path(), Author::default());

        let lines = describe(&repo, "posts").await.unwrap();
        assert_eq!(lines[0], "Posts (1) from files:");
        assert_eq!(lines[1], "  2024-01-01 - Hi [hello]");
    }

    #[tokio::test]
    async fn test_describe_author() {
        let author = Author {
            name: "Jane".to_string(),
            ..Default::default()
        };
        let repo = FileRepository::new("/nonexistent", author);
        let lines = describe(&repo, "author").await.unwrap();
        assert_eq!(lines[0], "Author: Jane");
    }

    #[tokio::test]
    async fn test_unknown_type() {
        let repo = FileRepository::new("/nonexistent", Author::default());
        assert!(describe(&repo, "tags").await.is_err());
    }
}
