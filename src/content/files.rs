//! Markdown directory repository - posts stored as `<slug>.md` files

use async_trait::async_trait;
use chrono::{Local, NaiveDateTime};
use lazy_static::lazy_static;
use regex::Regex;
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use super::{Author, ContentRepository, FrontMatter, Post, PostMeta};
use crate::error::{ContentError, Result};

lazy_static! {
    static ref SLUG_RE: Regex = Regex::new(r"^[A-Za-z0-9_-]+$").unwrap();
}

/// Whether `slug` can name a post file without escaping the posts directory
pub fn is_valid_slug(slug: &str) -> bool {
    SLUG_RE.is_match(slug)
}

/// A loaded post together with the timestamp used for ordering
struct LoadedPost {
    post: Post,
    created: Option<NaiveDateTime>,
}

/// Reads posts from a directory of markdown files with front matter
pub struct FileRepository {
    posts_dir: PathBuf,
    author: Author,
}

impl FileRepository {
    pub fn new<P: Into<PathBuf>>(posts_dir: P, author: Author) -> Self {
        Self {
            posts_dir: posts_dir.into(),
            author,
        }
    }

    /// Run blocking directory work off the async executor
    async fn blocking<T, F>(&self, f: F) -> Result<T>
    where
        T: Send + 'static,
        F: FnOnce(PathBuf) -> Result<T> + Send + 'static,
    {
        let dir = self.posts_dir.clone();
        tokio::task::spawn_blocking(move || f(dir))
            .await
            .map_err(|e| ContentError::Io(std::io::Error::new(std::io::ErrorKind::Other, e)))?
    }
}

#[async_trait]
impl ContentRepository for FileRepository {
    async fn list_posts(&self) -> Result<Vec<PostMeta>> {
        let posts = self.blocking(load_all).await?;
        Ok(posts.into_iter().map(|p| p.post.meta).collect())
    }

    async fn get_post_by_slug(&self, slug: &str) -> Result<Option<Post>> {
        if !is_valid_slug(slug) {
            tracing::debug!("Rejecting slug {:?}", slug);
            return Ok(None);
        }
        let file_name = format!("{}.md", slug);
        let loaded = self
            .blocking(move |dir| {
                let path = dir.join(file_name);
                if !path.is_file() {
                    return Ok(None);
                }
                load_post(&path).map(Some)
            })
            .await?;
        Ok(loaded.map(|p| p.post))
    }

    async fn latest_posts(&self, limit: usize) -> Result<Vec<PostMeta>> {
        let posts = self.blocking(load_all).await?;
        Ok(posts
            .into_iter()
            .take(limit)
            .map(|p| p.post.meta)
            .collect())
    }

    async fn get_author(&self) -> Result<Author> {
        Ok(self.author.clone())
    }

    fn name(&self) -> &'static str {
        "files"
    }
}

/// Load every post, newest first (ties broken by slug)
fn load_all(dir: PathBuf) -> Result<Vec<LoadedPost>> {
    if !dir.is_dir() {
        tracing::warn!("Posts directory {:?} does not exist", dir);
        return Ok(Vec::new());
    }

    let mut posts = Vec::new();
    for entry in WalkDir::new(&dir)
        .min_depth(1)
        .max_depth(1)
        .follow_links(true)
        .into_iter()
        .filter_map(|e| e.ok())
    {
        let path = entry.path();
        if !path.is_file() || !is_post_file(path) {
            continue;
        }
        match load_post(path) {
            Ok(post) => posts.push(post),
            Err(e) => tracing::warn!("Failed to load post {:?}: {}", path, e),
        }
    }

    posts.sort_by(|a, b| {
        b.created
            .cmp(&a.created)
            .then_with(|| a.post.meta.slug.cmp(&b.post.meta.slug))
    });
    Ok(posts)
}

/// Load a single post file
fn load_post(path: &Path) -> Result<LoadedPost> {
    let slug = path
        .file_stem()
        .and_then(|s| s.to_str())
        .filter(|s| is_valid_slug(s))
        .ok_or_else(|| ContentError::Parse(format!("{:?} is not a valid post name", path)))?
        .to_string();

    let raw = fs::read_to_string(path)?;
    let (fm, body) = FrontMatter::parse(&raw)?;

    let created = fm.parsed_date().or_else(|| {
        fs::metadata(path)
            .and_then(|m| m.modified())
            .ok()
            .map(|t| chrono::DateTime::<Local>::from(t).naive_local())
    });

    let post = Post {
        meta: PostMeta {
            title: fm.title.unwrap_or_else(|| slug.clone()),
            excerpt: fm.excerpt.unwrap_or_default(),
            date: fm.date,
            slug,
        },
        content: body.to_string(),
    };

    Ok(LoadedPost { post, created })
}

fn is_post_file(path: &Path) -> bool {
    path.extension().and_then(|e| e.to_str()) == Some("md")
}
