//! Page composition - fetch content, then render it into the site shell
//!
//! Each page is a pure function of the data fetched for it. Fetch failures
//! propagate to the caller; only a missing post is handled here, as
//! [`Rendered::NotFound`].

use anyhow::Result;
use std::sync::Arc;
use std::time::Instant;
use tera::Context;

use crate::content::{Author, ContentRepository, MarkdownRenderer, Post, PostMeta};
use crate::templates::{PageMeta, TemplateRenderer, TocEntry};

/// Posts shown in the "Related Posts" section (the newest ones)
pub const RELATED_POSTS: usize = 2;

/// Posts shown on the home page
pub const HOME_POSTS: usize = 3;

pub const POST_NOT_FOUND_TITLE: &str = "Post Not Found";
pub const PAGE_NOT_FOUND_TITLE: &str = "Page Not Found";

/// Outcome of rendering a page that may not exist
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rendered {
    Page(String),
    NotFound(String),
}

impl Rendered {
    pub fn html(&self) -> &str {
        match self {
            Rendered::Page(html) | Rendered::NotFound(html) => html,
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Rendered::NotFound(_))
    }
}

/// Everything the blog index shows
#[derive(Debug, Clone)]
pub struct BlogIndex {
    pub posts: Vec<PostMeta>,
    pub author: Author,
    pub related_posts: Vec<PostMeta>,
}

/// Fetch the blog index data; the three reads run concurrently and any
/// failure fails the whole page
pub async fn fetch_blog_index(repo: &dyn ContentRepository) -> crate::error::Result<BlogIndex> {
    let (posts, author, related_posts) = tokio::try_join!(
        repo.list_posts(),
        repo.get_author(),
        repo.latest_posts(RELATED_POSTS),
    )?;
    Ok(BlogIndex {
        posts,
        author,
        related_posts,
    })
}

/// Title and description for a post detail page
pub fn post_meta(post: Option<&Post>) -> PageMeta {
    match post {
        Some(post) => PageMeta::new(post.title(), post.excerpt()),
        None => PageMeta::new(POST_NOT_FOUND_TITLE, ""),
    }
}

/// Renders every page of the site
pub struct Pages {
    repo: Arc<dyn ContentRepository>,
    templates: TemplateRenderer,
    markdown: MarkdownRenderer,
    site_title: String,
    site_description: String,
    analyze: bool,
}

impl Pages {
    pub fn new(
        repo: Arc<dyn ContentRepository>,
        site_title: &str,
        site_description: &str,
    ) -> Result<Self> {
        Ok(Self {
            repo,
            templates: TemplateRenderer::new(site_title)?,
            markdown: MarkdownRenderer::new(),
            site_title: site_title.to_string(),
            site_description: site_description.to_string(),
            analyze: false,
        })
    }

    /// Log how long each page takes to fetch and render
    pub fn with_analyze(mut self, analyze: bool) -> Self {
        self.analyze = analyze;
        self
    }

    /// `/blog`
    pub async fn blog_index(&self) -> Result<String> {
        let start = Instant::now();
        let index = fetch_blog_index(self.repo.as_ref()).await?;

        let toc = vec![
            TocEntry::new("blog-list", "Blog Posts"),
            TocEntry::new("related-posts", "Related Posts"),
            TocEntry::new("author-info", "Author"),
        ];

        let mut context = Context::new();
        context.insert("toc", &toc);
        context.insert("posts", &index.posts);
        context.insert("related_posts", &index.related_posts);
        context.insert("author", &index.author);

        let meta = PageMeta::new(format!("Blog | {}", self.site_title), &self.site_description);
        let html = self.templates.render("blog.html", &meta, &context)?;
        self.timed("blog", start);
        Ok(html)
    }

    /// `/blog/{slug}`
    pub async fn blog_post(&self, slug: &str) -> Result<Rendered> {
        let start = Instant::now();
        let post = self.repo.get_post_by_slug(slug).await?;

        let Some(post) = post else {
            tracing::debug!("No post with slug {:?}", slug);
            let html = self.render_not_found(&post_meta(None))?;
            return Ok(Rendered::NotFound(html));
        };

        let mut context = Context::new();
        context.insert("post", &post.meta);
        context.insert("body", &self.markdown.render(&post.content));

        let html = self
            .templates
            .render("post.html", &post_meta(Some(&post)), &context)?;
        self.timed("post", start);
        Ok(Rendered::Page(html))
    }

    /// `/`
    pub async fn home(&self) -> Result<String> {
        let start = Instant::now();
        let latest = self.repo.latest_posts(HOME_POSTS).await?;

        let mut context = Context::new();
        context.insert("latest_posts", &latest);

        let meta = PageMeta::new(&self.site_title, &self.site_description);
        let html = self.templates.render("home.html", &meta, &context)?;
        self.timed("home", start);
        Ok(html)
    }

    /// `/about`
    pub async fn about(&self) -> Result<String> {
        let author = self.repo.get_author().await?;

        let mut context = Context::new();
        context.insert("author", &author);

        let meta = PageMeta::new(
            format!("About | {}", self.site_title),
            format!("About {}", author.name),
        );
        self.templates.render("about.html", &meta, &context)
    }

    /// Fallback for unmatched routes
    pub fn not_found(&self) -> Result<String> {
        self.render_not_found(&PageMeta::new(PAGE_NOT_FOUND_TITLE, ""))
    }

    /// Generic failure page
    pub fn error_page(&self) -> Result<String> {
        let meta = PageMeta::new(format!("Error | {}", self.site_title), "");
        self.templates.render("error.html", &meta, &Context::new())
    }

    fn render_not_found(&self, meta: &PageMeta) -> Result<String> {
        self.templates.render("not_found.html", meta, &Context::new())
    }

    fn timed(&self, page: &str, start: Instant) {
        if self.analyze {
            tracing::info!(
                page,
                backend = self.repo.name(),
                elapsed_ms = start.elapsed().as_millis() as u64,
                "Rendered page"
            );
        }
    }
}
