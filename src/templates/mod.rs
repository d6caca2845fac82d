//! Built-in site templates using the Tera template engine
//!
//! Templates are embedded in the binary. Every page extends `layout.html`,
//! which provides the shell: header with logo, navigation and theme toggle,
//! and the footer.

use anyhow::Result;
use chrono::Datelike;
use serde::Serialize;
use std::collections::HashMap;
use tera::{Context, Tera};

use crate::helpers::post_path;

/// Navigation entries shown in the header
const NAV_LINKS: [(&str, &str); 3] = [("Home", "/"), ("Blog", "/blog"), ("About", "/about")];

/// Template renderer holding the embedded site templates
pub struct TemplateRenderer {
    tera: Tera,
    site_title: String,
}

impl TemplateRenderer {
    pub fn new(site_title: &str) -> Result<Self> {
        let mut tera = Tera::default();

        tera.add_raw_templates(vec![
            ("layout.html", include_str!("site/layout.html")),
            ("macros.html", include_str!("site/macros.html")),
            ("home.html", include_str!("site/home.html")),
            ("about.html", include_str!("site/about.html")),
            ("blog.html", include_str!("site/blog.html")),
            ("post.html", include_str!("site/post.html")),
            ("not_found.html", include_str!("site/not_found.html")),
            ("error.html", include_str!("site/error.html")),
            (
                "partials/header.html",
                include_str!("site/partials/header.html"),
            ),
            (
                "partials/footer.html",
                include_str!("site/partials/footer.html"),
            ),
        ])?;

        tera.register_filter("post_url", post_url_filter);

        Ok(Self {
            tera,
            site_title: site_title.to_string(),
        })
    }

    /// Render a page inside the site shell
    pub fn render(&self, template_name: &str, meta: &PageMeta, context: &Context) -> Result<String> {
        let mut context = context.clone();
        context.insert("meta", meta);
        context.insert("shell", &self.shell());
        Ok(self.tera.render(template_name, &context)?)
    }

    fn shell(&self) -> ShellData {
        ShellData {
            site_title: self.site_title.clone(),
            nav: NAV_LINKS
                .iter()
                .map(|(name, href)| NavLink {
                    name: name.to_string(),
                    href: href.to_string(),
                })
                .collect(),
            year: chrono::Local::now().year(),
        }
    }
}

/// Tera filter: slug to detail page path
fn post_url_filter(
    value: &tera::Value,
    _args: &HashMap<String, tera::Value>,
) -> tera::Result<tera::Value> {
    let slug = tera::try_get_value!("post_url", "value", String, value);
    Ok(tera::Value::String(post_path(&slug)))
}

/// Document title and description
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PageMeta {
    pub title: String,
    pub description: String,
}

impl PageMeta {
    pub fn new(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ShellData {
    pub site_title: String,
    pub nav: Vec<NavLink>,
    pub year: i32,
}

#[derive(Debug, Clone, Serialize)]
pub struct NavLink {
    pub name: String,
    pub href: String,
}

/// In-page anchor listed in a table of contents
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TocEntry {
    pub id: String,
    pub text: String,
}

impl TocEntry {
    pub fn new(id: &str, text: &str) -> Self {
        Self {
            id: id.to_string(),
            text: text.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render_not_found() -> String {
        let renderer = TemplateRenderer::new("Macooking").unwrap();
        renderer
            .render(
                "not_found.html",
                &PageMeta::new("Post Not Found", ""),
                &Context::new(),
            )
            .unwrap()
    }

    #[test]
    fn test_shell_is_rendered() {
        let html = render_not_found();
        assert!(html.contains("<title>Post Not Found</title>"));
        assert!(html.contains(r#"href="/blog""#));
        assert!(html.contains(r#"href="/about""#));
        assert!(html.contains("/globe.svg"));
        assert!(html.contains("theme-toggle"));
        let year = chrono::Local::now().year();
        assert!(html.contains(&format!("&copy; {} Macooking. All rights reserved.", year)));
    }

    #[test]
    fn test_not_found_body() {
        let html = render_not_found();
        assert!(html.contains("404 - Page Not Found"));
        assert!(html.contains("Go Home"));
    }

    #[test]
    fn test_meta_is_escaped() {
        let renderer = TemplateRenderer::new("Macooking").unwrap();
        let html = renderer
            .render(
                "error.html",
                &PageMeta::new("<script>", "a \"quoted\" description"),
                &Context::new(),
            )
            .unwrap();
        assert!(html.contains("&lt;script&gt;"));
        assert!(!html.contains("<title><script>"));
    }

    #[test]
    fn test_post_url_filter() {
        let value = tera::Value::String("hello world".to_string());
        let result = post_url_filter(&value, &HashMap::new()).unwrap();
        assert_eq!(result, tera::Value::String("/blog/hello%20world".to_string()));
    }
}
