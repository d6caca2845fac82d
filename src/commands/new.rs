//! Create a new markdown post

use anyhow::Result;
use std::fs;
use std::path::PathBuf;

use crate::Site;

/// Scaffold `<posts_dir>/<slug>.md` with front matter for `title`
pub fn create_post(site: &Site, title: &str) -> Result<PathBuf> {
    let slug = slug::slugify(title);
    if slug.is_empty() {
        anyhow::bail!("Cannot derive a slug from title {:?}", title);
    }

    fs::create_dir_all(&site.posts_dir)?;
    let file_path = site.posts_dir.join(format!("{}.md", slug));

    if file_path.exists() {
        anyhow::bail!("File already exists: {:?}", file_path);
    }

    let today = chrono::Local::now().format("%Y-%m-%d");
    let content = format!(
        "---\ntitle: {}\ndate: {}\nexcerpt: \"\"\n---\n",
        yaml_string(title),
        today
    );
    fs::write(&file_path, content)?;

    tracing::info!("Created post {:?}", file_path);
    Ok(file_path)
}

/// Quote a title so YAML reads it back verbatim
fn yaml_string(s: &str) -> String {
    format!("\"{}\"", s.replace('\\', "\\\\").replace('"', "\\\""))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SiteConfig;
    use crate::content::FrontMatter;
    use tempfile::TempDir;

    #[test]
    fn test_create_post() {
        let tmp = TempDir::new().unwrap();
        let site = Site::with_config(tmp.path(), SiteConfig::default());

        let path = create_post(&site, "Hello: \"World\"").unwrap();
        assert_eq!(path, tmp.path().join("posts").join("hello-world.md"));

        let raw = fs::read_to_string(&path).unwrap();
        let (fm, body) = FrontMatter::parse(&raw).unwrap();
        assert_eq!(fm.title.as_deref(), Some("Hello: \"World\""));
        assert!(fm.parsed_date().is_some());
        assert_eq!(fm.excerpt.as_deref(), Some(""));
        assert!(body.is_empty());
    }

    #[test]
    fn test_refuses_to_overwrite() {
        let tmp = TempDir::new().unwrap();
        let site = Site::with_config(tmp.path(), SiteConfig::default());

        create_post(&site, "Twice").unwrap();
        assert!(create_post(&site, "Twice").is_err());
    }

    #[test]
    fn test_rejects_unsluggable_title() {
        let tmp = TempDir::new().unwrap();
        let site = Site::with_config(tmp.path(), SiteConfig::default());
        assert!(create_post(&site, "!!!").is_err());
    }
}
