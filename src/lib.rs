//! macooking: server-rendered blog backed by a headless CMS
//!
//! Pages are rendered per request from posts and an author profile fetched
//! through a [`content::ContentRepository`]: either the remote CMS or a
//! directory of markdown files, chosen by configuration.

pub mod commands;
pub mod config;
pub mod content;
pub mod error;
pub mod helpers;
pub mod pages;
pub mod server;
pub mod source;
pub mod templates;

use anyhow::Result;
use std::path::Path;
use std::sync::Arc;

/// The blog application
#[derive(Clone)]
pub struct Site {
    /// Site configuration
    pub config: config::SiteConfig,
    /// Base directory
    pub base_dir: std::path::PathBuf,
    /// Markdown posts directory (files backend)
    pub posts_dir: std::path::PathBuf,
    /// Static assets directory
    pub public_dir: std::path::PathBuf,
}

impl Site {
    /// Load a site from a directory, applying environment overrides
    pub fn new<P: AsRef<Path>>(base_dir: P) -> Result<Self> {
        let base_dir = base_dir.as_ref();
        let config_path = base_dir.join("_config.yml");

        let mut config = if config_path.exists() {
            config::SiteConfig::load(&config_path)?
        } else {
            config::SiteConfig::default()
        };
        config.apply_env();

        Ok(Self::with_config(base_dir, config))
    }

    /// Build a site from an already-loaded configuration
    pub fn with_config<P: AsRef<Path>>(base_dir: P, config: config::SiteConfig) -> Self {
        let base_dir = base_dir.as_ref().to_path_buf();
        let posts_dir = base_dir.join(&config.content.posts_dir);
        let public_dir = base_dir.join(&config.content.public_dir);

        Self {
            config,
            base_dir,
            posts_dir,
            public_dir,
        }
    }

    /// The content repository selected by configuration
    pub fn repository(&self) -> Result<Arc<dyn content::ContentRepository>> {
        Ok(content::repository::from_config(
            &self.config,
            &self.base_dir,
        )?)
    }

    /// Page renderer wired to the configured repository
    pub fn pages(&self) -> Result<pages::Pages> {
        let pages = pages::Pages::new(
            self.repository()?,
            &self.config.title,
            &self.config.description,
        )?;
        Ok(pages.with_analyze(self.config.analyze))
    }

    /// Run the HTTP server
    pub async fn serve(&self, ip: &str, port: u16) -> Result<()> {
        server::start(self, ip, port).await
    }

    /// Create a new markdown post
    pub fn new_post(&self, title: &str) -> Result<std::path::PathBuf> {
        commands::new::create_post(self, title)
    }
}
