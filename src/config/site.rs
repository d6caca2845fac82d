//! Site configuration (_config.yml)

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::content::Author;

/// Main site configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    // Site
    pub title: String,
    pub description: String,

    // Runtime flags
    /// Production mode silences diagnostic log output
    pub production: bool,
    /// Per-request tracing and render timings
    pub analyze: bool,

    pub server: ServerConfig,
    pub content: ContentConfig,

    /// Author profile served by the files backend
    pub author: Author,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            title: "Macooking".to_string(),
            description: "Browse the latest posts on Macooking.".to_string(),
            production: false,
            analyze: false,
            server: ServerConfig::default(),
            content: ContentConfig::default(),
            author: Author::default(),
        }
    }
}

impl SiteConfig {
    /// Load configuration from a file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref())?;
        let config: SiteConfig = serde_yaml::from_str(&content)?;
        Ok(config)
    }

    /// Apply overrides from the process environment
    pub fn apply_env(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    /// Apply overrides from an arbitrary variable lookup
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(env) = lookup("MACOOKING_ENV") {
            self.production = env.eq_ignore_ascii_case("production");
        }
        if let Some(analyze) = lookup("ANALYZE") {
            self.analyze = analyze == "true" || analyze == "1";
        }
        if let Some(backend) = lookup("MACOOKING_BACKEND") {
            match backend.parse() {
                Ok(backend) => self.content.backend = backend,
                Err(e) => tracing::warn!("Ignoring MACOOKING_BACKEND: {}", e),
            }
        }
        if let Some(project_id) = lookup("SANITY_PROJECT_ID") {
            self.content.cms.project_id = project_id;
        }
        if let Some(dataset) = lookup("SANITY_DATASET") {
            self.content.cms.dataset = dataset;
        }
        if let Some(token) = lookup("SANITY_TOKEN") {
            self.content.cms.token = Some(token).filter(|t| !t.is_empty());
        }
    }
}

/// Listening address
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub ip: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            ip: "localhost".to_string(),
            port: 3000,
        }
    }
}

/// Which content source backs the site
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Backend {
    Cms,
    Files,
}

impl std::fmt::Display for Backend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Backend::Cms => f.write_str("cms"),
            Backend::Files => f.write_str("files"),
        }
    }
}

impl std::str::FromStr for Backend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "cms" | "sanity" => Ok(Backend::Cms),
            "files" | "fs" | "markdown" => Ok(Backend::Files),
            other => Err(format!("unknown backend '{}', expected cms or files", other)),
        }
    }
}

/// Content source configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ContentConfig {
    pub backend: Backend,
    pub posts_dir: String,
    pub public_dir: String,
    pub cms: CmsConfig,
}

impl Default for ContentConfig {
    fn default() -> Self {
        Self {
            backend: Backend::Cms,
            posts_dir: "posts".to_string(),
            public_dir: "public".to_string(),
            cms: CmsConfig::default(),
        }
    }
}

/// Headless CMS (Sanity) connection settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CmsConfig {
    pub project_id: String,
    pub dataset: String,
    pub api_version: String,
    pub use_cdn: bool,
    pub token: Option<String>,
    /// Replaces the derived API host, e.g. for a local mirror
    pub endpoint: Option<String>,
    pub timeout_secs: u64,
}

impl Default for CmsConfig {
    fn default() -> Self {
        Self {
            project_id: String::new(),
            dataset: "production".to_string(),
            api_version: "2023-07-12".to_string(),
            use_cdn: true,
            token: None,
            endpoint: None,
            timeout_secs: 30,
        }
    }
}

impl CmsConfig {
    /// Query endpoint for the configured dataset
    pub fn query_url(&self) -> String {
        let base = match &self.endpoint {
            Some(endpoint) => endpoint.trim_end_matches('/').to_string(),
            None => {
                let host = if self.use_cdn {
                    "apicdn.sanity.io"
                } else {
                    "api.sanity.io"
                };
                format!("https://{}.{}", self.project_id, host)
            }
        };
        format!(
            "{}/v{}/data/query/{}",
            base,
            self.api_version.trim_start_matches('v'),
            self.dataset
        )
    }
}
