//! Client for the headless CMS query API
//!
//! Queries are GROQ expressions sent to the dataset's query endpoint. Each
//! parameter travels as a `$name` query-string pair holding its JSON
//! encoding, and the decoded `result` field of the response envelope is
//! handed back to the caller.

use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;
use std::time::Duration;

use crate::config::CmsConfig;
use crate::error::{ContentError, Result};

/// Response envelope of the query endpoint
#[derive(Debug, Deserialize)]
struct QueryResponse<T> {
    result: T,
    #[serde(default)]
    ms: Option<u64>,
}

pub struct CmsClient {
    client: reqwest::Client,
    query_url: String,
    token: Option<String>,
}

impl CmsClient {
    pub fn new(config: &CmsConfig) -> Result<Self> {
        if config.project_id.is_empty() && config.endpoint.is_none() {
            return Err(ContentError::InvalidConfig(
                "content.cms.project_id is required for the cms backend".to_string(),
            ));
        }

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| ContentError::InvalidConfig(e.to_string()))?;

        Ok(Self {
            client,
            query_url: config.query_url(),
            token: config.token.clone(),
        })
    }

    pub fn query_url(&self) -> &str {
        &self.query_url
    }

    /// Run a query and decode its `result`.
    ///
    /// A record that does not exist comes back as JSON `null`, so callers
    /// expecting at most one record should ask for an `Option<T>`.
    pub async fn query<T: DeserializeOwned>(
        &self,
        query: &str,
        params: &[(&str, Value)],
    ) -> Result<T> {
        let mut pairs = Vec::with_capacity(params.len() + 1);
        pairs.push(("query".to_string(), query.to_string()));
        for (name, value) in params {
            pairs.push((format!("${}", name), serde_json::to_string(value)?));
        }

        let mut request = self.client.get(&self.query_url).query(&pairs);
        if let Some(ref token) = self.token {
            request = request.bearer_auth(token);
        }

        let resp = request.send().await?;

        let status = resp.status();
        if !status.is_success() {
            let message = resp.text().await.unwrap_or_default();
            return Err(ContentError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let body = resp.bytes().await?;
        let envelope: QueryResponse<T> = serde_json::from_slice(&body)?;
        tracing::debug!(query, server_ms = ?envelope.ms, "CMS query completed");
        Ok(envelope.result)
    }
}
