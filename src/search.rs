use crate::errors::AppError;
use reqwest::Client;
use serde_json::{json, Value};

/// Client for the web-search provider.
///
/// Single query in, first result URL out. The whole stage is best-effort:
/// a non-success status yields `Ok(None)` rather than an error so the
/// pipeline can degrade without special-casing.
pub struct SearchService {
    client: Client,
    base_url: String,
    api_key: String,
}

impl SearchService {
    pub fn new(base_url: &str, api_key: &str) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
        }
    }

    /// Run one search and return the first result's URL, if any.
    pub async fn first_result_url(&self, query: &str) -> Result<Option<String>, AppError> {
        let url = format!("{}/search", self.base_url);
        tracing::info!("Web search: {}", query);

        let response = self
            .client
            .post(&url)
            .header("X-API-KEY", &self.api_key)
            .json(&json!({ "q": query }))
            .send()
            .await
            .map_err(|e| AppError::ExternalApiError(format!("Search request failed: {}", e)))?;

        if !response.status().is_success() {
            tracing::warn!("Search returned non-success status {}", response.status());
            return Ok(None);
        }

        let result: Value = response.json().await.map_err(|e| {
            AppError::ExternalApiError(format!("Failed to parse search response: {}", e))
        })?;

        // Providers differ on the result key: generic gateways use
        // results[].url, Serper-style APIs use organic[].link.
        let first_url = result
            .get("results")
            .and_then(|r| r.get(0))
            .and_then(|r| r.get("url"))
            .or_else(|| {
                result
                    .get("organic")
                    .and_then(|r| r.get(0))
                    .and_then(|r| r.get("link"))
            })
            .and_then(|u| u.as_str())
            .map(String::from);

        if first_url.is_none() {
            tracing::info!("Search returned no results for: {}", query);
        }

        Ok(first_url)
    }
}
