use crate::filings::FilingMatchMode;
use serde::Deserialize;

/// Default base URL for the Companies House public data API.
const DEFAULT_REGISTRY_BASE_URL: &str = "https://api.company-information.service.gov.uk";
/// Default base URL for the Gemini generative language API.
const DEFAULT_GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com";
/// Default base URL for the Serper web search API.
const DEFAULT_SEARCH_BASE_URL: &str = "https://google.serper.dev";

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub port: u16,
    pub registry_base_url: String,
    pub gemini_api_key: String,
    pub gemini_base_url: String,
    pub gemini_model: String,
    pub search_base_url: String,
    /// Web search is a best-effort enrichment; without a key the stage is skipped.
    pub search_api_key: Option<String>,
    pub filing_match_mode: FilingMatchMode,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let config = Self {
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "3000".to_string())
                .parse()
                .map_err(|_| anyhow::anyhow!("PORT must be a valid number between 1-65535"))?,
            registry_base_url: std::env::var("REGISTRY_BASE_URL")
                .unwrap_or_else(|_| DEFAULT_REGISTRY_BASE_URL.to_string())
                .trim_end_matches('/')
                .to_string(),
            gemini_api_key: std::env::var("GEMINI_API_KEY")
                .map_err(|_| anyhow::anyhow!("GEMINI_API_KEY environment variable required"))
                .and_then(|key| {
                    if key.trim().is_empty() {
                        anyhow::bail!("GEMINI_API_KEY cannot be empty");
                    }
                    Ok(key)
                })?,
            gemini_base_url: std::env::var("GEMINI_BASE_URL")
                .unwrap_or_else(|_| DEFAULT_GEMINI_BASE_URL.to_string())
                .trim_end_matches('/')
                .to_string(),
            gemini_model: std::env::var("GEMINI_MODEL")
                .unwrap_or_else(|_| "gemini-2.0-flash".to_string()),
            search_base_url: std::env::var("SEARCH_BASE_URL")
                .unwrap_or_else(|_| DEFAULT_SEARCH_BASE_URL.to_string())
                .trim_end_matches('/')
                .to_string(),
            search_api_key: std::env::var("SEARCH_API_KEY")
                .ok()
                .filter(|s| !s.trim().is_empty()),
            filing_match_mode: std::env::var("FILING_MATCH_MODE")
                .map(|raw| {
                    raw.parse().map_err(|_| {
                        anyhow::anyhow!("FILING_MATCH_MODE must be 'strict' or 'broad'")
                    })
                })
                .unwrap_or(Ok(FilingMatchMode::Strict))?,
        };

        // Base URLs must be absolute so per-request paths can be appended
        for (name, url) in [
            ("REGISTRY_BASE_URL", &config.registry_base_url),
            ("GEMINI_BASE_URL", &config.gemini_base_url),
            ("SEARCH_BASE_URL", &config.search_base_url),
        ] {
            if !url.starts_with("http://") && !url.starts_with("https://") {
                anyhow::bail!("{} must start with http:// or https://", name);
            }
        }

        // Log successful configuration load (without sensitive values)
        tracing::info!("Configuration loaded successfully");
        tracing::debug!("Registry base URL: {}", config.registry_base_url);
        tracing::debug!(
            "Gemini base URL: {} (model: {})",
            config.gemini_base_url,
            config.gemini_model
        );
        if config.search_api_key.is_some() {
            tracing::debug!("Search base URL: {}", config.search_base_url);
        } else {
            tracing::info!("SEARCH_API_KEY not set, web-search enrichment disabled");
        }
        tracing::debug!("Filing match mode: {:?}", config.filing_match_mode);
        tracing::debug!("Server Port: {}", config.port);

        Ok(config)
    }
}
