use crate::errors::AppError;
use crate::models::{CompanyProfile, FilingHistoryResponse, OfficersResponse};
use reqwest::Client;

/// Client for the company registry (Companies House public data API).
///
/// The registry credential is supplied per call rather than held on the
/// struct: it arrives with each extraction request and must not outlive it.
/// The registry's auth scheme is HTTP Basic with the key as username and an
/// empty password, i.e. `base64(key + ":")`.
pub struct RegistryService {
    client: Client,
    base_url: String,
}

impl RegistryService {
    pub fn new(base_url: &str) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Fetch the company profile. Mandatory lookup: a non-success status is
    /// surfaced, including the HTTP status code, and aborts the pipeline.
    pub async fn get_profile(
        &self,
        company_number: &str,
        credential: &str,
    ) -> Result<CompanyProfile, AppError> {
        let url = format!("{}/company/{}", self.base_url, company_number);
        tracing::info!("Fetching company profile: {}", company_number);

        let response = self
            .client
            .get(&url)
            .basic_auth(credential, Some(""))
            .send()
            .await
            .map_err(|e| {
                AppError::ExternalApiError(format!("Registry profile request failed: {}", e))
            })?;

        if !response.status().is_success() {
            return Err(AppError::ExternalApiError(format!(
                "Registry profile lookup returned status {}",
                response.status()
            )));
        }

        let profile: CompanyProfile = response.json().await.map_err(|e| {
            AppError::ExternalApiError(format!("Failed to parse company profile: {}", e))
        })?;

        tracing::info!("Found company: {}", profile.company_name);
        Ok(profile)
    }

    /// Fetch the filing history, one page of up to 100 items in registry
    /// order. Mandatory lookup.
    pub async fn get_filing_history(
        &self,
        company_number: &str,
        credential: &str,
    ) -> Result<FilingHistoryResponse, AppError> {
        let url = format!(
            "{}/company/{}/filing-history?items_per_page=100",
            self.base_url, company_number
        );
        tracing::info!("Fetching filing history: {}", company_number);

        let response = self
            .client
            .get(&url)
            .basic_auth(credential, Some(""))
            .send()
            .await
            .map_err(|e| {
                AppError::ExternalApiError(format!("Registry filing-history request failed: {}", e))
            })?;

        if !response.status().is_success() {
            return Err(AppError::ExternalApiError(format!(
                "Registry filing-history lookup returned status {}",
                response.status()
            )));
        }

        let history: FilingHistoryResponse = response.json().await.map_err(|e| {
            AppError::ExternalApiError(format!("Failed to parse filing history: {}", e))
        })?;

        tracing::info!("Filing history: {} items", history.items.len());
        Ok(history)
    }

    /// Fetch the officers list. Best-effort: the caller degrades to an empty
    /// director name on any failure.
    pub async fn get_officers(
        &self,
        company_number: &str,
        credential: &str,
    ) -> Result<OfficersResponse, AppError> {
        let url = format!("{}/company/{}/officers", self.base_url, company_number);
        tracing::info!("Fetching officers: {}", company_number);

        let response = self
            .client
            .get(&url)
            .basic_auth(credential, Some(""))
            .send()
            .await
            .map_err(|e| {
                AppError::ExternalApiError(format!("Registry officers request failed: {}", e))
            })?;

        if !response.status().is_success() {
            return Err(AppError::ExternalApiError(format!(
                "Registry officers lookup returned status {}",
                response.status()
            )));
        }

        let officers: OfficersResponse = response.json().await.map_err(|e| {
            AppError::ExternalApiError(format!("Failed to parse officers list: {}", e))
        })?;

        Ok(officers)
    }
}
