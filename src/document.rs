use crate::errors::AppError;
use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use reqwest::header::LOCATION;
use reqwest::{redirect, Client};
use std::time::Duration;

/// Fetches registry documents behind one level of storage-redirect indirection.
///
/// The document-metadata endpoint requires the registry credential and usually
/// answers with a redirect to a pre-signed storage URL. The storage tier is
/// self-authorizing and must never see the registry credential, so the second
/// hop is issued by a separate client with no Authorization header.
pub struct DocumentFetcher {
    /// Client for the metadata hop, with redirect following disabled so the
    /// `Location` target can be re-requested without credentials.
    meta_client: Client,
    /// Plain client for the storage hop.
    storage_client: Client,
}

impl DocumentFetcher {
    pub fn new() -> Result<Self, AppError> {
        let meta_client = Client::builder()
            .redirect(redirect::Policy::none())
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| {
                AppError::InternalError(format!("Failed to create metadata client: {}", e))
            })?;

        let storage_client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| {
                AppError::InternalError(format!("Failed to create storage client: {}", e))
            })?;

        Ok(Self {
            meta_client,
            storage_client,
        })
    }

    /// Resolves a document-metadata URL to raw document bytes, base64-encoded.
    ///
    /// A 3xx answer without a `Location` header is not treated as an error:
    /// the pre-redirect URL is reused as the storage URL. This is intentional
    /// leniency for providers that resolve directly without signaling a
    /// redirect.
    pub async fn fetch(&self, metadata_url: &str, credential: &str) -> Result<String, AppError> {
        tracing::info!("Fetching document metadata: {}", metadata_url);

        let response = self
            .meta_client
            .get(metadata_url)
            .basic_auth(credential, Some(""))
            .send()
            .await
            .map_err(|e| {
                AppError::ExternalApiError(format!("Document metadata request failed: {}", e))
            })?;

        let status = response.status();
        let storage_url = if status.is_redirection() {
            match response
                .headers()
                .get(LOCATION)
                .and_then(|v| v.to_str().ok())
            {
                Some(location) => location.to_string(),
                None => {
                    tracing::warn!(
                        "Redirect response without Location header, reusing metadata URL"
                    );
                    metadata_url.to_string()
                }
            }
        } else if status.is_success() {
            metadata_url.to_string()
        } else {
            return Err(AppError::ExternalApiError(format!(
                "Document metadata endpoint returned status {}",
                status
            )));
        };

        tracing::debug!("Resolved storage URL: {}", storage_url);

        // Second hop is unauthenticated: the storage URL is pre-signed and
        // forwarding the registry credential would leak it to a third party.
        let storage_response = self
            .storage_client
            .get(&storage_url)
            .send()
            .await
            .map_err(|e| {
                AppError::ExternalApiError(format!("Document storage request failed: {}", e))
            })?;

        if !storage_response.status().is_success() {
            return Err(AppError::ExternalApiError(format!(
                "Document storage endpoint returned status {}",
                storage_response.status()
            )));
        }

        let bytes = storage_response.bytes().await.map_err(|e| {
            AppError::ExternalApiError(format!("Failed to read document body: {}", e))
        })?;

        tracing::info!("Fetched document ({} bytes)", bytes.len());
        Ok(BASE64.encode(&bytes))
    }
}
