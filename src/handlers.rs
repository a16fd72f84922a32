use crate::config::Config;
use crate::document::DocumentFetcher;
use crate::errors::AppError;
use crate::models::{CompanyRow, ExtractRequest};
use crate::pipeline::ExtractionPipeline;
use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    Json,
};
use serde_json::json;
use std::sync::Arc;
use tokio::sync::RwLock;

/// Shared application state injected into handlers.
///
/// Holds no credentials: the registry key travels inside each request and the
/// AI key lives in `Config`. The results list is the session-scoped,
/// insertion-ordered output of spec'd extractions.
pub struct AppState {
    /// Application configuration.
    pub config: Config,
    /// In-memory, append-only results of this session's extractions.
    pub results: RwLock<Vec<CompanyRow>>,
}

/// Health check endpoint.
pub async fn health() -> (StatusCode, Json<serde_json::Value>) {
    (
        StatusCode::OK,
        Json(json!({
            "status": "healthy",
            "service": "insolvency-intel-api",
            "version": "0.1.0"
        })),
    )
}

/// POST /api/v1/extract
///
/// Runs the full extraction pipeline for one company and appends the row to
/// the session results. Missing inputs are a 400; mandatory registry
/// failures surface as an `{error}` body with a non-2xx status; every other
/// stage degrades to empty fields.
pub async fn extract_company(
    State(state): State<Arc<AppState>>,
    Json(request): Json<ExtractRequest>,
) -> Result<Json<CompanyRow>, AppError> {
    tracing::info!(
        "POST /extract - company number: {}",
        request.company_number
    );

    if request.company_number.trim().is_empty() {
        return Err(AppError::BadRequest(
            "companyNumber is required".to_string(),
        ));
    }
    if request.registry_credential.trim().is_empty() {
        return Err(AppError::BadRequest(
            "registryCredential is required".to_string(),
        ));
    }

    let pipeline = ExtractionPipeline::new(&state.config)?;
    let row = pipeline
        .extract_company(
            request.company_number.trim(),
            request.registry_credential.trim(),
        )
        .await?;

    state.results.write().await.push(row.clone());

    Ok(Json(row))
}

/// GET /api/v1/document
///
/// Secure-document proxy for browser-based callers: takes the target
/// document-metadata URL and the registry credential via the `x-target-url`
/// and `x-api-key` request headers, and returns the document bytes base64
/// encoded as `{success: true, base64}`.
pub async fn fetch_document(
    headers: HeaderMap,
) -> Result<Json<serde_json::Value>, AppError> {
    let target_url = headers
        .get("x-target-url")
        .and_then(|v| v.to_str().ok())
        .filter(|s| !s.trim().is_empty())
        .ok_or_else(|| AppError::BadRequest("x-target-url header is required".to_string()))?;

    let api_key = headers
        .get("x-api-key")
        .and_then(|v| v.to_str().ok())
        .filter(|s| !s.trim().is_empty())
        .ok_or_else(|| AppError::BadRequest("x-api-key header is required".to_string()))?;

    tracing::info!("GET /document - proxying secure fetch");

    let fetcher = DocumentFetcher::new()?;
    let base64 = fetcher.fetch(target_url, api_key).await?;

    Ok(Json(json!({
        "success": true,
        "base64": base64,
    })))
}

/// GET /api/v1/results
///
/// Returns this session's extracted rows in insertion order.
pub async fn list_results(
    State(state): State<Arc<AppState>>,
) -> Json<Vec<CompanyRow>> {
    let results = state.results.read().await;
    Json(results.clone())
}
