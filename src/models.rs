use serde::{Deserialize, Serialize};

// ============ Registry (Companies House) responses ============

/// Company profile as returned by `GET /company/{number}`.
#[derive(Debug, Clone, Deserialize)]
pub struct CompanyProfile {
    pub company_name: String,
    pub company_number: String,
}

/// One filing in a company's filing history, in registry order.
#[derive(Debug, Clone, Deserialize)]
pub struct FilingHistoryItem {
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub links: FilingLinks,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct FilingLinks {
    /// Indirection endpoint that resolves (possibly via redirect) to document bytes.
    pub document_metadata: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct FilingHistoryResponse {
    #[serde(default)]
    pub items: Vec<FilingHistoryItem>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Officer {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub officer_role: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct OfficersResponse {
    #[serde(default)]
    pub items: Vec<Officer>,
}

// ============ Request / response payloads ============

/// Body of `POST /api/v1/extract`.
///
/// The registry credential is scoped to the single request; it is never
/// stored in `Config`, `AppState`, or any client struct.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractRequest {
    #[serde(default)]
    pub company_number: String,
    #[serde(default)]
    pub registry_credential: String,
}

/// Per-company output record.
///
/// Emitted only after both mandatory registry lookups succeed. Every
/// AI/search/enrichment field defaults to an empty string rather than being
/// absent, so consumers never need to null-check.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CompanyRow {
    pub company_number: String,
    pub company_name: String,
    pub director_name: String,
    pub ethnicity_guess: String,
    pub total_assets: String,
    pub odla: String,
    pub total_deficiency: String,
    pub bbl_cbils: String,
    pub hmrc_preferential: String,
    pub hmrc_unsecured: String,
    pub trade_creditors: String,
    pub accountant_firm_name: String,
    pub accountant_url: String,
}
