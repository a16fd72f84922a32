/// Company extraction pipeline.
///
/// Orchestrates the full workflow for one company:
/// 1. Registry profile lookup (mandatory)
/// 2. Registry filing-history lookup (mandatory)
/// 3. Registry officers lookup (best-effort, first "director" wins)
/// 4. Filing selection over the history
/// 5. Primary extraction: statement-of-affairs document, 8-field schema
/// 6. Fallback extraction: accounts documents, accountant name only
/// 7. Ethnicity inference from the director name
/// 8. Web search for the accountant firm
///
/// Only steps 1 and 2 can fail the request. Every later step degrades its
/// output fields to empty strings and the pipeline continues.
use crate::ai::{GeminiService, ACCOUNTANT_FIELDS, SOA_FIELDS};
use crate::config::Config;
use crate::document::DocumentFetcher;
use crate::errors::{AppError, ResultExt};
use crate::filings::{select_filings, FilingMatchMode};
use crate::models::{CompanyRow, FilingHistoryItem};
use crate::registry::RegistryService;
use crate::search::SearchService;
use serde_json::Value;

pub struct ExtractionPipeline {
    registry: RegistryService,
    documents: DocumentFetcher,
    gemini: GeminiService,
    search: Option<SearchService>,
    match_mode: FilingMatchMode,
}

impl ExtractionPipeline {
    /// Builds a pipeline from process-wide configuration. Constructed per
    /// request; the registry credential is passed into `extract_company`
    /// rather than stored here.
    pub fn new(config: &Config) -> Result<Self, AppError> {
        Ok(Self {
            registry: RegistryService::new(&config.registry_base_url),
            documents: DocumentFetcher::new()?,
            gemini: GeminiService::new(config),
            search: config
                .search_api_key
                .as_deref()
                .map(|key| SearchService::new(&config.search_base_url, key)),
            match_mode: config.filing_match_mode,
        })
    }

    /// Run the full extraction for one company number.
    pub async fn extract_company(
        &self,
        company_number: &str,
        registry_credential: &str,
    ) -> Result<CompanyRow, AppError> {
        tracing::info!("Starting extraction for company {}", company_number);

        // Step 1: company profile (mandatory)
        let profile = self
            .registry
            .get_profile(company_number, registry_credential)
            .await
            .context("Company profile lookup failed")?;

        // Step 2: filing history (mandatory)
        let history = self
            .registry
            .get_filing_history(company_number, registry_credential)
            .await
            .context("Filing history lookup failed")?;

        let mut row = CompanyRow {
            company_number: profile.company_number,
            company_name: profile.company_name,
            ..CompanyRow::default()
        };

        // Step 3: officers (best-effort)
        match self
            .registry
            .get_officers(company_number, registry_credential)
            .await
        {
            Ok(officers) => {
                if let Some(director) = officers
                    .items
                    .iter()
                    .find(|o| o.officer_role == "director")
                {
                    row.director_name = director.name.clone();
                }
            }
            Err(e) => {
                tracing::warn!("Officers lookup failed, director name left empty: {}", e);
            }
        }

        // Step 4: filing selection
        let selected = select_filings(&history.items, self.match_mode);
        tracing::info!(
            "Selected filings: insolvency={}, accounts candidates={}",
            selected.insolvency.is_some(),
            selected.accounts.len()
        );

        // Step 5: primary extraction over the statement of affairs
        if let Some(item) = selected.insolvency {
            match self
                .run_primary_extraction(item, registry_credential)
                .await
            {
                Ok(record) => {
                    for field in SOA_FIELDS {
                        let value = field_str(&record, field.key);
                        set_row_field(&mut row, field.key, value);
                    }
                }
                Err(e) => {
                    tracing::warn!("Primary extraction failed, fields left empty: {}", e);
                }
            }
        }

        // Step 6: fallback accountant lookup over accounts filings
        if row.accountant_firm_name.is_empty() && !selected.accounts.is_empty() {
            row.accountant_firm_name = self
                .fallback_accountant_lookup(&selected.accounts, registry_credential)
                .await;
        }

        // Step 7: ethnicity inference from the director name
        if !row.director_name.is_empty() {
            match self.gemini.infer_ethnicity(&row.director_name).await {
                Ok(guess) => row.ethnicity_guess = guess,
                Err(e) => {
                    tracing::warn!("Ethnicity inference failed: {}", e);
                }
            }
        }

        // Step 8: web search for the accountant firm
        if !row.accountant_firm_name.is_empty() {
            if let Some(search) = &self.search {
                let query = format!("{} UK", row.accountant_firm_name);
                match search.first_result_url(&query).await {
                    Ok(Some(url)) => row.accountant_url = url,
                    Ok(None) => {}
                    Err(e) => {
                        tracing::warn!("Web search failed: {}", e);
                    }
                }
            }
        }

        tracing::info!("Extraction complete for company {}", row.company_number);
        Ok(row)
    }

    /// Fetch the insolvency document and run the 8-field extraction.
    async fn run_primary_extraction(
        &self,
        item: &FilingHistoryItem,
        registry_credential: &str,
    ) -> Result<Value, AppError> {
        let metadata_url = item.links.document_metadata.as_deref().ok_or_else(|| {
            AppError::ExternalApiError("Insolvency filing has no document link".to_string())
        })?;

        let document = self.documents.fetch(metadata_url, registry_credential).await?;
        self.gemini.extract_from_document(&document, SOA_FIELDS).await
    }

    /// Try accounts candidates in order until one yields a non-empty
    /// accountant firm name.
    ///
    /// Contract: candidates are evaluated in their original order; the loop
    /// stops at the first non-empty result and never touches later
    /// candidates; individual fetch or extraction failures skip to the next
    /// candidate; returns an empty string when none succeed.
    async fn fallback_accountant_lookup(
        &self,
        candidates: &[&FilingHistoryItem],
        registry_credential: &str,
    ) -> String {
        for (idx, item) in candidates.iter().enumerate() {
            let Some(metadata_url) = item.links.document_metadata.as_deref() else {
                tracing::warn!("Accounts candidate {} has no document link, skipping", idx);
                continue;
            };

            tracing::info!("Fallback extraction on accounts candidate {}", idx);
            let document = match self.documents.fetch(metadata_url, registry_credential).await {
                Ok(doc) => doc,
                Err(e) => {
                    tracing::warn!("Accounts candidate {} fetch failed: {}", idx, e);
                    continue;
                }
            };

            match self
                .gemini
                .extract_from_document(&document, ACCOUNTANT_FIELDS)
                .await
            {
                Ok(record) => {
                    let name = field_str(&record, "accountantFirmName");
                    if !name.is_empty() {
                        tracing::info!("Accountant firm found on candidate {}", idx);
                        return name;
                    }
                }
                Err(e) => {
                    tracing::warn!("Accounts candidate {} extraction failed: {}", idx, e);
                }
            }
        }

        String::new()
    }
}

/// Pull a string field out of an extraction record, defaulting to empty.
fn field_str(record: &Value, key: &str) -> String {
    record
        .get(key)
        .and_then(|v| v.as_str())
        .unwrap_or("")
        .to_string()
}

/// Map a schema key onto its `CompanyRow` field.
fn set_row_field(row: &mut CompanyRow, key: &str, value: String) {
    match key {
        "totalAssets" => row.total_assets = value,
        "odla" => row.odla = value,
        "totalDeficiency" => row.total_deficiency = value,
        "bblCbils" => row.bbl_cbils = value,
        "hmrcPreferential" => row.hmrc_preferential = value,
        "hmrcUnsecured" => row.hmrc_unsecured = value,
        "tradeCreditors" => row.trade_creditors = value,
        "accountantFirmName" => row.accountant_firm_name = value,
        other => {
            tracing::warn!("Unknown extraction field ignored: {}", other);
        }
    }
}
