/// Unit tests for models, error types, and payload shapes
use insolvency_intel_api::errors::AppError;
use insolvency_intel_api::models::{CompanyRow, ExtractRequest, FilingHistoryResponse};

#[cfg(test)]
mod row_serialization_tests {
    use super::*;

    #[test]
    fn default_row_serializes_every_field_as_empty_string() {
        let row = CompanyRow::default();
        let value = serde_json::to_value(&row).unwrap();
        let object = value.as_object().unwrap();

        // Downstream consumers never null-check: every field is present
        for key in [
            "companyNumber",
            "companyName",
            "directorName",
            "ethnicityGuess",
            "totalAssets",
            "odla",
            "totalDeficiency",
            "bblCbils",
            "hmrcPreferential",
            "hmrcUnsecured",
            "tradeCreditors",
            "accountantFirmName",
            "accountantUrl",
        ] {
            assert_eq!(
                object.get(key).and_then(|v| v.as_str()),
                Some(""),
                "missing or non-empty field: {}",
                key
            );
        }
        assert_eq!(object.len(), 13);
    }

    #[test]
    fn populated_row_uses_camel_case_keys() {
        let row = CompanyRow {
            company_number: "11969947".to_string(),
            company_name: "ACME LTD".to_string(),
            accountant_firm_name: "Smith & Co".to_string(),
            ..CompanyRow::default()
        };
        let value = serde_json::to_value(&row).unwrap();

        assert_eq!(value["companyNumber"], "11969947");
        assert_eq!(value["companyName"], "ACME LTD");
        assert_eq!(value["accountantFirmName"], "Smith & Co");
    }
}

#[cfg(test)]
mod request_parsing_tests {
    use super::*;

    #[test]
    fn extract_request_parses_camel_case_body() {
        let request: ExtractRequest = serde_json::from_str(
            r#"{"companyNumber": "11969947", "registryCredential": "key-123"}"#,
        )
        .unwrap();

        assert_eq!(request.company_number, "11969947");
        assert_eq!(request.registry_credential, "key-123");
    }

    #[test]
    fn extract_request_defaults_missing_fields_to_empty() {
        // Handlers reject blanks with a 400; parsing itself stays lenient
        let request: ExtractRequest = serde_json::from_str("{}").unwrap();
        assert!(request.company_number.is_empty());
        assert!(request.registry_credential.is_empty());
    }
}

#[cfg(test)]
mod registry_model_tests {
    use super::*;

    #[test]
    fn filing_history_tolerates_items_without_links() {
        let history: FilingHistoryResponse = serde_json::from_str(
            r#"{
                "items": [
                    { "category": "gazette", "description": "first gazette notice" },
                    {
                        "category": "insolvency",
                        "description": "statement-of-affairs filed",
                        "links": { "document_metadata": "https://reg/doc/1" }
                    }
                ]
            }"#,
        )
        .unwrap();

        assert_eq!(history.items.len(), 2);
        assert!(history.items[0].links.document_metadata.is_none());
        assert_eq!(
            history.items[1].links.document_metadata.as_deref(),
            Some("https://reg/doc/1")
        );
    }

    #[test]
    fn filing_history_with_no_items_key_parses_empty() {
        let history: FilingHistoryResponse = serde_json::from_str("{}").unwrap();
        assert!(history.items.is_empty());
    }
}

#[cfg(test)]
mod error_handling_tests {
    use super::*;

    #[test]
    fn test_app_error_types() {
        let api_error = AppError::ExternalApiError("Gemini timeout".to_string());
        assert!(matches!(api_error, AppError::ExternalApiError(_)));

        let not_found = AppError::NotFound("Company not found".to_string());
        assert!(matches!(not_found, AppError::NotFound(_)));

        let bad_request = AppError::BadRequest("companyNumber is required".to_string());
        assert!(matches!(bad_request, AppError::BadRequest(_)));
    }

    #[test]
    fn test_error_display() {
        let error = AppError::ExternalApiError("Connection timeout".to_string());
        let display = format!("{}", error);
        assert!(display.contains("External API error"));
        assert!(display.contains("Connection timeout"));

        let error = AppError::BadRequest("registryCredential is required".to_string());
        let display = format!("{}", error);
        assert!(display.contains("Bad request"));
    }

    #[test]
    fn context_chain_keeps_both_messages() {
        use insolvency_intel_api::errors::ResultExt;

        let result: Result<(), AppError> = Err(AppError::ExternalApiError(
            "Registry profile lookup returned status 404".to_string(),
        ));
        let err = result.context("Company profile lookup failed").unwrap_err();

        let display = format!("{}", err);
        assert!(display.contains("Company profile lookup failed"));
        assert!(display.contains("404"));
    }
}
