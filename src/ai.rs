use crate::config::Config;
use crate::errors::AppError;
use reqwest::Client;
use serde_json::{json, Value};

/// One string-typed field requested from the extraction provider.
pub struct SchemaField {
    /// JSON key in the constrained response object.
    pub key: &'static str,
    /// Natural-language description included in the instruction.
    pub description: &'static str,
}

/// Primary schema: the eight figures extracted from a statement of affairs.
pub const SOA_FIELDS: &[SchemaField] = &[
    SchemaField {
        key: "totalAssets",
        description: "total assets available for creditors, as a plain number",
    },
    SchemaField {
        key: "odla",
        description: "overdrawn director's loan account balance, if listed",
    },
    SchemaField {
        key: "totalDeficiency",
        description: "total deficiency as regards creditors",
    },
    SchemaField {
        key: "bblCbils",
        description: "outstanding Bounce Back Loan or CBILS amount, if listed",
    },
    SchemaField {
        key: "hmrcPreferential",
        description: "HMRC preferential creditor claim amount",
    },
    SchemaField {
        key: "hmrcUnsecured",
        description: "HMRC unsecured creditor claim amount",
    },
    SchemaField {
        key: "tradeCreditors",
        description: "total owed to trade and expense creditors",
    },
    SchemaField {
        key: "accountantFirmName",
        description: "name of the accountancy firm that prepared or is named in the document",
    },
];

/// Fallback schema: accountant firm name only, used against accounts filings.
pub const ACCOUNTANT_FIELDS: &[SchemaField] = &[SchemaField {
    key: "accountantFirmName",
    description: "name of the accountancy firm that prepared or audited these accounts",
}];

/// Demographic-inference schema, keyed on a person's name.
pub const ETHNICITY_FIELDS: &[SchemaField] = &[SchemaField {
    key: "ethnicityGuess",
    description: "single best-guess ethnicity for the name, as a short phrase",
}];

/// Client for the Gemini generateContent API.
///
/// Two invocation shapes: schema-constrained extraction over inline PDF
/// bytes, and a text-only inference call. Both request JSON-only output via
/// `response_mime_type` plus a `response_schema` naming the string fields.
pub struct GeminiService {
    client: Client,
    base_url: String,
    api_key: String,
    model: String,
}

impl GeminiService {
    pub fn new(config: &Config) -> Self {
        Self {
            client: Client::new(),
            base_url: config.gemini_base_url.clone(),
            api_key: config.gemini_api_key.clone(),
            model: config.gemini_model.clone(),
        }
    }

    /// Extract the named fields from a base64-encoded PDF.
    ///
    /// Returns the parsed JSON object from the provider. Missing fields are
    /// left to the caller; a response that is not valid JSON is an error,
    /// which the pipeline treats as a degraded (non-fatal) outcome.
    pub async fn extract_from_document(
        &self,
        document_b64: &str,
        fields: &[SchemaField],
    ) -> Result<Value, AppError> {
        let body = json!({
            "contents": [{
                "parts": [
                    {
                        "inline_data": {
                            "mime_type": "application/pdf",
                            "data": document_b64,
                        }
                    },
                    { "text": build_instruction(fields) }
                ]
            }],
            "generationConfig": {
                "response_mime_type": "application/json",
                "response_schema": build_response_schema(fields),
            }
        });

        tracing::info!(
            "Requesting extraction of {} field(s) from document",
            fields.len()
        );
        let raw = self.generate(&body).await?;

        serde_json::from_str(&raw).map_err(|e| {
            AppError::ExternalApiError(format!("Extraction output is not valid JSON: {}", e))
        })
    }

    /// Infer a best-guess ethnicity from a person's name. Best-effort: the
    /// pipeline leaves the field empty on any failure.
    pub async fn infer_ethnicity(&self, name: &str) -> Result<String, AppError> {
        let instruction = format!(
            "Based only on the name '{}', give a single best-guess ethnicity. \
             Respond with JSON only, using the key ethnicityGuess.",
            name
        );

        let body = json!({
            "contents": [{
                "parts": [{ "text": instruction }]
            }],
            "generationConfig": {
                "response_mime_type": "application/json",
                "response_schema": build_response_schema(ETHNICITY_FIELDS),
            }
        });

        tracing::info!("Requesting ethnicity inference for director name");
        let raw = self.generate(&body).await?;

        let parsed: Value = serde_json::from_str(&raw).map_err(|e| {
            AppError::ExternalApiError(format!("Inference output is not valid JSON: {}", e))
        })?;

        Ok(parsed
            .get("ethnicityGuess")
            .and_then(|v| v.as_str())
            .unwrap_or("")
            .to_string())
    }

    /// Issue one generateContent call and return the model's text output.
    async fn generate(&self, body: &Value) -> Result<String, AppError> {
        // Build URL with proper parameter encoding; the key travels as a
        // query parameter on this API.
        let url = reqwest::Url::parse_with_params(
            &format!(
                "{}/v1beta/models/{}:generateContent",
                self.base_url, self.model
            ),
            &[("key", self.api_key.as_str())],
        )
        .map_err(|e| AppError::ExternalApiError(format!("Failed to build URL: {}", e)))?;

        // Redact key from logs to prevent credential exposure
        tracing::debug!(
            "Gemini URL: {}/v1beta/models/{}:generateContent?key=[REDACTED]",
            self.base_url,
            self.model
        );

        let response = self.client.post(url).json(body).send().await.map_err(|e| {
            AppError::ExternalApiError(format!("Gemini request failed: {}", e))
        })?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            tracing::error!("Gemini returned error {}: {}", status, error_text);
            return Err(AppError::ExternalApiError(format!(
                "Gemini returned status {}: {}",
                status, error_text
            )));
        }

        let result: Value = response.json().await.map_err(|e| {
            AppError::ExternalApiError(format!("Failed to parse Gemini response: {}", e))
        })?;

        result
            .get("candidates")
            .and_then(|c| c.get(0))
            .and_then(|c| c.get("content"))
            .and_then(|c| c.get("parts"))
            .and_then(|p| p.get(0))
            .and_then(|p| p.get("text"))
            .and_then(|t| t.as_str())
            .map(String::from)
            .ok_or_else(|| {
                AppError::ExternalApiError("Gemini response missing candidate text".to_string())
            })
    }
}

fn build_instruction(fields: &[SchemaField]) -> String {
    let mut instruction = String::from(
        "Extract the following fields from the attached UK company filing. \
         Use an empty string for any field the document does not contain. \
         Respond with JSON only.\n",
    );
    for field in fields {
        instruction.push_str(&format!("- {}: {}\n", field.key, field.description));
    }
    instruction
}

/// Strict output-schema constraint: an object with one STRING property per
/// requested field, all required.
fn build_response_schema(fields: &[SchemaField]) -> Value {
    let mut properties = serde_json::Map::new();
    for field in fields {
        properties.insert(field.key.to_string(), json!({ "type": "STRING" }));
    }
    let required: Vec<&str> = fields.iter().map(|f| f.key).collect();

    json!({
        "type": "OBJECT",
        "properties": properties,
        "required": required,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn instruction_names_every_field() {
        let instruction = build_instruction(SOA_FIELDS);
        for field in SOA_FIELDS {
            assert!(instruction.contains(field.key));
        }
        assert!(instruction.contains("JSON only"));
    }

    #[test]
    fn response_schema_requires_all_fields() {
        let schema = build_response_schema(ACCOUNTANT_FIELDS);
        assert_eq!(schema["type"], "OBJECT");
        assert_eq!(schema["properties"]["accountantFirmName"]["type"], "STRING");
        assert_eq!(schema["required"][0], "accountantFirmName");
    }
}
