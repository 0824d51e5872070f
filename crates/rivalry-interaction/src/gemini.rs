//! Gemini adapter for the comparison and persona-analysis requests.
//!
//! Comparisons are sent with the `google_search` tool enabled so the reply
//! carries grounding metadata; the adapter returns that metadata untouched and
//! leaves citation policy to the extractor.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use rivalry_core::comparison::{ComparisonRecord, ComparisonService, RawComparison};
use rivalry_core::config::GeminiConfig;
use rivalry_core::error::{Result, RivalryError};
use rivalry_core::extraction::extract_object;
use rivalry_core::persona::{PersonaAnalysisService, PersonaVerdict};
use serde::Serialize;
use serde_json::Value;

const BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta/models";

const DEFAULT_COMPARE_PREFIX: &str = "Compare the following items and answer with a single JSON object \
matching the comparison schema (items, summary, verdict, rivalryScore, rivalryText, searchTrend, \
rows, radarScores, personas, suggestedPersonaId):";

/// Client for Gemini's `generateContent` endpoint.
#[derive(Clone)]
pub struct GeminiClient {
    client: Client,
    api_key: String,
    model: String,
    prompt_prefix: String,
}

impl GeminiClient {
    /// Creates a new client using the provided API key and default settings.
    pub fn new(api_key: impl Into<String>) -> Self {
        let defaults = GeminiConfig::default();
        Self {
            client: Client::new(),
            api_key: api_key.into(),
            model: defaults.model,
            prompt_prefix: DEFAULT_COMPARE_PREFIX.to_string(),
        }
    }

    /// Builds a client from configuration. An API key is required.
    pub fn from_config(config: &GeminiConfig) -> Result<Self> {
        let api_key = config
            .api_key
            .clone()
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| {
                RivalryError::config("Gemini API key missing (set gemini.api_key or GEMINI_API_KEY)")
            })?;

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| RivalryError::config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            api_key,
            model: config.model.clone(),
            prompt_prefix: config
                .prompt_prefix
                .clone()
                .unwrap_or_else(|| DEFAULT_COMPARE_PREFIX.to_string()),
        })
    }

    /// Overrides the Gemini model name if needed.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    async fn generate(&self, prompt: &str, grounded: bool) -> Result<Value> {
        let url = format!(
            "{}/{model}:generateContent?key={api_key}",
            BASE_URL,
            model = self.model,
            api_key = self.api_key
        );

        let request = GenerateContentRequest {
            contents: vec![Content {
                role: "user".to_string(),
                parts: vec![Part {
                    text: prompt.to_string(),
                }],
            }],
            tools: if grounded { vec![Tool::default()] } else { Vec::new() },
        };

        tracing::debug!("[Gemini] generateContent model={} grounded={}", self.model, grounded);

        let response = self
            .client
            .post(url)
            .json(&request)
            .send()
            .await
            .map_err(|err| {
                RivalryError::service(
                    format!("Gemini request failed: {err}"),
                    err.is_connect() || err.is_timeout(),
                )
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Failed to read Gemini error body".to_string());
            return Err(map_http_error(status, &body));
        }

        response
            .json()
            .await
            .map_err(|err| RivalryError::InvalidResponse(format!("Gemini response was not JSON: {err}")))
    }
}

#[async_trait]
impl ComparisonService for GeminiClient {
    async fn compare(&self, query: &str) -> Result<RawComparison> {
        let prompt = format!("{}\n\n{}", self.prompt_prefix, query.trim());
        let payload = self.generate(&prompt, true).await?;

        let text = extract_answer(&payload)
            .ok_or_else(|| RivalryError::InvalidResponse("Gemini returned no text".to_string()))?;

        Ok(RawComparison {
            text,
            grounding: grounding_metadata(&payload),
        })
    }
}

#[async_trait]
impl PersonaAnalysisService for GeminiClient {
    async fn analyze_persona(
        &self,
        record: &ComparisonRecord,
        persona_label: &str,
    ) -> Result<PersonaVerdict> {
        let prompt = persona_prompt(record, persona_label)?;
        let payload = self.generate(&prompt, false).await?;

        let text = extract_answer(&payload)
            .ok_or_else(|| RivalryError::InvalidResponse("Gemini returned no text".to_string()))?;

        extract_object::<PersonaVerdict>(&text).ok_or_else(|| {
            RivalryError::InvalidResponse("Persona analysis had no {winner, reason} object".to_string())
        })
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest {
    contents: Vec<Content>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    tools: Vec<Tool>,
}

#[derive(Serialize)]
struct Content {
    role: String,
    parts: Vec<Part>,
}

#[derive(Serialize)]
struct Part {
    text: String,
}

#[derive(Serialize, Default)]
struct Tool {
    #[serde(rename = "google_search")]
    google_search: GoogleSearchConfig,
}

#[derive(Serialize, Default)]
struct GoogleSearchConfig {}

fn persona_prompt(record: &ComparisonRecord, persona_label: &str) -> Result<String> {
    let record_json = serde_json::to_string(record)?;
    Ok(format!(
        "Given this comparison:\n{}\n\nFor a \"{}\" user, which item wins? \
Answer with a JSON object {{\"winner\": string, \"reason\": string}}.",
        record_json, persona_label
    ))
}

fn extract_answer(root: &Value) -> Option<String> {
    let candidates = root.get("candidates")?.as_array()?;

    let mut collected = Vec::new();
    for candidate in candidates {
        if let Some(parts) = candidate
            .get("content")
            .and_then(|content| content.get("parts"))
            .and_then(|parts| parts.as_array())
        {
            for part in parts {
                if let Some(text) = part.get("text").and_then(|t| t.as_str()) {
                    let trimmed = text.trim();
                    if !trimmed.is_empty() {
                        collected.push(trimmed.to_string());
                    }
                }
            }
        }
    }

    if collected.is_empty() {
        None
    } else {
        Some(collected.join("\n\n"))
    }
}

/// The first candidate's `groundingMetadata`, if any.
fn grounding_metadata(root: &Value) -> Option<Value> {
    root.get("candidates")?
        .as_array()?
        .iter()
        .find_map(|candidate| candidate.get("groundingMetadata").cloned())
}

fn map_http_error(status: StatusCode, body: &str) -> RivalryError {
    let message = serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|json| {
            json.get("error")
                .and_then(|err| err.get("message"))
                .and_then(|msg| msg.as_str())
                .map(|msg| msg.to_string())
        })
        .unwrap_or_else(|| body.to_string());

    RivalryError::service(
        format!("Gemini returned {}: {}", status.as_u16(), message),
        is_retryable_status(status),
    )
}

fn is_retryable_status(status: StatusCode) -> bool {
    matches!(
        status,
        StatusCode::TOO_MANY_REQUESTS
            | StatusCode::INTERNAL_SERVER_ERROR
            | StatusCode::BAD_GATEWAY
            | StatusCode::SERVICE_UNAVAILABLE
            | StatusCode::GATEWAY_TIMEOUT
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use rivalry_core::extraction::extract_sources;
    use serde_json::json;

    fn payload() -> Value {
        json!({
            "candidates": [{
                "content": {"parts": [
                    {"text": "Here you go: "},
                    {"text": "{\"winner\": \"Tea\", \"reason\": \"Gentler\"}"}
                ]},
                "groundingMetadata": {
                    "groundingChunks": [
                        {"web": {"uri": "https://example.com/tea", "title": "Tea facts"}}
                    ]
                }
            }]
        })
    }

    #[test]
    fn test_extract_answer_joins_parts() {
        let answer = extract_answer(&payload()).unwrap();
        assert!(answer.starts_with("Here you go:"));
        assert!(answer.ends_with("}"));
        assert!(extract_answer(&json!({"candidates": []})).is_none());
    }

    #[test]
    fn test_grounding_metadata_feeds_source_extraction() {
        let grounding = grounding_metadata(&payload()).unwrap();
        let sources = extract_sources(&grounding);
        assert_eq!(sources.len(), 1);
        assert_eq!(sources[0].title, "Tea facts");
        assert!(grounding_metadata(&json!({"candidates": [{}]})).is_none());
    }

    #[test]
    fn test_persona_verdict_from_answer() {
        let answer = extract_answer(&payload()).unwrap();
        let verdict: PersonaVerdict = extract_object(&answer).unwrap();
        assert_eq!(verdict.winner, "Tea");
        assert_eq!(verdict.reason, "Gentler");
    }

    #[test]
    fn test_http_error_mapping() {
        let err = map_http_error(
            StatusCode::TOO_MANY_REQUESTS,
            r#"{"error": {"message": "Quota exceeded"}}"#,
        );
        assert!(err.is_retryable());
        assert!(err.to_string().contains("Quota exceeded"));

        let err = map_http_error(StatusCode::BAD_REQUEST, "plain body");
        assert!(!err.is_retryable());
        assert!(err.to_string().contains("plain body"));
    }

    #[test]
    fn test_request_omits_empty_tools() {
        let request = GenerateContentRequest {
            contents: Vec::new(),
            tools: Vec::new(),
        };
        let json = serde_json::to_value(&request).unwrap();
        assert!(json.get("tools").is_none());

        let grounded = GenerateContentRequest {
            contents: Vec::new(),
            tools: vec![Tool::default()],
        };
        let json = serde_json::to_value(&grounded).unwrap();
        assert!(json["tools"][0].get("google_search").is_some());
    }

    #[test]
    fn test_from_config_requires_key() {
        let err = GeminiClient::from_config(&GeminiConfig::default()).err().unwrap();
        assert!(matches!(err, RivalryError::Config(_)));

        let config = GeminiConfig {
            api_key: Some("key".to_string()),
            ..GeminiConfig::default()
        };
        let client = GeminiClient::from_config(&config).unwrap().with_model("gemini-2.5-pro");
        assert_eq!(client.model, "gemini-2.5-pro");
    }
}
