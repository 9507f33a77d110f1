use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{CompletionClient, CompletionError};
use crate::config::AiConfig;

/// Client for the Gemini `generateContent` REST endpoint
pub struct GeminiClient {
    http: reqwest::Client,
    api_key: String,
    model: String,
    base_url: String,
}

#[derive(Serialize)]
struct GenerateRequest<'a> {
    contents: [RequestContent<'a>; 1],
}

#[derive(Serialize)]
struct RequestContent<'a> {
    parts: [RequestPart<'a>; 1],
}

#[derive(Serialize)]
struct RequestPart<'a> {
    text: &'a str,
}

#[derive(Debug, Default, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    error: Option<UpstreamError>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
struct ResponsePart {
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct UpstreamError {
    message: Option<String>,
}

impl GeminiClient {
    pub fn from_config(config: &AiConfig, http: reqwest::Client) -> Self {
        Self {
            http,
            api_key: config.gemini_api_key.clone(),
            model: config.model.clone(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
        }
    }

    fn endpoint(&self) -> String {
        format!("{}/v1beta/models/{}:generateContent", self.base_url, self.model)
    }
}

#[async_trait]
impl CompletionClient for GeminiClient {
    async fn complete(&self, prompt: &str) -> Result<String, CompletionError> {
        if self.api_key.is_empty() {
            return Err(CompletionError::MissingApiKey);
        }

        let body = GenerateRequest {
            contents: [RequestContent {
                parts: [RequestPart { text: prompt }],
            }],
        };

        // The key rides in the query string; strip URLs from errors so it never reaches logs
        let response = self
            .http
            .post(self.endpoint())
            .query(&[("key", self.api_key.as_str())])
            .json(&body)
            .send()
            .await
            .map_err(|e| CompletionError::Transport(e.without_url()))?;

        let status = response.status();
        let data: GenerateResponse = if status.is_success() {
            response
                .json()
                .await
                .map_err(|e| CompletionError::Transport(e.without_url()))?
        } else {
            response.json().await.unwrap_or_default()
        };

        debug!("Gemini responded with {} ({} candidates)", status, data.candidates.len());
        first_text(data, status.is_success())
    }

    fn is_configured(&self) -> bool {
        !self.api_key.is_empty()
    }
}

fn first_text(data: GenerateResponse, ok: bool) -> Result<String, CompletionError> {
    if !ok {
        let message = data
            .error
            .and_then(|e| e.message)
            .unwrap_or_else(|| "Gemini API request failed".to_string());
        return Err(CompletionError::Upstream(message));
    }

    data.candidates
        .into_iter()
        .next()
        .and_then(|c| c.content)
        .and_then(|c| c.parts.into_iter().next())
        .and_then(|p| p.text)
        .filter(|t| !t.trim().is_empty())
        .ok_or(CompletionError::EmptyResponse)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AppConfig;

    #[test]
    fn request_body_matches_generate_content_shape() {
        let body = GenerateRequest {
            contents: [RequestContent {
                parts: [RequestPart { text: "hello" }],
            }],
        };
        assert_eq!(
            serde_json::to_value(&body).unwrap(),
            serde_json::json!({ "contents": [{ "parts": [{ "text": "hello" }] }] })
        );
    }

    #[test]
    fn endpoint_uses_model_and_trims_base() {
        let mut config = AppConfig::development().ai;
        config.base_url = "https://example.test/".to_string();
        let client = GeminiClient::from_config(&config, reqwest::Client::new());
        assert_eq!(
            client.endpoint(),
            "https://example.test/v1beta/models/gemini-flash-latest:generateContent"
        );
        assert!(!client.is_configured());
    }

    #[test]
    fn extracts_first_candidate_text() {
        let data: GenerateResponse = serde_json::from_value(serde_json::json!({
            "candidates": [{ "content": { "parts": [{ "text": "{\"items\": []}" }] } }]
        }))
        .unwrap();
        assert_eq!(first_text(data, true).unwrap(), "{\"items\": []}");
    }

    #[test]
    fn upstream_error_message_is_surfaced() {
        let data: GenerateResponse = serde_json::from_value(serde_json::json!({
            "error": { "code": 400, "message": "API key not valid" }
        }))
        .unwrap();
        match first_text(data, false) {
            Err(CompletionError::Upstream(msg)) => assert_eq!(msg, "API key not valid"),
            other => panic!("unexpected: {:?}", other),
        }
    }

    #[test]
    fn missing_candidates_is_empty_response() {
        let data: GenerateResponse = serde_json::from_value(serde_json::json!({ "candidates": [] })).unwrap();
        assert!(matches!(first_text(data, true), Err(CompletionError::EmptyResponse)));
    }

    #[tokio::test]
    async fn refuses_to_call_without_key() {
        let config = AppConfig::development().ai;
        let client = GeminiClient::from_config(&config, reqwest::Client::new());
        assert!(matches!(client.complete("x").await, Err(CompletionError::MissingApiKey)));
    }
}
