use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, instrument};

use crate::config::RecommendationConfig;
use crate::models::{ServiceError, ServiceResult};

/// Text-generation collaborator for the recommendation assistant. Returns
/// the raw reply text; interpreting it is the caller's concern.
#[async_trait]
pub trait RecommendationClient: Send + Sync {
    /// Send a prompt and return the model's reply text
    async fn generate(&self, prompt: &str) -> ServiceResult<String>;
}

/// Client for the Gemini `generateContent` REST endpoint. Replies are
/// constrained to a JSON recommendation object through the response schema.
/// No retries: the storefront degrades to its fallback on any failure.
pub struct GeminiClient {
    http: Client,
    api_key: String,
    endpoint: String,
    model: String,
}

impl GeminiClient {
    /// Create a client from configuration. A missing API key is not an
    /// error here; generation reports it per call so the server can start
    /// without credentials.
    pub fn new(config: &RecommendationConfig) -> ServiceResult<Self> {
        let http = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| ServiceError::Configuration {
                message: format!("Failed to build HTTP client: {e}"),
            })?;

        Ok(Self {
            http,
            api_key: config.api_key.clone(),
            endpoint: config.endpoint.trim_end_matches('/').to_string(),
            model: config.model.clone(),
        })
    }
}

#[async_trait]
impl RecommendationClient for GeminiClient {
    #[instrument(skip(self, prompt))]
    async fn generate(&self, prompt: &str) -> ServiceResult<String> {
        if self.api_key.is_empty() {
            return Err(ServiceError::Configuration {
                message: "Recommendation API key is not configured".to_string(),
            });
        }

        let url = format!(
            "{}/v1beta/models/{}:generateContent",
            self.endpoint, self.model
        );

        let request = GenerateContentRequest {
            contents: vec![Content {
                parts: vec![Part {
                    text: prompt.to_string(),
                }],
            }],
            generation_config: GenerationConfig {
                response_mime_type: "application/json".to_string(),
                response_schema: recommendation_schema(),
            },
        };

        debug!(model = %self.model, "Requesting recommendation generation");

        let response = self
            .http
            .post(&url)
            .query(&[("key", self.api_key.as_str())])
            .json(&request)
            .send()
            .await
            .map_err(|e| ServiceError::ExternalService {
                service: "gemini".to_string(),
                message: e.to_string(),
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ServiceError::ExternalService {
                service: "gemini".to_string(),
                message: format!("HTTP {}: {}", status, body.chars().take(200).collect::<String>()),
            });
        }

        let reply: GenerateContentResponse =
            response
                .json()
                .await
                .map_err(|e| ServiceError::ExternalService {
                    service: "gemini".to_string(),
                    message: format!("Invalid response envelope: {e}"),
                })?;

        reply
            .candidates
            .into_iter()
            .next()
            .and_then(|candidate| candidate.content.parts.into_iter().next())
            .map(|part| part.text)
            .ok_or_else(|| ServiceError::ExternalService {
                service: "gemini".to_string(),
                message: "Reply contained no candidates".to_string(),
            })
    }
}

/// Schema handed to the model so the reply decodes as a recommendation
fn recommendation_schema() -> serde_json::Value {
    serde_json::json!({
        "type": "OBJECT",
        "properties": {
            "recommendedServiceId": { "type": "STRING", "nullable": true },
            "explanation": { "type": "STRING" }
        },
        "required": ["explanation"]
    })
}

#[derive(Debug, Serialize)]
struct GenerateContentRequest {
    contents: Vec<Content>,
    #[serde(rename = "generationConfig")]
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize)]
struct Content {
    parts: Vec<Part>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Part {
    text: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    response_mime_type: String,
    response_schema: serde_json::Value,
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: CandidateContent,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<Part>,
}
