use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;

use contexta_core::AiSettings;

use crate::GenerateError;

// --- Request body ---

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentRequest {
    pub contents: Vec<Content>,
    pub generation_config: GenerationConfig,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Content {
    pub role: String,
    pub parts: Vec<Part>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Part {
    pub text: String,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct GenerationConfig {
    pub response_mime_type: String,
    pub response_schema: &'static Value,
}

impl GenerateContentRequest {
    /// A single user turn carrying `prompt`, constrained to the domain-model schema.
    pub fn new(prompt: String) -> Self {
        Self {
            contents: vec![Content {
                role: "user".to_string(),
                parts: vec![Part { text: prompt }],
            }],
            generation_config: GenerationConfig {
                response_mime_type: "application/json".to_string(),
                response_schema: contexta_core::schema::response_schema(),
            },
        }
    }
}

// --- Transport ---

/// One request out, one JSON envelope back. Implementations make exactly one
/// attempt per call.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(&self, request: &GenerateContentRequest) -> Result<Value, GenerateError>;
}

/// Gemini `generateContent` over HTTPS.
pub struct GeminiTransport {
    client: reqwest::Client,
    settings: AiSettings,
}

impl GeminiTransport {
    /// Builds without checking the key; an empty key fails at call time.
    pub fn new(settings: AiSettings) -> Result<Self, GenerateError> {
        let client = reqwest::Client::builder()
            .build()
            .map_err(|e| GenerateError::Transport(format!("build HTTP client: {e}")))?;
        Ok(Self { client, settings })
    }

    pub fn settings(&self) -> &AiSettings {
        &self.settings
    }
}

#[async_trait]
impl Transport for GeminiTransport {
    async fn send(&self, request: &GenerateContentRequest) -> Result<Value, GenerateError> {
        tracing::debug!(url = %self.settings.redacted_url(), "sending generation request");

        // reqwest errors embed the URL, which carries the key
        let response = self
            .client
            .post(self.settings.request_url())
            .json(request)
            .send()
            .await
            .map_err(|e| {
                let e = e.without_url();
                tracing::error!("generation request failed: {e}");
                GenerateError::Transport(e.to_string())
            })?;

        let status = response.status();
        let body = response.text().await.map_err(|e| {
            let e = e.without_url();
            tracing::error!("reading generation response failed: {e}");
            GenerateError::Transport(e.to_string())
        })?;
        tracing::debug!(%status, bytes = body.len(), "generation response received");

        if !status.is_success() {
            tracing::error!(%status, body = %body, "generation endpoint rejected the request");
            return Err(GenerateError::UnexpectedStructure);
        }

        serde_json::from_str(&body).map_err(|e| {
            tracing::error!(body = %body, "response envelope is not JSON: {e}");
            GenerateError::UnexpectedStructure
        })
    }
}
