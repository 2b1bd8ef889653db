//! Gemini `generateContent` REST backend.

use crate::backend::{GenerateRequest, GenerativeBackend};
use crate::error::GatewayError;
use async_trait::async_trait;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use log::debug;
use rackstock_config::GatewayConfig;
use serde::Deserialize;
use serde_json::{Value, json};

/// Backend talking to `{endpoint}/models/{model}:generateContent`.
#[derive(Debug, Clone)]
pub struct GeminiBackend {
    client: reqwest::Client,
    endpoint: String,
    model: String,
    api_key: String,
}

impl GeminiBackend {
    pub fn new(config: &GatewayConfig, api_key: impl Into<String>) -> Result<Self, GatewayError> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout())
            .build()?;
        Ok(Self {
            client,
            endpoint: config.endpoint.trim_end_matches('/').to_string(),
            model: config.model.clone(),
            api_key: api_key.into(),
        })
    }

    fn url(&self) -> String {
        format!("{}/models/{}:generateContent", self.endpoint, self.model)
    }
}

#[async_trait]
impl GenerativeBackend for GeminiBackend {
    fn name(&self) -> &str {
        &self.model
    }

    async fn generate(&self, request: GenerateRequest) -> Result<String, GatewayError> {
        let body = request_body(&request);
        debug!(
            "sending generate request (model={}, image={}, structured={})",
            self.model,
            request.image.is_some(),
            request.response_schema.is_some()
        );
        let response = self
            .client
            .post(self.url())
            .header("x-goog-api-key", &self.api_key)
            .json(&body)
            .send()
            .await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(GatewayError::Status {
                status: status.as_u16(),
                body,
            });
        }
        let payload: GenerateResponse = response.json().await?;
        Ok(payload.text())
    }
}

/// Build the JSON request body for a generate call.
pub(crate) fn request_body(request: &GenerateRequest) -> Value {
    let mut parts = Vec::new();
    if let Some(image) = &request.image {
        parts.push(json!({
            "inlineData": {
                "mimeType": image.mime_type,
                "data": STANDARD.encode(&image.bytes),
            }
        }));
    }
    parts.push(json!({ "text": request.text }));

    let mut body = json!({
        "contents": [{ "role": "user", "parts": parts }],
    });
    if let Some(instruction) = &request.system_instruction {
        body["systemInstruction"] = json!({ "parts": [{ "text": instruction }] });
    }
    if let Some(schema) = &request.response_schema {
        body["generationConfig"] = json!({
            "responseMimeType": "application/json",
            "responseSchema": schema,
        });
    }
    body
}

/// The subset of a `generateContent` response the gateway reads.
#[derive(Debug, Default, Deserialize)]
pub(crate) struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Default, Deserialize)]
struct Candidate {
    #[serde(default)]
    content: Option<Content>,
}

#[derive(Debug, Default, Deserialize)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Default, Deserialize)]
struct Part {
    #[serde(default)]
    text: Option<String>,
}

impl GenerateResponse {
    /// Concatenate the text parts of the first candidate.
    pub(crate) fn text(&self) -> String {
        self.candidates
            .first()
            .and_then(|candidate| candidate.content.as_ref())
            .map(|content| {
                content
                    .parts
                    .iter()
                    .filter_map(|part| part.text.as_deref())
                    .collect::<String>()
            })
            .unwrap_or_default()
    }
}
