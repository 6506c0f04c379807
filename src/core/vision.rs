//! The seam between the card pipeline and the external vision model.
//!
//! [`VisionModel`] is the whole contract the pipeline relies on: an
//! instruction, an optional image, a temperature and a credential go in;
//! free text comes out. [`GeminiClient`] is the production implementation
//! against the Generative Language `generateContent` endpoint.

use std::time::Duration;

use tracing::debug;

use crate::api::{
    ApiErrorResponse, GenerateContentRequest, GenerateContentResponse, GenerationConfig,
    InlineData, RequestContent, RequestPart,
};
use crate::core::error::TransportError;
use crate::core::photo::Photo;
use crate::utils::url::model_action_url;

/// One call to the model.
#[derive(Debug, Clone, Copy)]
pub struct VisionRequest<'a> {
    pub instruction: &'a str,
    pub image: Option<&'a Photo>,
    pub temperature: f32,
    pub credential: &'a str,
}

#[async_trait::async_trait]
pub trait VisionModel: Send + Sync {
    /// Send the request and return the model's raw text. No retries.
    async fn generate_text(&self, request: VisionRequest<'_>) -> Result<String, TransportError>;
}

#[derive(Debug, Clone)]
pub struct GeminiClient {
    client: reqwest::Client,
    base_url: String,
    model: String,
}

impl GeminiClient {
    pub fn new(
        base_url: impl Into<String>,
        model: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self::with_client(client, base_url, model))
    }

    pub fn with_client(
        client: reqwest::Client,
        base_url: impl Into<String>,
        model: impl Into<String>,
    ) -> Self {
        Self {
            client,
            base_url: base_url.into(),
            model: model.into(),
        }
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn build_request(request: &VisionRequest<'_>) -> GenerateContentRequest {
        let mut parts = vec![RequestPart::Text {
            text: request.instruction.to_string(),
        }];
        if let Some(photo) = request.image {
            parts.push(RequestPart::Inline {
                inline_data: InlineData {
                    mime_type: photo.mime_type.clone(),
                    data: photo.to_base64(),
                },
            });
        }

        GenerateContentRequest {
            contents: vec![RequestContent {
                role: "user".to_string(),
                parts,
            }],
            generation_config: GenerationConfig {
                temperature: request.temperature,
            },
        }
    }
}

#[async_trait::async_trait]
impl VisionModel for GeminiClient {
    async fn generate_text(&self, request: VisionRequest<'_>) -> Result<String, TransportError> {
        let url = model_action_url(&self.base_url, &self.model, "generateContent");
        let body = Self::build_request(&request);
        debug!(
            model = %self.model,
            has_image = request.image.is_some(),
            "sending generateContent request"
        );

        let response = self
            .client
            .post(url)
            .header("x-goog-api-key", request.credential)
            .json(&body)
            .send()
            .await
            .map_err(TransportError::from_reqwest)?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "<no body>".to_string());
            return Err(TransportError::Status {
                status: status.as_u16(),
                message: provider_error_message(&error_text, status),
            });
        }

        let parsed: GenerateContentResponse = response
            .json()
            .await
            .map_err(TransportError::from_reqwest)?;

        match parsed.first_text() {
            Some(text) => Ok(text),
            None => Err(TransportError::EmptyCandidates {
                finish_reason: parsed
                    .candidates
                    .first()
                    .and_then(|candidate| candidate.finish_reason.clone()),
            }),
        }
    }
}

/// Prefer the provider's `error.message`, then the raw body, then the
/// canonical reason phrase.
fn provider_error_message(body: &str, status: reqwest::StatusCode) -> String {
    if let Ok(envelope) = serde_json::from_str::<ApiErrorResponse>(body) {
        if let Some(message) = envelope.error.message.filter(|m| !m.trim().is_empty()) {
            return message;
        }
    }
    let trimmed = body.trim();
    if !trimmed.is_empty() {
        return trimmed.to_string();
    }
    status
        .canonical_reason()
        .unwrap_or("unknown error")
        .to_string()
}
