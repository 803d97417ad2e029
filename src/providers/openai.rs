//! OpenAI Responses API client for image analysis.
//!
//! See: <https://platform.openai.com/docs/api-reference/responses>

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use super::traits::VisionProvider;
use crate::types::{ContentPart, ContentPayload, ProviderOutput, Usage};
use crate::{Result, ScannerError};

/// Default base URL for the OpenAI API
pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

/// Default request timeout. Vision calls on reasoning models are slow.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(120);

/// Client for the OpenAI Responses API.
#[derive(Clone)]
pub struct OpenAiClient {
    api_key: String,
    http: Client,
    base_url: String,
}

impl OpenAiClient {
    /// Create a client against the public API.
    pub fn new(api_key: impl Into<String>) -> Result<Self> {
        Self::with_options(api_key, DEFAULT_BASE_URL, DEFAULT_TIMEOUT)
    }

    /// Create a client with a custom base URL (proxies, wiremock).
    pub fn with_base_url(api_key: impl Into<String>, base_url: impl Into<String>) -> Result<Self> {
        Self::with_options(api_key, base_url, DEFAULT_TIMEOUT)
    }

    pub fn with_options(
        api_key: impl Into<String>,
        base_url: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self> {
        let http = Client::builder().timeout(timeout).build().map_err(|e| {
            ScannerError::Configuration(format!("failed to build HTTP client: {e}"))
        })?;

        Ok(Self {
            api_key: api_key.into(),
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    /// Send one user message and collect the output text.
    pub async fn create_response(
        &self,
        content: &ContentPayload,
        model: &str,
    ) -> Result<ProviderOutput> {
        let url = format!("{}/responses", self.base_url);
        let request = ResponsesRequest {
            model,
            input: [InputMessage {
                role: "user",
                content: content.parts.iter().map(InputPart::from).collect(),
            }],
        };

        let response = self
            .http
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await?;

        let response = check_status(response, model).await?;
        let body: ResponsesResponse = response.json().await?;

        let text = body.output_text();
        if text.trim().is_empty() {
            return Err(ScannerError::EmptyResponse);
        }

        let usage = body
            .usage
            .map(|u| Usage {
                input_tokens: u.input_tokens,
                output_tokens: u.output_tokens,
            })
            .unwrap_or_default();

        Ok(ProviderOutput { text, usage })
    }
}

/// Map non-success statuses to scanner errors.
async fn check_status(response: reqwest::Response, model: &str) -> Result<reqwest::Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    match status.as_u16() {
        401 => Err(ScannerError::AuthenticationFailed),
        404 => Err(ScannerError::ModelNotFound(model.to_string())),
        429 => {
            let retry_after = response
                .headers()
                .get("retry-after")
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.parse::<u64>().ok())
                .map(Duration::from_secs);
            Err(ScannerError::RateLimited { retry_after })
        }
        code => {
            // Prefer the API's own message when the body carries one.
            let body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ErrorEnvelope>(&body)
                .map(|e| e.error.message)
                .unwrap_or_else(|_| format!("OpenAI API error: {status}"));
            Err(ScannerError::Api {
                status: code,
                message,
            })
        }
    }
}

#[derive(Serialize)]
struct ResponsesRequest<'a> {
    model: &'a str,
    input: [InputMessage<'a>; 1],
}

#[derive(Serialize)]
struct InputMessage<'a> {
    role: &'static str,
    content: Vec<InputPart<'a>>,
}

#[derive(Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum InputPart<'a> {
    InputImage { image_url: &'a str },
    InputText { text: &'a str },
}

impl<'a> From<&'a ContentPart> for InputPart<'a> {
    fn from(part: &'a ContentPart) -> Self {
        match part {
            ContentPart::Image { url } => InputPart::InputImage { image_url: url },
            ContentPart::Text { text } => InputPart::InputText { text },
        }
    }
}

#[derive(Deserialize)]
struct ResponsesResponse {
    #[serde(default)]
    output: Vec<OutputItem>,
    #[serde(default)]
    usage: Option<ResponsesUsage>,
}

impl ResponsesResponse {
    /// Concatenated text of every `output_text` part of every message.
    fn output_text(&self) -> String {
        self.output
            .iter()
            .filter(|item| item.kind == "message")
            .flat_map(|item| item.content.iter())
            .filter(|c| c.kind == "output_text")
            .filter_map(|c| c.text.as_deref())
            .collect()
    }
}

#[derive(Deserialize)]
struct OutputItem {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    content: Vec<OutputContent>,
}

#[derive(Deserialize)]
struct OutputContent {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    text: Option<String>,
}

#[derive(Deserialize)]
struct ResponsesUsage {
    input_tokens: u64,
    output_tokens: u64,
}

#[derive(Deserialize)]
struct ErrorEnvelope {
    error: ErrorDetail,
}

#[derive(Deserialize)]
struct ErrorDetail {
    message: String,
}

#[async_trait]
impl VisionProvider for OpenAiClient {
    fn name(&self) -> &str {
        "openai"
    }

    async fn complete(&self, content: &ContentPayload, model: &str) -> Result<ProviderOutput> {
        self.create_response(content, model).await
    }
}
