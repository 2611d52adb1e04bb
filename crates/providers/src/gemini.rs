//! Gemini `generateContent` dispatcher.
//!
//! Sends one completion request per call:
//!
//! ```text
//! POST {base_url}/models/{model}:generateContent
//! x-goog-api-key: {credential}
//! {"contents":[{"parts":[{"text":"<persona><user text>"}]}]}
//! ```
//!
//! and extracts `candidates[0].content.parts[0].text` from the reply. Any
//! other shape is a [`DispatchError`]. The credential travels in a header and
//! error messages never carry the request URL, so it cannot end up in logs.

use async_trait::async_trait;
use herald_core::Dispatcher;
use herald_core::error::DispatchError;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, warn};

const API_KEY_HEADER: &str = "x-goog-api-key";

/// Default per-request timeout of the HTTP client.
const DEFAULT_HTTP_TIMEOUT: Duration = Duration::from_secs(30);

/// A dispatcher backed by Google's Generative Language API.
pub struct GeminiDispatcher {
    base_url: String,
    model: String,
    persona: String,
    client: reqwest::Client,
}

impl GeminiDispatcher {
    pub fn new(
        base_url: impl Into<String>,
        model: impl Into<String>,
        persona: impl Into<String>,
    ) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            model: model.into(),
            persona: persona.into(),
            client: build_client(DEFAULT_HTTP_TIMEOUT),
        }
    }

    /// Bound every HTTP request made by this dispatcher.
    pub fn with_http_timeout(mut self, timeout: Duration) -> Self {
        self.client = build_client(timeout);
        self
    }

    fn endpoint(&self) -> String {
        format!("{}/models/{}:generateContent", self.base_url, self.model)
    }

    /// The persona preamble followed by the raw user text.
    fn prompt(&self, text: &str) -> String {
        format!("{}{}", self.persona, text)
    }

    fn request_body(&self, text: &str) -> GenerateRequest {
        GenerateRequest {
            contents: vec![Content {
                parts: vec![Part {
                    text: self.prompt(text),
                }],
            }],
        }
    }

    /// Pull the first candidate's first part out of a response.
    fn first_candidate_text(response: GenerateResponse) -> Result<String, DispatchError> {
        let candidate = response
            .candidates
            .into_iter()
            .next()
            .ok_or(DispatchError::EmptyCandidates)?;

        candidate
            .content
            .parts
            .into_iter()
            .next()
            .map(|p| p.text)
            .ok_or_else(|| DispatchError::Malformed("first candidate has no parts".into()))
    }
}

fn build_client(timeout: Duration) -> reqwest::Client {
    reqwest::Client::builder()
        .timeout(timeout)
        .build()
        .unwrap_or_else(|e| {
            warn!(error = %e, "Falling back to default HTTP client");
            reqwest::Client::new()
        })
}

#[async_trait]
impl Dispatcher for GeminiDispatcher {
    fn name(&self) -> &str {
        "gemini"
    }

    async fn dispatch(&self, text: &str, credential: &str) -> Result<String, DispatchError> {
        debug!(model = %self.model, chars = text.len(), "Sending generateContent request");

        let response = self
            .client
            .post(self.endpoint())
            .header(API_KEY_HEADER, credential)
            .json(&self.request_body(text))
            .send()
            .await
            .map_err(|e| DispatchError::Transport(e.without_url().to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!(status = status.as_u16(), body = %body, "Backend returned error");
            return Err(DispatchError::Api {
                status_code: status.as_u16(),
                message: body,
            });
        }

        let parsed: GenerateResponse = response
            .json()
            .await
            .map_err(|e| DispatchError::Malformed(e.without_url().to_string()))?;

        Self::first_candidate_text(parsed)
    }
}

// --- Wire types ---

#[derive(Debug, Serialize, Deserialize)]
struct GenerateRequest {
    contents: Vec<Content>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Part {
    text: String,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Content,
}
