// SPDX-FileCopyrightText: 2026 MindMate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP client for the Chat Completions API.
//!
//! Provides [`OpenAiClient`] which handles request construction and bearer
//! authentication. One attempt per call: the companion answers with a
//! degraded reply instead of retrying.

use std::time::Duration;

use mindmate_core::{Credential, MindmateError};
use reqwest::header::{HeaderMap, HeaderValue};
use tracing::debug;

use crate::types::{ApiErrorResponse, ChatCompletionRequest, ChatCompletionResponse};

/// HTTP client for Chat Completions API communication.
#[derive(Debug, Clone)]
pub struct OpenAiClient {
    client: reqwest::Client,
    endpoint: String,
}

impl OpenAiClient {
    /// Creates a new client.
    ///
    /// # Arguments
    /// * `base_url` - API root; `/chat/completions` is appended
    /// * `timeout` - transport-level bound on a single request
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, MindmateError> {
        let mut headers = HeaderMap::new();
        headers.insert("content-type", HeaderValue::from_static("application/json"));

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(timeout)
            .build()
            .map_err(|e| MindmateError::Provider {
                message: format!("failed to build HTTP client: {e}"),
                source: Some(Box::new(e)),
            })?;

        Ok(Self {
            client,
            endpoint: format!("{}/chat/completions", base_url.trim_end_matches('/')),
        })
    }

    /// Returns the full endpoint URL requests are posted to.
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Sends a completion request and returns the parsed response.
    pub async fn complete_chat(
        &self,
        request: &ChatCompletionRequest,
        credential: &Credential,
    ) -> Result<ChatCompletionResponse, MindmateError> {
        let auth = HeaderValue::from_str(&format!("Bearer {}", credential.expose()))
            .map_err(|e| MindmateError::Credential {
                message: format!("API key is not a valid header value: {e}"),
                source: None,
            })?;

        let response = self
            .client
            .post(&self.endpoint)
            .header(reqwest::header::AUTHORIZATION, auth)
            .json(request)
            .send()
            .await
            .map_err(|e| {
                let what = if e.is_timeout() {
                    "request timed out"
                } else {
                    "HTTP request failed"
                };
                MindmateError::Provider {
                    message: format!("{what}: {e}"),
                    source: Some(Box::new(e)),
                }
            })?;

        let status = response.status();
        debug!(status = %status, model = %request.model, "completion response received");

        let body = response.text().await.map_err(|e| MindmateError::Provider {
            message: format!("failed to read response body: {e}"),
            source: Some(Box::new(e)),
        })?;

        if !status.is_success() {
            let message = match serde_json::from_str::<ApiErrorResponse>(&body) {
                Ok(api_err) => format!(
                    "API error ({}): {}",
                    api_err.error.type_.as_deref().unwrap_or("unknown"),
                    api_err.error.message
                ),
                Err(_) => format!("API returned {status}: {body}"),
            };
            return Err(MindmateError::provider(message));
        }

        serde_json::from_str(&body).map_err(|e| MindmateError::Provider {
            message: format!("failed to parse API response: {e}"),
            source: Some(Box::new(e)),
        })
    }
}
