// SPDX-FileCopyrightText: 2026 MindMate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Chat Completions provider for the MindMate companion.
//!
//! This crate implements [`CompletionProvider`] for any endpoint speaking
//! the OpenAI Chat Completions wire format.

pub mod client;
pub mod types;

use std::time::Duration;

use async_trait::async_trait;
use mindmate_config::model::OpenAiConfig;
use mindmate_core::{
    CompletionProvider, CompletionRequest, CompletionResponse, Credential, MindmateError,
};
use tracing::info;

use crate::client::OpenAiClient;
use crate::types::{ChatCompletionRequest, ChatMessage};

/// Chat Completions provider implementing [`CompletionProvider`].
pub struct OpenAiProvider {
    client: OpenAiClient,
}

impl OpenAiProvider {
    /// Creates a provider from the `[openai]` configuration section.
    pub fn new(config: &OpenAiConfig) -> Result<Self, MindmateError> {
        let client = OpenAiClient::new(
            &config.base_url,
            Duration::from_secs(config.timeout_secs),
        )?;

        info!(
            endpoint = client.endpoint(),
            model = %config.model,
            "chat completion provider initialized"
        );

        Ok(Self { client })
    }

    /// Creates a provider with an existing client.
    pub fn with_client(client: OpenAiClient) -> Self {
        Self { client }
    }

    fn to_chat_request(request: CompletionRequest) -> ChatCompletionRequest {
        ChatCompletionRequest {
            model: request.model,
            messages: request
                .turns
                .into_iter()
                .map(|turn| ChatMessage {
                    role: turn.role.to_string(),
                    content: Some(turn.content),
                })
                .collect(),
            temperature: request.temperature,
            max_tokens: request.max_tokens,
        }
    }
}

#[async_trait]
impl CompletionProvider for OpenAiProvider {
    fn name(&self) -> &str {
        "openai"
    }

    async fn complete(
        &self,
        request: CompletionRequest,
        credential: &Credential,
    ) -> Result<CompletionResponse, MindmateError> {
        let model = request.model.clone();
        let api_request = Self::to_chat_request(request);
        let response = self.client.complete_chat(&api_request, credential).await?;

        Ok(CompletionResponse {
            content: response.first_content().map(str::to_string),
            model: response.model.unwrap_or(model),
        })
    }
}
