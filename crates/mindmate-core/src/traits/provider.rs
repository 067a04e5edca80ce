// SPDX-FileCopyrightText: 2026 MindMate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Provider trait for remote chat-completion integrations.

use async_trait::async_trait;

use crate::error::MindmateError;
use crate::types::{CompletionRequest, CompletionResponse, Credential};

/// A remote chat-completion service.
///
/// The credential is passed on every call rather than captured at
/// construction so that a key entered mid-session takes effect on the
/// next message.
#[async_trait]
pub trait CompletionProvider: Send + Sync + 'static {
    /// Returns the human-readable name of this provider.
    fn name(&self) -> &str;

    /// Sends a single completion request and returns the response.
    async fn complete(
        &self,
        request: CompletionRequest,
        credential: &Credential,
    ) -> Result<CompletionResponse, MindmateError>;
}
