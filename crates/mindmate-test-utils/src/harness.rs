// SPDX-FileCopyrightText: 2026 MindMate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test harness for end-to-end integration testing.
//!
//! `TestHarness` assembles a [`ChatController`] wired to a [`MockProvider`]
//! with a seeded random source and no typing delay. Provides
//! `send_message()` to drive the full chat pipeline in tests.

use std::sync::Arc;
use std::time::Duration;

use mindmate_agent::{ChatController, SubmitOutcome};
use mindmate_config::MindmateConfig;
use mindmate_core::{CompletionProvider, Credential, Message};
use rand::SeedableRng;
use rand::rngs::StdRng;

use crate::mock_provider::MockProvider;

/// Builder for creating test environments with configurable options.
pub struct TestHarnessBuilder {
    provider: MockProvider,
    credential: Option<String>,
    system_prompt: Option<String>,
    window_size: Option<usize>,
    timeout: Option<Duration>,
    seed: u64,
}

impl TestHarnessBuilder {
    fn new() -> Self {
        Self {
            provider: MockProvider::new(),
            credential: None,
            system_prompt: None,
            window_size: None,
            timeout: None,
            seed: 42,
        }
    }

    /// Use a pre-configured mock provider.
    pub fn with_provider(mut self, provider: MockProvider) -> Self {
        self.provider = provider;
        self
    }

    /// Start the chat with this credential set.
    pub fn with_credential(mut self, key: impl Into<String>) -> Self {
        self.credential = Some(key.into());
        self
    }

    /// Set a custom persona prompt.
    pub fn with_system_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.system_prompt = Some(prompt.into());
        self
    }

    /// Set the context window bound.
    pub fn with_window_size(mut self, size: usize) -> Self {
        self.window_size = Some(size);
        self
    }

    /// Bound remote calls by `timeout` instead of the configured seconds.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Seed for local reply selection.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Build the harness.
    pub fn build(self) -> TestHarness {
        let mut config = MindmateConfig::default();
        config.chat.typing_delay_ms = 0;
        if let Some(size) = self.window_size {
            config.context.window_size = size;
        }

        let mock_provider = Arc::new(self.provider);
        let system_prompt = self
            .system_prompt
            .unwrap_or_else(|| "You are a test companion.".to_string());

        let mut controller = ChatController::from_config(
            &config,
            Some(mock_provider.clone() as Arc<dyn CompletionProvider>),
            system_prompt,
        )
        .with_rng(StdRng::seed_from_u64(self.seed))
        .with_credential(self.credential.and_then(Credential::new));

        if let Some(timeout) = self.timeout {
            controller = controller.with_remote_timeout(timeout);
        }

        TestHarness {
            mock_provider,
            controller,
            config,
        }
    }
}

/// A complete chat stack for end-to-end tests.
pub struct TestHarness {
    /// The mock provider, for asserting calls and captured requests.
    pub mock_provider: Arc<MockProvider>,
    /// The controller under test.
    pub controller: ChatController,
    /// Config used to build the controller.
    pub config: MindmateConfig,
}

impl TestHarness {
    /// Create a new builder.
    pub fn builder() -> TestHarnessBuilder {
        TestHarnessBuilder::new()
    }

    /// Submit a message through the full chat pipeline.
    pub async fn send_message(&mut self, text: &str) -> SubmitOutcome {
        self.controller.submit(text).await
    }

    /// The full message log, greeting included.
    pub fn messages(&self) -> &[Message] {
        self.controller.messages()
    }

    /// Rendered context window lines, oldest first.
    pub fn context_lines(&self) -> Vec<String> {
        self.controller
            .context()
            .lines()
            .into_iter()
            .map(str::to_string)
            .collect()
    }
}
