// SPDX-FileCopyrightText: 2026 MindMate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mock completion provider for deterministic testing.
//!
//! `MockProvider` implements `CompletionProvider` with pre-configured
//! outcomes, enabling fast, CI-runnable tests without external API calls.

use std::collections::VecDeque;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use mindmate_core::{
    CompletionProvider, CompletionRequest, CompletionResponse, Credential, MindmateError,
};

/// One queued provider outcome.
#[derive(Debug, Clone)]
enum MockOutcome {
    Reply(Option<String>),
    Failure(String),
}

/// A mock provider that returns queued replies or failures.
///
/// Outcomes are popped from a FIFO queue. When the queue is empty,
/// a default "mock reply" text is returned. Every call is counted and its
/// request captured, whatever the outcome.
pub struct MockProvider {
    outcomes: Mutex<VecDeque<MockOutcome>>,
    requests: Mutex<Vec<CompletionRequest>>,
    credentials: Mutex<Vec<String>>,
    calls: AtomicUsize,
    delay: Option<Duration>,
}

impl MockProvider {
    /// Create a new mock provider with an empty queue.
    pub fn new() -> Self {
        Self {
            outcomes: Mutex::new(VecDeque::new()),
            requests: Mutex::new(Vec::new()),
            credentials: Mutex::new(Vec::new()),
            calls: AtomicUsize::new(0),
            delay: None,
        }
    }

    /// Create a mock provider pre-loaded with the given replies.
    pub fn with_replies<I, S>(replies: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        replies
            .into_iter()
            .fold(Self::new(), |provider, reply| provider.with_reply(reply))
    }

    /// Queue a successful reply.
    pub fn with_reply(self, text: impl Into<String>) -> Self {
        self.push(MockOutcome::Reply(Some(text.into())));
        self
    }

    /// Queue a successful response that carries no choice.
    pub fn with_empty_reply(self) -> Self {
        self.push(MockOutcome::Reply(None));
        self
    }

    /// Queue a provider error.
    pub fn with_failure(self, message: impl Into<String>) -> Self {
        self.push(MockOutcome::Failure(message.into()));
        self
    }

    /// Sleep this long before answering each call.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Number of `complete` calls received so far.
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Requests received, oldest first.
    pub fn requests(&self) -> Vec<CompletionRequest> {
        lock(&self.requests).clone()
    }

    /// Credential value of the most recent call.
    pub fn last_credential(&self) -> Option<String> {
        lock(&self.credentials).last().cloned()
    }

    fn push(&self, outcome: MockOutcome) {
        lock(&self.outcomes).push_back(outcome);
    }

    fn next_outcome(&self) -> MockOutcome {
        lock(&self.outcomes)
            .pop_front()
            .unwrap_or_else(|| MockOutcome::Reply(Some("mock reply".to_string())))
    }
}

impl Default for MockProvider {
    fn default() -> Self {
        Self::new()
    }
}

fn lock<T>(mutex: &Mutex<T>) -> std::sync::MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

#[async_trait]
impl CompletionProvider for MockProvider {
    fn name(&self) -> &str {
        "mock-provider"
    }

    async fn complete(
        &self,
        request: CompletionRequest,
        credential: &Credential,
    ) -> Result<CompletionResponse, MindmateError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        lock(&self.credentials).push(credential.expose().to_string());
        let model = request.model.clone();
        lock(&self.requests).push(request);
        let outcome = self.next_outcome();

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        match outcome {
            MockOutcome::Reply(content) => Ok(CompletionResponse { content, model }),
            MockOutcome::Failure(message) => Err(MindmateError::provider(message)),
        }
    }
}
