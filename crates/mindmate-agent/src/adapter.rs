// SPDX-FileCopyrightText: 2026 MindMate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Remote completion adapter with local fallback.
//!
//! [`CompletionAdapter::complete`] always produces a displayable [`Reply`]:
//! - no credential: a reply drawn from the local response table
//! - credential: one bounded call to the [`CompletionProvider`]
//! - any provider failure, timeout or cancellation: a fixed degraded reply
//!
//! Errors never cross this boundary.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use mindmate_config::model::OpenAiConfig;
use mindmate_core::{
    CompletionProvider, CompletionRequest, CompletionTurn, Credential, MindmateError, Reply,
    ReplyOrigin, Sender, Sentiment, TurnRole,
};
use mindmate_sentiment::{ResponseSelector, SentimentClassifier};
use rand::Rng;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::context::ContextWindow;

/// Reply shown when the remote call fails.
pub const DEGRADED_REPLY: &str =
    "I'm having trouble connecting right now. Please try again in a moment, I'm still here to listen.";

/// Reply shown when the remote call succeeds without any reply text.
pub const PLACEHOLDER_REPLY: &str = "I'm not sure how to respond to that.";

/// Request parameters attached to every remote completion.
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionSettings {
    pub model: String,
    pub temperature: f32,
    pub max_tokens: u32,
    pub timeout: Duration,
}

impl CompletionSettings {
    pub fn from_config(config: &OpenAiConfig) -> Self {
        Self {
            model: config.model.clone(),
            temperature: config.temperature,
            max_tokens: config.max_tokens,
            timeout: Duration::from_secs(config.timeout_secs),
        }
    }
}

impl Default for CompletionSettings {
    fn default() -> Self {
        Self::from_config(&OpenAiConfig::default())
    }
}

/// Interrupts the remote call in flight without affecting later calls.
///
/// Each remote call runs under a fresh child of the adapter's shutdown
/// token; [`interrupt`](Self::interrupt) cancels only that child.
#[derive(Debug, Clone, Default)]
pub struct InterruptHandle {
    current: Arc<Mutex<CancellationToken>>,
}

impl InterruptHandle {
    /// Cancels the call in flight. A no-op when nothing is pending.
    pub fn interrupt(&self) {
        self.slot().cancel();
    }

    /// Installs and returns the token for a new call.
    fn begin(&self, shutdown: &CancellationToken) -> CancellationToken {
        let token = shutdown.child_token();
        *self.slot() = token.clone();
        token
    }

    fn slot(&self) -> std::sync::MutexGuard<'_, CancellationToken> {
        self.current
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

/// Routes a user message to the remote provider or the local response table.
pub struct CompletionAdapter {
    provider: Option<Arc<dyn CompletionProvider>>,
    system_prompt: String,
    settings: CompletionSettings,
    classifier: SentimentClassifier,
    selector: ResponseSelector,
    shutdown: CancellationToken,
    in_flight: InterruptHandle,
}

impl CompletionAdapter {
    /// Creates an adapter. Without a provider every reply is local.
    pub fn new(
        provider: Option<Arc<dyn CompletionProvider>>,
        system_prompt: impl Into<String>,
        settings: CompletionSettings,
    ) -> Self {
        Self {
            provider,
            system_prompt: system_prompt.into(),
            settings,
            classifier: SentimentClassifier::new(),
            selector: ResponseSelector::new(),
            shutdown: CancellationToken::new(),
            in_flight: InterruptHandle::default(),
        }
    }

    /// Ties remote calls to a shutdown token.
    ///
    /// Once `token` is cancelled every later remote call also degrades.
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.shutdown = token;
        self
    }

    /// Handle for interrupting the remote call in flight.
    pub fn interrupt_handle(&self) -> InterruptHandle {
        self.in_flight.clone()
    }

    /// Overrides the bound on a single remote call.
    pub fn set_timeout(&mut self, timeout: Duration) {
        self.settings.timeout = timeout;
    }

    /// Tags a message with the adapter's classifier.
    pub fn classify(&self, text: &str) -> Sentiment {
        self.classifier.classify(text)
    }

    /// Produces a reply for `user_message`.
    ///
    /// `history` is the context window; when its newest entry is this same
    /// user message it is not sent twice. The reply's sentiment is the
    /// locally computed tag of the user message, except for degraded
    /// replies which are neutral.
    pub async fn complete<R: Rng + ?Sized>(
        &self,
        user_message: &str,
        history: &ContextWindow,
        credential: Option<&Credential>,
        rng: &mut R,
    ) -> Reply {
        let sentiment = self.classify(user_message);

        let (provider, credential) = match (&self.provider, credential) {
            (Some(provider), Some(credential)) => (provider, credential),
            _ => {
                debug!(%sentiment, "no credential, answering locally");
                return Reply {
                    content: self.selector.select(Some(sentiment), rng).to_string(),
                    sentiment,
                    origin: ReplyOrigin::Local,
                };
            }
        };

        let request = self.build_request(user_message, history);
        match self.call(provider.as_ref(), request, credential).await {
            Ok(content) => Reply {
                content: content
                    .filter(|c| !c.trim().is_empty())
                    .unwrap_or_else(|| PLACEHOLDER_REPLY.to_string()),
                sentiment,
                origin: ReplyOrigin::Remote,
            },
            Err(e) => {
                warn!(provider = provider.name(), error = %e, "remote completion failed, sending degraded reply");
                Reply {
                    content: DEGRADED_REPLY.to_string(),
                    sentiment: Sentiment::Neutral,
                    origin: ReplyOrigin::Degraded,
                }
            }
        }
    }

    /// Assembles persona, history turns and the new message, in that order.
    pub fn build_request(&self, user_message: &str, history: &ContextWindow) -> CompletionRequest {
        let mut turns = Vec::with_capacity(history.len() + 2);
        turns.push(CompletionTurn::new(TurnRole::System, self.system_prompt.clone()));

        let mut history_turns = history.to_turns();
        if let Some(last) = history.last()
            && last.sender == Sender::User
            && last.text == user_message
        {
            history_turns.pop();
        }
        turns.extend(history_turns);
        turns.push(CompletionTurn::new(TurnRole::User, user_message));

        CompletionRequest {
            model: self.settings.model.clone(),
            turns,
            temperature: self.settings.temperature,
            max_tokens: self.settings.max_tokens,
        }
    }

    async fn call(
        &self,
        provider: &dyn CompletionProvider,
        request: CompletionRequest,
        credential: &Credential,
    ) -> Result<Option<String>, MindmateError> {
        let timeout = self.settings.timeout;
        debug!(
            provider = provider.name(),
            model = %request.model,
            turns = request.turns.len(),
            "sending remote completion"
        );

        let cancel = self.in_flight.begin(&self.shutdown);
        let response = tokio::select! {
            biased;
            _ = cancel.cancelled() => Err(MindmateError::Cancelled),
            result = tokio::time::timeout(timeout, provider.complete(request, credential)) => {
                match result {
                    Ok(response) => response,
                    Err(_) => Err(MindmateError::Timeout { duration: timeout }),
                }
            }
        }?;

        debug!(model = %response.model, "remote completion received");
        Ok(response.content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mindmate_sentiment::responses::{NEGATIVE_RESPONSES, NEUTRAL_RESPONSES};
    use mindmate_test_utils::MockProvider;
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use tracing_test::traced_test;

    fn adapter(provider: Arc<MockProvider>) -> CompletionAdapter {
        CompletionAdapter::new(
            Some(provider as Arc<dyn CompletionProvider>),
            "be kind",
            CompletionSettings {
                timeout: Duration::from_millis(200),
                ..CompletionSettings::default()
            },
        )
    }

    fn key() -> Credential {
        Credential::new("sk-test").unwrap()
    }

    fn rng() -> StdRng {
        StdRng::seed_from_u64(3)
    }

    #[tokio::test]
    async fn no_credential_never_calls_provider() {
        let provider = Arc::new(MockProvider::new());
        let adapter = adapter(provider.clone());
        let window = ContextWindow::new("Lovable", 10);

        let reply = adapter
            .complete("I feel sad and alone", &window, None, &mut rng())
            .await;

        assert_eq!(provider.call_count(), 0);
        assert_eq!(reply.origin, ReplyOrigin::Local);
        assert_eq!(reply.sentiment, Sentiment::Negative);
        assert!(NEGATIVE_RESPONSES.contains(&reply.content.as_str()));
    }

    #[tokio::test]
    async fn no_provider_answers_locally_even_with_credential() {
        let adapter = CompletionAdapter::new(None, "p", CompletionSettings::default());
        let window = ContextWindow::new("Lovable", 10);
        let reply = adapter
            .complete("I went to the store", &window, Some(&key()), &mut rng())
            .await;
        assert_eq!(reply.origin, ReplyOrigin::Local);
        assert!(NEUTRAL_RESPONSES.contains(&reply.content.as_str()));
    }

    #[tokio::test]
    async fn remote_success_keeps_local_sentiment() {
        let provider = Arc::new(MockProvider::new().with_reply("I'm here for you."));
        let adapter = adapter(provider.clone());
        let window = ContextWindow::new("Lovable", 10);

        let reply = adapter
            .complete("I'm worried", &window, Some(&key()), &mut rng())
            .await;

        assert_eq!(provider.call_count(), 1);
        assert_eq!(reply.content, "I'm here for you.");
        assert_eq!(reply.sentiment, Sentiment::Negative);
        assert_eq!(reply.origin, ReplyOrigin::Remote);
    }

    #[tokio::test]
    async fn missing_choice_uses_placeholder() {
        let provider = Arc::new(MockProvider::new().with_empty_reply());
        let adapter = adapter(provider);
        let window = ContextWindow::new("Lovable", 10);

        let reply = adapter
            .complete("hello", &window, Some(&key()), &mut rng())
            .await;
        assert_eq!(reply.content, PLACEHOLDER_REPLY);
        assert_eq!(reply.origin, ReplyOrigin::Remote);
    }

    #[tokio::test]
    #[traced_test]
    async fn provider_failure_degrades_and_logs() {
        let provider = Arc::new(MockProvider::new().with_failure("503 overloaded"));
        let adapter = adapter(provider);
        let window = ContextWindow::new("Lovable", 10);

        let reply = adapter
            .complete("I feel happy", &window, Some(&key()), &mut rng())
            .await;

        assert_eq!(reply.content, DEGRADED_REPLY);
        assert_eq!(reply.sentiment, Sentiment::Neutral);
        assert_eq!(reply.origin, ReplyOrigin::Degraded);
        assert!(logs_contain("remote completion failed"));
    }

    #[tokio::test]
    async fn slow_provider_times_out_to_degraded() {
        let provider = Arc::new(
            MockProvider::new()
                .with_reply("too late")
                .with_delay(Duration::from_secs(5)),
        );
        let adapter = adapter(provider);
        let window = ContextWindow::new("Lovable", 10);

        let reply = adapter
            .complete("hello", &window, Some(&key()), &mut rng())
            .await;
        assert_eq!(reply.origin, ReplyOrigin::Degraded);
        assert_eq!(reply.content, DEGRADED_REPLY);
    }

    #[tokio::test]
    async fn cancellation_degrades() {
        let provider = Arc::new(
            MockProvider::new()
                .with_reply("never")
                .with_delay(Duration::from_secs(5)),
        );
        let token = CancellationToken::new();
        let adapter = CompletionAdapter::new(
            Some(provider as Arc<dyn CompletionProvider>),
            "p",
            CompletionSettings::default(),
        )
            .with_cancellation(token.clone());
        let window = ContextWindow::new("Lovable", 10);

        let canceller = tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(20)).await;
            token.cancel();
        });
        let reply = adapter
            .complete("hello", &window, Some(&key()), &mut rng())
            .await;
        canceller.await.unwrap();

        assert_eq!(reply.origin, ReplyOrigin::Degraded);
    }

    #[tokio::test]
    async fn interrupt_degrades_only_the_call_in_flight() {
        let provider = Arc::new(
            MockProvider::with_replies(["never", "second"]).with_delay(Duration::from_millis(50)),
        );
        let adapter = CompletionAdapter::new(
            Some(provider as Arc<dyn CompletionProvider>),
            "p",
            CompletionSettings::default(),
        );
        let handle = adapter.interrupt_handle();
        let window = ContextWindow::new("Lovable", 10);

        let interrupter = tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(10)).await;
            handle.interrupt();
        });
        let first = adapter
            .complete("hello", &window, Some(&key()), &mut rng())
            .await;
        interrupter.await.unwrap();
        assert_eq!(first.origin, ReplyOrigin::Degraded);

        let second = adapter
            .complete("hello", &window, Some(&key()), &mut rng())
            .await;
        assert_eq!(second.origin, ReplyOrigin::Remote);
        assert_eq!(second.content, "second");
    }

    #[tokio::test]
    async fn interrupt_while_idle_does_not_affect_next_call() {
        let provider = Arc::new(MockProvider::with_replies(["fine"]));
        let adapter = adapter(provider);
        adapter.interrupt_handle().interrupt();

        let window = ContextWindow::new("Lovable", 10);
        let reply = adapter
            .complete("hello", &window, Some(&key()), &mut rng())
            .await;
        assert_eq!(reply.origin, ReplyOrigin::Remote);
    }

    #[tokio::test]
    async fn request_has_persona_history_then_message() {
        let provider = Arc::new(MockProvider::new().with_reply("ok"));
        let adapter = adapter(provider.clone());

        let mut window = ContextWindow::new("Lovable", 10);
        window.push_user("first", Sentiment::Neutral);
        window.push_bot("reply one");
        window.push_user("second", Sentiment::Neutral);

        adapter
            .complete("second", &window, Some(&key()), &mut rng())
            .await;

        let requests = provider.requests();
        assert_eq!(requests.len(), 1);
        let request = &requests[0];
        let roles: Vec<_> = request.turns.iter().map(|t| t.role).collect();
        assert_eq!(
            roles,
            vec![TurnRole::System, TurnRole::User, TurnRole::Assistant, TurnRole::User]
        );
        assert_eq!(request.turns[0].content, "be kind");
        assert_eq!(request.turns[3].content, "second");
        assert_eq!(request.model, "gpt-4o-mini");
        assert_eq!(request.max_tokens, 500);
        assert!((request.temperature - 0.7).abs() < f32::EPSILON);
        assert_eq!(provider.last_credential().as_deref(), Some("sk-test"));
    }
}
