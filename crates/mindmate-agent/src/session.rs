// SPDX-FileCopyrightText: 2026 MindMate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Chat controller FSM that drives a single conversation.
//!
//! Each submission goes through states: Idle -> Composing -> AwaitingReply -> Idle.
//! The current state is published on a [`watch`] channel so a front end can
//! show a typing indicator while a reply is pending.

use std::sync::Arc;
use std::time::Duration;

use mindmate_config::MindmateConfig;
use mindmate_core::{CompletionProvider, Credential, Message, Reply, ReplyOrigin};
use rand::SeedableRng;
use rand::rngs::StdRng;
use tokio::sync::{Mutex, watch};
use tracing::{debug, info};

use crate::adapter::{CompletionAdapter, CompletionSettings, InterruptHandle};
use crate::context::ContextWindow;
use crate::conversation::MessageLog;

/// States in the chat FSM.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChatState {
    /// Waiting for the next submission.
    Idle,
    /// Tagging and recording the user message.
    Composing,
    /// Reply pending from the adapter.
    AwaitingReply,
}

impl std::fmt::Display for ChatState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ChatState::Idle => write!(f, "idle"),
            ChatState::Composing => write!(f, "composing"),
            ChatState::AwaitingReply => write!(f, "awaiting_reply"),
        }
    }
}

/// Result of a [`ChatController::submit`] call.
#[derive(Debug, Clone, PartialEq)]
pub enum SubmitOutcome {
    /// Empty or whitespace-only input; nothing was recorded.
    Ignored,
    /// The user message and the reply that answered it.
    Replied {
        user: Message,
        bot: Message,
        reply: Reply,
    },
}

/// Orchestrates classification, the message log, the context window and the adapter.
pub struct ChatController {
    state_tx: watch::Sender<ChatState>,
    log: MessageLog,
    context: ContextWindow,
    adapter: CompletionAdapter,
    credential: Option<Credential>,
    typing_delay: Duration,
    rng: StdRng,
}

impl ChatController {
    /// Creates a controller whose log starts with `greeting` as the first bot message.
    ///
    /// The greeting is not pushed into the context window.
    pub fn new(adapter: CompletionAdapter, context: ContextWindow, greeting: &str) -> Self {
        let (state_tx, _) = watch::channel(ChatState::Idle);
        let mut log = MessageLog::new();
        log.append(Message::bot(greeting));

        Self {
            state_tx,
            log,
            context,
            adapter,
            credential: None,
            typing_delay: Duration::ZERO,
            rng: StdRng::from_entropy(),
        }
    }

    /// Builds a controller from loaded configuration.
    pub fn from_config(
        config: &MindmateConfig,
        provider: Option<Arc<dyn CompletionProvider>>,
        system_prompt: String,
    ) -> Self {
        let adapter = CompletionAdapter::new(
            provider,
            system_prompt,
            CompletionSettings::from_config(&config.openai),
        );
        let context = ContextWindow::new(&config.companion.name, config.context.window_size);
        Self::new(adapter, context, &config.companion.greeting())
            .with_typing_delay(Duration::from_millis(config.chat.typing_delay_ms))
    }

    /// Sets the simulated typing delay applied before local replies.
    pub fn with_typing_delay(mut self, delay: Duration) -> Self {
        self.typing_delay = delay;
        self
    }

    /// Replaces the random source used for local reply selection.
    pub fn with_rng(mut self, rng: StdRng) -> Self {
        self.rng = rng;
        self
    }

    /// Overrides the bound on a single remote call.
    pub fn with_remote_timeout(mut self, timeout: Duration) -> Self {
        self.adapter.set_timeout(timeout);
        self
    }

    pub fn with_credential(mut self, credential: Option<Credential>) -> Self {
        self.credential = credential;
        self
    }

    /// Current FSM state.
    pub fn state(&self) -> ChatState {
        *self.state_tx.borrow()
    }

    /// Subscribes to state changes.
    pub fn subscribe(&self) -> watch::Receiver<ChatState> {
        self.state_tx.subscribe()
    }

    pub fn messages(&self) -> &[Message] {
        self.log.messages()
    }

    pub fn log(&self) -> &MessageLog {
        &self.log
    }

    pub fn context(&self) -> &ContextWindow {
        &self.context
    }

    pub fn adapter(&self) -> &CompletionAdapter {
        &self.adapter
    }

    /// Handle for interrupting a pending remote reply from another task.
    pub fn interrupt_handle(&self) -> InterruptHandle {
        self.adapter.interrupt_handle()
    }

    pub fn has_credential(&self) -> bool {
        self.credential.is_some()
    }

    /// Installs the credential used for later remote calls.
    pub fn set_credential(&mut self, credential: Credential) {
        self.credential = Some(credential);
        info!("remote completion credential set");
    }

    /// Drops the credential; later replies come from the local table.
    pub fn clear_credential(&mut self) {
        if self.credential.take().is_some() {
            info!("remote completion credential cleared");
        }
    }

    /// Submits a user message and waits for the companion's reply.
    ///
    /// Empty or whitespace-only text is ignored with no state change.
    /// Taking `&mut self` serializes submissions: a second one cannot start
    /// until the first has appended its reply.
    pub async fn submit(&mut self, text: &str) -> SubmitOutcome {
        if text.trim().is_empty() {
            debug!("ignoring empty submission");
            return SubmitOutcome::Ignored;
        }

        self.transition(ChatState::Composing);
        let sentiment = self.adapter.classify(text);
        let user = self.log.append(Message::user(text, sentiment)).clone();
        self.context.push_user(text, sentiment);

        self.transition(ChatState::AwaitingReply);
        let reply = self
            .adapter
            .complete(text, &self.context, self.credential.as_ref(), &mut self.rng)
            .await;

        if reply.origin == ReplyOrigin::Local && !self.typing_delay.is_zero() {
            tokio::time::sleep(self.typing_delay).await;
        }

        let bot = self.log.append(Message::bot(reply.content.clone())).clone();
        self.context.push_bot(&reply.content);
        self.transition(ChatState::Idle);

        debug!(
            sentiment = %sentiment,
            origin = %reply.origin,
            log_len = self.log.len(),
            "submission answered"
        );
        SubmitOutcome::Replied { user, bot, reply }
    }

    fn transition(&self, next: ChatState) {
        let prev = self.state_tx.send_replace(next);
        debug!(from = %prev, to = %next, "chat state transition");
    }
}

/// Cloneable handle that queues concurrent submitters in arrival order.
#[derive(Clone)]
pub struct SharedChat {
    inner: Arc<Mutex<ChatController>>,
    state_rx: watch::Receiver<ChatState>,
}

impl SharedChat {
    pub fn new(controller: ChatController) -> Self {
        let state_rx = controller.subscribe();
        Self {
            inner: Arc::new(Mutex::new(controller)),
            state_rx,
        }
    }

    /// Waits for any in-flight submission, then submits `text`.
    pub async fn submit(&self, text: &str) -> SubmitOutcome {
        self.inner.lock().await.submit(text).await
    }

    /// A receiver for state changes; usable without taking the lock.
    pub fn state(&self) -> watch::Receiver<ChatState> {
        self.state_rx.clone()
    }

    /// Snapshot of the message log.
    pub async fn messages(&self) -> Vec<Message> {
        self.inner.lock().await.messages().to_vec()
    }

    pub async fn set_credential(&self, credential: Credential) {
        self.inner.lock().await.set_credential(credential);
    }

    pub async fn clear_credential(&self) {
        self.inner.lock().await.clear_credential();
    }
}
