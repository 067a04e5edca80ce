// SPDX-FileCopyrightText: 2026 MindMate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Integration tests for the chat controller driven through the test harness.

use std::time::Duration;

use mindmate_agent::{ChatState, DEGRADED_REPLY, SharedChat, SubmitOutcome};
use mindmate_core::{ReplyOrigin, Sender, Sentiment, TurnRole};
use mindmate_test_utils::{MockProvider, TestHarness};

#[tokio::test]
async fn context_window_tracks_both_sides() {
    let mut harness = TestHarness::builder()
        .with_provider(MockProvider::with_replies(["Tell me more."]))
        .with_credential("sk-test")
        .build();

    harness.send_message("I had a great day").await;

    assert_eq!(
        harness.context_lines(),
        vec![
            "User (positive): I had a great day".to_string(),
            "Lovable: Tell me more.".to_string(),
        ]
    );
}

#[tokio::test]
async fn second_request_carries_first_exchange() {
    let mut harness = TestHarness::builder()
        .with_provider(MockProvider::with_replies(["one", "two"]))
        .with_credential("sk-test")
        .with_system_prompt("persona")
        .build();

    harness.send_message("first").await;
    harness.send_message("second").await;

    let requests = harness.mock_provider.requests();
    assert_eq!(requests.len(), 2);
    let turns: Vec<_> = requests[1]
        .turns
        .iter()
        .map(|t| (t.role, t.content.as_str()))
        .collect();
    assert_eq!(
        turns,
        vec![
            (TurnRole::System, "persona"),
            (TurnRole::User, "first"),
            (TurnRole::Assistant, "one"),
            (TurnRole::User, "second"),
        ]
    );
}

#[tokio::test]
async fn window_bound_holds_across_many_turns() {
    let mut harness = TestHarness::builder().with_window_size(4).build();
    for i in 0..10 {
        harness.send_message(&format!("message {i}")).await;
    }
    let lines = harness.context_lines();
    assert_eq!(lines.len(), 4);
    assert_eq!(lines[0], "User (neutral): message 8");
    assert_eq!(lines[2], "User (neutral): message 9");
    assert_eq!(harness.messages().len(), 21);
}

#[tokio::test]
async fn timeout_yields_degraded_reply() {
    let mut harness = TestHarness::builder()
        .with_provider(
            MockProvider::with_replies(["late"]).with_delay(Duration::from_secs(10)),
        )
        .with_credential("sk-test")
        .with_timeout(Duration::from_millis(50))
        .build();

    let SubmitOutcome::Replied { user, bot, reply } = harness.send_message("hello").await else {
        panic!("expected a reply");
    };
    assert_eq!(user.sender, Sender::User);
    assert_eq!(bot.content, DEGRADED_REPLY);
    assert_eq!(reply.origin, ReplyOrigin::Degraded);
    assert_eq!(reply.sentiment, Sentiment::Neutral);
    assert_eq!(harness.controller.state(), ChatState::Idle);
}

#[tokio::test]
async fn shared_chat_serializes_submissions() {
    let harness = TestHarness::builder()
        .with_provider(
            MockProvider::with_replies(["reply a", "reply b"])
                .with_delay(Duration::from_millis(30)),
        )
        .with_credential("sk-test")
        .build();
    let chat = SharedChat::new(harness.controller);

    let (a, b) = tokio::join!(chat.submit("first"), chat.submit("second"));
    assert!(matches!(a, SubmitOutcome::Replied { .. }));
    assert!(matches!(b, SubmitOutcome::Replied { .. }));

    let messages = chat.messages().await;
    let senders: Vec<_> = messages.iter().map(|m| m.sender).collect();
    assert_eq!(
        senders,
        vec![Sender::Bot, Sender::User, Sender::Bot, Sender::User, Sender::Bot]
    );
    assert!(
        messages
            .windows(2)
            .all(|w| w[0].created_at <= w[1].created_at)
    );
    assert_eq!(*chat.state().borrow(), ChatState::Idle);
}

#[tokio::test]
async fn shared_chat_credential_toggle() {
    let harness = TestHarness::builder()
        .with_provider(MockProvider::with_replies(["remote"]))
        .build();
    let provider = harness.mock_provider.clone();
    let chat = SharedChat::new(harness.controller);

    chat.submit("hello").await;
    assert_eq!(provider.call_count(), 0);

    chat.set_credential(mindmate_core::Credential::new("sk-late").unwrap())
        .await;
    chat.submit("hello again").await;
    assert_eq!(provider.call_count(), 1);

    chat.clear_credential().await;
    chat.submit("and again").await;
    assert_eq!(provider.call_count(), 1);
}

#[tokio::test]
async fn state_is_awaiting_reply_while_remote_call_pending() {
    let harness = TestHarness::builder()
        .with_provider(
            MockProvider::with_replies(["slow reply"]).with_delay(Duration::from_millis(50)),
        )
        .with_credential("sk-test")
        .build();
    let chat = SharedChat::new(harness.controller);
    let mut rx = chat.state();

    let pending = tokio::spawn({
        let chat = chat.clone();
        async move { chat.submit("hello").await }
    });

    rx.wait_for(|s| *s == ChatState::AwaitingReply)
        .await
        .expect("controller alive");
    assert!(!pending.is_finished());

    let outcome = pending.await.expect("submit task");
    let SubmitOutcome::Replied { reply, .. } = outcome else {
        panic!("expected a reply");
    };
    assert_eq!(reply.content, "slow reply");
    assert_eq!(*chat.state().borrow(), ChatState::Idle);
}

#[tokio::test]
async fn interrupt_while_awaiting_reply_degrades_then_recovers() {
    let harness = TestHarness::builder()
        .with_provider(
            MockProvider::with_replies(["dropped", "next"]).with_delay(Duration::from_millis(50)),
        )
        .with_credential("sk-test")
        .build();
    let handle = harness.controller.interrupt_handle();
    let chat = SharedChat::new(harness.controller);
    let mut rx = chat.state();

    let pending = tokio::spawn({
        let chat = chat.clone();
        async move { chat.submit("first").await }
    });
    rx.wait_for(|s| *s == ChatState::AwaitingReply)
        .await
        .expect("controller alive");
    handle.interrupt();

    let SubmitOutcome::Replied { bot, reply, .. } = pending.await.expect("submit task") else {
        panic!("expected a reply");
    };
    assert_eq!(bot.content, DEGRADED_REPLY);
    assert_eq!(reply.origin, ReplyOrigin::Degraded);
    assert_eq!(*chat.state().borrow(), ChatState::Idle);

    let SubmitOutcome::Replied { reply, .. } = chat.submit("second").await else {
        panic!("expected a reply");
    };
    assert_eq!(reply.origin, ReplyOrigin::Remote);
    assert_eq!(reply.content, "next");
}
