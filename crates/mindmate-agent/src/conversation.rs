// SPDX-FileCopyrightText: 2026 MindMate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Append-only conversation log.

use chrono::{DateTime, Utc};
use mindmate_core::{Message, Sender};

/// Ordered record of every message in a chat. Entries are never mutated or removed.
#[derive(Debug, Clone, Default)]
pub struct MessageLog {
    messages: Vec<Message>,
}

impl MessageLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a message and returns the stored copy.
    ///
    /// `created_at` is clamped to the previous entry's timestamp so the log
    /// stays non-decreasing even if the wall clock steps backwards.
    pub fn append(&mut self, mut message: Message) -> &Message {
        if let Some(last) = self.last_timestamp()
            && message.created_at < last
        {
            message.created_at = last;
        }
        self.messages.push(message);
        &self.messages[self.messages.len() - 1]
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// Number of messages written by `sender`.
    pub fn count_from(&self, sender: Sender) -> usize {
        self.messages.iter().filter(|m| m.sender == sender).count()
    }

    fn last_timestamp(&self) -> Option<DateTime<Utc>> {
        self.messages.last().map(|m| m.created_at)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use mindmate_core::Sentiment;

    #[test]
    fn append_preserves_order() {
        let mut log = MessageLog::new();
        log.append(Message::bot("hello"));
        log.append(Message::user("hi", Sentiment::Neutral));
        let contents: Vec<_> = log.messages().iter().map(|m| m.content.as_str()).collect();
        assert_eq!(contents, vec!["hello", "hi"]);
        assert_eq!(log.count_from(Sender::Bot), 1);
        assert_eq!(log.count_from(Sender::User), 1);
    }

    #[test]
    fn backwards_clock_is_clamped() {
        let mut log = MessageLog::new();
        let first = log.append(Message::bot("first")).created_at;

        let mut stale = Message::user("second", Sentiment::Neutral);
        stale.created_at = first - Duration::seconds(30);
        let stored = log.append(stale);

        assert_eq!(stored.created_at, first);
    }

    #[test]
    fn timestamps_are_non_decreasing() {
        let mut log = MessageLog::new();
        for i in 0..20 {
            log.append(Message::bot(i.to_string()));
        }
        assert!(
            log.messages()
                .windows(2)
                .all(|w| w[0].created_at <= w[1].created_at)
        );
    }
}
