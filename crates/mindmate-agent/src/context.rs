// SPDX-FileCopyrightText: 2026 MindMate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Bounded rolling context window.
//!
//! Keeps the most recent exchanges as plain-text lines for the remote
//! completion prompt. It is ephemeral prompt material; the durable record
//! is the [`MessageLog`](crate::conversation::MessageLog).

use std::collections::VecDeque;

use mindmate_core::{CompletionTurn, Sender, Sentiment, TurnRole};

/// One line of prompt context.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContextEntry {
    /// Which side spoke.
    pub sender: Sender,
    /// The message text as typed or replied.
    pub text: String,
    /// Rendered line, e.g. `User (negative): ...` or `Lovable: ...`.
    pub line: String,
}

/// FIFO buffer holding at most `capacity` entries.
#[derive(Debug, Clone)]
pub struct ContextWindow {
    companion_name: String,
    capacity: usize,
    entries: VecDeque<ContextEntry>,
}

impl ContextWindow {
    /// Creates an empty window. A zero capacity is raised to one.
    pub fn new(companion_name: impl Into<String>, capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            companion_name: companion_name.into(),
            capacity,
            entries: VecDeque::with_capacity(capacity),
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Pushes a user line tagged with its sentiment.
    pub fn push_user(&mut self, text: &str, sentiment: Sentiment) {
        let line = format!("User ({sentiment}): {text}");
        self.push(ContextEntry {
            sender: Sender::User,
            text: text.to_string(),
            line,
        });
    }

    /// Pushes a companion line.
    pub fn push_bot(&mut self, text: &str) {
        let line = format!("{}: {text}", self.companion_name);
        self.push(ContextEntry {
            sender: Sender::Bot,
            text: text.to_string(),
            line,
        });
    }

    /// Pushes an entry, evicting the oldest when full.
    pub fn push(&mut self, entry: ContextEntry) {
        while self.entries.len() >= self.capacity {
            self.entries.pop_front();
        }
        self.entries.push_back(entry);
    }

    /// Entries from oldest to newest.
    pub fn entries(&self) -> impl Iterator<Item = &ContextEntry> {
        self.entries.iter()
    }

    /// Rendered lines from oldest to newest.
    pub fn lines(&self) -> Vec<&str> {
        self.entries.iter().map(|e| e.line.as_str()).collect()
    }

    /// The newest entry, if any.
    pub fn last(&self) -> Option<&ContextEntry> {
        self.entries.back()
    }

    /// Reinterprets the window as user/assistant turns, oldest first.
    pub fn to_turns(&self) -> Vec<CompletionTurn> {
        self.entries
            .iter()
            .map(|e| {
                let role = match e.sender {
                    Sender::User => TurnRole::User,
                    Sender::Bot => TurnRole::Assistant,
                };
                CompletionTurn::new(role, e.text.clone())
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn lines_render_speaker_and_sentiment() {
        let mut window = ContextWindow::new("Lovable", 10);
        window.push_user("I'm so stressed about work", Sentiment::Negative);
        window.push_bot("That sounds really challenging.");
        assert_eq!(
            window.lines(),
            vec![
                "User (negative): I'm so stressed about work",
                "Lovable: That sounds really challenging.",
            ]
        );
    }

    #[test]
    fn k_plus_three_pushes_evict_oldest_three() {
        let k = 10;
        let mut window = ContextWindow::new("Lovable", k);
        for i in 0..k + 3 {
            window.push_bot(&format!("line {i}"));
        }
        assert_eq!(window.len(), k);
        let texts: Vec<_> = window.entries().map(|e| e.text.clone()).collect();
        let expected: Vec<_> = (3..k + 3).map(|i| format!("line {i}")).collect();
        assert_eq!(texts, expected);
    }

    #[test]
    fn zero_capacity_is_raised_to_one() {
        let mut window = ContextWindow::new("Lovable", 0);
        window.push_bot("a");
        window.push_bot("b");
        assert_eq!(window.capacity(), 1);
        assert_eq!(window.lines(), vec!["Lovable: b"]);
    }

    #[test]
    fn turns_map_sender_to_role() {
        let mut window = ContextWindow::new("Lovable", 5);
        window.push_user("hello", Sentiment::Neutral);
        window.push_bot("hi there");
        let turns = window.to_turns();
        assert_eq!(turns.len(), 2);
        assert_eq!(turns[0], CompletionTurn::new(TurnRole::User, "hello"));
        assert_eq!(turns[1], CompletionTurn::new(TurnRole::Assistant, "hi there"));
    }

    proptest! {
        #[test]
        fn window_never_exceeds_capacity(capacity in 1usize..20, pushes in 0usize..60) {
            let mut window = ContextWindow::new("Lovable", capacity);
            for i in 0..pushes {
                window.push_bot(&i.to_string());
                prop_assert!(window.len() <= capacity);
            }
            let kept: Vec<usize> = window
                .entries()
                .map(|e| e.text.parse().unwrap())
                .collect();
            let start = pushes.saturating_sub(capacity);
            prop_assert_eq!(kept, (start..pushes).collect::<Vec<_>>());
        }
    }
}
