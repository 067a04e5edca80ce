// SPDX-FileCopyrightText: 2026 MindMate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Sentiment-keyed local response table.
//!
//! Used when no remote completion credential is configured. The random
//! source is a parameter so callers (and tests) decide how replies are drawn.

use mindmate_core::Sentiment;
use rand::Rng;

/// Replies for positive messages.
pub const POSITIVE_RESPONSES: [&str; 4] = [
    "I'm so glad to hear you're feeling positive. What's been contributing to that feeling?",
    "That sounds wonderful. It takes courage to recognize and celebrate the good moments.",
    "I appreciate you sharing that joy with me. How can we help maintain this positive energy?",
    "Those positive feelings are so valuable. Would you like to talk more about what's going well?",
];

/// Replies for negative messages.
pub const NEGATIVE_RESPONSES: [&str; 4] = [
    "I hear that you're going through a difficult time. Would it help to talk more about what's troubling you?",
    "I'm truly sorry you're feeling this way. Remember that your feelings are valid, and it's okay to not be okay sometimes.",
    "That sounds really challenging. I'm here to listen whenever you need to express these feelings.",
    "When we're feeling down, it can be helpful to be gentle with ourselves. What's one small thing you could do to care for yourself today?",
];

/// Replies for neutral messages, and for anything without a tag.
pub const NEUTRAL_RESPONSES: [&str; 4] = [
    "I understand. How does talking about this make you feel?",
    "Thank you for sharing that with me. Is there anything specific about this situation you'd like to explore further?",
    "I'm here to listen and support you. Would you like to tell me more about what's on your mind?",
    "Sometimes just talking things through can help provide clarity. Is there anything else you'd like to share?",
];

/// Picks a reply from the fixed table for a sentiment.
#[derive(Debug, Clone, Copy, Default)]
pub struct ResponseSelector;

impl ResponseSelector {
    pub fn new() -> Self {
        Self
    }

    /// The ordered candidate list for a sentiment.
    pub fn candidates(&self, sentiment: Sentiment) -> &'static [&'static str] {
        match sentiment {
            Sentiment::Positive => &POSITIVE_RESPONSES,
            Sentiment::Negative => &NEGATIVE_RESPONSES,
            Sentiment::Neutral => &NEUTRAL_RESPONSES,
        }
    }

    /// Choose one candidate uniformly at random.
    ///
    /// A missing tag falls back to the neutral list.
    pub fn select<R: Rng + ?Sized>(
        &self,
        sentiment: Option<Sentiment>,
        rng: &mut R,
    ) -> &'static str {
        let candidates = self.candidates(sentiment.unwrap_or(Sentiment::Neutral));
        candidates[rng.gen_range(0..candidates.len())]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::collections::HashSet;

    const ALL: [Sentiment; 3] = [Sentiment::Positive, Sentiment::Negative, Sentiment::Neutral];

    #[test]
    fn every_list_has_four_entries() {
        let selector = ResponseSelector::new();
        for sentiment in ALL {
            assert_eq!(selector.candidates(sentiment).len(), 4);
        }
    }

    #[test]
    fn selection_is_member_of_sentiment_list() {
        let selector = ResponseSelector::new();
        let mut rng = StdRng::seed_from_u64(7);
        for sentiment in ALL {
            for _ in 0..50 {
                let reply = selector.select(Some(sentiment), &mut rng);
                assert!(selector.candidates(sentiment).contains(&reply));
            }
        }
    }

    #[test]
    fn missing_sentiment_uses_neutral_list() {
        let selector = ResponseSelector::new();
        let mut rng = StdRng::seed_from_u64(1);
        let reply = selector.select(None, &mut rng);
        assert!(NEUTRAL_RESPONSES.contains(&reply));
    }

    #[test]
    fn no_candidate_is_starved() {
        let selector = ResponseSelector::new();
        let mut rng = StdRng::seed_from_u64(42);
        for sentiment in ALL {
            let seen: HashSet<&str> = (0..1000)
                .map(|_| selector.select(Some(sentiment), &mut rng))
                .collect();
            assert_eq!(seen.len(), 4, "all {sentiment} candidates should appear");
        }
    }

    #[test]
    fn same_seed_same_sequence() {
        let selector = ResponseSelector::new();
        let mut a = StdRng::seed_from_u64(99);
        let mut b = StdRng::seed_from_u64(99);
        for _ in 0..20 {
            assert_eq!(
                selector.select(Some(Sentiment::Negative), &mut a),
                selector.select(Some(Sentiment::Negative), &mut b)
            );
        }
    }
}
