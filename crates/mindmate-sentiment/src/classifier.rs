// SPDX-FileCopyrightText: 2026 MindMate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Keyword-count sentiment classification.
//!
//! Tags free text as positive, negative, or neutral by comparing how many
//! terms of each keyword set occur in it. No model, no network, no latency.

use mindmate_core::Sentiment;

/// Terms that count toward a positive tag (substring match, case-insensitive).
pub const POSITIVE_KEYWORDS: &[&str] = &[
    "happy", "good", "great", "better", "joy", "excited", "love", "thank", "grateful",
];

/// Terms that count toward a negative tag (substring match, case-insensitive).
pub const NEGATIVE_KEYWORDS: &[&str] = &[
    "sad", "bad", "worse", "difficult", "hard", "anxious", "worried", "stress", "depressed",
    "alone",
];

/// Keyword hit counts behind a classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SentimentScore {
    pub positive: usize,
    pub negative: usize,
}

impl SentimentScore {
    /// Maps the counts to a tag: strict majority wins, ties are neutral.
    pub fn sentiment(&self) -> Sentiment {
        match self.positive.cmp(&self.negative) {
            std::cmp::Ordering::Greater => Sentiment::Positive,
            std::cmp::Ordering::Less => Sentiment::Negative,
            std::cmp::Ordering::Equal => Sentiment::Neutral,
        }
    }
}

/// Heuristic sentiment classifier over two fixed keyword sets.
///
/// Each keyword counts at most once per message, and matching is by
/// substring, so "stressed" hits `stress` and "unhappy" hits `happy`.
#[derive(Debug, Clone)]
pub struct SentimentClassifier {
    positive: Vec<String>,
    negative: Vec<String>,
}

impl SentimentClassifier {
    /// Create a classifier with the built-in keyword sets.
    pub fn new() -> Self {
        Self::with_keywords(POSITIVE_KEYWORDS, NEGATIVE_KEYWORDS)
    }

    /// Create a classifier with custom keyword sets. Keywords are lower-cased.
    pub fn with_keywords(positive: &[&str], negative: &[&str]) -> Self {
        let fold = |words: &[&str]| {
            words
                .iter()
                .map(|w| w.to_lowercase())
                .filter(|w| !w.is_empty())
                .collect()
        };
        Self {
            positive: fold(positive),
            negative: fold(negative),
        }
    }

    /// Classify a message.
    pub fn classify(&self, text: &str) -> Sentiment {
        self.score(text).sentiment()
    }

    /// Count keyword hits for each set.
    pub fn score(&self, text: &str) -> SentimentScore {
        let lower = text.to_lowercase();
        let hits = |words: &[String]| words.iter().filter(|w| lower.contains(w.as_str())).count();
        SentimentScore {
            positive: hits(&self.positive),
            negative: hits(&self.negative),
        }
    }
}

impl Default for SentimentClassifier {
    fn default() -> Self {
        Self::new()
    }
}
