// SPDX-FileCopyrightText: 2026 MindMate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Sentiment tagging and local reply selection for the MindMate companion.
//!
//! This crate provides:
//! - [`SentimentClassifier`]: keyword-count tagging (pure, deterministic)
//! - [`ResponseSelector`]: random pick from a fixed per-sentiment reply table
//!
//! Both run before any network call: the classifier tags every user
//! message, and the selector answers when no remote credential is set.

pub mod classifier;
pub mod responses;

pub use classifier::{SentimentClassifier, SentimentScore, NEGATIVE_KEYWORDS, POSITIVE_KEYWORDS};
pub use responses::ResponseSelector;
