// SPDX-FileCopyrightText: 2026 MindMate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for the MindMate companion.
//!
//! This crate provides the error type, the message and sentiment types, and
//! the [`CompletionProvider`] trait implemented by remote completion
//! integrations.

pub mod error;
pub mod traits;
pub mod types;

// Re-export key items at crate root for ergonomic imports.
pub use error::MindmateError;
pub use traits::CompletionProvider;
pub use types::{
    CompletionRequest, CompletionResponse, CompletionTurn, Credential, Message, MessageId,
    Reply, ReplyOrigin, Sender, Sentiment, TurnRole,
};
