// SPDX-FileCopyrightText: 2026 MindMate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Conversation state and chat controller for the MindMate companion.
//!
//! This crate provides:
//! - [`MessageLog`]: append-only record of the conversation
//! - [`ContextWindow`]: bounded recent history used as prompt material
//! - [`CompletionAdapter`]: remote completion with local and degraded fallbacks
//! - [`ChatController`]: the per-chat FSM tying them together

pub mod adapter;
pub mod context;
pub mod conversation;
pub mod persona;
pub mod session;

pub use adapter::{
    CompletionAdapter, CompletionSettings, InterruptHandle, DEGRADED_REPLY, PLACEHOLDER_REPLY,
};
pub use context::{ContextEntry, ContextWindow};
pub use conversation::MessageLog;
pub use persona::{default_system_prompt, load_system_prompt};
pub use session::{ChatController, ChatState, SharedChat, SubmitOutcome};
