// SPDX-FileCopyrightText: 2026 MindMate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Local credential storage for the MindMate companion.
//!
//! Holds the chat-completion API key between sessions and resolves which
//! key (if any) is active at startup. The key is handed to the completion
//! adapter explicitly; nothing here is process-global.

pub mod resolve;
pub mod store;

pub use resolve::{resolve_credential, CredentialSource, OPENAI_API_KEY_ENV};
pub use store::{mask_secret, CredentialStore, OPENAI_API_KEY};
