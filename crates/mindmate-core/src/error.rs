// SPDX-FileCopyrightText: 2026 MindMate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for the MindMate companion.

use thiserror::Error;

/// The primary error type used across MindMate crates.
///
/// Provider failures never reach the chat controller: the completion
/// adapter absorbs them and answers with a degraded reply instead.
#[derive(Debug, Error)]
pub enum MindmateError {
    /// Chat-completion provider errors (transport failure, non-2xx status, bad body).
    #[error("provider error: {message}")]
    Provider {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Credential store errors (unreadable or unwritable key file).
    #[error("credential error: {message}")]
    Credential {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Operation timed out.
    #[error("operation timed out after {duration:?}")]
    Timeout { duration: std::time::Duration },

    /// Operation was cancelled before it produced a result.
    #[error("operation cancelled")]
    Cancelled,

    /// Internal or unexpected errors.
    #[error("internal error: {0}")]
    Internal(String),
}

impl MindmateError {
    /// Shorthand for a provider error without an underlying source.
    pub fn provider(message: impl Into<String>) -> Self {
        Self::Provider {
            message: message.into(),
            source: None,
        }
    }
}
