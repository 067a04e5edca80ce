// SPDX-FileCopyrightText: 2026 MindMate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration model structs for the MindMate companion.
//!
//! All structs use `#[serde(deny_unknown_fields)]` to reject unrecognized
//! config keys at startup, providing actionable error messages.

use serde::{Deserialize, Serialize};

/// Top-level MindMate configuration.
///
/// Loaded from TOML files following XDG hierarchy, with environment variable overrides.
/// All sections are optional and default to sensible values.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct MindmateConfig {
    /// Companion identity and persona settings.
    #[serde(default)]
    pub companion: CompanionConfig,

    /// Remote chat-completion endpoint settings.
    #[serde(default)]
    pub openai: OpenAiConfig,

    /// Rolling prompt context settings.
    #[serde(default)]
    pub context: ContextConfig,

    /// Chat loop behavior settings.
    #[serde(default)]
    pub chat: ChatConfig,

    /// Local credential storage settings.
    #[serde(default)]
    pub credential: CredentialConfig,
}

/// Companion identity and persona configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct CompanionConfig {
    /// Display name of the companion, used in context lines and the greeting.
    #[serde(default = "default_companion_name")]
    pub name: String,

    /// Opening bot message. Defaults to a greeting built from `name`.
    #[serde(default)]
    pub greeting: Option<String>,

    /// Inline persona prompt sent as the system turn. Overridden by
    /// `system_prompt_file` if both set.
    #[serde(default)]
    pub system_prompt: Option<String>,

    /// Path to a file containing the persona prompt.
    #[serde(default)]
    pub system_prompt_file: Option<String>,

    /// Logging level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl CompanionConfig {
    /// Returns the configured greeting, or the default one for this companion name.
    pub fn greeting(&self) -> String {
        self.greeting.clone().unwrap_or_else(|| {
            format!(
                "Hello! I'm {}, your MindMate AI companion. How are you feeling today?",
                self.name
            )
        })
    }
}

impl Default for CompanionConfig {
    fn default() -> Self {
        Self {
            name: default_companion_name(),
            greeting: None,
            system_prompt: None,
            system_prompt_file: None,
            log_level: default_log_level(),
        }
    }
}

fn default_companion_name() -> String {
    "Lovable".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Chat-completion endpoint configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct OpenAiConfig {
    /// API key. `None` falls back to `OPENAI_API_KEY`, then the credential store.
    #[serde(default)]
    pub api_key: Option<String>,

    /// Base URL of the API; `/chat/completions` is appended.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Model identifier sent with every request.
    #[serde(default = "default_model")]
    pub model: String,

    /// Sampling temperature.
    #[serde(default = "default_temperature")]
    pub temperature: f32,

    /// Maximum tokens in a reply.
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,

    /// Upper bound on a single completion call, in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for OpenAiConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: default_base_url(),
            model: default_model(),
            temperature: default_temperature(),
            max_tokens: default_max_tokens(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

fn default_base_url() -> String {
    "https://api.openai.com/v1".to_string()
}

fn default_model() -> String {
    "gpt-4o-mini".to_string()
}

fn default_temperature() -> f32 {
    0.7
}

fn default_max_tokens() -> u32 {
    500
}

fn default_timeout_secs() -> u64 {
    30
}

/// Rolling context window configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ContextConfig {
    /// Number of most recent lines kept as prompt context.
    #[serde(default = "default_window_size")]
    pub window_size: usize,
}

impl Default for ContextConfig {
    fn default() -> Self {
        Self {
            window_size: default_window_size(),
        }
    }
}

fn default_window_size() -> usize {
    10
}

/// Chat loop configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ChatConfig {
    /// Simulated typing delay before a locally selected reply, in milliseconds.
    /// Zero disables the delay.
    #[serde(default = "default_typing_delay_ms")]
    pub typing_delay_ms: u64,
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            typing_delay_ms: default_typing_delay_ms(),
        }
    }
}

fn default_typing_delay_ms() -> u64 {
    1500
}

/// Local credential storage configuration.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct CredentialConfig {
    /// Path to the credential file. Defaults to `<data_dir>/mindmate/credentials.json`.
    #[serde(default)]
    pub store_path: Option<String>,
}

impl CredentialConfig {
    /// Resolves the effective credential file path.
    pub fn resolved_store_path(&self) -> std::path::PathBuf {
        match &self.store_path {
            Some(path) => std::path::PathBuf::from(path),
            None => dirs::data_dir()
                .map(|d| d.join("mindmate"))
                .unwrap_or_else(|| std::path::PathBuf::from("."))
                .join("credentials.json"),
        }
    }
}
