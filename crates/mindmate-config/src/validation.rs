// SPDX-FileCopyrightText: 2026 MindMate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Post-deserialization validation for configuration values.

use crate::diagnostic::ConfigError;
use crate::model::MindmateConfig;

/// Validate a deserialized configuration for semantic correctness.
///
/// Collects every failure instead of stopping at the first one.
pub fn validate_config(config: &MindmateConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();

    if config.companion.name.trim().is_empty() {
        errors.push(ConfigError::validation("companion.name must not be empty"));
    }

    if let Some(greeting) = &config.companion.greeting
        && greeting.trim().is_empty()
    {
        errors.push(ConfigError::validation(
            "companion.greeting must not be empty when set",
        ));
    }

    let base_url = config.openai.base_url.trim();
    if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
        errors.push(ConfigError::validation(format!(
            "openai.base_url `{base_url}` must start with http:// or https://"
        )));
    }

    if config.openai.model.trim().is_empty() {
        errors.push(ConfigError::validation("openai.model must not be empty"));
    }

    let temperature = config.openai.temperature;
    if !(0.0..=2.0).contains(&temperature) {
        errors.push(ConfigError::validation(format!(
            "openai.temperature must be between 0.0 and 2.0, got {temperature}"
        )));
    }

    if config.openai.max_tokens == 0 {
        errors.push(ConfigError::validation("openai.max_tokens must be at least 1"));
    }

    if config.openai.timeout_secs == 0 {
        errors.push(ConfigError::validation("openai.timeout_secs must be at least 1"));
    }

    if config.context.window_size == 0 {
        errors.push(ConfigError::validation("context.window_size must be at least 1"));
    }

    if let Some(path) = &config.credential.store_path
        && path.trim().is_empty()
    {
        errors.push(ConfigError::validation(
            "credential.store_path must not be empty when set",
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
