// SPDX-FileCopyrightText: 2026 MindMate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration loader using Figment for layered config merging.
//!
//! Supports XDG hierarchy: `./mindmate.toml` > `~/.config/mindmate/mindmate.toml` > `/etc/mindmate/mindmate.toml`
//! with environment variable overrides via `MINDMATE_` prefix.

#![allow(clippy::result_large_err)] // figment::Error is external and cannot be boxed without wrapper

use std::path::Path;

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};

use crate::model::MindmateConfig;

/// System-wide config file location.
pub const SYSTEM_CONFIG_PATH: &str = "/etc/mindmate/mindmate.toml";

/// Local config file name, looked up in the working directory.
pub const LOCAL_CONFIG_FILE: &str = "mindmate.toml";

/// Load configuration from the standard XDG hierarchy with env var overrides.
///
/// Merge order (later overrides earlier):
/// 1. Compiled defaults
/// 2. `/etc/mindmate/mindmate.toml` (system-wide)
/// 3. `~/.config/mindmate/mindmate.toml` (user XDG config)
/// 4. `./mindmate.toml` (local directory)
/// 5. `MINDMATE_*` environment variables
pub fn load_config() -> Result<MindmateConfig, figment::Error> {
    build_figment().extract()
}

/// Load configuration from a TOML string only (no XDG lookup, no env).
///
/// Used for testing and explicit configuration.
pub fn load_config_from_str(toml_content: &str) -> Result<MindmateConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(MindmateConfig::default()))
        .merge(Toml::string(toml_content))
        .extract()
}

/// Load configuration from a specific file path with env var overrides.
pub fn load_config_from_path(path: &Path) -> Result<MindmateConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(MindmateConfig::default()))
        .merge(Toml::file(path))
        .merge(env_provider())
        .extract()
}

/// Build the Figment used internally for config loading.
///
/// Returns the Figment before extraction so callers can inspect metadata.
pub fn build_figment() -> Figment {
    Figment::new()
        .merge(Serialized::defaults(MindmateConfig::default()))
        .merge(Toml::file(SYSTEM_CONFIG_PATH))
        .merge(Toml::file(user_config_path().unwrap_or_default()))
        .merge(Toml::file(LOCAL_CONFIG_FILE))
        .merge(env_provider())
}

/// Path of the per-user config file, if the platform has a config dir.
pub fn user_config_path() -> Option<std::path::PathBuf> {
    dirs::config_dir().map(|d| d.join("mindmate").join(LOCAL_CONFIG_FILE))
}

/// Top-level config sections that `MINDMATE_<SECTION>_<KEY>` variables map into.
const ENV_SECTIONS: &[&str] = &["companion", "openai", "context", "chat", "credential"];

/// Create the environment variable provider using explicit `map()` for section-to-dot mapping.
///
/// Uses `Env::map()` rather than `Env::split("_")` because key names contain
/// underscores: `MINDMATE_OPENAI_MAX_TOKENS` must map to `openai.max_tokens`,
/// not `openai.max.tokens`. Figment hands `map` the key in its original case,
/// so it is folded before the section prefix is matched.
fn env_provider() -> Env {
    Env::prefixed("MINDMATE_").map(|key| env_key_to_path(key.as_str()).into())
}

/// Maps an env key (prefix already stripped) to a dotted config path.
///
/// Only a leading section name is rewritten; anything else is left as the
/// lower-cased key so extraction reports it as unknown.
fn env_key_to_path(key: &str) -> String {
    let lower = key.to_ascii_lowercase();
    for section in ENV_SECTIONS {
        if let Some(rest) = lower.strip_prefix(section)
            && let Some(field) = rest.strip_prefix('_')
            && !field.is_empty()
        {
            return format!("{section}.{field}");
        }
    }
    lower
}
