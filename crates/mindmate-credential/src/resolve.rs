// SPDX-FileCopyrightText: 2026 MindMate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Startup credential resolution.

use mindmate_config::model::OpenAiConfig;
use mindmate_core::Credential;
use tracing::debug;

use crate::store::{CredentialStore, OPENAI_API_KEY};

/// Environment variable consulted when the config carries no key.
pub const OPENAI_API_KEY_ENV: &str = "OPENAI_API_KEY";

/// Where the active credential came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CredentialSource {
    Config,
    Environment,
    Store,
}

impl std::fmt::Display for CredentialSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CredentialSource::Config => write!(f, "config"),
            CredentialSource::Environment => write!(f, "environment"),
            CredentialSource::Store => write!(f, "credential store"),
        }
    }
}

/// Resolve the chat-completion credential.
///
/// # Resolution order
/// 1. `openai.api_key` in config
/// 2. `OPENAI_API_KEY` environment variable
/// 3. the `openai_api_key` entry of the credential store
///
/// Blank values at any level are skipped. `None` means the companion runs
/// on its local response table.
pub fn resolve_credential(
    config: &OpenAiConfig,
    store: &CredentialStore,
) -> Option<(Credential, CredentialSource)> {
    let resolved = config
        .api_key
        .as_deref()
        .and_then(Credential::new)
        .map(|c| (c, CredentialSource::Config))
        .or_else(|| {
            std::env::var(OPENAI_API_KEY_ENV)
                .ok()
                .and_then(Credential::new)
                .map(|c| (c, CredentialSource::Environment))
        })
        .or_else(|| {
            store
                .get(OPENAI_API_KEY)
                .map(|c| (c, CredentialSource::Store))
        });

    match &resolved {
        Some((_, source)) => debug!(%source, "chat completion credential resolved"),
        None => debug!("no chat completion credential, using local replies"),
    }
    resolved
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    fn empty_store(dir: &tempfile::TempDir) -> CredentialStore {
        CredentialStore::open(dir.path().join("creds.json")).unwrap()
    }

    #[test]
    #[serial]
    fn config_key_wins() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = empty_store(&dir);
        store.set(OPENAI_API_KEY, "sk-from-store-0000").unwrap();
        let config = OpenAiConfig {
            api_key: Some("sk-from-config".into()),
            ..OpenAiConfig::default()
        };

        let (cred, source) = resolve_credential(&config, &store).unwrap();
        assert_eq!(cred.expose(), "sk-from-config");
        assert_eq!(source, CredentialSource::Config);
    }

    #[test]
    #[serial]
    fn env_beats_store() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = empty_store(&dir);
        store.set(OPENAI_API_KEY, "sk-from-store-0000").unwrap();

        // SAFETY: serialized with the other env-touching tests.
        unsafe { std::env::set_var(OPENAI_API_KEY_ENV, "sk-from-env") };
        let resolved = resolve_credential(&OpenAiConfig::default(), &store);
        unsafe { std::env::remove_var(OPENAI_API_KEY_ENV) };

        let (cred, source) = resolved.unwrap();
        assert_eq!(cred.expose(), "sk-from-env");
        assert_eq!(source, CredentialSource::Environment);
    }

    #[test]
    #[serial]
    fn store_is_last_resort() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = empty_store(&dir);
        store.set(OPENAI_API_KEY, "sk-from-store-0000").unwrap();
        unsafe { std::env::remove_var(OPENAI_API_KEY_ENV) };

        let config = OpenAiConfig {
            api_key: Some("   ".into()),
            ..OpenAiConfig::default()
        };
        let (cred, source) = resolve_credential(&config, &store).unwrap();
        assert_eq!(cred.expose(), "sk-from-store-0000");
        assert_eq!(source, CredentialSource::Store);
    }

    #[test]
    #[serial]
    fn nothing_configured_is_none() {
        let dir = tempfile::tempdir().unwrap();
        unsafe { std::env::remove_var(OPENAI_API_KEY_ENV) };
        assert!(resolve_credential(&OpenAiConfig::default(), &empty_store(&dir)).is_none());
    }
}
