// SPDX-FileCopyrightText: 2026 MindMate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! File-backed store for named credentials.
//!
//! Values are kept as plain JSON (`{"openai_api_key": "..."}`) in a file
//! readable only by the owner. The file is not encrypted: anyone with read
//! access to it has the key.

use std::collections::BTreeMap;
use std::io::Write;
use std::path::{Path, PathBuf};

use mindmate_core::{Credential, MindmateError};
use tracing::{debug, info};

/// Store entry name for the chat-completion API key.
pub const OPENAI_API_KEY: &str = "openai_api_key";

/// Named credentials loaded from a single JSON file.
pub struct CredentialStore {
    path: PathBuf,
    entries: BTreeMap<String, String>,
}

impl std::fmt::Debug for CredentialStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CredentialStore")
            .field("path", &self.path)
            .field("entries", &self.entries.keys().collect::<Vec<_>>())
            .finish()
    }
}

impl CredentialStore {
    /// Open the store at `path`. A missing file is an empty store.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, MindmateError> {
        let path = path.into();
        let entries = match std::fs::read_to_string(&path) {
            Ok(content) if content.trim().is_empty() => BTreeMap::new(),
            Ok(content) => serde_json::from_str(&content).map_err(|e| MindmateError::Credential {
                message: format!("corrupted credential file {}: {e}", path.display()),
                source: Some(Box::new(e)),
            })?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => BTreeMap::new(),
            Err(e) => {
                return Err(MindmateError::Credential {
                    message: format!("failed to read {}: {e}", path.display()),
                    source: Some(Box::new(e)),
                });
            }
        };

        debug!(path = %path.display(), count = entries.len(), "credential store opened");
        Ok(Self { path, entries })
    }

    /// Path of the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Look up a credential. Blank stored values count as absent.
    pub fn get(&self, name: &str) -> Option<Credential> {
        self.entries.get(name).and_then(|v| Credential::new(v.as_str()))
    }

    /// Names of all stored entries.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Store a credential and persist the file.
    ///
    /// Blank values are rejected rather than stored.
    pub fn set(&mut self, name: &str, value: &str) -> Result<Credential, MindmateError> {
        let credential = Credential::new(value).ok_or_else(|| MindmateError::Credential {
            message: format!("refusing to store an empty value for `{name}`"),
            source: None,
        })?;
        let mut next = self.entries.clone();
        next.insert(name.to_string(), credential.expose().to_string());
        self.persist(&next)?;
        self.entries = next;
        info!(name, masked = %mask_secret(credential.expose()), "credential stored");
        Ok(credential)
    }

    /// Remove a credential. Returns whether an entry existed.
    pub fn remove(&mut self, name: &str) -> Result<bool, MindmateError> {
        if !self.entries.contains_key(name) {
            return Ok(false);
        }
        let mut next = self.entries.clone();
        next.remove(name);
        self.persist(&next)?;
        self.entries = next;
        info!(name, "credential removed");
        Ok(true)
    }

    /// Write `entries` atomically (temp file + rename) with owner-only permissions.
    ///
    /// In-memory state is only replaced by callers after this succeeds.
    fn persist(&self, entries: &BTreeMap<String, String>) -> Result<(), MindmateError> {
        let io_err = |what: &str, e: std::io::Error| MindmateError::Credential {
            message: format!("failed to {what} {}: {e}", self.path.display()),
            source: Some(Box::new(e)),
        };

        let dir = match self.path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
            _ => PathBuf::from("."),
        };
        std::fs::create_dir_all(&dir).map_err(|e| io_err("create directory for", e))?;

        let json = serde_json::to_string_pretty(entries)
            .map_err(|e| MindmateError::Internal(format!("credential serialization: {e}")))?;

        let mut tmp =
            tempfile::NamedTempFile::new_in(&dir).map_err(|e| io_err("create temp file for", e))?;
        tmp.write_all(json.as_bytes())
            .map_err(|e| io_err("write", e))?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            tmp.as_file()
                .set_permissions(std::fs::Permissions::from_mode(0o600))
                .map_err(|e| io_err("set permissions on", e))?;
        }

        tmp.persist(&self.path)
            .map_err(|e| io_err("replace", e.error))?;
        Ok(())
    }
}

/// Mask a secret for display: first and last 4 characters, or `****` if short.
pub fn mask_secret(value: &str) -> String {
    let chars: Vec<char> = value.chars().collect();
    if chars.len() < 10 {
        return "****".to_string();
    }
    let prefix: String = chars[..4].iter().collect();
    let suffix: String = chars[chars.len() - 4..].iter().collect();
    format!("{prefix}...{suffix}")
}
