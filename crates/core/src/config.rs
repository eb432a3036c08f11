//! Credential configuration.
//!
//! Credentials are resolved once at process startup and then handed to the `ReportClient`.
//! Helpers here take already-read environment values rather than reading the process
//! environment themselves, so behaviour stays predictable under test harnesses.

use crate::constants::DEFAULT_CONFIG_PATH;
use crate::error::{ConfigError, ConfigResult};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// The three values needed to talk to the report service.
#[derive(Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Credentials {
    pub base_url: String,
    pub client_id: String,
    pub client_secret: String,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("base_url", &self.base_url)
            .field("client_id", &self.client_id)
            .field("client_secret", &"<redacted>")
            .finish()
    }
}

impl Credentials {
    pub fn new(
        base_url: impl Into<String>,
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
    ) -> Self {
        Self {
            base_url: base_url.into(),
            client_id: client_id.into(),
            client_secret: client_secret.into(),
        }
    }

    /// Returns `true` when none of the three fields is blank.
    pub fn is_complete(&self) -> bool {
        !self.base_url.trim().is_empty()
            && !self.client_id.trim().is_empty()
            && !self.client_secret.trim().is_empty()
    }

    /// Builds credentials from environment values, if all three were supplied and non-blank.
    pub fn from_env_values(
        base_url: Option<String>,
        client_id: Option<String>,
        client_secret: Option<String>,
    ) -> Option<Self> {
        let creds = Self::new(base_url?, client_id?, client_secret?);
        creds.is_complete().then_some(creds)
    }
}

/// Resolve the credential store path from an optional `LAUDOS_CONFIG` value.
///
/// `None` or a blank value falls back to `config.json` in the working directory.
pub fn config_path_from_env_value(value: Option<String>) -> PathBuf {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH))
}

/// Credentials from the environment when all three values were given, otherwise from `store`.
///
/// # Errors
///
/// Propagates the store's `load` errors, including `ConfigError::NotConfigured`.
pub fn resolve_credentials(
    from_env: Option<Credentials>,
    store: &CredentialStore,
) -> ConfigResult<Credentials> {
    match from_env {
        Some(creds) => Ok(creds),
        None => store.load(),
    }
}

/// JSON file persistence for `Credentials`.
#[derive(Clone, Debug)]
pub struct CredentialStore {
    path: PathBuf,
}

impl CredentialStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Loads credentials from the store.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::NotConfigured` if the file does not exist or any field is blank,
    /// `ConfigError::Read` if the file cannot be read and `ConfigError::Parse` if it is not
    /// valid JSON.
    pub fn load(&self) -> ConfigResult<Credentials> {
        let contents = match std::fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(ConfigError::NotConfigured)
            }
            Err(e) => return Err(ConfigError::Read(e)),
        };

        let creds: Credentials = serde_json::from_str(&contents).map_err(ConfigError::Parse)?;
        if !creds.is_complete() {
            return Err(ConfigError::NotConfigured);
        }

        Ok(creds)
    }

    /// Loads whatever is stored, complete or not, for prefilling a configuration prompt.
    pub fn load_partial(&self) -> Credentials {
        std::fs::read_to_string(&self.path)
            .ok()
            .and_then(|contents| serde_json::from_str(&contents).ok())
            .unwrap_or_default()
    }

    /// Saves credentials as pretty-printed JSON, creating the parent directory if needed.
    pub fn save(&self, creds: &Credentials) -> ConfigResult<()> {
        let data = serde_json::to_string_pretty(creds).map_err(ConfigError::Serialize)?;

        if let Some(dir) = self.path.parent().filter(|d| !d.as_os_str().is_empty()) {
            std::fs::create_dir_all(dir).map_err(ConfigError::CreateDir)?;
        }

        std::fs::write(&self.path, data).map_err(ConfigError::Write)?;
        tracing::debug!("saved credentials to {}", self.path.display());
        Ok(())
    }
}
