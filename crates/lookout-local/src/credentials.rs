//! Session credentials.
//!
//! Load priority: OS keyring, then `LOOKOUT_AUTH__TOKEN`, then
//! `~/.lookout/credentials.json`. Writes go to the keyring, falling back to
//! the file (0600, directory 0700).

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::LocalError;

const DEFAULT_KEYRING_SERVICE: &str = "lookout-cli";
const KEYRING_USER: &str = "session";
const TOKEN_ENV_VAR: &str = "LOOKOUT_AUTH__TOKEN";
const CREDENTIALS_FILE_NAME: &str = "credentials.json";

/// What the CLI remembers about a signed-in user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credentials {
    pub user_token: String,
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub is_authenticated: bool,
}

impl Credentials {
    #[must_use]
    pub fn new(user_token: impl Into<String>, username: impl Into<String>) -> Self {
        Self {
            user_token: user_token.into(),
            username: username.into(),
            is_authenticated: true,
        }
    }

    /// Credentials carrying only a token, as supplied through the environment.
    #[must_use]
    pub fn from_token(user_token: impl Into<String>) -> Self {
        Self::new(user_token, String::new())
    }
}

/// Which tier credentials were loaded from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CredentialSource {
    Keyring,
    Env,
    File,
}

impl CredentialSource {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Keyring => "keyring",
            Self::Env => "env",
            Self::File => "file",
        }
    }
}

/// Tiered credential storage.
#[derive(Debug, Clone)]
pub struct CredentialStore {
    keyring_service: Option<String>,
    env_var: Option<String>,
    path: PathBuf,
}

impl CredentialStore {
    /// The standard store: keyring, environment, `~/.lookout/credentials.json`.
    ///
    /// The keyring service defaults to `lookout-cli`; `LOOKOUT_KEYRING_SERVICE`
    /// overrides it so tests never touch real credentials.
    ///
    /// # Errors
    ///
    /// Returns [`LocalError::CredentialStore`] if the home directory cannot be
    /// resolved.
    pub fn standard() -> Result<Self, LocalError> {
        let path = dirs::home_dir()
            .map(|h| h.join(".lookout").join(CREDENTIALS_FILE_NAME))
            .ok_or_else(|| {
                LocalError::CredentialStore("home directory not found, cannot store credentials".into())
            })?;
        let service = std::env::var("LOOKOUT_KEYRING_SERVICE")
            .unwrap_or_else(|_| DEFAULT_KEYRING_SERVICE.to_string());
        Ok(Self {
            keyring_service: Some(service),
            env_var: Some(TOKEN_ENV_VAR.to_string()),
            path,
        })
    }

    /// A store backed only by the file at `path`.
    #[must_use]
    pub fn file_only(path: impl Into<PathBuf>) -> Self {
        Self {
            keyring_service: None,
            env_var: None,
            path: path.into(),
        }
    }

    /// Also accept a bare token from the environment variable `name`.
    #[must_use]
    pub fn with_env_var(mut self, name: impl Into<String>) -> Self {
        self.env_var = Some(name.into());
        self
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Persist credentials.
    ///
    /// # Errors
    ///
    /// Returns [`LocalError::CredentialStore`] if neither the keyring nor the
    /// file accepts the write.
    pub fn store(&self, credentials: &Credentials) -> Result<(), LocalError> {
        let json = serde_json::to_string(credentials)?;
        if let Some(entry) = self.keyring_entry() {
            match entry.set_password(&json) {
                Ok(()) => return Ok(()),
                Err(error) => tracing::warn!(%error, "keyring store failed; falling back to file"),
            }
        }
        self.store_file(&json)
    }

    /// Load credentials from the highest-priority tier that has them.
    #[must_use]
    pub fn load(&self) -> Option<Credentials> {
        self.load_with_source().map(|(credentials, _)| credentials)
    }

    /// Like [`load`](Self::load), reporting the tier as well.
    #[must_use]
    pub fn load_with_source(&self) -> Option<(Credentials, CredentialSource)> {
        if let Some(entry) = self.keyring_entry()
            && let Ok(json) = entry.get_password()
            && let Some(credentials) = parse_credentials(&json)
        {
            return Some((credentials, CredentialSource::Keyring));
        }

        if let Some(var) = &self.env_var
            && let Ok(token) = std::env::var(var)
            && !token.trim().is_empty()
        {
            return Some((Credentials::from_token(token.trim()), CredentialSource::Env));
        }

        let json = fs::read_to_string(&self.path).ok()?;
        parse_credentials(&json).map(|credentials| (credentials, CredentialSource::File))
    }

    /// Which tier the current credentials come from, for status display.
    #[must_use]
    pub fn detect_source(&self) -> Option<CredentialSource> {
        self.load_with_source().map(|(_, source)| source)
    }

    /// Remove stored credentials from the keyring and the file.
    ///
    /// # Errors
    ///
    /// Returns [`LocalError::CredentialStore`] if the file cannot be removed.
    pub fn delete(&self) -> Result<(), LocalError> {
        if let Some(entry) = self.keyring_entry()
            && let Err(error) = entry.delete_credential()
        {
            tracing::debug!(%error, "no keyring entry to delete");
        }
        if self.path.exists() {
            fs::remove_file(&self.path).map_err(|e| {
                LocalError::CredentialStore(format!("failed to delete {}: {e}", self.path.display()))
            })?;
        }
        Ok(())
    }

    fn keyring_entry(&self) -> Option<keyring::Entry> {
        let service = self.keyring_service.as_deref()?;
        match keyring::Entry::new(service, KEYRING_USER) {
            Ok(entry) => Some(entry),
            Err(error) => {
                tracing::debug!(%error, "keyring unavailable");
                None
            }
        }
    }

    fn store_file(&self, json: &str) -> Result<(), LocalError> {
        let path = &self.path;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| {
                LocalError::CredentialStore(format!("mkdir {}: {e}", parent.display()))
            })?;
            #[cfg(unix)]
            {
                use std::os::unix::fs::PermissionsExt;
                if let Err(e) = fs::set_permissions(parent, fs::Permissions::from_mode(0o700)) {
                    tracing::warn!("failed to chmod 0700 {}: {e}", parent.display());
                }
            }
        }
        fs::write(path, json)
            .map_err(|e| LocalError::CredentialStore(format!("write {}: {e}", path.display())))?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            fs::set_permissions(path, fs::Permissions::from_mode(0o600)).map_err(|e| {
                LocalError::CredentialStore(format!("chmod {}: {e}", path.display()))
            })?;
        }

        Ok(())
    }
}

/// Parse stored credentials. Empty or unauthenticated records count as absent.
fn parse_credentials(json: &str) -> Option<Credentials> {
    if json.trim().is_empty() {
        return None;
    }
    match serde_json::from_str::<Credentials>(json) {
        Ok(credentials) if credentials.is_authenticated && !credentials.user_token.is_empty() => {
            Some(credentials)
        }
        Ok(_) => None,
        Err(error) => {
            tracing::warn!(%error, "ignoring malformed stored credentials");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn standard_path_is_under_home() {
        let store = CredentialStore::standard().expect("should resolve");
        assert!(store.path().ends_with(".lookout/credentials.json"));
    }

    #[test]
    fn unauthenticated_or_empty_records_are_absent() {
        assert_eq!(parse_credentials("   \n"), None);
        assert_eq!(
            parse_credentials(r#"{"user_token":"t","username":"u","is_authenticated":false}"#),
            None
        );
        assert_eq!(parse_credentials("not json"), None);
        assert_eq!(
            parse_credentials(r#"{"user_token":"t","username":"u","is_authenticated":true}"#),
            Some(Credentials::new("t", "u"))
        );
    }
}
