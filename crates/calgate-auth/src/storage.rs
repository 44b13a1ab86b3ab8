use anyhow::{Context, Result};
use calgate_core::AuthError;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Token set for OAuth2 authentication
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TokenSet {
    /// Access token for API requests
    pub access_token: String,

    /// Optional refresh token for token renewal
    pub refresh_token: Option<String>,

    /// Token expiration timestamp (Unix timestamp)
    pub expires_at: i64,

    /// Scopes granted to this token
    #[serde(default)]
    pub scopes: Vec<String>,
}

impl TokenSet {
    /// Check if the token needs refresh (within 5 minutes of expiry)
    pub fn needs_refresh(&self) -> bool {
        let now = chrono::Utc::now().timestamp();
        now >= self.expires_at - 300 // 5 minute buffer
    }

    /// Check if the token is expired
    pub fn is_expired(&self) -> bool {
        let now = chrono::Utc::now().timestamp();
        now >= self.expires_at
    }
}

/// Where credentials live between runs.
///
/// Loaded once at startup, written back whenever a token is refreshed or
/// newly authorized.
pub trait CredentialStore {
    /// Stored token, or `None` if nothing has been saved yet
    fn load(&self) -> Result<Option<TokenSet>, AuthError>;

    /// Persist `token`, replacing whatever was stored
    fn save(&self, token: &TokenSet) -> Result<(), AuthError>;

    /// A token is stored and has not expired
    fn is_valid(&self) -> bool {
        matches!(self.load(), Ok(Some(token)) if !token.is_expired())
    }
}

/// File-backed credential store, one JSON file per service.
/// Tokens are stored in the user's config directory by default.
pub struct FileCredentialStore {
    path: PathBuf,
}

impl FileCredentialStore {
    /// Store for `service` under `<config_dir>/calgate/tokens/<service>.json`
    pub fn for_service(service: &str) -> Result<Self> {
        let tokens_dir = dirs::config_dir()
            .context("Failed to get config directory")?
            .join("calgate")
            .join("tokens");

        Ok(Self::at(tokens_dir.join(format!("{}.json", service))))
    }

    /// Store backed by an explicit file
    pub fn at(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Delete the stored token, if any
    pub fn clear(&self) -> Result<(), AuthError> {
        if self.path.exists() {
            fs::remove_file(&self.path).map_err(|e| {
                AuthError::StorageError(format!("Failed to delete token file: {}", e))
            })?;
            tracing::info!("Deleted token at {:?}", self.path);
        }
        Ok(())
    }
}

impl CredentialStore for FileCredentialStore {
    fn load(&self) -> Result<Option<TokenSet>, AuthError> {
        if !self.path.exists() {
            return Ok(None);
        }

        let json = fs::read_to_string(&self.path)
            .map_err(|e| AuthError::StorageError(format!("Failed to read token file: {}", e)))?;

        let token_set: TokenSet = serde_json::from_str(&json).map_err(|e| {
            AuthError::StorageError(format!("Failed to deserialize token set: {}", e))
        })?;

        tracing::debug!("Retrieved token from {:?}", self.path);
        Ok(Some(token_set))
    }

    fn save(&self, token: &TokenSet) -> Result<(), AuthError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|e| {
                AuthError::StorageError(format!("Failed to create tokens directory: {}", e))
            })?;
        }

        let json = serde_json::to_string_pretty(token).map_err(|e| {
            AuthError::StorageError(format!("Failed to serialize token set: {}", e))
        })?;

        fs::write(&self.path, json)
            .map_err(|e| AuthError::StorageError(format!("Failed to write token file: {}", e)))?;

        tracing::info!("Stored token at {:?}", self.path);
        Ok(())
    }
}
