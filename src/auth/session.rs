//! Session management

use crate::auth::claims::ClaimsEvaluator;
use crate::auth::jwt::decode_claims;
use crate::auth::storage::{FileStorage, MemoryStorage, TokenStorage};
use crate::config::{SessionConfig, StorageKind};
use crate::error::Result;
use std::fmt;
use std::sync::Arc;

/// Storage key holding the bearer token
pub const TOKEN_KEY: &str = "auth_token";

/// Owns the persisted bearer token
#[derive(Clone)]
pub struct SessionStore {
    storage: Arc<dyn TokenStorage>,
    key: String,
}

impl SessionStore {
    /// Create a store over `storage` using the default key
    pub fn new(storage: Arc<dyn TokenStorage>) -> Self {
        Self::with_key(storage, TOKEN_KEY)
    }

    pub fn with_key(storage: Arc<dyn TokenStorage>, key: impl Into<String>) -> Self {
        Self {
            storage,
            key: key.into(),
        }
    }

    /// Build the store described by the `[session]` config section
    pub fn from_config(config: &SessionConfig) -> Result<Self> {
        let storage: Arc<dyn TokenStorage> = match config.storage {
            StorageKind::Memory => Arc::new(MemoryStorage::new()),
            StorageKind::File => {
                let path = match &config.path {
                    Some(path) => path.clone(),
                    None => FileStorage::default_path()?,
                };
                tracing::debug!("Session file: {}", path.display());
                Arc::new(FileStorage::new(path))
            }
        };
        Ok(Self::with_key(storage, config.key.clone()))
    }

    /// Persist `token`, replacing whatever was stored
    pub fn save(&self, token: &str) -> Result<()> {
        self.storage.set(&self.key, token)?;
        tracing::debug!("Session token saved");
        Ok(())
    }

    /// The stored token, if any
    pub fn read(&self) -> Option<String> {
        match self.storage.get(&self.key) {
            Ok(token) => token,
            Err(e) => {
                tracing::warn!("Could not read session token: {}", e);
                None
            }
        }
    }

    /// Forget the stored token; a no-op when nothing is stored
    pub fn clear(&self) -> Result<()> {
        self.storage.remove(&self.key)?;
        tracing::debug!("Session token cleared");
        Ok(())
    }

    /// Whether a decodable, unexpired token is stored
    pub fn is_authenticated(&self) -> bool {
        self.is_authenticated_at(chrono::Utc::now().timestamp())
    }

    /// Same as [`is_authenticated`](Self::is_authenticated) against an explicit clock
    pub fn is_authenticated_at(&self, now: i64) -> bool {
        self.read()
            .as_deref()
            .and_then(decode_claims)
            .is_some_and(|claims| claims.is_live_at(now))
    }

    /// Role and identity view over this session
    pub fn evaluator(&self) -> ClaimsEvaluator {
        ClaimsEvaluator::new(self.clone())
    }
}

impl fmt::Debug for SessionStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionStore")
            .field("key", &self.key)
            .finish_non_exhaustive()
    }
}
