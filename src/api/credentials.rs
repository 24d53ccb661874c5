//! Stored Credentials
//!
//! The credential outlives page reloads in local storage under fixed keys.

use std::sync::Mutex;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;

use crate::config::{AUTH_TYPE_KEY, TOKEN_KEY};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthScheme {
    Basic,
    Bearer,
}

impl AuthScheme {
    pub fn as_str(&self) -> &'static str {
        match self {
            AuthScheme::Basic => "basic",
            AuthScheme::Bearer => "bearer",
        }
    }

    /// Anything other than "basic" is treated as a bearer token.
    pub fn parse(value: Option<&str>) -> AuthScheme {
        match value {
            Some("basic") => AuthScheme::Basic,
            _ => AuthScheme::Bearer,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credential {
    pub token: String,
    pub scheme: AuthScheme,
}

impl Credential {
    pub fn basic(username: &str, password: &str) -> Self {
        Self {
            token: STANDARD.encode(format!("{}:{}", username, password)),
            scheme: AuthScheme::Basic,
        }
    }

    /// Value for the `Authorization` header
    pub fn header_value(&self) -> String {
        match self.scheme {
            AuthScheme::Basic => format!("Basic {}", self.token),
            AuthScheme::Bearer => format!("Bearer {}", self.token),
        }
    }
}

pub trait CredentialStore: Send + Sync {
    fn load(&self) -> Option<Credential>;
    fn save(&self, credential: &Credential);
    fn clear(&self);
}

// ========================
// Browser local storage
// ========================

#[derive(Debug, Default, Clone, Copy)]
pub struct LocalStorageStore;

impl LocalStorageStore {
    fn storage() -> Option<web_sys::Storage> {
        web_sys::window()?.local_storage().ok()?
    }
}

impl CredentialStore for LocalStorageStore {
    fn load(&self) -> Option<Credential> {
        let storage = Self::storage()?;
        let token = storage.get_item(TOKEN_KEY).ok()??;
        let scheme = storage.get_item(AUTH_TYPE_KEY).ok().flatten();
        Some(Credential {
            token,
            scheme: AuthScheme::parse(scheme.as_deref()),
        })
    }

    fn save(&self, credential: &Credential) {
        match Self::storage() {
            Some(storage) => {
                let stored = storage
                    .set_item(TOKEN_KEY, &credential.token)
                    .and_then(|_| storage.set_item(AUTH_TYPE_KEY, credential.scheme.as_str()));
                if let Err(err) = stored {
                    log::warn!("[AUTH] could not store credential: {:?}", err);
                }
            }
            None => log::warn!("[AUTH] local storage unavailable, credential not stored"),
        }
    }

    fn clear(&self) {
        let Some(storage) = Self::storage() else {
            log::warn!("[AUTH] local storage unavailable, nothing to clear");
            return;
        };
        for key in [TOKEN_KEY, AUTH_TYPE_KEY] {
            if let Err(err) = storage.remove_item(key) {
                log::warn!("[AUTH] could not remove {}: {:?}", key, err);
            }
        }
    }
}

// ========================
// In-memory store
// ========================

#[derive(Debug, Default)]
pub struct MemoryStore {
    slot: Mutex<Option<Credential>>,
}

impl CredentialStore for MemoryStore {
    fn load(&self) -> Option<Credential> {
        self.slot.lock().ok()?.clone()
    }

    fn save(&self, credential: &Credential) {
        if let Ok(mut slot) = self.slot.lock() {
            *slot = Some(credential.clone());
        }
    }

    fn clear(&self) {
        if let Ok(mut slot) = self.slot.lock() {
            *slot = None;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basic_credential_header() {
        let cred = Credential::basic("alice", "s3cret");
        assert_eq!(cred.token, "YWxpY2U6czNjcmV0");
        assert_eq!(cred.header_value(), "Basic YWxpY2U6czNjcmV0");
    }

    #[test]
    fn test_scheme_parse() {
        assert_eq!(AuthScheme::parse(Some("basic")), AuthScheme::Basic);
        assert_eq!(AuthScheme::parse(Some("jwt")), AuthScheme::Bearer);
        assert_eq!(AuthScheme::parse(None), AuthScheme::Bearer);
    }

    #[test]
    fn test_memory_store_roundtrip() {
        let store = MemoryStore::default();
        assert!(store.load().is_none());
        store.save(&Credential::basic("a", "b"));
        assert_eq!(store.load().map(|c| c.scheme), Some(AuthScheme::Basic));
        store.clear();
        assert!(store.load().is_none());
    }
}
