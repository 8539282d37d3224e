//! Cart session persistence
//!
//! Durable client-side storage for the in-progress cart, so a reload does not
//! lose it. This is deliberately best-effort and last-write-wins: persistence
//! failures are logged and swallowed, and nothing here participates in the
//! checkout saga's consistency rules.

use std::{
    fs,
    io::ErrorKind,
    path::PathBuf,
    sync::{Arc, Mutex},
};

use camber::cart::CartStore;
use rustc_hash::FxHashMap;
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum SessionStoreError {
    #[error("session storage i/o failed")]
    Io(#[from] std::io::Error),
}

/// Key-value storage for serialized session state.
pub trait SessionStore: Send + Sync {
    /// Store `value` under `key`, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns an error when the underlying storage rejects the write.
    fn put(&self, key: &str, value: &str) -> Result<(), SessionStoreError>;

    /// Fetch the value stored under `key`, if any.
    ///
    /// # Errors
    ///
    /// Returns an error when the underlying storage cannot be read.
    fn get(&self, key: &str) -> Result<Option<String>, SessionStoreError>;
}

/// One file per key under a directory.
#[derive(Debug, Clone)]
pub struct FileSessionStore {
    dir: PathBuf,
}

impl FileSessionStore {
    /// Create a store rooted at `dir`, creating the directory as needed.
    ///
    /// # Errors
    ///
    /// Returns an error when the directory cannot be created.
    pub fn new(dir: impl Into<PathBuf>) -> Result<Self, SessionStoreError> {
        let dir = dir.into();

        fs::create_dir_all(&dir)?;

        Ok(Self { dir })
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

impl SessionStore for FileSessionStore {
    fn put(&self, key: &str, value: &str) -> Result<(), SessionStoreError> {
        fs::write(self.path_for(key), value)?;

        Ok(())
    }

    fn get(&self, key: &str) -> Result<Option<String>, SessionStoreError> {
        match fs::read_to_string(self.path_for(key)) {
            Ok(value) => Ok(Some(value)),
            Err(error) if error.kind() == ErrorKind::NotFound => Ok(None),
            Err(error) => Err(error.into()),
        }
    }
}

/// In-memory store for tests and ephemeral sessions.
#[derive(Debug, Default)]
pub struct MemorySessionStore {
    values: Mutex<FxHashMap<String, String>>,
}

impl MemorySessionStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl SessionStore for MemorySessionStore {
    fn put(&self, key: &str, value: &str) -> Result<(), SessionStoreError> {
        if let Ok(mut values) = self.values.lock() {
            values.insert(key.to_string(), value.to_string());
        }

        Ok(())
    }

    fn get(&self, key: &str) -> Result<Option<String>, SessionStoreError> {
        let Ok(values) = self.values.lock() else {
            return Ok(None);
        };

        Ok(values.get(key).cloned())
    }
}

/// A cart bound to one session key.
#[derive(Clone)]
pub struct CartSession {
    store: Arc<dyn SessionStore>,
    key: String,
}

impl CartSession {
    #[must_use]
    pub fn new(store: Arc<dyn SessionStore>, key: impl Into<String>) -> Self {
        Self {
            store,
            key: key.into(),
        }
    }

    /// Persist the cart; failures are logged at debug level and swallowed.
    pub fn save(&self, cart: &CartStore) {
        let serialized = match serde_json::to_string(cart) {
            Ok(serialized) => serialized,
            Err(error) => {
                debug!(key = %self.key, %error, "cart serialization failed; skipping persist");
                return;
            }
        };

        if let Err(error) = self.store.put(&self.key, &serialized) {
            debug!(key = %self.key, %error, "cart persist failed");
        }
    }

    /// Restore the cart persisted under this session's key, if any.
    ///
    /// Unreadable or corrupt state degrades to `None`; the customer starts
    /// with an empty cart rather than an error.
    #[must_use]
    pub fn load(&self) -> Option<CartStore> {
        let raw = match self.store.get(&self.key) {
            Ok(raw) => raw?,
            Err(error) => {
                debug!(key = %self.key, %error, "cart load failed");
                return None;
            }
        };

        match serde_json::from_str(&raw) {
            Ok(cart) => Some(cart),
            Err(error) => {
                debug!(key = %self.key, %error, "persisted cart was unreadable; ignoring it");
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use camber::cart::CartProduct;
    use testresult::TestResult;
    use uuid::Uuid;

    use super::*;

    fn cart_with_line() -> TestResult<CartStore> {
        let mut cart = CartStore::new();

        cart.add(CartProduct {
            uuid: Uuid::now_v7(),
            name: "Air filter".to_string(),
            unit_price: 14_00,
            stock: 9,
            active: true,
        })?;

        Ok(cart)
    }

    #[test]
    fn file_store_round_trips_a_cart() -> TestResult {
        let dir = tempfile::tempdir()?;
        let store = Arc::new(FileSessionStore::new(dir.path())?);
        let session = CartSession::new(store, "session-a");

        let cart = cart_with_line()?;
        session.save(&cart);

        let restored = session.load().ok_or("expected a persisted cart")?;

        assert_eq!(restored.subtotal(), cart.subtotal());
        assert_eq!(restored.len(), 1);

        Ok(())
    }

    #[test]
    fn missing_session_loads_nothing() -> TestResult {
        let dir = tempfile::tempdir()?;
        let store = Arc::new(FileSessionStore::new(dir.path())?);
        let session = CartSession::new(store, "absent");

        assert!(session.load().is_none(), "no persisted cart should exist");

        Ok(())
    }

    #[test]
    fn corrupt_state_degrades_to_empty() -> TestResult {
        let store = Arc::new(MemorySessionStore::new());
        store.put("session-b", "not json")?;

        let session = CartSession::new(store, "session-b");

        assert!(
            session.load().is_none(),
            "corrupt state must not surface an error"
        );

        Ok(())
    }

    #[test]
    fn last_write_wins() -> TestResult {
        let store = Arc::new(MemorySessionStore::new());
        let session = CartSession::new(store, "session-c");

        let first = cart_with_line()?;
        session.save(&first);

        let mut second = cart_with_line()?;
        second.clear();
        session.save(&second);

        let restored = session.load().ok_or("expected a persisted cart")?;

        assert!(restored.is_empty(), "latest save should win");

        Ok(())
    }
}
