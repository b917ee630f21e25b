//! Shared typed handle over a host `KeyValueStore`.

use std::cell::RefCell;
use std::rc::Rc;

use serde::de::DeserializeOwned;
use serde::Serialize;

use basket_core::errors::StorageError;
use basket_core::traits::KeyValueStore;

/// Cheaply cloneable handle shared by the cart engine, offline queue, error
/// log, and auth session — each under its own key from [`crate::keys`].
/// Execution is single-threaded cooperative, so `Rc<RefCell<_>>` suffices.
#[derive(Clone)]
pub struct StoreHandle {
    inner: Rc<RefCell<dyn KeyValueStore>>,
}

impl StoreHandle {
    pub fn new(store: impl KeyValueStore + 'static) -> Self {
        Self {
            inner: Rc::new(RefCell::new(store)),
        }
    }

    /// Raw string read.
    pub fn get_raw(&self, key: &str) -> Option<String> {
        self.inner.borrow().get(key)
    }

    /// Raw string write.
    pub fn set_raw(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.inner.borrow_mut().set(key, value)
    }

    /// Remove a key. Missing keys are not an error.
    pub fn remove(&self, key: &str) {
        self.inner.borrow_mut().remove(key);
    }

    /// Read and decode a JSON document. A present-but-unparsable document is
    /// reported as [`StorageError::Corrupt`]; the owning component decides
    /// how to recover (backup copy, empty default) and never surfaces the
    /// raw parse failure to a caller.
    pub fn get_json<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, StorageError> {
        match self.get_raw(key) {
            None => Ok(None),
            Some(raw) => serde_json::from_str(&raw).map(Some).map_err(|e| {
                StorageError::Corrupt {
                    key: key.to_string(),
                    reason: e.to_string(),
                }
            }),
        }
    }

    /// Encode and write a JSON document as a whole-value replacement.
    pub fn set_json<T: Serialize>(&self, key: &str, value: &T) -> Result<(), StorageError> {
        let raw = serde_json::to_string(value).map_err(|e| StorageError::Serialize {
            key: key.to_string(),
            reason: e.to_string(),
        })?;
        self.set_raw(key, &raw)
    }
}

impl std::fmt::Debug for StoreHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StoreHandle").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MemoryStore;
    use serde::Deserialize;

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Doc {
        name: String,
        count: u32,
    }

    #[test]
    fn json_round_trip() {
        let store = StoreHandle::new(MemoryStore::default());
        let doc = Doc {
            name: "cart".into(),
            count: 3,
        };
        store.set_json("k", &doc).unwrap();
        let back: Doc = store.get_json("k").unwrap().unwrap();
        assert_eq!(back, doc);
    }

    #[test]
    fn missing_key_is_none_not_error() {
        let store = StoreHandle::new(MemoryStore::default());
        let got: Option<Doc> = store.get_json("absent").unwrap();
        assert!(got.is_none());
    }

    #[test]
    fn malformed_document_reports_corrupt() {
        let store = StoreHandle::new(MemoryStore::default());
        store.set_raw("k", "{not json").unwrap();
        let err = store.get_json::<Doc>("k").unwrap_err();
        assert!(matches!(err, StorageError::Corrupt { .. }));
    }

    #[test]
    fn clones_share_the_same_backend() {
        let store = StoreHandle::new(MemoryStore::default());
        let other = store.clone();
        store.set_raw("k", "v").unwrap();
        assert_eq!(other.get_raw("k").as_deref(), Some("v"));
        other.remove("k");
        assert!(store.get_raw("k").is_none());
    }
}
