//! A thin key-value persistence helper for arbitrary serde values.

use std::cell::RefCell;
use std::collections::HashMap;

use serde::de::DeserializeOwned;
use serde::Serialize;

/// Keys are namespaced under this prefix before touching the backing store,
/// so unrelated data in a shared origin cannot collide with ours.
const KEY_PREFIX: &str = "wallet_connector.";

fn storage_key(key: &str) -> String {
    format!("{KEY_PREFIX}{key}")
}

/// Raw string storage behind the preference helpers.
///
/// `store` reports success; callers treat `false` as a quota or availability
/// problem and carry on with the in-memory value.
pub trait PreferenceStore {
    fn load(&self, key: &str) -> Option<String>;
    fn store(&self, key: &str, raw: &str) -> bool;
}

/// Reads the value persisted under `key`, falling back to `default` when the
/// entry is absent or does not deserialize. Never raises; a malformed entry
/// is left in place until the next write replaces it.
pub fn read<T, S>(store: &S, key: &str, default: T) -> T
where
    T: DeserializeOwned,
    S: PreferenceStore + ?Sized,
{
    match store.load(&storage_key(key)) {
        Some(raw) => serde_json::from_str(&raw).unwrap_or_else(|e| {
            tracing::warn!(key, "discarding malformed preference: {e}");
            default
        }),
        None => default,
    }
}

/// Serializes and persists `value` under `key`. Failures are swallowed: the
/// in-memory value stays authoritative for the session, durability is not
/// guaranteed.
pub fn write<T, S>(store: &S, key: &str, value: &T)
where
    T: Serialize,
    S: PreferenceStore + ?Sized,
{
    match serde_json::to_string(value) {
        Ok(raw) => {
            if !store.store(&storage_key(key), &raw) {
                tracing::warn!(key, "preference write failed; value not durable");
            }
        }
        Err(e) => tracing::warn!(key, "preference serialization failed: {e}"),
    }
}

/// In-memory store, used natively and as the test double.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: RefCell<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl PreferenceStore for MemoryStore {
    fn load(&self, key: &str) -> Option<String> {
        self.entries.borrow().get(key).cloned()
    }

    fn store(&self, key: &str, raw: &str) -> bool {
        self.entries.borrow_mut().insert(key.to_string(), raw.to_string());
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FailingStore;

    impl PreferenceStore for FailingStore {
        fn load(&self, _key: &str) -> Option<String> {
            None
        }

        fn store(&self, _key: &str, _raw: &str) -> bool {
            false
        }
    }

    #[test]
    fn round_trips_values() {
        let store = MemoryStore::new();
        write(&store, "theme", &"dark".to_string());
        assert_eq!(read(&store, "theme", String::new()), "dark");

        write(&store, "wallet_disconnected", &true);
        assert!(read(&store, "wallet_disconnected", false));
    }

    #[test]
    fn falls_back_to_default_when_absent() {
        let store = MemoryStore::new();
        assert_eq!(read(&store, "missing", 7u32), 7);
    }

    #[test]
    fn falls_back_to_default_when_malformed() {
        let store = MemoryStore::new();
        // Raw trait access bypasses serialization to plant a bad entry.
        store.store("wallet_connector.theme", "{not json");
        assert_eq!(read(&store, "theme", "light".to_string()), "light");
    }

    #[test]
    fn namespaces_raw_keys() {
        let store = MemoryStore::new();
        write(&store, "theme", &"dark".to_string());
        assert_eq!(store.load("wallet_connector.theme").as_deref(), Some("\"dark\""));
        assert_eq!(store.load("theme"), None);
    }

    #[test]
    fn swallows_write_failures() {
        write(&FailingStore, "theme", &"dark".to_string());
        assert_eq!(read(&FailingStore, "theme", "light".to_string()), "light");
    }
}
