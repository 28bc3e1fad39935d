//! Dioxus hook that mirrors a signal into durable storage.

use api::prefs::store;
use dioxus::prelude::*;
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::compat::PlatformStore;

/// A signal whose value is loaded from durable storage on first render and
/// written back on every change.
///
/// Absent or malformed entries fall back to `default()`; write failures are
/// swallowed by the store, so the signal stays authoritative for the current
/// session even when durability is not.
pub fn use_persisted_state<T>(key: &'static str, default: impl FnOnce() -> T) -> Signal<T>
where
    T: Serialize + DeserializeOwned + Clone + 'static,
{
    let value = use_signal(|| store::read(&PlatformStore, key, default()));

    use_effect(move || {
        let current = value.read().clone();
        store::write(&PlatformStore, key, &current);
    });

    value
}
