// Re-export the public API from the appropriate module
#[cfg(target_arch = "wasm32")]
pub use wasm32::*;

#[cfg(not(target_arch = "wasm32"))]
pub use non_wasm32::*;

#[cfg(target_arch = "wasm32")]
pub mod wasm32 {
    use std::future::Future;
    use std::time::Duration;

    use api::prefs::store::PreferenceStore;
    use gloo_storage::LocalStorage;
    use gloo_storage::Storage;
    use wasm_bindgen_futures::JsFuture;
    use web_sys::Window;

    /// Durable preference storage backed by the origin's localStorage.
    pub struct PlatformStore;

    impl PreferenceStore for PlatformStore {
        fn load(&self, key: &str) -> Option<String> {
            LocalStorage::raw().get_item(key).ok().flatten()
        }

        fn store(&self, key: &str, raw: &str) -> bool {
            LocalStorage::raw().set_item(key, raw).is_ok()
        }
    }

    pub async fn sleep(duration: Duration) {
        gloo_timers::future::sleep(duration).await;
    }

    pub async fn clipboard_set(text: String) -> bool {
        match web_sys::window().map(|win: Window| win.navigator().clipboard()) {
            Some(clipboard) => {
                let promise = clipboard.write_text(&text);
                JsFuture::from(promise).await.is_ok()
            }
            _ => false,
        }
    }

    /// Whether the user agent prefers a dark color scheme.
    pub fn prefers_dark() -> bool {
        web_sys::window()
            .and_then(|win| win.match_media("(prefers-color-scheme: dark)").ok().flatten())
            .map(|query| query.matches())
            .unwrap_or(false)
    }

    /// Runs a future to completion in the background.
    pub fn spawn_detached(fut: impl Future<Output = ()> + 'static) {
        wasm_bindgen_futures::spawn_local(fut);
    }
}

#[cfg(not(target_arch = "wasm32"))]
pub mod non_wasm32 {
    use std::collections::HashMap;
    use std::future::Future;
    use std::sync::Mutex;
    use std::sync::OnceLock;
    use std::time::Duration;

    use api::prefs::store::PreferenceStore;

    static ENTRIES: OnceLock<Mutex<HashMap<String, String>>> = OnceLock::new();

    /// Process-local stand-in for browser storage: preferences survive for
    /// the process lifetime only.
    pub struct PlatformStore;

    impl PreferenceStore for PlatformStore {
        fn load(&self, key: &str) -> Option<String> {
            let entries = ENTRIES.get_or_init(Default::default).lock().ok()?;
            entries.get(key).cloned()
        }

        fn store(&self, key: &str, raw: &str) -> bool {
            match ENTRIES.get_or_init(Default::default).lock() {
                Ok(mut entries) => {
                    entries.insert(key.to_string(), raw.to_string());
                    true
                }
                Err(_) => false,
            }
        }
    }

    pub async fn sleep(duration: Duration) {
        tokio::time::sleep(duration).await;
    }

    /// No system clipboard off-wasm; the widget only ships in the browser.
    pub async fn clipboard_set(_text: String) -> bool {
        false
    }

    pub fn prefers_dark() -> bool {
        false
    }

    /// No injected provider exists off-wasm, so nothing ever schedules work
    /// here; the future is dropped unpolled.
    pub fn spawn_detached(fut: impl Future<Output = ()> + 'static) {
        drop(fut);
    }

}
