//! Binding to the browser-injected EIP-1193 wallet provider.

// Re-export the public API from the appropriate module
#[cfg(target_arch = "wasm32")]
pub use wasm32::*;

#[cfg(not(target_arch = "wasm32"))]
pub use non_wasm32::*;

#[cfg(target_arch = "wasm32")]
pub mod wasm32 {
    use std::rc::Rc;

    use api::amount::WeiAmount;
    use api::chain::Address;
    use api::chain::ChainId;
    use api::error::WalletError;
    use api::provider::WalletProvider;
    use async_trait::async_trait;
    use serde::Serialize;
    use wasm_bindgen::prelude::*;
    use wasm_bindgen::JsCast;
    use wasm_bindgen_futures::JsFuture;

    #[wasm_bindgen]
    extern "C" {
        /// The provider object wallet extensions inject at `window.ethereum`.
        type Ethereum;

        #[wasm_bindgen(method, catch)]
        fn request(this: &Ethereum, args: &JsValue) -> Result<js_sys::Promise, JsValue>;

        #[wasm_bindgen(method)]
        fn on(this: &Ethereum, event: &str, handler: &js_sys::Function);

        #[wasm_bindgen(method, js_name = removeListener)]
        fn remove_listener(this: &Ethereum, event: &str, handler: &js_sys::Function);
    }

    fn injected() -> Option<Ethereum> {
        let window = web_sys::window()?;
        let value = js_sys::Reflect::get(&window, &JsValue::from_str("ethereum")).ok()?;
        if value.is_undefined() || value.is_null() {
            return None;
        }
        Some(value.unchecked_into())
    }

    /// EIP-1193 "user rejected the request" error code.
    const USER_REJECTED: f64 = 4001.0;

    fn classify_rejection(error: &JsValue) -> WalletError {
        let message = js_sys::Reflect::get(error, &JsValue::from_str("message"))
            .ok()
            .and_then(|m| m.as_string())
            .unwrap_or_else(|| "provider rejected the request".to_string());
        let code = js_sys::Reflect::get(error, &JsValue::from_str("code"))
            .ok()
            .and_then(|c| c.as_f64());
        if code == Some(USER_REJECTED) {
            WalletError::AuthorizationDenied(message)
        } else {
            WalletError::Rpc(message)
        }
    }

    #[derive(Serialize)]
    struct RequestArgs<'a> {
        method: &'a str,
        #[serde(skip_serializing_if = "Option::is_none")]
        params: Option<serde_json::Value>,
    }

    /// Wallet provider backed by the injected `window.ethereum` object.
    pub struct BrowserProvider {
        inner: Ethereum,
    }

    /// Detects the injected provider. `None` means the environment has no
    /// wallet capability at all.
    pub fn detect() -> Option<Rc<dyn WalletProvider>> {
        injected().map(|inner| Rc::new(BrowserProvider { inner }) as Rc<dyn WalletProvider>)
    }

    impl BrowserProvider {
        async fn request(
            &self,
            method: &str,
            params: Option<serde_json::Value>,
        ) -> Result<JsValue, WalletError> {
            let args = serde_wasm_bindgen::to_value(&RequestArgs { method, params })
                .map_err(|e| WalletError::Rpc(e.to_string()))?;
            let promise = self
                .inner
                .request(&args)
                .map_err(|e| classify_rejection(&e))?;
            JsFuture::from(promise)
                .await
                .map_err(|e| classify_rejection(&e))
        }

        fn decode<T: serde::de::DeserializeOwned>(value: JsValue) -> Result<T, WalletError> {
            serde_wasm_bindgen::from_value(value)
                .map_err(|e| WalletError::InvalidResponse(e.to_string()))
        }
    }

    #[async_trait(?Send)]
    impl WalletProvider for BrowserProvider {
        async fn request_accounts(&self) -> Result<Vec<Address>, WalletError> {
            let raw: Vec<String> = Self::decode(self.request("eth_requestAccounts", None).await?)?;
            Ok(raw.into_iter().map(Address::new).collect())
        }

        async fn accounts(&self) -> Result<Vec<Address>, WalletError> {
            let raw: Vec<String> = Self::decode(self.request("eth_accounts", None).await?)?;
            Ok(raw.into_iter().map(Address::new).collect())
        }

        async fn chain_id(&self) -> Result<ChainId, WalletError> {
            let raw: String = Self::decode(self.request("eth_chainId", None).await?)?;
            Ok(ChainId::new(raw))
        }

        async fn balance_of(&self, address: &Address) -> Result<WeiAmount, WalletError> {
            let params = serde_json::json!([address.as_str(), "latest"]);
            let raw: String = Self::decode(self.request("eth_getBalance", Some(params)).await?)?;
            WeiAmount::from_hex(&raw).map_err(|e| WalletError::InvalidResponse(e.to_string()))
        }
    }

    /// Keeps a provider event listener registered; dropping it removes the
    /// listener by handler reference, so stale or duplicate handlers cannot
    /// outlive the view that installed them.
    pub struct EventSubscription {
        target: Ethereum,
        event: &'static str,
        handler: Closure<dyn FnMut(JsValue)>,
    }

    impl Drop for EventSubscription {
        fn drop(&mut self) {
            self.target
                .remove_listener(self.event, self.handler.as_ref().unchecked_ref());
        }
    }

    fn subscribe(
        event: &'static str,
        f: impl FnMut(JsValue) + 'static,
    ) -> Option<EventSubscription> {
        let target = injected()?;
        let handler: Closure<dyn FnMut(JsValue)> = Closure::new(f);
        target.on(event, handler.as_ref().unchecked_ref());
        Some(EventSubscription {
            target,
            event,
            handler,
        })
    }

    /// Registers `f` for the provider's account-set change notifications.
    pub fn watch_accounts(
        mut f: impl FnMut(Vec<Address>) + 'static,
    ) -> Option<EventSubscription> {
        subscribe("accountsChanged", move |payload| {
            match serde_wasm_bindgen::from_value::<Vec<String>>(payload) {
                Ok(accounts) => f(accounts.into_iter().map(Address::new).collect()),
                Err(e) => {
                    dioxus_logger::tracing::warn!("undecodable accountsChanged payload: {e}")
                }
            }
        })
    }

    /// Registers `f` for the provider's chain change notifications.
    pub fn watch_chain(mut f: impl FnMut(ChainId) + 'static) -> Option<EventSubscription> {
        subscribe("chainChanged", move |payload| match payload.as_string() {
            Some(chain) => f(ChainId::new(chain)),
            None => dioxus_logger::tracing::warn!("undecodable chainChanged payload"),
        })
    }
}

#[cfg(not(target_arch = "wasm32"))]
pub mod non_wasm32 {
    //! Off-wasm there is no injected provider: detection yields `None` and
    //! the watchers never fire.

    use std::rc::Rc;

    use api::chain::Address;
    use api::chain::ChainId;
    use api::provider::WalletProvider;

    pub struct EventSubscription;

    pub fn detect() -> Option<Rc<dyn WalletProvider>> {
        None
    }

    pub fn watch_accounts(
        _f: impl FnMut(Vec<Address>) + 'static,
    ) -> Option<EventSubscription> {
        None
    }

    pub fn watch_chain(_f: impl FnMut(ChainId) + 'static) -> Option<EventSubscription> {
        None
    }
}
