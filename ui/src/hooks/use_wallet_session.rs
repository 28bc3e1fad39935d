//! Hook wiring the wallet session controller into the component tree.

use std::rc::Rc;

use api::session::SessionController;
use api::session::WalletSession;
use dioxus::prelude::*;

use crate::compat;
use crate::compat::PlatformStore;
use crate::components::toast::use_toasts;
use crate::components::toast::ToastSink;
use crate::eth;

/// Handle over the live wallet session.
///
/// Cheap to copy into event handlers; the session signal re-renders
/// subscribers on every controller state change.
#[derive(Clone, Copy)]
pub struct WalletSessionHandle {
    session: Signal<WalletSession>,
    controller: CopyValue<Rc<SessionController>>,
}

impl WalletSessionHandle {
    /// Reactive snapshot of the session.
    pub fn session(&self) -> Signal<WalletSession> {
        self.session
    }

    /// User-initiated connect. Fire-and-forget: progress (including the
    /// transient Connecting phase) lands in the session signal through the
    /// controller observer.
    pub fn connect(&self) {
        let controller = (*self.controller.read()).clone();
        spawn(async move {
            controller.connect().await;
        });
    }

    /// Local-only disconnect.
    pub fn disconnect(&self) {
        self.controller.read().disconnect();
    }
}

/// Listener registrations kept for the component's lifetime; dropping them
/// on unmount unhooks the provider callbacks, so no stale-closure handler
/// survives the view.
struct SessionSubscriptions {
    _accounts: Option<eth::EventSubscription>,
    _chain: Option<eth::EventSubscription>,
}

impl SessionSubscriptions {
    fn install(controller: Rc<SessionController>) -> Self {
        let accounts = {
            let controller = controller.clone();
            eth::watch_accounts(move |accounts| {
                let controller = controller.clone();
                compat::spawn_detached(async move {
                    controller.accounts_changed(accounts).await;
                });
            })
        };
        let chain = eth::watch_chain(move |chain| {
            controller.chain_changed(chain);
        });
        Self {
            _accounts: accounts,
            _chain: chain,
        }
    }
}

/// Builds the session controller from the detected provider, the toast sink,
/// and the platform preference store; probes for a restorable session once
/// on mount.
pub fn use_wallet_session() -> WalletSessionHandle {
    let toasts = use_toasts();

    let controller = use_hook(|| {
        Rc::new(SessionController::new(
            eth::detect(),
            Rc::new(ToastSink::new(toasts)),
            Rc::new(PlatformStore),
        ))
    });

    let session = use_signal(|| controller.snapshot());

    let controller_value = use_hook(|| {
        controller.set_observer(move |snapshot| {
            let mut session = session;
            session.set(snapshot);
        });
        CopyValue::new(controller.clone())
    });

    // Keep the push subscriptions alive until unmount.
    let _subscriptions = use_hook(|| {
        let controller = controller.clone();
        Rc::new(SessionSubscriptions::install(controller))
    });

    // One-shot probe for a restorable session.
    use_future({
        let controller = controller.clone();
        move || {
            let controller = controller.clone();
            async move {
                controller.restore().await;
            }
        }
    });

    WalletSessionHandle {
        session,
        controller: controller_value,
    }
}
