//! The wallet session controller: connection restore, manual
//! connect/disconnect, and provider push notifications.

use std::cell::Cell;
use std::cell::RefCell;
use std::rc::Rc;

use crate::chain::Address;
use crate::chain::ChainId;
use crate::error::WalletError;
use crate::notify::NotificationSink;
use crate::prefs::store::{self, PreferenceStore};
use crate::prefs::WALLET_DISCONNECTED_KEY;
use crate::provider::WalletProvider;

/// Where the session currently stands.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, strum::EnumIs)]
pub enum SessionPhase {
    /// No wallet provider detected in the environment. Terminal for the
    /// session unless the environment changes (not observed).
    NoProvider,
    /// Provider present, no active account.
    #[default]
    Idle,
    /// A manual authorization request is in flight.
    Connecting,
    /// An account is active.
    Connected,
}

/// UI-facing snapshot of the wallet session.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub struct WalletSession {
    pub phase: SessionPhase,
    pub address: Option<Address>,
    pub chain: Option<ChainId>,
    /// Human-scale balance, already formatted for display. The raw wei value
    /// is not retained.
    pub balance_display: Option<String>,
    /// The user explicitly disconnected. Durable, and distinct from the
    /// transient absence of an address: it suppresses auto-restore on the
    /// next load even if the provider still reports an authorized account.
    pub user_disconnected: bool,
}

impl WalletSession {
    pub fn provider_present(&self) -> bool {
        !self.phase.is_no_provider()
    }
}

type Observer = Rc<dyn Fn(WalletSession)>;

/// Drives the session state machine against the injected capabilities.
///
/// Single-threaded and cooperative: interior mutability instead of locks,
/// and a fetch generation instead of cancellation. Every fetch sequence
/// claims a fresh generation; `disconnect` bumps it as well, so results
/// arriving for a superseded generation are discarded instead of applied
/// over cleared state. Methods take `&self` so spawned UI futures can share
/// the controller behind an `Rc`.
pub struct SessionController {
    provider: Option<Rc<dyn WalletProvider>>,
    notices: Rc<dyn NotificationSink>,
    prefs: Rc<dyn PreferenceStore>,
    state: RefCell<WalletSession>,
    generation: Cell<u64>,
    observer: RefCell<Option<Observer>>,
}

impl SessionController {
    /// `provider: None` means no wallet capability was detected; the session
    /// is pinned to [`SessionPhase::NoProvider`].
    pub fn new(
        provider: Option<Rc<dyn WalletProvider>>,
        notices: Rc<dyn NotificationSink>,
        prefs: Rc<dyn PreferenceStore>,
    ) -> Self {
        let user_disconnected = store::read(&*prefs, WALLET_DISCONNECTED_KEY, false);
        let phase = if provider.is_some() {
            SessionPhase::Idle
        } else {
            SessionPhase::NoProvider
        };
        Self {
            provider,
            notices,
            prefs,
            state: RefCell::new(WalletSession {
                phase,
                user_disconnected,
                ..Default::default()
            }),
            generation: Cell::new(0),
            observer: RefCell::new(None),
        }
    }

    /// Registers a callback invoked with a fresh snapshot after every state
    /// change. The UI points this at a reactive signal.
    pub fn set_observer(&self, observer: impl Fn(WalletSession) + 'static) {
        *self.observer.borrow_mut() = Some(Rc::new(observer));
    }

    pub fn snapshot(&self) -> WalletSession {
        self.state.borrow().clone()
    }

    /// Mount-time probe: restores a previously authorized session unless the
    /// user explicitly disconnected. Probe failures are logged and swallowed;
    /// the session simply stays idle.
    pub async fn restore(&self) -> WalletSession {
        let Some(provider) = self.provider.clone() else {
            return self.snapshot();
        };
        let user_disconnected = self.state.borrow().user_disconnected;
        if user_disconnected {
            return self.snapshot();
        }
        let generation = self.next_generation();
        match self.probe(&*provider, generation).await {
            Ok(true) => self.notices.info("Restored previous wallet connection"),
            Ok(false) => {}
            Err(e) => {
                tracing::warn!("failed to check wallet connection: {e}");
                if self.is_current(generation) {
                    self.clear_session();
                }
            }
        }
        self.snapshot()
    }

    /// Manual connect: asks the provider for authorization, then runs the
    /// fetch sequence. Clears the durable disconnect flag on success.
    pub async fn connect(&self) -> WalletSession {
        let Some(provider) = self.provider.clone() else {
            self.notices.error("MetaMask not detected. Please install it.");
            return self.snapshot();
        };
        let generation = self.next_generation();
        self.mutate(|s| s.phase = SessionPhase::Connecting);
        match self.authorize(&*provider, generation).await {
            Ok(true) => {
                self.set_user_disconnected(false);
                self.notices.success("Wallet connected");
            }
            // Superseded mid-flight; whoever bumped the generation owns the
            // state now.
            Ok(false) => {}
            Err(e) => {
                tracing::warn!("wallet connect failed: {e}");
                if self.is_current(generation) {
                    self.clear_session();
                }
                self.notices.error("Connection failed");
            }
        }
        self.snapshot()
    }

    /// Local-only disconnect: clears session state and suppresses
    /// auto-restore on the next load. No revocation request is sent — the
    /// provider keeps whatever authorization it had.
    pub fn disconnect(&self) -> WalletSession {
        // Invalidate any in-flight fetch sequence.
        self.next_generation();
        self.clear_session();
        self.set_user_disconnected(true);
        self.notices.info("Disconnected");
        self.snapshot()
    }

    /// Provider push: the authorized account set changed.
    ///
    /// A non-empty set adopts the first account and re-runs the full
    /// chain+balance fetch sequence for it. An empty set clears the active
    /// account without touching the durable disconnect flag.
    pub async fn accounts_changed(&self, accounts: Vec<Address>) -> WalletSession {
        match accounts.into_iter().next() {
            Some(account) => {
                let Some(provider) = self.provider.clone() else {
                    return self.snapshot();
                };
                let generation = self.next_generation();
                self.set_user_disconnected(false);
                match self.adopt(&*provider, account, generation).await {
                    Ok(true) => self.notices.success("Wallet connected"),
                    Ok(false) => {}
                    // Keep the adopted address; chain and balance refresh on
                    // the next successful fetch.
                    Err(e) => tracing::warn!("account change fetch failed: {e}"),
                }
            }
            None => {
                self.next_generation();
                self.clear_session();
                self.notices.info("Wallet disconnected");
            }
        }
        self.snapshot()
    }

    /// Provider push: the chain changed. Only the stored id is updated; the
    /// balance is not re-fetched until the next connect. Ignored while no
    /// account is active.
    pub fn chain_changed(&self, chain: ChainId) -> WalletSession {
        let has_account = self.state.borrow().address.is_some();
        if has_account {
            self.mutate(|s| s.chain = Some(chain));
        }
        self.snapshot()
    }

    async fn probe(
        &self,
        provider: &dyn WalletProvider,
        generation: u64,
    ) -> Result<bool, WalletError> {
        let accounts = provider.accounts().await?;
        if !self.is_current(generation) {
            return Ok(false);
        }
        match accounts.into_iter().next() {
            Some(account) => self.adopt(provider, account, generation).await,
            None => Ok(false),
        }
    }

    async fn authorize(
        &self,
        provider: &dyn WalletProvider,
        generation: u64,
    ) -> Result<bool, WalletError> {
        let accounts = provider.request_accounts().await?;
        if !self.is_current(generation) {
            return Ok(false);
        }
        let Some(account) = accounts.into_iter().next() else {
            return Err(WalletError::InvalidResponse(
                "authorization returned no accounts".into(),
            ));
        };
        self.adopt(provider, account, generation).await
    }

    /// Post-acquisition fetch sequence: chain id, then balance, strictly in
    /// that order, for the just-acquired `account`. Returns `Ok(false)` when
    /// the sequence was superseded and its results discarded.
    async fn adopt(
        &self,
        provider: &dyn WalletProvider,
        account: Address,
        generation: u64,
    ) -> Result<bool, WalletError> {
        if !self.is_current(generation) {
            return Ok(false);
        }
        self.mutate(|s| {
            s.address = Some(account.clone());
            s.chain = None;
            s.balance_display = None;
            s.phase = SessionPhase::Connected;
        });
        let chain = provider.chain_id().await?;
        if !self.is_current(generation) {
            return Ok(false);
        }
        self.mutate(|s| s.chain = Some(chain));
        let balance = provider.balance_of(&account).await?;
        if !self.is_current(generation) {
            return Ok(false);
        }
        self.mutate(|s| s.balance_display = Some(balance.format_eth()));
        Ok(true)
    }

    fn clear_session(&self) {
        self.mutate(|s| {
            s.address = None;
            s.chain = None;
            s.balance_display = None;
            if !s.phase.is_no_provider() {
                s.phase = SessionPhase::Idle;
            }
        });
    }

    /// Reconciles the durable flag and the in-memory copy on every change.
    fn set_user_disconnected(&self, value: bool) {
        self.mutate(|s| s.user_disconnected = value);
        store::write(&*self.prefs, WALLET_DISCONNECTED_KEY, &value);
    }

    fn mutate(&self, f: impl FnOnce(&mut WalletSession)) {
        f(&mut self.state.borrow_mut());
        self.publish();
    }

    fn publish(&self) {
        let observer = self.observer.borrow().clone();
        if let Some(observer) = observer {
            observer(self.snapshot());
        }
    }

    fn next_generation(&self) -> u64 {
        let generation = self.generation.get().wrapping_add(1);
        self.generation.set(generation);
        generation
    }

    fn is_current(&self, generation: u64) -> bool {
        self.generation.get() == generation
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use futures::channel::oneshot;

    use super::*;
    use crate::amount::WeiAmount;
    use crate::notify::NoticeLevel;
    use crate::prefs::store::MemoryStore;

    const ALICE: &str = "0x1111111111111111111111111111111111111111";
    const BOB: &str = "0x2222222222222222222222222222222222222222";
    const ONE_ETH: &str = "0xDE0B6B3A7640000";
    const TWO_ETH: &str = "0x1BC16D674EC80000";

    struct ScriptedProvider {
        authorized: RefCell<Vec<Address>>,
        grant: RefCell<Result<Vec<Address>, WalletError>>,
        chain: RefCell<ChainId>,
        balances: RefCell<HashMap<String, WeiAmount>>,
        accounts_fail: Cell<bool>,
        balance_gate: RefCell<Option<oneshot::Receiver<()>>>,
        calls: RefCell<Vec<&'static str>>,
    }

    impl ScriptedProvider {
        fn new() -> Self {
            Self {
                authorized: RefCell::new(Vec::new()),
                grant: RefCell::new(Err(WalletError::AuthorizationDenied("rejected".into()))),
                chain: RefCell::new(ChainId::new("0x1")),
                balances: RefCell::new(HashMap::new()),
                accounts_fail: Cell::new(false),
                balance_gate: RefCell::new(None),
                calls: RefCell::new(Vec::new()),
            }
        }

        fn authorized(self, address: &str) -> Self {
            self.authorized.borrow_mut().push(Address::new(address));
            self
        }

        fn granting(self, addresses: &[&str]) -> Self {
            *self.grant.borrow_mut() = Ok(addresses.iter().map(|a| Address::new(*a)).collect());
            self
        }

        fn balance(self, address: &str, hex: &str) -> Self {
            self.balances
                .borrow_mut()
                .insert(address.to_string(), WeiAmount::from_hex(hex).unwrap());
            self
        }

        fn failing_accounts(self) -> Self {
            self.accounts_fail.set(true);
            self
        }

        fn gated_balance(self) -> (Self, oneshot::Sender<()>) {
            let (tx, rx) = oneshot::channel();
            *self.balance_gate.borrow_mut() = Some(rx);
            (self, tx)
        }

        fn calls(&self) -> Vec<&'static str> {
            self.calls.borrow().clone()
        }
    }

    #[async_trait::async_trait(?Send)]
    impl WalletProvider for ScriptedProvider {
        async fn request_accounts(&self) -> Result<Vec<Address>, WalletError> {
            self.calls.borrow_mut().push("request_accounts");
            self.grant.borrow().clone()
        }

        async fn accounts(&self) -> Result<Vec<Address>, WalletError> {
            self.calls.borrow_mut().push("accounts");
            if self.accounts_fail.get() {
                return Err(WalletError::Rpc("rpc down".into()));
            }
            Ok(self.authorized.borrow().clone())
        }

        async fn chain_id(&self) -> Result<ChainId, WalletError> {
            self.calls.borrow_mut().push("chain_id");
            Ok(self.chain.borrow().clone())
        }

        async fn balance_of(&self, address: &Address) -> Result<WeiAmount, WalletError> {
            self.calls.borrow_mut().push("balance_of");
            let gate = self.balance_gate.borrow_mut().take();
            if let Some(gate) = gate {
                let _ = gate.await;
            }
            self.balances
                .borrow()
                .get(address.as_str())
                .copied()
                .ok_or_else(|| WalletError::Rpc(format!("no balance for {address}")))
        }
    }

    #[derive(Default)]
    struct RecordingSink {
        notices: RefCell<Vec<(NoticeLevel, String)>>,
    }

    impl RecordingSink {
        fn messages(&self) -> Vec<String> {
            self.notices.borrow().iter().map(|(_, m)| m.clone()).collect()
        }
    }

    impl NotificationSink for RecordingSink {
        fn notify(&self, level: NoticeLevel, message: &str) {
            self.notices.borrow_mut().push((level, message.to_string()));
        }
    }

    struct Harness {
        controller: SessionController,
        provider: Option<Rc<ScriptedProvider>>,
        sink: Rc<RecordingSink>,
        prefs: Rc<MemoryStore>,
    }

    fn harness(provider: Option<ScriptedProvider>, disconnected: bool) -> Harness {
        let provider = provider.map(Rc::new);
        let sink = Rc::new(RecordingSink::default());
        let prefs = Rc::new(MemoryStore::new());
        if disconnected {
            store::write(&*prefs, WALLET_DISCONNECTED_KEY, &true);
        }
        let controller = SessionController::new(
            provider.clone().map(|p| p as Rc<dyn WalletProvider>),
            sink.clone(),
            prefs.clone(),
        );
        Harness {
            controller,
            provider,
            sink,
            prefs,
        }
    }

    fn persisted_flag(prefs: &MemoryStore) -> bool {
        store::read(prefs, WALLET_DISCONNECTED_KEY, false)
    }

    #[tokio::test]
    async fn no_provider_pins_phase_and_connect_surfaces_install_prompt() {
        let h = harness(None, false);
        assert!(h.controller.snapshot().phase.is_no_provider());

        let session = h.controller.connect().await;
        assert!(session.phase.is_no_provider());
        assert_eq!(
            h.sink.messages(),
            vec!["MetaMask not detected. Please install it."]
        );
    }

    #[tokio::test]
    async fn restore_adopts_authorized_account() {
        let provider = ScriptedProvider::new().authorized(ALICE).balance(ALICE, ONE_ETH);
        let h = harness(Some(provider), false);

        let session = h.controller.restore().await;

        assert!(session.phase.is_connected());
        assert_eq!(session.address, Some(Address::new(ALICE)));
        assert_eq!(session.chain, Some(ChainId::new("0x1")));
        assert_eq!(session.balance_display.as_deref(), Some("1.0000"));
        assert_eq!(h.sink.messages(), vec!["Restored previous wallet connection"]);
        assert_eq!(
            h.provider.unwrap().calls(),
            vec!["accounts", "chain_id", "balance_of"]
        );
    }

    #[tokio::test]
    async fn restore_respects_explicit_disconnect() {
        let provider = ScriptedProvider::new().authorized(ALICE).balance(ALICE, ONE_ETH);
        let h = harness(Some(provider), true);

        let session = h.controller.restore().await;

        assert!(session.phase.is_idle());
        assert_eq!(session.address, None);
        assert!(session.user_disconnected);
        assert!(h.sink.messages().is_empty());
        // The flag is checked before the provider is queried at all.
        assert!(h.provider.unwrap().calls().is_empty());
    }

    #[tokio::test]
    async fn restore_with_no_authorized_accounts_stays_idle() {
        let h = harness(Some(ScriptedProvider::new()), false);
        let session = h.controller.restore().await;
        assert!(session.phase.is_idle());
        assert_eq!(session.address, None);
        assert!(h.sink.messages().is_empty());
    }

    #[tokio::test]
    async fn restore_swallows_probe_failures() {
        let provider = ScriptedProvider::new().authorized(ALICE).failing_accounts();
        let h = harness(Some(provider), false);

        let session = h.controller.restore().await;

        assert!(session.phase.is_idle());
        assert_eq!(session.address, None);
        assert!(h.sink.messages().is_empty());
    }

    #[tokio::test]
    async fn connect_adopts_and_clears_disconnect_flag() {
        let provider = ScriptedProvider::new()
            .granting(&[ALICE])
            .balance(ALICE, ONE_ETH);
        let h = harness(Some(provider), true);

        let session = h.controller.connect().await;

        assert!(session.phase.is_connected());
        assert_eq!(session.address, Some(Address::new(ALICE)));
        assert_eq!(session.balance_display.as_deref(), Some("1.0000"));
        assert!(!session.user_disconnected);
        assert!(!persisted_flag(&h.prefs));
        assert_eq!(h.sink.messages(), vec!["Wallet connected"]);
    }

    #[tokio::test]
    async fn connect_rejection_notifies_and_returns_to_idle() {
        let h = harness(Some(ScriptedProvider::new()), false);

        let session = h.controller.connect().await;

        assert!(session.phase.is_idle());
        assert_eq!(session.address, None);
        assert_eq!(
            h.sink.notices.borrow().clone(),
            vec![(NoticeLevel::Error, "Connection failed".to_string())]
        );
    }

    #[tokio::test]
    async fn connect_with_empty_grant_fails() {
        let provider = ScriptedProvider::new().granting(&[]);
        let h = harness(Some(provider), false);

        let session = h.controller.connect().await;

        assert!(session.phase.is_idle());
        assert_eq!(h.sink.messages(), vec!["Connection failed"]);
    }

    #[tokio::test]
    async fn disconnect_clears_session_and_sets_flag() {
        let provider = ScriptedProvider::new()
            .granting(&[ALICE])
            .balance(ALICE, ONE_ETH);
        let h = harness(Some(provider), false);
        h.controller.connect().await;

        let session = h.controller.disconnect();

        assert!(session.phase.is_idle());
        assert_eq!(session.address, None);
        assert_eq!(session.chain, None);
        assert_eq!(session.balance_display, None);
        assert!(session.user_disconnected);
        assert!(persisted_flag(&h.prefs));
        assert_eq!(h.sink.messages(), vec!["Wallet connected", "Disconnected"]);
    }

    #[tokio::test]
    async fn accounts_push_adopts_new_account_with_fresh_fetch() {
        let provider = ScriptedProvider::new()
            .granting(&[ALICE])
            .balance(ALICE, ONE_ETH)
            .balance(BOB, TWO_ETH);
        let h = harness(Some(provider), false);
        h.controller.connect().await;

        let session = h.controller.accounts_changed(vec![Address::new(BOB)]).await;

        assert!(session.phase.is_connected());
        assert_eq!(session.address, Some(Address::new(BOB)));
        assert_eq!(session.balance_display.as_deref(), Some("2.0000"));
        assert!(!session.user_disconnected);
        assert_eq!(
            h.sink.messages(),
            vec!["Wallet connected", "Wallet connected"]
        );
    }

    #[tokio::test]
    async fn empty_accounts_push_clears_account_but_not_flag() {
        let provider = ScriptedProvider::new()
            .granting(&[ALICE])
            .balance(ALICE, ONE_ETH);
        let h = harness(Some(provider), false);
        h.controller.connect().await;

        let session = h.controller.accounts_changed(Vec::new()).await;

        assert!(session.phase.is_idle());
        assert_eq!(session.address, None);
        assert_eq!(session.chain, None);
        assert_eq!(session.balance_display, None);
        assert!(!session.user_disconnected);
        assert_eq!(
            h.sink.messages(),
            vec!["Wallet connected", "Wallet disconnected"]
        );
    }

    #[tokio::test]
    async fn chain_push_updates_only_chain() {
        let provider = ScriptedProvider::new()
            .granting(&[ALICE])
            .balance(ALICE, ONE_ETH);
        let h = harness(Some(provider), false);
        h.controller.connect().await;

        let session = h.controller.chain_changed(ChainId::new("0x89"));

        assert_eq!(session.chain, Some(ChainId::new("0x89")));
        // The balance is intentionally left as-is until the next connect.
        assert_eq!(session.balance_display.as_deref(), Some("1.0000"));
    }

    #[tokio::test]
    async fn chain_push_ignored_without_active_account() {
        let h = harness(Some(ScriptedProvider::new()), false);
        let session = h.controller.chain_changed(ChainId::new("0x89"));
        assert_eq!(session.chain, None);
    }

    #[tokio::test]
    async fn disconnect_discards_in_flight_fetch() {
        let (provider, release_balance) = ScriptedProvider::new()
            .granting(&[ALICE])
            .balance(ALICE, ONE_ETH)
            .gated_balance();
        let h = harness(Some(provider), false);

        let connect = h.controller.connect();
        let interrupt = async {
            // `connect` has adopted the address and is parked on the balance
            // fetch by the time this runs.
            assert_eq!(h.controller.snapshot().address, Some(Address::new(ALICE)));
            h.controller.disconnect();
            let _ = release_balance.send(());
        };
        let (session, _) = futures::join!(connect, interrupt);

        // The stale balance resolution must not resurrect the session.
        assert!(session.phase.is_idle());
        assert_eq!(session.address, None);
        assert_eq!(session.balance_display, None);
        assert!(session.user_disconnected);
        assert!(persisted_flag(&h.prefs));
        assert_eq!(h.sink.messages(), vec!["Disconnected"]);
    }

    #[tokio::test]
    async fn observer_sees_every_snapshot() {
        let provider = ScriptedProvider::new()
            .granting(&[ALICE])
            .balance(ALICE, ONE_ETH);
        let h = harness(Some(provider), false);
        let seen: Rc<RefCell<Vec<WalletSession>>> = Rc::default();
        let sink = seen.clone();
        h.controller.set_observer(move |s| sink.borrow_mut().push(s));

        h.controller.connect().await;

        let seen = seen.borrow();
        assert!(seen.iter().any(|s| s.phase.is_connecting()));
        assert!(seen.last().is_some_and(|s| s.phase.is_connected()));
    }
}
