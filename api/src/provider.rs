//! The wallet provider capability consumed by the session controller.

use async_trait::async_trait;

use crate::amount::WeiAmount;
use crate::chain::Address;
use crate::chain::ChainId;
use crate::error::WalletError;

/// Async surface of a browser-injected wallet provider.
///
/// Implementations live at the platform boundary (`window.ethereum` in the
/// web UI, scripted doubles in tests); the controller never touches browser
/// types directly. All calls are sequential request/response operations —
/// no timeouts or cancellation are applied here.
#[async_trait(?Send)]
pub trait WalletProvider {
    /// Requests authorization for account access. May prompt the user
    /// out-of-band and can be rejected.
    async fn request_accounts(&self) -> Result<Vec<Address>, WalletError>;

    /// Lists accounts that are already authorized, without prompting.
    async fn accounts(&self) -> Result<Vec<Address>, WalletError>;

    /// The chain id the provider is currently on, in hex form.
    async fn chain_id(&self) -> Result<ChainId, WalletError>;

    /// Raw balance of `address` in wei at the latest block.
    async fn balance_of(&self, address: &Address) -> Result<WeiAmount, WalletError>;
}
