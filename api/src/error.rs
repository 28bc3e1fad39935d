use thiserror::Error;

/// Errors surfaced by wallet provider interactions.
///
/// None of these are fatal to the widget: the session degrades to the
/// install-prompt or idle state and, where the flow calls for it, reports
/// through the notification sink.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum WalletError {
    /// No wallet capability was detected in the environment.
    #[error("no wallet provider detected")]
    ProviderAbsent,

    /// The user rejected the authorization request.
    #[error("wallet authorization denied: {0}")]
    AuthorizationDenied(String),

    /// The provider call itself failed (transport or internal provider error).
    #[error("provider request failed: {0}")]
    Rpc(String),

    /// The provider answered with data the widget cannot decode.
    #[error("malformed provider response: {0}")]
    InvalidResponse(String),
}
