pub mod use_persisted_state;
pub mod use_wallet_session;
