//! Durable user preferences.

pub mod store;
pub mod theme;

/// Storage key for the UI theme choice.
pub const THEME_KEY: &str = "theme";

/// Storage key for the explicit-disconnect flag.
pub const WALLET_DISCONNECTED_KEY: &str = "wallet_disconnected";
