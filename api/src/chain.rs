//! Account addresses and chain identifiers, kept verbatim as the provider
//! reports them.

use std::fmt;

use serde::Deserialize;
use serde::Serialize;

/// A wallet account address (the provider's `0x…` string).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Address(String);

impl Address {
    pub fn new(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    /// The full address text, e.g. for clipboard copy.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Shortened form for display: first six and last four characters.
    /// Addresses too short to abbreviate are returned whole.
    pub fn abbreviated(&self) -> String {
        match (self.0.get(..6), self.0.get(self.0.len().saturating_sub(4)..)) {
            (Some(head), Some(tail)) if self.0.len() > 10 => format!("{head}...{tail}"),
            _ => self.0.clone(),
        }
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A chain identifier in the provider's hex form, e.g. `"0x1"`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChainId(String);

impl ChainId {
    pub fn new(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Human name for well-known chains.
    pub fn name(&self) -> Option<&'static str> {
        match self.0.to_ascii_lowercase().as_str() {
            "0x1" => Some("Ethereum Mainnet"),
            "0xaa36a7" => Some("Sepolia"),
            "0x89" => Some("Polygon"),
            "0xa" => Some("OP Mainnet"),
            "0xa4b1" => Some("Arbitrum One"),
            "0x2105" => Some("Base"),
            "0x38" => Some("BNB Smart Chain"),
            _ => None,
        }
    }

    /// Display label: the well-known name, or the raw id for unknown chains.
    pub fn label(&self) -> String {
        match self.name() {
            Some(name) => name.to_string(),
            None => self.0.clone(),
        }
    }
}

impl fmt::Display for ChainId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn abbreviates_long_addresses() {
        let address = Address::new("0x1234567890123456789012345678901234567890");
        assert_eq!(address.abbreviated(), "0x1234...7890");
    }

    #[test]
    fn keeps_short_addresses_whole() {
        assert_eq!(Address::new("0x1234").abbreviated(), "0x1234");
        assert_eq!(Address::new("").abbreviated(), "");
    }

    #[test]
    fn labels_known_chains() {
        assert_eq!(ChainId::new("0x1").label(), "Ethereum Mainnet");
        assert_eq!(ChainId::new("0xAA36A7").label(), "Sepolia");
    }

    #[test]
    fn falls_back_to_raw_id_for_unknown_chains() {
        assert_eq!(ChainId::new("0xdeadbeef").label(), "0xdeadbeef");
    }
}
