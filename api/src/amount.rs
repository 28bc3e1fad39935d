//! Wei-denominated balances and their display conversion.

use std::fmt;

use thiserror::Error;

/// An error that can occur when parsing a provider balance string.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ParseWeiError {
    /// The string is empty (after any `0x` prefix).
    #[error("empty balance string")]
    Empty,
    /// The string contains non-hexadecimal characters.
    #[error("invalid hexadecimal balance")]
    InvalidHex,
    /// The value does not fit in 128 bits.
    #[error("balance value out of range")]
    Overflow,
}

const WEI_PER_ETH: u128 = 1_000_000_000_000_000_000;

/// Display precision: fixed number of fractional digits.
const DISPLAY_DECIMALS: u32 = 4;

/// A balance in wei, the chain's smallest unit.
///
/// Stored as an unsigned 128-bit integer. The provider reports balances as
/// hex strings, and 128 bits comfortably covers any real account balance.
/// The session keeps only the formatted display string, not this raw value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct WeiAmount(u128);

impl WeiAmount {
    pub fn new(wei: u128) -> Self {
        Self(wei)
    }

    pub fn as_wei(&self) -> u128 {
        self.0
    }

    /// Parses a provider balance string, with or without a `0x` prefix.
    pub fn from_hex(s: &str) -> Result<Self, ParseWeiError> {
        let digits = s
            .strip_prefix("0x")
            .or_else(|| s.strip_prefix("0X"))
            .unwrap_or(s);
        if digits.is_empty() {
            return Err(ParseWeiError::Empty);
        }
        u128::from_str_radix(digits, 16)
            .map(Self)
            .map_err(|e| match e.kind() {
                std::num::IntErrorKind::PosOverflow => ParseWeiError::Overflow,
                _ => ParseWeiError::InvalidHex,
            })
    }

    /// Formats the amount as a decimal ETH string with a fixed four-digit
    /// fraction, rounding half-up: `0xDE0B6B3A7640000` becomes `"1.0000"`.
    pub fn format_eth(&self) -> String {
        let step = WEI_PER_ETH / 10u128.pow(DISPLAY_DECIMALS);
        let scaled = self.0.saturating_add(step / 2) / step;
        let whole = scaled / 10u128.pow(DISPLAY_DECIMALS);
        let frac = scaled % 10u128.pow(DISPLAY_DECIMALS);
        format!("{}.{:0width$}", whole, frac, width = DISPLAY_DECIMALS as usize)
    }
}

/// Formats the raw wei value as a plain integer string.
impl fmt::Display for WeiAmount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_one_eth() {
        let wei = WeiAmount::from_hex("0xDE0B6B3A7640000").unwrap();
        assert_eq!(wei.as_wei(), WEI_PER_ETH);
        assert_eq!(wei.format_eth(), "1.0000");
    }

    #[test]
    fn parses_without_prefix_and_uppercase_prefix() {
        assert_eq!(
            WeiAmount::from_hex("DE0B6B3A7640000").unwrap().as_wei(),
            WEI_PER_ETH
        );
        assert_eq!(
            WeiAmount::from_hex("0XDE0B6B3A7640000").unwrap().as_wei(),
            WEI_PER_ETH
        );
    }

    #[test]
    fn formats_zero() {
        assert_eq!(WeiAmount::new(0).format_eth(), "0.0000");
    }

    #[test]
    fn rounds_half_up_at_display_precision() {
        // 0.00005 ETH rounds up to the smallest displayable step.
        assert_eq!(WeiAmount::new(50_000_000_000_000).format_eth(), "0.0001");
        // Just below the midpoint rounds down.
        assert_eq!(WeiAmount::new(49_999_999_999_999).format_eth(), "0.0000");
        // 1.23456789 ETH
        assert_eq!(
            WeiAmount::new(1_234_567_890_000_000_000).format_eth(),
            "1.2346"
        );
    }

    #[test]
    fn rejects_empty_and_garbage() {
        assert_eq!(WeiAmount::from_hex(""), Err(ParseWeiError::Empty));
        assert_eq!(WeiAmount::from_hex("0x"), Err(ParseWeiError::Empty));
        assert_eq!(WeiAmount::from_hex("0xZZZ"), Err(ParseWeiError::InvalidHex));
        assert_eq!(
            WeiAmount::from_hex("not a balance"),
            Err(ParseWeiError::InvalidHex)
        );
    }

    #[test]
    fn rejects_values_wider_than_128_bits() {
        let too_wide = format!("0x1{}", "0".repeat(32));
        assert_eq!(WeiAmount::from_hex(&too_wide), Err(ParseWeiError::Overflow));
    }
}
