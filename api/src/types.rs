pub use alloy_primitives::{Address, Bytes, B256, U256};

use alloy_primitives::utils::{format_ether, parse_ether};

use crate::error::AbiError;

/// `0x1234...abcd` form for compact display.
pub fn short_address(address: &Address) -> String {
    let full = address.to_string();
    format!("{}...{}", &full[..6], &full[full.len() - 4..])
}

/// Formats an amount in ether, keeping at least one fractional digit.
pub fn to_ether(amount: U256) -> String {
    let formatted = format_ether(amount);
    match formatted.split_once('.') {
        Some((whole, frac)) => {
            let frac = frac.trim_end_matches('0');
            if frac.is_empty() {
                format!("{}.0", whole)
            } else {
                format!("{}.{}", whole, frac)
            }
        }
        None => format!("{}.0", formatted),
    }
}

/// Parses a decimal ether amount such as `"0.001"`.
pub fn from_ether(s: &str) -> Result<U256, AbiError> {
    parse_ether(s.trim()).map_err(|_| AbiError::InvalidAmount(s.to_string()))
}

#[cfg(test)]
mod tests {
    use alloy_primitives::address;

    use super::*;

    #[test]
    fn test_short_address() {
        let address = address!("5fbdb2315678afecb367f032d93f642f64180aa3");
        assert_eq!(short_address(&address).to_lowercase(), "0x5fbd...0aa3");
    }

    #[test]
    fn test_ether_formatting() {
        assert_eq!(to_ether(U256::ZERO), "0.0");
        assert_eq!(to_ether(U256::from(1_000_000_000_000_000u64)), "0.001");
        assert_eq!(to_ether(U256::from(1_500_000_000_000_000_000u128)), "1.5");
        assert_eq!(to_ether(U256::from(2_000_000_000_000_000_000u128)), "2.0");
    }

    #[test]
    fn test_from_ether() {
        assert_eq!(from_ether("0.001").unwrap(), U256::from(1_000_000_000_000_000u64));
        assert_eq!(from_ether("3").unwrap(), U256::from(3_000_000_000_000_000_000u128));
        assert!(from_ether("1.2.3").is_err());
        assert!(from_ether("abc").is_err());
    }

    #[test]
    fn test_amounts_beyond_u128() {
        let amount = U256::from(u128::MAX) * U256::from(10);
        let ether = to_ether(amount);
        assert_eq!(from_ether(&ether).unwrap(), amount);
    }
}
