//! Addresses and token metadata.

use primitive_types::H160;
use serde::{Deserialize, Serialize};

/// 20-byte account or contract address.
pub type Address = H160;

/// ERC-20 style token metadata.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Token {
    /// Contract address.
    pub address: Address,
    /// Ticker, e.g. `WETH`.
    pub symbol: String,
    /// Decimal places of the raw integer amount.
    pub decimals: u8,
}

impl Token {
    pub fn new(address: Address, symbol: impl Into<String>, decimals: u8) -> Self {
        Self {
            address,
            symbol: symbol.into(),
            decimals,
        }
    }
}
