//! Immutable router configuration.

use serde::{Deserialize, Serialize};
use wblt_domain::token::Address;

/// Addresses the router is deployed with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouterConfig {
    /// The router's own account. It must hold nothing between calls.
    pub address: Address,
    /// Wrapped native token used by the ETH entry points.
    pub weth: Address,
}

impl RouterConfig {
    #[must_use]
    pub fn new(address: Address, weth: Address) -> Self {
        Self { address, weth }
    }
}
