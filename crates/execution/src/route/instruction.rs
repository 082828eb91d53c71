//! Explicit transfer instructions a swap plan is made of.

use primitive_types::U256;
use serde::Serialize;
use std::fmt;
use wblt_domain::token::Address;

/// How one hop of a route is settled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Leg {
    /// Swap through a pair pool.
    Pool {
        pool: Address,
        token_in: Address,
        token_out: Address,
    },
    /// `asset` into wBLT through the basket and vault.
    Mint { asset: Address },
    /// wBLT into `asset`.
    Redeem { asset: Address },
}

impl Leg {
    #[must_use]
    pub fn is_vault(&self) -> bool {
        matches!(self, Self::Mint { .. } | Self::Redeem { .. })
    }

    /// Where this leg expects its input to be delivered.
    #[must_use]
    pub fn inbox(&self, router: Address) -> Address {
        match self {
            Self::Pool { pool, .. } => *pool,
            Self::Mint { .. } | Self::Redeem { .. } => router,
        }
    }
}

/// One step of a swap plan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Instruction {
    /// Plain token transfer.
    Pull {
        token: Address,
        from: Address,
        to: Address,
        amount: U256,
    },
    /// Pool swap; the input already sits in the pool.
    Swap {
        pool: Address,
        token_in: Address,
        amount_in: U256,
        to: Address,
    },
    /// Router-held `asset` into wBLT for `recipient`.
    Mint {
        asset: Address,
        amount: U256,
        recipient: Address,
    },
    /// Router-held wBLT into `asset` for `recipient`.
    Redeem {
        asset: Address,
        shares: U256,
        recipient: Address,
    },
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pull {
                token,
                from,
                to,
                amount,
            } => write!(f, "pull {amount} {token:?} {from:?} -> {to:?}"),
            Self::Swap {
                pool,
                token_in,
                amount_in,
                to,
            } => write!(f, "swap {amount_in} {token_in:?} in {pool:?} -> {to:?}"),
            Self::Mint {
                asset,
                amount,
                recipient,
            } => write!(f, "mint wBLT from {amount} {asset:?} -> {recipient:?}"),
            Self::Redeem {
                asset,
                shares,
                recipient,
            } => write!(f, "redeem {shares} wBLT into {asset:?} -> {recipient:?}"),
        }
    }
}
