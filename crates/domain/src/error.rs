//! Error taxonomy shared by every crate in the workspace.
//!
//! All router operations are all-or-nothing: any variant returned from an
//! entry point means the call was rolled back and no balance changed.

use crate::token::Address;
use primitive_types::U256;
use thiserror::Error;

/// Errors raised by quoting and execution.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RouterError {
    /// The call deadline has passed.
    #[error("expired: deadline {deadline} is before current time {now}")]
    Expired {
        /// Deadline supplied by the caller.
        deadline: u64,
        /// Ledger time when the call was made.
        now: u64,
    },

    /// The realized or quoted output is below the caller's minimum.
    #[error("insufficient output amount: got {actual}, minimum {minimum}")]
    InsufficientOutputAmount {
        /// Minimum accepted by the caller.
        minimum: U256,
        /// Quoted or realized amount.
        actual: U256,
    },

    /// The operation needs more input than the caller allowed.
    #[error("excessive input amount: needs {required}, maximum {maximum}")]
    ExcessiveInputAmount {
        /// Maximum accepted by the caller.
        maximum: U256,
        /// Amount that would be consumed.
        required: U256,
    },

    /// One side of a liquidity deposit or withdrawal fell below its minimum.
    #[error("insufficient {token:?} amount: got {actual}, minimum {minimum}")]
    InsufficientAmount {
        /// Token whose bound was violated.
        token: Address,
        /// Minimum accepted by the caller.
        minimum: U256,
        /// Amount that would be used or received.
        actual: U256,
    },

    /// Empty or disjoint hop sequence.
    #[error("invalid path: {0}")]
    InvalidPath(String),

    /// Unknown curve type or a token that is not part of the pool.
    #[error("invalid pool: {0}")]
    InvalidPool(String),

    /// Amount that cannot represent a token quantity.
    #[error("invalid amount: {0}")]
    InvalidAmount(String),

    /// No pool is registered for the requested pair and curve.
    #[error("no {kind} pool for {token_a:?}/{token_b:?}")]
    PoolNotFound {
        /// First token of the pair.
        token_a: Address,
        /// Second token of the pair.
        token_b: Address,
        /// Curve family that was looked up.
        kind: &'static str,
    },

    /// Option discount is larger than the option contract allows.
    #[error("discount {discount_bps} bps out of range (max {max_bps})")]
    DiscountOutOfRange {
        /// Requested discount.
        discount_bps: u16,
        /// Configured maximum.
        max_bps: u16,
    },

    /// Pool or vault has no liquidity to price against.
    #[error("insufficient liquidity")]
    InsufficientLiquidity,

    /// Token is neither the basket token nor an asset the basket accepts.
    #[error("unsupported token {0:?}")]
    UnsupportedToken(Address),

    /// Holder cannot cover a transfer.
    #[error("insufficient balance of {token:?} for {holder:?}: has {balance}, needs {needed}")]
    InsufficientBalance {
        /// Token being moved, `None` for the native asset.
        token: Option<Address>,
        /// Account being debited.
        holder: Address,
        /// Current balance.
        balance: U256,
        /// Amount requested.
        needed: U256,
    },

    /// The router would have ended the call holding a balance.
    #[error("router retained {amount} of {token:?}")]
    RetainedBalance {
        /// Token left behind, `None` for the native asset.
        token: Option<Address>,
        /// Amount left behind.
        amount: U256,
    },

    /// Newton iteration on the stable invariant did not converge.
    #[error("stable curve did not converge")]
    StableCurveDiverged,

    /// Option token is not registered.
    #[error("unknown option token {0:?}")]
    UnknownOption(Address),

    /// Gauge is not registered.
    #[error("unknown gauge {0:?}")]
    UnknownGauge(Address),

    /// Arithmetic overflow.
    #[error("overflow: {0}")]
    Overflow(&'static str),

    /// Division by zero.
    #[error("division by zero")]
    DivisionByZero,
}

/// Convenience alias used across the workspace.
pub type RouterResult<T> = Result<T, RouterError>;
