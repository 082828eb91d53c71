//! Routing and settlement over the wBLT vault and its pools.
//!
//! This crate provides the router itself:
//! - Multi-hop quoting and swap plans over stable and volatile pools
//! - Vault share conversion through the BLT basket
//! - Liquidity quotes that reconcile pool ratios with the share price
//! - Option exercise into staked LP
//! - Atomic execution with a zero-retention check
//! - A lock-guarded chain handle for concurrent callers

/// Prelude module for convenient imports.
pub mod prelude;

/// Router configuration.
pub mod config;
/// Per-call context.
pub mod context;
/// Liquidity quotes.
pub mod liquidity;
/// Option exercise.
pub mod options;
/// Multi-hop routes.
pub mod route;
/// Router entry points.
pub mod router;
/// Shared chain handle.
pub mod shared;
/// Atomic execution.
pub mod unit_of_work;
/// Asset and share conversion.
pub mod vault_converter;

#[cfg(test)]
mod proptest_properties;
