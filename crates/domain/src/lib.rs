//! Core types and pure math for the wBLT router.
//!
//! This crate provides:
//! - Token, amount, pool and route types
//! - Stable and volatile curve pricing
//! - Pair liquidity arithmetic
//! - Vault share accounting with locked-profit decay
//! - The collaborator ports the router drives

/// Prelude module for convenient imports.
pub mod prelude;

/// Human-readable token amounts.
pub mod amount;
/// Error type shared by the workspace.
pub mod error;
/// Curve and liquidity formulas.
pub mod math;
/// Pools, hops and routes.
pub mod pool;
/// Collaborator interfaces.
pub mod ports;
/// Rounding direction and integer helpers.
pub mod rounding;
/// Token metadata.
pub mod token;
/// Vault share accounting.
pub mod vault;

#[cfg(test)]
mod proptest_properties;
