//! In-memory chain for exercising the router end to end.
//!
//! This crate provides:
//! - A token ledger with native balances and wrapping
//! - Pair pools priced with the domain curve math
//! - The wrapped vault and its multi-asset basket
//! - Option tokens that exercise into LP, and LP gauges
//! - JSON snapshot loading
//! - A ready-made fixture market

/// Prelude module for convenient imports.
pub mod prelude;

/// Multi-asset basket pricing.
pub mod basket;
/// Chain state and port implementations.
pub mod chain;
/// Ready-made market for tests and demos.
pub mod fixture;
/// Balance book.
pub mod ledger;
/// Option tokens and gauges.
pub mod options;
/// JSON snapshots.
pub mod snapshot;
