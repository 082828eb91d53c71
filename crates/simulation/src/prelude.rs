//! Prelude module for convenient imports.
//!
//! This module re-exports the most commonly used types from the crate.
//!
//! # Example
//!
//! ```rust
//! use wblt_simulation::prelude::*;
//! ```

// Basket
pub use crate::basket::{RATE_SCALE, SimBasket};

// Chain
pub use crate::chain::{DEFAULT_DECIMALS, SimChain, SimVault};

// Fixture
pub use crate::fixture::{Book, Fixture, GENESIS, units};

// Ledger
pub use crate::ledger::Ledger;

// Options and gauges
pub use crate::options::{PRICE_SCALE, SimGauge, SimOption};

// Snapshots
pub use crate::snapshot::{ChainSnapshot, SnapshotError};
