//! Prelude module for convenient imports.
//!
//! This module re-exports the most commonly used types from the crate.
//!
//! # Example
//!
//! ```rust
//! use wblt_execution::prelude::*;
//! ```

// Configuration
pub use crate::config::RouterConfig;
pub use crate::context::CallContext;

// Quoting
pub use crate::liquidity::{
    AddLiquidityQuote, AddLiquidityUnderlyingQuote, LiquidityQuoter, RemoveLiquidityQuote,
    RemoveLiquidityUnderlyingQuote,
};
pub use crate::options::{ExerciseOutcome, ExerciseQuote};
pub use crate::route::{Instruction, Leg, RouteEngine, SwapPlan};
pub use crate::vault_converter::VaultConverter;

// Router
pub use crate::router::{
    AddLiquidityOutcome, AddLiquidityParams, ExerciseParams, RemoveLiquidityOutcome,
    RemoveLiquidityParams, Router,
};

// Execution
pub use crate::shared::SharedChain;
pub use crate::unit_of_work::{UnitOfWork, atomically};
