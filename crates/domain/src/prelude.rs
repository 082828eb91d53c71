//! Prelude module for convenient imports.
//!
//! # Example
//!
//! ```rust
//! use wblt_domain::prelude::*;
//! ```

pub use crate::amount::Amount;
pub use crate::error::{RouterError, RouterResult};
pub use crate::pool::{CurveKind, Hop, PoolState, Route};
pub use crate::ports::{
    BasketPort, Chain, Clock, ExerciseReceipt, GaugePort, OptionInfo, OptionPort, PoolPort,
    TokenPort, VaultPort,
};
pub use crate::rounding::Rounding;
pub use crate::token::{Address, Token};
pub use crate::vault::VaultState;

pub use primitive_types::U256;
