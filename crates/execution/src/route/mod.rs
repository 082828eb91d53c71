//! Multi-hop routing: leg resolution, forward quotes and swap plans.

mod engine;
mod instruction;

pub use engine::{RouteEngine, SwapPlan, execute};
pub use instruction::{Instruction, Leg};
