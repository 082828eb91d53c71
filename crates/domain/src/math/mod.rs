//! Pure pricing formulas for the two pool curve families.

pub mod liquidity;
pub mod stable;
pub mod volatile;

use crate::error::RouterResult;
use crate::pool::{CurveKind, PoolState};
use crate::token::Address;
use primitive_types::U256;

/// Output of selling `amount_in` of `token_in` into `pool`.
///
/// Fails with `InvalidPool` if `token_in` is not one of the pool's tokens;
/// returns zero when either reserve is empty.
pub fn amount_out(pool: &PoolState, amount_in: U256, token_in: Address) -> RouterResult<U256> {
    let (reserve_in, reserve_out, decimals_in, decimals_out) = pool.oriented(token_in)?;
    match pool.curve {
        CurveKind::Volatile => {
            volatile::calculate_out_amount(amount_in, reserve_in, reserve_out, pool.fee_bps)
        }
        CurveKind::Stable => stable::calculate_out_amount(
            amount_in,
            reserve_in,
            reserve_out,
            decimals_in,
            decimals_out,
            pool.fee_bps,
        ),
    }
}

/// Invariant value of a pool's current reserves.
pub fn invariant(pool: &PoolState) -> RouterResult<U256> {
    match pool.curve {
        CurveKind::Volatile => volatile::calculate_k(pool.reserve0, pool.reserve1),
        CurveKind::Stable => {
            stable::calculate_k(pool.reserve0, pool.reserve1, pool.decimals0, pool.decimals1)
        }
    }
}
