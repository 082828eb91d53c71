//! Pair-pool liquidity arithmetic: proportional quotes, optimal deposit
//! amounts, LP minted on deposit and tokens returned on withdrawal.

use crate::error::{RouterError, RouterResult};
use crate::rounding::{Rounding, mul_div};
use primitive_types::U256;

/// LP units locked forever on the first deposit into a pool.
pub const MINIMUM_LIQUIDITY: u64 = 1_000;

/// Amount of B with the same value as `amount_a` at the pool ratio.
///
/// formula: amount_a * reserve_b / reserve_a, floored
pub fn quote(amount_a: U256, reserve_a: U256, reserve_b: U256) -> RouterResult<U256> {
    if reserve_a.is_zero() || reserve_b.is_zero() {
        return Err(RouterError::InsufficientLiquidity);
    }
    mul_div(amount_a, reserve_b, reserve_a, Rounding::Down)
}

/// Two-sided optimal deposit for desired amounts against `(reserve_a, reserve_b)`.
///
/// Never returns more than desired on either side. An empty pool takes the
/// desired amounts as they are.
pub fn optimal_amounts(
    desired_a: U256,
    desired_b: U256,
    reserve_a: U256,
    reserve_b: U256,
) -> RouterResult<(U256, U256)> {
    if reserve_a.is_zero() && reserve_b.is_zero() {
        return Ok((desired_a, desired_b));
    }
    let optimal_b = quote(desired_a, reserve_a, reserve_b)?;
    if optimal_b <= desired_b {
        return Ok((desired_a, optimal_b));
    }
    let optimal_a = quote(desired_b, reserve_b, reserve_a)?;
    debug_assert!(optimal_a <= desired_a);
    Ok((optimal_a.min(desired_a), desired_b))
}

/// LP minted for depositing `(amount_a, amount_b)`.
pub fn liquidity_minted(
    amount_a: U256,
    amount_b: U256,
    reserve_a: U256,
    reserve_b: U256,
    total_supply: U256,
) -> RouterResult<U256> {
    if total_supply.is_zero() {
        let root = amount_a
            .checked_mul(amount_b)
            .ok_or(RouterError::Overflow("initial liquidity"))?
            .integer_sqrt();
        return root
            .checked_sub(U256::from(MINIMUM_LIQUIDITY))
            .filter(|l| !l.is_zero())
            .ok_or(RouterError::InsufficientLiquidity);
    }
    if reserve_a.is_zero() || reserve_b.is_zero() {
        return Err(RouterError::InsufficientLiquidity);
    }
    let by_a = mul_div(amount_a, total_supply, reserve_a, Rounding::Down)?;
    let by_b = mul_div(amount_b, total_supply, reserve_b, Rounding::Down)?;
    Ok(by_a.min(by_b))
}

/// Tokens returned for burning `liquidity`, floored on both sides.
pub fn liquidity_burned(
    liquidity: U256,
    reserve_a: U256,
    reserve_b: U256,
    total_supply: U256,
) -> RouterResult<(U256, U256)> {
    if total_supply.is_zero() {
        return Err(RouterError::InsufficientLiquidity);
    }
    if liquidity > total_supply {
        return Err(RouterError::InsufficientLiquidity);
    }
    let amount_a = mul_div(liquidity, reserve_a, total_supply, Rounding::Down)?;
    let amount_b = mul_div(liquidity, reserve_b, total_supply, Rounding::Down)?;
    Ok((amount_a, amount_b))
}
