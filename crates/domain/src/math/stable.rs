//! Stable-swap curve `x^3*y + y^3*x = k`.
//!
//! Every intermediate is an 18-decimal fixed-point integer and every division
//! floors, in the same order as the pool contracts, so quotes match
//! executions bit for bit.

use super::volatile::amount_after_fee;
use crate::error::{RouterError, RouterResult};
use crate::rounding::pow10;
use primitive_types::U256;

/// Upper bound on Newton rounds before giving up.
pub const MAX_ITERATIONS: usize = 255;

fn wad() -> U256 {
    U256::exp10(18)
}

fn mul(a: U256, b: U256) -> RouterResult<U256> {
    a.checked_mul(b).ok_or(RouterError::Overflow("stable curve"))
}

fn add(a: U256, b: U256) -> RouterResult<U256> {
    a.checked_add(b).ok_or(RouterError::Overflow("stable curve"))
}

/// Invariant on normalized reserves: `(x*y) * (x^2 + y^2)`.
pub fn f(x0: U256, y: U256) -> RouterResult<U256> {
    let a = mul(x0, y)? / wad();
    let b = add(mul(x0, x0)? / wad(), mul(y, y)? / wad())?;
    Ok(mul(a, b)? / wad())
}

/// Derivative of [`f`] with respect to `y`.
fn d(x0: U256, y: U256) -> RouterResult<U256> {
    let y2 = mul(y, y)? / wad();
    let lhs = mul(mul(U256::from(3u8), x0)?, y2)? / wad();
    let x2 = mul(x0, x0)? / wad();
    let rhs = mul(x2, x0)? / wad();
    add(lhs, rhs)
}

/// Solves `f(x0, y) = xy` for `y` starting from the current reserve.
pub fn get_y(x0: U256, xy: U256, mut y: U256) -> RouterResult<U256> {
    for _ in 0..MAX_ITERATIONS {
        let k = f(x0, y)?;
        let derivative = d(x0, y)?;
        if derivative.is_zero() {
            return Err(RouterError::StableCurveDiverged);
        }
        if k < xy {
            let mut dy = mul(xy - k, wad())? / derivative;
            if dy.is_zero() {
                if k == xy {
                    return Ok(y);
                }
                let next = add(y, U256::one())?;
                if f(x0, next)? > xy {
                    return Ok(next);
                }
                dy = U256::one();
            }
            y = add(y, dy)?;
        } else {
            let mut dy = mul(k - xy, wad())? / derivative;
            if dy.is_zero() {
                if k == xy || y.is_zero() || f(x0, y - U256::one())? < xy {
                    return Ok(y);
                }
                dy = U256::one();
            }
            y = y.checked_sub(dy).ok_or(RouterError::StableCurveDiverged)?;
        }
    }
    Err(RouterError::StableCurveDiverged)
}

fn normalize(amount: U256, decimals: u8) -> RouterResult<U256> {
    Ok(mul(amount, wad())? / pow10(decimals))
}

/// Invariant value for raw reserves of the given decimals.
pub fn calculate_k(
    reserve0: U256,
    reserve1: U256,
    decimals0: u8,
    decimals1: u8,
) -> RouterResult<U256> {
    f(normalize(reserve0, decimals0)?, normalize(reserve1, decimals1)?)
}

/// Output amount for `amount_in` on a stable pool.
///
/// Zero reserves on either side yield zero output.
pub fn calculate_out_amount(
    amount_in: U256,
    reserve_in: U256,
    reserve_out: U256,
    decimals_in: u8,
    decimals_out: u8,
    fee_bps: u16,
) -> RouterResult<U256> {
    if amount_in.is_zero() || reserve_in.is_zero() || reserve_out.is_zero() {
        return Ok(U256::zero());
    }
    let amount_in = amount_after_fee(amount_in, fee_bps)?;

    let x_in = normalize(reserve_in, decimals_in)?;
    let x_out = normalize(reserve_out, decimals_out)?;
    let xy = f(x_in, x_out)?;
    let a_in = normalize(amount_in, decimals_in)?;

    let y_after = get_y(add(a_in, x_in)?, xy, x_out)?;
    let y = x_out
        .checked_sub(y_after)
        .ok_or(RouterError::StableCurveDiverged)?;
    Ok(mul(y, pow10(decimals_out))? / wad())
}
