//! Constant-product curve with the fee taken from the input.

use crate::error::{RouterError, RouterResult};
use primitive_types::U256;

/// Basis-point denominator.
pub const BPS: u64 = 10_000;

/// Input left after the pool fee is taken.
///
/// formula: amount_in * (10000 - fee_bps) / 10000, floored
pub fn amount_after_fee(amount_in: U256, fee_bps: u16) -> RouterResult<U256> {
    if u64::from(fee_bps) > BPS {
        return Err(RouterError::InvalidPool(format!("fee {fee_bps} bps above 100%")));
    }
    let scaled = amount_in
        .checked_mul(U256::from(BPS - u64::from(fee_bps)))
        .ok_or(RouterError::Overflow("fee scaling"))?;
    Ok(scaled / U256::from(BPS))
}

/// Calculates the output amount for a given input amount in a constant product pool (x * y = k).
///
/// formula: dy = y * dx' / (x + dx'), where dx' is the input after fee
///
/// Zero reserves on either side yield zero output.
pub fn calculate_out_amount(
    amount_in: U256,
    reserve_in: U256,
    reserve_out: U256,
    fee_bps: u16,
) -> RouterResult<U256> {
    if amount_in.is_zero() || reserve_in.is_zero() || reserve_out.is_zero() {
        return Ok(U256::zero());
    }

    let amount_in_after_fee = amount_after_fee(amount_in, fee_bps)?;
    let numerator = reserve_out
        .checked_mul(amount_in_after_fee)
        .ok_or(RouterError::Overflow("volatile numerator"))?;
    let denominator = reserve_in
        .checked_add(amount_in_after_fee)
        .ok_or(RouterError::Overflow("volatile denominator"))?;

    Ok(numerator / denominator)
}

/// Calculates the constant product K
pub fn calculate_k(reserve0: U256, reserve1: U256) -> RouterResult<U256> {
    reserve0
        .checked_mul(reserve1)
        .ok_or(RouterError::Overflow("volatile k"))
}
