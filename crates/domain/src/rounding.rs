//! Explicit rounding direction and the integer helpers that honour it.

use crate::error::{RouterError, RouterResult};
use primitive_types::U256;
use serde::{Deserialize, Serialize};

/// Rounding direction for a division.
///
/// Minting and redeeming quotes need opposite conservative biases, so every
/// division that can go either way takes one of these instead of a flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Rounding {
    /// Round towards positive infinity (ceiling).
    Up,
    /// Round towards zero (floor).
    Down,
}

impl Rounding {
    /// Returns `true` if this is [`Rounding::Up`].
    #[must_use]
    pub const fn is_up(&self) -> bool {
        matches!(self, Self::Up)
    }

    /// Maps the legacy `round_up` flag.
    #[must_use]
    pub const fn from_round_up(round_up: bool) -> Self {
        if round_up { Self::Up } else { Self::Down }
    }
}

/// `a * b / denominator` with the requested rounding.
pub fn mul_div(a: U256, b: U256, denominator: U256, rounding: Rounding) -> RouterResult<U256> {
    if denominator.is_zero() {
        return Err(RouterError::DivisionByZero);
    }
    let product = a.checked_mul(b).ok_or(RouterError::Overflow("mul_div product"))?;
    let quotient = product / denominator;
    if rounding.is_up() && !(product % denominator).is_zero() {
        return quotient
            .checked_add(U256::one())
            .ok_or(RouterError::Overflow("mul_div round up"));
    }
    Ok(quotient)
}

/// `a / b` with the requested rounding.
pub fn div(a: U256, b: U256, rounding: Rounding) -> RouterResult<U256> {
    mul_div(a, U256::one(), b, rounding)
}

/// `10^decimals` as a U256.
#[must_use]
pub fn pow10(decimals: u8) -> U256 {
    U256::exp10(decimals as usize)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mul_div_directions() {
        let a = U256::from(10u64);
        let b = U256::from(10u64);
        let d = U256::from(3u64);
        assert_eq!(mul_div(a, b, d, Rounding::Down).unwrap(), U256::from(33u64));
        assert_eq!(mul_div(a, b, d, Rounding::Up).unwrap(), U256::from(34u64));
    }

    #[test]
    fn test_mul_div_exact_is_direction_independent() {
        let a = U256::from(12u64);
        let d = U256::from(4u64);
        assert_eq!(
            mul_div(a, U256::one(), d, Rounding::Up).unwrap(),
            mul_div(a, U256::one(), d, Rounding::Down).unwrap()
        );
    }

    #[test]
    fn test_mul_div_zero_denominator() {
        assert_eq!(
            mul_div(U256::one(), U256::one(), U256::zero(), Rounding::Down),
            Err(RouterError::DivisionByZero)
        );
    }

    #[test]
    fn test_mul_div_overflow() {
        assert!(matches!(
            mul_div(U256::MAX, U256::from(2u64), U256::one(), Rounding::Down),
            Err(RouterError::Overflow(_))
        ));
    }

    #[test]
    fn test_from_round_up() {
        assert_eq!(Rounding::from_round_up(true), Rounding::Up);
        assert_eq!(Rounding::from_round_up(false), Rounding::Down);
    }
}
