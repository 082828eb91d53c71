//! Human-readable token amounts.

use crate::error::{RouterError, RouterResult};
use primitive_types::U256;
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Raw on-chain integer paired with its token decimals, for display and for
/// parsing human-entered amounts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Amount {
    /// Integer amount in the token's smallest unit.
    pub raw: U256,
    /// Token decimals.
    pub decimals: u8,
}

impl Amount {
    pub fn new(raw: U256, decimals: u8) -> Self {
        Self { raw, decimals }
    }

    /// Scales a human amount (e.g. `1.5` WETH) to raw units, truncating
    /// anything below the token's precision.
    pub fn from_decimal(d: Decimal, decimals: u8) -> RouterResult<Self> {
        if d.is_sign_negative() {
            return Err(RouterError::InvalidAmount(format!("negative amount {d}")));
        }
        let multiplier = 10u64
            .checked_pow(decimals as u32)
            .map(Decimal::from)
            .ok_or(RouterError::Overflow("amount decimals"))?;
        let raw_decimal = d
            .checked_mul(multiplier)
            .ok_or(RouterError::Overflow("amount scaling"))?
            .trunc();
        let raw_u128 = raw_decimal
            .to_u128()
            .ok_or(RouterError::Overflow("amount to u128"))?;
        Ok(Self {
            raw: U256::from(raw_u128),
            decimals,
        })
    }

    /// Converts back to a human amount, normalized.
    pub fn to_decimal(&self) -> RouterResult<Decimal> {
        if self.raw > U256::from(i128::MAX as u128) {
            return Err(RouterError::Overflow("amount to decimal"));
        }
        let raw = self.raw.as_u128() as i128;
        Decimal::try_from_i128_with_scale(raw, self.decimals as u32)
            .map(|d| d.normalize())
            .map_err(|_| RouterError::Overflow("amount to decimal"))
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.to_decimal() {
            Ok(d) => write!(f, "{}", d),
            Err(_) => write!(f, "{}e-{}", self.raw, self.decimals),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_from_decimal_scales_by_decimals() {
        let a = Amount::from_decimal(dec!(1.5), 18).unwrap();
        assert_eq!(a.raw, U256::from(1_500_000_000_000_000_000u128));

        let usdc = Amount::from_decimal(dec!(10000), 6).unwrap();
        assert_eq!(usdc.raw, U256::from(10_000_000_000u64));
    }

    #[test]
    fn test_from_decimal_truncates_dust() {
        let a = Amount::from_decimal(dec!(0.1234567), 6).unwrap();
        assert_eq!(a.raw, U256::from(123_456u64));
    }

    #[test]
    fn test_to_decimal() {
        let a = Amount::new(U256::from(996_006_981_039_903_216u128), 18);
        assert_eq!(a.to_decimal().unwrap(), dec!(0.996006981039903216));
        assert_eq!(a.to_string(), "0.996006981039903216");
    }

    #[test]
    fn test_negative_rejected() {
        assert_eq!(
            Amount::from_decimal(dec!(-1), 18),
            Err(RouterError::InvalidAmount("negative amount -1".to_string()))
        );
    }
}
