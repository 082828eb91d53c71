//! Multi-asset basket priced by a fixed per-asset rate.
//!
//! The basket custodies accepted assets at its own token address. Mint and
//! redeem fees are charged in basis points on the output side.

use primitive_types::U256;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use wblt_domain::error::{RouterError, RouterResult};
use wblt_domain::math::volatile::BPS;
use wblt_domain::rounding::{Rounding, mul_div};
use wblt_domain::token::Address;

/// Fixed-point scale of basket rates.
pub const RATE_SCALE: u64 = 1_000_000_000_000_000_000;

/// Pricing parameters of the basket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimBasket {
    /// Basket token address, also the custody account.
    pub token: Address,
    /// Fee on minting, in basis points.
    pub mint_fee_bps: u16,
    /// Fee on redeeming, in basis points.
    pub redeem_fee_bps: u16,
    /// Basket raw units per asset raw unit, scaled by [`RATE_SCALE`].
    pub rates: BTreeMap<Address, U256>,
}

impl SimBasket {
    /// Creates a basket with no accepted assets.
    #[must_use]
    pub fn new(token: Address, mint_fee_bps: u16, redeem_fee_bps: u16) -> Self {
        Self {
            token,
            mint_fee_bps,
            redeem_fee_bps,
            rates: BTreeMap::new(),
        }
    }

    /// Accepts `asset` at `rate`.
    #[must_use]
    pub fn with_asset(mut self, asset: Address, rate: U256) -> Self {
        self.rates.insert(asset, rate);
        self
    }

    fn rate(&self, asset: Address) -> RouterResult<U256> {
        match self.rates.get(&asset) {
            Some(rate) if !rate.is_zero() => Ok(*rate),
            _ => Err(RouterError::UnsupportedToken(asset)),
        }
    }

    /// Whether `asset` is accepted.
    #[must_use]
    pub fn accepts(&self, asset: Address) -> bool {
        self.rate(asset).is_ok()
    }

    /// Basket minted for `amount` of `asset`.
    pub fn quote_mint(&self, asset: Address, amount: U256) -> RouterResult<U256> {
        let gross = mul_div(amount, self.rate(asset)?, RATE_SCALE.into(), Rounding::Down)?;
        net_of_fee(gross, self.mint_fee_bps, Rounding::Down)
    }

    /// Asset released for redeeming `basket_amount`.
    pub fn quote_redeem(&self, asset: Address, basket_amount: U256) -> RouterResult<U256> {
        let gross = mul_div(basket_amount, RATE_SCALE.into(), self.rate(asset)?, Rounding::Down)?;
        net_of_fee(gross, self.redeem_fee_bps, Rounding::Down)
    }

    /// Asset that mints at least `basket_amount`.
    pub fn quote_asset_for_basket(&self, asset: Address, basket_amount: U256) -> RouterResult<U256> {
        let gross = gross_of_fee(basket_amount, self.mint_fee_bps)?;
        mul_div(gross, RATE_SCALE.into(), self.rate(asset)?, Rounding::Up)
    }

    /// Basket that redeems to at least `amount` of `asset`.
    pub fn quote_basket_for_asset(&self, asset: Address, amount: U256) -> RouterResult<U256> {
        let gross = gross_of_fee(amount, self.redeem_fee_bps)?;
        mul_div(gross, self.rate(asset)?, RATE_SCALE.into(), Rounding::Up)
    }
}

fn net_of_fee(amount: U256, fee_bps: u16, rounding: Rounding) -> RouterResult<U256> {
    let keep = BPS
        .checked_sub(u64::from(fee_bps))
        .ok_or_else(|| RouterError::InvalidPool(format!("basket fee {fee_bps} bps")))?;
    mul_div(amount, keep.into(), BPS.into(), rounding)
}

fn gross_of_fee(amount: U256, fee_bps: u16) -> RouterResult<U256> {
    let keep = BPS
        .checked_sub(u64::from(fee_bps))
        .filter(|keep| *keep > 0)
        .ok_or_else(|| RouterError::InvalidPool(format!("basket fee {fee_bps} bps")))?;
    mul_div(amount, BPS.into(), keep.into(), Rounding::Up)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn weth() -> Address {
        Address::from_low_u64_be(1)
    }

    fn usdc() -> Address {
        Address::from_low_u64_be(2)
    }

    fn basket() -> SimBasket {
        // 1 WETH = 2000 BLT, 1 USDC (6 decimals) = 1 BLT (18 decimals)
        SimBasket::new(Address::from_low_u64_be(50), 25, 30)
            .with_asset(weth(), U256::from(2_000u64) * U256::from(RATE_SCALE))
            .with_asset(usdc(), U256::exp10(12) * U256::from(RATE_SCALE))
    }

    #[test]
    fn test_mint_and_redeem_quotes() {
        let b = basket();
        let minted = b.quote_mint(weth(), U256::exp10(18)).unwrap();
        // 2000e18 less 0.25%
        assert_eq!(minted, U256::from(1_995u64) * U256::exp10(18));
        let redeemed = b.quote_redeem(usdc(), U256::exp10(18)).unwrap();
        // 1e6 less 0.30%
        assert_eq!(redeemed, U256::from(997_000u64));
    }

    #[test]
    fn test_inverse_quotes_cover_target() {
        let b = basket();
        for target in [1u64, 7, 999_999, 1_234_567_891] {
            let target = U256::from(target) * U256::exp10(9);
            let asset = b.quote_asset_for_basket(weth(), target).unwrap();
            assert!(b.quote_mint(weth(), asset).unwrap() >= target);
            let basket_in = b.quote_basket_for_asset(usdc(), target).unwrap();
            assert!(b.quote_redeem(usdc(), basket_in).unwrap() >= target);
        }
    }

    #[test]
    fn test_unknown_asset_is_unsupported() {
        let b = basket();
        let other = Address::from_low_u64_be(3);
        assert!(!b.accepts(other));
        assert_eq!(
            b.quote_mint(other, U256::one()),
            Err(RouterError::UnsupportedToken(other))
        );
    }
}
