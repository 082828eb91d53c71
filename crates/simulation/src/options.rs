//! Option tokens and LP gauges.

use primitive_types::U256;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use wblt_domain::error::{RouterError, RouterResult};
use wblt_domain::math::volatile::BPS;
use wblt_domain::ports::OptionInfo;
use wblt_domain::rounding::{Rounding, mul_div};
use wblt_domain::token::Address;

/// Fixed-point scale of the option oracle price.
pub const PRICE_SCALE: u64 = 1_000_000_000_000_000_000;

/// Option token with a fixed oracle price.
///
/// The option custodies its underlying tokens at its own address and
/// releases them into the LP pool on exercise.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimOption {
    pub info: OptionInfo,
    /// Payment token per option token, scaled by [`PRICE_SCALE`].
    pub oracle_price: U256,
    /// Receiver of strike payments.
    pub treasury: Address,
}

impl SimOption {
    /// Discounted strike for `amount` options.
    ///
    /// formula: amount * oracle_price / 1e18 * (10000 - discount) / 10000, floored
    pub fn strike(&self, amount: U256, discount_bps: u16) -> RouterResult<U256> {
        if discount_bps > self.info.max_lp_discount {
            return Err(RouterError::DiscountOutOfRange {
                discount_bps,
                max_bps: self.info.max_lp_discount,
            });
        }
        let full = mul_div(amount, self.oracle_price, PRICE_SCALE.into(), Rounding::Down)?;
        let keep = BPS.saturating_sub(u64::from(discount_bps));
        mul_div(full, keep.into(), BPS.into(), Rounding::Down)
    }
}

/// Staking gauge for one LP token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimGauge {
    /// LP token accepted for staking.
    pub lp_token: Address,
    /// Staked LP per account.
    pub staked: BTreeMap<Address, U256>,
}

impl SimGauge {
    #[must_use]
    pub fn new(lp_token: Address) -> Self {
        Self {
            lp_token,
            staked: BTreeMap::new(),
        }
    }

    #[must_use]
    pub fn staked_balance(&self, account: Address) -> U256 {
        self.staked.get(&account).copied().unwrap_or_default()
    }

    pub fn credit(&mut self, account: Address, amount: U256) -> RouterResult<()> {
        let entry = self.staked.entry(account).or_default();
        *entry = entry
            .checked_add(amount)
            .ok_or(RouterError::Overflow("gauge stake"))?;
        Ok(())
    }
}
