//! Share accounting of the wrapped vault token.
//!
//! Freshly reported profit is locked and released linearly, so free funds
//! (and therefore the share price) only grow between reports.

use crate::error::{RouterError, RouterResult};
use crate::rounding::{Rounding, mul_div};
use primitive_types::U256;
use serde::{Deserialize, Serialize};

/// Snapshot of the vault's share accounting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VaultState {
    /// Basket tokens under management, locked profit included.
    pub total_assets: U256,
    /// Outstanding shares.
    pub total_supply: U256,
    /// Profit locked at the last report.
    pub locked_profit: U256,
    /// Timestamp of the last report.
    pub last_report: u64,
    /// Locked profit released per second, in asset units.
    pub degradation_per_second: U256,
}

impl VaultState {
    /// An empty vault.
    pub fn empty(degradation_per_second: U256) -> Self {
        Self {
            total_assets: U256::zero(),
            total_supply: U256::zero(),
            locked_profit: U256::zero(),
            last_report: 0,
            degradation_per_second,
        }
    }

    /// Locked profit still outstanding at `now`.
    ///
    /// formula: max(0, locked_profit - degradation_per_second * (now - last_report))
    #[must_use]
    pub fn locked_profit_at(&self, now: u64) -> U256 {
        let elapsed = U256::from(now.saturating_sub(self.last_report));
        let released = self.degradation_per_second.saturating_mul(elapsed);
        self.locked_profit.saturating_sub(released)
    }

    /// Assets that back shares at `now`.
    #[must_use]
    pub fn free_funds(&self, now: u64) -> U256 {
        self.total_assets.saturating_sub(self.locked_profit_at(now))
    }

    /// Seconds after `last_report` until all locked profit is released.
    #[must_use]
    pub fn seconds_until_unlocked(&self) -> Option<u64> {
        if self.locked_profit.is_zero() {
            return Some(0);
        }
        if self.degradation_per_second.is_zero() {
            return None;
        }
        let secs = mul_div(
            self.locked_profit,
            U256::one(),
            self.degradation_per_second,
            Rounding::Up,
        )
        .ok()?;
        if secs > U256::from(u64::MAX) {
            return None;
        }
        Some(secs.as_u64())
    }

    /// Shares minted for depositing `amount` at `now`, floored.
    ///
    /// An empty vault mints 1:1.
    pub fn shares_for_deposit(&self, amount: U256, now: u64) -> RouterResult<U256> {
        if self.total_supply.is_zero() {
            return Ok(amount);
        }
        let free_funds = self.free_funds(now);
        if free_funds.is_zero() {
            return Err(RouterError::InsufficientLiquidity);
        }
        mul_div(amount, self.total_supply, free_funds, Rounding::Down)
    }

    /// Assets represented by `shares` at `now`.
    pub fn assets_for_shares(&self, shares: U256, now: u64, rounding: Rounding) -> RouterResult<U256> {
        if self.total_supply.is_zero() {
            return Ok(shares);
        }
        mul_div(shares, self.free_funds(now), self.total_supply, rounding)
    }

    /// Shares equivalent to `assets` at `now`. With [`Rounding::Up`] this is
    /// the number of shares to withdraw to receive at least `assets`.
    pub fn shares_for_assets(&self, assets: U256, now: u64, rounding: Rounding) -> RouterResult<U256> {
        if self.total_supply.is_zero() {
            return Ok(assets);
        }
        let free_funds = self.free_funds(now);
        if free_funds.is_zero() {
            return Err(RouterError::InsufficientLiquidity);
        }
        mul_div(assets, self.total_supply, free_funds, rounding)
    }

    /// Records a deposit of `assets` minting `shares`.
    pub fn apply_deposit(&mut self, assets: U256, shares: U256) -> RouterResult<()> {
        self.total_assets = self
            .total_assets
            .checked_add(assets)
            .ok_or(RouterError::Overflow("vault assets"))?;
        self.total_supply = self
            .total_supply
            .checked_add(shares)
            .ok_or(RouterError::Overflow("vault supply"))?;
        Ok(())
    }

    /// Records a withdrawal of `assets` burning `shares`.
    pub fn apply_withdraw(&mut self, assets: U256, shares: U256) -> RouterResult<()> {
        self.total_assets = self
            .total_assets
            .checked_sub(assets)
            .ok_or(RouterError::InsufficientLiquidity)?;
        self.total_supply = self
            .total_supply
            .checked_sub(shares)
            .ok_or(RouterError::InsufficientLiquidity)?;
        Ok(())
    }

    /// Records a harvest of `gain` at `now`; the gain is locked on top of
    /// whatever was still locked.
    pub fn apply_report(&mut self, gain: U256, now: u64) -> RouterResult<()> {
        let still_locked = self.locked_profit_at(now);
        self.total_assets = self
            .total_assets
            .checked_add(gain)
            .ok_or(RouterError::Overflow("vault assets"))?;
        self.locked_profit = still_locked
            .checked_add(gain)
            .ok_or(RouterError::Overflow("locked profit"))?;
        self.last_report = now;
        Ok(())
    }
}
