//! Interfaces of the external collaborators the router drives.
//!
//! Read methods take `&self` and never mutate. Write methods move balances
//! and may fail; the caller is expected to run them inside a unit of work so
//! a failure discards every earlier write of the same call.

use crate::error::RouterResult;
use crate::pool::PoolState;
use crate::token::Address;
use crate::vault::VaultState;
use primitive_types::U256;
use serde::{Deserialize, Serialize};

/// Fungible token balances plus the native asset and its wrapper.
pub trait TokenPort {
    /// Balance of `holder` in `token`.
    fn balance_of(&self, token: Address, holder: Address) -> U256;

    /// Moves `amount` of `token` from `from` to `to`.
    fn transfer(&mut self, token: Address, from: Address, to: Address, amount: U256) -> RouterResult<()>;

    /// Native asset balance of `holder`.
    fn native_balance(&self, holder: Address) -> U256;

    /// Moves `amount` of the native asset from `from` to `to`.
    fn transfer_native(&mut self, from: Address, to: Address, amount: U256) -> RouterResult<()>;

    /// Address of the wrapped native token.
    fn wrapped_native(&self) -> Address;

    /// Converts `amount` of `holder`'s native asset into the wrapped token.
    fn wrap_native(&mut self, holder: Address, amount: U256) -> RouterResult<()>;

    /// Converts `amount` of `holder`'s wrapped token back to the native asset.
    fn unwrap_native(&mut self, holder: Address, amount: U256) -> RouterResult<()>;
}

/// Pair pools.
pub trait PoolPort {
    /// Pool address for a pair and curve.
    fn pool_for(&self, token_a: Address, token_b: Address, stable: bool) -> RouterResult<Address>;

    /// Current reserves and configuration of a pool.
    fn pool_state(&self, pool: Address) -> RouterResult<PoolState>;

    /// Swaps `amount_in` of `token_in`, which must already sit in the pool
    /// above its reserves, and sends the output to `to`.
    fn swap(&mut self, pool: Address, amount_in: U256, token_in: Address, to: Address) -> RouterResult<U256>;

    /// Mints LP to `to` for whatever was transferred in above the reserves.
    fn mint_liquidity(&mut self, pool: Address, to: Address) -> RouterResult<U256>;

    /// Burns the LP held by the pool itself and sends both tokens to `to`.
    /// Returns `(amount0, amount1)` in pool token order.
    fn burn_liquidity(&mut self, pool: Address, to: Address) -> RouterResult<(U256, U256)>;
}

/// The wrapped vault (wBLT).
pub trait VaultPort {
    /// Share token address.
    fn vault_token(&self) -> Address;

    /// Current share accounting.
    fn vault_state(&self) -> VaultState;

    /// Deposits `amount` basket tokens from `depositor`, minting shares to
    /// `recipient`. Returns the shares minted.
    fn deposit(&mut self, amount: U256, depositor: Address, recipient: Address) -> RouterResult<U256>;

    /// Burns `shares` from `owner`, sending basket tokens to `recipient`.
    /// Returns the basket tokens released.
    fn withdraw(&mut self, shares: U256, owner: Address, recipient: Address) -> RouterResult<U256>;
}

/// The multi-asset basket (BLT) the vault holds.
pub trait BasketPort {
    /// Basket token address.
    fn basket_token(&self) -> Address;

    /// Whether `asset` can be minted into or redeemed out of the basket.
    fn accepts(&self, asset: Address) -> bool;

    /// Basket tokens minted for `amount` of `asset`.
    fn quote_mint(&self, asset: Address, amount: U256) -> RouterResult<U256>;

    /// `asset` received for redeeming `basket_amount`.
    fn quote_redeem(&self, asset: Address, basket_amount: U256) -> RouterResult<U256>;

    /// `asset` amount that mints at least `basket_amount`, rounded up.
    fn quote_asset_for_basket(&self, asset: Address, basket_amount: U256) -> RouterResult<U256>;

    /// Basket amount that redeems to at least `amount` of `asset`, rounded up.
    fn quote_basket_for_asset(&self, asset: Address, amount: U256) -> RouterResult<U256>;

    /// Mints basket tokens from `payer`'s `asset` to `recipient`.
    fn mint(&mut self, asset: Address, amount: U256, payer: Address, recipient: Address) -> RouterResult<U256>;

    /// Redeems `payer`'s basket tokens into `asset` sent to `recipient`.
    fn redeem(
        &mut self,
        asset: Address,
        basket_amount: U256,
        payer: Address,
        recipient: Address,
    ) -> RouterResult<U256>;
}

/// Static description of an option token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OptionInfo {
    /// Option token address.
    pub token: Address,
    /// Token the option converts into (the LP's other side).
    pub underlying_token: Address,
    /// Token the strike is paid in (wBLT).
    pub payment_token: Address,
    /// LP pool paired on exercise.
    pub pool: Address,
    /// Gauge the LP is staked into.
    pub gauge: Address,
    /// Largest accepted discount.
    pub max_lp_discount: u16,
}

/// Result of exercising an option into LP.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExerciseReceipt {
    /// Payment token spent on the discounted strike.
    pub strike_paid: U256,
    /// Payment token paired with the underlying in the LP.
    pub pairing_paid: U256,
    /// LP minted.
    pub lp_minted: U256,
}

/// Option tokens that exercise into an LP position.
pub trait OptionPort {
    /// Static information for `option`.
    fn option_info(&self, option: Address) -> RouterResult<OptionInfo>;

    /// Payment token owed to exercise `amount` at `discount_bps`.
    ///
    /// Deterministic for fixed inputs and non-increasing in `discount_bps`.
    fn quote_price(&self, option: Address, amount: U256, discount_bps: u16) -> RouterResult<U256>;

    /// Burns `amount` options held by `payer`, takes up to `max_payment` of the
    /// payment token from `payer` and mints the LP to `lp_recipient`.
    fn exercise_to_lp(
        &mut self,
        option: Address,
        payer: Address,
        amount: U256,
        max_payment: U256,
        discount_bps: u16,
        lp_recipient: Address,
    ) -> RouterResult<ExerciseReceipt>;
}

/// LP staking gauges.
pub trait GaugePort {
    /// Pulls `amount` LP from `depositor` and credits it to `recipient`.
    fn deposit_for(
        &mut self,
        gauge: Address,
        depositor: Address,
        recipient: Address,
        amount: U256,
    ) -> RouterResult<()>;

    /// LP staked by `account`.
    fn staked_balance(&self, gauge: Address, account: Address) -> U256;
}

/// Ledger time.
pub trait Clock {
    /// Current timestamp in seconds.
    fn now(&self) -> u64;
}

/// Everything the router talks to. `Clone` provides the snapshot a unit of
/// work runs against.
pub trait Chain:
    TokenPort + PoolPort + VaultPort + BasketPort + OptionPort + GaugePort + Clock + Clone
{
}

impl<T> Chain for T where
    T: TokenPort + PoolPort + VaultPort + BasketPort + OptionPort + GaugePort + Clock + Clone
{
}
