//! In-memory chain implementing every collaborator port.
//!
//! Pools price with the domain curve math and keep their fees in reserves.
//! The vault prices shares with [`VaultState`]. Every write goes through the
//! [`Ledger`], so a failed call leaves no trace once the caller discards its
//! working copy.

use crate::basket::SimBasket;
use crate::ledger::Ledger;
use crate::options::{SimGauge, SimOption};
use primitive_types::U256;
use std::collections::BTreeMap;
use tracing::debug;
use wblt_domain::error::{RouterError, RouterResult};
use wblt_domain::math::{self, liquidity};
use wblt_domain::pool::{CurveKind, PoolState};
use wblt_domain::ports::{
    BasketPort, Clock, ExerciseReceipt, GaugePort, OptionInfo, OptionPort, PoolPort, TokenPort,
    VaultPort,
};
use wblt_domain::rounding::Rounding;
use wblt_domain::token::{Address, Token};
use wblt_domain::vault::VaultState;

/// Decimals assumed for tokens that were never registered.
pub const DEFAULT_DECIMALS: u8 = 18;

/// The wrapped vault: share token address plus its accounting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SimVault {
    /// Share token address, also the custody account for basket tokens.
    pub token: Address,
    /// Share accounting.
    pub state: VaultState,
}

/// Simulated chain state.
#[derive(Debug, Clone)]
pub struct SimChain {
    now: u64,
    weth: Address,
    tokens: BTreeMap<Address, Token>,
    ledger: Ledger,
    pools: BTreeMap<Address, PoolState>,
    pool_index: BTreeMap<(Address, Address, bool), Address>,
    vault: SimVault,
    basket: SimBasket,
    options: BTreeMap<Address, SimOption>,
    gauges: BTreeMap<Address, SimGauge>,
}

fn pair_key(a: Address, b: Address, stable: bool) -> (Address, Address, bool) {
    if a < b { (a, b, stable) } else { (b, a, stable) }
}

impl SimChain {
    /// Creates a chain at `now` with an empty vault over `basket`.
    #[must_use]
    pub fn new(now: u64, weth: Address, vault: SimVault, basket: SimBasket) -> Self {
        Self {
            now,
            weth,
            tokens: BTreeMap::new(),
            ledger: Ledger::new(),
            pools: BTreeMap::new(),
            pool_index: BTreeMap::new(),
            vault,
            basket,
            options: BTreeMap::new(),
            gauges: BTreeMap::new(),
        }
    }

    // ---------------------------------------------------------------------
    // Setup
    // ---------------------------------------------------------------------

    /// Registers token metadata used for decimals and symbol lookup.
    pub fn register_token(&mut self, token: Token) {
        self.tokens.insert(token.address, token);
    }

    #[must_use]
    pub fn token(&self, address: Address) -> Option<&Token> {
        self.tokens.get(&address)
    }

    /// Case-insensitive symbol lookup.
    #[must_use]
    pub fn token_by_symbol(&self, symbol: &str) -> Option<&Token> {
        self.tokens
            .values()
            .find(|t| t.symbol.eq_ignore_ascii_case(symbol))
    }

    #[must_use]
    pub fn tokens(&self) -> impl Iterator<Item = &Token> {
        self.tokens.values()
    }

    #[must_use]
    pub fn decimals(&self, token: Address) -> u8 {
        self.tokens
            .get(&token)
            .map_or(DEFAULT_DECIMALS, |t| t.decimals)
    }

    /// Credits `amount` of `token` to `holder` without a counterparty.
    ///
    /// Dealt WETH is backed by the same amount of native coin at the WETH
    /// address so that it can always be unwrapped.
    pub fn deal(&mut self, token: Address, holder: Address, amount: U256) -> RouterResult<()> {
        self.ledger.mint(token, holder, amount)?;
        if token == self.weth {
            self.ledger.mint_native(self.weth, amount)?;
        }
        Ok(())
    }

    /// Credits native balance to `holder`.
    pub fn deal_native(&mut self, holder: Address, amount: U256) -> RouterResult<()> {
        self.ledger.mint_native(holder, amount)
    }

    /// Sets the clock.
    pub fn set_time(&mut self, now: u64) {
        self.now = now;
    }

    /// Moves the clock forward.
    pub fn advance(&mut self, seconds: u64) {
        self.now = self.now.saturating_add(seconds);
    }

    /// Creates an empty pool.
    pub fn add_pool(
        &mut self,
        address: Address,
        token0: Address,
        token1: Address,
        curve: CurveKind,
        fee_bps: u16,
    ) -> RouterResult<()> {
        if token0 == token1 {
            return Err(RouterError::InvalidPool(format!(
                "pool {address:?} pairs {token0:?} with itself"
            )));
        }
        let key = pair_key(token0, token1, curve.is_stable());
        if self.pool_index.contains_key(&key) || self.pools.contains_key(&address) {
            return Err(RouterError::InvalidPool(format!(
                "pool {address:?} already registered"
            )));
        }
        let state = PoolState {
            address,
            token0,
            token1,
            decimals0: self.decimals(token0),
            decimals1: self.decimals(token1),
            curve,
            reserve0: U256::zero(),
            reserve1: U256::zero(),
            fee_bps,
            total_supply: U256::zero(),
        };
        self.pools.insert(address, state);
        self.pool_index.insert(key, address);
        Ok(())
    }

    /// Deals `(amount0, amount1)` into the pool and mints LP to `lp_holder`.
    ///
    /// If either side is zero the pool is only synced and no LP is minted.
    pub fn seed_pool(
        &mut self,
        pool: Address,
        amount0: U256,
        amount1: U256,
        lp_holder: Address,
    ) -> RouterResult<U256> {
        let state = self.pool_state(pool)?;
        self.deal(state.token0, pool, amount0)?;
        self.deal(state.token1, pool, amount1)?;
        if amount0.is_zero() || amount1.is_zero() {
            self.sync(pool)?;
            return Ok(U256::zero());
        }
        self.mint_liquidity(pool, lp_holder)
    }

    /// Installs vault accounting and backs it with custody and shares held by
    /// `holder`.
    pub fn seed_vault(&mut self, state: VaultState, holder: Address) -> RouterResult<()> {
        self.ledger
            .mint(self.basket.token, self.vault.token, state.total_assets)?;
        self.ledger
            .mint(self.vault.token, holder, state.total_supply)?;
        self.vault.state = state;
        Ok(())
    }

    /// Harvests `gain` basket tokens into the vault and locks it.
    pub fn report_profit(&mut self, gain: U256) -> RouterResult<()> {
        self.ledger
            .mint(self.basket.token, self.vault.token, gain)?;
        self.vault.state.apply_report(gain, self.now)
    }

    /// Registers an option token and deals it `underlying_reserve` underlying
    /// tokens to release on exercise.
    pub fn add_option(&mut self, option: SimOption, underlying_reserve: U256) -> RouterResult<()> {
        let info = &option.info;
        if !self.pools.contains_key(&info.pool) {
            return Err(RouterError::InvalidPool(format!(
                "option {:?} pairs into unknown pool {:?}",
                info.token, info.pool
            )));
        }
        self.deal(info.underlying_token, info.token, underlying_reserve)?;
        self.gauges
            .entry(info.gauge)
            .or_insert_with(|| SimGauge::new(info.pool));
        let token = info.token;
        self.options.insert(token, option);
        Ok(())
    }

    /// Registers a gauge staking `lp_token`.
    pub fn add_gauge(&mut self, gauge: Address, lp_token: Address) {
        self.gauges.insert(gauge, SimGauge::new(lp_token));
    }

    // ---------------------------------------------------------------------
    // Inspection
    // ---------------------------------------------------------------------

    #[must_use]
    pub fn ledger(&self) -> &Ledger {
        &self.ledger
    }

    #[must_use]
    pub fn basket(&self) -> &SimBasket {
        &self.basket
    }

    #[must_use]
    pub fn pools(&self) -> impl Iterator<Item = &PoolState> {
        self.pools.values()
    }

    #[must_use]
    pub fn options(&self) -> impl Iterator<Item = &SimOption> {
        self.options.values()
    }

    fn pool_mut(&mut self, pool: Address) -> RouterResult<&mut PoolState> {
        self.pools
            .get_mut(&pool)
            .ok_or_else(|| RouterError::InvalidPool(format!("unknown pool {pool:?}")))
    }

    /// Sets reserves to the pool's token balances.
    fn sync(&mut self, pool: Address) -> RouterResult<()> {
        let (token0, token1) = {
            let state = self.pool_state(pool)?;
            (state.token0, state.token1)
        };
        let balance0 = self.ledger.balance(token0, pool);
        let balance1 = self.ledger.balance(token1, pool);
        let state = self.pool_mut(pool)?;
        state.reserve0 = balance0;
        state.reserve1 = balance1;
        Ok(())
    }
}

impl Clock for SimChain {
    fn now(&self) -> u64 {
        self.now
    }
}

impl TokenPort for SimChain {
    fn balance_of(&self, token: Address, holder: Address) -> U256 {
        self.ledger.balance(token, holder)
    }

    fn transfer(&mut self, token: Address, from: Address, to: Address, amount: U256) -> RouterResult<()> {
        self.ledger.transfer(token, from, to, amount)
    }

    fn native_balance(&self, holder: Address) -> U256 {
        self.ledger.native_balance(holder)
    }

    fn transfer_native(&mut self, from: Address, to: Address, amount: U256) -> RouterResult<()> {
        self.ledger.transfer_native(from, to, amount)
    }

    fn wrapped_native(&self) -> Address {
        self.weth
    }

    fn wrap_native(&mut self, holder: Address, amount: U256) -> RouterResult<()> {
        self.ledger.transfer_native(holder, self.weth, amount)?;
        self.ledger.mint(self.weth, holder, amount)
    }

    fn unwrap_native(&mut self, holder: Address, amount: U256) -> RouterResult<()> {
        self.ledger.burn(self.weth, holder, amount)?;
        self.ledger.transfer_native(self.weth, holder, amount)
    }
}

impl PoolPort for SimChain {
    fn pool_for(&self, token_a: Address, token_b: Address, stable: bool) -> RouterResult<Address> {
        self.pool_index
            .get(&pair_key(token_a, token_b, stable))
            .copied()
            .ok_or(RouterError::PoolNotFound {
                token_a,
                token_b,
                kind: CurveKind::from_stable(stable).as_str(),
            })
    }

    fn pool_state(&self, pool: Address) -> RouterResult<PoolState> {
        self.pools
            .get(&pool)
            .cloned()
            .ok_or_else(|| RouterError::InvalidPool(format!("unknown pool {pool:?}")))
    }

    fn swap(&mut self, pool: Address, amount_in: U256, token_in: Address, to: Address) -> RouterResult<U256> {
        let state = self.pool_state(pool)?;
        let (reserve_in, _, _, _) = state.oriented(token_in)?;
        let received = self
            .ledger
            .balance(token_in, pool)
            .saturating_sub(reserve_in);
        if received < amount_in {
            return Err(RouterError::InsufficientBalance {
                token: Some(token_in),
                holder: pool,
                balance: received,
                needed: amount_in,
            });
        }
        let amount_out = math::amount_out(&state, amount_in, token_in)?;
        let token_out = state.other(token_in)?;
        self.ledger.transfer(token_out, pool, to, amount_out)?;
        self.sync(pool)?;
        debug!(
            pool = ?pool,
            amount_in = %amount_in,
            amount_out = %amount_out,
            curve = %state.curve,
            "pool swap"
        );
        Ok(amount_out)
    }

    fn mint_liquidity(&mut self, pool: Address, to: Address) -> RouterResult<U256> {
        let state = self.pool_state(pool)?;
        let amount0 = self
            .ledger
            .balance(state.token0, pool)
            .saturating_sub(state.reserve0);
        let amount1 = self
            .ledger
            .balance(state.token1, pool)
            .saturating_sub(state.reserve1);
        let minted = liquidity::liquidity_minted(
            amount0,
            amount1,
            state.reserve0,
            state.reserve1,
            state.total_supply,
        )?;
        if minted.is_zero() {
            return Err(RouterError::InsufficientLiquidity);
        }
        let mut supply_increase = minted;
        if state.total_supply.is_zero() {
            let locked = U256::from(liquidity::MINIMUM_LIQUIDITY);
            self.ledger.mint(pool, Address::zero(), locked)?;
            supply_increase = supply_increase
                .checked_add(locked)
                .ok_or(RouterError::Overflow("lp supply"))?;
        }
        self.ledger.mint(pool, to, minted)?;
        {
            let state = self.pool_mut(pool)?;
            state.total_supply = state
                .total_supply
                .checked_add(supply_increase)
                .ok_or(RouterError::Overflow("lp supply"))?;
        }
        self.sync(pool)?;
        Ok(minted)
    }

    fn burn_liquidity(&mut self, pool: Address, to: Address) -> RouterResult<(U256, U256)> {
        let state = self.pool_state(pool)?;
        let lp = self.ledger.balance(pool, pool);
        let (amount0, amount1) =
            liquidity::liquidity_burned(lp, state.reserve0, state.reserve1, state.total_supply)?;
        if amount0.is_zero() || amount1.is_zero() {
            return Err(RouterError::InsufficientLiquidity);
        }
        self.ledger.burn(pool, pool, lp)?;
        {
            let state = self.pool_mut(pool)?;
            state.total_supply -= lp;
        }
        self.ledger.transfer(state.token0, pool, to, amount0)?;
        self.ledger.transfer(state.token1, pool, to, amount1)?;
        self.sync(pool)?;
        Ok((amount0, amount1))
    }
}

impl VaultPort for SimChain {
    fn vault_token(&self) -> Address {
        self.vault.token
    }

    fn vault_state(&self) -> VaultState {
        self.vault.state.clone()
    }

    fn deposit(&mut self, amount: U256, depositor: Address, recipient: Address) -> RouterResult<U256> {
        let shares = self.vault.state.shares_for_deposit(amount, self.now)?;
        if shares.is_zero() {
            return Err(RouterError::InsufficientOutputAmount {
                minimum: U256::one(),
                actual: shares,
            });
        }
        self.ledger
            .transfer(self.basket.token, depositor, self.vault.token, amount)?;
        self.ledger.mint(self.vault.token, recipient, shares)?;
        self.vault.state.apply_deposit(amount, shares)?;
        Ok(shares)
    }

    fn withdraw(&mut self, shares: U256, owner: Address, recipient: Address) -> RouterResult<U256> {
        let assets = self
            .vault
            .state
            .assets_for_shares(shares, self.now, Rounding::Down)?;
        self.ledger.burn(self.vault.token, owner, shares)?;
        self.ledger
            .transfer(self.basket.token, self.vault.token, recipient, assets)?;
        self.vault.state.apply_withdraw(assets, shares)?;
        Ok(assets)
    }
}

impl BasketPort for SimChain {
    fn basket_token(&self) -> Address {
        self.basket.token
    }

    fn accepts(&self, asset: Address) -> bool {
        self.basket.accepts(asset)
    }

    fn quote_mint(&self, asset: Address, amount: U256) -> RouterResult<U256> {
        self.basket.quote_mint(asset, amount)
    }

    fn quote_redeem(&self, asset: Address, basket_amount: U256) -> RouterResult<U256> {
        self.basket.quote_redeem(asset, basket_amount)
    }

    fn quote_asset_for_basket(&self, asset: Address, basket_amount: U256) -> RouterResult<U256> {
        self.basket.quote_asset_for_basket(asset, basket_amount)
    }

    fn quote_basket_for_asset(&self, asset: Address, amount: U256) -> RouterResult<U256> {
        self.basket.quote_basket_for_asset(asset, amount)
    }

    fn mint(&mut self, asset: Address, amount: U256, payer: Address, recipient: Address) -> RouterResult<U256> {
        let minted = self.basket.quote_mint(asset, amount)?;
        self.ledger.transfer(asset, payer, self.basket.token, amount)?;
        self.ledger.mint(self.basket.token, recipient, minted)?;
        Ok(minted)
    }

    fn redeem(
        &mut self,
        asset: Address,
        basket_amount: U256,
        payer: Address,
        recipient: Address,
    ) -> RouterResult<U256> {
        let released = self.basket.quote_redeem(asset, basket_amount)?;
        self.ledger.burn(self.basket.token, payer, basket_amount)?;
        self.ledger
            .transfer(asset, self.basket.token, recipient, released)?;
        Ok(released)
    }
}

impl OptionPort for SimChain {
    fn option_info(&self, option: Address) -> RouterResult<OptionInfo> {
        self.options
            .get(&option)
            .map(|o| o.info.clone())
            .ok_or(RouterError::UnknownOption(option))
    }

    fn quote_price(&self, option: Address, amount: U256, discount_bps: u16) -> RouterResult<U256> {
        self.options
            .get(&option)
            .ok_or(RouterError::UnknownOption(option))?
            .strike(amount, discount_bps)
    }

    fn exercise_to_lp(
        &mut self,
        option: Address,
        payer: Address,
        amount: U256,
        max_payment: U256,
        discount_bps: u16,
        lp_recipient: Address,
    ) -> RouterResult<ExerciseReceipt> {
        let sim = self
            .options
            .get(&option)
            .cloned()
            .ok_or(RouterError::UnknownOption(option))?;
        let info = &sim.info;
        let strike_paid = sim.strike(amount, discount_bps)?;
        let pool = self.pool_state(info.pool)?;
        let (reserve_underlying, reserve_payment) =
            pool.reserves_for(info.underlying_token, info.payment_token)?;
        let pairing_paid = liquidity::quote(amount, reserve_underlying, reserve_payment)?;
        let required = strike_paid
            .checked_add(pairing_paid)
            .ok_or(RouterError::Overflow("exercise payment"))?;
        if required > max_payment {
            return Err(RouterError::ExcessiveInputAmount {
                maximum: max_payment,
                required,
            });
        }

        self.ledger.burn(option, payer, amount)?;
        self.ledger
            .transfer(info.payment_token, payer, sim.treasury, strike_paid)?;
        self.ledger
            .transfer(info.payment_token, payer, info.pool, pairing_paid)?;
        self.ledger
            .transfer(info.underlying_token, option, info.pool, amount)?;
        let lp_minted = self.mint_liquidity(info.pool, lp_recipient)?;

        Ok(ExerciseReceipt {
            strike_paid,
            pairing_paid,
            lp_minted,
        })
    }
}

impl GaugePort for SimChain {
    fn deposit_for(
        &mut self,
        gauge: Address,
        depositor: Address,
        recipient: Address,
        amount: U256,
    ) -> RouterResult<()> {
        let lp_token = self
            .gauges
            .get(&gauge)
            .map(|g| g.lp_token)
            .ok_or(RouterError::UnknownGauge(gauge))?;
        self.ledger.transfer(lp_token, depositor, gauge, amount)?;
        self.gauges
            .get_mut(&gauge)
            .ok_or(RouterError::UnknownGauge(gauge))?
            .credit(recipient, amount)
    }

    fn staked_balance(&self, gauge: Address, account: Address) -> U256 {
        self.gauges
            .get(&gauge)
            .map(|g| g.staked_balance(account))
            .unwrap_or_default()
    }
}
