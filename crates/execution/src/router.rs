//! The router façade.
//!
//! Quotes borrow the chain immutably. Every mutating entry point checks the
//! deadline first and then runs as one unit of work, so it either commits
//! completely with the router holding nothing, or changes nothing at all.

use crate::config::RouterConfig;
use crate::context::CallContext;
use crate::liquidity::{
    AddLiquidityQuote, AddLiquidityUnderlyingQuote, LiquidityQuoter, RemoveLiquidityQuote,
    RemoveLiquidityUnderlyingQuote,
};
use crate::options::{self, ExerciseOutcome, ExerciseQuote};
use crate::route::{self, RouteEngine, SwapPlan};
use crate::unit_of_work::{UnitOfWork, atomically};
use crate::vault_converter::{self, VaultConverter};
use primitive_types::U256;
use serde::{Deserialize, Serialize};
use tracing::info;
use wblt_domain::error::{RouterError, RouterResult};
use wblt_domain::math::liquidity;
use wblt_domain::pool::Route;
use wblt_domain::ports::{BasketPort, Chain, Clock, PoolPort, TokenPort, VaultPort};
use wblt_domain::rounding::Rounding;
use wblt_domain::token::Address;

/// Adds liquidity to a wBLT pool, funding the wBLT side with `underlying`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddLiquidityParams {
    /// Asset minted into wBLT for the pool's wBLT side.
    pub underlying: Address,
    /// The pool's other token.
    pub token: Address,
    /// Selects the stable pool.
    pub stable: bool,
    /// Most underlying the caller will spend.
    pub amount_underlying_desired: U256,
    /// Most of `token` the caller will spend.
    pub amount_token_desired: U256,
    /// Least wBLT that must go into the pool.
    pub amount_wblt_min: U256,
    /// Least of `token` that must go into the pool.
    pub amount_token_min: U256,
}

/// Amounts an add-liquidity call actually used.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct AddLiquidityOutcome {
    /// Underlying taken from the caller.
    pub underlying_amount: U256,
    /// wBLT deposited into the pool.
    pub wblt_amount: U256,
    /// Partner token deposited into the pool.
    pub token_amount: U256,
    /// LP minted to the recipient.
    pub liquidity: U256,
    /// Minted wBLT the pool ratio left over, returned to the caller.
    pub wblt_refund: U256,
}

/// Removes liquidity from a wBLT pool, redeeming the wBLT side into
/// `underlying`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoveLiquidityParams {
    /// Asset the wBLT side is redeemed into.
    pub underlying: Address,
    /// The pool's other token.
    pub token: Address,
    /// Selects the stable pool.
    pub stable: bool,
    /// LP burned from the caller.
    pub liquidity: U256,
    /// Least underlying the recipient must receive.
    pub amount_underlying_min: U256,
    /// Least of `token` the recipient must receive.
    pub amount_token_min: U256,
}

/// Amounts a remove-liquidity call paid out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RemoveLiquidityOutcome {
    pub underlying_amount: U256,
    pub token_amount: U256,
}

/// Exercises options into staked LP, paying with `underlying`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExerciseParams {
    /// Option token pulled from the caller.
    pub option: Address,
    /// Asset paid in and minted into wBLT.
    pub underlying: Address,
    /// Underlying to convert to wBLT; any surplus comes back as wBLT.
    pub payment_amount: U256,
    /// Options to exercise.
    pub option_amount: U256,
    /// Strike discount in basis points.
    pub discount_bps: u16,
}

/// Stateless router over a [`Chain`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Router {
    config: RouterConfig,
}

impl Router {
    #[must_use]
    pub fn new(config: RouterConfig) -> Self {
        Self { config }
    }

    #[must_use]
    pub fn config(&self) -> &RouterConfig {
        &self.config
    }

    #[must_use]
    pub fn address(&self) -> Address {
        self.config.address
    }

    fn engine<'a, C: Chain>(&self, chain: &'a C) -> RouteEngine<'a, C> {
        RouteEngine::new(chain, self.config.address)
    }

    // Quotes

    /// Amounts along `route` for `amount_in`.
    pub fn get_amounts_out<C: Chain>(&self, chain: &C, amount_in: U256, route: &Route) -> RouterResult<Vec<U256>> {
        self.engine(chain).quote(route, amount_in)
    }

    /// Full swap plan, for dry runs.
    pub fn plan_swap<C: Chain>(
        &self,
        chain: &C,
        route: &Route,
        amount_in: U256,
        payer: Address,
        recipient: Address,
    ) -> RouterResult<SwapPlan> {
        self.engine(chain).plan(route, amount_in, payer, recipient)
    }

    /// wBLT minted for `amount` of `asset`.
    pub fn get_mint_amount_wrapped_blt<C: Chain>(&self, chain: &C, asset: Address, amount: U256) -> RouterResult<U256> {
        VaultConverter::new(chain).shares_for_deposit(asset, amount)
    }

    /// `asset` received for redeeming `shares` wBLT.
    pub fn get_redeem_amount_wrapped_blt<C: Chain>(
        &self,
        chain: &C,
        asset: Address,
        shares: U256,
        rounding: Rounding,
    ) -> RouterResult<U256> {
        VaultConverter::new(chain).asset_for_withdraw(asset, shares, rounding)
    }

    /// `asset` needed to mint at least `shares` wBLT.
    pub fn quote_mint_amount_blt<C: Chain>(&self, chain: &C, asset: Address, shares: U256) -> RouterResult<U256> {
        VaultConverter::new(chain).asset_needed_for_shares(asset, shares)
    }

    /// wBLT to redeem for at least `amount` of `asset`.
    pub fn quote_redeem_amount_blt<C: Chain>(&self, chain: &C, asset: Address, amount: U256) -> RouterResult<U256> {
        VaultConverter::new(chain).shares_needed_for_asset(asset, amount)
    }

    pub fn quote_add_liquidity<C: Chain>(
        &self,
        chain: &C,
        token_a: Address,
        token_b: Address,
        stable: bool,
        desired_a: U256,
        desired_b: U256,
    ) -> RouterResult<AddLiquidityQuote> {
        LiquidityQuoter::new(chain).quote_add_liquidity(token_a, token_b, stable, desired_a, desired_b)
    }

    pub fn quote_add_liquidity_underlying<C: Chain>(
        &self,
        chain: &C,
        underlying: Address,
        token: Address,
        stable: bool,
        underlying_desired: U256,
        token_desired: U256,
    ) -> RouterResult<AddLiquidityUnderlyingQuote> {
        LiquidityQuoter::new(chain).quote_add_liquidity_underlying(
            underlying,
            token,
            stable,
            underlying_desired,
            token_desired,
        )
    }

    pub fn quote_remove_liquidity<C: Chain>(
        &self,
        chain: &C,
        token_a: Address,
        token_b: Address,
        stable: bool,
        liquidity: U256,
    ) -> RouterResult<RemoveLiquidityQuote> {
        LiquidityQuoter::new(chain).quote_remove_liquidity(token_a, token_b, stable, liquidity)
    }

    pub fn quote_remove_liquidity_underlying<C: Chain>(
        &self,
        chain: &C,
        underlying: Address,
        token: Address,
        stable: bool,
        liquidity: U256,
    ) -> RouterResult<RemoveLiquidityUnderlyingQuote> {
        LiquidityQuoter::new(chain).quote_remove_liquidity_underlying(underlying, token, stable, liquidity)
    }

    /// Cost of exercising `option_amount` options into LP.
    pub fn quote_token_needed_to_exercise_lp<C: Chain>(
        &self,
        chain: &C,
        option: Address,
        underlying: Address,
        option_amount: U256,
        discount_bps: u16,
    ) -> RouterResult<ExerciseQuote> {
        options::quote_exercise(chain, option, underlying, option_amount, discount_bps)
    }

    // Swaps

    /// Swaps exactly `amount_in` of the route's first token from the caller.
    /// Returns the realized amounts along the route.
    pub fn swap_exact_tokens_for_tokens<C: Chain>(
        &self,
        chain: &mut C,
        ctx: &CallContext,
        route: &Route,
        amount_in: U256,
        amount_out_min: U256,
    ) -> RouterResult<Vec<U256>> {
        ctx.ensure_not_expired(chain.now())?;
        info!(
            caller = ?ctx.caller,
            token_in = ?route.token_in(),
            token_out = ?route.token_out(),
            hops = route.len(),
            amount_in = %amount_in,
            "swap exact tokens for tokens"
        );
        atomically(chain, self.config.address, "swap_exact_tokens_for_tokens", |work| {
            self.swap_in_unit(work, route, amount_in, amount_out_min, ctx.caller, ctx.recipient)
        })
    }

    /// Swaps `value` of the caller's native asset; the route must start at
    /// WETH.
    pub fn swap_exact_eth_for_tokens<C: Chain>(
        &self,
        chain: &mut C,
        ctx: &CallContext,
        route: &Route,
        value: U256,
        amount_out_min: U256,
    ) -> RouterResult<Vec<U256>> {
        ctx.ensure_not_expired(chain.now())?;
        if route.token_in() != self.config.weth {
            return Err(RouterError::InvalidPath(format!(
                "route starts at {:?}, not WETH",
                route.token_in()
            )));
        }
        info!(
            caller = ?ctx.caller,
            token_out = ?route.token_out(),
            hops = route.len(),
            value = %value,
            "swap exact ETH for tokens"
        );
        let router = self.config.address;
        atomically(chain, router, "swap_exact_eth_for_tokens", |work| {
            self.wrap_from(work, ctx.caller, value)?;
            self.swap_in_unit(work, route, value, amount_out_min, router, ctx.recipient)
        })
    }

    /// Swaps exactly `amount_in` tokens into the native asset; the route must
    /// end at WETH.
    pub fn swap_exact_tokens_for_eth<C: Chain>(
        &self,
        chain: &mut C,
        ctx: &CallContext,
        route: &Route,
        amount_in: U256,
        amount_out_min: U256,
    ) -> RouterResult<Vec<U256>> {
        ctx.ensure_not_expired(chain.now())?;
        if route.token_out() != self.config.weth {
            return Err(RouterError::InvalidPath(format!(
                "route ends at {:?}, not WETH",
                route.token_out()
            )));
        }
        info!(
            caller = ?ctx.caller,
            token_in = ?route.token_in(),
            hops = route.len(),
            amount_in = %amount_in,
            "swap exact tokens for ETH"
        );
        let router = self.config.address;
        atomically(chain, router, "swap_exact_tokens_for_eth", |work| {
            let amounts =
                self.swap_in_unit(work, route, amount_in, amount_out_min, ctx.caller, router)?;
            let out = amounts.last().copied().unwrap_or_default();
            self.unwrap_to(work, ctx.recipient, out)?;
            Ok(amounts)
        })
    }

    fn swap_in_unit<C: Chain>(
        &self,
        work: &mut UnitOfWork<C>,
        route: &Route,
        amount_in: U256,
        amount_out_min: U256,
        payer: Address,
        recipient: Address,
    ) -> RouterResult<Vec<U256>> {
        let plan = self
            .engine(work.view())
            .plan(route, amount_in, payer, recipient)?;
        if plan.amount_out() < amount_out_min {
            return Err(RouterError::InsufficientOutputAmount {
                minimum: amount_out_min,
                actual: plan.amount_out(),
            });
        }
        work.touch_all(plan.touched.iter().copied());
        let router = work.router();
        route::execute(work.chain(), router, &plan)
    }

    // Liquidity

    /// Mints wBLT from the caller's underlying and adds it with `token` to
    /// the pool; LP goes to the recipient.
    pub fn add_liquidity<C: Chain>(
        &self,
        chain: &mut C,
        ctx: &CallContext,
        params: &AddLiquidityParams,
    ) -> RouterResult<AddLiquidityOutcome> {
        ctx.ensure_not_expired(chain.now())?;
        info!(
            caller = ?ctx.caller,
            underlying = ?params.underlying,
            token = ?params.token,
            stable = params.stable,
            "add liquidity"
        );
        atomically(chain, self.config.address, "add_liquidity", |work| {
            let quote = self.quote_add_liquidity_underlying(
                work.view(),
                params.underlying,
                params.token,
                params.stable,
                params.amount_underlying_desired,
                params.amount_token_desired,
            )?;
            let router = work.router();
            work.chain()
                .transfer(params.underlying, ctx.caller, router, quote.underlying_amount)?;
            self.add_liquidity_in_unit(work, ctx, params, quote.underlying_amount)
        })
    }

    /// [`Self::add_liquidity`] with WETH funded from the caller's native
    /// `value`; unused value is returned as native.
    pub fn add_liquidity_eth<C: Chain>(
        &self,
        chain: &mut C,
        ctx: &CallContext,
        params: &AddLiquidityParams,
        value: U256,
    ) -> RouterResult<AddLiquidityOutcome> {
        ctx.ensure_not_expired(chain.now())?;
        let params = AddLiquidityParams {
            underlying: self.config.weth,
            amount_underlying_desired: value,
            ..*params
        };
        info!(
            caller = ?ctx.caller,
            token = ?params.token,
            stable = params.stable,
            value = %value,
            "add liquidity ETH"
        );
        atomically(chain, self.config.address, "add_liquidity_eth", |work| {
            self.wrap_from(work, ctx.caller, value)?;
            let quote = self.quote_add_liquidity_underlying(
                work.view(),
                params.underlying,
                params.token,
                params.stable,
                value,
                params.amount_token_desired,
            )?;
            let outcome = self.add_liquidity_in_unit(work, ctx, &params, quote.underlying_amount)?;
            let unused = value
                .checked_sub(quote.underlying_amount)
                .ok_or(RouterError::Overflow("unused ETH"))?;
            self.unwrap_to(work, ctx.caller, unused)?;
            Ok(outcome)
        })
    }

    /// Second half of an add: the router holds `underlying_amount` of the
    /// underlying.
    fn add_liquidity_in_unit<C: Chain>(
        &self,
        work: &mut UnitOfWork<C>,
        ctx: &CallContext,
        params: &AddLiquidityParams,
        underlying_amount: U256,
    ) -> RouterResult<AddLiquidityOutcome> {
        let router = work.router();
        let wblt = work.view().vault_token();
        let pool = work.view().pool_for(wblt, params.token, params.stable)?;
        work.touch_all([
            params.underlying,
            params.token,
            wblt,
            work.view().basket_token(),
            pool,
        ]);

        let shares = vault_converter::mint(work.chain(), params.underlying, underlying_amount, router, router)?;
        let state = work.view().pool_state(pool)?;
        let (reserve_wblt, reserve_token) = state.reserves_for(wblt, params.token)?;
        let (wblt_amount, token_amount) = if state.total_supply.is_zero() {
            (shares, params.amount_token_desired)
        } else {
            liquidity::optimal_amounts(shares, params.amount_token_desired, reserve_wblt, reserve_token)?
        };
        if wblt_amount < params.amount_wblt_min {
            return Err(RouterError::InsufficientAmount {
                token: wblt,
                minimum: params.amount_wblt_min,
                actual: wblt_amount,
            });
        }
        if token_amount < params.amount_token_min {
            return Err(RouterError::InsufficientAmount {
                token: params.token,
                minimum: params.amount_token_min,
                actual: token_amount,
            });
        }

        let chain = work.chain();
        chain.transfer(wblt, router, pool, wblt_amount)?;
        chain.transfer(params.token, ctx.caller, pool, token_amount)?;
        let liquidity = chain.mint_liquidity(pool, ctx.recipient)?;
        let wblt_refund = shares - wblt_amount;
        if !wblt_refund.is_zero() {
            chain.transfer(wblt, router, ctx.caller, wblt_refund)?;
        }
        Ok(AddLiquidityOutcome {
            underlying_amount,
            wblt_amount,
            token_amount,
            liquidity,
            wblt_refund,
        })
    }

    /// Burns the caller's LP and redeems the wBLT side into the underlying.
    pub fn remove_liquidity<C: Chain>(
        &self,
        chain: &mut C,
        ctx: &CallContext,
        params: &RemoveLiquidityParams,
    ) -> RouterResult<RemoveLiquidityOutcome> {
        ctx.ensure_not_expired(chain.now())?;
        info!(
            caller = ?ctx.caller,
            underlying = ?params.underlying,
            token = ?params.token,
            liquidity = %params.liquidity,
            "remove liquidity"
        );
        atomically(chain, self.config.address, "remove_liquidity", |work| {
            self.remove_liquidity_in_unit(work, ctx, params, ctx.recipient)
        })
    }

    /// [`Self::remove_liquidity`] with the underlying paid out as native.
    pub fn remove_liquidity_eth<C: Chain>(
        &self,
        chain: &mut C,
        ctx: &CallContext,
        params: &RemoveLiquidityParams,
    ) -> RouterResult<RemoveLiquidityOutcome> {
        ctx.ensure_not_expired(chain.now())?;
        let params = RemoveLiquidityParams {
            underlying: self.config.weth,
            ..*params
        };
        info!(
            caller = ?ctx.caller,
            token = ?params.token,
            liquidity = %params.liquidity,
            "remove liquidity ETH"
        );
        let router = self.config.address;
        atomically(chain, router, "remove_liquidity_eth", |work| {
            let outcome = self.remove_liquidity_in_unit(work, ctx, &params, router)?;
            self.unwrap_to(work, ctx.recipient, outcome.underlying_amount)?;
            Ok(outcome)
        })
    }

    fn remove_liquidity_in_unit<C: Chain>(
        &self,
        work: &mut UnitOfWork<C>,
        ctx: &CallContext,
        params: &RemoveLiquidityParams,
        underlying_to: Address,
    ) -> RouterResult<RemoveLiquidityOutcome> {
        let router = work.router();
        let wblt = work.view().vault_token();
        let pool = work.view().pool_for(wblt, params.token, params.stable)?;
        let token0 = work.view().pool_state(pool)?.token0;
        work.touch_all([
            params.underlying,
            params.token,
            wblt,
            work.view().basket_token(),
            pool,
        ]);

        let chain = work.chain();
        chain.transfer(pool, ctx.caller, pool, params.liquidity)?;
        let (amount0, amount1) = chain.burn_liquidity(pool, router)?;
        let (wblt_amount, token_amount) = if token0 == wblt {
            (amount0, amount1)
        } else {
            (amount1, amount0)
        };
        let underlying_amount =
            vault_converter::redeem(chain, params.underlying, wblt_amount, router, underlying_to)?;
        if underlying_amount < params.amount_underlying_min {
            return Err(RouterError::InsufficientAmount {
                token: params.underlying,
                minimum: params.amount_underlying_min,
                actual: underlying_amount,
            });
        }
        if token_amount < params.amount_token_min {
            return Err(RouterError::InsufficientAmount {
                token: params.token,
                minimum: params.amount_token_min,
                actual: token_amount,
            });
        }
        chain.transfer(params.token, router, ctx.recipient, token_amount)?;
        Ok(RemoveLiquidityOutcome {
            underlying_amount,
            token_amount,
        })
    }

    // Options

    /// Exercises the caller's options into LP staked for the recipient.
    pub fn exercise_lp_with_underlying<C: Chain>(
        &self,
        chain: &mut C,
        ctx: &CallContext,
        params: &ExerciseParams,
    ) -> RouterResult<ExerciseOutcome> {
        ctx.ensure_not_expired(chain.now())?;
        info!(
            caller = ?ctx.caller,
            option = ?params.option,
            amount = %params.option_amount,
            discount_bps = params.discount_bps,
            "exercise LP with underlying"
        );
        atomically(chain, self.config.address, "exercise_lp_with_underlying", |work| {
            let router = work.router();
            work.chain()
                .transfer(params.underlying, ctx.caller, router, params.payment_amount)?;
            self.exercise_in_unit(work, ctx, params)
        })
    }

    /// [`Self::exercise_lp_with_underlying`] paid with native `value`.
    pub fn exercise_lp_with_eth<C: Chain>(
        &self,
        chain: &mut C,
        ctx: &CallContext,
        params: &ExerciseParams,
        value: U256,
    ) -> RouterResult<ExerciseOutcome> {
        ctx.ensure_not_expired(chain.now())?;
        let params = ExerciseParams {
            underlying: self.config.weth,
            payment_amount: value,
            ..*params
        };
        info!(
            caller = ?ctx.caller,
            option = ?params.option,
            amount = %params.option_amount,
            value = %value,
            "exercise LP with ETH"
        );
        atomically(chain, self.config.address, "exercise_lp_with_eth", |work| {
            self.wrap_from(work, ctx.caller, value)?;
            self.exercise_in_unit(work, ctx, &params)
        })
    }

    fn exercise_in_unit<C: Chain>(
        &self,
        work: &mut UnitOfWork<C>,
        ctx: &CallContext,
        params: &ExerciseParams,
    ) -> RouterResult<ExerciseOutcome> {
        let router = work.router();
        let info = options::checked_info(work.view(), params.option, params.discount_bps)?;
        let touched = options::touched_tokens(work.view(), &info, params.underlying);
        work.touch_all(touched);
        work.chain()
            .transfer(params.option, ctx.caller, router, params.option_amount)?;
        options::exercise(
            work.chain(),
            router,
            params.option,
            params.underlying,
            params.payment_amount,
            params.option_amount,
            params.discount_bps,
            ctx.recipient,
            ctx.caller,
        )
    }

    // Native asset

    fn wrap_from<C: Chain>(&self, work: &mut UnitOfWork<C>, from: Address, value: U256) -> RouterResult<()> {
        let router = work.router();
        work.touch(self.config.weth);
        let chain = work.chain();
        chain.transfer_native(from, router, value)?;
        chain.wrap_native(router, value)
    }

    fn unwrap_to<C: Chain>(&self, work: &mut UnitOfWork<C>, to: Address, amount: U256) -> RouterResult<()> {
        if amount.is_zero() {
            return Ok(());
        }
        let router = work.router();
        work.touch(self.config.weth);
        let chain = work.chain();
        chain.unwrap_native(router, amount)?;
        chain.transfer_native(router, to, amount)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wblt_domain::pool::Hop;
    use wblt_simulation::chain::SimChain;
    use wblt_simulation::fixture::{Book, Fixture, GENESIS, units};

    fn setup() -> (Router, SimChain, Book) {
        let Fixture { chain, book } = Fixture::new().unwrap();
        (Router::new(RouterConfig::new(book.router, book.weth)), chain, book)
    }

    #[test]
    fn test_min_out_is_enforced_before_any_transfer() {
        let (router, mut chain, book) = setup();
        let route = Route::new(vec![Hop::volatile(book.weth, book.usdc)]).unwrap();
        let quoted = router.get_amounts_out(&chain, units(1, 18), &route).unwrap()[1];
        let ctx = CallContext::for_caller(book.alice, GENESIS);
        let before = chain.ledger().clone();
        let err = router
            .swap_exact_tokens_for_tokens(&mut chain, &ctx, &route, units(1, 18), quoted + U256::one())
            .unwrap_err();
        assert_eq!(
            err,
            RouterError::InsufficientOutputAmount {
                minimum: quoted + U256::one(),
                actual: quoted,
            }
        );
        assert_eq!(chain.ledger(), &before);
    }

    #[test]
    fn test_eth_routes_must_touch_weth() {
        let (router, mut chain, book) = setup();
        let ctx = CallContext::for_caller(book.alice, GENESIS);
        let route = Route::new(vec![Hop::volatile(book.usdc, book.weth)]).unwrap();
        assert!(matches!(
            router.swap_exact_eth_for_tokens(&mut chain, &ctx, &route, units(1, 18), U256::zero()),
            Err(RouterError::InvalidPath(_))
        ));
        let route = Route::new(vec![Hop::volatile(book.weth, book.usdc)]).unwrap();
        assert!(matches!(
            router.swap_exact_tokens_for_eth(&mut chain, &ctx, &route, units(1, 6), U256::zero()),
            Err(RouterError::InvalidPath(_))
        ));
    }

    #[test]
    fn test_add_liquidity_min_rolls_back() {
        let (router, mut chain, book) = setup();
        let ctx = CallContext::for_caller(book.alice, GENESIS);
        let before = chain.ledger().clone();
        let params = AddLiquidityParams {
            underlying: book.usdc,
            token: book.bmx,
            stable: false,
            amount_underlying_desired: units(1_000, 6),
            amount_token_desired: units(100, 18),
            amount_wblt_min: U256::zero(),
            amount_token_min: units(101, 18),
        };
        let err = router.add_liquidity(&mut chain, &ctx, &params).unwrap_err();
        assert!(matches!(err, RouterError::InsufficientAmount { token, .. } if token == book.bmx));
        assert_eq!(chain.ledger(), &before);
        assert_eq!(chain.balance_of(book.usdc, book.alice), units(100_000, 6));
    }
}
