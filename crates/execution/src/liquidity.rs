//! Liquidity quotes that reconcile the pool ratio with the vault share
//! price.

use crate::vault_converter::VaultConverter;
use primitive_types::U256;
use serde::Serialize;
use wblt_domain::error::RouterResult;
use wblt_domain::math::liquidity;
use wblt_domain::pool::PoolState;
use wblt_domain::ports::{BasketPort, Clock, PoolPort, VaultPort};
use wblt_domain::rounding::Rounding;
use wblt_domain::token::Address;

/// Amounts an add would use at the current pool ratio.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct AddLiquidityQuote {
    /// Used amount of the first token.
    pub amount_a: U256,
    /// Used amount of the second token.
    pub amount_b: U256,
    /// LP that would be minted.
    pub liquidity: U256,
}

/// Add-liquidity quote where the wBLT side is funded with `underlying`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct AddLiquidityUnderlyingQuote {
    /// Underlying to mint the wBLT side from; never above the desired amount.
    pub underlying_amount: U256,
    /// wBLT side deposited.
    pub wblt_amount: U256,
    /// Partner token deposited.
    pub token_amount: U256,
    /// LP that would be minted.
    pub liquidity: U256,
}

/// Pro-rata amounts for burning LP.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RemoveLiquidityQuote {
    pub amount_a: U256,
    pub amount_b: U256,
}

/// Remove quote with the wBLT side valued in `underlying`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RemoveLiquidityUnderlyingQuote {
    /// Underlying the wBLT side redeems to, floored.
    pub underlying_amount: U256,
    /// wBLT taken out of the pool.
    pub wblt_amount: U256,
    /// Partner token taken out of the pool.
    pub token_amount: U256,
}

/// Read-only liquidity quotes.
#[derive(Debug)]
pub struct LiquidityQuoter<'a, C> {
    chain: &'a C,
}

impl<'a, C> LiquidityQuoter<'a, C>
where
    C: PoolPort + VaultPort + BasketPort + Clock,
{
    pub fn new(chain: &'a C) -> Self {
        Self { chain }
    }

    fn pool(&self, token_a: Address, token_b: Address, stable: bool) -> RouterResult<PoolState> {
        let pool = self.chain.pool_for(token_a, token_b, stable)?;
        self.chain.pool_state(pool)
    }

    /// Amounts actually used out of the desired pair, and the LP minted.
    ///
    /// An empty pool takes both desired amounts as they are.
    pub fn quote_add_liquidity(
        &self,
        token_a: Address,
        token_b: Address,
        stable: bool,
        desired_a: U256,
        desired_b: U256,
    ) -> RouterResult<AddLiquidityQuote> {
        let pool = self.pool(token_a, token_b, stable)?;
        let (reserve_a, reserve_b) = pool.reserves_for(token_a, token_b)?;
        let (amount_a, amount_b) = if pool.total_supply.is_zero() {
            (desired_a, desired_b)
        } else {
            liquidity::optimal_amounts(desired_a, desired_b, reserve_a, reserve_b)?
        };
        let liquidity =
            liquidity::liquidity_minted(amount_a, amount_b, reserve_a, reserve_b, pool.total_supply)?;
        Ok(AddLiquidityQuote {
            amount_a,
            amount_b,
            liquidity,
        })
    }

    /// Converts `underlying_desired` to wBLT, applies the pool ratio and, if
    /// the wBLT side got trimmed, works out how much underlying the trimmed
    /// side really needs.
    pub fn quote_add_liquidity_underlying(
        &self,
        underlying: Address,
        token: Address,
        stable: bool,
        underlying_desired: U256,
        token_desired: U256,
    ) -> RouterResult<AddLiquidityUnderlyingQuote> {
        let converter = VaultConverter::new(self.chain);
        let wblt = self.chain.vault_token();
        let wblt_desired = converter.shares_for_deposit(underlying, underlying_desired)?;
        let quote =
            self.quote_add_liquidity(wblt, token, stable, wblt_desired, token_desired)?;
        let underlying_amount = if quote.amount_a < wblt_desired {
            converter
                .asset_needed_for_shares(underlying, quote.amount_a)?
                .min(underlying_desired)
        } else {
            underlying_desired
        };
        Ok(AddLiquidityUnderlyingQuote {
            underlying_amount,
            wblt_amount: quote.amount_a,
            token_amount: quote.amount_b,
            liquidity: quote.liquidity,
        })
    }

    /// Pro-rata share of the reserves for burning `liquidity`, floored.
    pub fn quote_remove_liquidity(
        &self,
        token_a: Address,
        token_b: Address,
        stable: bool,
        liquidity: U256,
    ) -> RouterResult<RemoveLiquidityQuote> {
        let pool = self.pool(token_a, token_b, stable)?;
        let (reserve_a, reserve_b) = pool.reserves_for(token_a, token_b)?;
        let (amount_a, amount_b) =
            liquidity::liquidity_burned(liquidity, reserve_a, reserve_b, pool.total_supply)?;
        Ok(RemoveLiquidityQuote { amount_a, amount_b })
    }

    /// Like [`Self::quote_remove_liquidity`] for a wBLT pool, with the wBLT
    /// side redeemed into `underlying`.
    pub fn quote_remove_liquidity_underlying(
        &self,
        underlying: Address,
        token: Address,
        stable: bool,
        liquidity: U256,
    ) -> RouterResult<RemoveLiquidityUnderlyingQuote> {
        let wblt = self.chain.vault_token();
        let quote = self.quote_remove_liquidity(wblt, token, stable, liquidity)?;
        let underlying_amount = VaultConverter::new(self.chain).asset_for_withdraw(
            underlying,
            quote.amount_a,
            Rounding::Down,
        )?;
        Ok(RemoveLiquidityUnderlyingQuote {
            underlying_amount,
            wblt_amount: quote.amount_a,
            token_amount: quote.amount_b,
        })
    }
}
