//! Exercising discounted options into staked LP, paid with an underlying
//! asset converted to wBLT.

use crate::vault_converter::{self, VaultConverter};
use primitive_types::U256;
use serde::Serialize;
use tracing::debug;
use wblt_domain::error::{RouterError, RouterResult};
use wblt_domain::math::liquidity;
use wblt_domain::ports::{
    BasketPort, Clock, ExerciseReceipt, GaugePort, OptionInfo, OptionPort, PoolPort, TokenPort,
    VaultPort,
};
use wblt_domain::token::Address;

/// What exercising `option_amount` options costs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ExerciseQuote {
    /// Underlying the caller supplies; enough to mint every share below.
    pub payment_token_amount: U256,
    /// Total wBLT required.
    pub partner_token_amount: U256,
    /// Discounted strike, in wBLT.
    pub strike_shares: U256,
    /// wBLT paired with the option's underlying in the LP.
    pub pairing_shares: U256,
}

/// Outcome of an exercise.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ExerciseOutcome {
    /// Underlying converted into wBLT.
    pub underlying_spent: U256,
    /// wBLT minted from it.
    pub shares_minted: U256,
    /// What the option contract reported.
    pub receipt: ExerciseReceipt,
    /// wBLT minted beyond what the exercise took, returned to the caller.
    pub wblt_refund: U256,
}

/// Tokens whose router balance an exercise may move.
#[must_use]
pub fn touched_tokens<C: BasketPort + VaultPort>(chain: &C, info: &OptionInfo, underlying: Address) -> [Address; 6] {
    [
        info.token,
        info.underlying_token,
        info.pool,
        underlying,
        chain.basket_token(),
        chain.vault_token(),
    ]
}

/// Option info, rejecting discounts above the option's maximum.
pub fn checked_info<C: OptionPort>(chain: &C, option: Address, discount_bps: u16) -> RouterResult<OptionInfo> {
    let info = chain.option_info(option)?;
    if discount_bps > info.max_lp_discount {
        return Err(RouterError::DiscountOutOfRange {
            discount_bps,
            max_bps: info.max_lp_discount,
        });
    }
    Ok(info)
}

/// Quotes the cost of exercising `option_amount` into LP at `discount_bps`.
pub fn quote_exercise<C>(
    chain: &C,
    option: Address,
    underlying: Address,
    option_amount: U256,
    discount_bps: u16,
) -> RouterResult<ExerciseQuote>
where
    C: OptionPort + PoolPort + VaultPort + BasketPort + Clock,
{
    let info = checked_info(chain, option, discount_bps)?;
    let strike_shares = chain.quote_price(option, option_amount, discount_bps)?;
    let pool = chain.pool_state(info.pool)?;
    let (reserve_underlying, reserve_payment) =
        pool.reserves_for(info.underlying_token, info.payment_token)?;
    let pairing_shares = liquidity::quote(option_amount, reserve_underlying, reserve_payment)?;
    let partner_token_amount = strike_shares
        .checked_add(pairing_shares)
        .ok_or(RouterError::Overflow("exercise payment"))?;
    let payment_token_amount =
        VaultConverter::new(chain).asset_needed_for_shares(underlying, partner_token_amount)?;
    Ok(ExerciseQuote {
        payment_token_amount,
        partner_token_amount,
        strike_shares,
        pairing_shares,
    })
}

/// Exercises options the router already holds, paying with `payment_amount`
/// of router-held `underlying`. The LP goes straight into the option's
/// gauge for `recipient` and leftover wBLT goes back to `refund_to`.
#[allow(clippy::too_many_arguments)]
pub fn exercise<C>(
    chain: &mut C,
    router: Address,
    option: Address,
    underlying: Address,
    payment_amount: U256,
    option_amount: U256,
    discount_bps: u16,
    recipient: Address,
    refund_to: Address,
) -> RouterResult<ExerciseOutcome>
where
    C: TokenPort + OptionPort + GaugePort + PoolPort + VaultPort + BasketPort + Clock,
{
    let info = checked_info(&*chain, option, discount_bps)?;
    let shares_minted = vault_converter::mint(chain, underlying, payment_amount, router, router)?;
    let receipt = chain.exercise_to_lp(
        option,
        router,
        option_amount,
        shares_minted,
        discount_bps,
        router,
    )?;
    chain.deposit_for(info.gauge, router, recipient, receipt.lp_minted)?;

    let wblt = chain.vault_token();
    let wblt_refund = chain.balance_of(wblt, router);
    if !wblt_refund.is_zero() {
        chain.transfer(wblt, router, refund_to, wblt_refund)?;
    }
    debug!(
        option = ?option,
        lp = %receipt.lp_minted,
        refund = %wblt_refund,
        "exercised into staked LP"
    );
    Ok(ExerciseOutcome {
        underlying_spent: payment_amount,
        shares_minted,
        receipt,
        wblt_refund,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use wblt_simulation::fixture::{Fixture, units};

    #[test]
    fn test_discount_above_max_is_rejected() {
        let Fixture { chain, book } = Fixture::new().unwrap();
        assert_eq!(
            quote_exercise(&chain, book.obmx, book.weth, units(1, 18), 8_001),
            Err(RouterError::DiscountOutOfRange {
                discount_bps: 8_001,
                max_bps: 8_000,
            })
        );
    }

    #[test]
    fn test_quote_components() {
        let Fixture { chain, book } = Fixture::new().unwrap();
        let amount = units(100, 18);
        let quote = quote_exercise(&chain, book.obmx, book.weth, amount, 5_000).unwrap();
        // 100 BMX at 0.1 wBLT, half off
        assert_eq!(quote.strike_shares, units(5, 18));
        // pool is 10 BMX per wBLT
        assert_eq!(quote.pairing_shares, units(10, 18));
        assert_eq!(quote.partner_token_amount, units(15, 18));
        let minted = VaultConverter::new(&chain)
            .shares_for_deposit(book.weth, quote.payment_token_amount)
            .unwrap();
        assert!(minted >= quote.partner_token_amount);
    }

    #[test]
    fn test_deeper_discount_costs_less() {
        let Fixture { chain, book } = Fixture::new().unwrap();
        let amount = units(100, 18);
        let shallow = quote_exercise(&chain, book.obmx, book.usdc, amount, 1_000).unwrap();
        let deep = quote_exercise(&chain, book.obmx, book.usdc, amount, 8_000).unwrap();
        assert!(deep.payment_token_amount <= shallow.payment_token_amount);
        assert_eq!(deep.pairing_shares, shallow.pairing_shares);
    }

    #[test]
    fn test_exercise_stakes_and_refunds() {
        let Fixture { mut chain, book } = Fixture::new().unwrap();
        let amount = units(100, 18);
        let quote = quote_exercise(&chain, book.obmx, book.weth, amount, 5_000).unwrap();
        let payment = quote.payment_token_amount * U256::from(2u64);
        chain.transfer(book.obmx, book.alice, book.router, amount).unwrap();
        chain.transfer(book.weth, book.alice, book.router, payment).unwrap();

        let outcome = exercise(
            &mut chain,
            book.router,
            book.obmx,
            book.weth,
            payment,
            amount,
            5_000,
            book.alice,
            book.alice,
        )
        .unwrap();

        assert_eq!(chain.staked_balance(book.gauge, book.alice), outcome.receipt.lp_minted);
        assert!(chain.balance_of(book.bmx_wblt_pool, book.alice).is_zero());
        assert_eq!(
            outcome.wblt_refund,
            outcome.shares_minted - quote.partner_token_amount
        );
        assert_eq!(chain.balance_of(book.wblt, book.alice), outcome.wblt_refund);
        assert!(chain.balance_of(book.wblt, book.router).is_zero());
    }

    #[test]
    fn test_underpaid_exercise_fails() {
        let Fixture { mut chain, book } = Fixture::new().unwrap();
        let amount = units(100, 18);
        chain.transfer(book.obmx, book.alice, book.router, amount).unwrap();
        chain.transfer(book.weth, book.alice, book.router, units(1, 15)).unwrap();
        let err = exercise(
            &mut chain,
            book.router,
            book.obmx,
            book.weth,
            units(1, 15),
            amount,
            5_000,
            book.alice,
            book.alice,
        )
        .unwrap_err();
        assert!(matches!(err, RouterError::ExcessiveInputAmount { .. }));
    }
}
