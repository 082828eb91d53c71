//! Property-based checks for routing and settlement on the fixture market.
//!
//! 1. **Quote/execute consistency**: executing a plan realizes exactly the
//!    quoted amounts, for pool-only and vault-leg routes alike.
//!    A swap that quotes must also execute, native payouts included.
//! 2. **Zero retention**: the router holds nothing after any swap.
//! 3. **Safe inverse quotes**: the underlying quoted for a share amount
//!    always mints at least that many shares.
//! 4. **Liquidity dust bound**: an add never uses more than desired.

use proptest::prelude::*;
use primitive_types::U256;
use wblt_domain::pool::{Hop, Route};
use wblt_domain::ports::TokenPort;
use wblt_simulation::chain::SimChain;
use wblt_simulation::fixture::{Book, Fixture, GENESIS};

use crate::config::RouterConfig;
use crate::context::CallContext;
use crate::liquidity::LiquidityQuoter;
use crate::router::Router;
use crate::vault_converter::VaultConverter;

// ---------------------------------------------------------------------------
// Strategies
// ---------------------------------------------------------------------------

/// 0.001 to 50 units of an 18-decimal token.
fn token_amount() -> impl Strategy<Value = u128> {
    1_000_000_000_000_000u128..50_000_000_000_000_000_000u128
}

/// Up to 50k USDC.
fn usdc_amount() -> impl Strategy<Value = u128> {
    1u128..50_000_000_000u128
}

fn routes(book: &Book) -> Vec<Route> {
    let hops = |hops: Vec<Hop>| Route::new(hops).unwrap();
    vec![
        hops(vec![Hop::volatile(book.weth, book.usdc)]),
        hops(vec![
            Hop::volatile(book.weth, book.usdc),
            Hop::new(book.usdc, book.dai, true),
        ]),
        hops(vec![
            Hop::volatile(book.weth, book.wblt),
            Hop::volatile(book.wblt, book.bmx),
        ]),
        hops(vec![
            Hop::volatile(book.bmx, book.wblt),
            Hop::volatile(book.wblt, book.usdc),
            Hop::new(book.usdc, book.dai, true),
        ]),
    ]
}

/// Routes ending at WETH, paid out as native.
fn routes_to_eth(book: &Book) -> Vec<Route> {
    let hops = |hops: Vec<Hop>| Route::new(hops).unwrap();
    vec![
        hops(vec![
            Hop::new(book.dai, book.usdc, true),
            Hop::volatile(book.usdc, book.weth),
        ]),
        hops(vec![
            Hop::volatile(book.bmx, book.wblt),
            Hop::volatile(book.wblt, book.weth),
        ]),
    ]
}

fn assert_router_empty(chain: &SimChain, book: &Book, route: &Route) -> Result<(), TestCaseError> {
    for token in route.tokens() {
        prop_assert!(chain.balance_of(token, book.router).is_zero());
    }
    prop_assert!(chain.balance_of(book.blt, book.router).is_zero());
    prop_assert!(chain.native_balance(book.router).is_zero());
    Ok(())
}

// ---------------------------------------------------------------------------
// Swaps
// ---------------------------------------------------------------------------

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn prop_swap_realizes_quote(amount in token_amount(), which in 0usize..4) {
        let Fixture { mut chain, book } = Fixture::new().unwrap();
        let router = Router::new(RouterConfig::new(book.router, book.weth));
        let route = routes(&book).swap_remove(which);
        let amount = U256::from(amount);
        let Ok(quoted) = router.get_amounts_out(&chain, amount, &route) else {
            return Ok(());
        };
        let ctx = CallContext::for_caller(book.alice, GENESIS);
        let before = chain.balance_of(route.token_out(), book.alice);
        let result =
            router.swap_exact_tokens_for_tokens(&mut chain, &ctx, &route, amount, U256::zero());
        prop_assert!(result.is_ok(), "quoted swap failed: {:?}", result);
        let realized = result.unwrap();
        prop_assert_eq!(&realized, &quoted);
        prop_assert_eq!(
            chain.balance_of(route.token_out(), book.alice),
            before + realized[realized.len() - 1]
        );
        assert_router_empty(&chain, &book, &route)?;
    }

    #[test]
    fn prop_swap_to_eth_realizes_quote(amount in token_amount(), which in 0usize..2) {
        let Fixture { mut chain, book } = Fixture::new().unwrap();
        let router = Router::new(RouterConfig::new(book.router, book.weth));
        let route = routes_to_eth(&book).swap_remove(which);
        let amount = U256::from(amount);
        let Ok(quoted) = router.get_amounts_out(&chain, amount, &route) else {
            return Ok(());
        };
        let ctx = CallContext::for_caller(book.alice, GENESIS);
        let native = chain.native_balance(book.alice);
        let weth = chain.balance_of(book.weth, book.alice);
        let result =
            router.swap_exact_tokens_for_eth(&mut chain, &ctx, &route, amount, U256::zero());
        prop_assert!(result.is_ok(), "quoted swap to ETH failed: {:?}", result);
        let realized = result.unwrap();
        prop_assert_eq!(&realized, &quoted);
        prop_assert_eq!(
            chain.native_balance(book.alice),
            native + realized[realized.len() - 1]
        );
        prop_assert_eq!(chain.balance_of(book.weth, book.alice), weth);
        assert_router_empty(&chain, &book, &route)?;
    }
}

// ---------------------------------------------------------------------------
// Vault conversion
// ---------------------------------------------------------------------------

proptest! {
    #![proptest_config(ProptestConfig::with_cases(128))]

    #[test]
    fn prop_asset_needed_mints_enough(shares in usdc_amount(), elapsed in 0u64..100_000) {
        let Fixture { mut chain, book } = Fixture::new().unwrap();
        chain.advance(elapsed);
        let converter = VaultConverter::new(&chain);
        let shares = U256::from(shares) * U256::exp10(9);
        let Ok(usdc) = converter.asset_needed_for_shares(book.usdc, shares) else {
            return Ok(());
        };
        let Ok(minted) = converter.shares_for_deposit(book.usdc, usdc) else {
            return Ok(());
        };
        prop_assert!(minted >= shares);
    }
}

// ---------------------------------------------------------------------------
// Liquidity
// ---------------------------------------------------------------------------

proptest! {
    #![proptest_config(ProptestConfig::with_cases(128))]

    #[test]
    fn prop_add_underlying_within_desired(
        usdc in usdc_amount(),
        bmx in usdc_amount(),
    ) {
        let Fixture { chain, book } = Fixture::new().unwrap();
        let usdc = U256::from(usdc);
        let bmx = U256::from(bmx) * U256::exp10(12);
        let Ok(quote) = LiquidityQuoter::new(&chain)
            .quote_add_liquidity_underlying(book.usdc, book.bmx, false, usdc, bmx)
        else {
            return Ok(());
        };
        prop_assert!(quote.underlying_amount <= usdc);
        prop_assert!(quote.token_amount <= bmx);
    }
}
