use super::instruction::{Instruction, Leg};
use crate::vault_converter::{self, VaultConverter};
use primitive_types::U256;
use std::collections::BTreeSet;
use tracing::debug;
use wblt_domain::error::{RouterError, RouterResult};
use wblt_domain::math;
use wblt_domain::pool::{Hop, Route};
use wblt_domain::ports::{BasketPort, Clock, PoolPort, TokenPort, VaultPort};
use wblt_domain::rounding::Rounding;
use wblt_domain::token::Address;

/// Quoted amounts plus the instructions that realize them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SwapPlan {
    /// `amounts[0]` is the input, `amounts[i + 1]` the output of hop `i`.
    pub amounts: Vec<U256>,
    /// Resolved leg per hop.
    pub legs: Vec<Leg>,
    /// Transfers, swaps and vault calls in execution order.
    pub instructions: Vec<Instruction>,
    /// Tokens the router may hold mid-plan.
    pub touched: BTreeSet<Address>,
}

impl SwapPlan {
    #[must_use]
    pub fn amount_out(&self) -> U256 {
        self.amounts.last().copied().unwrap_or_default()
    }
}

/// Quotes and plans multi-hop routes against a chain snapshot.
#[derive(Debug)]
pub struct RouteEngine<'a, C> {
    chain: &'a C,
    router: Address,
}

impl<'a, C> RouteEngine<'a, C>
where
    C: PoolPort + VaultPort + BasketPort + Clock,
{
    pub fn new(chain: &'a C, router: Address) -> Self {
        Self { chain, router }
    }

    /// Settlement of a single hop.
    ///
    /// A hop between wBLT and a basket asset (or BLT itself) goes through the
    /// vault; every other hop needs a pool of the hop's curve.
    pub fn resolve(&self, hop: &Hop) -> RouterResult<Leg> {
        let vault = self.chain.vault_token();
        let converter = VaultConverter::new(self.chain);
        if hop.token_out == vault && converter.supports(hop.token_in) {
            return Ok(Leg::Mint { asset: hop.token_in });
        }
        if hop.token_in == vault && converter.supports(hop.token_out) {
            return Ok(Leg::Redeem { asset: hop.token_out });
        }
        let pool = self.chain.pool_for(hop.token_in, hop.token_out, hop.stable)?;
        Ok(Leg::Pool {
            pool,
            token_in: hop.token_in,
            token_out: hop.token_out,
        })
    }

    pub fn legs(&self, route: &Route) -> RouterResult<Vec<Leg>> {
        route.hops().iter().map(|hop| self.resolve(hop)).collect()
    }

    /// Output of one leg for `amount_in`.
    pub fn leg_out(&self, leg: &Leg, amount_in: U256) -> RouterResult<U256> {
        match *leg {
            Leg::Pool { pool, token_in, .. } => {
                let state = self.chain.pool_state(pool)?;
                math::amount_out(&state, amount_in, token_in)
            }
            Leg::Mint { asset } => {
                VaultConverter::new(self.chain).shares_for_deposit(asset, amount_in)
            }
            Leg::Redeem { asset } => {
                VaultConverter::new(self.chain).asset_for_withdraw(asset, amount_in, Rounding::Down)
            }
        }
    }

    /// Amounts along `route`, starting with `amount_in`.
    ///
    /// Every leg is priced against the current snapshot, so the quote is
    /// exact for routes that visit each pool, and the vault, at most once.
    pub fn quote(&self, route: &Route, amount_in: U256) -> RouterResult<Vec<U256>> {
        let legs = self.legs(route)?;
        self.quote_legs(&legs, amount_in)
    }

    fn quote_legs(&self, legs: &[Leg], amount_in: U256) -> RouterResult<Vec<U256>> {
        let mut amounts = Vec::with_capacity(legs.len() + 1);
        amounts.push(amount_in);
        let mut amount = amount_in;
        for (i, leg) in legs.iter().enumerate() {
            amount = self.leg_out(leg, amount)?;
            debug!(hop = i, leg = ?leg, amount_out = %amount, "quoted hop");
            amounts.push(amount);
        }
        Ok(amounts)
    }

    /// Quotes `route` and lays out the transfers that execute it.
    ///
    /// Pool outputs go straight to the next pool; vault legs take and give
    /// at the router. When `payer` is the router itself, input that already
    /// sits where the first leg wants it is not moved.
    pub fn plan(
        &self,
        route: &Route,
        amount_in: U256,
        payer: Address,
        recipient: Address,
    ) -> RouterResult<SwapPlan> {
        if route.is_empty() {
            return Err(RouterError::InvalidPath("route has no hops".to_string()));
        }
        let legs = self.legs(route)?;
        let amounts = self.quote_legs(&legs, amount_in)?;

        let mut instructions = Vec::with_capacity(legs.len() + 1);
        let inbox = legs[0].inbox(self.router);
        if payer != inbox {
            instructions.push(Instruction::Pull {
                token: route.token_in(),
                from: payer,
                to: inbox,
                amount: amount_in,
            });
        }

        for (i, leg) in legs.iter().enumerate() {
            let to = legs
                .get(i + 1)
                .map_or(recipient, |next| next.inbox(self.router));
            let instruction = match *leg {
                Leg::Pool { pool, token_in, .. } => Instruction::Swap {
                    pool,
                    token_in,
                    amount_in: amounts[i],
                    to,
                },
                Leg::Mint { asset } => Instruction::Mint {
                    asset,
                    amount: amounts[i],
                    recipient: to,
                },
                Leg::Redeem { asset } => Instruction::Redeem {
                    asset,
                    shares: amounts[i],
                    recipient: to,
                },
            };
            instructions.push(instruction);
        }

        let mut touched: BTreeSet<Address> = route.tokens().into_iter().collect();
        if legs.iter().any(Leg::is_vault) {
            touched.insert(self.chain.basket_token());
            touched.insert(self.chain.vault_token());
        }

        Ok(SwapPlan {
            amounts,
            legs,
            instructions,
            touched,
        })
    }
}

/// Runs `plan` in order and returns the realized amounts, shaped like
/// [`SwapPlan::amounts`].
pub fn execute<C>(chain: &mut C, router: Address, plan: &SwapPlan) -> RouterResult<Vec<U256>>
where
    C: TokenPort + PoolPort + VaultPort + BasketPort + Clock,
{
    let mut realized = Vec::with_capacity(plan.amounts.len());
    realized.push(plan.amounts.first().copied().unwrap_or_default());
    for instruction in &plan.instructions {
        debug!(%instruction, "executing");
        match *instruction {
            Instruction::Pull {
                token,
                from,
                to,
                amount,
            } => chain.transfer(token, from, to, amount)?,
            Instruction::Swap {
                pool,
                token_in,
                amount_in,
                to,
            } => realized.push(chain.swap(pool, amount_in, token_in, to)?),
            Instruction::Mint {
                asset,
                amount,
                recipient,
            } => realized.push(vault_converter::mint(chain, asset, amount, router, recipient)?),
            Instruction::Redeem {
                asset,
                shares,
                recipient,
            } => realized.push(vault_converter::redeem(chain, asset, shares, router, recipient)?),
        }
    }
    Ok(realized)
}

#[cfg(test)]
mod tests {
    use super::*;
    use wblt_domain::pool::CurveKind;
    use wblt_simulation::chain::SimChain;
    use wblt_simulation::fixture::{Book, Fixture, units};

    fn setup() -> (SimChain, Book) {
        let Fixture { chain, book } = Fixture::new().unwrap();
        (chain, book)
    }

    #[test]
    fn test_single_hop_matches_pool_math() {
        let (chain, book) = setup();
        let route = Route::from_tokens(&[book.weth, book.usdc], false).unwrap();
        let amounts = RouteEngine::new(&chain, book.router)
            .quote(&route, units(1, 18))
            .unwrap();
        let pool = chain.pool_state(book.weth_usdc_pool).unwrap();
        assert_eq!(amounts.len(), 2);
        assert_eq!(
            amounts[1],
            math::amount_out(&pool, units(1, 18), book.weth).unwrap()
        );
    }

    #[test]
    fn test_vault_hops_resolve_to_mint_and_redeem() {
        let (chain, book) = setup();
        let engine = RouteEngine::new(&chain, book.router);
        assert_eq!(
            engine.resolve(&Hop::volatile(book.weth, book.wblt)).unwrap(),
            Leg::Mint { asset: book.weth }
        );
        assert_eq!(
            engine.resolve(&Hop::volatile(book.wblt, book.blt)).unwrap(),
            Leg::Redeem { asset: book.blt }
        );
        assert_eq!(
            engine.resolve(&Hop::volatile(book.wblt, book.bmx)).unwrap(),
            Leg::Pool {
                pool: book.bmx_wblt_pool,
                token_in: book.wblt,
                token_out: book.bmx,
            }
        );
        assert!(matches!(
            engine.resolve(&Hop::new(book.wblt, book.bmx, true)),
            Err(RouterError::PoolNotFound { .. })
        ));
    }

    #[test]
    fn test_plan_forwards_between_pools() {
        let (chain, book) = setup();
        let route = Route::new(vec![
            Hop::new(book.dai, book.usdc, true),
            Hop::volatile(book.usdc, book.weth),
        ])
        .unwrap();
        let plan = RouteEngine::new(&chain, book.router)
            .plan(&route, units(1_000, 18), book.alice, book.bob)
            .unwrap();
        assert_eq!(
            plan.instructions,
            vec![
                Instruction::Pull {
                    token: book.dai,
                    from: book.alice,
                    to: book.usdc_dai_pool,
                    amount: units(1_000, 18),
                },
                Instruction::Swap {
                    pool: book.usdc_dai_pool,
                    token_in: book.dai,
                    amount_in: plan.amounts[0],
                    to: book.weth_usdc_pool,
                },
                Instruction::Swap {
                    pool: book.weth_usdc_pool,
                    token_in: book.usdc,
                    amount_in: plan.amounts[1],
                    to: book.bob,
                },
            ]
        );
    }

    #[test]
    fn test_plan_routes_vault_legs_through_router() {
        let (chain, book) = setup();
        let route = Route::from_tokens(&[book.weth, book.wblt, book.bmx], false).unwrap();
        let plan = RouteEngine::new(&chain, book.router)
            .plan(&route, units(1, 18), book.alice, book.alice)
            .unwrap();
        assert_eq!(
            plan.instructions[0],
            Instruction::Pull {
                token: book.weth,
                from: book.alice,
                to: book.router,
                amount: units(1, 18),
            }
        );
        assert_eq!(
            plan.instructions[1],
            Instruction::Mint {
                asset: book.weth,
                amount: units(1, 18),
                recipient: book.bmx_wblt_pool,
            }
        );
        assert!(plan.touched.contains(&book.blt));
    }

    #[test]
    fn test_router_payer_skips_pull_into_vault_leg() {
        let (chain, book) = setup();
        let route = Route::from_tokens(&[book.weth, book.wblt], false).unwrap();
        let plan = RouteEngine::new(&chain, book.router)
            .plan(&route, units(1, 18), book.router, book.alice)
            .unwrap();
        assert_eq!(plan.instructions.len(), 1);
    }

    #[test]
    fn test_execute_matches_quote() {
        let (mut chain, book) = setup();
        let route = Route::from_tokens(&[book.usdc, book.wblt, book.bmx], false).unwrap();
        let plan = RouteEngine::new(&chain, book.router)
            .plan(&route, units(2_500, 6), book.alice, book.alice)
            .unwrap();
        let before = chain.balance_of(book.bmx, book.alice);
        let realized = execute(&mut chain, book.router, &plan).unwrap();
        assert_eq!(realized, plan.amounts);
        assert_eq!(chain.balance_of(book.bmx, book.alice), before + plan.amount_out());
        for token in &plan.touched {
            assert!(chain.balance_of(*token, book.router).is_zero());
        }
    }

    #[test]
    fn test_zero_reserve_pool_quotes_zero() {
        let (mut chain, book) = setup();
        let empty = Address::from_low_u64_be(0xe0);
        chain
            .add_pool(empty, book.weth, book.dai, CurveKind::Volatile, 30)
            .unwrap();
        let route = Route::from_tokens(&[book.weth, book.dai], false).unwrap();
        let plan = RouteEngine::new(&chain, book.router)
            .plan(&route, units(1, 18), book.alice, book.alice)
            .unwrap();
        assert!(plan.amount_out().is_zero());
        let realized = execute(&mut chain, book.router, &plan).unwrap();
        assert!(realized[1].is_zero());
    }
}
