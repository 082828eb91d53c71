//! Property-based checks for the pricing and share-accounting math.
//!
//! 1. **Vault round-trip**: depositing then valuing the shares never
//!    overstates the deposit, and the two roundings differ by at most 1.
//! 2. **Redeem rounding monotonicity**: `Up` is never below `Down`.
//! 3. **Inverse share quote**: shares quoted with `Up` redeem to at least the
//!    requested assets.
//! 4. **Profit decay**: locked profit never grows and free funds never shrink
//!    between reports.
//! 5. **Liquidity dust bound**: optimal amounts never exceed desired amounts.
//! 6. **Invariant preservation**: neither curve loses `k` on a swap.

use proptest::prelude::*;
use primitive_types::U256;

use crate::math::{liquidity, stable, volatile};
use crate::rounding::Rounding;
use crate::vault::VaultState;

// ---------------------------------------------------------------------------
// Strategies
// ---------------------------------------------------------------------------

fn amount_strategy() -> impl Strategy<Value = u128> {
    1u128..1_000_000_000_000_000_000_000_000u128
}

fn reserve_strategy() -> impl Strategy<Value = u128> {
    1_000_000u128..1_000_000_000_000_000_000_000_000u128
}

fn vault_strategy() -> impl Strategy<Value = VaultState> {
    (
        reserve_strategy(),
        reserve_strategy(),
        0u128..1_000_000_000_000_000_000u128,
        0u128..1_000_000_000_000_000u128,
    )
        .prop_map(|(free, supply, locked, degradation)| VaultState {
            total_assets: U256::from(free) + U256::from(locked),
            total_supply: U256::from(supply),
            locked_profit: U256::from(locked),
            last_report: 1_000,
            degradation_per_second: U256::from(degradation),
        })
}

// ---------------------------------------------------------------------------
// Vault accounting
// ---------------------------------------------------------------------------

proptest! {
    #![proptest_config(ProptestConfig::with_cases(128))]

    #[test]
    fn prop_vault_round_trip(
        vault in vault_strategy(),
        amount in amount_strategy(),
        elapsed in 0u64..1_000_000,
    ) {
        let now = vault.last_report + elapsed;
        let amount = U256::from(amount);
        let Ok(shares) = vault.shares_for_deposit(amount, now) else {
            return Ok(());
        };
        let Ok(down) = vault.assets_for_shares(shares, now, Rounding::Down) else {
            return Ok(());
        };
        let Ok(up) = vault.assets_for_shares(shares, now, Rounding::Up) else {
            return Ok(());
        };

        prop_assert!(down <= amount, "down={} > amount={}", down, amount);
        prop_assert!(up - down <= U256::one(), "up={} down={}", up, down);
        if vault.free_funds(now) <= vault.total_supply {
            prop_assert!(up >= amount, "up={} < amount={}", up, amount);
            prop_assert!(amount - down <= U256::one());
        }
    }

    #[test]
    fn prop_redeem_rounding_monotonic(
        vault in vault_strategy(),
        shares in amount_strategy(),
        elapsed in 0u64..1_000_000,
    ) {
        let now = vault.last_report + elapsed;
        let shares = U256::from(shares);
        let Ok(down) = vault.assets_for_shares(shares, now, Rounding::Down) else {
            return Ok(());
        };
        let Ok(up) = vault.assets_for_shares(shares, now, Rounding::Up) else {
            return Ok(());
        };
        prop_assert!(up >= down);
    }

    #[test]
    fn prop_inverse_share_quote_covers_assets(
        vault in vault_strategy(),
        assets in amount_strategy(),
    ) {
        let now = vault.last_report;
        let assets = U256::from(assets);
        let Ok(shares) = vault.shares_for_assets(assets, now, Rounding::Up) else {
            return Ok(());
        };
        let Ok(redeemed) = vault.assets_for_shares(shares, now, Rounding::Down) else {
            return Ok(());
        };
        prop_assert!(redeemed >= assets, "redeemed={} < assets={}", redeemed, assets);
    }

    #[test]
    fn prop_locked_profit_decays(
        vault in vault_strategy(),
        t1 in 0u64..1_000_000,
        dt in 0u64..1_000_000,
    ) {
        let early = vault.last_report + t1;
        let late = early + dt;
        prop_assert!(vault.locked_profit_at(late) <= vault.locked_profit_at(early));
        prop_assert!(vault.free_funds(late) >= vault.free_funds(early));
        prop_assert!(vault.free_funds(late) <= vault.total_assets);
    }
}

// ---------------------------------------------------------------------------
// Pool math
// ---------------------------------------------------------------------------

proptest! {
    #![proptest_config(ProptestConfig::with_cases(128))]

    #[test]
    fn prop_optimal_amounts_within_desired(
        desired_a in amount_strategy(),
        desired_b in amount_strategy(),
        reserve_a in reserve_strategy(),
        reserve_b in reserve_strategy(),
    ) {
        let (desired_a, desired_b) = (U256::from(desired_a), U256::from(desired_b));
        let Ok((used_a, used_b)) = liquidity::optimal_amounts(
            desired_a,
            desired_b,
            U256::from(reserve_a),
            U256::from(reserve_b),
        ) else {
            return Ok(());
        };
        prop_assert!(used_a <= desired_a);
        prop_assert!(used_b <= desired_b);
    }

    #[test]
    fn prop_volatile_invariant_preserved(
        reserve_in in reserve_strategy(),
        reserve_out in reserve_strategy(),
        fee_bps in 0u16..100,
    ) {
        let (r_in, r_out) = (U256::from(reserve_in), U256::from(reserve_out));
        let amount_in = (r_in / 100).max(U256::one());
        let Ok(out) = volatile::calculate_out_amount(amount_in, r_in, r_out, fee_bps) else {
            return Ok(());
        };
        prop_assert!(out < r_out);
        prop_assert!((r_in + amount_in) * (r_out - out) >= r_in * r_out);
    }

    #[test]
    fn prop_stable_invariant_preserved(
        reserve in 1_000_000_000_000_000_000u128..1_000_000_000_000_000_000_000_000u128,
        skew_bps in 5_000u64..15_000,
        fee_bps in 0u16..50,
    ) {
        let r_in = U256::from(reserve);
        let r_out = r_in * U256::from(skew_bps) / U256::from(10_000u64);
        let amount_in = r_in / 50;
        let Ok(out) = stable::calculate_out_amount(amount_in, r_in, r_out, 18, 18, fee_bps) else {
            return Ok(());
        };
        prop_assert!(out < r_out);
        let Ok(before) = stable::calculate_k(r_in, r_out, 18, 18) else {
            return Ok(());
        };
        let Ok(after) = stable::calculate_k(r_in + amount_in, r_out - out, 18, 18) else {
            return Ok(());
        };
        prop_assert!(after >= before, "k decreased: {} -> {}", before, after);
    }
}
