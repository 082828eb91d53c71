//! A small, fully wired market used by tests and the CLI demo mode.
//!
//! Tokens: WETH, USDC (6 decimals), DAI, BLT basket, wBLT vault, BMX and its
//! option oBMX. Pools: BMX/wBLT volatile (the option's LP), WETH/USDC
//! volatile and USDC/DAI stable. WETH and USDC are basket assets.

use crate::basket::{RATE_SCALE, SimBasket};
use crate::chain::{SimChain, SimVault};
use crate::options::SimOption;
use primitive_types::U256;
use wblt_domain::error::RouterResult;
use wblt_domain::pool::CurveKind;
use wblt_domain::ports::OptionInfo;
use wblt_domain::token::{Address, Token};
use wblt_domain::vault::VaultState;

/// Fixture timestamp.
pub const GENESIS: u64 = 1_700_000_000;

/// Seconds between the last vault report and [`GENESIS`].
pub const SINCE_REPORT: u64 = 3_600;

/// Addresses of every fixture account and contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Book {
    pub weth: Address,
    pub usdc: Address,
    pub dai: Address,
    pub blt: Address,
    pub wblt: Address,
    pub bmx: Address,
    pub obmx: Address,
    pub bmx_wblt_pool: Address,
    pub weth_usdc_pool: Address,
    pub usdc_dai_pool: Address,
    pub gauge: Address,
    pub treasury: Address,
    pub router: Address,
    pub alice: Address,
    pub bob: Address,
    pub whale: Address,
}

impl Default for Book {
    fn default() -> Self {
        let a = Address::from_low_u64_be;
        Self {
            weth: a(0x4200),
            usdc: a(0x833),
            dai: a(0x50c5),
            blt: a(0xb17),
            wblt: a(0x4e59),
            bmx: a(0x548f),
            obmx: a(0x3ff5),
            bmx_wblt_pool: a(0xd272),
            weth_usdc_pool: a(0xcdac),
            usdc_dai_pool: a(0x6770),
            gauge: a(0x3a90),
            treasury: a(0x7ea5),
            router: a(0x2066),
            alice: a(0xa11ce),
            bob: a(0xb0b),
            whale: a(0x3a1e),
        }
    }
}

/// `n * 10^decimals`.
#[must_use]
pub fn units(n: u64, decimals: u8) -> U256 {
    U256::from(n) * U256::exp10(decimals as usize)
}

/// Vault state of the default fixture: 1.1M BLT under management for 1M
/// shares, 50k of it locked at the last report and released at 2 BLT/s.
#[must_use]
pub fn default_vault() -> VaultState {
    VaultState {
        total_assets: units(1_100_000, 18),
        total_supply: units(1_000_000, 18),
        locked_profit: units(50_000, 18),
        last_report: GENESIS - SINCE_REPORT,
        degradation_per_second: units(2, 18),
    }
}

/// Fixture chain plus its address book.
#[derive(Debug, Clone)]
pub struct Fixture {
    pub chain: SimChain,
    pub book: Book,
}

impl Fixture {
    /// The default market.
    pub fn new() -> RouterResult<Self> {
        Self::with_vault(default_vault())
    }

    /// The default market over the given vault accounting.
    pub fn with_vault(vault: VaultState) -> RouterResult<Self> {
        let book = Book::default();

        // 1 WETH = 2000 BLT, 1 USDC = 1 BLT
        let basket = SimBasket::new(book.blt, 10, 30)
            .with_asset(book.weth, U256::from(2_000u64) * U256::from(RATE_SCALE))
            .with_asset(book.usdc, U256::exp10(12) * U256::from(RATE_SCALE));
        let sim_vault = SimVault {
            token: book.wblt,
            state: VaultState::empty(vault.degradation_per_second),
        };
        let mut chain = SimChain::new(GENESIS, book.weth, sim_vault, basket);

        for (address, symbol, decimals) in [
            (book.weth, "WETH", 18),
            (book.usdc, "USDC", 6),
            (book.dai, "DAI", 18),
            (book.blt, "BLT", 18),
            (book.wblt, "wBLT", 18),
            (book.bmx, "BMX", 18),
            (book.obmx, "oBMX", 18),
        ] {
            chain.register_token(Token::new(address, symbol, decimals));
        }

        chain.deal(book.weth, book.blt, units(1_000, 18))?;
        chain.deal(book.usdc, book.blt, units(2_000_000, 6))?;
        chain.seed_vault(vault, book.whale)?;

        chain.add_pool(book.bmx_wblt_pool, book.bmx, book.wblt, CurveKind::Volatile, 30)?;
        chain.seed_pool(
            book.bmx_wblt_pool,
            units(1_000_000, 18),
            units(100_000, 18),
            book.whale,
        )?;
        chain.add_pool(book.weth_usdc_pool, book.weth, book.usdc, CurveKind::Volatile, 30)?;
        chain.seed_pool(book.weth_usdc_pool, units(500, 18), units(1_000_000, 6), book.whale)?;
        chain.add_pool(book.usdc_dai_pool, book.usdc, book.dai, CurveKind::Stable, 5)?;
        chain.seed_pool(
            book.usdc_dai_pool,
            units(1_000_000, 6),
            units(1_000_000, 18),
            book.whale,
        )?;

        chain.add_option(
            SimOption {
                info: OptionInfo {
                    token: book.obmx,
                    underlying_token: book.bmx,
                    payment_token: book.wblt,
                    pool: book.bmx_wblt_pool,
                    gauge: book.gauge,
                    max_lp_discount: 8_000,
                },
                // 0.1 wBLT per BMX
                oracle_price: U256::exp10(17),
                treasury: book.treasury,
            },
            units(1_000_000, 18),
        )?;

        for account in [book.alice, book.bob] {
            chain.deal(book.weth, account, units(100, 18))?;
            chain.deal(book.usdc, account, units(100_000, 6))?;
            chain.deal(book.dai, account, units(100_000, 18))?;
            chain.deal(book.bmx, account, units(10_000, 18))?;
            chain.deal(book.obmx, account, units(1_000, 18))?;
            chain.deal_native(account, units(10, 18))?;
        }

        Ok(Self { chain, book })
    }
}
