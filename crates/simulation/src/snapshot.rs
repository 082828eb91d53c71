//! JSON snapshot of a simulated chain.
//!
//! Amounts are decimal strings so that values above `u64::MAX` survive any
//! JSON tooling. Pool curves are `"stable"` or `"volatile"`.

use crate::basket::SimBasket;
use crate::chain::{SimChain, SimVault};
use crate::options::SimOption;
use primitive_types::U256;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;
use tracing::info;
use wblt_domain::error::RouterError;
use wblt_domain::pool::CurveKind;
use wblt_domain::ports::OptionInfo;
use wblt_domain::token::{Address, Token};
use wblt_domain::vault::VaultState;

/// Errors loading a snapshot.
#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("failed to read snapshot: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse snapshot: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid snapshot state: {0}")]
    Router(#[from] RouterError),
}

/// Reads a JSON document from `path`. Used for bare chain snapshots and for
/// files that wrap one with extra configuration.
pub fn read_json<T: DeserializeOwned>(path: impl AsRef<Path>) -> Result<T, SnapshotError> {
    let json = std::fs::read_to_string(path.as_ref())?;
    let value = serde_json::from_str(&json)?;
    info!(path = %path.as_ref().display(), "loaded snapshot");
    Ok(value)
}

/// Serde helpers for U256 as a decimal string.
pub mod decimal_u256 {
    use primitive_types::U256;
    use serde::{Deserialize, Deserializer, Serializer, de};

    pub fn serialize<S: Serializer>(value: &U256, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(value)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<U256, D::Error> {
        let raw = String::deserialize(deserializer)?;
        U256::from_dec_str(raw.trim())
            .map_err(|e| de::Error::custom(format!("invalid amount {raw:?}: {e:?}")))
    }
}

/// Basket pricing entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BasketAssetSnapshot {
    pub token: Address,
    /// Basket raw units per asset raw unit, scaled by 1e18.
    #[serde(with = "decimal_u256")]
    pub rate: U256,
    /// Asset the basket already holds for redemptions.
    #[serde(with = "decimal_u256", default)]
    pub custody: U256,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BasketSnapshot {
    pub address: Address,
    #[serde(default)]
    pub mint_fee_bps: u16,
    #[serde(default)]
    pub redeem_fee_bps: u16,
    pub assets: Vec<BasketAssetSnapshot>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VaultSnapshot {
    pub address: Address,
    #[serde(with = "decimal_u256")]
    pub total_assets: U256,
    #[serde(with = "decimal_u256")]
    pub total_supply: U256,
    #[serde(with = "decimal_u256", default)]
    pub locked_profit: U256,
    #[serde(default)]
    pub last_report: u64,
    #[serde(with = "decimal_u256", default)]
    pub degradation_per_second: U256,
    /// Holder of the pre-existing shares.
    #[serde(default)]
    pub holder: Address,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PoolSnapshot {
    pub address: Address,
    pub token0: Address,
    pub token1: Address,
    pub curve: String,
    #[serde(with = "decimal_u256")]
    pub reserve0: U256,
    #[serde(with = "decimal_u256")]
    pub reserve1: U256,
    pub fee_bps: u16,
    #[serde(default)]
    pub lp_holder: Address,
    #[serde(default)]
    pub gauge: Option<Address>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OptionSnapshot {
    pub address: Address,
    pub underlying_token: Address,
    pub pool: Address,
    pub gauge: Address,
    pub max_lp_discount: u16,
    #[serde(with = "decimal_u256")]
    pub oracle_price: U256,
    pub treasury: Address,
    #[serde(with = "decimal_u256")]
    pub underlying_reserve: U256,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BalanceSnapshot {
    pub token: Address,
    pub holder: Address,
    #[serde(with = "decimal_u256")]
    pub amount: U256,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NativeBalanceSnapshot {
    pub holder: Address,
    #[serde(with = "decimal_u256")]
    pub amount: U256,
}

/// Complete chain description.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChainSnapshot {
    pub timestamp: u64,
    pub weth: Address,
    pub tokens: Vec<Token>,
    pub basket: BasketSnapshot,
    pub vault: VaultSnapshot,
    #[serde(default)]
    pub pools: Vec<PoolSnapshot>,
    #[serde(default)]
    pub options: Vec<OptionSnapshot>,
    #[serde(default)]
    pub balances: Vec<BalanceSnapshot>,
    #[serde(default)]
    pub native_balances: Vec<NativeBalanceSnapshot>,
}

impl ChainSnapshot {
    pub fn from_json(json: &str) -> Result<Self, SnapshotError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, SnapshotError> {
        read_json(path)
    }

    /// Builds the chain: tokens, basket custody, vault, pools, options,
    /// then free balances.
    pub fn build(self) -> Result<SimChain, SnapshotError> {
        let mut basket = SimBasket::new(
            self.basket.address,
            self.basket.mint_fee_bps,
            self.basket.redeem_fee_bps,
        );
        for asset in &self.basket.assets {
            basket = basket.with_asset(asset.token, asset.rate);
        }
        let vault = SimVault {
            token: self.vault.address,
            state: VaultState::empty(self.vault.degradation_per_second),
        };
        let mut chain = SimChain::new(self.timestamp, self.weth, vault, basket);

        for token in self.tokens {
            chain.register_token(token);
        }
        for asset in &self.basket.assets {
            chain.deal(asset.token, self.basket.address, asset.custody)?;
        }
        chain.seed_vault(
            VaultState {
                total_assets: self.vault.total_assets,
                total_supply: self.vault.total_supply,
                locked_profit: self.vault.locked_profit,
                last_report: self.vault.last_report,
                degradation_per_second: self.vault.degradation_per_second,
            },
            self.vault.holder,
        )?;

        for pool in &self.pools {
            let curve: CurveKind = pool.curve.parse()?;
            chain.add_pool(pool.address, pool.token0, pool.token1, curve, pool.fee_bps)?;
            chain.seed_pool(pool.address, pool.reserve0, pool.reserve1, pool.lp_holder)?;
            if let Some(gauge) = pool.gauge {
                chain.add_gauge(gauge, pool.address);
            }
        }

        for option in self.options {
            let sim = SimOption {
                info: OptionInfo {
                    token: option.address,
                    underlying_token: option.underlying_token,
                    payment_token: self.vault.address,
                    pool: option.pool,
                    gauge: option.gauge,
                    max_lp_discount: option.max_lp_discount,
                },
                oracle_price: option.oracle_price,
                treasury: option.treasury,
            };
            chain.add_option(sim, option.underlying_reserve)?;
        }

        for balance in self.balances {
            chain.deal(balance.token, balance.holder, balance.amount)?;
        }
        for balance in self.native_balances {
            chain.deal_native(balance.holder, balance.amount)?;
        }

        info!(
            timestamp = self.timestamp,
            pools = self.pools.len(),
            "loaded chain snapshot"
        );
        Ok(chain)
    }
}
