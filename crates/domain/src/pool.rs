//! Pool snapshots, curve kinds and routes.

use crate::error::{RouterError, RouterResult};
use crate::token::Address;
use primitive_types::U256;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Curve family of a pool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CurveKind {
    /// `x^3*y + y^3*x = k`, for pegged pairs.
    Stable,
    /// `x*y = k`.
    Volatile,
}

impl CurveKind {
    #[must_use]
    pub const fn from_stable(stable: bool) -> Self {
        if stable { Self::Stable } else { Self::Volatile }
    }

    #[must_use]
    pub const fn is_stable(&self) -> bool {
        matches!(self, Self::Stable)
    }

    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Stable => "stable",
            Self::Volatile => "volatile",
        }
    }
}

impl TryFrom<u8> for CurveKind {
    type Error = RouterError;

    /// On-chain encoding: `0` volatile, `1` stable.
    fn try_from(code: u8) -> RouterResult<Self> {
        match code {
            0 => Ok(Self::Volatile),
            1 => Ok(Self::Stable),
            other => Err(RouterError::InvalidPool(format!("unknown curve code {other}"))),
        }
    }
}

impl FromStr for CurveKind {
    type Err = RouterError;

    fn from_str(s: &str) -> RouterResult<Self> {
        match s.to_ascii_lowercase().as_str() {
            "stable" => Ok(Self::Stable),
            "volatile" => Ok(Self::Volatile),
            other => Err(RouterError::InvalidPool(format!("unknown curve type {other:?}"))),
        }
    }
}

impl fmt::Display for CurveKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Snapshot of a pair pool. The LP token lives at `address`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PoolState {
    /// Pool and LP token address.
    pub address: Address,
    /// First token of the pair, as registered.
    pub token0: Address,
    /// The other token.
    pub token1: Address,
    /// Decimals of `token0`.
    pub decimals0: u8,
    /// Decimals of `token1`.
    pub decimals1: u8,
    /// Pricing curve.
    pub curve: CurveKind,
    /// Synced `token0` reserve.
    pub reserve0: U256,
    /// Synced `token1` reserve.
    pub reserve1: U256,
    /// Swap fee taken from the input, in basis points.
    pub fee_bps: u16,
    /// Outstanding LP supply.
    pub total_supply: U256,
}

impl PoolState {
    #[must_use]
    pub fn contains(&self, token: Address) -> bool {
        token == self.token0 || token == self.token1
    }

    /// Returns `(reserve_in, reserve_out, decimals_in, decimals_out)` for a
    /// swap that sells `token_in`.
    pub fn oriented(&self, token_in: Address) -> RouterResult<(U256, U256, u8, u8)> {
        if token_in == self.token0 {
            Ok((self.reserve0, self.reserve1, self.decimals0, self.decimals1))
        } else if token_in == self.token1 {
            Ok((self.reserve1, self.reserve0, self.decimals1, self.decimals0))
        } else {
            Err(RouterError::InvalidPool(format!(
                "{token_in:?} is not part of pool {:?}",
                self.address
            )))
        }
    }

    /// Reserves ordered as `(token_a, token_b)`.
    pub fn reserves_for(&self, token_a: Address, token_b: Address) -> RouterResult<(U256, U256)> {
        let (reserve_a, reserve_b, _, _) = self.oriented(token_a)?;
        if !self.contains(token_b) || token_a == token_b {
            return Err(RouterError::InvalidPool(format!(
                "{token_b:?} is not the pair of {token_a:?} in pool {:?}",
                self.address
            )));
        }
        Ok((reserve_a, reserve_b))
    }

    /// The other token of the pair.
    pub fn other(&self, token: Address) -> RouterResult<Address> {
        if token == self.token0 {
            Ok(self.token1)
        } else if token == self.token1 {
            Ok(self.token0)
        } else {
            Err(RouterError::InvalidPool(format!(
                "{token:?} is not part of pool {:?}",
                self.address
            )))
        }
    }
}

/// One edge of a route.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Hop {
    /// Token sent into the hop.
    pub token_in: Address,
    /// Token received from the hop.
    pub token_out: Address,
    /// Selects the stable pool for the pair.
    pub stable: bool,
}

impl Hop {
    pub fn new(token_in: Address, token_out: Address, stable: bool) -> Self {
        Self {
            token_in,
            token_out,
            stable,
        }
    }

    /// Hop through the volatile pool of the pair.
    pub fn volatile(token_in: Address, token_out: Address) -> Self {
        Self::new(token_in, token_out, false)
    }

    #[must_use]
    pub fn curve(&self) -> CurveKind {
        CurveKind::from_stable(self.stable)
    }
}

/// Ordered, contiguous, non-empty sequence of hops.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Route(Vec<Hop>);

impl Route {
    /// Validates that the path is non-empty and that each hop starts where the
    /// previous one ended.
    pub fn new(hops: Vec<Hop>) -> RouterResult<Self> {
        if hops.is_empty() {
            return Err(RouterError::InvalidPath("route has no hops".to_string()));
        }
        for (i, hop) in hops.iter().enumerate() {
            if hop.token_in == hop.token_out {
                return Err(RouterError::InvalidPath(format!(
                    "hop {i} swaps {:?} for itself",
                    hop.token_in
                )));
            }
        }
        for (i, pair) in hops.windows(2).enumerate() {
            if pair[0].token_out != pair[1].token_in {
                return Err(RouterError::InvalidPath(format!(
                    "hop {i} ends at {:?} but hop {} starts at {:?}",
                    pair[0].token_out,
                    i + 1,
                    pair[1].token_in
                )));
            }
        }
        Ok(Self(hops))
    }

    /// Builds a route from a token path, every hop on the same curve.
    pub fn from_tokens(tokens: &[Address], stable: bool) -> RouterResult<Self> {
        let hops = tokens
            .windows(2)
            .map(|pair| Hop::new(pair[0], pair[1], stable))
            .collect();
        Self::new(hops)
    }

    #[must_use]
    pub fn hops(&self) -> &[Hop] {
        &self.0
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[must_use]
    pub fn token_in(&self) -> Address {
        self.0[0].token_in
    }

    #[must_use]
    pub fn token_out(&self) -> Address {
        self.0[self.0.len() - 1].token_out
    }

    /// Every token the route touches, in path order.
    #[must_use]
    pub fn tokens(&self) -> Vec<Address> {
        let mut tokens = Vec::with_capacity(self.0.len() + 1);
        tokens.push(self.token_in());
        tokens.extend(self.0.iter().map(|h| h.token_out));
        tokens
    }
}

impl<'de> Deserialize<'de> for Route {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let hops = Vec::<Hop>::deserialize(deserializer)?;
        Route::new(hops).map_err(serde::de::Error::custom)
    }
}
