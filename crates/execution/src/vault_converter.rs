//! Conversion between basket assets and wBLT shares.
//!
//! An asset is either the basket token itself, which deposits straight into
//! the vault, or an asset the basket accepts, which is minted into basket
//! tokens first (and redeemed out of them on the way back).

use primitive_types::U256;
use tracing::debug;
use wblt_domain::error::{RouterError, RouterResult};
use wblt_domain::ports::{BasketPort, Clock, VaultPort};
use wblt_domain::rounding::Rounding;
use wblt_domain::token::Address;

/// How an asset reaches the vault.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Entry {
    /// The basket token deposits directly.
    Direct,
    /// Goes through a basket mint or redeem.
    Basket,
}

/// Read-only share quotes against a chain snapshot.
#[derive(Debug)]
pub struct VaultConverter<'a, C> {
    chain: &'a C,
}

impl<'a, C: BasketPort + VaultPort + Clock> VaultConverter<'a, C> {
    pub fn new(chain: &'a C) -> Self {
        Self { chain }
    }

    /// Whether `asset` can be minted into or redeemed out of wBLT.
    #[must_use]
    pub fn supports(&self, asset: Address) -> bool {
        self.entry(asset).is_ok()
    }

    fn entry(&self, asset: Address) -> RouterResult<Entry> {
        if asset == self.chain.basket_token() {
            Ok(Entry::Direct)
        } else if self.chain.accepts(asset) {
            Ok(Entry::Basket)
        } else {
            Err(RouterError::UnsupportedToken(asset))
        }
    }

    /// Shares minted for depositing `amount` of `asset`, floored.
    pub fn shares_for_deposit(&self, asset: Address, amount: U256) -> RouterResult<U256> {
        let basket = match self.entry(asset)? {
            Entry::Direct => amount,
            Entry::Basket => self.chain.quote_mint(asset, amount)?,
        };
        self.chain
            .vault_state()
            .shares_for_deposit(basket, self.chain.now())
    }

    /// `asset` received for redeeming `shares`.
    ///
    /// `rounding` applies to the share-to-basket step; the basket redemption
    /// always floors.
    pub fn asset_for_withdraw(&self, asset: Address, shares: U256, rounding: Rounding) -> RouterResult<U256> {
        let entry = self.entry(asset)?;
        let basket = self
            .chain
            .vault_state()
            .assets_for_shares(shares, self.chain.now(), rounding)?;
        match entry {
            Entry::Direct => Ok(basket),
            Entry::Basket => self.chain.quote_redeem(asset, basket),
        }
    }

    /// `asset` amount that mints at least `shares`, rounded up at every step.
    pub fn asset_needed_for_shares(&self, asset: Address, shares: U256) -> RouterResult<U256> {
        let entry = self.entry(asset)?;
        let basket = self
            .chain
            .vault_state()
            .assets_for_shares(shares, self.chain.now(), Rounding::Up)?;
        match entry {
            Entry::Direct => Ok(basket),
            Entry::Basket => self.chain.quote_asset_for_basket(asset, basket),
        }
    }

    /// Shares to redeem to receive at least `amount` of `asset`.
    pub fn shares_needed_for_asset(&self, asset: Address, amount: U256) -> RouterResult<U256> {
        let basket = match self.entry(asset)? {
            Entry::Direct => amount,
            Entry::Basket => self.chain.quote_basket_for_asset(asset, amount)?,
        };
        self.chain
            .vault_state()
            .shares_for_assets(basket, self.chain.now(), Rounding::Up)
    }
}

/// Mints wBLT for `amount` of `asset` held by `payer`, sending the shares to
/// `recipient`. Intermediate basket tokens pass through `payer`.
pub fn mint<C: BasketPort + VaultPort + Clock>(
    chain: &mut C,
    asset: Address,
    amount: U256,
    payer: Address,
    recipient: Address,
) -> RouterResult<U256> {
    let entry = VaultConverter::new(&*chain).entry(asset)?;
    let basket = match entry {
        Entry::Direct => amount,
        Entry::Basket => chain.mint(asset, amount, payer, payer)?,
    };
    let shares = chain.deposit(basket, payer, recipient)?;
    debug!(asset = ?asset, amount = %amount, shares = %shares, "minted wBLT");
    Ok(shares)
}

/// Redeems `shares` held by `owner` into `asset` sent to `recipient`.
pub fn redeem<C: BasketPort + VaultPort + Clock>(
    chain: &mut C,
    asset: Address,
    shares: U256,
    owner: Address,
    recipient: Address,
) -> RouterResult<U256> {
    let entry = VaultConverter::new(&*chain).entry(asset)?;
    let out = match entry {
        Entry::Direct => chain.withdraw(shares, owner, recipient)?,
        Entry::Basket => {
            let basket = chain.withdraw(shares, owner, owner)?;
            chain.redeem(asset, basket, owner, recipient)?
        }
    };
    debug!(asset = ?asset, shares = %shares, amount = %out, "redeemed wBLT");
    Ok(out)
}
