//! Token and native balances of every simulated account.

use primitive_types::U256;
use std::collections::BTreeMap;
use wblt_domain::error::{RouterError, RouterResult};
use wblt_domain::token::Address;

/// Balance book keyed by `(token, holder)`, plus native balances.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Ledger {
    balances: BTreeMap<(Address, Address), U256>,
    native: BTreeMap<Address, U256>,
}

impl Ledger {
    /// Creates an empty ledger.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Balance of `holder` in `token`.
    #[must_use]
    pub fn balance(&self, token: Address, holder: Address) -> U256 {
        self.balances
            .get(&(token, holder))
            .copied()
            .unwrap_or_default()
    }

    /// Native balance of `holder`.
    #[must_use]
    pub fn native_balance(&self, holder: Address) -> U256 {
        self.native.get(&holder).copied().unwrap_or_default()
    }

    /// Creates `amount` of `token` out of thin air for `to`.
    pub fn mint(&mut self, token: Address, to: Address, amount: U256) -> RouterResult<()> {
        let entry = self.balances.entry((token, to)).or_default();
        *entry = entry
            .checked_add(amount)
            .ok_or(RouterError::Overflow("token balance"))?;
        Ok(())
    }

    /// Destroys `amount` of `from`'s `token`.
    pub fn burn(&mut self, token: Address, from: Address, amount: U256) -> RouterResult<()> {
        let balance = self.balance(token, from);
        let remaining = balance
            .checked_sub(amount)
            .ok_or(RouterError::InsufficientBalance {
                token: Some(token),
                holder: from,
                balance,
                needed: amount,
            })?;
        self.set(token, from, remaining);
        Ok(())
    }

    /// Moves `amount` of `token` between two accounts.
    pub fn transfer(
        &mut self,
        token: Address,
        from: Address,
        to: Address,
        amount: U256,
    ) -> RouterResult<()> {
        self.burn(token, from, amount)?;
        self.mint(token, to, amount)
    }

    /// Credits `amount` of the native asset to `to`.
    pub fn mint_native(&mut self, to: Address, amount: U256) -> RouterResult<()> {
        let entry = self.native.entry(to).or_default();
        *entry = entry
            .checked_add(amount)
            .ok_or(RouterError::Overflow("native balance"))?;
        Ok(())
    }

    /// Moves `amount` of the native asset between two accounts.
    pub fn transfer_native(&mut self, from: Address, to: Address, amount: U256) -> RouterResult<()> {
        let balance = self.native_balance(from);
        let remaining = balance
            .checked_sub(amount)
            .ok_or(RouterError::InsufficientBalance {
                token: None,
                holder: from,
                balance,
                needed: amount,
            })?;
        if remaining.is_zero() {
            self.native.remove(&from);
        } else {
            self.native.insert(from, remaining);
        }
        self.mint_native(to, amount)
    }

    fn set(&mut self, token: Address, holder: Address, amount: U256) {
        if amount.is_zero() {
            self.balances.remove(&(token, holder));
        } else {
            self.balances.insert((token, holder), amount);
        }
    }
}
