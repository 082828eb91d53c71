//! All-or-nothing execution against a working copy of the chain.
//!
//! A unit of work clones the chain, runs every write against the clone and
//! only writes the clone back once the router provably holds nothing. Any
//! error drops the clone, which leaves the original untouched.

use std::collections::BTreeSet;
use tracing::{debug, warn};
use wblt_domain::error::{RouterError, RouterResult};
use wblt_domain::ports::{Chain, TokenPort};
use wblt_domain::token::Address;

/// Working copy plus the tokens whose router balance must end at zero.
#[derive(Debug)]
pub struct UnitOfWork<C> {
    working: C,
    router: Address,
    touched: BTreeSet<Address>,
    label: &'static str,
}

impl<C: Chain> UnitOfWork<C> {
    /// Snapshots `chain`.
    pub fn begin(chain: &C, router: Address, label: &'static str) -> Self {
        Self {
            working: chain.clone(),
            router,
            touched: BTreeSet::new(),
            label,
        }
    }

    /// Mutable access to the working copy.
    pub fn chain(&mut self) -> &mut C {
        &mut self.working
    }

    /// Read access to the working copy.
    #[must_use]
    pub fn view(&self) -> &C {
        &self.working
    }

    #[must_use]
    pub fn router(&self) -> Address {
        self.router
    }

    /// Adds `token` to the zero-retention check.
    pub fn touch(&mut self, token: Address) {
        self.touched.insert(token);
    }

    pub fn touch_all(&mut self, tokens: impl IntoIterator<Item = Address>) {
        self.touched.extend(tokens);
    }

    /// First balance the router would keep, if any.
    pub fn check_retention(&self) -> RouterResult<()> {
        for token in &self.touched {
            let amount = self.working.balance_of(*token, self.router);
            if !amount.is_zero() {
                return Err(RouterError::RetainedBalance {
                    token: Some(*token),
                    amount,
                });
            }
        }
        let native = self.working.native_balance(self.router);
        if !native.is_zero() {
            return Err(RouterError::RetainedBalance {
                token: None,
                amount: native,
            });
        }
        Ok(())
    }

    /// Verifies zero retention and writes the working copy back.
    pub fn commit(self, target: &mut C) -> RouterResult<()> {
        self.check_retention()?;
        debug!(
            operation = self.label,
            tokens = self.touched.len(),
            "committing unit of work"
        );
        *target = self.working;
        Ok(())
    }
}

/// Runs `op` inside a unit of work over `chain`.
///
/// On success the working copy replaces `chain`; on any error `chain` is
/// left exactly as it was.
pub fn atomically<C, T, F>(chain: &mut C, router: Address, label: &'static str, op: F) -> RouterResult<T>
where
    C: Chain,
    F: FnOnce(&mut UnitOfWork<C>) -> RouterResult<T>,
{
    let mut work = UnitOfWork::begin(chain, router, label);
    let outcome = op(&mut work).and_then(|value| work.commit(chain).map(|()| value));
    if let Err(err) = &outcome {
        warn!(operation = label, error = %err, "rolled back");
    }
    outcome
}

#[cfg(test)]
mod tests {
    use super::*;
    use primitive_types::U256;
    use wblt_simulation::fixture::{Fixture, units};

    #[test]
    fn test_commit_writes_back() {
        let Fixture { mut chain, book } = Fixture::new().unwrap();
        let amount = units(1, 18);
        atomically(&mut chain, book.router, "transfer", |work| {
            work.touch(book.weth);
            work.chain().transfer(book.weth, book.alice, book.bob, amount)
        })
        .unwrap();
        assert_eq!(chain.balance_of(book.weth, book.bob), units(101, 18));
    }

    #[test]
    fn test_error_rolls_back_earlier_writes() {
        let Fixture { mut chain, book } = Fixture::new().unwrap();
        let before = chain.clone();
        let err = atomically(&mut chain, book.router, "failing", |work| {
            work.chain()
                .transfer(book.weth, book.alice, book.bob, units(1, 18))?;
            work.chain()
                .transfer(book.weth, book.alice, book.bob, units(1_000, 18))
        })
        .unwrap_err();
        assert!(matches!(err, RouterError::InsufficientBalance { .. }));
        assert_eq!(chain.ledger(), before.ledger());
    }

    #[test]
    fn test_retained_balance_blocks_commit() {
        let Fixture { mut chain, book } = Fixture::new().unwrap();
        let err = atomically(&mut chain, book.router, "leaky", |work| {
            work.touch(book.weth);
            work.chain()
                .transfer(book.weth, book.alice, book.router, U256::one())
        })
        .unwrap_err();
        assert_eq!(
            err,
            RouterError::RetainedBalance {
                token: Some(book.weth),
                amount: U256::one(),
            }
        );
        assert!(chain.balance_of(book.weth, book.router).is_zero());
    }

    #[test]
    fn test_retained_native_blocks_commit() {
        let Fixture { mut chain, book } = Fixture::new().unwrap();
        let err = atomically(&mut chain, book.router, "leaky", |work| {
            work.chain()
                .transfer_native(book.alice, book.router, U256::from(7))
        })
        .unwrap_err();
        assert_eq!(
            err,
            RouterError::RetainedBalance {
                token: None,
                amount: U256::from(7),
            }
        );
    }
}
