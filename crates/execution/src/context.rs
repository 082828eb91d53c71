//! Per-call caller context.

use serde::{Deserialize, Serialize};
use wblt_domain::error::{RouterError, RouterResult};
use wblt_domain::token::Address;

/// Who is calling, who receives the output and until when the call is valid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallContext {
    /// Account paying inputs and receiving refunds.
    pub caller: Address,
    /// Account receiving outputs.
    pub recipient: Address,
    /// Last timestamp at which the call may execute.
    pub deadline: u64,
}

impl CallContext {
    #[must_use]
    pub fn new(caller: Address, recipient: Address, deadline: u64) -> Self {
        Self {
            caller,
            recipient,
            deadline,
        }
    }

    /// A context where the caller receives its own output.
    #[must_use]
    pub fn for_caller(caller: Address, deadline: u64) -> Self {
        Self::new(caller, caller, deadline)
    }

    /// Fails with `Expired` once `now` is past the deadline.
    pub fn ensure_not_expired(&self, now: u64) -> RouterResult<()> {
        if now > self.deadline {
            return Err(RouterError::Expired {
                deadline: self.deadline,
                now,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deadline_is_inclusive() {
        let ctx = CallContext::for_caller(Address::from_low_u64_be(1), 100);
        assert!(ctx.ensure_not_expired(99).is_ok());
        assert!(ctx.ensure_not_expired(100).is_ok());
        assert_eq!(
            ctx.ensure_not_expired(101),
            Err(RouterError::Expired {
                deadline: 100,
                now: 101
            })
        );
    }
}
