//! # Treasury Adapter
//!
//! In-memory fund-disbursement implementation for tests and single-process
//! deployments. Production deployments adapt this port to their payment
//! rail; the engine only ever sees `disburse`/`reclaim`.

use crate::domain::value_objects::{Amount, Principal};
use crate::errors::DisburseError;
use crate::ports::outbound::FundDisburser;
use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::{HashMap, HashSet};

/// In-memory balance table with failure injection.
#[derive(Debug, Default)]
pub struct InMemoryTreasury {
    balances: Mutex<HashMap<Principal, Amount>>,
    /// Recipients that reject every payment.
    frozen: Mutex<HashSet<Principal>>,
}

impl InMemoryTreasury {
    /// Create an empty treasury.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Current balance of `principal`.
    #[must_use]
    pub fn balance_of(&self, principal: &Principal) -> Amount {
        self.balances.lock().get(principal).copied().unwrap_or(0)
    }

    /// Mark `principal` as rejecting every payment.
    pub fn freeze(&self, principal: Principal) {
        self.frozen.lock().insert(principal);
    }

    /// Lift a freeze.
    pub fn unfreeze(&self, principal: &Principal) {
        self.frozen.lock().remove(principal);
    }

    /// Sum of all balances.
    #[must_use]
    pub fn total_held(&self) -> Amount {
        self.balances.lock().values().sum()
    }
}

#[async_trait]
impl FundDisburser for InMemoryTreasury {
    async fn disburse(&self, recipient: Principal, amount: Amount) -> Result<(), DisburseError> {
        if self.frozen.lock().contains(&recipient) {
            return Err(DisburseError::RecipientRejected(recipient));
        }
        *self.balances.lock().entry(recipient).or_insert(0) += amount;
        Ok(())
    }

    async fn reclaim(&self, recipient: Principal, amount: Amount) -> Result<(), DisburseError> {
        let mut balances = self.balances.lock();
        match balances.get_mut(&recipient) {
            Some(balance) if *balance >= amount => {
                *balance -= amount;
                Ok(())
            }
            _ => Err(DisburseError::Refused { recipient, amount }),
        }
    }
}
