//! # Driven Ports (Outbound)
//!
//! Boundaries the engine consumes: the fund-disbursement service, the
//! mint-eligibility predicate, and the execution-budget meter. A disbursement
//! hands control to arbitrary external logic and may call back into the
//! engine before returning; the service's reentrancy guard exists for
//! exactly that window.

use crate::domain::value_objects::{Amount, Hash, Principal};
use crate::errors::DisburseError;
use async_trait::async_trait;
use parking_lot::Mutex;

// =============================================================================
// FUND DISBURSEMENT
// =============================================================================

/// Fund-disbursement boundary.
///
/// `disburse` pushes funds to a recipient. `reclaim` is the compensating
/// inverse, used only to unwind an already-completed leg when a later leg of
/// the same settlement fails; implementations that settle transactionally
/// may treat it as a plain reverse transfer.
#[async_trait]
pub trait FundDisburser: Send + Sync {
    /// Pay `amount` to `recipient`.
    async fn disburse(&self, recipient: Principal, amount: Amount) -> Result<(), DisburseError>;

    /// Undo an earlier `disburse` of exactly `amount` to `recipient`.
    async fn reclaim(&self, recipient: Principal, amount: Amount) -> Result<(), DisburseError>;
}

// =============================================================================
// MINT ELIGIBILITY
// =============================================================================

/// Eligibility predicate for the proof-gated mint path.
///
/// The proof format is opaque to the engine; the production implementation
/// verifies a Merkle inclusion proof against a configured root.
pub trait MintEligibility: Send + Sync {
    /// True when `account` may mint with the supplied proof.
    fn is_eligible(&self, account: Principal, proof: &[Hash]) -> bool;
}

// =============================================================================
// EXECUTION BUDGET
// =============================================================================

/// Per-call execution budget query.
///
/// The batch executor stops early once the remaining budget drops to the
/// configured safety margin, reporting partial completion instead of
/// failing.
pub trait ExecutionMeter: Send + Sync {
    /// Remaining budget, in abstract work units.
    fn remaining(&self) -> u64;

    /// Record `units` of completed work against the budget.
    fn charge(&self, units: u64);
}

// =============================================================================
// Mock Implementations for Testing
// =============================================================================

/// Mock disburser recording every payment; can be told to fail.
#[derive(Debug, Default)]
pub struct MockDisburser {
    /// Completed payments, in order.
    pub payments: Mutex<Vec<(Principal, Amount)>>,
    /// Completed reclaims, in order.
    pub reclaims: Mutex<Vec<(Principal, Amount)>>,
    /// When set, every disbursement fails.
    pub should_fail: bool,
}

impl MockDisburser {
    /// A mock that accepts every payment.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A mock that refuses every payment.
    #[must_use]
    pub fn failing() -> Self {
        Self {
            should_fail: true,
            ..Self::default()
        }
    }
}

#[async_trait]
impl FundDisburser for MockDisburser {
    async fn disburse(&self, recipient: Principal, amount: Amount) -> Result<(), DisburseError> {
        if self.should_fail {
            return Err(DisburseError::Refused { recipient, amount });
        }
        self.payments.lock().push((recipient, amount));
        Ok(())
    }

    async fn reclaim(&self, recipient: Principal, amount: Amount) -> Result<(), DisburseError> {
        self.reclaims.lock().push((recipient, amount));
        Ok(())
    }
}
