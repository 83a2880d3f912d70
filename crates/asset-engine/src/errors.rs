//! # Error Types
//!
//! All error types surfaced by the asset engine. Every error is synchronous
//! and atomic: a failing operation leaves ledger, sale, royalty, and
//! allowlist state exactly as it was before the call (batch mint's declared
//! partial completion is a success path, not an error path).

use crate::domain::value_objects::{Amount, ItemId, Principal, Role, SaleStatus};
use thiserror::Error;

// =============================================================================
// ENGINE ERRORS
// =============================================================================

/// Errors surfaced by engine operations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EngineError {
    /// Role or ownership check failed.
    #[error("unauthorized: {principal} lacks {required}")]
    Unauthorized {
        /// The principal that attempted the operation.
        principal: Principal,
        /// What was missing (a role name or ownership description).
        required: String,
    },

    /// Operation targets a non-existent item.
    #[error("item not found: {0}")]
    NotFound(ItemId),

    /// The supply cap has been reached; no further items can ever be minted.
    #[error("supply cap reached: {cap}")]
    CapacityExceeded {
        /// The configured cap.
        cap: u64,
    },

    /// Sale-status precondition violated.
    #[error("invalid sale state for item {id}: {status:?}")]
    InvalidState {
        /// The item whose record blocked the operation.
        id: ItemId,
        /// The status that blocked it.
        status: SaleStatus,
    },

    /// Purchase amount below the listed price.
    #[error("insufficient offer: offered {offered}, asking {asking}")]
    InsufficientOffer {
        /// Amount the buyer offered.
        offered: Amount,
        /// The recorded asking price.
        asking: Amount,
    },

    /// Transfer attempted outside an authorized sale or allowlisted path.
    #[error("transfer of item {id} not authorized by its sale record")]
    TransferNotAuthorizedBySale {
        /// The item whose transfer was vetoed.
        id: ItemId,
    },

    /// A settlement payment could not be completed; the transfer was aborted.
    #[error("disbursement failed: {0}")]
    DisbursementFailed(#[from] DisburseError),

    /// Nested call into a guarded region while settlement funds are in flight.
    #[error("reentrant call rejected")]
    ReentrancyRejected,

    /// Rejected royalty configuration.
    #[error("invalid royalty config: {reason}")]
    InvalidRoyalty {
        /// Why the configuration was rejected.
        reason: String,
    },
}

impl EngineError {
    /// Shorthand for a missing-role failure.
    #[must_use]
    pub fn missing_role(principal: Principal, role: Role) -> Self {
        Self::Unauthorized {
            principal,
            required: role.to_string(),
        }
    }

    /// Shorthand for a missing-ownership failure.
    #[must_use]
    pub fn not_owner(principal: Principal, id: ItemId) -> Self {
        Self::Unauthorized {
            principal,
            required: format!("ownership of item {id}"),
        }
    }
}

// =============================================================================
// DISBURSEMENT ERRORS (outbound boundary)
// =============================================================================

/// Errors reported by the fund-disbursement boundary.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DisburseError {
    /// The recipient cannot receive funds.
    #[error("recipient rejected payment: {0}")]
    RecipientRejected(Principal),

    /// The disbursement service refused the payment.
    #[error("treasury refused payment of {amount} to {recipient}")]
    Refused {
        /// Intended recipient.
        recipient: Principal,
        /// Intended amount.
        amount: Amount,
    },
}
